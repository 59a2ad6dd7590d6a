use crate::app::api::ApiCtx;
use crate::app::{Route, TeamLeadsQuery};
use crate::features::dashboard::logic::{Figure, headline_figures};
use crate::features::reminders::view::ReminderWidget;
use crate::services::reports;
use tracing::warn;
use wasm_bindgen_futures::spawn_local;
use yew::prelude::*;
use yew_router::prelude::Link;

#[function_component(DashboardPage)]
pub(crate) fn dashboard_page() -> Html {
    let api_ctx = use_context::<ApiCtx>();
    let figures = use_state(Vec::<Figure>::new);
    let failed = use_state(|| false);

    {
        let api_ctx = api_ctx.clone();
        let figures = figures.clone();
        let failed = failed.clone();
        use_effect_with_deps(
            move |_| {
                if let Some(ctx) = api_ctx {
                    spawn_local(async move {
                        match reports::dashboard_stats(&ctx.client).await {
                            Ok(payload) => figures.set(headline_figures(&payload)),
                            Err(err) => {
                                warn!(error = %err, "failed to load dashboard stats");
                                failed.set(true);
                            }
                        }
                    });
                }
                || ()
            },
            (),
        );
    }

    if api_ctx.is_none() {
        return html! {
            <div class="panel">
                <p class="text-sm text-error">{"Missing API context."}</p>
            </div>
        };
    }

    let unassigned = TeamLeadsQuery {
        team: None,
        unassigned: Some("true".to_string()),
    };

    html! {
        <div class="page dashboard">
            <header class="page-head">
                <h2>{"Dashboard"}</h2>
                <Link<Route, TeamLeadsQuery> classes={classes!("button", "ghost")} to={Route::TeamLeads} query={Some(unassigned)}>
                    {"Unassigned leads"}
                </Link<Route, TeamLeadsQuery>>
            </header>
            {if *failed {
                html! { <p class="text-sm text-error">{"Dashboard figures are unavailable."}</p> }
            } else {
                html! {
                    <div class="stats-grid">
                        {for figures.iter().map(|figure| html! {
                            <div class="card stat">
                                <small class="muted">{figure.label.clone()}</small>
                                <strong>{figure.value.clone()}</strong>
                            </div>
                        })}
                    </div>
                }
            }}
            <ReminderWidget />
        </div>
    }
}

use crate::app::api::ApiCtx;
use crate::app::{Route, TeamLeadsQuery};
use crate::core::store::{AppStore, toast_info};
use crate::services::{auth, notifications, reminders, teams};
use crm_api_models::TeamOption;
use tracing::warn;
use wasm_bindgen_futures::spawn_local;
use yew::prelude::*;
use yew_router::prelude::{Link, use_navigator};
use yewdux::prelude::use_selector;

#[derive(Properties, PartialEq)]
pub(crate) struct ShellProps {
    pub children: Children,
    pub active: Route,
}

/// Sidebar, top bar with unread badges, and the routed page.
#[function_component(AppShell)]
pub(crate) fn app_shell(props: &ShellProps) -> Html {
    let api_ctx = use_context::<ApiCtx>();
    let navigator = use_navigator();
    let nav_open = use_state(|| false);
    let teams_open = use_state(|| false);
    let team_options = use_state(Vec::<TeamOption>::new);
    let unread = use_selector(|store: &AppStore| store.unread);
    let username = use_selector(|store: &AppStore| {
        store
            .auth
            .session
            .as_ref()
            .map(|session| session.username.clone())
            .unwrap_or_default()
    });

    {
        let api_ctx = api_ctx.clone();
        let team_options = team_options.clone();
        use_effect_with_deps(
            move |_| {
                if let Some(ctx) = api_ctx {
                    spawn_local(async move {
                        match teams::list(&ctx.client).await {
                            Ok(list) => team_options.set(list),
                            Err(err) => warn!(error = %err, "failed to load teams"),
                        }
                        if let Err(err) = notifications::unread_count(&ctx.client).await {
                            warn!(error = %err, "failed to load unread notifications");
                        }
                        if let Err(err) = reminders::stats(&ctx.client).await {
                            warn!(error = %err, "failed to load reminder stats");
                        }
                    });
                }
                || ()
            },
            (),
        );
    }

    let toggle_nav = {
        let nav_open = nav_open.clone();
        Callback::from(move |_| nav_open.set(!*nav_open))
    };
    let toggle_teams = {
        let teams_open = teams_open.clone();
        Callback::from(move |_| teams_open.set(!*teams_open))
    };
    let on_logout = {
        let api_ctx = api_ctx.clone();
        Callback::from(move |_| {
            if let Some(ctx) = &api_ctx {
                auth::logout(&ctx.client);
                toast_info("Signed out");
            }
            if let Some(navigator) = &navigator {
                navigator.push(&Route::Login);
            }
        })
    };

    html! {
        <div class="app-shell">
            <aside class={classes!("sidebar", if *nav_open { "open" } else { "closed" })}>
                <div class="brand">
                    <button class="ghost mobile-only" onclick={toggle_nav.clone()} aria-label="Close navigation">{"✕"}</button>
                    <strong>{"CRM"}</strong>
                </div>
                <nav>
                    {nav_item(Route::Dashboard, "Dashboard", &props.active)}
                    {nav_item(Route::TeamLeads, "Leads", &props.active)}
                    {nav_item(Route::LeadBoard, "Pipeline Board", &props.active)}
                    {nav_item(Route::TechPipeline, "Tech Pipeline", &props.active)}
                    {nav_item(Route::Tasks, "Tasks", &props.active)}
                    {nav_item(Route::Reminders, "Reminders", &props.active)}
                    {nav_item(Route::Teams, "Teams", &props.active)}
                    <button class="nav-item ghost" onclick={toggle_teams}>{"Team Leads"}</button>
                    {if *teams_open {
                        html! {
                            <div class="nav-sub">
                                {for team_options.iter().map(|team| html! {
                                    <Link<Route, TeamLeadsQuery>
                                        classes={classes!("nav-item")}
                                        to={Route::TeamLeads}
                                        query={Some(TeamLeadsQuery { team: Some(team.value.clone()), unassigned: None })}
                                    >
                                        {team.label.clone()}
                                    </Link<Route, TeamLeadsQuery>>
                                })}
                            </div>
                        }
                    } else { html! {} }}
                    {nav_item(Route::AdminUsers, "Users", &props.active)}
                </nav>
            </aside>
            <div class="main">
                <header class="topbar">
                    <button class="ghost mobile-only" onclick={toggle_nav} aria-label="Open navigation">{"☰"}</button>
                    <div class="topbar-actions">
                        <Link<Route> classes={classes!("badge-link")} to={Route::Notifications}>
                            {"Notifications"}
                            {badge(unread.notifications)}
                        </Link<Route>>
                        <Link<Route> classes={classes!("badge-link")} to={Route::Reminders}>
                            {"Reminders"}
                            {badge(unread.reminders)}
                        </Link<Route>>
                        <span class="muted">{(*username).clone()}</span>
                        <button class="ghost" onclick={on_logout}>{"Logout"}</button>
                    </div>
                </header>
                <main class="content">
                    {for props.children.iter()}
                </main>
            </div>
        </div>
    }
}

fn nav_item(route: Route, label: &'static str, active: &Route) -> Html {
    let class = if &route == active { "nav-item active" } else { "nav-item" };
    html! {
        <Link<Route> classes={classes!(class)} to={route}>{label}</Link<Route>>
    }
}

fn badge(count: u32) -> Html {
    if count == 0 {
        return html! {};
    }
    html! { <span class="pill badge">{count}</span> }
}

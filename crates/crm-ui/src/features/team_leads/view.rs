//! Team lead table page.
//!
//! # Design
//! - Page state lives in a reducer; network results come back as `Loaded` actions.
//! - A listing is applied only if the filters that produced it are still current.
//! - The CSV export is handed to the browser as a blob download.

use crate::app::api::ApiCtx;
use crate::app::{Route, TeamLeadsQuery};
use crate::core::store::{toast_error, toast_success, toast_warning};
use crate::features::team_leads::state::{
    ASSIGNED_MESSAGE, CSV_FILE_NAME, FilterType, TeamLeadsState, assign_failure_message,
    assign_selected, reload, stage_badge,
};
use crate::services::leads::{self, LeadQuery};
use crm_api_models::{Lead, UserSummary};
use std::ops::Deref;
use std::rc::Rc;
use tracing::{info, warn};
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::spawn_local;
use web_sys::{Blob, BlobPropertyBag, HtmlAnchorElement, HtmlInputElement, HtmlSelectElement, Url};
use yew::prelude::*;
use yew_router::prelude::{Link, use_location};

enum PageAction {
    Route(TeamLeadsQuery),
    Search(String),
    Filter(FilterType),
    Loaded { query: LeadQuery, rows: Vec<Lead> },
    ToggleAll(bool),
    Toggle(i64),
}

struct LeadsPage(TeamLeadsState);

impl Deref for LeadsPage {
    type Target = TeamLeadsState;

    fn deref(&self) -> &TeamLeadsState {
        &self.0
    }
}

impl Reducible for LeadsPage {
    type Action = PageAction;

    fn reduce(self: Rc<Self>, action: PageAction) -> Rc<Self> {
        let mut next = self.0.clone();
        match action {
            PageAction::Route(query) => {
                next = TeamLeadsState::from_route(query.team.clone(), query.unassigned_override());
            }
            PageAction::Search(value) => next.search = value,
            PageAction::Filter(filter) => next.set_filter(filter),
            PageAction::Loaded { query, rows } => {
                if next.query() != query {
                    return self;
                }
                next.set_leads(rows);
            }
            PageAction::ToggleAll(checked) => next.toggle_select_all(checked),
            PageAction::Toggle(id) => next.toggle_selection(id),
        }
        Rc::new(Self(next))
    }
}

#[function_component(TeamLeadsPage)]
pub(crate) fn team_leads_page() -> Html {
    let api_ctx = use_context::<ApiCtx>();
    let route_query = use_location()
        .and_then(|location| location.query::<TeamLeadsQuery>().ok())
        .unwrap_or_default();
    let state = use_reducer(|| {
        LeadsPage(TeamLeadsState::from_route(
            route_query.team.clone(),
            route_query.unassigned_override(),
        ))
    });
    let users = use_state(Vec::<UserSummary>::new);
    let assignee = use_state(|| None as Option<i64>);

    {
        let state = state.clone();
        use_effect_with_deps(
            move |query: &TeamLeadsQuery| {
                state.dispatch(PageAction::Route(query.clone()));
                || ()
            },
            route_query,
        );
    }

    {
        let api_ctx = api_ctx.clone();
        let state = state.clone();
        use_effect_with_deps(
            move |_: &LeadQuery| {
                if let Some(ctx) = api_ctx {
                    let mut snapshot = state.0.clone();
                    spawn_local(async move {
                        match reload(&ctx.client, &mut snapshot).await {
                            Ok(()) => state.dispatch(PageAction::Loaded {
                                query: snapshot.query(),
                                rows: snapshot.leads,
                            }),
                            Err(err) => {
                                warn!(error = %err, "failed to load team leads");
                                toast_error(err.user_message());
                            }
                        }
                    });
                }
                || ()
            },
            state.query(),
        );
    }

    {
        let api_ctx = api_ctx.clone();
        let users = users.clone();
        use_effect_with_deps(
            move |_| {
                if let Some(ctx) = api_ctx {
                    spawn_local(async move {
                        match leads::users(&ctx.client).await {
                            Ok(list) => users.set(list),
                            Err(err) => warn!(error = %err, "failed to load assignable users"),
                        }
                    });
                }
                || ()
            },
            (),
        );
    }

    let Some(api_ctx) = api_ctx else {
        return html! {
            <div class="panel">
                <p class="text-sm text-error">{"Missing API context."}</p>
            </div>
        };
    };

    let on_search = {
        let state = state.clone();
        Callback::from(move |e: InputEvent| {
            if let Some(input) = e.target_dyn_into::<HtmlInputElement>() {
                state.dispatch(PageAction::Search(input.value()));
            }
        })
    };
    let on_toggle_all = {
        let state = state.clone();
        Callback::from(move |e: Event| {
            if let Some(input) = e.target_dyn_into::<HtmlInputElement>() {
                state.dispatch(PageAction::ToggleAll(input.checked()));
            }
        })
    };
    let on_assignee = {
        let assignee = assignee.clone();
        Callback::from(move |e: Event| {
            if let Some(select) = e.target_dyn_into::<HtmlSelectElement>() {
                assignee.set(select.value().parse::<i64>().ok());
            }
        })
    };
    let on_assign = {
        let client = api_ctx.client.clone();
        let state = state.clone();
        let assignee = assignee.clone();
        Callback::from(move |_| {
            let client = client.clone();
            let state = state.clone();
            let mut snapshot = state.0.clone();
            let user_id = *assignee;
            spawn_local(async move {
                match assign_selected(&client, &mut snapshot, user_id).await {
                    Ok(true) => {
                        toast_success(ASSIGNED_MESSAGE);
                        state.dispatch(PageAction::Loaded {
                            query: snapshot.query(),
                            rows: snapshot.leads,
                        });
                    }
                    Ok(false) => toast_warning("Select leads and a user first"),
                    Err(err) => toast_error(assign_failure_message(&err)),
                }
            });
        })
    };
    let on_export = {
        let client = api_ctx.client.clone();
        let state = state.clone();
        Callback::from(move |_| {
            let client = client.clone();
            let query = state.query();
            spawn_local(async move {
                match leads::export_csv(&client, &query).await {
                    Ok(bytes) => {
                        if let Err(err) = download_csv(&bytes) {
                            warn!(error = ?err, "csv download failed");
                            toast_error("Failed to export leads");
                        } else {
                            info!(bytes = bytes.len(), "exported leads");
                        }
                    }
                    Err(err) => toast_error(err.user_message()),
                }
            });
        })
    };

    let active = state.effective_filter();
    let title = state
        .team
        .as_ref()
        .map_or_else(|| "Leads".to_string(), |team| format!("{team} Leads"));

    html! {
        <div class="page team-leads">
            <header class="page-head">
                <h2>{title}</h2>
                <input class="search" type="search" placeholder="Search leads" value={state.search.clone()} oninput={on_search} />
                <button class="ghost" onclick={on_export}>{"Export CSV"}</button>
                <Link<Route> classes={classes!("solid")} to={Route::NewLead}>{"New Lead"}</Link<Route>>
            </header>
            <div class="tabs">
                {for FilterType::ALL.iter().map(|filter| {
                    let filter = *filter;
                    let state = state.clone();
                    let class = if filter == active { "tab active" } else { "tab" };
                    html! {
                        <button class={class} onclick={Callback::from(move |_| state.dispatch(PageAction::Filter(filter)))}>
                            {filter.label()}
                        </button>
                    }
                })}
            </div>
            <div class="toolbar">
                <select onchange={on_assignee}>
                    <option value="" selected={assignee.is_none()}>{"Assign to..."}</option>
                    {for users.iter().map(|user| html! {
                        <option value={user.id.to_string()} selected={*assignee == Some(user.id)}>{user.username.clone()}</option>
                    })}
                </select>
                <button class="solid" onclick={on_assign} disabled={state.selected.is_empty() || assignee.is_none()}>
                    {format!("Assign ({})", state.selected.len())}
                </button>
            </div>
            <table class="table">
                <thead>
                    <tr>
                        <th><input type="checkbox" checked={state.all_selected()} onchange={on_toggle_all} /></th>
                        <th>{"Name"}</th>
                        <th>{"Email"}</th>
                        <th>{"Phone"}</th>
                        <th>{"Stage"}</th>
                        <th>{"Assigned To"}</th>
                        <th>{"Created"}</th>
                    </tr>
                </thead>
                <tbody>
                    {for state.leads.iter().map(|lead| lead_row(lead, &state))}
                </tbody>
            </table>
            {if state.leads.is_empty() {
                html! { <p class="muted">{"No leads found."}</p> }
            } else { html! {} }}
        </div>
    }
}

fn lead_row(lead: &Lead, state: &UseReducerHandle<LeadsPage>) -> Html {
    let id = lead.id;
    let on_toggle = {
        let state = state.clone();
        Callback::from(move |_: Event| state.dispatch(PageAction::Toggle(id)))
    };
    html! {
        <tr>
            <td><input type="checkbox" checked={state.is_selected(id)} onchange={on_toggle} /></td>
            <td><Link<Route> to={Route::LeadDetail { id }}>{lead.full_name()}</Link<Route>></td>
            <td>{lead.email.clone()}</td>
            <td>{lead.phone.clone()}</td>
            <td><span class={classes!("badge", stage_badge(lead.stage))}>{lead.stage.label()}</span></td>
            <td>{lead.assigned_to_name.clone().unwrap_or_else(|| "Unassigned".to_string())}</td>
            <td>{lead.created_at.format("%Y-%m-%d").to_string()}</td>
        </tr>
    }
}

fn download_csv(bytes: &[u8]) -> Result<(), JsValue> {
    let parts = js_sys::Array::new();
    parts.push(&js_sys::Uint8Array::from(bytes));
    let options = BlobPropertyBag::new();
    options.set_type("text/csv");
    let blob = Blob::new_with_u8_array_sequence_and_options(&parts, &options)?;
    let href = Url::create_object_url_with_blob(&blob)?;
    let anchor: HtmlAnchorElement = gloo::utils::document().create_element("a")?.dyn_into()?;
    anchor.set_href(&href);
    anchor.set_download(CSV_FILE_NAME);
    anchor.click();
    Url::revoke_object_url(&href)
}

//! Lead pipeline board page.

use crate::app::api::ApiCtx;
use crate::components::kanban::{CardModel, ColumnModel, DropRequest, Kanban};
use crate::core::board::{Board, DropOutcome};
use crate::core::store::{AppStore, app_dispatch, toast_error};
use crate::features::leads::state::{begin_move, persist_move, set_leads, settle_move};
use crate::services::leads::{self, LeadQuery};
use crm_api_models::Lead;
use tracing::warn;
use wasm_bindgen_futures::spawn_local;
use yew::prelude::*;
use yewdux::prelude::use_selector;

#[function_component(LeadBoardPage)]
pub(crate) fn lead_board_page() -> Html {
    let api_ctx = use_context::<ApiCtx>();
    let visible = use_selector(|store: &AppStore| store.leads.visible());
    let search = use_selector(|store: &AppStore| store.leads.search.clone());
    let dispatch = app_dispatch();

    {
        let api_ctx = api_ctx.clone();
        let dispatch = dispatch.clone();
        use_effect_with_deps(
            move |_| {
                if let Some(ctx) = api_ctx {
                    spawn_local(async move {
                        match leads::list(&ctx.client, &LeadQuery::default()).await {
                            Ok(rows) => dispatch.reduce_mut(|store| set_leads(&mut store.leads, rows)),
                            Err(err) => {
                                warn!(error = %err, "failed to load leads");
                                toast_error(err.user_message());
                            }
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
        let dispatch = dispatch.clone();
        Callback::from(move |e: InputEvent| {
            if let Some(input) = e.target_dyn_into::<web_sys::HtmlInputElement>() {
                let value = input.value();
                dispatch.reduce_mut(|store| store.leads.search = value);
            }
        })
    };

    let on_drop = {
        let dispatch = dispatch.clone();
        Callback::from(move |request: DropRequest| {
            let mut leads = dispatch.get().leads.clone();
            let outcome = begin_move(&mut leads, request.card_id, &request.target, request.anchor);
            let pending = match outcome {
                Ok(DropOutcome::Reordered) => {
                    dispatch.reduce_mut(|store| store.leads = leads);
                    return;
                }
                Ok(DropOutcome::Moved(pending)) => pending,
                Err(err) => {
                    toast_error(err.to_string());
                    return;
                }
            };
            dispatch.reduce_mut(|store| store.leads = leads);

            let client = api_ctx.client.clone();
            let dispatch = dispatch.clone();
            spawn_local(async move {
                let result = persist_move(&client, &pending).await;
                let mut message = None;
                dispatch.reduce_mut(|store| {
                    message = settle_move(&mut store.leads, &pending, &result);
                });
                if let Some(message) = message {
                    toast_error(message);
                }
            });
        })
    };

    html! {
        <div class="page lead-board">
            <header class="page-head">
                <h2>{"Pipeline Board"}</h2>
                <input
                    class="search"
                    type="search"
                    placeholder="Search by name or stage"
                    value={(*search).clone()}
                    oninput={on_search}
                />
            </header>
            <Kanban columns={columns(&visible)} on_drop={on_drop} />
        </div>
    }
}

fn columns(board: &Board<Lead>) -> Vec<ColumnModel> {
    board
        .columns()
        .iter()
        .map(|column| ColumnModel {
            key: column.stage.as_str(),
            title: column.stage.label(),
            cards: column.cards.iter().map(card).collect(),
        })
        .collect()
}

fn card(lead: &Lead) -> CardModel {
    CardModel {
        id: lead.id,
        title: lead.full_name(),
        subtitle: lead.company_name.clone().or_else(|| Some(lead.email.clone())),
        footer: lead.assigned_to_name.clone(),
    }
}

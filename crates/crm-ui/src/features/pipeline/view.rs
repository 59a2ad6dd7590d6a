use crate::app::api::ApiCtx;
use crate::components::kanban::{CardModel, ColumnModel, DropRequest, Kanban};
use crate::core::board::DropOutcome;
use crate::core::store::{AppStore, app_dispatch, toast_error, toast_success};
use crate::features::pipeline::state::{
    LOAD_FAILED_MESSAGE, SettleToast, begin_move, persist_move, set_pipelines, settle_move,
};
use crate::services::pipeline;
use crm_api_models::TechPipeline;
use tracing::warn;
use wasm_bindgen_futures::spawn_local;
use yew::prelude::*;
use yewdux::prelude::use_selector;

#[function_component(TechPipelinePage)]
pub(crate) fn tech_pipeline_page() -> Html {
    let api_ctx = use_context::<ApiCtx>();
    let columns = use_selector(|store: &AppStore| {
        store
            .pipeline
            .board
            .columns()
            .iter()
            .map(|column| ColumnModel {
                key: column.stage.as_str(),
                title: column.stage.label(),
                cards: column.cards.iter().map(card).collect(),
            })
            .collect::<Vec<_>>()
    });
    let dispatch = app_dispatch();

    {
        let api_ctx = api_ctx.clone();
        let dispatch = dispatch.clone();
        use_effect_with_deps(
            move |_| {
                if let Some(ctx) = api_ctx {
                    spawn_local(async move {
                        match pipeline::list(&ctx.client).await {
                            Ok(items) => dispatch.reduce_mut(|store| set_pipelines(&mut store.pipeline, items)),
                            Err(err) => {
                                warn!(error = %err, "failed to load tech pipelines");
                                toast_error(LOAD_FAILED_MESSAGE);
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

    let on_drop = {
        let dispatch = dispatch.clone();
        Callback::from(move |request: DropRequest| {
            let mut board = dispatch.get().pipeline.clone();
            let pending = match begin_move(&mut board, request.card_id, &request.target, request.anchor) {
                Ok(DropOutcome::Reordered) => {
                    dispatch.reduce_mut(|store| store.pipeline = board);
                    return;
                }
                Ok(DropOutcome::Moved(pending)) => pending,
                Err(err) => {
                    toast_error(err.to_string());
                    return;
                }
            };
            dispatch.reduce_mut(|store| store.pipeline = board);

            let client = api_ctx.client.clone();
            let dispatch = dispatch.clone();
            spawn_local(async move {
                let result = persist_move(&client, &pending).await;
                let mut toast = None;
                dispatch.reduce_mut(|store| {
                    toast = Some(settle_move(&mut store.pipeline, &pending, &result));
                });
                match toast {
                    Some(SettleToast::Success(message)) => toast_success(message),
                    Some(SettleToast::Error(message)) => toast_error(message),
                    None => {}
                }
            });
        })
    };

    html! {
        <div class="page tech-pipeline">
            <header class="page-head">
                <h2>{"Tech Pipeline"}</h2>
            </header>
            <Kanban columns={(*columns).clone()} on_drop={on_drop} />
        </div>
    }
}

fn card(item: &TechPipeline) -> CardModel {
    CardModel {
        id: item.id,
        title: item
            .lead_name
            .clone()
            .unwrap_or_else(|| format!("Lead #{}", item.lead)),
        subtitle: item.notes.clone().filter(|notes| !notes.is_empty()),
        footer: Some(item.updated_at.format("%Y-%m-%d").to_string()),
    }
}

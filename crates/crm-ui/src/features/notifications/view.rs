//! Notification inbox page with per-item and bulk mark-read.

use crate::app::api::ApiCtx;
use crate::core::store::toast_error;
use crate::features::notifications::state::{NotificationListState, load, mark_all_read, mark_read};
use crm_api_models::Notification;
use tracing::{debug, warn};
use wasm_bindgen_futures::spawn_local;
use yew::prelude::*;

#[function_component(NotificationsPage)]
pub(crate) fn notifications_page() -> Html {
    let api_ctx = use_context::<ApiCtx>();
    let state = use_state(NotificationListState::default);

    {
        let api_ctx = api_ctx.clone();
        let state = state.clone();
        use_effect_with_deps(
            move |_| {
                if let Some(ctx) = api_ctx {
                    spawn_local(async move {
                        match load(&ctx.client).await {
                            Ok(loaded) => state.set(loaded),
                            Err(err) => {
                                warn!(error = %err, "failed to load notifications");
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

    let on_open = {
        let client = api_ctx.client.clone();
        let state = state.clone();
        Callback::from(move |id: i64| {
            let client = client.clone();
            let state = state.clone();
            let mut next = (*state).clone();
            spawn_local(async move {
                match mark_read(&client, &mut next, id).await {
                    Ok(outcome) => {
                        debug!(notification = id, ?outcome, "mark read");
                        state.set(next);
                    }
                    Err(err) => toast_error(err.user_message()),
                }
            });
        })
    };
    let on_mark_all = {
        let client = api_ctx.client.clone();
        let state = state.clone();
        Callback::from(move |_| {
            let client = client.clone();
            let state = state.clone();
            let mut next = (*state).clone();
            spawn_local(async move {
                match mark_all_read(&client, &mut next).await {
                    Ok(()) => state.set(next),
                    Err(err) => toast_error(err.user_message()),
                }
            });
        })
    };

    html! {
        <div class="page notifications">
            <header class="page-head">
                <h2>{"Notifications"}</h2>
                <span class="pill subtle">{format!("{} unread", state.unread())}</span>
                <button class="ghost" onclick={on_mark_all} disabled={state.unread() == 0}>{"Mark all read"}</button>
            </header>
            {if state.items.is_empty() {
                html! { <p class="muted">{"You're all caught up."}</p> }
            } else {
                html! {
                    <ul class="list">
                        {for state.items.iter().map(|item| notification_row(item, &on_open))}
                    </ul>
                }
            }}
        </div>
    }
}

fn notification_row(item: &Notification, on_open: &Callback<i64>) -> Html {
    let id = item.id;
    let on_click = {
        let on_open = on_open.clone();
        Callback::from(move |_| on_open.emit(id))
    };
    let context = item
        .task_subject
        .clone()
        .or_else(|| item.lead_name.clone())
        .unwrap_or_default();
    html! {
        <li class={classes!("list-row", (!item.is_read).then_some("unread"))} onclick={on_click}>
            <div class="stack">
                <strong>{item.message.clone()}</strong>
                <small class="muted">{context}</small>
            </div>
            <div class="stack end">
                <small>{item.created_at.format("%Y-%m-%d %H:%M").to_string()}</small>
                {item.sender_name.clone().map(|sender| html! { <small class="muted">{sender}</small> }).unwrap_or_default()}
            </div>
        </li>
    }
}

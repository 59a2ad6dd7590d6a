//! Reminder page and the dashboard reminder widget.

use crate::app::api::ApiCtx;
use crate::core::store::{toast_error, toast_success};
use crate::features::reminders::state::{
    COMPLETE_FAILED_MESSAGE, COMPLETED_MESSAGE, ReminderListState, ReminderTab, ReminderWidgetState,
    complete_from_widget, load, load_widget, mark_read, refresh_stats,
};
use crm_api_models::{Reminder, ReminderStats};
use tracing::warn;
use wasm_bindgen_futures::spawn_local;
use yew::prelude::*;

#[function_component(RemindersPage)]
pub(crate) fn reminders_page() -> Html {
    let api_ctx = use_context::<ApiCtx>();
    let state = use_state(ReminderListState::default);
    let tab = state.tab;

    {
        let api_ctx = api_ctx.clone();
        let state = state.clone();
        use_effect_with_deps(
            move |tab: &ReminderTab| {
                let tab = *tab;
                if let Some(ctx) = api_ctx {
                    spawn_local(async move {
                        let stats = refresh_stats(&ctx.client).await;
                        match load(&ctx.client, tab).await {
                            Ok(items) => state.set(ReminderListState { tab, items, stats }),
                            Err(err) => {
                                warn!(error = %err, "failed to load reminders");
                                toast_error(err.user_message());
                            }
                        }
                    });
                }
                || ()
            },
            tab,
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
                    Ok(_) => state.set(next),
                    Err(err) => toast_error(err.user_message()),
                }
            });
        })
    };

    html! {
        <div class="page reminders">
            <header class="page-head">
                <h2>{"Reminders"}</h2>
            </header>
            {state.stats.as_ref().map(stats_strip).unwrap_or_default()}
            <div class="tabs">
                {for [ReminderTab::All, ReminderTab::Today].into_iter().map(|candidate| {
                    let state = state.clone();
                    let class = if candidate == tab { "tab active" } else { "tab" };
                    html! {
                        <button class={class} onclick={Callback::from(move |_| {
                            state.set(ReminderListState { tab: candidate, ..(*state).clone() });
                        })}>
                            {candidate.label()}
                        </button>
                    }
                })}
            </div>
            {if state.items.is_empty() {
                html! { <p class="muted">{"No pending reminders."}</p> }
            } else {
                html! {
                    <ul class="list">
                        {for state.items.iter().map(|item| reminder_row(item, &on_open))}
                    </ul>
                }
            }}
        </div>
    }
}

/// Compact counters and today's reminders, with a complete button per row.
#[function_component(ReminderWidget)]
pub(crate) fn reminder_widget() -> Html {
    let api_ctx = use_context::<ApiCtx>();
    let state = use_state(ReminderWidgetState::default);

    {
        let api_ctx = api_ctx.clone();
        let state = state.clone();
        use_effect_with_deps(
            move |_| {
                if let Some(ctx) = api_ctx {
                    spawn_local(async move {
                        match load_widget(&ctx.client).await {
                            Ok(loaded) => state.set(loaded),
                            Err(err) => warn!(error = %err, "failed to load reminder widget"),
                        }
                    });
                }
                || ()
            },
            (),
        );
    }

    let Some(api_ctx) = api_ctx else {
        return html! {};
    };

    let on_complete = {
        let client = api_ctx.client.clone();
        let state = state.clone();
        Callback::from(move |id: i64| {
            let client = client.clone();
            let state = state.clone();
            spawn_local(async move {
                match complete_from_widget(&client, id).await {
                    Ok(loaded) => {
                        toast_success(COMPLETED_MESSAGE);
                        state.set(loaded);
                    }
                    Err(err) => {
                        warn!(error = %err, reminder = id, "failed to complete reminder");
                        toast_error(COMPLETE_FAILED_MESSAGE);
                    }
                }
            });
        })
    };

    html! {
        <section class="card reminder-widget">
            <header>
                <h3>{"Today's Reminders"}</h3>
            </header>
            {state.stats.as_ref().map(stats_strip).unwrap_or_default()}
            {if state.today.is_empty() {
                html! { <p class="muted">{"Nothing due today."}</p> }
            } else {
                html! {
                    <ul class="list">
                        {for state.today.iter().map(|item| {
                            let id = item.id;
                            let on_complete = on_complete.clone();
                            html! {
                                <li class="list-row">
                                    <span>{item.message.clone()}</span>
                                    <button class="ghost" onclick={Callback::from(move |_| on_complete.emit(id))}>{"Complete"}</button>
                                </li>
                            }
                        })}
                    </ul>
                }
            }}
        </section>
    }
}

fn stats_strip(stats: &ReminderStats) -> Html {
    html! {
        <div class="stats-strip">
            <span class="pill">{format!("Pending {}", stats.total_pending)}</span>
            <span class="pill">{format!("Unread {}", stats.unread_count)}</span>
            <span class="pill badge-danger">{format!("Overdue {}", stats.overdue)}</span>
            <span class="pill">{format!("Today {}", stats.today)}</span>
            <span class="pill">{format!("Upcoming {}", stats.upcoming)}</span>
        </div>
    }
}

fn reminder_row(item: &Reminder, on_open: &Callback<i64>) -> Html {
    let id = item.id;
    let on_click = {
        let on_open = on_open.clone();
        Callback::from(move |_| on_open.emit(id))
    };
    html! {
        <li class={classes!("list-row", (!item.is_read).then_some("unread"))} onclick={on_click}>
            <div class="stack">
                <strong>{item.message.clone()}</strong>
                <small class="muted">{item.lead_name.clone().unwrap_or_default()}</small>
            </div>
            <small>{item.due_date.format("%Y-%m-%d %H:%M").to_string()}</small>
        </li>
    }
}

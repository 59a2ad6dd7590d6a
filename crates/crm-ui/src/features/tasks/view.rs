use crate::app::api::ApiCtx;
use crate::core::store::{toast_error, toast_success};
use crate::features::tasks::logic::{TaskFilter, visible_tasks};
use crate::services::tasks;
use chrono::Utc;
use crm_api_models::Task;
use tracing::warn;
use wasm_bindgen_futures::spawn_local;
use yew::prelude::*;

#[function_component(TasksPage)]
pub(crate) fn tasks_page() -> Html {
    let api_ctx = use_context::<ApiCtx>();
    let items = use_state(Vec::<Task>::new);
    let search = use_state(String::new);
    let filter = use_state(TaskFilter::default);
    let loading = use_state(|| true);

    {
        let api_ctx = api_ctx.clone();
        let items = items.clone();
        let loading = loading.clone();
        use_effect_with_deps(
            move |_| {
                if let Some(ctx) = api_ctx {
                    spawn_local(async move {
                        match tasks::list(&ctx.client, &[]).await {
                            Ok(list) => items.set(list),
                            Err(err) => {
                                warn!(error = %err, "failed to load tasks");
                                toast_error(err.user_message());
                            }
                        }
                        loading.set(false);
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
        let search = search.clone();
        Callback::from(move |e: InputEvent| {
            if let Some(input) = e.target_dyn_into::<web_sys::HtmlInputElement>() {
                search.set(input.value());
            }
        })
    };

    let on_remind = {
        let client = api_ctx.client.clone();
        Callback::from(move |task_id: i64| {
            let client = client.clone();
            spawn_local(async move {
                match tasks::send_reminder(&client, task_id).await {
                    Ok(reply) => toast_success(reply.message.unwrap_or_else(|| "Reminder sent".to_string())),
                    Err(err) => toast_error(err.user_message()),
                }
            });
        })
    };

    let rows = visible_tasks(&items, &search, *filter, Utc::now());

    html! {
        <div class="page tasks">
            <header class="page-head">
                <h2>{"Tasks"}</h2>
                <input class="search" type="search" placeholder="Search tasks" value={(*search).clone()} oninput={on_search} />
            </header>
            <div class="tabs">
                {for TaskFilter::ALL.iter().map(|tab| {
                    let tab = *tab;
                    let filter_handle = filter.clone();
                    let class = if tab == *filter { "tab active" } else { "tab" };
                    html! {
                        <button class={class} onclick={Callback::from(move |_| filter_handle.set(tab))}>
                            {tab.label()}
                        </button>
                    }
                })}
            </div>
            {if *loading {
                html! { <p class="muted">{"Loading tasks..."}</p> }
            } else if rows.is_empty() {
                html! { <p class="muted">{"No tasks match the current filters."}</p> }
            } else {
                html! {
                    <table class="table">
                        <thead>
                            <tr>
                                <th>{"Subject"}</th>
                                <th>{"Owner"}</th>
                                <th>{"Deadline"}</th>
                                <th>{"Priority"}</th>
                                <th>{"Status"}</th>
                                <th></th>
                            </tr>
                        </thead>
                        <tbody>
                            {for rows.iter().map(|task| task_row(task, &on_remind))}
                        </tbody>
                    </table>
                }
            }}
        </div>
    }
}

fn task_row(task: &Task, on_remind: &Callback<i64>) -> Html {
    let remind = task.id.map(|id| {
        let on_remind = on_remind.clone();
        html! {
            <button class="ghost" onclick={Callback::from(move |_| on_remind.emit(id))}>{"Remind"}</button>
        }
    });
    html! {
        <tr>
            <td>{task.subject.clone()}</td>
            <td>{task.owner_name.clone().unwrap_or_default()}</td>
            <td>{task.deadline.map(|deadline| deadline.format("%Y-%m-%d %H:%M").to_string()).unwrap_or_default()}</td>
            <td>{format!("{:?}", task.priority)}</td>
            <td>{task.status.label()}</td>
            <td>{remind.unwrap_or_default()}</td>
        </tr>
    }
}

//! Lead detail page.
//!
//! # Design
//! - Each action mutates a snapshot of the page state and publishes it only on success.
//! - Destructive actions ask for confirmation first.

use crate::app::Route;
use crate::app::api::ApiCtx;
use crate::core::store::{AppStore, toast_error, toast_success};
use crate::features::lead_detail::state::{
    self, ASSIGN_FAILED_MESSAGE, ASSIGNED_MESSAGE, DELETE_FAILED_MESSAGE,
    FINANCIALS_FAILED_MESSAGE, FINANCIALS_UPDATED_MESSAGE, GENERATOR_FAILED_MESSAGE,
    GENERATOR_UPDATED_MESSAGE, LeadDetail, NOTE_FAILED_MESSAGE, STAGE_FAILED_MESSAGE,
    TASK_CREATE_FAILED_MESSAGE, TASK_CREATED_MESSAGE, TASK_STATUS_FAILED_MESSAGE,
    UPLOAD_FAILED_MESSAGE, UPLOADED_MESSAGE, can_edit, document_url, initials, parse_amount,
    parse_deadline, stage_changed_message, task_status_message,
};
use crate::features::team_leads::state::stage_badge;
use crate::services::error::ApiError;
use crate::services::leads::{self, UploadFile};
use crm_api_models::{Amount, Lead, LeadFinancialsPatch, LeadStage, UserSummary};
use tracing::warn;
use wasm_bindgen_futures::spawn_local;
use web_sys::{HtmlInputElement, HtmlSelectElement, HtmlTextAreaElement};
use yew::prelude::*;
use yew_router::prelude::Link;
use yewdux::prelude::use_selector;

#[derive(Properties, PartialEq)]
pub(crate) struct LeadDetailProps {
    pub id: i64,
}

fn publish(
    detail: &UseStateHandle<LeadDetail>,
    snapshot: LeadDetail,
    outcome: Result<bool, ApiError>,
    success: Option<&str>,
    failure: &str,
) -> bool {
    match outcome {
        Ok(true) => {
            detail.set(snapshot);
            if let Some(message) = success {
                toast_success(message);
            }
            true
        }
        Ok(false) => false,
        Err(err) => {
            warn!(error = %err, "lead update failed");
            toast_error(failure);
            false
        }
    }
}

fn input_value(e: &InputEvent) -> Option<String> {
    e.target_dyn_into::<HtmlInputElement>().map(|input| input.value())
}

fn amount(value: Option<Amount>) -> String {
    format!("{:.2}", value.unwrap_or_default().0)
}

#[function_component(LeadDetailPage)]
pub(crate) fn lead_detail_page(props: &LeadDetailProps) -> Html {
    let api_ctx = use_context::<ApiCtx>();
    let detail = use_state(LeadDetail::default);
    let users = use_state(Vec::<UserSummary>::new);
    let failed = use_state(|| false);
    let target_stage = use_state(|| None as Option<LeadStage>);
    let stage_note = use_state(String::new);
    let assignee = use_state(|| None as Option<i64>);
    let project_amount = use_state(String::new);
    let advance_amount = use_state(String::new);
    let note = use_state(String::new);
    let task_subject = use_state(String::new);
    let task_deadline = use_state(String::new);
    let editor = use_selector(|store: &AppStore| {
        can_edit(store.auth.session.as_ref().and_then(|session| session.user.as_ref()))
    });

    {
        let api_ctx = api_ctx.clone();
        let detail = detail.clone();
        let failed = failed.clone();
        use_effect_with_deps(
            move |id: &i64| {
                let id = *id;
                if let Some(ctx) = api_ctx {
                    spawn_local(async move {
                        match state::load(&ctx.client, id).await {
                            Ok(loaded) => {
                                failed.set(false);
                                detail.set(loaded);
                            }
                            Err(err) => {
                                warn!(error = %err, lead = id, "failed to load lead");
                                failed.set(true);
                            }
                        }
                    });
                }
                || ()
            },
            props.id,
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
    if *failed {
        return html! {
            <div class="panel">
                <p class="text-sm text-error">{"Lead could not be loaded."}</p>
                <Link<Route> to={Route::TeamLeads}>{"Back to leads"}</Link<Route>>
            </div>
        };
    }
    let Some(lead) = detail.lead.clone() else {
        return html! { <p class="muted">{"Loading lead..."}</p> };
    };
    let client = api_ctx.client.clone();

    let on_stage_select = {
        let target_stage = target_stage.clone();
        Callback::from(move |e: Event| {
            if let Some(select) = e.target_dyn_into::<HtmlSelectElement>() {
                target_stage.set(LeadStage::parse(&select.value()));
            }
        })
    };
    let on_stage_note = {
        let stage_note = stage_note.clone();
        Callback::from(move |e: InputEvent| {
            if let Some(value) = input_value(&e) {
                stage_note.set(value);
            }
        })
    };
    let on_move = {
        let client = client.clone();
        let detail = detail.clone();
        let target_stage = target_stage.clone();
        let stage_note = stage_note.clone();
        Callback::from(move |_| {
            let Some(stage) = *target_stage else {
                return;
            };
            let prompt = format!("Are you sure you want to move this lead to \"{}\"?", stage.as_str());
            if !gloo::dialogs::confirm(&prompt) {
                return;
            }
            let client = client.clone();
            let detail = detail.clone();
            let stage_note = stage_note.clone();
            let target_stage = target_stage.clone();
            spawn_local(async move {
                let mut snapshot = (*detail).clone();
                let outcome = state::change_stage(&client, &mut snapshot, stage, &stage_note).await;
                let message = stage_changed_message(stage);
                if publish(&detail, snapshot, outcome, Some(message.as_str()), STAGE_FAILED_MESSAGE) {
                    stage_note.set(String::new());
                    target_stage.set(None);
                }
            });
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
        let client = client.clone();
        let detail = detail.clone();
        let assignee = assignee.clone();
        Callback::from(move |_| {
            let Some(user_id) = *assignee else {
                return;
            };
            let client = client.clone();
            let detail = detail.clone();
            spawn_local(async move {
                let mut snapshot = (*detail).clone();
                let outcome = state::assign(&client, &mut snapshot, user_id).await;
                publish(&detail, snapshot, outcome, Some(ASSIGNED_MESSAGE), ASSIGN_FAILED_MESSAGE);
            });
        })
    };

    let on_project = {
        let project_amount = project_amount.clone();
        Callback::from(move |e: InputEvent| {
            if let Some(value) = input_value(&e) {
                project_amount.set(value);
            }
        })
    };
    let on_advance = {
        let advance_amount = advance_amount.clone();
        Callback::from(move |e: InputEvent| {
            if let Some(value) = input_value(&e) {
                advance_amount.set(value);
            }
        })
    };
    let on_financials = {
        let client = client.clone();
        let detail = detail.clone();
        let project_amount = project_amount.clone();
        let advance_amount = advance_amount.clone();
        Callback::from(move |_| {
            let (Some(project), Some(advance)) =
                (parse_amount(&project_amount), parse_amount(&advance_amount))
            else {
                toast_error(FINANCIALS_FAILED_MESSAGE);
                return;
            };
            let patch = LeadFinancialsPatch {
                project_amount: project,
                advance_amount: advance,
            };
            let client = client.clone();
            let detail = detail.clone();
            spawn_local(async move {
                let mut snapshot = (*detail).clone();
                let outcome = state::update_financials(&client, &mut snapshot, patch).await;
                publish(&detail, snapshot, outcome, Some(FINANCIALS_UPDATED_MESSAGE), FINANCIALS_FAILED_MESSAGE);
            });
        })
    };

    let on_generator = {
        let client = client.clone();
        let detail = detail.clone();
        Callback::from(move |e: Event| {
            let Some(select) = e.target_dyn_into::<HtmlSelectElement>() else {
                return;
            };
            let user_id = select.value().parse::<i64>().ok();
            let client = client.clone();
            let detail = detail.clone();
            spawn_local(async move {
                let mut snapshot = (*detail).clone();
                let outcome = state::set_lead_generator(&client, &mut snapshot, user_id).await;
                publish(&detail, snapshot, outcome, Some(GENERATOR_UPDATED_MESSAGE), GENERATOR_FAILED_MESSAGE);
            });
        })
    };

    let on_file = {
        let client = client.clone();
        let detail = detail.clone();
        Callback::from(move |e: Event| {
            let Some(input) = e.target_dyn_into::<HtmlInputElement>() else {
                return;
            };
            let Some(file) = input.files().and_then(|files| files.get(0)) else {
                return;
            };
            input.set_value("");
            let file = gloo::file::File::from(file);
            let client = client.clone();
            let detail = detail.clone();
            spawn_local(async move {
                let bytes = match gloo::file::futures::read_as_bytes(&file).await {
                    Ok(bytes) => bytes,
                    Err(err) => {
                        warn!(error = %err, "failed to read selected file");
                        toast_error(UPLOAD_FAILED_MESSAGE);
                        return;
                    }
                };
                let mime = file.raw_mime_type();
                let upload = UploadFile {
                    file_name: file.name(),
                    content_type: Some(mime).filter(|mime| !mime.is_empty()),
                    bytes,
                };
                let mut snapshot = (*detail).clone();
                let outcome = state::upload(&client, &mut snapshot, upload).await;
                publish(&detail, snapshot, outcome, Some(UPLOADED_MESSAGE), UPLOAD_FAILED_MESSAGE);
            });
        })
    };
    let on_delete_document = {
        let client = client.clone();
        let detail = detail.clone();
        Callback::from(move |document_id: i64| {
            if !gloo::dialogs::confirm("Are you sure you want to delete this document?") {
                return;
            }
            let client = client.clone();
            let detail = detail.clone();
            spawn_local(async move {
                let mut snapshot = (*detail).clone();
                let outcome = state::delete_document(&client, &mut snapshot, document_id).await;
                publish(&detail, snapshot, outcome, None, DELETE_FAILED_MESSAGE);
            });
        })
    };

    let on_note_input = {
        let note = note.clone();
        Callback::from(move |e: InputEvent| {
            if let Some(area) = e.target_dyn_into::<HtmlTextAreaElement>() {
                note.set(area.value());
            }
        })
    };
    let on_save_note = {
        let client = client.clone();
        let detail = detail.clone();
        let note = note.clone();
        Callback::from(move |_| {
            let client = client.clone();
            let detail = detail.clone();
            let note = note.clone();
            spawn_local(async move {
                let mut snapshot = (*detail).clone();
                let outcome = state::add_note(&client, &mut snapshot, &note).await;
                if publish(&detail, snapshot, outcome, None, NOTE_FAILED_MESSAGE) {
                    note.set(String::new());
                }
            });
        })
    };

    let on_task_subject = {
        let task_subject = task_subject.clone();
        Callback::from(move |e: InputEvent| {
            if let Some(value) = input_value(&e) {
                task_subject.set(value);
            }
        })
    };
    let on_task_deadline = {
        let task_deadline = task_deadline.clone();
        Callback::from(move |e: InputEvent| {
            if let Some(value) = input_value(&e) {
                task_deadline.set(value);
            }
        })
    };
    let on_create_task = {
        let client = client.clone();
        let detail = detail.clone();
        let task_subject = task_subject.clone();
        let task_deadline = task_deadline.clone();
        Callback::from(move |_| {
            let client = client.clone();
            let detail = detail.clone();
            let task_subject = task_subject.clone();
            let task_deadline = task_deadline.clone();
            spawn_local(async move {
                let mut snapshot = (*detail).clone();
                let deadline = parse_deadline(&task_deadline);
                let outcome = state::create_task(&client, &mut snapshot, &task_subject, deadline).await;
                if publish(&detail, snapshot, outcome, Some(TASK_CREATED_MESSAGE), TASK_CREATE_FAILED_MESSAGE) {
                    task_subject.set(String::new());
                    task_deadline.set(String::new());
                }
            });
        })
    };
    let on_toggle_task = {
        let client = client.clone();
        let detail = detail.clone();
        Callback::from(move |task_id: i64| {
            let client = client.clone();
            let detail = detail.clone();
            spawn_local(async move {
                let mut snapshot = (*detail).clone();
                match state::toggle_task(&client, &mut snapshot, task_id).await {
                    Ok(Some(status)) => {
                        detail.set(snapshot);
                        toast_success(task_status_message(status));
                    }
                    Ok(None) => {}
                    Err(err) => {
                        warn!(error = %err, task = task_id, "task status update failed");
                        toast_error(TASK_STATUS_FAILED_MESSAGE);
                    }
                }
            });
        })
    };

    let current = detail.stage_index().unwrap_or_default();

    html! {
        <div class="page lead-detail">
            <Link<Route> classes={classes!("back-link")} to={Route::TeamLeads}>{"← Back to leads"}</Link<Route>>
            {header(&lead)}

            <section class="panel stages">
                <ol class="stage-track">
                    {for LeadStage::ALL.iter().enumerate().map(|(index, stage)| {
                        let class = match index.cmp(&current) {
                            std::cmp::Ordering::Less => "done",
                            std::cmp::Ordering::Equal => "current",
                            std::cmp::Ordering::Greater => "pending",
                        };
                        html! { <li class={class}>{stage.label()}</li> }
                    })}
                </ol>
                <div class="toolbar">
                    <select onchange={on_stage_select}>
                        <option value="" selected={target_stage.is_none()}>{"Move to..."}</option>
                        {for LeadStage::ALL.iter().filter(|stage| **stage != lead.stage).map(|stage| html! {
                            <option value={stage.as_str()} selected={*target_stage == Some(*stage)}>{stage.label()}</option>
                        })}
                    </select>
                    <input type="text" placeholder="Note for the audit log" value={(*stage_note).clone()} oninput={on_stage_note} />
                    <button class="solid" onclick={on_move} disabled={target_stage.is_none()}>{"Move"}</button>
                </div>
            </section>

            <section class="panel">
                <h3>{"Assignment"}</h3>
                <p>{lead.assigned_to_name.clone().unwrap_or_else(|| "Unassigned".to_string())}</p>
                <div class="toolbar">
                    <select onchange={on_assignee}>
                        <option value="" selected={assignee.is_none()}>{"Assign to..."}</option>
                        {for users.iter().map(|user| html! {
                            <option value={user.id.to_string()} selected={*assignee == Some(user.id)}>{user.username.clone()}</option>
                        })}
                    </select>
                    <button class="ghost" onclick={on_assign} disabled={assignee.is_none()}>{"Assign"}</button>
                </div>
                <label>
                    {"Lead generator"}
                    <select onchange={on_generator} disabled={!*editor}>
                        <option value="" selected={lead.lead_generator.is_none()}>{"None"}</option>
                        {for users.iter().map(|user| html! {
                            <option value={user.id.to_string()} selected={lead.lead_generator == Some(user.id)}>
                                {user.username.clone()}
                            </option>
                        })}
                    </select>
                </label>
            </section>

            <section class="panel financials">
                <h3>{"Financials"}</h3>
                <dl>
                    <dt>{"Project"}</dt><dd>{amount(lead.project_amount)}</dd>
                    <dt>{"Advance"}</dt><dd>{amount(lead.advance_amount)}</dd>
                    <dt>{"Remaining"}</dt><dd>{amount(lead.remaining_amount)}</dd>
                </dl>
                {if *editor {
                    html! {
                        <div class="toolbar">
                            <input type="number" min="0" step="0.01" placeholder={amount(lead.project_amount)} value={(*project_amount).clone()} oninput={on_project} />
                            <input type="number" min="0" step="0.01" placeholder={amount(lead.advance_amount)} value={(*advance_amount).clone()} oninput={on_advance} />
                            <button class="ghost" onclick={on_financials}>{"Save"}</button>
                        </div>
                    }
                } else { html! {} }}
            </section>

            {if let Some(pipeline) = &detail.pipeline {
                html! {
                    <section class="panel">
                        <h3>{"Tech pipeline"}</h3>
                        <span class="badge">{pipeline.stage.label()}</span>
                        <p>{pipeline.notes.clone().unwrap_or_default()}</p>
                    </section>
                }
            } else { html! {} }}

            <section class="panel documents">
                <h3>{"Documents"}</h3>
                <ul>
                    {for lead.documents.iter().map(|document| {
                        let id = document.id;
                        let on_delete = on_delete_document.clone();
                        html! {
                            <li>
                                <a href={document_url(&document.file_path)} target="_blank">{document.name.clone()}</a>
                                <button class="ghost" onclick={Callback::from(move |_| on_delete.emit(id))}>{"Delete"}</button>
                            </li>
                        }
                    })}
                </ul>
                <input type="file" onchange={on_file} />
            </section>

            <section class="panel notes">
                <h3>{"Notes"}</h3>
                <textarea value={(*note).clone()} oninput={on_note_input} placeholder="Add a note" />
                <button class="solid" onclick={on_save_note}>{"Save note"}</button>
                <ul>
                    {for detail.notes.iter().map(|note| html! {
                        <li>
                            <p>{note.content.clone()}</p>
                            <span class="muted">
                                {note.author_name.clone().unwrap_or_default()}
                                {" "}
                                {note.created_at.map(|at| at.format("%Y-%m-%d %H:%M").to_string()).unwrap_or_default()}
                            </span>
                        </li>
                    })}
                </ul>
            </section>

            <section class="panel tasks">
                <h3>{"Tasks"}</h3>
                <div class="toolbar">
                    <input type="text" placeholder="New task" value={(*task_subject).clone()} oninput={on_task_subject} />
                    <input type="datetime-local" value={(*task_deadline).clone()} oninput={on_task_deadline} />
                    <button class="ghost" onclick={on_create_task}>{"Add task"}</button>
                </div>
                <ul>
                    {for detail.tasks.iter().filter_map(|task| task.id.map(|id| (id, task))).map(|(id, task)| {
                        let on_toggle = on_toggle_task.clone();
                        html! {
                            <li>
                                <input
                                    type="checkbox"
                                    checked={task.status == crm_api_models::TaskStatus::Completed}
                                    onchange={Callback::from(move |_: Event| on_toggle.emit(id))}
                                />
                                <span>{task.subject.clone()}</span>
                                <span class="muted">{task.status.label()}</span>
                            </li>
                        }
                    })}
                </ul>
            </section>

            <section class="panel history">
                <h3>{"History"}</h3>
                <ul>
                    {for lead.audit_logs.iter().map(|entry| html! {
                        <li>
                            <strong>{entry.action.clone()}</strong>
                            {" "}
                            {format!(
                                "{} → {}",
                                entry.from_stage.as_deref().unwrap_or("-"),
                                entry.to_stage.as_deref().unwrap_or("-")
                            )}
                            <span class="muted">
                                {" "}
                                {entry.actor_name.clone().unwrap_or_default()}
                                {" "}
                                {entry.timestamp.format("%Y-%m-%d %H:%M").to_string()}
                            </span>
                            {entry.notes.clone().map(|notes| html! { <p>{notes}</p> }).unwrap_or_default()}
                        </li>
                    })}
                </ul>
            </section>
        </div>
    }
}

fn header(lead: &Lead) -> Html {
    html! {
        <header class="page-head">
            <div class="avatar">{initials(&lead.first_name, &lead.last_name)}</div>
            <div>
                <h2>{lead.full_name()}</h2>
                <p class="muted">
                    {lead.company_name.clone().unwrap_or_default()}
                    {" · "}
                    {lead.email.clone()}
                    {" · "}
                    {lead.phone.clone()}
                </p>
            </div>
            <span class={classes!("badge", stage_badge(lead.stage))}>{lead.stage.label()}</span>
        </header>
    }
}

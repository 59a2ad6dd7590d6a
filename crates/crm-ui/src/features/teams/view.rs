use crate::app::Route;
use crate::app::api::ApiCtx;
use crate::core::store::toast_error;
use crate::features::teams::logic::{
    REMINDER_FAILED_MESSAGE, initials, is_overdue, load_member_tasks, load_members,
    team_display_name, team_icon,
};
use crate::services::teams;
use chrono::Utc;
use crm_api_models::{Task, TeamMember, TeamOption};
use gloo::timers::callback::Timeout;
use tracing::warn;
use wasm_bindgen_futures::spawn_local;
use yew::prelude::*;
use yew_router::prelude::Link;

const REMINDER_BADGE_MS: u32 = 3_000;

fn missing_context() -> Html {
    html! {
        <div class="panel">
            <p class="text-sm text-error">{"Missing API context."}</p>
        </div>
    }
}

#[function_component(TeamsPage)]
pub(crate) fn teams_page() -> Html {
    let api_ctx = use_context::<ApiCtx>();
    let teams_list = use_state(Vec::<TeamOption>::new);

    {
        let api_ctx = api_ctx.clone();
        let teams_list = teams_list.clone();
        use_effect_with_deps(
            move |_| {
                if let Some(ctx) = api_ctx {
                    spawn_local(async move {
                        match teams::list(&ctx.client).await {
                            Ok(list) => teams_list.set(list),
                            Err(err) => warn!(error = %err, "failed to load teams"),
                        }
                    });
                }
                || ()
            },
            (),
        );
    }

    if api_ctx.is_none() {
        return missing_context();
    }

    html! {
        <div class="page teams">
            <header class="page-head">
                <h2>{"Company Teams"}</h2>
                <p class="muted">{"Select a team to view members and manage tasks"}</p>
            </header>
            {if teams_list.is_empty() {
                html! { <p class="muted">{"Loading teams..."}</p> }
            } else {
                html! {
                    <div class="card-grid">
                        {for teams_list.iter().map(|team| html! {
                            <Link<Route> classes={classes!("card", "team-card")} to={Route::TeamMembers { team: team.value.to_lowercase() }}>
                                <span class="team-icon">{team_icon(&team.value)}</span>
                                <h3>{team.label.clone()}</h3>
                                <p class="muted">{"View members and active workloads"}</p>
                            </Link<Route>>
                        })}
                    </div>
                }
            }}
        </div>
    }
}

#[derive(Properties, PartialEq)]
pub(crate) struct TeamMembersProps {
    pub team: String,
}

#[function_component(TeamMembersPage)]
pub(crate) fn team_members_page(props: &TeamMembersProps) -> Html {
    let api_ctx = use_context::<ApiCtx>();
    let members = use_state(Vec::<TeamMember>::new);
    let loading = use_state(|| true);

    {
        let api_ctx = api_ctx.clone();
        let members = members.clone();
        let loading = loading.clone();
        use_effect_with_deps(
            move |team: &String| {
                let team = team.clone();
                if let Some(ctx) = api_ctx {
                    loading.set(true);
                    spawn_local(async move {
                        match load_members(&ctx.client, &team).await {
                            Ok(list) => members.set(list),
                            Err(err) => {
                                warn!(error = %err, team = %team, "failed to load team members");
                                members.set(Vec::new());
                            }
                        }
                        loading.set(false);
                    });
                }
                || ()
            },
            props.team.clone(),
        );
    }

    if api_ctx.is_none() {
        return missing_context();
    }
    let display = team_display_name(&props.team);

    html! {
        <div class="page team-members">
            <header class="page-head">
                <h2>{format!("{display} Team")}</h2>
                <p class="muted">{"View team members and their pending tasks"}</p>
            </header>
            {if *loading {
                html! { <p class="muted">{"Loading members..."}</p> }
            } else if members.is_empty() {
                html! {
                    <div class="empty-state">
                        <h3>{"No Team Members"}</h3>
                        <p>{format!("There are no members assigned to the {display} team yet.")}</p>
                    </div>
                }
            } else {
                html! {
                    <div class="card-grid">
                        {for members.iter().map(|member| member_card(&props.team, member))}
                    </div>
                }
            }}
        </div>
    }
}

fn member_card(team: &str, member: &TeamMember) -> Html {
    let pending = member.pending_task_count.unwrap_or_default();
    html! {
        <div class="card member-card">
            <div class="avatar">{initials(&member.username)}</div>
            <div>
                <h3>{member.username.clone()}</h3>
                <p class="muted">{member.email.clone()}</p>
            </div>
            <div class={classes!("task-badge", (pending > 0).then_some("has-tasks"))}>
                <strong>{pending}</strong>
                <span>{"Pending Tasks"}</span>
            </div>
            <Link<Route> classes={classes!("ghost")} to={Route::MemberTasks { team: team.to_string(), member_id: member.id }}>
                {"View Tasks →"}
            </Link<Route>>
        </div>
    }
}

#[derive(Properties, PartialEq)]
pub(crate) struct MemberTasksProps {
    pub team: String,
    pub member_id: i64,
}

#[function_component(MemberTasksPage)]
pub(crate) fn member_tasks_page(props: &MemberTasksProps) -> Html {
    let api_ctx = use_context::<ApiCtx>();
    let name = use_state(String::new);
    let pending = use_state(Vec::<Task>::new);
    let sending = use_state(|| None as Option<i64>);
    let sent = use_state(|| None as Option<i64>);

    {
        let api_ctx = api_ctx.clone();
        let name = name.clone();
        let pending = pending.clone();
        use_effect_with_deps(
            move |member_id: &i64| {
                let member_id = *member_id;
                if let Some(ctx) = api_ctx {
                    spawn_local(async move {
                        match load_member_tasks(&ctx.client, member_id).await {
                            Ok((member, tasks)) => {
                                name.set(member);
                                pending.set(tasks);
                            }
                            Err(err) => warn!(error = %err, member = member_id, "failed to load member tasks"),
                        }
                    });
                }
                || ()
            },
            props.member_id,
        );
    }

    let Some(api_ctx) = api_ctx else {
        return missing_context();
    };

    let on_remind = {
        let client = api_ctx.client.clone();
        let sending = sending.clone();
        let sent = sent.clone();
        Callback::from(move |task_id: i64| {
            sending.set(Some(task_id));
            sent.set(None);
            let client = client.clone();
            let sending = sending.clone();
            let sent = sent.clone();
            spawn_local(async move {
                match teams::send_reminder(&client, task_id).await {
                    Ok(_) => {
                        sending.set(None);
                        sent.set(Some(task_id));
                        Timeout::new(REMINDER_BADGE_MS, move || sent.set(None)).forget();
                    }
                    Err(err) => {
                        warn!(error = %err, task = task_id, "failed to send reminder");
                        sending.set(None);
                        toast_error(REMINDER_FAILED_MESSAGE);
                    }
                }
            });
        })
    };

    let now = Utc::now();
    let display = team_display_name(&props.team);

    html! {
        <div class="page member-tasks">
            <header class="page-head">
                <Link<Route> classes={classes!("back-link")} to={Route::TeamMembers { team: props.team.clone() }}>
                    {format!("← Back to {display} Team")}
                </Link<Route>>
                <h2>{format!("Tasks for {}", *name)}</h2>
                <p class="muted">{format!("{} pending task(s)", pending.len())}</p>
            </header>
            {if pending.is_empty() {
                html! {
                    <div class="empty-state">
                        <h3>{"No Pending Tasks"}</h3>
                        <p>{"This team member has no pending tasks at the moment."}</p>
                    </div>
                }
            } else {
                html! {
                    <div class="task-list">
                        {for pending.iter().map(|task| {
                            let id = task.id;
                            let on_remind = on_remind.clone();
                            let busy = id.is_some() && *sending == id;
                            html! {
                                <div class={classes!("card", "task-card", is_overdue(task, now).then_some("overdue"))}>
                                    <div class="task-header">
                                        <h3>{task.subject.clone()}</h3>
                                        <span class="badge">{format!("{:?}", task.priority)}</span>
                                    </div>
                                    {if task.description.is_empty() { html! {} } else { html! { <p class="muted">{task.description.clone()}</p> } }}
                                    <div class="task-meta">
                                        <span>{task.status.label()}</span>
                                        {task.deadline.map(|deadline| html! {
                                            <span>{format!("Deadline: {}", deadline.format("%Y-%m-%d %H:%M"))}</span>
                                        }).unwrap_or_default()}
                                    </div>
                                    {id.map(|id| html! {
                                        <div class="task-actions">
                                            <button class="solid" disabled={busy} onclick={Callback::from(move |_| on_remind.emit(id))}>
                                                {if busy { "Sending..." } else { "Send Reminder" }}
                                            </button>
                                            {if *sent == Some(id) { html! { <span class="text-success">{"✓ Reminder Sent!"}</span> } } else { html! {} }}
                                        </div>
                                    }).unwrap_or_default()}
                                </div>
                            }
                        })}
                    </div>
                }
            }}
        </div>
    }
}

//! Team dashboard helpers: display names, workloads and member task lists.

use crate::services::api::ApiClient;
use crate::services::error::ApiError;
use crate::services::teams;
use chrono::{DateTime, Utc};
use crm_api_models::{Task, TaskStatus, TeamMember};
use tracing::warn;

/// Toast shown when a reminder cannot be sent.
pub const REMINDER_FAILED_MESSAGE: &str = "Failed to send reminder. Please try again.";

/// `SALES` → `Sales`.
#[must_use]
pub fn team_display_name(team: &str) -> String {
    let mut chars = team.chars();
    chars.next().map_or_else(String::new, |first| {
        first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect()
    })
}

/// Card icon for a team wire value.
#[must_use]
pub fn team_icon(team: &str) -> &'static str {
    match team {
        "SALES" => "💼",
        "ADMIN" => "🛡️",
        "TECH" => "🛠️",
        "MARKETING" => "📢",
        "CONSULTANCY" => "🤝",
        "OPERATIONS" => "⚙️",
        "SUPPORT" => "🎧",
        _ => "📁",
    }
}

/// Up to two initials from the words of a username.
#[must_use]
pub fn initials(name: &str) -> String {
    name.split_whitespace()
        .filter_map(|word| word.chars().next())
        .flat_map(char::to_uppercase)
        .take(2)
        .collect()
}

/// Tasks that are not completed, in server order.
#[must_use]
pub fn pending_tasks(tasks: &[Task]) -> Vec<Task> {
    tasks
        .iter()
        .filter(|task| task.status != TaskStatus::Completed)
        .cloned()
        .collect()
}

/// Number of tasks that are not completed.
#[must_use]
pub fn pending_count(tasks: &[Task]) -> u32 {
    let count = tasks
        .iter()
        .filter(|task| task.status != TaskStatus::Completed)
        .count();
    u32::try_from(count).unwrap_or(u32::MAX)
}

/// Deadline already passed at `now`.
#[must_use]
pub fn is_overdue(task: &Task, now: DateTime<Utc>) -> bool {
    task.deadline.is_some_and(|deadline| deadline < now)
}

/// Owner name taken from the first task, or a placeholder.
#[must_use]
pub fn member_name(tasks: &[Task], member_id: i64) -> String {
    tasks
        .first()
        .and_then(|task| task.owner_name.clone())
        .unwrap_or_else(|| format!("Member #{member_id}"))
}

/// Load a team's members with their pending task counts.
///
/// The team segment is sent upper-cased. A member whose tasks cannot be
/// loaded keeps `pending_task_count = None`.
///
/// # Errors
///
/// Returns the member listing error; per-member failures are logged.
pub async fn load_members(client: &ApiClient, team: &str) -> Result<Vec<TeamMember>, ApiError> {
    let mut members = teams::members(client, &team.to_uppercase()).await?;
    for member in &mut members {
        match teams::member_tasks(client, member.id).await {
            Ok(tasks) => member.pending_task_count = Some(pending_count(&tasks)),
            Err(err) => warn!(error = %err, member = member.id, "failed to load member tasks"),
        }
    }
    Ok(members)
}

/// Tasks of one member plus the heading name derived from them.
///
/// # Errors
///
/// Propagates any [`ApiError`].
pub async fn load_member_tasks(
    client: &ApiClient,
    member_id: i64,
) -> Result<(String, Vec<Task>), ApiError> {
    let tasks = teams::member_tasks(client, member_id).await?;
    Ok((member_name(&tasks, member_id), pending_tasks(&tasks)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::http::Method;
    use crate::services::testing::{Harness, json_response};
    use chrono::TimeZone;
    use crm_api_models::TaskPriority;
    use serde_json::json;

    fn task(id: i64, status: TaskStatus, owner: Option<&str>) -> Task {
        Task {
            id: Some(id),
            subject: format!("task {id}"),
            deadline: None,
            status,
            priority: TaskPriority::Normal,
            deal: None,
            contact: None,
            lead: None,
            owner: Some(2),
            owner_name: owner.map(str::to_string),
            owner_team: None,
            description: String::new(),
            created_at: None,
        }
    }

    #[test]
    fn display_names_and_initials() {
        assert_eq!(team_display_name("sales"), "Sales");
        assert_eq!(team_display_name("TECH"), "Tech");
        assert_eq!(team_display_name(""), "");
        assert_eq!(initials("ann lee smith"), "AL");
        assert_eq!(initials("bo"), "B");
        assert_eq!(team_icon("SALES"), "💼");
        assert_eq!(team_icon("OTHER"), "📁");
    }

    #[test]
    fn completed_tasks_are_not_pending() {
        let tasks = vec![
            task(1, TaskStatus::Completed, Some("bo")),
            task(2, TaskStatus::InProgress, Some("bo")),
            task(3, TaskStatus::Deferred, Some("bo")),
        ];
        assert_eq!(pending_count(&tasks), 2);
        let ids: Vec<_> = pending_tasks(&tasks).iter().filter_map(|t| t.id).collect();
        assert_eq!(ids, vec![2, 3]);
    }

    #[test]
    fn member_name_falls_back_to_id() {
        assert_eq!(member_name(&[task(1, TaskStatus::NotStarted, Some("bo"))], 2), "bo");
        assert_eq!(member_name(&[task(1, TaskStatus::NotStarted, None)], 2), "Member #2");
        assert_eq!(member_name(&[], 7), "Member #7");
    }

    #[test]
    fn overdue_needs_a_past_deadline() {
        let now = Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).single().unwrap_or_default();
        let mut late = task(1, TaskStatus::NotStarted, None);
        late.deadline = Some(now - chrono::Duration::hours(1));
        let mut open = task(2, TaskStatus::NotStarted, None);
        open.deadline = Some(now + chrono::Duration::hours(1));
        assert!(is_overdue(&late, now));
        assert!(!is_overdue(&open, now));
        assert!(!is_overdue(&task(3, TaskStatus::NotStarted, None), now));
    }

    #[tokio::test]
    async fn members_are_loaded_with_pending_counts() -> anyhow::Result<()> {
        let harness = Harness::new(None);
        harness.transport.push(json_response(
            200,
            &json!([
                {"id": 2, "username": "bo", "email": "bo@x.io", "team": "SALES"},
                {"id": 3, "username": "cy", "email": "cy@x.io", "team": "SALES"}
            ]),
        ));
        harness.transport.push(json_response(
            200,
            &json!([
                {"id": 10, "subject": "call", "status": "Completed", "priority": "Normal"},
                {"id": 11, "subject": "mail", "status": "In Progress", "priority": "High"}
            ]),
        ));
        harness
            .transport
            .push(json_response(500, &json!({"detail": "boom"})));

        let members = load_members(&harness.client, "sales").await?;

        assert_eq!(members[0].pending_task_count, Some(1));
        assert_eq!(members[1].pending_task_count, None);
        let calls = harness.transport.calls();
        assert_eq!(calls.len(), 3);
        assert!(calls.iter().all(|call| call.method == Method::Get));
        assert_eq!(calls[0].url, "http://api.test/api/users/?team=SALES");
        assert_eq!(calls[1].url, "http://api.test/api/tasks/?owner=2");
        assert_eq!(calls[2].url, "http://api.test/api/tasks/?owner=3");
        Ok(())
    }

    #[tokio::test]
    async fn member_listing_failure_is_returned() {
        let harness = Harness::new(None);
        harness
            .transport
            .push(json_response(403, &json!({"detail": "nope"})));

        let result = load_members(&harness.client, "tech").await;

        assert!(matches!(result, Err(ApiError::Status { status: 403, .. })));
        assert_eq!(harness.transport.calls().len(), 1);
    }

    #[tokio::test]
    async fn member_tasks_keep_only_pending_and_name_the_owner() -> anyhow::Result<()> {
        let harness = Harness::new(None);
        harness.transport.push(json_response(
            200,
            &json!([
                {"id": 10, "subject": "call", "status": "Completed", "priority": "Low", "owner_name": "bo"},
                {"id": 11, "subject": "mail", "status": "Not Started", "priority": "High", "owner_name": "bo"}
            ]),
        ));

        let (name, tasks) = load_member_tasks(&harness.client, 2).await?;

        assert_eq!(name, "bo");
        assert_eq!(tasks.len(), 1);
        assert_eq!(tasks[0].id, Some(11));
        assert_eq!(harness.transport.calls()[0].url, "http://api.test/api/tasks/?owner=2");
        Ok(())
    }
}

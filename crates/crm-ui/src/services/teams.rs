//! Team service.

use crate::services::api::ApiClient;
use crate::services::error::ApiError;
use crate::services::http::ApiRequest;
use crate::services::tasks;
use crm_api_models::{MessageResponse, Task, TeamMember, TeamOption};

/// Teams the user can browse.
///
/// # Errors
///
/// Propagates any [`ApiError`].
pub async fn list(client: &ApiClient) -> Result<Vec<TeamOption>, ApiError> {
    client.fetch(ApiRequest::get("teams/")).await
}

/// Members of a team.
///
/// # Errors
///
/// Propagates any [`ApiError`].
pub async fn members(client: &ApiClient, team: &str) -> Result<Vec<TeamMember>, ApiError> {
    client
        .fetch(ApiRequest::get("users/").query("team", team))
        .await
}

/// Tasks owned by a member.
///
/// # Errors
///
/// Propagates any [`ApiError`].
pub async fn member_tasks(client: &ApiClient, user_id: i64) -> Result<Vec<Task>, ApiError> {
    client
        .fetch(ApiRequest::get("tasks/").query("owner", user_id.to_string()))
        .await
}

/// Send a reminder about a member's task.
///
/// # Errors
///
/// Propagates any [`ApiError`].
pub async fn send_reminder(client: &ApiClient, task_id: i64) -> Result<MessageResponse, ApiError> {
    tasks::send_reminder(client, task_id).await
}

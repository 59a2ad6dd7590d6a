//! Task service.

use crate::services::api::ApiClient;
use crate::services::error::ApiError;
use crate::services::http::{ApiRequest, Method};
use crm_api_models::{MessageResponse, Task};
use serde::Serialize;

/// List tasks, forwarding arbitrary filter parameters (e.g. `owner`, `status`).
///
/// # Errors
///
/// Propagates any [`ApiError`].
pub async fn list(client: &ApiClient, params: &[(&str, String)]) -> Result<Vec<Task>, ApiError> {
    let request = params
        .iter()
        .fold(ApiRequest::get("tasks/"), |request, (key, value)| {
            request.query(*key, value.clone())
        });
    client.fetch(request).await
}

/// One task.
///
/// # Errors
///
/// Propagates any [`ApiError`].
pub async fn get(client: &ApiClient, id: i64) -> Result<Task, ApiError> {
    client.fetch(ApiRequest::get(format!("tasks/{id}/"))).await
}

/// Create a task.
///
/// # Errors
///
/// Propagates any [`ApiError`].
pub async fn create<B: Serialize + ?Sized>(client: &ApiClient, body: &B) -> Result<Task, ApiError> {
    client
        .fetch(ApiRequest::json(Method::Post, "tasks/", body)?)
        .await
}

/// Patch task fields.
///
/// # Errors
///
/// Propagates any [`ApiError`].
pub async fn update<B: Serialize + ?Sized>(
    client: &ApiClient,
    id: i64,
    patch: &B,
) -> Result<Task, ApiError> {
    client
        .fetch(ApiRequest::json(Method::Patch, format!("tasks/{id}/"), patch)?)
        .await
}

/// Delete a task.
///
/// # Errors
///
/// Propagates any [`ApiError`].
pub async fn delete(client: &ApiClient, id: i64) -> Result<(), ApiError> {
    client
        .fetch_unit(ApiRequest::delete(format!("tasks/{id}/")))
        .await
}

/// Nudge the task owner with a notification.
///
/// # Errors
///
/// Propagates any [`ApiError`].
pub async fn send_reminder(client: &ApiClient, id: i64) -> Result<MessageResponse, ApiError> {
    client
        .fetch(ApiRequest::post_empty(format!("tasks/{id}/send_reminder/")))
        .await
}

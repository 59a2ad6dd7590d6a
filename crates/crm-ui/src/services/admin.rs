//! User and RBAC administration service.

use crate::services::api::ApiClient;
use crate::services::error::ApiError;
use crate::services::http::{ApiRequest, Method};
use crm_api_models::{
    MessageResponse, Permission, Role, ThresholdRequest, UserRolesPatch, UserSummary,
};
use serde::Serialize;

/// All users.
///
/// # Errors
///
/// Propagates any [`ApiError`].
pub async fn users(client: &ApiClient) -> Result<Vec<UserSummary>, ApiError> {
    client.fetch(ApiRequest::get("users/")).await
}

/// Replace a user's roles.
///
/// # Errors
///
/// Propagates any [`ApiError`].
pub async fn update_roles(
    client: &ApiClient,
    user_id: i64,
    role_ids: Vec<i64>,
) -> Result<UserSummary, ApiError> {
    client
        .fetch(ApiRequest::json(
            Method::Patch,
            format!("users/{user_id}/"),
            &UserRolesPatch { role_ids },
        )?)
        .await
}

/// Patch arbitrary user fields (team, capability flags).
///
/// # Errors
///
/// Propagates any [`ApiError`].
pub async fn update_user<B: Serialize + ?Sized>(
    client: &ApiClient,
    user_id: i64,
    patch: &B,
) -> Result<UserSummary, ApiError> {
    client
        .fetch(ApiRequest::json(
            Method::Patch,
            format!("users/{user_id}/"),
            patch,
        )?)
        .await
}

/// Set a user's monthly revenue threshold.
///
/// # Errors
///
/// Propagates any [`ApiError`].
pub async fn update_threshold(
    client: &ApiClient,
    user_id: i64,
    threshold: f64,
) -> Result<MessageResponse, ApiError> {
    client
        .fetch(ApiRequest::json(
            Method::Post,
            format!("users/{user_id}/update_threshold/"),
            &ThresholdRequest { threshold },
        )?)
        .await
}

/// Create a user account.
///
/// # Errors
///
/// Propagates any [`ApiError`].
pub async fn onboard_user<B: Serialize + ?Sized>(
    client: &ApiClient,
    body: &B,
) -> Result<UserSummary, ApiError> {
    client
        .fetch(ApiRequest::json(Method::Post, "users/onboard/", body)?)
        .await
}

/// All roles.
///
/// # Errors
///
/// Propagates any [`ApiError`].
pub async fn roles(client: &ApiClient) -> Result<Vec<Role>, ApiError> {
    client.fetch(ApiRequest::get("rbac/roles/")).await
}

/// Create a role.
///
/// # Errors
///
/// Propagates any [`ApiError`].
pub async fn create_role(client: &ApiClient, role: &Role) -> Result<Role, ApiError> {
    client
        .fetch(ApiRequest::json(Method::Post, "rbac/roles/", role)?)
        .await
}

/// Update a role.
///
/// # Errors
///
/// Propagates any [`ApiError`].
pub async fn update_role(client: &ApiClient, role_id: i64, role: &Role) -> Result<Role, ApiError> {
    client
        .fetch(ApiRequest::json(
            Method::Patch,
            format!("rbac/roles/{role_id}/"),
            role,
        )?)
        .await
}

/// Delete a role.
///
/// # Errors
///
/// Propagates any [`ApiError`].
pub async fn delete_role(client: &ApiClient, role_id: i64) -> Result<(), ApiError> {
    client
        .fetch_unit(ApiRequest::delete(format!("rbac/roles/{role_id}/")))
        .await
}

/// All assignable permissions.
///
/// # Errors
///
/// Propagates any [`ApiError`].
pub async fn permissions(client: &ApiClient) -> Result<Vec<Permission>, ApiError> {
    client.fetch(ApiRequest::get("rbac/permissions/")).await
}

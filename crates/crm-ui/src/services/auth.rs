//! Authentication service.
//!
//! # Design
//! - Persist tokens as soon as login succeeds, before the profile is fetched,
//!   so the profile request already carries the bearer token.
//! - A failed profile fetch leaves the token session in place and reports the error.

use crate::core::auth::{LOGIN_PATH, Session};
use crate::services::api::ApiClient;
use crate::services::error::ApiError;
use crate::services::http::{ApiRequest, Method};
use crm_api_models::{ChangePasswordRequest, CurrentUser, LoginRequest, TokenPair};
use tracing::info;

/// Exchange credentials for tokens, store the session and merge the profile into it.
///
/// # Errors
///
/// Returns the login failure (401 for bad credentials) or the profile fetch failure.
pub async fn login(client: &ApiClient, username: &str, password: &str) -> Result<Session, ApiError> {
    let request = ApiRequest::json(
        Method::Post,
        LOGIN_PATH,
        &LoginRequest {
            username: username.to_string(),
            password: password.to_string(),
        },
    )?;
    let tokens: TokenPair = client.fetch(request).await?;
    let session = Session::from_tokens(username, tokens);
    client.save_session(&session);

    let user = current_user(client).await?;
    let merged = session.with_user(user);
    client.save_session(&merged);
    info!(username = %username, "signed in");
    Ok(merged)
}

/// Fetch the authenticated user's profile.
///
/// # Errors
///
/// Propagates any [`ApiError`] from `users/me/`.
pub async fn current_user(client: &ApiClient) -> Result<CurrentUser, ApiError> {
    client.fetch(ApiRequest::get("users/me/")).await
}

/// Check a stored session against the backend, signing out when it is rejected.
///
/// # Errors
///
/// Returns the failure that caused the sign-out.
pub async fn validate_session(client: &ApiClient) -> Result<CurrentUser, ApiError> {
    match current_user(client).await {
        Ok(user) => Ok(user),
        Err(err) => {
            client.clear_session();
            Err(err)
        }
    }
}

/// Exchange the refresh token for a new access token.
///
/// # Errors
///
/// [`ApiError::NoRefreshToken`] without a stored refresh token, or the refresh failure.
pub async fn refresh(client: &ApiClient) -> Result<Session, ApiError> {
    client.refresh_access().await
}

/// Change the current user's password.
///
/// # Errors
///
/// Propagates any [`ApiError`].
pub async fn change_password(
    client: &ApiClient,
    old_password: &str,
    new_password: &str,
) -> Result<(), ApiError> {
    let request = ApiRequest::json(
        Method::Post,
        "users/change_password/",
        &ChangePasswordRequest {
            old_password: old_password.to_string(),
            new_password: new_password.to_string(),
        },
    )?;
    client.fetch_unit(request).await
}

/// Drop the session.
pub fn logout(client: &ApiClient) {
    client.clear_session();
    info!("signed out");
}

/// Message shown on the login form for a failed attempt.
#[must_use]
pub fn login_error_message(err: &ApiError) -> String {
    match err {
        ApiError::Network(_) => "Unable to connect to the server. Please check your internet connection or if the backend is running.".to_string(),
        ApiError::Status { status: 401, .. } => "Invalid username or password.".to_string(),
        ApiError::Status { status: 400, .. } => "Invalid request. Please check your input.".to_string(),
        ApiError::Status { status, detail } => format!(
            "Server Error ({status}): {}",
            detail.as_deref().unwrap_or("Unknown error")
        ),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::auth::SessionStorage;
    use crate::services::testing::{Harness, json_response, session};
    use serde_json::json;

    fn me() -> serde_json::Value {
        json!({
            "id": 3,
            "username": "ada",
            "email": "ada@example.com",
            "team": "SALES",
            "is_manager": true,
            "roles": ["Sales Manager"],
            "revenue_threshold": "50000.00"
        })
    }

    #[tokio::test]
    async fn login_stores_tokens_then_merges_profile() -> anyhow::Result<()> {
        let harness = Harness::new(None);
        harness
            .transport
            .push(json_response(200, &json!({"access": "a1", "refresh": "r1"})));
        harness.transport.push(json_response(200, &me()));

        let session = login(&harness.client, "ada", "pw").await?;

        assert_eq!(session.access, "a1");
        assert_eq!(session.refresh.as_deref(), Some("r1"));
        assert_eq!(session.user.as_ref().map(|u| u.is_manager), Some(true));
        let calls = harness.transport.calls();
        assert_eq!(calls[0].authorization, None);
        assert_eq!(
            calls[0].json_body(),
            Some(json!({"username": "ada", "password": "pw"}))
        );
        assert_eq!(calls[1].url, "http://api.test/api/users/me/");
        assert_eq!(calls[1].authorization.as_deref(), Some("Bearer a1"));
        assert_eq!(harness.sessions.load(), Some(session));
        Ok(())
    }

    #[tokio::test]
    async fn bad_credentials_do_not_touch_session() {
        let harness = Harness::new(None);
        harness
            .transport
            .push(json_response(401, &json!({"detail": "No active account"})));

        let err = login(&harness.client, "ada", "nope").await.err();

        assert_eq!(
            err.as_ref().map(login_error_message).as_deref(),
            Some("Invalid username or password.")
        );
        assert!(harness.sessions.load().is_none());
        assert_eq!(harness.transport.calls().len(), 1);
    }

    #[tokio::test]
    async fn rejected_session_is_cleared_on_validation() {
        let harness = Harness::new(Some(session("a1", None)));
        harness.transport.push(json_response(401, &json!({})));

        let result = validate_session(&harness.client).await;

        assert!(result.is_err());
        assert!(harness.sessions.load().is_none());
    }

    #[tokio::test]
    async fn explicit_refresh_without_token_errors() {
        let harness = Harness::new(Some(session("a1", None)));
        let result = refresh(&harness.client).await;
        assert_eq!(
            result.map_err(|err| err.to_string()),
            Err("No refresh token available".to_string())
        );
        assert!(harness.transport.calls().is_empty());
    }

    #[test]
    fn server_errors_include_detail() {
        let err = ApiError::Status {
            status: 503,
            detail: Some("maintenance".to_string()),
        };
        assert_eq!(login_error_message(&err), "Server Error (503): maintenance");
    }

    #[tokio::test]
    async fn change_password_posts_old_and_new() -> anyhow::Result<()> {
        let harness = Harness::new(Some(session("a1", Some("r1"))));
        harness
            .transport
            .push(json_response(200, &json!({"message": "Password updated"})));

        change_password(&harness.client, "old-secret", "new-secret").await?;

        let call = &harness.transport.calls()[0];
        assert_eq!(call.method, Method::Post);
        assert_eq!(call.url, "http://api.test/api/users/change_password/");
        assert_eq!(call.authorization.as_deref(), Some("Bearer a1"));
        assert_eq!(
            call.json_body(),
            Some(json!({"old_password": "old-secret", "new_password": "new-secret"}))
        );
        Ok(())
    }

    #[tokio::test]
    async fn rejected_password_change_keeps_the_session() {
        let harness = Harness::new(Some(session("a1", Some("r1"))));
        harness.transport.push(json_response(
            400,
            &json!({"detail": "Old password is incorrect"}),
        ));

        let result = change_password(&harness.client, "wrong", "new-secret").await;

        assert_eq!(
            result,
            Err(ApiError::Status {
                status: 400,
                detail: Some("Old password is incorrect".to_string()),
            })
        );
        assert!(harness.sessions.load().is_some());
    }
}

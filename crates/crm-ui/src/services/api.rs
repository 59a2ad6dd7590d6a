//! Shared API client and its interceptor chain.
//!
//! # Design
//! - One client per app boot, shared behind `Rc`.
//! - Every request counts toward the global loader unless it carries `X-Skip-Loader`;
//!   the count is released on drop so failures never leave the loader spinning.
//! - A 401 on an ordinary request triggers one refresh and one retry. The retried
//!   response is final. A failed refresh or a failed retry ends the session.
//! - Side effects on shared UI state go through [`ClientHooks`] so the client stays
//!   DOM-free and testable.

use crate::core::auth::{REFRESH_PATH, Session, SessionStorage, is_login_url, is_refresh_url};
use crate::core::config::ClientConfig;
use crate::services::error::ApiError;
use crate::services::http::{
    AUTHORIZATION_HEADER, ApiRequest, ApiResponse, HttpRequest, Method, Transport,
};
use crm_api_models::{AccessToken, RefreshRequest};
use serde::de::DeserializeOwned;
use std::rc::Rc;
use tracing::{debug, warn};
use url::Url;

/// Observers for client side effects that the UI mirrors into its store.
pub trait ClientHooks {
    /// A loader-counted request started.
    fn request_started(&self) {}
    /// A loader-counted request finished, successfully or not.
    fn request_finished(&self) {}
    /// The session was replaced (`Some`) or cleared (`None`).
    fn session_changed(&self, _session: Option<&Session>) {}
    /// A fresh unread notification count is available.
    fn notifications_unread(&self, _count: u32) {}
    /// A fresh unread reminder count is available.
    fn reminders_unread(&self, _count: u32) {}
}

/// Hooks that ignore every event.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoopHooks;

impl ClientHooks for NoopHooks {}

struct LoaderGuard {
    hooks: Rc<dyn ClientHooks>,
}

impl LoaderGuard {
    fn start(hooks: &Rc<dyn ClientHooks>) -> Self {
        hooks.request_started();
        Self {
            hooks: Rc::clone(hooks),
        }
    }
}

impl Drop for LoaderGuard {
    fn drop(&mut self) {
        self.hooks.request_finished();
    }
}

/// REST client with session handling.
#[derive(Clone)]
pub struct ApiClient {
    config: ClientConfig,
    transport: Rc<dyn Transport>,
    sessions: Rc<dyn SessionStorage>,
    hooks: Rc<dyn ClientHooks>,
}

impl ApiClient {
    /// Build a client with no-op hooks.
    #[must_use]
    pub fn new(
        config: ClientConfig,
        transport: Rc<dyn Transport>,
        sessions: Rc<dyn SessionStorage>,
    ) -> Self {
        Self {
            config,
            transport,
            sessions,
            hooks: Rc::new(NoopHooks),
        }
    }

    /// Replace the hooks.
    #[must_use]
    pub fn with_hooks(mut self, hooks: Rc<dyn ClientHooks>) -> Self {
        self.hooks = hooks;
        self
    }

    /// Resolved configuration.
    #[must_use]
    pub const fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Hooks receiving side effects.
    #[must_use]
    pub fn hooks(&self) -> &dyn ClientHooks {
        self.hooks.as_ref()
    }

    /// Currently stored session.
    #[must_use]
    pub fn session(&self) -> Option<Session> {
        self.sessions.load()
    }

    /// Persist a session and notify the hooks.
    pub fn save_session(&self, session: &Session) {
        self.sessions.save(session);
        self.hooks.session_changed(Some(session));
    }

    /// Drop the stored session and notify the hooks.
    pub fn clear_session(&self) {
        self.sessions.clear();
        self.hooks.session_changed(None);
    }

    fn resolve(&self, request: &ApiRequest) -> Result<Url, ApiError> {
        let mut url = self.config.endpoint(&request.path)?;
        if !request.query.is_empty() {
            url.query_pairs_mut().extend_pairs(request.query.iter());
        }
        Ok(url)
    }

    async fn dispatch(
        &self,
        request: &ApiRequest,
        url: &Url,
        token: Option<&str>,
    ) -> Result<ApiResponse, ApiError> {
        let mut headers = request.headers.clone();
        if let Some(token) = token {
            headers.push((AUTHORIZATION_HEADER.to_string(), format!("Bearer {token}")));
        }
        let wire = HttpRequest {
            method: request.method,
            url: url.clone(),
            headers,
            body: &request.body,
        };
        debug!(method = request.method.as_str(), url = %url, "sending request");
        self.transport.send(&wire).await
    }

    /// Send a request through the interceptor chain.
    ///
    /// # Errors
    ///
    /// Transport failures, non-2xx statuses (after the single refresh/retry) and
    /// refresh failures are returned as [`ApiError`]. Any failure of the retried
    /// request also clears the session.
    pub async fn execute(&self, request: &ApiRequest) -> Result<ApiResponse, ApiError> {
        let _loader = (!request.skips_loader()).then(|| LoaderGuard::start(&self.hooks));
        let url = self.resolve(request)?;
        let refresh = is_refresh_url(url.as_str());
        let login = is_login_url(url.as_str());

        let token = if refresh {
            None
        } else {
            self.sessions
                .load()
                .filter(Session::has_token)
                .map(|session| session.access)
        };

        let response = self.dispatch(request, &url, token.as_deref()).await?;
        if response.status != 401 {
            return into_result(response);
        }
        if refresh {
            warn!("refresh token rejected; signing out");
            self.clear_session();
            return into_result(response);
        }
        if login {
            return into_result(response);
        }

        debug!(url = %url, "access token rejected; refreshing once");
        let session = match self.refresh_access().await {
            Ok(session) => session,
            Err(err) => {
                warn!(error = %err, "token refresh failed; signing out");
                self.clear_session();
                return Err(err);
            }
        };
        let retried = self
            .dispatch(request, &url, Some(&session.access))
            .await
            .and_then(into_result);
        if let Err(err) = &retried {
            warn!(error = %err, "request failed after token refresh; signing out");
            self.clear_session();
        }
        retried
    }

    /// Exchange the stored refresh token for a new access token and persist it.
    ///
    /// # Errors
    ///
    /// [`ApiError::NoRefreshToken`] without a refresh token; a 401 from the refresh
    /// endpoint also clears the session.
    pub async fn refresh_access(&self) -> Result<Session, ApiError> {
        let Some(session) = self.sessions.load() else {
            return Err(ApiError::NoRefreshToken);
        };
        let Some(refresh) = session.refresh.clone() else {
            return Err(ApiError::NoRefreshToken);
        };

        let request = ApiRequest::json(Method::Post, REFRESH_PATH, &RefreshRequest { refresh })?;
        let _loader = LoaderGuard::start(&self.hooks);
        let url = self.resolve(&request)?;
        let response = self.dispatch(&request, &url, None).await?;
        if response.status == 401 {
            warn!("refresh token rejected; signing out");
            self.clear_session();
        }
        let token: AccessToken = into_result(response)?.json()?;
        let updated = session.with_access(token.access);
        self.save_session(&updated);
        Ok(updated)
    }

    /// Send a request and decode its JSON body.
    ///
    /// # Errors
    ///
    /// See [`ApiClient::execute`]; decoding failures surface as [`ApiError::Decode`].
    pub async fn fetch<T: DeserializeOwned>(&self, request: ApiRequest) -> Result<T, ApiError> {
        self.execute(&request).await?.json()
    }

    /// Send a request and ignore its body.
    ///
    /// # Errors
    ///
    /// See [`ApiClient::execute`].
    pub async fn fetch_unit(&self, request: ApiRequest) -> Result<(), ApiError> {
        self.execute(&request).await.map(|_| ())
    }

    /// Send a request and return the raw body.
    ///
    /// # Errors
    ///
    /// See [`ApiClient::execute`].
    pub async fn fetch_bytes(&self, request: ApiRequest) -> Result<Vec<u8>, ApiError> {
        self.execute(&request).await.map(|response| response.body)
    }
}

fn into_result(response: ApiResponse) -> Result<ApiResponse, ApiError> {
    if response.is_success() {
        Ok(response)
    } else {
        Err(ApiError::from_response(&response))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::testing::{Harness, json_response, session};
    use serde_json::json;

    #[tokio::test]
    async fn attaches_bearer_token_and_counts_loader() -> anyhow::Result<()> {
        let harness = Harness::new(Some(session("a1", Some("r1"))));
        harness.transport.push(json_response(200, &json!([])));

        let value: serde_json::Value = harness.client.fetch(ApiRequest::get("leads/")).await?;

        assert_eq!(value, json!([]));
        let calls = harness.transport.calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].url, "http://api.test/api/leads/");
        assert_eq!(calls[0].authorization.as_deref(), Some("Bearer a1"));
        assert_eq!(harness.hooks.started(), 1);
        assert_eq!(harness.hooks.finished(), 1);
        Ok(())
    }

    #[tokio::test]
    async fn anonymous_requests_carry_no_token() -> anyhow::Result<()> {
        let harness = Harness::new(None);
        harness.transport.push(json_response(200, &json!({})));
        harness.client.fetch_unit(ApiRequest::get("teams/")).await?;
        assert_eq!(harness.transport.calls()[0].authorization, None);
        Ok(())
    }

    #[tokio::test]
    async fn skip_loader_requests_are_not_counted() -> anyhow::Result<()> {
        let harness = Harness::new(None);
        harness.transport.push(json_response(500, &json!({"detail": "down"})));
        let result = harness
            .client
            .fetch_unit(ApiRequest::get("notifications/unread_count/").skip_loader())
            .await;
        assert!(matches!(result, Err(ApiError::Status { status: 500, .. })));
        assert_eq!(harness.hooks.started(), 0);
        assert_eq!(harness.hooks.finished(), 0);
        Ok(())
    }

    #[tokio::test]
    async fn unauthorized_request_refreshes_once_and_retries_once() -> anyhow::Result<()> {
        let harness = Harness::new(Some(session("stale", Some("r1"))));
        harness.transport.push(json_response(401, &json!({"detail": "expired"})));
        harness.transport.push(json_response(200, &json!({"access": "fresh"})));
        harness.transport.push(json_response(200, &json!([{"value": "SALES", "label": "Sales"}])));

        let teams: Vec<crm_api_models::TeamOption> =
            harness.client.fetch(ApiRequest::get("teams/")).await?;

        assert_eq!(teams.len(), 1);
        let calls = harness.transport.calls();
        assert_eq!(calls.len(), 3);
        assert_eq!(calls[1].url, "http://api.test/api/token/refresh/");
        assert_eq!(calls[1].authorization, None);
        assert_eq!(calls[1].json_body(), Some(json!({"refresh": "r1"})));
        assert_eq!(calls[2].authorization.as_deref(), Some("Bearer fresh"));
        let stored = harness.sessions.load().map(|s| s.access);
        assert_eq!(stored.as_deref(), Some("fresh"));
        assert_eq!(harness.hooks.started(), harness.hooks.finished());
        Ok(())
    }

    #[tokio::test]
    async fn retried_401_signs_out_without_second_refresh() -> anyhow::Result<()> {
        let harness = Harness::new(Some(session("stale", Some("r1"))));
        harness.transport.push(json_response(401, &json!({})));
        harness.transport.push(json_response(200, &json!({"access": "fresh"})));
        harness.transport.push(json_response(401, &json!({"detail": "still no"})));

        let result = harness.client.fetch_unit(ApiRequest::get("leads/")).await;

        assert_eq!(
            result,
            Err(ApiError::Status {
                status: 401,
                detail: Some("still no".to_string())
            })
        );
        assert_eq!(harness.transport.calls().len(), 3);
        assert!(harness.sessions.load().is_none());
        assert_eq!(harness.hooks.last_session(), Some(None));
        Ok(())
    }

    #[tokio::test]
    async fn server_error_on_retry_signs_out() -> anyhow::Result<()> {
        let harness = Harness::new(Some(session("stale", Some("r1"))));
        harness.transport.push(json_response(401, &json!({})));
        harness.transport.push(json_response(200, &json!({"access": "fresh"})));
        harness.transport.push(json_response(500, &json!({"detail": "boom"})));

        let result = harness.client.fetch_unit(ApiRequest::get("leads/")).await;

        assert_eq!(
            result,
            Err(ApiError::Status {
                status: 500,
                detail: Some("boom".to_string())
            })
        );
        assert_eq!(harness.transport.calls().len(), 3);
        assert!(harness.sessions.load().is_none());
        assert_eq!(harness.hooks.started(), harness.hooks.finished());
        Ok(())
    }

    #[tokio::test]
    async fn transport_failure_on_retry_signs_out() {
        let harness = Harness::new(Some(session("stale", Some("r1"))));
        harness.transport.push(json_response(401, &json!({})));
        harness.transport.push(json_response(200, &json!({"access": "fresh"})));

        let result = harness.client.fetch_unit(ApiRequest::get("tasks/")).await;

        assert!(matches!(result, Err(ApiError::Network(_))));
        assert!(harness.sessions.load().is_none());
    }

    #[tokio::test]
    async fn failed_refresh_signs_out_and_returns_refresh_error() -> anyhow::Result<()> {
        let harness = Harness::new(Some(session("stale", Some("r1"))));
        harness.transport.push(json_response(401, &json!({})));
        harness.transport.push(json_response(401, &json!({"detail": "Token is invalid"})));

        let result = harness.client.fetch_unit(ApiRequest::get("tasks/")).await;

        assert_eq!(
            result.map_err(|err| err.user_message()),
            Err("Token is invalid".to_string())
        );
        assert_eq!(harness.transport.calls().len(), 2);
        assert!(harness.sessions.load().is_none());
        assert_eq!(harness.hooks.last_session(), Some(None));
        Ok(())
    }

    #[tokio::test]
    async fn missing_refresh_token_signs_out_without_network() -> anyhow::Result<()> {
        let harness = Harness::new(Some(session("stale", None)));
        harness.transport.push(json_response(401, &json!({})));

        let result = harness.client.fetch_unit(ApiRequest::get("users/me/")).await;

        assert_eq!(result, Err(ApiError::NoRefreshToken));
        assert_eq!(harness.transport.calls().len(), 1);
        assert!(harness.sessions.load().is_none());
        Ok(())
    }

    #[tokio::test]
    async fn login_401_passes_through_untouched() -> anyhow::Result<()> {
        let harness = Harness::new(Some(session("old", Some("r1"))));
        harness
            .transport
            .push(json_response(401, &json!({"detail": "No active account"})));

        let request = ApiRequest::json(
            Method::Post,
            "token/",
            &json!({"username": "ada", "password": "bad"}),
        )?;
        let result = harness.client.fetch_unit(request).await;

        assert!(matches!(result, Err(ref err) if err.is_unauthorized()));
        assert_eq!(harness.transport.calls().len(), 1);
        assert!(harness.sessions.load().is_some());
        Ok(())
    }

    #[tokio::test]
    async fn query_parameters_are_encoded() -> anyhow::Result<()> {
        let harness = Harness::new(None);
        harness.transport.push(json_response(200, &json!([])));
        harness
            .client
            .fetch_unit(
                ApiRequest::get("leads/")
                    .query("team", "SALES")
                    .query("search", "ada lovelace"),
            )
            .await?;
        assert_eq!(
            harness.transport.calls()[0].url,
            "http://api.test/api/leads/?team=SALES&search=ada+lovelace"
        );
        Ok(())
    }

    #[tokio::test]
    async fn transport_failure_still_releases_loader() {
        let harness = Harness::new(None);
        let result = harness.client.fetch_unit(ApiRequest::get("leads/")).await;
        assert!(matches!(result, Err(ApiError::Network(_))));
        assert_eq!(harness.hooks.started(), 1);
        assert_eq!(harness.hooks.finished(), 1);
    }
}

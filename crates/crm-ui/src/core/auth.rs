//! Session primitives shared across the UI.
//!
//! # Design
//! - Keep the session as plain data so storage backends can persist it verbatim.
//! - Hide persistence behind [`SessionStorage`] so the interceptor stays DOM-free.
//! - Classify token endpoints by URL, matching how the backend mounts them.

use crm_api_models::{CurrentUser, TokenPair};
use serde::{Deserialize, Serialize};
use std::cell::RefCell;

/// Path of the token refresh endpoint, relative to the API base.
pub const REFRESH_PATH: &str = "token/refresh/";
/// Path of the login endpoint, relative to the API base.
pub const LOGIN_PATH: &str = "token/";

/// Authenticated session persisted between page loads.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Session {
    /// Login name used to sign in.
    pub username: String,
    /// Short-lived bearer token.
    pub access: String,
    /// Refresh token, absent when the backend did not issue one.
    #[serde(default)]
    pub refresh: Option<String>,
    /// Profile fetched from `users/me/` after login.
    #[serde(default)]
    pub user: Option<CurrentUser>,
}

impl Session {
    /// Build a fresh session from a login response.
    #[must_use]
    pub fn from_tokens(username: impl Into<String>, tokens: TokenPair) -> Self {
        Self {
            username: username.into(),
            access: tokens.access,
            refresh: Some(tokens.refresh),
            user: None,
        }
    }

    /// Copy of the session carrying a new access token.
    #[must_use]
    pub fn with_access(&self, access: impl Into<String>) -> Self {
        Self {
            access: access.into(),
            ..self.clone()
        }
    }

    /// Copy of the session carrying the fetched profile.
    #[must_use]
    pub fn with_user(&self, user: CurrentUser) -> Self {
        Self {
            user: Some(user),
            ..self.clone()
        }
    }

    /// Whether the session holds a usable access token.
    #[must_use]
    pub fn has_token(&self) -> bool {
        !self.access.trim().is_empty()
    }
}

/// Persistence backend for the single session entry.
pub trait SessionStorage {
    /// Read the stored session, if any.
    fn load(&self) -> Option<Session>;
    /// Replace the stored session.
    fn save(&self, session: &Session);
    /// Remove the stored session.
    fn clear(&self);
}

/// In-memory session storage used natively and in tests.
#[derive(Debug, Default)]
pub struct MemorySessionStorage {
    inner: RefCell<Option<Session>>,
}

impl MemorySessionStorage {
    /// Storage pre-populated with a session.
    #[must_use]
    pub fn with_session(session: Session) -> Self {
        Self {
            inner: RefCell::new(Some(session)),
        }
    }
}

impl SessionStorage for MemorySessionStorage {
    fn load(&self) -> Option<Session> {
        self.inner.borrow().clone()
    }

    fn save(&self, session: &Session) {
        *self.inner.borrow_mut() = Some(session.clone());
    }

    fn clear(&self) {
        self.inner.borrow_mut().take();
    }
}

/// Whether the URL targets the refresh endpoint.
#[must_use]
pub fn is_refresh_url(url: &str) -> bool {
    url.contains("/token/refresh/")
}

/// Whether the URL targets the login endpoint.
#[must_use]
pub fn is_login_url(url: &str) -> bool {
    url.contains("/token/") && !is_refresh_url(url)
}

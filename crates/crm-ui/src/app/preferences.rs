//! Persistence and environment helpers for the app shell.

use crate::core::auth::{Session, SessionStorage};
use crate::core::config::{ClientConfig, ConfigError};
use gloo::storage::{LocalStorage, Storage};
use gloo::utils::window;
use serde::Serialize;
use tracing::{error, warn};

pub(crate) const SESSION_KEY: &str = "crm.session";
pub(crate) const API_BASE_URL_KEY: &str = "crm.api_base_url";

/// Session storage backed by a single local-storage entry.
pub(crate) struct LocalStorageSessions;

impl SessionStorage for LocalStorageSessions {
    fn load(&self) -> Option<Session> {
        match LocalStorage::get::<Session>(SESSION_KEY) {
            Ok(session) => Some(session),
            Err(gloo::storage::errors::StorageError::KeyNotFound(_)) => None,
            Err(err) => {
                warn!(error = %err, "discarding unreadable stored session");
                delete_storage(SESSION_KEY);
                None
            }
        }
    }

    fn save(&self, session: &Session) {
        set_storage(SESSION_KEY, session);
    }

    fn clear(&self) {
        delete_storage(SESSION_KEY);
    }
}

/// Optional API base override set by operators.
pub(crate) fn load_api_base_override() -> Option<String> {
    LocalStorage::get::<String>(API_BASE_URL_KEY)
        .ok()
        .filter(|value| !value.trim().is_empty())
}

/// Client configuration for the current page.
pub(crate) fn client_config() -> Result<ClientConfig, ConfigError> {
    let href = window()
        .location()
        .href()
        .unwrap_or_else(|_| "http://localhost:4200/".to_string());
    ClientConfig::resolve(load_api_base_override().as_deref(), &href)
}

fn set_storage<T: Serialize>(key: &'static str, value: T) {
    if let Err(err) = LocalStorage::set(key, value) {
        error!(operation = "set", key, error = %err, "storage operation failed");
    }
}

fn delete_storage(key: &'static str) {
    LocalStorage::delete(key);
}

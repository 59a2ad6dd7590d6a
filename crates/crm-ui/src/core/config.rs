//! API base URL resolution.
//!
//! # Design
//! - Derive the backend origin from the page location so one build serves every host.
//! - The dev server on port 4200 talks to the backend on port 8000.
//! - An explicit override always wins over the derived value.

use thiserror::Error;
use url::Url;

/// Port used by the local dev server.
pub const DEV_SERVER_PORT: u16 = 4200;
/// Backend port paired with the dev server.
pub const DEV_BACKEND_PORT: u16 = 8000;
/// Path prefix under which the backend mounts its REST API.
pub const API_PREFIX: &str = "/api/";

/// Errors raised while resolving the API base URL.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// The input could not be parsed as an absolute URL.
    #[error("invalid url '{value}': {reason}")]
    InvalidUrl {
        /// Rejected input.
        value: String,
        /// Parser message.
        reason: String,
    },
    /// The URL cannot carry a path (e.g. `mailto:`).
    #[error("url '{0}' cannot be used as an API base")]
    NotHierarchical(String),
}

/// Client configuration resolved at boot.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ClientConfig {
    api_base: Url,
}

impl ClientConfig {
    /// Use an explicit API base URL.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when the value is not an absolute hierarchical URL.
    pub fn from_base(value: &str) -> Result<Self, ConfigError> {
        let mut url = parse(value)?;
        if !url.path().ends_with('/') {
            let path = format!("{}/", url.path());
            url.set_path(&path);
        }
        url.set_query(None);
        url.set_fragment(None);
        Ok(Self { api_base: url })
    }

    /// Derive the API base from the page location.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when the location is not an absolute hierarchical URL.
    pub fn from_location(href: &str) -> Result<Self, ConfigError> {
        let mut url = parse(href)?;
        if url.port() == Some(DEV_SERVER_PORT) {
            url.set_port(Some(DEV_BACKEND_PORT))
                .map_err(|()| ConfigError::NotHierarchical(href.to_string()))?;
        }
        url.set_path(API_PREFIX);
        url.set_query(None);
        url.set_fragment(None);
        Ok(Self { api_base: url })
    }

    /// Resolve the configuration, preferring a non-empty override.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when neither input yields a usable URL.
    pub fn resolve(override_base: Option<&str>, href: &str) -> Result<Self, ConfigError> {
        match override_base.map(str::trim).filter(|value| !value.is_empty()) {
            Some(base) => Self::from_base(base),
            None => Self::from_location(href),
        }
    }

    /// Base URL every relative endpoint path is joined onto. Always ends in `/`.
    #[must_use]
    pub const fn api_base(&self) -> &Url {
        &self.api_base
    }

    /// Join a relative endpoint path (e.g. `leads/4/`) onto the base.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when the joined path is not a valid URL.
    pub fn endpoint(&self, path: &str) -> Result<Url, ConfigError> {
        self.api_base
            .join(path.trim_start_matches('/'))
            .map_err(|err| ConfigError::InvalidUrl {
                value: path.to_string(),
                reason: err.to_string(),
            })
    }
}

fn parse(value: &str) -> Result<Url, ConfigError> {
    let url = Url::parse(value.trim()).map_err(|err| ConfigError::InvalidUrl {
        value: value.to_string(),
        reason: err.to_string(),
    })?;
    if url.cannot_be_a_base() {
        return Err(ConfigError::NotHierarchical(value.to_string()));
    }
    Ok(url)
}

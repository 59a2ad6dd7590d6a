//! Typed API failures.

use crate::core::config::ConfigError;
use crate::services::http::ApiResponse;
use crm_api_models::ErrorBody;
use thiserror::Error;

/// Every failure a service call can surface.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ApiError {
    /// The request never produced an HTTP response.
    #[error("network error: {0}")]
    Network(String),
    /// The server answered with a non-success status.
    #[error("request failed with status {status}: {}", detail.as_deref().unwrap_or("no detail"))]
    Status {
        /// HTTP status code.
        status: u16,
        /// `detail` field of the error body, when present.
        detail: Option<String>,
    },
    /// The response body did not match the expected shape.
    #[error("failed to decode response: {0}")]
    Decode(String),
    /// The request body could not be serialised.
    #[error("failed to encode request: {0}")]
    Encode(String),
    /// The endpoint URL could not be built.
    #[error(transparent)]
    Config(#[from] ConfigError),
    /// A refresh was needed but the session has no refresh token.
    #[error("No refresh token available")]
    NoRefreshToken,
}

impl ApiError {
    /// Build a status error from a failed response, extracting `detail`.
    #[must_use]
    pub fn from_response(response: &ApiResponse) -> Self {
        let detail = serde_json::from_slice::<ErrorBody>(&response.body)
            .ok()
            .and_then(|body| body.detail)
            .filter(|detail| !detail.trim().is_empty());
        Self::Status {
            status: response.status,
            detail,
        }
    }

    /// HTTP status, when the server answered.
    #[must_use]
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Whether the server rejected the credentials.
    #[must_use]
    pub const fn is_unauthorized(&self) -> bool {
        matches!(self.status(), Some(401))
    }

    /// Message suitable for a toast: the backend detail when available.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::Status {
                detail: Some(detail),
                ..
            } => detail.clone(),
            other => other.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detail_is_extracted_from_error_body() {
        let response = ApiResponse {
            status: 400,
            body: br#"{"detail":"Invalid transition"}"#.to_vec(),
        };
        let err = ApiError::from_response(&response);
        assert_eq!(err.status(), Some(400));
        assert_eq!(err.user_message(), "Invalid transition");
        assert!(!err.is_unauthorized());
    }

    #[test]
    fn non_json_body_falls_back_to_display() {
        let response = ApiResponse {
            status: 401,
            body: b"<html>nope</html>".to_vec(),
        };
        let err = ApiError::from_response(&response);
        assert!(err.is_unauthorized());
        assert_eq!(
            err.user_message(),
            "request failed with status 401: no detail"
        );
    }
}

//! Transport-neutral request/response types.
//!
//! # Design
//! - Services describe requests with relative paths; the client resolves URLs.
//! - Bodies are pre-encoded so a retried request is byte-identical to the first try.
//! - [`Transport`] is the only seam that touches the network.

use crate::services::error::ApiError;
use async_trait::async_trait;
use serde::Serialize;
use serde::de::DeserializeOwned;
use url::Url;

/// Header that opts a request out of the global loader.
pub const SKIP_LOADER_HEADER: &str = "X-Skip-Loader";
/// Authorization header name.
pub const AUTHORIZATION_HEADER: &str = "Authorization";

/// HTTP verbs used by the REST API.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Method {
    /// `GET`
    Get,
    /// `POST`
    Post,
    /// `PUT`
    Put,
    /// `PATCH`
    Patch,
    /// `DELETE`
    Delete,
}

impl Method {
    /// Upper-case verb.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Patch => "PATCH",
            Self::Delete => "DELETE",
        }
    }
}

/// One field of a multipart form.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FormPart {
    /// Plain text field.
    Text {
        /// Field name.
        name: String,
        /// Field value.
        value: String,
    },
    /// File field.
    File {
        /// Field name.
        name: String,
        /// File name reported to the server.
        file_name: String,
        /// MIME type, when known.
        content_type: Option<String>,
        /// File contents.
        bytes: Vec<u8>,
    },
}

/// Request payload.
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub enum RequestBody {
    /// No body.
    #[default]
    Empty,
    /// Pre-encoded JSON document.
    Json(Vec<u8>),
    /// Multipart form.
    Multipart(Vec<FormPart>),
}

/// Request described relative to the API base.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ApiRequest {
    /// HTTP verb.
    pub method: Method,
    /// Path relative to the API base, e.g. `leads/3/`.
    pub path: String,
    /// Query parameters, in insertion order.
    pub query: Vec<(String, String)>,
    /// Extra headers.
    pub headers: Vec<(String, String)>,
    /// Payload.
    pub body: RequestBody,
}

impl ApiRequest {
    /// Request without body.
    #[must_use]
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            query: Vec::new(),
            headers: Vec::new(),
            body: RequestBody::Empty,
        }
    }

    /// `GET` request.
    #[must_use]
    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::Get, path)
    }

    /// `DELETE` request.
    #[must_use]
    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(Method::Delete, path)
    }

    /// `POST` with an empty JSON object, as action endpoints expect.
    #[must_use]
    pub fn post_empty(path: impl Into<String>) -> Self {
        Self {
            body: RequestBody::Json(b"{}".to_vec()),
            ..Self::new(Method::Post, path)
        }
    }

    /// Request with a JSON body.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Encode`] when the body cannot be serialised.
    pub fn json<B: Serialize + ?Sized>(
        method: Method,
        path: impl Into<String>,
        body: &B,
    ) -> Result<Self, ApiError> {
        let encoded = serde_json::to_vec(body).map_err(|err| ApiError::Encode(err.to_string()))?;
        Ok(Self {
            body: RequestBody::Json(encoded),
            ..Self::new(method, path)
        })
    }

    /// `POST` with a multipart form.
    #[must_use]
    pub fn multipart(path: impl Into<String>, parts: Vec<FormPart>) -> Self {
        Self {
            body: RequestBody::Multipart(parts),
            ..Self::new(Method::Post, path)
        }
    }

    /// Append a query parameter.
    #[must_use]
    pub fn query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((key.into(), value.into()));
        self
    }

    /// Append a query parameter when a value is present.
    #[must_use]
    pub fn query_opt(self, key: impl Into<String>, value: Option<impl Into<String>>) -> Self {
        match value {
            Some(value) => self.query(key, value),
            None => self,
        }
    }

    /// Append a header.
    #[must_use]
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    /// Keep the request out of the global loader count.
    #[must_use]
    pub fn skip_loader(self) -> Self {
        self.header(SKIP_LOADER_HEADER, "true")
    }

    /// Whether the request opted out of the loader.
    #[must_use]
    pub fn skips_loader(&self) -> bool {
        self.headers
            .iter()
            .any(|(name, _)| name.eq_ignore_ascii_case(SKIP_LOADER_HEADER))
    }
}

/// Fully resolved request handed to a [`Transport`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HttpRequest<'a> {
    /// HTTP verb.
    pub method: Method,
    /// Absolute URL including query string.
    pub url: Url,
    /// Headers, including `Authorization` when a session exists.
    pub headers: Vec<(String, String)>,
    /// Payload.
    pub body: &'a RequestBody,
}

impl HttpRequest<'_> {
    /// Value of a header, matched case-insensitively.
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }
}

/// Raw HTTP response.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ApiResponse {
    /// Status code.
    pub status: u16,
    /// Raw body.
    pub body: Vec<u8>,
}

impl ApiResponse {
    /// Whether the status is 2xx.
    #[must_use]
    pub const fn is_success(&self) -> bool {
        self.status >= 200 && self.status < 300
    }

    /// Decode the body as JSON.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Decode`] when the body does not match `T`.
    pub fn json<T: DeserializeOwned>(&self) -> Result<T, ApiError> {
        serde_json::from_slice(&self.body).map_err(|err| ApiError::Decode(err.to_string()))
    }
}

/// Sends resolved requests over the wire.
#[async_trait(?Send)]
pub trait Transport {
    /// Send the request and return whatever status the server produced.
    ///
    /// # Errors
    ///
    /// Only transport failures are errors; non-2xx statuses are returned as responses.
    async fn send(&self, request: &HttpRequest<'_>) -> Result<ApiResponse, ApiError>;
}

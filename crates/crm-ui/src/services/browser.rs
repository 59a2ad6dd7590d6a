//! `gloo-net` transport used in the browser.

use crate::services::error::ApiError;
use crate::services::http::{ApiResponse, FormPart, HttpRequest, Method, RequestBody, Transport};
use async_trait::async_trait;
use gloo_net::http::{Method as GlooMethod, Request};
use js_sys::{Array, Uint8Array};
use web_sys::{Blob, BlobPropertyBag, FormData};

/// Transport backed by `fetch`.
#[derive(Clone, Copy, Debug, Default)]
pub struct BrowserTransport;

const fn method(method: Method) -> GlooMethod {
    match method {
        Method::Get => GlooMethod::GET,
        Method::Post => GlooMethod::POST,
        Method::Put => GlooMethod::PUT,
        Method::Patch => GlooMethod::PATCH,
        Method::Delete => GlooMethod::DELETE,
    }
}

fn form_data(parts: &[FormPart]) -> Result<FormData, ApiError> {
    let form = FormData::new().map_err(|_| ApiError::Encode("form-data failed".to_string()))?;
    for part in parts {
        match part {
            FormPart::Text { name, value } => form
                .append_with_str(name, value)
                .map_err(|err| ApiError::Encode(format!("append {name}: {err:?}")))?,
            FormPart::File {
                name,
                file_name,
                content_type,
                bytes,
            } => {
                let chunks = Array::of1(&Uint8Array::from(bytes.as_slice()));
                let options = BlobPropertyBag::new();
                if let Some(content_type) = content_type {
                    options.set_type(content_type);
                }
                let blob = Blob::new_with_u8_array_sequence_and_options(&chunks, &options)
                    .map_err(|err| ApiError::Encode(format!("blob {name}: {err:?}")))?;
                form.append_with_blob_and_filename(name, &blob, file_name)
                    .map_err(|err| ApiError::Encode(format!("attach {name}: {err:?}")))?;
            }
        }
    }
    Ok(form)
}

#[async_trait(?Send)]
impl Transport for BrowserTransport {
    async fn send(&self, request: &HttpRequest<'_>) -> Result<ApiResponse, ApiError> {
        let mut req = Request::new(request.url.as_str()).method(method(request.method));
        for (name, value) in &request.headers {
            req = req.header(name, value);
        }
        req = match request.body {
            RequestBody::Empty => req,
            RequestBody::Json(bytes) => req
                .header("Content-Type", "application/json")
                .body(String::from_utf8_lossy(bytes).into_owned()),
            RequestBody::Multipart(parts) => req.body(form_data(parts)?),
        };

        let response = req
            .send()
            .await
            .map_err(|err| ApiError::Network(err.to_string()))?;
        let status = response.status();
        let body = response
            .binary()
            .await
            .map_err(|err| ApiError::Network(err.to_string()))?;
        Ok(ApiResponse { status, body })
    }
}

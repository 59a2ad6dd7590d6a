//! Lead creation form state.

use crate::services::api::ApiClient;
use crate::services::error::ApiError;
use crate::services::leads;
use crm_api_models::{Lead, NewLead};

/// Toast shown when the backend rejects the form.
pub const CREATE_FAILED_MESSAGE: &str = "Error creating lead.";

/// Toast shown after creation.
#[must_use]
pub fn created_message(lead: &Lead) -> String {
    format!("Lead Created! ID: {}", lead.id)
}

/// Name, email and phone are required.
#[must_use]
pub fn is_complete(form: &NewLead) -> bool {
    [&form.first_name, &form.last_name, &form.email, &form.phone]
        .iter()
        .all(|field| !field.trim().is_empty())
}

/// Post the form with surrounding whitespace removed.
///
/// Returns `Ok(None)` without a request when a required field is blank.
///
/// # Errors
///
/// Propagates any [`ApiError`].
pub async fn submit(client: &ApiClient, form: &NewLead) -> Result<Option<Lead>, ApiError> {
    if !is_complete(form) {
        return Ok(None);
    }
    let body = NewLead {
        first_name: form.first_name.trim().to_string(),
        last_name: form.last_name.trim().to_string(),
        email: form.email.trim().to_string(),
        phone: form.phone.trim().to_string(),
        company_name: form.company_name.trim().to_string(),
        tech_requirements: form.tech_requirements.trim().to_string(),
        ..form.clone()
    };
    leads::create(client, &body).await.map(Some)
}

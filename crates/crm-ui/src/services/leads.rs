//! Lead service: CRUD, stage transitions, assignment, documents, notes and CSV export.

use crate::services::api::ApiClient;
use crate::services::error::ApiError;
use crate::services::http::{ApiRequest, FormPart, Method};
use crm_api_models::{
    AssignRequest, BulkAssignRequest, Lead, LeadDocument, LeadStage, Note, TransitionRequest,
    UserSummary,
};
use serde::Serialize;

/// Server-side filters accepted by `GET leads/` (and, partially, the CSV export).
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct LeadQuery {
    /// Team code, e.g. `SALES`.
    pub team: Option<String>,
    /// Free-text search.
    pub search: Option<String>,
    /// Only leads without an assignee.
    pub unassigned: bool,
    /// Only leads with an assignee.
    pub assigned: bool,
    /// Only leads created today.
    pub new_today: bool,
}

impl LeadQuery {
    fn apply(&self, mut request: ApiRequest, with_flags: bool) -> ApiRequest {
        request = request
            .query_opt("team", self.team.clone().filter(|v| !v.is_empty()))
            .query_opt("search", self.search.clone().filter(|v| !v.is_empty()));
        if with_flags {
            if self.unassigned {
                request = request.query("unassigned", "true");
            }
            if self.assigned {
                request = request.query("assigned", "true");
            }
            if self.new_today {
                request = request.query("new_today", "true");
            }
        }
        request
    }
}

/// File selected for upload.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UploadFile {
    /// Name reported to the server.
    pub file_name: String,
    /// MIME type, when the browser knows it.
    pub content_type: Option<String>,
    /// File contents.
    pub bytes: Vec<u8>,
}

/// Audit note recorded when a card is dropped on a column.
#[must_use]
pub fn transition_note(stage: LeadStage) -> String {
    format!("Moved to {} phase", stage.label())
}

/// List leads.
///
/// # Errors
///
/// Propagates any [`ApiError`].
pub async fn list(client: &ApiClient, query: &LeadQuery) -> Result<Vec<Lead>, ApiError> {
    client
        .fetch(query.apply(ApiRequest::get("leads/"), true))
        .await
}

/// Fetch one lead.
///
/// # Errors
///
/// Propagates any [`ApiError`].
pub async fn get(client: &ApiClient, id: i64) -> Result<Lead, ApiError> {
    client.fetch(ApiRequest::get(format!("leads/{id}/"))).await
}

/// Create a lead from a form payload.
///
/// # Errors
///
/// Propagates any [`ApiError`].
pub async fn create<B: Serialize + ?Sized>(client: &ApiClient, body: &B) -> Result<Lead, ApiError> {
    client
        .fetch(ApiRequest::json(Method::Post, "leads/", body)?)
        .await
}

/// Patch lead fields.
///
/// # Errors
///
/// Propagates any [`ApiError`].
pub async fn update<B: Serialize + ?Sized>(
    client: &ApiClient,
    id: i64,
    patch: &B,
) -> Result<Lead, ApiError> {
    client
        .fetch(ApiRequest::json(Method::Patch, format!("leads/{id}/"), patch)?)
        .await
}

/// Move a lead to another stage; the backend records an audit entry with `notes`.
///
/// # Errors
///
/// Propagates any [`ApiError`], including rejected transitions.
pub async fn transition(
    client: &ApiClient,
    id: i64,
    stage: LeadStage,
    notes: impl Into<String>,
) -> Result<(), ApiError> {
    let body = TransitionRequest {
        stage,
        notes: notes.into(),
    };
    client
        .fetch_unit(ApiRequest::json(
            Method::Post,
            format!("leads/{id}/transition/"),
            &body,
        )?)
        .await
}

/// Assign one lead to a user.
///
/// # Errors
///
/// Propagates any [`ApiError`].
pub async fn assign(client: &ApiClient, id: i64, user_id: i64) -> Result<(), ApiError> {
    client
        .fetch_unit(ApiRequest::json(
            Method::Post,
            format!("leads/{id}/assign/"),
            &AssignRequest { user_id },
        )?)
        .await
}

/// Assign several leads to one user.
///
/// # Errors
///
/// Propagates any [`ApiError`].
pub async fn bulk_assign(client: &ApiClient, lead_ids: Vec<i64>, user_id: i64) -> Result<(), ApiError> {
    client
        .fetch_unit(ApiRequest::json(
            Method::Post,
            "leads/bulk_assign/",
            &BulkAssignRequest { lead_ids, user_id },
        )?)
        .await
}

/// Attach a document to a lead.
///
/// # Errors
///
/// Propagates any [`ApiError`].
pub async fn upload_document(
    client: &ApiClient,
    lead_id: i64,
    file: UploadFile,
) -> Result<LeadDocument, ApiError> {
    let parts = vec![
        FormPart::Text {
            name: "lead".to_string(),
            value: lead_id.to_string(),
        },
        FormPart::File {
            name: "file_path".to_string(),
            file_name: file.file_name,
            content_type: file.content_type,
            bytes: file.bytes,
        },
    ];
    client
        .fetch(ApiRequest::multipart("documents/", parts))
        .await
}

/// Remove a document.
///
/// # Errors
///
/// Propagates any [`ApiError`].
pub async fn delete_document(client: &ApiClient, document_id: i64) -> Result<(), ApiError> {
    client
        .fetch_unit(ApiRequest::delete(format!("documents/{document_id}/")))
        .await
}

/// Notes for a lead.
///
/// # Errors
///
/// Propagates any [`ApiError`].
pub async fn notes(client: &ApiClient, lead_id: i64) -> Result<Vec<Note>, ApiError> {
    client
        .fetch(ApiRequest::get("notes/").query("lead", lead_id.to_string()))
        .await
}

/// Add a note to a lead.
///
/// # Errors
///
/// Propagates any [`ApiError`].
pub async fn create_note(client: &ApiClient, lead_id: i64, content: &str) -> Result<Note, ApiError> {
    let note = Note {
        id: None,
        lead: lead_id,
        content: content.to_string(),
        author_name: None,
        created_at: None,
    };
    client
        .fetch(ApiRequest::json(Method::Post, "notes/", &note)?)
        .await
}

/// Users a lead can be assigned to.
///
/// # Errors
///
/// Propagates any [`ApiError`].
pub async fn users(client: &ApiClient) -> Result<Vec<UserSummary>, ApiError> {
    client.fetch(ApiRequest::get("users/")).await
}

/// Download the CSV export for the current team/search filter.
///
/// # Errors
///
/// Propagates any [`ApiError`].
pub async fn export_csv(client: &ApiClient, query: &LeadQuery) -> Result<Vec<u8>, ApiError> {
    client
        .fetch_bytes(query.apply(ApiRequest::get("leads/export_csv/"), false))
        .await
}

//! Lead detail state and the mutations behind its panels.
//!
//! # Design
//! - The lead record owns stage, assignee and documents; mutations touching
//!   them refetch the lead rather than patching it locally.
//! - Notes and tasks are prepended locally once the server accepts them.
//! - Mutations return `Ok(false)` when there is nothing to send.

use crate::services::api::ApiClient;
use crate::services::error::ApiError;
use crate::services::leads::{self, UploadFile};
use crate::services::{pipeline, tasks};
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use crm_api_models::{
    CurrentUser, Lead, LeadFinancialsPatch, LeadGeneratorPatch, LeadStage, NewTask, Note,
    TaskPriority, TaskStatus, TaskStatusPatch, Task, TechPipeline,
};
use tracing::warn;
use url::Url;

/// Toast after a failed stage change.
pub const STAGE_FAILED_MESSAGE: &str = "Failed to change stage";
/// Toast after a single-lead assignment.
pub const ASSIGNED_MESSAGE: &str = "Lead assigned";
/// Toast after a failed single-lead assignment.
pub const ASSIGN_FAILED_MESSAGE: &str = "Failed to assign lead";
/// Toast after saving financials.
pub const FINANCIALS_UPDATED_MESSAGE: &str = "Financials updated";
/// Toast after a failed financials update.
pub const FINANCIALS_FAILED_MESSAGE: &str = "Failed to update financials";
/// Toast after changing the lead generator.
pub const GENERATOR_UPDATED_MESSAGE: &str = "Lead Generator updated";
/// Toast after a failed lead generator change.
pub const GENERATOR_FAILED_MESSAGE: &str = "Failed to update lead generator";
/// Toast after creating a task.
pub const TASK_CREATED_MESSAGE: &str = "Task created";
/// Toast after a failed task creation.
pub const TASK_CREATE_FAILED_MESSAGE: &str = "Failed to create task";
/// Toast after a failed task status toggle.
pub const TASK_STATUS_FAILED_MESSAGE: &str = "Failed to update task status";
/// Toast after an upload.
pub const UPLOADED_MESSAGE: &str = "Document uploaded successfully";
/// Toast after a failed upload.
pub const UPLOAD_FAILED_MESSAGE: &str = "Failed to upload document";
/// Toast after a failed document removal.
pub const DELETE_FAILED_MESSAGE: &str = "Failed to delete document.";
/// Toast after a failed note save.
pub const NOTE_FAILED_MESSAGE: &str = "Failed to save note";

/// Everything the detail page shows for one lead.
#[derive(Clone, Debug, PartialEq, Default)]
pub struct LeadDetail {
    /// The lead, once loaded.
    pub lead: Option<Lead>,
    /// Notes, newest first.
    pub notes: Vec<Note>,
    /// Tasks linked to the lead, newest first.
    pub tasks: Vec<Task>,
    /// Delivery pipeline for won leads.
    pub pipeline: Option<TechPipeline>,
}

impl LeadDetail {
    /// Id of the loaded lead.
    #[must_use]
    pub fn lead_id(&self) -> Option<i64> {
        self.lead.as_ref().map(|lead| lead.id)
    }

    /// Position of the current stage in the column order.
    #[must_use]
    pub fn stage_index(&self) -> Option<usize> {
        let stage = self.lead.as_ref()?.stage;
        LeadStage::ALL.iter().position(|candidate| *candidate == stage)
    }
}

/// Load a lead with its tasks, notes and pipeline.
///
/// Only the lead itself is required; the side panels degrade to empty.
///
/// # Errors
///
/// Propagates the failure to fetch the lead.
pub async fn load(client: &ApiClient, id: i64) -> Result<LeadDetail, ApiError> {
    let lead = leads::get(client, id).await?;
    let tasks = match tasks::list(client, &[("lead", id.to_string())]).await {
        Ok(tasks) => tasks,
        Err(err) => {
            warn!(error = %err, lead = id, "failed to load lead tasks");
            Vec::new()
        }
    };
    let notes = match leads::notes(client, id).await {
        Ok(notes) => notes,
        Err(err) => {
            warn!(error = %err, lead = id, "failed to load lead notes");
            Vec::new()
        }
    };
    let pipeline = match lead.tech_pipeline_id {
        Some(pipeline_id) => match pipeline::get(client, pipeline_id).await {
            Ok(pipeline) => Some(pipeline),
            Err(err) => {
                warn!(error = %err, pipeline = pipeline_id, "failed to load tech pipeline");
                None
            }
        },
        None => None,
    };
    Ok(LeadDetail {
        lead: Some(lead),
        notes,
        tasks,
        pipeline,
    })
}

async fn refetch(client: &ApiClient, detail: &mut LeadDetail, id: i64) -> Result<(), ApiError> {
    detail.lead = Some(leads::get(client, id).await?);
    Ok(())
}

/// Toast after a successful stage change.
#[must_use]
pub fn stage_changed_message(stage: LeadStage) -> String {
    format!("Lead moved to {}", stage.as_str())
}

/// Transition the lead with an optional audit note, then refetch it.
///
/// # Errors
///
/// Propagates the transition or refetch failure.
pub async fn change_stage(
    client: &ApiClient,
    detail: &mut LeadDetail,
    stage: LeadStage,
    note: &str,
) -> Result<bool, ApiError> {
    let Some(id) = detail.lead_id() else {
        return Ok(false);
    };
    leads::transition(client, id, stage, note).await?;
    refetch(client, detail, id).await?;
    Ok(true)
}

/// Assign the lead to one user, then refetch it.
///
/// # Errors
///
/// Propagates the assignment or refetch failure.
pub async fn assign(client: &ApiClient, detail: &mut LeadDetail, user_id: i64) -> Result<bool, ApiError> {
    let Some(id) = detail.lead_id() else {
        return Ok(false);
    };
    leads::assign(client, id, user_id).await?;
    refetch(client, detail, id).await?;
    Ok(true)
}

/// Replace project and advance amounts.
///
/// # Errors
///
/// Propagates the patch failure.
pub async fn update_financials(
    client: &ApiClient,
    detail: &mut LeadDetail,
    patch: LeadFinancialsPatch,
) -> Result<bool, ApiError> {
    let Some(id) = detail.lead_id() else {
        return Ok(false);
    };
    detail.lead = Some(leads::update(client, id, &patch).await?);
    Ok(true)
}

/// Set or clear the lead generator.
///
/// # Errors
///
/// Propagates the patch failure.
pub async fn set_lead_generator(
    client: &ApiClient,
    detail: &mut LeadDetail,
    user_id: Option<i64>,
) -> Result<bool, ApiError> {
    let Some(id) = detail.lead_id() else {
        return Ok(false);
    };
    let patch = LeadGeneratorPatch {
        lead_generator: user_id,
    };
    detail.lead = Some(leads::update(client, id, &patch).await?);
    Ok(true)
}

/// Save a note; blank content is ignored.
///
/// # Errors
///
/// Propagates the create failure.
pub async fn add_note(client: &ApiClient, detail: &mut LeadDetail, content: &str) -> Result<bool, ApiError> {
    let Some(id) = detail.lead_id() else {
        return Ok(false);
    };
    if content.trim().is_empty() {
        return Ok(false);
    }
    let note = leads::create_note(client, id, content).await?;
    detail.notes.insert(0, note);
    Ok(true)
}

/// Create a task linked to the lead; a blank subject is ignored.
///
/// # Errors
///
/// Propagates the create failure.
pub async fn create_task(
    client: &ApiClient,
    detail: &mut LeadDetail,
    subject: &str,
    deadline: Option<DateTime<Utc>>,
) -> Result<bool, ApiError> {
    let Some(lead) = detail.lead.as_ref() else {
        return Ok(false);
    };
    if subject.trim().is_empty() {
        return Ok(false);
    }
    let body = NewTask {
        subject: subject.to_string(),
        deadline,
        status: TaskStatus::NotStarted,
        priority: TaskPriority::Normal,
        description: format!("Task for Lead: {}", lead.full_name()),
        lead: Some(lead.id),
    };
    let task = tasks::create(client, &body).await?;
    detail.tasks.insert(0, task);
    Ok(true)
}

/// Status a task flips to from the lead page checkbox.
#[must_use]
pub fn next_task_status(status: TaskStatus) -> TaskStatus {
    if status == TaskStatus::Completed {
        TaskStatus::NotStarted
    } else {
        TaskStatus::Completed
    }
}

/// Toast after a task status toggle.
#[must_use]
pub fn task_status_message(status: TaskStatus) -> String {
    format!("Task marked as {}", status.label())
}

/// Flip a task between completed and not started.
///
/// Returns the status the server stored, or `None` for an unknown task.
///
/// # Errors
///
/// Propagates the patch failure.
pub async fn toggle_task(
    client: &ApiClient,
    detail: &mut LeadDetail,
    task_id: i64,
) -> Result<Option<TaskStatus>, ApiError> {
    let Some(current) = detail
        .tasks
        .iter()
        .find(|task| task.id == Some(task_id))
        .map(|task| task.status)
    else {
        return Ok(None);
    };
    let patch = TaskStatusPatch {
        status: next_task_status(current),
    };
    let updated = tasks::update(client, task_id, &patch).await?;
    if let Some(task) = detail.tasks.iter_mut().find(|task| task.id == Some(task_id)) {
        task.status = updated.status;
    }
    Ok(Some(updated.status))
}

/// Upload a document, then refetch the lead for its new list.
///
/// # Errors
///
/// Propagates the upload or refetch failure.
pub async fn upload(client: &ApiClient, detail: &mut LeadDetail, file: UploadFile) -> Result<bool, ApiError> {
    let Some(id) = detail.lead_id() else {
        return Ok(false);
    };
    leads::upload_document(client, id, file).await?;
    refetch(client, detail, id).await?;
    Ok(true)
}

/// Delete a document, then refetch the lead.
///
/// # Errors
///
/// Propagates the delete or refetch failure.
pub async fn delete_document(
    client: &ApiClient,
    detail: &mut LeadDetail,
    document_id: i64,
) -> Result<bool, ApiError> {
    let Some(id) = detail.lead_id() else {
        return Ok(false);
    };
    leads::delete_document(client, document_id).await?;
    refetch(client, detail, id).await?;
    Ok(true)
}

/// Managers and superusers may edit financials and the lead generator.
#[must_use]
pub fn can_edit(user: Option<&CurrentUser>) -> bool {
    user.is_some_and(|user| user.is_manager || user.is_superuser)
}

/// Link for a stored document, relative to the site so the media proxy serves it.
#[must_use]
pub fn document_url(path: &str) -> String {
    if path.is_empty() {
        return "#".to_string();
    }
    if path.starts_with("http") {
        if let Ok(url) = Url::parse(path) {
            return url.path().to_string();
        }
        warn!(path, "invalid document url");
    }
    if path.starts_with("/media/") {
        path.to_string()
    } else {
        format!("/media/{path}")
    }
}

/// Avatar initials from first and last name.
#[must_use]
pub fn initials(first_name: &str, last_name: &str) -> String {
    first_name
        .chars()
        .next()
        .into_iter()
        .chain(last_name.chars().next())
        .collect()
}

/// Parse a `datetime-local` or `date` input value as UTC.
#[must_use]
pub fn parse_deadline(value: &str) -> Option<DateTime<Utc>> {
    let value = value.trim();
    if let Ok(stamp) = NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M") {
        return Some(stamp.and_utc());
    }
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|stamp| stamp.and_utc())
}

/// Parse an amount field; blank reads as zero.
#[must_use]
pub fn parse_amount(value: &str) -> Option<f64> {
    let value = value.trim();
    if value.is_empty() {
        return Some(0.0);
    }
    value
        .parse::<f64>()
        .ok()
        .filter(|amount| amount.is_finite() && *amount >= 0.0)
}

#![forbid(unsafe_code)]
#![warn(
    unused,
    unused_imports,
    unused_must_use,
    unreachable_pub,
    clippy::all,
    clippy::pedantic,
    rustdoc::broken_intra_doc_links,
    missing_docs
)]
#![allow(clippy::module_name_repetitions)]
//! Shared HTTP DTOs for the CRM REST API.
//!
//! The backend owns every lifecycle rule; these records only mirror the JSON
//! shapes it emits so the web client can decode and re-encode them without
//! carrying its own invariants.

use std::fmt::{self, Display, Formatter};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Sales lifecycle phase of a lead, in board column order.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LeadStage {
    /// Fresh inbound inquiry.
    NewInquiry,
    /// Qualifying budget and fit.
    Qualification,
    /// Requirements discovery.
    Discovery,
    /// Proposal sent.
    Proposal,
    /// Commercial negotiation.
    Negotiation,
    /// Deal closed and won.
    Won,
    /// Delivery in progress.
    ProjectExecution,
    /// Project delivered.
    Delivered,
    /// Deal lost.
    Lost,
    /// Parked for later.
    OnHold,
}

impl LeadStage {
    /// Every stage in board column order.
    pub const ALL: [Self; 10] = [
        Self::NewInquiry,
        Self::Qualification,
        Self::Discovery,
        Self::Proposal,
        Self::Negotiation,
        Self::Won,
        Self::ProjectExecution,
        Self::Delivered,
        Self::Lost,
        Self::OnHold,
    ];

    /// Wire value sent to and received from the API.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::NewInquiry => "NEW_INQUIRY",
            Self::Qualification => "QUALIFICATION",
            Self::Discovery => "DISCOVERY",
            Self::Proposal => "PROPOSAL",
            Self::Negotiation => "NEGOTIATION",
            Self::Won => "WON",
            Self::ProjectExecution => "PROJECT_EXECUTION",
            Self::Delivered => "DELIVERED",
            Self::Lost => "LOST",
            Self::OnHold => "ON_HOLD",
        }
    }

    /// Column heading shown on the board.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::NewInquiry => "New Inquiry",
            Self::Qualification => "Qualification",
            Self::Discovery => "Discovery",
            Self::Proposal => "Proposal",
            Self::Negotiation => "Negotiation",
            Self::Won => "Won",
            Self::ProjectExecution => "Project Execution",
            Self::Delivered => "Delivered",
            Self::Lost => "Lost",
            Self::OnHold => "On Hold",
        }
    }

    /// Parse a wire value, tolerating lower-case input.
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        let upper = value.trim().to_ascii_uppercase();
        Self::ALL.into_iter().find(|stage| stage.as_str() == upper)
    }
}

impl Display for LeadStage {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.as_str())
    }
}

/// Phase of the delivery pipeline attached to a won lead.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TechPipelineStage {
    /// Scoping and planning.
    Planning,
    /// Design work.
    Designing,
    /// Implementation.
    Executing,
    /// Internal review.
    Review,
    /// Testing and acceptance.
    Testing,
}

impl TechPipelineStage {
    /// Every stage in board column order.
    pub const ALL: [Self; 5] = [
        Self::Planning,
        Self::Designing,
        Self::Executing,
        Self::Review,
        Self::Testing,
    ];

    /// Wire value sent to and received from the API.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Planning => "PLANNING",
            Self::Designing => "DESIGNING",
            Self::Executing => "EXECUTING",
            Self::Review => "REVIEW",
            Self::Testing => "TESTING",
        }
    }

    /// Column heading shown on the board.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Planning => "Planning",
            Self::Designing => "Designing",
            Self::Executing => "Executing",
            Self::Review => "Review",
            Self::Testing => "Testing",
        }
    }

    /// Parse a wire value, tolerating lower-case input.
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        let upper = value.trim().to_ascii_uppercase();
        Self::ALL.into_iter().find(|stage| stage.as_str() == upper)
    }
}

impl Display for TechPipelineStage {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.as_str())
    }
}

/// Organisational team a user or lead belongs to.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TeamCode {
    /// Sales team.
    Sales,
    /// Administration team.
    Admin,
    /// Technical delivery team.
    Tech,
}

impl TeamCode {
    /// Teams in form order.
    pub const ALL: [Self; 3] = [Self::Sales, Self::Admin, Self::Tech];

    /// Parse a wire value.
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        let upper = value.trim().to_ascii_uppercase();
        Self::ALL.into_iter().find(|team| team.as_str() == upper)
    }

    /// Wire value used in query strings.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Sales => "SALES",
            Self::Admin => "ADMIN",
            Self::Tech => "TECH",
        }
    }
}

/// Decimal amount as rendered by the backend.
///
/// The API serialises decimals as strings (`"1500.00"`) but older fixtures
/// use bare numbers; both decode into the same value.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Default)]
#[serde(transparent)]
pub struct Amount(pub f64);

impl<'de> Deserialize<'de> for Amount {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Number(f64),
            Text(String),
        }

        match Raw::deserialize(deserializer)? {
            Raw::Number(value) => Ok(Self(value)),
            Raw::Text(text) => text
                .trim()
                .parse::<f64>()
                .map(Self)
                .map_err(|_| serde::de::Error::custom(format!("invalid decimal '{text}'"))),
        }
    }
}

/// Uploaded file attached to a lead.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LeadDocument {
    /// Document identifier.
    pub id: i64,
    /// Owning lead, when echoed by the endpoint.
    #[serde(default)]
    pub lead: Option<i64>,
    /// Original file name.
    #[serde(default)]
    pub name: String,
    /// Server-side storage path or URL.
    pub file_path: String,
    /// Upload timestamp.
    pub uploaded_at: DateTime<Utc>,
}

/// Stage transition entry recorded by the backend.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AuditLog {
    /// Audit entry identifier.
    pub id: i64,
    /// Username of the acting user.
    #[serde(default)]
    pub actor_name: Option<String>,
    /// Action verb (e.g. `TRANSITION`).
    pub action: String,
    /// Stage before the change.
    #[serde(default)]
    pub from_stage: Option<String>,
    /// Stage after the change.
    #[serde(default)]
    pub to_stage: Option<String>,
    /// When the change happened.
    pub timestamp: DateTime<Utc>,
    /// Free-form notes.
    #[serde(default)]
    pub notes: Option<String>,
}

/// A sales lead.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Lead {
    /// Lead identifier.
    pub id: i64,
    /// Contact first name.
    pub first_name: String,
    /// Contact last name.
    pub last_name: String,
    /// Contact email.
    pub email: String,
    /// Contact phone.
    pub phone: String,
    /// Company name.
    #[serde(default)]
    pub company_name: Option<String>,
    /// Free-form technical requirements.
    #[serde(default)]
    pub tech_requirements: Option<String>,
    /// Total project value.
    #[serde(default)]
    pub project_amount: Option<Amount>,
    /// Advance already received.
    #[serde(default)]
    pub advance_amount: Option<Amount>,
    /// Outstanding balance computed by the backend.
    #[serde(default)]
    pub remaining_amount: Option<Amount>,
    /// Current lifecycle stage.
    pub stage: LeadStage,
    /// Team owning the lead.
    pub assigned_team: TeamCode,
    /// Assignee user id.
    #[serde(default)]
    pub assigned_to: Option<i64>,
    /// Assignee username.
    #[serde(default)]
    pub assigned_to_name: Option<String>,
    /// User who brought the lead in.
    #[serde(default)]
    pub lead_generator: Option<i64>,
    /// Username of the lead generator.
    #[serde(default)]
    pub lead_generator_name: Option<String>,
    /// Linked delivery pipeline, once the lead is won.
    #[serde(default)]
    pub tech_pipeline_id: Option<i64>,
    /// Last contact timestamp.
    #[serde(default)]
    pub last_contacted: Option<DateTime<Utc>>,
    /// Scheduled follow-up.
    #[serde(default)]
    pub next_followup: Option<DateTime<Utc>>,
    /// Attached documents.
    #[serde(default)]
    pub documents: Vec<LeadDocument>,
    /// Stage history.
    #[serde(default)]
    pub audit_logs: Vec<AuditLog>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}

impl Lead {
    /// `"first last"` as shown on cards.
    #[must_use]
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

/// Delivery pipeline record for a won lead.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TechPipeline {
    /// Pipeline identifier.
    pub id: i64,
    /// Lead the pipeline belongs to.
    pub lead: i64,
    /// Display name of the lead.
    #[serde(default)]
    pub lead_name: Option<String>,
    /// Current delivery stage.
    pub stage: TechPipelineStage,
    /// Free-form delivery notes.
    #[serde(default)]
    pub notes: Option<String>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}

/// Progress of a task.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum TaskStatus {
    /// Not yet picked up.
    #[serde(rename = "Not Started")]
    NotStarted,
    /// Being worked on.
    #[serde(rename = "In Progress")]
    InProgress,
    /// Done.
    #[serde(rename = "Completed")]
    Completed,
    /// Postponed.
    #[serde(rename = "Deferred")]
    Deferred,
}

impl TaskStatus {
    /// Human-readable label (identical to the wire value).
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::NotStarted => "Not Started",
            Self::InProgress => "In Progress",
            Self::Completed => "Completed",
            Self::Deferred => "Deferred",
        }
    }
}

/// Urgency of a task.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum TaskPriority {
    /// Low urgency.
    Low,
    /// Default urgency.
    Normal,
    /// High urgency.
    High,
    /// Needs attention now.
    Urgent,
}

/// A unit of work owned by a user.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Task {
    /// Task identifier (absent before creation).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    /// Short summary.
    pub subject: String,
    /// Due date.
    #[serde(default)]
    pub deadline: Option<DateTime<Utc>>,
    /// Progress state.
    pub status: TaskStatus,
    /// Urgency.
    pub priority: TaskPriority,
    /// Linked deal.
    #[serde(default)]
    pub deal: Option<i64>,
    /// Linked contact.
    #[serde(default)]
    pub contact: Option<i64>,
    /// Linked lead.
    #[serde(default)]
    pub lead: Option<i64>,
    /// Owning user.
    #[serde(default)]
    pub owner: Option<i64>,
    /// Owner username.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub owner_name: Option<String>,
    /// Owner team.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub owner_team: Option<String>,
    /// Longer description.
    #[serde(default)]
    pub description: String,
    /// Creation timestamp.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

/// Origin of a follow-up reminder.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ReminderType {
    /// Generated by the scheduler.
    Auto,
    /// Created by a user.
    Manual,
}

/// Lifecycle of a follow-up reminder.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ReminderStatus {
    /// Still open.
    Pending,
    /// Done.
    Completed,
    /// Dismissed without action.
    Dismissed,
}

impl ReminderStatus {
    /// Wire value used in query strings.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "PENDING",
            Self::Completed => "COMPLETED",
            Self::Dismissed => "DISMISSED",
        }
    }
}

/// Follow-up reminder for a lead.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Reminder {
    /// Reminder identifier.
    pub id: i64,
    /// Lead to follow up.
    pub lead: i64,
    /// Display name of the lead.
    #[serde(default)]
    pub lead_name: Option<String>,
    /// Assignee user id.
    pub assigned_to: i64,
    /// Assignee username.
    #[serde(default)]
    pub assigned_to_name: Option<String>,
    /// Origin of the reminder.
    pub reminder_type: ReminderType,
    /// Lifecycle state.
    pub status: ReminderStatus,
    /// Whether the assignee has seen it.
    pub is_read: bool,
    /// Due date.
    pub due_date: DateTime<Utc>,
    /// Reminder text.
    #[serde(default)]
    pub message: String,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Completion timestamp.
    #[serde(default)]
    pub completed_at: Option<DateTime<Utc>>,
}

/// Payload for creating a manual reminder.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct NewReminder {
    /// Lead to follow up.
    pub lead: i64,
    /// Assignee user id.
    pub assigned_to: i64,
    /// Due date.
    pub due_date: DateTime<Utc>,
    /// Reminder text.
    pub message: String,
    /// Always `MANUAL` for user-created reminders.
    pub reminder_type: ReminderType,
}

/// Aggregate reminder counters.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct ReminderStats {
    /// Pending reminders.
    pub total_pending: u32,
    /// Unread reminders.
    pub unread_count: u32,
    /// Pending and past due.
    pub overdue: u32,
    /// Due today.
    pub today: u32,
    /// Due later.
    pub upcoming: u32,
    /// Completed reminders.
    pub completed: u32,
}

/// In-app notification.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Notification {
    /// Notification identifier.
    pub id: i64,
    /// Notification text.
    pub message: String,
    /// Whether the recipient has seen it.
    pub is_read: bool,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Related task.
    #[serde(default)]
    pub task: Option<i64>,
    /// Related task subject.
    #[serde(default)]
    pub task_subject: Option<String>,
    /// Related lead.
    #[serde(default)]
    pub lead: Option<i64>,
    /// Related lead name.
    #[serde(default)]
    pub lead_name: Option<String>,
    /// Sending user.
    #[serde(default)]
    pub sender: Option<i64>,
    /// Sending username.
    #[serde(default)]
    pub sender_name: Option<String>,
}

/// Response of the unread counter endpoint.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct UnreadCount {
    /// Unread notifications.
    pub count: u32,
}

/// Generic acknowledgement body returned by action endpoints.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct MessageResponse {
    /// Human-readable acknowledgement.
    #[serde(default)]
    pub message: Option<String>,
}

/// Authenticated user with capability flags.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CurrentUser {
    /// User identifier.
    pub id: i64,
    /// Login name.
    pub username: String,
    /// Email address.
    #[serde(default)]
    pub email: String,
    /// Team membership.
    #[serde(default)]
    pub team: Option<TeamCode>,
    /// Manager flag.
    #[serde(default)]
    pub is_manager: bool,
    /// Superuser flag.
    #[serde(default)]
    pub is_superuser: bool,
    /// May see every lead.
    #[serde(default)]
    pub view_all_leads: bool,
    /// May open the tech pipeline board.
    #[serde(default)]
    pub view_tech_pipeline: bool,
    /// May move tech pipeline cards.
    #[serde(default)]
    pub manage_tech_pipeline: bool,
    /// May create leads.
    #[serde(default)]
    pub can_create_leads: bool,
    /// May delete leads.
    #[serde(default)]
    pub can_delete_leads: bool,
    /// May export leads as CSV.
    #[serde(default)]
    pub can_export_leads: bool,
    /// Role names.
    #[serde(default)]
    pub roles: Vec<String>,
    /// Monthly revenue threshold.
    #[serde(default)]
    pub revenue_threshold: Option<Amount>,
}

/// Row in the admin user listing; same shape as the `users/me/` payload.
pub type UserSummary = CurrentUser;

/// Member row in a team listing.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TeamMember {
    /// User identifier.
    pub id: i64,
    /// Login name.
    pub username: String,
    /// Email address.
    #[serde(default)]
    pub email: String,
    /// Team code.
    #[serde(default)]
    pub team: String,
    /// Open task count, when computed by the caller.
    #[serde(default)]
    pub pending_task_count: Option<u32>,
}

/// Team choice returned by the teams endpoint.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TeamOption {
    /// Wire value (e.g. `SALES`).
    pub value: String,
    /// Display label.
    pub label: String,
}

/// RBAC permission.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Permission {
    /// Permission identifier.
    pub id: i64,
    /// Machine name.
    pub codename: String,
    /// Display name.
    pub name: String,
}

/// RBAC role.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Role {
    /// Role identifier.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    /// Role name.
    pub name: String,
    /// Role description.
    #[serde(default)]
    pub description: String,
    /// Granted permissions (read side).
    #[serde(default, skip_serializing)]
    pub permissions: Vec<Permission>,
    /// Granted permission ids (write side).
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub permission_ids: Vec<i64>,
}

/// Lead note.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Note {
    /// Note identifier.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    /// Lead the note belongs to.
    pub lead: i64,
    /// Note body.
    pub content: String,
    /// Author username.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author_name: Option<String>,
    /// Creation timestamp.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

/// Credentials posted to the token endpoint.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct LoginRequest {
    /// Login name.
    pub username: String,
    /// Password.
    pub password: String,
}

/// Access/refresh pair issued on login.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TokenPair {
    /// Short-lived bearer token.
    pub access: String,
    /// Long-lived refresh token.
    pub refresh: String,
}

/// Body posted to the refresh endpoint.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RefreshRequest {
    /// Refresh token.
    pub refresh: String,
}

/// Access token issued on refresh.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AccessToken {
    /// Short-lived bearer token.
    pub access: String,
}

/// Password change payload.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ChangePasswordRequest {
    /// Current password.
    pub old_password: String,
    /// Replacement password.
    pub new_password: String,
}

/// Lead stage transition payload.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TransitionRequest {
    /// Target stage.
    pub stage: LeadStage,
    /// Audit note recorded with the move.
    pub notes: String,
}

/// Tech pipeline stage patch.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct PipelineStagePatch {
    /// Target stage.
    pub stage: TechPipelineStage,
}

/// Tech pipeline notes patch.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PipelineNotesPatch {
    /// Replacement notes.
    pub notes: String,
}

/// Single lead assignment payload.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct AssignRequest {
    /// Assignee user id.
    pub user_id: i64,
}

/// Payload for creating a lead.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct NewLead {
    /// Contact first name.
    pub first_name: String,
    /// Contact last name.
    pub last_name: String,
    /// Contact email.
    pub email: String,
    /// Contact phone.
    pub phone: String,
    /// Company name.
    pub company_name: String,
    /// Free-form technical requirements.
    pub tech_requirements: String,
    /// Starting stage.
    pub stage: LeadStage,
    /// Owning team.
    pub assigned_team: TeamCode,
    /// User who brought the lead in.
    pub lead_generator: Option<i64>,
}

impl Default for NewLead {
    fn default() -> Self {
        Self {
            first_name: String::new(),
            last_name: String::new(),
            email: String::new(),
            phone: String::new(),
            company_name: String::new(),
            tech_requirements: String::new(),
            stage: LeadStage::NewInquiry,
            assigned_team: TeamCode::Admin,
            lead_generator: None,
        }
    }
}

/// Financials patch for a lead.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct LeadFinancialsPatch {
    /// Total project value.
    pub project_amount: f64,
    /// Advance already received.
    pub advance_amount: f64,
}

/// Lead generator patch; `None` clears it.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct LeadGeneratorPatch {
    /// User who brought the lead in.
    pub lead_generator: Option<i64>,
}

/// Payload for creating a task.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct NewTask {
    /// Short summary.
    pub subject: String,
    /// Due date.
    pub deadline: Option<DateTime<Utc>>,
    /// Initial progress state.
    pub status: TaskStatus,
    /// Urgency.
    pub priority: TaskPriority,
    /// Longer description.
    pub description: String,
    /// Linked lead.
    pub lead: Option<i64>,
}

/// Task status patch.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct TaskStatusPatch {
    /// New progress state.
    pub status: TaskStatus,
}

/// Bulk lead assignment payload.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct BulkAssignRequest {
    /// Leads to reassign.
    pub lead_ids: Vec<i64>,
    /// Assignee user id.
    pub user_id: i64,
}

/// Role replacement payload for a user.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct UserRolesPatch {
    /// Role ids to grant.
    pub role_ids: Vec<i64>,
}

/// Revenue threshold update payload.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct ThresholdRequest {
    /// New monthly threshold.
    pub threshold: f64,
}

/// Error body emitted by the backend (`{"detail": "..."}`).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct ErrorBody {
    /// Human-readable reason.
    #[serde(default)]
    pub detail: Option<String>,
}

/// Free-form report payload; charts consume it as-is.
pub type ReportPayload = Value;

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn lead_decodes_string_and_numeric_amounts() {
        let lead: Lead = serde_json::from_value(json!({
            "id": 7,
            "first_name": "Ada",
            "last_name": "Lovelace",
            "email": "ada@example.com",
            "phone": "+971500000000",
            "project_amount": "1500.50",
            "advance_amount": 500,
            "stage": "PROPOSAL",
            "assigned_team": "SALES",
            "created_at": "2024-05-01T10:00:00Z",
            "updated_at": "2024-05-02T10:00:00+04:00"
        }))
        .expect("lead should decode");

        assert_eq!(lead.stage, LeadStage::Proposal);
        assert_eq!(lead.project_amount, Some(Amount(1500.5)));
        assert_eq!(lead.advance_amount, Some(Amount(500.0)));
        assert!(lead.documents.is_empty());
        assert_eq!(lead.full_name(), "Ada Lovelace");
    }

    #[test]
    fn invalid_amount_text_is_rejected() {
        let result = serde_json::from_value::<Amount>(json!("twelve"));
        assert!(result.is_err());
    }

    #[test]
    fn stage_wire_values_match_labels_order() {
        assert_eq!(LeadStage::ALL.first(), Some(&LeadStage::NewInquiry));
        assert_eq!(LeadStage::ALL.last(), Some(&LeadStage::OnHold));
        assert_eq!(
            serde_json::to_value(LeadStage::ProjectExecution).expect("encode"),
            json!("PROJECT_EXECUTION")
        );
        assert_eq!(LeadStage::parse("on_hold"), Some(LeadStage::OnHold));
        assert_eq!(LeadStage::parse("archived"), None);
        assert_eq!(TechPipelineStage::Review.label(), "Review");
    }

    #[test]
    fn task_status_uses_spaced_wire_names() {
        let task: Task = serde_json::from_value(json!({
            "subject": "Call back",
            "status": "In Progress",
            "priority": "High",
            "description": ""
        }))
        .expect("task should decode");
        assert_eq!(task.status, TaskStatus::InProgress);
        assert_eq!(task.id, None);
        let encoded = serde_json::to_value(&task).expect("encode");
        assert!(encoded.get("id").is_none());
        assert_eq!(encoded["status"], json!("In Progress"));
    }

    #[test]
    fn role_writes_permission_ids_only() {
        let role = Role {
            id: None,
            name: "Auditor".into(),
            description: String::new(),
            permissions: vec![Permission {
                id: 1,
                codename: "view_lead".into(),
                name: "View lead".into(),
            }],
            permission_ids: vec![1],
        };
        let encoded = serde_json::to_value(&role).expect("encode");
        assert!(encoded.get("permissions").is_none());
        assert_eq!(encoded["permission_ids"], json!([1]));
    }

    #[test]
    fn new_lead_defaults_to_admin_inquiry_with_null_generator() {
        let encoded = serde_json::to_value(NewLead::default()).expect("encode");
        assert_eq!(encoded["stage"], json!("NEW_INQUIRY"));
        assert_eq!(encoded["assigned_team"], json!("ADMIN"));
        assert_eq!(encoded["lead_generator"], Value::Null);
    }

    #[test]
    fn team_codes_parse_case_insensitively() {
        assert_eq!(TeamCode::parse(" sales "), Some(TeamCode::Sales));
        assert_eq!(TeamCode::parse("TECH"), Some(TeamCode::Tech));
        assert_eq!(TeamCode::parse("marketing"), None);
    }
}

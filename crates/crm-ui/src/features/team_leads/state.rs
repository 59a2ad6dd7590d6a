//! Team lead list state.
//!
//! # Design
//! - Filters map onto the server-side `LeadQuery`; nothing is filtered locally.
//! - The dashboard's `unassigned=true` link overrides the tab until the user picks one.
//! - Selection is an id set; reloading the list always clears it.

use crate::services::api::ApiClient;
use crate::services::error::ApiError;
use crate::services::leads::{self, LeadQuery};
use crm_api_models::{Lead, LeadStage};
use std::collections::BTreeSet;

/// File name offered for the CSV download.
pub const CSV_FILE_NAME: &str = "leads.csv";
/// Toast shown after a successful bulk assignment.
pub const ASSIGNED_MESSAGE: &str = "Assignment successful";

/// Filter tabs.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum FilterType {
    /// No restriction.
    #[default]
    All,
    /// Leads without an assignee.
    Unassigned,
    /// Leads with an assignee.
    Assigned,
    /// Leads created today.
    NewToday,
}

impl FilterType {
    /// Tabs in display order.
    pub const ALL: [Self; 4] = [Self::All, Self::Unassigned, Self::Assigned, Self::NewToday];

    /// Tab caption.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::All => "All Leads",
            Self::Unassigned => "Unassigned",
            Self::Assigned => "Assigned",
            Self::NewToday => "New Today",
        }
    }
}

/// Page state for the team lead table.
#[derive(Clone, Debug, PartialEq, Default)]
pub struct TeamLeadsState {
    /// Team from the route query, e.g. `SALES`.
    pub team: Option<String>,
    /// Search box contents.
    pub search: String,
    /// Selected tab.
    pub filter: FilterType,
    /// Set by the dashboard link; cleared when a tab is picked.
    pub unassigned_override: bool,
    /// Current rows.
    pub leads: Vec<Lead>,
    /// Selected lead ids.
    pub selected: BTreeSet<i64>,
}

impl TeamLeadsState {
    /// State for a route carrying `team` and `unassigned` query parameters.
    #[must_use]
    pub fn from_route(team: Option<String>, unassigned: bool) -> Self {
        Self {
            team: team.filter(|team| !team.is_empty()),
            unassigned_override: unassigned,
            ..Self::default()
        }
    }

    /// Tab that is actually applied.
    #[must_use]
    pub const fn effective_filter(&self) -> FilterType {
        if self.unassigned_override {
            FilterType::Unassigned
        } else {
            self.filter
        }
    }

    /// Query for `GET leads/`.
    #[must_use]
    pub fn query(&self) -> LeadQuery {
        let filter = self.effective_filter();
        LeadQuery {
            team: self.team.clone(),
            search: Some(self.search.clone()).filter(|search| !search.is_empty()),
            unassigned: filter == FilterType::Unassigned,
            assigned: filter == FilterType::Assigned,
            new_today: filter == FilterType::NewToday,
        }
    }

    /// Pick a tab; drops the dashboard override.
    pub fn set_filter(&mut self, filter: FilterType) {
        self.filter = filter;
        self.unassigned_override = false;
    }

    /// Store a fresh listing and clear the selection.
    pub fn set_leads(&mut self, leads: Vec<Lead>) {
        self.leads = leads;
        self.selected.clear();
    }

    /// Select every row, or clear the selection.
    pub fn toggle_select_all(&mut self, checked: bool) {
        if checked {
            self.selected.extend(self.leads.iter().map(|lead| lead.id));
        } else {
            self.selected.clear();
        }
    }

    /// Flip one row.
    pub fn toggle_selection(&mut self, lead_id: i64) {
        if !self.selected.remove(&lead_id) {
            self.selected.insert(lead_id);
        }
    }

    /// Whether a row is selected.
    #[must_use]
    pub fn is_selected(&self, lead_id: i64) -> bool {
        self.selected.contains(&lead_id)
    }

    /// Header checkbox state.
    #[must_use]
    pub fn all_selected(&self) -> bool {
        !self.leads.is_empty() && self.selected.len() == self.leads.len()
    }

    /// Selected ids in ascending order.
    #[must_use]
    pub fn selected_ids(&self) -> Vec<i64> {
        self.selected.iter().copied().collect()
    }
}

/// Fetch rows for the current filters.
///
/// # Errors
///
/// Propagates any [`ApiError`]; the state is left untouched on failure.
pub async fn reload(client: &ApiClient, state: &mut TeamLeadsState) -> Result<(), ApiError> {
    let rows = leads::list(client, &state.query()).await?;
    state.set_leads(rows);
    Ok(())
}

/// Assign the selection to one user, then reload.
///
/// Does nothing when no user or no lead is selected.
///
/// # Errors
///
/// Propagates the assignment or reload failure.
pub async fn assign_selected(
    client: &ApiClient,
    state: &mut TeamLeadsState,
    user_id: Option<i64>,
) -> Result<bool, ApiError> {
    let Some(user_id) = user_id else {
        return Ok(false);
    };
    if state.selected.is_empty() {
        return Ok(false);
    }
    leads::bulk_assign(client, state.selected_ids(), user_id).await?;
    reload(client, state).await?;
    Ok(true)
}

/// Toast shown when bulk assignment fails.
#[must_use]
pub fn assign_failure_message(err: &ApiError) -> String {
    format!("Failed to assign: {}", err.user_message())
}

/// Badge modifier for a stage cell.
#[must_use]
pub const fn stage_badge(stage: LeadStage) -> &'static str {
    match stage {
        LeadStage::NewInquiry | LeadStage::Qualification | LeadStage::Discovery => "badge-info",
        LeadStage::Proposal | LeadStage::Negotiation | LeadStage::OnHold => "badge-warning",
        LeadStage::Won | LeadStage::ProjectExecution | LeadStage::Delivered => "badge-success",
        LeadStage::Lost => "badge-danger",
    }
}

//! Reminder list and widget state.

use crate::services::api::ApiClient;
use crate::services::error::ApiError;
use crate::services::reminders::{self, ReminderWindow};
use crm_api_models::{Reminder, ReminderStats, ReminderStatus};
use tracing::warn;

/// Toast after completing a reminder from the widget.
pub const COMPLETED_MESSAGE: &str = "Reminder completed";
/// Toast when completion fails.
pub const COMPLETE_FAILED_MESSAGE: &str = "Failed to complete reminder";

/// Tabs on the reminder page.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum ReminderTab {
    /// Every pending reminder.
    #[default]
    All,
    /// Pending reminders due today.
    Today,
}

impl ReminderTab {
    /// Date window sent with the listing.
    #[must_use]
    pub const fn window(self) -> Option<ReminderWindow> {
        match self {
            Self::All => None,
            Self::Today => Some(ReminderWindow::Today),
        }
    }

    /// Tab caption.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::All => "All Pending",
            Self::Today => "Due Today",
        }
    }
}

/// Reminder page state.
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub struct ReminderListState {
    /// Active tab.
    pub tab: ReminderTab,
    /// Pending reminders for the tab.
    pub items: Vec<Reminder>,
    /// Counters, once loaded.
    pub stats: Option<ReminderStats>,
}

/// Outcome of a mark-read request.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MarkOutcome {
    /// Already read; no request sent.
    AlreadyRead,
    /// Marked on the server and locally.
    Marked,
    /// Not in the list.
    Unknown,
}

/// Pending reminders for a tab.
///
/// # Errors
///
/// Propagates any [`ApiError`].
pub async fn load(client: &ApiClient, tab: ReminderTab) -> Result<Vec<Reminder>, ApiError> {
    reminders::list(client, Some(ReminderStatus::Pending), tab.window()).await
}

/// Refresh the counters, logging instead of failing.
pub async fn refresh_stats(client: &ApiClient) -> Option<ReminderStats> {
    match reminders::stats(client).await {
        Ok(stats) => Some(stats),
        Err(err) => {
            warn!(error = %err, "failed to refresh reminder stats");
            None
        }
    }
}

/// Mark a reminder read unless it already is, then refresh the stats.
///
/// # Errors
///
/// Propagates the mark-read failure.
pub async fn mark_read(
    client: &ApiClient,
    state: &mut ReminderListState,
    id: i64,
) -> Result<MarkOutcome, ApiError> {
    match state.items.iter().find(|item| item.id == id) {
        None => return Ok(MarkOutcome::Unknown),
        Some(item) if item.is_read => return Ok(MarkOutcome::AlreadyRead),
        Some(_) => {}
    }
    reminders::mark_read(client, id).await?;
    if let Some(item) = state.items.iter_mut().find(|item| item.id == id) {
        item.is_read = true;
    }
    if let Some(stats) = refresh_stats(client).await {
        state.stats = Some(stats);
    }
    Ok(MarkOutcome::Marked)
}

/// Dashboard widget contents.
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub struct ReminderWidgetState {
    /// Counters.
    pub stats: Option<ReminderStats>,
    /// Pending reminders due today.
    pub today: Vec<Reminder>,
}

/// Load the widget: stats plus today's pending reminders.
///
/// # Errors
///
/// Propagates the listing failure; a stats failure only leaves `stats` empty.
pub async fn load_widget(client: &ApiClient) -> Result<ReminderWidgetState, ApiError> {
    let stats = refresh_stats(client).await;
    let today = load(client, ReminderTab::Today).await?;
    Ok(ReminderWidgetState { stats, today })
}

/// Complete a reminder from the widget and reload it.
///
/// # Errors
///
/// Propagates the completion or reload failure.
pub async fn complete_from_widget(client: &ApiClient, id: i64) -> Result<ReminderWidgetState, ApiError> {
    reminders::complete(client, id).await?;
    load_widget(client).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::testing::{Harness, json_response, session};
    use serde_json::{Value, json};

    fn reminder_json(id: i64, is_read: bool) -> Value {
        json!({
            "id": id,
            "lead": 4,
            "assigned_to": 2,
            "reminder_type": "AUTO",
            "status": "PENDING",
            "is_read": is_read,
            "due_date": "2024-06-12T09:00:00Z",
            "message": "Follow up",
            "created_at": "2024-06-10T09:00:00Z"
        })
    }

    fn stats_json(unread: u32) -> Value {
        json!({
            "total_pending": 2,
            "unread_count": unread,
            "overdue": 0,
            "today": 1,
            "upcoming": 1,
            "completed": 5
        })
    }

    #[tokio::test]
    async fn tabs_always_request_pending_reminders() -> anyhow::Result<()> {
        let harness = Harness::new(Some(session("a1", Some("r1"))));
        harness.transport.push(json_response(200, &json!([])));
        harness.transport.push(json_response(200, &json!([])));

        load(&harness.client, ReminderTab::All).await?;
        load(&harness.client, ReminderTab::Today).await?;

        let calls = harness.transport.calls();
        assert_eq!(calls[0].url, "http://api.test/api/reminders/?status=PENDING");
        assert_eq!(
            calls[1].url,
            "http://api.test/api/reminders/?status=PENDING&filter=today"
        );
        Ok(())
    }

    #[tokio::test]
    async fn mark_read_is_idempotent_and_refreshes_stats() -> anyhow::Result<()> {
        let harness = Harness::new(Some(session("a1", Some("r1"))));
        harness.transport.push(json_response(200, &json!({})));
        harness.transport.push(json_response(200, &stats_json(0)));
        let mut state = ReminderListState {
            items: serde_json::from_value(json!([reminder_json(1, false), reminder_json(2, true)]))?,
            ..ReminderListState::default()
        };

        assert_eq!(mark_read(&harness.client, &mut state, 1).await?, MarkOutcome::Marked);
        assert_eq!(
            mark_read(&harness.client, &mut state, 2).await?,
            MarkOutcome::AlreadyRead
        );

        assert!(state.items.iter().all(|item| item.is_read));
        assert_eq!(state.stats.map(|stats| stats.unread_count), Some(0));
        assert_eq!(harness.hooks.reminders(), vec![0]);
        assert_eq!(harness.transport.calls().len(), 2);
        Ok(())
    }

    #[tokio::test]
    async fn widget_completion_reloads_stats_and_today() -> anyhow::Result<()> {
        let harness = Harness::new(Some(session("a1", Some("r1"))));
        harness.transport.push(json_response(200, &json!({})));
        harness.transport.push(json_response(200, &stats_json(1)));
        harness
            .transport
            .push(json_response(200, &json!([reminder_json(3, false)])));

        let widget = complete_from_widget(&harness.client, 1).await?;

        assert_eq!(widget.today.len(), 1);
        assert_eq!(widget.stats.map(|stats| stats.completed), Some(5));
        let calls = harness.transport.calls();
        assert_eq!(calls[0].url, "http://api.test/api/reminders/1/complete/");
        assert!(calls[2].url.ends_with("reminders/?status=PENDING&filter=today"));
        Ok(())
    }
}

//! Notification list state and read tracking.

use crate::services::api::ApiClient;
use crate::services::error::ApiError;
use crate::services::notifications;
use crm_api_models::Notification;
use tracing::warn;

/// What a mark-read request did.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MarkOutcome {
    /// Item was already read; no request sent.
    AlreadyRead,
    /// Server accepted; item now read locally.
    Marked,
    /// Item is not in the list.
    Unknown,
}

/// Loaded notifications.
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub struct NotificationListState {
    /// Items, newest first as served.
    pub items: Vec<Notification>,
}

impl NotificationListState {
    /// Count of unread items in the local list.
    #[must_use]
    pub fn unread(&self) -> usize {
        self.items.iter().filter(|item| !item.is_read).count()
    }

    fn find(&self, id: i64) -> Option<&Notification> {
        self.items.iter().find(|item| item.id == id)
    }

    fn set_read(&mut self, id: i64) {
        if let Some(item) = self.items.iter_mut().find(|item| item.id == id) {
            item.is_read = true;
        }
    }

    /// Flag every local item as read.
    pub fn mark_all_local(&mut self) {
        for item in &mut self.items {
            item.is_read = true;
        }
    }
}

/// Reload the list.
///
/// # Errors
///
/// Propagates any [`ApiError`].
pub async fn load(client: &ApiClient) -> Result<NotificationListState, ApiError> {
    Ok(NotificationListState {
        items: notifications::list(client).await?,
    })
}

/// Mark one item read unless it already is, then refresh the shared unread counter.
///
/// A failed counter refresh is logged and does not undo the mark.
///
/// # Errors
///
/// Propagates the mark-read failure; the item stays unread.
pub async fn mark_read(
    client: &ApiClient,
    state: &mut NotificationListState,
    id: i64,
) -> Result<MarkOutcome, ApiError> {
    match state.find(id) {
        None => return Ok(MarkOutcome::Unknown),
        Some(item) if item.is_read => return Ok(MarkOutcome::AlreadyRead),
        Some(_) => {}
    }
    notifications::mark_read(client, id).await?;
    state.set_read(id);
    if let Err(err) = notifications::unread_count(client).await {
        warn!(error = %err, "failed to refresh unread notification count");
    }
    Ok(MarkOutcome::Marked)
}

/// Mark everything read on the server and locally.
///
/// # Errors
///
/// Propagates any [`ApiError`]; local items are untouched on failure.
pub async fn mark_all_read(client: &ApiClient, state: &mut NotificationListState) -> Result<(), ApiError> {
    notifications::mark_all_read(client).await?;
    state.mark_all_local();
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::testing::{Harness, json_response, session};
    use serde_json::json;

    fn state() -> NotificationListState {
        let items = serde_json::from_value(json!([
            {"id": 1, "message": "Task assigned", "is_read": false, "created_at": "2024-05-01T10:00:00Z"},
            {"id": 2, "message": "Lead won", "is_read": true, "created_at": "2024-05-01T09:00:00Z"}
        ]))
        .expect("notification fixture");
        NotificationListState { items }
    }

    #[tokio::test]
    async fn marking_twice_sends_one_request_and_stays_read() -> anyhow::Result<()> {
        let harness = Harness::new(Some(session("a1", Some("r1"))));
        harness.transport.push(json_response(200, &json!({})));
        harness.transport.push(json_response(200, &json!({"count": 0})));
        let mut state = state();

        assert_eq!(mark_read(&harness.client, &mut state, 1).await?, MarkOutcome::Marked);
        assert_eq!(
            mark_read(&harness.client, &mut state, 1).await?,
            MarkOutcome::AlreadyRead
        );

        assert_eq!(state.unread(), 0);
        let calls = harness.transport.calls();
        assert_eq!(calls.len(), 2);
        assert_eq!(calls[0].url, "http://api.test/api/notifications/1/mark_read/");
        assert!(calls[1].url.ends_with("notifications/unread_count/"));
        assert_eq!(harness.hooks.notifications(), vec![0]);
        Ok(())
    }

    #[tokio::test]
    async fn counter_refresh_failure_keeps_the_mark() -> anyhow::Result<()> {
        let harness = Harness::new(Some(session("a1", Some("r1"))));
        harness.transport.push(json_response(200, &json!({})));
        harness.transport.push(json_response(500, &json!({})));
        let mut state = state();

        assert_eq!(mark_read(&harness.client, &mut state, 1).await?, MarkOutcome::Marked);
        assert_eq!(state.unread(), 0);
        assert!(harness.hooks.notifications().is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn failed_mark_leaves_item_unread() {
        let harness = Harness::new(Some(session("a1", Some("r1"))));
        harness.transport.push(json_response(500, &json!({})));
        let mut state = state();

        assert!(mark_read(&harness.client, &mut state, 1).await.is_err());
        assert_eq!(state.unread(), 1);
    }

    #[tokio::test]
    async fn mark_all_flags_every_item() -> anyhow::Result<()> {
        let harness = Harness::new(Some(session("a1", Some("r1"))));
        harness.transport.push(json_response(200, &json!({})));
        let mut state = state();

        mark_all_read(&harness.client, &mut state).await?;

        assert!(state.items.iter().all(|item| item.is_read));
        assert_eq!(harness.hooks.notifications(), vec![0]);
        assert_eq!(
            mark_read(&harness.client, &mut state, 99).await?,
            MarkOutcome::Unknown
        );
        Ok(())
    }
}

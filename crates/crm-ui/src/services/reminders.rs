//! Follow-up reminder service.

use crate::services::api::ApiClient;
use crate::services::error::ApiError;
use crate::services::http::{ApiRequest, Method};
use crm_api_models::{NewReminder, Reminder, ReminderStats, ReminderStatus};

/// Date window accepted by the reminder listing.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ReminderWindow {
    /// Due today.
    Today,
    /// Past due.
    Overdue,
    /// Due later.
    Upcoming,
    /// Already completed.
    Completed,
}

impl ReminderWindow {
    /// Query value.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Today => "today",
            Self::Overdue => "overdue",
            Self::Upcoming => "upcoming",
            Self::Completed => "completed",
        }
    }
}

/// Reminders filtered by status and optional window.
///
/// # Errors
///
/// Propagates any [`ApiError`].
pub async fn list(
    client: &ApiClient,
    status: Option<ReminderStatus>,
    window: Option<ReminderWindow>,
) -> Result<Vec<Reminder>, ApiError> {
    let request = ApiRequest::get("reminders/")
        .query_opt("status", status.map(ReminderStatus::as_str))
        .query_opt("filter", window.map(ReminderWindow::as_str));
    client.fetch(request).await
}

/// Create a manual reminder.
///
/// # Errors
///
/// Propagates any [`ApiError`].
pub async fn create(client: &ApiClient, reminder: &NewReminder) -> Result<Reminder, ApiError> {
    client
        .fetch(ApiRequest::json(Method::Post, "reminders/", reminder)?)
        .await
}

/// Fetch counters and publish the unread count.
///
/// # Errors
///
/// Propagates any [`ApiError`]; nothing is published on failure.
pub async fn stats(client: &ApiClient) -> Result<ReminderStats, ApiError> {
    let stats: ReminderStats = client.fetch(ApiRequest::get("reminders/stats/")).await?;
    client.hooks().reminders_unread(stats.unread_count);
    Ok(stats)
}

/// Mark one reminder read.
///
/// # Errors
///
/// Propagates any [`ApiError`].
pub async fn mark_read(client: &ApiClient, id: i64) -> Result<(), ApiError> {
    action(client, id, "mark_read").await
}

/// Complete a reminder.
///
/// # Errors
///
/// Propagates any [`ApiError`].
pub async fn complete(client: &ApiClient, id: i64) -> Result<(), ApiError> {
    action(client, id, "complete").await
}

/// Dismiss a reminder.
///
/// # Errors
///
/// Propagates any [`ApiError`].
pub async fn dismiss(client: &ApiClient, id: i64) -> Result<(), ApiError> {
    action(client, id, "dismiss").await
}

async fn action(client: &ApiClient, id: i64, verb: &str) -> Result<(), ApiError> {
    client
        .fetch_unit(ApiRequest::post_empty(format!("reminders/{id}/{verb}/")))
        .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::testing::{Harness, json_response};
    use chrono::{TimeZone, Utc};
    use crm_api_models::ReminderType;
    use serde_json::json;

    #[tokio::test]
    async fn stats_publish_unread_count() -> anyhow::Result<()> {
        let harness = Harness::new(None);
        harness.transport.push(json_response(
            200,
            &json!({
                "total_pending": 5,
                "unread_count": 3,
                "overdue": 1,
                "today": 2,
                "upcoming": 2,
                "completed": 9
            }),
        ));

        let stats = stats(&harness.client).await?;

        assert_eq!(stats.overdue, 1);
        assert_eq!(harness.hooks.reminders(), vec![3]);
        Ok(())
    }

    #[tokio::test]
    async fn list_and_actions_hit_expected_urls() -> anyhow::Result<()> {
        let harness = Harness::new(None);
        harness.transport.push(json_response(200, &json!([])));
        harness.transport.push(json_response(200, &json!({})));
        harness.transport.push(json_response(200, &json!({})));

        list(
            &harness.client,
            Some(ReminderStatus::Pending),
            Some(ReminderWindow::Today),
        )
        .await?;
        complete(&harness.client, 4).await?;
        dismiss(&harness.client, 4).await?;

        let urls: Vec<String> = harness.transport.calls().into_iter().map(|c| c.url).collect();
        assert_eq!(
            urls,
            vec![
                "http://api.test/api/reminders/?status=PENDING&filter=today".to_string(),
                "http://api.test/api/reminders/4/complete/".to_string(),
                "http://api.test/api/reminders/4/dismiss/".to_string(),
            ]
        );
        Ok(())
    }

    #[tokio::test]
    async fn create_posts_a_manual_reminder() -> anyhow::Result<()> {
        let harness = Harness::new(None);
        harness.transport.push(json_response(
            201,
            &json!({
                "id": 21,
                "lead": 4,
                "assigned_to": 2,
                "reminder_type": "MANUAL",
                "status": "PENDING",
                "is_read": false,
                "due_date": "2024-06-01T09:00:00Z",
                "message": "Call back",
                "created_at": "2024-05-30T09:00:00Z"
            }),
        ));
        let due_date = Utc
            .with_ymd_and_hms(2024, 6, 1, 9, 0, 0)
            .single()
            .ok_or_else(|| anyhow::anyhow!("due date"))?;

        let created = create(
            &harness.client,
            &NewReminder {
                lead: 4,
                assigned_to: 2,
                due_date,
                message: "Call back".to_string(),
                reminder_type: ReminderType::Manual,
            },
        )
        .await?;

        assert_eq!(created.id, 21);
        let call = &harness.transport.calls()[0];
        assert_eq!(call.method, Method::Post);
        assert_eq!(call.url, "http://api.test/api/reminders/");
        assert_eq!(
            call.json_body(),
            Some(json!({
                "lead": 4,
                "assigned_to": 2,
                "due_date": "2024-06-01T09:00:00Z",
                "message": "Call back",
                "reminder_type": "MANUAL"
            }))
        );
        Ok(())
    }

    #[tokio::test]
    async fn mark_read_posts_an_empty_object() -> anyhow::Result<()> {
        let harness = Harness::new(None);
        harness.transport.push(json_response(200, &json!({})));

        mark_read(&harness.client, 4).await?;

        let call = &harness.transport.calls()[0];
        assert_eq!(call.method, Method::Post);
        assert_eq!(call.url, "http://api.test/api/reminders/4/mark_read/");
        assert_eq!(call.json_body(), Some(json!({})));
        Ok(())
    }
}

//! Notification service.
//!
//! # Design
//! - Polling calls (`list`, `unread_count`) skip the global loader.
//! - The unread counter is published through the client hooks on every fetch
//!   and reset to zero by `mark_all_read`.

use crate::services::api::ApiClient;
use crate::services::error::ApiError;
use crate::services::http::ApiRequest;
use crm_api_models::{Notification, UnreadCount};

/// Recent notifications.
///
/// # Errors
///
/// Propagates any [`ApiError`].
pub async fn list(client: &ApiClient) -> Result<Vec<Notification>, ApiError> {
    client
        .fetch(ApiRequest::get("notifications/").skip_loader())
        .await
}

/// Fetch and publish the unread counter.
///
/// # Errors
///
/// Propagates any [`ApiError`]; nothing is published on failure.
pub async fn unread_count(client: &ApiClient) -> Result<u32, ApiError> {
    let count: UnreadCount = client
        .fetch(ApiRequest::get("notifications/unread_count/").skip_loader())
        .await?;
    client.hooks().notifications_unread(count.count);
    Ok(count.count)
}

/// Mark one notification read.
///
/// # Errors
///
/// Propagates any [`ApiError`].
pub async fn mark_read(client: &ApiClient, id: i64) -> Result<(), ApiError> {
    client
        .fetch_unit(ApiRequest::post_empty(format!("notifications/{id}/mark_read/")))
        .await
}

/// Mark everything read and publish a zero counter.
///
/// # Errors
///
/// Propagates any [`ApiError`]; the counter is untouched on failure.
pub async fn mark_all_read(client: &ApiClient) -> Result<(), ApiError> {
    client
        .fetch_unit(ApiRequest::post_empty("notifications/mark_all_read/"))
        .await?;
    client.hooks().notifications_unread(0);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::testing::{Harness, json_response};
    use serde_json::json;

    #[tokio::test]
    async fn unread_count_skips_loader_and_publishes() -> anyhow::Result<()> {
        let harness = Harness::new(None);
        harness.transport.push(json_response(200, &json!({"count": 7})));

        let count = unread_count(&harness.client).await?;

        assert_eq!(count, 7);
        assert_eq!(harness.hooks.notifications(), vec![7]);
        assert!(harness.transport.calls()[0].skip_loader);
        assert_eq!(harness.hooks.started(), 0);
        Ok(())
    }

    #[tokio::test]
    async fn mark_all_read_publishes_zero_only_on_success() -> anyhow::Result<()> {
        let harness = Harness::new(None);
        harness.transport.push(json_response(500, &json!({})));
        harness.transport.push(json_response(200, &json!({})));

        assert!(mark_all_read(&harness.client).await.is_err());
        assert!(harness.hooks.notifications().is_empty());
        mark_all_read(&harness.client).await?;
        assert_eq!(harness.hooks.notifications(), vec![0]);
        assert_eq!(harness.hooks.started(), 2);
        Ok(())
    }
}

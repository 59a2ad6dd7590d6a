//! Dashboard and report service. Payloads are free-form JSON consumed by charts.

use crate::services::api::ApiClient;
use crate::services::error::ApiError;
use crate::services::http::ApiRequest;
use chrono::NaiveDate;
use crm_api_models::ReportPayload;

/// Reporting window.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum Timeframe {
    /// Today only.
    Daily,
    /// Last 7 days.
    Weekly,
    /// Last 30 days.
    #[default]
    Monthly,
    /// Last 90 days.
    Quarterly,
    /// Last 365 days, bucketed by month.
    Yearly,
}

impl Timeframe {
    /// Every window, shortest first.
    pub const ALL: [Self; 5] = [
        Self::Daily,
        Self::Weekly,
        Self::Monthly,
        Self::Quarterly,
        Self::Yearly,
    ];

    /// Query value.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Daily => "daily",
            Self::Weekly => "weekly",
            Self::Monthly => "monthly",
            Self::Quarterly => "quarterly",
            Self::Yearly => "yearly",
        }
    }
}

/// Headline dashboard numbers.
///
/// # Errors
///
/// Propagates any [`ApiError`].
pub async fn dashboard_stats(client: &ApiClient) -> Result<ReportPayload, ApiError> {
    client.fetch(ApiRequest::get("dashboard-stats/")).await
}

/// Aggregated report for a timeframe.
///
/// # Errors
///
/// Propagates any [`ApiError`].
pub async fn report(client: &ApiClient, timeframe: Timeframe) -> Result<ReportPayload, ApiError> {
    client
        .fetch(ApiRequest::get("reports/").query("timeframe", timeframe.as_str()))
        .await
}

/// Activity log for one day.
///
/// # Errors
///
/// Propagates any [`ApiError`].
pub async fn daily_activities(client: &ApiClient, date: NaiveDate) -> Result<ReportPayload, ApiError> {
    client
        .fetch(
            ApiRequest::get("reports/daily-activities/")
                .query("date", date.format("%Y-%m-%d").to_string()),
        )
        .await
}

/// Revenue progress against a user's threshold.
///
/// # Errors
///
/// Propagates any [`ApiError`].
pub async fn revenue_stats(client: &ApiClient, user_id: i64) -> Result<ReportPayload, ApiError> {
    client
        .fetch(ApiRequest::get(format!("users/{user_id}/revenue-stats/")))
        .await
}

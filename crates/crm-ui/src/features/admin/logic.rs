//! Threshold input handling for the user table.

use crm_api_models::{Amount, UserSummary};

/// Toast when the threshold request fails.
pub const THRESHOLD_FAILED_MESSAGE: &str = "Failed to update threshold";

/// Parse the threshold box; blanks, negatives and non-numbers yield `None`.
#[must_use]
pub fn parse_threshold(input: &str) -> Option<f64> {
    input
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|value| value.is_finite() && *value >= 0.0)
}

/// Text shown in the threshold column.
#[must_use]
pub fn format_threshold(threshold: Option<Amount>) -> String {
    threshold.map_or_else(|| "Not set".to_string(), |Amount(value)| format!("{value:.2}"))
}

/// Toast after a threshold change.
#[must_use]
pub fn threshold_updated_message(user: &UserSummary) -> String {
    format!("Threshold updated for {}", user.username)
}

/// Role names joined for display.
#[must_use]
pub fn role_list(user: &UserSummary) -> String {
    if user.is_superuser {
        return "Superuser".to_string();
    }
    if user.roles.is_empty() {
        return "-".to_string();
    }
    user.roles.join(", ")
}

//! Turns the free-form stats payload into labelled figures.

use crm_api_models::ReportPayload;
use serde_json::Value;

/// One headline number on the dashboard.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Figure {
    /// Caption derived from the payload key.
    pub label: String,
    /// Rendered value.
    pub value: String,
}

/// Scalar top-level entries of the payload, sorted by key.
///
/// Nested objects and arrays feed charts and are skipped.
#[must_use]
pub fn headline_figures(payload: &ReportPayload) -> Vec<Figure> {
    let Some(object) = payload.as_object() else {
        return Vec::new();
    };
    let mut entries: Vec<_> = object.iter().collect();
    entries.sort_by(|left, right| left.0.cmp(right.0));
    entries
        .into_iter()
        .filter_map(|(key, value)| {
            let value = match value {
                Value::Number(number) => number.to_string(),
                Value::String(text) => text.clone(),
                Value::Bool(flag) => flag.to_string(),
                Value::Null | Value::Array(_) | Value::Object(_) => return None,
            };
            Some(Figure {
                label: caption(key),
                value,
            })
        })
        .collect()
}

/// `"total_leads"` becomes `"Total Leads"`.
#[must_use]
pub fn caption(key: &str) -> String {
    key.split(['_', '-'])
        .filter(|word| !word.is_empty())
        .map(|word| {
            let mut chars = word.chars();
            chars.next().map_or_else(String::new, |first| {
                first.to_uppercase().chain(chars).collect::<String>()
            })
        })
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn scalar_entries_become_figures() {
        let payload = json!({
            "total_leads": 42,
            "conversion_rate": "12.5",
            "leads_by_stage": [{"stage": "WON", "count": 3}],
            "manager": null
        });
        let figures = headline_figures(&payload);
        assert_eq!(
            figures,
            vec![
                Figure { label: "Conversion Rate".into(), value: "12.5".into() },
                Figure { label: "Total Leads".into(), value: "42".into() },
            ]
        );
    }

    #[test]
    fn non_object_payload_has_no_figures() {
        assert!(headline_figures(&json!([1, 2, 3])).is_empty());
        assert_eq!(caption("won-deals__count"), "Won Deals Count");
    }
}

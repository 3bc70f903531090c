use crate::domain::numeric::{LooseNumber, VerifiedFlag};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;

pub const DEFAULT_WINDOW_DAYS: u32 = 7;
pub const MAX_WINDOW_DAYS: u32 = 90;
pub const MAX_RECENT_CALLS: u32 = 500;

/// Label -> count, in the order the backend emitted the labels.
pub type CountMap = IndexMap<String, LooseNumber>;

/// Call summary precomputed by the backend over a trailing window of days.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CallAnalytics {
    #[serde(default)]
    pub outcome_counts: CountMap,
    #[serde(default)]
    pub sentiment_counts: CountMap,
    #[serde(default)]
    pub by_day: Vec<DayRecord>,
}

/// One day of outcome counts. The set of outcome fields varies from day to day; a
/// missing outcome means zero calls with that outcome. Values are read through
/// [`LooseNumber`], so a record serializes back with numeric strings as numbers and
/// anything non-numeric as `null`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DayRecord {
    #[serde(default)]
    pub date: String,
    #[serde(flatten)]
    pub outcomes: CountMap,
}

impl DayRecord {
    /// Count for `outcome` on this day; absent outcomes read as `0`.
    pub fn count(&self, outcome: &str) -> u64 {
        self.outcomes
            .get(outcome)
            .map(|n| n.as_count())
            .unwrap_or(0)
    }
}

/// Call event identifier; numeric in practice but accepted as text too.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CallEventId {
    Int(i64),
    Text(String),
}

impl Default for CallEventId {
    fn default() -> Self {
        Self::Text(String::new())
    }
}

impl fmt::Display for CallEventId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int(id) => write!(f, "{id}"),
            Self::Text(id) => f.write_str(id),
        }
    }
}

/// One logged carrier call.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CallEvent {
    #[serde(default)]
    pub id: CallEventId,
    #[serde(default)]
    pub ts: String,
    #[serde(default)]
    pub mc_number: Option<String>,
    #[serde(default)]
    pub legal_name: Option<String>,
    #[serde(default)]
    pub verified: VerifiedFlag,
    #[serde(default)]
    pub load_id: Option<String>,
    #[serde(default)]
    pub origin: Option<String>,
    #[serde(default)]
    pub destination: Option<String>,
    #[serde(default)]
    pub pickup_datetime: Option<String>,
    #[serde(default)]
    pub delivery_datetime: Option<String>,
    #[serde(default)]
    pub loadboard_rate: LooseNumber,
    #[serde(default)]
    pub agreed_price: LooseNumber,
    #[serde(default)]
    pub negotiation_rounds: LooseNumber,
    #[serde(default)]
    pub outcome: Option<String>,
    #[serde(default)]
    pub sentiment: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn analytics_keep_payload_key_order() {
        let raw = r#"{
            "outcome_counts": {"price_rejected": 4, "agreed": 9, "ineligible": 1},
            "sentiment_counts": {"negative": 1, "positive": 2},
            "by_day": []
        }"#;
        let analytics: CallAnalytics = serde_json::from_str(raw).unwrap();
        let keys: Vec<_> = analytics.outcome_counts.keys().map(String::as_str).collect();
        assert_eq!(keys, ["price_rejected", "agreed", "ineligible"]);
        let keys: Vec<_> = analytics.sentiment_counts.keys().map(String::as_str).collect();
        assert_eq!(keys, ["negative", "positive"]);
    }

    #[test]
    fn day_records_split_date_from_outcome_fields() {
        let raw = r#"[
            {"date": "2024-01-01", "accepted": 2},
            {"date": "2024-01-02", "rejected": 1, "(none)": 3}
        ]"#;
        let days: Vec<DayRecord> = serde_json::from_str(raw).unwrap();
        assert_eq!(days[0].date, "2024-01-01");
        assert_eq!(days[0].outcomes.len(), 1);
        assert!(!days[1].outcomes.contains_key("date"));
        assert_eq!(days[1].count("(none)"), 3);
        assert_eq!(days[0].count("rejected"), 0);
    }

    #[test]
    fn missing_sections_default_to_empty() {
        let analytics: CallAnalytics = serde_json::from_str("{}").unwrap();
        assert!(analytics.outcome_counts.is_empty());
        assert!(analytics.by_day.is_empty());
    }

    #[test]
    fn call_events_tolerate_int_verified_and_nulls() {
        let raw = r#"{
            "id": 42, "ts": "2024-01-01T09:30:00Z", "mc_number": "MC123",
            "verified": 1, "load_id": null, "agreed_price": 1750,
            "negotiation_rounds": 2, "outcome": "agreed", "sentiment": null
        }"#;
        let event: CallEvent = serde_json::from_str(raw).unwrap();
        assert_eq!(event.id, CallEventId::Int(42));
        assert!(event.verified.is_verified());
        assert_eq!(event.load_id, None);
        assert_eq!(event.agreed_price.get(), Some(1750.0));
        assert_eq!(event.sentiment, None);
    }

    #[test]
    fn call_event_ids_may_be_text() {
        let event: CallEvent = serde_json::from_str(r#"{"id": "evt-9", "ts": ""}"#).unwrap();
        assert_eq!(event.id.to_string(), "evt-9");
    }
}

use crate::domain::call::{CallAnalytics, CountMap};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NamedCount {
    pub name: String,
    pub value: u64,
}

/// One entry per label, keeping the backend's ordering.
pub fn named_counts(counts: &CountMap) -> Vec<NamedCount> {
    counts
        .iter()
        .map(|(name, value)| NamedCount {
            name: name.clone(),
            value: value.as_count(),
        })
        .collect()
}

pub fn outcome_series(analytics: Option<&CallAnalytics>) -> Vec<NamedCount> {
    analytics
        .map(|a| named_counts(&a.outcome_counts))
        .unwrap_or_default()
}

pub fn sentiment_series(analytics: Option<&CallAnalytics>) -> Vec<NamedCount> {
    analytics
        .map(|a| named_counts(&a.sentiment_counts))
        .unwrap_or_default()
}

use crate::domain::call::{CallAnalytics, DayRecord};
use indexmap::{IndexMap, IndexSet};
use serde::Serialize;

/// Stackable series names, in first-seen order.
pub type StackKeySet = IndexSet<String>;

/// Union of outcome field names across every day. A key reported on a single day is
/// still part of the result.
pub fn discover_stack_keys(days: &[DayRecord]) -> StackKeySet {
    days.iter()
        .flat_map(|day| day.outcomes.keys())
        .cloned()
        .collect()
}

/// Sparse `(day, outcome) -> count` table plus its dense key universe.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct StackedDays {
    /// Day records in payload order with the same dates and outcome keys. Outcome values
    /// are normalized on the way in: numeric strings serialize back as numbers and
    /// non-numeric values as `null`, which reads as `0`.
    pub by_day: Vec<DayRecord>,
    pub keys: StackKeySet,
}

/// A day expanded over the full key universe.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DenseDay {
    pub date: String,
    #[serde(flatten)]
    pub values: IndexMap<String, u64>,
}

impl StackedDays {
    pub fn from_days(days: &[DayRecord]) -> Self {
        Self {
            by_day: days.to_vec(),
            keys: discover_stack_keys(days),
        }
    }

    pub fn from_analytics(analytics: Option<&CallAnalytics>) -> Self {
        analytics
            .map(|a| Self::from_days(&a.by_day))
            .unwrap_or_default()
    }

    /// Count for `key` on day `day`; unknown days and keys read as `0`.
    pub fn value(&self, day: usize, key: &str) -> u64 {
        self.by_day.get(day).map(|d| d.count(key)).unwrap_or(0)
    }

    pub fn dense_rows(&self) -> Vec<DenseDay> {
        self.by_day
            .iter()
            .map(|day| DenseDay {
                date: day.date.clone(),
                values: self
                    .keys
                    .iter()
                    .map(|key| (key.clone(), day.count(key)))
                    .collect(),
            })
            .collect()
    }
}

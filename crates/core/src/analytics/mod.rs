//! Pure transformations from fetched dashboard payloads into chart-ready series.
//!
//! Nothing in here performs I/O or fails: missing sources read as empty and malformed
//! numeric fields read as `0`.

pub mod counts;
pub mod dashboard;
pub mod equipment;
pub mod rates;
pub mod recent;
pub mod stack;

pub use counts::{outcome_series, sentiment_series, NamedCount};
pub use dashboard::{assemble, Dashboard, DashboardCache, DashboardInputs, DashboardStatus};
pub use equipment::{aggregate_by_equipment, EquipmentAggregate};
pub use rates::{bucketize_rates, RateBucket, RateHistogram, RATE_THRESHOLDS};
pub use recent::RecentCallRow;
pub use stack::{discover_stack_keys, StackKeySet, StackedDays};

use crate::domain::numeric::LooseNumber;
use anyhow::{ensure, Context};
use chrono::{DateTime, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// Category used when a load carries no equipment type.
pub const UNKNOWN_EQUIPMENT: &str = "Unknown";

pub const MAX_SEARCH_LIMIT: u32 = 100;
const DEFAULT_SEARCH_LIMIT: u32 = 10;

/// A freight load as returned by the load registry.
///
/// Every field is tolerant of missing or oddly typed data; the analytics pipeline
/// decides how gaps are treated.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Load {
    #[serde(default)]
    pub load_id: String,
    #[serde(default)]
    pub origin: String,
    #[serde(default)]
    pub destination: String,
    #[serde(default)]
    pub pickup_datetime: String,
    #[serde(default)]
    pub delivery_datetime: String,
    #[serde(default)]
    pub equipment_type: Option<String>,
    #[serde(default)]
    pub loadboard_rate: LooseNumber,
    #[serde(default)]
    pub miles: LooseNumber,
    #[serde(default)]
    pub weight: LooseNumber,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub commodity_type: Option<String>,
}

impl Load {
    /// Equipment category for grouping: the equipment type, or [`UNKNOWN_EQUIPMENT`]
    /// when it is missing or empty.
    pub fn equipment_category(&self) -> &str {
        match self.equipment_type.as_deref() {
            Some(e) if !e.is_empty() => e,
            _ => UNKNOWN_EQUIPMENT,
        }
    }
}

/// Payload for registering a new load.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewLoad {
    pub load_id: String,
    pub origin: String,
    pub destination: String,
    pub pickup_datetime: String,
    pub delivery_datetime: String,
    pub equipment_type: String,
    pub loadboard_rate: u32,
    pub miles: Option<u32>,
    pub notes: Option<String>,
    pub weight: Option<u32>,
    pub commodity_type: Option<String>,
}

impl NewLoad {
    /// Trims text fields, drops blank optional notes and checks required fields.
    pub fn validate(mut self) -> anyhow::Result<Self> {
        for (field, value) in [
            ("load_id", &mut self.load_id),
            ("origin", &mut self.origin),
            ("destination", &mut self.destination),
            ("pickup_datetime", &mut self.pickup_datetime),
            ("delivery_datetime", &mut self.delivery_datetime),
            ("equipment_type", &mut self.equipment_type),
        ] {
            *value = value.trim().to_string();
            ensure!(!value.is_empty(), "{field} must be non-empty");
        }

        let pickup = parse_iso_datetime(&self.pickup_datetime)
            .with_context(|| format!("invalid pickup_datetime: {}", self.pickup_datetime))?;
        let delivery = parse_iso_datetime(&self.delivery_datetime)
            .with_context(|| format!("invalid delivery_datetime: {}", self.delivery_datetime))?;
        if delivery < pickup {
            tracing::warn!(
                load_id = %self.load_id,
                %pickup,
                %delivery,
                "delivery_datetime is before pickup_datetime"
            );
        }

        self.notes = trim_optional(self.notes);
        self.commodity_type = trim_optional(self.commodity_type);
        Ok(self)
    }
}

fn trim_optional(s: Option<String>) -> Option<String> {
    s.map(|s| s.trim().to_string()).filter(|s| !s.is_empty())
}

/// Parses RFC 3339 timestamps as well as the offset-less `YYYY-MM-DDTHH:MM[:SS]` form that
/// `datetime-local` inputs produce. Offset timestamps are normalized to UTC.
pub fn parse_iso_datetime(s: &str) -> anyhow::Result<NaiveDateTime> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(dt.naive_utc());
    }
    for fmt in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Ok(dt);
        }
    }
    anyhow::bail!("not an ISO-8601 datetime: {s}")
}

/// Filters for the load search endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadQuery {
    /// Case-insensitive substring match.
    pub origin: Option<String>,
    /// Case-insensitive substring match.
    pub destination: Option<String>,
    pub equipment: Option<String>,
    pub min_rate: Option<u32>,
    pub max_rate: Option<u32>,
    pub limit: u32,
}

impl Default for LoadQuery {
    fn default() -> Self {
        Self {
            origin: None,
            destination: None,
            equipment: None,
            min_rate: None,
            max_rate: None,
            limit: DEFAULT_SEARCH_LIMIT,
        }
    }
}

impl LoadQuery {
    pub fn with_limit(limit: u32) -> Self {
        Self {
            limit,
            ..Self::default()
        }
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        ensure!(
            (1..=MAX_SEARCH_LIMIT).contains(&self.limit),
            "load search limit must be 1..={MAX_SEARCH_LIMIT} (got {})",
            self.limit
        );
        if let (Some(min), Some(max)) = (self.min_rate, self.max_rate) {
            ensure!(min <= max, "min_rate ({min}) must not exceed max_rate ({max})");
        }
        Ok(())
    }

    /// Query-string pairs; blank text filters are omitted.
    pub fn to_query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        for (key, value) in [
            ("origin", &self.origin),
            ("destination", &self.destination),
            ("equipment", &self.equipment),
        ] {
            if let Some(v) = value.as_deref().map(str::trim).filter(|v| !v.is_empty()) {
                pairs.push((key, v.to_string()));
            }
        }
        if let Some(min) = self.min_rate {
            pairs.push(("min_rate", min.to_string()));
        }
        if let Some(max) = self.max_rate {
            pairs.push(("max_rate", max.to_string()));
        }
        pairs.push(("limit", self.limit.to_string()));
        pairs
    }
}

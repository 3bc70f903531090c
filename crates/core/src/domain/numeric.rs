//! Loosely-typed scalar fields as they arrive from the dashboard API.
//!
//! The API is backed by a dynamically typed store, so numeric columns can show up as
//! numbers, numeric strings, `null`, or not at all. Values are kept as received and
//! coerced in exactly one place ([`LooseNumber::or_zero`]) when they are aggregated.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;
use std::fmt;

/// Optional numeric field with a single coercion rule.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct LooseNumber(Option<f64>);

impl LooseNumber {
    pub const fn absent() -> Self {
        Self(None)
    }

    pub fn new(value: f64) -> Self {
        Self(Some(value).filter(|v| v.is_finite()))
    }

    pub fn get(self) -> Option<f64> {
        self.0
    }

    pub fn is_absent(&self) -> bool {
        self.0.is_none()
    }

    /// Value used for aggregation. Absent, non-numeric and negative inputs count as `0`.
    pub fn or_zero(self) -> f64 {
        match self.0 {
            Some(v) if v >= 0.0 => v,
            _ => 0.0,
        }
    }

    /// [`Self::or_zero`] rounded to a whole count.
    pub fn as_count(self) -> u64 {
        self.or_zero().round() as u64
    }

    fn from_json(value: &Value) -> Self {
        match value {
            Value::Number(n) => n.as_f64().map(Self::new).unwrap_or_default(),
            Value::String(s) => s
                .trim()
                .parse::<f64>()
                .ok()
                .map(Self::new)
                .unwrap_or_default(),
            _ => Self::absent(),
        }
    }
}

impl From<f64> for LooseNumber {
    fn from(value: f64) -> Self {
        Self::new(value)
    }
}

impl<'de> Deserialize<'de> for LooseNumber {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Value::deserialize(deserializer)?;
        Ok(Self::from_json(&value))
    }
}

impl Serialize for LooseNumber {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self.0 {
            Some(v) if is_whole(v) => serializer.serialize_i64(v as i64),
            Some(v) => serializer.serialize_f64(v),
            None => serializer.serialize_none(),
        }
    }
}

/// Renders whole numbers without a fractional part and absent values as an empty string.
impl fmt::Display for LooseNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            Some(v) if is_whole(v) => write!(f, "{}", v as i64),
            Some(v) => write!(f, "{v}"),
            None => Ok(()),
        }
    }
}

fn is_whole(v: f64) -> bool {
    v.fract() == 0.0 && v.abs() < 9.0e15
}

/// Carrier verification flag, reported either as a JSON boolean or as `0`/`1`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct VerifiedFlag(Option<bool>);

impl VerifiedFlag {
    pub const fn new(value: Option<bool>) -> Self {
        Self(value)
    }

    pub fn get(self) -> Option<bool> {
        self.0
    }

    pub fn is_verified(self) -> bool {
        self.0 == Some(true)
    }
}

impl<'de> Deserialize<'de> for VerifiedFlag {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Value::deserialize(deserializer)?;
        let flag = match value {
            Value::Bool(b) => Some(b),
            Value::Number(n) => match n.as_i64() {
                Some(1) => Some(true),
                Some(0) => Some(false),
                _ => None,
            },
            _ => None,
        };
        Ok(Self(flag))
    }
}

impl Serialize for VerifiedFlag {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self.0 {
            Some(b) => serializer.serialize_bool(b),
            None => serializer.serialize_none(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[derive(Debug, Deserialize)]
    struct Holder {
        #[serde(default)]
        rate: LooseNumber,
    }

    fn rate_of(v: Value) -> LooseNumber {
        serde_json::from_value::<Holder>(v).unwrap().rate
    }

    #[test]
    fn accepts_numbers_and_numeric_strings() {
        assert_eq!(rate_of(json!({"rate": 1200})).get(), Some(1200.0));
        assert_eq!(rate_of(json!({"rate": 99.5})).get(), Some(99.5));
        assert_eq!(rate_of(json!({"rate": " 1500 "})).get(), Some(1500.0));
    }

    #[test]
    fn missing_null_and_garbage_coerce_to_zero() {
        for v in [
            json!({}),
            json!({"rate": null}),
            json!({"rate": "call for price"}),
            json!({"rate": true}),
            json!({"rate": [1, 2]}),
        ] {
            let rate = rate_of(v);
            assert!(rate.is_absent());
            assert_eq!(rate.or_zero(), 0.0);
        }
    }

    #[test]
    fn negative_values_are_kept_but_aggregate_as_zero() {
        let rate = rate_of(json!({"rate": -40}));
        assert_eq!(rate.get(), Some(-40.0));
        assert_eq!(rate.or_zero(), 0.0);
    }

    #[test]
    fn non_finite_strings_are_rejected() {
        assert!(rate_of(json!({"rate": "NaN"})).is_absent());
        assert!(rate_of(json!({"rate": "inf"})).is_absent());
    }

    #[test]
    fn as_count_rounds() {
        assert_eq!(LooseNumber::new(2.5).as_count(), 3);
        assert_eq!(LooseNumber::new(2.4).as_count(), 2);
        assert_eq!(LooseNumber::absent().as_count(), 0);
    }

    #[test]
    fn display_and_serialize_whole_numbers_without_fraction() {
        let n = LooseNumber::new(1200.0);
        assert_eq!(n.to_string(), "1200");
        assert_eq!(serde_json::to_value(n).unwrap(), json!(1200));
        assert_eq!(LooseNumber::new(12.25).to_string(), "12.25");
        assert_eq!(LooseNumber::absent().to_string(), "");
        assert_eq!(serde_json::to_value(LooseNumber::absent()).unwrap(), Value::Null);
    }

    #[test]
    fn verified_flag_accepts_bool_and_int() {
        let parse = |v: Value| serde_json::from_value::<VerifiedFlag>(v).unwrap();
        assert!(parse(json!(true)).is_verified());
        assert!(parse(json!(1)).is_verified());
        assert!(!parse(json!(0)).is_verified());
        assert_eq!(parse(json!(0)).get(), Some(false));
        assert_eq!(parse(json!(null)).get(), None);
        assert_eq!(parse(json!(7)).get(), None);
    }
}

//! Raw option-chain snapshot
//!
//! Exactly what the provider returned, before any validation.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::error::AdvisorResult;

/// Provider-supplied option-chain document.
///
/// The expected shape is NSE's: `{"records": {"data": [ {strikePrice, expiryDate, CE?, PE?}, ... ]}}`.
/// Nothing is checked here; the normalizer validates on read.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RawSnapshot(Value);

impl RawSnapshot {
    pub fn new(value: Value) -> Self {
        Self(value)
    }

    /// Parse a snapshot from JSON text
    pub fn from_json(json: &str) -> AdvisorResult<Self> {
        Ok(Self(serde_json::from_str(json)?))
    }

    /// The per-strike record sequence, if present
    pub fn records(&self) -> Option<&Vec<Value>> {
        self.0.pointer("/records/data").and_then(Value::as_array)
    }

    /// Exchange timestamp of the snapshot (`records.timestamp`)
    pub fn exchange_timestamp(&self) -> Option<&str> {
        self.0.pointer("/records/timestamp").and_then(Value::as_str)
    }

    /// Underlying price (`records.underlyingValue`)
    pub fn underlying_value(&self) -> Option<f64> {
        self.0.pointer("/records/underlyingValue").and_then(Value::as_f64)
    }
}

impl From<Value> for RawSnapshot {
    fn from(value: Value) -> Self {
        Self(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_accessors() {
        let raw = RawSnapshot::new(json!({
            "records": {
                "timestamp": "24-Dec-2025 15:30:00",
                "underlyingValue": 26142.1,
                "data": [{"strikePrice": 26000, "expiryDate": "30-Dec-2025"}]
            }
        }));

        assert_eq!(raw.records().map(|r| r.len()), Some(1));
        assert_eq!(raw.exchange_timestamp(), Some("24-Dec-2025 15:30:00"));
        assert_eq!(raw.underlying_value(), Some(26142.1));
    }

    #[test]
    fn test_missing_records() {
        let raw = RawSnapshot::from_json(r#"{"filtered": {}}"#).unwrap();
        assert!(raw.records().is_none());
        assert!(raw.underlying_value().is_none());
    }

    #[test]
    fn test_invalid_json() {
        assert!(RawSnapshot::from_json("{not json").is_err());
    }
}

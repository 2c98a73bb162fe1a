//! Snapshot normalization
//!
//! Flattens the per-strike records of a raw snapshot into call and put entries,
//! validating every required field on the way in.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::core::{AdvisorError, AdvisorResult, ExpiryDate, OptionSideEntry, OptionType, RawSnapshot};

/// Normalized working set for one snapshot
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NormalizedChain {
    /// Call-side entries, in record order
    pub calls: Vec<OptionSideEntry>,
    /// Put-side entries, in record order
    pub puts: Vec<OptionSideEntry>,
    /// Distinct expiries seen across all records
    pub expiries: BTreeSet<ExpiryDate>,
    /// Underlying price reported with the snapshot
    pub underlying_value: Option<f64>,
    /// Exchange timestamp reported with the snapshot
    pub exchange_timestamp: Option<String>,
}

impl NormalizedChain {
    pub fn is_empty(&self) -> bool {
        self.calls.is_empty() && self.puts.is_empty()
    }
}

// NSE wire format for one strike record

#[derive(Debug, Deserialize)]
struct WireRecord {
    #[serde(rename = "strikePrice")]
    strike_price: Option<f64>,
    #[serde(rename = "expiryDate")]
    expiry_date: Option<String>,
    #[serde(rename = "CE")]
    call: Option<WireSide>,
    #[serde(rename = "PE")]
    put: Option<WireSide>,
}

#[derive(Debug, Deserialize)]
struct WireSide {
    #[serde(rename = "openInterest")]
    open_interest: Option<f64>,
    #[serde(rename = "changeinOpenInterest")]
    change_in_oi: Option<f64>,
    #[serde(rename = "impliedVolatility")]
    implied_volatility: Option<f64>,
    #[serde(rename = "lastPrice")]
    last_price: Option<f64>,
    #[serde(rename = "totalTradedVolume")]
    total_traded_volume: Option<f64>,
    #[serde(rename = "underlyingValue")]
    underlying_value: Option<f64>,
    identifier: Option<String>,
}

/// Normalize a raw snapshot into call entries, put entries and the expiry set.
///
/// A record may contribute to calls, puts, both or neither. Fails with
/// [`AdvisorError::MalformedSnapshot`] if the record sequence is missing or any
/// record/side lacks a required field.
pub fn normalize(raw: &RawSnapshot) -> AdvisorResult<NormalizedChain> {
    let records = raw
        .records()
        .ok_or_else(|| AdvisorError::malformed("missing records.data sequence"))?;

    let mut chain = NormalizedChain {
        underlying_value: raw.underlying_value(),
        exchange_timestamp: raw.exchange_timestamp().map(str::to_string),
        ..Default::default()
    };

    for (idx, value) in records.iter().enumerate() {
        let record = WireRecord::deserialize(value)
            .map_err(|e| AdvisorError::malformed(format!("record {}: {}", idx, e)))?;

        let strike = record
            .strike_price
            .filter(|s| s.is_finite())
            .ok_or_else(|| AdvisorError::malformed(format!("record {}: missing strikePrice", idx)))?;
        let expiry = record
            .expiry_date
            .map(ExpiryDate::new)
            .ok_or_else(|| AdvisorError::malformed(format!("record {}: missing expiryDate", idx)))?;

        chain.expiries.insert(expiry.clone());

        if let Some(side) = &record.call {
            chain
                .calls
                .push(side_entry(side, OptionType::Call, strike, &expiry, idx)?);
        }
        if let Some(side) = &record.put {
            chain
                .puts
                .push(side_entry(side, OptionType::Put, strike, &expiry, idx)?);
        }
    }

    tracing::debug!(
        records = records.len(),
        calls = chain.calls.len(),
        puts = chain.puts.len(),
        expiries = chain.expiries.len(),
        "Normalized snapshot"
    );

    Ok(chain)
}

fn side_entry(
    side: &WireSide,
    option_type: OptionType,
    strike: f64,
    expiry: &ExpiryDate,
    idx: usize,
) -> AdvisorResult<OptionSideEntry> {
    let field_err = |field: &str| {
        AdvisorError::malformed(format!(
            "record {} {}: invalid or missing {}",
            idx,
            option_type.code(),
            field
        ))
    };

    let open_interest = side
        .open_interest
        .and_then(as_non_negative_integer)
        .ok_or_else(|| field_err("openInterest"))?;
    let change_in_oi = side
        .change_in_oi
        .and_then(as_integer)
        .ok_or_else(|| field_err("changeinOpenInterest"))?;
    let implied_volatility = side
        .implied_volatility
        .filter(|iv| iv.is_finite() && *iv >= 0.0)
        .ok_or_else(|| field_err("impliedVolatility"))?;

    Ok(OptionSideEntry {
        side: option_type,
        strike,
        expiry: expiry.clone(),
        open_interest,
        change_in_oi,
        implied_volatility,
        last_price: side.last_price,
        total_traded_volume: side.total_traded_volume.and_then(as_non_negative_integer),
        underlying_value: side.underlying_value,
        identifier: side.identifier.clone(),
    })
}

// 2^63 and 2^64 as f64; `as` would saturate at or above them
const I64_BOUND: f64 = 9_223_372_036_854_775_808.0;
const U64_BOUND: f64 = 18_446_744_073_709_551_616.0;

fn as_integer(x: f64) -> Option<i64> {
    (x.is_finite() && x.fract() == 0.0 && x >= -I64_BOUND && x < I64_BOUND).then_some(x as i64)
}

fn as_non_negative_integer(x: f64) -> Option<u64> {
    (x.is_finite() && x >= 0.0 && x.fract() == 0.0 && x < U64_BOUND).then_some(x as u64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn side(oi: i64, chg: i64, iv: f64) -> serde_json::Value {
        json!({"openInterest": oi, "changeinOpenInterest": chg, "impliedVolatility": iv})
    }

    fn sample_snapshot() -> RawSnapshot {
        RawSnapshot::new(json!({
            "records": {
                "underlyingValue": 26142.1,
                "data": [
                    {"strikePrice": 26000, "expiryDate": "30-Dec-2025",
                     "CE": side(120, 15, 11.2), "PE": side(300, -20, 12.5)},
                    {"strikePrice": 26100, "expiryDate": "30-Dec-2025",
                     "CE": side(80, 0, 10.9)},
                    {"strikePrice": 26000, "expiryDate": "06-Jan-2026",
                     "PE": side(45, 5, 13.0)},
                    {"strikePrice": 27000, "expiryDate": "27-Jan-2026"}
                ]
            }
        }))
    }

    #[test]
    fn test_sides_are_independent() {
        let chain = normalize(&sample_snapshot()).unwrap();

        assert_eq!(chain.calls.len(), 2);
        assert_eq!(chain.puts.len(), 2);
        assert!(chain.calls.iter().all(|e| e.side == OptionType::Call));
        assert!(chain.puts.iter().all(|e| e.side == OptionType::Put));

        assert_eq!(chain.calls[1].strike, 26100.0);
        assert_eq!(chain.puts[0].change_in_oi, -20);
        assert_eq!(chain.underlying_value, Some(26142.1));
    }

    #[test]
    fn test_expiries_include_side_less_records() {
        let chain = normalize(&sample_snapshot()).unwrap();
        let expiries: Vec<&str> = chain.expiries.iter().map(|e| e.as_str()).collect();

        assert_eq!(expiries, vec!["30-Dec-2025", "06-Jan-2026", "27-Jan-2026"]);
    }

    #[test]
    fn test_no_fabricated_entries() {
        let raw = sample_snapshot();
        let chain = normalize(&raw).unwrap();

        let records = raw.records().unwrap();
        for entry in chain.calls.iter().chain(chain.puts.iter()) {
            let found = records.iter().any(|r| {
                r["strikePrice"].as_f64() == Some(entry.strike)
                    && r["expiryDate"].as_str() == Some(entry.expiry.as_str())
            });
            assert!(found, "entry {:?} not traceable to a record", entry);
        }
    }

    #[test]
    fn test_missing_record_sequence() {
        let raw = RawSnapshot::new(json!({"filtered": {"data": []}}));
        let err = normalize(&raw).unwrap_err();
        assert!(matches!(err, AdvisorError::MalformedSnapshot(_)));

        let raw = RawSnapshot::new(json!({"records": {"data": "oops"}}));
        assert!(matches!(
            normalize(&raw),
            Err(AdvisorError::MalformedSnapshot(_))
        ));
    }

    #[test]
    fn test_empty_record_sequence() {
        let raw = RawSnapshot::new(json!({"records": {"data": []}}));
        let chain = normalize(&raw).unwrap();
        assert!(chain.is_empty());
        assert!(chain.expiries.is_empty());
    }

    #[test]
    fn test_missing_required_side_field() {
        let raw = RawSnapshot::new(json!({
            "records": {"data": [
                {"strikePrice": 100, "expiryDate": "30-Dec-2025",
                 "CE": {"openInterest": 10, "impliedVolatility": 12.0}}
            ]}
        }));

        match normalize(&raw) {
            Err(AdvisorError::MalformedSnapshot(msg)) => {
                assert!(msg.contains("changeinOpenInterest"), "{}", msg)
            }
            other => panic!("expected malformed snapshot, got {:?}", other),
        }
    }

    #[test]
    fn test_negative_open_interest_rejected() {
        let raw = RawSnapshot::new(json!({
            "records": {"data": [
                {"strikePrice": 100, "expiryDate": "30-Dec-2025", "PE": side(-5, 0, 10.0)}
            ]}
        }));
        assert!(matches!(
            normalize(&raw),
            Err(AdvisorError::MalformedSnapshot(_))
        ));
    }

    #[test]
    fn test_out_of_range_open_interest_rejected() {
        let raw = RawSnapshot::new(json!({
            "records": {"data": [
                {"strikePrice": 100, "expiryDate": "30-Dec-2025", "CE": {"openInterest": 1e20, "changeinOpenInterest": 0, "impliedVolatility": 10.0}}
            ]}
        }));
        assert!(matches!(
            normalize(&raw),
            Err(AdvisorError::MalformedSnapshot(_))
        ));
    }

    #[test]
    fn test_missing_strike_rejected() {
        let raw = RawSnapshot::new(json!({
            "records": {"data": [{"expiryDate": "30-Dec-2025", "CE": side(1, 0, 1.0)}]}
        }));
        assert!(matches!(
            normalize(&raw),
            Err(AdvisorError::MalformedSnapshot(_))
        ));
    }

    #[test]
    fn test_optional_fields_carried() {
        let raw = RawSnapshot::new(json!({
            "records": {"data": [
                {"strikePrice": 100, "expiryDate": "30-Dec-2025",
                 "CE": {"openInterest": 10, "changeinOpenInterest": 2, "impliedVolatility": 9.5,
                        "lastPrice": 4.35, "totalTradedVolume": 1200,
                        "identifier": "OPTIDXNIFTY30-12-2025CE100.00"}}
            ]}
        }));
        let chain = normalize(&raw).unwrap();
        let call = &chain.calls[0];

        assert_eq!(call.last_price, Some(4.35));
        assert_eq!(call.total_traded_volume, Some(1200));
        assert_eq!(call.identifier.as_deref(), Some("OPTIDXNIFTY30-12-2025CE100.00"));
    }
}

//! Option-chain entry definitions
//!
//! One call-side or put-side row of a chain, with its strike and expiry merged in.

use std::cmp::Ordering;
use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Date format used by NSE for expiries, e.g. "30-Dec-2025"
pub const EXPIRY_FORMAT: &str = "%d-%b-%Y";

/// Option side (Call or Put)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OptionType {
    Call,
    Put,
}

impl OptionType {
    /// Exchange code for this side ("CE" / "PE")
    pub fn code(&self) -> &'static str {
        match self {
            OptionType::Call => "CE",
            OptionType::Put => "PE",
        }
    }
}

/// Expiry date as delivered by the provider.
///
/// Keeps the provider's string verbatim. Ordering is chronological for dates in
/// `DD-Mon-YYYY` form; unparseable strings sort after them, lexicographically.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ExpiryDate(String);

impl ExpiryDate {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Calendar date, if the string is in exchange format
    pub fn date(&self) -> Option<NaiveDate> {
        NaiveDate::parse_from_str(self.0.trim(), EXPIRY_FORMAT).ok()
    }
}

impl Ord for ExpiryDate {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self.date(), other.date()) {
            (Some(a), Some(b)) => a.cmp(&b).then_with(|| self.0.cmp(&other.0)),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => self.0.cmp(&other.0),
        }
    }
}

impl PartialOrd for ExpiryDate {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for ExpiryDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ExpiryDate {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

/// A single call or put row with strike and expiry merged in
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OptionSideEntry {
    /// Call or put
    pub side: OptionType,
    /// Strike price of the originating record
    pub strike: f64,
    /// Expiry of the originating record
    pub expiry: ExpiryDate,
    /// Outstanding contracts
    pub open_interest: u64,
    /// Change in open interest since previous session
    pub change_in_oi: i64,
    /// Implied volatility (percent, as quoted by the exchange)
    pub implied_volatility: f64,
    /// Last traded price
    pub last_price: Option<f64>,
    /// Contracts traded today
    pub total_traded_volume: Option<u64>,
    /// Underlying price at quote time
    pub underlying_value: Option<f64>,
    /// Exchange contract identifier
    pub identifier: Option<String>,
}

impl OptionSideEntry {
    /// Entry with only the required fields set
    pub fn new(
        side: OptionType,
        strike: f64,
        expiry: impl Into<ExpiryDate>,
        open_interest: u64,
        change_in_oi: i64,
        implied_volatility: f64,
    ) -> Self {
        Self {
            side,
            strike,
            expiry: expiry.into(),
            open_interest,
            change_in_oi,
            implied_volatility,
            last_price: None,
            total_traded_volume: None,
            underlying_value: None,
            identifier: None,
        }
    }

    pub fn call(strike: f64, expiry: impl Into<ExpiryDate>, open_interest: u64) -> Self {
        Self::new(OptionType::Call, strike, expiry, open_interest, 0, 0.0)
    }

    pub fn put(strike: f64, expiry: impl Into<ExpiryDate>, open_interest: u64) -> Self {
        Self::new(OptionType::Put, strike, expiry, open_interest, 0, 0.0)
    }
}

//! Option-chain analytics
//!
//! Derives sentiment indicators from an open-interest snapshot.
//!
//! Pipeline:
//! 1. **Normalization**: flatten per-strike records into call and put entries
//! 2. **Expiry filter**: list expiries, then restrict to the chosen one
//! 3. **Metrics**: max pain, put/call ratio, support, resistance
//! 4. **Advice**: map the PCR to a sentiment and a fixed strategy list
//!
//! History accumulates (timestamp, max pain, PCR) across polls.

mod advisor;
mod analyzer;
mod config;
mod expiry;
mod history;
mod metrics;
mod normalize;

pub use advisor::*;
pub use analyzer::*;
pub use config::*;
pub use expiry::*;
pub use history::*;
pub use metrics::*;
pub use normalize::*;

use serde::{Deserialize, Serialize};

use crate::core::ExpiryDate;

/// Market sentiment inferred from the put/call ratio
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Sentiment {
    Bearish,
    Neutral,
    Bullish,
}

impl Sentiment {
    /// Display label
    pub fn label(&self) -> &'static str {
        match self {
            Sentiment::Bearish => "Bearish Market",
            Sentiment::Neutral => "Neutral Market",
            Sentiment::Bullish => "Bullish Market",
        }
    }

    /// Strategies suggested for this sentiment
    pub fn strategies(&self) -> &'static str {
        match self {
            Sentiment::Bearish => "Buy Put, Bear Put Spread, Short Call",
            Sentiment::Neutral => "Straddle, Strangle, Iron Condor",
            Sentiment::Bullish => "Buy Call, Bull Call Spread, Short Put",
        }
    }

    /// Arrow marker for terminal output
    pub fn marker(&self) -> &'static str {
        match self {
            Sentiment::Bearish => "▼",
            Sentiment::Neutral => "◆",
            Sentiment::Bullish => "▲",
        }
    }
}

/// Sentiment plus its recommendation text
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Advice {
    pub sentiment: Sentiment,
    pub recommendation: String,
}

/// Result of analyzing one expiry of a snapshot
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChainAnalysis {
    /// Expiry the metrics were computed for
    pub expiry: ExpiryDate,
    pub metrics: MetricsResult,
    pub advice: Advice,
    /// Underlying price reported with the snapshot
    pub underlying_value: Option<f64>,
    /// Exchange timestamp reported with the snapshot
    pub exchange_timestamp: Option<String>,
}

impl ChainAnalysis {
    /// History point for this analysis at the given time
    pub fn history_point(&self, timestamp: impl Into<String>) -> HistoryPoint {
        HistoryPoint::new(timestamp, self.metrics.max_pain, self.metrics.pcr)
    }
}

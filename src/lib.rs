//! # OI Advisor - Option-Chain Sentiment Indicators
//!
//! Polls an option-chain snapshot (NSE indices and stocks), derives
//! open-interest indicators and suggests a strategy from a fixed PCR rule.
//!
//! ## Overview
//!
//! Each poll runs:
//! - **Normalization**: per-strike records → call and put entries
//! - **Expiry selection**: list expiries, then filter to the chosen one
//! - **Metrics**: max pain, put/call ratio, support, resistance
//! - **Advice**: Bearish / Neutral / Bullish with a strategy list
//!
//! Successful polls append (time, max pain, PCR) to the session history.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use oi_advisor::prelude::*;
//!
//! let client = NseClient::new(&NseConfig::default()).unwrap();
//! let provider = CachedProvider::new(client, SystemClock, CacheConfig::default());
//! let mut session = Session::new(provider, SystemClock);
//!
//! // Pick an expiry first, then poll it
//! let expiries = session.expiries("NIFTY").unwrap();
//! let expiry = expiries.iter().next().unwrap().clone();
//! let outcome = session.poll("NIFTY", &expiry).unwrap();
//!
//! println!("{}", Dashboard::new(&outcome, session.history()));
//! ```
//!
//! ## What This Does NOT Do
//!
//! - Compute a true two-leg max pain (max pain here is peak call OI)
//! - Back the strategy rule with any statistics
//! - Persist history across restarts

pub mod analytics;
pub mod config;
pub mod core;
pub mod data;
pub mod logging;
pub mod report;
pub mod session;

/// Prelude with commonly used types
pub mod prelude {
    // Core types
    pub use crate::core::{
        AdvisorError, AdvisorResult, Clock, ExpiryDate, ManualClock, OptionSideEntry, OptionType,
        RawSnapshot, SystemClock,
    };

    // Analytics
    pub use crate::analytics::{
        advise, advise_with, analyze_snapshot, compute_metrics, filter_by_expiry, normalize,
        Advice, AdvisorConfig, ChainAnalysis, ChainAnalyzer, History, HistoryPoint,
        MetricsResult, NormalizedChain, Sentiment, TrendView,
    };

    // Data fetching
    pub use crate::data::{
        CacheConfig, CachedProvider, ChainProvider, FileProvider, NseClient, NseConfig, Security,
        SecurityType,
    };

    pub use crate::config::AppConfig;
    pub use crate::logging::{init_logging, LogFormat};
    pub use crate::report::Dashboard;
    pub use crate::session::{PollOutcome, Session};
}

// Re-export main types at crate root
pub use crate::core::{AdvisorError, AdvisorResult};
pub use crate::session::Session;

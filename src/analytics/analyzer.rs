//! ChainAnalyzer - facade over normalize → filter → metrics → advice
//!
//! Two passes over one snapshot: list its expiries, then analyze the chosen one.

use std::collections::BTreeSet;

use crate::core::{AdvisorError, AdvisorResult, ExpiryDate, RawSnapshot};

use super::{
    advise_with, compute_metrics, filter_by_expiry, normalize, AdvisorConfig, ChainAnalysis,
    NormalizedChain,
};

/// Runs the analytical pipeline with a fixed advisor configuration
pub struct ChainAnalyzer {
    config: AdvisorConfig,
}

impl ChainAnalyzer {
    /// Create an analyzer with default thresholds
    pub fn new() -> Self {
        Self {
            config: AdvisorConfig::default(),
        }
    }

    /// Create with custom thresholds
    pub fn with_config(config: AdvisorConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &AdvisorConfig {
        &self.config
    }

    pub fn set_config(&mut self, config: AdvisorConfig) {
        self.config = config;
    }

    /// First pass: the expiries available in a snapshot
    pub fn expiries(&self, raw: &RawSnapshot) -> AdvisorResult<BTreeSet<ExpiryDate>> {
        Ok(normalize(raw)?.expiries)
    }

    /// Second pass: metrics and advice for one expiry
    pub fn analyze(&self, raw: &RawSnapshot, expiry: &ExpiryDate) -> AdvisorResult<ChainAnalysis> {
        let chain = normalize(raw)?;
        self.analyze_chain(&chain, expiry)
    }

    /// Analyze an already normalized chain
    pub fn analyze_chain(
        &self,
        chain: &NormalizedChain,
        expiry: &ExpiryDate,
    ) -> AdvisorResult<ChainAnalysis> {
        let calls = filter_by_expiry(&chain.calls, Some(expiry));
        let puts = filter_by_expiry(&chain.puts, Some(expiry));

        let metrics = compute_metrics(calls, puts).map_err(|e| match e {
            AdvisorError::NoDataForExpiry(msg) => {
                AdvisorError::no_data(format!("{}: {}", expiry, msg))
            }
            other => other,
        })?;
        let advice = advise_with(metrics.pcr, &self.config);

        Ok(ChainAnalysis {
            expiry: expiry.clone(),
            metrics,
            advice,
            underlying_value: chain.underlying_value,
            exchange_timestamp: chain.exchange_timestamp.clone(),
        })
    }
}

impl Default for ChainAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}

/// Convenience function: analyze one expiry of a snapshot with default thresholds
pub fn analyze_snapshot(raw: &RawSnapshot, expiry: &ExpiryDate) -> AdvisorResult<ChainAnalysis> {
    ChainAnalyzer::new().analyze(raw, expiry)
}

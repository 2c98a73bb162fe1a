//! Open-interest metrics for a single expiry
//!
//! - Max pain: strike with the largest summed call OI
//! - PCR: total put OI / total call OI, 2 dp
//! - Support: strike with the largest summed put OI
//! - Resistance: strike with the largest summed call OI
//!
//! Max pain here is the call-OI concentration, not the two-leg payoff
//! minimisation, so max pain and resistance always coincide.

use serde::{Deserialize, Serialize};

use crate::core::{AdvisorError, AdvisorResult, OptionSideEntry};

/// Derived values for one (snapshot, expiry)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetricsResult {
    /// Call entries for the expiry
    pub calls: Vec<OptionSideEntry>,
    /// Put entries for the expiry
    pub puts: Vec<OptionSideEntry>,
    /// Strike with maximum call OI
    pub max_pain: f64,
    /// Put/call OI ratio rounded to 2 dp
    pub pcr: f64,
    /// Strike with maximum put OI
    pub support: f64,
    /// Strike with maximum call OI
    pub resistance: f64,
    pub total_call_oi: u64,
    pub total_put_oi: u64,
    pub total_call_change_oi: i64,
    pub total_put_change_oi: i64,
}

impl MetricsResult {
    /// First `n` call rows in source order
    pub fn top_calls(&self, n: usize) -> &[OptionSideEntry] {
        &self.calls[..n.min(self.calls.len())]
    }

    /// First `n` put rows in source order
    pub fn top_puts(&self, n: usize) -> &[OptionSideEntry] {
        &self.puts[..n.min(self.puts.len())]
    }
}

/// Compute metrics from entries already filtered to one expiry.
///
/// Fails with [`AdvisorError::NoDataForExpiry`] if either side is empty and with
/// [`AdvisorError::UndefinedRatio`] if total call OI is zero.
pub fn compute_metrics(
    calls: Vec<OptionSideEntry>,
    puts: Vec<OptionSideEntry>,
) -> AdvisorResult<MetricsResult> {
    if calls.is_empty() {
        return Err(AdvisorError::no_data("no call entries"));
    }
    if puts.is_empty() {
        return Err(AdvisorError::no_data("no put entries"));
    }

    let call_oi = oi_by_strike(&calls)?;
    let put_oi = oi_by_strike(&puts)?;

    let max_pain = max_oi_strike(&call_oi).ok_or_else(|| AdvisorError::no_data("no call strikes"))?;
    let support = max_oi_strike(&put_oi).ok_or_else(|| AdvisorError::no_data("no put strikes"))?;
    let resistance = max_pain;

    let total_call_oi = total_oi(&calls)?;
    let total_put_oi = total_oi(&puts)?;
    let pcr = put_call_ratio(total_put_oi, total_call_oi)?;
    let total_call_change_oi = total_change_oi(&calls)?;
    let total_put_change_oi = total_change_oi(&puts)?;

    tracing::debug!(max_pain, support, resistance, pcr, "Computed OI metrics");

    Ok(MetricsResult {
        max_pain,
        pcr,
        support,
        resistance,
        total_call_oi,
        total_put_oi,
        total_call_change_oi,
        total_put_change_oi,
        calls,
        puts,
    })
}

/// Total put OI over total call OI, rounded to 2 dp
pub fn put_call_ratio(total_put_oi: u64, total_call_oi: u64) -> AdvisorResult<f64> {
    if total_call_oi == 0 {
        return Err(AdvisorError::UndefinedRatio);
    }
    Ok(round2(total_put_oi as f64 / total_call_oi as f64))
}

/// Summed open interest per strike, ascending by strike
pub fn oi_by_strike(entries: &[OptionSideEntry]) -> AdvisorResult<Vec<(f64, u64)>> {
    let mut pairs: Vec<(f64, u64)> = entries.iter().map(|e| (e.strike, e.open_interest)).collect();
    pairs.sort_by(|a, b| a.0.total_cmp(&b.0));

    let mut grouped: Vec<(f64, u64)> = Vec::with_capacity(pairs.len());
    for (strike, oi) in pairs {
        match grouped.last_mut() {
            Some(last) if last.0 == strike => {
                last.1 = last.1.checked_add(oi).ok_or_else(|| oi_overflow(strike))?
            }
            _ => grouped.push((strike, oi)),
        }
    }
    Ok(grouped)
}

/// Strike with the largest OI; ties go to the lowest strike
pub fn max_oi_strike(grouped: &[(f64, u64)]) -> Option<f64> {
    let mut best: Option<(f64, u64)> = None;
    for &(strike, oi) in grouped {
        if best.map_or(true, |(_, best_oi)| oi > best_oi) {
            best = Some((strike, oi));
        }
    }
    best.map(|(strike, _)| strike)
}

fn total_oi(entries: &[OptionSideEntry]) -> AdvisorResult<u64> {
    entries.iter().try_fold(0u64, |acc, e| {
        acc.checked_add(e.open_interest)
            .ok_or_else(|| AdvisorError::malformed("total open interest overflows"))
    })
}

fn total_change_oi(entries: &[OptionSideEntry]) -> AdvisorResult<i64> {
    entries.iter().try_fold(0i64, |acc, e| {
        acc.checked_add(e.change_in_oi)
            .ok_or_else(|| AdvisorError::malformed("total change in open interest overflows"))
    })
}

fn oi_overflow(strike: f64) -> AdvisorError {
    AdvisorError::malformed(format!("open interest at strike {} overflows", strike))
}

/// Half-to-even at 2 dp, matching the exchange dashboard's `round(x, 2)`
fn round2(x: f64) -> f64 {
    (x * 100.0).round_ties_even() / 100.0
}

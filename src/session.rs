//! Polling session
//!
//! Owns the history for one running session. A poll either completes and
//! appends exactly one point, or fails and leaves the history untouched.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::analytics::{AdvisorConfig, ChainAnalysis, ChainAnalyzer, History};
use crate::core::{AdvisorResult, Clock, ExpiryDate, RawSnapshot};
use crate::data::ChainProvider;

/// Outcome of one successful poll
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PollOutcome {
    /// Clock time the poll was recorded at
    pub timestamp: String,
    pub symbol: String,
    pub analysis: ChainAnalysis,
}

/// One user's polling session
pub struct Session<P, C> {
    provider: P,
    clock: C,
    analyzer: ChainAnalyzer,
    history: History,
}

impl<P: ChainProvider, C: Clock> Session<P, C> {
    pub fn new(provider: P, clock: C) -> Self {
        Self::with_config(provider, clock, AdvisorConfig::default())
    }

    pub fn with_config(provider: P, clock: C, config: AdvisorConfig) -> Self {
        Self {
            provider,
            clock,
            analyzer: ChainAnalyzer::with_config(config),
            history: History::new(),
        }
    }

    /// Fetch a snapshot; provider errors pass through unchanged
    pub fn fetch(&mut self, symbol: &str) -> AdvisorResult<RawSnapshot> {
        self.provider.fetch_option_chain(symbol)
    }

    /// Expiries currently available for a symbol
    pub fn expiries(&mut self, symbol: &str) -> AdvisorResult<BTreeSet<ExpiryDate>> {
        let raw = self.fetch(symbol)?;
        self.analyzer.expiries(&raw)
    }

    /// Fetch and process one poll for the chosen expiry
    pub fn poll(&mut self, symbol: &str, expiry: &ExpiryDate) -> AdvisorResult<PollOutcome> {
        let raw = self.fetch(symbol).map_err(|e| {
            tracing::warn!(symbol, error = %e, "Fetch failed");
            e
        })?;
        self.process(symbol, &raw, expiry)
    }

    /// Analyze an already fetched snapshot and record it
    pub fn process(
        &mut self,
        symbol: &str,
        raw: &RawSnapshot,
        expiry: &ExpiryDate,
    ) -> AdvisorResult<PollOutcome> {
        let analysis = self.analyzer.analyze(raw, expiry).map_err(|e| {
            tracing::warn!(symbol, expiry = %expiry, error = %e, "Poll aborted");
            e
        })?;

        let timestamp = self.clock.timestamp();
        self.history.append(analysis.history_point(timestamp.clone()));

        tracing::info!(
            symbol,
            expiry = %expiry,
            max_pain = analysis.metrics.max_pain,
            pcr = analysis.metrics.pcr,
            sentiment = ?analysis.advice.sentiment,
            points = self.history.len(),
            "Poll recorded"
        );

        Ok(PollOutcome {
            timestamp,
            symbol: symbol.to_string(),
            analysis,
        })
    }

    /// Read-only view of the accumulated history
    pub fn history(&self) -> &History {
        &self.history
    }

    pub fn analyzer(&self) -> &ChainAnalyzer {
        &self.analyzer
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }

    pub fn provider_mut(&mut self) -> &mut P {
        &mut self.provider
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analytics::{Sentiment, TrendView};
    use crate::core::{AdvisorError, ManualClock};
    use chrono::{Duration, NaiveDate};
    use serde_json::json;

    const EXP: &str = "30-Dec-2025";

    /// Serves a queue of canned responses, one per fetch
    struct ScriptedProvider {
        responses: Vec<AdvisorResult<RawSnapshot>>,
    }

    impl ChainProvider for ScriptedProvider {
        fn fetch_option_chain(&mut self, _symbol: &str) -> AdvisorResult<RawSnapshot> {
            if self.responses.is_empty() {
                return Err(AdvisorError::fetch("script exhausted"));
            }
            self.responses.remove(0)
        }
    }

    fn side(oi: u64) -> serde_json::Value {
        json!({"openInterest": oi, "changeinOpenInterest": 0, "impliedVolatility": 10.0})
    }

    fn snapshot(call_oi: [u64; 2], put_oi: [u64; 2]) -> RawSnapshot {
        RawSnapshot::new(json!({
            "records": {"data": [
                {"strikePrice": 100, "expiryDate": EXP, "CE": side(call_oi[0]), "PE": side(put_oi[0])},
                {"strikePrice": 110, "expiryDate": EXP, "CE": side(call_oi[1]), "PE": side(put_oi[1])}
            ]}
        }))
    }

    fn clock() -> ManualClock {
        ManualClock::new(
            NaiveDate::from_ymd_opt(2025, 12, 24)
                .unwrap()
                .and_hms_opt(9, 15, 0)
                .unwrap(),
        )
    }

    #[test]
    fn test_three_polls_in_order() {
        let clock = clock();
        let provider = ScriptedProvider {
            responses: vec![
                Ok(snapshot([50, 200], [300, 10])),
                Ok(snapshot([300, 100], [100, 100])),
                Ok(snapshot([100, 100], [100, 100])),
            ],
        };
        let mut session = Session::new(provider, &clock);
        let expiry = ExpiryDate::new(EXP);

        let first = session.poll("NIFTY", &expiry).unwrap();
        assert_eq!(first.analysis.advice.sentiment, Sentiment::Bullish);
        clock.advance(Duration::minutes(5));
        session.poll("NIFTY", &expiry).unwrap();
        clock.advance(Duration::minutes(5));
        session.poll("NIFTY", &expiry).unwrap();

        let points = session.history().points();
        assert_eq!(points.len(), 3);
        assert_eq!(points[0].timestamp, "2025-12-24 09:15:00");
        assert_eq!(points[1].timestamp, "2025-12-24 09:20:00");
        assert_eq!(points[2].timestamp, "2025-12-24 09:25:00");
        assert_eq!(points[0].max_pain, 110.0);
        assert_eq!(points[1].max_pain, 100.0);
        assert_eq!(points[1].pcr, 0.5);
        assert!(session.history().render().has_trend());
    }

    #[test]
    fn test_failed_poll_appends_nothing() {
        let clock = clock();
        let provider = ScriptedProvider {
            responses: vec![
                Ok(snapshot([50, 200], [300, 10])),
                Ok(snapshot([0, 0], [300, 10])),
                Err(AdvisorError::fetch("HTTP 403")),
                Ok(RawSnapshot::new(json!({}))),
            ],
        };
        let mut session = Session::new(provider, &clock);
        let expiry = ExpiryDate::new(EXP);

        session.poll("NIFTY", &expiry).unwrap();

        assert!(matches!(
            session.poll("NIFTY", &expiry),
            Err(AdvisorError::UndefinedRatio)
        ));
        match session.poll("NIFTY", &expiry) {
            Err(AdvisorError::ProviderFetch(msg)) => assert_eq!(msg, "HTTP 403"),
            other => panic!("expected provider error, got {:?}", other.map(|o| o.timestamp)),
        }
        assert!(matches!(
            session.poll("NIFTY", &expiry),
            Err(AdvisorError::MalformedSnapshot(_))
        ));

        assert_eq!(session.history().len(), 1);
        assert_eq!(session.history().render(), TrendView::NotEnoughData { points: 1 });
    }

    #[test]
    fn test_expiries_then_process() {
        let clock = clock();
        let provider = ScriptedProvider {
            responses: vec![Ok(snapshot([50, 200], [300, 10]))],
        };
        let mut session = Session::new(provider, &clock);

        let expiries = session.expiries("NIFTY").unwrap();
        assert_eq!(expiries.len(), 1);

        let raw = snapshot([50, 200], [300, 10]);
        let expiry = expiries.into_iter().next().unwrap();
        let outcome = session.process("NIFTY", &raw, &expiry).unwrap();

        assert_eq!(outcome.symbol, "NIFTY");
        assert_eq!(outcome.analysis.metrics.pcr, 1.24);
        assert_eq!(session.history().len(), 1);
    }

    #[test]
    fn test_sessions_do_not_share_history() {
        let clock = clock();
        let mut a = Session::new(
            ScriptedProvider {
                responses: vec![Ok(snapshot([50, 200], [300, 10]))],
            },
            &clock,
        );
        let b = Session::new(ScriptedProvider { responses: vec![] }, &clock);

        a.poll("NIFTY", &ExpiryDate::new(EXP)).unwrap();
        assert_eq!(a.history().len(), 1);
        assert!(b.history().is_empty());
    }
}

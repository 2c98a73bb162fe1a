//! Plain-text dashboard
//!
//! Read-only rendering of one poll: key indicators, the history trend, the
//! leading call/put rows and the strategy suggestion.

use std::fmt::{self, Write as _};

use crate::analytics::{History, TrendView};
use crate::core::OptionSideEntry;
use crate::session::PollOutcome;

/// Borrowed view over a poll and the session history
pub struct Dashboard<'a> {
    pub outcome: &'a PollOutcome,
    pub history: &'a History,
    /// Rows per call/put table
    pub table_rows: usize,
}

impl<'a> Dashboard<'a> {
    pub fn new(outcome: &'a PollOutcome, history: &'a History) -> Self {
        Self {
            outcome,
            history,
            table_rows: 10,
        }
    }

    pub fn with_rows(mut self, rows: usize) -> Self {
        self.table_rows = rows;
        self
    }
}

impl fmt::Display for Dashboard<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let analysis = &self.outcome.analysis;
        let m = &analysis.metrics;

        writeln!(f, "Options Trading Assistant - {}", self.outcome.symbol)?;
        writeln!(f, "==========================================")?;
        write!(
            f,
            "Data last updated: {} | Expiry: {}",
            self.outcome.timestamp, analysis.expiry
        )?;
        if let Some(spot) = analysis.underlying_value {
            write!(f, " | Underlying: {:.2}", spot)?;
        }
        writeln!(f)?;

        writeln!(f, "\n--- Key Indicators ---\n")?;
        writeln!(f, "  Max Pain:                  {:.0}", m.max_pain)?;
        writeln!(f, "  PCR:                       {:.2}", m.pcr)?;
        writeln!(f, "  Support (Max Put OI):      {:.0}", m.support)?;
        writeln!(f, "  Resistance (Max Call OI):  {:.0}", m.resistance)?;
        writeln!(
            f,
            "  Total OI:                  calls {} | puts {}",
            m.total_call_oi, m.total_put_oi
        )?;

        writeln!(f, "\n--- Historical Trend ---\n")?;
        f.write_str(&render_trend(&self.history.render()))?;

        writeln!(f, "\n--- Calls (CE) ---\n")?;
        f.write_str(&render_table(m.top_calls(self.table_rows)))?;

        writeln!(f, "\n--- Puts (PE) ---\n")?;
        f.write_str(&render_table(m.top_puts(self.table_rows)))?;

        writeln!(f, "\n--- Strategy Suggestion ---\n")?;
        writeln!(
            f,
            "  {} {}",
            analysis.advice.sentiment.marker(),
            analysis.advice.sentiment.label()
        )?;
        writeln!(f, "  Strategy: {}", analysis.advice.recommendation)
    }
}

/// Trend as a table of max pain and PCR per poll
pub fn render_trend(trend: &TrendView) -> String {
    let mut out = String::new();
    match trend {
        TrendView::NotEnoughData { points } => {
            let _ = writeln!(
                out,
                "  Not enough data for a trend ({} point{}; need 2)",
                points,
                if *points == 1 { "" } else { "s" }
            );
        }
        TrendView::Series {
            timestamps,
            max_pain,
            pcr,
        } => {
            let _ = writeln!(out, "  {:<20} {:>10} {:>6}", "Time", "Max Pain", "PCR");
            for (i, ts) in timestamps.iter().enumerate() {
                let arrow = match i.checked_sub(1).map(|j| pcr[i].total_cmp(&pcr[j])) {
                    Some(std::cmp::Ordering::Greater) => "↑",
                    Some(std::cmp::Ordering::Less) => "↓",
                    _ => " ",
                };
                let _ = writeln!(
                    out,
                    "  {:<20} {:>10.0} {:>6.2} {}",
                    ts, max_pain[i], pcr[i], arrow
                );
            }
        }
    }
    out
}

/// Strike / OI / change in OI / IV table
pub fn render_table(entries: &[OptionSideEntry]) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "  {:>10} {:>12} {:>12} {:>8}",
        "Strike", "OI", "Chg OI", "IV"
    );
    for e in entries {
        let _ = writeln!(
            out,
            "  {:>10.2} {:>12} {:>12} {:>8.2}",
            e.strike, e.open_interest, e.change_in_oi, e.implied_volatility
        );
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analytics::{compute_metrics, HistoryPoint, Sentiment};
    use crate::analytics::{advise, ChainAnalysis};
    use crate::core::ExpiryDate;

    fn outcome() -> PollOutcome {
        let exp = "30-Dec-2025";
        let metrics = compute_metrics(
            vec![
                OptionSideEntry::call(100.0, exp, 50),
                OptionSideEntry::call(110.0, exp, 200),
            ],
            vec![
                OptionSideEntry::put(100.0, exp, 300),
                OptionSideEntry::put(110.0, exp, 10),
            ],
        )
        .unwrap();
        let advice = advise(metrics.pcr);

        PollOutcome {
            timestamp: "2025-12-24 09:15:00".to_string(),
            symbol: "NIFTY".to_string(),
            analysis: ChainAnalysis {
                expiry: ExpiryDate::new(exp),
                metrics,
                advice,
                underlying_value: Some(104.5),
                exchange_timestamp: None,
            },
        }
    }

    #[test]
    fn test_dashboard_sections() {
        let outcome = outcome();
        let mut history = History::new();
        history.append(outcome.analysis.history_point(outcome.timestamp.clone()));

        let text = Dashboard::new(&outcome, &history).to_string();

        assert!(text.contains("Expiry: 30-Dec-2025"));
        assert!(text.contains("Max Pain:                  110"));
        assert!(text.contains("PCR:                       1.24"));
        assert!(text.contains("Support (Max Put OI):      100"));
        assert!(text.contains("Not enough data for a trend (1 point; need 2)"));
        assert!(text.contains(Sentiment::Bullish.label()));
        assert!(text.contains("Buy Call, Bull Call Spread, Short Put"));
    }

    #[test]
    fn test_table_rows_limited() {
        let outcome = outcome();
        let history = History::new();
        let text = Dashboard::new(&outcome, &history).with_rows(1).to_string();

        // header + one row per table
        assert!(text.contains("100.00"));
        assert_eq!(text.matches("110.00").count(), 0);
    }

    #[test]
    fn test_trend_table() {
        let mut history = History::new();
        history.append(HistoryPoint::new("t0", 100.0, 0.90));
        history.append(HistoryPoint::new("t1", 110.0, 1.10));
        history.append(HistoryPoint::new("t2", 110.0, 1.00));

        let text = render_trend(&history.render());
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines.len(), 4);
        assert!(lines[2].ends_with('↑'));
        assert!(lines[3].ends_with('↓'));
    }
}

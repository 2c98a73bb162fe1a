//! Session history of max pain and PCR
//!
//! Append-only; one point per successful poll, in insertion order.

use serde::{Deserialize, Serialize};

/// One successful poll
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryPoint {
    pub timestamp: String,
    pub max_pain: f64,
    pub pcr: f64,
}

impl HistoryPoint {
    pub fn new(timestamp: impl Into<String>, max_pain: f64, pcr: f64) -> Self {
        Self {
            timestamp: timestamp.into(),
            max_pain,
            pcr,
        }
    }
}

/// Trend lines derived from a history
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum TrendView {
    /// Fewer than two points; nothing to draw
    NotEnoughData { points: usize },
    /// Parallel series, one value per point
    Series {
        timestamps: Vec<String>,
        max_pain: Vec<f64>,
        pcr: Vec<f64>,
    },
}

impl TrendView {
    pub fn has_trend(&self) -> bool {
        matches!(self, TrendView::Series { .. })
    }
}

/// Ordered, append-only series of history points
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct History {
    points: Vec<HistoryPoint>,
}

impl History {
    /// Minimum points for a trend
    pub const MIN_TREND_POINTS: usize = 2;

    pub fn new() -> Self {
        Self::default()
    }

    /// Add a point at the end
    pub fn append(&mut self, point: HistoryPoint) {
        self.points.push(point);
    }

    pub fn points(&self) -> &[HistoryPoint] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Trend lines of max pain and PCR over time
    pub fn render(&self) -> TrendView {
        if self.points.len() < Self::MIN_TREND_POINTS {
            return TrendView::NotEnoughData {
                points: self.points.len(),
            };
        }

        TrendView::Series {
            timestamps: self.points.iter().map(|p| p.timestamp.clone()).collect(),
            max_pain: self.points.iter().map(|p| p.max_pain).collect(),
            pcr: self.points.iter().map(|p| p.pcr).collect(),
        }
    }
}

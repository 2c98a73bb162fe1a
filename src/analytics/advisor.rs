//! Rule-based strategy suggestion from the put/call ratio

use super::{Advice, AdvisorConfig, Sentiment};

/// Classify a PCR with the default 0.8 / 1.2 thresholds
pub fn advise(pcr: f64) -> Advice {
    advise_with(pcr, &AdvisorConfig::default())
}

/// Classify a PCR; both thresholds themselves are neutral
pub fn advise_with(pcr: f64, config: &AdvisorConfig) -> Advice {
    let sentiment = if pcr < config.bearish_below {
        Sentiment::Bearish
    } else if pcr > config.bullish_above {
        Sentiment::Bullish
    } else {
        Sentiment::Neutral
    };

    Advice {
        sentiment,
        recommendation: sentiment.strategies().to_string(),
    }
}

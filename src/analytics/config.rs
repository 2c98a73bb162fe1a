//! Configuration for the strategy advisor

use serde::{Deserialize, Serialize};

use crate::core::{AdvisorError, AdvisorResult};

/// PCR thresholds for sentiment classification
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AdvisorConfig {
    /// PCR strictly below this is bearish
    /// Default: 0.8
    pub bearish_below: f64,

    /// PCR strictly above this is bullish
    /// Default: 1.2
    pub bullish_above: f64,
}

impl Default for AdvisorConfig {
    fn default() -> Self {
        Self {
            bearish_below: 0.8,
            bullish_above: 1.2,
        }
    }
}

impl AdvisorConfig {
    /// Reject thresholds that leave no neutral band
    pub fn validate(&self) -> AdvisorResult<()> {
        if !(self.bearish_below.is_finite() && self.bullish_above.is_finite()) {
            return Err(AdvisorError::config("advisor thresholds must be finite"));
        }
        if self.bearish_below > self.bullish_above {
            return Err(AdvisorError::config(format!(
                "bearish_below ({}) exceeds bullish_above ({})",
                self.bearish_below, self.bullish_above
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_valid() {
        assert!(AdvisorConfig::default().validate().is_ok());
    }

    #[test]
    fn test_inverted_thresholds() {
        let config = AdvisorConfig {
            bearish_below: 1.5,
            bullish_above: 1.0,
        };
        assert!(matches!(config.validate(), Err(AdvisorError::Config(_))));
    }
}

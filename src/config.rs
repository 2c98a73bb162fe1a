//! Application configuration
//!
//! Loaded from a JSON file; every field has a default so partial files work.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::analytics::AdvisorConfig;
use crate::core::{AdvisorError, AdvisorResult};
use crate::data::{CacheConfig, NseConfig, DEFAULT_SYMBOLS};
use crate::logging::LogFormat;

/// Top-level settings for the advisor binary
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Symbol polled when none is given on the command line
    pub symbol: String,
    /// Symbols offered for selection
    pub symbols: Vec<String>,
    /// Seconds between polls
    pub poll_interval_secs: u64,
    /// Rows shown in the call/put tables
    pub table_rows: usize,
    /// Log output format
    pub log_format: LogFormat,
    pub advisor: AdvisorConfig,
    pub cache: CacheConfig,
    pub nse: NseConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            symbol: DEFAULT_SYMBOLS[0].to_string(),
            symbols: DEFAULT_SYMBOLS.iter().map(|s| s.to_string()).collect(),
            poll_interval_secs: 60,
            table_rows: 10,
            log_format: LogFormat::default(),
            advisor: AdvisorConfig::default(),
            cache: CacheConfig::default(),
            nse: NseConfig::default(),
        }
    }
}

impl AppConfig {
    /// Load and validate a JSON config file
    pub fn from_file(path: impl AsRef<Path>) -> AdvisorResult<Self> {
        let path = path.as_ref();
        let json = fs::read_to_string(path)?;
        let config: AppConfig = serde_json::from_str(&json)
            .map_err(|e| AdvisorError::config(format!("{}: {}", path.display(), e)))?;
        config.validate()?;

        tracing::info!("Loaded config from {:?}", path);
        Ok(config)
    }

    /// Write this config as pretty JSON
    pub fn save(&self, path: impl AsRef<Path>) -> AdvisorResult<()> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        Ok(())
    }

    pub fn validate(&self) -> AdvisorResult<()> {
        self.advisor.validate()?;
        if self.symbol.trim().is_empty() {
            return Err(AdvisorError::config("symbol must not be empty"));
        }
        if self.poll_interval_secs == 0 {
            return Err(AdvisorError::config("poll_interval_secs must be positive"));
        }
        self.cache.validate()?;
        Ok(())
    }
}

//! NSE India option-chain fetcher
//!
//! Uses the public JSON endpoints behind the nseindia.com option-chain page.
//! The site expects a browser user agent and session cookies, so the client
//! loads the homepage once before the first API call.
//!
//! Note: NSE rate-limits aggressively and data is for personal research use.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::core::{AdvisorError, AdvisorResult, RawSnapshot};

use super::ChainProvider;

/// Symbols offered by default
pub const DEFAULT_SYMBOLS: [&str; 5] = ["NIFTY", "BANKNIFTY", "RELIANCE", "INFY", "SBIN"];

const INDEX_SYMBOLS: [&str; 5] = ["NIFTY", "BANKNIFTY", "FINNIFTY", "MIDCPNIFTY", "NIFTYNXT50"];

/// Kind of underlying, which decides the API endpoint
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SecurityType {
    Index,
    Equity,
}

/// Underlying security
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Security {
    pub symbol: String,
    pub security_type: SecurityType,
}

impl Security {
    /// Classify a symbol; anything not a known index is an equity
    pub fn for_symbol(symbol: &str) -> Self {
        let symbol = symbol.trim().to_uppercase();
        let security_type = if INDEX_SYMBOLS.contains(&symbol.as_str()) {
            SecurityType::Index
        } else {
            SecurityType::Equity
        };
        Self {
            symbol,
            security_type,
        }
    }

    /// API path for this security's option chain
    pub fn option_chain_path(&self) -> String {
        let kind = match self.security_type {
            SecurityType::Index => "indices",
            SecurityType::Equity => "equities",
        };
        format!("/api/option-chain-{}?symbol={}", kind, self.symbol)
    }
}

/// NSE client settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NseConfig {
    /// Site root
    pub base_url: String,
    /// Browser user agent sent with every request
    pub user_agent: String,
    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl Default for NseConfig {
    fn default() -> Self {
        Self {
            base_url: "https://www.nseindia.com".to_string(),
            user_agent: "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 \
                         (KHTML, like Gecko) Chrome/120.0 Safari/537.36"
                .to_string(),
            timeout_secs: 10,
        }
    }
}

/// NSE option-chain API client
pub struct NseClient {
    client: reqwest::blocking::Client,
    base_url: String,
    primed: bool,
}

impl NseClient {
    pub fn new(config: &NseConfig) -> AdvisorResult<Self> {
        let client = reqwest::blocking::Client::builder()
            .user_agent(config.user_agent.as_str())
            .cookie_store(true)
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| AdvisorError::fetch(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            primed: false,
        })
    }

    /// Load the homepage to obtain session cookies
    fn prime_session(&mut self) -> AdvisorResult<()> {
        if self.primed {
            return Ok(());
        }

        self.client
            .get(&self.base_url)
            .send()
            .and_then(|r| r.error_for_status())
            .map_err(|e| AdvisorError::fetch(format!("Session setup failed: {}", e)))?;

        self.primed = true;
        tracing::debug!("NSE session primed");
        Ok(())
    }

    /// Get the raw option chain for a security
    pub fn get_option_chain(&mut self, security: &Security) -> AdvisorResult<RawSnapshot> {
        self.prime_session()?;

        let url = format!("{}{}", self.base_url, security.option_chain_path());
        tracing::info!("Fetching option chain for {}", security.symbol);

        let response = self
            .client
            .get(&url)
            .header(reqwest::header::ACCEPT, "application/json")
            .send()
            .and_then(|r| r.error_for_status())
            .map_err(|e| {
                // Cookies may have expired; re-prime on the next call
                self.primed = false;
                AdvisorError::fetch(e.to_string())
            })?;

        let body: Value = response
            .json()
            .map_err(|e| AdvisorError::fetch(format!("Failed to parse option chain: {}", e)))?;

        Ok(RawSnapshot::new(body))
    }
}

impl ChainProvider for NseClient {
    fn fetch_option_chain(&mut self, symbol: &str) -> AdvisorResult<RawSnapshot> {
        self.get_option_chain(&Security::for_symbol(symbol))
    }
}

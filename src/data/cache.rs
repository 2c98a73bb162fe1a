//! Time-bounded snapshot caching
//!
//! Wraps any provider so repeated polls within the TTL reuse the last fetch.

use std::collections::HashMap;

use chrono::{Duration, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::core::{AdvisorError, AdvisorResult, Clock, RawSnapshot};

use super::ChainProvider;

/// Cache configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Maximum age before refetch (in seconds)
    pub ttl_secs: i64,
    /// Whether to use cache
    pub enabled: bool,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            ttl_secs: 300,
            enabled: true,
        }
    }
}

impl CacheConfig {
    /// Largest TTL a `Duration` can hold
    pub const MAX_TTL_SECS: i64 = i64::MAX / 1000;

    /// TTL as a duration, saturating at `Duration::MAX`
    pub fn ttl(&self) -> Duration {
        Duration::try_seconds(self.ttl_secs).unwrap_or(Duration::MAX)
    }

    pub fn validate(&self) -> AdvisorResult<()> {
        if self.ttl_secs < 0 {
            return Err(AdvisorError::config("cache.ttl_secs must not be negative"));
        }
        if self.ttl_secs > Self::MAX_TTL_SECS {
            return Err(AdvisorError::config(format!(
                "cache.ttl_secs must be at most {}",
                Self::MAX_TTL_SECS
            )));
        }
        Ok(())
    }
}

#[derive(Debug, Clone)]
struct CacheEntry {
    fetched_at: NaiveDateTime,
    snapshot: RawSnapshot,
}

/// Caching provider decorator
pub struct CachedProvider<P, C> {
    inner: P,
    clock: C,
    config: CacheConfig,
    entries: HashMap<String, CacheEntry>,
}

impl<P: ChainProvider, C: Clock> CachedProvider<P, C> {
    pub fn new(inner: P, clock: C, config: CacheConfig) -> Self {
        Self {
            inner,
            clock,
            config,
            entries: HashMap::new(),
        }
    }

    fn cache_key(symbol: &str) -> String {
        symbol.trim().to_uppercase()
    }

    /// Check if a cached snapshot exists and has not expired
    pub fn is_valid(&self, symbol: &str) -> bool {
        if !self.config.enabled {
            return false;
        }

        match self.entries.get(&Self::cache_key(symbol)) {
            Some(entry) => self.clock.now() - entry.fetched_at < self.config.ttl(),
            None => false,
        }
    }

    /// When the cached snapshot for a symbol was fetched
    pub fn fetched_at(&self, symbol: &str) -> Option<NaiveDateTime> {
        self.entries
            .get(&Self::cache_key(symbol))
            .map(|e| e.fetched_at)
    }

    /// When the cached snapshot for a symbol stops being served.
    ///
    /// `None` if nothing is cached or the expiry lies past the last representable date.
    pub fn expires_at(&self, symbol: &str) -> Option<NaiveDateTime> {
        self.fetched_at(symbol)
            .and_then(|t| t.checked_add_signed(self.config.ttl()))
    }

    /// Drop the cached snapshot for one symbol
    pub fn invalidate_symbol(&mut self, symbol: &str) {
        if self.entries.remove(&Self::cache_key(symbol)).is_some() {
            tracing::info!("Invalidated cached snapshot for {}", symbol);
        }
    }

    /// Drop every cached snapshot
    pub fn invalidate(&mut self) {
        tracing::info!("Invalidated {} cached snapshot(s)", self.entries.len());
        self.entries.clear();
    }

    /// Force refresh (bypass cache)
    pub fn refresh(&mut self, symbol: &str) -> AdvisorResult<RawSnapshot> {
        self.invalidate_symbol(symbol);
        self.fetch_option_chain(symbol)
    }

    pub fn inner(&self) -> &P {
        &self.inner
    }

    pub fn inner_mut(&mut self) -> &mut P {
        &mut self.inner
    }
}

impl<P: ChainProvider, C: Clock> ChainProvider for CachedProvider<P, C> {
    fn fetch_option_chain(&mut self, symbol: &str) -> AdvisorResult<RawSnapshot> {
        let key = Self::cache_key(symbol);

        if self.is_valid(&key) {
            if let Some(entry) = self.entries.get(&key) {
                tracing::debug!("Serving cached snapshot for {}", key);
                return Ok(entry.snapshot.clone());
            }
        }

        tracing::info!("Fetching fresh data for {}", key);
        let snapshot = self.inner.fetch_option_chain(&key)?;

        if self.config.enabled {
            self.entries.insert(
                key,
                CacheEntry {
                    fetched_at: self.clock.now(),
                    snapshot: snapshot.clone(),
                },
            );
        }

        Ok(snapshot)
    }
}

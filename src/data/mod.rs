//! Data fetching
//!
//! Handles:
//! - NSE India option-chain API
//! - Saved JSON snapshots for offline replay
//! - Time-bounded caching around any provider

pub mod cache;
pub mod nse;
pub mod provider;

pub use cache::*;
pub use nse::*;
pub use provider::*;

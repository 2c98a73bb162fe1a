//! Expiry filtering
//!
//! The expiry set is only known after an unfiltered pass over the snapshot, so
//! callers list expiries first and filter by the chosen one afterwards.

use crate::core::{ExpiryDate, OptionSideEntry};

/// Keep only entries with the given expiry, preserving order.
///
/// `None` passes every entry through unfiltered.
pub fn filter_by_expiry(
    entries: &[OptionSideEntry],
    expiry: Option<&ExpiryDate>,
) -> Vec<OptionSideEntry> {
    match expiry {
        Some(expiry) => entries
            .iter()
            .filter(|e| &e.expiry == expiry)
            .cloned()
            .collect(),
        None => entries.to_vec(),
    }
}

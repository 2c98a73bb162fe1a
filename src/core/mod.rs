//! Core data types for the option-chain advisor
//!
//! Defines fundamental types:
//! - RawSnapshot: provider document, unvalidated
//! - OptionSideEntry: one call or put row with strike/expiry merged in
//! - ExpiryDate: exchange expiry string with chronological ordering
//! - Clock: timestamp source for polls

pub mod clock;
pub mod error;
pub mod option;
pub mod snapshot;

pub use clock::*;
pub use error::*;
pub use option::*;
pub use snapshot::*;

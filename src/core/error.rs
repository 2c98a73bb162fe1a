//! Error types for the option-chain advisor

use thiserror::Error;

#[derive(Error, Debug)]
pub enum AdvisorError {
    #[error("Malformed snapshot: {0}")]
    MalformedSnapshot(String),

    #[error("No data for expiry: {0}")]
    NoDataForExpiry(String),

    #[error("Put/call ratio undefined: total call open interest is zero")]
    UndefinedRatio,

    #[error("Provider fetch error: {0}")]
    ProviderFetch(String),

    #[error("Config error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    IO(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

pub type AdvisorResult<T> = Result<T, AdvisorError>;

impl AdvisorError {
    pub fn malformed(msg: impl Into<String>) -> Self {
        Self::MalformedSnapshot(msg.into())
    }

    pub fn no_data(expiry: impl Into<String>) -> Self {
        Self::NoDataForExpiry(expiry.into())
    }

    pub fn fetch(msg: impl Into<String>) -> Self {
        Self::ProviderFetch(msg.into())
    }

    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// True for failures of the analytical core (as opposed to I/O around it)
    pub fn is_analysis_error(&self) -> bool {
        matches!(
            self,
            Self::MalformedSnapshot(_) | Self::NoDataForExpiry(_) | Self::UndefinedRatio
        )
    }
}

impl From<serde_json::Error> for AdvisorError {
    fn from(e: serde_json::Error) -> Self {
        Self::Serialization(e.to_string())
    }
}

//! Option-chain providers
//!
//! The analytics treat a provider's output as an opaque [`RawSnapshot`] and its
//! failures as errors to surface unchanged.

use std::fs;
use std::path::{Path, PathBuf};

use crate::core::{AdvisorError, AdvisorResult, RawSnapshot};

/// Source of option-chain snapshots
pub trait ChainProvider {
    /// Fetch the current snapshot for a symbol
    fn fetch_option_chain(&mut self, symbol: &str) -> AdvisorResult<RawSnapshot>;
}

impl<P: ChainProvider + ?Sized> ChainProvider for Box<P> {
    fn fetch_option_chain(&mut self, symbol: &str) -> AdvisorResult<RawSnapshot> {
        (**self).fetch_option_chain(symbol)
    }
}

/// Reads saved snapshots from `<dir>/<SYMBOL>.json`
#[derive(Debug, Clone)]
pub struct FileProvider {
    dir: PathBuf,
}

impl FileProvider {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path of the snapshot file for a symbol
    pub fn snapshot_path(&self, symbol: &str) -> PathBuf {
        self.dir.join(format!("{}.json", symbol.to_uppercase()))
    }

    /// Save a snapshot so it can be replayed later
    pub fn save(&self, symbol: &str, snapshot: &RawSnapshot) -> AdvisorResult<PathBuf> {
        fs::create_dir_all(&self.dir)?;
        let path = self.snapshot_path(symbol);
        let json = serde_json::to_string_pretty(snapshot)?;
        fs::write(&path, json)?;

        tracing::info!("Saved snapshot for {} at {:?}", symbol, path);
        Ok(path)
    }
}

impl ChainProvider for FileProvider {
    fn fetch_option_chain(&mut self, symbol: &str) -> AdvisorResult<RawSnapshot> {
        let path = self.snapshot_path(symbol);
        let json = fs::read_to_string(&path)
            .map_err(|e| AdvisorError::fetch(format!("{}: {}", path.display(), e)))?;

        tracing::info!("Loaded snapshot for {} from {:?}", symbol, path);
        RawSnapshot::from_json(&json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::tempdir;

    #[test]
    fn test_save_and_fetch() {
        let temp_dir = tempdir().unwrap();
        let provider = FileProvider::new(temp_dir.path());

        let snapshot = RawSnapshot::new(json!({"records": {"data": []}}));
        let path = provider.save("nifty", &snapshot).unwrap();
        assert!(path.ends_with("NIFTY.json"));

        let mut provider = provider;
        let loaded = provider.fetch_option_chain("NIFTY").unwrap();
        assert_eq!(loaded, snapshot);
    }

    #[test]
    fn test_missing_file_is_fetch_error() {
        let temp_dir = tempdir().unwrap();
        let mut provider = FileProvider::new(temp_dir.path());

        let err = provider.fetch_option_chain("SBIN").unwrap_err();
        assert!(matches!(err, AdvisorError::ProviderFetch(_)));
    }
}

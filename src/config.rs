//! Runtime configuration for the ledger binary
use super::error::Result;
use super::store::SledStore;
use std::path::PathBuf;

pub const DEFAULT_DB_PATH: &str = "trade-ledger.db";
pub const DEFAULT_LOG_FILTER: &str = "info";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LedgerConfig {
    pub db_path: PathBuf,
    // tracing-subscriber EnvFilter directive, e.g. "trade_ledger=debug"
    pub log_filter: String,
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            db_path: PathBuf::from(DEFAULT_DB_PATH),
            log_filter: DEFAULT_LOG_FILTER.to_string(),
        }
    }
}

impl LedgerConfig {
    pub fn with_db_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.db_path = path.into();
        self
    }

    pub fn with_log_filter(mut self, filter: impl Into<String>) -> Self {
        self.log_filter = filter.into();
        self
    }

    pub fn open_store(&self) -> Result<SledStore> {
        SledStore::open(&self.db_path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::StateStore;

    #[test]
    fn builder_overrides_defaults() {
        let config = LedgerConfig::default()
            .with_db_path("/tmp/ledger")
            .with_log_filter("debug");

        assert_eq!(config.db_path, PathBuf::from("/tmp/ledger"));
        assert_eq!(config.log_filter, "debug");
    }

    #[test]
    fn open_store_creates_database() {
        let dir = tempfile::tempdir().unwrap();
        let config = LedgerConfig::default().with_db_path(dir.path().join("ledger.db"));

        let store = config.open_store().unwrap();
        assert_eq!(store.get_state("abc").unwrap(), None);
    }
}

//! Shared helpers for integration tests

use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use rutc_registry::utils::fixtures::ymd;
use rutc_registry::{EntrySession, ParquetRecordStore, RegistryConfig};
use tempfile::TempDir;

/// A throwaway directory and the store path inside it
pub fn temp_store() -> (TempDir, PathBuf) {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let path = dir.path().join("registry.parquet");
    (dir, path)
}

/// Configuration pinned to a reference date
pub fn config_at(path: &Path, today: NaiveDate) -> RegistryConfig {
    RegistryConfig::default()
        .with_store_path(path)
        .with_reference_date(today)
}

/// A session over a Parquet store, calculating against 2024-06-01
pub fn parquet_session(path: &Path) -> EntrySession<ParquetRecordStore> {
    let config = config_at(path, ymd(2024, 6, 1));
    EntrySession::new(ParquetRecordStore::from_config(&config), config)
}

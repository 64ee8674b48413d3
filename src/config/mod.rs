//! Configuration for the registry entry core.

use std::path::PathBuf;

use chrono::NaiveDate;

use crate::utils::date::{DateFormatConfig, STORAGE_DATE_FORMAT};

/// Environment variable naming the record store file
pub const STORE_PATH_ENV: &str = "RUTC_REGISTRY_STORE";

/// Environment variable pinning the reference date used for age calculation
pub const REFERENCE_DATE_ENV: &str = "RUTC_REGISTRY_TODAY";

/// Default file name of the record store
pub const DEFAULT_STORE_FILE: &str = "registry.parquet";

/// Configuration for the registry
#[derive(Debug, Clone)]
pub struct RegistryConfig {
    /// Path of the Parquet file holding every registry row
    pub store_path: PathBuf,
    /// Fixed "today"; the local calendar date is used when unset
    pub reference_date: Option<NaiveDate>,
    /// Date formats accepted when reading stored dates
    pub date_format: DateFormatConfig,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            store_path: PathBuf::from(DEFAULT_STORE_FILE),
            reference_date: None,
            date_format: DateFormatConfig::default(),
        }
    }
}

impl RegistryConfig {
    /// Build a configuration from defaults overlaid with environment variables
    #[must_use]
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Some(path) = get_store_path() {
            config.store_path = path;
        }
        if let Some(date) = get_reference_date() {
            config.reference_date = Some(date);
        }
        config
    }

    /// Set the store path
    #[must_use]
    pub fn with_store_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.store_path = path.into();
        self
    }

    /// Pin the reference date
    #[must_use]
    pub fn with_reference_date(mut self, date: NaiveDate) -> Self {
        self.reference_date = Some(date);
        self
    }

    /// The reference date to calculate against
    #[must_use]
    pub fn today(&self) -> NaiveDate {
        self.reference_date
            .unwrap_or_else(|| chrono::Local::now().date_naive())
    }
}

/// Helper function to get the store path from environment
#[must_use]
pub fn get_store_path() -> Option<PathBuf> {
    std::env::var(STORE_PATH_ENV)
        .ok()
        .filter(|s| !s.trim().is_empty())
        .map(PathBuf::from)
}

/// Helper function to get the reference date from environment
#[must_use]
pub fn get_reference_date() -> Option<NaiveDate> {
    std::env::var(REFERENCE_DATE_ENV)
        .ok()
        .and_then(|s| NaiveDate::parse_from_str(s.trim(), STORAGE_DATE_FORMAT).ok())
}

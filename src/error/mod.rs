//! Error handling for the registry entry core.
//!
//! Missing prior records and malformed stored values have no variant here:
//! both degrade to default values instead of failing.

use std::io;
use std::path::PathBuf;

use arrow::error::ArrowError;
use parquet::errors::ParquetError;

/// Specialized error type for registry operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Error opening, reading or writing a file
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// Error processing Parquet data
    #[error("Parquet error: {0}")]
    Parquet(#[from] ParquetError),

    /// Error building or casting Arrow arrays
    #[error("Arrow error: {0}")]
    Arrow(#[from] ArrowError),

    /// Error reading or writing JSON
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// A submitted value failed a basic type or range check
    #[error("Validation error: {0}")]
    Validation(String),

    /// Save was requested before the derived fields were calculated
    #[error("Please calculate the age and treatment times before saving")]
    SaveWithoutComputation,

    /// Save was requested with dates or flags that differ from the last calculation
    #[error("Dates or outcome flags changed since the last calculation; calculate again before saving")]
    ComputationOutdated,

    /// Compute or save was requested before an MRN was entered
    #[error("No MRN has been entered for this session")]
    NoActiveEntry,

    /// The record store could not be persisted; the entry was not saved
    #[error("Record store at {} is unavailable: {source}", path.display())]
    StorageUnavailable {
        /// Path of the store that failed
        path: PathBuf,
        /// Underlying failure
        #[source]
        source: Box<Error>,
    },
}

impl Error {
    /// Wrap an error as a storage failure for the given path
    pub fn storage_unavailable(path: impl Into<PathBuf>, source: Self) -> Self {
        Self::StorageUnavailable {
            path: path.into(),
            source: Box::new(source),
        }
    }

    /// Whether the error is a user-facing validation message rather than a system failure
    #[must_use]
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            Self::Validation(_)
                | Self::SaveWithoutComputation
                | Self::ComputationOutdated
                | Self::NoActiveEntry
        )
    }
}

/// Result type for registry operations
pub type Result<T> = std::result::Result<T, Error>;

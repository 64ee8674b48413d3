//! Log lines for record store access.
//!
//! Reads and writes of the registry table are logged with the store
//! location and row count. Degradations that the entry session recovers from
//! go through [`log_store_warning`].

use std::fmt;
use std::time::Duration;

use log::{debug, info, warn};

/// A whole-table pass over the record store
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreOperation {
    Read,
    Write,
}

impl StoreOperation {
    fn progressive(self) -> &'static str {
        match self {
            Self::Read => "Reading",
            Self::Write => "Writing",
        }
    }

    fn completed(self) -> &'static str {
        match self {
            Self::Read => "Read",
            Self::Write => "Wrote",
        }
    }

    fn preposition(self) -> &'static str {
        match self {
            Self::Read => "from",
            Self::Write => "to",
        }
    }
}

/// Log the start of a read or write of the registry table
pub fn log_store_start(operation: StoreOperation, location: impl fmt::Display) {
    debug!("{} record store at {location}", operation.progressive());
}

/// Log a finished read or write with the number of registry rows involved
pub fn log_store_complete(
    operation: StoreOperation,
    location: impl fmt::Display,
    rows: usize,
    elapsed: Duration,
) {
    info!(
        "{} {rows} registry rows {} {location} in {elapsed:?}",
        operation.completed(),
        operation.preposition()
    );
}

/// Log a store problem the caller works around instead of failing
pub fn log_store_warning(location: impl fmt::Display, message: &str) {
    warn!("Record store {location}: {message}");
}

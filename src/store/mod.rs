//! Record store adapters
//!
//! The registry table is reached through the narrow [`RecordStore`] trait:
//! load everything, look a row up by MRN, append a row. Implementations
//! rewrite the whole table on append and hold no lock, so only one writer
//! may use a store at a time.

pub mod memory;
pub mod parquet;

use crate::error::Result;
use crate::models::record::{PatientRecord, RecordTable};
use crate::schema::columns as c;

pub use self::memory::MemoryRecordStore;
pub use self::parquet::ParquetRecordStore;

/// Normalize an MRN for comparison and storage
#[must_use]
pub fn normalize_key(key: &str) -> String {
    key.trim().to_string()
}

/// Normalize the MRN of every row in place
pub fn normalize_keys(table: &mut RecordTable) {
    for row in table.rows_mut() {
        if let Some(mrn) = row.get(c::MRN) {
            let normalized = normalize_key(mrn);
            if normalized != mrn {
                row.set(c::MRN, normalized);
            }
        }
    }
}

/// First row of the table whose normalized MRN equals the normalized key
#[must_use]
pub fn find_in_table<'a>(table: &'a RecordTable, key: &str) -> Option<&'a PatientRecord> {
    let key = normalize_key(key);
    if key.is_empty() {
        return None;
    }
    table.rows().iter().find(|row| row.mrn() == Some(key.as_str()))
}

/// Every row of the table for the normalized key, oldest first
#[must_use]
pub fn find_all_in_table<'a>(table: &'a RecordTable, key: &str) -> Vec<&'a PatientRecord> {
    let key = normalize_key(key);
    if key.is_empty() {
        return Vec::new();
    }
    table
        .rows()
        .iter()
        .filter(|row| row.mrn() == Some(key.as_str()))
        .collect()
}

/// Storage collaborator holding the registry table
pub trait RecordStore {
    /// Human readable location of the store, for logs and messages
    fn location(&self) -> String;

    /// Load every stored row
    ///
    /// A store that does not exist yet yields an empty table with the
    /// canonical column set.
    fn load_all(&self) -> Result<RecordTable>;

    /// First stored row for the MRN, if any
    fn find_by_key(&self, key: &str) -> Result<Option<PatientRecord>> {
        let table = self.load_all()?;
        Ok(find_in_table(&table, key).cloned())
    }

    /// Every stored row for the MRN, oldest first
    fn find_all_by_key(&self, key: &str) -> Result<Vec<PatientRecord>> {
        let table = self.load_all()?;
        Ok(find_all_in_table(&table, key).into_iter().cloned().collect())
    }

    /// Append a row and persist the whole table
    ///
    /// The table is reloaded first, so rows written since the last load are
    /// kept. Earlier rows for the same MRN are never replaced.
    fn append(&mut self, record: PatientRecord) -> Result<()>;
}

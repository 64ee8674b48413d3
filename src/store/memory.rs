//! In-memory record store, used by tests and dry runs.

use crate::error::Result;
use crate::models::record::{PatientRecord, RecordTable};
use crate::schema::columns as c;
use crate::store::{RecordStore, normalize_key};

/// Record store holding the table in memory
#[derive(Debug, Clone, Default)]
pub struct MemoryRecordStore {
    table: RecordTable,
}

impl MemoryRecordStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store pre-populated with rows
    #[must_use]
    pub fn with_rows(rows: impl IntoIterator<Item = PatientRecord>) -> Self {
        let mut table = RecordTable::empty();
        for row in rows {
            table.push(row);
        }
        Self { table }
    }

    /// The current table
    #[must_use]
    pub fn table(&self) -> &RecordTable {
        &self.table
    }
}

impl RecordStore for MemoryRecordStore {
    fn location(&self) -> String {
        "memory".to_string()
    }

    fn load_all(&self) -> Result<RecordTable> {
        Ok(self.table.clone())
    }

    fn append(&mut self, mut record: PatientRecord) -> Result<()> {
        let mrn = record.mrn().map(normalize_key).unwrap_or_default();
        record.set(c::MRN, mrn);
        self.table.push(record);
        Ok(())
    }
}

//! Parquet-backed record store
//!
//! The registry lives in a single Parquet file whose columns are all
//! nullable strings. Files written by older tools may carry other column
//! types or legacy column names; both are accepted on read and rewritten in
//! the canonical form on the next append.

use std::fs::File;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

use arrow::array::{Array, ArrayRef, StringArray};
use arrow::compute::cast;
use arrow::datatypes::DataType;
use arrow::record_batch::RecordBatch;
use itertools::Itertools;
use log::debug;
use parquet::arrow::ArrowWriter;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use parquet::basic::Compression;
use parquet::file::properties::WriterProperties;

use crate::config::RegistryConfig;
use crate::error::{Error, Result};
use crate::models::record::{PatientRecord, RecordTable};
use crate::models::types::is_missing_marker;
use crate::schema::{canonical_name, columns as c, table_schema};
use crate::store::{RecordStore, normalize_key, normalize_keys};
use crate::utils::logging::{
    StoreOperation, log_store_complete, log_store_start, log_store_warning,
};

/// Record store backed by one Parquet file
#[derive(Debug, Clone)]
pub struct ParquetRecordStore {
    path: PathBuf,
}

impl ParquetRecordStore {
    /// Create a store for the given file; the file need not exist yet
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Create a store at the configured path
    #[must_use]
    pub fn from_config(config: &RegistryConfig) -> Self {
        Self::new(config.store_path.clone())
    }

    /// Path of the backing file
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_table(&self) -> Result<RecordTable> {
        let start = Instant::now();
        log_store_start(StoreOperation::Read, self.path.display());

        let file = File::open(&self.path)?;
        let reader = ParquetRecordBatchReaderBuilder::try_new(file)?.build()?;

        let mut table = RecordTable::empty();
        for batch in reader {
            for row in rows_from_batch(&batch?, &self.path) {
                table.push(row);
            }
        }

        log_store_complete(
            StoreOperation::Read,
            self.path.display(),
            table.len(),
            start.elapsed(),
        );
        Ok(table)
    }

    fn write_table(&self, table: &RecordTable) -> Result<()> {
        let start = Instant::now();
        log_store_start(StoreOperation::Write, self.path.display());

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }

        let batch = table_to_batch(table)?;
        let props = WriterProperties::builder()
            .set_compression(Compression::SNAPPY)
            .build();
        let file = File::create(&self.path)?;
        let mut writer = ArrowWriter::try_new(file, batch.schema(), Some(props))?;
        writer.write(&batch)?;
        writer.close()?;

        log_store_complete(
            StoreOperation::Write,
            self.path.display(),
            table.len(),
            start.elapsed(),
        );
        Ok(())
    }
}

impl RecordStore for ParquetRecordStore {
    fn location(&self) -> String {
        self.path.display().to_string()
    }

    fn load_all(&self) -> Result<RecordTable> {
        if !self.path.exists() {
            debug!("No record store at {}, starting empty", self.path.display());
            return Ok(RecordTable::empty());
        }
        self.read_table()
    }

    fn append(&mut self, mut record: PatientRecord) -> Result<()> {
        let mut table = self
            .load_all()
            .map_err(|e| Error::storage_unavailable(&self.path, e))?;
        normalize_keys(&mut table);

        let mrn = record.mrn().map(normalize_key).unwrap_or_default();
        record.set(c::MRN, mrn);
        table.push(record);

        self.write_table(&table)
            .map_err(|e| Error::storage_unavailable(&self.path, e))
    }
}

/// Convert one stored batch into rows
///
/// Every column is cast to text. Columns that cannot be cast are skipped
/// with a warning. Legacy column names are mapped onto their canonical
/// names; when both spellings are present the first non-missing value wins.
fn rows_from_batch(batch: &RecordBatch, path: &Path) -> Vec<PatientRecord> {
    let schema = batch.schema();
    let columns = schema
        .fields()
        .iter()
        .zip(batch.columns())
        .filter_map(|(field, array)| {
            let name = canonical_name(field.name())
                .map_or_else(|| field.name().trim().to_string(), str::to_string);
            match cast(array, &DataType::Utf8) {
                Ok(text) => Some((name, text)),
                Err(e) => {
                    log_store_warning(
                        path.display(),
                        &format!("skipping column {} that cannot be read as text ({e})", field.name()),
                    );
                    None
                }
            }
        })
        .collect_vec();

    (0..batch.num_rows())
        .map(|index| {
            let mut row = PatientRecord::new();
            for (name, array) in &columns {
                let Some(text) = array.as_any().downcast_ref::<StringArray>() else {
                    continue;
                };
                let value = if text.is_null(index) {
                    String::new()
                } else {
                    text.value(index).to_string()
                };
                let keep_existing = row.get(name).is_some_and(|v| !is_missing_marker(v));
                if !keep_existing {
                    row.set(name.as_str(), value);
                }
            }
            row
        })
        .collect()
}

/// Build a string-typed batch holding every row of the table
fn table_to_batch(table: &RecordTable) -> Result<RecordBatch> {
    let schema = Arc::new(table_schema(table.columns()));
    let arrays = table
        .columns()
        .iter()
        .map(|column| {
            let values = table.rows().iter().map(|row| row.get(column)).collect_vec();
            Arc::new(StringArray::from(values)) as ArrayRef
        })
        .collect_vec();
    Ok(RecordBatch::try_new(schema, arrays)?)
}

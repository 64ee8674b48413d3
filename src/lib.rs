//! A Rust library for the renal and upper tract cancer radiotherapy registry: per-patient
//! entry defaults from prior rows, derived age and follow-up intervals, and
//! append-only storage in a Parquet table.

pub mod algorithm;
pub mod config;
pub mod error;
pub mod models;
pub mod schema;
pub mod session;
pub mod store;
pub mod utils;

// Re-export the most common types for easier use
// Core types
pub use config::RegistryConfig;
pub use error::{Error, Result};
pub use models::{Conditional, EntryForm, OutcomeEvent, OutcomeKind, PatientRecord, RecordTable};
pub use session::{EntrySession, SessionState};

// Storage
pub use store::{MemoryRecordStore, ParquetRecordStore, RecordStore};

// Calculations
pub use algorithm::{DerivedInputs, DerivedResults, age_on, compute_derived, form_defaults, months_between};

// Multi-valued encoding
pub use schema::{decode_list, encode_list};

//! Domain models for registry entries and stored rows.

pub mod entry;
pub mod record;
pub mod types;

pub use entry::{EntryForm, OutcomeEvent, OutcomeKind, ToxicityAssessment};
pub use record::{PatientRecord, RecordTable};
pub use types::{Conditional, NOT_APPLICABLE, is_missing_marker, parse_yes_no, yes_no};

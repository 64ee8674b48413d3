//! Stored registry rows
//!
//! A `PatientRecord` is one row of the registry table: a map from column
//! name to stored text. Rows are append-only; correcting an entry means
//! saving a new row for the same MRN.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::Serialize;

use crate::algorithm::derived::DerivedResults;
use crate::models::entry::{EntryForm, OutcomeKind};
use crate::models::types::{NOT_APPLICABLE, is_missing_marker, yes_no};
use crate::schema::{canonical_columns, columns as c, encode_list};
use crate::utils::date::format_storage_date;

/// One row of the registry table
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct PatientRecord {
    values: BTreeMap<String, String>,
}

impl PatientRecord {
    /// Create an empty row
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Raw stored text of a column, if the column is present
    #[must_use]
    pub fn get(&self, column: &str) -> Option<&str> {
        self.values.get(column).map(String::as_str)
    }

    /// Stored text of a column, treating missing-value markers as absent
    #[must_use]
    pub fn value(&self, column: &str) -> Option<&str> {
        self.get(column).filter(|v| !is_missing_marker(v))
    }

    /// Set the stored text of a column
    pub fn set(&mut self, column: impl Into<String>, value: impl Into<String>) {
        self.values.insert(column.into(), value.into());
    }

    /// The MRN of the row, trimmed
    #[must_use]
    pub fn mrn(&self) -> Option<&str> {
        self.get(c::MRN).map(str::trim)
    }

    /// Column names present in the row
    pub fn columns(&self) -> impl Iterator<Item = &str> {
        self.values.keys().map(String::as_str)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Build the row saved for an entry
    ///
    /// Every canonical column is written. Columns governed by a flag that is
    /// not set hold the "N/A" sentinel, whatever the form carries for them.
    #[must_use]
    pub fn from_entry(mrn: &str, form: &EntryForm, derived: &DerivedResults) -> Self {
        let date = format_storage_date;
        let conditional_date = |flag: bool, d: Option<NaiveDate>| match (flag, d) {
            (true, Some(d)) => format_storage_date(d),
            _ => NOT_APPLICABLE.to_string(),
        };

        let mut row = Self::new();
        row.set(c::MRN, mrn.trim());
        row.set(c::DATE_OF_BIRTH, date(form.date_of_birth));
        row.set(c::AGE, derived.age.to_string());
        row.set(c::LAST_RADIOTHERAPY_DATE, date(form.last_radiotherapy_date));
        row.set(c::FOLLOW_UP_DATE, date(form.follow_up_date));
        row.set(c::FOLLOW_UP_TIME, derived.time_since_treatment.to_string());

        row.set(c::HISTOLOGY, encode_list(&form.histology));
        row.set(c::GRADE, form.grade.as_str());
        row.set(c::TUMOR_FOCALITY, form.tumor_focality.as_str());
        row.set(c::CLINICAL_STAGE, encode_list(&form.clinical_stage));
        row.set(c::CONFIRMATORY_PROCEDURE, form.confirmatory_procedure.as_str());
        row.set(c::BIOPSY_DATE, date(form.biopsy_date));

        let recurrent = form.recurrent_tumor;
        row.set(c::RECURRENT_TUMOR, yes_no(recurrent));
        row.set(c::RECURRENCE_DATE, conditional_date(recurrent, form.recurrence_date));
        row.set(
            c::SURGERY_TYPE,
            form.surgery_type
                .as_deref()
                .filter(|_| recurrent)
                .unwrap_or(NOT_APPLICABLE),
        );
        row.set(c::SURGERY_DATE, conditional_date(recurrent, form.surgery_date));

        row.set(c::SYSTEMIC_TREATMENT, encode_list(&form.systemic_treatment));
        row.set(
            c::SYSTEMIC_TREATMENT_FIRST_DATE,
            date(form.systemic_treatment_first_date),
        );
        row.set(
            c::SYSTEMIC_TREATMENT_LAST_DATE,
            date(form.systemic_treatment_last_date),
        );
        row.set(c::DOSE, encode_list(&form.dose));
        row.set(c::FRACTIONATION, encode_list(&form.fractionation));

        for (column, value) in form.toxicity.graded_fields() {
            row.set(column, value);
        }
        row.set(
            c::URETERAL_STENOSIS_DATE,
            conditional_date(
                form.toxicity.has_ureteral_stenosis(),
                form.toxicity.ureteral_stenosis_date,
            ),
        );

        for kind in OutcomeKind::ALL {
            let event = form.outcome(kind);
            row.set(kind.flag_column(), yes_no(event.occurred));
            row.set(kind.date_column(), conditional_date(event.occurred, event.date));
            row.set(kind.interval_column(), derived.interval(kind).to_string());
        }
        row.set(
            c::CANCER_RELATED_DEATH,
            derived.cancer_related_death.map(yes_no).to_string(),
        );

        row
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for PatientRecord {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            values: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

/// The whole registry table: a column order plus every row
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordTable {
    columns: Vec<String>,
    rows: Vec<PatientRecord>,
}

impl Default for RecordTable {
    fn default() -> Self {
        Self::empty()
    }
}

impl RecordTable {
    /// An empty table with the canonical column set
    #[must_use]
    pub fn empty() -> Self {
        Self {
            columns: canonical_columns().into_iter().map(str::to_string).collect(),
            rows: Vec::new(),
        }
    }

    /// Column names in storage order
    #[must_use]
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Every row in insertion order
    #[must_use]
    pub fn rows(&self) -> &[PatientRecord] {
        &self.rows
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Append a row, extending the column list with any column it introduces
    pub fn push(&mut self, row: PatientRecord) {
        for column in row.columns() {
            if !self.columns.iter().any(|c| c == column) {
                self.columns.push(column.to_string());
            }
        }
        self.rows.push(row);
    }

    /// Mutable access to the rows
    pub fn rows_mut(&mut self) -> &mut [PatientRecord] {
        &mut self.rows
    }
}

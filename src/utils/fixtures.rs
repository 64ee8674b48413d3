//! Test fixtures
//!
//! Sample entries shared by unit tests, integration tests and the CLI's
//! `template` command.

use chrono::NaiveDate;

use crate::models::entry::{EntryForm, OutcomeEvent, ToxicityAssessment};

/// Build a date, panicking on an invalid calendar day
///
/// # Panics
/// Panics if the year, month and day do not form a valid date.
#[must_use]
pub fn ymd(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day)
        .unwrap_or_else(|| panic!("invalid fixture date {year}-{month}-{day}"))
}

/// A complete entry with no outcome events
///
/// Born 1990-06-01, last radiotherapy 2023-01-15, followed up 2024-03-01.
#[must_use]
pub fn sample_entry_form() -> EntryForm {
    EntryForm {
        date_of_birth: ymd(1990, 6, 1),
        last_radiotherapy_date: ymd(2023, 1, 15),
        follow_up_date: ymd(2024, 3, 1),
        histology: vec!["Renal Cell Carcinoma".into()],
        grade: "II".into(),
        tumor_focality: "Unifocal".into(),
        clinical_stage: vec!["cT1a".into(), "cN0".into(), "M0".into()],
        confirmatory_procedure: "Biopsy".into(),
        biopsy_date: ymd(2022, 11, 2),
        recurrent_tumor: false,
        recurrence_date: None,
        surgery_type: None,
        surgery_date: None,
        systemic_treatment: vec!["None".into()],
        systemic_treatment_first_date: ymd(2022, 12, 1),
        systemic_treatment_last_date: ymd(2022, 12, 1),
        dose: vec!["26Gy".into()],
        fractionation: vec!["1".into()],
        toxicity: ToxicityAssessment::default(),
        local_recurrence: OutcomeEvent::absent(),
        regional_recurrence: OutcomeEvent::absent(),
        distant_recurrence: OutcomeEvent::absent(),
        death: OutcomeEvent::absent(),
        cancer_related_death: None,
    }
}

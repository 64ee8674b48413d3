//! Defaulting and merge engine
//!
//! Turns an optional prior row into default values for every field of the
//! entry form. Stored values that are absent, hold a missing marker or
//! cannot be coerced to the field's shape fall back silently: a damaged
//! row must never block an entry session.

use chrono::NaiveDate;
use log::debug;

use crate::models::entry::{EntryForm, OutcomeEvent, OutcomeKind, ToxicityAssessment};
use crate::models::record::PatientRecord;
use crate::models::types::parse_yes_no;
use crate::schema::{self, columns as c, decode_list};
use crate::utils::date::{DateFormatConfig, parse_date_string};

/// Placeholder date used when a prior row exists but a date is unusable
pub const LEGACY_MISSING_DATE: NaiveDate = match NaiveDate::from_ymd_opt(1900, 1, 1) {
    Some(date) => date,
    None => NaiveDate::MIN,
};

/// Stored scalar value, or `fallback` when there is no usable value
#[must_use]
pub fn resolve_default(record: Option<&PatientRecord>, column: &str, fallback: &str) -> String {
    record
        .and_then(|r| r.value(column))
        .map_or_else(|| fallback.to_string(), |v| v.trim().to_string())
}

/// Stored date, or `fallback` when there is no usable value
#[must_use]
pub fn resolve_default_date(
    record: Option<&PatientRecord>,
    column: &str,
    fallback: NaiveDate,
    config: &DateFormatConfig,
) -> NaiveDate {
    resolve_optional_date(record, column, config).unwrap_or(fallback)
}

/// Stored date, or `None` when there is no usable value
#[must_use]
pub fn resolve_optional_date(
    record: Option<&PatientRecord>,
    column: &str,
    config: &DateFormatConfig,
) -> Option<NaiveDate> {
    let value = record?.value(column)?;
    let date = parse_date_string(value, config);
    if date.is_none() {
        debug!("Ignoring unparseable date {value:?} in column {column}");
    }
    date
}

/// Stored multi-valued selection, or an empty list
///
/// Both the versioned encoding and the legacy bracket-quote layout are read.
#[must_use]
pub fn resolve_default_list(record: Option<&PatientRecord>, column: &str) -> Vec<String> {
    record
        .and_then(|r| r.value(column))
        .map(decode_list)
        .unwrap_or_default()
}

/// Stored choice, or the field's fallback when the value is not a known option
#[must_use]
pub fn resolve_default_choice(record: Option<&PatientRecord>, column: &str) -> String {
    let Some(field) = schema::field(column) else {
        return resolve_default(record, column, "");
    };
    let fallback = field.fallback.unwrap_or_default();
    let value = resolve_default(record, column, fallback);
    if field.allows(&value) {
        value
    } else {
        debug!("Ignoring unknown option {value:?} for {column}");
        fallback.to_string()
    }
}

/// Stored Yes/No flag, `false` when absent or unreadable
#[must_use]
pub fn resolve_default_flag(record: Option<&PatientRecord>, column: &str) -> bool {
    record
        .and_then(|r| r.value(column))
        .and_then(parse_yes_no)
        .unwrap_or(false)
}

/// Stored selection restricted to the field's options
fn resolve_known_options(record: Option<&PatientRecord>, column: &str) -> Vec<String> {
    let items = resolve_default_list(record, column);
    match schema::field(column) {
        Some(field) => items
            .into_iter()
            .filter(|item| {
                let known = field.allows(item);
                if !known {
                    debug!("Dropping unknown option {item:?} from {column}");
                }
                known
            })
            .collect(),
        None => items,
    }
}

/// Default values for every field of the entry form
///
/// Without a prior row dates default to `today`, choices to their field
/// fallback, selections to empty and flags to "No". With a prior row the
/// stored values are used, and unusable dates fall back to 1900-01-01.
/// Conditional values are only seeded when their governing flag is set.
#[must_use]
pub fn form_defaults(
    record: Option<&PatientRecord>,
    today: NaiveDate,
    config: &DateFormatConfig,
) -> EntryForm {
    let date_fallback = if record.is_some() {
        LEGACY_MISSING_DATE
    } else {
        today
    };
    let date = |column: &str| resolve_default_date(record, column, date_fallback, config);
    let choice = |column: &str| resolve_default_choice(record, column);

    let recurrent_tumor = resolve_default_flag(record, c::RECURRENT_TUMOR);

    let ureteral_stenosis = choice(c::URETERAL_STENOSIS);
    let toxicity = ToxicityAssessment {
        dysuria: choice(c::DYSURIA),
        cystitis: choice(c::CYSTITIS),
        bladder_perforation: choice(c::BLADDER_PERFORATION),
        hematuria: choice(c::HEMATURIA),
        urinary_fistula: choice(c::URINARY_FISTULA),
        urinary_obstruction: choice(c::URINARY_OBSTRUCTION),
        ureteral_stenosis_date: (ureteral_stenosis == "Present")
            .then(|| resolve_optional_date(record, c::URETERAL_STENOSIS_DATE, config))
            .flatten(),
        ureteral_stenosis,
        diarrhea: choice(c::DIARRHEA),
        nausea: choice(c::NAUSEA),
        bowel_perforation: choice(c::BOWEL_PERFORATION),
        bowel_obstruction: choice(c::BOWEL_OBSTRUCTION),
        fatigue: choice(c::FATIGUE),
        overall_tolerance: choice(c::OVERALL_TOLERANCE),
    };

    let outcome = |kind: OutcomeKind| {
        let occurred = resolve_default_flag(record, kind.flag_column());
        OutcomeEvent {
            occurred,
            date: occurred
                .then(|| resolve_optional_date(record, kind.date_column(), config))
                .flatten(),
        }
    };
    let death = outcome(OutcomeKind::Death);

    EntryForm {
        date_of_birth: date(c::DATE_OF_BIRTH),
        last_radiotherapy_date: date(c::LAST_RADIOTHERAPY_DATE),
        follow_up_date: date(c::FOLLOW_UP_DATE),
        histology: resolve_known_options(record, c::HISTOLOGY),
        grade: choice(c::GRADE),
        tumor_focality: choice(c::TUMOR_FOCALITY),
        clinical_stage: resolve_known_options(record, c::CLINICAL_STAGE),
        confirmatory_procedure: choice(c::CONFIRMATORY_PROCEDURE),
        biopsy_date: date(c::BIOPSY_DATE),
        recurrent_tumor,
        recurrence_date: recurrent_tumor
            .then(|| resolve_optional_date(record, c::RECURRENCE_DATE, config))
            .flatten(),
        surgery_type: recurrent_tumor.then(|| choice(c::SURGERY_TYPE)),
        surgery_date: recurrent_tumor
            .then(|| resolve_optional_date(record, c::SURGERY_DATE, config))
            .flatten(),
        systemic_treatment: resolve_known_options(record, c::SYSTEMIC_TREATMENT),
        systemic_treatment_first_date: date(c::SYSTEMIC_TREATMENT_FIRST_DATE),
        systemic_treatment_last_date: date(c::SYSTEMIC_TREATMENT_LAST_DATE),
        dose: resolve_known_options(record, c::DOSE),
        fractionation: resolve_known_options(record, c::FRACTIONATION),
        toxicity,
        local_recurrence: outcome(OutcomeKind::LocalRecurrence),
        regional_recurrence: outcome(OutcomeKind::RegionalRecurrence),
        distant_recurrence: outcome(OutcomeKind::DistantRecurrence),
        cancer_related_death: death
            .occurred
            .then(|| resolve_default_flag(record, c::CANCER_RELATED_DEATH)),
        death,
    }
}

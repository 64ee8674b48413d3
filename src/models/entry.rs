//! Entry form model
//!
//! `EntryForm` holds the raw values of one registry entry as the form
//! collaborator supplies them. The same shape is returned as defaults when
//! an MRN is looked up, so the form can be seeded and edited in place.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::schema::{self, FieldType, columns as c};

/// Earliest accepted date of birth
pub const MIN_BIRTH_DATE: NaiveDate = match NaiveDate::from_ymd_opt(1900, 1, 1) {
    Some(date) => date,
    None => NaiveDate::MIN,
};

/// Which of the four outcome events a value belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OutcomeKind {
    LocalRecurrence,
    RegionalRecurrence,
    DistantRecurrence,
    Death,
}

impl OutcomeKind {
    pub const ALL: [Self; 4] = [
        Self::LocalRecurrence,
        Self::RegionalRecurrence,
        Self::DistantRecurrence,
        Self::Death,
    ];

    /// Column holding the Yes/No flag
    #[must_use]
    pub fn flag_column(self) -> &'static str {
        match self {
            Self::LocalRecurrence => c::LOCAL_RECURRENCE,
            Self::RegionalRecurrence => c::REGIONAL_RECURRENCE,
            Self::DistantRecurrence => c::DISTANT_RECURRENCE,
            Self::Death => c::DEATH,
        }
    }

    /// Column holding the event date
    #[must_use]
    pub fn date_column(self) -> &'static str {
        match self {
            Self::LocalRecurrence => c::LOCAL_RECURRENCE_DATE,
            Self::RegionalRecurrence => c::REGIONAL_RECURRENCE_DATE,
            Self::DistantRecurrence => c::DISTANT_RECURRENCE_DATE,
            Self::Death => c::DEATH_DATE,
        }
    }

    /// Column holding the months from last radiotherapy to the event
    #[must_use]
    pub fn interval_column(self) -> &'static str {
        match self {
            Self::LocalRecurrence => c::TIME_TO_LOCAL_RECURRENCE,
            Self::RegionalRecurrence => c::TIME_TO_REGIONAL_RECURRENCE,
            Self::DistantRecurrence => c::TIME_TO_DISTANT_RECURRENCE,
            Self::Death => c::TIME_TO_DEATH,
        }
    }

    /// Human readable label
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::LocalRecurrence => "Local Recurrence",
            Self::RegionalRecurrence => "Regional Recurrence",
            Self::DistantRecurrence => "Distant Recurrence",
            Self::Death => "Death",
        }
    }
}

/// An outcome flag and, when it is set, the date of the event
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutcomeEvent {
    /// Whether the event occurred
    #[serde(default)]
    pub occurred: bool,
    /// Date of the event; ignored when `occurred` is false
    #[serde(default)]
    pub date: Option<NaiveDate>,
}

impl OutcomeEvent {
    /// An event that occurred on `date`
    #[must_use]
    pub fn on(date: NaiveDate) -> Self {
        Self {
            occurred: true,
            date: Some(date),
        }
    }

    /// An event that did not occur
    #[must_use]
    pub fn absent() -> Self {
        Self::default()
    }

    /// The event date, only when the event occurred
    #[must_use]
    pub fn effective_date(&self) -> Option<NaiveDate> {
        if self.occurred { self.date } else { None }
    }
}

/// CTCAE v5 graded adverse events and overall tolerance
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ToxicityAssessment {
    pub dysuria: String,
    pub cystitis: String,
    pub bladder_perforation: String,
    pub hematuria: String,
    pub urinary_fistula: String,
    pub urinary_obstruction: String,
    pub ureteral_stenosis: String,
    /// Only collected when ureteral stenosis is present
    pub ureteral_stenosis_date: Option<NaiveDate>,
    pub diarrhea: String,
    pub nausea: String,
    pub bowel_perforation: String,
    pub bowel_obstruction: String,
    pub fatigue: String,
    pub overall_tolerance: String,
}

impl Default for ToxicityAssessment {
    fn default() -> Self {
        let fallback = |column: &str| {
            schema::field(column)
                .and_then(|f| f.fallback)
                .unwrap_or_default()
                .to_string()
        };
        Self {
            dysuria: fallback(c::DYSURIA),
            cystitis: fallback(c::CYSTITIS),
            bladder_perforation: fallback(c::BLADDER_PERFORATION),
            hematuria: fallback(c::HEMATURIA),
            urinary_fistula: fallback(c::URINARY_FISTULA),
            urinary_obstruction: fallback(c::URINARY_OBSTRUCTION),
            ureteral_stenosis: fallback(c::URETERAL_STENOSIS),
            ureteral_stenosis_date: None,
            diarrhea: fallback(c::DIARRHEA),
            nausea: fallback(c::NAUSEA),
            bowel_perforation: fallback(c::BOWEL_PERFORATION),
            bowel_obstruction: fallback(c::BOWEL_OBSTRUCTION),
            fatigue: fallback(c::FATIGUE),
            overall_tolerance: fallback(c::OVERALL_TOLERANCE),
        }
    }
}

impl ToxicityAssessment {
    /// Graded values paired with their column names
    #[must_use]
    pub fn graded_fields(&self) -> [(&'static str, &str); 13] {
        [
            (c::DYSURIA, self.dysuria.as_str()),
            (c::CYSTITIS, self.cystitis.as_str()),
            (c::BLADDER_PERFORATION, self.bladder_perforation.as_str()),
            (c::HEMATURIA, self.hematuria.as_str()),
            (c::URINARY_FISTULA, self.urinary_fistula.as_str()),
            (c::URINARY_OBSTRUCTION, self.urinary_obstruction.as_str()),
            (c::URETERAL_STENOSIS, self.ureteral_stenosis.as_str()),
            (c::DIARRHEA, self.diarrhea.as_str()),
            (c::NAUSEA, self.nausea.as_str()),
            (c::BOWEL_PERFORATION, self.bowel_perforation.as_str()),
            (c::BOWEL_OBSTRUCTION, self.bowel_obstruction.as_str()),
            (c::FATIGUE, self.fatigue.as_str()),
            (c::OVERALL_TOLERANCE, self.overall_tolerance.as_str()),
        ]
    }

    /// Whether ureteral stenosis was recorded as present
    #[must_use]
    pub fn has_ureteral_stenosis(&self) -> bool {
        self.ureteral_stenosis == "Present"
    }
}

/// Raw values of one registry entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntryForm {
    // Patient details
    pub date_of_birth: NaiveDate,
    pub last_radiotherapy_date: NaiveDate,
    pub follow_up_date: NaiveDate,

    // Diagnosis
    #[serde(default)]
    pub histology: Vec<String>,
    pub grade: String,
    pub tumor_focality: String,
    #[serde(default)]
    pub clinical_stage: Vec<String>,
    pub confirmatory_procedure: String,
    pub biopsy_date: NaiveDate,

    // Recurrence and surgery, only collected when `recurrent_tumor` is set
    #[serde(default)]
    pub recurrent_tumor: bool,
    #[serde(default)]
    pub recurrence_date: Option<NaiveDate>,
    #[serde(default)]
    pub surgery_type: Option<String>,
    #[serde(default)]
    pub surgery_date: Option<NaiveDate>,

    // Systemic treatment
    #[serde(default)]
    pub systemic_treatment: Vec<String>,
    pub systemic_treatment_first_date: NaiveDate,
    pub systemic_treatment_last_date: NaiveDate,

    // Treatment delivery
    #[serde(default)]
    pub dose: Vec<String>,
    #[serde(default)]
    pub fractionation: Vec<String>,

    #[serde(default)]
    pub toxicity: ToxicityAssessment,

    // Outcome events
    #[serde(default)]
    pub local_recurrence: OutcomeEvent,
    #[serde(default)]
    pub regional_recurrence: OutcomeEvent,
    #[serde(default)]
    pub distant_recurrence: OutcomeEvent,
    #[serde(default)]
    pub death: OutcomeEvent,
    /// Only collected when death occurred
    #[serde(default)]
    pub cancer_related_death: Option<bool>,
}

impl EntryForm {
    /// The outcome event of the given kind
    #[must_use]
    pub fn outcome(&self, kind: OutcomeKind) -> &OutcomeEvent {
        match kind {
            OutcomeKind::LocalRecurrence => &self.local_recurrence,
            OutcomeKind::RegionalRecurrence => &self.regional_recurrence,
            OutcomeKind::DistantRecurrence => &self.distant_recurrence,
            OutcomeKind::Death => &self.death,
        }
    }

    /// Mutable access to the outcome event of the given kind
    pub fn outcome_mut(&mut self, kind: OutcomeKind) -> &mut OutcomeEvent {
        match kind {
            OutcomeKind::LocalRecurrence => &mut self.local_recurrence,
            OutcomeKind::RegionalRecurrence => &mut self.regional_recurrence,
            OutcomeKind::DistantRecurrence => &mut self.distant_recurrence,
            OutcomeKind::Death => &mut self.death,
        }
    }

    /// Check types and ranges of the submitted values
    ///
    /// Choice values must come from the field's option list, the date of
    /// birth must lie between 1900-01-01 and `today`, and every field
    /// governed by a set flag must be present. Follow-up and occurred event
    /// dates may not precede the last radiotherapy, so no derived interval
    /// is negative.
    pub fn validate(&self, today: NaiveDate) -> Result<()> {
        if self.date_of_birth < MIN_BIRTH_DATE || self.date_of_birth > today {
            return Err(Error::Validation(format!(
                "Date of Birth {} must be between {MIN_BIRTH_DATE} and {today}",
                self.date_of_birth
            )));
        }
        check_not_before_radiotherapy(
            self.follow_up_date,
            c::FOLLOW_UP_DATE,
            self.last_radiotherapy_date,
        )?;

        check_choice(c::GRADE, self.grade.as_str())?;
        check_choice(c::TUMOR_FOCALITY, self.tumor_focality.as_str())?;
        check_choice(c::CONFIRMATORY_PROCEDURE, self.confirmatory_procedure.as_str())?;
        check_selection(c::HISTOLOGY, &self.histology)?;
        check_selection(c::CLINICAL_STAGE, &self.clinical_stage)?;
        check_selection(c::SYSTEMIC_TREATMENT, &self.systemic_treatment)?;
        check_selection(c::DOSE, &self.dose)?;
        check_selection(c::FRACTIONATION, &self.fractionation)?;

        for (column, value) in self.toxicity.graded_fields() {
            check_choice(column, value)?;
        }
        if self.toxicity.has_ureteral_stenosis() {
            require(self.toxicity.ureteral_stenosis_date, c::URETERAL_STENOSIS_DATE)?;
        }

        if self.recurrent_tumor {
            require(self.recurrence_date, c::RECURRENCE_DATE)?;
            let surgery_type = require(self.surgery_type.as_deref(), c::SURGERY_TYPE)?;
            check_choice(c::SURGERY_TYPE, surgery_type)?;
            require(self.surgery_date, c::SURGERY_DATE)?;
        }

        for kind in OutcomeKind::ALL {
            let event = self.outcome(kind);
            if event.occurred {
                let date = require(event.date, kind.date_column())?;
                check_not_before_radiotherapy(date, kind.date_column(), self.last_radiotherapy_date)?;
            }
        }

        Ok(())
    }
}

fn describe(column: &str) -> &str {
    schema::field(column).map_or(column, |f| f.description)
}

fn require<T>(value: Option<T>, column: &str) -> Result<T> {
    value.ok_or_else(|| Error::Validation(format!("{} is required", describe(column))))
}

/// Follow-up and event dates must not precede the last radiotherapy
fn check_not_before_radiotherapy(
    date: NaiveDate,
    column: &str,
    last_radiotherapy: NaiveDate,
) -> Result<()> {
    if date < last_radiotherapy {
        return Err(Error::Validation(format!(
            "{} {date} is before the last radiotherapy on {last_radiotherapy}",
            describe(column)
        )));
    }
    Ok(())
}

fn check_choice(column: &str, value: &str) -> Result<()> {
    match schema::field(column) {
        Some(field) if field.field_type == FieldType::Choice && !field.allows(value) => {
            Err(Error::Validation(format!(
                "{value:?} is not a valid option for {}",
                field.description
            )))
        }
        _ => Ok(()),
    }
}

fn check_selection(column: &str, values: &[String]) -> Result<()> {
    if let Some(field) = schema::field(column) {
        if let Some(bad) = values.iter().find(|v| !field.allows(v)) {
            return Err(Error::Validation(format!(
                "{bad:?} is not a valid option for {}",
                field.description
            )));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::fixtures::{sample_entry_form as sample_form, ymd};

    #[test]
    fn test_valid_form() {
        assert!(sample_form().validate(ymd(2024, 6, 1)).is_ok());
    }

    #[test]
    fn test_default_toxicity_uses_fallbacks() {
        let toxicity = ToxicityAssessment::default();
        assert_eq!(toxicity.dysuria, "Absent");
        assert_eq!(toxicity.cystitis, "None");
        assert_eq!(toxicity.overall_tolerance, "Excellent");
        assert!(!toxicity.has_ureteral_stenosis());
    }

    #[test]
    fn test_unknown_grade_rejected() {
        let mut form = sample_form();
        form.grade = "VII".into();
        assert!(matches!(
            form.validate(ymd(2024, 6, 1)),
            Err(Error::Validation(_))
        ));
    }

    #[test]
    fn test_unknown_selection_rejected() {
        let mut form = sample_form();
        form.clinical_stage.push("cT9".into());
        assert!(form.validate(ymd(2024, 6, 1)).is_err());
    }

    #[test]
    fn test_birth_date_after_today_rejected() {
        let form = sample_form();
        assert!(form.validate(ymd(1980, 1, 1)).is_err());
    }

    #[test]
    fn test_occurred_event_requires_date() {
        let mut form = sample_form();
        form.death = OutcomeEvent {
            occurred: true,
            date: None,
        };
        let err = form.validate(ymd(2024, 6, 1)).unwrap_err();
        assert!(err.to_string().contains("Date of Death"));
    }

    #[test]
    fn test_follow_up_before_radiotherapy_rejected() {
        let mut form = sample_form();
        form.follow_up_date = ymd(2022, 1, 1);
        let err = form.validate(ymd(2024, 6, 1)).unwrap_err();
        assert!(err.to_string().contains("Date of Follow-up"));
    }

    #[test]
    fn test_event_before_radiotherapy_rejected() {
        let mut form = sample_form();
        form.distant_recurrence = OutcomeEvent::on(ymd(2023, 1, 14));
        assert!(form.validate(ymd(2024, 6, 1)).unwrap_err().is_validation());

        // Same day as the last radiotherapy is a zero-month interval
        form.distant_recurrence = OutcomeEvent::on(ymd(2023, 1, 15));
        assert!(form.validate(ymd(2024, 6, 1)).is_ok());
    }

    #[test]
    fn test_ignored_event_date_is_not_checked() {
        let mut form = sample_form();
        form.death = OutcomeEvent {
            occurred: false,
            date: Some(ymd(2000, 1, 1)),
        };
        assert!(form.validate(ymd(2024, 6, 1)).is_ok());
    }

    #[test]
    fn test_absent_event_needs_no_date() {
        let mut form = sample_form();
        form.local_recurrence = OutcomeEvent {
            occurred: false,
            date: None,
        };
        assert!(form.validate(ymd(2024, 6, 1)).is_ok());
    }

    #[test]
    fn test_recurrent_tumor_requires_surgery_details() {
        let mut form = sample_form();
        form.recurrent_tumor = true;
        form.recurrence_date = Some(ymd(2023, 8, 1));
        assert!(form.validate(ymd(2024, 6, 1)).is_err());

        form.surgery_type = Some("Radical Nephrectomy".into());
        form.surgery_date = Some(ymd(2023, 9, 1));
        assert!(form.validate(ymd(2024, 6, 1)).is_ok());
    }

    #[test]
    fn test_deserialize_minimal_json() {
        let json = r#"{
            "date_of_birth": "1990-06-01",
            "last_radiotherapy_date": "2023-01-15",
            "follow_up_date": "2024-03-01",
            "grade": "I",
            "tumor_focality": "Unifocal",
            "confirmatory_procedure": "Biopsy",
            "biopsy_date": "2022-11-02",
            "systemic_treatment_first_date": "2022-12-01",
            "systemic_treatment_last_date": "2022-12-01",
            "death": { "occurred": true, "date": "2024-02-10" }
        }"#;
        let form: EntryForm = serde_json::from_str(json).unwrap();
        assert!(form.histology.is_empty());
        assert_eq!(form.toxicity, ToxicityAssessment::default());
        assert_eq!(form.death, OutcomeEvent::on(ymd(2024, 2, 10)));
        assert!(!form.local_recurrence.occurred);
    }
}

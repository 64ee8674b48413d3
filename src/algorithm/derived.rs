//! Derived-field calculation
//!
//! Age, follow-up time and the time from last radiotherapy to each outcome
//! event. The calculation is pure: the same inputs and reference date always
//! give the same results.

use chrono::NaiveDate;
use serde::Serialize;

use crate::algorithm::dates::{age_on, months_between};
use crate::error::{Error, Result};
use crate::models::entry::{EntryForm, OutcomeEvent, OutcomeKind};
use crate::models::types::Conditional;

/// The subset of an entry that derived fields depend on
///
/// Event dates of events that did not occur are dropped, so editing an
/// ignored date does not invalidate a calculation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DerivedInputs {
    pub date_of_birth: NaiveDate,
    pub last_radiotherapy_date: NaiveDate,
    pub follow_up_date: NaiveDate,
    pub local_recurrence: OutcomeEvent,
    pub regional_recurrence: OutcomeEvent,
    pub distant_recurrence: OutcomeEvent,
    pub death: OutcomeEvent,
    pub cancer_related_death: Option<bool>,
}

impl DerivedInputs {
    fn outcome(&self, kind: OutcomeKind) -> &OutcomeEvent {
        match kind {
            OutcomeKind::LocalRecurrence => &self.local_recurrence,
            OutcomeKind::RegionalRecurrence => &self.regional_recurrence,
            OutcomeKind::DistantRecurrence => &self.distant_recurrence,
            OutcomeKind::Death => &self.death,
        }
    }
}

impl From<&EntryForm> for DerivedInputs {
    fn from(form: &EntryForm) -> Self {
        let effective = |event: &OutcomeEvent| OutcomeEvent {
            occurred: event.occurred,
            date: event.effective_date(),
        };
        Self {
            date_of_birth: form.date_of_birth,
            last_radiotherapy_date: form.last_radiotherapy_date,
            follow_up_date: form.follow_up_date,
            local_recurrence: effective(&form.local_recurrence),
            regional_recurrence: effective(&form.regional_recurrence),
            distant_recurrence: effective(&form.distant_recurrence),
            death: effective(&form.death),
            cancer_related_death: form.cancer_related_death.filter(|_| form.death.occurred),
        }
    }
}

/// Results of the derived-field calculation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DerivedResults {
    /// Date the age was calculated against
    pub reference_date: NaiveDate,
    /// Age in completed years
    pub age: i32,
    /// Months from last radiotherapy to follow-up
    pub time_since_treatment: i32,
    pub time_to_local_recurrence: Conditional<i32>,
    pub time_to_regional_recurrence: Conditional<i32>,
    pub time_to_distant_recurrence: Conditional<i32>,
    pub time_to_death: Conditional<i32>,
    /// Only applicable when death occurred
    pub cancer_related_death: Conditional<bool>,
}

impl DerivedResults {
    /// Months from last radiotherapy to the given event
    #[must_use]
    pub fn interval(&self, kind: OutcomeKind) -> Conditional<i32> {
        match kind {
            OutcomeKind::LocalRecurrence => self.time_to_local_recurrence,
            OutcomeKind::RegionalRecurrence => self.time_to_regional_recurrence,
            OutcomeKind::DistantRecurrence => self.time_to_distant_recurrence,
            OutcomeKind::Death => self.time_to_death,
        }
    }
}

/// Calculate every derived field
///
/// An event flagged as occurred must carry its date. An unanswered
/// cancer-relatedness question after a death is recorded as "No".
pub fn compute_derived(inputs: &DerivedInputs, today: NaiveDate) -> Result<DerivedResults> {
    let interval = |kind: OutcomeKind| -> Result<Conditional<i32>> {
        let event = inputs.outcome(kind);
        if !event.occurred {
            return Ok(Conditional::NotApplicable);
        }
        let date = event
            .date
            .ok_or_else(|| Error::Validation(format!("Date of {} is required", kind.label())))?;
        Ok(Conditional::Value(months_between(
            inputs.last_radiotherapy_date,
            date,
        )))
    };

    Ok(DerivedResults {
        reference_date: today,
        age: age_on(inputs.date_of_birth, today),
        time_since_treatment: months_between(inputs.last_radiotherapy_date, inputs.follow_up_date),
        time_to_local_recurrence: interval(OutcomeKind::LocalRecurrence)?,
        time_to_regional_recurrence: interval(OutcomeKind::RegionalRecurrence)?,
        time_to_distant_recurrence: interval(OutcomeKind::DistantRecurrence)?,
        time_to_death: interval(OutcomeKind::Death)?,
        cancer_related_death: Conditional::when(inputs.death.occurred, || {
            inputs.cancer_related_death.unwrap_or(false)
        }),
    })
}

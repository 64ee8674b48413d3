#[cfg(test)]
mod tests {
    use chrono::{Datelike, Duration};
    use rutc_registry::algorithm::{age_on, compute_derived, months_between};
    use rutc_registry::utils::fixtures::{sample_entry_form, ymd};
    use rutc_registry::{
        Conditional, DerivedInputs, DerivedResults, OutcomeEvent, OutcomeKind, PatientRecord,
    };
    use rutc_registry::schema::columns as c;

    #[test]
    fn test_months_between_same_date_is_zero() {
        let mut date = ymd(2020, 1, 1);
        while date.year() < 2021 {
            assert_eq!(months_between(date, date), 0);
            date += Duration::days(13);
        }
    }

    #[test]
    fn test_months_between_ignores_day_of_month() {
        assert_eq!(months_between(ymd(2023, 1, 15), ymd(2024, 3, 1)), 14);
        assert_eq!(months_between(ymd(2023, 1, 31), ymd(2023, 2, 1)), 1);
        assert_eq!(months_between(ymd(2024, 3, 1), ymd(2023, 1, 15)), -14);
    }

    #[test]
    fn test_age_before_and_on_birthday() {
        assert_eq!(age_on(ymd(1990, 6, 1), ymd(2024, 6, 1)), 34);
        assert_eq!(age_on(ymd(1990, 6, 1), ymd(2024, 5, 31)), 33);
    }

    fn derive(form: &rutc_registry::EntryForm) -> DerivedResults {
        compute_derived(&DerivedInputs::from(form), ymd(2024, 6, 1)).unwrap()
    }

    #[test]
    fn test_absent_local_recurrence_needs_no_date() {
        let mut form = sample_entry_form();
        form.local_recurrence = OutcomeEvent::absent();
        let results = derive(&form);
        assert_eq!(results.time_to_local_recurrence, Conditional::NotApplicable);

        let record = PatientRecord::from_entry("123", &form, &results);
        assert_eq!(record.get(c::TIME_TO_LOCAL_RECURRENCE), Some("N/A"));
        assert_eq!(record.get(c::LOCAL_RECURRENCE), Some("No"));
    }

    #[test]
    fn test_all_events_recorded() {
        let mut form = sample_entry_form();
        *form.outcome_mut(OutcomeKind::LocalRecurrence) = OutcomeEvent::on(ymd(2023, 4, 20));
        *form.outcome_mut(OutcomeKind::RegionalRecurrence) = OutcomeEvent::on(ymd(2023, 7, 1));
        *form.outcome_mut(OutcomeKind::DistantRecurrence) = OutcomeEvent::on(ymd(2023, 12, 9));
        *form.outcome_mut(OutcomeKind::Death) = OutcomeEvent::on(ymd(2024, 5, 2));

        let results = derive(&form);
        let record = PatientRecord::from_entry("123", &form, &results);
        for (kind, months) in OutcomeKind::ALL.into_iter().zip(["3", "6", "11", "16"]) {
            assert_eq!(record.get(kind.interval_column()), Some(months));
            assert_eq!(record.get(kind.flag_column()), Some("Yes"));
        }
        // Unanswered cancer-relatedness after a death is stored as "No"
        assert_eq!(record.get(c::CANCER_RELATED_DEATH), Some("No"));
    }
}

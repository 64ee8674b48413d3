#[cfg(test)]
mod tests {
    use rutc_registry::models::types::NOT_APPLICABLE;
    use rutc_registry::schema::columns as c;
    use rutc_registry::schema::decode_list;
    use rutc_registry::utils::fixtures::{sample_entry_form, ymd};
    use rutc_registry::{
        EntrySession, Error, OutcomeEvent, ParquetRecordStore, RecordStore, SessionState,
    };

    use crate::utils::{config_at, parquet_session, temp_store};

    #[test]
    fn test_full_entry_cycle() {
        let (_dir, path) = temp_store();
        let mut session = parquet_session(&path);

        let defaults = session.get_defaults("123").unwrap();
        assert_eq!(defaults.grade, "Not Reported");
        assert!(!defaults.local_recurrence.occurred);

        let form = sample_entry_form();
        let results = session.compute(&form).unwrap();
        assert_eq!(results.age, 34);
        assert_eq!(results.time_since_treatment, 14);

        let record = session.save(&form).unwrap();
        assert_eq!(record.get(c::AGE), Some("34"));
        assert_eq!(record.get(c::FOLLOW_UP_TIME), Some("14"));
        assert_eq!(record.get(c::TIME_TO_LOCAL_RECURRENCE), Some(NOT_APPLICABLE));
        assert_eq!(record.get(c::CANCER_RELATED_DEATH), Some(NOT_APPLICABLE));
        assert_eq!(record.get(c::SURGERY_TYPE), Some(NOT_APPLICABLE));
        assert!(matches!(session.state(), SessionState::Saved { .. }));

        let stored = ParquetRecordStore::new(&path)
            .find_by_key("123")
            .unwrap()
            .unwrap();
        assert_eq!(stored, record);
    }

    #[test]
    fn test_age_depends_on_reference_date() {
        let (_dir, path) = temp_store();
        for (today, age) in [(ymd(2024, 6, 1), 34), (ymd(2024, 5, 31), 33)] {
            let config = config_at(&path, today);
            let mut session = EntrySession::new(ParquetRecordStore::from_config(&config), config);
            session.lookup("123").unwrap();
            assert_eq!(session.compute(&sample_entry_form()).unwrap().age, age);
        }
    }

    #[test]
    fn test_save_before_compute_is_rejected() {
        let (_dir, path) = temp_store();
        let mut session = parquet_session(&path);
        session.lookup("123").unwrap();

        let err = session.save(&sample_entry_form()).unwrap_err();
        assert!(matches!(err, Error::SaveWithoutComputation));
        assert!(err.is_validation());
        assert!(!path.exists());
    }

    #[test]
    fn test_saved_entry_seeds_next_lookup() {
        let (_dir, path) = temp_store();
        let mut form = sample_entry_form();
        form.death = OutcomeEvent::on(ymd(2024, 2, 1));
        form.cancer_related_death = Some(true);

        let mut session = parquet_session(&path);
        session.lookup("555").unwrap();
        session.compute(&form).unwrap();
        let record = session.save(&form).unwrap();
        assert_eq!(record.get(c::DEATH_DATE), Some("2024-02-01"));
        assert_eq!(record.get(c::TIME_TO_DEATH), Some("13"));
        assert_eq!(record.get(c::CANCER_RELATED_DEATH), Some("Yes"));
        assert_eq!(
            decode_list(record.get(c::CLINICAL_STAGE).unwrap()),
            vec!["cT1a", "cN0", "M0"]
        );

        let mut session = parquet_session(&path);
        let defaults = session.lookup(" 555 ").unwrap().clone();
        assert_eq!(defaults.date_of_birth, form.date_of_birth);
        assert_eq!(defaults.clinical_stage, form.clinical_stage);
        assert_eq!(defaults.death, form.death);
        assert_eq!(defaults.cancer_related_death, Some(true));
        assert!(!defaults.local_recurrence.occurred);
    }

    #[test]
    fn test_correction_appends_second_row() {
        let (_dir, path) = temp_store();
        let form = sample_entry_form();

        let mut session = parquet_session(&path);
        session.lookup("123").unwrap();
        session.compute(&form).unwrap();
        session.save(&form).unwrap();

        let mut corrected = session.get_defaults("123").unwrap();
        corrected.grade = "III".to_string();
        session.compute(&corrected).unwrap();
        session.save(&corrected).unwrap();

        let rows = ParquetRecordStore::new(&path)
            .find_all_by_key("123")
            .unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].get(c::GRADE), Some("II"));
        assert_eq!(rows[1].get(c::GRADE), Some("III"));
    }

    #[test]
    fn test_unwritable_store_keeps_session_computed() {
        let (dir, _) = temp_store();
        // A directory where the file should be cannot be opened for writing
        let path = dir.path().join("taken");
        std::fs::create_dir(&path).unwrap();

        let mut session = parquet_session(&path);
        session.lookup("123").unwrap();
        session.compute(&sample_entry_form()).unwrap();

        let err = session.save(&sample_entry_form()).unwrap_err();
        assert!(matches!(err, Error::StorageUnavailable { .. }));
        assert!(session.results().is_some());
    }

    #[test]
    fn test_dates_before_radiotherapy_are_never_saved() {
        let (_dir, path) = temp_store();
        let mut form = sample_entry_form();
        form.follow_up_date = ymd(2022, 1, 1);
        form.death = OutcomeEvent::on(ymd(2022, 6, 1));

        let mut session = parquet_session(&path);
        session.lookup("123").unwrap();
        assert!(session.compute(&form).unwrap_err().is_validation());
        assert!(matches!(
            session.save(&form).unwrap_err(),
            Error::SaveWithoutComputation
        ));

        // A valid calculation does not cover the edited dates either
        session.compute(&sample_entry_form()).unwrap();
        assert!(session.save(&form).unwrap_err().is_validation());
        assert!(!path.exists());
    }
}

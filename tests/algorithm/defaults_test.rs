#[cfg(test)]
mod tests {
    use rutc_registry::PatientRecord;
    use rutc_registry::algorithm::defaults::*;
    use rutc_registry::schema::columns as c;
    use rutc_registry::schema::encode_list;
    use rutc_registry::utils::DateFormatConfig;
    use rutc_registry::utils::fixtures::ymd;

    fn row(cells: &[(&str, &str)]) -> PatientRecord {
        cells.iter().copied().collect()
    }

    #[test]
    fn test_legacy_list_is_read() {
        let record = row(&[(c::HISTOLOGY, "['Renal Cell Carcinoma', 'Other renal tumors']")]);
        assert_eq!(
            resolve_default_list(Some(&record), c::HISTOLOGY),
            vec!["Renal Cell Carcinoma", "Other renal tumors"]
        );
    }

    #[test]
    fn test_malformed_lists_are_empty() {
        for stored in ["", "nan", "NULL", "[]", "v1:[not json", "[' ', '']"] {
            let record = row(&[(c::DOSE, stored)]);
            assert!(
                resolve_default_list(Some(&record), c::DOSE).is_empty(),
                "{stored:?} should give no selection"
            );
        }
        assert!(resolve_default_list(None, c::DOSE).is_empty());
    }

    #[test]
    fn test_none_is_a_stored_option() {
        let record = row(&[
            (c::SYSTEMIC_TREATMENT, "None"),
            (c::CYSTITIS, "None"),
            (c::FATIGUE, "II"),
        ]);
        assert_eq!(
            resolve_default_list(Some(&record), c::SYSTEMIC_TREATMENT),
            vec!["None"]
        );
        let form = form_defaults(Some(&record), ymd(2024, 6, 1), &DateFormatConfig::default());
        assert_eq!(form.systemic_treatment, vec!["None"]);
        assert_eq!(form.toxicity.cystitis, "None");
        assert_eq!(form.toxicity.fatigue, "II");
    }

    #[test]
    fn test_current_encoding_round_trips_through_defaults() {
        let record = row(&[(c::FRACTIONATION, encode_list(&["3", "5"]).as_str())]);
        assert_eq!(
            resolve_default_list(Some(&record), c::FRACTIONATION),
            vec!["3", "5"]
        );
    }

    #[test]
    fn test_defaults_without_prior_record() {
        let today = ymd(2024, 6, 1);
        let form = form_defaults(None, today, &DateFormatConfig::default());

        assert_eq!(form.date_of_birth, today);
        assert_eq!(form.biopsy_date, today);
        assert_eq!(form.grade, "Not Reported");
        assert_eq!(form.tumor_focality, "Unifocal");
        assert_eq!(form.confirmatory_procedure, "Biopsy");
        assert_eq!(form.toxicity.overall_tolerance, "Excellent");
        assert!(form.histology.is_empty());
        assert!(!form.recurrent_tumor);
        assert!(form.surgery_type.is_none());
        assert!(form.cancer_related_death.is_none());
    }

    #[test]
    fn test_defaults_from_damaged_prior_record() {
        let record = row(&[
            (c::MRN, "123"),
            (c::DATE_OF_BIRTH, "NaT"),
            (c::LAST_RADIOTHERAPY_DATE, "2023-01-15 00:00:00"),
            (c::FOLLOW_UP_DATE, "15/03/2024"),
            (c::GRADE, "VII"),
            (c::CLINICAL_STAGE, "['cT1a', 'cT9']"),
            (c::RECURRENT_TUMOR, "Yes"),
            (c::RECURRENCE_DATE, "garbage"),
            (c::SURGERY_TYPE, "Radical Nephrectomy"),
            (c::LOCAL_RECURRENCE, "No"),
            (c::LOCAL_RECURRENCE_DATE, "2023-06-01"),
        ]);
        let form = form_defaults(Some(&record), ymd(2024, 6, 1), &DateFormatConfig::default());

        assert_eq!(form.date_of_birth, LEGACY_MISSING_DATE);
        assert_eq!(form.last_radiotherapy_date, ymd(2023, 1, 15));
        assert_eq!(form.follow_up_date, ymd(2024, 3, 15));
        assert_eq!(form.grade, "Not Reported");
        assert_eq!(form.clinical_stage, vec!["cT1a"]);
        assert!(form.recurrent_tumor);
        assert!(form.recurrence_date.is_none());
        assert_eq!(form.surgery_type.as_deref(), Some("Radical Nephrectomy"));
        assert!(!form.local_recurrence.occurred);
        assert!(form.local_recurrence.date.is_none());
    }
}

#[cfg(test)]
mod tests {
    use std::fs::File;
    use std::path::Path;
    use std::sync::Arc;

    use arrow::array::{ArrayRef, Int64Array, StringArray};
    use arrow::datatypes::{DataType, Field, Schema};
    use arrow::record_batch::RecordBatch;
    use parquet::arrow::ArrowWriter;
    use rutc_registry::schema::columns as c;
    use rutc_registry::{ParquetRecordStore, PatientRecord, RecordStore};

    use crate::utils::temp_store;

    fn write_legacy(path: &Path, columns: Vec<(&str, ArrayRef)>) {
        let schema = Arc::new(Schema::new(
            columns
                .iter()
                .map(|(name, array)| Field::new(*name, array.data_type().clone(), true))
                .collect::<Vec<_>>(),
        ));
        let arrays = columns.into_iter().map(|(_, array)| array).collect();
        let batch = RecordBatch::try_new(schema, arrays).unwrap();
        let mut writer = ArrowWriter::try_new(File::create(path).unwrap(), batch.schema(), None)
            .unwrap();
        writer.write(&batch).unwrap();
        writer.close().unwrap();
    }

    fn strings(values: &[&str]) -> ArrayRef {
        Arc::new(StringArray::from(values.to_vec()))
    }

    #[test]
    fn test_absent_store_has_canonical_columns() {
        let (_dir, path) = temp_store();
        let table = ParquetRecordStore::new(&path).load_all().unwrap();
        assert!(table.is_empty());
        assert_eq!(table.columns().len(), 48);
        assert_eq!(table.columns()[34], c::OVERALL_TOLERANCE);
    }

    #[test]
    fn test_mixed_mrn_column_is_searchable() {
        let (_dir, path) = temp_store();
        write_legacy(
            &path,
            vec![
                (
                    c::MRN,
                    Arc::new(Int64Array::from(vec![Some(123), Some(456), None])) as ArrayRef,
                ),
                (c::GRADE, strings(&["II", "III", "IV"])),
            ],
        );

        let store = ParquetRecordStore::new(&path);
        assert_eq!(
            store.find_by_key(" 123 ").unwrap().unwrap().get(c::GRADE),
            Some("II")
        );
        assert!(store.find_by_key("789").unwrap().is_none());
        assert!(store.find_by_key("").unwrap().is_none());
    }

    #[test]
    fn test_legacy_column_names_are_mapped() {
        let (_dir, path) = temp_store();
        write_legacy(
            &path,
            vec![
                (c::MRN, strings(&["42"])),
                ("Time_to_local_recurrence", strings(&["7"])),
                ("Cancer Related Death", strings(&["Yes"])),
                ("Clinical Stage", strings(&["['cT1a', 'cN0']"])),
            ],
        );

        let row = ParquetRecordStore::new(&path)
            .find_by_key("42")
            .unwrap()
            .unwrap();
        assert_eq!(row.get(c::TIME_TO_LOCAL_RECURRENCE), Some("7"));
        assert_eq!(row.get(c::CANCER_RELATED_DEATH), Some("Yes"));
        assert_eq!(row.get(c::CLINICAL_STAGE), Some("['cT1a', 'cN0']"));
    }

    #[test]
    fn test_append_rewrites_legacy_file_as_text() {
        let (_dir, path) = temp_store();
        write_legacy(
            &path,
            vec![(
                c::MRN,
                Arc::new(Int64Array::from(vec![Some(123)])) as ArrayRef,
            )],
        );

        let mut store = ParquetRecordStore::new(&path);
        let row: PatientRecord = [(c::MRN, "123"), (c::AGE, "34")].into_iter().collect();
        store.append(row).unwrap();

        let reader = parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder::try_new(
            File::open(&path).unwrap(),
        )
        .unwrap();
        let schema = reader.schema().clone();
        assert!(schema.fields().iter().all(|f| f.data_type() == &DataType::Utf8));
        assert_eq!(store.find_all_by_key("123").unwrap().len(), 2);
    }

    #[test]
    fn test_same_mrn_appends_second_row() {
        let (_dir, path) = temp_store();
        let mut store = ParquetRecordStore::new(&path);
        let first: PatientRecord = [(c::MRN, "123"), (c::GRADE, "I")].into_iter().collect();
        let second: PatientRecord = [(c::MRN, "123"), (c::GRADE, "II")].into_iter().collect();
        store.append(first).unwrap();
        store.append(second).unwrap();

        let table = store.load_all().unwrap();
        assert_eq!(table.len(), 2);
        assert!(table.rows().iter().all(|r| r.mrn() == Some("123")));
        // Lookup returns the first stored row
        assert_eq!(
            store.find_by_key("123").unwrap().unwrap().get(c::GRADE),
            Some("I")
        );
    }
}

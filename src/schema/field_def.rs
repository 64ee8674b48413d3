//! Field definitions for the registry table
//!
//! This module is the single source of truth for the fixed column set of the
//! registry, the option lists behind every categorical field, the fallback
//! used when a stored value is unusable, and the flag that governs each
//! conditional column.

use std::fmt;
use std::sync::LazyLock;

use arrow::datatypes::{DataType, Field, Schema};

/// Column names of the registry table
pub mod columns {
    pub const MRN: &str = "MRN";
    pub const DATE_OF_BIRTH: &str = "Date_of_Birth";
    pub const AGE: &str = "Age";
    pub const LAST_RADIOTHERAPY_DATE: &str = "Date_of_Last_Radiotherapy";
    pub const FOLLOW_UP_DATE: &str = "Follow_up_date";
    pub const FOLLOW_UP_TIME: &str = "Follow_up_time";
    pub const HISTOLOGY: &str = "Histology";
    pub const GRADE: &str = "Grade";
    pub const TUMOR_FOCALITY: &str = "Tumor_Focality";
    pub const CLINICAL_STAGE: &str = "Clinical_Stage";
    pub const CONFIRMATORY_PROCEDURE: &str = "Type_of_Confirmatory_procedure";
    pub const BIOPSY_DATE: &str = "Biopsy_date";
    pub const RECURRENT_TUMOR: &str = "Recurrent_Tumor";
    pub const RECURRENCE_DATE: &str = "Recurrence_date";
    pub const SURGERY_TYPE: &str = "Surgery_type";
    pub const SURGERY_DATE: &str = "Surgery_date";
    pub const SYSTEMIC_TREATMENT: &str = "Systemic_Treatment";
    pub const SYSTEMIC_TREATMENT_FIRST_DATE: &str = "Systemic_Treatment_first_date";
    pub const SYSTEMIC_TREATMENT_LAST_DATE: &str = "Systemic_Treatment_last_date";
    pub const DOSE: &str = "Dose";
    pub const FRACTIONATION: &str = "Fractionation";
    pub const DYSURIA: &str = "Dysuria";
    pub const CYSTITIS: &str = "Cystitis";
    pub const BLADDER_PERFORATION: &str = "Bladder_Perforation";
    pub const HEMATURIA: &str = "Hematuria";
    pub const URINARY_FISTULA: &str = "Urinary_Fistula";
    pub const URINARY_OBSTRUCTION: &str = "Urinary_Obstruction";
    pub const URETERAL_STENOSIS: &str = "Ureteral_Stenosis";
    pub const URETERAL_STENOSIS_DATE: &str = "Ureteral_Stenosis_date";
    pub const DIARRHEA: &str = "Diarrhea";
    pub const NAUSEA: &str = "Nausea";
    pub const BOWEL_PERFORATION: &str = "Bowel_Perforation";
    pub const BOWEL_OBSTRUCTION: &str = "Bowel_Obstruction";
    pub const FATIGUE: &str = "Fatigue";
    pub const OVERALL_TOLERANCE: &str = "Overal_tolerance";
    pub const LOCAL_RECURRENCE: &str = "Local_recurrence";
    pub const LOCAL_RECURRENCE_DATE: &str = "Local_recurrence_date";
    pub const REGIONAL_RECURRENCE: &str = "Regional_recurrence";
    pub const REGIONAL_RECURRENCE_DATE: &str = "Regional_recurrence_date";
    pub const DISTANT_RECURRENCE: &str = "Distant_recurrence";
    pub const DISTANT_RECURRENCE_DATE: &str = "Distant_recurrence_date";
    pub const DEATH: &str = "Death";
    pub const DEATH_DATE: &str = "Death_date";
    pub const CANCER_RELATED_DEATH: &str = "Cancer_Related_Death";
    pub const TIME_TO_LOCAL_RECURRENCE: &str = "time_to_local_recurrence";
    pub const TIME_TO_REGIONAL_RECURRENCE: &str = "time_to_regional_recurrence";
    pub const TIME_TO_DISTANT_RECURRENCE: &str = "time_to_distant_recurrence";
    pub const TIME_TO_DEATH: &str = "time_to_death";
}

/// Option lists for categorical fields
pub mod options {
    pub const YES_NO: &[&str] = &["No", "Yes"];
    pub const HISTOLOGY: &[&str] = &[
        "Renal Cell Carcinoma",
        "Papilary Renal Cell Tumors",
        "Oncocytic and chromophobe renal tumors",
        "Renal mesenchymal tumors",
        "Other renal tumors",
    ];
    pub const GRADE: &[&str] = &["I", "II", "III", "IV", "Not Reported"];
    pub const TUMOR_FOCALITY: &[&str] = &["Unifocal", "Multifocal", "Not Reported"];
    pub const CLINICAL_STAGE: &[&str] = &[
        "cT0", "cTx", "cT1a", "cT1b", "cT2a", "cT2b", "cT3a", "cT3b", "cT3c", "cT4", "cN0", "cN1",
        "M0", "M1",
    ];
    pub const CONFIRMATORY_PROCEDURE: &[&str] = &[
        "Biopsy",
        "Partial Nephrectomy",
        "Radical Nephrectomy",
        "Image Only",
        "Others",
    ];
    pub const SURGERY_TYPE: &[&str] = &["Partial Nephrectomy", "Radical Nephrectomy", "Others"];
    pub const SYSTEMIC_TREATMENT: &[&str] = &[
        "None",
        "Conventional Chemotherapy",
        "Target Therapy",
        "Immunotherapy",
        "Radioligant",
        "ADC",
        "Others",
    ];
    pub const DOSE: &[&str] = &["26Gy", "35Gy", "40Gy", "30Gy", "Others"];
    pub const FRACTIONATION: &[&str] = &["1", "2", "3", "5", "10", "Others"];

    // CTCAE v5 scales
    pub const PRESENT_ABSENT: &[&str] = &["Present", "Absent"];
    pub const ABSENT_PRESENT: &[&str] = &["Absent", "Present"];
    pub const NONE_TO_V: &[&str] = &["None", "I", "II", "III", "IV", "V"];
    pub const ABSENT_I_TO_V: &[&str] = &["Absent", "I", "II", "III", "IV", "V"];
    pub const ABSENT_II_TO_V: &[&str] = &["Absent", "II", "III", "IV", "V"];
    pub const FATIGUE: &[&str] = &["None", "I", "II", "III"];
    pub const OVERALL_TOLERANCE: &[&str] = &["Excellent", "Good", "Fair", "Poor"];
}

/// Represents the semantic type of a registry column
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldType {
    /// Medical record number
    Key,
    /// Calendar date stored as an ISO string
    Date,
    /// Derived whole number (age, follow-up months)
    Integer,
    /// One value out of an option list
    Choice,
    /// Any subset of an option list
    MultiChoice,
    /// Derived whole-month interval, or the "N/A" sentinel
    Interval,
}

impl FieldType {
    /// Arrow type used when persisting the column
    ///
    /// Every column is textual on disk so that sentinels and legacy values
    /// share a column with real values.
    #[must_use]
    pub fn to_arrow_type(&self) -> DataType {
        DataType::Utf8
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldType::Key => write!(f, "Key"),
            FieldType::Date => write!(f, "Date"),
            FieldType::Integer => write!(f, "Integer"),
            FieldType::Choice => write!(f, "Choice"),
            FieldType::MultiChoice => write!(f, "MultiChoice"),
            FieldType::Interval => write!(f, "Interval"),
        }
    }
}

/// A column that is only populated when another column holds a trigger value
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Condition {
    /// Governing column
    pub column: &'static str,
    /// Value of the governing column that enables this one
    pub value: &'static str,
}

/// A field definition for the registry table
#[derive(Debug, Clone)]
pub struct FieldDefinition {
    /// Name of the column in the store
    pub name: &'static str,
    /// Human readable label
    pub description: &'static str,
    /// Semantic type of the field
    pub field_type: FieldType,
    /// Allowed values for choice fields
    pub options: &'static [&'static str],
    /// Value used when a stored value is absent or unusable
    pub fallback: Option<&'static str>,
    /// Governing flag for conditional columns
    pub condition: Option<Condition>,
    /// Historical column names that map onto this one
    pub aliases: Vec<&'static str>,
}

impl FieldDefinition {
    /// Create a new field definition
    #[must_use]
    pub fn new(name: &'static str, description: &'static str, field_type: FieldType) -> Self {
        Self {
            name,
            description,
            field_type,
            options: &[],
            fallback: None,
            condition: None,
            aliases: Vec::new(),
        }
    }

    /// Create a single-choice field
    #[must_use]
    pub fn choice(
        name: &'static str,
        description: &'static str,
        options: &'static [&'static str],
        fallback: &'static str,
    ) -> Self {
        let mut field = Self::new(name, description, FieldType::Choice);
        field.options = options;
        field.fallback = Some(fallback);
        field
    }

    /// Create a multi-choice field
    #[must_use]
    pub fn multi_choice(
        name: &'static str,
        description: &'static str,
        options: &'static [&'static str],
    ) -> Self {
        let mut field = Self::new(name, description, FieldType::MultiChoice);
        field.options = options;
        field
    }

    /// Only populate this column when `column` holds `value`
    #[must_use]
    pub fn when(mut self, column: &'static str, value: &'static str) -> Self {
        self.condition = Some(Condition { column, value });
        self
    }

    /// Add an alias for this field
    #[must_use]
    pub fn with_alias(mut self, alias: &'static str) -> Self {
        self.aliases.push(alias);
        self
    }

    /// Convert to an Arrow Field
    #[must_use]
    pub fn to_arrow_field(&self) -> Field {
        Field::new(self.name, self.field_type.to_arrow_type(), true)
    }

    /// Check if the given name matches this field or any of its aliases
    #[must_use]
    pub fn matches_name(&self, name: &str) -> bool {
        self.name == name || self.aliases.iter().any(|alias| *alias == name)
    }

    /// Whether `value` is one of the allowed options
    #[must_use]
    pub fn allows(&self, value: &str) -> bool {
        self.options.contains(&value)
    }
}

static REGISTRY_FIELDS: LazyLock<Vec<FieldDefinition>> = LazyLock::new(create_registry_fields);

/// Create the field definitions of the registry, in column order
#[must_use]
pub fn create_registry_fields() -> Vec<FieldDefinition> {
    use columns as c;
    use options as o;

    vec![
        // Identity and demographics
        FieldDefinition::new(c::MRN, "MRN (Medical Record Number)", FieldType::Key),
        FieldDefinition::new(c::DATE_OF_BIRTH, "Date of Birth", FieldType::Date),
        FieldDefinition::new(c::AGE, "Calculated Age", FieldType::Integer),
        FieldDefinition::new(
            c::LAST_RADIOTHERAPY_DATE,
            "Date of Last Radiotherapy",
            FieldType::Date,
        ),
        FieldDefinition::new(c::FOLLOW_UP_DATE, "Date of Follow-up", FieldType::Date),
        FieldDefinition::new(
            c::FOLLOW_UP_TIME,
            "Time since last radiotherapy",
            FieldType::Integer,
        ),
        // Diagnosis
        FieldDefinition::multi_choice(c::HISTOLOGY, "Histology", o::HISTOLOGY),
        FieldDefinition::choice(c::GRADE, "Grade", o::GRADE, "Not Reported"),
        FieldDefinition::choice(
            c::TUMOR_FOCALITY,
            "Tumor Focality",
            o::TUMOR_FOCALITY,
            "Unifocal",
        ),
        FieldDefinition::multi_choice(c::CLINICAL_STAGE, "Clinical Stage", o::CLINICAL_STAGE)
            .with_alias("Clinical Stage"),
        FieldDefinition::choice(
            c::CONFIRMATORY_PROCEDURE,
            "Type of Confirmatory procedure",
            o::CONFIRMATORY_PROCEDURE,
            "Biopsy",
        ),
        FieldDefinition::new(c::BIOPSY_DATE, "Date of Biopsy", FieldType::Date),
        // Recurrence and surgery
        FieldDefinition::choice(c::RECURRENT_TUMOR, "Recurrent Tumor", o::YES_NO, "No"),
        FieldDefinition::new(c::RECURRENCE_DATE, "Date of Recurrence", FieldType::Date)
            .when(c::RECURRENT_TUMOR, "Yes"),
        FieldDefinition::choice(
            c::SURGERY_TYPE,
            "Surgery type",
            o::SURGERY_TYPE,
            "Partial Nephrectomy",
        )
        .when(c::RECURRENT_TUMOR, "Yes"),
        FieldDefinition::new(c::SURGERY_DATE, "Date of Surgery", FieldType::Date)
            .when(c::RECURRENT_TUMOR, "Yes"),
        // Systemic treatment
        FieldDefinition::multi_choice(
            c::SYSTEMIC_TREATMENT,
            "Systemic Treatment",
            o::SYSTEMIC_TREATMENT,
        ),
        FieldDefinition::new(
            c::SYSTEMIC_TREATMENT_FIRST_DATE,
            "First Date of Systemic Treatment",
            FieldType::Date,
        ),
        FieldDefinition::new(
            c::SYSTEMIC_TREATMENT_LAST_DATE,
            "Last Date of Systemic Treatment",
            FieldType::Date,
        ),
        // Treatment delivery
        FieldDefinition::multi_choice(c::DOSE, "Dose", o::DOSE),
        FieldDefinition::multi_choice(c::FRACTIONATION, "Fractionation", o::FRACTIONATION),
        // Toxicity
        FieldDefinition::choice(c::DYSURIA, "Dysuria (CTCAE v5)", o::PRESENT_ABSENT, "Absent"),
        FieldDefinition::choice(c::CYSTITIS, "Cystitis (CTCAE v5)", o::NONE_TO_V, "None"),
        FieldDefinition::choice(
            c::BLADDER_PERFORATION,
            "Bladder Perforation (CTCAE v5)",
            o::ABSENT_II_TO_V,
            "Absent",
        ),
        FieldDefinition::choice(c::HEMATURIA, "Hematuria (CTCAE v5)", o::ABSENT_I_TO_V, "Absent"),
        FieldDefinition::choice(
            c::URINARY_FISTULA,
            "Urinary Fistula (CTCAE v5)",
            o::ABSENT_II_TO_V,
            "Absent",
        ),
        FieldDefinition::choice(
            c::URINARY_OBSTRUCTION,
            "Urinary Obstruction (CTCAE v5)",
            o::ABSENT_I_TO_V,
            "Absent",
        ),
        FieldDefinition::choice(
            c::URETERAL_STENOSIS,
            "Ureteral Stenosis",
            o::ABSENT_PRESENT,
            "Absent",
        ),
        FieldDefinition::new(
            c::URETERAL_STENOSIS_DATE,
            "Date of Ureteral Stenosis",
            FieldType::Date,
        )
        .when(c::URETERAL_STENOSIS, "Present"),
        FieldDefinition::choice(c::DIARRHEA, "Diarrhea (CTCAE v5)", o::ABSENT_I_TO_V, "Absent"),
        FieldDefinition::choice(c::NAUSEA, "Nausea (CTCAE v5)", o::ABSENT_I_TO_V, "Absent"),
        FieldDefinition::choice(
            c::BOWEL_PERFORATION,
            "Bowel Perforation (CTCAE v5)",
            o::ABSENT_II_TO_V,
            "Absent",
        ),
        FieldDefinition::choice(
            c::BOWEL_OBSTRUCTION,
            "Bowel Obstruction (CTCAE v5)",
            o::ABSENT_I_TO_V,
            "Absent",
        ),
        FieldDefinition::choice(c::FATIGUE, "Fatigue", o::FATIGUE, "None"),
        FieldDefinition::choice(
            c::OVERALL_TOLERANCE,
            "Overall Tolerance",
            o::OVERALL_TOLERANCE,
            "Excellent",
        )
        .with_alias("Overall_tolerance"),
        // Outcome events
        FieldDefinition::choice(c::LOCAL_RECURRENCE, "Local Recurrence", o::YES_NO, "No"),
        FieldDefinition::new(
            c::LOCAL_RECURRENCE_DATE,
            "Date of Local Recurrence",
            FieldType::Date,
        )
        .when(c::LOCAL_RECURRENCE, "Yes"),
        FieldDefinition::choice(c::REGIONAL_RECURRENCE, "Regional Recurrence", o::YES_NO, "No"),
        FieldDefinition::new(
            c::REGIONAL_RECURRENCE_DATE,
            "Date of Regional Recurrence",
            FieldType::Date,
        )
        .when(c::REGIONAL_RECURRENCE, "Yes"),
        FieldDefinition::choice(c::DISTANT_RECURRENCE, "Distant Recurrence", o::YES_NO, "No"),
        FieldDefinition::new(
            c::DISTANT_RECURRENCE_DATE,
            "Date of Distant Recurrence",
            FieldType::Date,
        )
        .when(c::DISTANT_RECURRENCE, "Yes"),
        FieldDefinition::choice(c::DEATH, "Death", o::YES_NO, "No"),
        FieldDefinition::new(c::DEATH_DATE, "Date of Death", FieldType::Date)
            .when(c::DEATH, "Yes"),
        FieldDefinition::choice(
            c::CANCER_RELATED_DEATH,
            "Cancer Related Death",
            o::YES_NO,
            "No",
        )
        .when(c::DEATH, "Yes")
        .with_alias("Cancer Related Death")
        .with_alias("Cancer_related_death"),
        FieldDefinition::new(
            c::TIME_TO_LOCAL_RECURRENCE,
            "Time to local recurrence",
            FieldType::Interval,
        )
        .when(c::LOCAL_RECURRENCE, "Yes")
        .with_alias("Time_to_local_recurrence"),
        FieldDefinition::new(
            c::TIME_TO_REGIONAL_RECURRENCE,
            "Time to regional recurrence",
            FieldType::Interval,
        )
        .when(c::REGIONAL_RECURRENCE, "Yes")
        .with_alias("Time_to_regional_recurrence"),
        FieldDefinition::new(
            c::TIME_TO_DISTANT_RECURRENCE,
            "Time to distant recurrence",
            FieldType::Interval,
        )
        .when(c::DISTANT_RECURRENCE, "Yes")
        .with_alias("Time_to_distant_recurrence"),
        FieldDefinition::new(c::TIME_TO_DEATH, "Time to death", FieldType::Interval)
            .when(c::DEATH, "Yes")
            .with_alias("Time_to_death"),
    ]
}

/// The field definitions of the registry, in column order
#[must_use]
pub fn registry_fields() -> &'static [FieldDefinition] {
    &REGISTRY_FIELDS
}

/// Look up a field definition by column name or alias
#[must_use]
pub fn field(name: &str) -> Option<&'static FieldDefinition> {
    registry_fields()
        .iter()
        .find(|f| f.name == name)
        .or_else(|| registry_fields().iter().find(|f| f.matches_name(name)))
}

/// Canonical column name for a stored column header, if it is a known field
#[must_use]
pub fn canonical_name(name: &str) -> Option<&'static str> {
    field(name.trim()).map(|f| f.name)
}

/// The canonical column names, in order
#[must_use]
pub fn canonical_columns() -> Vec<&'static str> {
    registry_fields().iter().map(|f| f.name).collect()
}

/// Arrow schema for the given column list
///
/// Known columns use their field definition; extra columns are stored as text.
#[must_use]
pub fn table_schema(columns: &[String]) -> Schema {
    Schema::new(
        columns
            .iter()
            .map(|name| {
                field(name).filter(|f| f.name == name).map_or_else(
                    || Field::new(name, DataType::Utf8, true),
                    FieldDefinition::to_arrow_field,
                )
            })
            .collect::<Vec<_>>(),
    )
}

//! Registry algorithms: date arithmetic, form defaulting and derived fields.

pub mod dates;
pub mod defaults;
pub mod derived;

pub use dates::{age_on, months_between};
pub use defaults::{
    LEGACY_MISSING_DATE, form_defaults, resolve_default, resolve_default_choice,
    resolve_default_date, resolve_default_flag, resolve_default_list,
};
pub use derived::{DerivedInputs, DerivedResults, compute_derived};

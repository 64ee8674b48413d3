//! Common value types shared by entry forms, derived results and stored rows.

use std::fmt;

use serde::{Serialize, Serializer};

/// Placeholder stored in a conditional column whose governing event did not occur
pub const NOT_APPLICABLE: &str = "N/A";

/// Stored text that means "no value", as written by spreadsheet and dataframe tooling
///
/// "None" is absent: it is a real option of several toxicity and treatment fields.
const MISSING_MARKERS: &[&str] = &["nan", "nat", "null", "<na>"];

/// Whether a stored cell holds a missing-value marker rather than data
#[must_use]
pub fn is_missing_marker(value: &str) -> bool {
    let value = value.trim();
    value.is_empty()
        || MISSING_MARKERS
            .iter()
            .any(|marker| value.eq_ignore_ascii_case(marker))
}

/// A value that only exists when its governing event occurred
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Conditional<T> {
    /// The event occurred and the value was collected or computed
    Value(T),
    /// The event did not occur
    NotApplicable,
}

impl<T> Conditional<T> {
    /// `Value(f())` when `occurred`, otherwise `NotApplicable`
    pub fn when(occurred: bool, f: impl FnOnce() -> T) -> Self {
        if occurred {
            Self::Value(f())
        } else {
            Self::NotApplicable
        }
    }

    /// Transform the value, keeping `NotApplicable` as is
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Conditional<U> {
        match self {
            Self::Value(v) => Conditional::Value(f(v)),
            Self::NotApplicable => Conditional::NotApplicable,
        }
    }
}

impl<T: fmt::Display> fmt::Display for Conditional<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Value(v) => write!(f, "{v}"),
            Self::NotApplicable => write!(f, "{NOT_APPLICABLE}"),
        }
    }
}

impl<T: Serialize> Serialize for Conditional<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Value(v) => v.serialize(serializer),
            Self::NotApplicable => serializer.serialize_str(NOT_APPLICABLE),
        }
    }
}

/// Stored representation of a boolean flag
#[must_use]
pub fn yes_no(flag: bool) -> &'static str {
    if flag { "Yes" } else { "No" }
}

/// Parse a stored Yes/No flag
#[must_use]
pub fn parse_yes_no(value: &str) -> Option<bool> {
    match value.trim().to_lowercase().as_str() {
        "yes" | "y" | "true" | "1" => Some(true),
        "no" | "n" | "false" | "0" => Some(false),
        _ => None,
    }
}

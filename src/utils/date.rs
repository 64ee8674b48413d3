//! Date string parsing for stored registry values.
//!
//! Stored dates are written as ISO strings, but rows exported from spreadsheet
//! tooling can carry other layouts or a trailing time component.

use chrono::NaiveDate;

/// Format used when writing dates to the store
pub const STORAGE_DATE_FORMAT: &str = "%Y-%m-%d";

/// Configuration for date format handling
#[derive(Debug, Clone)]
pub struct DateFormatConfig {
    /// List of date format strings to try when parsing dates
    pub date_formats: Vec<String>,
    /// Enable heuristic format detection
    pub enable_format_detection: bool,
}

impl Default for DateFormatConfig {
    fn default() -> Self {
        Self {
            date_formats: vec![
                STORAGE_DATE_FORMAT.to_string(), // ISO format: 2023-01-15
                "%d-%m-%Y".to_string(),          // European: 15-01-2023
                "%d/%m/%Y".to_string(),          // UK: 15/01/2023
                "%d.%m.%Y".to_string(),          // Danish: 15.01.2023
                "%Y%m%d".to_string(),            // Compact: 20230115
            ],
            enable_format_detection: true,
        }
    }
}

/// Parse a date string with multiple format attempts
///
/// A time component (`2023-01-15 00:00:00` or `2023-01-15T00:00:00`) is
/// ignored, which covers datetimes written by spreadsheet exports.
#[must_use]
pub fn parse_date_string(s: &str, config: &DateFormatConfig) -> Option<NaiveDate> {
    let s = s.trim();
    let s = s.split(['T', ' ']).next().unwrap_or(s);
    if s.is_empty() {
        return None;
    }

    for format in &config.date_formats {
        if let Ok(date) = NaiveDate::parse_from_str(s, format) {
            return Some(date);
        }
    }

    if config.enable_format_detection {
        if let Some(detected_format) = detect_date_format(s) {
            if let Ok(date) = NaiveDate::parse_from_str(s, detected_format) {
                return Some(date);
            }
        }
    }

    None
}

/// Try to detect the date format based on string patterns
#[must_use]
pub fn detect_date_format(s: &str) -> Option<&'static str> {
    if s.contains('/') {
        let parts: Vec<&str> = s.split('/').collect();
        if parts.len() == 3 && parts[0].len() == 4 {
            return Some("%Y/%m/%d");
        }
    }

    if s.contains('.') {
        let parts: Vec<&str> = s.split('.').collect();
        if parts.len() == 3 && parts[0].len() == 4 {
            return Some("%Y.%m.%d");
        }
    }

    None
}

/// Format a date the way the store expects it
#[must_use]
pub fn format_storage_date(date: NaiveDate) -> String {
    date.format(STORAGE_DATE_FORMAT).to_string()
}

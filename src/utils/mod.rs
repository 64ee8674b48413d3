//! Shared helpers for date parsing and logging.

pub mod date;
pub mod fixtures;
pub mod logging;

pub use date::{DateFormatConfig, format_storage_date, parse_date_string};
pub use logging::{StoreOperation, log_store_complete, log_store_start, log_store_warning};

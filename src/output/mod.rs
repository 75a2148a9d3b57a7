//! Output writers for reports and run metadata.

pub mod json;

// Re-export main functions
pub use json::{read_report, write_json, write_report};

//! Output formatters for inspection reports

mod json;
mod text;

pub use json::JsonFormatter;
pub use text::TextFormatter;

use crate::engine::{Finding, InspectionReport};

/// Output formatter trait
pub trait OutputFormatter: Send + Sync {
    /// Format the entire report
    fn format(&self, report: &InspectionReport) -> String;

    /// Format a single finding
    fn format_finding(&self, finding: &Finding) -> String;
}

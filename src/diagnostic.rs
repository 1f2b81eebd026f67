//! Inspection result types

use crate::rule::RuleHandle;
use serde::{Deserialize, Serialize};

/// Severity level for inspection findings
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Informational finding
    Info,
    /// Warning - potential issue
    #[default]
    Warning,
    /// Error - definite problem
    Error,
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Severity::Info => write!(f, "info"),
            Severity::Warning => write!(f, "warning"),
            Severity::Error => write!(f, "error"),
        }
    }
}

impl std::str::FromStr for Severity {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "info" | "hint" | "note" => Ok(Severity::Info),
            "warning" | "warn" => Ok(Severity::Warning),
            "error" | "err" => Ok(Severity::Error),
            _ => Err(()),
        }
    }
}

/// One human-readable finding
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InspectionMessage {
    pub text: String,
}

impl InspectionMessage {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }
}

/// Outcome of running one rule against one view
///
/// `has_errors()` is true exactly when there is at least one message. The
/// severity always comes from the rule handle that produced the result.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct InspectionResult {
    has_errors: bool,
    messages: Vec<InspectionMessage>,
    recommendation: String,
    severity: Severity,
}

impl InspectionResult {
    /// A result with no findings
    pub fn passed() -> Self {
        Self::default()
    }

    /// Build a result from collected messages
    ///
    /// Returns [`InspectionResult::passed`] when `messages` is empty.
    pub fn from_messages(
        messages: Vec<InspectionMessage>,
        recommendation: &str,
        rule: &RuleHandle<'_>,
    ) -> Self {
        if messages.is_empty() {
            return Self::passed();
        }

        Self {
            has_errors: true,
            messages,
            recommendation: recommendation.to_string(),
            severity: rule.severity(),
        }
    }

    pub fn has_errors(&self) -> bool {
        self.has_errors
    }

    pub fn messages(&self) -> &[InspectionMessage] {
        &self.messages
    }

    pub fn recommendation(&self) -> &str {
        &self.recommendation
    }

    /// Severity of the findings; only meaningful when `has_errors()` is true
    pub fn severity(&self) -> Severity {
        self.severity
    }
}

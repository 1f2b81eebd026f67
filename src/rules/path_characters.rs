//! Project directories must not contain locale-specific letters

use crate::diagnostic::{InspectionMessage, InspectionResult, Severity};
use crate::model::ProjectView;
use crate::rule::{Rule, RuleHandle};

pub const RULE_ID: &str = "M2A-PRM-001";
pub const RULE_NAME: &str = "ProjectDirectory";

/// Turkish letters outside ASCII
pub const TURKISH_CHARACTERS: &str = "ğüşöçıİĞÜŞÖÇ";

/// Flags a project directory containing any disallowed character
#[derive(Debug, Clone)]
pub struct PathCharacterCheck {
    pub disallowed: String,
}

impl Default for PathCharacterCheck {
    fn default() -> Self {
        Self {
            disallowed: TURKISH_CHARACTERS.to_string(),
        }
    }
}

impl PathCharacterCheck {
    pub fn contains_disallowed(&self, path: &str) -> bool {
        path.chars().any(|c| self.disallowed.contains(c))
    }

    pub fn check(&self, view: &ProjectView, rule: &RuleHandle<'_>) -> InspectionResult {
        let mut messages = Vec::new();
        if self.contains_disallowed(&view.directory) {
            messages.push(InspectionMessage::new(
                "Project directory contains Turkish characters",
            ));
        }

        InspectionResult::from_messages(messages, "Check the project directory", rule)
    }

    pub fn into_rule(self) -> Rule {
        Rule::project(RULE_NAME, RULE_ID, move |view, rule| self.check(view, rule))
            .with_severity(Severity::Info)
            .with_description("Project paths with non-ASCII Turkish letters break some tooling")
    }
}

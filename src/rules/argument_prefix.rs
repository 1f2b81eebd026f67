//! Argument names must carry their direction prefix

use crate::diagnostic::{InspectionMessage, InspectionResult, Severity};
use crate::model::{ArgumentDirection, WorkflowView};
use crate::rule::{Rule, RuleHandle};

pub const RULE_ID: &str = "M2A-WRM-001";
pub const RULE_NAME: &str = "ArgumentDirection";

/// Prefix an argument of the given direction must start with
///
/// Properties have no naming requirement.
pub fn required_prefix(direction: ArgumentDirection) -> Option<&'static str> {
    match direction {
        ArgumentDirection::In => Some("in_"),
        ArgumentDirection::Out => Some("out_"),
        ArgumentDirection::InOut => Some("io_"),
        ArgumentDirection::Property => None,
    }
}

/// Reports every workflow argument whose name lacks its direction prefix
#[derive(Debug, Clone, Copy, Default)]
pub struct ArgumentPrefixCheck;

impl ArgumentPrefixCheck {
    pub fn check(&self, view: &WorkflowView, rule: &RuleHandle<'_>) -> InspectionResult {
        let messages: Vec<_> = view
            .arguments
            .iter()
            .filter(|arg| {
                required_prefix(arg.direction)
                    .is_some_and(|prefix| !arg.display_name.starts_with(prefix))
            })
            .map(|arg| {
                InspectionMessage::new(format!(
                    "Argument: {} in {} workflow does not contain a correct direction prefix",
                    arg.display_name, view.display_name
                ))
            })
            .collect();

        InspectionResult::from_messages(messages, "Add direction prefix to arguments", rule)
    }

    pub fn into_rule(self) -> Rule {
        Rule::workflow(RULE_NAME, RULE_ID, move |view, rule| self.check(view, rule))
            .with_severity(Severity::Error)
            .with_description("Arguments are prefixed with in_, out_ or io_ by direction")
    }
}

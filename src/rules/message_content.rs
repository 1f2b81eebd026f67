//! Log messages must mention the workflow they come from

use crate::diagnostic::{InspectionMessage, InspectionResult, Severity};
use crate::model::{ActivityKind, ActivityView};
use crate::rule::{Rule, RuleHandle};
use once_cell::sync::Lazy;
use regex::Regex;

pub const RULE_ID: &str = "M2A-ARM-001";
pub const RULE_NAME: &str = "LogMessageVariable";

static STRING_LITERAL: Lazy<Regex> = Lazy::new(|| Regex::new(r#""(.*?)""#).unwrap());

/// Requires a variable token in the expression of one argument of a marker activity
///
/// The default looks for `workflowName` in the `Message` argument of
/// `LogMessage` activities.
#[derive(Debug, Clone)]
pub struct MessageContentCheck {
    /// Activity kind the check applies to
    pub marker: ActivityKind,
    /// Display name of the inspected argument
    pub key: String,
    /// Token that must appear as a concatenated operand (case-insensitive)
    pub token: String,
}

impl Default for MessageContentCheck {
    fn default() -> Self {
        Self {
            marker: ActivityKind::LogMessage,
            key: "Message".to_string(),
            token: "WorkflowName".to_string(),
        }
    }
}

impl MessageContentCheck {
    /// Whether `expression` concatenates the required token outside string literals
    pub fn contains_token(&self, expression: &str) -> bool {
        let token = self.token.to_lowercase();
        STRING_LITERAL
            .replace_all(expression, "")
            .split('+')
            .any(|operand| operand.trim().to_lowercase() == token)
    }

    pub fn check(&self, view: &ActivityView, rule: &RuleHandle<'_>) -> InspectionResult {
        if view.kind() != self.marker {
            return InspectionResult::passed();
        }

        // A missing argument counts as an empty expression
        let expression = view
            .argument(&self.key)
            .map(|a| a.defined_expression.as_str())
            .unwrap_or_default();

        let mut messages = Vec::new();
        if !self.contains_token(expression) {
            messages.push(InspectionMessage::new(format!(
                "{} activity does not contain \"{}\" variable in its {} argument",
                self.marker, self.token, self.key
            )));
        }

        InspectionResult::from_messages(
            messages,
            &format!("Add variable \"{}\" to {}", self.token, self.marker),
            rule,
        )
    }

    pub fn into_rule(self) -> Rule {
        Rule::activity(RULE_NAME, RULE_ID, move |view, rule| self.check(view, rule))
            .with_severity(Severity::Warning)
            .with_description("Log messages should include the workflow name variable")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Argument, ArgumentDirection, ModelView};

    fn log_message(expression: &str) -> ActivityView {
        ActivityView::new("Namespace.LogMessage").with_argument(
            Argument::new("Message", ArgumentDirection::In).with_expression(expression),
        )
    }

    fn run(view: &ActivityView) -> InspectionResult {
        MessageContentCheck::default()
            .into_rule()
            .evaluate(ModelView::Activity(view), Severity::Warning)
            .unwrap()
    }

    #[test]
    fn test_token_concatenated_passes() {
        let result = run(&log_message(r#""Start " + workflowName"#));
        assert!(!result.has_errors());
        assert!(result.messages().is_empty());
    }

    #[test]
    fn test_token_case_and_whitespace_insensitive() {
        assert!(!run(&log_message(r#"  WORKFLOWNAME + " started""#)).has_errors());
        assert!(!run(&log_message(r#""a" + WorkflowName + "b""#)).has_errors());
    }

    #[test]
    fn test_plain_string_fails() {
        let result = run(&log_message(r#""Start process""#));
        assert!(result.has_errors());
        assert_eq!(result.messages().len(), 1);
        assert_eq!(result.severity(), Severity::Warning);
        assert_eq!(
            result.recommendation(),
            "Add variable \"WorkflowName\" to LogMessage"
        );
    }

    #[test]
    fn test_token_inside_literal_fails() {
        assert!(run(&log_message(r#""workflowName""#)).has_errors());
    }

    #[test]
    fn test_token_as_part_of_expression_fails() {
        assert!(run(&log_message("workflowName.ToUpper()")).has_errors());
    }

    #[test]
    fn test_missing_argument_fails() {
        let view = ActivityView::new("Namespace.LogMessage");
        let result = run(&view);
        assert!(result.has_errors());
        assert_eq!(result.messages().len(), 1);
    }

    #[test]
    fn test_other_activity_passes() {
        let view = ActivityView::new("System.Activities.Statements.Assign");
        assert!(!run(&view).has_errors());
    }

    #[test]
    fn test_custom_token() {
        let check = MessageContentCheck {
            token: "transactionId".to_string(),
            ..MessageContentCheck::default()
        };
        assert!(check.contains_token(r#""Item " + TransactionID"#));
        assert!(!check.contains_token(r#""Item " + workflowName"#));
    }
}

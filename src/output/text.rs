//! Human-readable text output formatter

use super::OutputFormatter;
use crate::diagnostic::Severity;
use crate::engine::{Finding, InspectionReport};
use colored::*;

/// Text formatter with optional color support
pub struct TextFormatter {
    /// Enable colored output
    pub colored: bool,

    /// Show recommendations
    pub show_recommendations: bool,

    /// Show statistics
    pub show_stats: bool,
}

impl Default for TextFormatter {
    fn default() -> Self {
        Self {
            colored: true,
            show_recommendations: true,
            show_stats: true,
        }
    }
}

impl TextFormatter {
    /// Create a new text formatter
    pub fn new() -> Self {
        Self::default()
    }

    /// Disable colors
    pub fn without_color(mut self) -> Self {
        self.colored = false;
        self
    }

    fn severity_str(&self, severity: Severity) -> ColoredString {
        let s = format!("{}", severity);
        if !self.colored {
            return s.normal();
        }
        match severity {
            Severity::Error => s.red().bold(),
            Severity::Warning => s.yellow().bold(),
            Severity::Info => s.blue(),
        }
    }

    fn count(&self, n: usize, singular: &str, plural: &str) -> String {
        format!("{} {}", n, if n == 1 { singular } else { plural })
    }
}

impl OutputFormatter for TextFormatter {
    fn format(&self, report: &InspectionReport) -> String {
        let mut output = String::new();

        // Findings arrive in traversal order, so equal nodes are adjacent
        let mut current: Option<&str> = None;
        for finding in &report.findings {
            if current != Some(finding.node.as_str()) {
                if current.is_some() {
                    output.push('\n');
                }
                let header = format!("{} {}", finding.view_type, finding.node);
                if self.colored {
                    output.push_str(&format!("{}\n", header.underline()));
                } else {
                    output.push_str(&format!("{}\n", header));
                }
                current = Some(finding.node.as_str());
            }

            output.push_str(&self.format_finding(finding));
        }

        if self.show_stats {
            if !report.findings.is_empty() {
                output.push('\n');
            }
            output.push_str(&format!(
                "{} inspected",
                self.count(report.nodes_inspected, "node", "nodes")
            ));

            let mut counts = Vec::new();
            if report.error_count > 0 {
                let s = self.count(report.error_count, "error", "errors");
                counts.push(if self.colored { s.red().to_string() } else { s });
            }
            if report.warning_count > 0 {
                let s = self.count(report.warning_count, "warning", "warnings");
                counts.push(if self.colored { s.yellow().to_string() } else { s });
            }
            if report.info_count > 0 {
                let s = self.count(report.info_count, "info", "infos");
                counts.push(if self.colored { s.blue().to_string() } else { s });
            }

            if counts.is_empty() {
                output.push_str(": no issues found");
            } else {
                output.push_str(&format!(": {}", counts.join(", ")));
            }
            output.push('\n');
        }

        output
    }

    fn format_finding(&self, finding: &Finding) -> String {
        let mut output = String::new();
        let rule_id = if self.colored {
            finding.rule_id.cyan().to_string()
        } else {
            finding.rule_id.clone()
        };

        for message in finding.result.messages() {
            output.push_str(&format!(
                "  {} [{}] {}\n",
                self.severity_str(finding.result.severity()),
                rule_id,
                message.text
            ));
        }

        if self.show_recommendations && !finding.result.recommendation().is_empty() {
            output.push_str(&format!("    = help: {}\n", finding.result.recommendation()));
        }

        output
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostic::{InspectionMessage, InspectionResult};
    use crate::model::{ViewType, WorkflowView};
    use crate::rule::{Rule, RuleHandle};
    use pretty_assertions::assert_eq;

    fn finding(node: &str, messages: &[&str]) -> Finding {
        let rule = Rule::workflow(
            "ArgumentDirection",
            "M2A-WRM-001",
            |_: &WorkflowView, _: &RuleHandle<'_>| InspectionResult::passed(),
        );
        let handle = RuleHandle::new(&rule, Severity::Error);

        Finding {
            node: node.to_string(),
            view_type: ViewType::Workflow,
            rule_id: rule.id.clone(),
            rule_name: rule.name.clone(),
            result: InspectionResult::from_messages(
                messages.iter().map(|m| InspectionMessage::new(*m)).collect(),
                "Add direction prefix to arguments",
                &handle,
            ),
        }
    }

    #[test]
    fn test_format_finding_plain() {
        let formatter = TextFormatter::new().without_color();
        let output = formatter.format_finding(&finding("Main", &["first", "second"]));

        assert_eq!(
            output,
            "  error [M2A-WRM-001] first\n  error [M2A-WRM-001] second\n    = help: Add direction prefix to arguments\n"
        );
    }

    #[test]
    fn test_format_report_groups_nodes() {
        let report = InspectionReport {
            findings: vec![finding("Main", &["a"]), finding("Other", &["b"])],
            nodes_inspected: 3,
            error_count: 2,
            ..Default::default()
        };

        let output = TextFormatter::new().without_color().format(&report);
        assert!(output.starts_with("workflow Main\n"));
        assert!(output.contains("\nworkflow Other\n"));
        assert!(output.ends_with("3 nodes inspected: 2 errors\n"));
    }

    #[test]
    fn test_format_clean_report() {
        let report = InspectionReport {
            nodes_inspected: 1,
            ..Default::default()
        };

        let output = TextFormatter::new().without_color().format(&report);
        assert_eq!(output, "1 node inspected: no issues found\n");
    }
}

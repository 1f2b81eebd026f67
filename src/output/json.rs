//! JSON output formatter

use super::OutputFormatter;
use crate::engine::{Finding, InspectionReport};
use serde::Serialize;

/// JSON formatter for machine-readable output
#[derive(Default)]
pub struct JsonFormatter {
    /// Pretty print with indentation
    pub pretty: bool,
}

impl JsonFormatter {
    /// Create a new JSON formatter
    pub fn new() -> Self {
        Self::default()
    }

    /// Enable pretty printing
    pub fn pretty(mut self) -> Self {
        self.pretty = true;
        self
    }

    fn render<T: Serialize>(&self, value: &T) -> String {
        if self.pretty {
            serde_json::to_string_pretty(value).unwrap_or_default()
        } else {
            serde_json::to_string(value).unwrap_or_default()
        }
    }
}

#[derive(Serialize)]
struct JsonFinding<'a> {
    node: &'a str,
    view_type: String,
    rule_id: &'a str,
    rule_name: &'a str,
    severity: String,
    messages: Vec<&'a str>,
    recommendation: &'a str,
}

impl<'a> From<&'a Finding> for JsonFinding<'a> {
    fn from(f: &'a Finding) -> Self {
        Self {
            node: &f.node,
            view_type: f.view_type.to_string(),
            rule_id: &f.rule_id,
            rule_name: &f.rule_name,
            severity: f.result.severity().to_string(),
            messages: f.result.messages().iter().map(|m| m.text.as_str()).collect(),
            recommendation: f.result.recommendation(),
        }
    }
}

#[derive(Serialize)]
struct JsonOutput<'a> {
    findings: Vec<JsonFinding<'a>>,
    summary: JsonSummary,
}

#[derive(Serialize)]
struct JsonSummary {
    nodes_inspected: usize,
    error_count: usize,
    warning_count: usize,
    info_count: usize,
    duration_ms: u128,
}

impl OutputFormatter for JsonFormatter {
    fn format(&self, report: &InspectionReport) -> String {
        let output = JsonOutput {
            findings: report.findings.iter().map(JsonFinding::from).collect(),
            summary: JsonSummary {
                nodes_inspected: report.nodes_inspected,
                error_count: report.error_count,
                warning_count: report.warning_count,
                info_count: report.info_count,
                duration_ms: report.duration.as_millis(),
            },
        };

        self.render(&output)
    }

    fn format_finding(&self, finding: &Finding) -> String {
        self.render(&JsonFinding::from(finding))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostic::{InspectionMessage, InspectionResult, Severity};
    use crate::model::{ProjectView, ViewType};
    use crate::rule::{Rule, RuleHandle};

    fn finding() -> Finding {
        let rule = Rule::project(
            "ProjectDirectory",
            "M2A-PRM-001",
            |_: &ProjectView, _: &RuleHandle<'_>| InspectionResult::passed(),
        );
        let handle = RuleHandle::new(&rule, Severity::Info);

        Finding {
            node: "/work/proje".to_string(),
            view_type: ViewType::Project,
            rule_id: rule.id.clone(),
            rule_name: rule.name.clone(),
            result: InspectionResult::from_messages(
                vec![InspectionMessage::new("Project directory contains Turkish characters")],
                "Check the project directory",
                &handle,
            ),
        }
    }

    #[test]
    fn test_json_format_finding() {
        let output = JsonFormatter::new().format_finding(&finding());
        assert!(output.contains("\"rule_id\":\"M2A-PRM-001\""));
        assert!(output.contains("\"severity\":\"info\""));
        assert!(output.contains("\"view_type\":\"project\""));
        assert!(output.contains("\"recommendation\":\"Check the project directory\""));
    }

    #[test]
    fn test_json_format_report() {
        let report = InspectionReport {
            findings: vec![finding()],
            nodes_inspected: 5,
            info_count: 1,
            ..Default::default()
        };

        let output = JsonFormatter::new().format(&report);
        let value: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert_eq!(value["summary"]["nodes_inspected"], 5);
        assert_eq!(value["summary"]["info_count"], 1);
        assert_eq!(value["findings"][0]["messages"].as_array().unwrap().len(), 1);
    }

    #[test]
    fn test_json_pretty() {
        let output = JsonFormatter::new().pretty().format_finding(&finding());
        assert!(output.contains('\n'));
    }
}

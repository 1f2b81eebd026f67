//! Inspection engine

use crate::config::{Config, ConfigError, WorkflowIgnores};
use crate::diagnostic::{InspectionResult, Severity};
use crate::model::{ModelView, ProjectTree, ViewType, WorkflowNode};
use crate::registry::RuleRegistry;
use rayon::prelude::*;
use serde::Serialize;
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Result of one rule on one view
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RuleOutcome {
    pub rule_id: String,
    pub rule_name: String,
    pub result: InspectionResult,
}

/// A failing rule outcome, attributed to the node it was found on
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Finding {
    /// Node label (project directory, workflow name, or `workflow/Activity#n`)
    pub node: String,
    pub view_type: ViewType,
    pub rule_id: String,
    pub rule_name: String,
    pub result: InspectionResult,
}

/// Result of inspecting a whole project tree
#[derive(Debug, Default, Serialize)]
pub struct InspectionReport {
    /// Failing results, in traversal order
    pub findings: Vec<Finding>,

    /// Views inspected
    pub nodes_inspected: usize,

    /// Findings with error severity
    pub error_count: usize,

    /// Findings with warning severity
    pub warning_count: usize,

    /// Findings with info severity
    pub info_count: usize,

    /// Processing duration
    #[serde(skip)]
    pub duration: Duration,
}

impl InspectionReport {
    fn push(&mut self, finding: Finding) {
        match finding.result.severity() {
            Severity::Error => self.error_count += 1,
            Severity::Warning => self.warning_count += 1,
            Severity::Info => self.info_count += 1,
        }
        self.findings.push(finding);
    }

    /// Check if there are any errors
    pub fn has_errors(&self) -> bool {
        self.error_count > 0
    }

    /// Check if there are any warnings
    pub fn has_warnings(&self) -> bool {
        self.warning_count > 0
    }

    /// Check if report is clean (no errors or warnings)
    pub fn is_clean(&self) -> bool {
        self.error_count == 0 && self.warning_count == 0
    }

    /// Get exit code (0 = success, 1 = warnings, 2 = errors)
    pub fn exit_code(&self) -> i32 {
        if self.error_count > 0 {
            2
        } else if self.warning_count > 0 {
            1
        } else {
            0
        }
    }

    /// Merge another report into this one
    pub fn merge(&mut self, other: InspectionReport) {
        self.findings.extend(other.findings);
        self.nodes_inspected += other.nodes_inspected;
        self.error_count += other.error_count;
        self.warning_count += other.warning_count;
        self.info_count += other.info_count;
    }
}

/// Runs registered rules against model views
///
/// The engine keeps no state between calls: inspecting the same view twice
/// gives the same outcomes.
pub struct Engine {
    registry: Arc<RuleRegistry>,
    config: Config,
    workflow_ignores: WorkflowIgnores,
}

impl Engine {
    /// Create an engine over a fully populated registry
    ///
    /// Fails if a `per_workflow` pattern is not a valid glob.
    pub fn new(registry: RuleRegistry, config: Config) -> Result<Self, ConfigError> {
        Self::with_shared_registry(Arc::new(registry), config)
    }

    /// Create an engine over a registry shared with other engines
    pub fn with_shared_registry(
        registry: Arc<RuleRegistry>,
        config: Config,
    ) -> Result<Self, ConfigError> {
        let workflow_ignores = config.workflow_ignores()?;
        Ok(Self {
            registry,
            config,
            workflow_ignores,
        })
    }

    pub fn registry(&self) -> &RuleRegistry {
        &self.registry
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Run every rule registered for the view's type, in registration order
    pub fn inspect<'a>(&self, view: impl Into<ModelView<'a>>) -> Vec<RuleOutcome> {
        self.inspect_in(view.into(), None)
    }

    /// Inspect a view that belongs to `workflow`, honoring per-workflow ignores
    fn inspect_in(&self, view: ModelView<'_>, workflow: Option<&str>) -> Vec<RuleOutcome> {
        let mut outcomes = Vec::new();

        for rule in self.registry.rules_for(view.view_type()) {
            if !self.config.is_rule_enabled(&rule.id) {
                continue;
            }

            if let Some(workflow) = workflow {
                if self.workflow_ignores.should_ignore(&rule.id, workflow) {
                    continue;
                }
            }

            let severity = self
                .config
                .get_severity_override(&rule.id)
                .unwrap_or(rule.severity);

            if let Some(result) = rule.evaluate(view, severity) {
                log::debug!(
                    "{} on {} view: {}",
                    rule.id,
                    view.view_type(),
                    if result.has_errors() { "failed" } else { "passed" }
                );
                outcomes.push(RuleOutcome {
                    rule_id: rule.id.clone(),
                    rule_name: rule.name.clone(),
                    result,
                });
            }
        }

        outcomes
    }

    /// Walk a project tree: the project, then each workflow followed by its activities
    pub fn inspect_project(&self, tree: &ProjectTree) -> InspectionReport {
        let start = Instant::now();

        let mut report = InspectionReport::default();
        self.collect(
            &mut report,
            &tree.project.directory,
            ModelView::Project(&tree.project),
            None,
        );

        let workflow_reports: Vec<InspectionReport> = if self.config.engine.parallel {
            let jobs = if self.config.engine.jobs > 0 {
                self.config.engine.jobs
            } else {
                num_cpus::get()
            };

            match rayon::ThreadPoolBuilder::new().num_threads(jobs).build() {
                Ok(pool) => pool.install(|| {
                    tree.workflows
                        .par_iter()
                        .map(|node| self.inspect_workflow(node))
                        .collect()
                }),
                Err(e) => {
                    log::warn!("Falling back to sequential inspection: {}", e);
                    tree.workflows
                        .iter()
                        .map(|node| self.inspect_workflow(node))
                        .collect()
                }
            }
        } else {
            tree.workflows
                .iter()
                .map(|node| self.inspect_workflow(node))
                .collect()
        };

        for workflow_report in workflow_reports {
            report.merge(workflow_report);
        }

        report.duration = start.elapsed();
        report
    }

    /// Inspect one workflow and the activities it contains
    pub fn inspect_workflow(&self, node: &WorkflowNode) -> InspectionReport {
        let mut report = InspectionReport::default();
        let name = node.workflow.display_name.as_str();

        self.collect(
            &mut report,
            name,
            ModelView::Workflow(&node.workflow),
            Some(name),
        );

        for (index, activity) in node.activities.iter().enumerate() {
            let label = format!("{}/{}#{}", name, activity.simple_name(), index + 1);
            self.collect(&mut report, &label, ModelView::Activity(activity), Some(name));
        }

        report
    }

    fn collect(
        &self,
        report: &mut InspectionReport,
        label: &str,
        view: ModelView<'_>,
        workflow: Option<&str>,
    ) {
        report.nodes_inspected += 1;

        for outcome in self.inspect_in(view, workflow) {
            if !outcome.result.has_errors() {
                continue;
            }

            report.push(Finding {
                node: label.to_string(),
                view_type: view.view_type(),
                rule_id: outcome.rule_id,
                rule_name: outcome.rule_name,
                result: outcome.result,
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostic::InspectionMessage;
    use crate::model::{ActivityView, Argument, ArgumentDirection, ProjectView, WorkflowView};
    use crate::registry::{initialize, StaticCapabilities, REQUIRED_CAPABILITY};
    use crate::rule::Rule;

    fn builtin_engine(config: Config) -> Engine {
        let host = StaticCapabilities::new([REQUIRED_CAPABILITY]);
        Engine::new(initialize(&host).unwrap(), config).unwrap()
    }

    fn failing_workflow_rule(id: &str) -> Rule {
        let id_owned = id.to_string();
        Rule::workflow("Fails", id, move |_, rule| {
            InspectionResult::from_messages(
                vec![InspectionMessage::new(format!("{} fired", id_owned))],
                "",
                rule,
            )
        })
    }

    #[test]
    fn test_report_exit_code() {
        let mut report = InspectionReport::default();
        assert_eq!(report.exit_code(), 0);

        report.info_count = 3;
        assert_eq!(report.exit_code(), 0);
        assert!(report.is_clean());

        report.warning_count = 1;
        assert_eq!(report.exit_code(), 1);

        report.error_count = 1;
        assert_eq!(report.exit_code(), 2);
        assert!(report.has_errors());
    }

    #[test]
    fn test_report_merge() {
        let mut a = InspectionReport {
            nodes_inspected: 2,
            error_count: 1,
            ..Default::default()
        };
        let b = InspectionReport {
            nodes_inspected: 3,
            warning_count: 2,
            ..Default::default()
        };

        a.merge(b);
        assert_eq!(a.nodes_inspected, 5);
        assert_eq!(a.error_count, 1);
        assert_eq!(a.warning_count, 2);
    }

    #[test]
    fn test_inspect_returns_only_matching_rules() {
        let engine = builtin_engine(Config::new());
        let workflow = WorkflowView::new("Main");

        let outcomes = engine.inspect(&workflow);
        assert_eq!(outcomes.len(), 1);
        assert_eq!(outcomes[0].rule_id, "M2A-WRM-001");
        assert!(!outcomes[0].result.has_errors());
    }

    #[test]
    fn test_inspect_empty_registry() {
        let engine = Engine::new(RuleRegistry::new(), Config::new()).unwrap();
        assert!(engine.inspect(&ProjectView::new("/p")).is_empty());
    }

    #[test]
    fn test_multiple_rules_kept_separate_in_order() {
        let mut registry = RuleRegistry::new();
        for id in ["Z-1", "A-2", "M-3"] {
            registry
                .register_rule(ViewType::Workflow, failing_workflow_rule(id))
                .unwrap();
        }
        let engine = Engine::new(registry, Config::new()).unwrap();

        let outcomes = engine.inspect(&WorkflowView::new("Main"));
        let ids: Vec<_> = outcomes.iter().map(|o| o.rule_id.as_str()).collect();
        assert_eq!(ids, vec!["Z-1", "A-2", "M-3"]);
        for outcome in &outcomes {
            assert_eq!(outcome.result.messages().len(), 1);
            assert!(outcome.result.messages()[0].text.starts_with(&outcome.rule_id));
        }
    }

    #[test]
    fn test_inspect_is_idempotent() {
        let engine = builtin_engine(Config::new());
        let workflow = WorkflowView::new("Main")
            .with_argument(Argument::new("Value", ArgumentDirection::In))
            .with_argument(Argument::new("out_Ok", ArgumentDirection::Out));

        assert_eq!(engine.inspect(&workflow), engine.inspect(&workflow));
    }

    #[test]
    fn test_disabled_rule_skipped() {
        let mut config = Config::new();
        config.rules.disabled.push("M2A-PRM-001".to_string());
        let engine = builtin_engine(config);

        assert!(engine.inspect(&ProjectView::new(r"C:\Ömer")).is_empty());
    }

    #[test]
    fn test_severity_override_reaches_result() {
        let mut config = Config::new();
        config
            .rules
            .severity
            .insert("M2A-PRM-001".to_string(), Severity::Error);
        let engine = builtin_engine(config);

        let outcomes = engine.inspect(&ProjectView::new(r"C:\Users\Ömer\Project"));
        assert_eq!(outcomes[0].result.severity(), Severity::Error);
    }

    #[test]
    fn test_inspect_project_walk() {
        let mut config = Config::new();
        config.engine.parallel = false;
        let engine = builtin_engine(config);

        let tree = ProjectTree {
            project: ProjectView::new(r"C:\Users\Ömer\Project"),
            workflows: vec![WorkflowNode {
                workflow: WorkflowView::new("Main")
                    .with_argument(Argument::new("Value", ArgumentDirection::In)),
                activities: vec![
                    ActivityView::new("System.Activities.Statements.Assign"),
                    ActivityView::new("UiPath.Core.Activities.LogMessage").with_argument(
                        Argument::new("Message", ArgumentDirection::In)
                            .with_expression(r#""Done""#),
                    ),
                ],
            }],
        };

        let report = engine.inspect_project(&tree);
        assert_eq!(report.nodes_inspected, 4);

        let nodes: Vec<_> = report.findings.iter().map(|f| f.node.as_str()).collect();
        assert_eq!(
            nodes,
            vec![r"C:\Users\Ömer\Project", "Main", "Main/LogMessage#2"]
        );
        assert_eq!(report.info_count, 1);
        assert_eq!(report.error_count, 1);
        assert_eq!(report.warning_count, 1);
        assert_eq!(report.findings[1].rule_name, "ArgumentDirection");
        assert_eq!(report.exit_code(), 2);
    }

    #[test]
    fn test_per_workflow_ignore_applies_to_activities() {
        let mut config = Config::new();
        config
            .rules
            .per_workflow
            .insert("Test*".to_string(), vec!["all".to_string()]);
        let engine = builtin_engine(config);

        let node = WorkflowNode {
            workflow: WorkflowView::new("TestMain")
                .with_argument(Argument::new("Value", ArgumentDirection::In)),
            activities: vec![ActivityView::new("Namespace.LogMessage")],
        };

        let report = engine.inspect_workflow(&node);
        assert!(report.findings.is_empty());
        assert_eq!(report.nodes_inspected, 2);
    }

    #[test]
    fn test_finding_named_after_rule_that_fired() {
        let mut registry = RuleRegistry::new();
        registry
            .register_rule(
                ViewType::Activity,
                Rule::activity("ActivityName", "X-001", |_, _| InspectionResult::passed()),
            )
            .unwrap();
        registry
            .register_rule(
                ViewType::Workflow,
                Rule::workflow("WorkflowName", "X-001", |_, rule| {
                    InspectionResult::from_messages(
                        vec![InspectionMessage::new("fired")],
                        "",
                        rule,
                    )
                }),
            )
            .unwrap();
        let engine = Engine::new(registry, Config::new()).unwrap();

        let outcomes = engine.inspect(&WorkflowView::new("Main"));
        assert_eq!(outcomes[0].rule_name, "WorkflowName");

        let node = WorkflowNode {
            workflow: WorkflowView::new("Main"),
            activities: vec![ActivityView::new("Namespace.LogMessage")],
        };
        let report = engine.inspect_workflow(&node);
        assert_eq!(report.findings.len(), 1);
        assert_eq!(report.findings[0].view_type, ViewType::Workflow);
        assert_eq!(report.findings[0].rule_name, "WorkflowName");
    }

    #[test]
    fn test_bad_workflow_glob_rejected() {
        let mut config = Config::new();
        config
            .rules
            .per_workflow
            .insert("Test[".to_string(), vec!["all".to_string()]);

        let host = StaticCapabilities::new([REQUIRED_CAPABILITY]);
        let result = Engine::new(initialize(&host).unwrap(), config);
        assert!(matches!(result, Err(ConfigError::Invalid(_))));
    }
}

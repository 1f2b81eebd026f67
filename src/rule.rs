//! Rule definition
//!
//! A rule pairs a name, a stable id and a default severity with a check
//! function bound to exactly one [`ViewType`]. Rules are built once while the
//! registry is being configured and are never mutated afterwards.

use crate::diagnostic::{InspectionResult, Severity};
use crate::model::{ActivityView, ModelView, ProjectView, ViewType, WorkflowView};
use std::fmt;
use std::sync::Arc;

/// Check function for activity rules
pub type ActivityCheck = dyn Fn(&ActivityView, &RuleHandle<'_>) -> InspectionResult + Send + Sync;

/// Check function for workflow rules
pub type WorkflowCheck = dyn Fn(&WorkflowView, &RuleHandle<'_>) -> InspectionResult + Send + Sync;

/// Check function for project rules
pub type ProjectCheck = dyn Fn(&ProjectView, &RuleHandle<'_>) -> InspectionResult + Send + Sync;

/// A check function, tagged by the view type it inspects
#[derive(Clone)]
pub enum RuleCheck {
    Activity(Arc<ActivityCheck>),
    Workflow(Arc<WorkflowCheck>),
    Project(Arc<ProjectCheck>),
}

impl RuleCheck {
    pub fn view_type(&self) -> ViewType {
        match self {
            RuleCheck::Activity(_) => ViewType::Activity,
            RuleCheck::Workflow(_) => ViewType::Workflow,
            RuleCheck::Project(_) => ViewType::Project,
        }
    }
}

impl fmt::Debug for RuleCheck {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "RuleCheck::{:?}", self.view_type())
    }
}

/// An inspection rule
#[derive(Debug, Clone)]
pub struct Rule {
    /// Unique, stable rule identifier (e.g., "M2A-WRM-001")
    pub id: String,

    /// Human-readable name
    pub name: String,

    /// Detailed description
    pub description: Option<String>,

    /// Default severity level
    pub severity: Severity,

    check: RuleCheck,
}

impl Rule {
    fn with_check(name: &str, id: &str, check: RuleCheck) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            description: None,
            severity: Severity::default(),
            check,
        }
    }

    /// Create a rule that inspects activities
    pub fn activity<F>(name: &str, id: &str, check: F) -> Self
    where
        F: Fn(&ActivityView, &RuleHandle<'_>) -> InspectionResult + Send + Sync + 'static,
    {
        Self::with_check(name, id, RuleCheck::Activity(Arc::new(check)))
    }

    /// Create a rule that inspects workflows
    pub fn workflow<F>(name: &str, id: &str, check: F) -> Self
    where
        F: Fn(&WorkflowView, &RuleHandle<'_>) -> InspectionResult + Send + Sync + 'static,
    {
        Self::with_check(name, id, RuleCheck::Workflow(Arc::new(check)))
    }

    /// Create a rule that inspects the project
    pub fn project<F>(name: &str, id: &str, check: F) -> Self
    where
        F: Fn(&ProjectView, &RuleHandle<'_>) -> InspectionResult + Send + Sync + 'static,
    {
        Self::with_check(name, id, RuleCheck::Project(Arc::new(check)))
    }

    /// Set the default severity
    pub fn with_severity(mut self, severity: Severity) -> Self {
        self.severity = severity;
        self
    }

    /// Set the description
    pub fn with_description(mut self, desc: &str) -> Self {
        self.description = Some(desc.to_string());
        self
    }

    /// View type this rule is bound to
    pub fn view_type(&self) -> ViewType {
        self.check.view_type()
    }

    pub fn check(&self) -> &RuleCheck {
        &self.check
    }

    /// Run the check against a view with the given configured severity
    ///
    /// Returns `None` when the view is of a different type than the rule.
    pub fn evaluate(&self, view: ModelView<'_>, severity: Severity) -> Option<InspectionResult> {
        let handle = RuleHandle::new(self, severity);

        match (&self.check, view) {
            (RuleCheck::Activity(check), ModelView::Activity(v)) => Some(check(v, &handle)),
            (RuleCheck::Workflow(check), ModelView::Workflow(v)) => Some(check(v, &handle)),
            (RuleCheck::Project(check), ModelView::Project(v)) => Some(check(v, &handle)),
            _ => None,
        }
    }
}

/// The invoking rule as seen from inside its check function
#[derive(Debug, Clone, Copy)]
pub struct RuleHandle<'a> {
    rule: &'a Rule,
    severity: Severity,
}

impl<'a> RuleHandle<'a> {
    pub fn new(rule: &'a Rule, severity: Severity) -> Self {
        Self { rule, severity }
    }

    pub fn id(&self) -> &'a str {
        &self.rule.id
    }

    pub fn name(&self) -> &'a str {
        &self.rule.name
    }

    /// Configured severity for this invocation
    pub fn severity(&self) -> Severity {
        self.severity
    }

    pub fn rule(&self) -> &'a Rule {
        self.rule
    }
}

//! Read-only model views of an automation project
//!
//! The host owns the project files and builds these views. The engine only
//! reads them: a view is never mutated and never refers back into the engine.
//!
//! ```text
//! ProjectView -> WorkflowView -> ActivityView
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use thiserror::Error;

/// Error loading a model snapshot
#[derive(Debug, Error)]
pub enum ModelError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Unknown snapshot format: {0}")]
    UnknownFormat(String),
}

/// The level of the document model a view (and a rule) belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ViewType {
    Activity,
    Workflow,
    Project,
}

impl fmt::Display for ViewType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ViewType::Activity => write!(f, "activity"),
            ViewType::Workflow => write!(f, "workflow"),
            ViewType::Project => write!(f, "project"),
        }
    }
}

/// Direction of a workflow or activity argument
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String")]
pub enum ArgumentDirection {
    In,
    Out,
    InOut,
    /// Plain property, also used for any direction the host doesn't know
    #[default]
    Property,
}

impl From<String> for ArgumentDirection {
    fn from(s: String) -> Self {
        match s.as_str() {
            "In" => ArgumentDirection::In,
            "Out" => ArgumentDirection::Out,
            "InOut" => ArgumentDirection::InOut,
            _ => ArgumentDirection::Property,
        }
    }
}

/// A single argument of an activity or workflow
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Argument {
    pub display_name: String,

    #[serde(default)]
    pub direction: ArgumentDirection,

    /// Expression bound to the argument (may be empty)
    #[serde(default)]
    pub defined_expression: String,
}

impl Argument {
    pub fn new(display_name: &str, direction: ArgumentDirection) -> Self {
        Self {
            display_name: display_name.to_string(),
            direction,
            defined_expression: String::new(),
        }
    }

    /// Set the bound expression
    pub fn with_expression(mut self, expression: &str) -> Self {
        self.defined_expression = expression.to_string();
        self
    }
}

/// Activity kinds the rules know about
///
/// Hosts hand over fully-qualified type names; [`ActivityKind::from_type_name`]
/// is the lookup that maps them onto the kinds rules dispatch on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ActivityKind {
    LogMessage,
    Other,
}

impl fmt::Display for ActivityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ActivityKind::LogMessage => write!(f, "LogMessage"),
            ActivityKind::Other => write!(f, "Other"),
        }
    }
}

/// Simple type names mapped to their activity kind
const ACTIVITY_KINDS: &[(&str, ActivityKind)] = &[("LogMessage", ActivityKind::LogMessage)];

impl ActivityKind {
    /// Resolve a kind from an assembly-qualified or namespaced type name
    ///
    /// `"UiPath.Core.Activities.LogMessage, UiPath.System.Activities"` and
    /// `"Namespace.LogMessage"` both resolve to [`ActivityKind::LogMessage`].
    pub fn from_type_name(type_name: &str) -> Self {
        let simple = simple_type_name(type_name);
        ACTIVITY_KINDS
            .iter()
            .find(|(name, _)| *name == simple)
            .map(|(_, kind)| *kind)
            .unwrap_or(ActivityKind::Other)
    }
}

/// Last namespace segment of the type part of a qualified name
fn simple_type_name(type_name: &str) -> &str {
    let type_part = type_name.split(',').next().unwrap_or_default();
    type_part.rsplit('.').next().unwrap_or_default()
}

/// Projection of one activity inside a workflow
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActivityView {
    /// Fully-qualified type name
    #[serde(rename = "type")]
    pub type_name: String,

    #[serde(default)]
    pub arguments: Vec<Argument>,
}

impl ActivityView {
    pub fn new(type_name: &str) -> Self {
        Self {
            type_name: type_name.to_string(),
            arguments: Vec::new(),
        }
    }

    pub fn with_argument(mut self, argument: Argument) -> Self {
        self.arguments.push(argument);
        self
    }

    pub fn kind(&self) -> ActivityKind {
        ActivityKind::from_type_name(&self.type_name)
    }

    /// Type name without namespace or assembly qualifiers
    pub fn simple_name(&self) -> &str {
        simple_type_name(&self.type_name)
    }

    /// Last argument with the given display name
    pub fn argument(&self, display_name: &str) -> Option<&Argument> {
        self.arguments
            .iter()
            .rev()
            .find(|a| a.display_name == display_name)
    }
}

/// Projection of one workflow file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkflowView {
    pub display_name: String,

    #[serde(default)]
    pub arguments: Vec<Argument>,
}

impl WorkflowView {
    pub fn new(display_name: &str) -> Self {
        Self {
            display_name: display_name.to_string(),
            arguments: Vec::new(),
        }
    }

    pub fn with_argument(mut self, argument: Argument) -> Self {
        self.arguments.push(argument);
        self
    }
}

/// Projection of the whole project
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectView {
    /// Absolute path of the project directory
    pub directory: String,
}

impl ProjectView {
    pub fn new(directory: &str) -> Self {
        Self {
            directory: directory.to_string(),
        }
    }
}

/// A borrowed view of any level, tagged by its [`ViewType`]
#[derive(Debug, Clone, Copy)]
pub enum ModelView<'a> {
    Activity(&'a ActivityView),
    Workflow(&'a WorkflowView),
    Project(&'a ProjectView),
}

impl ModelView<'_> {
    pub fn view_type(&self) -> ViewType {
        match self {
            ModelView::Activity(_) => ViewType::Activity,
            ModelView::Workflow(_) => ViewType::Workflow,
            ModelView::Project(_) => ViewType::Project,
        }
    }
}

impl<'a> From<&'a ActivityView> for ModelView<'a> {
    fn from(view: &'a ActivityView) -> Self {
        ModelView::Activity(view)
    }
}

impl<'a> From<&'a WorkflowView> for ModelView<'a> {
    fn from(view: &'a WorkflowView) -> Self {
        ModelView::Workflow(view)
    }
}

impl<'a> From<&'a ProjectView> for ModelView<'a> {
    fn from(view: &'a ProjectView) -> Self {
        ModelView::Project(view)
    }
}

/// A workflow together with the activities it contains
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkflowNode {
    pub workflow: WorkflowView,

    #[serde(default)]
    pub activities: Vec<ActivityView>,
}

/// Snapshot of a fully built project model, as handed over by a host
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectTree {
    pub project: ProjectView,

    #[serde(default)]
    pub workflows: Vec<WorkflowNode>,
}

impl ProjectTree {
    /// Load a snapshot from a `.json`, `.yaml` or `.yml` file
    pub fn load(path: &Path) -> Result<Self, ModelError> {
        let content = std::fs::read_to_string(path)?;

        let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("");

        match ext {
            "yaml" | "yml" => Ok(serde_yaml::from_str(&content)?),
            "json" => Ok(serde_json::from_str(&content)?),
            _ => Err(ModelError::UnknownFormat(ext.to_string())),
        }
    }

    /// Total number of views in the tree
    pub fn node_count(&self) -> usize {
        1 + self
            .workflows
            .iter()
            .map(|w| 1 + w.activities.len())
            .sum::<usize>()
    }
}

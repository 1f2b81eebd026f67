//! Flowlint - Workflow Analyzer rule engine
//!
//! Inspects the model of an automation project (a project made of workflows
//! made of activities) and reports violations of style and structure rules.
//!
//! # Architecture
//!
//! ```text
//! Host -> ModelView -> Engine -> RuleRegistry -> Rule -> InspectionResult
//! ```
//!
//! The host builds the model views and probes its own capabilities;
//! [`initialize`] fills a [`RuleRegistry`] with the built-in rules and the
//! [`Engine`] runs every rule registered for a view's type.
//!
//! ```
//! use flowlint::{initialize, Config, Engine, StaticCapabilities, WorkflowView};
//! use flowlint::{Argument, ArgumentDirection};
//!
//! let host = StaticCapabilities::new(["WorkflowAnalyzerV4"]);
//! let engine = Engine::new(initialize(&host).unwrap(), Config::default()).unwrap();
//!
//! let workflow = WorkflowView::new("Main")
//!     .with_argument(Argument::new("Value", ArgumentDirection::In));
//! let outcomes = engine.inspect(&workflow);
//! assert!(outcomes[0].result.has_errors());
//! ```

pub mod config;
pub mod diagnostic;
pub mod engine;
pub mod model;
pub mod output;
pub mod registry;
pub mod rule;
pub mod rules;

// Re-export main types
pub use config::Config;
pub use diagnostic::{InspectionMessage, InspectionResult, Severity};
pub use engine::{Engine, Finding, InspectionReport, RuleOutcome};
pub use model::{
    ActivityKind, ActivityView, Argument, ArgumentDirection, ModelView, ProjectTree, ProjectView,
    ViewType, WorkflowNode, WorkflowView,
};
pub use output::{JsonFormatter, OutputFormatter, TextFormatter};
pub use registry::{
    initialize, HostCapabilities, RegistryError, RuleRegistry, StaticCapabilities,
    REQUIRED_CAPABILITY,
};
pub use rule::{Rule, RuleCheck, RuleHandle};

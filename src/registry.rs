//! Rule registry
//!
//! Maps each [`ViewType`] to the rules registered for it, in registration
//! order. The registry is filled once by [`initialize`] (or by hand through
//! [`RuleRegistry::register_rule`]) and then only read, so it can be shared
//! across threads without locking.

use crate::model::ViewType;
use crate::rule::Rule;
use crate::rules;
use std::collections::{BTreeMap, HashSet};
use thiserror::Error;

/// Host feature that must be present for any rule to be registered
pub const REQUIRED_CAPABILITY: &str = "WorkflowAnalyzerV4";

/// Configuration error raised while registering rules
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    #[error("Duplicate rule id '{id}' for {view_type} rules")]
    DuplicateRuleId { view_type: ViewType, id: String },

    #[error("Rule '{id}' inspects {actual} views but was registered for {expected} views")]
    ViewTypeMismatch {
        id: String,
        expected: ViewType,
        actual: ViewType,
    },
}

/// Capability probe offered by the host
pub trait HostCapabilities {
    /// Whether the host supports the named feature
    fn has(&self, flag: &str) -> bool;
}

/// Fixed set of capability flags
#[derive(Debug, Clone, Default)]
pub struct StaticCapabilities {
    flags: HashSet<String>,
}

impl StaticCapabilities {
    pub fn new<I, S>(flags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            flags: flags.into_iter().map(Into::into).collect(),
        }
    }
}

impl HostCapabilities for StaticCapabilities {
    fn has(&self, flag: &str) -> bool {
        self.flags.contains(flag)
    }
}

/// Registered rules, grouped by view type
#[derive(Debug, Clone, Default)]
pub struct RuleRegistry {
    rules: BTreeMap<ViewType, Vec<Rule>>,
}

impl RuleRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a rule for a view type
    ///
    /// The rule is appended after the rules already registered for
    /// `view_type`; that order is the order results are reported in.
    pub fn register_rule(&mut self, view_type: ViewType, rule: Rule) -> Result<(), RegistryError> {
        let actual = rule.view_type();
        if actual != view_type {
            return Err(RegistryError::ViewTypeMismatch {
                id: rule.id,
                expected: view_type,
                actual,
            });
        }

        let rules = self.rules.entry(view_type).or_default();
        if rules.iter().any(|r| r.id == rule.id) {
            return Err(RegistryError::DuplicateRuleId {
                view_type,
                id: rule.id,
            });
        }

        log::debug!("Registered {} rule {} ({})", view_type, rule.id, rule.name);
        rules.push(rule);
        Ok(())
    }

    /// Rules bound to `view_type`, in registration order
    pub fn rules_for(&self, view_type: ViewType) -> &[Rule] {
        self.rules.get(&view_type).map(Vec::as_slice).unwrap_or(&[])
    }

    /// All registered rules, grouped by view type
    pub fn rules(&self) -> impl Iterator<Item = &Rule> + '_ {
        self.rules.values().flatten()
    }

    /// Find a rule by id
    pub fn find(&self, id: &str) -> Option<&Rule> {
        self.rules().find(|r| r.id == id)
    }

    pub fn len(&self) -> usize {
        self.rules.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Build the registry with the built-in rules
///
/// Hosts without [`REQUIRED_CAPABILITY`] get an empty registry. That is not an
/// error: older hosts simply don't support custom rules.
pub fn initialize(host: &dyn HostCapabilities) -> Result<RuleRegistry, RegistryError> {
    let mut registry = RuleRegistry::new();

    if !host.has(REQUIRED_CAPABILITY) {
        log::info!(
            "Host does not advertise {}, no rules registered",
            REQUIRED_CAPABILITY
        );
        return Ok(registry);
    }

    for rule in rules::builtin_rules() {
        registry.register_rule(rule.view_type(), rule)?;
    }

    log::info!("Registered {} rules", registry.len());
    Ok(registry)
}

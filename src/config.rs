//! Configuration for the inspection engine
//!
//! Reads configuration from:
//! - `.flowlintrc.yaml` / `.flowlintrc.json` (project-level)
//! - `~/.flowlintrc.yaml` (user-level)

use crate::diagnostic::Severity;
use crate::registry::REQUIRED_CAPABILITY;
use globset::{Glob, GlobSet, GlobSetBuilder};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Configuration error
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Engine settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Inspect workflows in parallel
    pub parallel: bool,

    /// Number of parallel jobs (0 = auto-detect)
    pub jobs: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            parallel: true,
            jobs: 0,
        }
    }
}

/// Output settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Output format
    pub format: OutputFormat,

    /// Color mode
    pub color: ColorMode,

    /// Verbose output
    pub verbose: bool,
}

/// Output format options
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" => Ok(OutputFormat::Text),
            "json" => Ok(OutputFormat::Json),
            _ => Err(format!("Unknown output format: {}", s)),
        }
    }
}

/// Color mode options
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColorMode {
    #[default]
    Auto,
    Always,
    Never,
}

/// Rule configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RulesConfig {
    /// Disabled rules
    pub disabled: Vec<String>,

    /// Enabled rules (empty = all)
    pub enabled: Vec<String>,

    /// Ignore rules by id prefix (e.g., "M2A-PRM" ignores all project rules)
    pub ignore: Vec<String>,

    /// Severity overrides (rule_id -> severity)
    pub severity: HashMap<String, Severity>,

    /// Per-workflow rule ignores (workflow name glob -> rule IDs)
    pub per_workflow: HashMap<String, Vec<String>>,
}

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Engine settings
    pub engine: EngineConfig,

    /// Output settings
    pub output: OutputConfig,

    /// Rule configuration
    pub rules: RulesConfig,

    /// Capability flags the command-line host advertises
    pub capabilities: Vec<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            engine: EngineConfig::default(),
            output: OutputConfig::default(),
            rules: RulesConfig::default(),
            capabilities: vec![REQUIRED_CAPABILITY.to_string()],
        }
    }
}

impl Config {
    /// Create default configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Load configuration from a file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;

        let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("");

        let config: Self = match ext {
            "yaml" | "yml" => serde_yaml::from_str(&content)?,
            "json" => serde_json::from_str(&content)?,
            _ => {
                return Err(ConfigError::Invalid(format!(
                    "Unknown config file format: {}",
                    ext
                )))
            }
        };

        config.validate()?;
        log::debug!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    /// Reject globs that can never match anything
    fn validate(&self) -> Result<(), ConfigError> {
        self.workflow_ignores().map(|_| ())
    }

    /// Load configuration from default locations
    pub fn load_default() -> Result<Self, ConfigError> {
        let config_names = [
            ".flowlintrc.yaml",
            ".flowlintrc.yml",
            ".flowlintrc.json",
            "flowlint.yaml",
            "flowlint.yml",
            "flowlint.json",
        ];

        // Check current directory
        for name in &config_names {
            let path = PathBuf::from(name);
            if path.exists() {
                return Self::load(&path);
            }
        }

        // Check home directory
        if let Some(home) = dirs::home_dir() {
            for name in &config_names {
                let path = home.join(name);
                if path.exists() {
                    return Self::load(&path);
                }
            }
        }

        Ok(Self::default())
    }

    /// Merge CLI arguments into configuration
    pub fn merge_cli(
        &mut self,
        format: Option<OutputFormat>,
        verbose: Option<bool>,
        jobs: Option<usize>,
        disabled_rules: Option<Vec<String>>,
        enabled_rules: Option<Vec<String>>,
    ) {
        if let Some(f) = format {
            self.output.format = f;
        }
        if let Some(v) = verbose {
            self.output.verbose = v;
        }
        if let Some(j) = jobs {
            self.engine.jobs = j;
        }
        if let Some(disabled) = disabled_rules {
            self.rules.disabled.extend(disabled);
        }
        if let Some(enabled) = enabled_rules {
            self.rules.enabled = enabled;
        }
    }

    /// Check if a rule is enabled
    pub fn is_rule_enabled(&self, rule_id: &str) -> bool {
        if self.rules.disabled.iter().any(|r| r == rule_id) {
            return false;
        }

        // Ignore prefixes are case-insensitive
        let rule_upper = rule_id.to_uppercase();
        if self
            .rules
            .ignore
            .iter()
            .any(|prefix| rule_upper.starts_with(&prefix.to_uppercase()))
        {
            return false;
        }

        if !self.rules.enabled.is_empty() {
            return self.rules.enabled.iter().any(|r| r == rule_id);
        }

        true
    }

    /// Get severity override for a rule
    pub fn get_severity_override(&self, rule_id: &str) -> Option<Severity> {
        self.rules.severity.get(rule_id).copied()
    }

    /// Compile the `per_workflow` patterns
    pub fn workflow_ignores(&self) -> Result<WorkflowIgnores, ConfigError> {
        let mut builder = GlobSetBuilder::new();
        let mut rules = Vec::with_capacity(self.rules.per_workflow.len());

        for (pattern, ids) in &self.rules.per_workflow {
            let glob = Glob::new(pattern).map_err(|e| {
                ConfigError::Invalid(format!("Bad per_workflow pattern '{}': {}", pattern, e))
            })?;
            builder.add(glob);
            rules.push(ids.clone());
        }

        let set = builder
            .build()
            .map_err(|e| ConfigError::Invalid(format!("Bad per_workflow patterns: {}", e)))?;

        Ok(WorkflowIgnores { set, rules })
    }
}

/// Compiled per-workflow rule ignores
#[derive(Debug, Clone)]
pub struct WorkflowIgnores {
    set: GlobSet,
    /// Rule ids per glob, indexed like `set`
    rules: Vec<Vec<String>>,
}

impl Default for WorkflowIgnores {
    fn default() -> Self {
        Self {
            set: GlobSet::empty(),
            rules: Vec::new(),
        }
    }
}

impl WorkflowIgnores {
    /// Check if a rule should be ignored for a workflow
    pub fn should_ignore(&self, rule_id: &str, workflow: &str) -> bool {
        if self.rules.is_empty() {
            return false;
        }

        self.set
            .matches(workflow)
            .into_iter()
            .any(|i| self.rules[i].iter().any(|r| r == "all" || r == rule_id))
    }
}

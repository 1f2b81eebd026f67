//! Flowlint CLI - runs the Workflow Analyzer rules over a project model snapshot

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use colored::Colorize;
use flowlint::config::{ColorMode, Config, OutputFormat};
use flowlint::{
    initialize, Engine, JsonFormatter, OutputFormatter, ProjectTree, Rule, Severity,
    StaticCapabilities, TextFormatter,
};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "flowlint",
    version,
    about = "Workflow Analyzer rules for automation projects",
    long_about = "Inspects a JSON or YAML snapshot of an automation project model \
                  (project, workflows, activities) and reports rule violations."
)]
struct Cli {
    /// Project model snapshot (.json, .yaml or .yml)
    #[arg(required_unless_present = "list_rules")]
    snapshot: Option<PathBuf>,

    /// Configuration file path
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum)]
    format: Option<Format>,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Disable colored output
    #[arg(long)]
    no_color: bool,

    /// Number of parallel jobs (0 = auto)
    #[arg(short, long)]
    jobs: Option<usize>,

    /// Disable specific rules (comma-separated)
    #[arg(long, value_delimiter = ',')]
    disable: Option<Vec<String>>,

    /// Only enable specific rules (comma-separated)
    #[arg(long, value_delimiter = ',')]
    select: Option<Vec<String>>,

    /// List available rules and exit
    #[arg(long)]
    list_rules: bool,

    /// Exit with 0 even if errors are found
    #[arg(long)]
    exit_zero: bool,
}

#[derive(Clone, Copy, ValueEnum)]
enum Format {
    Text,
    Json,
}

fn print_rule(rule: &Rule, config: &Config) {
    let severity = config.get_severity_override(&rule.id).unwrap_or(rule.severity);
    let severity = match severity {
        Severity::Error => "error".red(),
        Severity::Warning => "warning".yellow(),
        Severity::Info => "info".blue(),
    };

    let disabled = if config.is_rule_enabled(&rule.id) {
        "".normal()
    } else {
        " [disabled]".dimmed()
    };

    println!(
        "    {} [{}] ({}) {}{}",
        rule.id.cyan(),
        severity,
        rule.view_type(),
        rule.name,
        disabled
    );
    if let Some(desc) = &rule.description {
        println!("        {}", desc.dimmed());
    }
}

fn run(cli: Cli) -> Result<i32> {
    let mut config = match &cli.config {
        Some(path) => Config::load(path)
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None => Config::load_default().context("Failed to load default config")?,
    };

    let format = cli.format.map(|f| match f {
        Format::Text => OutputFormat::Text,
        Format::Json => OutputFormat::Json,
    });
    config.merge_cli(
        format,
        cli.verbose.then_some(true),
        cli.jobs,
        cli.disable,
        cli.select,
    );

    match config.output.color {
        ColorMode::Always => colored::control::set_override(true),
        ColorMode::Never => colored::control::set_override(false),
        ColorMode::Auto => {}
    }
    if cli.no_color {
        colored::control::set_override(false);
    }

    let host = StaticCapabilities::new(config.capabilities.iter().cloned());
    let registry = initialize(&host).context("Failed to register rules")?;

    if registry.is_empty() {
        log::warn!("No rules registered; check the `capabilities` setting");
    }

    if cli.list_rules {
        println!("{}", "Available rules:".bold());
        for rule in registry.rules() {
            print_rule(rule, &config);
        }
        return Ok(0);
    }

    let Some(snapshot) = &cli.snapshot else {
        anyhow::bail!("No project snapshot given");
    };

    let tree = ProjectTree::load(snapshot)
        .with_context(|| format!("Failed to load snapshot {}", snapshot.display()))?;

    if config.output.verbose {
        eprintln!(
            "Inspecting {} views with {} rules",
            tree.node_count(),
            registry.len()
        );
    }

    let engine = Engine::new(registry, config).context("Invalid per_workflow patterns")?;
    let report = engine.inspect_project(&tree);

    let formatter: Box<dyn OutputFormatter> = match engine.config().output.format {
        OutputFormat::Text => {
            let formatter = TextFormatter::new();
            if cli.no_color || engine.config().output.color == ColorMode::Never {
                Box::new(formatter.without_color())
            } else {
                Box::new(formatter)
            }
        }
        OutputFormat::Json => Box::new(JsonFormatter::new().pretty()),
    };
    print!("{}", formatter.format(&report));

    if engine.config().output.verbose {
        eprintln!("Done in {:.2?}", report.duration);
    }

    Ok(if cli.exit_zero { 0 } else { report.exit_code() })
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();

    match run(cli) {
        Ok(code) => std::process::exit(code),
        Err(e) => {
            eprintln!("{}: {:#}", "error".red().bold(), e);
            std::process::exit(3);
        }
    }
}

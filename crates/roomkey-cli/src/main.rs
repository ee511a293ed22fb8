//! roomkey command line.
//!
//! Decides whether a subject may open a location, using the configured rule
//! table and the hotel fixtures.
//!
//! # Quick Start
//!
//! ```bash
//! # Walk the sample hotel through the standard scenarios
//! roomkey demo
//!
//! # Decide one request
//! roomkey check user-customer-standard-001 room-101
//!
//! # Inspect and validate the rule table
//! roomkey rules
//! roomkey validate rules/access-control.json
//! ```

mod commands;
mod style;

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use roomkey_config::{ConfigLoader, RoomkeyConfig};
use tracing::debug;
use tracing_subscriber::EnvFilter;

/// roomkey - rule-table access control for hotel smart locks.
#[derive(Parser)]
#[command(name = "roomkey")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Project directory holding roomkey.toml; relative paths resolve here.
    #[arg(long, global = true, default_value = ".")]
    project: PathBuf,

    /// Disable colored output.
    #[arg(long, global = true)]
    no_color: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Decide whether a subject may open a location.
    Check {
        /// Subject (user) id.
        subject: String,

        /// Location id.
        location: String,

        /// Output format.
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,

        /// Exit with status 2 when access is denied.
        #[arg(long)]
        strict: bool,

        /// Show how every rule fared against the request.
        #[arg(long)]
        explain: bool,
    },

    /// Validate a rule table file.
    Validate {
        /// Rule table to validate (defaults to the configured one).
        path: Option<PathBuf>,
    },

    /// List the rules of a rule table in evaluation order.
    Rules {
        /// Rule table to list (defaults to the configured one).
        path: Option<PathBuf>,

        /// Output format.
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },

    /// Run the sample hotel walkthrough.
    Demo,

    /// Configuration management.
    #[command(subcommand)]
    Config(ConfigCommands),
}

#[derive(Subcommand)]
enum ConfigCommands {
    /// Show the effective configuration.
    Show {
        /// Output format.
        #[arg(short, long, value_enum, default_value_t = ConfigFormat::Text)]
        format: ConfigFormat,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ConfigFormat {
    Text,
    Json,
    Toml,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    style::set_no_color(cli.no_color || std::env::var_os("NO_COLOR").is_some());

    match run(cli) {
        Ok(code) => code,
        Err(e) => {
            style::print_error(&format!("{e:#}"));
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<ExitCode> {
    let config = ConfigLoader::new()
        .with_project_dir(&cli.project)
        .load()
        .context("Failed to load configuration")?;

    init_tracing(&config);
    debug!(
        project = %cli.project.display(),
        rules = %config.policy.rules_path.display(),
        fixtures = %config.data.fixtures_path.display(),
        "Configuration loaded"
    );

    match cli.command {
        Commands::Check {
            subject,
            location,
            format,
            strict,
            explain,
        } => commands::check::run(&config, &subject, &location, format, strict, explain),
        Commands::Validate { path } => {
            commands::validate::run(&rules_path(path, &config))?;
            Ok(ExitCode::SUCCESS)
        }
        Commands::Rules { path, format } => {
            commands::rules::run(&rules_path(path, &config), format)?;
            Ok(ExitCode::SUCCESS)
        }
        Commands::Demo => {
            commands::demo::run(&config)?;
            Ok(ExitCode::SUCCESS)
        }
        Commands::Config(ConfigCommands::Show { format }) => {
            commands::config::show(&cli.project, &config, format)?;
            Ok(ExitCode::SUCCESS)
        }
    }
}

/// Installs the stderr subscriber. `RUST_LOG` wins over `logging.level`.
fn init_tracing(config: &RoomkeyConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.logging.level.to_ascii_lowercase()));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_ansi(!style::no_color())
        .init();
}

/// An explicit path argument resolves against the working directory, like
/// any other CLI path; the configured one is already absolute.
fn rules_path(path: Option<PathBuf>, config: &RoomkeyConfig) -> PathBuf {
    path.unwrap_or_else(|| config.policy.rules_path.clone())
}

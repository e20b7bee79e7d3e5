//! # cutover CLI entry point
//!
//! Parses command-line arguments, installs logging, loads the session and
//! dispatches to subcommand handlers.

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::EnvFilter;

use cutover_cli::actions::{run_actions, ActionsArgs};
use cutover_cli::config::{ConfigFile, Settings};
use cutover_cli::roster::{run_roster, RosterArgs};
use cutover_cli::run::{run_run, RunArgs};
use cutover_cli::session::Session;
use cutover_cli::workflow::{run_workflow, WorkflowArgs};

/// Drive partner migrations through the cutover workflow.
///
/// Loads a roster of partners and process lines (or the built-in demo
/// roster) and a workflow definition (or the standard one), then inspects
/// them or applies actions.
#[derive(Parser, Debug)]
#[command(name = "cutover", version, about, long_about = None)]
struct Cli {
    /// Enable verbose output. Repeat for more verbosity (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Log line format on stderr.
    #[arg(long, value_enum, default_value_t = LogFormat::Text, global = true)]
    log_format: LogFormat,

    /// Path to a YAML configuration file.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Roster file (YAML, or JSON by `.json` extension).
    #[arg(long, global = true)]
    roster: Option<PathBuf>,

    /// Workflow definition file (YAML, or JSON by `.json` extension).
    #[arg(long, global = true)]
    workflow: Option<PathBuf>,

    /// Display name used for customer notifications.
    #[arg(long, global = true)]
    customer: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum LogFormat {
    Text,
    Json,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Print the workflow definition (transition and visibility tables).
    Workflow(WorkflowArgs),

    /// Print the loaded roster with every process state.
    Roster(RosterArgs),

    /// List actions for given states, or for the checked partners.
    Actions(ActionsArgs),

    /// Apply a script of actions to the roster.
    Run(RunArgs),
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let filter = match cli.verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr);
    match cli.log_format {
        LogFormat::Text => subscriber.init(),
        LogFormat::Json => subscriber.json().init(),
    }

    tracing::debug!("cutover CLI starting");

    match dispatch(cli) {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            tracing::error!("{e:#}");
            ExitCode::from(1)
        }
    }
}

fn dispatch(cli: Cli) -> Result<u8> {
    let config = match &cli.config {
        Some(path) => ConfigFile::load(path)?,
        None => ConfigFile::default(),
    };
    let settings = Settings::merge(config, cli.roster, cli.workflow, cli.customer);
    let session = Session::load(&settings)?;

    match cli.command {
        Commands::Workflow(args) => run_workflow(&args, &session),
        Commands::Roster(args) => run_roster(&args, &session),
        Commands::Actions(args) => run_actions(&args, &session),
        Commands::Run(args) => run_run(&args, &session),
    }
}

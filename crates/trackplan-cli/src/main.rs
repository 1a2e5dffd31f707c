//! Trackplan CLI
//!
//! Command-line interface for reconciling an event inventory against a
//! target tracking plan

use clap::{Parser, Subcommand, ValueEnum};
use trackplan_core::logging_facility::{init, Profile};
use trackplan_core_types::RunId;

mod commands;

#[derive(Debug, Parser)]
#[command(name = "trackplan")]
#[command(about = "Trackplan - tracking-plan reconciliation", long_about = None)]
struct Cli {
    /// Emit structured logs on stderr
    #[arg(long, global = true, value_enum)]
    log_format: Option<LogFormat>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum LogFormat {
    Human,
    Json,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Reconcile an inventory against a target plan and emit the delta document
    Reconcile(commands::reconcile::ReconcileArgs),
    /// Validate one document's group hierarchy and print the rollup
    Groups(commands::groups::GroupsArgs),
}

fn main() {
    let cli = Cli::parse();

    match cli.log_format {
        Some(LogFormat::Human) => init(Profile::Development),
        Some(LogFormat::Json) => init(Profile::Production),
        None => {}
    }

    let run_id = RunId::new();
    let span = tracing::info_span!("run", run_id = %run_id);
    let _guard = span.enter();

    let result = match cli.command {
        Commands::Reconcile(args) => commands::reconcile::execute(args),
        Commands::Groups(args) => commands::groups::execute(args),
    };

    if let Err(e) = result {
        let e = e.with_run_id(run_id);
        eprintln!("Error: {}", e);
        if let Some(offending) = e.candidates() {
            eprintln!("  offending: {}", offending.join(", "));
        }
        std::process::exit(1);
    }
}

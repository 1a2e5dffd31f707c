//! Reconcile command
//!
//! Usage: trackplan reconcile --inventory <FILE> --target <FILE> [--out <FILE>]

use clap::Args;
use std::path::PathBuf;
use trackplan_core::{reconcile, ExError};
use trackplan_store::output::render_delta_document;
use trackplan_store::{load_inventory, load_target_plan, write_delta_document};

use super::OptionArgs;

#[derive(Debug, Args)]
pub struct ReconcileArgs {
    /// Inventory document (.yaml, .yml or .json)
    #[arg(long)]
    pub inventory: PathBuf,

    /// Target plan document (.yaml, .yml or .json)
    #[arg(long)]
    pub target: PathBuf,

    /// Output file path (default: stdout)
    #[arg(short, long)]
    pub out: Option<PathBuf>,

    #[command(flatten)]
    pub options: OptionArgs,
}

/// Execute reconcile command
pub fn execute(args: ReconcileArgs) -> Result<(), ExError> {
    let options = args.options.resolve()?;

    let inventory = load_inventory(&args.inventory)?;
    let target = load_target_plan(&args.target)?;

    let document = reconcile(&inventory, &target, &options)?;

    if let Some(output_path) = args.out {
        write_delta_document(&output_path, &document)?;
        let s = &document.summary;
        println!(
            "✓ Wrote delta to {} (add {}, remove {}, rename {}, change {}, keep {})",
            output_path.display(),
            s.add,
            s.remove,
            s.rename,
            s.change,
            s.keep
        );
    } else {
        print!("{}", render_delta_document(&document)?);
    }

    Ok(())
}

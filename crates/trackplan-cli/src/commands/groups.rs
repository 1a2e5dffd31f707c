//! Groups command
//!
//! Usage: trackplan groups <DOCUMENT> [--single-root]

use clap::Args;
use std::path::PathBuf;
use trackplan_core::{check_hierarchy, ExError, ExErrorKind};
use trackplan_store::{parse_document_file, ParsedDocument};

use super::OptionArgs;

#[derive(Debug, Args)]
pub struct GroupsArgs {
    /// Inventory or target plan document
    pub document: PathBuf,

    #[command(flatten)]
    pub options: OptionArgs,
}

/// Execute groups command
pub fn execute(args: GroupsArgs) -> Result<(), ExError> {
    let options = args.options.resolve()?;

    let result = match parse_document_file(&args.document)? {
        ParsedDocument::Inventory(inventory) => check_hierarchy(&inventory, &options),
        ParsedDocument::TargetPlan(plan) => check_hierarchy(&plan, &options),
    }?;

    let json = serde_json::to_string_pretty(&result).map_err(|e| {
        ExError::new(ExErrorKind::Serialization)
            .with_op("groups")
            .with_message(e.to_string())
    })?;
    println!("{}", json);

    Ok(())
}

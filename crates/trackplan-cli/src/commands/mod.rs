pub mod groups;
pub mod reconcile;

use std::path::{Path, PathBuf};

use clap::Args;
use trackplan_core::{ExError, ExErrorKind, NamingPolicy, ReconcileOptions};
use trackplan_store::config::DEFAULT_CONFIG_FILE;

/// Option overrides shared by every command
///
/// Flags win over `trackplan.toml`, which wins over the engine defaults.
#[derive(Debug, Args)]
pub struct OptionArgs {
    /// Config file (default: ./trackplan.toml if present)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Minimum score for an approximate pairing (strictly greater)
    #[arg(long)]
    pub threshold: Option<f64>,

    /// literal | canonical
    #[arg(long)]
    pub naming_policy: Option<NamingPolicy>,

    /// Reject group type forests with more than one top-level type
    #[arg(long)]
    pub single_root: bool,

    /// Score pairs in parallel (needs the `parallel` feature)
    #[arg(long)]
    pub parallel: bool,
}

impl OptionArgs {
    pub fn resolve(&self) -> Result<ReconcileOptions, ExError> {
        let mut options = match &self.config {
            Some(path) if !path.exists() => {
                return Err(ExError::new(ExErrorKind::InvalidConfig)
                    .with_op("load_options")
                    .with_entity_id(path.display().to_string())
                    .with_message("Config file not found"));
            }
            Some(path) => trackplan_store::load_options(path)?,
            None => trackplan_store::load_options(Path::new(DEFAULT_CONFIG_FILE))?,
        };

        if let Some(threshold) = self.threshold {
            options.rename_threshold = threshold;
        }
        if let Some(policy) = self.naming_policy {
            options.naming_policy = policy;
        }
        if self.single_root {
            options.require_single_root = true;
        }
        if self.parallel {
            if !cfg!(feature = "parallel") {
                return Err(ExError::new(ExErrorKind::InvalidConfig)
                    .with_op("resolve_options")
                    .with_entity_id("--parallel")
                    .with_message("--parallel needs a build with the `parallel` feature"));
            }
            options.parallel_scoring = true;
        }

        options.validate()?;
        Ok(options)
    }
}

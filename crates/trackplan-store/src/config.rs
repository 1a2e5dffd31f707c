//! `trackplan.toml` loading
//!
//! ```toml
//! [reconcile]
//! rename_threshold = 0.6
//! naming_policy = "canonical"
//! require_single_root = true
//! ```
//!
//! Every key is optional; absent keys take the engine defaults.

use std::fs;
use std::io::ErrorKind;
use std::path::Path;

use serde::Deserialize;
use trackplan_core::ReconcileOptions;

use crate::errors::{invalid_config, io_error, Result};

/// Conventional config file name looked up in the working directory
pub const DEFAULT_CONFIG_FILE: &str = "trackplan.toml";

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct ConfigFile {
    #[serde(default)]
    reconcile: ReconcileOptions,
}

/// Load reconcile options from a TOML file
///
/// A missing file yields the defaults. The loaded options are validated.
pub fn load_options(path: &Path) -> Result<ReconcileOptions> {
    let content = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            tracing::debug!(path = %path.display(), "no config file, using defaults");
            return Ok(ReconcileOptions::default());
        }
        Err(e) => return Err(io_error("load_options", path, e)),
    };

    parse_options(&content).map_err(|e| invalid_config(path, &e))
}

fn parse_options(content: &str) -> std::result::Result<ReconcileOptions, String> {
    let file: ConfigFile = toml::from_str(content).map_err(|e| e.to_string())?;
    file.reconcile.validate().map_err(|e| e.to_string())?;
    Ok(file.reconcile)
}

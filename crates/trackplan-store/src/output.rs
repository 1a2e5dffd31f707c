//! Delta document output
//!
//! Uses temp→rename so a reader never sees a partial report

use std::fs;
use std::path::{Path, PathBuf};

use trackplan_core::DeltaDocument;

use crate::errors::{io_error, serialization_error, Result};

/// Serialize a delta document as pretty JSON with a trailing newline
pub fn render_delta_document(document: &DeltaDocument) -> Result<String> {
    let mut json = serde_json::to_string_pretty(document)
        .map_err(|e| serialization_error("render_delta_document", e))?;
    json.push('\n');
    Ok(json)
}

/// Write a delta document to `path` atomically
pub fn write_delta_document(path: &Path, document: &DeltaDocument) -> Result<()> {
    let json = render_delta_document(document)?;
    atomic_write(path, json.as_bytes())?;
    tracing::debug!(path = %path.display(), bytes = json.len(), "wrote delta document");
    Ok(())
}

/// Atomically write bytes to a file
///
/// Creates missing parent directories.
pub fn atomic_write(target_path: &Path, content: &[u8]) -> Result<()> {
    if let Some(parent) = target_path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| io_error("create_output_dir", parent, e))?;
    }

    // temp file in the same directory so the rename stays on one filesystem
    let temp_path = temp_path_for(target_path);

    fs::write(&temp_path, content).map_err(|e| io_error("write_output_temp", &temp_path, e))?;

    if let Err(e) = fs::rename(&temp_path, target_path) {
        fs::remove_file(&temp_path).ok();
        return Err(io_error("rename_output_temp", target_path, e));
    }

    Ok(())
}

fn temp_path_for(target_path: &Path) -> PathBuf {
    let mut name = target_path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_default();
    name.push(".tmp");
    target_path.with_file_name(name)
}

//! Trackplan Store - loading plan documents and writing delta reports
//!
//! Provides:
//! - Plan document format v1 (YAML or JSON) and its parser
//! - `trackplan.toml` configuration loading
//! - Atomic output of the delta document
//!
//! The engine in `trackplan-core` never touches the filesystem; everything
//! that does lives here.

pub mod config;
pub mod document;
pub mod errors;
pub mod output;

// Re-export key types
pub use config::load_options;
pub use document::{
    load_inventory, load_target_plan, parse_document_file, parse_document_str, DocumentFormat,
    ParsedDocument,
};
pub use errors::Result;
pub use output::write_delta_document;

//! Plan document loading
//!
//! Provides:
//! - Document format v1 schema
//! - YAML/JSON parser with envelope validation
//! - Conversion into the core `Inventory` / `TargetPlan` model

pub mod format_v1;
pub mod parser;

pub use format_v1::{DocumentKind, DocumentV1};
pub use parser::{
    load_inventory, load_target_plan, parse_document_file, parse_document_str, DocumentFormat,
    ParsedDocument,
};

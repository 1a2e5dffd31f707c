//! Plan document parser with validation
//!
//! Parses YAML or JSON, checks the envelope (schema version, kind, status
//! placement) and converts to the core document model. Name uniqueness and
//! hierarchy checks belong to the engine and are not repeated here.

use std::fs;
use std::path::Path;

use trackplan_core::model::{
    Event, EventSource, GroupInstance, GroupType, Inventory, ObservedEvent, TargetPlan,
};

use super::format_v1::{DocumentKind, DocumentV1, EventV1, GroupTypeV1, GroupV1};
use crate::errors::{invalid_document, invalid_document_at, io_error, Result};

const SUPPORTED_SCHEMA_VERSION: u32 = 1;

/// Serialization format of a document file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentFormat {
    Yaml,
    Json,
}

impl DocumentFormat {
    /// Pick the format from a file extension (`.yaml`, `.yml`, `.json`)
    pub fn from_path(path: &Path) -> Result<Self> {
        match path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase)
            .as_deref()
        {
            Some("yaml" | "yml") => Ok(DocumentFormat::Yaml),
            Some("json") => Ok(DocumentFormat::Json),
            _ => Err(invalid_document_at(
                path,
                "Unsupported document extension, expected .yaml, .yml or .json",
            )),
        }
    }
}

/// A parsed document of either kind
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParsedDocument {
    Inventory(Inventory),
    TargetPlan(TargetPlan),
}

impl ParsedDocument {
    pub fn kind(&self) -> DocumentKind {
        match self {
            ParsedDocument::Inventory(_) => DocumentKind::Inventory,
            ParsedDocument::TargetPlan(_) => DocumentKind::TargetPlan,
        }
    }
}

/// Parse a document file, choosing the format from its extension
pub fn parse_document_file(path: &Path) -> Result<ParsedDocument> {
    let format = DocumentFormat::from_path(path)?;
    let content = fs::read_to_string(path).map_err(|e| io_error("read_document", path, e))?;

    parse_document_str(&content, format).map_err(|e| e.with_entity_id(path.display().to_string()))
}

/// Parse a document from a string
pub fn parse_document_str(content: &str, format: DocumentFormat) -> Result<ParsedDocument> {
    let raw: DocumentV1 = match format {
        DocumentFormat::Yaml => serde_yaml::from_str(content)
            .map_err(|e| invalid_document(&format!("YAML parse error: {}", e)))?,
        DocumentFormat::Json => serde_json::from_str(content)
            .map_err(|e| invalid_document(&format!("JSON parse error: {}", e)))?,
    };

    if raw.schema_version != SUPPORTED_SCHEMA_VERSION {
        return Err(invalid_document(&format!(
            "Unsupported schema_version: {}. Expected {}",
            raw.schema_version, SUPPORTED_SCHEMA_VERSION
        )));
    }

    let document = convert(raw)?;
    tracing::debug!(kind = document.kind().as_str(), "parsed plan document");
    Ok(document)
}

/// Load a document that must be an inventory
pub fn load_inventory(path: &Path) -> Result<Inventory> {
    match parse_document_file(path)? {
        ParsedDocument::Inventory(inventory) => Ok(inventory),
        ParsedDocument::TargetPlan(_) => Err(kind_mismatch(path, DocumentKind::Inventory)),
    }
}

/// Load a document that must be a target plan
pub fn load_target_plan(path: &Path) -> Result<TargetPlan> {
    match parse_document_file(path)? {
        ParsedDocument::TargetPlan(plan) => Ok(plan),
        ParsedDocument::Inventory(_) => Err(kind_mismatch(path, DocumentKind::TargetPlan)),
    }
}

fn kind_mismatch(path: &Path, expected: DocumentKind) -> trackplan_core::ExError {
    let found = match expected {
        DocumentKind::Inventory => DocumentKind::TargetPlan,
        DocumentKind::TargetPlan => DocumentKind::Inventory,
    };
    invalid_document_at(
        path,
        &format!(
            "Expected a document of kind '{}', found '{}'",
            expected.as_str(),
            found.as_str()
        ),
    )
}

fn convert(raw: DocumentV1) -> Result<ParsedDocument> {
    let group_types = raw.group_types.into_iter().map(group_type).collect();
    let groups = raw.groups.into_iter().map(group_instance).collect();

    let document = match raw.kind {
        DocumentKind::Inventory => {
            let events = raw.events.into_iter().map(observed_event).collect();
            ParsedDocument::Inventory(
                Inventory::new(events, group_types)
                    .with_groups(groups)
                    .with_attributions(raw.attributions),
            )
        }
        DocumentKind::TargetPlan => {
            let events = raw
                .events
                .into_iter()
                .map(target_event)
                .collect::<Result<Vec<_>>>()?;
            ParsedDocument::TargetPlan(
                TargetPlan::new(events, group_types)
                    .with_groups(groups)
                    .with_attributions(raw.attributions),
            )
        }
    };
    Ok(document)
}

fn group_type(raw: GroupTypeV1) -> GroupType {
    let is_top_level = raw.is_top_level.unwrap_or(raw.parent_type.is_none());
    GroupType {
        type_name: raw.type_name,
        parent_type: raw.parent_type,
        is_top_level,
    }
}

fn group_instance(raw: GroupV1) -> GroupInstance {
    GroupInstance {
        id: raw.id,
        group_type: raw.group_type,
        parent: raw.parent,
    }
}

fn event(raw: EventV1, source: EventSource) -> Event {
    Event {
        name: raw.name,
        properties: raw.properties,
        category: raw.category,
        group_level: raw.group_level,
        source,
    }
}

fn observed_event(raw: EventV1) -> ObservedEvent {
    let status = raw.status.unwrap_or_default();
    ObservedEvent {
        event: event(raw, EventSource::Inventory),
        status,
    }
}

fn target_event(raw: EventV1) -> Result<Event> {
    if raw.status.is_some() {
        return Err(invalid_document(&format!(
            "Target plan event '{}' must not declare a status",
            raw.name
        )));
    }
    Ok(event(raw, EventSource::Target))
}

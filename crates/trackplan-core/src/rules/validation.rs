use std::collections::BTreeSet;

use crate::errors::{PlanError, Result};
use crate::model::{Inventory, PlanDocument, TargetPlan};
use crate::normalize::normalize;

/// Validate both input documents.
///
/// Runs before any matching, so a failure never leaves a partial
/// classification behind.
///
/// # Errors
///
/// The first input violation found, inventory first.
pub fn validate_documents(inventory: &Inventory, target: &TargetPlan) -> Result<()> {
    validate_document(inventory)?;
    validate_document(target)?;

    tracing::debug!(
        inventory_len = inventory.observed_events().len(),
        target_len = target.target_events().len(),
        "validated input documents"
    );
    Ok(())
}

/// Validate one document in isolation
///
/// Checks, in order:
///
/// 1. event names are unique
/// 2. property names are unique within each event after normalization,
///    since properties are matched by their normalized key
/// 3. group type names are unique
/// 4. group instance ids are unique
/// 5. attributions only name events the document defines
///
/// Hierarchy shape (parents, cycles) is left to `hierarchy::validate_and_roll_up`.
///
/// # Errors
///
/// The first violation found.
pub fn validate_document<D: PlanDocument + ?Sized>(document: &D) -> Result<()> {
    let label = document.label();
    let events = document.events();

    let mut names = BTreeSet::new();
    for event in &events {
        if !names.insert(event.name.as_str()) {
            return Err(PlanError::DuplicateEventName {
                document: label.to_string(),
                name: event.name.clone(),
            });
        }
    }

    for event in &events {
        let mut properties = BTreeSet::new();
        for property in &event.properties {
            if !properties.insert(normalize(&property.name)) {
                return Err(PlanError::DuplicatePropertyName {
                    document: label.to_string(),
                    event: event.name.clone(),
                    property: property.name.clone(),
                });
            }
        }
    }

    let mut type_names = BTreeSet::new();
    for group_type in document.group_types() {
        if !type_names.insert(group_type.type_name.as_str()) {
            return Err(PlanError::DuplicateGroupType {
                document: label.to_string(),
                type_name: group_type.type_name.clone(),
            });
        }
    }

    let mut instance_ids = BTreeSet::new();
    for instance in document.groups() {
        if !instance_ids.insert(instance.id.as_str()) {
            return Err(PlanError::DuplicateGroupInstance {
                document: label.to_string(),
                instance: instance.id.clone(),
            });
        }
    }

    for (instance, attributed) in document.attributions() {
        if let Some(unknown) = attributed.iter().find(|e| !names.contains(e.as_str())) {
            return Err(PlanError::UnknownAttributedEvent {
                document: label.to_string(),
                instance: instance.clone(),
                event: unknown.clone(),
            });
        }
    }

    Ok(())
}

//! Reconciliation entry points.
//!
//! `reconcile` runs the whole pipeline and owns the lifecycle log lines for
//! a run:
//!
//! 1. validate options and both documents (fail fast, nothing classified)
//! 2. collect non-fatal diagnostics
//! 3. match inventory events against target events
//! 4. classify every candidate
//! 5. validate and roll up each side's hierarchy (failures become an
//!    `invalid` section, not an error)
//! 6. emit the delta document, checking completeness

use std::time::Instant;

use crate::classify::classify;
use crate::errors::Result;
use crate::hierarchy::{validate_and_roll_up, HierarchyResult};
use crate::matching::match_events;
use crate::model::{Inventory, PlanDocument, TargetPlan};
use crate::options::ReconcileOptions;
use crate::report::{emit, DeltaDocument, EmitContext, HierarchyReport, HierarchySection};
use crate::rules::{collect_diagnostics, validate_document, validate_documents};

/// Reconcile an inventory against a target plan.
///
/// # Errors
///
/// - input errors (invalid options, duplicate names, attributions to unknown
///   events) before any matching
/// - `IncompleteDelta` if the classified entries fail the completeness check
///
/// Hierarchy errors do not fail the run; they are reported in the
/// document's hierarchy section.
pub fn reconcile(
    inventory: &Inventory,
    target: &TargetPlan,
    options: &ReconcileOptions,
) -> Result<DeltaDocument> {
    let start = Instant::now();
    crate::log_op_start!(
        "reconcile",
        inventory_len = inventory.observed_events().len(),
        target_len = target.target_events().len()
    );

    match run(inventory, target, options) {
        Ok(document) => {
            let duration_ms = start.elapsed().as_millis() as u64;
            crate::log_op_end!(
                "reconcile",
                duration_ms = duration_ms,
                entry_len = document.entries.len(),
                add = document.summary.add,
                remove = document.summary.remove,
                rename = document.summary.rename,
                change = document.summary.change,
                keep = document.summary.keep
            );
            Ok(document)
        }
        Err(e) => {
            let duration_ms = start.elapsed().as_millis() as u64;
            crate::log_op_error!("reconcile", e.clone(), duration_ms = duration_ms);
            Err(e)
        }
    }
}

fn run(
    inventory: &Inventory,
    target: &TargetPlan,
    options: &ReconcileOptions,
) -> Result<DeltaDocument> {
    options.validate()?;
    validate_documents(inventory, target)?;

    let diagnostics = collect_diagnostics(&[inventory as &dyn PlanDocument, target]);

    let candidates = match_events(inventory.observed_events(), target.target_events(), options);
    let entries = classify(&candidates, options)?;

    let hierarchy = HierarchyReport {
        inventory: hierarchy_section(inventory, options),
        target: hierarchy_section(target, options),
    };

    emit(
        entries,
        hierarchy,
        EmitContext {
            inventory,
            target,
            options,
            diagnostics: &diagnostics,
        },
    )
}

fn hierarchy_section(document: &dyn PlanDocument, options: &ReconcileOptions) -> HierarchySection {
    let outcome = validate_and_roll_up(
        document.group_types(),
        document.groups(),
        document.attributions(),
        options,
    );
    if let Err(e) = &outcome {
        tracing::debug!(
            document = document.label(),
            err = %e,
            "hierarchy invalid"
        );
    }
    outcome.into()
}

/// Validate a single document and its hierarchy.
///
/// # Errors
///
/// The first input or hierarchy violation found.
pub fn check_hierarchy(
    document: &dyn PlanDocument,
    options: &ReconcileOptions,
) -> Result<HierarchyResult> {
    let start = Instant::now();
    crate::log_op_start!("check_hierarchy", document = document.label());

    let outcome = options
        .validate()
        .and_then(|()| validate_document(document))
        .and_then(|()| {
            validate_and_roll_up(
                document.group_types(),
                document.groups(),
                document.attributions(),
                options,
            )
        });

    let duration_ms = start.elapsed().as_millis() as u64;
    match &outcome {
        Ok(result) => {
            crate::log_op_end!(
                "check_hierarchy",
                duration_ms = duration_ms,
                instance_len = result.instances.len()
            );
        }
        Err(e) => {
            crate::log_op_error!("check_hierarchy", e.clone(), duration_ms = duration_ms);
        }
    }
    outcome
}

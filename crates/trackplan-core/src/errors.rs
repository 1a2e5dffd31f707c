use thiserror::Error;
use trackplan_core_types::RunId;

/// Result type alias using PlanError
pub type Result<T> = std::result::Result<T, PlanError>;

// ========== Error Facility ==========

/// Canonical error kind taxonomy
///
/// Each kind maps to a stable error code that callers and the presentation
/// layer can match on without parsing messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExErrorKind {
    // Input
    InvalidDocument,
    InvalidConfig,
    DuplicateName,
    UnknownReference,

    // Hierarchy
    DanglingParent,
    CycleDetected,
    MultipleRoots,
    UnknownGroupType,
    ParentTypeMismatch,
    InconsistentTopLevel,

    // Engine invariants
    IncompleteDelta,
    DeterminismViolation,

    // Integration/IO
    Io,
    Serialization,

    // Internal
    Internal,
}

impl ExErrorKind {
    /// Get the stable error code for this kind
    pub fn code(&self) -> &'static str {
        match self {
            ExErrorKind::InvalidDocument => "ERR_INVALID_DOCUMENT",
            ExErrorKind::InvalidConfig => "ERR_INVALID_CONFIG",
            ExErrorKind::DuplicateName => "ERR_DUPLICATE_NAME",
            ExErrorKind::UnknownReference => "ERR_UNKNOWN_REFERENCE",
            ExErrorKind::DanglingParent => "ERR_DANGLING_PARENT",
            ExErrorKind::CycleDetected => "ERR_CYCLE_DETECTED",
            ExErrorKind::MultipleRoots => "ERR_MULTIPLE_ROOTS",
            ExErrorKind::UnknownGroupType => "ERR_UNKNOWN_GROUP_TYPE",
            ExErrorKind::ParentTypeMismatch => "ERR_PARENT_TYPE_MISMATCH",
            ExErrorKind::InconsistentTopLevel => "ERR_INCONSISTENT_TOP_LEVEL",
            ExErrorKind::IncompleteDelta => "ERR_INCOMPLETE_DELTA",
            ExErrorKind::DeterminismViolation => "ERR_DETERMINISM_VIOLATION",
            ExErrorKind::Io => "ERR_IO",
            ExErrorKind::Serialization => "ERR_SERIALIZATION",
            ExErrorKind::Internal => "ERR_INTERNAL",
        }
    }
}

/// Canonical structured error type
///
/// Carries a stable kind plus the context a caller needs to report the
/// failing phase and the offending name(s).
#[derive(Debug, Clone)]
pub struct ExError {
    kind: ExErrorKind,
    op: Option<String>,
    entity_id: Option<String>,
    run_id: Option<RunId>,
    message: String,
    source: Option<Box<ExError>>,
    candidates: Option<Vec<String>>,
}

impl ExError {
    /// Create a new error with the specified kind
    pub fn new(kind: ExErrorKind) -> Self {
        Self {
            kind,
            op: None,
            entity_id: None,
            run_id: None,
            message: String::new(),
            source: None,
            candidates: None,
        }
    }

    /// Add operation context
    pub fn with_op(mut self, op: impl Into<String>) -> Self {
        self.op = Some(op.into());
        self
    }

    /// Add entity context (event name, group type, instance id, path)
    pub fn with_entity_id(mut self, id: impl Into<String>) -> Self {
        self.entity_id = Some(id.into());
        self
    }

    /// Add run correlation context
    pub fn with_run_id(mut self, run_id: RunId) -> Self {
        self.run_id = Some(run_id);
        self
    }

    /// Add custom message
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    /// Add source error
    pub fn with_source(mut self, source: ExError) -> Self {
        self.source = Some(Box::new(source));
        self
    }

    /// Add every offending name (cycle members, competing roots, ...)
    pub fn with_candidates(mut self, ids: Vec<String>) -> Self {
        self.candidates = Some(ids);
        self
    }

    /// Get the error kind
    pub fn kind(&self) -> ExErrorKind {
        self.kind
    }

    /// Get the stable error code
    pub fn code(&self) -> &'static str {
        self.kind.code()
    }

    /// Get the operation context, if any
    pub fn op(&self) -> Option<&str> {
        self.op.as_deref()
    }

    /// Get the entity context, if any
    pub fn entity_id(&self) -> Option<&str> {
        self.entity_id.as_deref()
    }

    /// Get the run correlation id, if any
    pub fn run_id(&self) -> Option<&RunId> {
        self.run_id.as_ref()
    }

    /// Get the error message
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Get the source error, if any
    pub fn source_error(&self) -> Option<&ExError> {
        self.source.as_deref()
    }

    /// Get the offending names, if any
    pub fn candidates(&self) -> Option<&[String]> {
        self.candidates.as_deref()
    }
}

impl std::fmt::Display for ExError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}]", self.code())?;
        if let Some(op) = &self.op {
            write!(f, " in operation '{}'", op)?;
        }
        if !self.message.is_empty() {
            write!(f, ": {}", self.message)?;
        }
        if let Some(entity_id) = &self.entity_id {
            write!(f, " (entity: {})", entity_id)?;
        }
        if let Some(run_id) = &self.run_id {
            write!(f, " (run_id: {})", run_id)?;
        }
        Ok(())
    }
}

impl std::error::Error for ExError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source
            .as_deref()
            .map(|e| e as &(dyn std::error::Error + 'static))
    }
}

// ========== End Error Facility ==========

/// Phase of a reconciliation run that produced an error
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorPhase {
    Input,
    Hierarchy,
    Emit,
    Internal,
}

impl ErrorPhase {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorPhase::Input => "input",
            ErrorPhase::Hierarchy => "hierarchy",
            ErrorPhase::Emit => "emit",
            ErrorPhase::Internal => "internal",
        }
    }
}

/// Domain errors raised by the reconciliation engine
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PlanError {
    // ===== Input Errors =====
    /// Two events in one document share a name
    #[error("Duplicate event name '{name}' in {document}")]
    DuplicateEventName { document: String, name: String },

    /// Two properties on one event share a name
    #[error("Duplicate property '{property}' on event '{event}' in {document}")]
    DuplicatePropertyName {
        document: String,
        event: String,
        property: String,
    },

    /// Two group types in one document share a name
    #[error("Duplicate group type '{type_name}' in {document}")]
    DuplicateGroupType { document: String, type_name: String },

    /// Two group instances in one document share an id
    #[error("Duplicate group instance '{instance}' in {document}")]
    DuplicateGroupInstance { document: String, instance: String },

    /// An attribution names an event the document does not define
    #[error("Group instance '{instance}' in {document} attributes unknown event '{event}'")]
    UnknownAttributedEvent {
        document: String,
        instance: String,
        event: String,
    },

    /// Reconciliation options are out of range
    #[error("Invalid reconcile options: {reason}")]
    InvalidOptions { reason: String },

    // ===== Hierarchy Errors =====
    /// A parent reference names a node absent from the same document
    #[error("{child} references missing parent {parent}")]
    DanglingParent { child: String, parent: String },

    /// Following parent edges from a node does not terminate
    #[error("Cycle detected through {node}: {}", .path.join(" -> "))]
    CycleDetected { node: String, path: Vec<String> },

    /// More than one top-level group type where a single root is required
    #[error("Multiple top-level group types where one is required: {}", .roots.join(", "))]
    MultipleRoots { roots: Vec<String> },

    /// A group instance is declared with an undeclared type
    #[error("Group instance '{instance}' has undeclared type '{type_name}'")]
    UnknownGroupType { instance: String, type_name: String },

    /// A group instance's parent is not of its type's parent type
    #[error("Group instance '{instance}' has parent '{parent}' of type '{actual}', expected '{expected}'")]
    ParentTypeMismatch {
        instance: String,
        parent: String,
        expected: String,
        actual: String,
    },

    /// Events are attributed to an undeclared group instance
    #[error("Events attributed to undeclared group instance '{instance}'")]
    UnknownAttributionTarget { instance: String },

    /// `is_top_level` disagrees with `parent_type`
    #[error("Group type '{type_name}' declares is_top_level={declared}, inconsistent with its parent_type")]
    InconsistentTopLevel { type_name: String, declared: bool },

    // ===== Engine Invariants =====
    /// The delta does not account for every target event exactly once
    #[error("Incomplete delta: {reason}")]
    IncompleteDelta { reason: String },

    // ===== Generic Errors =====
    /// Serialization error (JSON encoding/decoding)
    #[error("Serialization error: {message}")]
    Serialization { message: String },

    /// The emitted document does not survive a JSON round-trip unchanged
    #[error("Delta document is not deterministic: {reason}")]
    NonDeterministicOutput { reason: String },

    /// Generic internal error
    #[error("Internal error: {message}")]
    Internal { message: String },
}

impl PlanError {
    /// The reconciliation phase this error belongs to
    pub fn phase(&self) -> ErrorPhase {
        match self {
            PlanError::DuplicateEventName { .. }
            | PlanError::DuplicatePropertyName { .. }
            | PlanError::DuplicateGroupType { .. }
            | PlanError::DuplicateGroupInstance { .. }
            | PlanError::UnknownAttributedEvent { .. }
            | PlanError::InvalidOptions { .. } => ErrorPhase::Input,
            PlanError::DanglingParent { .. }
            | PlanError::CycleDetected { .. }
            | PlanError::MultipleRoots { .. }
            | PlanError::UnknownGroupType { .. }
            | PlanError::ParentTypeMismatch { .. }
            | PlanError::UnknownAttributionTarget { .. }
            | PlanError::InconsistentTopLevel { .. } => ErrorPhase::Hierarchy,
            PlanError::IncompleteDelta { .. }
            | PlanError::NonDeterministicOutput { .. }
            | PlanError::Serialization { .. } => ErrorPhase::Emit,
            PlanError::Internal { .. } => ErrorPhase::Internal,
        }
    }

    /// Names the presentation layer should point at
    pub fn offending(&self) -> Vec<String> {
        match self {
            PlanError::DuplicateEventName { name, .. } => vec![name.clone()],
            PlanError::DuplicatePropertyName {
                event, property, ..
            } => vec![event.clone(), property.clone()],
            PlanError::DuplicateGroupType { type_name, .. } => vec![type_name.clone()],
            PlanError::DuplicateGroupInstance { instance, .. } => vec![instance.clone()],
            PlanError::UnknownAttributedEvent {
                instance, event, ..
            } => vec![instance.clone(), event.clone()],
            PlanError::DanglingParent { child, parent } => vec![child.clone(), parent.clone()],
            PlanError::CycleDetected { path, .. } => path.clone(),
            PlanError::MultipleRoots { roots } => roots.clone(),
            PlanError::UnknownGroupType {
                instance,
                type_name,
            } => vec![instance.clone(), type_name.clone()],
            PlanError::ParentTypeMismatch {
                instance, parent, ..
            } => vec![instance.clone(), parent.clone()],
            PlanError::UnknownAttributionTarget { instance } => vec![instance.clone()],
            PlanError::InconsistentTopLevel { type_name, .. } => vec![type_name.clone()],
            PlanError::InvalidOptions { .. }
            | PlanError::IncompleteDelta { .. }
            | PlanError::NonDeterministicOutput { .. }
            | PlanError::Serialization { .. }
            | PlanError::Internal { .. } => Vec::new(),
        }
    }
}

/// Conversion from serde_json::Error to PlanError
impl From<serde_json::Error> for PlanError {
    fn from(err: serde_json::Error) -> Self {
        PlanError::Serialization {
            message: err.to_string(),
        }
    }
}

/// Conversion from PlanError to ExError
impl From<PlanError> for ExError {
    fn from(err: PlanError) -> Self {
        let message = err.to_string();
        let offending = err.offending();
        let kind = match &err {
            PlanError::DuplicateEventName { .. }
            | PlanError::DuplicatePropertyName { .. }
            | PlanError::DuplicateGroupType { .. }
            | PlanError::DuplicateGroupInstance { .. } => ExErrorKind::DuplicateName,
            PlanError::UnknownAttributedEvent { .. }
            | PlanError::UnknownAttributionTarget { .. } => ExErrorKind::UnknownReference,
            PlanError::InvalidOptions { .. } => ExErrorKind::InvalidConfig,
            PlanError::DanglingParent { .. } => ExErrorKind::DanglingParent,
            PlanError::CycleDetected { .. } => ExErrorKind::CycleDetected,
            PlanError::MultipleRoots { .. } => ExErrorKind::MultipleRoots,
            PlanError::UnknownGroupType { .. } => ExErrorKind::UnknownGroupType,
            PlanError::ParentTypeMismatch { .. } => ExErrorKind::ParentTypeMismatch,
            PlanError::InconsistentTopLevel { .. } => ExErrorKind::InconsistentTopLevel,
            PlanError::IncompleteDelta { .. } => ExErrorKind::IncompleteDelta,
            PlanError::NonDeterministicOutput { .. } => ExErrorKind::DeterminismViolation,
            PlanError::Serialization { .. } => ExErrorKind::Serialization,
            PlanError::Internal { .. } => ExErrorKind::Internal,
        };

        let mut ex = ExError::new(kind)
            .with_op(err.phase().as_str())
            .with_message(message);
        if let Some(first) = offending.first() {
            ex = ex.with_entity_id(first.clone());
        }
        if offending.len() > 1 {
            ex = ex.with_candidates(offending);
        }
        ex
    }
}

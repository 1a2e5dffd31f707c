//! Correlation identifiers for reconciliation runs
//!
//! A `RunId` tags every log line and error emitted while one reconciliation
//! run is in flight. It never enters the delta document itself, which must
//! stay byte-identical across runs over the same inputs.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a single reconciliation run
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RunId(String);

impl RunId {
    /// Generate a new random RunId using UUIDv7
    pub fn new() -> Self {
        Self(Uuid::now_v7().to_string())
    }

    /// Get the string representation
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Create from an existing string (for deserialization)
    pub fn from_string(s: String) -> Self {
        Self(s)
    }
}

impl Default for RunId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for RunId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_run_id_generation() {
        let id1 = RunId::new();
        let id2 = RunId::new();

        assert_ne!(id1, id2);
        assert!(!id1.as_str().is_empty());
    }

    #[test]
    fn test_run_id_display() {
        let id = RunId::new();
        assert_eq!(format!("{}", id), id.as_str());
    }

    #[test]
    fn test_serialization() {
        let id = RunId::from_string("run-1".to_string());
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "\"run-1\"");
        let deserialized: RunId = serde_json::from_str(&json).unwrap();
        assert_eq!(id, deserialized);
    }
}

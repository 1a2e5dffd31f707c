//! Tunables for a reconciliation run.

use serde::{Deserialize, Serialize};

use crate::errors::{PlanError, Result};

pub const DEFAULT_RENAME_THRESHOLD: f64 = 0.55;
pub const DEFAULT_NAME_WEIGHT: f64 = 0.7;
pub const DEFAULT_PROPERTY_WEIGHT: f64 = 0.3;

const WEIGHT_EPSILON: f64 = 1e-9;

/// How a pairing whose names differ only by convention is classified
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NamingPolicy {
    /// Raw names must be identical for Keep/Change; `video_created` ->
    /// `video.created` is a Rename
    #[default]
    Literal,
    /// Normalized names decide; `video_created` -> `video.created` is a Keep
    /// (or Change)
    Canonical,
}

impl NamingPolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            NamingPolicy::Literal => "literal",
            NamingPolicy::Canonical => "canonical",
        }
    }
}

impl std::str::FromStr for NamingPolicy {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "literal" => Ok(NamingPolicy::Literal),
            "canonical" => Ok(NamingPolicy::Canonical),
            other => Err(format!(
                "unknown naming policy '{other}' (expected 'literal' or 'canonical')"
            )),
        }
    }
}

/// Options controlling matching, classification and hierarchy checks
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReconcileOptions {
    /// An approximate pairing must score strictly above this to be committed
    pub rename_threshold: f64,
    pub name_weight: f64,
    pub property_weight: f64,
    pub naming_policy: NamingPolicy,
    /// Reject group type forests with more than one top-level type
    pub require_single_root: bool,
    /// Score pairs on the rayon pool (only with the `parallel` feature)
    pub parallel_scoring: bool,
}

impl Default for ReconcileOptions {
    fn default() -> Self {
        Self {
            rename_threshold: DEFAULT_RENAME_THRESHOLD,
            name_weight: DEFAULT_NAME_WEIGHT,
            property_weight: DEFAULT_PROPERTY_WEIGHT,
            naming_policy: NamingPolicy::default(),
            require_single_root: false,
            parallel_scoring: false,
        }
    }
}

impl ReconcileOptions {
    /// Check ranges and that the two weights sum to one
    ///
    /// # Errors
    ///
    /// `InvalidOptions` naming the first offending field.
    pub fn validate(&self) -> Result<()> {
        for (field, value) in [
            ("rename_threshold", self.rename_threshold),
            ("name_weight", self.name_weight),
            ("property_weight", self.property_weight),
        ] {
            if !value.is_finite() || !(0.0..=1.0).contains(&value) {
                return Err(PlanError::InvalidOptions {
                    reason: format!("{field} must be within [0, 1], got {value}"),
                });
            }
        }

        let total = self.name_weight + self.property_weight;
        if (total - 1.0).abs() > WEIGHT_EPSILON {
            return Err(PlanError::InvalidOptions {
                reason: format!("name_weight + property_weight must equal 1.0, got {total}"),
            });
        }

        Ok(())
    }

    pub fn with_threshold(mut self, threshold: f64) -> Self {
        self.rename_threshold = threshold;
        self
    }

    pub fn with_naming_policy(mut self, policy: NamingPolicy) -> Self {
        self.naming_policy = policy;
        self
    }

    pub fn with_single_root(mut self, required: bool) -> Self {
        self.require_single_root = required;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let opts = ReconcileOptions::default();
        assert!(opts.validate().is_ok());
        assert_eq!(opts.rename_threshold, 0.55);
        assert_eq!(opts.naming_policy, NamingPolicy::Literal);
    }

    #[test]
    fn test_threshold_out_of_range_rejected() {
        let err = ReconcileOptions::default()
            .with_threshold(1.5)
            .validate()
            .unwrap_err();
        assert!(matches!(err, PlanError::InvalidOptions { .. }));
        assert!(err.to_string().contains("rename_threshold"));
    }

    #[test]
    fn test_weights_must_sum_to_one() {
        let opts = ReconcileOptions {
            name_weight: 0.5,
            property_weight: 0.3,
            ..ReconcileOptions::default()
        };
        assert!(opts.validate().is_err());
    }

    #[test]
    fn test_partial_deserialize_keeps_defaults() {
        let opts: ReconcileOptions =
            serde_json::from_str(r#"{"naming_policy":"canonical"}"#).unwrap();
        assert_eq!(opts.naming_policy, NamingPolicy::Canonical);
        assert_eq!(opts.rename_threshold, DEFAULT_RENAME_THRESHOLD);
    }

    #[test]
    fn test_policy_from_str() {
        assert_eq!("literal".parse::<NamingPolicy>(), Ok(NamingPolicy::Literal));
        assert!("fuzzy".parse::<NamingPolicy>().is_err());
    }
}

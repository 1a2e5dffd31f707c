//! Content digests for input documents.
//!
//! A document is serialized to a `serde_json::Value` (whose maps are ordered),
//! every array is sorted by the compact form of its elements, and the compact
//! re-serialization is hashed with SHA256. Neither key order nor the order of
//! events, properties, group types or instances affects the digest.

use serde::Serialize;
use serde_json::Value;
use sha2::{Digest, Sha256};

use crate::errors::Result;

/// Hex-encoded SHA256 of the canonical JSON form of `document`.
///
/// # Errors
///
/// `PlanError::Serialization` if the document cannot be encoded.
///
/// ```
/// use trackplan_core::digest::document_digest;
/// use trackplan_core::model::{Inventory, ObservedEvent};
///
/// let inv = Inventory::new(vec![ObservedEvent::live("signup_completed")], Vec::new());
/// let digest = document_digest(&inv).unwrap();
/// assert_eq!(digest.len(), 64);
/// ```
pub fn document_digest<T: Serialize>(document: &T) -> Result<String> {
    let mut value = serde_json::to_value(document)?;
    sort_arrays(&mut value);
    let canonical = serde_json::to_string(&value)?;
    Ok(hash_string(&canonical))
}

/// Every collection in a plan document is a set, so element order is noise.
fn sort_arrays(value: &mut Value) {
    match value {
        Value::Array(items) => {
            items.iter_mut().for_each(sort_arrays);
            items.sort_by_cached_key(Value::to_string);
        }
        Value::Object(map) => map.values_mut().for_each(sort_arrays),
        _ => {}
    }
}

fn hash_string(input: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(input.as_bytes());
    hex::encode(hasher.finalize())
}

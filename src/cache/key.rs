//! Cache Key Derivation
//!
//! Builds deterministic cache keys from an operation name and its parameters.

use serde::Serialize;
use serde_json::{Map, Value};
use tracing::debug;

/// Derives the cache key for a read operation.
///
/// Keys look like `operation:{"id":7}`. Parameters are serialized through
/// `serde_json::Value`, whose object map keeps keys sorted, so field order in
/// the parameter bag never changes the key. Missing parameters, or parameters
/// that cannot be represented as JSON, count as an empty object.
pub fn derive_key<P: Serialize + ?Sized>(operation: &str, params: Option<&P>) -> String {
    let params = params
        .and_then(|p| match serde_json::to_value(p) {
            Ok(value) => Some(value),
            Err(err) => {
                debug!(operation, error = %err, "cache key params not serializable");
                None
            }
        })
        .unwrap_or_else(|| Value::Object(Map::new()));

    format!("{operation}:{params}")
}

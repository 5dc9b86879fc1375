//! Typed resource clients
//!
//! Thin wrappers over [`crate::client::HttpClient`] for each resource the
//! API exposes. Each client owns the shape spec for its resource type and
//! applies it immediately after decode.

pub mod account;
pub mod chutes;
pub mod images;

use crate::error::ChutesError;
use crate::validate::{validate_shape, ShapeSpec};
use serde::de::DeserializeOwned;
use serde_json::Value;

/// Normalize a collection payload into its items.
///
/// Accepts either a bare JSON array or an object wrapping the array under
/// `items`, which some endpoints use.
pub(crate) fn collection_items(value: Value) -> Result<Vec<Value>, ChutesError> {
    match value {
        Value::Array(items) => Ok(items),
        Value::Object(mut map) => match map.remove("items") {
            Some(Value::Array(items)) => Ok(items),
            _ => Err(ChutesError::shape(
                "expected a collection payload with an \"items\" array",
            )),
        },
        other => Err(ChutesError::shape(format!(
            "expected a collection payload, got: {other}"
        ))),
    }
}

/// Validate one entity payload against `spec` and deserialize it.
pub(crate) fn decode_entity<T: DeserializeOwned>(
    value: Value,
    spec: &ShapeSpec,
) -> Result<T, ChutesError> {
    let merged = validate_shape(value, spec)?;
    Ok(serde_json::from_value(merged)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_collection_items_accepts_both_shapes() {
        let items = collection_items(json!([{"id": "a"}, {"id": "b"}])).unwrap();
        assert_eq!(items.len(), 2);

        let items = collection_items(json!({"items": [{"id": "a"}], "total": 1})).unwrap();
        assert_eq!(items.len(), 1);

        assert!(collection_items(json!("nope")).is_err());
        assert!(collection_items(json!({"data": []})).is_err());
    }
}

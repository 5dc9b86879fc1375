//! Response shape validation
//!
//! Applied to a decoded JSON payload immediately after a successful
//! request, before deserializing into a typed entity. One [`ShapeSpec`] is
//! constructed per resource type and reused for every payload of that type.

use crate::error::ChutesError;
use serde_json::{Map, Value};

/// Required fields and default values for one resource type.
#[derive(Debug, Clone, Default)]
pub struct ShapeSpec {
    required: Vec<&'static str>,
    defaults: Map<String, Value>,
}

impl ShapeSpec {
    /// Create an empty spec.
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark `field` as required.
    pub fn require(mut self, field: &'static str) -> Self {
        self.required.push(field);
        self
    }

    /// Provide a default for an optional `field`.
    pub fn default_value(mut self, field: &str, value: Value) -> Self {
        self.defaults.insert(field.to_string(), value);
        self
    }
}

/// Check `data` against `spec` and merge defaults.
///
/// Fails with a [`ChutesError::Response`] (no status) when the payload is
/// absent or not an object, or when a required field is missing; the
/// first missing field is named in the message. On success returns the
/// defaults shallow-merged under the payload, with payload fields winning.
pub fn validate_shape(data: Value, spec: &ShapeSpec) -> Result<Value, ChutesError> {
    let object = match data {
        Value::Object(map) => map,
        Value::Null => return Err(ChutesError::shape("response payload is missing")),
        other => {
            return Err(ChutesError::shape(format!(
                "response payload is not an object: {other}"
            )))
        }
    };

    for field in &spec.required {
        if !object.contains_key(*field) {
            return Err(ChutesError::shape(format!(
                "response missing required field \"{field}\""
            )));
        }
    }

    let mut merged = spec.defaults.clone();
    for (key, value) in object {
        merged.insert(key, value);
    }
    Ok(Value::Object(merged))
}

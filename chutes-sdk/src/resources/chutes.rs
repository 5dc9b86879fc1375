//! Chutes resource client
//!
//! A chute is a deployed workload unit; a cord is a named remotely
//! invocable function a chute exposes.

use super::{collection_items, decode_entity};
use crate::client::HttpClient;
use crate::error::ChutesError;
use crate::validate::ShapeSpec;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::sync::Arc;

/// Client for chute operations.
#[derive(Debug, Clone)]
pub struct ChutesClient {
    client: Arc<HttpClient>,
}

impl ChutesClient {
    /// Create a new chutes client.
    pub fn new(client: Arc<HttpClient>) -> Self {
        Self { client }
    }

    fn chute_spec() -> ShapeSpec {
        ShapeSpec::new()
            .require("id")
            .require("name")
            .default_value("public", json!(false))
    }

    fn cord_spec() -> ShapeSpec {
        ShapeSpec::new()
            .require("name")
            .default_value("public", json!(false))
    }

    /// List deployed chutes.
    ///
    /// The platform answers an empty collection with a 404 whose body is
    /// `{"detail": "No matching chute found!"}`; that quirk is mapped to an
    /// empty list here rather than surfaced as an error.
    pub async fn list(&self) -> Result<Vec<Chute>, ChutesError> {
        let payload = match self.client.get("/chutes").await {
            Ok(payload) => payload,
            Err(error) if is_empty_collection(&error) => return Ok(Vec::new()),
            Err(error) => return Err(error),
        };
        let spec = Self::chute_spec();
        collection_items(payload.into_json()?)?
            .into_iter()
            .map(|item| decode_entity(item, &spec))
            .collect()
    }

    /// Get a chute by ID.
    pub async fn get(&self, id: &str) -> Result<Chute, ChutesError> {
        let payload = self.client.get(&format!("/chutes/{id}")).await?;
        decode_entity(payload.into_json()?, &Self::chute_spec())
    }

    /// Deploy a new chute.
    pub async fn deploy(&self, request: DeployChuteRequest) -> Result<Chute, ChutesError> {
        let body = serde_json::to_value(&request)?;
        let payload = self.client.post("/chutes", body).await?;
        decode_entity(payload.into_json()?, &Self::chute_spec())
    }

    /// Delete a chute.
    pub async fn remove(&self, id: &str) -> Result<(), ChutesError> {
        self.client.delete(&format!("/chutes/{id}")).await?;
        Ok(())
    }

    /// List the cords a chute exposes.
    pub async fn cords(&self, chute_id: &str) -> Result<Vec<Cord>, ChutesError> {
        let payload = self.client.get(&format!("/chutes/{chute_id}/cords")).await?;
        let spec = Self::cord_spec();
        collection_items(payload.into_json()?)?
            .into_iter()
            .map(|item| decode_entity(item, &spec))
            .collect()
    }

    /// Invoke a cord with the given arguments, returning its raw result.
    pub async fn invoke_cord(
        &self,
        chute_id: &str,
        cord: &str,
        args: Value,
    ) -> Result<Value, ChutesError> {
        let payload = self
            .client
            .post(&format!("/chutes/{chute_id}/cords/{cord}"), args)
            .await?;
        Ok(payload.into_value())
    }
}

fn is_empty_collection(error: &ChutesError) -> bool {
    matches!(
        error,
        ChutesError::Response {
            status: Some(404),
            details: Some(details),
            ..
        } if details.get("detail").and_then(Value::as_str) == Some("No matching chute found!")
    )
}

/// A deployed workload unit.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Chute {
    /// Opaque platform identifier.
    pub id: String,
    /// Human-readable name.
    pub name: String,
    /// Lifecycle status reported by the platform, when present.
    #[serde(default)]
    pub status: Option<String>,
    /// Whether the chute is publicly invocable.
    pub public: bool,
    /// Image the chute was built from.
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    /// Creation timestamp, when reported.
    pub created_at: Option<DateTime<Utc>>,
}

/// A named remotely invocable function exposed by a chute.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Cord {
    /// Cord name, unique within its chute.
    pub name: String,
    /// Whether the cord is publicly invocable.
    pub public: bool,
    #[serde(default)]
    /// Free-form description, when present.
    pub description: Option<String>,
}

/// Request to deploy a new chute.
#[derive(Debug, Clone, Serialize)]
pub struct DeployChuteRequest {
    /// Name for the new chute.
    pub name: String,
    /// Image to build the chute from.
    pub image: String,
    /// Whether the chute should be publicly invocable.
    pub public: bool,
    /// Platform-specific deployment configuration.
    #[serde(skip_serializing_if = "Value::is_null")]
    pub config: Value,
}

impl DeployChuteRequest {
    /// Create a deploy request for `name` built from `image`.
    pub fn new(name: impl Into<String>, image: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            image: image.into(),
            public: false,
            config: Value::Null,
        }
    }

    /// Make the chute publicly invocable.
    pub fn with_public(mut self, public: bool) -> Self {
        self.public = public;
        self
    }

    /// Attach deployment configuration.
    pub fn with_config(mut self, config: Value) -> Self {
        self.config = config;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deploy_request_builder() {
        let request = DeployChuteRequest::new("vision-demo", "parachutes/sdxl:latest")
            .with_public(true)
            .with_config(json!({"gpu_count": 1}));

        assert_eq!(request.name, "vision-demo");
        assert_eq!(request.image, "parachutes/sdxl:latest");
        assert!(request.public);

        let body = serde_json::to_value(&request).unwrap();
        assert_eq!(body["config"]["gpu_count"], 1);
    }

    #[test]
    fn test_deploy_request_omits_null_config() {
        let request = DeployChuteRequest::new("vision-demo", "parachutes/sdxl:latest");
        let body = serde_json::to_value(&request).unwrap();
        assert!(body.get("config").is_none());
    }

    #[test]
    fn test_empty_collection_quirk_detection() {
        let quirk = ChutesError::response(
            404,
            "No matching chute found!",
            Some(json!({"detail": "No matching chute found!"})),
        );
        assert!(is_empty_collection(&quirk));

        let plain_404 = ChutesError::response(404, "HTTP Error 404", None);
        assert!(!is_empty_collection(&plain_404));

        let other_detail =
            ChutesError::response(404, "gone", Some(json!({"detail": "chute deleted"})));
        assert!(!is_empty_collection(&other_detail));
    }

    #[test]
    fn test_chute_decodes_with_defaults() {
        let value = crate::validate::validate_shape(
            json!({"id": "c1", "name": "demo", "status": "ready"}),
            &ChutesClient::chute_spec(),
        )
        .unwrap();
        let chute: Chute = serde_json::from_value(value).unwrap();
        assert_eq!(chute.id, "c1");
        assert_eq!(chute.status.as_deref(), Some("ready"));
        assert!(!chute.public);
    }
}

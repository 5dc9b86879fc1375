//! Images resource client

use super::{collection_items, decode_entity};
use crate::client::HttpClient;
use crate::error::ChutesError;
use crate::validate::ShapeSpec;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::sync::Arc;

/// Client for image operations.
#[derive(Debug, Clone)]
pub struct ImagesClient {
    client: Arc<HttpClient>,
}

impl ImagesClient {
    /// Create a new images client.
    pub fn new(client: Arc<HttpClient>) -> Self {
        Self { client }
    }

    fn image_spec() -> ShapeSpec {
        ShapeSpec::new()
            .require("id")
            .require("name")
            .default_value("public", json!(false))
    }

    /// List available images.
    pub async fn list(&self) -> Result<Vec<Image>, ChutesError> {
        let payload = self.client.get("/images").await?;
        let spec = Self::image_spec();
        collection_items(payload.into_json()?)?
            .into_iter()
            .map(|item| decode_entity(item, &spec))
            .collect()
    }

    /// Get an image by ID.
    pub async fn get(&self, id: &str) -> Result<Image, ChutesError> {
        let payload = self.client.get(&format!("/images/{id}")).await?;
        decode_entity(payload.into_json()?, &Self::image_spec())
    }
}

/// A container template used to build chutes.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Image {
    /// Opaque platform identifier.
    pub id: String,
    /// Image name.
    pub name: String,
    /// Whether the image is public.
    pub public: bool,
    #[serde(default)]
    /// Image tag, when present.
    pub tag: Option<String>,
    #[serde(default)]
    /// Creation timestamp, when reported.
    pub created_at: Option<DateTime<Utc>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_image_decodes_with_defaults() {
        let value = crate::validate::validate_shape(
            json!({"id": "img-1", "name": "sdxl", "tag": "latest"}),
            &ImagesClient::image_spec(),
        )
        .unwrap();
        let image: Image = serde_json::from_value(value).unwrap();
        assert_eq!(image.id, "img-1");
        assert_eq!(image.tag.as_deref(), Some("latest"));
        assert!(!image.public);
    }
}

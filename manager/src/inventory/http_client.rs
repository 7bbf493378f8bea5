use async_trait::async_trait;
use reqwest::{Client, Method, RequestBuilder, Response, Url};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

use super::{InventoryService, Snapshot, Tag, TagFilter, TagSet, Volume};
use crate::config::InventoryConfig;
use crate::constants;
use crate::errors::InventoryError;

#[derive(Debug, Deserialize)]
struct VolumeList {
    volumes: Vec<Volume>,
}

#[derive(Debug, Deserialize)]
struct SnapshotList {
    snapshots: Vec<Snapshot>,
}

#[derive(Debug, Serialize)]
struct CreateSnapshotRequest<'a> {
    volume_id: &'a str,
    description: &'a str,
}

#[derive(Debug, Serialize)]
struct CreateTagsRequest<'a> {
    resources: &'a [String],
    tags: Vec<Tag>,
}

/// JSON-over-HTTP client for the inventory service.
///
/// One client is built at startup and shared by every worker; `reqwest`
/// pools connections underneath.
pub struct HttpInventoryClient {
    client: Client,
    base_url: Url,
    region: String,
    profile: String,
    credentials: Option<(String, String)>,
}

impl HttpInventoryClient {
    pub fn new(config: &InventoryConfig) -> Result<Self, InventoryError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_seconds))
            .connect_timeout(constants::inventory::CONNECT_TIMEOUT)
            .build()
            .map_err(|e| InventoryError::Request {
                operation: "build_client".to_string(),
                reason: e.to_string(),
            })?;

        let base_url = Url::parse(config.endpoint.trim()).map_err(|e| InventoryError::Request {
            operation: "build_client".to_string(),
            reason: format!("invalid endpoint '{}': {}", config.endpoint, e),
        })?;
        if base_url.cannot_be_a_base() {
            return Err(InventoryError::Request {
                operation: "build_client".to_string(),
                reason: format!("endpoint '{}' cannot take a path", config.endpoint),
            });
        }

        let credentials = if config.access_key_id.is_empty() {
            None
        } else {
            Some((
                config.access_key_id.clone(),
                config.secret_access_key.clone(),
            ))
        };

        Ok(Self {
            client,
            base_url,
            region: config.region.clone(),
            profile: config.profile.clone(),
            credentials,
        })
    }

    /// Endpoint URL with `segments` appended. Each segment is
    /// percent-encoded on its own, so ids can never change the path.
    fn url(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    fn request(&self, method: Method, segments: &[&str]) -> RequestBuilder {
        let url = self.url(segments);
        let mut builder = self.client.request(method, url).header("X-Region", &self.region);

        if !self.profile.is_empty() {
            builder = builder.header("X-Profile", &self.profile);
        }
        if let Some((key_id, secret)) = &self.credentials {
            builder = builder.bearer_auth(format!("{}:{}", key_id, secret));
        }

        builder
    }

    async fn send(&self, operation: &str, builder: RequestBuilder) -> Result<Response, InventoryError> {
        debug!("Inventory call: {}", operation);

        let response = builder.send().await.map_err(|e| InventoryError::Request {
            operation: operation.to_string(),
            reason: e.to_string(),
        })?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(InventoryError::Status {
                operation: operation.to_string(),
                status,
                body,
            });
        }

        Ok(response)
    }

    async fn decode<T: DeserializeOwned>(
        operation: &str,
        response: Response,
    ) -> Result<T, InventoryError> {
        response.json::<T>().await.map_err(|e| InventoryError::Decode {
            operation: operation.to_string(),
            reason: e.to_string(),
        })
    }
}

#[async_trait]
impl InventoryService for HttpInventoryClient {
    async fn list_volumes(&self, filter: &TagFilter) -> Result<Vec<Volume>, InventoryError> {
        let operation = "list_volumes";
        let builder = self
            .request(Method::GET, &["volumes"])
            .query(&[("tag_key", filter.key.as_str()), ("tag_value", filter.value.as_str())]);

        let response = self.send(operation, builder).await?;
        let list: VolumeList = Self::decode(operation, response).await?;
        Ok(list.volumes)
    }

    async fn list_snapshots(&self, volume_id: &str) -> Result<Vec<Snapshot>, InventoryError> {
        let operation = "list_snapshots";
        let builder = self
            .request(Method::GET, &["snapshots"])
            .query(&[("volume_id", volume_id)]);

        let response = self.send(operation, builder).await?;
        let list: SnapshotList = Self::decode(operation, response).await?;
        Ok(list.snapshots)
    }

    async fn create_snapshot(
        &self,
        volume_id: &str,
        description: &str,
    ) -> Result<Snapshot, InventoryError> {
        let operation = "create_snapshot";
        let builder = self
            .request(Method::POST, &["snapshots"])
            .json(&CreateSnapshotRequest {
                volume_id,
                description,
            });

        let response = self.send(operation, builder).await?;
        Self::decode(operation, response).await
    }

    async fn create_tags(
        &self,
        resource_ids: &[String],
        tags: &TagSet,
    ) -> Result<(), InventoryError> {
        let builder = self.request(Method::POST, &["tags"]).json(&CreateTagsRequest {
            resources: resource_ids,
            tags: tags.clone().into(),
        });

        self.send("create_tags", builder).await?;
        Ok(())
    }

    async fn delete_snapshot(&self, snapshot_id: &str) -> Result<(), InventoryError> {
        let operation = "delete_snapshot";
        // Dot segments are dropped when the path is built
        if snapshot_id.is_empty() || snapshot_id == "." || snapshot_id == ".." {
            return Err(InventoryError::Request {
                operation: operation.to_string(),
                reason: format!("refusing to delete snapshot with id '{}'", snapshot_id),
            });
        }

        let builder = self.request(Method::DELETE, &["snapshots", snapshot_id]);
        self.send(operation, builder).await?;
        Ok(())
    }
}

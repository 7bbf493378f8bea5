//! Volume/snapshot inventory service
//!
//! The inventory service is the sole source of truth for volumes and their
//! snapshots. Nothing here caches or persists what it returns; every run
//! reads fresh state.
//!
//! # Calls
//!
//! - `list_volumes`: volumes whose tags match a filter
//! - `list_snapshots`: every snapshot of one volume
//! - `create_snapshot`: start a snapshot with a description
//! - `create_tags`: attach tags to existing resources
//! - `delete_snapshot`: remove one snapshot
//!
//! `HttpInventoryClient` is the production implementation. Tests plug in
//! their own `InventoryService`.

pub mod http_client;
pub mod tags;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::errors::InventoryError;

pub use http_client::HttpInventoryClient;
pub use tags::{Tag, TagSet};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Volume {
    pub volume_id: String,
    #[serde(default)]
    pub tags: TagSet,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub snapshot_id: String,
    pub volume_id: String,
    pub start_time: DateTime<Utc>,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub tags: TagSet,
}

/// Tag key/value pair a volume must carry to be selected
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagFilter {
    pub key: String,
    pub value: String,
}

impl TagFilter {
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }
}

#[async_trait]
pub trait InventoryService: Send + Sync {
    async fn list_volumes(&self, filter: &TagFilter) -> Result<Vec<Volume>, InventoryError>;

    async fn list_snapshots(&self, volume_id: &str) -> Result<Vec<Snapshot>, InventoryError>;

    async fn create_snapshot(
        &self,
        volume_id: &str,
        description: &str,
    ) -> Result<Snapshot, InventoryError>;

    async fn create_tags(&self, resource_ids: &[String], tags: &TagSet)
        -> Result<(), InventoryError>;

    async fn delete_snapshot(&self, snapshot_id: &str) -> Result<(), InventoryError>;
}

use anyhow::Result;
use serde_json::Value;
use tracing::{debug, info};

use crate::services::{RunReport, VolumeSelector};

/// Entry point for scheduled executions.
///
/// The event payload is accepted for compatibility with managed schedulers
/// and otherwise ignored; every trigger runs one full pass.
pub async fn handle_trigger(event: Value, selector: &VolumeSelector) -> Result<RunReport> {
    debug!("Trigger payload (ignored): {}", event);
    info!("Snapshot pass triggered");

    selector.run().await
}

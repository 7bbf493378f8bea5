use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use std::sync::Arc;
use tracing::{debug, info};

use super::{decide, BackupPolicy, CreateReason, DeleteDecision, PolicyDecision};
use crate::config::Config;
use crate::inventory::{InventoryService, TagSet, Volume};

/// What happened to one volume during a pass
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VolumeOutcome {
    /// `None` when the volume lacks usable frequency/retention tags
    pub decision: Option<PolicyDecision>,
    pub created_snapshot: Option<String>,
    pub deleted_snapshot: Option<String>,
}

impl VolumeOutcome {
    pub fn is_unconfigured(&self) -> bool {
        self.decision.is_none()
    }

    pub fn legacy_skipped(&self) -> bool {
        matches!(
            self.decision.as_ref().map(|d| &d.delete),
            Some(DeleteDecision::Legacy { .. })
        )
    }
}

/// Applies the backup policy to a single volume.
///
/// Holds no state between calls; every invocation reads the volume's
/// snapshots fresh from the inventory service.
#[derive(Clone)]
pub struct PolicyEvaluator {
    inventory: Arc<dyn InventoryService>,
    config: Arc<Config>,
}

impl PolicyEvaluator {
    pub fn new(inventory: Arc<dyn InventoryService>, config: Arc<Config>) -> Self {
        Self { inventory, config }
    }

    pub async fn process_volume(&self, volume: &Volume) -> Result<VolumeOutcome> {
        self.process_volume_at(volume, Utc::now()).await
    }

    pub async fn process_volume_at(
        &self,
        volume: &Volume,
        now: DateTime<Utc>,
    ) -> Result<VolumeOutcome> {
        let keys = &self.config.tags;
        let volume_id = volume.volume_id.as_str();
        let volume_name = volume.tags.get_or_empty(&keys.name_key);

        let Some(policy) = BackupPolicy::from_tags(&volume.tags, keys) else {
            debug!(
                "Volume '{}' has a '{}' tag, but no usable '{}' or '{}' tags. Taking no action.",
                volume_id, keys.eligibility_key, keys.frequency_key, keys.retention_key
            );
            return Ok(VolumeOutcome::default());
        };

        debug!(
            "Volume '{}' ({}): frequency {} minutes, retention {} days",
            volume_id, volume_name, policy.frequency_minutes, policy.retention_days
        );

        let snapshots = self
            .inventory
            .list_snapshots(volume_id)
            .await
            .with_context(|| format!("Failed to list snapshots for volume {}", volume_id))?;

        debug!("Volume '{}' has {} snapshots", volume_id, snapshots.len());

        let decision = decide(&policy, &snapshots, now, self.config.policy_inception);
        let mut outcome = VolumeOutcome {
            decision: Some(decision.clone()),
            ..Default::default()
        };

        if self.config.dry_run {
            if !decision.is_noop() {
                info!("Dry run for volume '{}': {:?}", volume_id, decision);
            }
            return Ok(outcome);
        }

        if let Some(reason) = &decision.create {
            match reason {
                CreateReason::FirstSnapshot => {
                    info!("Volume '{}' has no snapshots, taking the first one", volume_id)
                }
                CreateReason::Stale {
                    latest_snapshot_id,
                    due_at,
                } => info!(
                    "Latest snapshot {} of volume '{}' was due for renewal at {}",
                    latest_snapshot_id, volume_id, due_at
                ),
            }
            outcome.created_snapshot = Some(self.create_snapshot(volume_id, volume_name).await?);
        }

        match &decision.delete {
            DeleteDecision::Keep => {}
            DeleteDecision::Legacy {
                snapshot_id,
                start_time,
            } => {
                info!(
                    "Snapshot {} ({}) predates the policy inception date, ignoring",
                    snapshot_id, start_time
                );
            }
            DeleteDecision::Expired {
                snapshot_id,
                start_time,
            } => {
                info!(
                    "Deleting expired snapshot {} ({}) of volume '{}'",
                    snapshot_id, start_time, volume_id
                );
                self.inventory
                    .delete_snapshot(snapshot_id)
                    .await
                    .with_context(|| format!("Failed to delete snapshot {}", snapshot_id))?;
                outcome.deleted_snapshot = Some(snapshot_id.clone());
            }
        }

        Ok(outcome)
    }

    /// Snapshots the volume, then tags the snapshot with the volume's
    /// display name so it is recognisable in listings.
    async fn create_snapshot(&self, volume_id: &str, volume_name: &str) -> Result<String> {
        info!("Snapshotting '{}' as '{}'", volume_id, volume_name);

        let snapshot = self
            .inventory
            .create_snapshot(volume_id, volume_name)
            .await
            .with_context(|| format!("Failed to create snapshot of volume {}", volume_id))?;

        let mut name_tag = TagSet::new();
        name_tag.insert(self.config.tags.name_key.as_str(), volume_name);

        self.inventory
            .create_tags(std::slice::from_ref(&snapshot.snapshot_id), &name_tag)
            .await
            .with_context(|| format!("Failed to tag snapshot {}", snapshot.snapshot_id))?;

        info!("Created snapshot {} of volume '{}'", snapshot.snapshot_id, volume_id);
        Ok(snapshot.snapshot_id)
    }
}

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use futures::future::join_all;
use std::sync::Arc;
use tokio::sync::Semaphore;
use tracing::{error, info, info_span, Instrument};

use crate::config::Config;
use crate::inventory::{InventoryService, Volume};
use crate::policy::{PolicyEvaluator, VolumeOutcome};

/// Tally of one pass over the eligible volumes
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunReport {
    pub volumes_found: usize,
    pub volumes_evaluated: usize,
    pub volumes_failed: usize,
    pub volumes_unconfigured: usize,
    pub legacy_skipped: usize,
    pub snapshots_created: usize,
    pub snapshots_deleted: usize,
}

impl RunReport {
    fn record(&mut self, outcome: &VolumeOutcome) {
        self.volumes_evaluated += 1;
        if outcome.is_unconfigured() {
            self.volumes_unconfigured += 1;
        }
        if outcome.legacy_skipped() {
            self.legacy_skipped += 1;
        }
        if outcome.created_snapshot.is_some() {
            self.snapshots_created += 1;
        }
        if outcome.deleted_snapshot.is_some() {
            self.snapshots_deleted += 1;
        }
    }
}

/// Finds volumes carrying the eligibility tag and runs the policy on each
/// through a fixed-size worker pool.
pub struct VolumeSelector {
    inventory: Arc<dyn InventoryService>,
    evaluator: PolicyEvaluator,
    config: Arc<Config>,
}

impl VolumeSelector {
    pub fn new(inventory: Arc<dyn InventoryService>, config: Arc<Config>) -> Self {
        let evaluator = PolicyEvaluator::new(inventory.clone(), config.clone());
        Self {
            inventory,
            evaluator,
            config,
        }
    }

    pub async fn select_volumes(&self) -> Result<Vec<Volume>> {
        let filter = self.config.eligibility_filter();
        self.inventory
            .list_volumes(&filter)
            .await
            .with_context(|| format!("Failed to list volumes tagged {}={}", filter.key, filter.value))
    }

    pub async fn run(&self) -> Result<RunReport> {
        self.run_at(None).await
    }

    /// One full pass. `now` pins the evaluation clock; `None` reads the
    /// wall clock per volume.
    ///
    /// Only a failure to list volumes fails the pass. Errors and panics in
    /// a worker are logged and counted, and the other volumes carry on.
    pub async fn run_at(&self, now: Option<DateTime<Utc>>) -> Result<RunReport> {
        let volumes = self.select_volumes().await?;
        let mut report = RunReport {
            volumes_found: volumes.len(),
            ..Default::default()
        };

        if volumes.is_empty() {
            info!("No volumes found.");
            return Ok(report);
        }

        let workers = self.config.worker_count.max(1);
        info!("Evaluating {} volumes with {} workers", volumes.len(), workers);

        let permits = Arc::new(Semaphore::new(workers));
        let mut tasks = Vec::with_capacity(volumes.len());

        for volume in volumes {
            let evaluator = self.evaluator.clone();
            let permits = permits.clone();
            let span = info_span!("volume", volume_id = %volume.volume_id);

            let task = tokio::spawn(
                async move {
                    let _permit = permits
                        .acquire_owned()
                        .await
                        .context("Worker pool closed")?;
                    let now = now.unwrap_or_else(Utc::now);
                    evaluator.process_volume_at(&volume, now).await
                }
                .instrument(span),
            );
            tasks.push(task);
        }

        let results = join_all(tasks).await;
        for result in results {
            match result {
                Ok(Ok(outcome)) => report.record(&outcome),
                Ok(Err(e)) => {
                    report.volumes_failed += 1;
                    error!("Volume processing failed: {:#}", e);
                }
                Err(e) => {
                    report.volumes_failed += 1;
                    error!("Volume worker panicked: {}", e);
                }
            }
        }

        info!(
            "Pass complete: {} volumes, {} created, {} deleted, {} unconfigured, {} failed",
            report.volumes_found,
            report.snapshots_created,
            report.snapshots_deleted,
            report.volumes_unconfigured,
            report.volumes_failed
        );

        Ok(report)
    }
}

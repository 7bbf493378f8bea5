use crate::config::validate_schedule;
use crate::scheduler::trigger::handle_trigger;
use crate::services::{RunReport, VolumeSelector};
use anyhow::{anyhow, Result};
use chrono::Utc;
use serde_json::json;
use std::sync::Arc;
use tokio::sync::Mutex;
use tokio_cron_scheduler::{Job, JobScheduler};
use tracing::{error, info, instrument, warn};

pub struct BackupScheduler {
    selector: Arc<VolumeSelector>,
    schedule: String,
    scheduler: JobScheduler,
    // Held for the duration of a pass so ticks never overlap
    pass_lock: Arc<Mutex<()>>,
}

impl BackupScheduler {
    pub async fn new(selector: Arc<VolumeSelector>, schedule: String) -> Result<Self> {
        validate_schedule(&schedule)?;

        let scheduler = JobScheduler::new()
            .await
            .map_err(|e| anyhow!("Failed to create JobScheduler: {}", e))?;

        Ok(Self {
            selector,
            schedule,
            scheduler,
            pass_lock: Arc::new(Mutex::new(())),
        })
    }

    #[instrument(skip(self), fields(schedule = %self.schedule))]
    pub async fn start(&self) -> Result<()> {
        let selector = self.selector.clone();
        let pass_lock = self.pass_lock.clone();

        let job = Job::new_async(self.schedule.as_str(), move |_uuid, _scheduler| {
            let selector = selector.clone();
            let pass_lock = pass_lock.clone();

            Box::pin(async move {
                scheduled_pass(&selector, &pass_lock).await;
            })
        })
        .map_err(|e| anyhow!("Failed to create snapshot job for '{}': {}", self.schedule, e))?;

        self.scheduler
            .add(job)
            .await
            .map_err(|e| anyhow!("Failed to add snapshot job to scheduler: {}", e))?;

        self.scheduler
            .start()
            .await
            .map_err(|e| anyhow!("Failed to start scheduler: {}", e))?;

        info!("Snapshot scheduler started");
        Ok(())
    }

    /// Runs one scheduled pass now. Returns `None` when the tick was
    /// skipped because a pass is already running, or when the pass failed.
    pub async fn tick(&self) -> Option<RunReport> {
        scheduled_pass(&self.selector, &self.pass_lock).await
    }

    pub async fn shutdown(&mut self) -> Result<()> {
        self.scheduler
            .shutdown()
            .await
            .map_err(|e| anyhow!("Failed to stop scheduler: {}", e))?;
        info!("Snapshot scheduler stopped");
        Ok(())
    }
}

async fn scheduled_pass(selector: &VolumeSelector, pass_lock: &Mutex<()>) -> Option<RunReport> {
    let Ok(_guard) = pass_lock.try_lock() else {
        warn!("Previous snapshot pass still running, skipping this tick");
        return None;
    };

    let event = json!({
        "source": "cron",
        "scheduled_at": Utc::now().to_rfc3339(),
    });

    match handle_trigger(event, selector).await {
        Ok(report) => {
            info!(
                "Scheduled pass finished: {} created, {} deleted, {} failed",
                report.snapshots_created, report.snapshots_deleted, report.volumes_failed
            );
            Some(report)
        }
        Err(e) => {
            error!("Scheduled pass failed: {:#}", e);
            None
        }
    }
}

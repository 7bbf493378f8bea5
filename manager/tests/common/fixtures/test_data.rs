//! Common test data and constants

use chrono::{DateTime, TimeZone, Utc};
use snapshot_manager::config::Config;
use snapshot_manager::inventory::{Snapshot, TagSet, Volume};
use std::sync::Arc;

/// Fixed UTC instant
pub fn at(y: i32, m: u32, d: u32, h: u32, min: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(y, m, d, h, min, 0).unwrap()
}

/// Default policy inception cutoff
pub fn inception() -> DateTime<Utc> {
    at(2017, 1, 1, 0, 0)
}

/// Eligible volume with optional frequency/retention tags
pub fn volume(id: &str, name: Option<&str>, frequency: Option<&str>, retention: Option<&str>) -> Volume {
    let mut tag_set = TagSet::new();
    tag_set.insert(tags::ELIGIBILITY, "true");
    if let Some(name) = name {
        tag_set.insert(tags::NAME, name);
    }
    if let Some(frequency) = frequency {
        tag_set.insert(tags::FREQUENCY, frequency);
    }
    if let Some(retention) = retention {
        tag_set.insert(tags::RETENTION, retention);
    }

    Volume {
        volume_id: id.to_string(),
        tags: tag_set,
    }
}

pub fn snapshot(id: &str, volume_id: &str, start_time: DateTime<Utc>) -> Snapshot {
    Snapshot {
        snapshot_id: id.to_string(),
        volume_id: volume_id.to_string(),
        start_time,
        description: String::new(),
        tags: TagSet::new(),
    }
}

pub fn default_config() -> Arc<Config> {
    Arc::new(Config::default())
}

pub fn dry_run_config() -> Arc<Config> {
    Arc::new(Config {
        dry_run: true,
        ..Default::default()
    })
}

/// Default tag keys
pub mod tags {
    pub const ELIGIBILITY: &str = "snapshotbackup";
    pub const FREQUENCY: &str = "snapshotbackup_frequency";
    pub const RETENTION: &str = "snapshotbackup_retention";
    pub const NAME: &str = "Name";
}

/// Common test volume ids
pub mod volumes {
    pub const DATA: &str = "vol-0a1b2c3d";
    pub const LOGS: &str = "vol-1b2c3d4e";
    pub const SCRATCH: &str = "vol-2c3d4e5f";
}

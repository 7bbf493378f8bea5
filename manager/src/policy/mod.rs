//! Tag-driven backup policy
//!
//! A volume opts in with two tags: how often to snapshot (minutes) and how
//! long to keep snapshots (days). Each run looks only at the newest and the
//! oldest snapshot of the volume:
//!
//! - newest older than the frequency → take a new snapshot
//! - oldest older than the retention → delete it, unless it predates the
//!   policy inception cutoff
//!
//! The rules live in [`decide`], which is pure. [`PolicyEvaluator`] feeds it
//! from the inventory service and carries out the result.

pub mod evaluator;

use chrono::{DateTime, Duration, Utc};

use crate::config::TagConfig;
use crate::inventory::{Snapshot, TagSet};

pub use evaluator::{PolicyEvaluator, VolumeOutcome};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BackupPolicy {
    pub frequency_minutes: u32,
    pub retention_days: u32,
}

impl BackupPolicy {
    /// Reads frequency and retention from the volume's tags. Both must be
    /// present and positive, otherwise the volume is left alone.
    pub fn from_tags(tags: &TagSet, keys: &TagConfig) -> Option<Self> {
        let frequency_minutes = tags.get_positive(&keys.frequency_key)?;
        let retention_days = tags.get_positive(&keys.retention_key)?;

        Some(Self {
            frequency_minutes,
            retention_days,
        })
    }

    pub fn frequency(&self) -> Duration {
        Duration::minutes(i64::from(self.frequency_minutes))
    }

    pub fn retention(&self) -> Duration {
        Duration::days(i64::from(self.retention_days))
    }
}

/// Oldest and newest snapshot of a volume
#[derive(Debug, Clone, Copy)]
pub struct SnapshotExtremes<'a> {
    pub oldest: &'a Snapshot,
    pub latest: &'a Snapshot,
}

/// Single pass over `snapshots`. The first element seeds both ends and
/// ties keep whichever snapshot was seen first.
pub fn select_extremes(snapshots: &[Snapshot]) -> Option<SnapshotExtremes<'_>> {
    let (first, rest) = snapshots.split_first()?;
    let mut oldest = first;
    let mut latest = first;

    for snapshot in rest {
        if snapshot.start_time < oldest.start_time {
            oldest = snapshot;
            continue;
        }
        if snapshot.start_time > latest.start_time {
            latest = snapshot;
        }
    }

    Some(SnapshotExtremes { oldest, latest })
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CreateReason {
    /// The volume has no snapshots at all
    FirstSnapshot,
    /// The newest snapshot is older than the backup frequency
    Stale {
        latest_snapshot_id: String,
        due_at: DateTime<Utc>,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeleteDecision {
    Keep,
    Expired {
        snapshot_id: String,
        start_time: DateTime<Utc>,
    },
    /// Past retention but created before the policy inception cutoff
    Legacy {
        snapshot_id: String,
        start_time: DateTime<Utc>,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PolicyDecision {
    pub create: Option<CreateReason>,
    pub delete: DeleteDecision,
}

impl PolicyDecision {
    pub fn snapshot_to_delete(&self) -> Option<&str> {
        match &self.delete {
            DeleteDecision::Expired { snapshot_id, .. } => Some(snapshot_id),
            _ => None,
        }
    }

    pub fn is_noop(&self) -> bool {
        self.create.is_none() && self.snapshot_to_delete().is_none()
    }
}

/// `start + span` is strictly before `now`. Spans that overflow the
/// calendar never elapse.
fn elapsed(start: DateTime<Utc>, span: Duration, now: DateTime<Utc>) -> bool {
    start
        .checked_add_signed(span)
        .is_some_and(|deadline| deadline < now)
}

/// Decides what to do with one volume's snapshots at instant `now`.
///
/// Creation and deletion are judged independently, so a volume with a
/// single snapshot can be both refreshed and expired in the same pass.
pub fn decide(
    policy: &BackupPolicy,
    snapshots: &[Snapshot],
    now: DateTime<Utc>,
    inception_cutoff: DateTime<Utc>,
) -> PolicyDecision {
    let Some(SnapshotExtremes { oldest, latest }) = select_extremes(snapshots) else {
        return PolicyDecision {
            create: Some(CreateReason::FirstSnapshot),
            delete: DeleteDecision::Keep,
        };
    };

    let create = elapsed(latest.start_time, policy.frequency(), now).then(|| CreateReason::Stale {
        latest_snapshot_id: latest.snapshot_id.clone(),
        due_at: latest.start_time + policy.frequency(),
    });

    let delete = if !elapsed(oldest.start_time, policy.retention(), now) {
        DeleteDecision::Keep
    } else if oldest.start_time < inception_cutoff {
        DeleteDecision::Legacy {
            snapshot_id: oldest.snapshot_id.clone(),
            start_time: oldest.start_time,
        }
    } else {
        DeleteDecision::Expired {
            snapshot_id: oldest.snapshot_id.clone(),
            start_time: oldest.start_time,
        }
    };

    PolicyDecision { create, delete }
}

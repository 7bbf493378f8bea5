//! Central repository for default values and magic numbers
//!
//! Constants are grouped by concern so the config layer, the CLI and the
//! policy code agree on a single source of truth.

use std::time::Duration;

/// Tag keys recognised on volumes and snapshots
pub mod tags {
    /// Tag whose presence (with the matching value) makes a volume eligible
    pub const ELIGIBILITY_KEY: &str = "snapshotbackup";

    /// Value the eligibility tag must carry
    pub const ELIGIBILITY_VALUE: &str = "true";

    /// Minutes between snapshots
    pub const FREQUENCY_KEY: &str = "snapshotbackup_frequency";

    /// Days a snapshot is kept
    pub const RETENTION_KEY: &str = "snapshotbackup_retention";

    /// Display name tag, copied onto created snapshots
    pub const NAME_KEY: &str = "Name";
}

/// Inventory service connection defaults
pub mod inventory {
    use super::Duration;

    pub const DEFAULT_ENDPOINT: &str = "http://localhost:8080";

    pub const DEFAULT_REGION: &str = "ap-southeast-2";

    pub const DEFAULT_PROFILE: &str = "default";

    /// Timeout for a single inventory request
    pub const REQUEST_TIMEOUT_SECONDS: u64 = 30;

    /// Timeout for establishing HTTP connections
    pub const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);
}

/// Policy evaluation defaults
pub mod policy {
    /// Snapshots created before this instant are never deleted
    pub const INCEPTION_CUTOFF: &str = "2017-01-01T00:00:00Z";

    /// Number of volumes evaluated concurrently
    pub const WORKER_COUNT: usize = 4;
}

/// Config file locations
pub mod config {
    pub const DEFAULT_DIR: &str = "config";

    pub const MAIN_FILE: &str = "main.toml";
}

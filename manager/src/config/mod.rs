pub mod manager;
pub mod schedule;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::constants;
use crate::errors::ConfigError;
use crate::inventory::TagFilter;

pub use manager::ConfigManager;
pub use schedule::validate_schedule;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub worker_count: usize,
    pub policy_inception: DateTime<Utc>,
    pub dry_run: bool,
    // 6-field cron, only read by the daemon
    pub schedule: Option<String>,
    pub tags: TagConfig,
    pub inventory: InventoryConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TagConfig {
    pub eligibility_key: String,
    pub eligibility_value: String,
    pub frequency_key: String,
    pub retention_key: String,
    pub name_key: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct InventoryConfig {
    pub endpoint: String,
    pub region: String,
    pub profile: String,
    pub access_key_id: String,
    pub secret_access_key: String,
    pub request_timeout_seconds: u64,
}

/// Values supplied on the command line; `None` keeps the file value
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub eligibility_key: Option<String>,
    pub eligibility_value: Option<String>,
    pub frequency_key: Option<String>,
    pub retention_key: Option<String>,
    pub endpoint: Option<String>,
    pub region: Option<String>,
    pub profile: Option<String>,
    pub access_key_id: Option<String>,
    pub secret_access_key: Option<String>,
    pub worker_count: Option<usize>,
    pub dry_run: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            worker_count: constants::policy::WORKER_COUNT,
            policy_inception: default_policy_inception(),
            dry_run: false,
            schedule: None,
            tags: TagConfig::default(),
            inventory: InventoryConfig::default(),
        }
    }
}

impl Default for TagConfig {
    fn default() -> Self {
        Self {
            eligibility_key: constants::tags::ELIGIBILITY_KEY.to_string(),
            eligibility_value: constants::tags::ELIGIBILITY_VALUE.to_string(),
            frequency_key: constants::tags::FREQUENCY_KEY.to_string(),
            retention_key: constants::tags::RETENTION_KEY.to_string(),
            name_key: constants::tags::NAME_KEY.to_string(),
        }
    }
}

impl Default for InventoryConfig {
    fn default() -> Self {
        Self {
            endpoint: constants::inventory::DEFAULT_ENDPOINT.to_string(),
            region: constants::inventory::DEFAULT_REGION.to_string(),
            profile: constants::inventory::DEFAULT_PROFILE.to_string(),
            access_key_id: String::new(),
            secret_access_key: String::new(),
            request_timeout_seconds: constants::inventory::REQUEST_TIMEOUT_SECONDS,
        }
    }
}

fn default_policy_inception() -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(constants::policy::INCEPTION_CUTOFF)
        .map(|dt| dt.with_timezone(&Utc))
        .unwrap_or(DateTime::<Utc>::MIN_UTC)
}

impl Config {
    pub fn eligibility_filter(&self) -> TagFilter {
        TagFilter::new(&self.tags.eligibility_key, &self.tags.eligibility_value)
    }

    pub fn apply_overrides(&mut self, overrides: &ConfigOverrides) {
        fn set(target: &mut String, value: &Option<String>) {
            if let Some(value) = value {
                *target = value.clone();
            }
        }

        set(&mut self.tags.eligibility_key, &overrides.eligibility_key);
        set(&mut self.tags.eligibility_value, &overrides.eligibility_value);
        set(&mut self.tags.frequency_key, &overrides.frequency_key);
        set(&mut self.tags.retention_key, &overrides.retention_key);
        set(&mut self.inventory.endpoint, &overrides.endpoint);
        set(&mut self.inventory.region, &overrides.region);
        set(&mut self.inventory.profile, &overrides.profile);
        set(&mut self.inventory.access_key_id, &overrides.access_key_id);
        set(&mut self.inventory.secret_access_key, &overrides.secret_access_key);

        if let Some(workers) = overrides.worker_count {
            self.worker_count = workers;
        }
        // A flag can only switch dry run on
        if overrides.dry_run {
            self.dry_run = true;
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.worker_count == 0 {
            return Err(invalid("worker_count", "must be at least 1"));
        }

        let tag_keys = [
            ("tags.eligibility_key", &self.tags.eligibility_key),
            ("tags.frequency_key", &self.tags.frequency_key),
            ("tags.retention_key", &self.tags.retention_key),
            ("tags.name_key", &self.tags.name_key),
        ];
        for (field, value) in tag_keys {
            if value.trim().is_empty() {
                return Err(invalid(field, "tag key cannot be empty"));
            }
        }

        if self.inventory.endpoint.trim().is_empty() {
            return Err(invalid("inventory.endpoint", "endpoint cannot be empty"));
        }

        if self.inventory.access_key_id.is_empty() != self.inventory.secret_access_key.is_empty() {
            return Err(invalid(
                "inventory.access_key_id",
                "access key id and secret must be set together",
            ));
        }

        if let Some(schedule) = &self.schedule {
            validate_schedule(schedule)?;
        }

        Ok(())
    }
}

fn invalid(field: &str, reason: &str) -> ConfigError {
    ConfigError::InvalidValue {
        field: field.to_string(),
        reason: reason.to_string(),
    }
}

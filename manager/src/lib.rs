pub mod config;
pub mod constants;
pub mod errors;
pub mod inventory;
pub mod policy;
pub mod scheduler;
pub mod services;

// Re-export commonly used types
pub use config::{Config, ConfigManager, ConfigOverrides};
pub use errors::{ConfigError, InventoryError};
pub use inventory::{HttpInventoryClient, InventoryService, Snapshot, TagFilter, TagSet, Volume};
pub use policy::{BackupPolicy, PolicyDecision, PolicyEvaluator, VolumeOutcome};
pub use scheduler::{handle_trigger, BackupScheduler};
pub use services::{RunReport, VolumeSelector};

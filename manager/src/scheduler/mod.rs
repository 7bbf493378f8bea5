//! Cron-driven daemon mode
//!
//! Instead of being started by an external scheduler, the binary can stay
//! resident and run a pass over all eligible volumes on a cron schedule.
//! Every tick goes through the same trigger handler an external
//! scheduled-execution environment would call.
//!
//! # Configuration
//!
//! The schedule is a 6-field cron expression (sec min hour day month dow)
//! in `config/main.toml`:
//!
//! ```toml
//! schedule = "0 */15 * * * *"  # every 15 minutes
//! ```
//!
//! A tick that fires while the previous pass is still running is skipped.

pub mod operations;
pub mod trigger;

pub use operations::BackupScheduler;
pub use trigger::handle_trigger;

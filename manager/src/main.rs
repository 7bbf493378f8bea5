use anyhow::{anyhow, bail, Result};
use clap::{Parser, Subcommand};
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::{fmt, EnvFilter};

use snapshot_manager::constants;
use snapshot_manager::{
    BackupScheduler, ConfigManager, ConfigOverrides, HttpInventoryClient, InventoryService,
    VolumeSelector,
};

#[derive(Debug, Parser)]
#[command(
    name = "snapshot-manager",
    version,
    about = "Creates and expires block-storage snapshots based on volume tags"
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,

    /// Directory holding main.toml
    #[arg(long, global = true, default_value = constants::config::DEFAULT_DIR)]
    config: String,

    /// The tag to filter on and use to find targets for snapshots
    #[arg(long, global = true)]
    tag: Option<String>,

    /// The tag value a volume must carry to be backed up
    #[arg(long, global = true)]
    tag_value: Option<String>,

    /// The tag holding the snapshot frequency in minutes
    #[arg(long, global = true)]
    tag_frequency: Option<String>,

    /// The tag holding the snapshot retention in days
    #[arg(long, global = true)]
    tag_retention: Option<String>,

    /// Credentials profile forwarded to the inventory service
    #[arg(long, global = true)]
    profile: Option<String>,

    /// Region to work with
    #[arg(long, global = true)]
    region: Option<String>,

    /// API access key id
    #[arg(long, global = true, env = "SNAPSHOT_MANAGER_ACCESS_KEY")]
    access_key: Option<String>,

    /// API secret key
    #[arg(long, global = true, env = "SNAPSHOT_MANAGER_ACCESS_KEY_SECRET", hide_env_values = true)]
    access_key_secret: Option<String>,

    /// Inventory service base URL
    #[arg(long, global = true)]
    endpoint: Option<String>,

    /// Number of volumes processed concurrently
    #[arg(long, global = true)]
    workers: Option<usize>,

    /// Decide and log, but do not create, tag or delete anything
    #[arg(long, global = true)]
    dry_run: bool,

    /// Verbose output for debugging purposes
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Run a single pass over all eligible volumes (default)
    Run,
    /// Stay resident and run a pass on the configured cron schedule
    Daemon,
}

impl Cli {
    fn overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            eligibility_key: self.tag.clone(),
            eligibility_value: self.tag_value.clone(),
            frequency_key: self.tag_frequency.clone(),
            retention_key: self.tag_retention.clone(),
            endpoint: self.endpoint.clone(),
            region: self.region.clone(),
            profile: self.profile.clone(),
            access_key_id: self.access_key.clone(),
            secret_access_key: self.access_key_secret.clone(),
            worker_count: self.workers,
            dry_run: self.dry_run,
        }
    }
}

fn init_logging(verbose: bool) -> Result<()> {
    let level = if verbose { "debug" } else { "info" };
    let env_filter = EnvFilter::from_default_env()
        .add_directive(format!("snapshot_manager={}", level).parse()?)
        .add_directive("tokio_cron_scheduler=warn".parse()?)
        .add_directive("hyper=warn".parse()?)
        .add_directive("reqwest=warn".parse()?);

    fmt().with_env_filter(env_filter).init();
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose)?;

    info!("Starting snapshot manager");

    let config_manager = ConfigManager::new(&cli.config, &cli.overrides()).await?;
    let config = config_manager.get_current_config();

    let inventory: Arc<dyn InventoryService> = Arc::new(HttpInventoryClient::new(&config.inventory)?);
    let selector = Arc::new(VolumeSelector::new(inventory, config.clone()));

    match cli.command.unwrap_or(Command::Run) {
        Command::Run => {
            let report = selector.run().await?;
            if report.volumes_failed > 0 {
                bail!(
                    "{} of {} volumes failed, see errors above",
                    report.volumes_failed,
                    report.volumes_found
                );
            }
        }
        Command::Daemon => {
            let schedule = config
                .schedule
                .clone()
                .ok_or_else(|| anyhow!("Daemon mode requires 'schedule' in {}/main.toml", cli.config))?;

            let mut scheduler = BackupScheduler::new(selector, schedule).await?;
            scheduler.start().await?;

            tokio::signal::ctrl_c().await?;
            warn!("Shutdown requested");
            scheduler.shutdown().await?;
        }
    }

    Ok(())
}

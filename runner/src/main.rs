// Runner binary entry point: load configuration, wire the PostgreSQL
// driver, register job files, and run the scheduler until interrupted

mod driver;

use crate::driver::PostgresDriver;
use anyhow::Context;
use cronjobs::config::Settings;
use cronjobs::executor::Driver;
use cronjobs::scheduler::{Scheduler, SchedulerConfig};
use cronjobs::{source, telemetry};
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let settings = Settings::load().context("Failed to load configuration")?;
    settings
        .validate()
        .map_err(|e| anyhow::anyhow!("Invalid configuration: {}", e))?;

    telemetry::init_logging(&settings.observability.log_level)?;
    info!(jobs_dir = %settings.jobs.dir.display(), "starting cronjobs runner");

    let driver = PostgresDriver::connect(
        &settings.database.url,
        settings.database.max_connections,
        Duration::from_secs(settings.database.connect_timeout_seconds),
    )
    .await?;
    let driver: Arc<dyn Driver> = Arc::new(driver);
    info!("database driver connected");

    let mut scheduler = Scheduler::new(SchedulerConfig {
        channel_capacity: settings.scheduler.channel_capacity,
    });

    let failures = source::register_dir(&mut scheduler, driver, &settings.jobs.dir)?;
    for failure in &failures {
        warn!(error = %failure, "skipping job file");
    }
    if scheduler.is_empty() {
        anyhow::bail!("no jobs registered");
    }
    info!(
        jobs = scheduler.len(),
        skipped = failures.len(),
        "jobs registered"
    );

    let handle = scheduler.start();

    tokio::signal::ctrl_c()
        .await
        .context("Failed to listen for Ctrl+C")?;
    info!("received Ctrl+C, initiating graceful shutdown");
    handle.stop().await;

    Ok(())
}

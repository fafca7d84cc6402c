use std::time::Duration;

use anyhow::Result;
use dinner_pairing_worker::{app, config, logging, telemetry};
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    let config = config::Config::load()?;

    logging::init_logging(&config.logging);

    info!("Starting dinner pairing worker v{}", env!("CARGO_PKG_VERSION"));

    if config.metrics.enabled {
        let addr = config.metrics_addr()?;
        telemetry::init_metrics(addr)?;
        info!(addr = %addr, "Metrics exporter listening");
    }

    let db_config: persistence::db::DatabaseConfig = (&config.database).into();
    let pool = persistence::db::create_pool(&db_config).await?;

    info!("Running database migrations...");
    persistence::db::run_migrations(&pool).await?;
    info!("Migrations completed");

    if !config.scheduler.enabled {
        info!("Scheduler disabled; exiting");
        return Ok(());
    }

    let mut scheduler = app::create_scheduler(&config, pool);
    scheduler.start();

    tokio::signal::ctrl_c().await?;
    info!("Shutdown signal received");

    scheduler.shutdown();
    scheduler
        .wait_for_shutdown(Duration::from_secs(config.scheduler.shutdown_timeout_secs))
        .await;

    Ok(())
}

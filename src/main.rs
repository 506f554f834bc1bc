//! Store-and-forward spool health beacon
//!
//! Thin hosting shell around the inspection core: loads configuration,
//! runs one inspection cycle per poll tick, and hands the resulting values
//! to the metrics publisher. A failed cycle publishes nothing; the next
//! tick is the retry.

#![deny(unused_imports)]
#![deny(unused_mut)]
#![deny(unused_variables)]
#![warn(dead_code)]
#![warn(unused_must_use)]

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use spool_beacon::config::Config;
use spool_beacon::publisher::{LogPublisher, MetricValue, MetricsPublisher};
use spool_beacon::service::{NullProbe, ServiceProbe, SystemdProbe};
use spool_beacon::snapshot::Inspector;

/// Command line arguments
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to configuration file
    #[arg(short, long, default_value = "beacon.toml")]
    config: String,

    /// Override the spool directory from the configuration
    #[arg(long)]
    spool_dir: Option<PathBuf>,

    /// Override the poll interval in seconds
    #[arg(long)]
    interval: Option<u64>,

    /// Run a single inspection cycle and exit
    #[arg(long)]
    once: bool,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.verbose)?;

    info!("Starting store-and-forward spool beacon");
    info!("Version: {}", env!("CARGO_PKG_VERSION"));

    let mut config = load_config(&args.config)?;
    if let Some(dir) = args.spool_dir {
        config.spool.directory = dir;
    }
    if let Some(secs) = args.interval {
        config.poll.interval_secs = secs;
    }

    info!("Spool directory: {}", config.spool.directory.display());
    info!("Poll interval: {}s", config.poll.interval_secs);

    let inspector = Inspector::new(
        config.spool.directory.clone(),
        config.spool.category_map(),
    );
    let publisher = LogPublisher;
    let probe: Box<dyn ServiceProbe> = if config.service.probe {
        Box::new(SystemdProbe)
    } else {
        Box::new(NullProbe)
    };

    if args.once {
        run_cycle(&inspector, &publisher, probe.as_ref(), &config.service.name);
        return Ok(());
    }

    run_poll_loop(
        &inspector,
        &publisher,
        probe.as_ref(),
        &config.service.name,
        config.poll.interval_secs,
    )
    .await
}

/// Initialize logging subsystem
fn init_logging(verbose: bool) -> Result<()> {
    let env_filter = if verbose {
        "spool_beacon=debug,info"
    } else {
        "spool_beacon=info,warn,error"
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| env_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_target(true))
        .init();

    Ok(())
}

/// Load configuration from file with fallback to defaults
fn load_config(path: &str) -> Result<Config> {
    if std::path::Path::new(path).exists() {
        Config::from_file(path).with_context(|| format!("Failed to load config from {}", path))
    } else {
        warn!("Config file '{}' not found, using defaults", path);
        Ok(Config::default())
    }
}

/// Poll loop: one inspection per tick, at most one in flight
async fn run_poll_loop(
    inspector: &Inspector,
    publisher: &dyn MetricsPublisher,
    probe: &dyn ServiceProbe,
    service_name: &str,
    interval_secs: u64,
) -> Result<()> {
    let mut ticker = tokio::time::interval(tokio::time::Duration::from_secs(interval_secs));

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                run_cycle(inspector, publisher, probe, service_name);
            }
            _ = tokio::signal::ctrl_c() => {
                info!("Received shutdown signal");
                break;
            }
        }
    }

    info!("Shutting down");
    Ok(())
}

/// One inspection cycle: scan, then publish everything or nothing
fn run_cycle(
    inspector: &Inspector,
    publisher: &dyn MetricsPublisher,
    probe: &dyn ServiceProbe,
    service_name: &str,
) {
    let snapshot = match inspector.scan() {
        Ok(snapshot) => snapshot,
        Err(err) => {
            error!(
                spool = %inspector.spool_dir().display(),
                "Inspection cycle failed: {err}"
            );
            return;
        }
    };

    let mut values = snapshot.values();
    let state = probe.status(service_name);
    values.push((
        "service.state".to_string(),
        MetricValue::Text(state.as_str().to_string()),
    ));

    if let Err(err) = publisher.publish(&values) {
        error!("Failed to publish snapshot: {err:#}");
    }
}

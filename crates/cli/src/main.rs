//! Bridge Compare - cross-chain bridge quote comparison
//!
//! Runs one comparison across the configured providers, prints it, and
//! with `BRIDGE_MONITOR=true` keeps monitoring provider health until
//! interrupted.

mod settings;

use std::env;
use std::sync::Arc;

use tokio::signal;
use tokio::sync::broadcast::error::RecvError;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use bridge_adapters::build_adapters;
use bridge_engine::QuoteAggregator;
use bridge_monitor::{HealthMonitor, MetricsAggregator};

const MONITOR_ENV: &str = "BRIDGE_MONITOR";
const LOG_JSON_ENV: &str = "BRIDGE_LOG_JSON";

fn env_flag(name: &str) -> bool {
    env::var(name)
        .map(|v| matches!(v.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes"))
        .unwrap_or(false)
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_file(true)
        .with_line_number(true);

    if env_flag(LOG_JSON_ENV) {
        builder.json().init();
    } else {
        builder.init();
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                error!("Failed to install signal handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C");
        }
        _ = terminate => {
            info!("Received termination signal");
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    init_tracing();
    info!("Starting bridge-compare v{}", env!("CARGO_PKG_VERSION"));

    let config = settings::load()?;
    let request = config.request.to_request()?;

    let adapters = build_adapters(&config)?;
    let history = Arc::new(MetricsAggregator::from_config(&config.history));
    let monitor = Arc::new(HealthMonitor::new(
        adapters.clone(),
        Arc::clone(&history),
        config.monitor.clone(),
    ));
    let aggregator = QuoteAggregator::new(adapters)
        .with_weights(config.scoring)
        .with_stats_source(monitor.clone());

    info!(
        "Comparing routes {} -> {} for {} smallest units",
        request.source_chain, request.dest_chain, request.amount
    );
    let result = aggregator.compare(&request).await;

    println!("{result}");
    println!("{}", serde_json::to_string_pretty(&result)?);

    if !env_flag(MONITOR_ENV) {
        return Ok(());
    }

    let mut updates = monitor.subscribe();
    monitor.start_monitoring(config.monitor.interval())?;
    info!("Press Ctrl+C to stop monitoring");

    let shutdown = shutdown_signal();
    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            _ = &mut shutdown => break,
            update = updates.recv() => match update {
                Ok(snapshot) => {
                    for (id, record) in &snapshot {
                        info!(
                            "{}: {:?}, success rate {:.1}%, liquidity {}",
                            id,
                            record.state,
                            record.success_rate(),
                            record.current_liquidity
                        );
                    }
                }
                Err(RecvError::Lagged(skipped)) => {
                    warn!("Skipped {} health snapshots", skipped);
                }
                Err(RecvError::Closed) => break,
            },
        }
    }

    monitor.stop_monitoring();

    for (id, health) in monitor.get_health_status() {
        let averages = history.get_averages(&id);
        info!(
            "{}: operational={} success_rate={:.1}% last_updated={} averages={:?}",
            id, health.is_operational, health.success_rate, health.last_updated, averages
        );
    }

    info!("Shutdown complete");
    Ok(())
}

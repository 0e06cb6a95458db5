//! Mini Cache - demo process
//!
//! Drives a synthetic read/write workload against the cache and logs its
//! statistics once per second until Ctrl+C or SIGTERM.

use std::env;
use std::time::Duration;

use anyhow::{Context, Result};
use tokio::signal;
use tracing::{debug, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use mini_cache::{Cache, CacheConfig, CacheError};

/// Number of distinct keys the workload cycles through
const KEY_SPACE: u64 = 64;

/// Workload knobs, separate from the cache configuration.
#[derive(Debug, Clone)]
struct DemoSettings {
    /// TTL applied to most writes
    entry_ttl: Duration,
    /// Pause between workload rounds
    write_interval: Duration,
}

impl DemoSettings {
    /// # Environment Variables
    /// - `DEMO_ENTRY_TTL_MS` - TTL of written entries (default: 2000)
    /// - `DEMO_WRITE_INTERVAL_MS` - Delay between writes (default: 50)
    fn from_env() -> Self {
        let millis = |name: &str, default: u64| {
            env::var(name)
                .ok()
                .and_then(|v| v.parse().ok())
                .filter(|ms: &u64| *ms > 0)
                .map(Duration::from_millis)
                .unwrap_or(Duration::from_millis(default))
        };

        Self {
            entry_ttl: millis("DEMO_ENTRY_TTL_MS", 2000),
            write_interval: millis("DEMO_WRITE_INTERVAL_MS", 50),
        }
    }
}

/// Main entry point.
///
/// # Startup Sequence
/// 1. Initialize tracing subscriber for logging
/// 2. Load cache and workload configuration from environment variables
/// 3. Create the cache, which starts the background sweeper
/// 4. Run the workload and periodic stats reporting
/// 5. On shutdown signal, stop the sweeper and print final statistics
#[tokio::main]
async fn main() -> Result<()> {
    // Defaults to "info" level, can be overridden with RUST_LOG env var
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "mini_cache=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Mini Cache demo");

    let config = CacheConfig::from_env();
    let settings = DemoSettings::from_env();
    info!(
        "Configuration loaded: max_size={}, cleanup_interval={}ms, entry_ttl={}ms, write_interval={}ms",
        config.max_size,
        config.cleanup_interval.as_millis(),
        settings.entry_ttl.as_millis(),
        settings.write_interval.as_millis()
    );

    let cache: Cache<String, u64> = Cache::new(config).context("failed to create cache")?;

    let mut write_tick = tokio::time::interval(settings.write_interval);
    let mut report_tick = tokio::time::interval(Duration::from_secs(1));
    let shutdown = shutdown_signal();
    tokio::pin!(shutdown);

    let mut round: u64 = 0;
    loop {
        tokio::select! {
            _ = write_tick.tick() => {
                run_round(&cache, round, &settings).await;
                round += 1;
            }
            _ = report_tick.tick() => {
                let stats = cache.stats().await;
                info!(
                    "Stats: {} (hit rate {:.1}%)",
                    serde_json::to_string(&stats).context("failed to encode stats")?,
                    stats.hit_rate() * 100.0
                );
            }
            _ = &mut shutdown => break,
        }
    }

    cache.stop().await;

    let stats = cache.stats().await;
    println!(
        "{}",
        serde_json::to_string_pretty(&stats).context("failed to encode final stats")?
    );
    info!("Shutdown complete after {} rounds", round);

    Ok(())
}

/// One workload step: a write followed by a lookup of another key.
async fn run_round(cache: &Cache<String, u64>, round: u64, settings: &DemoSettings) {
    // Every third write never expires
    let ttl = if round % 3 == 0 {
        Duration::ZERO
    } else {
        settings.entry_ttl
    };

    match cache.set(format!("key:{}", round % KEY_SPACE), round, ttl).await {
        Ok(()) => {}
        Err(CacheError::CacheFull(max_size)) => {
            warn!("Cache full at {} entries, dropped write {}", max_size, round)
        }
        Err(err) => warn!("Write {} failed: {}", round, err),
    }

    let probe = format!("key:{}", round.wrapping_mul(7) % KEY_SPACE);
    match cache.get(&probe).await {
        Ok(value) => debug!("{} -> {}", probe, value),
        Err(err) => debug!("{}: {}", probe, err),
    }
}

/// Waits for shutdown signal (Ctrl+C or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, initiating shutdown...");
        }
        _ = terminate => {
            info!("Received SIGTERM, initiating shutdown...");
        }
    }
}

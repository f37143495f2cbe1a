//! Background expiry sweeper.
//!
//! Lazy expiry keeps every operation correct on its own, but an entry that is
//! never touched again would sit in memory until something walks its shard.
//! The sweeper reclaims those entries: a background task that periodically
//! purges expired entries from the whole store.
//!
//! The sweep cadence adapts to the observed expiry rate. When a large
//! fraction of the live entries turns out to be expired the interval halves;
//! when sweeps keep coming back empty it backs off. The sweeper is an
//! optimization only and is safe to omit entirely.

use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tracing::{debug, info, trace};

use crate::cache::Cache;

/// Configuration for the expiry sweeper.
#[derive(Debug, Clone)]
pub struct SweeperConfig {
    /// Base interval between sweeps.
    pub base_interval: Duration,
    /// Lower bound for the adaptive interval.
    pub min_interval: Duration,
    /// Upper bound for the adaptive interval.
    pub max_interval: Duration,
    /// Speed up when at least this fraction of live entries expired.
    pub speedup_threshold: f64,
    /// Back off when less than this fraction expired and the sweep was empty.
    pub slowdown_threshold: f64,
}

impl Default for SweeperConfig {
    fn default() -> Self {
        Self {
            base_interval: Duration::from_millis(500),
            min_interval: Duration::from_millis(50),
            max_interval: Duration::from_secs(5),
            speedup_threshold: 0.25,
            slowdown_threshold: 0.01,
        }
    }
}

/// Handle to a running sweeper task.
///
/// The task stops when `stop` is called or when the handle is dropped.
#[derive(Debug)]
pub struct ExpirySweeper {
    shutdown_tx: watch::Sender<bool>,
}

impl ExpirySweeper {
    /// Starts the sweeper as a background task over `cache`.
    pub fn start(cache: Arc<Cache>, config: SweeperConfig) -> Self {
        let (shutdown_tx, shutdown_rx) = watch::channel(false);

        tokio::spawn(sweeper_loop(cache, config, shutdown_rx));
        info!("expiry sweeper started");

        Self { shutdown_tx }
    }

    /// Stops the sweeper. Called automatically on drop.
    pub fn stop(&self) {
        let _ = self.shutdown_tx.send(true);
        info!("expiry sweeper stopped");
    }
}

impl Drop for ExpirySweeper {
    fn drop(&mut self) {
        self.stop();
    }
}

async fn sweeper_loop(cache: Arc<Cache>, config: SweeperConfig, mut shutdown_rx: watch::Receiver<bool>) {
    let mut current_interval = config.base_interval;

    loop {
        tokio::select! {
            _ = tokio::time::sleep(current_interval) => {}
            result = shutdown_rx.changed() => {
                if result.is_err() || *shutdown_rx.borrow() {
                    debug!(cache = cache.name(), "expiry sweeper received shutdown signal");
                    return;
                }
            }
        }

        let live_before = cache.stats().current_entries;
        let purged = cache.purge_expired();

        if live_before > 0 {
            let expiry_rate = purged as f64 / live_before as f64;

            if expiry_rate > config.speedup_threshold {
                current_interval = (current_interval / 2).max(config.min_interval);
                debug!(
                    cache = cache.name(),
                    purged,
                    rate = %format!("{:.2}%", expiry_rate * 100.0),
                    new_interval_ms = current_interval.as_millis(),
                    "high expiry rate, speeding up sweeper"
                );
            } else if expiry_rate < config.slowdown_threshold && purged == 0 {
                current_interval = (current_interval * 2).min(config.max_interval);
                trace!(
                    cache = cache.name(),
                    new_interval_ms = current_interval.as_millis(),
                    "low expiry rate, slowing down sweeper"
                );
            }
        }

        if purged > 0 {
            debug!(cache = cache.name(), purged, "expired entries reclaimed");
        }
    }
}

/// Starts a sweeper with the default configuration.
pub fn start_expiry_sweeper(cache: Arc<Cache>) -> ExpirySweeper {
    ExpirySweeper::start(cache, SweeperConfig::default())
}

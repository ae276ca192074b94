//! Periodic removal of expired nonces.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::broadcast;
use tokio::task::JoinHandle;

use x470_auth::NonceStore;

use crate::metrics::GateMetrics;

/// Spawn a task that sweeps `store` every `interval` until `shutdown` fires.
pub fn spawn_nonce_sweeper(
    store: Arc<NonceStore>,
    metrics: Arc<GateMetrics>,
    interval: Duration,
    mut shutdown: broadcast::Receiver<()>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(interval);
        // The first tick completes immediately; nothing can have expired yet.
        ticker.tick().await;
        loop {
            tokio::select! {
                biased;
                _ = shutdown.recv() => {
                    tracing::info!("nonce sweeper shutting down");
                    break;
                }
                _ = ticker.tick() => {
                    let removed = store.sweep_expired();
                    metrics.nonces_swept.inc_by(removed as u64);
                    metrics.active_nonces.set(store.len() as i64);
                    tracing::debug!(removed, remaining = store.len(), "swept expired nonces");
                }
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use x470_nullables::{NullClock, NullRandom};

    #[tokio::test(start_paused = true)]
    async fn sweeps_on_tick_and_stops_on_shutdown() {
        let clock = Arc::new(NullClock::new(0));
        let store = Arc::new(NonceStore::new(
            clock.clone(),
            Arc::new(NullRandom::counter()),
            1_000,
            16,
        ));
        store.issue().unwrap();
        store.issue().unwrap();
        clock.set(5_000);

        let metrics = Arc::new(GateMetrics::new().unwrap());
        let (tx, rx) = broadcast::channel(1);
        let handle =
            spawn_nonce_sweeper(store.clone(), metrics.clone(), Duration::from_secs(30), rx);

        tokio::time::sleep(Duration::from_secs(31)).await;
        assert!(store.is_empty());
        assert_eq!(metrics.nonces_swept.get(), 2);
        assert_eq!(metrics.active_nonces.get(), 0);

        tx.send(()).unwrap();
        handle.await.unwrap();
    }
}

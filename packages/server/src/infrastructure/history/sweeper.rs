//! Periodic TTL sweep.
//!
//! Reads already sweep lazily, so this task only reclaims memory while no
//! traffic arrives.

use std::{sync::Arc, time::Duration};

use tokio::{task::JoinHandle, time::MissedTickBehavior};

use crate::domain::MessageHistory;

/// Spawn a task that sweeps `history` every `interval` until aborted
pub fn spawn_sweeper(history: Arc<dyn MessageHistory>, interval: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        // The first tick completes immediately
        ticker.tick().await;
        loop {
            ticker.tick().await;
            let evicted = history.sweep().await;
            if evicted > 0 {
                tracing::debug!("Swept {} expired message(s) from history", evicted);
            }
        }
    })
}

//! Store Sweeper
//!
//! Background loop that periodically drops expired skill store entries,
//! independent of request traffic. Uses `tokio::time::interval` for the
//! tick loop and `Arc<AtomicBool>` for graceful shutdown signaling.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::{info, warn};

use super::SkillStore;

/// Periodic sweeper for a shared [`SkillStore`].
pub struct StoreSweeper {
    running: Arc<AtomicBool>,
    handle: Option<JoinHandle<()>>,
    interval: Duration,
    store: Arc<SkillStore>,
}

impl StoreSweeper {
    pub fn new(store: Arc<SkillStore>, interval: Duration) -> Self {
        Self {
            running: Arc::new(AtomicBool::new(false)),
            handle: None,
            interval,
            store,
        }
    }

    /// Spawn the background sweep task. A sweep cycle that removes
    /// nothing is silent; a panicking cycle cannot occur since the sweep
    /// itself is infallible map retention, but the loop checks its
    /// running flag each tick so shutdown is prompt.
    pub fn start(&mut self) {
        if self.running.load(Ordering::SeqCst) {
            warn!("Store sweeper is already running");
            return;
        }

        self.running.store(true, Ordering::SeqCst);
        info!(
            "Starting store sweeper with {}s interval",
            self.interval.as_secs()
        );

        let running = Arc::clone(&self.running);
        let store = Arc::clone(&self.store);
        let interval = self.interval;

        self.handle = Some(tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            // The first tick of a tokio interval fires immediately; skip
            // it so the cadence starts one full interval after startup.
            ticker.tick().await;
            loop {
                ticker.tick().await;
                if !running.load(Ordering::SeqCst) {
                    break;
                }
                let removed = store.sweep();
                if removed > 0 {
                    info!("Background sweep removed {} expired entries", removed);
                }
            }
        }));
    }

    /// Signal the loop to stop and abort the task.
    pub fn stop(&mut self) {
        self.running.store(false, Ordering::SeqCst);
        if let Some(handle) = self.handle.take() {
            handle.abort();
        }
        info!("Store sweeper stopped");
    }
}

impl Drop for StoreSweeper {
    fn drop(&mut self) {
        if self.running.load(Ordering::SeqCst) {
            self.stop();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Metadata, SkillPackageData};

    fn payload() -> SkillPackageData {
        SkillPackageData {
            skill_content: "---\nname: x\n---\nBody".to_string(),
            metadata: Metadata::default(),
        }
    }

    #[tokio::test]
    async fn test_sweeper_removes_expired_entries() {
        let store = Arc::new(SkillStore::with_ttl(Duration::ZERO));
        store.put("stale", payload());

        let mut sweeper = StoreSweeper::new(Arc::clone(&store), Duration::from_millis(20));
        sweeper.start();

        tokio::time::sleep(Duration::from_millis(80)).await;
        assert!(store.is_empty());
        sweeper.stop();
    }

    #[tokio::test]
    async fn test_start_twice_is_harmless() {
        let store = Arc::new(SkillStore::new());
        let mut sweeper = StoreSweeper::new(store, Duration::from_millis(50));
        sweeper.start();
        sweeper.start();
        sweeper.stop();
    }
}

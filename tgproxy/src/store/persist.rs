/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2026 G3-OSS developers.
 */

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use log::{debug, warn};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

use super::{StoreError, save_snapshot};
use crate::auth::TrustCache;

/// Periodically write the trust cache to the snapshot file
pub struct PersistenceLoop {
    cache: Arc<TrustCache>,
    path: PathBuf,
    interval: Duration,
    last_revision: Option<u64>,
}

impl PersistenceLoop {
    pub fn new(cache: Arc<TrustCache>, path: PathBuf, interval: Duration) -> Self {
        PersistenceLoop {
            cache,
            path,
            interval,
            last_revision: None,
        }
    }

    /// Write the snapshot if the cache changed since the last write, return true if written
    pub async fn flush(&mut self) -> Result<bool, StoreError> {
        let revision = self.cache.revision();
        if self.last_revision == Some(revision) {
            return Ok(false);
        }
        let snapshot = self.cache.snapshot();
        save_snapshot(&self.path, &snapshot).await?;
        self.last_revision = Some(revision);
        Ok(true)
    }

    async fn flush_and_log(&mut self) {
        match self.flush().await {
            Ok(true) => debug!("trust cache saved to {}", self.path.display()),
            Ok(false) => {}
            Err(e) => warn!("failed to save trust cache to {}: {e}", self.path.display()),
        }
    }

    /// Run until the stop signal, with a final flush before return
    pub async fn run(mut self, mut stop_receiver: watch::Receiver<bool>) {
        let mut interval = tokio::time::interval(self.interval);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                biased;

                r = stop_receiver.changed() => {
                    if r.is_err() || *stop_receiver.borrow() {
                        break;
                    }
                }
                _ = interval.tick() => self.flush_and_log().await,
            }
        }

        self.flush_and_log().await;
    }

    pub fn spawn(self) -> PersistenceHandle {
        let (stop_sender, stop_receiver) = watch::channel(false);
        let join_handle = tokio::spawn(self.run(stop_receiver));
        PersistenceHandle {
            stop_sender,
            join_handle,
        }
    }
}

pub struct PersistenceHandle {
    stop_sender: watch::Sender<bool>,
    join_handle: JoinHandle<()>,
}

impl PersistenceHandle {
    /// Stop the loop and wait for the final flush
    pub async fn stop(self) {
        let _ = self.stop_sender.send(true);
        if let Err(e) = self.join_handle.await {
            warn!("persistence task exited abnormally: {e}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::load_snapshot;
    use std::net::{IpAddr, Ipv4Addr};

    fn test_path(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("tgproxy-persist-{name}-{}.json", std::process::id()))
    }

    #[tokio::test]
    async fn flush_on_change() {
        let path = test_path("flush");
        let cache = Arc::new(TrustCache::new());
        let mut persist = PersistenceLoop::new(cache.clone(), path.clone(), Duration::from_secs(1));

        // the first flush always writes
        assert!(persist.flush().await.unwrap());
        assert!(load_snapshot(&path).unwrap().is_empty());
        assert!(!persist.flush().await.unwrap());

        cache.record("alice", IpAddr::V4(Ipv4Addr::new(10, 0, 0, 1)));
        assert!(persist.flush().await.unwrap());
        assert_eq!(load_snapshot(&path).unwrap(), cache.snapshot());
        assert!(!persist.flush().await.unwrap());

        std::fs::remove_file(&path).unwrap();
    }

    #[tokio::test]
    async fn final_flush_on_stop() {
        let path = test_path("stop");
        let cache = Arc::new(TrustCache::new());
        let persist = PersistenceLoop::new(cache.clone(), path.clone(), Duration::from_secs(3600));
        let handle = persist.spawn();

        cache.record("alice", IpAddr::V4(Ipv4Addr::new(10, 0, 0, 1)));
        handle.stop().await;
        assert_eq!(load_snapshot(&path).unwrap(), cache.snapshot());

        std::fs::remove_file(&path).unwrap();
    }

    fn assert_send<T: Send>(_: &T) {}

    #[tokio::test]
    async fn stop_after_ticks() {
        let path = test_path("ticks");
        let cache = Arc::new(TrustCache::new());
        let persist = PersistenceLoop::new(cache.clone(), path.clone(), Duration::from_millis(10));
        let (stop_sender, stop_receiver) = watch::channel(false);
        let run = persist.run(stop_receiver);
        assert_send(&run);
        let join_handle = tokio::spawn(run);

        cache.record("alice", IpAddr::V4(Ipv4Addr::new(10, 0, 0, 1)));
        tokio::time::sleep(Duration::from_millis(200)).await;
        assert_eq!(load_snapshot(&path).unwrap(), cache.snapshot());

        // a false value is not a stop request
        stop_sender.send(false).unwrap();
        tokio::time::sleep(Duration::from_millis(20)).await;
        assert!(!join_handle.is_finished());

        cache.record("bob", IpAddr::V4(Ipv4Addr::new(10, 0, 0, 2)));
        stop_sender.send(true).unwrap();
        join_handle.await.unwrap();
        assert_eq!(load_snapshot(&path).unwrap(), cache.snapshot());

        std::fs::remove_file(&path).unwrap();
    }

    #[tokio::test]
    async fn write_failure_is_not_fatal() {
        let path = std::env::temp_dir()
            .join("tgproxy-no-such-dir")
            .join("store-data.json");
        let cache = Arc::new(TrustCache::new());
        let mut persist = PersistenceLoop::new(cache, path, Duration::from_secs(1));
        assert!(persist.flush().await.is_err());
        // retried on the next tick
        assert!(persist.flush().await.is_err());
    }
}

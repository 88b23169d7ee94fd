//! # Live Watches
//!
//! `watch(query) -> Subscription`: a stream of full result snapshots plus
//! cancellation.
//!
//! ## Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Subscription::spawn                                                    │
//! │       │                                                                 │
//! │       ├── subscribe to ChangeFeed (before first query, no gap)          │
//! │       ▼                                                                 │
//! │  ┌──► run query ──► send snapshot ──► wait for change ──┐               │
//! │  │                                       │              │               │
//! │  │                 own collection / lag ─┘              │               │
//! │  └──────────────────────────────────────────────────────┘               │
//! │                                                                         │
//! │  Stops when: cancel() / drop, receiver gone, or feed closed             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::future::Future;
use tokio::sync::{broadcast, mpsc};
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::error::DbResult;
use crate::feed::{ChangeFeed, Collection};

/// Snapshots buffered per subscription before the watcher waits on the
/// consumer.
const SNAPSHOT_BUFFER: usize = 4;

/// A cancellable live query.
///
/// ## Example
/// ```rust,ignore
/// let mut sub = db.watch_services();
/// while let Some(services) = sub.next().await {
///     println!("{} services", services.len());
/// }
/// ```
#[derive(Debug)]
pub struct Subscription<T> {
    rx: mpsc::Receiver<Vec<T>>,
    task: JoinHandle<()>,
}

impl<T: Send + 'static> Subscription<T> {
    /// Spawns a watcher that re-runs `query` after each change to
    /// `collection`.
    ///
    /// A failed query is logged and skipped; the watcher keeps listening.
    pub(crate) fn spawn<F, Fut>(feed: &ChangeFeed, collection: Collection, query: F) -> Self
    where
        F: Fn() -> Fut + Send + 'static,
        Fut: Future<Output = DbResult<Vec<T>>> + Send + 'static,
    {
        let mut changes = feed.subscribe();
        let (tx, rx) = mpsc::channel(SNAPSHOT_BUFFER);

        let task = tokio::spawn(async move {
            debug!(%collection, "Watch started");

            loop {
                match query().await {
                    Ok(snapshot) => {
                        if tx.send(snapshot).await.is_err() {
                            break;
                        }
                    }
                    Err(e) => warn!(%collection, error = %e, "Watch query failed"),
                }

                let keep_going = tokio::select! {
                    _ = tx.closed() => false,
                    more = wait_for_change(&mut changes, collection) => more,
                };
                if !keep_going {
                    break;
                }
            }

            debug!(%collection, "Watch stopped");
        });

        Subscription { rx, task }
    }
}

impl<T> Subscription<T> {
    /// Next snapshot. `None` once the watch has stopped.
    pub async fn next(&mut self) -> Option<Vec<T>> {
        self.rx.recv().await
    }

    /// Stops the watcher. Dropping the subscription does the same.
    pub fn cancel(self) {}

    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }
}

impl<T> Drop for Subscription<T> {
    fn drop(&mut self) {
        self.task.abort();
    }
}

/// Waits until `collection` changes. Returns false when the feed is gone.
async fn wait_for_change(
    changes: &mut broadcast::Receiver<Collection>,
    collection: Collection,
) -> bool {
    loop {
        match changes.recv().await {
            Ok(changed) if changed == collection => return true,
            Ok(_) => continue,
            Err(broadcast::error::RecvError::Lagged(skipped)) => {
                warn!(%collection, skipped, "Watch lagged, re-querying");
                return true;
            }
            Err(broadcast::error::RecvError::Closed) => return false,
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

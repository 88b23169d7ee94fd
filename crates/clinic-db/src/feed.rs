//! # Change Feed
//!
//! In-process notification of writes, the local stand-in for a hosted
//! store's live queries.
//!
//! ```text
//!   ServiceRepository::save ──┐
//!   TransactionRepository ────┼──► ChangeFeed (broadcast<Collection>)
//!   ExpenseRepository::add ───┘          │
//!                                        ├──► Subscription<Service>
//!                                        ├──► Subscription<Transaction>
//!                                        └──► Subscription<Expense>
//! ```
//!
//! A notification carries only the collection name. Subscribers re-query
//! their own filter, so ordering and lost messages never matter: the next
//! snapshot replaces the previous one.

use std::fmt;
use tokio::sync::broadcast;
use tracing::trace;

/// Capacity of the broadcast ring. A subscriber that falls further behind
/// sees `Lagged` and re-queries.
const FEED_CAPACITY: usize = 64;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Collection {
    Services,
    Transactions,
    Expenses,
}

impl fmt::Display for Collection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Collection::Services => write!(f, "services"),
            Collection::Transactions => write!(f, "transactions"),
            Collection::Expenses => write!(f, "expenses"),
        }
    }
}

/// Cloneable sender side shared by every repository of one [`Database`].
///
/// [`Database`]: crate::Database
#[derive(Debug, Clone)]
pub struct ChangeFeed {
    tx: broadcast::Sender<Collection>,
}

impl ChangeFeed {
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(FEED_CAPACITY);
        ChangeFeed { tx }
    }

    /// Announces a committed write.
    pub fn notify(&self, collection: Collection) {
        // No receivers is normal when nothing is watching.
        let receivers = self.tx.send(collection).unwrap_or(0);
        trace!(%collection, receivers, "Change notified");
    }

    pub fn subscribe(&self) -> broadcast::Receiver<Collection> {
        self.tx.subscribe()
    }
}

impl Default for ChangeFeed {
    fn default() -> Self {
        ChangeFeed::new()
    }
}

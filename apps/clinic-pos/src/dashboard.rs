//! # Live Dashboard
//!
//! A background task that keeps a [`DashboardSnapshot`] current while the
//! catalog, the transaction history or the expense ledger change.
//!
//! ## Data Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  watch_services ──────────┐                                             │
//! │  watch_transactions(win) ─┼──► DashboardAggregator ──► watch::Sender    │
//! │  watch_expenses(win) ─────┘          ▲                       │          │
//! │                                      │                       ▼          │
//! │  DashboardHandle ── SetWindow ───────┘             Option<LiveDashboard>│
//! │                 └── Shutdown                                            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Publishing Rule
//! Nothing is published until all three watches have delivered a snapshot
//! for the current window. Changing the window drops the windowed watches
//! and forgets their snapshots, so a published view never mixes windows.

use tokio::sync::{mpsc, watch};
use tracing::{debug, info};

use clinic_core::{summarize, CatalogCounts, DashboardSnapshot, DateWindow, Expense, Service, Transaction};
use clinic_db::Database;

use crate::error::ApiError;

const COMMAND_BUFFER: usize = 16;

// =============================================================================
// Published View
// =============================================================================

/// A dashboard snapshot together with the window it was computed for.
#[derive(Debug, Clone, PartialEq)]
pub struct LiveDashboard {
    pub window: DateWindow,
    pub snapshot: DashboardSnapshot,
}

// =============================================================================
// Handle
// =============================================================================

#[derive(Debug)]
enum DashboardCommand {
    SetWindow(DateWindow),
    Shutdown,
}

/// Handle for controlling a running [`DashboardAggregator`].
#[derive(Debug, Clone)]
pub struct DashboardHandle {
    cmd_tx: mpsc::Sender<DashboardCommand>,
    views: watch::Receiver<Option<LiveDashboard>>,
}

impl DashboardHandle {
    /// Re-targets the transaction and expense watches.
    pub async fn set_window(&self, window: DateWindow) -> Result<(), ApiError> {
        self.cmd_tx
            .send(DashboardCommand::SetWindow(window))
            .await
            .map_err(|_| ApiError::internal("Dashboard channel closed"))
    }

    /// Stops the aggregator and cancels its watches.
    pub async fn shutdown(&self) -> Result<(), ApiError> {
        self.cmd_tx
            .send(DashboardCommand::Shutdown)
            .await
            .map_err(|_| ApiError::internal("Dashboard channel closed"))
    }

    /// Receiver that observes every published view.
    pub fn subscribe(&self) -> watch::Receiver<Option<LiveDashboard>> {
        self.views.clone()
    }

    /// Latest published view, if any.
    pub fn current(&self) -> Option<LiveDashboard> {
        self.views.borrow().clone()
    }
}

// =============================================================================
// Aggregator
// =============================================================================

/// Latest snapshot from each watch; `None` until the watch first reports.
#[derive(Debug, Default)]
struct Latest {
    counts: Option<CatalogCounts>,
    transactions: Option<Vec<Transaction>>,
    expenses: Option<Vec<Expense>>,
}

impl Latest {
    fn forget_window(&mut self) {
        self.transactions = None;
        self.expenses = None;
    }

    fn summarize(&self, window: &DateWindow) -> Option<DashboardSnapshot> {
        let counts = self.counts?;
        let transactions = self.transactions.as_deref()?;
        let expenses = self.expenses.as_deref()?;
        Some(summarize(counts, transactions, expenses, window.offset()))
    }
}

enum Event {
    Command(Option<DashboardCommand>),
    Services(Vec<Service>),
    Transactions(Vec<Transaction>),
    Expenses(Vec<Expense>),
}

/// Owns the three live watches and folds them into dashboard views.
pub struct DashboardAggregator {
    db: Database,
    window: DateWindow,
}

impl DashboardAggregator {
    pub fn new(db: Database, window: DateWindow) -> Self {
        DashboardAggregator { db, window }
    }

    /// Spawns the aggregator and returns its handle.
    pub fn start(self) -> DashboardHandle {
        let (cmd_tx, cmd_rx) = mpsc::channel(COMMAND_BUFFER);
        let (view_tx, views) = watch::channel(None);

        tokio::spawn(async move {
            self.run(cmd_rx, view_tx).await;
        });

        DashboardHandle { cmd_tx, views }
    }

    async fn run(
        mut self,
        mut cmd_rx: mpsc::Receiver<DashboardCommand>,
        view_tx: watch::Sender<Option<LiveDashboard>>,
    ) {
        info!(window = %self.window, "Dashboard aggregator started");

        let mut services = self.db.watch_services();
        let mut transactions = self.db.watch_transactions(self.window.start(), self.window.end());
        let mut expenses = self.db.watch_expenses(self.window.start(), self.window.end());
        let mut latest = Latest::default();

        loop {
            let event = tokio::select! {
                cmd = cmd_rx.recv() => Event::Command(cmd),
                Some(list) = services.next() => Event::Services(list),
                Some(list) = transactions.next() => Event::Transactions(list),
                Some(list) = expenses.next() => Event::Expenses(list),
            };

            match event {
                Event::Command(Some(DashboardCommand::SetWindow(window))) => {
                    debug!(%window, "Dashboard window changed");
                    self.window = window;
                    transactions = self.db.watch_transactions(window.start(), window.end());
                    expenses = self.db.watch_expenses(window.start(), window.end());
                    latest.forget_window();
                    continue;
                }
                Event::Command(Some(DashboardCommand::Shutdown)) | Event::Command(None) => {
                    info!("Dashboard aggregator shutting down");
                    break;
                }
                Event::Services(list) => latest.counts = Some(CatalogCounts::from_services(&list)),
                Event::Transactions(list) => latest.transactions = Some(list),
                Event::Expenses(list) => latest.expenses = Some(list),
            }

            if let Some(snapshot) = latest.summarize(&self.window) {
                view_tx.send_replace(Some(LiveDashboard {
                    window: self.window,
                    snapshot,
                }));
            }
        }
    }
}

//! # Dashboard Folding
//!
//! Pure reduction of catalog, transaction and expense snapshots into the
//! numbers the dashboard shows.
//!
//! ```text
//!   services ─────────► CatalogCounts ──────────┐
//!   transactions ─┬───► revenue ────────────────┼──► DashboardSnapshot
//!                 └───► points (one per tx) ────┤
//!   expenses ─────────► expense_total ──────────┘
//! ```
//!
//! Catalog counts ignore the date window. Transactions and expenses are
//! expected to be already filtered by the window.

use chrono::{DateTime, FixedOffset, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::money::Money;
use crate::types::{Expense, Service, Transaction};

/// Live catalog counters, independent of the reporting window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct CatalogCounts {
    pub total: usize,
    pub available: usize,
}

impl CatalogCounts {
    pub fn from_services(services: &[Service]) -> Self {
        CatalogCounts {
            total: services.len(),
            available: services.iter().filter(|s| s.available).count(),
        }
    }
}

/// One chart point per transaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct RevenuePoint {
    #[ts(as = "String")]
    pub timestamp: DateTime<Utc>,
    /// Local time label, e.g. `Mar 05 14:30`.
    pub label: String,
    pub amount: Money,
    pub service_label: String,
    pub customer_label: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct DashboardSnapshot {
    pub total_services: usize,
    pub available_services: usize,
    pub revenue: Money,
    pub expense_total: Money,
    /// `revenue - expense_total`; may be negative.
    pub net: Money,
    pub points: Vec<RevenuePoint>,
}

/// Folds the snapshots into a dashboard view.
///
/// Revenue is the sum of transaction totals (after discount).
pub fn summarize(
    counts: CatalogCounts,
    transactions: &[Transaction],
    expenses: &[Expense],
    offset: FixedOffset,
) -> DashboardSnapshot {
    let revenue: Money = transactions.iter().map(Transaction::total).sum();
    let expense_total = Expense::total(expenses);

    let mut points: Vec<RevenuePoint> = transactions
        .iter()
        .map(|tx| RevenuePoint {
            timestamp: tx.finished_at,
            label: tx
                .finished_at
                .with_timezone(&offset)
                .format("%b %d %H:%M")
                .to_string(),
            amount: tx.total(),
            service_label: tx.service_names(),
            customer_label: tx.customer_name.clone(),
        })
        .collect();
    points.sort_by_key(|p| p.timestamp);

    DashboardSnapshot {
        total_services: counts.total,
        available_services: counts.available,
        revenue,
        expense_total,
        net: revenue - expense_total,
        points,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::TransactionLine;
    use chrono::{Duration, TimeZone};

    fn tx(id: &str, total: i64, at: DateTime<Utc>) -> Transaction {
        Transaction {
            id: id.to_string(),
            customer_name: format!("Customer {}", id),
            lines: vec![TransactionLine {
                service_id: "s1".into(),
                service_name: "CBC".into(),
                details: String::new(),
                price_cents: total,
            }],
            subtotal_cents: total,
            discount_bps: 0,
            discount_amount_cents: 0,
            total_cents: total,
            finished_at: at,
        }
    }

    #[test]
    fn test_summarize_totals_and_order() {
        let base = Utc.with_ymd_and_hms(2026, 3, 5, 2, 0, 0).unwrap();
        let txs = vec![tx("b", 30_000, base + Duration::hours(2)), tx("a", 50_000, base)];
        let expenses = vec![Expense {
            id: "e1".into(),
            amount_cents: 10_000,
            note: "Supplies".into(),
            date: base,
        }];
        let offset = FixedOffset::east_opt(8 * 3600).unwrap();

        let snap = summarize(CatalogCounts { total: 3, available: 2 }, &txs, &expenses, offset);

        assert_eq!(snap.revenue, Money::from_pesos(800));
        assert_eq!(snap.expense_total, Money::from_pesos(100));
        assert_eq!(snap.net, Money::from_pesos(700));
        assert_eq!(snap.points[0].customer_label, "Customer a");
        assert_eq!(snap.points[0].label, "Mar 05 10:00");
        assert_eq!(snap.total_services, 3);
    }

    #[test]
    fn test_empty_snapshot() {
        let offset = FixedOffset::east_opt(0).unwrap();
        let snap = summarize(CatalogCounts::default(), &[], &[], offset);
        assert!(snap.revenue.is_zero());
        assert!(snap.points.is_empty());
    }
}

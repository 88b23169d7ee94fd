//! # Dashboard Command
//!
//! One-shot snapshot for a window. The live variant is
//! [`crate::dashboard::DashboardAggregator`].

use tracing::debug;

use clinic_core::{summarize, Capability, DashboardSnapshot, DateWindow};

use crate::error::ApiError;
use crate::state::{DbState, SessionState};

/// Revenue, expenses and chart points for `window`; catalog counters are
/// for the whole catalog regardless of the window.
pub async fn dashboard_snapshot(
    db: &DbState,
    session: &SessionState,
    window: &DateWindow,
) -> Result<DashboardSnapshot, ApiError> {
    session.authorize(Capability::ViewReports)?;
    debug!(%window, "dashboard_snapshot command");

    let db = db.inner();
    let counts = db.services().counts().await?;
    let transactions = db.transactions().list_between(window.start(), window.end()).await?;
    let expenses = db.expenses().list_between(window.start(), window.end()).await?;

    Ok(summarize(counts, &transactions, &expenses, window.offset()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::test_support::{offset, Fixture};
    use chrono::{Duration, Utc};
    use clinic_core::{DiscountRate, ExpenseInput, Money, NewTransaction, TransactionLine, WindowPreset};

    #[tokio::test]
    async fn test_today_snapshot() {
        let fx = Fixture::new().await;
        fx.as_staff();
        fx.service("CBC", "300", true).await;
        fx.service("X-Ray", "450", false).await;

        let line = TransactionLine {
            service_id: "svc".into(),
            service_name: "CBC".into(),
            details: String::new(),
            price_cents: 50_000,
        };
        let request = NewTransaction::new("Ana", vec![line], DiscountRate::from_percent(10.0)).unwrap();
        fx.db.inner().transactions().commit(&request).await.unwrap();

        let draft = ExpenseInput {
            amount: "100".into(),
            note: String::new(),
        }
        .validate()
        .unwrap();
        fx.db.inner().expenses().add(&draft).await.unwrap();

        let window = DateWindow::preset(WindowPreset::Today, Utc::now(), offset());
        let snap = dashboard_snapshot(&fx.db, &fx.session, &window).await.unwrap();

        assert_eq!(snap.total_services, 2);
        assert_eq!(snap.available_services, 1);
        assert_eq!(snap.revenue, Money::from_pesos(450));
        assert_eq!(snap.expense_total, Money::from_pesos(100));
        assert_eq!(snap.net, Money::from_pesos(350));
        assert_eq!(snap.points.len(), 1);
        assert_eq!(snap.points[0].customer_label, "Ana");
    }

    #[tokio::test]
    async fn test_window_excludes_other_days() {
        let fx = Fixture::new().await;
        fx.as_staff();
        let line = TransactionLine {
            service_id: "svc".into(),
            service_name: "CBC".into(),
            details: String::new(),
            price_cents: 50_000,
        };
        let request = NewTransaction::new("Ana", vec![line], DiscountRate::ZERO).unwrap();
        fx.db.inner().transactions().commit(&request).await.unwrap();

        let last_week = Utc::now() - Duration::days(8);
        let window = DateWindow::preset(WindowPreset::Today, last_week, offset());
        let snap = dashboard_snapshot(&fx.db, &fx.session, &window).await.unwrap();

        assert_eq!(snap.revenue, Money::zero());
        assert!(snap.points.is_empty());
    }
}

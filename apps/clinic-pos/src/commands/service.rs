//! # Service Commands
//!
//! Catalog search and maintenance.
//!
//! ## Search Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Operator types "blood", picks "Available only"                         │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  list_services(query: "blood", filter: Available)                       │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  lower(title) LIKE '%blood%' OR lower(details) LIKE '%blood%'           │
//! │  AND available = 1                                                      │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  Vec<Service> ordered by title                                          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Writes need `ManageCatalog`; delete needs `DeleteRecords` (admin only).

use std::time::Instant;
use tracing::{debug, info};

use clinic_core::validation::validate_search_query;
use clinic_core::{AvailabilityFilter, Capability, Service, ServiceInput};

use crate::error::ApiError;
use crate::state::{delete_key, DbState, PendingOps, SessionState};

/// Searches the catalog. An empty query lists everything passing `filter`.
///
/// ## Arguments
/// * `query` - Case-insensitive substring of the title or details
/// * `filter` - All / Available / Unavailable
pub async fn list_services(
    db: &DbState,
    session: &SessionState,
    query: &str,
    filter: AvailabilityFilter,
) -> Result<Vec<Service>, ApiError> {
    session.require()?;
    let start = Instant::now();
    let query = validate_search_query(query)?;

    let services = db.inner().services().search(&query, filter).await?;

    info!(
        elapsed_ms = start.elapsed().as_secs_f64() * 1000.0,
        count = services.len(),
        query = %query,
        "list_services complete"
    );
    Ok(services)
}

/// Gets a single service by id.
pub async fn get_service(db: &DbState, session: &SessionState, id: &str) -> Result<Service, ApiError> {
    session.require()?;
    db.inner()
        .services()
        .get_by_id(id)
        .await?
        .ok_or_else(|| ApiError::not_found("Service", id))
}

/// Creates (`id = None`) or updates a service from form input.
///
/// Title, details and a non-negative price with at most two decimals are
/// required; invalid input is rejected before the store is touched.
pub async fn save_service(
    db: &DbState,
    session: &SessionState,
    id: Option<&str>,
    input: &ServiceInput,
) -> Result<Service, ApiError> {
    session.authorize(Capability::ManageCatalog)?;
    let draft = input.validate()?;

    debug!(id = ?id, title = %draft.title, "save_service command");
    let service = db.inner().services().save(id, &draft).await?;

    info!(id = %service.id, title = %service.title, price = %service.price(), "Service saved");
    Ok(service)
}

pub async fn set_service_available(
    db: &DbState,
    session: &SessionState,
    id: &str,
    available: bool,
) -> Result<Service, ApiError> {
    session.authorize(Capability::ManageCatalog)?;
    Ok(db.inner().services().set_available(id, available).await?)
}

/// Flips availability and returns the updated service.
pub async fn toggle_service(db: &DbState, session: &SessionState, id: &str) -> Result<Service, ApiError> {
    session.authorize(Capability::ManageCatalog)?;
    let service = db.inner().services().toggle_available(id).await?;
    info!(id = %service.id, available = service.available, "Service availability toggled");
    Ok(service)
}

/// Deletes a service. Admin only; refusal leaves the catalog unchanged.
pub async fn delete_service(
    db: &DbState,
    session: &SessionState,
    pending: &PendingOps,
    id: &str,
) -> Result<(), ApiError> {
    let session = session.authorize(Capability::DeleteRecords)?;
    let _guard = pending.try_begin(delete_key(id))?;

    db.inner().services().delete(id).await?;
    info!(id = %id, by = %session.email, "Service deleted");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::test_support::Fixture;
    use crate::error::ErrorCode;

    fn input(title: &str, price: &str) -> ServiceInput {
        ServiceInput {
            title: title.into(),
            details: "Routine".into(),
            price: price.into(),
            available: true,
        }
    }

    #[tokio::test]
    async fn test_requires_login() {
        let fx = Fixture::new().await;
        let err = list_services(&fx.db, &fx.session, "", AvailabilityFilter::All)
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::Unauthenticated);
    }

    #[tokio::test]
    async fn test_save_create_then_update() {
        let fx = Fixture::new().await;
        fx.as_staff();

        let created = save_service(&fx.db, &fx.session, None, &input("CBC", "350"))
            .await
            .unwrap();
        assert_eq!(created.price_cents, 35_000);

        let updated = save_service(&fx.db, &fx.session, Some(&created.id), &input("CBC", "400.50"))
            .await
            .unwrap();
        assert_eq!(updated.id, created.id);
        assert_eq!(updated.price_cents, 40_050);
        assert!(updated.updated_at >= created.updated_at);
    }

    #[tokio::test]
    async fn test_update_keeping_formatted_price() {
        let fx = Fixture::new().await;
        fx.as_staff();

        let created = save_service(&fx.db, &fx.session, None, &input("CBC", "1500.25"))
            .await
            .unwrap();
        let existing = get_service(&fx.db, &fx.session, &created.id).await.unwrap();
        let current_price = existing.price().format_grouped();
        let renamed = ServiceInput {
            title: "Complete Blood Count".into(),
            details: existing.details,
            price: current_price,
            available: existing.available,
        };

        let updated = save_service(&fx.db, &fx.session, Some(&created.id), &renamed)
            .await
            .unwrap();
        assert_eq!(updated.title, "Complete Blood Count");
        assert_eq!(updated.price_cents, 150_025);
    }

    #[tokio::test]
    async fn test_save_rejects_bad_input() {
        let fx = Fixture::new().await;
        fx.as_staff();

        for bad in [
            input("", "350"),
            input("CBC", "abc"),
            input("CBC", "-5"),
            input("CBC", "1.234"),
            input("CBC", "10000000.01"),
        ] {
            let err = save_service(&fx.db, &fx.session, None, &bad).await.unwrap_err();
            assert_eq!(err.code, ErrorCode::ValidationError);
        }
        assert_eq!(fx.db.inner().services().list().await.unwrap().len(), 0);
    }

    #[tokio::test]
    async fn test_search_and_filter() {
        let fx = Fixture::new().await;
        fx.as_staff();
        fx.service("CBC", "350", true).await;
        fx.service("Chest X-Ray", "450", false).await;
        fx.service("Urinalysis", "150", true).await;

        let hits = list_services(&fx.db, &fx.session, "c", AvailabilityFilter::Available)
            .await
            .unwrap();
        let titles: Vec<_> = hits.iter().map(|s| s.title.as_str()).collect();
        assert_eq!(titles, vec!["CBC"]);

        let off = list_services(&fx.db, &fx.session, "", AvailabilityFilter::Unavailable)
            .await
            .unwrap();
        assert_eq!(off.len(), 1);
        assert_eq!(off[0].title, "Chest X-Ray");
    }

    #[tokio::test]
    async fn test_toggle() {
        let fx = Fixture::new().await;
        fx.as_staff();
        let svc = fx.service("ECG", "400", true).await;

        let toggled = toggle_service(&fx.db, &fx.session, &svc.id).await.unwrap();
        assert!(!toggled.available);

        let back = set_service_available(&fx.db, &fx.session, &svc.id, true).await.unwrap();
        assert!(back.available);
    }

    #[tokio::test]
    async fn test_staff_cannot_delete() {
        let fx = Fixture::new().await;
        fx.as_staff();
        let svc = fx.service("ECG", "400", true).await;

        let err = delete_service(&fx.db, &fx.session, &fx.pending, &svc.id)
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::Forbidden);
        assert!(get_service(&fx.db, &fx.session, &svc.id).await.is_ok());
    }

    #[tokio::test]
    async fn test_admin_deletes() {
        let fx = Fixture::new().await;
        fx.as_admin();
        let svc = fx.service("ECG", "400", true).await;

        delete_service(&fx.db, &fx.session, &fx.pending, &svc.id).await.unwrap();
        let err = get_service(&fx.db, &fx.session, &svc.id).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::NotFound);
        assert!(!fx.pending.is_pending(&delete_key(&svc.id)));
    }
}

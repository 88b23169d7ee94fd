//! # Service Repository
//!
//! Catalog persistence: create/update, availability, search and delete.
//!
//! ## Search
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  query "x-ray", filter Available                                        │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  lower(title) LIKE '%x-ray%' ESCAPE '\'                                 │
//! │    OR lower(details) LIKE '%x-ray%' ESCAPE '\'                          │
//! │  AND available = 1                                                      │
//! │  ORDER BY title                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! `%` and `_` typed by the operator are escaped so they match literally.

use chrono::Utc;
use sqlx::SqlitePool;
use tracing::debug;
use uuid::Uuid;

use crate::error::{DbError, DbResult};
use crate::feed::{ChangeFeed, Collection};
use crate::repository::{from_millis, to_millis};
use clinic_core::dashboard::CatalogCounts;
use clinic_core::types::{AvailabilityFilter, Service, ServiceDraft};

/// Row shape of the `services` table.
#[derive(Debug, sqlx::FromRow)]
struct ServiceRow {
    id: String,
    title: String,
    details: String,
    price_cents: i64,
    available: bool,
    created_at_ms: i64,
    updated_at_ms: i64,
}

impl TryFrom<ServiceRow> for Service {
    type Error = DbError;

    fn try_from(row: ServiceRow) -> DbResult<Self> {
        Ok(Service {
            created_at: from_millis("Service", row.created_at_ms)?,
            updated_at: from_millis("Service", row.updated_at_ms)?,
            id: row.id,
            title: row.title,
            details: row.details,
            price_cents: row.price_cents,
            available: row.available,
        })
    }
}

const SELECT_SERVICE: &str = r#"
    SELECT id, title, details, price_cents, available, created_at_ms, updated_at_ms
    FROM services
"#;

/// Repository for catalog operations.
///
/// ## Usage
/// ```rust,ignore
/// let repo = db.services();
/// let created = repo.insert(&draft).await?;
/// let hits = repo.search("cbc", AvailabilityFilter::Available).await?;
/// ```
#[derive(Debug, Clone)]
pub struct ServiceRepository {
    pool: SqlitePool,
    feed: ChangeFeed,
}

impl ServiceRepository {
    pub fn new(pool: SqlitePool, feed: ChangeFeed) -> Self {
        ServiceRepository { pool, feed }
    }

    /// Gets a service by ID.
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<Service>> {
        let row: Option<ServiceRow> = sqlx::query_as(&format!("{SELECT_SERVICE} WHERE id = ?1"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        row.map(Service::try_from).transpose()
    }

    /// All services ordered by title.
    pub async fn list(&self) -> DbResult<Vec<Service>> {
        let rows: Vec<ServiceRow> =
            sqlx::query_as(&format!("{SELECT_SERVICE} ORDER BY title COLLATE NOCASE, id"))
                .fetch_all(&self.pool)
                .await?;

        rows.into_iter().map(Service::try_from).collect()
    }

    /// Case-insensitive substring search over title and details.
    ///
    /// An empty query lists everything that passes the filter.
    pub async fn search(&self, query: &str, filter: AvailabilityFilter) -> DbResult<Vec<Service>> {
        let query = query.trim().to_lowercase();
        debug!(query = %query, ?filter, "Searching services");

        let pattern = format!("%{}%", escape_like(&query));
        let rows: Vec<ServiceRow> = sqlx::query_as(&format!(
            r#"{SELECT_SERVICE}
            WHERE (lower(title) LIKE ?1 ESCAPE '\' OR lower(details) LIKE ?1 ESCAPE '\')
              AND (?2 IS NULL OR available = ?2)
            ORDER BY title COLLATE NOCASE, id"#
        ))
        .bind(&pattern)
        .bind(filter.flag())
        .fetch_all(&self.pool)
        .await?;

        debug!(count = rows.len(), "Search returned services");
        rows.into_iter().map(Service::try_from).collect()
    }

    /// Creates a service from a validated draft.
    pub async fn insert(&self, draft: &ServiceDraft) -> DbResult<Service> {
        let now = from_millis("Service", Utc::now().timestamp_millis())?;
        let service = Service {
            id: Uuid::new_v4().to_string(),
            title: draft.title.clone(),
            details: draft.details.clone(),
            price_cents: draft.price.cents(),
            available: draft.available,
            created_at: now,
            updated_at: now,
        };

        debug!(id = %service.id, title = %service.title, "Inserting service");

        sqlx::query(
            r#"
            INSERT INTO services (
                id, title, details, price_cents, available, created_at_ms, updated_at_ms
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
            "#,
        )
        .bind(&service.id)
        .bind(&service.title)
        .bind(&service.details)
        .bind(service.price_cents)
        .bind(service.available)
        .bind(to_millis(service.created_at))
        .bind(to_millis(service.updated_at))
        .execute(&self.pool)
        .await?;

        self.feed.notify(Collection::Services);
        Ok(service)
    }

    /// Replaces title, details, price and availability of an existing service.
    pub async fn update(&self, id: &str, draft: &ServiceDraft) -> DbResult<Service> {
        debug!(id = %id, "Updating service");
        let now = Utc::now().timestamp_millis();

        let result = sqlx::query(
            r#"
            UPDATE services
            SET title = ?2, details = ?3, price_cents = ?4, available = ?5, updated_at_ms = ?6
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .bind(&draft.title)
        .bind(&draft.details)
        .bind(draft.price.cents())
        .bind(draft.available)
        .bind(now)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Service", id));
        }

        self.feed.notify(Collection::Services);
        self.require(id).await
    }

    /// Insert when `id` is `None`, update otherwise.
    pub async fn save(&self, id: Option<&str>, draft: &ServiceDraft) -> DbResult<Service> {
        match id {
            Some(id) => self.update(id, draft).await,
            None => self.insert(draft).await,
        }
    }

    /// Sets the availability flag.
    pub async fn set_available(&self, id: &str, available: bool) -> DbResult<Service> {
        debug!(id = %id, available, "Setting service availability");

        let result = sqlx::query(
            "UPDATE services SET available = ?2, updated_at_ms = ?3 WHERE id = ?1",
        )
        .bind(id)
        .bind(available)
        .bind(Utc::now().timestamp_millis())
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Service", id));
        }

        self.feed.notify(Collection::Services);
        self.require(id).await
    }

    /// Flips the availability flag in one statement.
    pub async fn toggle_available(&self, id: &str) -> DbResult<Service> {
        debug!(id = %id, "Toggling service availability");

        let result = sqlx::query(
            "UPDATE services SET available = NOT available, updated_at_ms = ?2 WHERE id = ?1",
        )
        .bind(id)
        .bind(Utc::now().timestamp_millis())
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Service", id));
        }

        self.feed.notify(Collection::Services);
        self.require(id).await
    }

    /// Deletes a service. Committed transactions keep their line snapshots.
    pub async fn delete(&self, id: &str) -> DbResult<()> {
        debug!(id = %id, "Deleting service");

        let result = sqlx::query("DELETE FROM services WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Service", id));
        }

        self.feed.notify(Collection::Services);
        Ok(())
    }

    /// Total and available service counts.
    pub async fn counts(&self) -> DbResult<CatalogCounts> {
        let (total, available): (i64, i64) = sqlx::query_as(
            "SELECT COUNT(*), COALESCE(SUM(available), 0) FROM services",
        )
        .fetch_one(&self.pool)
        .await?;

        Ok(CatalogCounts {
            total: usize::try_from(total).unwrap_or_default(),
            available: usize::try_from(available).unwrap_or_default(),
        })
    }

    async fn require(&self, id: &str) -> DbResult<Service> {
        self.get_by_id(id)
            .await?
            .ok_or_else(|| DbError::not_found("Service", id))
    }
}

/// Escapes LIKE wildcards with `\`.
fn escape_like(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        if matches!(c, '%' | '_' | '\\') {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Database, DbConfig};
    use clinic_core::money::Money;

    fn draft(title: &str, details: &str, pesos: i64, available: bool) -> ServiceDraft {
        ServiceDraft {
            title: title.to_string(),
            details: details.to_string(),
            price: Money::from_pesos(pesos),
            available,
        }
    }

    async fn db() -> Database {
        Database::new(DbConfig::in_memory()).await.unwrap()
    }

    #[tokio::test]
    async fn test_insert_and_get() {
        let db = db().await;
        let created = db
            .services()
            .insert(&draft("CBC", "Complete blood count", 500, true))
            .await
            .unwrap();

        let fetched = db.services().get_by_id(&created.id).await.unwrap().unwrap();
        assert_eq!(fetched, created);
        assert_eq!(fetched.price(), Money::from_pesos(500));
    }

    #[tokio::test]
    async fn test_update_missing_is_not_found() {
        let db = db().await;
        let err = db
            .services()
            .update("missing", &draft("CBC", "x", 1, true))
            .await
            .unwrap_err();
        assert!(matches!(err, DbError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_search_filters() {
        let db = db().await;
        let repo = db.services();
        repo.insert(&draft("Chest X-Ray", "PA view", 300, true)).await.unwrap();
        repo.insert(&draft("CBC", "Blood count", 500, false)).await.unwrap();
        repo.insert(&draft("Urinalysis", "Routine 100%", 150, true)).await.unwrap();

        let hits = repo.search("x-ray", AvailabilityFilter::All).await.unwrap();
        assert_eq!(hits.len(), 1);

        let hits = repo.search("BLOOD", AvailabilityFilter::All).await.unwrap();
        assert_eq!(hits.len(), 1);

        let hits = repo.search("", AvailabilityFilter::Available).await.unwrap();
        assert_eq!(hits.len(), 2);

        let hits = repo.search("", AvailabilityFilter::Unavailable).await.unwrap();
        assert_eq!(hits[0].title, "CBC");

        // Literal percent sign, not a wildcard
        let hits = repo.search("100%", AvailabilityFilter::All).await.unwrap();
        assert_eq!(hits.len(), 1);
        let hits = repo.search("%", AvailabilityFilter::All).await.unwrap();
        assert_eq!(hits.len(), 1);
    }

    #[tokio::test]
    async fn test_toggle_and_counts() {
        let db = db().await;
        let repo = db.services();
        let svc = repo.insert(&draft("CBC", "x", 500, true)).await.unwrap();
        repo.insert(&draft("ECG", "x", 800, true)).await.unwrap();

        let toggled = repo.toggle_available(&svc.id).await.unwrap();
        assert!(!toggled.available);

        let counts = repo.counts().await.unwrap();
        assert_eq!(counts, CatalogCounts { total: 2, available: 1 });

        repo.set_available(&svc.id, true).await.unwrap();
        assert_eq!(repo.counts().await.unwrap().available, 2);
    }

    #[tokio::test]
    async fn test_delete() {
        let db = db().await;
        let repo = db.services();
        let svc = repo.insert(&draft("CBC", "x", 500, true)).await.unwrap();

        repo.delete(&svc.id).await.unwrap();
        assert!(repo.get_by_id(&svc.id).await.unwrap().is_none());
        assert!(matches!(
            repo.delete(&svc.id).await,
            Err(DbError::NotFound { .. })
        ));
    }

    #[test]
    fn test_escape_like() {
        assert_eq!(escape_like("a%b_c\\"), "a\\%b\\_c\\\\");
    }
}

//! # Clinic POS Library
//!
//! Application layer of the clinic point-of-sale: state, commands and the
//! live dashboard. The `clinic-pos` binary is a thin CLI over this crate.
//!
//! ## Module Organization
//! ```text
//! clinic_pos/
//! ├── lib.rs          ◄─── You are here (App wiring, tracing)
//! ├── auth.rs         ◄─── Argon2 credential table (Authenticator impl)
//! ├── dashboard.rs    ◄─── Live dashboard aggregator
//! ├── state/
//! │   ├── config.rs   ◄─── Layered configuration
//! │   ├── db.rs       ◄─── Database state wrapper
//! │   ├── cart.rs     ◄─── In-memory cart
//! │   ├── session.rs  ◄─── Current session + pluggable authenticator
//! │   ├── pending.rs  ◄─── Duplicate-submission guard
//! │   └── documents.rs◄─── Renderer + output directory
//! ├── commands/       ◄─── One function per operation
//! └── error.rs        ◄─── API error type for commands
//! ```
//!
//! ## State Management (Multiple State Types)
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  ┌────────────┐ ┌────────────┐ ┌──────────────┐ ┌──────────────────┐    │
//! │  │  DbState   │ │ CartState  │ │ SessionState │ │  DocumentState   │    │
//! │  │ • pool     │ │ • lines    │ │ • session    │ │ • renderer       │    │
//! │  │ • repos    │ │ • customer │ │ • auth impl  │ │ • output dir     │    │
//! │  │ • watches  │ │ • discount │ │              │ │                  │    │
//! │  └────────────┘ └────────────┘ └──────────────┘ └──────────────────┘    │
//! │                                                                         │
//! │  Each command takes only the state it needs. [`App`] just owns one of   │
//! │  each so a caller can hand out references.                              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

pub mod auth;
pub mod commands;
pub mod dashboard;
pub mod error;
pub mod state;

use std::path::Path;
use std::sync::Arc;
use thiserror::Error;
use tracing::info;
use tracing_subscriber::EnvFilter;

use clinic_core::{Authenticator, DateWindow};
use clinic_db::{Database, DbConfig, DbError};
use clinic_receipt::ReceiptRenderer;

use auth::CredentialTable;
use dashboard::{DashboardAggregator, DashboardHandle};
use state::{
    AppConfig, CartState, ConfigError, ConfigState, DbState, DocumentState, PendingOps, SessionState,
};

/// Failures that stop the application from starting.
#[derive(Debug, Error)]
pub enum StartupError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Database error: {0}")]
    Database(#[from] DbError),

    #[error("Cannot create directory {path}: {source}")]
    Directory {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

/// One of each state type, wired from an [`AppConfig`].
#[derive(Debug, Clone)]
pub struct App {
    pub config: ConfigState,
    pub db: DbState,
    pub cart: CartState,
    pub session: SessionState,
    pub pending: PendingOps,
    pub documents: DocumentState,
}

impl App {
    /// Opens the database and loads the renderer.
    ///
    /// ## Startup Sequence
    /// 1. Create the database directory if needed
    /// 2. Connect and bootstrap the schema
    /// 3. Load the letterhead logo (best-effort)
    /// 4. Build the state objects
    pub async fn start(
        config: AppConfig,
        authenticator: Arc<dyn Authenticator>,
    ) -> Result<Self, StartupError> {
        let db_path = config.database_path();
        if let Some(parent) = db_path.parent() {
            ensure_dir(parent).await?;
        }
        info!(db_path = %db_path.display(), "Database path determined");

        let db = Database::new(DbConfig::new(db_path)).await?;
        info!("Database connected and schema ready");

        let renderer = ReceiptRenderer::load(
            config.clinic.letterhead(),
            config.offset(),
            config.clinic.logo_path.as_deref(),
        )
        .await;
        let documents = DocumentState::new(renderer, config.output_dir());

        Ok(App {
            config: ConfigState::new(config),
            db: DbState::new(db),
            cart: CartState::new(),
            session: SessionState::new(authenticator),
            pending: PendingOps::new(),
            documents,
        })
    }

    /// [`App::start`] with the configured accounts as the authenticator.
    pub async fn from_config(config: AppConfig) -> Result<Self, StartupError> {
        let accounts = CredentialTable::new(config.accounts.clone());
        App::start(config, Arc::new(accounts)).await
    }

    /// Starts a live dashboard over this app's database.
    pub fn live_dashboard(&self, window: DateWindow) -> DashboardHandle {
        DashboardAggregator::new(self.db.inner().clone(), window).start()
    }

    pub async fn close(&self) {
        self.db.inner().close().await;
    }
}

async fn ensure_dir(path: &Path) -> Result<(), StartupError> {
    if path.as_os_str().is_empty() {
        return Ok(());
    }
    tokio::fs::create_dir_all(path)
        .await
        .map_err(|source| StartupError::Directory {
            path: path.display().to_string(),
            source,
        })
}

/// Initializes the tracing subscriber for structured logging.
///
/// ## Log Levels
/// - `RUST_LOG=debug` - Show debug messages
/// - `RUST_LOG=clinic=trace` - Show trace for clinic crates only
/// - Default: INFO, DEBUG for clinic crates
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,clinic=debug,sqlx=warn"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::test_support::FixtureAuth;

    #[tokio::test]
    async fn test_start_creates_database_directory() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = AppConfig::default();
        config.storage.database_path = Some(dir.path().join("nested").join("clinic.db"));
        config.storage.output_dir = Some(dir.path().join("docs"));

        let app = App::start(config, Arc::new(FixtureAuth)).await.unwrap();

        assert!(dir.path().join("nested").exists());
        assert_eq!(app.documents.output_dir(), dir.path().join("docs"));
        assert!(!app.documents.renderer().has_logo());
        app.close().await;
    }

    #[tokio::test]
    async fn test_from_config_uses_configured_accounts() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = AppConfig::default();
        config.storage.database_path = Some(dir.path().join("clinic.db"));
        config.accounts.push(state::AccountConfig {
            email: "staff@clinic.ph".into(),
            password_hash: auth::hash_password("secret").unwrap(),
            role: clinic_core::Role::Staff,
        });

        let app = App::from_config(config).await.unwrap();

        assert!(app.session.login("staff@clinic.ph", "wrong").is_err());
        let session = app.session.login("staff@clinic.ph", "secret").unwrap();
        assert_eq!(session.role, clinic_core::Role::Staff);
        app.close().await;
    }
}

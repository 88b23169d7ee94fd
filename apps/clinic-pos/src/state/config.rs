//! # Configuration State
//!
//! Application configuration loaded at startup.
//!
//! ## Configuration Sources
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Configuration Priority                               │
//! │                                                                         │
//! │  1. Environment Variables (highest priority)                           │
//! │     CLINIC_DB_PATH, CLINIC_OUTPUT_DIR, CLINIC_LOGO_PATH,               │
//! │     CLINIC_NAME, CLINIC_UTC_OFFSET_HOURS                               │
//! │                                                                         │
//! │  2. TOML Config File                                                   │
//! │     --config PATH, or clinic.toml in the platform config dir           │
//! │     ~/.config/pos/clinic.toml (Linux)                                  │
//! │                                                                         │
//! │  3. Default Values (lowest priority)                                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration File Format
//! ```toml
//! [clinic]
//! name = "Toledo Doctors & Diagnostic Center"
//! address_lines = ["123 Medical Center Drive", "Toledo, City"]
//! contact = "Contact: (123) 456-7890"
//! logo_path = "/etc/clinic/logo.png"
//!
//! [storage]
//! database_path = "/var/lib/clinic/clinic.db"
//! output_dir = "/var/lib/clinic/documents"
//!
//! [locale]
//! utc_offset_hours = 8
//!
//! [[accounts]]
//! email = "admin@clinic.ph"
//! password_hash = "$argon2id$v=19$m=19456,t=2,p=1$..."
//! role = "admin"
//! ```
//!
//! There are no built-in accounts. Use `clinic-pos hash-password` to produce
//! a `password_hash`.
//!
//! ## Thread Safety
//! Configuration is read-only after initialization, so no lock is needed.

use argon2::PasswordHash;
use chrono::{FixedOffset, Offset, Utc};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info, warn};

use clinic_core::window::offset_from_hours;
use clinic_core::{Role, DEFAULT_UTC_OFFSET_HOURS};
use clinic_receipt::Letterhead;

const CONFIG_FILE_NAME: &str = "clinic.toml";
const DATABASE_FILE_NAME: &str = "clinic.db";
const DOCUMENTS_DIR_NAME: &str = "documents";

// =============================================================================
// Config Error
// =============================================================================

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

pub type ConfigResult<T> = Result<T, ConfigError>;

// =============================================================================
// Sections
// =============================================================================

/// `[clinic]` - identity printed on documents.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClinicSettings {
    pub name: String,
    pub address_lines: Vec<String>,
    pub contact: Option<String>,
    pub receipt_title: String,
    /// Optional logo (PNG or JPEG). A missing or broken file is logged and
    /// documents render without it.
    pub logo_path: Option<PathBuf>,
}

impl Default for ClinicSettings {
    fn default() -> Self {
        let letterhead = Letterhead::default();
        ClinicSettings {
            name: letterhead.name,
            address_lines: letterhead.address_lines,
            contact: letterhead.contact,
            receipt_title: letterhead.receipt_title,
            logo_path: None,
        }
    }
}

impl ClinicSettings {
    pub fn letterhead(&self) -> Letterhead {
        Letterhead {
            name: self.name.clone(),
            address_lines: self.address_lines.clone(),
            contact: self.contact.clone(),
            receipt_title: self.receipt_title.clone(),
        }
    }
}

/// `[storage]` - where the database and generated documents live.
///
/// Unset paths resolve to the platform data directory.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageSettings {
    pub database_path: Option<PathBuf>,
    pub output_dir: Option<PathBuf>,
}

/// `[locale]`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LocaleSettings {
    /// Offset used for day boundaries and printed times. Default +8 (PHT).
    pub utc_offset_hours: i32,
}

impl Default for LocaleSettings {
    fn default() -> Self {
        LocaleSettings {
            utc_offset_hours: DEFAULT_UTC_OFFSET_HOURS,
        }
    }
}

/// One `[[accounts]]` entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountConfig {
    pub email: String,
    /// Argon2 PHC string.
    pub password_hash: String,
    pub role: Role,
}

// =============================================================================
// App Config
// =============================================================================

/// Complete application configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub clinic: ClinicSettings,

    #[serde(default)]
    pub storage: StorageSettings,

    #[serde(default)]
    pub locale: LocaleSettings,

    #[serde(default)]
    pub accounts: Vec<AccountConfig>,
}

impl AppConfig {
    /// Loads configuration from file, environment, and defaults.
    ///
    /// ## Load Order (later overrides earlier)
    /// 1. Default values
    /// 2. Config file (`clinic.toml`)
    /// 3. Environment variables
    ///
    /// An explicit `config_path` that does not exist is an error; a missing
    /// default file just means defaults.
    pub fn load(config_path: Option<PathBuf>) -> ConfigResult<Self> {
        let explicit = config_path.is_some();
        let mut config = match config_path.or_else(Self::default_config_path) {
            Some(path) if path.exists() => {
                info!(?path, "Loading config from file");
                Self::from_file(&path)?
            }
            Some(path) if explicit => {
                return Err(ConfigError::Invalid(format!(
                    "config file not found: {}",
                    path.display()
                )));
            }
            Some(path) => {
                debug!(?path, "Config file not found, using defaults");
                Self::default()
            }
            None => Self::default(),
        };

        config.apply_overrides(|key| std::env::var(key).ok());
        config.validate()?;

        if config.accounts.is_empty() {
            warn!("No accounts configured; nobody will be able to log in");
        }
        Ok(config)
    }

    /// Parses a TOML file without applying overrides.
    pub fn from_file(path: &Path) -> ConfigResult<Self> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml(&contents)
    }

    pub fn from_toml(contents: &str) -> ConfigResult<Self> {
        Ok(toml::from_str(contents)?)
    }

    /// Applies `CLINIC_*` overrides from `lookup` (the environment in
    /// production).
    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(path) = lookup("CLINIC_DB_PATH") {
            debug!(path = %path, "Overriding database path from environment");
            self.storage.database_path = Some(PathBuf::from(path));
        }

        if let Some(dir) = lookup("CLINIC_OUTPUT_DIR") {
            self.storage.output_dir = Some(PathBuf::from(dir));
        }

        if let Some(path) = lookup("CLINIC_LOGO_PATH") {
            self.clinic.logo_path = Some(PathBuf::from(path));
        }

        if let Some(name) = lookup("CLINIC_NAME") {
            self.clinic.name = name;
        }

        if let Some(hours) = lookup("CLINIC_UTC_OFFSET_HOURS") {
            match hours.trim().parse::<i32>() {
                Ok(h) => self.locale.utc_offset_hours = h,
                Err(_) => warn!(value = %hours, "Ignoring non-numeric CLINIC_UTC_OFFSET_HOURS"),
            }
        }
    }

    /// Validates the configuration.
    pub fn validate(&self) -> ConfigResult<()> {
        if self.clinic.name.trim().is_empty() {
            return Err(ConfigError::Invalid("clinic.name must not be empty".into()));
        }

        if offset_from_hours(self.locale.utc_offset_hours).is_none() {
            return Err(ConfigError::Invalid(format!(
                "locale.utc_offset_hours must be within -14..=14, got {}",
                self.locale.utc_offset_hours
            )));
        }

        let mut seen = HashSet::new();
        for account in &self.accounts {
            let email = account.email.trim().to_lowercase();
            if email.is_empty() {
                return Err(ConfigError::Invalid("account email must not be empty".into()));
            }
            if !seen.insert(email) {
                return Err(ConfigError::Invalid(format!(
                    "duplicate account email: {}",
                    account.email
                )));
            }
            if PasswordHash::new(&account.password_hash).is_err() {
                return Err(ConfigError::Invalid(format!(
                    "password_hash for {} is not a valid PHC string",
                    account.email
                )));
            }
        }

        Ok(())
    }

    // =========================================================================
    // Resolved Values
    // =========================================================================

    /// The reporting offset. Validated on load, so this falls back to UTC
    /// only for hand-built invalid configs.
    pub fn offset(&self) -> FixedOffset {
        offset_from_hours(self.locale.utc_offset_hours).unwrap_or_else(|| Utc.fix())
    }

    pub fn database_path(&self) -> PathBuf {
        self.storage
            .database_path
            .clone()
            .unwrap_or_else(|| Self::data_dir().join(DATABASE_FILE_NAME))
    }

    pub fn output_dir(&self) -> PathBuf {
        self.storage
            .output_dir
            .clone()
            .unwrap_or_else(|| Self::data_dir().join(DOCUMENTS_DIR_NAME))
    }

    /// Returns the default config file path.
    fn default_config_path() -> Option<PathBuf> {
        Self::project_dirs().map(|dirs| dirs.config_dir().join(CONFIG_FILE_NAME))
    }

    fn data_dir() -> PathBuf {
        Self::project_dirs()
            .map(|dirs| dirs.data_dir().to_path_buf())
            .unwrap_or_else(|| PathBuf::from("."))
    }

    fn project_dirs() -> Option<ProjectDirs> {
        ProjectDirs::from("ph", "clinic", "pos")
    }
}

// =============================================================================
// Config State
// =============================================================================

/// Read-only configuration shared by commands.
#[derive(Debug, Clone)]
pub struct ConfigState {
    config: AppConfig,
}

impl ConfigState {
    pub fn new(config: AppConfig) -> Self {
        ConfigState { config }
    }

    pub fn inner(&self) -> &AppConfig {
        &self.config
    }

    pub fn offset(&self) -> FixedOffset {
        self.config.offset()
    }
}

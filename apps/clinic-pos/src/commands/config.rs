//! # Config Command
//!
//! Exposes the non-secret part of the configuration. Account hashes are
//! never included.

use serde::Serialize;
use std::path::PathBuf;

use crate::state::{ClinicSettings, ConfigState};

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicConfig {
    pub clinic: ClinicSettings,
    pub utc_offset_hours: i32,
    pub database_path: PathBuf,
    pub output_dir: PathBuf,
    pub account_count: usize,
}

pub fn get_config(config: &ConfigState) -> PublicConfig {
    let inner = config.inner();
    PublicConfig {
        clinic: inner.clinic.clone(),
        utc_offset_hours: inner.locale.utc_offset_hours,
        database_path: inner.database_path(),
        output_dir: inner.output_dir(),
        account_count: inner.accounts.len(),
    }
}

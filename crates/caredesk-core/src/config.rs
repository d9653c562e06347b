//! Application configuration management.
//!
//! This module handles loading and saving the console configuration: the API
//! location, which session storage backend to use, the navigation routes and
//! the last identity used to sign in.
//!
//! Configuration is stored at `~/.config/caredesk/config.json`.

use std::path::PathBuf;

use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::api::client::DEFAULT_REQUEST_TIMEOUT_SECS;
use crate::models::PrincipalKind;

/// Application name used for config/data directory paths
pub const APP_NAME: &str = "caredesk";

/// Config file name
const CONFIG_FILE: &str = "config.json";

/// API used when neither config nor environment names one
pub const DEFAULT_API_BASE_URL: &str = "http://localhost:5000/api";

/// Where sessions are persisted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    /// `session.json` in the data directory
    #[default]
    File,
    /// The OS keychain
    Keyring,
}

/// Navigation targets. Treated as opaque strings by the auth flow.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Routes {
    pub login: String,
    pub user_dashboard: String,
    pub admin_dashboard: String,
}

impl Default for Routes {
    fn default() -> Self {
        Self {
            login: "/login".to_string(),
            user_dashboard: "/dashboard".to_string(),
            admin_dashboard: "/admin/dashboard".to_string(),
        }
    }
}

impl Routes {
    pub fn dashboard_for(&self, kind: PrincipalKind) -> &str {
        match kind {
            PrincipalKind::User => &self.user_dashboard,
            PrincipalKind::Admin => &self.admin_dashboard,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    pub api_url: Option<String>,
    pub request_timeout_secs: Option<u64>,
    #[serde(default)]
    pub storage: StorageBackend,
    #[serde(default)]
    pub routes: Routes,
    pub last_identifier: Option<String>,
    pub last_kind: Option<PrincipalKind>,
}

impl Config {
    pub fn load() -> Result<Self> {
        let path = Self::config_path()?;
        if path.exists() {
            let contents = std::fs::read_to_string(&path)?;
            Ok(serde_json::from_str(&contents)?)
        } else {
            Ok(Self::default())
        }
    }

    pub fn save(&self) -> Result<()> {
        let path = Self::config_path()?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let contents = serde_json::to_string_pretty(self)?;
        std::fs::write(path, contents)?;
        Ok(())
    }

    fn config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not find config directory"))?;
        Ok(config_dir.join(APP_NAME).join(CONFIG_FILE))
    }

    /// Directory for the session file and logs
    pub fn data_dir(&self) -> Result<PathBuf> {
        let data_dir = dirs::data_local_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not find data directory"))?;
        Ok(data_dir.join(APP_NAME))
    }

    pub fn api_base_url(&self) -> &str {
        self.api_url.as_deref().unwrap_or(DEFAULT_API_BASE_URL)
    }

    pub fn request_timeout_secs(&self) -> u64 {
        self.request_timeout_secs.unwrap_or(DEFAULT_REQUEST_TIMEOUT_SECS)
    }

    /// Remember who signed in last so the login form can pre-fill it
    pub fn remember(&mut self, identifier: &str, kind: PrincipalKind) {
        self.last_identifier = Some(identifier.to_string());
        self.last_kind = Some(kind);
    }
}

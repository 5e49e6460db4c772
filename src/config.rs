use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::errors::{SyncError, SyncResult};
use crate::hass::client::DEFAULT_TIMEOUT_SECS;
use crate::perception::types::ScreenPoint;
use crate::storage;
use crate::sync::roster::{Light, LightRoster};
use crate::sync::state::{SyncConfig, SyncMode};

/// Environment variable that overrides `home_assistant.token`.
pub const TOKEN_ENV: &str = "OPENHOME_SYNC_TOKEN";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub home_assistant: HomeAssistantConfig,
    #[serde(default)]
    pub sync: SyncSettings,
    #[serde(default)]
    pub lights: Vec<LightEntry>,
    /// Overrides the default save file location.
    #[serde(default)]
    pub save_path: Option<PathBuf>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HomeAssistantConfig {
    #[serde(default)]
    pub base_url: String,
    /// Long-lived access token (falls back to env var OPENHOME_SYNC_TOKEN).
    #[serde(default)]
    pub token: Option<String>,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for HomeAssistantConfig {
    fn default() -> Self {
        Self {
            base_url: String::new(),
            token: None,
            timeout_secs: default_timeout_secs(),
        }
    }
}

fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SyncSettings {
    #[serde(default)]
    pub mode: SyncMode,
    #[serde(default = "default_interval_ms")]
    pub interval_ms: u64,
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// Monitor to sample; the primary monitor when absent.
    #[serde(default)]
    pub monitor: Option<usize>,
    /// Merge credentials and lamps from the save file at startup.
    #[serde(default = "default_true")]
    pub load_saved: bool,
}

impl Default for SyncSettings {
    fn default() -> Self {
        Self {
            mode: SyncMode::default(),
            interval_ms: default_interval_ms(),
            enabled: true,
            monitor: None,
            load_saved: true,
        }
    }
}

fn default_interval_ms() -> u64 {
    100
}

fn default_true() -> bool {
    true
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LightEntry {
    pub id: String,
    #[serde(default)]
    pub position: Option<ScreenPoint>,
}

impl AppConfig {
    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.sync.interval_ms.max(1))
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.home_assistant.timeout_secs.max(1))
    }

    pub fn save_path(&self) -> PathBuf {
        self.save_path.clone().unwrap_or_else(storage::default_save_path)
    }

    /// Token from the environment if set, else from the file.
    pub fn resolve_token(&self) -> String {
        std::env::var(TOKEN_ENV)
            .ok()
            .filter(|t| !t.trim().is_empty())
            .unwrap_or_else(|| self.home_assistant.token.clone().unwrap_or_default())
    }

    pub fn to_sync_config(&self) -> SyncConfig {
        let lights: LightRoster = self
            .lights
            .iter()
            .map(|e| Light {
                id: e.id.clone(),
                position: e.position,
            })
            .collect();
        SyncConfig {
            base_url: self.home_assistant.base_url.clone(),
            auth_token: self.resolve_token(),
            lights,
            mode: self.sync.mode,
            enabled: self.sync.enabled,
        }
    }
}

fn resolve_config_path() -> SyncResult<PathBuf> {
    if let Ok(exe) = std::env::current_exe() {
        if let Some(parent) = exe.parent() {
            let candidate = parent.join("config.toml");
            if candidate.exists() {
                tracing::debug!(path = %candidate.display(), "config found next to executable");
                return Ok(candidate);
            }
        }
    }

    let cwd = std::env::current_dir()?;
    let candidate = cwd.join("config.toml");
    if candidate.exists() {
        tracing::debug!(path = %candidate.display(), "config found in working directory");
        return Ok(candidate);
    }

    Err(SyncError::Config(
        "config.toml not found next to executable or in working directory".into(),
    ))
}

pub fn load_config() -> SyncResult<AppConfig> {
    let path = resolve_config_path()?;
    load_config_from(&path)
}

pub fn load_config_from(path: &Path) -> SyncResult<AppConfig> {
    let content = std::fs::read_to_string(path)?;
    let config: AppConfig = toml::from_str(&content)?;
    tracing::info!(
        path = %path.display(),
        mode = ?config.sync.mode,
        lights = config.lights.len(),
        "config loaded"
    );
    Ok(config)
}

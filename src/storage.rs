//! Save file for credentials and lamps.
//!
//! Format: `{"credentials": [url, token], "lamps": [entity_id, ...]}` with an
//! optional `"positions": {entity_id: [x, y]}` object. Files without
//! `positions` load fine; those lights start without a position.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::errors::{SyncError, SyncResult};
use crate::perception::types::ScreenPoint;
use crate::sync::roster::{Light, LightRoster};
use crate::sync::state::SyncConfig;

const APP_DIR: &str = "OpenhomeSync";
const SAVE_FILE: &str = "save.dat";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SaveFile {
    /// `[base_url, token]`
    pub credentials: (String, String),
    pub lamps: Vec<String>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub positions: BTreeMap<String, ScreenPoint>,
}

impl SaveFile {
    pub fn from_config(config: &SyncConfig) -> Self {
        let positions = config
            .lights
            .iter()
            .filter_map(|l| Some((l.id.clone(), l.position?)))
            .collect();
        Self {
            credentials: (config.base_url.clone(), config.auth_token.clone()),
            lamps: config.lights.ids(),
            positions,
        }
    }

    pub fn roster(&self) -> LightRoster {
        self.lamps
            .iter()
            .map(|id| Light {
                id: id.clone(),
                position: self.positions.get(id.trim()).copied(),
            })
            .collect()
    }

    /// Replaces credentials and lights of `config`; mode and enabled stay.
    pub fn apply_to(&self, config: &mut SyncConfig) {
        config.base_url = self.credentials.0.clone();
        config.auth_token = self.credentials.1.clone();
        config.lights = self.roster();
    }
}

/// `<config dir>/OpenhomeSync/save.dat`, falling back to the home directory
/// and then the working directory.
pub fn default_save_path() -> PathBuf {
    let base = dirs::config_dir()
        .or_else(dirs::home_dir)
        .unwrap_or_else(|| PathBuf::from("."));
    base.join(APP_DIR).join(SAVE_FILE)
}

pub fn save(path: &Path, file: &SaveFile) -> SyncResult<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let content = serde_json::to_string_pretty(file)?;
    std::fs::write(path, content)?;
    tracing::info!(path = %path.display(), lamps = file.lamps.len(), "save file written");
    Ok(())
}

/// `Ok(None)` when there is no save file yet. Malformed content is an error.
pub fn load(path: &Path) -> SyncResult<Option<SaveFile>> {
    let content = match std::fs::read_to_string(path) {
        Ok(c) => c,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            tracing::debug!(path = %path.display(), "no save file");
            return Ok(None);
        }
        Err(e) => {
            return Err(SyncError::Persistence(format!(
                "failed to read {}: {e}",
                path.display()
            )))
        }
    };
    let file: SaveFile = serde_json::from_str(&content)?;
    tracing::info!(path = %path.display(), lamps = file.lamps.len(), "save file loaded");
    Ok(Some(file))
}

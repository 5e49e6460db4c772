pub mod config;
pub mod errors;
pub mod hass;
pub mod perception;
pub mod placement;
pub mod storage;
pub mod sync;

#[cfg(test)]
mod test_support;

use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::config::AppConfig;
use crate::errors::{SyncError, SyncResult};
use crate::hass::HassClient;
use crate::perception::DesktopScreen;
use crate::sync::{SyncCommand, SyncConfig, SyncEngine};

/// Handle front-ends use to send configuration changes into the sync loop.
#[derive(Debug, Clone)]
pub struct SyncHandle {
    pub tx: mpsc::Sender<SyncCommand>,
}

impl SyncHandle {
    pub async fn send(&self, cmd: SyncCommand) -> SyncResult<()> {
        self.tx.send(cmd).await.map_err(|_| SyncError::Stopped)
    }
}

/// Fills whatever the config file left empty from the save file.
fn merge_saved(config: &AppConfig, sync_config: &mut SyncConfig) -> SyncResult<()> {
    let path = config.save_path();
    let Some(saved) = storage::load(&path)? else {
        return Ok(());
    };

    if sync_config.base_url.trim().is_empty() {
        sync_config.base_url = saved.credentials.0.clone();
    }
    if sync_config.auth_token.trim().is_empty() {
        sync_config.auth_token = saved.credentials.1.clone();
    }
    if sync_config.lights.is_empty() {
        sync_config.lights = saved.roster();
    }
    Ok(())
}

pub async fn run() -> SyncResult<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    // Load .env file if present (ignore error if not found)
    let _ = dotenvy::dotenv();

    let app_config = match config::load_config() {
        Ok(cfg) => cfg,
        Err(e) => {
            tracing::warn!(error = %e, "no usable config.toml; using defaults");
            AppConfig::default()
        }
    };

    let mut sync_config = app_config.to_sync_config();
    if app_config.sync.load_saved {
        merge_saved(&app_config, &mut sync_config)?;
    }

    if !sync_config.is_ready() {
        tracing::warn!(
            has_url = !sync_config.base_url.is_empty(),
            has_token = !sync_config.auth_token.is_empty(),
            lights = sync_config.lights.len(),
            "sync is not configured; ticks will be skipped"
        );
    }

    let (command_tx, command_rx) = mpsc::channel::<SyncCommand>(32);
    let handle = SyncHandle { tx: command_tx };

    let mut engine = SyncEngine::new(
        sync_config,
        Arc::new(DesktopScreen::new(app_config.sync.monitor)),
        Arc::new(HassClient::new(app_config.request_timeout())),
        command_rx,
        app_config.tick_interval(),
        app_config.save_path(),
    );

    tracing::info!("spawning sync engine task");
    let engine_task = tokio::spawn(async move {
        engine.run_loop().await;
    });

    tokio::signal::ctrl_c().await?;
    tracing::info!("interrupt received, turning lights off");
    handle.send(SyncCommand::Shutdown).await?;

    join_engine(engine_task).await
}

/// Waits for the engine task; a panicked or cancelled task counts as stopped.
async fn join_engine(task: JoinHandle<()>) -> SyncResult<()> {
    task.await.map_err(|e| {
        tracing::error!(error = %e, "sync task ended abnormally");
        SyncError::Stopped
    })
}

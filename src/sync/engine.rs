use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use rand::rngs::StdRng;
use rand::SeedableRng;
use tokio::sync::mpsc;
use tokio::time::MissedTickBehavior;

use crate::hass::LightSink;
use crate::perception::traits::ScreenSource;
use crate::placement::map_marker_to_screen;
use crate::storage::{self, SaveFile};
use crate::sync::driver::ColorSyncDriver;
use crate::sync::roster::Light;
use crate::sync::state::{SyncCommand, SyncConfig, TickOutcome};

/// Periodic sync task.
///
/// Owns the config and the driver. Commands are applied between ticks, and
/// a tick always runs to completion before the next one starts.
pub struct SyncEngine {
    config: SyncConfig,
    driver: ColorSyncDriver,
    screen: Arc<dyn ScreenSource>,
    sink: Arc<dyn LightSink>,
    command_rx: mpsc::Receiver<SyncCommand>,
    interval: Duration,
    save_path: PathBuf,
    rng: StdRng,
}

impl SyncEngine {
    pub fn new(
        config: SyncConfig,
        screen: Arc<dyn ScreenSource>,
        sink: Arc<dyn LightSink>,
        command_rx: mpsc::Receiver<SyncCommand>,
        interval: Duration,
        save_path: PathBuf,
    ) -> Self {
        Self {
            config,
            driver: ColorSyncDriver::new(),
            screen,
            sink,
            command_rx,
            interval,
            save_path,
            rng: StdRng::from_entropy(),
        }
    }

    pub fn config(&self) -> &SyncConfig {
        &self.config
    }

    pub fn lamps_on(&self) -> bool {
        self.driver.lamps_on()
    }

    pub async fn run_loop(&mut self) {
        let mut ticker = tokio::time::interval(self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        tracing::info!(
            interval_ms = self.interval.as_millis() as u64,
            mode = ?self.config.mode,
            lights = self.config.lights.len(),
            "sync loop started"
        );

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    self.tick().await;
                }
                cmd = self.command_rx.recv() => match cmd {
                    Some(SyncCommand::Shutdown) | None => {
                        self.shutdown().await;
                        break;
                    }
                    Some(cmd) => self.apply(cmd),
                },
            }
        }

        tracing::info!("sync loop exited");
    }

    /// Runs one sync cycle.
    pub async fn tick(&mut self) -> TickOutcome {
        let outcome = self
            .driver
            .tick(&self.config, self.screen.as_ref(), self.sink.as_ref())
            .await;

        if let Some(meta) = self.driver.last_meta() {
            let placed = self.config.lights.place_stray(meta, &mut self.rng);
            if placed > 0 {
                tracing::info!(
                    placed,
                    width = meta.physical_width,
                    height = meta.physical_height,
                    "placed lights without an on-screen position at random"
                );
            }
        }
        outcome
    }

    /// Applies a configuration change. Never called while a tick is running.
    ///
    /// `Shutdown` only disables sync here; `run_loop` intercepts it to run
    /// the last tick and stop.
    pub fn apply(&mut self, cmd: SyncCommand) {
        tracing::debug!(command = ?cmd, "applying command");
        match cmd {
            SyncCommand::SetCredentials { base_url, token } => {
                self.config.base_url = base_url;
                self.config.auth_token = token;
            }
            SyncCommand::AddLight(id) => {
                if !self.config.lights.add(Light::new(id.as_str())) {
                    tracing::warn!(id = %id, "light id blank or already configured");
                }
            }
            SyncCommand::RemoveLight(id) => {
                if self.config.lights.remove(&id).is_none() {
                    tracing::warn!(id = %id, "no such light");
                }
            }
            SyncCommand::MoveLight { id, position } => {
                if !self.config.lights.set_position(&id, position) {
                    tracing::warn!(id = %id, "no such light");
                }
            }
            SyncCommand::DropMarker { id, marker, image_rect } => {
                match map_marker_to_screen(marker, Some(image_rect), self.driver.last_meta()) {
                    Some(position) => {
                        tracing::debug!(id = %id, x = position.x, y = position.y, "marker mapped");
                        if !self.config.lights.set_position(&id, position) {
                            tracing::warn!(id = %id, "no such light");
                        }
                    }
                    None => tracing::debug!(id = %id, "no screenshot to map marker against"),
                }
            }
            SyncCommand::SetMode(mode) => {
                tracing::info!(?mode, "mode changed");
                self.config.mode = mode;
            }
            SyncCommand::SetEnabled(enabled) => {
                tracing::info!(enabled, "sync toggled");
                self.config.enabled = enabled;
            }
            SyncCommand::Save => {
                if let Err(e) = storage::save(&self.save_path, &SaveFile::from_config(&self.config)) {
                    tracing::error!(error = %e, "failed to write save file");
                }
            }
            SyncCommand::Load => match storage::load(&self.save_path) {
                Ok(Some(file)) => file.apply_to(&mut self.config),
                Ok(None) => {}
                Err(e) => tracing::error!(error = %e, "failed to load save file"),
            },
            // The final off tick and loop exit belong to `run_loop`.
            SyncCommand::Shutdown => {
                self.config.enabled = false;
            }
        }
    }

    /// Disables sync and gives the lights one chance to turn off.
    async fn shutdown(&mut self) {
        self.config.enabled = false;
        let outcome = self.tick().await;
        tracing::info!(?outcome, "shutdown tick");
    }
}

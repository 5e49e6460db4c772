use std::fmt;

use serde::{Deserialize, Serialize};

use crate::hass::Endpoint;
use crate::perception::types::ScreenPoint;
use crate::placement::Rect;
use crate::sync::roster::LightRoster;

/// Where light colors come from. Exactly one mode is active.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SyncMode {
    /// Each light mirrors the pixel at its own position.
    #[default]
    #[serde(alias = "screen")]
    ScreenRegion,
    /// All lights show the mean of four quadrant samples.
    #[serde(alias = "average")]
    ScreenAverage,
    /// All lights show the pixel under the mouse cursor.
    #[serde(alias = "crazy")]
    CursorFollow,
}

impl SyncMode {
    /// Fade duration sent with every color update, in seconds.
    pub fn transition_secs(self) -> f32 {
        match self {
            SyncMode::ScreenRegion => 0.5,
            SyncMode::ScreenAverage => 1.0,
            SyncMode::CursorFollow => 0.2,
        }
    }
}

/// Everything a tick needs to know. Only mutated between ticks.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SyncConfig {
    pub base_url: String,
    pub auth_token: String,
    pub lights: LightRoster,
    pub mode: SyncMode,
    pub enabled: bool,
}

impl SyncConfig {
    /// Credentials present and at least one light configured.
    pub fn is_ready(&self) -> bool {
        !self.base_url.trim().is_empty() && !self.auth_token.trim().is_empty() && !self.lights.is_empty()
    }

    pub fn endpoint(&self) -> Endpoint<'_> {
        Endpoint {
            base_url: self.base_url.trim(),
            token: self.auth_token.trim(),
        }
    }
}

/// Whether the last cycle left the lights on. One flag for all lights of a
/// driver: a light added after the off request was acknowledged is not
/// tracked separately.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LampRuntimeState {
    pub lamps_on: bool,
}

/// Configuration changes sent to a running engine.
///
/// `Debug` never prints the access token.
#[derive(Clone, PartialEq)]
pub enum SyncCommand {
    SetCredentials { base_url: String, token: String },
    AddLight(String),
    RemoveLight(String),
    /// Sets a light's screen pixel directly.
    MoveLight { id: String, position: ScreenPoint },
    /// A marker was dropped on the preview; map it through the last capture.
    DropMarker { id: String, marker: Rect, image_rect: Rect },
    SetMode(SyncMode),
    SetEnabled(bool),
    Save,
    Load,
    /// Disable sync, turn the lights off once, and stop the loop.
    Shutdown,
}

impl fmt::Debug for SyncCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SetCredentials { base_url, .. } => f
                .debug_struct("SetCredentials")
                .field("base_url", base_url)
                .field("token", &"<redacted>")
                .finish(),
            Self::AddLight(id) => f.debug_tuple("AddLight").field(id).finish(),
            Self::RemoveLight(id) => f.debug_tuple("RemoveLight").field(id).finish(),
            Self::MoveLight { id, position } => f
                .debug_struct("MoveLight")
                .field("id", id)
                .field("position", position)
                .finish(),
            Self::DropMarker { id, marker, image_rect } => f
                .debug_struct("DropMarker")
                .field("id", id)
                .field("marker", marker)
                .field("image_rect", image_rect)
                .finish(),
            Self::SetMode(mode) => f.debug_tuple("SetMode").field(mode).finish(),
            Self::SetEnabled(enabled) => f.debug_tuple("SetEnabled").field(enabled).finish(),
            Self::Save => f.write_str("Save"),
            Self::Load => f.write_str("Load"),
            Self::Shutdown => f.write_str("Shutdown"),
        }
    }
}

/// What a single tick did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// Missing credentials or no lights.
    Skipped,
    /// Sync disabled and the lights are already off.
    Idle,
    /// Sync enabled but no frame could be captured.
    NoFrame,
    /// Color updates were sent to this many lights.
    Pushed { lights: usize },
    /// The off request was acknowledged.
    TurnedOff,
    /// The off request failed or was not acknowledged; retried next tick.
    OffPending,
}

use serde::{Deserialize, Serialize};

use crate::perception::types::Rgb;

/// Where to send requests and how to authenticate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Endpoint<'a> {
    /// e.g. `https://homeassistant.local:8123`
    pub base_url: &'a str,
    /// Long-lived access token, sent as a bearer token.
    pub token: &'a str,
}

impl Endpoint<'_> {
    pub fn service_url(&self, service: &str) -> String {
        format!(
            "{}/api/services/light/{}",
            self.base_url.trim_end_matches('/'),
            service
        )
    }
}

/// Body of `light.turn_on`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TurnOnPayload {
    pub entity_id: String,
    pub rgb_color: Rgb,
    pub brightness: u8,
    /// Fade duration in seconds.
    pub transition: f32,
}

/// Body of `light.turn_off`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TurnOffPayload {
    pub entity_id: Vec<String>,
}

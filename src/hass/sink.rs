use async_trait::async_trait;

use crate::errors::SyncResult;
use crate::hass::types::{Endpoint, TurnOnPayload};

/// Anything that can receive light state changes.
#[async_trait]
pub trait LightSink: Send + Sync {
    async fn turn_on(&self, endpoint: Endpoint<'_>, payload: &TurnOnPayload) -> SyncResult<()>;

    /// Turns every listed light off. Returns `true` only when the server
    /// acknowledged with an empty change set (`[]`).
    async fn turn_off(&self, endpoint: Endpoint<'_>, entity_ids: &[String]) -> SyncResult<bool>;
}

use std::time::Duration;

use async_trait::async_trait;
use serde::Serialize;

use crate::errors::{SyncError, SyncResult};
use crate::hass::sink::LightSink;
use crate::hass::types::{Endpoint, TurnOffPayload, TurnOnPayload};

pub const DEFAULT_TIMEOUT_SECS: u64 = 5;

/// Body Home Assistant returns from `light.turn_off` when nothing is left on.
const EMPTY_CHANGE_SET: &str = "[]";

/// Home Assistant REST client for the `light` domain.
///
/// Holds no credentials: every call takes an [`Endpoint`], so changing the
/// URL or token between ticks needs no rebuild.
#[derive(Debug, Clone)]
pub struct HassClient {
    http: reqwest::Client,
}

impl HassClient {
    pub fn new(timeout: Duration) -> Self {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());
        Self { http }
    }

    #[must_use]
    pub fn with_http_client(mut self, http: reqwest::Client) -> Self {
        self.http = http;
        self
    }

    async fn call<T: Serialize + ?Sized>(
        &self,
        endpoint: Endpoint<'_>,
        service: &str,
        body: &T,
    ) -> SyncResult<String> {
        let url = endpoint.service_url(service);
        let response = self
            .http
            .post(&url)
            .bearer_auth(endpoint.token)
            .json(body)
            .send()
            .await?;

        let status = response.status();
        let text = response.text().await.unwrap_or_default();
        if !status.is_success() {
            return Err(SyncError::HomeAssistant(format!("{service}: {status}: {text}")));
        }
        Ok(text)
    }
}

impl Default for HassClient {
    fn default() -> Self {
        Self::new(Duration::from_secs(DEFAULT_TIMEOUT_SECS))
    }
}

#[async_trait]
impl LightSink for HassClient {
    async fn turn_on(&self, endpoint: Endpoint<'_>, payload: &TurnOnPayload) -> SyncResult<()> {
        self.call(endpoint, "turn_on", payload).await?;
        Ok(())
    }

    async fn turn_off(&self, endpoint: Endpoint<'_>, entity_ids: &[String]) -> SyncResult<bool> {
        let payload = TurnOffPayload {
            entity_id: entity_ids.to_vec(),
        };
        let body = self.call(endpoint, "turn_off", &payload).await?;
        tracing::debug!(body = %body, "turn_off response");
        Ok(body == EMPTY_CHANGE_SET)
    }
}

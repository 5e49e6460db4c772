//! Shared fakes for unit tests.

use std::sync::Mutex;

use async_trait::async_trait;
use image::{Rgba, RgbaImage};

use crate::errors::{SyncError, SyncResult};
use crate::hass::{Endpoint, LightSink, TurnOnPayload};
use crate::perception::screenshot::Frame;
use crate::perception::types::{Rgb, ScreenPoint};

#[derive(Debug, Clone, PartialEq)]
pub enum SinkCall {
    On(TurnOnPayload),
    Off(Vec<String>),
}

/// Records every call instead of talking to Home Assistant.
#[derive(Debug)]
pub struct RecordingSink {
    calls: Mutex<Vec<SinkCall>>,
    /// What `turn_off` answers; `None` simulates a network failure.
    pub off_ack: Option<bool>,
    pub fail_turn_on: bool,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            off_ack: Some(true),
            fail_turn_on: false,
        }
    }

    pub fn calls(&self) -> Vec<SinkCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn turn_on_calls(&self) -> Vec<TurnOnPayload> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                SinkCall::On(p) => Some(p),
                SinkCall::Off(_) => None,
            })
            .collect()
    }

    pub fn turn_off_count(&self) -> usize {
        self.calls()
            .iter()
            .filter(|c| matches!(c, SinkCall::Off(_)))
            .count()
    }

    pub fn clear(&self) {
        self.calls.lock().unwrap().clear();
    }
}

#[async_trait]
impl LightSink for RecordingSink {
    async fn turn_on(&self, _endpoint: Endpoint<'_>, payload: &TurnOnPayload) -> SyncResult<()> {
        self.calls.lock().unwrap().push(SinkCall::On(payload.clone()));
        if self.fail_turn_on {
            return Err(SyncError::HomeAssistant("turn_on: 500".into()));
        }
        Ok(())
    }

    async fn turn_off(&self, _endpoint: Endpoint<'_>, entity_ids: &[String]) -> SyncResult<bool> {
        self.calls.lock().unwrap().push(SinkCall::Off(entity_ids.to_vec()));
        self.off_ack
            .ok_or_else(|| SyncError::HomeAssistant("turn_off: connection refused".into()))
    }
}

/// A `w`x`h` frame filled with `fill`, with selected pixels painted.
pub fn frame_with(w: u32, h: u32, fill: Rgb, pixels: &[(ScreenPoint, Rgb)]) -> Frame {
    let mut img = RgbaImage::from_pixel(w, h, Rgba([fill.r, fill.g, fill.b, 255]));
    for (p, c) in pixels {
        img.put_pixel(p.x as u32, p.y as u32, Rgba([c.r, c.g, c.b, 255]));
    }
    Frame::from_image(img)
}

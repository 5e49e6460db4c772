use crate::hass::{LightSink, TurnOnPayload};
use crate::perception::screenshot::Frame;
use crate::perception::traits::ScreenSource;
use crate::perception::types::{Rgb, ScreenshotMeta};
use crate::sync::sampling::{average_color, cursor_color, region_colors};
use crate::sync::state::{LampRuntimeState, SyncConfig, SyncMode, TickOutcome};

pub const FULL_BRIGHTNESS: u8 = 255;

/// Turns one tick's worth of screen pixels into light updates.
///
/// Request failures are logged and dropped; nothing here returns an error.
#[derive(Debug, Default)]
pub struct ColorSyncDriver {
    state: LampRuntimeState,
    last_meta: Option<ScreenshotMeta>,
}

impl ColorSyncDriver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lamps_on(&self) -> bool {
        self.state.lamps_on
    }

    /// Metadata of the most recent successful capture.
    pub fn last_meta(&self) -> Option<&ScreenshotMeta> {
        self.last_meta.as_ref()
    }

    pub async fn tick(
        &mut self,
        config: &SyncConfig,
        screen: &dyn ScreenSource,
        sink: &dyn LightSink,
    ) -> TickOutcome {
        if !config.is_ready() {
            return TickOutcome::Skipped;
        }

        if !config.enabled {
            if !self.state.lamps_on {
                return TickOutcome::Idle;
            }
            return self.turn_off(config, sink).await;
        }

        self.state.lamps_on = true;

        let frame = match screen.capture().await {
            Ok(frame) => frame,
            Err(e) => {
                tracing::warn!(error = %e, "capture failed, skipping tick");
                return TickOutcome::NoFrame;
            }
        };
        self.last_meta = Some(frame.meta.clone());

        let targets = match config.mode {
            SyncMode::ScreenRegion => region_colors(&config.lights, &frame),
            SyncMode::ScreenAverage => broadcast(config, average_color(&frame)),
            SyncMode::CursorFollow => {
                let color = self.sample_cursor(screen, &frame).await;
                broadcast(config, color)
            }
        };

        let transition = config.mode.transition_secs();
        let endpoint = config.endpoint();
        for (entity_id, color) in &targets {
            let payload = TurnOnPayload {
                entity_id: entity_id.clone(),
                rgb_color: *color,
                brightness: FULL_BRIGHTNESS,
                transition,
            };
            if let Err(e) = sink.turn_on(endpoint, &payload).await {
                tracing::debug!(entity = %entity_id, error = %e, "turn_on failed, ignoring");
            }
        }

        tracing::trace!(mode = ?config.mode, lights = targets.len(), "tick pushed");
        TickOutcome::Pushed {
            lights: targets.len(),
        }
    }

    async fn sample_cursor(&self, screen: &dyn ScreenSource, frame: &Frame) -> Option<Rgb> {
        match screen.cursor_position().await {
            Ok(cursor) => cursor_color(frame, cursor),
            Err(e) => {
                tracing::warn!(error = %e, "cursor position unavailable");
                None
            }
        }
    }

    async fn turn_off(&mut self, config: &SyncConfig, sink: &dyn LightSink) -> TickOutcome {
        let ids = config.lights.ids();
        match sink.turn_off(config.endpoint(), &ids).await {
            Ok(true) => {
                self.state.lamps_on = false;
                tracing::info!(lights = ids.len(), "lights turned off");
                TickOutcome::TurnedOff
            }
            Ok(false) => {
                tracing::debug!("turn_off not acknowledged, will retry");
                TickOutcome::OffPending
            }
            Err(e) => {
                tracing::debug!(error = %e, "turn_off failed, will retry");
                TickOutcome::OffPending
            }
        }
    }
}

/// Same color for every light; nothing when there is no color.
fn broadcast(config: &SyncConfig, color: Option<Rgb>) -> Vec<(String, Rgb)> {
    match color {
        Some(c) => config.lights.iter().map(|l| (l.id.clone(), c)).collect(),
        None => Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;

    use crate::errors::{SyncError, SyncResult};
    use crate::perception::traits::StaticScreen;
    use crate::perception::types::ScreenPoint;
    use crate::sync::roster::{Light, LightRoster};
    use crate::test_support::{frame_with, RecordingSink, SinkCall};

    const BLACK: Rgb = Rgb::new(0, 0, 0);

    fn config(lights: &[Light], mode: SyncMode) -> SyncConfig {
        SyncConfig {
            base_url: "http://ha:8123".into(),
            auth_token: "token".into(),
            lights: lights.iter().cloned().collect::<LightRoster>(),
            mode,
            enabled: true,
        }
    }

    fn rgb_screen() -> StaticScreen {
        StaticScreen::new(frame_with(
            64,
            64,
            BLACK,
            &[
                (ScreenPoint::new(10, 10), Rgb::new(255, 0, 0)),
                (ScreenPoint::new(20, 20), Rgb::new(0, 255, 0)),
                (ScreenPoint::new(30, 30), Rgb::new(0, 0, 255)),
            ],
        ))
    }

    fn three_lights() -> Vec<Light> {
        vec![
            Light::at("light.a", ScreenPoint::new(10, 10)),
            Light::at("light.b", ScreenPoint::new(20, 20)),
            Light::at("light.c", ScreenPoint::new(30, 30)),
        ]
    }

    #[tokio::test]
    async fn test_screen_region_sends_each_lights_pixel() {
        let cfg = config(&three_lights(), SyncMode::ScreenRegion);
        let sink = RecordingSink::new();
        let mut driver = ColorSyncDriver::new();

        let outcome = driver.tick(&cfg, &rgb_screen(), &sink).await;
        assert_eq!(outcome, TickOutcome::Pushed { lights: 3 });
        assert!(driver.lamps_on());

        let calls = sink.turn_on_calls();
        let expected = [
            ("light.a", Rgb::new(255, 0, 0)),
            ("light.b", Rgb::new(0, 255, 0)),
            ("light.c", Rgb::new(0, 0, 255)),
        ];
        assert_eq!(calls.len(), 3);
        for (call, (id, color)) in calls.iter().zip(expected) {
            assert_eq!(call.entity_id, id);
            assert_eq!(call.rgb_color, color);
            assert_eq!(call.brightness, 255);
            assert_eq!(call.transition, 0.5);
        }
    }

    #[tokio::test]
    async fn test_cursor_follow_applies_cursor_pixel_to_all() {
        let cfg = config(&three_lights(), SyncMode::CursorFollow);
        let screen = rgb_screen().with_cursor(ScreenPoint::new(20, 20));
        let sink = RecordingSink::new();
        let mut driver = ColorSyncDriver::new();

        driver.tick(&cfg, &screen, &sink).await;

        let calls = sink.turn_on_calls();
        assert_eq!(calls.len(), 3);
        assert!(calls.iter().all(|c| c.rgb_color == Rgb::new(0, 255, 0) && c.transition == 0.2));
    }

    #[tokio::test]
    async fn test_cursor_off_monitor_sends_nothing() {
        let cfg = config(&three_lights(), SyncMode::CursorFollow);
        let screen = rgb_screen().with_cursor(ScreenPoint::new(5000, 20));
        let sink = RecordingSink::new();
        let mut driver = ColorSyncDriver::new();

        assert_eq!(driver.tick(&cfg, &screen, &sink).await, TickOutcome::Pushed { lights: 0 });
        assert!(sink.calls().is_empty());
    }

    #[tokio::test]
    async fn test_screen_average_applies_mean_to_all() {
        let lights = [Light::new("light.a"), Light::new("light.b")];
        let cfg = config(&lights, SyncMode::ScreenAverage);
        let screen = StaticScreen::new(frame_with(
            8,
            8,
            BLACK,
            &[
                (ScreenPoint::new(2, 2), Rgb::new(255, 0, 0)),
                (ScreenPoint::new(6, 2), Rgb::new(0, 255, 0)),
                (ScreenPoint::new(2, 6), Rgb::new(0, 0, 255)),
                (ScreenPoint::new(6, 6), Rgb::new(255, 255, 255)),
            ],
        ));
        let sink = RecordingSink::new();
        let mut driver = ColorSyncDriver::new();

        driver.tick(&cfg, &screen, &sink).await;

        let calls = sink.turn_on_calls();
        assert_eq!(calls.len(), 2);
        assert!(calls.iter().all(|c| c.rgb_color == Rgb::new(128, 128, 128) && c.transition == 1.0));
    }

    #[tokio::test]
    async fn test_empty_light_list_never_calls() {
        let sink = RecordingSink::new();
        let mut driver = ColorSyncDriver::new();
        for mode in [SyncMode::ScreenRegion, SyncMode::ScreenAverage, SyncMode::CursorFollow] {
            for enabled in [true, false] {
                let mut cfg = config(&[], mode);
                cfg.enabled = enabled;
                assert_eq!(driver.tick(&cfg, &rgb_screen(), &sink).await, TickOutcome::Skipped);
            }
        }
        assert!(sink.calls().is_empty());
        assert!(!driver.lamps_on());
    }

    #[tokio::test]
    async fn test_missing_credentials_skip() {
        let mut cfg = config(&three_lights(), SyncMode::ScreenRegion);
        cfg.auth_token.clear();
        let sink = RecordingSink::new();
        let mut driver = ColorSyncDriver::new();
        assert_eq!(driver.tick(&cfg, &rgb_screen(), &sink).await, TickOutcome::Skipped);
        assert!(sink.calls().is_empty());
    }

    #[tokio::test]
    async fn test_disable_turns_off_exactly_once() {
        let mut cfg = config(&three_lights(), SyncMode::ScreenRegion);
        let sink = RecordingSink::new();
        let mut driver = ColorSyncDriver::new();
        driver.tick(&cfg, &rgb_screen(), &sink).await;
        sink.clear();

        cfg.enabled = false;
        assert_eq!(driver.tick(&cfg, &rgb_screen(), &sink).await, TickOutcome::TurnedOff);
        assert_eq!(driver.tick(&cfg, &rgb_screen(), &sink).await, TickOutcome::Idle);
        assert_eq!(driver.tick(&cfg, &rgb_screen(), &sink).await, TickOutcome::Idle);

        assert_eq!(
            sink.calls(),
            vec![SinkCall::Off(vec!["light.a".into(), "light.b".into(), "light.c".into()])]
        );
        assert!(!driver.lamps_on());
    }

    #[tokio::test]
    async fn test_unacknowledged_off_is_retried() {
        let mut cfg = config(&three_lights(), SyncMode::ScreenRegion);
        let mut sink = RecordingSink::new();
        sink.off_ack = None;
        let mut driver = ColorSyncDriver::new();
        driver.tick(&cfg, &rgb_screen(), &sink).await;

        cfg.enabled = false;
        assert_eq!(driver.tick(&cfg, &rgb_screen(), &sink).await, TickOutcome::OffPending);
        assert_eq!(driver.tick(&cfg, &rgb_screen(), &sink).await, TickOutcome::OffPending);
        assert_eq!(sink.turn_off_count(), 2);
        assert!(driver.lamps_on());
    }

    #[tokio::test]
    async fn test_never_enabled_does_not_turn_off() {
        let mut cfg = config(&three_lights(), SyncMode::ScreenRegion);
        cfg.enabled = false;
        let sink = RecordingSink::new();
        let mut driver = ColorSyncDriver::new();
        assert_eq!(driver.tick(&cfg, &rgb_screen(), &sink).await, TickOutcome::Idle);
        assert!(sink.calls().is_empty());
    }

    #[tokio::test]
    async fn test_failed_turn_on_is_ignored() {
        let cfg = config(&three_lights(), SyncMode::ScreenRegion);
        let mut sink = RecordingSink::new();
        sink.fail_turn_on = true;
        let mut driver = ColorSyncDriver::new();
        assert_eq!(driver.tick(&cfg, &rgb_screen(), &sink).await, TickOutcome::Pushed { lights: 3 });
        assert_eq!(sink.turn_on_calls().len(), 3);
    }

    struct BrokenScreen;

    #[async_trait]
    impl ScreenSource for BrokenScreen {
        async fn capture(&self) -> SyncResult<Frame> {
            Err(SyncError::Capture("no display".into()))
        }

        async fn cursor_position(&self) -> SyncResult<ScreenPoint> {
            Err(SyncError::Input("no display".into()))
        }
    }

    #[tokio::test]
    async fn test_capture_failure_skips_tick() {
        let cfg = config(&three_lights(), SyncMode::ScreenRegion);
        let sink = RecordingSink::new();
        let mut driver = ColorSyncDriver::new();
        assert_eq!(driver.tick(&cfg, &BrokenScreen, &sink).await, TickOutcome::NoFrame);
        assert!(sink.calls().is_empty());
        assert!(driver.last_meta().is_none());
    }
}

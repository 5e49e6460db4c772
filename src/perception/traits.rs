use async_trait::async_trait;

use crate::errors::{SyncError, SyncResult};
use crate::perception::cursor::cursor_location;
use crate::perception::screenshot::{capture_monitor, Frame};
use crate::perception::types::ScreenPoint;

/// Where the sync driver gets its pixels from.
/// The real implementation grabs the desktop; tests use [`StaticScreen`].
#[async_trait]
pub trait ScreenSource: Send + Sync {
    async fn capture(&self) -> SyncResult<Frame>;

    /// Cursor position in global desktop coordinates.
    async fn cursor_position(&self) -> SyncResult<ScreenPoint>;
}

/// Desktop capture through `xcap`, cursor through `enigo`.
#[derive(Debug, Clone, Default)]
pub struct DesktopScreen {
    /// `None` selects the primary monitor.
    pub monitor_index: Option<usize>,
}

impl DesktopScreen {
    pub fn new(monitor_index: Option<usize>) -> Self {
        Self { monitor_index }
    }
}

#[async_trait]
impl ScreenSource for DesktopScreen {
    async fn capture(&self) -> SyncResult<Frame> {
        let index = self.monitor_index;
        tokio::task::spawn_blocking(move || capture_monitor(index))
            .await
            .map_err(|e| SyncError::Capture(format!("join: {e}")))?
    }

    async fn cursor_position(&self) -> SyncResult<ScreenPoint> {
        tokio::task::spawn_blocking(cursor_location)
            .await
            .map_err(|e| SyncError::Input(format!("join: {e}")))?
    }
}

/// A fixed frame and cursor, for dry runs without a display.
#[derive(Debug, Clone)]
pub struct StaticScreen {
    pub frame: Frame,
    pub cursor: ScreenPoint,
}

impl StaticScreen {
    pub fn new(frame: Frame) -> Self {
        Self {
            frame,
            cursor: ScreenPoint::new(0, 0),
        }
    }

    pub fn with_cursor(mut self, cursor: ScreenPoint) -> Self {
        self.cursor = cursor;
        self
    }
}

#[async_trait]
impl ScreenSource for StaticScreen {
    async fn capture(&self) -> SyncResult<Frame> {
        Ok(self.frame.clone())
    }

    async fn cursor_position(&self) -> SyncResult<ScreenPoint> {
        Ok(self.cursor)
    }
}

use image::RgbaImage;

use crate::errors::{SyncError, SyncResult};
use crate::perception::types::{Rgb, ScreenPoint, ScreenshotMeta};

/// One captured monitor image in physical pixels.
#[derive(Debug, Clone)]
pub struct Frame {
    image: RgbaImage,
    pub meta: ScreenshotMeta,
    /// Top-left corner of the monitor in global desktop coordinates.
    pub origin: ScreenPoint,
}

impl Frame {
    pub fn new(image: RgbaImage, monitor_index: u32, scale_factor: f64, origin: ScreenPoint) -> Self {
        let (w, h) = image.dimensions();
        Self {
            meta: ScreenshotMeta::from_physical(monitor_index, w, h, scale_factor),
            image,
            origin,
        }
    }

    /// Frame of a single monitor at the desktop origin with no DPI scaling.
    pub fn from_image(image: RgbaImage) -> Self {
        Self::new(image, 0, 1.0, ScreenPoint::new(0, 0))
    }

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    /// Color at a monitor-relative coordinate; `None` outside the frame.
    pub fn pixel(&self, at: ScreenPoint) -> Option<Rgb> {
        let x = u32::try_from(at.x).ok()?;
        let y = u32::try_from(at.y).ok()?;
        self.image
            .get_pixel_checked(x, y)
            .map(|p| Rgb::new(p[0], p[1], p[2]))
    }

    /// Converts a global desktop coordinate (as reported for the cursor)
    /// into a coordinate relative to this frame.
    pub fn to_local(&self, global: ScreenPoint) -> ScreenPoint {
        ScreenPoint::new(global.x - self.origin.x, global.y - self.origin.y)
    }
}

/// Captures the monitor at `monitor_index`, or the primary monitor when `None`.
/// Blocking: call from `spawn_blocking`.
pub fn capture_monitor(monitor_index: Option<usize>) -> SyncResult<Frame> {
    let monitors = xcap::Monitor::all()
        .map_err(|e| SyncError::Capture(format!("failed to enumerate monitors: {e}")))?;

    let index = monitor_index
        .unwrap_or_else(|| monitors.iter().position(|m| m.is_primary()).unwrap_or(0));
    let monitor = monitors
        .into_iter()
        .nth(index)
        .ok_or_else(|| SyncError::Capture(format!("monitor {index} not found")))?;

    let image = monitor
        .capture_image()
        .map_err(|e| SyncError::Capture(format!("screen capture failed: {e}")))?;

    if image.width() == 0 || image.height() == 0 {
        return Err(SyncError::Capture(
            "captured an empty screenshot (missing screen recording permission?)".into(),
        ));
    }

    let frame = Frame::new(
        image,
        index as u32,
        monitor.scale_factor() as f64,
        ScreenPoint::new(monitor.x(), monitor.y()),
    );
    tracing::trace!(
        monitor = index,
        width = frame.meta.physical_width,
        height = frame.meta.physical_height,
        scale = frame.meta.scale_factor,
        "monitor captured"
    );
    Ok(frame)
}

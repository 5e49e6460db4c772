use serde::{Deserialize, Serialize};

/// An 8-bit RGB color as Home Assistant expects it in `rgb_color`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "[u8; 3]", into = "[u8; 3]")]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }
}

impl From<[u8; 3]> for Rgb {
    fn from([r, g, b]: [u8; 3]) -> Self {
        Self { r, g, b }
    }
}

impl From<Rgb> for [u8; 3] {
    fn from(c: Rgb) -> Self {
        [c.r, c.g, c.b]
    }
}

/// A pixel coordinate on the captured monitor, relative to its top-left corner.
/// Serialized as `[x, y]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "(i32, i32)", into = "(i32, i32)")]
pub struct ScreenPoint {
    pub x: i32,
    pub y: i32,
}

impl ScreenPoint {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

impl From<(i32, i32)> for ScreenPoint {
    fn from((x, y): (i32, i32)) -> Self {
        Self { x, y }
    }
}

impl From<ScreenPoint> for (i32, i32) {
    fn from(p: ScreenPoint) -> Self {
        (p.x, p.y)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScreenshotMeta {
    pub monitor_index: u32,
    pub scale_factor: f64,
    pub physical_width: u32,
    pub physical_height: u32,
    pub logical_width: u32,
    pub logical_height: u32,
}

impl ScreenshotMeta {
    /// Builds the metadata of a screenshot whose logical size is known,
    /// e.g. the size a preview widget reports before DPI scaling.
    pub fn from_logical(monitor_index: u32, logical_width: u32, logical_height: u32, scale_factor: f64) -> Self {
        let scale = if scale_factor > 0.0 { scale_factor } else { 1.0 };
        Self {
            monitor_index,
            scale_factor: scale,
            physical_width: (logical_width as f64 * scale).round() as u32,
            physical_height: (logical_height as f64 * scale).round() as u32,
            logical_width,
            logical_height,
        }
    }

    /// Builds the metadata of a captured image, which is always in physical pixels.
    pub fn from_physical(monitor_index: u32, physical_width: u32, physical_height: u32, scale_factor: f64) -> Self {
        let scale = if scale_factor > 0.0 { scale_factor } else { 1.0 };
        Self {
            monitor_index,
            scale_factor: scale,
            physical_width,
            physical_height,
            logical_width: (physical_width as f64 / scale).round() as u32,
            logical_height: (physical_height as f64 / scale).round() as u32,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.physical_width == 0 || self.physical_height == 0
    }
}

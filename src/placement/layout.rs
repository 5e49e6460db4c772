//! Preview layout helpers: fitting the screenshot into the canvas and keeping
//! lamp markers inside the displayed image.

use rand::Rng;

use crate::perception::types::{ScreenPoint, ScreenshotMeta};
use crate::placement::{Rect, Size};

/// Scales `image` to fit `canvas` keeping its aspect ratio, centred.
/// Returns the rectangle the image occupies in canvas coordinates.
pub fn fit_preview(canvas: Size, image: Size) -> Option<Rect> {
    if canvas.width <= 0 || canvas.height <= 0 || image.width <= 0 || image.height <= 0 {
        return None;
    }

    let (cw, ch) = (canvas.width as i64, canvas.height as i64);
    let (iw, ih) = (image.width as i64, image.height as i64);

    let width_at_full_height = ch * iw / ih;
    let (w, h) = if width_at_full_height <= cw {
        (width_at_full_height, ch)
    } else {
        (cw, cw * ih / iw)
    };

    Some(Rect::new(
        ((cw - w) / 2) as i32,
        ((ch - h) / 2) as i32,
        w.max(1) as i32,
        h.max(1) as i32,
    ))
}

/// Keeps a marker whose top-left corner would land on `origin` fully inside
/// `bounds`. A marker larger than `bounds` is pinned to the bounds' origin.
pub fn clamp_marker(origin: (i32, i32), marker: Size, bounds: Rect) -> (i32, i32) {
    let max_x = bounds.x + bounds.width - marker.width;
    let max_y = bounds.y + bounds.height - marker.height;
    (
        origin.0.min(max_x).max(bounds.x),
        origin.1.min(max_y).max(bounds.y),
    )
}

/// Uniformly random top-left corner that keeps the marker inside `bounds`.
pub fn random_marker_origin<R: Rng + ?Sized>(bounds: Rect, marker: Size, rng: &mut R) -> (i32, i32) {
    let max_x = (bounds.x + bounds.width - marker.width).max(bounds.x);
    let max_y = (bounds.y + bounds.height - marker.height).max(bounds.y);
    (
        rng.gen_range(bounds.x..=max_x),
        rng.gen_range(bounds.y..=max_y),
    )
}

/// Uniformly random pixel of the captured screenshot. Used to give lights
/// without a stored position a starting point.
pub fn random_screen_point<R: Rng + ?Sized>(meta: &ScreenshotMeta, rng: &mut R) -> Option<ScreenPoint> {
    if meta.is_empty() {
        return None;
    }
    Some(ScreenPoint::new(
        rng.gen_range(0..meta.physical_width) as i32,
        rng.gen_range(0..meta.physical_height) as i32,
    ))
}

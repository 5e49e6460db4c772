//! Marker-to-screen mapping.
//!
//! The preview shows a scaled copy of the screenshot inside a canvas. A lamp
//! marker dropped on the preview is mapped back to a physical pixel of the
//! captured monitor by taking the marker's center relative to the displayed
//! image, clamping it to the image, and scaling by the screenshot's physical
//! resolution.

use crate::perception::types::{ScreenPoint, ScreenshotMeta};
use crate::placement::Rect;

/// Maps the center of `marker` (canvas coordinates) to a screen pixel.
///
/// Returns `None` when no mapping exists: no screenshot yet, an empty
/// preview image, or an empty screenshot. The caller skips the light then.
pub fn map_marker_to_screen(
    marker: Rect,
    image_rect: Option<Rect>,
    meta: Option<&ScreenshotMeta>,
) -> Option<ScreenPoint> {
    let image_rect = image_rect?;
    let meta = meta?;
    if image_rect.is_empty() || meta.is_empty() {
        return None;
    }

    let (cx, cy) = marker.center();
    let rel_x = ((cx - image_rect.x as f64) / image_rect.width as f64).clamp(0.0, 1.0);
    let rel_y = ((cy - image_rect.y as f64) / image_rect.height as f64).clamp(0.0, 1.0);

    Some(ScreenPoint::new(
        scale_axis(rel_x, meta.physical_width),
        scale_axis(rel_y, meta.physical_height),
    ))
}

/// `rel` in [0, 1] to a pixel index in [0, extent).
fn scale_axis(rel: f64, extent: u32) -> i32 {
    let max = extent.saturating_sub(1) as f64;
    (rel * extent as f64).round().min(max) as i32
}

#[cfg(test)]
mod tests {
    use super::*;

    fn meta(w: u32, h: u32) -> ScreenshotMeta {
        ScreenshotMeta::from_physical(0, w, h, 1.0)
    }

    #[test]
    fn test_center_maps_to_center() {
        // 30x60 marker centred on the middle of a 400x225 image at (50, 20)
        let marker = Rect::new(50 + 200 - 15, 20 + 112 - 30, 30, 60);
        let image = Rect::new(50, 20, 400, 225);
        let p = map_marker_to_screen(marker, Some(image), Some(&meta(1920, 1080))).unwrap();
        assert_eq!(p, ScreenPoint::new(960, 538));
    }

    #[test]
    fn test_scale_factor_uses_physical_resolution() {
        let image = Rect::new(0, 0, 100, 100);
        let marker = Rect::new(35, 35, 30, 30); // center (50, 50)
        let hidpi = ScreenshotMeta::from_logical(0, 1000, 500, 2.0);
        let p = map_marker_to_screen(marker, Some(image), Some(&hidpi)).unwrap();
        assert_eq!(p, ScreenPoint::new(1000, 500));
    }

    #[test]
    fn test_out_of_image_is_clamped_inside_screenshot() {
        let image = Rect::new(100, 100, 200, 100);
        let m = meta(640, 360);

        let far_right = Rect::new(900, 900, 30, 60);
        assert_eq!(
            map_marker_to_screen(far_right, Some(image), Some(&m)),
            Some(ScreenPoint::new(639, 359))
        );

        let far_left = Rect::new(-500, -500, 30, 60);
        assert_eq!(
            map_marker_to_screen(far_left, Some(image), Some(&m)),
            Some(ScreenPoint::new(0, 0))
        );
    }

    #[test]
    fn test_output_always_within_screenshot() {
        let image = Rect::new(13, 7, 333, 187);
        for (w, h) in [(1u32, 1u32), (7, 3), (1920, 1080), (2561, 1441)] {
            let m = meta(w, h);
            for x in (-50..450).step_by(17) {
                for y in (-50..300).step_by(13) {
                    let p = map_marker_to_screen(Rect::new(x, y, 30, 60), Some(image), Some(&m))
                        .unwrap();
                    assert!(p.x >= 0 && (p.x as u32) < w, "x {} out of 0..{}", p.x, w);
                    assert!(p.y >= 0 && (p.y as u32) < h, "y {} out of 0..{}", p.y, h);
                }
            }
        }
    }

    #[test]
    fn test_no_mapping_without_preview_or_screenshot() {
        let marker = Rect::new(0, 0, 30, 60);
        let image = Rect::new(0, 0, 100, 100);
        let m = meta(100, 100);

        assert_eq!(map_marker_to_screen(marker, None, Some(&m)), None);
        assert_eq!(map_marker_to_screen(marker, Some(image), None), None);
        assert_eq!(map_marker_to_screen(marker, Some(Rect::new(0, 0, 0, 100)), Some(&m)), None);
        assert_eq!(map_marker_to_screen(marker, Some(image), Some(&meta(0, 0))), None);
    }
}

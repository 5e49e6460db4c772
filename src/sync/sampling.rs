//! Per-mode color sampling.

use crate::perception::screenshot::Frame;
use crate::perception::types::{Rgb, ScreenPoint};
use crate::sync::roster::LightRoster;

/// Centers of the four screen quadrants, in reading order.
pub fn quadrant_points(width: u32, height: u32) -> [ScreenPoint; 4] {
    let (w, h) = (width as i32, height as i32);
    [
        ScreenPoint::new(w / 4, h / 4),
        ScreenPoint::new(3 * w / 4, h / 4),
        ScreenPoint::new(w / 4, 3 * h / 4),
        ScreenPoint::new(3 * w / 4, 3 * h / 4),
    ]
}

/// Per-channel arithmetic mean, rounded half to even. `None` for no samples.
pub fn mean_rgb(samples: &[Rgb]) -> Option<Rgb> {
    if samples.is_empty() {
        return None;
    }
    let n = samples.len() as u32;
    let (mut r, mut g, mut b) = (0u32, 0u32, 0u32);
    for c in samples {
        r += c.r as u32;
        g += c.g as u32;
        b += c.b as u32;
    }
    Some(Rgb::new(
        round_half_even(r, n) as u8,
        round_half_even(g, n) as u8,
        round_half_even(b, n) as u8,
    ))
}

fn round_half_even(sum: u32, n: u32) -> u32 {
    let (q, r) = (sum / n, sum % n);
    match (2 * r).cmp(&n) {
        std::cmp::Ordering::Less => q,
        std::cmp::Ordering::Greater => q + 1,
        std::cmp::Ordering::Equal => q + (q & 1),
    }
}

/// Mean color of the four quadrant centers of the frame.
pub fn average_color(frame: &Frame) -> Option<Rgb> {
    let samples: Vec<Rgb> = quadrant_points(frame.width(), frame.height())
        .into_iter()
        .filter_map(|p| frame.pixel(p))
        .collect();
    if samples.len() != 4 {
        return None;
    }
    mean_rgb(&samples)
}

/// Color under each light's position. Lights without a position, or whose
/// position is outside the frame, are left out.
pub fn region_colors(lights: &LightRoster, frame: &Frame) -> Vec<(String, Rgb)> {
    lights
        .iter()
        .filter_map(|light| {
            let color = frame.pixel(light.position?)?;
            Some((light.id.clone(), color))
        })
        .collect()
}

/// Color under the cursor; `None` if the cursor is on another monitor.
pub fn cursor_color(frame: &Frame, cursor: ScreenPoint) -> Option<Rgb> {
    frame.pixel(frame.to_local(cursor))
}

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::perception::types::{ScreenPoint, ScreenshotMeta};
use crate::placement::random_screen_point;

/// One configured light: its Home Assistant entity id and the screen pixel
/// it mirrors in region mode.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Light {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<ScreenPoint>,
}

impl Light {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            position: None,
        }
    }

    pub fn at(id: impl Into<String>, position: ScreenPoint) -> Self {
        Self {
            id: id.into(),
            position: Some(position),
        }
    }
}

/// Ordered list of lights. Ids are trimmed, non-empty and unique, and every
/// id travels together with its position.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LightRoster {
    lights: Vec<Light>,
}

impl LightRoster {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a light. Returns `false` (and changes nothing) when the id is
    /// blank or already present.
    pub fn add(&mut self, light: Light) -> bool {
        let id = light.id.trim();
        if id.is_empty() || self.contains(id) {
            return false;
        }
        self.lights.push(Light {
            id: id.to_string(),
            position: light.position,
        });
        true
    }

    pub fn remove(&mut self, id: &str) -> Option<Light> {
        let idx = self.lights.iter().position(|l| l.id == id.trim())?;
        Some(self.lights.remove(idx))
    }

    /// Returns `false` when no light has this id.
    pub fn set_position(&mut self, id: &str, position: ScreenPoint) -> bool {
        match self.lights.iter_mut().find(|l| l.id == id.trim()) {
            Some(light) => {
                light.position = Some(position);
                true
            }
            None => false,
        }
    }

    /// Gives every light without a position, or with one outside the
    /// screen described by `meta`, a random pixel of that screen.
    /// Returns how many lights were placed.
    pub fn place_stray<R: Rng + ?Sized>(&mut self, meta: &ScreenshotMeta, rng: &mut R) -> usize {
        let mut placed = 0;
        let stray = |l: &&mut Light| !l.position.is_some_and(|p| on_screen(p, meta));
        for light in self.lights.iter_mut().filter(stray) {
            light.position = random_screen_point(meta, rng);
            if light.position.is_some() {
                placed += 1;
            }
        }
        placed
    }

    pub fn contains(&self, id: &str) -> bool {
        self.get(id).is_some()
    }

    pub fn get(&self, id: &str) -> Option<&Light> {
        self.lights.iter().find(|l| l.id == id.trim())
    }

    pub fn ids(&self) -> Vec<String> {
        self.lights.iter().map(|l| l.id.clone()).collect()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Light> {
        self.lights.iter()
    }

    pub fn len(&self) -> usize {
        self.lights.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lights.is_empty()
    }
}

fn on_screen(p: ScreenPoint, meta: &ScreenshotMeta) -> bool {
    u32::try_from(p.x).is_ok_and(|x| x < meta.physical_width)
        && u32::try_from(p.y).is_ok_and(|y| y < meta.physical_height)
}

impl FromIterator<Light> for LightRoster {
    fn from_iter<I: IntoIterator<Item = Light>>(iter: I) -> Self {
        let mut roster = LightRoster::new();
        for light in iter {
            roster.add(light);
        }
        roster
    }
}

impl<'a> IntoIterator for &'a LightRoster {
    type Item = &'a Light;
    type IntoIter = std::slice::Iter<'a, Light>;

    fn into_iter(self) -> Self::IntoIter {
        self.lights.iter()
    }
}

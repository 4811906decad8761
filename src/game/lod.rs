use serde::{Deserialize, Serialize};

use crate::game::constants::lod::{FULL_DISTANCE, MINIMAL_DISTANCE, REDUCED_DISTANCE};

/// Rendering/update fidelity tier
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[repr(u8)]
pub enum LodLevel {
    Full = 0,
    Reduced = 1,
    Minimal = 2,
    #[default]
    Culled = 3,
}

impl LodLevel {
    /// Entities at this level take part in AI decisions
    #[inline]
    pub fn updates_ai(self) -> bool {
        self != LodLevel::Culled
    }

    /// Entities at this level run skeletal animation
    #[inline]
    pub fn animates(self) -> bool {
        matches!(self, LodLevel::Full | LodLevel::Reduced)
    }
}

/// Distance bands for LOD selection
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LodThresholds {
    pub full: f32,
    pub reduced: f32,
    pub minimal: f32,
}

impl Default for LodThresholds {
    fn default() -> Self {
        Self {
            full: FULL_DISTANCE,
            reduced: REDUCED_DISTANCE,
            minimal: MINIMAL_DISTANCE,
        }
    }
}

impl LodThresholds {
    /// Pick a level from camera distance and frustum membership.
    /// Outside the frustum is always culled.
    pub fn select(&self, distance: f32, in_frustum: bool) -> LodLevel {
        if !in_frustum || !distance.is_finite() {
            LodLevel::Culled
        } else if distance < self.full {
            LodLevel::Full
        } else if distance < self.reduced {
            LodLevel::Reduced
        } else if distance < self.minimal {
            LodLevel::Minimal
        } else {
            LodLevel::Culled
        }
    }

    /// Clamp the culling distance to a graphics preset's view distance
    pub fn with_view_distance(mut self, view_distance: f32) -> Self {
        self.minimal = self.minimal.min(view_distance);
        self.reduced = self.reduced.min(self.minimal);
        self.full = self.full.min(self.reduced);
        self
    }
}

//! Archetype-keyed render resources
//!
//! Geometry and materials are shared by every instance of an archetype and
//! are never mutated per instance. Slots only reference them by archetype and
//! own a unique [`RenderHandle`] that the rendering layer maps to its own
//! instance data.

use serde::{Deserialize, Serialize};

use crate::game::archetype::Archetype;
use crate::game::lod::LodLevel;

/// Opaque per-slot rendering handle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RenderHandle {
    pub archetype: Archetype,
    pub instance: u32,
}

impl RenderHandle {
    pub(crate) fn new(archetype: Archetype, instance: u32) -> Self {
        Self { archetype, instance }
    }
}

/// Identifiers of the shared assets for one archetype
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SharedRenderResources {
    pub geometry_id: u32,
    pub material_id: u32,
    /// Geometry variant per renderable LOD (full, reduced, minimal)
    pub lod_geometry: [u32; 3],
}

impl SharedRenderResources {
    /// Geometry to draw at `lod`, `None` when culled
    pub fn geometry_for(&self, lod: LodLevel) -> Option<u32> {
        match lod {
            LodLevel::Full => Some(self.lod_geometry[0]),
            LodLevel::Reduced => Some(self.lod_geometry[1]),
            LodLevel::Minimal => Some(self.lod_geometry[2]),
            LodLevel::Culled => None,
        }
    }
}

/// Read-only table of shared resources, one entry per archetype
#[derive(Debug, Clone)]
pub struct RenderArena {
    resources: [SharedRenderResources; 4],
}

impl RenderArena {
    pub fn new() -> Self {
        let resources = Archetype::ALL.map(|archetype| {
            let base = archetype.index() as u32 * 16;
            SharedRenderResources {
                geometry_id: base,
                material_id: base + 1,
                lod_geometry: [base, base + 2, base + 3],
            }
        });
        Self { resources }
    }

    #[inline]
    pub fn get(&self, archetype: Archetype) -> &SharedRenderResources {
        &self.resources[archetype.index()]
    }
}

impl Default for RenderArena {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_archetypes_have_distinct_materials() {
        let arena = RenderArena::new();
        let normal = arena.get(Archetype::Normal);
        let boss = arena.get(Archetype::Boss);
        assert_ne!(normal.material_id, boss.material_id);
        assert_ne!(normal.geometry_id, boss.geometry_id);
    }

    #[test]
    fn test_culled_has_no_geometry() {
        let arena = RenderArena::new();
        let res = arena.get(Archetype::Fast);
        assert_eq!(res.geometry_for(LodLevel::Culled), None);
        assert_eq!(res.geometry_for(LodLevel::Full), Some(res.geometry_id));
    }
}

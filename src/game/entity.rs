//! Pooled hostile entity
//!
//! Slots are allocated once and recycled. An [`EntityHandle`] carries the
//! slot index plus a generation counter, so a handle kept past release can
//! never address the slot's next occupant.

use glam::{Quat, Vec3};
use serde::{Deserialize, Serialize};

use crate::game::archetype::Archetype;
use crate::game::constants::pool::POSE_PARTS;
use crate::game::lod::LodLevel;
use crate::game::render::RenderHandle;

/// Stable reference to an acquired slot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EntityHandle {
    pub index: u32,
    pub generation: u32,
}

/// Slot lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SlotState {
    /// Available for acquisition
    #[default]
    Free,
    /// Handed out by `acquire`, promoted on the next manager update
    Acquired,
    /// Placed in the world and eligible for updates
    Active,
}

/// Behavior currently held by an entity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AiState {
    #[default]
    Idle,
    Patrol,
    Hunt,
    Attack,
    Retreat,
    Coordinate,
    Ambush,
}

/// Local transform of one articulated part
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PartPose {
    pub rotation: Quat,
    pub scale: Vec3,
}

impl Default for PartPose {
    fn default() -> Self {
        Self {
            rotation: Quat::IDENTITY,
            scale: Vec3::ONE,
        }
    }
}

/// Root and per-part transform state touched by hit and death animations
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pose {
    pub rotation: Quat,
    pub scale: Vec3,
    pub parts: [PartPose; POSE_PARTS],
}

impl Default for Pose {
    fn default() -> Self {
        Self {
            rotation: Quat::IDENTITY,
            scale: Vec3::ONE,
            parts: [PartPose::default(); POSE_PARTS],
        }
    }
}

impl Pose {
    #[inline]
    pub fn is_identity(&self) -> bool {
        *self == Pose::default()
    }
}

/// One hostile actor occupying a pool slot
#[derive(Debug, Clone)]
pub struct Entity {
    pub index: u32,
    pub generation: u32,
    pub archetype: Archetype,
    pub state: SlotState,
    pub position: Vec3,
    pub velocity: Vec3,
    /// Yaw in radians, 0 faces +z
    pub heading: f32,
    pub health: f32,
    pub max_health: f32,
    pub ai_state: AiState,
    pub lod: LodLevel,
    /// Simulated time of the last acquisition
    pub last_activation: f64,
    pub pose: Pose,
    render: RenderHandle,
}

impl Entity {
    pub(crate) fn new(index: u32, archetype: Archetype, render: RenderHandle) -> Self {
        let max_health = archetype.profile().max_health;
        Self {
            index,
            generation: 0,
            archetype,
            state: SlotState::Free,
            position: Vec3::ZERO,
            velocity: Vec3::ZERO,
            heading: 0.0,
            health: max_health,
            max_health,
            ai_state: AiState::Idle,
            lod: LodLevel::Culled,
            last_activation: 0.0,
            pose: Pose::default(),
            render,
        }
    }

    #[inline]
    pub fn handle(&self) -> EntityHandle {
        EntityHandle {
            index: self.index,
            generation: self.generation,
        }
    }

    #[inline]
    pub fn in_use(&self) -> bool {
        self.state != SlotState::Free
    }

    #[inline]
    pub fn is_alive(&self) -> bool {
        self.in_use() && self.health > 0.0
    }

    #[inline]
    pub fn render_handle(&self) -> RenderHandle {
        self.render
    }

    /// Health as a fraction of max health
    pub fn health_ratio(&self) -> f32 {
        if self.max_health > 0.0 {
            (self.health / self.max_health).clamp(0.0, 1.0)
        } else {
            0.0
        }
    }

    /// Restore the default transform and pose, keeping slot identity
    pub(crate) fn reset_transform(&mut self) {
        self.position = Vec3::ZERO;
        self.velocity = Vec3::ZERO;
        self.heading = 0.0;
        self.pose = Pose::default();
    }

    /// True when position, velocity, heading and pose are all at defaults
    pub fn has_default_transform(&self) -> bool {
        self.position == Vec3::ZERO
            && self.velocity == Vec3::ZERO
            && self.heading == 0.0
            && self.pose.is_identity()
    }

    /// Flinch the torso and head in response to a hit
    pub fn apply_hit_reaction(&mut self, intensity: f32) {
        let tilt = Quat::from_rotation_x(-0.25 * intensity.clamp(0.0, 1.0));
        for part in self.pose.parts.iter_mut().take(2) {
            part.rotation = part.rotation * tilt;
        }
        self.pose.scale = Vec3::new(1.0, 1.0 - 0.1 * intensity.clamp(0.0, 1.0), 1.0);
    }
}

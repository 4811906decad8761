//! Horde Director Library
//!
//! Entity population core for a 3D survival game: pooled NPC slots with
//! LOD and frustum culling, an adaptive population cap, a priority-auction
//! AI with obstacle avoidance, and a spawn director that plans waves from a
//! model of the player's movement.
//!
//! Rendering, physics, audio and networking are left to the host. The host
//! drives [`game::simulation::Simulation::step`] once per frame and reads
//! back spawn events, attacks and render views.

pub mod config;
pub mod game;
pub mod metrics;
pub mod util;

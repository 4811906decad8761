pub mod archetype;
pub mod camera;
pub mod constants;
pub mod entity;
pub mod lod;
pub mod performance;
pub mod pool;
pub mod render;
pub mod simulation;
pub mod spatial;
pub mod systems;

pub mod ai;
pub mod behaviors;
pub mod navigation;
pub mod player_profile;
pub mod spawn_director;

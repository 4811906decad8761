//! Director configuration
//!
//! Every tuned threshold lives here as a named field. Defaults come from
//! [`crate::game::constants`]; any field can be overridden through a
//! `HORDE_*` environment variable.
//!
//! # Environment Variables
//!
//! - `HORDE_GRAPHICS_QUALITY` - `low`, `medium`, `high` or `ultra` (default: medium)
//! - `HORDE_LOD_FULL`, `HORDE_LOD_REDUCED`, `HORDE_LOD_MINIMAL` - LOD distances
//! - `HORDE_LOD_INTERVAL` - Seconds between LOD passes (default: 0.1)
//! - `HORDE_FPS_LOW`, `HORDE_FPS_HIGH` - Adaptive cap thresholds (default: 40 / 58)
//! - `HORDE_CAP_FLOOR` - Minimum adaptive cap (default: 10)
//! - `HORDE_DECISION_COOLDOWN` - Seconds between AI re-selections (default: 0.2)
//! - `HORDE_PERSONAL_SPACE` - Peer repulsion radius (default: 3.0)
//! - `HORDE_CAMPING_WINDOW` - Seconds stationary before camping (default: 5.0)
//! - `HORDE_AGGRESSION_WINDOW` - Kill window in seconds (default: 10.0)
//! - `HORDE_AGGRESSION_KILLS` - Kills in window for aggression (default: 3)
//! - `HORDE_SPAWN_MIN_DISTANCE`, `HORDE_SPAWN_MAX_DISTANCE` - Spawn ring bounds
//! - `HORDE_MAX_STRATEGIES` - Spawn strategies in flight (default: 3)
//! - `HORDE_RETREAT_AHEAD_WEIGHT` - Ahead-score multiplier for a retreating player (default: 2.0)
//! - `HORDE_AGGRESSION_WAVE` - Wave timing for aggressive players (default: true)
//! - `HORDE_SPAWN_INTERVAL` - Seconds between spawn plans (default: 5.0)
//! - `HORDE_SEED` - RNG seed for the simulation (default: random)

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::game::archetype::Archetype;
use crate::game::constants::{adaptive, ai, lod, navigation, pool, simulation, spawn};
use crate::game::lod::LodThresholds;

/// Configuration validation failure
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConfigError {
    #[error("LOD distances must be strictly increasing (full {full} < reduced {reduced} < minimal {minimal})")]
    LodOrder { full: f32, reduced: f32, minimal: f32 },
    #[error("{field} must be positive, got {value}")]
    NotPositive { field: &'static str, value: f32 },
    #[error("FPS thresholds inverted: low {low} must be below high {high}")]
    FpsOrder { low: f32, high: f32 },
    #[error("shrink factor must be in (0, 1), got {0}")]
    ShrinkFactor(f32),
    #[error("spawn distance bounds inverted: min {min} must be below max {max}")]
    SpawnBounds { min: f32, max: f32 },
    #[error("{0} must be at least 1")]
    ZeroCount(&'static str),
    #[error("unknown graphics quality '{0}'")]
    UnknownQuality(String),
}

/// Graphics preset supplied by the settings layer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GraphicsQuality {
    Low,
    #[default]
    Medium,
    High,
    Ultra,
}

impl GraphicsQuality {
    pub fn settings(self) -> QualitySettings {
        match self {
            GraphicsQuality::Low => QualitySettings {
                view_distance: 80.0,
                shadows: false,
                effects: false,
                max_entities: 25,
            },
            GraphicsQuality::Medium => QualitySettings {
                view_distance: 120.0,
                shadows: true,
                effects: false,
                max_entities: 40,
            },
            GraphicsQuality::High => QualitySettings {
                view_distance: 160.0,
                shadows: true,
                effects: true,
                max_entities: 60,
            },
            GraphicsQuality::Ultra => QualitySettings {
                view_distance: 220.0,
                shadows: true,
                effects: true,
                max_entities: 80,
            },
        }
    }
}

impl FromStr for GraphicsQuality {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "low" => Ok(GraphicsQuality::Low),
            "medium" => Ok(GraphicsQuality::Medium),
            "high" => Ok(GraphicsQuality::High),
            "ultra" => Ok(GraphicsQuality::Ultra),
            other => Err(ConfigError::UnknownQuality(other.to_string())),
        }
    }
}

impl fmt::Display for GraphicsQuality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            GraphicsQuality::Low => "low",
            GraphicsQuality::Medium => "medium",
            GraphicsQuality::High => "high",
            GraphicsQuality::Ultra => "ultra",
        };
        f.write_str(name)
    }
}

/// Values derived from a graphics preset
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct QualitySettings {
    /// Entities beyond this distance are always culled
    pub view_distance: f32,
    pub shadows: bool,
    pub effects: bool,
    /// Base cap on concurrently active entities
    pub max_entities: usize,
}

/// Pool sizing per archetype
#[derive(Debug, Clone, PartialEq)]
pub struct PoolConfig {
    /// Base capacity indexed by [`Archetype::index`]
    pub base_capacity: [usize; 4],
    pub prewarm_ratio: f32,
    pub ceiling_ratio: f32,
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self {
            base_capacity: [
                pool::BASE_CAPACITY_NORMAL,
                pool::BASE_CAPACITY_FAST,
                pool::BASE_CAPACITY_TANK,
                pool::BASE_CAPACITY_BOSS,
            ],
            prewarm_ratio: pool::PREWARM_RATIO,
            ceiling_ratio: pool::CEILING_RATIO,
        }
    }
}

impl PoolConfig {
    pub fn base(&self, archetype: Archetype) -> usize {
        self.base_capacity[archetype.index()]
    }

    /// Slots allocated at startup
    pub fn prewarm(&self, archetype: Archetype) -> usize {
        (self.base(archetype) as f32 * self.prewarm_ratio).ceil() as usize
    }

    /// Hard ceiling on allocated slots
    pub fn ceiling(&self, archetype: Archetype) -> usize {
        ((self.base(archetype) as f32 * self.ceiling_ratio).floor() as usize).max(self.prewarm(archetype))
    }
}

/// LOD selection and throttling
#[derive(Debug, Clone, PartialEq)]
pub struct LodConfig {
    pub thresholds: LodThresholds,
    /// Seconds between LOD/culling passes
    pub update_interval: f32,
}

impl Default for LodConfig {
    fn default() -> Self {
        Self {
            thresholds: LodThresholds::default(),
            update_interval: lod::UPDATE_INTERVAL,
        }
    }
}

/// Frame-rate driven cap tuning
#[derive(Debug, Clone, PartialEq)]
pub struct AdaptiveConfig {
    pub sample_interval: f32,
    pub low_fps: f32,
    pub high_fps: f32,
    pub low_streak: u32,
    pub high_streak: u32,
    pub shrink_factor: f32,
    pub grow_step_ratio: f32,
    pub min_cap: usize,
    pub min_adjust_interval: f32,
}

impl Default for AdaptiveConfig {
    fn default() -> Self {
        Self {
            sample_interval: adaptive::SAMPLE_INTERVAL,
            low_fps: adaptive::LOW_FPS,
            high_fps: adaptive::HIGH_FPS,
            low_streak: adaptive::LOW_STREAK,
            high_streak: adaptive::HIGH_STREAK,
            shrink_factor: adaptive::SHRINK_FACTOR,
            grow_step_ratio: adaptive::GROW_STEP_RATIO,
            min_cap: adaptive::MIN_CAP,
            min_adjust_interval: adaptive::MIN_ADJUST_INTERVAL,
        }
    }
}

/// AI decision engine tuning
#[derive(Debug, Clone, PartialEq)]
pub struct AiConfig {
    pub decision_cooldown: f32,
    pub retreat_health: f32,
    pub retreat_critical_health: f32,
    pub attack_range: f32,
    pub coordinate_min_allies: usize,
    pub coordinate_ally_radius: f32,
    pub coordinate_player_range: f32,
    pub alert_gain_visible: f32,
    pub alert_gain_gunfire: f32,
    pub alert_decay: f32,
    pub alert_hunt_threshold: f32,
    pub gunfire_hearing_range: f32,
    pub investigate_timeout: f32,
}

impl Default for AiConfig {
    fn default() -> Self {
        Self {
            decision_cooldown: ai::DECISION_COOLDOWN,
            retreat_health: ai::RETREAT_HEALTH,
            retreat_critical_health: ai::RETREAT_CRITICAL_HEALTH,
            attack_range: ai::ATTACK_RANGE,
            coordinate_min_allies: ai::COORDINATE_MIN_ALLIES,
            coordinate_ally_radius: ai::COORDINATE_ALLY_RADIUS,
            coordinate_player_range: ai::COORDINATE_PLAYER_RANGE,
            alert_gain_visible: ai::ALERT_GAIN_VISIBLE,
            alert_gain_gunfire: ai::ALERT_GAIN_GUNFIRE,
            alert_decay: ai::ALERT_DECAY,
            alert_hunt_threshold: ai::ALERT_HUNT_THRESHOLD,
            gunfire_hearing_range: ai::GUNFIRE_HEARING_RANGE,
            investigate_timeout: ai::INVESTIGATE_TIMEOUT,
        }
    }
}

/// Navigation tuning
#[derive(Debug, Clone, PartialEq)]
pub struct NavigationConfig {
    pub safety_margin: f32,
    pub ray_count: usize,
    pub ray_length: f32,
    pub ray_distance_penalty: f32,
    pub stuck_window: f32,
    pub stuck_threshold: f32,
    pub personal_space: f32,
}

impl Default for NavigationConfig {
    fn default() -> Self {
        Self {
            safety_margin: navigation::SAFETY_MARGIN,
            ray_count: navigation::RAY_COUNT,
            ray_length: navigation::RAY_LENGTH,
            ray_distance_penalty: navigation::RAY_DISTANCE_PENALTY,
            stuck_window: navigation::STUCK_WINDOW,
            stuck_threshold: navigation::STUCK_THRESHOLD,
            personal_space: navigation::PERSONAL_SPACE,
        }
    }
}

/// Spawn director tuning
#[derive(Debug, Clone, PartialEq)]
pub struct SpawnConfig {
    pub history_window: f32,
    pub camping_window: f32,
    pub camping_radius: f32,
    pub aggression_window: f32,
    pub aggression_kills: usize,
    pub retreat_samples: usize,
    pub prediction_horizon: f32,
    pub favored_pull: f32,
    pub min_distance: f32,
    pub max_distance: f32,
    pub candidate_multiplier: usize,
    pub min_separation: f32,
    pub heat_cell_size: f32,
    pub heat_half_life: f32,
    pub max_active_strategies: usize,
    pub high_skill: f32,
    pub low_skill: f32,
    /// Ahead-of-travel score multiplier for a retreating player
    pub retreat_ahead_weight: f32,
    /// Wave timing for aggressive players regardless of skill
    pub aggression_wave: bool,
    pub stagger_min_ms: u32,
    pub stagger_max_ms: u32,
}

impl Default for SpawnConfig {
    fn default() -> Self {
        Self {
            history_window: spawn::HISTORY_WINDOW,
            camping_window: spawn::CAMPING_WINDOW,
            camping_radius: spawn::CAMPING_RADIUS,
            aggression_window: spawn::AGGRESSION_WINDOW,
            aggression_kills: spawn::AGGRESSION_KILLS,
            retreat_samples: spawn::RETREAT_SAMPLES,
            prediction_horizon: spawn::PREDICTION_HORIZON,
            favored_pull: spawn::FAVORED_PULL,
            min_distance: spawn::MIN_DISTANCE,
            max_distance: spawn::MAX_DISTANCE,
            candidate_multiplier: spawn::CANDIDATE_MULTIPLIER,
            min_separation: spawn::MIN_SEPARATION,
            heat_cell_size: spawn::HEAT_CELL_SIZE,
            heat_half_life: spawn::HEAT_HALF_LIFE,
            max_active_strategies: spawn::MAX_ACTIVE_STRATEGIES,
            high_skill: spawn::HIGH_SKILL,
            low_skill: spawn::LOW_SKILL,
            retreat_ahead_weight: spawn::RETREAT_AHEAD_WEIGHT,
            aggression_wave: spawn::AGGRESSION_WAVE,
            stagger_min_ms: spawn::STAGGER_MIN_MS,
            stagger_max_ms: spawn::STAGGER_MAX_MS,
        }
    }
}

/// Orchestrator timing
#[derive(Debug, Clone, PartialEq)]
pub struct SimulationConfig {
    pub spawn_interval: f32,
    pub pending_spawn_expiry: f32,
    pub cover_distance: f32,
    pub player_sample_interval: f32,
    /// Difficulty 0-100 passed to the spawn director
    pub difficulty: f32,
    /// Fixed RNG seed, random when `None`
    pub seed: Option<u64>,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            spawn_interval: simulation::SPAWN_INTERVAL,
            pending_spawn_expiry: simulation::PENDING_SPAWN_EXPIRY,
            cover_distance: simulation::COVER_DISTANCE,
            player_sample_interval: simulation::PLAYER_SAMPLE_INTERVAL,
            difficulty: 50.0,
            seed: None,
        }
    }
}

/// Complete configuration for the entity population core
#[derive(Debug, Clone, PartialEq, Default)]
pub struct DirectorConfig {
    pub quality: GraphicsQuality,
    pub pool: PoolConfig,
    pub lod: LodConfig,
    pub adaptive: AdaptiveConfig,
    pub ai: AiConfig,
    pub navigation: NavigationConfig,
    pub spawn: SpawnConfig,
    pub simulation: SimulationConfig,
}

/// Parse an environment override, warning and keeping the default on failure
fn env_override<T: FromStr>(key: &str, target: &mut T) {
    if let Ok(raw) = std::env::var(key) {
        match raw.parse() {
            Ok(parsed) => *target = parsed,
            Err(_) => tracing::warn!("Invalid {} '{}', using default", key, raw),
        }
    }
}

impl DirectorConfig {
    /// Load config from environment or use defaults
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(raw) = std::env::var("HORDE_GRAPHICS_QUALITY") {
            match raw.parse() {
                Ok(quality) => config.quality = quality,
                Err(e) => tracing::warn!("{}, using default", e),
            }
        }

        env_override("HORDE_LOD_FULL", &mut config.lod.thresholds.full);
        env_override("HORDE_LOD_REDUCED", &mut config.lod.thresholds.reduced);
        env_override("HORDE_LOD_MINIMAL", &mut config.lod.thresholds.minimal);
        env_override("HORDE_LOD_INTERVAL", &mut config.lod.update_interval);

        env_override("HORDE_FPS_LOW", &mut config.adaptive.low_fps);
        env_override("HORDE_FPS_HIGH", &mut config.adaptive.high_fps);
        env_override("HORDE_CAP_FLOOR", &mut config.adaptive.min_cap);

        env_override("HORDE_DECISION_COOLDOWN", &mut config.ai.decision_cooldown);
        env_override("HORDE_PERSONAL_SPACE", &mut config.navigation.personal_space);

        env_override("HORDE_CAMPING_WINDOW", &mut config.spawn.camping_window);
        env_override("HORDE_AGGRESSION_WINDOW", &mut config.spawn.aggression_window);
        env_override("HORDE_AGGRESSION_KILLS", &mut config.spawn.aggression_kills);
        env_override("HORDE_SPAWN_MIN_DISTANCE", &mut config.spawn.min_distance);
        env_override("HORDE_SPAWN_MAX_DISTANCE", &mut config.spawn.max_distance);
        env_override("HORDE_MAX_STRATEGIES", &mut config.spawn.max_active_strategies);
        env_override("HORDE_RETREAT_AHEAD_WEIGHT", &mut config.spawn.retreat_ahead_weight);
        env_override("HORDE_AGGRESSION_WAVE", &mut config.spawn.aggression_wave);

        env_override("HORDE_SPAWN_INTERVAL", &mut config.simulation.spawn_interval);
        env_override("HORDE_DIFFICULTY", &mut config.simulation.difficulty);
        if let Ok(raw) = std::env::var("HORDE_SEED") {
            match raw.parse() {
                Ok(seed) => config.simulation.seed = Some(seed),
                Err(_) => tracing::warn!("Invalid HORDE_SEED '{}', using random seed", raw),
            }
        }

        tracing::info!(
            quality = %config.quality,
            lod_full = config.lod.thresholds.full,
            lod_reduced = config.lod.thresholds.reduced,
            lod_minimal = config.lod.thresholds.minimal,
            fps_low = config.adaptive.low_fps,
            fps_high = config.adaptive.high_fps,
            max_strategies = config.spawn.max_active_strategies,
            "Director configuration loaded"
        );

        config
    }

    /// Quality-derived settings
    pub fn quality_settings(&self) -> QualitySettings {
        self.quality.settings()
    }

    /// LOD thresholds clamped to the preset's view distance
    pub fn effective_lod_thresholds(&self) -> LodThresholds {
        self.lod
            .thresholds
            .with_view_distance(self.quality_settings().view_distance)
    }

    /// Validate configuration after loading
    pub fn validate(&self) -> Result<(), ConfigError> {
        let t = &self.lod.thresholds;
        if !(t.full > 0.0 && t.full < t.reduced && t.reduced < t.minimal) {
            return Err(ConfigError::LodOrder {
                full: t.full,
                reduced: t.reduced,
                minimal: t.minimal,
            });
        }
        positive("lod.update_interval", self.lod.update_interval)?;
        positive("adaptive.sample_interval", self.adaptive.sample_interval)?;
        if self.adaptive.low_fps >= self.adaptive.high_fps {
            return Err(ConfigError::FpsOrder {
                low: self.adaptive.low_fps,
                high: self.adaptive.high_fps,
            });
        }
        if !(self.adaptive.shrink_factor > 0.0 && self.adaptive.shrink_factor < 1.0) {
            return Err(ConfigError::ShrinkFactor(self.adaptive.shrink_factor));
        }
        if self.adaptive.min_cap == 0 {
            return Err(ConfigError::ZeroCount("adaptive.min_cap"));
        }
        positive("ai.decision_cooldown", self.ai.decision_cooldown)?;
        positive("navigation.personal_space", self.navigation.personal_space)?;
        positive("navigation.ray_length", self.navigation.ray_length)?;
        if self.navigation.ray_count == 0 {
            return Err(ConfigError::ZeroCount("navigation.ray_count"));
        }
        positive("spawn.min_distance", self.spawn.min_distance)?;
        if self.spawn.min_distance >= self.spawn.max_distance {
            return Err(ConfigError::SpawnBounds {
                min: self.spawn.min_distance,
                max: self.spawn.max_distance,
            });
        }
        positive("spawn.heat_cell_size", self.spawn.heat_cell_size)?;
        positive("spawn.heat_half_life", self.spawn.heat_half_life)?;
        positive("spawn.retreat_ahead_weight", self.spawn.retreat_ahead_weight)?;
        if self.spawn.max_active_strategies == 0 {
            return Err(ConfigError::ZeroCount("spawn.max_active_strategies"));
        }
        if self.spawn.candidate_multiplier == 0 {
            return Err(ConfigError::ZeroCount("spawn.candidate_multiplier"));
        }
        if self.spawn.stagger_min_ms > self.spawn.stagger_max_ms {
            return Err(ConfigError::SpawnBounds {
                min: self.spawn.stagger_min_ms as f32,
                max: self.spawn.stagger_max_ms as f32,
            });
        }
        positive("simulation.spawn_interval", self.simulation.spawn_interval)?;
        Ok(())
    }
}

fn positive(field: &'static str, value: f32) -> Result<(), ConfigError> {
    if value > 0.0 && value.is_finite() {
        Ok(())
    } else {
        Err(ConfigError::NotPositive { field, value })
    }
}

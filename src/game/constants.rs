/// Entity pool sizing
pub mod pool {
    /// Fraction of each archetype's base capacity allocated at startup
    pub const PREWARM_RATIO: f32 = 0.75;
    /// Hard pool ceiling as a multiple of base capacity
    pub const CEILING_RATIO: f32 = 1.5;
    /// Base slot capacity per archetype
    pub const BASE_CAPACITY_NORMAL: usize = 40;
    pub const BASE_CAPACITY_FAST: usize = 20;
    pub const BASE_CAPACITY_TANK: usize = 10;
    pub const BASE_CAPACITY_BOSS: usize = 2;
    /// Number of articulated parts carried in an entity pose (head, torso, arms, legs)
    pub const POSE_PARTS: usize = 6;
}

/// Level-of-detail selection
pub mod lod {
    /// Distance below which entities render at full detail
    pub const FULL_DISTANCE: f32 = 30.0;
    /// Distance below which entities render at reduced detail
    pub const REDUCED_DISTANCE: f32 = 60.0;
    /// Distance below which entities render at minimal detail; beyond is culled
    pub const MINIMAL_DISTANCE: f32 = 100.0;
    /// Seconds between LOD/culling recomputation passes
    pub const UPDATE_INTERVAL: f32 = 0.1;
}

/// Spatial index
pub mod spatial {
    /// Uniform grid cell size in world units
    pub const CELL_SIZE: f32 = 20.0;
    /// Initial capacity for the cell map
    pub const GRID_INITIAL_CAPACITY: usize = 128;
    /// Initial capacity for per-cell slot vectors
    pub const CELL_INITIAL_CAPACITY: usize = 8;
}

/// Frame-rate driven population control
pub mod adaptive {
    /// Seconds of frames averaged into one FPS sample
    pub const SAMPLE_INTERVAL: f32 = 1.0;
    /// Samples below this FPS count toward a shrink
    pub const LOW_FPS: f32 = 40.0;
    /// Samples above this FPS count toward a grow
    pub const HIGH_FPS: f32 = 58.0;
    /// Consecutive low samples required before shrinking
    pub const LOW_STREAK: u32 = 3;
    /// Consecutive high samples required before growing
    pub const HIGH_STREAK: u32 = 5;
    /// Multiplier applied to the cap on shrink (~15% reduction)
    pub const SHRINK_FACTOR: f32 = 0.85;
    /// Fraction of the base cap added per grow step
    pub const GROW_STEP_RATIO: f32 = 0.05;
    /// The cap never shrinks below this
    pub const MIN_CAP: usize = 10;
    /// Minimum simulated seconds between two cap adjustments
    pub const MIN_ADJUST_INTERVAL: f32 = 2.0;
}

/// AI decision engine tuning
pub mod ai {
    /// Seconds between behavior re-selections for one entity
    pub const DECISION_COOLDOWN: f32 = 0.2;

    pub const PRIORITY_ATTACK: f32 = 100.0;
    pub const PRIORITY_HUNT: f32 = 80.0;
    pub const PRIORITY_AMBUSH: f32 = 65.0;
    pub const PRIORITY_COORDINATE: f32 = 60.0;
    pub const PRIORITY_INVESTIGATE: f32 = 50.0;
    pub const PRIORITY_RETREAT: f32 = 50.0;
    pub const PRIORITY_RETREAT_CRITICAL: f32 = 75.0;
    pub const PRIORITY_PATROL: f32 = 10.0;

    /// Health fraction below which defensive entities may retreat
    pub const RETREAT_HEALTH: f32 = 0.10;
    /// Health fraction below which retreat becomes urgent
    pub const RETREAT_CRITICAL_HEALTH: f32 = 0.05;
    /// Distance the retreat target is placed away from the player
    pub const RETREAT_DISTANCE: f32 = 15.0;

    /// Attack requires the player to be closer than this
    pub const ATTACK_RANGE: f32 = 5.0;
    /// Seconds of player velocity used to lead an attack
    pub const ATTACK_LEAD_TIME: f32 = 0.3;
    /// Distance kept from the predicted player position while attacking
    pub const ATTACK_STANDOFF: f32 = 3.0;

    /// Flank angle range in degrees
    pub const FLANK_ANGLE_MIN: f32 = 45.0;
    pub const FLANK_ANGLE_MAX: f32 = 75.0;
    /// Flank radius range in world units
    pub const FLANK_RADIUS_MIN: f32 = 12.0;
    pub const FLANK_RADIUS_MAX: f32 = 20.0;
    /// Seconds of player velocity used when charging
    pub const CHARGE_LEAD_TIME: f32 = 0.5;
    /// Max random offset applied to a charge target
    pub const CHARGE_JITTER: f32 = 2.0;
    /// Max random offset applied to a direct hunt target
    pub const HUNT_JITTER: f32 = 4.0;

    /// Minimum living allies for coordination
    pub const COORDINATE_MIN_ALLIES: usize = 3;
    /// Allies must be within this distance to coordinate
    pub const COORDINATE_ALLY_RADIUS: f32 = 30.0;
    /// Player must be within this distance to coordinate
    pub const COORDINATE_PLAYER_RANGE: f32 = 40.0;
    /// Encircle radius around the player
    pub const COORDINATE_RING_RADIUS: f32 = 8.0;
    /// Max angular jitter per slot in degrees
    pub const COORDINATE_JITTER_DEG: f32 = 30.0;

    /// Alert gained per second while the player is visible
    pub const ALERT_GAIN_VISIBLE: f32 = 60.0;
    /// Alert gained instantly from hearing gunfire
    pub const ALERT_GAIN_GUNFIRE: f32 = 30.0;
    /// Alert lost per second while the player is neither seen nor heard
    pub const ALERT_DECAY: f32 = 10.0;
    /// Alert above which hunting continues without sight
    pub const ALERT_HUNT_THRESHOLD: f32 = 50.0;
    pub const ALERT_MAX: f32 = 100.0;

    /// Gunfire further than this is ignored
    pub const GUNFIRE_HEARING_RANGE: f32 = 40.0;
    /// Investigation ends when this close to the target
    pub const INVESTIGATE_REACHED: f32 = 3.0;
    /// Investigation is abandoned after this many seconds
    pub const INVESTIGATE_TIMEOUT: f32 = 10.0;

    /// Ambush only triggers when the player is within this distance
    pub const AMBUSH_RANGE: f32 = 20.0;

    /// Patrol waypoints are picked within this radius of the anchor
    pub const PATROL_RADIUS: f32 = 15.0;
    /// Patrol waypoint counts as reached within this distance
    pub const PATROL_REACHED: f32 = 2.0;

    pub const SPEED_ATTACK: f32 = 1.0;
    pub const SPEED_HUNT: f32 = 1.0;
    pub const SPEED_CHARGE: f32 = 1.2;
    pub const SPEED_COORDINATE: f32 = 0.9;
    pub const SPEED_INVESTIGATE: f32 = 0.8;
    pub const SPEED_RETREAT: f32 = 1.3;
    pub const SPEED_PATROL: f32 = 0.5;
}

/// Navigation & obstacle avoidance
pub mod navigation {
    /// Clearance added to every obstacle radius
    pub const SAFETY_MARGIN: f32 = 1.5;
    /// Number of avoidance rays cast in a full circle
    pub const RAY_COUNT: usize = 8;
    /// Length of each avoidance ray
    pub const RAY_LENGTH: f32 = 6.0;
    /// Weight of the endpoint-to-target distance in ray scoring
    pub const RAY_DISTANCE_PENALTY: f32 = 0.01;
    /// Seconds of movement history considered for stuck detection
    pub const STUCK_WINDOW: f32 = 1.0;
    /// Displacement below which an entity is considered stuck
    pub const STUCK_THRESHOLD: f32 = 0.5;
    /// Default personal space radius between peers
    pub const PERSONAL_SPACE: f32 = 3.0;
}

/// Predictive spawn director
pub mod spawn {
    /// Player history window in seconds
    pub const HISTORY_WINDOW: f32 = 30.0;
    /// Seconds of near-zero displacement before a player is camping
    pub const CAMPING_WINDOW: f32 = 5.0;
    /// Displacement under which the player counts as stationary
    pub const CAMPING_RADIUS: f32 = 3.0;
    /// Kill window used for aggression detection
    pub const AGGRESSION_WINDOW: f32 = 10.0;
    /// Kills within the window that mark the player aggressive
    pub const AGGRESSION_KILLS: usize = 3;
    /// Samples used to judge retreat from the spawn centroid
    pub const RETREAT_SAMPLES: usize = 4;

    /// Seconds ahead used for position prediction
    pub const PREDICTION_HORIZON: f32 = 2.0;
    /// Fraction of the way pulled toward the favored area for circling players
    pub const FAVORED_PULL: f32 = 0.3;

    /// Spawn ring bounds
    pub const MIN_DISTANCE: f32 = 25.0;
    pub const MAX_DISTANCE: f32 = 45.0;
    /// Candidates generated per required spawn
    pub const CANDIDATE_MULTIPLIER: usize = 3;
    /// Separation under which candidates are penalized
    pub const MIN_SEPARATION: f32 = 10.0;

    /// Heatmap cell size and decay
    pub const HEAT_CELL_SIZE: f32 = 10.0;
    pub const HEAT_HALF_LIFE: f32 = 10.0;
    /// Heat below which a cell is dropped
    pub const HEAT_EPSILON: f32 = 0.01;

    /// Maximum strategies in flight
    pub const MAX_ACTIVE_STRATEGIES: usize = 3;

    /// Skill at or above which a player is considered high-skill
    pub const HIGH_SKILL: f32 = 70.0;
    /// Skill below which a player is considered low-skill
    pub const LOW_SKILL: f32 = 40.0;

    /// Multiplier on the ahead-of-travel score while the player retreats
    pub const RETREAT_AHEAD_WEIGHT: f32 = 2.0;
    /// Aggressive players get every spawn of a plan at once
    pub const AGGRESSION_WAVE: bool = true;

    /// Staggered inter-spawn delay bounds in milliseconds
    pub const STAGGER_MIN_MS: u32 = 800;
    pub const STAGGER_MAX_MS: u32 = 1200;

    /// Base spawn count and the extra added at full difficulty
    pub const BASE_COUNT: usize = 3;
    pub const DIFFICULTY_COUNT: f32 = 5.0;
    /// Difficulty at which a boss joins the mix
    pub const BOSS_DIFFICULTY: f32 = 75.0;
    /// Difficulty above which tanks start to appear
    pub const TANK_DIFFICULTY: f32 = 30.0;
    pub const FAST_SHARE: f32 = 0.25;
    /// Extra fast spawns sent at a camping player
    pub const CAMPING_FAST_BONUS: usize = 2;

    /// Candidate scoring weights
    pub const SCORE_DISTANCE_BAND: f32 = 30.0;
    pub const SCORE_AHEAD: f32 = 20.0;
    pub const SCORE_SEPARATION: f32 = 25.0;
    pub const SCORE_HEAT: f32 = 15.0;
    pub const SCORE_BEHIND_CAMPER: f32 = 25.0;
    pub const SCORE_FLANK: f32 = 20.0;
}

/// Player movement classification
pub mod pattern {
    /// Path length under which the player is stationary
    pub const STATIONARY_PATH: f32 = 2.0;
    /// Steps shorter than this are treated as jitter
    pub const MIN_STEP: f32 = 0.05;
    /// Displacement / path length above which movement is linear
    pub const LINEAR_STRAIGHTNESS: f32 = 0.85;
    /// Turns with a direction dot below this are sharp
    pub const SHARP_TURN_DOT: f32 = 0.5;
    /// Share of sharp turns above which movement is erratic
    pub const ERRATIC_TURN_RATIO: f32 = 0.4;
    /// Circling players end near where they started
    pub const CIRCULAR_RETURN_RATIO: f32 = 0.3;
    /// Circular variance of step directions for circling players
    pub const CIRCULAR_VARIANCE: f32 = 0.5;
    /// Fraction of the horizon used for unclassified velocity projection
    pub const SHORT_HORIZON_SCALE: f32 = 0.5;
}

/// Orchestrator timing
pub mod simulation {
    /// Seconds between spawn director invocations
    pub const SPAWN_INTERVAL: f32 = 5.0;
    /// Seconds a deferred spawn stays queued before being dropped
    pub const PENDING_SPAWN_EXPIRY: f32 = 10.0;
    /// Entities within this distance of a collidable obstacle are in cover
    pub const COVER_DISTANCE: f32 = 2.0;
    /// Seconds between player history samples
    pub const PLAYER_SAMPLE_INTERVAL: f32 = 0.25;
    /// Minimum seconds between attacks by one entity
    pub const ATTACK_INTERVAL: f32 = 1.0;
    /// Shots observed before accuracy feeds the skill estimate
    pub const SKILL_MIN_SHOTS: u32 = 10;
    /// Skill assumed before enough shots are observed
    pub const DEFAULT_SKILL: f32 = 50.0;
}

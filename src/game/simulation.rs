//! Per-frame orchestrator
//!
//! Runs the population core in a fixed order every frame:
//! 1. Resource manager update (frame-rate sampling, promotion, LOD/culling)
//! 2. Player observation for the spawn model
//! 3. Periodic spawn planning and fulfilment of queued spawns
//! 4. AI decisions and movement for entities active enough to think
//! 5. Metrics
//!
//! Every component is owned here and passed by reference; nothing is global.

use std::collections::VecDeque;
use std::sync::Arc;
use std::time::Instant;

use glam::Vec3;
use rand::rngs::StdRng;
use rand::SeedableRng;
use rustc_hash::FxHashMap;
use serde::Serialize;

use crate::config::{DirectorConfig, GraphicsQuality};
use crate::game::archetype::Archetype;
use crate::game::camera::CameraView;
use crate::game::constants::simulation::{ATTACK_INTERVAL, DEFAULT_SKILL, SKILL_MIN_SHOTS};
use crate::game::entity::EntityHandle;
use crate::game::performance::CapAdjustment;
use crate::game::pool::EntityResourceManager;
use crate::game::systems::ai::{AiBehaviorContext, AiDecisionEngine, PlayerSnapshot};
use crate::game::systems::navigation::{NavQuery, Obstacle, Peer};
use crate::game::systems::spawn_director::{
    PredictiveSpawnDirector, SpawnRequest, SpawnStrategy, SpawnTiming, StrategyId, WorldBounds,
};
use crate::metrics::Metrics;
use crate::util::math::{direction_from_yaw, distance_to_segment, flatten, planar_direction, planar_distance, safe_normalize, yaw_of};

/// Player state for one frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlayerTelemetry {
    pub position: Vec3,
    pub velocity: Vec3,
    pub health: f32,
    /// The player fired this frame
    pub shot_fired: bool,
    /// The shot hit an entity
    pub hit: bool,
    pub headshot: bool,
}

impl PlayerTelemetry {
    pub fn at(position: Vec3) -> Self {
        Self {
            position,
            velocity: Vec3::ZERO,
            health: 100.0,
            shot_fired: false,
            hit: false,
            headshot: false,
        }
    }
}

/// Emitted when an entity enters the world
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SpawnEvent {
    pub handle: EntityHandle,
    pub position: Vec3,
    pub archetype: Archetype,
    pub strategy: StrategyId,
}

/// An entity struck at the player this frame
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct AttackEvent {
    pub handle: EntityHandle,
    pub archetype: Archetype,
    pub damage: f32,
}

/// Everything observable that happened in one step
#[derive(Debug, Clone, Default, Serialize)]
pub struct FrameReport {
    pub spawn_events: Vec<SpawnEvent>,
    pub attacks: Vec<AttackEvent>,
    /// Due spawns still waiting for capacity
    pub deferred: usize,
    /// Queued spawns dropped after waiting too long
    pub expired: usize,
    pub planned: Option<StrategyId>,
    pub thinking: usize,
    /// In-use entities skipped by AI because they are culled or not yet active
    pub skipped: usize,
    #[serde(skip)]
    pub cap_adjustment: Option<CapAdjustment>,
}

/// Result of damaging an entity
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DamageOutcome {
    pub remaining: f32,
    pub killed: bool,
}

#[derive(Debug, Clone, Copy)]
struct PendingSpawn {
    strategy: StrategyId,
    archetype: Archetype,
    position: Vec3,
    due: f64,
    queued_at: f64,
    deferred: bool,
}

/// Wires the resource manager, AI engine, navigation and spawn director
pub struct Simulation {
    config: DirectorConfig,
    pool: EntityResourceManager,
    ai: AiDecisionEngine,
    director: PredictiveSpawnDirector,
    metrics: Arc<Metrics>,
    rng: StdRng,
    obstacles: Vec<Obstacle>,
    bounds: Option<WorldBounds>,
    pending: VecDeque<PendingSpawn>,
    /// Spawns not yet placed or dropped, per strategy
    outstanding: FxHashMap<StrategyId, usize>,
    last_seen: FxHashMap<EntityHandle, f64>,
    next_attack: FxHashMap<EntityHandle, f64>,
    clock: f64,
    spawn_timer: f32,
    sample_timer: f32,
    difficulty: f32,
    skill_override: Option<f32>,
    shots: u32,
    hits: u32,
    headshots: u32,
    peers: Vec<Peer>,
}

impl Simulation {
    pub fn new(config: DirectorConfig) -> Self {
        let rng = match config.simulation.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self {
            pool: EntityResourceManager::new(&config),
            ai: AiDecisionEngine::new(config.ai.clone(), config.navigation.clone()),
            director: PredictiveSpawnDirector::new(config.spawn.clone()),
            metrics: Arc::new(Metrics::new()),
            rng,
            obstacles: Vec::new(),
            bounds: None,
            pending: VecDeque::new(),
            outstanding: FxHashMap::default(),
            last_seen: FxHashMap::default(),
            next_attack: FxHashMap::default(),
            clock: 0.0,
            spawn_timer: 0.0,
            sample_timer: 0.0,
            difficulty: config.simulation.difficulty,
            skill_override: None,
            shots: 0,
            hits: 0,
            headshots: 0,
            peers: Vec::new(),
            config,
        }
    }

    pub fn config(&self) -> &DirectorConfig {
        &self.config
    }

    pub fn pool(&self) -> &EntityResourceManager {
        &self.pool
    }

    pub fn ai(&self) -> &AiDecisionEngine {
        &self.ai
    }

    pub fn director(&self) -> &PredictiveSpawnDirector {
        &self.director
    }

    /// Shared handle for a metrics reporter
    pub fn metrics(&self) -> &Arc<Metrics> {
        &self.metrics
    }

    pub fn clock(&self) -> f64 {
        self.clock
    }

    pub fn pending_spawns(&self) -> usize {
        self.pending.len()
    }

    pub fn set_obstacles(&mut self, obstacles: Vec<Obstacle>) {
        self.obstacles = obstacles;
    }

    pub fn obstacles(&self) -> &[Obstacle] {
        &self.obstacles
    }

    pub fn set_bounds(&mut self, bounds: Option<WorldBounds>) {
        self.bounds = bounds;
    }

    pub fn set_difficulty(&mut self, difficulty: f32) {
        self.difficulty = difficulty;
    }

    pub fn difficulty(&self) -> f32 {
        self.difficulty
    }

    /// Pin the skill estimate instead of deriving it from accuracy
    pub fn set_skill(&mut self, skill: Option<f32>) {
        self.skill_override = skill;
    }

    /// Skill 0-100 from hit and headshot rates
    pub fn skill(&self) -> f32 {
        if let Some(skill) = self.skill_override {
            return skill;
        }
        if self.shots < SKILL_MIN_SHOTS {
            return DEFAULT_SKILL;
        }
        let accuracy = self.hits as f32 / self.shots as f32;
        let headshot_rate = if self.hits == 0 { 0.0 } else { self.headshots as f32 / self.hits as f32 };
        (accuracy * 70.0 + headshot_rate * 30.0).clamp(0.0, 100.0)
    }

    /// Switch graphics preset at runtime
    pub fn apply_quality(&mut self, quality: GraphicsQuality) {
        self.config.quality = quality;
        self.pool.apply_quality(quality.settings());
        tracing::info!(%quality, max_entities = quality.settings().max_entities, "graphics quality applied");
    }

    /// Advance one frame
    pub fn step(&mut self, dt: f32, camera: &CameraView, player: &PlayerTelemetry) -> FrameReport {
        let started = Instant::now();
        let dt = if dt.is_finite() { dt.max(0.0) } else { 0.0 };
        self.clock += dt as f64;

        let mut report = FrameReport::default();
        let summary = self.pool.update(dt, camera);
        report.cap_adjustment = summary.cap_adjustment;

        let player_valid = player.position.is_finite();
        if player_valid {
            self.observe_player(dt, player);
        }

        self.spawn_timer += dt;
        if player_valid && self.spawn_timer >= self.config.simulation.spawn_interval {
            self.spawn_timer = 0.0;
            if let Some(strategy) = self.plan_spawns(player) {
                report.planned = Some(strategy.id);
                self.schedule(strategy);
            }
        }
        self.fulfil_pending(&mut report);

        self.think(dt, player, &mut report);

        self.metrics.record_pool(&self.pool.stats());
        self.metrics
            .strategies_in_flight
            .store(self.director.active_strategies() as u64, std::sync::atomic::Ordering::Relaxed);
        Metrics::add(&self.metrics.spawns, report.spawn_events.len());
        Metrics::add(&self.metrics.spawns_expired, report.expired);
        Metrics::add(&self.metrics.attacks, report.attacks.len());
        Metrics::add(&self.metrics.ai_decisions, report.thinking);
        Metrics::add(&self.metrics.ai_skipped, report.skipped);
        self.metrics.record_frame_time(started.elapsed());

        report
    }

    fn observe_player(&mut self, dt: f32, player: &PlayerTelemetry) {
        if player.shot_fired {
            self.shots += 1;
            if player.hit {
                self.hits += 1;
                if player.headshot {
                    self.headshots += 1;
                }
            }
        }

        self.sample_timer += dt;
        if self.sample_timer >= self.config.simulation.player_sample_interval {
            self.sample_timer = 0.0;
            self.director.observe(self.clock, player.position, player.velocity);
        }
    }

    fn plan_spawns(&mut self, player: &PlayerTelemetry) -> Option<SpawnStrategy> {
        let live = self.pool.live_positions();
        let request = SpawnRequest {
            player_position: player.position,
            player_velocity: player.velocity,
            live_entities: &live,
            difficulty: self.difficulty,
            skill: self.skill(),
            bounds: self.bounds,
        };
        let strategy = self.director.plan(self.clock, &request, &mut self.rng)?;
        Metrics::add(&self.metrics.strategies_planned, 1);
        Some(strategy)
    }

    /// Queue a strategy's spawns according to its timing
    fn schedule(&mut self, strategy: SpawnStrategy) {
        if strategy.points.is_empty() {
            self.director.complete(strategy.id);
            return;
        }
        let delay = match strategy.timing {
            SpawnTiming::Staggered => strategy.delay_secs() as f64,
            SpawnTiming::Immediate | SpawnTiming::Wave => 0.0,
        };
        self.outstanding.insert(strategy.id, strategy.points.len());
        for (i, point) in strategy.points.iter().enumerate() {
            self.pending.push_back(PendingSpawn {
                strategy: strategy.id,
                archetype: point.archetype,
                position: point.position,
                due: self.clock + delay * i as f64,
                queued_at: self.clock,
                deferred: false,
            });
        }
    }

    fn fulfil_pending(&mut self, report: &mut FrameReport) {
        let expiry = self.config.simulation.pending_spawn_expiry as f64;
        let mut waiting = VecDeque::with_capacity(self.pending.len());

        while let Some(mut pending) = self.pending.pop_front() {
            if pending.due > self.clock {
                waiting.push_back(pending);
                continue;
            }

            if let Some(handle) = self.pool.acquire(pending.archetype, pending.position) {
                self.ai
                    .register(handle, pending.archetype, pending.position, &mut self.rng);
                report.spawn_events.push(SpawnEvent {
                    handle,
                    position: pending.position,
                    archetype: pending.archetype,
                    strategy: pending.strategy,
                });
                self.settle(pending.strategy);
            } else if self.clock - pending.queued_at > expiry {
                report.expired += 1;
                tracing::debug!(
                    strategy = pending.strategy.0,
                    archetype = %pending.archetype,
                    "deferred spawn expired"
                );
                self.settle(pending.strategy);
            } else {
                if !pending.deferred {
                    pending.deferred = true;
                    Metrics::add(&self.metrics.spawns_deferred, 1);
                }
                report.deferred += 1;
                waiting.push_back(pending);
            }
        }

        self.pending = waiting;
    }

    /// One spawn of `strategy` was placed or dropped
    fn settle(&mut self, strategy: StrategyId) {
        let done = match self.outstanding.get_mut(&strategy) {
            Some(remaining) => {
                *remaining = remaining.saturating_sub(1);
                *remaining == 0
            }
            None => false,
        };
        if done {
            self.outstanding.remove(&strategy);
            self.director.complete(strategy);
        }
    }

    fn think(&mut self, dt: f32, player: &PlayerTelemetry, report: &mut FrameReport) {
        let thinking = self.pool.thinking();
        report.thinking = thinking.len();
        report.skipped = self.pool.in_use_count().saturating_sub(thinking.len());

        let snapshot = player.position.is_finite().then(|| PlayerSnapshot {
            position: player.position,
            velocity: if player.velocity.is_finite() { player.velocity } else { Vec3::ZERO },
        });
        let ally_radius = self.ai.config().coordinate_ally_radius;
        let cover_distance = self.config.simulation.cover_distance;

        for handle in thinking {
            let Some(entity) = self.pool.get(handle) else {
                continue;
            };
            let (position, heading, archetype, health_ratio) =
                (entity.position, entity.heading, entity.archetype, entity.health_ratio());

            self.peers.clear();
            self.peers.extend(self.pool.nearby_entities(position, ally_radius).map(|e| Peer {
                id: e.handle(),
                position: e.position,
                alive: e.is_alive(),
            }));

            let line_of_sight = snapshot.is_some_and(|p| has_line_of_sight(&self.obstacles, position, p.position));
            if line_of_sight {
                self.last_seen.insert(handle, self.clock);
            }
            let in_cover = self.obstacles.iter().any(|o| {
                o.collidable && planar_distance(o.position, position) <= o.radius + cover_distance
            });

            let ctx = AiBehaviorContext {
                self_id: handle,
                position,
                heading,
                archetype,
                health_ratio,
                player: snapshot,
                allies: &self.peers,
                obstacles: &self.obstacles,
                line_of_sight,
                heard_gunfire: player.shot_fired,
                time_since_seen: self.last_seen.get(&handle).map(|t| (self.clock - t) as f32),
                in_cover,
            };
            let decision = self.ai.decide(&ctx, dt, &mut self.rng);

            let profile = archetype.profile();
            let (new_position, velocity, new_heading) = if decision.moves_from(position) && dt > 0.0 {
                let query = NavQuery {
                    current: position,
                    target: decision.target_position,
                    heading: direction_from_yaw(heading),
                    obstacles: &self.obstacles,
                    peers: &self.peers,
                    self_id: handle,
                    dt,
                };
                let avoidance = self.ai.navigate(&query, &mut self.rng);
                let waypoint = avoidance.waypoint(decision.target_position);
                let direction = safe_normalize(flatten(planar_direction(position, waypoint) + avoidance.repulsion));
                let speed = profile.speed * decision.speed_multiplier;
                let travel = (speed * dt).min(planar_distance(position, waypoint));
                (
                    position + direction * travel,
                    direction * speed,
                    yaw_of(direction).unwrap_or(heading),
                )
            } else {
                (position, Vec3::ZERO, heading)
            };

            self.pool.apply_transform(handle, new_position, velocity, new_heading);
            self.pool.set_ai_state(handle, decision.state);

            if decision.attack_now {
                let ready = self.next_attack.get(&handle).map_or(true, |t| *t <= self.clock);
                if ready {
                    self.next_attack.insert(handle, self.clock + ATTACK_INTERVAL as f64);
                    report.attacks.push(AttackEvent {
                        handle,
                        archetype,
                        damage: profile.damage,
                    });
                }
            }
        }
    }

    /// Spawn one entity directly, bypassing the director. Returns `None`
    /// under backpressure.
    pub fn spawn(&mut self, archetype: Archetype, position: Vec3) -> Option<EntityHandle> {
        let handle = self.pool.acquire(archetype, position)?;
        self.ai.register(handle, archetype, position, &mut self.rng);
        Metrics::add(&self.metrics.spawns, 1);
        Some(handle)
    }

    /// Damage an entity. A kill releases the slot, drops its AI state and
    /// is reported to the spawn director.
    pub fn damage_entity(&mut self, handle: EntityHandle, amount: f32) -> Option<DamageOutcome> {
        let remaining = self.pool.apply_damage(handle, amount)?;
        let killed = remaining <= 0.0;
        if killed {
            self.despawn(handle);
            self.director.record_kill(self.clock);
            Metrics::add(&self.metrics.kills, 1);
            tracing::debug!(entity = handle.index, "entity killed");
        }
        Some(DamageOutcome { remaining, killed })
    }

    /// Remove an entity without counting a kill
    pub fn despawn(&mut self, handle: EntityHandle) -> bool {
        if !self.pool.is_current(handle) {
            return false;
        }
        self.ai.forget(handle);
        self.last_seen.remove(&handle);
        self.next_attack.remove(&handle);
        self.pool.release(handle)
    }

    /// Forward a gunfire sound from any gameplay system; hearing range is
    /// measured from each entity's current pool position
    pub fn notify_gunfire(&mut self, position: Vec3) -> usize {
        let listeners = self.pool.iter_in_use().map(|e| (e.handle(), e.position));
        self.ai.notify_gunfire(position, listeners)
    }

    /// Feed a measured FPS sample from the host's own frame timer
    pub fn record_fps_sample(&mut self, fps: f32) -> Option<CapAdjustment> {
        self.pool.record_fps_sample(fps)
    }
}

/// No collidable obstacle blocks the straight line between two points
fn has_line_of_sight(obstacles: &[Obstacle], from: Vec3, to: Vec3) -> bool {
    obstacles
        .iter()
        .filter(|o| o.collidable)
        .all(|o| distance_to_segment(o.position, from, to) >= o.radius)
}

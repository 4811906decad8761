//! AI decision engine
//!
//! Each tick every applicable behavior bids a fixed priority and the highest
//! bid wins, with ties going to the behavior already held. Re-selection
//! happens at most once per decision cooldown; in between, the held behavior
//! is re-evaluated against the fresh context so movement stays continuous.
//!
//! The engine also owns one [`NavRecord`] per agent for stuck detection.

use glam::Vec3;
use rand::Rng;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::config::{AiConfig, NavigationConfig};
use crate::game::archetype::Archetype;
use crate::game::constants::ai::{ALERT_MAX, INVESTIGATE_REACHED};
use crate::game::entity::{AiState, EntityHandle};
use crate::game::systems::behaviors::{AgentMemory, Behavior, Candidate};
use crate::game::systems::navigation::{NavQuery, NavRecord, Navigator, Obstacle, ObstacleAvoidanceResult, Peer};
use crate::util::math::planar_distance;

/// Behavioral temperament rolled per agent
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Personality {
    Aggressive,
    Tactical,
    Defensive,
    Support,
}

impl Personality {
    /// Personalities an archetype may roll
    pub fn options(archetype: Archetype) -> &'static [Personality] {
        match archetype {
            Archetype::Normal => &[
                Personality::Aggressive,
                Personality::Tactical,
                Personality::Defensive,
                Personality::Support,
            ],
            Archetype::Fast => &[Personality::Aggressive, Personality::Tactical],
            Archetype::Tank => &[Personality::Aggressive, Personality::Defensive],
            Archetype::Boss => &[Personality::Aggressive],
        }
    }

    pub fn roll<R: Rng + ?Sized>(archetype: Archetype, rng: &mut R) -> Self {
        let options = Self::options(archetype);
        options[rng.gen_range(0..options.len())]
    }
}

/// Player state as seen by one decision
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlayerSnapshot {
    pub position: Vec3,
    pub velocity: Vec3,
}

/// Immutable per-decision snapshot
#[derive(Debug, Clone, Copy)]
pub struct AiBehaviorContext<'a> {
    pub self_id: EntityHandle,
    pub position: Vec3,
    /// Yaw in radians, 0 facing +z
    pub heading: f32,
    pub archetype: Archetype,
    pub health_ratio: f32,
    pub player: Option<PlayerSnapshot>,
    /// Other live entities nearby
    pub allies: &'a [Peer],
    pub obstacles: &'a [Obstacle],
    pub line_of_sight: bool,
    pub heard_gunfire: bool,
    pub time_since_seen: Option<f32>,
    pub in_cover: bool,
}

impl<'a> AiBehaviorContext<'a> {
    /// Player snapshot, `None` when absent or not finite
    pub fn player(&self) -> Option<PlayerSnapshot> {
        self.player.filter(|p| p.position.is_finite()).map(|p| PlayerSnapshot {
            position: p.position,
            velocity: if p.velocity.is_finite() { p.velocity } else { Vec3::ZERO },
        })
    }

    /// Player present and in line of sight
    pub fn player_visible(&self) -> bool {
        self.line_of_sight && self.player().is_some()
    }
}

/// Engine output for one tick
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct AiDecision {
    pub state: AiState,
    pub target_position: Vec3,
    pub attack_now: bool,
    pub speed_multiplier: f32,
}

impl AiDecision {
    /// Stand still in patrol
    pub fn hold(position: Vec3) -> Self {
        Self {
            state: AiState::Patrol,
            target_position: position,
            attack_now: false,
            speed_multiplier: 0.0,
        }
    }

    /// True when following this decision moves the entity
    pub fn moves_from(&self, position: Vec3) -> bool {
        self.speed_multiplier > 0.0 && planar_distance(position, self.target_position) > f32::EPSILON
    }
}

#[derive(Debug, Clone)]
struct Agent {
    memory: AgentMemory,
    held: Behavior,
    cooldown: f32,
    last_position: Vec3,
    nav: NavRecord,
}

/// Owns per-agent memory and runs the behavior auction
#[derive(Debug, Default)]
pub struct AiDecisionEngine {
    config: AiConfig,
    navigator: Navigator,
    agents: FxHashMap<EntityHandle, Agent>,
    decisions: u64,
}

impl AiDecisionEngine {
    pub fn new(config: AiConfig, navigation: NavigationConfig) -> Self {
        Self {
            config,
            navigator: Navigator::new(navigation),
            agents: FxHashMap::default(),
            decisions: 0,
        }
    }

    pub fn config(&self) -> &AiConfig {
        &self.config
    }

    pub fn navigator(&self) -> &Navigator {
        &self.navigator
    }

    /// Start tracking a freshly spawned entity. Replaces any previous agent
    /// under the same handle, which resets its navigation record.
    pub fn register<R: Rng + ?Sized>(
        &mut self,
        handle: EntityHandle,
        archetype: Archetype,
        spawn_position: Vec3,
        rng: &mut R,
    ) -> Personality {
        let personality = Personality::roll(archetype, rng);
        let agent = Agent {
            memory: AgentMemory::new(archetype, personality, spawn_position, rng),
            held: Behavior::Patrol,
            cooldown: 0.0,
            last_position: spawn_position,
            nav: NavRecord::new(),
        };
        self.agents.insert(handle, agent);
        personality
    }

    /// Drop all state for a released entity
    pub fn forget(&mut self, handle: EntityHandle) -> bool {
        self.agents.remove(&handle).is_some()
    }

    pub fn len(&self) -> usize {
        self.agents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.agents.is_empty()
    }

    /// Total re-selections performed
    pub fn decisions_made(&self) -> u64 {
        self.decisions
    }

    pub fn personality(&self, handle: EntityHandle) -> Option<Personality> {
        self.agents.get(&handle).map(|a| a.memory.personality)
    }

    pub fn alert_level(&self, handle: EntityHandle) -> Option<f32> {
        self.agents.get(&handle).map(|a| a.memory.alert)
    }

    pub fn investigate_target(&self, handle: EntityHandle) -> Option<Vec3> {
        self.agents
            .get(&handle)
            .and_then(|a| a.memory.investigate)
            .map(|i| i.target)
    }

    /// Produce this tick's decision for `ctx.self_id`. Unknown handles are
    /// registered on first sight.
    pub fn decide<R: Rng + ?Sized>(&mut self, ctx: &AiBehaviorContext<'_>, dt: f32, rng: &mut R) -> AiDecision {
        let dt = if dt.is_finite() && dt > 0.0 { dt } else { 0.0 };

        if !self.agents.contains_key(&ctx.self_id) {
            let anchor = if ctx.position.is_finite() { ctx.position } else { Vec3::ZERO };
            self.register(ctx.self_id, ctx.archetype, anchor, rng);
        }
        let Some(agent) = self.agents.get_mut(&ctx.self_id) else {
            return AiDecision::hold(ctx.position);
        };

        if !ctx.position.is_finite() {
            agent.held = Behavior::Patrol;
            return AiDecision::hold(agent.last_position);
        }
        agent.last_position = ctx.position;
        update_awareness(&mut agent.memory, ctx, dt, &self.config);

        agent.cooldown -= dt;
        if agent.cooldown > 0.0 {
            if let Some(held) = agent.held.evaluate(&mut agent.memory, ctx, &self.config, rng) {
                return held.decision;
            }
        }

        let previous = agent.held;
        let mut best: Option<Candidate> = None;
        for behavior in Behavior::AUCTION {
            let Some(candidate) = behavior.evaluate(&mut agent.memory, ctx, &self.config, rng) else {
                continue;
            };
            best = match best {
                Some(current)
                    if candidate.priority < current.priority
                        || (candidate.priority == current.priority && candidate.behavior != previous) =>
                {
                    Some(current)
                }
                _ => Some(candidate),
            };
        }
        let Some(mut chosen) = best else {
            return AiDecision::hold(ctx.position);
        };

        if chosen.behavior != previous {
            agent.memory.reroll(rng);
            if let Some(refreshed) = chosen.behavior.evaluate(&mut agent.memory, ctx, &self.config, rng) {
                chosen = refreshed;
            }
            tracing::trace!(
                entity = ctx.self_id.index,
                from = ?previous.ai_state(),
                to = ?chosen.decision.state,
                priority = chosen.priority,
                "behavior changed"
            );
        }

        agent.held = chosen.behavior;
        agent.cooldown = self.config.decision_cooldown;
        self.decisions += 1;
        chosen.decision
    }

    /// Plan local movement for an agent using its own stuck history
    pub fn navigate<R: Rng + ?Sized>(&mut self, query: &NavQuery<'_>, rng: &mut R) -> ObstacleAvoidanceResult {
        match self.agents.get_mut(&query.self_id) {
            Some(agent) => self.navigator.plan(&mut agent.nav, query, rng),
            None => self.navigator.plan(&mut NavRecord::new(), query, rng),
        }
    }

    /// A shot was heard at `position`. `listeners` carries the current
    /// position of each entity that could hear it; registered agents among
    /// them within hearing range gain alert and investigate the origin.
    /// Returns the number alerted.
    pub fn notify_gunfire(
        &mut self,
        position: Vec3,
        listeners: impl IntoIterator<Item = (EntityHandle, Vec3)>,
    ) -> usize {
        if !position.is_finite() {
            return 0;
        }
        let range = self.config.gunfire_hearing_range;
        let mut alerted = 0;
        for (handle, current) in listeners {
            let Some(agent) = self.agents.get_mut(&handle) else {
                continue;
            };
            if current.is_finite() {
                agent.last_position = current;
            }
            if planar_distance(agent.last_position, position) <= range {
                agent.memory.hear(position, &self.config);
                alerted += 1;
            }
        }
        if alerted > 0 {
            tracing::debug!(alerted, x = position.x, z = position.z, "gunfire heard");
        }
        alerted
    }
}

/// Advance alert level, last known position and investigation progress
fn update_awareness(memory: &mut AgentMemory, ctx: &AiBehaviorContext<'_>, dt: f32, config: &AiConfig) {
    let player = ctx.player();

    if let (true, Some(player)) = (ctx.line_of_sight, player) {
        memory.alert += config.alert_gain_visible * dt;
        memory.last_known_player = Some(player.position);
    } else {
        memory.alert -= config.alert_decay * dt;
        if let Some(known) = memory.last_known_player {
            if planar_distance(ctx.position, known) < INVESTIGATE_REACHED {
                memory.last_known_player = None;
            }
        }
    }
    memory.alert = memory.alert.clamp(0.0, ALERT_MAX);

    if ctx.heard_gunfire {
        if let Some(player) = player {
            if planar_distance(ctx.position, player.position) <= config.gunfire_hearing_range {
                memory.hear(player.position, config);
            }
        }
    }

    if let Some(investigation) = memory.investigate.as_mut() {
        investigation.elapsed += dt;
        let reached = planar_distance(ctx.position, investigation.target) < INVESTIGATE_REACHED;
        if reached || investigation.elapsed > config.investigate_timeout {
            memory.investigate = None;
        }
    }
}

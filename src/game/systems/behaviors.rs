//! Candidate evaluators for the behavior auction
//!
//! Each [`Behavior`] scores itself independently against a context snapshot.
//! An evaluator returns `None` when it is not applicable; the engine adopts
//! the highest priority among the rest.

use std::f32::consts::TAU;

use glam::Vec3;
use rand::Rng;

use crate::config::AiConfig;
use crate::game::archetype::Archetype;
use crate::game::constants::ai::*;
use crate::game::entity::AiState;
use crate::game::systems::ai::{AiBehaviorContext, AiDecision, Personality, PlayerSnapshot};
use crate::util::math::{direction_from_yaw, planar_direction, planar_distance, rotate_y};

/// Internal behavior, finer grained than the public [`AiState`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) enum Behavior {
    Attack,
    Hunt,
    Ambush,
    Coordinate,
    Investigate,
    Retreat,
    Patrol,
}

impl Behavior {
    /// Evaluation order; ties that do not involve the held behavior go to
    /// the earlier entry
    pub const AUCTION: [Behavior; 7] = [
        Behavior::Attack,
        Behavior::Hunt,
        Behavior::Ambush,
        Behavior::Coordinate,
        Behavior::Investigate,
        Behavior::Retreat,
        Behavior::Patrol,
    ];

    pub fn ai_state(self) -> AiState {
        match self {
            Behavior::Attack => AiState::Attack,
            Behavior::Hunt | Behavior::Investigate => AiState::Hunt,
            Behavior::Ambush => AiState::Ambush,
            Behavior::Coordinate => AiState::Coordinate,
            Behavior::Retreat => AiState::Retreat,
            Behavior::Patrol => AiState::Patrol,
        }
    }

    pub fn evaluate<R: Rng + ?Sized>(
        self,
        memory: &mut AgentMemory,
        ctx: &AiBehaviorContext<'_>,
        config: &AiConfig,
        rng: &mut R,
    ) -> Option<Candidate> {
        match self {
            Behavior::Attack => attack(ctx, config),
            Behavior::Hunt => hunt(memory, ctx, config),
            Behavior::Ambush => ambush(memory, ctx, config),
            Behavior::Coordinate => coordinate(memory, ctx, config),
            Behavior::Investigate => investigate(memory),
            Behavior::Retreat => retreat(memory, ctx, config),
            Behavior::Patrol => Some(patrol(memory, ctx, rng)),
        }
    }
}

/// A scored bid in the auction
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct Candidate {
    pub behavior: Behavior,
    pub priority: f32,
    pub decision: AiDecision,
}

impl Candidate {
    fn new(behavior: Behavior, priority: f32, target: Vec3, attack_now: bool, speed: f32) -> Self {
        Self {
            behavior,
            priority,
            decision: AiDecision {
                state: behavior.ai_state(),
                target_position: target,
                attack_now,
                speed_multiplier: speed,
            },
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct Investigation {
    pub target: Vec3,
    pub elapsed: f32,
}

/// Per-agent state the evaluators read and, for patrol, update
#[derive(Debug, Clone)]
pub(crate) struct AgentMemory {
    pub archetype: Archetype,
    pub personality: Personality,
    /// 0..=ALERT_MAX
    pub alert: f32,
    pub last_known_player: Option<Vec3>,
    pub investigate: Option<Investigation>,
    /// Signed flank offset in radians
    pub flank_angle: f32,
    pub flank_radius: f32,
    /// Offset inside the unit disk, scaled per hunt style
    pub jitter: Vec3,
    /// Angular jitter of the encirclement slot in radians
    pub slot_jitter: f32,
    pub patrol_anchor: Vec3,
    pub patrol_waypoint: Option<Vec3>,
}

impl AgentMemory {
    pub fn new<R: Rng + ?Sized>(
        archetype: Archetype,
        personality: Personality,
        anchor: Vec3,
        rng: &mut R,
    ) -> Self {
        let mut memory = Self {
            archetype,
            personality,
            alert: 0.0,
            last_known_player: None,
            investigate: None,
            flank_angle: 0.0,
            flank_radius: FLANK_RADIUS_MIN,
            jitter: Vec3::ZERO,
            slot_jitter: 0.0,
            patrol_anchor: anchor,
            patrol_waypoint: None,
        };
        memory.reroll(rng);
        memory
    }

    /// Draw fresh randomized parameters so grouped agents do not move in lockstep
    pub fn reroll<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        let side = if rng.gen_bool(0.5) { 1.0 } else { -1.0 };
        self.flank_angle = side * rng.gen_range(FLANK_ANGLE_MIN..=FLANK_ANGLE_MAX).to_radians();
        self.flank_radius = rng.gen_range(FLANK_RADIUS_MIN..=FLANK_RADIUS_MAX);
        self.jitter = random_in_disk(rng);
        self.slot_jitter = rng
            .gen_range(-COORDINATE_JITTER_DEG..=COORDINATE_JITTER_DEG)
            .to_radians();
    }

    /// Raise alert and start investigating a heard sound
    pub fn hear(&mut self, origin: Vec3, config: &AiConfig) {
        self.alert = (self.alert + config.alert_gain_gunfire).min(ALERT_MAX);
        self.investigate = Some(Investigation {
            target: origin,
            elapsed: 0.0,
        });
    }

    /// Tactical agents in cover wait for a nearby unseen player instead of
    /// hunting blind
    fn ambush_ready(&self, ctx: &AiBehaviorContext<'_>, config: &AiConfig) -> bool {
        if self.personality != Personality::Tactical || !ctx.in_cover || ctx.player_visible() {
            return false;
        }
        if self.alert <= config.alert_hunt_threshold {
            return false;
        }
        if ctx
            .time_since_seen
            .is_some_and(|t| !t.is_finite() || t > config.investigate_timeout)
        {
            return false;
        }
        let Some(known) = ctx.player().map(|p| p.position).or(self.last_known_player) else {
            return false;
        };
        planar_distance(ctx.position, known) <= AMBUSH_RANGE
    }
}

/// Uniform random point in the unit disk on the ground plane
pub(crate) fn random_in_disk<R: Rng + ?Sized>(rng: &mut R) -> Vec3 {
    let angle = rng.gen_range(0.0..TAU);
    let radius = rng.gen::<f32>().sqrt();
    direction_from_yaw(angle) * radius
}

fn attack(ctx: &AiBehaviorContext<'_>, config: &AiConfig) -> Option<Candidate> {
    let player = ctx.player()?;
    if !ctx.line_of_sight || planar_distance(ctx.position, player.position) >= config.attack_range {
        return None;
    }
    let predicted = player.position + player.velocity * ATTACK_LEAD_TIME;
    let back_off = planar_direction(predicted, ctx.position);
    Some(Candidate::new(
        Behavior::Attack,
        PRIORITY_ATTACK,
        predicted + back_off * ATTACK_STANDOFF,
        true,
        SPEED_ATTACK,
    ))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum HuntStyle {
    Flank,
    Charge,
    Direct,
}

fn hunt_style(personality: Personality, archetype: Archetype) -> HuntStyle {
    match (personality, archetype) {
        (Personality::Tactical, _) => HuntStyle::Flank,
        (Personality::Aggressive, _) => HuntStyle::Charge,
        (_, Archetype::Fast) => HuntStyle::Flank,
        (_, Archetype::Tank) => HuntStyle::Charge,
        _ => HuntStyle::Direct,
    }
}

fn hunt(memory: &AgentMemory, ctx: &AiBehaviorContext<'_>, config: &AiConfig) -> Option<Candidate> {
    let (focus, velocity) = match ctx.player() {
        Some(PlayerSnapshot { position, velocity }) if ctx.line_of_sight => (position, velocity),
        _ => {
            if memory.alert <= config.alert_hunt_threshold || memory.ambush_ready(ctx, config) {
                return None;
            }
            (memory.last_known_player?, Vec3::ZERO)
        }
    };

    let (target, speed) = match hunt_style(memory.personality, memory.archetype) {
        HuntStyle::Flank => {
            let mut from_focus = planar_direction(focus, ctx.position);
            if from_focus == Vec3::ZERO {
                from_focus = Vec3::Z;
            }
            let offset = rotate_y(from_focus, memory.flank_angle) * memory.flank_radius;
            (focus + offset, SPEED_HUNT)
        }
        HuntStyle::Charge => (
            focus + velocity * CHARGE_LEAD_TIME + memory.jitter * CHARGE_JITTER,
            SPEED_CHARGE,
        ),
        HuntStyle::Direct => (focus + memory.jitter * HUNT_JITTER, SPEED_HUNT),
    };

    Some(Candidate::new(Behavior::Hunt, PRIORITY_HUNT, target, false, speed))
}

fn ambush(memory: &AgentMemory, ctx: &AiBehaviorContext<'_>, config: &AiConfig) -> Option<Candidate> {
    memory.ambush_ready(ctx, config).then(|| {
        Candidate::new(Behavior::Ambush, PRIORITY_AMBUSH, ctx.position, false, 0.0)
    })
}

fn coordinate(memory: &AgentMemory, ctx: &AiBehaviorContext<'_>, config: &AiConfig) -> Option<Candidate> {
    let player = ctx.player()?;
    if planar_distance(ctx.position, player.position) >= config.coordinate_player_range {
        return None;
    }

    let mut group: Vec<_> = ctx
        .allies
        .iter()
        .filter(|ally| {
            ally.alive
                && ally.id != ctx.self_id
                && ally.position.is_finite()
                && planar_distance(ally.position, ctx.position) <= config.coordinate_ally_radius
        })
        .map(|ally| ally.id)
        .collect();
    if group.len() < config.coordinate_min_allies {
        return None;
    }

    group.push(ctx.self_id);
    group.sort_unstable();
    group.dedup();
    let slot = group.iter().position(|id| *id == ctx.self_id)?;
    let angle = slot as f32 / group.len() as f32 * TAU + memory.slot_jitter;
    let target = player.position + direction_from_yaw(angle) * COORDINATE_RING_RADIUS;

    Some(Candidate::new(
        Behavior::Coordinate,
        PRIORITY_COORDINATE,
        target,
        false,
        SPEED_COORDINATE,
    ))
}

fn investigate(memory: &AgentMemory) -> Option<Candidate> {
    let investigation = memory.investigate?;
    Some(Candidate::new(
        Behavior::Investigate,
        PRIORITY_INVESTIGATE,
        investigation.target,
        false,
        SPEED_INVESTIGATE,
    ))
}

fn retreat(memory: &AgentMemory, ctx: &AiBehaviorContext<'_>, config: &AiConfig) -> Option<Candidate> {
    if memory.personality != Personality::Defensive {
        return None;
    }
    let health = ctx.health_ratio;
    if !health.is_finite() || health >= config.retreat_health {
        return None;
    }
    let priority = if health < config.retreat_critical_health {
        PRIORITY_RETREAT_CRITICAL
    } else {
        PRIORITY_RETREAT
    };

    let threat = ctx.player().map(|p| p.position).or(memory.last_known_player);
    let target = match threat {
        Some(threat) => {
            let mut away = planar_direction(threat, ctx.position);
            if away == Vec3::ZERO {
                away = planar_direction(ctx.position, memory.patrol_anchor);
            }
            ctx.position + away * RETREAT_DISTANCE
        }
        None => memory.patrol_anchor,
    };

    Some(Candidate::new(Behavior::Retreat, priority, target, false, SPEED_RETREAT))
}

fn patrol<R: Rng + ?Sized>(memory: &mut AgentMemory, ctx: &AiBehaviorContext<'_>, rng: &mut R) -> Candidate {
    let waypoint = match memory.patrol_waypoint {
        Some(w) if planar_distance(ctx.position, w) > PATROL_REACHED => w,
        _ => {
            let w = memory.patrol_anchor + random_in_disk(rng) * PATROL_RADIUS;
            memory.patrol_waypoint = Some(w);
            w
        }
    };
    Candidate::new(Behavior::Patrol, PRIORITY_PATROL, waypoint, false, SPEED_PATROL)
}

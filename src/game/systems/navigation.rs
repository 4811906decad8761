//! Local obstacle avoidance
//!
//! Turns a desired destination into a locally safe waypoint:
//! 1. Stuck detection over a rolling displacement window
//! 2. Direct path test against every collidable obstacle
//! 3. A ray fan around the current heading when blocked or stuck
//! 4. Personal-space repulsion from nearby peers, always reported
//!
//! The planner itself is stateless; the rolling movement history and the
//! committed escape heading live in a [`NavRecord`] owned per entity by the
//! AI engine.

use std::collections::VecDeque;
use std::f32::consts::TAU;

use glam::Vec3;
use rand::Rng;

use crate::config::NavigationConfig;
use crate::game::entity::EntityHandle;
use crate::util::math::{distance_within_segment, flatten, planar_direction, rotate_y, safe_normalize};

/// Static world obstacle
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Obstacle {
    pub position: Vec3,
    pub radius: f32,
    pub collidable: bool,
}

impl Obstacle {
    pub fn new(position: Vec3, radius: f32) -> Self {
        Self {
            position,
            radius,
            collidable: true,
        }
    }
}

/// Another entity considered for personal space
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Peer {
    pub id: EntityHandle,
    pub position: Vec3,
    pub alive: bool,
}

/// Outcome of one navigation query
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ObstacleAvoidanceResult {
    pub can_move_directly: bool,
    /// Waypoint to steer toward instead of the target
    pub alternative: Option<Vec3>,
    pub is_stuck: bool,
    /// Add to the chosen movement direction; never replaces it
    pub repulsion: Vec3,
}

impl ObstacleAvoidanceResult {
    /// Waypoint the entity should head for this tick
    pub fn waypoint(&self, target: Vec3) -> Vec3 {
        self.alternative.unwrap_or(target)
    }
}

/// Per-entity rolling movement history for stuck detection
#[derive(Debug, Clone, Default)]
pub struct NavRecord {
    clock: f32,
    samples: VecDeque<(f32, Vec3)>,
    /// Escape heading kept while the entity stays stuck
    escape: Option<Vec3>,
}

impl NavRecord {
    pub fn new() -> Self {
        Self::default()
    }

    fn record(&mut self, position: Vec3, dt: f32, window: f32) {
        if dt.is_finite() && dt > 0.0 {
            self.clock += dt;
        }
        self.samples.push_back((self.clock, position));
        // Keep one sample at or beyond the window edge so coverage is measurable
        while self.samples.len() > 2 {
            match self.samples.get(1) {
                Some(&(t, _)) if self.clock - t >= window => {
                    self.samples.pop_front();
                }
                _ => break,
            }
        }
    }

    /// Stuck when the history spans the whole window and every sample stays
    /// within `threshold` of the newest one
    fn is_stuck(&self, window: f32, threshold: f32) -> bool {
        let (Some(&(oldest, _)), Some(&(_, newest))) = (self.samples.front(), self.samples.back()) else {
            return false;
        };
        if self.clock - oldest < window {
            return false;
        }
        self.samples
            .iter()
            .filter(|(t, _)| self.clock - t <= window)
            .chain(self.samples.front())
            .all(|(_, p)| flatten(*p - newest).length() < threshold)
    }
}

/// One navigation request
#[derive(Debug, Clone, Copy)]
pub struct NavQuery<'a> {
    pub current: Vec3,
    pub target: Vec3,
    /// Current facing direction; the ray fan is centered on it
    pub heading: Vec3,
    pub obstacles: &'a [Obstacle],
    pub peers: &'a [Peer],
    pub self_id: EntityHandle,
    pub dt: f32,
}

/// Stateless local planner
#[derive(Debug, Clone, Default)]
pub struct Navigator {
    config: NavigationConfig,
}

impl Navigator {
    pub fn new(config: NavigationConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &NavigationConfig {
        &self.config
    }

    /// Plan one step toward `query.target`
    pub fn plan<R: Rng + ?Sized>(
        &self,
        record: &mut NavRecord,
        query: &NavQuery<'_>,
        rng: &mut R,
    ) -> ObstacleAvoidanceResult {
        record.record(query.current, query.dt, self.config.stuck_window);
        let is_stuck = record.is_stuck(self.config.stuck_window, self.config.stuck_threshold);
        if !is_stuck {
            record.escape = None;
        }
        let repulsion = self.personal_space(query.current, query.peers, query.self_id);

        if !(query.current.is_finite() && query.target.is_finite()) {
            return ObstacleAvoidanceResult {
                can_move_directly: false,
                alternative: None,
                is_stuck,
                repulsion,
            };
        }

        let can_move_directly = self.is_path_clear(query.current, query.target, query.obstacles);
        let alternative = if !can_move_directly || is_stuck {
            self.find_alternative(record, query, is_stuck, rng)
        } else {
            None
        };

        ObstacleAvoidanceResult {
            can_move_directly,
            alternative,
            is_stuck,
            repulsion,
        }
    }

    /// True when no collidable obstacle that projects onto the segment
    /// `from`-`to` comes within radius + margin of it. Obstacles behind
    /// `from` or past `to` never block.
    pub fn is_path_clear(&self, from: Vec3, to: Vec3, obstacles: &[Obstacle]) -> bool {
        obstacles.iter().filter(|o| o.collidable).all(|o| {
            distance_within_segment(o.position, from, to)
                .map_or(true, |d| d >= o.radius + self.config.safety_margin)
        })
    }

    fn find_alternative<R: Rng + ?Sized>(
        &self,
        record: &mut NavRecord,
        query: &NavQuery<'_>,
        is_stuck: bool,
        rng: &mut R,
    ) -> Option<Vec3> {
        let length = self.config.ray_length;

        if is_stuck {
            let escape = record
                .escape
                .unwrap_or_else(|| rotate_y(Vec3::Z, rng.gen_range(0.0..TAU)));
            let end = query.current + escape * length;
            if self.is_path_clear(query.current, end, query.obstacles) {
                record.escape = Some(escape);
                return Some(end);
            }
            record.escape = None;
        }

        let to_target = planar_direction(query.current, query.target);
        let heading = {
            let h = safe_normalize(flatten(query.heading));
            if h == Vec3::ZERO { to_target } else { h }
        };
        let heading = if heading == Vec3::ZERO { Vec3::Z } else { heading };

        let count = self.config.ray_count.max(1);
        let step = TAU / count as f32;
        let mut best: Option<(f32, Vec3)> = None;

        for i in 0..count {
            let dir = rotate_y(heading, step * i as f32);
            let end = query.current + dir * length;
            if !self.is_path_clear(query.current, end, query.obstacles) {
                continue;
            }
            let score =
                dir.dot(to_target) - self.config.ray_distance_penalty * end.distance(query.target);
            if best.map_or(true, |(s, _)| score > s) {
                best = Some((score, end));
            }
        }

        best.map(|(_, end)| end)
    }

    /// Depth-weighted repulsion from living peers inside personal space,
    /// averaged over the number of intrusions
    pub fn personal_space(&self, position: Vec3, peers: &[Peer], self_id: EntityHandle) -> Vec3 {
        let radius = self.config.personal_space;
        let mut sum = Vec3::ZERO;
        let mut intrusions = 0u32;

        for peer in peers {
            if peer.id == self_id || !peer.alive {
                continue;
            }
            let offset = flatten(position - peer.position);
            let distance = offset.length();
            if distance < radius {
                let depth = (radius - distance) / radius;
                sum += safe_normalize(offset) * depth;
                intrusions += 1;
            }
        }

        if intrusions == 0 {
            Vec3::ZERO
        } else {
            sum / intrusions as f32
        }
    }
}

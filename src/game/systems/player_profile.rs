//! Rolling model of player behavior
//!
//! Keeps a time-windowed history of player positions and derives a movement
//! pattern, a favored-area centroid and camping/retreating/aggression flags.
//! Memory is bounded by evicting samples older than the history window.

use std::collections::VecDeque;

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::config::SpawnConfig;
use crate::game::constants::pattern::*;
use crate::util::math::{flatten, planar_distance, safe_normalize};

/// Coarse classification of recent player movement
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MovementPattern {
    #[default]
    Stationary,
    Circular,
    Linear,
    Erratic,
    Tactical,
}

/// Summary statistics the classifier works from
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PatternMetrics {
    pub path_length: f32,
    /// Distance between the oldest and newest sample
    pub displacement: f32,
    /// 1 - |mean step direction|, 0 when every step points the same way
    pub alignment_variance: f32,
    /// Share of consecutive steps that turn sharply
    pub sharp_turn_ratio: f32,
}

impl PatternMetrics {
    pub fn classify(&self) -> MovementPattern {
        if self.path_length < STATIONARY_PATH {
            return MovementPattern::Stationary;
        }
        let straightness = self.displacement / self.path_length;
        if straightness > LINEAR_STRAIGHTNESS {
            MovementPattern::Linear
        } else if self.sharp_turn_ratio > ERRATIC_TURN_RATIO {
            MovementPattern::Erratic
        } else if straightness < CIRCULAR_RETURN_RATIO && self.alignment_variance > CIRCULAR_VARIANCE {
            MovementPattern::Circular
        } else {
            MovementPattern::Tactical
        }
    }
}

/// Flags consumed by the spawn director
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct PlayerAssessment {
    pub pattern: MovementPattern,
    pub camping: bool,
    pub retreating: bool,
    pub aggressive: bool,
}

#[derive(Debug, Clone, Copy)]
struct Sample {
    at: f64,
    position: Vec3,
}

#[derive(Debug, Clone)]
pub struct PlayerBehaviorProfile {
    config: SpawnConfig,
    history: VecDeque<Sample>,
    kills: VecDeque<f64>,
    velocity: Vec3,
    /// Last non-zero movement direction
    heading: Vec3,
    /// Centroid the retreat distances were measured against
    retreat_anchor: Option<Vec3>,
    retreat_distances: VecDeque<f32>,
    metrics: PatternMetrics,
    assessment: PlayerAssessment,
    now: f64,
}

impl PlayerBehaviorProfile {
    pub fn new(config: SpawnConfig) -> Self {
        Self {
            config,
            history: VecDeque::new(),
            kills: VecDeque::new(),
            velocity: Vec3::ZERO,
            heading: Vec3::ZERO,
            retreat_anchor: None,
            retreat_distances: VecDeque::new(),
            metrics: PatternMetrics::default(),
            assessment: PlayerAssessment::default(),
            now: 0.0,
        }
    }

    /// Record a telemetry sample and refresh every derived flag.
    /// `spawn_centroid` is the centroid of the most recent spawn wave.
    pub fn observe(&mut self, now: f64, position: Vec3, velocity: Vec3, spawn_centroid: Option<Vec3>) {
        if !position.is_finite() || !now.is_finite() {
            return;
        }
        // Samples must be time-ordered; a repeated timestamp replaces the last one
        if let Some(last) = self.history.back_mut() {
            if now < last.at {
                return;
            }
            if now == last.at {
                last.position = position;
            } else {
                self.history.push_back(Sample { at: now, position });
            }
        } else {
            self.history.push_back(Sample { at: now, position });
        }
        self.now = now;

        self.velocity = if velocity.is_finite() { flatten(velocity) } else { Vec3::ZERO };
        let direction = safe_normalize(self.velocity);
        if direction != Vec3::ZERO {
            self.heading = direction;
        }

        let horizon = self.config.history_window as f64;
        while self.history.front().is_some_and(|s| now - s.at > horizon) {
            self.history.pop_front();
        }
        self.evict_kills();

        self.update_retreat(position, spawn_centroid);
        self.metrics = self.compute_metrics();
        self.assessment = PlayerAssessment {
            pattern: self.metrics.classify(),
            camping: self.detect_camping(),
            retreating: self.is_retreating(),
            aggressive: self.kills.len() >= self.config.aggression_kills,
        };
    }

    /// Record a kill made by the player
    pub fn record_kill(&mut self, now: f64) {
        if !now.is_finite() {
            return;
        }
        self.kills.push_back(now);
        self.now = self.now.max(now);
        self.evict_kills();
        self.assessment.aggressive = self.kills.len() >= self.config.aggression_kills;
    }

    fn evict_kills(&mut self) {
        let window = self.config.aggression_window as f64;
        let now = self.now;
        while self.kills.front().is_some_and(|t| now - t > window) {
            self.kills.pop_front();
        }
    }

    fn update_retreat(&mut self, position: Vec3, centroid: Option<Vec3>) {
        let Some(centroid) = centroid.filter(|c| c.is_finite()) else {
            self.retreat_anchor = None;
            self.retreat_distances.clear();
            return;
        };
        if self.retreat_anchor != Some(centroid) {
            self.retreat_anchor = Some(centroid);
            self.retreat_distances.clear();
        }
        self.retreat_distances.push_back(planar_distance(position, centroid));
        while self.retreat_distances.len() > self.config.retreat_samples {
            self.retreat_distances.pop_front();
        }
    }

    fn is_retreating(&self) -> bool {
        self.config.retreat_samples >= 2
            && self.retreat_distances.len() == self.config.retreat_samples
            && self
                .retreat_distances
                .iter()
                .zip(self.retreat_distances.iter().skip(1))
                .all(|(a, b)| b > a)
    }

    fn detect_camping(&self) -> bool {
        let (Some(oldest), Some(latest)) = (self.history.front(), self.history.back()) else {
            return false;
        };
        let window_start = latest.at - self.config.camping_window as f64;
        if oldest.at > window_start {
            return false;
        }
        // Include the last sample at or before the window start so the whole
        // window is covered
        let first_in_window = self
            .history
            .iter()
            .rposition(|s| s.at <= window_start)
            .unwrap_or(0);
        self.history
            .iter()
            .skip(first_in_window)
            .all(|s| planar_distance(s.position, latest.position) < self.config.camping_radius)
    }

    fn compute_metrics(&self) -> PatternMetrics {
        let mut steps = Vec::with_capacity(self.history.len());
        let mut path_length = 0.0;
        for (a, b) in self.history.iter().zip(self.history.iter().skip(1)) {
            let step = flatten(b.position - a.position);
            let length = step.length();
            path_length += length;
            if length >= MIN_STEP {
                steps.push(step / length);
            }
        }

        let displacement = match (self.history.front(), self.history.back()) {
            (Some(first), Some(last)) => planar_distance(first.position, last.position),
            _ => 0.0,
        };

        let alignment_variance = if steps.is_empty() {
            0.0
        } else {
            let mean = steps.iter().copied().sum::<Vec3>() / steps.len() as f32;
            (1.0 - mean.length()).clamp(0.0, 1.0)
        };

        let sharp_turn_ratio = if steps.len() < 2 {
            0.0
        } else {
            let sharp = steps
                .iter()
                .zip(steps.iter().skip(1))
                .filter(|(a, b)| a.dot(**b) < SHARP_TURN_DOT)
                .count();
            sharp as f32 / (steps.len() - 1) as f32
        };

        PatternMetrics {
            path_length,
            displacement,
            alignment_variance,
            sharp_turn_ratio,
        }
    }

    pub fn assessment(&self) -> PlayerAssessment {
        self.assessment
    }

    pub fn pattern(&self) -> MovementPattern {
        self.assessment.pattern
    }

    pub fn metrics(&self) -> PatternMetrics {
        self.metrics
    }

    pub fn is_camping(&self) -> bool {
        self.assessment.camping
    }

    pub fn is_aggressive(&self) -> bool {
        self.assessment.aggressive
    }

    /// Kills inside the aggression window as of the last update
    pub fn recent_kills(&self) -> usize {
        self.kills.len()
    }

    /// Mean of the retained positions
    pub fn favored_area(&self) -> Option<Vec3> {
        if self.history.is_empty() {
            return None;
        }
        let sum: Vec3 = self.history.iter().map(|s| s.position).sum();
        Some(sum / self.history.len() as f32)
    }

    /// Last non-zero movement direction, zero before the player first moves
    pub fn heading(&self) -> Vec3 {
        self.heading
    }

    pub fn latest_position(&self) -> Option<Vec3> {
        self.history.back().map(|s| s.position)
    }

    pub fn sample_count(&self) -> usize {
        self.history.len()
    }

    /// Expected player position `horizon` seconds ahead
    pub fn predict(&self, horizon: f32) -> Option<Vec3> {
        let current = self.latest_position()?;
        let predicted = match self.assessment.pattern {
            MovementPattern::Stationary => current,
            MovementPattern::Linear => current + self.velocity * horizon,
            MovementPattern::Circular => {
                let projected = current + self.velocity * horizon;
                match self.favored_area() {
                    Some(favored) => projected.lerp(favored, self.config.favored_pull),
                    None => projected,
                }
            }
            MovementPattern::Erratic | MovementPattern::Tactical => {
                current + self.velocity * horizon * SHORT_HORIZON_SCALE
            }
        };
        Some(predicted)
    }
}

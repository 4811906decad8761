//! Predictive spawn director
//!
//! Turns the player behavior model into spawn strategies:
//! 1. Composition from difficulty and skill, with a fast pair against campers
//! 2. A ring of candidate points around the predicted player position
//! 3. Candidate scoring (distance band, ahead of travel, separation, heat,
//!    behind a camper, flanking a tactical mover)
//! 4. Timing: immediate, wave or staggered
//!
//! The director never creates entities. The orchestrator executes the
//! returned strategy through the resource manager and reports completion.

use std::f32::consts::TAU;

use glam::Vec3;
use rand::Rng;
use rustc_hash::FxHashMap;
use serde::Serialize;
use smallvec::SmallVec;

use crate::config::SpawnConfig;
use crate::game::archetype::Archetype;
use crate::game::constants::spawn::*;
use crate::game::systems::player_profile::{MovementPattern, PlayerAssessment, PlayerBehaviorProfile};
use crate::util::math::{direction_from_yaw, flatten, planar_direction, planar_distance, safe_normalize};

/// How a strategy's spawns are released
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SpawnTiming {
    /// Everything at once, to punish camping
    Immediate,
    /// One entity per inter-spawn delay
    Staggered,
    /// Everything at once as a burst challenge
    Wave,
}

/// Why a spawn point scored well
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SpawnRationale {
    AheadOfPlayer,
    BehindCamper,
    Flank,
    Perimeter,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CompositionEntry {
    pub archetype: Archetype,
    pub count: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SpawnPoint {
    pub position: Vec3,
    pub archetype: Archetype,
    /// Candidate score; higher placed first
    pub priority: f32,
    pub rationale: SpawnRationale,
    pub threat: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct StrategyId(pub u64);

/// One planned batch of spawns, consumed once by the orchestrator
#[derive(Debug, Clone, Serialize)]
pub struct SpawnStrategy {
    pub id: StrategyId,
    pub composition: Vec<CompositionEntry>,
    pub points: Vec<SpawnPoint>,
    pub timing: SpawnTiming,
    /// Delay between consecutive spawns; zero unless staggered
    pub delay_ms: u32,
    pub predicted_player: Vec3,
    pub assessment: PlayerAssessment,
}

impl SpawnStrategy {
    /// Sum of composition counts, always equal to `points.len()`
    pub fn total(&self) -> usize {
        self.composition.iter().map(|c| c.count).sum()
    }

    pub fn delay_secs(&self) -> f32 {
        self.delay_ms as f32 / 1000.0
    }

    pub fn count_of(&self, archetype: Archetype) -> usize {
        self.composition
            .iter()
            .filter(|c| c.archetype == archetype)
            .map(|c| c.count)
            .sum()
    }
}

/// Axis-aligned world limits on the ground plane
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WorldBounds {
    pub min: Vec3,
    pub max: Vec3,
}

impl WorldBounds {
    pub fn new(min: Vec3, max: Vec3) -> Self {
        Self {
            min: min.min(max),
            max: min.max(max),
        }
    }

    /// Clamp x and z into the bounds, keeping y
    pub fn clamp(&self, point: Vec3) -> Vec3 {
        Vec3::new(
            point.x.clamp(self.min.x, self.max.x),
            point.y,
            point.z.clamp(self.min.z, self.max.z),
        )
    }
}

/// Inputs to one planning call
#[derive(Debug, Clone, Copy)]
pub struct SpawnRequest<'a> {
    pub player_position: Vec3,
    pub player_velocity: Vec3,
    /// Positions of entities currently in the world
    pub live_entities: &'a [Vec3],
    /// 0-100
    pub difficulty: f32,
    /// 0-100
    pub skill: f32,
    pub bounds: Option<WorldBounds>,
}

#[derive(Debug, Clone, Copy)]
struct HeatCell {
    value: f32,
    updated: f64,
}

/// Decaying per-cell record of recent spawns
#[derive(Debug, Clone)]
pub struct SpawnHeatmap {
    cell_size: f32,
    half_life: f32,
    cells: FxHashMap<(i32, i32), HeatCell>,
}

impl SpawnHeatmap {
    pub fn new(cell_size: f32, half_life: f32) -> Self {
        Self {
            cell_size,
            half_life,
            cells: FxHashMap::default(),
        }
    }

    fn key(&self, position: Vec3) -> (i32, i32) {
        (
            (position.x / self.cell_size).floor() as i32,
            (position.z / self.cell_size).floor() as i32,
        )
    }

    fn decayed(&self, cell: &HeatCell, now: f64) -> f32 {
        let elapsed = (now - cell.updated).max(0.0) as f32;
        cell.value * 0.5f32.powf(elapsed / self.half_life)
    }

    pub fn heat_at(&self, position: Vec3, now: f64) -> f32 {
        self.cells
            .get(&self.key(position))
            .map_or(0.0, |cell| self.decayed(cell, now))
    }

    pub fn add(&mut self, position: Vec3, now: f64) {
        let key = self.key(position);
        let current = self.cells.get(&key).map_or(0.0, |cell| self.decayed(cell, now));
        self.cells.insert(
            key,
            HeatCell {
                value: current + 1.0,
                updated: now,
            },
        );
    }

    /// Drop cells that have cooled off
    pub fn prune(&mut self, now: f64) {
        let half_life = self.half_life;
        self.cells.retain(|_, cell| {
            let elapsed = (now - cell.updated).max(0.0) as f32;
            cell.value * 0.5f32.powf(elapsed / half_life) >= HEAT_EPSILON
        });
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}

/// Composition for a difficulty/skill pair; every entry has `count > 0`
pub fn compose(difficulty: f32, skill: f32, camping: bool, config: &SpawnConfig) -> Vec<CompositionEntry> {
    let difficulty = sanitize_percent(difficulty);
    let skill = sanitize_percent(skill);

    let mut count = BASE_COUNT as i64 + (difficulty / 100.0 * DIFFICULTY_COUNT).round() as i64;
    if skill >= config.high_skill {
        count += 1;
    } else if skill < config.low_skill {
        count -= 1;
    }
    let count = count.max(1) as usize;

    let mut remaining = count;
    let mut take = |wanted: usize| {
        let taken = wanted.min(remaining);
        remaining -= taken;
        taken
    };
    let boss = take(usize::from(difficulty >= BOSS_DIFFICULTY));
    let tank = take(if difficulty > TANK_DIFFICULTY {
        (count as f32 * (difficulty - TANK_DIFFICULTY) / 200.0).floor() as usize
    } else {
        0
    });
    let mut fast = take((count as f32 * FAST_SHARE).round() as usize);
    let normal = remaining;
    if camping {
        fast += CAMPING_FAST_BONUS;
    }

    [
        (Archetype::Normal, normal),
        (Archetype::Fast, fast),
        (Archetype::Tank, tank),
        (Archetype::Boss, boss),
    ]
    .into_iter()
    .filter(|(_, count)| *count > 0)
    .map(|(archetype, count)| CompositionEntry { archetype, count })
    .collect()
}

fn sanitize_percent(value: f32) -> f32 {
    if value.is_finite() {
        value.clamp(0.0, 100.0)
    } else {
        50.0
    }
}

#[derive(Debug, Clone, Copy)]
struct Candidate {
    position: Vec3,
    score: f32,
    rationale: SpawnRationale,
}

/// Plans spawn strategies and tracks the ones still in flight
#[derive(Debug, Clone)]
pub struct PredictiveSpawnDirector {
    config: SpawnConfig,
    profile: PlayerBehaviorProfile,
    heatmap: SpawnHeatmap,
    in_flight: SmallVec<[StrategyId; 4]>,
    next_id: u64,
    recent_centroid: Option<Vec3>,
    produced: u64,
    rejected: u64,
}

impl PredictiveSpawnDirector {
    pub fn new(config: SpawnConfig) -> Self {
        Self {
            profile: PlayerBehaviorProfile::new(config.clone()),
            heatmap: SpawnHeatmap::new(config.heat_cell_size, config.heat_half_life),
            config,
            in_flight: SmallVec::new(),
            next_id: 1,
            recent_centroid: None,
            produced: 0,
            rejected: 0,
        }
    }

    pub fn config(&self) -> &SpawnConfig {
        &self.config
    }

    pub fn profile(&self) -> &PlayerBehaviorProfile {
        &self.profile
    }

    pub fn heatmap(&self) -> &SpawnHeatmap {
        &self.heatmap
    }

    /// Centroid of the most recently planned spawn points
    pub fn recent_centroid(&self) -> Option<Vec3> {
        self.recent_centroid
    }

    pub fn active_strategies(&self) -> usize {
        self.in_flight.len()
    }

    pub fn strategies_produced(&self) -> u64 {
        self.produced
    }

    pub fn strategies_rejected(&self) -> u64 {
        self.rejected
    }

    /// Feed a player telemetry sample between planning calls
    pub fn observe(&mut self, now: f64, position: Vec3, velocity: Vec3) {
        self.profile.observe(now, position, velocity, self.recent_centroid);
    }

    /// Forward a player kill to the behavior model
    pub fn record_kill(&mut self, now: f64) {
        self.profile.record_kill(now);
    }

    /// Mark a strategy as fully executed (or abandoned)
    pub fn complete(&mut self, id: StrategyId) -> bool {
        match self.in_flight.iter().position(|s| *s == id) {
            Some(idx) => {
                self.in_flight.swap_remove(idx);
                true
            }
            None => false,
        }
    }

    /// Produce a strategy, or `None` while the in-flight cap is reached
    pub fn plan<R: Rng + ?Sized>(&mut self, now: f64, request: &SpawnRequest<'_>, rng: &mut R) -> Option<SpawnStrategy> {
        if self.in_flight.len() >= self.config.max_active_strategies {
            self.rejected += 1;
            tracing::debug!(
                in_flight = self.in_flight.len(),
                max = self.config.max_active_strategies,
                "spawn strategy deferred, too many in flight"
            );
            return None;
        }

        let player = if request.player_position.is_finite() {
            request.player_position
        } else {
            self.profile.latest_position().unwrap_or(Vec3::ZERO)
        };
        let velocity = if request.player_velocity.is_finite() {
            request.player_velocity
        } else {
            Vec3::ZERO
        };
        self.profile.observe(now, player, velocity, self.recent_centroid);
        self.heatmap.prune(now);

        let assessment = self.profile.assessment();
        let composition = compose(request.difficulty, request.skill, assessment.camping, &self.config);
        let total: usize = composition.iter().map(|c| c.count).sum();

        let predicted = self
            .profile
            .predict(self.config.prediction_horizon)
            .filter(|p| p.is_finite())
            .unwrap_or(player);

        let mut candidates = self.generate_candidates(total * self.config.candidate_multiplier, predicted, request.bounds, rng);
        for candidate in candidates.iter_mut() {
            self.score(candidate, player, velocity, request.live_entities, &assessment, now);
        }
        candidates.sort_by(|a, b| b.score.total_cmp(&a.score));

        let difficulty_scale = 1.0 + sanitize_percent(request.difficulty) / 100.0;
        let archetypes = composition
            .iter()
            .flat_map(|entry| std::iter::repeat(entry.archetype).take(entry.count));
        let points: Vec<SpawnPoint> = candidates
            .iter()
            .zip(archetypes)
            .map(|(candidate, archetype)| SpawnPoint {
                position: candidate.position,
                archetype,
                priority: candidate.score,
                rationale: candidate.rationale,
                threat: archetype.profile().threat * difficulty_scale,
            })
            .collect();
        debug_assert_eq!(points.len(), total);

        for point in &points {
            self.heatmap.add(point.position, now);
        }
        if !points.is_empty() {
            let sum: Vec3 = points.iter().map(|p| p.position).sum();
            self.recent_centroid = Some(sum / points.len() as f32);
        }

        let (timing, delay_ms) = if assessment.camping {
            (SpawnTiming::Immediate, 0)
        } else if sanitize_percent(request.skill) >= self.config.high_skill
            || (self.config.aggression_wave && assessment.aggressive)
        {
            (SpawnTiming::Wave, 0)
        } else {
            let (lo, hi) = (self.config.stagger_min_ms, self.config.stagger_max_ms.max(self.config.stagger_min_ms));
            (SpawnTiming::Staggered, rng.gen_range(lo..=hi))
        };

        let id = StrategyId(self.next_id);
        self.next_id += 1;
        self.in_flight.push(id);
        self.produced += 1;

        tracing::debug!(
            id = id.0,
            total,
            timing = ?timing,
            pattern = ?assessment.pattern,
            camping = assessment.camping,
            aggressive = assessment.aggressive,
            retreating = assessment.retreating,
            "spawn strategy planned"
        );

        Some(SpawnStrategy {
            id,
            composition,
            points,
            timing,
            delay_ms,
            predicted_player: predicted,
            assessment,
        })
    }

    fn generate_candidates<R: Rng + ?Sized>(
        &self,
        count: usize,
        center: Vec3,
        bounds: Option<WorldBounds>,
        rng: &mut R,
    ) -> Vec<Candidate> {
        let (min, max) = (self.config.min_distance, self.config.max_distance.max(self.config.min_distance));
        (0..count)
            .map(|_| {
                let angle = rng.gen_range(0.0..TAU);
                let distance = rng.gen_range(min..=max);
                let mut position = center + direction_from_yaw(angle) * distance;
                if let Some(bounds) = bounds {
                    position = bounds.clamp(position);
                }
                Candidate {
                    position,
                    score: 0.0,
                    rationale: SpawnRationale::Perimeter,
                }
            })
            .collect()
    }

    fn score(
        &self,
        candidate: &mut Candidate,
        player: Vec3,
        velocity: Vec3,
        live: &[Vec3],
        assessment: &PlayerAssessment,
        now: f64,
    ) {
        let config = &self.config;
        let from_player = planar_direction(player, candidate.position);
        let distance = planar_distance(player, candidate.position);

        let optimal = (config.min_distance + config.max_distance) * 0.5;
        let half_band = ((config.max_distance - config.min_distance) * 0.5).max(f32::EPSILON);
        let band = SCORE_DISTANCE_BAND * (1.0 - ((distance - optimal).abs() / half_band).min(1.0));

        let travel = safe_normalize(flatten(velocity));
        // Cut off a retreat
        let ahead_weight = if assessment.retreating {
            SCORE_AHEAD * config.retreat_ahead_weight
        } else {
            SCORE_AHEAD
        };
        let ahead = ahead_weight * from_player.dot(travel);

        let nearest = live
            .iter()
            .filter(|p| p.is_finite())
            .map(|p| planar_distance(*p, candidate.position))
            .fold(f32::INFINITY, f32::min);
        let separation = if nearest < config.min_separation {
            -SCORE_SEPARATION * (1.0 - nearest / config.min_separation)
        } else {
            0.0
        };

        let heat = -SCORE_HEAT * self.heatmap.heat_at(candidate.position, now);

        let behind = if assessment.camping {
            SCORE_BEHIND_CAMPER * from_player.dot(-self.profile.heading()).max(0.0)
        } else {
            0.0
        };

        let flank = if assessment.pattern == MovementPattern::Tactical && travel != Vec3::ZERO {
            SCORE_FLANK * (1.0 - from_player.dot(travel).abs())
        } else {
            0.0
        };

        candidate.score = band + ahead + separation + heat + behind + flank;
        candidate.rationale = if behind > SCORE_BEHIND_CAMPER * 0.5 {
            SpawnRationale::BehindCamper
        } else if flank > SCORE_FLANK * 0.5 {
            SpawnRationale::Flank
        } else if ahead > 0.0 {
            SpawnRationale::AheadOfPlayer
        } else {
            SpawnRationale::Perimeter
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn director() -> PredictiveSpawnDirector {
        PredictiveSpawnDirector::new(SpawnConfig::default())
    }

    fn request(difficulty: f32, skill: f32) -> SpawnRequest<'static> {
        SpawnRequest {
            player_position: Vec3::ZERO,
            player_velocity: Vec3::ZERO,
            live_entities: &[],
            difficulty,
            skill,
            bounds: None,
        }
    }

    #[test]
    fn test_low_difficulty_composition() {
        let composition = compose(20.0, 30.0, false, &SpawnConfig::default());
        assert_eq!(
            composition,
            vec![
                CompositionEntry { archetype: Archetype::Normal, count: 2 },
                CompositionEntry { archetype: Archetype::Fast, count: 1 },
            ]
        );
    }

    #[test]
    fn test_high_difficulty_composition() {
        let composition = compose(90.0, 80.0, false, &SpawnConfig::default());
        let count = |a| composition.iter().find(|c| c.archetype == a).map_or(0, |c| c.count);
        assert_eq!(count(Archetype::Boss), 1);
        assert_eq!(count(Archetype::Tank), 2);
        assert_eq!(count(Archetype::Fast), 2);
        assert_eq!(count(Archetype::Normal), 4);
    }

    #[test]
    fn test_skill_adjusts_count_by_one() {
        let config = SpawnConfig::default();
        let total = |skill| compose(50.0, skill, false, &config).iter().map(|c| c.count).sum::<usize>();
        assert_eq!(total(50.0), 6);
        assert_eq!(total(80.0), 7);
        assert_eq!(total(10.0), 5);
    }

    #[test]
    fn test_camping_adds_fast_pair() {
        let config = SpawnConfig::default();
        let base = compose(20.0, 30.0, false, &config);
        let camping = compose(20.0, 30.0, true, &config);
        let fast = |c: &[CompositionEntry]| c.iter().find(|e| e.archetype == Archetype::Fast).map_or(0, |e| e.count);
        assert_eq!(fast(&camping), fast(&base) + 2);
    }

    #[test]
    fn test_composition_counts_positive_for_all_inputs() {
        let config = SpawnConfig::default();
        for difficulty in (0..=100).step_by(5) {
            for skill in (0..=100).step_by(10) {
                for camping in [false, true] {
                    let composition = compose(difficulty as f32, skill as f32, camping, &config);
                    assert!(!composition.is_empty());
                    assert!(composition.iter().all(|c| c.count > 0));
                }
            }
        }
        assert!(!compose(f32::NAN, f32::INFINITY, false, &config).is_empty());
    }

    #[test]
    fn test_points_match_composition() {
        let mut rng = StdRng::seed_from_u64(1);
        for (i, (difficulty, skill)) in [(0.0, 0.0), (20.0, 30.0), (55.0, 60.0), (90.0, 80.0), (100.0, 100.0)]
            .into_iter()
            .enumerate()
        {
            let mut d = director();
            let strategy = d.plan(i as f64, &request(difficulty, skill), &mut rng).unwrap();
            assert_eq!(strategy.total(), strategy.points.len());
            for entry in &strategy.composition {
                let placed = strategy.points.iter().filter(|p| p.archetype == entry.archetype).count();
                assert_eq!(placed, entry.count);
            }
        }
    }

    #[test]
    fn test_points_lie_within_spawn_ring() {
        let mut rng = StdRng::seed_from_u64(2);
        let mut d = director();
        let strategy = d.plan(0.0, &request(50.0, 50.0), &mut rng).unwrap();
        for point in &strategy.points {
            let distance = planar_distance(strategy.predicted_player, point.position);
            assert!((MIN_DISTANCE - 1e-3..=MAX_DISTANCE + 1e-3).contains(&distance), "{distance}");
        }
    }

    #[test]
    fn test_points_sorted_by_priority() {
        let mut rng = StdRng::seed_from_u64(3);
        let mut d = director();
        let strategy = d.plan(0.0, &request(80.0, 50.0), &mut rng).unwrap();
        for pair in strategy.points.windows(2) {
            assert!(pair[0].priority >= pair[1].priority);
        }
    }

    #[test]
    fn test_in_flight_cap() {
        let mut rng = StdRng::seed_from_u64(4);
        let mut d = director();
        let ids: Vec<_> = (0..3)
            .map(|i| d.plan(i as f64, &request(50.0, 50.0), &mut rng).unwrap().id)
            .collect();
        assert!(d.plan(3.0, &request(50.0, 50.0), &mut rng).is_none());
        assert_eq!(d.strategies_rejected(), 1);

        assert!(d.complete(ids[1]));
        assert!(!d.complete(ids[1]));
        assert!(d.plan(4.0, &request(50.0, 50.0), &mut rng).is_some());
    }

    #[test]
    fn test_timing_modes() {
        let mut rng = StdRng::seed_from_u64(5);
        let mut d = director();
        let wave = d.plan(0.0, &request(50.0, 85.0), &mut rng).unwrap();
        assert_eq!(wave.timing, SpawnTiming::Wave);
        assert_eq!(wave.delay_ms, 0);

        let staggered = d.plan(1.0, &request(50.0, 50.0), &mut rng).unwrap();
        assert_eq!(staggered.timing, SpawnTiming::Staggered);
        assert!((STAGGER_MIN_MS..=STAGGER_MAX_MS).contains(&staggered.delay_ms));
    }

    #[test]
    fn test_aggressive_player_gets_wave() {
        let mut rng = StdRng::seed_from_u64(8);
        let mut d = director();
        for i in 0..AGGRESSION_KILLS {
            d.record_kill(i as f64 * 0.5);
        }
        let strategy = d.plan(2.0, &request(50.0, 50.0), &mut rng).unwrap();
        assert!(strategy.assessment.aggressive);
        assert_eq!(strategy.timing, SpawnTiming::Wave);
        assert_eq!(strategy.delay_ms, 0);

        let mut config = SpawnConfig::default();
        config.aggression_wave = false;
        let mut d = PredictiveSpawnDirector::new(config);
        for i in 0..AGGRESSION_KILLS {
            d.record_kill(i as f64 * 0.5);
        }
        let strategy = d.plan(2.0, &request(50.0, 50.0), &mut rng).unwrap();
        assert!(strategy.assessment.aggressive);
        assert_eq!(strategy.timing, SpawnTiming::Staggered);
    }

    #[test]
    fn test_camping_player_gets_immediate_strategy() {
        let mut rng = StdRng::seed_from_u64(6);
        let mut d = director();
        for i in 0..=24 {
            d.observe(i as f64 * 0.25, Vec3::new(3.0, 0.0, 3.0), Vec3::ZERO);
        }
        let strategy = d.plan(6.0, &SpawnRequest {
            player_position: Vec3::new(3.0, 0.0, 3.0),
            ..request(20.0, 30.0)
        }, &mut rng).unwrap();
        assert!(strategy.assessment.camping);
        assert_eq!(strategy.timing, SpawnTiming::Immediate);
        assert_eq!(strategy.count_of(Archetype::Fast), 3);
    }

    #[test]
    fn test_heat_discourages_repeat_cells() {
        let mut heatmap = SpawnHeatmap::new(10.0, 10.0);
        let spot = Vec3::new(31.0, 0.0, 4.0);
        heatmap.add(spot, 0.0);
        heatmap.add(spot, 0.0);
        assert!((heatmap.heat_at(spot, 0.0) - 2.0).abs() < 1e-5);
        // One half-life later
        assert!((heatmap.heat_at(spot, 10.0) - 1.0).abs() < 1e-4);
        assert_eq!(heatmap.heat_at(Vec3::new(-31.0, 0.0, 4.0), 0.0), 0.0);

        heatmap.prune(200.0);
        assert!(heatmap.is_empty());
    }

    #[test]
    fn test_separation_penalty_avoids_crowding() {
        let d = director();
        let assessment = PlayerAssessment::default();
        let spot = Vec3::new(35.0, 0.0, 0.0);
        let mut crowded = Candidate { position: spot, score: 0.0, rationale: SpawnRationale::Perimeter };
        let mut open = crowded;
        d.score(&mut crowded, Vec3::ZERO, Vec3::ZERO, &[Vec3::new(36.0, 0.0, 0.0)], &assessment, 0.0);
        d.score(&mut open, Vec3::ZERO, Vec3::ZERO, &[], &assessment, 0.0);
        assert!(crowded.score < open.score);
    }

    #[test]
    fn test_ahead_of_travel_scores_higher() {
        let d = director();
        let assessment = PlayerAssessment::default();
        let velocity = Vec3::new(5.0, 0.0, 0.0);
        let mut ahead = Candidate { position: Vec3::new(35.0, 0.0, 0.0), score: 0.0, rationale: SpawnRationale::Perimeter };
        let mut behind = Candidate { position: Vec3::new(-35.0, 0.0, 0.0), ..ahead };
        d.score(&mut ahead, Vec3::ZERO, velocity, &[], &assessment, 0.0);
        d.score(&mut behind, Vec3::ZERO, velocity, &[], &assessment, 0.0);
        assert!(ahead.score > behind.score);
        assert_eq!(ahead.rationale, SpawnRationale::AheadOfPlayer);
    }

    #[test]
    fn test_retreat_weights_ahead_of_travel() {
        let d = director();
        let velocity = Vec3::new(5.0, 0.0, 0.0);
        let ahead = Candidate { position: Vec3::new(35.0, 0.0, 0.0), score: 0.0, rationale: SpawnRationale::Perimeter };
        let (mut calm, mut fleeing) = (ahead, ahead);
        let retreating = PlayerAssessment { retreating: true, ..PlayerAssessment::default() };
        d.score(&mut calm, Vec3::ZERO, velocity, &[], &PlayerAssessment::default(), 0.0);
        d.score(&mut fleeing, Vec3::ZERO, velocity, &[], &retreating, 0.0);

        let expected = SCORE_AHEAD * (RETREAT_AHEAD_WEIGHT - 1.0);
        assert!((fleeing.score - calm.score - expected).abs() < 1e-3, "{} vs {}", fleeing.score, calm.score);
        assert_eq!(fleeing.rationale, SpawnRationale::AheadOfPlayer);
    }

    #[test]
    fn test_bounds_clamp_points() {
        let mut rng = StdRng::seed_from_u64(7);
        let mut d = director();
        let bounds = WorldBounds::new(Vec3::new(-20.0, 0.0, -20.0), Vec3::new(20.0, 0.0, 20.0));
        let strategy = d
            .plan(0.0, &SpawnRequest { bounds: Some(bounds), ..request(50.0, 50.0) }, &mut rng)
            .unwrap();
        for point in &strategy.points {
            assert!(point.position.x.abs() <= 20.0 && point.position.z.abs() <= 20.0);
        }
        assert_eq!(strategy.total(), strategy.points.len());
    }

    #[test]
    fn test_recent_centroid_tracks_last_plan() {
        let mut rng = StdRng::seed_from_u64(8);
        let mut d = director();
        assert_eq!(d.recent_centroid(), None);
        let strategy = d.plan(0.0, &request(50.0, 50.0), &mut rng).unwrap();
        let sum: Vec3 = strategy.points.iter().map(|p| p.position).sum();
        let expected = sum / strategy.points.len() as f32;
        assert!(d.recent_centroid().unwrap().distance(expected) < 1e-3);
        assert!(!d.heatmap().is_empty());
    }
}

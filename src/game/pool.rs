//! Entity resource manager
//!
//! Owns every pooled entity slot together with the spatial grid, LOD state
//! and the adaptive population cap. All mutation of pooled entities goes
//! through this type; callers only hold [`EntityHandle`]s.
//!
//! Slot lifecycle: `Free -> Acquired -> Active -> Free`. `acquire` returns
//! `None` once the adaptive cap or the per-archetype ceiling is reached, so
//! callers treat exhaustion as "spawn deferred".

use bitvec::prelude::*;
use glam::Vec3;
use serde::Serialize;

use crate::config::{DirectorConfig, LodConfig, PoolConfig, QualitySettings};
use crate::game::archetype::Archetype;
use crate::game::camera::{CameraView, Frustum};
use crate::game::entity::{AiState, Entity, EntityHandle, SlotState};
use crate::game::lod::{LodLevel, LodThresholds};
use crate::game::performance::{CapAdjustment, PopulationController};
use crate::game::render::{RenderArena, RenderHandle, SharedRenderResources};
use crate::game::spatial::{SpatialGrid, SpatialGridStats};
use crate::util::math::planar_distance;

/// Extra radius added to grid lookups to cover movement since the last re-bucket
const GRID_QUERY_SLACK: f32 = 2.0;

/// Per-archetype slot accounting
#[derive(Debug, Clone, Copy, Default, Serialize)]
pub struct ArchetypeStats {
    pub allocated: usize,
    pub in_use: usize,
    pub ceiling: usize,
}

/// Snapshot of pool occupancy
#[derive(Debug, Clone, Serialize)]
pub struct PoolStats {
    pub normal: ArchetypeStats,
    pub fast: ArchetypeStats,
    pub tank: ArchetypeStats,
    pub boss: ArchetypeStats,
    pub in_use: usize,
    pub active: usize,
    pub culled: usize,
    pub cap: usize,
    pub base_cap: usize,
}

impl PoolStats {
    pub fn archetype(&self, archetype: Archetype) -> &ArchetypeStats {
        match archetype {
            Archetype::Normal => &self.normal,
            Archetype::Fast => &self.fast,
            Archetype::Tank => &self.tank,
            Archetype::Boss => &self.boss,
        }
    }

    pub fn allocated(&self) -> usize {
        self.normal.allocated + self.fast.allocated + self.tank.allocated + self.boss.allocated
    }
}

/// Read-only view handed to the rendering layer
#[derive(Debug, Clone, Copy, Serialize)]
pub struct EntityView {
    pub handle: EntityHandle,
    pub render: RenderHandle,
    pub archetype: Archetype,
    pub lod: LodLevel,
    pub position: Vec3,
    pub heading: f32,
}

/// What happened during one manager update
#[derive(Debug, Clone, Default)]
pub struct UpdateSummary {
    /// Entities promoted from acquired to active
    pub promoted: usize,
    /// True when LOD and culling were recomputed this frame
    pub lod_pass: bool,
    pub cap_adjustment: Option<CapAdjustment>,
}

/// Bounded pool of hostile entity slots
pub struct EntityResourceManager {
    pool_config: PoolConfig,
    lod_config: LodConfig,
    thresholds: LodThresholds,
    entities: Vec<Entity>,
    /// Bit per slot, set while acquired or active
    in_use: BitVec,
    /// Position each slot was last bucketed at, if bucketed
    bucketed_at: Vec<Option<Vec3>>,
    /// Free slot indices per archetype
    free: [Vec<u32>; 4],
    allocated: [usize; 4],
    in_use_count: usize,
    culled_count: usize,
    grid: SpatialGrid,
    population: PopulationController,
    arena: RenderArena,
    camera: CameraView,
    clock: f64,
    lod_timer: f32,
}

impl EntityResourceManager {
    pub fn new(config: &DirectorConfig) -> Self {
        let quality = config.quality_settings();
        let mut manager = Self {
            pool_config: config.pool.clone(),
            lod_config: config.lod.clone(),
            thresholds: config.effective_lod_thresholds(),
            entities: Vec::new(),
            in_use: BitVec::new(),
            bucketed_at: Vec::new(),
            free: Default::default(),
            allocated: [0; 4],
            in_use_count: 0,
            culled_count: 0,
            grid: SpatialGrid::default(),
            population: PopulationController::new(quality.max_entities, config.adaptive.clone()),
            arena: RenderArena::new(),
            camera: CameraView::default(),
            clock: 0.0,
            lod_timer: 0.0,
        };

        for archetype in Archetype::ALL {
            for _ in 0..manager.pool_config.prewarm(archetype) {
                if let Some(index) = manager.allocate_slot(archetype) {
                    manager.free[archetype.index()].push(index);
                }
            }
        }
        // Pop from the low end first
        for list in manager.free.iter_mut() {
            list.reverse();
        }

        tracing::debug!(
            slots = manager.entities.len(),
            cap = manager.population.cap(),
            "entity pool pre-warmed"
        );
        manager
    }

    /// Allocate a new slot for `archetype` if below its ceiling
    fn allocate_slot(&mut self, archetype: Archetype) -> Option<u32> {
        if self.allocated[archetype.index()] >= self.pool_config.ceiling(archetype) {
            return None;
        }
        let index = self.entities.len() as u32;
        self.entities
            .push(Entity::new(index, archetype, RenderHandle::new(archetype, index)));
        self.in_use.push(false);
        self.bucketed_at.push(None);
        self.allocated[archetype.index()] += 1;
        Some(index)
    }

    /// Take a slot for `archetype` at `position`.
    /// Returns `None` when the adaptive cap or pool ceiling is reached.
    pub fn acquire(&mut self, archetype: Archetype, position: Vec3) -> Option<EntityHandle> {
        if self.in_use_count >= self.population.cap() {
            tracing::debug!(
                %archetype,
                cap = self.population.cap(),
                "acquire deferred: population cap reached"
            );
            return None;
        }
        if !position.is_finite() {
            return None;
        }

        let index = match self.free[archetype.index()].pop() {
            Some(index) => index,
            None => {
                let index = self.allocate_slot(archetype);
                match index {
                    Some(index) => {
                        tracing::debug!(
                            %archetype,
                            allocated = self.allocated[archetype.index()],
                            "entity pool grown"
                        );
                        index
                    }
                    None => {
                        tracing::debug!(%archetype, "acquire deferred: pool ceiling reached");
                        return None;
                    }
                }
            }
        };

        let clock = self.clock;
        let entity = &mut self.entities[index as usize];
        entity.state = SlotState::Acquired;
        entity.position = position;
        entity.health = entity.max_health;
        entity.ai_state = AiState::Idle;
        entity.lod = LodLevel::Culled;
        entity.last_activation = clock;
        let handle = entity.handle();

        self.in_use.set(index as usize, true);
        self.in_use_count += 1;
        self.grid.insert(index, position);
        self.bucketed_at[index as usize] = Some(position);

        Some(handle)
    }

    /// Return a slot to the pool, resetting its transform and pose.
    ///
    /// Releasing a stale or never-acquired handle is a programmer error: it
    /// asserts in debug builds and is a no-op returning `false` otherwise.
    pub fn release(&mut self, handle: EntityHandle) -> bool {
        if !self.is_current(handle) {
            tracing::warn!(?handle, "release of a slot that is not acquired");
            debug_assert!(false, "release of a slot that is not acquired: {handle:?}");
            return false;
        }

        let index = handle.index as usize;
        if let Some(position) = self.bucketed_at[index].take() {
            self.grid.remove(handle.index, position);
        }

        let entity = &mut self.entities[index];
        if entity.lod == LodLevel::Culled && entity.state == SlotState::Active {
            self.culled_count = self.culled_count.saturating_sub(1);
        }
        entity.reset_transform();
        entity.health = entity.max_health;
        entity.ai_state = AiState::Idle;
        entity.lod = LodLevel::Culled;
        entity.state = SlotState::Free;
        entity.generation = entity.generation.wrapping_add(1);
        let archetype = entity.archetype;

        self.in_use.set(index, false);
        self.in_use_count -= 1;
        self.free[archetype.index()].push(handle.index);
        true
    }

    /// True when `handle` refers to the current occupant of an in-use slot
    pub fn is_current(&self, handle: EntityHandle) -> bool {
        let index = handle.index as usize;
        index < self.entities.len()
            && self.in_use[index]
            && self.entities[index].generation == handle.generation
    }

    /// Per-frame update: frame-rate sampling, promotion of newly acquired
    /// slots and the throttled LOD/culling/re-bucketing pass.
    pub fn update(&mut self, dt: f32, camera: &CameraView) -> UpdateSummary {
        let mut summary = UpdateSummary::default();
        let dt = if dt.is_finite() { dt.max(0.0) } else { 0.0 };
        self.clock += dt as f64;
        self.camera = *camera;
        summary.cap_adjustment = self.population.record_frame(dt);

        let frustum = camera.frustum();
        for index in self.in_use.iter_ones() {
            let entity = &mut self.entities[index];
            if entity.state == SlotState::Acquired {
                entity.state = SlotState::Active;
                entity.lod = Self::select_lod(&self.thresholds, &frustum, camera, entity);
                summary.promoted += 1;
            }
        }

        self.lod_timer += dt;
        if self.lod_timer >= self.lod_config.update_interval {
            self.lod_timer = 0.0;
            self.recompute_lod(&frustum);
            summary.lod_pass = true;
        } else if summary.promoted > 0 {
            self.recount_culled();
        }
        summary
    }

    fn select_lod(
        thresholds: &LodThresholds,
        frustum: &Frustum,
        camera: &CameraView,
        entity: &Entity,
    ) -> LodLevel {
        let radius = entity.archetype.profile().radius;
        let in_frustum = frustum.contains_sphere(entity.position, radius);
        thresholds.select(entity.position.distance(camera.position), in_frustum)
    }

    /// Recompute LOD for every in-use entity and re-bucket the grid
    fn recompute_lod(&mut self, frustum: &Frustum) {
        self.grid.clear();
        let mut culled = 0;
        for index in self.in_use.iter_ones() {
            let entity = &mut self.entities[index];
            if entity.state == SlotState::Active {
                entity.lod = Self::select_lod(&self.thresholds, frustum, &self.camera, entity);
                if entity.lod == LodLevel::Culled {
                    culled += 1;
                }
            }
            self.grid.insert(index as u32, entity.position);
            self.bucketed_at[index] = Some(entity.position);
        }
        self.grid.prune();
        self.culled_count = culled;
    }

    fn recount_culled(&mut self) {
        self.culled_count = self
            .in_use
            .iter_ones()
            .filter(|&i| {
                let e = &self.entities[i];
                e.state == SlotState::Active && e.lod == LodLevel::Culled
            })
            .count();
    }

    pub fn get(&self, handle: EntityHandle) -> Option<&Entity> {
        if self.is_current(handle) {
            self.entities.get(handle.index as usize)
        } else {
            None
        }
    }

    fn get_mut(&mut self, handle: EntityHandle) -> Option<&mut Entity> {
        if self.is_current(handle) {
            self.entities.get_mut(handle.index as usize)
        } else {
            None
        }
    }

    /// Apply a movement result computed by the game loop
    pub fn apply_transform(&mut self, handle: EntityHandle, position: Vec3, velocity: Vec3, heading: f32) -> bool {
        if !(position.is_finite() && velocity.is_finite() && heading.is_finite()) {
            return false;
        }
        match self.get_mut(handle) {
            Some(entity) => {
                entity.position = position;
                entity.velocity = velocity;
                entity.heading = heading;
                true
            }
            None => false,
        }
    }

    pub fn set_ai_state(&mut self, handle: EntityHandle, state: AiState) -> bool {
        match self.get_mut(handle) {
            Some(entity) => {
                entity.ai_state = state;
                true
            }
            None => false,
        }
    }

    /// Apply damage and a hit reaction. Returns remaining health, or `None`
    /// for a stale handle.
    pub fn apply_damage(&mut self, handle: EntityHandle, amount: f32) -> Option<f32> {
        let entity = self.get_mut(handle)?;
        let amount = if amount.is_finite() { amount.max(0.0) } else { 0.0 };
        entity.health = (entity.health - amount).max(0.0);
        let intensity = if entity.max_health > 0.0 { amount / entity.max_health * 4.0 } else { 1.0 };
        entity.apply_hit_reaction(intensity);
        Some(entity.health)
    }

    /// Active, non-culled entities the AI should think for
    #[inline]
    pub fn should_update_ai(&self, handle: EntityHandle) -> bool {
        self.get(handle)
            .map_or(false, |e| e.state == SlotState::Active && e.lod.updates_ai())
    }

    #[inline]
    pub fn should_animate(&self, handle: EntityHandle) -> bool {
        self.get(handle)
            .map_or(false, |e| e.state == SlotState::Active && e.lod.animates())
    }

    #[inline]
    pub fn is_visible(&self, handle: EntityHandle) -> bool {
        self.get(handle)
            .map_or(false, |e| e.state == SlotState::Active && e.lod != LodLevel::Culled)
    }

    /// In-use entities within `radius` of `position`
    pub fn nearby(&self, position: Vec3, radius: f32) -> Vec<EntityHandle> {
        self.nearby_entities(position, radius).map(|e| e.handle()).collect()
    }

    /// In-use entities within `radius` of `position`, using current positions
    pub fn nearby_entities(&self, position: Vec3, radius: f32) -> impl Iterator<Item = &Entity> + '_ {
        self.grid
            .query_radius(position, radius + GRID_QUERY_SLACK)
            .filter_map(move |entry| {
                let entity = &self.entities[entry.slot as usize];
                (entity.in_use() && planar_distance(entity.position, position) <= radius).then_some(entity)
            })
    }

    /// Every in-use entity
    pub fn iter_in_use(&self) -> impl Iterator<Item = &Entity> + '_ {
        self.in_use.iter_ones().map(move |i| &self.entities[i])
    }

    /// Handles of entities that should think this frame
    pub fn thinking(&self) -> Vec<EntityHandle> {
        self.iter_in_use()
            .filter(|e| e.state == SlotState::Active && e.lod.updates_ai())
            .map(|e| e.handle())
            .collect()
    }

    /// Positions of every living in-use entity
    pub fn live_positions(&self) -> Vec<Vec3> {
        self.iter_in_use()
            .filter(|e| e.is_alive())
            .map(|e| e.position)
            .collect()
    }

    /// Render views for visible entities
    pub fn visible_views(&self) -> impl Iterator<Item = EntityView> + '_ {
        self.iter_in_use()
            .filter(|e| e.state == SlotState::Active && e.lod != LodLevel::Culled)
            .map(|e| EntityView {
                handle: e.handle(),
                render: e.render_handle(),
                archetype: e.archetype,
                lod: e.lod,
                position: e.position,
                heading: e.heading,
            })
    }

    /// Shared render resources for an archetype
    pub fn render_resources(&self, archetype: Archetype) -> &SharedRenderResources {
        self.arena.get(archetype)
    }

    /// Apply a new graphics preset: base cap and view distance
    pub fn apply_quality(&mut self, quality: QualitySettings) {
        self.population.set_base_cap(quality.max_entities);
        self.thresholds = self.lod_config.thresholds.with_view_distance(quality.view_distance);
        // Force a LOD pass on the next update
        self.lod_timer = self.lod_config.update_interval;
    }

    /// Feed a measured FPS sample directly, bypassing frame accumulation
    pub fn record_fps_sample(&mut self, fps: f32) -> Option<CapAdjustment> {
        self.population.record_sample(self.clock, fps)
    }

    #[inline]
    pub fn cap(&self) -> usize {
        self.population.cap()
    }

    #[inline]
    pub fn in_use_count(&self) -> usize {
        self.in_use_count
    }

    #[inline]
    pub fn clock(&self) -> f64 {
        self.clock
    }

    pub fn population(&self) -> &PopulationController {
        &self.population
    }

    pub fn grid_stats(&self) -> SpatialGridStats {
        self.grid.stats()
    }

    pub fn stats(&self) -> PoolStats {
        let mut per = [ArchetypeStats::default(); 4];
        for archetype in Archetype::ALL {
            let i = archetype.index();
            per[i].allocated = self.allocated[i];
            per[i].ceiling = self.pool_config.ceiling(archetype);
        }
        let mut active = 0;
        for entity in self.iter_in_use() {
            per[entity.archetype.index()].in_use += 1;
            if entity.state == SlotState::Active {
                active += 1;
            }
        }
        let [normal, fast, tank, boss] = per;

        PoolStats {
            normal,
            fast,
            tank,
            boss,
            in_use: self.in_use_count,
            active,
            culled: self.culled_count,
            cap: self.population.cap(),
            base_cap: self.population.base_cap(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GraphicsQuality;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    fn manager() -> EntityResourceManager {
        EntityResourceManager::new(&DirectorConfig::default())
    }

    fn camera() -> CameraView {
        CameraView::new(Vec3::ZERO, Vec3::Z)
    }

    #[test]
    fn test_prewarm_allocates_three_quarters() {
        let m = manager();
        let stats = m.stats();
        assert_eq!(stats.normal.allocated, 30);
        assert_eq!(stats.fast.allocated, 15);
        assert_eq!(stats.tank.allocated, 8);
        assert_eq!(stats.boss.allocated, 2);
        assert_eq!(stats.in_use, 0);
    }

    #[test]
    fn test_acquire_and_release_resets_transform() {
        let mut m = manager();
        let h = m.acquire(Archetype::Normal, Vec3::new(1.0, 0.0, 10.0)).unwrap();
        m.update(0.016, &camera());
        assert!(m.apply_transform(h, Vec3::new(2.0, 0.0, 12.0), Vec3::X, 0.7));
        m.apply_damage(h, 20.0);

        assert!(m.release(h));
        let slot = &m.entities[h.index as usize];
        assert!(slot.has_default_transform());
        assert_eq!(slot.state, SlotState::Free);
        assert_eq!(slot.health, slot.max_health);
        assert!(m.get(h).is_none());
    }

    #[test]
    fn test_reacquire_gets_new_generation() {
        let mut m = manager();
        let h1 = m.acquire(Archetype::Boss, Vec3::ZERO).unwrap();
        m.release(h1);
        let h2 = m.acquire(Archetype::Boss, Vec3::ZERO).unwrap();
        assert_eq!(h1.index, h2.index);
        assert_ne!(h1.generation, h2.generation);
        assert!(!m.is_current(h1));
        assert!(m.is_current(h2));
    }

    #[test]
    fn test_pool_grows_to_ceiling_then_refuses() {
        let mut config = DirectorConfig::default();
        config.quality = GraphicsQuality::Ultra;
        let mut m = EntityResourceManager::new(&config);
        let mut handles = Vec::new();
        while let Some(h) = m.acquire(Archetype::Boss, Vec3::ZERO) {
            handles.push(h);
        }
        assert_eq!(handles.len(), 3);
        assert_eq!(m.stats().boss.allocated, 3);
    }

    #[test]
    fn test_acquire_respects_adaptive_cap() {
        let mut m = manager();
        let cap = m.cap();
        let mut acquired = 0;
        for i in 0..cap + 10 {
            if m.acquire(Archetype::Normal, Vec3::new(i as f32, 0.0, 5.0)).is_some() {
                acquired += 1;
            }
        }
        assert_eq!(acquired, cap);
        assert_eq!(m.in_use_count(), cap);
    }

    #[test]
    fn test_pool_conservation_under_random_sequences() {
        let mut m = manager();
        let mut rng = StdRng::seed_from_u64(7);
        let mut live: Vec<EntityHandle> = Vec::new();

        for _ in 0..2000 {
            if rng.gen_bool(0.6) {
                let archetype = Archetype::ALL[rng.gen_range(0..4)];
                let pos = Vec3::new(rng.gen_range(-50.0..50.0), 0.0, rng.gen_range(-50.0..50.0));
                if let Some(h) = m.acquire(archetype, pos) {
                    live.push(h);
                }
            } else if !live.is_empty() {
                let h = live.swap_remove(rng.gen_range(0..live.len()));
                let index = h.index as usize;
                assert!(m.release(h));
                assert!(m.entities[index].has_default_transform());
            }
            m.update(0.016, &camera());
            assert!(m.stats().active <= m.cap());
            assert!(m.in_use_count() <= m.cap());
            assert_eq!(m.in_use_count(), live.len());
        }
    }

    #[test]
    fn test_render_handles_are_unique_among_in_use() {
        let mut m = manager();
        for i in 0..30 {
            let archetype = Archetype::ALL[i % 4];
            m.acquire(archetype, Vec3::new(i as f32, 0.0, 1.0));
        }
        let mut handles: Vec<_> = m.iter_in_use().map(|e| e.render_handle()).collect();
        let total = handles.len();
        handles.sort_by_key(|h| h.instance);
        handles.dedup();
        assert_eq!(handles.len(), total);
    }

    #[cfg(debug_assertions)]
    #[test]
    #[should_panic(expected = "not acquired")]
    fn test_double_release_panics_in_debug() {
        let mut m = manager();
        let h = m.acquire(Archetype::Normal, Vec3::ZERO).unwrap();
        m.release(h);
        m.release(h);
    }

    #[cfg(not(debug_assertions))]
    #[test]
    fn test_double_release_is_noop_in_release() {
        let mut m = manager();
        let h = m.acquire(Archetype::Normal, Vec3::ZERO).unwrap();
        assert!(m.release(h));
        assert!(!m.release(h));
        assert_eq!(m.in_use_count(), 0);
    }

    #[test]
    fn test_culled_entities_skip_ai_and_animation() {
        let mut m = manager();
        let front = m.acquire(Archetype::Normal, Vec3::new(0.0, 0.0, 10.0)).unwrap();
        let behind = m.acquire(Archetype::Normal, Vec3::new(0.0, 0.0, -10.0)).unwrap();
        let mid = m.acquire(Archetype::Normal, Vec3::new(0.0, 0.0, 80.0)).unwrap();
        m.update(0.2, &camera());

        assert!(m.should_update_ai(front));
        assert!(m.should_animate(front));
        assert!(!m.should_update_ai(behind));
        assert!(!m.should_animate(behind));
        assert!(m.should_update_ai(mid));
        assert!(!m.should_animate(mid));
        assert_eq!(m.stats().culled, 1);
        assert_eq!(m.thinking().len(), 2);
    }

    #[test]
    fn test_lod_recompute_is_throttled() {
        let mut m = manager();
        let h = m.acquire(Archetype::Normal, Vec3::new(0.0, 0.0, 10.0)).unwrap();
        let summary = m.update(0.2, &camera());
        assert!(summary.lod_pass);
        assert_eq!(m.get(h).unwrap().lod, LodLevel::Full);

        m.apply_transform(h, Vec3::new(0.0, 0.0, 90.0), Vec3::ZERO, 0.0);
        let summary = m.update(0.016, &camera());
        assert!(!summary.lod_pass);
        assert_eq!(m.get(h).unwrap().lod, LodLevel::Full);

        let mut passed = false;
        for _ in 0..10 {
            passed |= m.update(0.016, &camera()).lod_pass;
        }
        assert!(passed);
        assert_eq!(m.get(h).unwrap().lod, LodLevel::Minimal);
    }

    #[test]
    fn test_nearby_uses_grid() {
        let mut m = manager();
        let a = m.acquire(Archetype::Normal, Vec3::new(5.0, 0.0, 5.0)).unwrap();
        let _b = m.acquire(Archetype::Normal, Vec3::new(100.0, 0.0, 100.0)).unwrap();
        let near = m.nearby(Vec3::new(6.0, 0.0, 6.0), 5.0);
        assert_eq!(near, vec![a]);
    }

    #[test]
    fn test_lod_pass_drops_vacated_grid_cells() {
        let mut m = manager();
        let handles: Vec<_> = (0..6)
            .map(|i| m.acquire(Archetype::Normal, Vec3::new(i as f32 * 40.0, 0.0, 30.0)).unwrap())
            .collect();
        m.update(0.2, &camera());
        assert_eq!(m.grid_stats().cells, 6);

        for h in &handles {
            assert!(m.apply_transform(*h, Vec3::new(1.0, 0.0, 1.0), Vec3::ZERO, 0.0));
        }
        assert!(m.update(0.2, &camera()).lod_pass);
        let stats = m.grid_stats();
        assert_eq!(stats.cells, 1);
        assert_eq!(stats.total_entries, 6);
    }

    #[test]
    fn test_apply_quality_lowers_cap() {
        let mut m = manager();
        m.apply_quality(GraphicsQuality::Low.settings());
        assert_eq!(m.cap(), 25);
    }

    #[test]
    fn test_stale_handle_queries_are_false() {
        let mut m = manager();
        let h = m.acquire(Archetype::Fast, Vec3::ZERO).unwrap();
        m.release(h);
        assert!(!m.should_update_ai(h));
        assert!(!m.apply_transform(h, Vec3::ONE, Vec3::ZERO, 0.0));
        assert_eq!(m.apply_damage(h, 5.0), None);
    }
}

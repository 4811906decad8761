//! End-to-end scenarios driving the public API the way a host game would

use glam::Vec3;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use horde_director::config::{DirectorConfig, GraphicsQuality, SpawnConfig};
use horde_director::game::archetype::Archetype;
use horde_director::game::camera::CameraView;
use horde_director::game::entity::EntityHandle;
use horde_director::game::lod::LodLevel;
use horde_director::game::performance::CapAdjustment;
use horde_director::game::pool::EntityResourceManager;
use horde_director::game::simulation::{PlayerTelemetry, Simulation};
use horde_director::game::systems::spawn_director::compose;

const DT: f32 = 1.0 / 60.0;

fn seeded() -> DirectorConfig {
    let mut config = DirectorConfig::default();
    config.simulation.seed = Some(7);
    config
}

fn overhead_camera() -> CameraView {
    CameraView::looking_at(Vec3::new(0.0, 10.0, -20.0), Vec3::ZERO)
}

/// Straight down from high enough to see the whole spawn ring
fn top_down_camera() -> CameraView {
    CameraView::new(Vec3::new(0.0, 70.0, 0.0), Vec3::NEG_Y)
}

#[test]
fn test_pool_occupancy_stays_consistent_under_churn() {
    let config = DirectorConfig {
        quality: GraphicsQuality::Low,
        ..seeded()
    };
    let mut pool = EntityResourceManager::new(&config);
    let camera = overhead_camera();
    let mut rng = StdRng::seed_from_u64(99);
    let mut live: Vec<EntityHandle> = Vec::new();

    for _ in 0..2_000 {
        if live.is_empty() || rng.gen_bool(0.6) {
            let archetype = Archetype::ALL[rng.gen_range(0..Archetype::ALL.len())];
            let position = Vec3::new(rng.gen_range(-80.0..80.0), 0.0, rng.gen_range(-80.0..80.0));
            match pool.acquire(archetype, position) {
                Some(handle) => live.push(handle),
                None => {
                    let per = *pool.stats().archetype(archetype);
                    assert!(pool.in_use_count() >= pool.cap() || per.allocated == per.ceiling);
                }
            }
        } else {
            let handle = live.swap_remove(rng.gen_range(0..live.len()));
            assert!(pool.release(handle));
            assert!(!pool.is_current(handle));
        }
        pool.update(DT, &camera);

        let stats = pool.stats();
        assert!(stats.in_use <= stats.cap);
        assert_eq!(stats.in_use, live.len());
        assert_eq!(pool.iter_in_use().count(), live.len());
        for archetype in Archetype::ALL {
            let per = stats.archetype(archetype);
            assert!(per.in_use <= per.allocated);
            assert!(per.allocated <= per.ceiling);
        }
    }
}

#[test]
fn test_lod_follows_camera_distance() {
    let mut pool = EntityResourceManager::new(&seeded());
    let camera = CameraView::new(Vec3::ZERO, Vec3::Z);
    let near = pool.acquire(Archetype::Normal, Vec3::new(0.0, 0.0, 10.0)).unwrap();
    let mid = pool.acquire(Archetype::Normal, Vec3::new(0.0, 0.0, 45.0)).unwrap();
    let far = pool.acquire(Archetype::Normal, Vec3::new(0.0, 0.0, 80.0)).unwrap();
    let beyond = pool.acquire(Archetype::Normal, Vec3::new(0.0, 0.0, 150.0)).unwrap();
    let behind = pool.acquire(Archetype::Normal, Vec3::new(0.0, 0.0, -10.0)).unwrap();

    pool.update(DT, &camera);

    assert_eq!(pool.get(near).unwrap().lod, LodLevel::Full);
    assert_eq!(pool.get(mid).unwrap().lod, LodLevel::Reduced);
    assert_eq!(pool.get(far).unwrap().lod, LodLevel::Minimal);
    assert_eq!(pool.get(beyond).unwrap().lod, LodLevel::Culled);
    assert_eq!(pool.get(behind).unwrap().lod, LodLevel::Culled);

    let thinking = pool.thinking();
    assert!(thinking.contains(&near));
    assert!(!thinking.contains(&beyond));
    assert!(!thinking.contains(&behind));
    assert_eq!(pool.stats().culled, 2);
}

#[test]
fn test_render_views_share_archetype_resources() {
    let mut pool = EntityResourceManager::new(&seeded());
    let camera = CameraView::new(Vec3::ZERO, Vec3::Z);
    let shown = pool.acquire(Archetype::Tank, Vec3::new(0.0, 0.0, 20.0)).unwrap();
    let twin = pool.acquire(Archetype::Tank, Vec3::new(2.0, 0.0, 50.0)).unwrap();
    let hidden = pool.acquire(Archetype::Fast, Vec3::new(0.0, 0.0, -20.0)).unwrap();
    pool.update(DT, &camera);

    assert!(pool.is_visible(shown));
    assert!(!pool.is_visible(hidden));
    assert!(pool.should_animate(shown));

    let views: Vec<_> = pool.visible_views().collect();
    assert_eq!(views.len(), 2);
    assert!(views.iter().all(|v| v.handle != hidden));

    let resources = pool.render_resources(Archetype::Tank);
    let shown_view = views.iter().find(|v| v.handle == shown).unwrap();
    let twin_view = views.iter().find(|v| v.handle == twin).unwrap();
    assert_ne!(shown_view.render, twin_view.render);
    assert_eq!(shown_view.render.archetype, Archetype::Tank);
    assert!(resources.geometry_for(shown_view.lod).is_some());
    assert_ne!(resources.geometry_for(shown_view.lod), resources.geometry_for(twin_view.lod));

    let grid = pool.grid_stats();
    assert_eq!(grid.total_entries, 3);
}

#[test]
fn test_composition_scales_with_difficulty() {
    let config = SpawnConfig::default();
    let total = |d: f32, s: f32| compose(d, s, false, &config).iter().map(|c| c.count).sum::<usize>();

    assert!(total(90.0, 50.0) > total(10.0, 50.0));
    assert!(total(50.0, 90.0) > total(50.0, 10.0));

    let hard = compose(90.0, 80.0, false, &config);
    assert!(hard.iter().any(|c| c.archetype == Archetype::Boss));
    let easy = compose(20.0, 30.0, false, &config);
    assert!(easy.iter().all(|c| c.archetype != Archetype::Boss && c.archetype != Archetype::Tank));
}

#[test]
fn test_camping_player_is_rushed() {
    let mut sim = Simulation::new(seeded());
    let camera = top_down_camera();
    let player = PlayerTelemetry::at(Vec3::new(2.0, 0.0, 2.0));

    let mut strategies = Vec::new();
    for _ in 0..(60 * 12) {
        let report = sim.step(DT, &camera, &player);
        if let Some(id) = report.planned {
            strategies.push((id, report.spawn_events.clone()));
        }
    }

    assert!(strategies.len() >= 2, "planned {}", strategies.len());
    assert!(sim.director().profile().is_camping());

    // The second plan sees a full camping window: everything lands at once
    let (id, spawned) = &strategies[1];
    let own: Vec<_> = spawned.iter().filter(|e| e.strategy == *id).collect();
    assert!(!own.is_empty());
    let fast = own.iter().filter(|e| e.archetype == Archetype::Fast).count();
    assert!(fast >= 3, "fast {fast}");
}

#[test]
fn test_spawned_entities_close_in_on_player() {
    let mut sim = Simulation::new(seeded());
    let camera = top_down_camera();
    let player = PlayerTelemetry::at(Vec3::ZERO);

    let mut first_spawns = Vec::new();
    for _ in 0..(60 * 6) {
        let report = sim.step(DT, &camera, &player);
        first_spawns.extend(report.spawn_events);
    }
    assert!(!first_spawns.is_empty());
    let start: f32 = first_spawns.iter().map(|e| e.position.length()).sum::<f32>() / first_spawns.len() as f32;

    for _ in 0..(60 * 4) {
        sim.step(DT, &camera, &player);
    }
    let still_there: Vec<_> = first_spawns
        .iter()
        .filter_map(|e| sim.pool().get(e.handle))
        .collect();
    assert!(!still_there.is_empty());
    let now: f32 = still_there.iter().map(|e| e.position.length()).sum::<f32>() / still_there.len() as f32;
    assert!(now < start, "mean distance {start} -> {now}");
}

#[test]
fn test_kills_free_capacity_for_new_spawns() {
    let mut config = seeded();
    config.quality = GraphicsQuality::Low;
    let mut sim = Simulation::new(config);
    let camera = overhead_camera();
    let player = PlayerTelemetry::at(Vec3::ZERO);

    let cap = sim.pool().cap();
    let mut handles = Vec::new();
    for i in 0..cap {
        let archetype = if i % 2 == 0 { Archetype::Normal } else { Archetype::Fast };
        handles.push(sim.spawn(archetype, Vec3::new(100.0, 0.0, i as f32 * 2.0)).unwrap());
    }
    assert!(sim.spawn(Archetype::Normal, Vec3::new(100.0, 0.0, -10.0)).is_none());

    for handle in handles.iter().take(5) {
        let outcome = sim.damage_entity(*handle, 10_000.0).unwrap();
        assert!(outcome.killed);
    }
    assert_eq!(sim.pool().in_use_count(), cap - 5);
    assert_eq!(sim.director().profile().recent_kills(), 5);
    assert!(sim.director().profile().is_aggressive());

    let mut spawned = 0;
    for _ in 0..(60 * 6) {
        spawned += sim.step(DT, &camera, &player).spawn_events.len();
    }
    assert!(spawned > 0);
    assert!(spawned <= 5);
    assert!(sim.pool().in_use_count() <= sim.pool().cap());
}

#[test]
fn test_low_frame_rate_shrinks_cap_and_blocks_spawns() {
    let mut sim = Simulation::new(seeded());
    let base = sim.pool().cap();

    let mut shrunk = None;
    for _ in 0..3 {
        shrunk = shrunk.or(sim.record_fps_sample(25.0));
    }
    let Some(CapAdjustment::Shrunk { from, to }) = shrunk else {
        panic!("expected a shrink, got {shrunk:?}");
    };
    assert_eq!(from, base);
    assert!(to < base);
    assert_eq!(sim.pool().cap(), to);

    for i in 0..to {
        assert!(sim.spawn(Archetype::Normal, Vec3::new(50.0, 0.0, i as f32)).is_some());
    }
    assert!(sim.spawn(Archetype::Normal, Vec3::new(60.0, 0.0, 0.0)).is_none());
}

#[test]
fn test_quality_switch_rebases_cap() {
    let mut sim = Simulation::new(seeded());
    let medium = sim.pool().cap();
    sim.apply_quality(GraphicsQuality::Low);
    assert!(sim.pool().cap() < medium);
    assert_eq!(sim.pool().stats().base_cap, GraphicsQuality::Low.settings().max_entities);
}

#[test]
fn test_moving_player_gets_one_plan_per_interval() {
    let mut sim = Simulation::new(seeded());
    let camera = overhead_camera();
    let mut position = Vec3::ZERO;
    let velocity = Vec3::new(0.0, 0.0, 6.0);
    let mut planned = 0;
    for _ in 0..(60 * 6) {
        position += velocity * DT;
        let player = PlayerTelemetry {
            velocity,
            ..PlayerTelemetry::at(position)
        };
        if sim.step(DT, &camera, &player).planned.is_some() {
            planned += 1;
        }
    }
    assert_eq!(planned, 1);
    assert_eq!(sim.director().strategies_produced(), 1);
    assert!(!sim.director().profile().is_camping());
}

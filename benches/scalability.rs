//! Scalability benchmarks for the horde director
//!
//! Measures frame cost at various population sizes to verify the population
//! core stays well inside a 60 FPS frame.
//!
//! Run with: cargo bench --bench scalability

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use glam::Vec3;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use horde_director::config::{DirectorConfig, GraphicsQuality};
use horde_director::game::archetype::Archetype;
use horde_director::game::camera::CameraView;
use horde_director::game::entity::EntityHandle;
use horde_director::game::pool::EntityResourceManager;
use horde_director::game::simulation::{PlayerTelemetry, Simulation};
use horde_director::game::spatial::SpatialGrid;
use horde_director::game::systems::navigation::{NavQuery, NavRecord, Navigator, Obstacle, Peer};

const DT: f32 = 1.0 / 60.0;

fn random_ring_point(rng: &mut StdRng, min: f32, max: f32) -> Vec3 {
    let angle = rng.gen_range(0.0..std::f32::consts::TAU);
    let radius = rng.gen_range(min..max);
    Vec3::new(angle.cos() * radius, 0.0, angle.sin() * radius)
}

/// Simulation pre-filled with `count` entities around the player
fn populated_simulation(count: usize) -> Simulation {
    let mut config = DirectorConfig::default();
    config.quality = GraphicsQuality::Ultra;
    config.simulation.seed = Some(1);
    // Keep the director out of the measurement
    config.simulation.spawn_interval = f32::MAX;
    let mut sim = Simulation::new(config);
    let mut rng = StdRng::seed_from_u64(2);
    let obstacles = (0..12).map(|_| Obstacle::new(random_ring_point(&mut rng, 10.0, 40.0), 2.0)).collect();
    sim.set_obstacles(obstacles);

    for i in 0..count {
        let archetype = Archetype::ALL[i % 3];
        sim.spawn(archetype, random_ring_point(&mut rng, 15.0, 60.0));
    }
    sim
}

/// Benchmark a full frame at various population sizes
fn bench_frame(c: &mut Criterion) {
    let mut group = c.benchmark_group("frame");
    group.sample_size(50);

    let camera = CameraView::new(Vec3::new(0.0, 70.0, 0.0), Vec3::NEG_Y);
    let player = PlayerTelemetry::at(Vec3::ZERO);

    for count in [10, 25, 50, 80] {
        let mut sim = populated_simulation(count);

        group.throughput(Throughput::Elements(count as u64));
        group.bench_with_input(BenchmarkId::new("step", count), &count, |b, _| {
            b.iter(|| black_box(sim.step(DT, &camera, &player)))
        });
    }
    group.finish();
}

/// Benchmark pool churn: acquire then release a batch
fn bench_pool(c: &mut Criterion) {
    let mut group = c.benchmark_group("pool");
    group.sample_size(50);

    let mut config = DirectorConfig::default();
    config.quality = GraphicsQuality::Ultra;

    for count in [20, 40, 80] {
        let mut pool = EntityResourceManager::new(&config);
        let mut rng = StdRng::seed_from_u64(3);
        let positions: Vec<Vec3> = (0..count).map(|_| random_ring_point(&mut rng, 0.0, 100.0)).collect();
        let mut handles: Vec<EntityHandle> = Vec::with_capacity(count);

        group.throughput(Throughput::Elements(count as u64));
        group.bench_with_input(BenchmarkId::new("acquire_release", count), &count, |b, _| {
            b.iter(|| {
                for (i, position) in positions.iter().enumerate() {
                    if let Some(handle) = pool.acquire(Archetype::ALL[i % 2], *position) {
                        handles.push(handle);
                    }
                }
                for handle in handles.drain(..) {
                    pool.release(handle);
                }
            })
        });
    }
    group.finish();
}

/// Benchmark spatial grid build and radius queries
fn bench_spatial_grid(c: &mut Criterion) {
    let mut group = c.benchmark_group("spatial_grid");
    group.sample_size(50);

    for count in [100, 500, 1000, 2000] {
        let mut rng = StdRng::seed_from_u64(4);
        let entries: Vec<(u32, Vec3)> = (0..count)
            .map(|i| (i as u32, random_ring_point(&mut rng, 0.0, 200.0)))
            .collect();

        group.throughput(Throughput::Elements(count as u64));
        group.bench_with_input(BenchmarkId::new("build_and_query", count), &count, |b, _| {
            b.iter(|| {
                let mut grid = SpatialGrid::new(10.0);
                grid.rebuild(entries.iter().copied());
                let mut found = 0;
                for (_, position) in entries.iter().step_by(10) {
                    found += grid.query_radius(*position, 30.0).count();
                }
                black_box(found)
            })
        });
    }
    group.finish();
}

/// Benchmark one navigation step among obstacles and peers
fn bench_navigation(c: &mut Criterion) {
    let mut group = c.benchmark_group("navigation");
    group.sample_size(50);

    let navigator = Navigator::default();
    let mut rng = StdRng::seed_from_u64(5);

    for obstacle_count in [0, 10, 50] {
        let obstacles: Vec<Obstacle> = (0..obstacle_count)
            .map(|_| Obstacle::new(random_ring_point(&mut rng, 5.0, 40.0), 2.0))
            .collect();
        let peers: Vec<Peer> = (0..20)
            .map(|i| Peer {
                id: EntityHandle { index: i + 1, generation: 0 },
                position: random_ring_point(&mut rng, 0.0, 10.0),
                alive: true,
            })
            .collect();
        let mut record = NavRecord::new();

        group.bench_with_input(BenchmarkId::new("plan", obstacle_count), &obstacle_count, |b, _| {
            b.iter(|| {
                let query = NavQuery {
                    current: Vec3::new(-45.0, 0.0, 0.0),
                    target: Vec3::new(45.0, 0.0, 0.0),
                    heading: Vec3::X,
                    obstacles: &obstacles,
                    peers: &peers,
                    self_id: EntityHandle { index: 0, generation: 0 },
                    dt: DT,
                };
                black_box(navigator.plan(&mut record, &query, &mut rng))
            })
        });
    }
    group.finish();
}

criterion_group!(benches, bench_frame, bench_pool, bench_spatial_grid, bench_navigation);

criterion_main!(benches);

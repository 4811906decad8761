use std::f32::consts::TAU;

use anyhow::Context;
use glam::Vec3;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use horde_director::config::DirectorConfig;
use horde_director::game::camera::CameraView;
use horde_director::game::simulation::{PlayerTelemetry, Simulation};
use horde_director::game::systems::navigation::Obstacle;
use horde_director::game::systems::spawn_director::WorldBounds;

const STATUS_INTERVAL: u32 = 300;

fn main() -> anyhow::Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_target(false)
        .init();

    info!("Horde Director v{}", env!("CARGO_PKG_VERSION"));

    let config = DirectorConfig::from_env();
    config.validate().context("invalid director configuration")?;
    info!(
        quality = %config.quality,
        max_entities = config.quality_settings().max_entities,
        difficulty = config.simulation.difficulty,
        "Configuration loaded"
    );

    let seconds: f32 = match std::env::var("HORDE_RUN_SECONDS") {
        Ok(raw) => raw
            .parse()
            .with_context(|| format!("HORDE_RUN_SECONDS must be a number, got '{raw}'"))?,
        Err(_) => 60.0,
    };

    let mut sim = Simulation::new(config);
    sim.set_obstacles(arena_obstacles());
    sim.set_bounds(Some(WorldBounds::new(Vec3::new(-150.0, 0.0, -150.0), Vec3::new(150.0, 0.0, 150.0))));

    let mut script = ScriptedPlayer::default();
    let mut frame: u32 = 0;

    while sim.clock() < seconds as f64 {
        // Synthetic frame time that grows with the horde
        let load = sim.pool().in_use_count() as f32;
        let fps = (72.0 - load * 0.9).max(15.0);
        let dt = 1.0 / fps;

        let t = sim.clock() as f32;
        let player = script.advance(t, dt);
        let camera = CameraView::new(
            player.position + Vec3::new(0.0, 1.7, 0.0),
            if player.velocity.length_squared() > 1e-4 { player.velocity } else { Vec3::Z },
        );

        let report = sim.step(dt, &camera, &player);
        for spawn in &report.spawn_events {
            debug!(entity = spawn.handle.index, archetype = %spawn.archetype, "spawned");
        }

        if let Some(adjustment) = report.cap_adjustment {
            info!(?adjustment, fps, cap = sim.pool().cap(), "population cap adjusted");
        }

        // The player shoots the closest entity every 30 frames
        if frame % 30 == 15 {
            let target = sim
                .pool()
                .nearby_entities(player.position, 25.0)
                .filter(|e| e.is_alive())
                .min_by(|a, b| {
                    a.position
                        .distance_squared(player.position)
                        .total_cmp(&b.position.distance_squared(player.position))
                })
                .map(|e| e.handle());
            sim.notify_gunfire(player.position);
            if let Some(handle) = target {
                let hit = sim.damage_entity(handle, 35.0).is_some();
                script.register_shot(hit);
            } else {
                script.register_shot(false);
            }
        }

        if frame % STATUS_INTERVAL == 0 && frame > 0 {
            info!(
                t = format!("{t:.1}s"),
                status = sim.pool().population().status_message(),
                avg_fps = sim.pool().population().average_fps().unwrap_or(0.0),
                pending = sim.pending_spawns(),
                strategies = sim.director().active_strategies(),
                "status"
            );
            let stats = serde_json::to_string(&sim.pool().stats())?;
            let grid = sim.pool().grid_stats();
            debug!(%stats, cells = grid.non_empty_cells, max_per_cell = grid.max_per_cell, "pool stats");
        }
        frame += 1;
    }

    info!(
        strategies = sim.director().strategies_produced(),
        kills = sim.director().profile().recent_kills(),
        in_use = sim.pool().in_use_count(),
        "Run finished"
    );
    println!("{}", sim.metrics().render());
    Ok(())
}

/// A few pillars to steer around
fn arena_obstacles() -> Vec<Obstacle> {
    (0..8)
        .map(|i| {
            let angle = i as f32 / 8.0 * TAU;
            Obstacle::new(Vec3::new(angle.cos() * 35.0, 0.0, angle.sin() * 35.0), 2.5)
        })
        .collect()
}

/// Player that circles, sprints in a line, then camps
#[derive(Debug, Default)]
struct ScriptedPlayer {
    position: Vec3,
    shot: bool,
    hit: bool,
}

impl ScriptedPlayer {
    fn advance(&mut self, t: f32, dt: f32) -> PlayerTelemetry {
        let phase = t % 60.0;
        let target = if phase < 20.0 {
            let angle = phase / 20.0 * TAU;
            Vec3::new(angle.cos() * 20.0, 0.0, angle.sin() * 20.0)
        } else if phase < 35.0 {
            Vec3::new(20.0 + (phase - 20.0) * 4.0, 0.0, 0.0)
        } else {
            self.position
        };
        let velocity = (target - self.position) / dt;
        self.position = target;

        let telemetry = PlayerTelemetry {
            position: self.position,
            velocity,
            health: 100.0,
            shot_fired: self.shot,
            hit: self.hit,
            headshot: false,
        };
        self.shot = false;
        self.hit = false;
        telemetry
    }

    fn register_shot(&mut self, hit: bool) {
        self.shot = true;
        self.hit = hit;
    }
}

//! Prometheus-compatible population metrics
//!
//! Counters and gauges are atomics so a reporting thread can read them while
//! the simulation writes. `render` produces exposition text; serving it is
//! left to the host.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use parking_lot::Mutex;

use crate::game::pool::PoolStats;

/// Frame samples kept for percentiles
const FRAME_HISTORY: usize = 1000;

/// Metrics registry for the entity population core
#[derive(Debug)]
pub struct Metrics {
    // Population
    pub in_use: AtomicU64,
    pub active: AtomicU64,
    pub culled: AtomicU64,
    pub pool_allocated: AtomicU64,
    pub adaptive_cap: AtomicU64,
    pub base_cap: AtomicU64,

    // Spawning
    pub spawns: AtomicU64,
    pub spawns_deferred: AtomicU64,
    pub spawns_expired: AtomicU64,
    pub strategies_planned: AtomicU64,
    pub strategies_in_flight: AtomicU64,

    // Combat
    pub kills: AtomicU64,
    pub attacks: AtomicU64,

    // AI
    pub ai_decisions: AtomicU64,
    pub ai_skipped: AtomicU64,

    // Frame timing (microseconds)
    pub frame_time_us: AtomicU64,
    pub frame_time_p95_us: AtomicU64,
    pub frame_time_max_us: AtomicU64,
    pub frame_count: AtomicU64,

    frame_history: Mutex<VecDeque<u64>>,
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new()
    }
}

impl Metrics {
    pub fn new() -> Self {
        Self {
            in_use: AtomicU64::new(0),
            active: AtomicU64::new(0),
            culled: AtomicU64::new(0),
            pool_allocated: AtomicU64::new(0),
            adaptive_cap: AtomicU64::new(0),
            base_cap: AtomicU64::new(0),
            spawns: AtomicU64::new(0),
            spawns_deferred: AtomicU64::new(0),
            spawns_expired: AtomicU64::new(0),
            strategies_planned: AtomicU64::new(0),
            strategies_in_flight: AtomicU64::new(0),
            kills: AtomicU64::new(0),
            attacks: AtomicU64::new(0),
            ai_decisions: AtomicU64::new(0),
            ai_skipped: AtomicU64::new(0),
            frame_time_us: AtomicU64::new(0),
            frame_time_p95_us: AtomicU64::new(0),
            frame_time_max_us: AtomicU64::new(0),
            frame_count: AtomicU64::new(0),
            frame_history: Mutex::new(VecDeque::with_capacity(FRAME_HISTORY)),
        }
    }

    /// Record a frame time and update percentiles
    pub fn record_frame_time(&self, duration: Duration) {
        let us = duration.as_micros() as u64;
        self.frame_time_us.store(us, Ordering::Relaxed);
        self.frame_count.fetch_add(1, Ordering::Relaxed);

        let mut history = self.frame_history.lock();
        history.push_back(us);
        while history.len() > FRAME_HISTORY {
            history.pop_front();
        }

        if history.len() >= 10 {
            let mut sorted: Vec<u64> = history.iter().copied().collect();
            sorted.sort_unstable();
            let p95_idx = (sorted.len() as f32 * 0.95) as usize;
            self.frame_time_p95_us
                .store(sorted[p95_idx.min(sorted.len() - 1)], Ordering::Relaxed);
            self.frame_time_max_us
                .store(sorted.last().copied().unwrap_or(0), Ordering::Relaxed);
        }
    }

    /// Copy pool occupancy into the gauges
    pub fn record_pool(&self, stats: &PoolStats) {
        self.in_use.store(stats.in_use as u64, Ordering::Relaxed);
        self.active.store(stats.active as u64, Ordering::Relaxed);
        self.culled.store(stats.culled as u64, Ordering::Relaxed);
        self.pool_allocated.store(stats.allocated() as u64, Ordering::Relaxed);
        self.adaptive_cap.store(stats.cap as u64, Ordering::Relaxed);
        self.base_cap.store(stats.base_cap as u64, Ordering::Relaxed);
    }

    #[inline]
    pub fn add(counter: &AtomicU64, n: usize) {
        if n > 0 {
            counter.fetch_add(n as u64, Ordering::Relaxed);
        }
    }

    /// Generate Prometheus-format metrics output
    pub fn render(&self) -> String {
        let mut output = String::with_capacity(2048);

        macro_rules! metric {
            ($name:expr, $help:expr, $type:expr, $value:expr) => {
                output.push_str(&format!(
                    "# HELP {} {}\n# TYPE {} {}\n{} {}\n",
                    $name, $help, $name, $type, $name, $value
                ));
            };
        }

        metric!("horde_entities_in_use", "Slots acquired or active", "gauge",
            self.in_use.load(Ordering::Relaxed));
        metric!("horde_entities_active", "Slots active in the world", "gauge",
            self.active.load(Ordering::Relaxed));
        metric!("horde_entities_culled", "Active slots culled from updates", "gauge",
            self.culled.load(Ordering::Relaxed));
        metric!("horde_pool_allocated", "Slots allocated across all archetype pools", "gauge",
            self.pool_allocated.load(Ordering::Relaxed));
        metric!("horde_adaptive_cap", "Current adaptive population cap", "gauge",
            self.adaptive_cap.load(Ordering::Relaxed));
        metric!("horde_base_cap", "Quality-derived base population cap", "gauge",
            self.base_cap.load(Ordering::Relaxed));

        metric!("horde_spawns_total", "Entities spawned", "counter",
            self.spawns.load(Ordering::Relaxed));
        metric!("horde_spawns_deferred_total", "Spawn attempts deferred by backpressure", "counter",
            self.spawns_deferred.load(Ordering::Relaxed));
        metric!("horde_spawns_expired_total", "Deferred spawns dropped after expiry", "counter",
            self.spawns_expired.load(Ordering::Relaxed));
        metric!("horde_strategies_planned_total", "Spawn strategies produced", "counter",
            self.strategies_planned.load(Ordering::Relaxed));
        metric!("horde_strategies_in_flight", "Spawn strategies not yet completed", "gauge",
            self.strategies_in_flight.load(Ordering::Relaxed));

        metric!("horde_kills_total", "Entities killed by the player", "counter",
            self.kills.load(Ordering::Relaxed));
        metric!("horde_attacks_total", "Attacks issued by entities", "counter",
            self.attacks.load(Ordering::Relaxed));
        metric!("horde_ai_decisions_total", "AI decisions evaluated", "counter",
            self.ai_decisions.load(Ordering::Relaxed));
        metric!("horde_ai_skipped_total", "AI updates skipped for culled entities", "counter",
            self.ai_skipped.load(Ordering::Relaxed));

        metric!("horde_frame_time_microseconds", "Last frame time in microseconds", "gauge",
            self.frame_time_us.load(Ordering::Relaxed));
        metric!("horde_frame_time_p95_microseconds", "95th percentile frame time", "gauge",
            self.frame_time_p95_us.load(Ordering::Relaxed));
        metric!("horde_frame_time_max_microseconds", "Maximum frame time", "gauge",
            self.frame_time_max_us.load(Ordering::Relaxed));
        metric!("horde_frame_count", "Frames processed", "counter",
            self.frame_count.load(Ordering::Relaxed));

        output
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_contains_counters() {
        let metrics = Metrics::new();
        Metrics::add(&metrics.spawns, 3);
        Metrics::add(&metrics.kills, 0);
        let text = metrics.render();
        assert!(text.contains("# TYPE horde_spawns_total counter"));
        assert!(text.contains("horde_spawns_total 3\n"));
        assert!(text.contains("horde_kills_total 0\n"));
    }

    #[test]
    fn test_frame_percentiles() {
        let metrics = Metrics::new();
        for ms in 1..=100u64 {
            metrics.record_frame_time(Duration::from_millis(ms));
        }
        assert_eq!(metrics.frame_count.load(Ordering::Relaxed), 100);
        assert_eq!(metrics.frame_time_max_us.load(Ordering::Relaxed), 100_000);
        let p95 = metrics.frame_time_p95_us.load(Ordering::Relaxed);
        assert!((95_000..=96_000).contains(&p95), "{p95}");
    }

    #[test]
    fn test_frame_history_is_bounded() {
        let metrics = Metrics::new();
        for _ in 0..(FRAME_HISTORY + 50) {
            metrics.record_frame_time(Duration::from_micros(10));
        }
        assert_eq!(metrics.frame_history.lock().len(), FRAME_HISTORY);
    }
}

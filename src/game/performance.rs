//! Frame-rate driven population control
//!
//! Averages frame times into one FPS sample per simulated second and moves
//! the active-entity cap in response:
//! - Sustained low FPS shrinks the cap (never below the floor)
//! - Sustained high FPS grows it back toward the quality-derived base cap
//! - Adjustments are spaced out to avoid oscillation

use std::collections::VecDeque;

use crate::config::AdaptiveConfig;

/// Samples kept for reporting
const SAMPLE_HISTORY: usize = 60;

/// Classification of the most recent FPS sample
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameHealth {
    /// Below the low threshold
    Struggling,
    /// Between thresholds
    Stable,
    /// Above the high threshold
    Comfortable,
}

/// A change applied to the population cap
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CapAdjustment {
    Shrunk { from: usize, to: usize },
    Grown { from: usize, to: usize },
}

/// Adaptive cap on concurrently in-use entities
#[derive(Debug, Clone)]
pub struct PopulationController {
    config: AdaptiveConfig,
    base_cap: usize,
    cap: usize,
    /// Frame time accumulated toward the next sample
    window_time: f64,
    window_frames: u32,
    /// Simulated seconds since creation
    clock: f64,
    samples: VecDeque<f32>,
    low_streak: u32,
    high_streak: u32,
    last_adjustment: Option<f64>,
}

impl PopulationController {
    pub fn new(base_cap: usize, config: AdaptiveConfig) -> Self {
        Self {
            config,
            base_cap,
            cap: base_cap,
            window_time: 0.0,
            window_frames: 0,
            clock: 0.0,
            samples: VecDeque::with_capacity(SAMPLE_HISTORY),
            low_streak: 0,
            high_streak: 0,
            last_adjustment: None,
        }
    }

    /// Current cap on in-use entities
    #[inline]
    pub fn cap(&self) -> usize {
        self.cap
    }

    #[inline]
    pub fn base_cap(&self) -> usize {
        self.base_cap
    }

    /// Change the quality-derived target. The cap is clamped down immediately
    /// and grows toward a higher base through the normal path.
    pub fn set_base_cap(&mut self, base_cap: usize) {
        self.base_cap = base_cap;
        self.cap = self.cap.min(base_cap);
    }

    /// Record one rendered frame. Emits an FPS sample once a full sample
    /// interval of frame time has accumulated.
    pub fn record_frame(&mut self, dt: f32) -> Option<CapAdjustment> {
        if !dt.is_finite() || dt <= 0.0 {
            return None;
        }
        self.clock += dt as f64;
        self.window_time += dt as f64;
        self.window_frames += 1;

        if self.window_time < self.config.sample_interval as f64 {
            return None;
        }

        let fps = (self.window_frames as f64 / self.window_time) as f32;
        self.window_time = 0.0;
        self.window_frames = 0;
        self.record_sample(self.clock, fps)
    }

    /// Feed one averaged FPS sample taken at simulated time `at`
    pub fn record_sample(&mut self, at: f64, fps: f32) -> Option<CapAdjustment> {
        self.samples.push_back(fps);
        while self.samples.len() > SAMPLE_HISTORY {
            self.samples.pop_front();
        }

        match self.classify(fps) {
            FrameHealth::Struggling => {
                self.low_streak += 1;
                self.high_streak = 0;
            }
            FrameHealth::Comfortable => {
                self.high_streak += 1;
                self.low_streak = 0;
            }
            FrameHealth::Stable => {
                self.low_streak = 0;
                self.high_streak = 0;
            }
        }

        if let Some(last) = self.last_adjustment {
            if at - last < self.config.min_adjust_interval as f64 {
                return None;
            }
        }

        let adjustment = if self.low_streak >= self.config.low_streak {
            self.shrink()
        } else if self.high_streak >= self.config.high_streak {
            self.grow()
        } else {
            None
        };

        if let Some(adjustment) = adjustment {
            self.last_adjustment = Some(at);
            match adjustment {
                CapAdjustment::Shrunk { from, to } => {
                    tracing::info!(from, to, fps, "population cap reduced");
                }
                CapAdjustment::Grown { from, to } => {
                    tracing::info!(from, to, fps, "population cap raised");
                }
            }
        }
        adjustment
    }

    fn shrink(&mut self) -> Option<CapAdjustment> {
        let floor = self.config.min_cap.min(self.base_cap);
        let target = ((self.cap as f32 * self.config.shrink_factor).round() as usize).max(floor);
        if target >= self.cap {
            return None;
        }
        let from = self.cap;
        self.cap = target;
        Some(CapAdjustment::Shrunk { from, to: target })
    }

    fn grow(&mut self) -> Option<CapAdjustment> {
        if self.cap >= self.base_cap {
            return None;
        }
        let step = ((self.base_cap as f32 * self.config.grow_step_ratio).round() as usize).max(1);
        let from = self.cap;
        self.cap = (self.cap + step).min(self.base_cap);
        Some(CapAdjustment::Grown { from, to: self.cap })
    }

    pub fn classify(&self, fps: f32) -> FrameHealth {
        if fps < self.config.low_fps {
            FrameHealth::Struggling
        } else if fps > self.config.high_fps {
            FrameHealth::Comfortable
        } else {
            FrameHealth::Stable
        }
    }

    /// Most recent FPS sample
    pub fn last_fps(&self) -> Option<f32> {
        self.samples.back().copied()
    }

    /// Average of retained samples
    pub fn average_fps(&self) -> Option<f32> {
        if self.samples.is_empty() {
            return None;
        }
        Some(self.samples.iter().sum::<f32>() / self.samples.len() as f32)
    }

    /// Health of the most recent sample, `None` before the first sample
    pub fn frame_health(&self) -> Option<FrameHealth> {
        self.last_fps().map(|fps| self.classify(fps))
    }

    /// Get a human-readable status message
    pub fn status_message(&self) -> String {
        format!(
            "{:?} - {:.1} fps, cap {}/{}",
            self.frame_health().unwrap_or(FrameHealth::Stable),
            self.last_fps().unwrap_or(0.0),
            self.cap,
            self.base_cap
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn controller(base: usize) -> PopulationController {
        PopulationController::new(base, AdaptiveConfig::default())
    }

    #[test]
    fn test_three_low_samples_shrink_by_fifteen_percent() {
        let mut c = controller(100);
        assert_eq!(c.record_sample(1.0, 30.0), None);
        assert_eq!(c.record_sample(2.0, 30.0), None);
        let adj = c.record_sample(3.0, 30.0);
        assert_eq!(adj, Some(CapAdjustment::Shrunk { from: 100, to: 85 }));
        assert_eq!(c.cap(), 85);
    }

    #[test]
    fn test_high_samples_grow_back_but_not_above_base() {
        let mut c = controller(100);
        for t in 1..=3 {
            c.record_sample(t as f64, 30.0);
        }
        assert_eq!(c.cap(), 85);

        for t in 4..=7 {
            assert_eq!(c.record_sample(t as f64, 60.0), None);
        }
        let adj = c.record_sample(8.0, 60.0);
        assert_eq!(adj, Some(CapAdjustment::Grown { from: 85, to: 90 }));

        // Keep feeding high samples; never exceeds base
        for t in 9..=60 {
            c.record_sample(t as f64, 60.0);
            assert!(c.cap() <= 100);
        }
        assert_eq!(c.cap(), 100);
    }

    #[test]
    fn test_adjustments_are_at_least_two_seconds_apart() {
        let mut c = controller(200);
        let mut adjusted_at = Vec::new();
        for t in 1..=20 {
            if c.record_sample(t as f64 * 0.5, 20.0).is_some() {
                adjusted_at.push(t as f64 * 0.5);
            }
        }
        assert!(adjusted_at.len() >= 2);
        for pair in adjusted_at.windows(2) {
            assert!(pair[1] - pair[0] >= 2.0, "adjustments too close: {pair:?}");
        }
    }

    #[test]
    fn test_cap_floor() {
        let mut c = controller(12);
        for t in 1..=30 {
            c.record_sample(t as f64 * 3.0, 10.0);
        }
        assert_eq!(c.cap(), 10);
    }

    #[test]
    fn test_stable_sample_resets_streak() {
        let mut c = controller(100);
        c.record_sample(1.0, 30.0);
        c.record_sample(2.0, 30.0);
        c.record_sample(3.0, 50.0);
        assert_eq!(c.record_sample(4.0, 30.0), None);
        assert_eq!(c.cap(), 100);
    }

    #[test]
    fn test_record_frame_emits_one_sample_per_second() {
        let mut c = controller(100);
        // 30 fps for three seconds
        for _ in 0..90 {
            c.record_frame(1.0 / 30.0);
        }
        assert!(c.samples.len() >= 2);
        let fps = c.last_fps().unwrap();
        assert!((fps - 30.0).abs() < 1.0, "fps = {fps}");
    }

    #[test]
    fn test_record_frame_ignores_bad_dt() {
        let mut c = controller(100);
        assert_eq!(c.record_frame(0.0), None);
        assert_eq!(c.record_frame(f32::NAN), None);
        assert!(c.last_fps().is_none());
    }

    #[test]
    fn test_set_base_cap_clamps() {
        let mut c = controller(100);
        c.set_base_cap(40);
        assert_eq!(c.cap(), 40);
        assert_eq!(c.base_cap(), 40);
    }
}

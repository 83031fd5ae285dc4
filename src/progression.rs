//! Score, level and fall speed progression

use std::time::Duration;

/// Points per line clear at level 1, indexed by rows cleared
const SCORE_TABLE: [u64; 5] = [0, 40, 100, 300, 1200];
/// Lines needed per level
const LINES_PER_LEVEL: u32 = 10;
/// Fall interval multiplier applied on each level-up
const SPEED_UP: f64 = 0.80;
/// Soft drop runs at this fraction of the fall interval
const SOFT_DROP_FACTOR: f64 = 0.30;
/// Default fall interval at level 1, in milliseconds
pub const START_SPEED_MS: f64 = 800.0;

/// Snapshot sent to collaborators after every scoring clear
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScoreUpdate {
    pub lines: u32,
    pub score: u64,
    pub level: u32,
}

/// Progression state
#[derive(Debug, Clone)]
pub struct Progression {
    pub level: u32,
    pub score: u64,
    pub lines: u32,
    /// Milliseconds between automatic downward steps
    fall_interval_ms: f64,
}

impl Default for Progression {
    fn default() -> Self {
        Self::new(START_SPEED_MS)
    }
}

impl Progression {
    pub fn new(start_speed_ms: f64) -> Self {
        Self {
            level: 1,
            score: 0,
            lines: 0,
            fall_interval_ms: start_speed_ms.max(1.0),
        }
    }

    /// Apply a line clear. Returns the new totals, or `None` when nothing changed.
    pub fn on_lines_cleared(&mut self, n: usize) -> Option<ScoreUpdate> {
        if n == 0 {
            return None;
        }
        let n = n.min(4);

        self.score += SCORE_TABLE[n] * self.level as u64;
        self.lines += n as u32;

        if self.lines / LINES_PER_LEVEL > self.level - 1 {
            self.level += 1;
            self.fall_interval_ms *= SPEED_UP;
            tracing::info!(level = self.level, interval_ms = self.fall_interval_ms, "level up");
        }

        Some(self.snapshot())
    }

    pub fn snapshot(&self) -> ScoreUpdate {
        ScoreUpdate {
            lines: self.lines,
            score: self.score,
            level: self.level,
        }
    }

    #[allow(dead_code)]
    pub fn fall_interval_ms(&self) -> f64 {
        self.fall_interval_ms
    }

    /// Time between automatic downward steps
    pub fn fall_interval(&self) -> Duration {
        ms_to_duration(self.fall_interval_ms)
    }

    /// Time between downward steps while soft drop is held
    pub fn soft_drop_interval(&self) -> Duration {
        ms_to_duration(self.fall_interval_ms * SOFT_DROP_FACTOR)
    }
}

/// Round fractional milliseconds to the nearest microsecond
fn ms_to_duration(ms: f64) -> Duration {
    Duration::from_micros((ms * 1000.0).round() as u64)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_lines_is_noop() {
        let mut p = Progression::default();
        assert_eq!(p.on_lines_cleared(0), None);
        assert_eq!(p.score, 0);
        assert_eq!(p.lines, 0);
    }

    #[test]
    fn test_single_clear() {
        let mut p = Progression::default();
        let update = p.on_lines_cleared(1);
        assert_eq!(update, Some(ScoreUpdate { lines: 1, score: 40, level: 1 }));
    }

    #[test]
    fn test_tetris_at_level_one_and_two() {
        let mut p = Progression::default();
        p.on_lines_cleared(4);
        assert_eq!(p.score, 1200);

        let mut p = Progression::default();
        p.level = 2;
        p.on_lines_cleared(4);
        assert_eq!(p.score, 2400);
    }

    #[test]
    fn test_level_up_at_ten_lines() {
        let mut p = Progression::default();
        for _ in 0..9 {
            p.on_lines_cleared(1);
        }
        assert_eq!(p.level, 1);
        assert_eq!(p.fall_interval_ms(), 800.0);

        p.on_lines_cleared(1);
        assert_eq!(p.lines, 10);
        assert_eq!(p.level, 2);
        assert!((p.fall_interval_ms() - 640.0).abs() < 1e-9);

        // Same threshold again does not re-apply
        p.on_lines_cleared(0);
        assert_eq!(p.level, 2);
        assert!((p.fall_interval_ms() - 640.0).abs() < 1e-9);
        p.on_lines_cleared(1);
        assert_eq!(p.level, 2);
        assert!((p.fall_interval_ms() - 640.0).abs() < 1e-9);
    }

    #[test]
    fn test_speed_compounds() {
        let mut p = Progression::default();
        for _ in 0..10 {
            p.on_lines_cleared(2);
        }
        assert_eq!(p.lines, 20);
        assert_eq!(p.level, 3);
        assert!((p.fall_interval_ms() - 512.0).abs() < 1e-9);
    }

    #[test]
    fn test_fall_interval_never_increases() {
        let mut p = Progression::default();
        let mut last = p.fall_interval();
        for n in [1, 4, 3, 2, 4, 4, 1, 3, 4, 4, 2, 4] {
            p.on_lines_cleared(n);
            assert!(p.fall_interval() <= last);
            last = p.fall_interval();
        }
    }

    #[test]
    fn test_soft_drop_interval() {
        let p = Progression::default();
        assert_eq!(p.fall_interval(), Duration::from_millis(800));
        assert_eq!(p.soft_drop_interval(), Duration::from_millis(240));
    }

    #[test]
    fn test_score_scales_with_level() {
        let mut p = Progression::default();
        p.level = 3;
        p.on_lines_cleared(2);
        assert_eq!(p.score, 300);
        p.on_lines_cleared(3);
        assert_eq!(p.score, 300 + 900);
    }
}

//! Scoring and leveling
//!
//! Every formula is a pure function of the cleared count, the level and the mode's
//! constants:
//!
//! - score delta: `cleared * multiplier * level`, using the level before the clear
//! - level: `total_cleared / lines_per_level + 1`
//! - drop interval: `max(floor, base - level * step)` milliseconds

use crate::mode::{DropCurve, ModeRules};

/// Points awarded for clearing `cleared` lines at `level`
pub fn score_delta(cleared: u32, level: u32, multiplier: u32) -> u64 {
    cleared as u64 * multiplier as u64 * level as u64
}

/// Level reached after `total_cleared` lines
pub fn level_for(total_cleared: u32, lines_per_level: u32) -> u32 {
    total_cleared / lines_per_level.max(1) + 1
}

/// Milliseconds between automatic gravity steps at `level`
pub fn drop_interval_ms(level: u32, curve: &DropCurve) -> u64 {
    curve
        .base_ms
        .saturating_sub(level as u64 * curve.step_ms)
        .max(curve.floor_ms)
}

/// What one clear changed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClearOutcome {
    pub points: u64,
    pub level_up: bool,
}

/// Running score for one session
#[derive(Debug, Clone)]
pub struct Score {
    /// Current score
    pub points: u64,
    /// Current level
    pub level: u32,
    /// Total lines (or rings) cleared
    pub lines: u32,
    /// Current gravity interval
    pub drop_interval_ms: u64,
    rules: ModeRules,
}

impl Score {
    pub fn new(rules: ModeRules) -> Self {
        Self {
            points: 0,
            level: 1,
            lines: 0,
            drop_interval_ms: rules.drop.base_ms,
            rules,
        }
    }

    /// Apply one clear pass
    pub fn add_clear(&mut self, cleared: u32) -> ClearOutcome {
        let points = score_delta(cleared, self.level, self.rules.multiplier);
        self.points += points;
        self.lines += cleared;

        let level = level_for(self.lines, self.rules.lines_per_level).max(self.level);
        let level_up = level > self.level;
        self.level = level;
        self.drop_interval_ms = drop_interval_ms(self.level, &self.rules.drop);

        ClearOutcome { points, level_up }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_score_delta() {
        assert_eq!(score_delta(2, 3, 100), 600);
        assert_eq!(score_delta(1, 1, 150), 150);
        assert_eq!(score_delta(0, 7, 200), 0);
    }

    #[test]
    fn test_level_formula() {
        assert_eq!(level_for(0, 10), 1);
        assert_eq!(level_for(9, 10), 1);
        assert_eq!(level_for(10, 10), 2);
        assert_eq!(level_for(27, 10), 3);
        assert_eq!(level_for(5, 5), 2);
    }

    #[test]
    fn test_drop_interval_curves() {
        let linear = ModeRules::LINEAR.drop;
        assert_eq!(drop_interval_ms(1, &linear), 950);
        assert_eq!(drop_interval_ms(10, &linear), 500);
        assert_eq!(drop_interval_ms(18, &linear), 100);
        assert_eq!(drop_interval_ms(40, &linear), 100);

        let circular = ModeRules::CIRCULAR.drop;
        assert_eq!(drop_interval_ms(1, &circular), 1400);
        assert_eq!(drop_interval_ms(13, &circular), 200);
        assert_eq!(drop_interval_ms(100, &circular), 200);
    }

    #[test]
    fn test_single_clear() {
        let mut score = Score::new(ModeRules::LINEAR);
        assert_eq!(score.drop_interval_ms, 1000);
        let outcome = score.add_clear(1);
        assert_eq!(outcome.points, 100);
        assert!(!outcome.level_up);
        assert_eq!(score.lines, 1);
        assert_eq!(score.drop_interval_ms, 950);
    }

    #[test]
    fn test_level_up_uses_old_level_for_points() {
        let mut score = Score::new(ModeRules::LINEAR);
        score.add_clear(4);
        score.add_clear(4);
        assert_eq!(score.points, 800);
        let outcome = score.add_clear(3);
        assert_eq!(outcome.points, 300);
        assert!(outcome.level_up);
        assert_eq!(score.level, 2);
        assert_eq!(score.drop_interval_ms, 900);
    }

    #[test]
    fn test_mirror_and_circular_multipliers() {
        let mut mirror = Score::new(ModeRules::MIRROR);
        mirror.add_clear(2);
        assert_eq!(mirror.points, 300);

        let mut rings = Score::new(ModeRules::CIRCULAR);
        rings.add_clear(5);
        assert_eq!(rings.points, 1000);
        assert_eq!(rings.level, 2);
        assert_eq!(rings.drop_interval_ms, 1300);
    }
}

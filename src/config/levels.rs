//! Level table: ordered level-to-XP-threshold definitions.

use serde::{Deserialize, Serialize};

/// Name used when a level has no defined entry at all.
const FALLBACK_LEVEL_NAME: &str = "Git Master";

/// XP added per level when extrapolating beyond the highest defined level.
const EXTRAPOLATION_STEP: u64 = 5000;

/// One entry of the level table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevelDefinition {
    pub level: u32,
    pub xp_required: u64,
    pub name: String,
}

/// Ordered level definitions with pure lookup and extrapolation.
///
/// Constructed once from static configuration and treated as read-only by
/// the engine. The table is never empty: an empty input collapses to a
/// single synthetic level 1 at threshold 0.
#[derive(Debug, Clone)]
pub struct LevelTable {
    levels: Vec<LevelDefinition>,
}

impl LevelTable {
    /// Build a table from definitions, sorting by level.
    ///
    /// Thresholds must be non-decreasing once sorted; a violating set is a
    /// configuration error and the caller should fall back to
    /// [`LevelTable::default`]. See [`LevelTable::validate`].
    #[must_use]
    pub fn new(mut levels: Vec<LevelDefinition>) -> Self {
        levels.sort_by_key(|l| l.level);
        if levels.is_empty() {
            levels.push(LevelDefinition {
                level: 1,
                xp_required: 0,
                name: "Git Developer".to_string(),
            });
        }
        Self { levels }
    }

    /// Check the non-decreasing-threshold invariant over the sorted table.
    pub fn validate(levels: &[LevelDefinition]) -> std::result::Result<(), String> {
        let mut sorted: Vec<&LevelDefinition> = levels.iter().collect();
        sorted.sort_by_key(|l| l.level);
        for pair in sorted.windows(2) {
            if pair[1].xp_required < pair[0].xp_required {
                return Err(format!(
                    "xp_required decreases from level {} ({}) to level {} ({})",
                    pair[0].level, pair[0].xp_required, pair[1].level, pair[1].xp_required
                ));
            }
        }
        Ok(())
    }

    /// The level reached at a given XP total: the greatest defined level
    /// whose threshold is at or below `xp`. Negative XP is treated as 0 by
    /// construction (XP is unsigned throughout).
    #[must_use]
    pub fn level_for_xp(&self, xp: u64) -> u32 {
        self.levels
            .iter()
            .filter(|l| l.xp_required <= xp)
            .next_back()
            .map_or(1, |l| l.level)
    }

    /// XP threshold for a level.
    ///
    /// Exact match if defined; above the highest defined level the threshold
    /// extrapolates linearly at 5000 XP per level; at or below the lowest
    /// defined level it is the lowest defined threshold.
    #[must_use]
    pub fn xp_threshold_for_level(&self, level: u32) -> u64 {
        if let Some(def) = self.levels.iter().find(|l| l.level == level) {
            return def.xp_required;
        }

        if let Some(last) = self.levels.last() {
            if level > last.level {
                return last.xp_required + u64::from(level - last.level) * EXTRAPOLATION_STEP;
            }
        }

        self.levels.first().map_or(0, |l| l.xp_required)
    }

    /// Threshold of the level after `current_level`.
    #[must_use]
    pub fn xp_for_next_level(&self, current_level: u32) -> u64 {
        self.xp_threshold_for_level(current_level + 1)
    }

    /// Display name for a level: the name of the greatest defined level at
    /// or below the requested one, falling back to the highest defined
    /// level's name.
    #[must_use]
    pub fn name(&self, level: u32) -> String {
        let level = level.max(1);

        if let Some(def) = self.levels.iter().filter(|l| l.level <= level).next_back() {
            return def.name.clone();
        }

        self.levels
            .last()
            .map_or_else(|| FALLBACK_LEVEL_NAME.to_string(), |l| l.name.clone())
    }

    /// All definitions, sorted ascending by level.
    #[must_use]
    pub fn definitions(&self) -> &[LevelDefinition] {
        &self.levels
    }
}

impl Default for LevelTable {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table() -> LevelTable {
        LevelTable::new(vec![
            def(1, 0, "Novice"),
            def(2, 100, "Apprentice"),
            def(3, 300, "Journeyman"),
            def(5, 1000, "Expert"),
        ])
    }

    fn def(level: u32, xp_required: u64, name: &str) -> LevelDefinition {
        LevelDefinition {
            level,
            xp_required,
            name: name.to_string(),
        }
    }

    #[test]
    fn test_level_for_xp_picks_greatest_threshold_at_or_below() {
        let t = table();
        assert_eq!(t.level_for_xp(0), 1);
        assert_eq!(t.level_for_xp(99), 1);
        assert_eq!(t.level_for_xp(100), 2);
        assert_eq!(t.level_for_xp(299), 2);
        assert_eq!(t.level_for_xp(5000), 5);
    }

    #[test]
    fn test_threshold_exact_match() {
        let t = table();
        assert_eq!(t.xp_threshold_for_level(2), 100);
        assert_eq!(t.xp_threshold_for_level(5), 1000);
    }

    #[test]
    fn test_threshold_extrapolates_above_highest() {
        let t = table();
        assert_eq!(t.xp_threshold_for_level(6), 1000 + 5000);
        assert_eq!(t.xp_threshold_for_level(8), 1000 + 3 * 5000);
    }

    #[test]
    fn test_threshold_for_undefined_interior_level() {
        // Level 4 is not defined and not above the highest; the lowest
        // defined threshold applies.
        let t = table();
        assert_eq!(t.xp_threshold_for_level(4), 0);
    }

    #[test]
    fn test_name_uses_greatest_defined_at_or_below() {
        let t = table();
        assert_eq!(t.name(1), "Novice");
        assert_eq!(t.name(4), "Journeyman");
        assert_eq!(t.name(99), "Expert");
    }

    #[test]
    fn test_name_clamps_level_zero() {
        let t = table();
        assert_eq!(t.name(0), "Novice");
    }

    #[test]
    fn test_empty_table_synthesizes_level_one() {
        let t = LevelTable::new(Vec::new());
        assert_eq!(t.level_for_xp(0), 1);
        assert_eq!(t.level_for_xp(1_000_000), 1);
        assert_eq!(t.xp_threshold_for_level(1), 0);
        assert_eq!(t.name(1), "Git Developer");
    }

    #[test]
    fn test_unsorted_input_is_sorted() {
        let t = LevelTable::new(vec![def(3, 300, "C"), def(1, 0, "A"), def(2, 100, "B")]);
        assert_eq!(t.level_for_xp(150), 2);
        assert_eq!(t.definitions()[0].level, 1);
    }

    #[test]
    fn test_validate_rejects_decreasing_thresholds() {
        let bad = vec![def(1, 500, "A"), def(2, 100, "B")];
        assert!(LevelTable::validate(&bad).is_err());

        let good = vec![def(1, 0, "A"), def(2, 100, "B"), def(3, 100, "C")];
        assert!(LevelTable::validate(&good).is_ok());
    }

    #[test]
    fn test_threshold_is_monotone_and_round_trips() {
        // Contiguous table: thresholds are non-decreasing through the
        // defined range and into extrapolation.
        let t = LevelTable::new(vec![
            def(1, 0, "A"),
            def(2, 100, "B"),
            def(3, 300, "C"),
            def(4, 600, "D"),
        ]);
        let mut prev = 0;
        for level in 1..=10 {
            let threshold = t.xp_threshold_for_level(level);
            assert!(threshold >= prev, "threshold must be non-decreasing");
            prev = threshold;
        }
        for def in t.definitions() {
            assert_eq!(t.level_for_xp(def.xp_required), def.level);
        }
    }
}

//! Per-action XP reward tables keyed by level range.
//!
//! Each action carries an ordered rule list; the first rule whose range
//! contains the user's level wins, so definition order in the config file is
//! significant and the rules live in a `Vec`, never an unordered map.

use serde_json::Value;
use std::collections::HashMap;
use tracing::warn;

use crate::engine::GameCommand;

/// A level interval attached to one reward amount.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LevelRange {
    /// Inclusive `[min, max]` span, written `"min-max"`.
    Span { min: u32, max: u32 },
    /// A single level, written `"n"`.
    Exact(u32),
}

impl LevelRange {
    /// Parse a range string. Returns `None` for anything malformed.
    #[must_use]
    pub fn parse(text: &str) -> Option<Self> {
        let text = text.trim();
        if let Some((lo, hi)) = text.split_once('-') {
            let min = lo.trim().parse().ok()?;
            let max = hi.trim().parse().ok()?;
            Some(Self::Span { min, max })
        } else {
            text.parse().ok().map(Self::Exact)
        }
    }

    /// Whether a level falls inside this range.
    #[must_use]
    pub fn contains(&self, level: u32) -> bool {
        match *self {
            Self::Span { min, max } => level >= min && level <= max,
            Self::Exact(exact) => level == exact,
        }
    }
}

/// One ordered entry of an action's reward list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RewardRule {
    pub range: LevelRange,
    pub amount: u64,
}

/// Reward rule sets for every recognized action.
#[derive(Debug, Clone)]
pub struct RewardRules {
    rules: HashMap<GameCommand, Vec<RewardRule>>,
}

impl RewardRules {
    /// Parse the reward configuration document.
    ///
    /// The document maps action names to `{ "range": amount }` objects.
    /// Malformed ranges or non-integer amounts are skipped with a warning;
    /// they never match. Unknown action names are ignored.
    pub fn from_json(text: &str) -> serde_json::Result<Self> {
        let doc: serde_json::Map<String, Value> = serde_json::from_str(text)?;
        let mut rules = HashMap::new();

        for (action_name, entries) in &doc {
            let Some(action) = GameCommand::from_action_name(action_name) else {
                warn!("Ignoring unknown reward action '{action_name}'");
                continue;
            };

            let Some(entries) = entries.as_object() else {
                warn!("Reward entries for '{action_name}' are not an object; skipping");
                continue;
            };

            let mut list = Vec::with_capacity(entries.len());
            for (range_text, amount) in entries {
                let Some(range) = LevelRange::parse(range_text) else {
                    warn!("Skipping malformed level range '{range_text}' for '{action_name}'");
                    continue;
                };
                let Some(amount) = amount.as_u64() else {
                    warn!("Skipping non-integer reward amount for '{action_name}' {range_text}");
                    continue;
                };
                list.push(RewardRule { range, amount });
            }
            rules.insert(action, list);
        }

        Ok(Self { rules })
    }

    /// XP for an action at a user level: the amount of the first rule in
    /// definition order whose range contains the level, or 0 when nothing
    /// matches.
    #[must_use]
    pub fn reward_for(&self, action: GameCommand, user_level: u32) -> u64 {
        self.rules
            .get(&action)
            .and_then(|list| list.iter().find(|rule| rule.range.contains(user_level)))
            .map_or(0, |rule| rule.amount)
    }
}

impl Default for RewardRules {
    /// The built-in table used when no reward configuration can be loaded.
    fn default() -> Self {
        let span = |min, max| LevelRange::Span { min, max };
        let flat = |amount| vec![RewardRule { range: span(1, 100), amount }];

        let mut rules = HashMap::new();
        rules.insert(GameCommand::Commit, flat(10));
        rules.insert(GameCommand::Push, flat(15));
        rules.insert(GameCommand::Branch, flat(25));
        rules.insert(GameCommand::Merge, flat(30));
        rules.insert(GameCommand::Log, flat(5));
        rules.insert(GameCommand::Stash, flat(25));
        rules.insert(GameCommand::Tag, flat(20));
        rules.insert(GameCommand::Revert, flat(35));
        Self { rules }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_span_range() {
        assert_eq!(
            LevelRange::parse("1-50"),
            Some(LevelRange::Span { min: 1, max: 50 })
        );
        assert_eq!(
            LevelRange::parse(" 3 - 9 "),
            Some(LevelRange::Span { min: 3, max: 9 })
        );
    }

    #[test]
    fn test_parse_exact_range() {
        assert_eq!(LevelRange::parse("7"), Some(LevelRange::Exact(7)));
    }

    #[test]
    fn test_parse_malformed_returns_none() {
        assert_eq!(LevelRange::parse("abc"), None);
        assert_eq!(LevelRange::parse("1-"), None);
        assert_eq!(LevelRange::parse("-5"), None);
        assert_eq!(LevelRange::parse(""), None);
    }

    #[test]
    fn test_range_containment() {
        let span = LevelRange::Span { min: 10, max: 20 };
        assert!(span.contains(10));
        assert!(span.contains(20));
        assert!(!span.contains(9));
        assert!(!span.contains(21));

        let exact = LevelRange::Exact(5);
        assert!(exact.contains(5));
        assert!(!exact.contains(6));
    }

    #[test]
    fn test_first_matching_range_wins() {
        let rules = RewardRules::from_json(
            r#"{"commit": {"1-50": 10, "51-100": 20}}"#,
        )
        .expect("parse");
        assert_eq!(rules.reward_for(GameCommand::Commit, 60), 20);
        assert_eq!(rules.reward_for(GameCommand::Commit, 50), 10);
    }

    #[test]
    fn test_order_sensitivity_with_overlapping_ranges() {
        // The textually-first match wins even when a later range is tighter.
        let rules = RewardRules::from_json(
            r#"{"commit": {"1-100": 5, "10-20": 50}}"#,
        )
        .expect("parse");
        assert_eq!(rules.reward_for(GameCommand::Commit, 15), 5);
    }

    #[test]
    fn test_no_matching_range_yields_zero() {
        let rules = RewardRules::from_json(r#"{"commit": {"1-10": 10}}"#).expect("parse");
        assert_eq!(rules.reward_for(GameCommand::Commit, 11), 0);
        assert_eq!(rules.reward_for(GameCommand::Push, 1), 0);
    }

    #[test]
    fn test_malformed_entries_are_skipped() {
        let rules = RewardRules::from_json(
            r#"{"commit": {"banana": 99, "1-100": 10}, "push": {"1-100": "lots"}}"#,
        )
        .expect("parse");
        assert_eq!(rules.reward_for(GameCommand::Commit, 5), 10);
        assert_eq!(rules.reward_for(GameCommand::Push, 5), 0);
    }

    #[test]
    fn test_exact_range_lookup() {
        let rules =
            RewardRules::from_json(r#"{"tag": {"3": 40, "1-100": 20}}"#).expect("parse");
        assert_eq!(rules.reward_for(GameCommand::Tag, 3), 40);
        assert_eq!(rules.reward_for(GameCommand::Tag, 4), 20);
    }

    #[test]
    fn test_default_table_covers_all_actions() {
        let rules = RewardRules::default();
        assert_eq!(rules.reward_for(GameCommand::Commit, 1), 10);
        assert_eq!(rules.reward_for(GameCommand::Push, 50), 15);
        assert_eq!(rules.reward_for(GameCommand::Branch, 100), 25);
        assert_eq!(rules.reward_for(GameCommand::Merge, 1), 30);
        assert_eq!(rules.reward_for(GameCommand::Log, 1), 5);
        assert_eq!(rules.reward_for(GameCommand::Stash, 1), 25);
        assert_eq!(rules.reward_for(GameCommand::Tag, 1), 20);
        assert_eq!(rules.reward_for(GameCommand::Revert, 1), 35);
        // Outside every default range.
        assert_eq!(rules.reward_for(GameCommand::Commit, 101), 0);
    }
}

//! Achievement catalog and unlock checks.
//!
//! Achievement ids follow a `<statType>_<threshold>` naming convention that
//! encodes the unlock predicate. The convention is parsed once at catalog
//! load into an [`AchievementCheck`]; ids outside the convention are inert
//! descriptive entries that never unlock automatically.

use serde::Deserialize;
use serde_json::Value;
use std::collections::BTreeMap;
use tracing::warn;

use crate::profile::GameStatistics;

/// A statistic an achievement threshold can be checked against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatKind {
    TotalCommits,
    TotalPushes,
    MergesCompleted,
    BranchesCreated,
    LogViews,
    StashUses,
    TagsCreated,
    RevertsUsed,
    ConsecutiveCommitDays,
    FilesAdded,
    FilesDeleted,
}

impl StatKind {
    /// Map an id's stat-type segment to a statistic.
    #[must_use]
    pub fn from_type_name(name: &str) -> Option<Self> {
        match name {
            "commit" => Some(Self::TotalCommits),
            "push" => Some(Self::TotalPushes),
            "merge" => Some(Self::MergesCompleted),
            "branch" => Some(Self::BranchesCreated),
            "log" => Some(Self::LogViews),
            "stash" => Some(Self::StashUses),
            "tag" => Some(Self::TagsCreated),
            "revert" => Some(Self::RevertsUsed),
            "combo" => Some(Self::ConsecutiveCommitDays),
            "builder" => Some(Self::FilesAdded),
            "destroyer" => Some(Self::FilesDeleted),
            _ => None,
        }
    }

    /// Current value of this statistic.
    #[must_use]
    pub fn value(&self, stats: &GameStatistics) -> u64 {
        match self {
            Self::TotalCommits => stats.total_commits,
            Self::TotalPushes => stats.total_pushes,
            Self::MergesCompleted => stats.merges_completed,
            Self::BranchesCreated => stats.branches_created,
            Self::LogViews => stats.log_views,
            Self::StashUses => stats.stash_uses,
            Self::TagsCreated => stats.tags_created,
            Self::RevertsUsed => stats.reverts_used,
            Self::ConsecutiveCommitDays => u64::from(stats.consecutive_commit_days),
            Self::FilesAdded => stats.files_added,
            Self::FilesDeleted => stats.files_deleted,
        }
    }
}

/// Unlock predicate derived from an achievement id.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AchievementCheck {
    /// The mapped statistic has reached the threshold.
    Threshold(StatKind, u64),
    /// At least one commit was made during the given local hour.
    HourOfDay(u8),
}

impl AchievementCheck {
    /// Derive the check from the id naming convention.
    ///
    /// Ids must be exactly two `_`-separated segments with an integer second
    /// segment; `hour_<n>` additionally requires `n` in `[0, 23]`. Anything
    /// else has no check.
    #[must_use]
    pub fn from_id(id: &str) -> Option<Self> {
        let parts: Vec<&str> = id.split('_').collect();
        if parts.len() != 2 {
            return None;
        }
        let threshold: u64 = parts[1].parse().ok()?;

        if parts[0] == "hour" {
            if threshold <= 23 {
                return Some(Self::HourOfDay(threshold as u8));
            }
            return None;
        }

        StatKind::from_type_name(parts[0]).map(|kind| Self::Threshold(kind, threshold))
    }

    /// Evaluate the predicate against a statistics snapshot.
    #[must_use]
    pub fn is_satisfied(&self, stats: &GameStatistics) -> bool {
        match *self {
            Self::Threshold(kind, target) => kind.value(stats) >= target,
            Self::HourOfDay(hour) => stats.commits_by_hour[usize::from(hour)] >= 1,
        }
    }
}

/// One catalog entry: display info, reward, and the derived check.
#[derive(Debug, Clone)]
pub struct AchievementDefinition {
    pub id: String,
    pub name: String,
    pub description: String,
    pub xp_reward: u64,
    /// Presentational grouping only.
    pub category: String,
    /// `None` for ids outside the naming convention (inert entries).
    pub check: Option<AchievementCheck>,
}

#[derive(Debug, Deserialize)]
struct RawAchievement {
    name: String,
    description: String,
    #[serde(default)]
    xp_reward: u64,
}

/// The full achievement catalog, in configuration file order.
#[derive(Debug, Clone, Default)]
pub struct AchievementCatalog {
    definitions: Vec<AchievementDefinition>,
}

impl AchievementCatalog {
    /// Parse the catalog document: category name -> id -> entry.
    ///
    /// Individual malformed entries are skipped with a warning; the rest of
    /// the catalog still loads.
    pub fn from_json(text: &str) -> serde_json::Result<Self> {
        let doc: serde_json::Map<String, Value> = serde_json::from_str(text)?;
        let mut definitions = Vec::new();

        for (category, entries) in &doc {
            let Some(entries) = entries.as_object() else {
                warn!("Achievement category '{category}' is not an object; skipping");
                continue;
            };
            for (id, raw) in entries {
                match serde_json::from_value::<RawAchievement>(raw.clone()) {
                    Ok(raw) => definitions.push(AchievementDefinition {
                        id: id.clone(),
                        name: raw.name,
                        description: raw.description,
                        xp_reward: raw.xp_reward,
                        category: category.clone(),
                        check: AchievementCheck::from_id(id),
                    }),
                    Err(e) => warn!("Skipping malformed achievement '{id}': {e}"),
                }
            }
        }

        Ok(Self { definitions })
    }

    /// Evaluate all checks against updated statistics, returning the
    /// definitions newly satisfied this round.
    ///
    /// Already-unlocked ids are skipped entirely, so a second evaluation
    /// with the same statistics returns nothing. Inert entries never appear.
    pub fn evaluate<'a, D>(
        &'a self,
        stats: &GameStatistics,
        unlocked: &BTreeMap<String, D>,
    ) -> Vec<&'a AchievementDefinition> {
        self.definitions
            .iter()
            .filter(|def| !unlocked.contains_key(&def.id))
            .filter(|def| def.check.is_some_and(|check| check.is_satisfied(stats)))
            .collect()
    }

    /// Look up a definition by id.
    #[must_use]
    pub fn get(&self, id: &str) -> Option<&AchievementDefinition> {
        self.definitions.iter().find(|def| def.id == id)
    }

    /// All definitions in file order.
    #[must_use]
    pub fn definitions(&self) -> &[AchievementDefinition] {
        &self.definitions
    }

    /// Whether the catalog has no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }
}

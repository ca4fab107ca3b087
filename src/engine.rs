//! The progression engine: one-shot state transition per successful
//! git invocation.
//!
//! Given a command outcome and the loaded profile, the engine updates the
//! running statistics, computes the XP for the round (base reward, commit
//! bonuses, achievement rewards), re-derives the level from the new total,
//! and reports what changed. It performs no I/O; persisting the mutated
//! profile is the caller's job, and only when a report was produced.

use chrono::NaiveDate;

use crate::config::achievements::AchievementCatalog;
use crate::config::levels::LevelTable;
use crate::config::rewards::RewardRules;
use crate::git::diff::DiffStats;
use crate::profile::UserProfile;

/// Longest commit streak that still grows the streak bonus.
const STREAK_BONUS_CAP: u32 = 15;

/// Divisor applied to the combined change figure for the size bonus.
const SIZE_BONUS_DIVISOR: u64 = 20;

/// Ceiling of the commit size bonus.
const SIZE_BONUS_CAP: u64 = 20;

/// Flat XP for the first push of a calendar day.
const DAILY_PUSH_BONUS: u64 = 50;

/// The git commands the engine rewards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GameCommand {
    Commit,
    Push,
    Branch,
    Merge,
    Log,
    Stash,
    Tag,
    Revert,
}

impl GameCommand {
    /// Recognize a command from the raw git argument list.
    ///
    /// `branch` and `checkout -b` both count as branch creation. Anything
    /// else is outside the recognized set and earns nothing.
    #[must_use]
    pub fn from_args(args: &[String]) -> Option<Self> {
        match args.first().map(String::as_str) {
            Some("commit") => Some(Self::Commit),
            Some("push") => Some(Self::Push),
            Some("branch") => Some(Self::Branch),
            Some("checkout") if args.get(1).map(String::as_str) == Some("-b") => {
                Some(Self::Branch)
            }
            Some("merge") => Some(Self::Merge),
            Some("log") => Some(Self::Log),
            Some("stash") => Some(Self::Stash),
            Some("tag") => Some(Self::Tag),
            Some("revert") => Some(Self::Revert),
            _ => None,
        }
    }

    /// Resolve an action name as used in the reward configuration.
    #[must_use]
    pub fn from_action_name(name: &str) -> Option<Self> {
        match name.to_lowercase().as_str() {
            "commit" => Some(Self::Commit),
            "push" => Some(Self::Push),
            "branch" => Some(Self::Branch),
            "merge" => Some(Self::Merge),
            "log" => Some(Self::Log),
            "stash" => Some(Self::Stash),
            "tag" => Some(Self::Tag),
            "revert" => Some(Self::Revert),
            _ => None,
        }
    }

    /// The action name used in configuration and display.
    #[must_use]
    pub const fn action_name(&self) -> &'static str {
        match self {
            Self::Commit => "commit",
            Self::Push => "push",
            Self::Branch => "branch",
            Self::Merge => "merge",
            Self::Log => "log",
            Self::Stash => "stash",
            Self::Tag => "tag",
            Self::Revert => "revert",
        }
    }
}

/// Ephemeral per-invocation context handed to the engine.
///
/// Built by the wrapper after the wrapped command succeeded; never
/// persisted.
#[derive(Debug, Clone)]
pub struct CommandContext {
    pub command: GameCommand,
    /// Parsed change statistics, absent when diff retrieval failed or the
    /// commit has no parent.
    pub diff: Option<DiffStats>,
    /// Message of the commit just created, when available.
    pub commit_message: Option<String>,
    /// The caller's local calendar date.
    pub today: NaiveDate,
    /// The caller's local hour of day, `[0, 23]`.
    pub hour: u32,
}

impl CommandContext {
    /// A context with no diff information.
    #[must_use]
    pub fn new(command: GameCommand, today: NaiveDate, hour: u32) -> Self {
        Self {
            command,
            diff: None,
            commit_message: None,
            today,
            hour,
        }
    }
}

/// An achievement unlocked during one engine round.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnlockedAchievement {
    pub id: String,
    pub name: String,
    pub description: String,
    pub xp_reward: u64,
}

/// What one engine round changed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProgressReport {
    pub xp_gained: u64,
    pub new_level: u32,
    pub new_xp: u64,
    pub leveled_up: bool,
    pub newly_unlocked: Vec<UnlockedAchievement>,
}

/// Orchestrates statistics updates, reward lookup, achievement evaluation,
/// and level resolution over immutable configuration.
#[derive(Debug, Clone, Copy)]
pub struct ProgressionEngine<'a> {
    levels: &'a LevelTable,
    rewards: &'a RewardRules,
    achievements: &'a AchievementCatalog,
}

impl<'a> ProgressionEngine<'a> {
    #[must_use]
    pub fn new(
        levels: &'a LevelTable,
        rewards: &'a RewardRules,
        achievements: &'a AchievementCatalog,
    ) -> Self {
        Self {
            levels,
            rewards,
            achievements,
        }
    }

    /// Run one progression round, mutating the profile in place.
    ///
    /// Returns `None` when the round earned nothing; the caller must then
    /// discard the in-memory profile instead of persisting it, so a
    /// zero-value invocation never rewrites the profile file.
    pub fn apply(
        &self,
        profile: &mut UserProfile,
        ctx: &CommandContext,
    ) -> Option<ProgressReport> {
        let mut xp_to_add = match ctx.command {
            GameCommand::Commit => self.process_commit(profile, ctx),
            GameCommand::Push => self.process_push(profile, ctx),
            GameCommand::Branch => {
                profile.stats.branches_created += 1;
                self.rewards
                    .reward_for(GameCommand::Branch, profile.user.level)
            }
            GameCommand::Merge => {
                profile.stats.merges_completed += 1;
                self.rewards
                    .reward_for(GameCommand::Merge, profile.user.level)
            }
            GameCommand::Log => {
                profile.stats.log_views += 1;
                self.rewards.reward_for(GameCommand::Log, profile.user.level)
            }
            GameCommand::Stash => {
                profile.stats.stash_uses += 1;
                self.rewards
                    .reward_for(GameCommand::Stash, profile.user.level)
            }
            GameCommand::Tag => {
                profile.stats.tags_created += 1;
                self.rewards.reward_for(GameCommand::Tag, profile.user.level)
            }
            GameCommand::Revert => {
                profile.stats.reverts_used += 1;
                self.rewards
                    .reward_for(GameCommand::Revert, profile.user.level)
            }
        };

        if xp_to_add == 0 {
            return None;
        }

        let newly_unlocked: Vec<UnlockedAchievement> = self
            .achievements
            .evaluate(&profile.stats, &profile.achievements_unlocked)
            .into_iter()
            .map(|def| UnlockedAchievement {
                id: def.id.clone(),
                name: def.name.clone(),
                description: def.description.clone(),
                xp_reward: def.xp_reward,
            })
            .collect();

        for unlocked in &newly_unlocked {
            xp_to_add += unlocked.xp_reward;
            profile
                .achievements_unlocked
                .insert(unlocked.id.clone(), ctx.today);
        }

        let old_level = profile.user.level;
        let new_xp = profile.user.xp + xp_to_add;
        let new_level = self.levels.level_for_xp(new_xp);

        profile.user.xp = new_xp;
        profile.user.level = new_level;

        Some(ProgressReport {
            xp_gained: xp_to_add,
            new_level,
            new_xp,
            leveled_up: new_level > old_level,
            newly_unlocked,
        })
    }

    fn process_commit(&self, profile: &mut UserProfile, ctx: &CommandContext) -> u64 {
        let stats = &mut profile.stats;
        stats.total_commits += 1;
        stats.commits_by_hour[(ctx.hour % 24) as usize] += 1;

        if let Some(diff) = &ctx.diff {
            stats.files_added += diff.files_added;
        }

        match stats.last_commit_date {
            None => stats.consecutive_commit_days = 1,
            Some(last) => {
                let days = (ctx.today - last).num_days();
                if days == 1 {
                    stats.consecutive_commit_days += 1;
                } else if days > 1 {
                    stats.consecutive_commit_days = 1;
                }
            }
        }

        if stats.last_commit_date != Some(ctx.today) {
            stats.last_commit_date = Some(ctx.today);
        }

        let mut xp = self
            .rewards
            .reward_for(GameCommand::Commit, profile.user.level);
        xp += u64::from(profile.stats.consecutive_commit_days.min(STREAK_BONUS_CAP));

        if let Some(diff) = &ctx.diff {
            xp += (diff.total_changes / SIZE_BONUS_DIVISOR).min(SIZE_BONUS_CAP);
        }

        xp
    }

    fn process_push(&self, profile: &mut UserProfile, ctx: &CommandContext) -> u64 {
        profile.stats.total_pushes += 1;

        let mut xp = self
            .rewards
            .reward_for(GameCommand::Push, profile.user.level);

        if profile.stats.last_push_date != Some(ctx.today) {
            xp += DAILY_PUSH_BONUS;
            profile.stats.last_push_date = Some(ctx.today);
        }

        xp
    }
}

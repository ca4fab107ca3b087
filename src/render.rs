//! Terminal rendering of progression reports and profile views.
//!
//! All functions build plain strings; callers print them. Colors come from
//! `colored` and degrade gracefully on non-tty output.

use colored::Colorize;

use crate::config::achievements::AchievementCatalog;
use crate::config::levels::LevelTable;
use crate::engine::{ProgressReport, UnlockedAchievement};
use crate::profile::UserProfile;

const PANEL_WIDTH: usize = 50;

fn rule() -> String {
    "─".repeat(PANEL_WIDTH)
}

fn panel(header: &str, lines: &[String]) -> String {
    let mut out = Vec::with_capacity(lines.len() + 3);
    out.push(header.bold().to_string());
    out.push(rule());
    out.extend(lines.iter().cloned());
    out.push(rule());
    out.join("\n")
}

/// Dim separator between git output and the progression report.
#[must_use]
pub fn separator() -> String {
    "-".repeat(20).dimmed().to_string()
}

/// One-line XP gain summary.
#[must_use]
pub fn xp_gain(report: &ProgressReport, levels: &LevelTable) -> String {
    let next_level_xp = levels.xp_for_next_level(report.new_level);
    format!(
        "You gained +{} XP! Current level {} ({}/{}).",
        report.xp_gained, report.new_level, report.new_xp, next_level_xp
    )
    .green()
    .to_string()
}

/// Level-up announcement.
#[must_use]
pub fn level_up(level: u32, levels: &LevelTable) -> String {
    format!(
        "LEVEL UP! You have reached Level {}: {}!",
        level,
        levels.name(level)
    )
    .magenta()
    .bold()
    .to_string()
}

/// Panel announcing a newly unlocked achievement.
#[must_use]
pub fn achievement_unlocked(achievement: &UnlockedAchievement) -> String {
    panel(
        "Achievement Unlocked!",
        &[
            achievement.name.cyan().to_string(),
            achievement.description.italic().to_string(),
            String::new(),
            format!("Gained +{} XP!", achievement.xp_reward),
        ],
    )
}

/// The default profile view: identity, level, XP progress, unlocked names.
#[must_use]
pub fn profile(profile: &UserProfile, levels: &LevelTable, catalog: &AchievementCatalog) -> String {
    let level = profile.user.level;
    let xp = profile.user.xp;
    let current_level_xp = levels.xp_threshold_for_level(level);
    let next_level_xp = levels.xp_for_next_level(level);

    let progress_value = xp.saturating_sub(current_level_xp);
    let progress_total = next_level_xp.saturating_sub(current_level_xp).max(1);
    let percent = progress_value as f64 / progress_total as f64 * 100.0;

    let email = profile.config.user_email.as_deref().unwrap_or("(unknown)");
    let mut lines = vec![
        format!("Email: {}", email.cyan()),
        format!("Level: {} - {}", level, levels.name(level)),
        String::new(),
        format!("XP Progress: {progress_value}/{progress_total} ({percent:.1}%)"),
    ];

    if !profile.achievements_unlocked.is_empty() {
        lines.push(String::new());
        lines.push("Achievements Unlocked".bold().to_string());
        for id in profile.achievements_unlocked.keys() {
            let name = catalog
                .get(id)
                .map_or("Unknown Achievement", |def| def.name.as_str());
            lines.push(format!("* {name}"));
        }
    }

    panel("gitxp profile", &lines)
}

/// The `--stats` view: every counter, plus unlocked achievements with
/// descriptions.
#[must_use]
pub fn detailed_stats(
    profile: &UserProfile,
    catalog: &AchievementCatalog,
) -> String {
    let s = &profile.stats;
    let mut lines = vec![
        format!("Total commits: {}", s.total_commits),
        format!("Total pushes: {}", s.total_pushes),
        format!("Consecutive commit days: {}", s.consecutive_commit_days),
        format!("Branches created: {}", s.branches_created),
        format!("Merges completed: {}", s.merges_completed),
        format!("Log views: {}", s.log_views),
        format!("Stash uses: {}", s.stash_uses),
        format!("Tags created: {}", s.tags_created),
        format!("Reverts used: {}", s.reverts_used),
        format!("Files added: {}", s.files_added),
        format!("Files deleted: {}", s.files_deleted),
    ];

    if !profile.achievements_unlocked.is_empty() {
        lines.push(String::new());
        lines.push("Achievements Unlocked".bold().to_string());
        for id in profile.achievements_unlocked.keys() {
            match catalog.get(id) {
                Some(def) => {
                    lines.push(format!("* {}", def.name.cyan()));
                    lines.push(format!("  {}", def.description.italic()));
                }
                None => lines.push(format!("* {id}")),
            }
        }
    }

    panel("Detailed Statistics", &lines)
}

/// The `--details` view: the whole catalog with unlock markers.
#[must_use]
pub fn all_achievements(profile: &UserProfile, catalog: &AchievementCatalog) -> String {
    let mut lines = Vec::new();
    let mut current_category: Option<&str> = None;

    for def in catalog.definitions() {
        if current_category != Some(def.category.as_str()) {
            if current_category.is_some() {
                lines.push(String::new());
            }
            lines.push(def.category.to_uppercase().bold().to_string());
            current_category = Some(def.category.as_str());
        }

        let marker = if profile.achievements_unlocked.contains_key(&def.id) {
            "(x)"
        } else {
            "( )"
        };
        lines.push(format!("{} {}", marker, def.name));
        lines.push(format!("   {}", def.description));
        lines.push(format!("   XP Reward: {}", def.xp_reward));
    }

    if catalog.is_empty() {
        lines.push("No achievements configured.".to_string());
    }

    panel("All Achievements", &lines)
}

/// Usage text for the internal `help` command.
#[must_use]
pub fn help() -> String {
    let lines = vec![
        "Usage: gitxp [GIT_COMMAND] or gitxp [INTERNAL_COMMAND] [OPTIONS]...".to_string(),
        "Earn XP and level up with every git command!".to_string(),
        String::new(),
        "Examples:".to_string(),
        "  gitxp commit -m \"Add feature\"  # Same as: git commit -m \"Add feature\"".to_string(),
        "  gitxp push origin main          # Same as: git push origin main".to_string(),
        "  gitxp profile --stats           # Internal command".to_string(),
        String::new(),
        "Internal Commands:".to_string(),
        format!("  {}      Display user profile, stats, or clear progress.", "profile".cyan()),
        format!("  {}         Show this help message and exit.", "help".cyan()),
    ];
    panel("gitxp Help", &lines)
}

/// Error shown when no git identity is configured.
#[must_use]
pub fn identity_error() -> String {
    format!(
        "{}\nPlease run {} to set your identity.",
        "Error: Cannot find Git user email.".red(),
        "git config --global user.email 'your@email.com'".cyan()
    )
}

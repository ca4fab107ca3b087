//! Static configuration: application settings, level table, reward rules,
//! and the achievement catalog.
//!
//! Everything here loads once at startup into plain owned values that are
//! passed by reference into the engine. Load failures are never fatal: a
//! missing or malformed file falls back to the compiled-in defaults with a
//! warning.

pub mod achievements;
pub mod levels;
pub mod rewards;

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;
use tracing::warn;

use achievements::AchievementCatalog;
use levels::{LevelDefinition, LevelTable};
use rewards::RewardRules;

const DEFAULT_LEVELS: &str = include_str!("../assets/levels.json");
const DEFAULT_REWARDS: &str = include_str!("../assets/xp.json");
const DEFAULT_ACHIEVEMENTS: &str = include_str!("../assets/achievements.json");

/// Settings for locating the wrapped git binary.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GitSettings {
    #[serde(rename = "executablePath")]
    pub executable_path: String,
}

impl Default for GitSettings {
    fn default() -> Self {
        Self {
            executable_path: "git".to_string(),
        }
    }
}

/// Application settings, read from `settings.json` next to the executable.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppSettings {
    pub git: GitSettings,
}

impl AppSettings {
    /// Load settings, falling back to defaults when absent or malformed.
    #[must_use]
    pub fn load() -> Self {
        let Some(text) = read_override("settings.json") else {
            return Self::default();
        };
        match serde_json::from_str(&text) {
            Ok(settings) => settings,
            Err(e) => {
                warn!("Failed to parse settings.json: {e}; using defaults");
                Self::default()
            }
        }
    }
}

/// All static game configuration.
#[derive(Debug, Clone)]
pub struct GameConfig {
    pub levels: LevelTable,
    pub rewards: RewardRules,
    pub achievements: AchievementCatalog,
}

impl GameConfig {
    /// Load the level table, reward rules, and achievement catalog.
    ///
    /// Each asset resolves independently: a user override from the config
    /// directory when present and valid, otherwise the compiled-in default.
    #[must_use]
    pub fn load() -> Self {
        Self {
            levels: load_levels(),
            rewards: load_rewards(),
            achievements: load_achievements(),
        }
    }
}

/// The user-override configuration directory, `config/` next to the
/// executable.
fn config_dir() -> Option<PathBuf> {
    let exe = std::env::current_exe().ok()?;
    exe.parent().map(|dir| dir.join("config"))
}

fn read_override(file: &str) -> Option<String> {
    let path = config_dir()?.join(file);
    if !path.exists() {
        return None;
    }
    match fs::read_to_string(&path) {
        Ok(text) => Some(text),
        Err(e) => {
            warn!("Failed to read {}: {e}", path.display());
            None
        }
    }
}

fn parse_levels(text: &str) -> Option<LevelTable> {
    match serde_json::from_str::<Vec<LevelDefinition>>(text) {
        Ok(defs) => match LevelTable::validate(&defs) {
            Ok(()) => Some(LevelTable::new(defs)),
            Err(e) => {
                warn!("Invalid level table: {e}");
                None
            }
        },
        Err(e) => {
            warn!("Failed to parse level table: {e}");
            None
        }
    }
}

fn load_levels() -> LevelTable {
    if let Some(text) = read_override("levels.json") {
        if let Some(table) = parse_levels(&text) {
            return table;
        }
        warn!("Falling back to built-in levels");
    }
    parse_levels(DEFAULT_LEVELS).unwrap_or_default()
}

fn load_rewards() -> RewardRules {
    if let Some(text) = read_override("xp.json") {
        match RewardRules::from_json(&text) {
            Ok(rules) => return rules,
            Err(e) => warn!("Failed to parse xp.json: {e}; falling back to built-in rewards"),
        }
    }
    RewardRules::from_json(DEFAULT_REWARDS).unwrap_or_default()
}

fn load_achievements() -> AchievementCatalog {
    if let Some(text) = read_override("achievements.json") {
        match AchievementCatalog::from_json(&text) {
            Ok(catalog) => return catalog,
            Err(e) => {
                warn!("Failed to parse achievements.json: {e}; falling back to built-in catalog");
            }
        }
    }
    AchievementCatalog::from_json(DEFAULT_ACHIEVEMENTS).unwrap_or_default()
}

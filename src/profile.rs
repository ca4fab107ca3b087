//! Persisted per-user progression state.
//!
//! A profile bundles the user's progression (XP and level), running game
//! statistics, and the unlocked-achievement record. It is loaded fresh at
//! the start of each invocation, mutated in memory, and written back
//! atomically by [`store::ProfileStore`].

pub mod store;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Serialize `Option<NaiveDate>` as `YYYY-MM-DD`, with `1970-01-01`
/// standing in for "no prior event".
///
/// The sentinel keeps the on-disk format compatible with profiles written
/// by older builds while the in-memory type stays an honest `Option`.
pub(crate) mod sentinel_date {
    use chrono::NaiveDate;
    use serde::{Deserialize, Deserializer, Serializer};

    pub(crate) const NEVER: &str = "1970-01-01";

    pub fn serialize<S: Serializer>(
        date: &Option<NaiveDate>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        match date {
            Some(d) => serializer.serialize_str(&d.format("%Y-%m-%d").to_string()),
            None => serializer.serialize_str(NEVER),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<NaiveDate>, D::Error> {
        let text = String::deserialize(deserializer)?;
        if text == NEVER {
            return Ok(None);
        }
        NaiveDate::parse_from_str(&text, "%Y-%m-%d")
            .map(Some)
            .map_err(serde::de::Error::custom)
    }
}

/// Identity the profile belongs to.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserConfig {
    #[serde(rename = "userEmail")]
    pub user_email: Option<String>,
}

/// Experience points and the level derived from them.
///
/// `level` is always re-derived from `xp` on every XP change; the two are
/// stored together only so display never needs a table lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProgress {
    pub xp: u64,
    pub level: u32,
}

impl Default for UserProgress {
    fn default() -> Self {
        Self { xp: 0, level: 1 }
    }
}

/// Per-user counters driving achievement checks and streak bonuses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameStatistics {
    pub total_commits: u64,
    pub total_pushes: u64,
    #[serde(with = "sentinel_date")]
    pub last_commit_date: Option<NaiveDate>,
    #[serde(with = "sentinel_date")]
    pub last_push_date: Option<NaiveDate>,
    pub consecutive_commit_days: u32,
    pub branches_created: u64,
    pub merges_completed: u64,
    pub log_views: u64,
    pub stash_uses: u64,
    pub tags_created: u64,
    pub reverts_used: u64,
    /// Commit counts by local hour of day, index 0 = midnight-1am.
    pub commits_by_hour: [u32; 24],
    pub files_added: u64,
    pub files_deleted: u64,
}

impl Default for GameStatistics {
    fn default() -> Self {
        Self {
            total_commits: 0,
            total_pushes: 0,
            last_commit_date: None,
            last_push_date: None,
            consecutive_commit_days: 0,
            branches_created: 0,
            merges_completed: 0,
            log_views: 0,
            stash_uses: 0,
            tags_created: 0,
            reverts_used: 0,
            commits_by_hour: [0; 24],
            files_added: 0,
            files_deleted: 0,
        }
    }
}

/// One user's complete persisted state.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct UserProfile {
    pub config: UserConfig,
    pub user: UserProgress,
    /// Achievement id -> unlock date. Membership is idempotent: once
    /// present an id is never re-evaluated or overwritten.
    pub achievements_unlocked: BTreeMap<String, NaiveDate>,
    pub stats: GameStatistics,
}

impl UserProfile {
    /// A zero-valued profile for the given identity.
    #[must_use]
    pub fn new(email: Option<String>) -> Self {
        Self {
            config: UserConfig { user_email: email },
            ..Self::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_profile_is_zero_valued() {
        let profile = UserProfile::new(Some("dev@example.com".to_string()));
        assert_eq!(profile.user.xp, 0);
        assert_eq!(profile.user.level, 1);
        assert_eq!(profile.stats.total_commits, 0);
        assert_eq!(profile.stats.consecutive_commit_days, 0);
        assert_eq!(profile.stats.commits_by_hour, [0; 24]);
        assert!(profile.stats.last_commit_date.is_none());
        assert!(profile.achievements_unlocked.is_empty());
    }

    #[test]
    fn test_sentinel_date_round_trip() {
        let profile = UserProfile::new(None);
        let json = serde_json::to_string(&profile).expect("serialize");
        assert!(json.contains(r#""last_commit_date":"1970-01-01""#));

        let back: UserProfile = serde_json::from_str(&json).expect("deserialize");
        assert!(back.stats.last_commit_date.is_none());
        assert!(back.stats.last_push_date.is_none());
    }

    #[test]
    fn test_real_dates_serialize_as_iso() {
        let mut profile = UserProfile::new(None);
        profile.stats.last_commit_date = NaiveDate::from_ymd_opt(2026, 8, 5);

        let json = serde_json::to_string(&profile).expect("serialize");
        assert!(json.contains(r#""last_commit_date":"2026-08-05""#));

        let back: UserProfile = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(back.stats.last_commit_date, profile.stats.last_commit_date);
    }

    #[test]
    fn test_wire_format_field_names() {
        let mut profile = UserProfile::new(Some("dev@example.com".to_string()));
        profile.user.xp = 120;
        profile
            .achievements_unlocked
            .insert("commit_1".to_string(), NaiveDate::from_ymd_opt(2026, 8, 1).expect("date"));

        let value = serde_json::to_value(&profile).expect("serialize");
        assert_eq!(value["config"]["userEmail"], "dev@example.com");
        assert_eq!(value["user"]["xp"], 120);
        assert_eq!(value["achievements_unlocked"]["commit_1"], "2026-08-01");
        assert_eq!(value["stats"]["total_commits"], 0);
        assert_eq!(
            value["stats"]["commits_by_hour"]
                .as_array()
                .map(|a| a.len()),
            Some(24)
        );
    }

    #[test]
    fn test_missing_fields_fall_back_to_defaults() {
        // Profiles written by older builds may lack newer counters.
        let json = r#"{"config": {"userEmail": "dev@example.com"}, "user": {"xp": 10, "level": 1}}"#;
        let profile: UserProfile = serde_json::from_str(json).expect("deserialize");
        assert_eq!(profile.user.xp, 10);
        assert_eq!(profile.stats.files_added, 0);
        assert!(profile.stats.last_push_date.is_none());
    }
}

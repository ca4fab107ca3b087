//! Parsing of git diff output into structured change counts.
//!
//! Two textual inputs feed the parser: the shortstat-style summary line
//! (`"2 files changed, 15 insertions(+), 3 deletions(-)"`) and the
//! `--name-status` listing (one `<code>\t<path>` line per changed file).

use regex::Regex;
use serde::{Deserialize, Serialize};

/// Change statistics for a single commit, derived from diff output.
///
/// Never persisted; computed fresh for each commit and consumed by the
/// progression engine within the same invocation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiffStats {
    /// Sum of every integer in the summary line. This deliberately adds the
    /// file count to the insertion and deletion counts; the size bonus
    /// formula is defined over this combined figure.
    pub total_changes: u64,

    /// The integer immediately preceding the word "deletions", 0 if absent.
    pub deletions: u64,

    /// Count of name-status lines with status code `A`.
    pub files_added: u64,

    /// Count of name-status lines with status code `D`.
    pub files_deleted: u64,
}

impl DiffStats {
    /// Parse diff summary text and name-status text into change counts.
    ///
    /// Both inputs may be empty (a first commit has no parent to diff
    /// against); that is a valid "no prior diff" result, not an error, and
    /// yields all-zero stats.
    #[must_use]
    pub fn parse(summary: &str, name_status: &str) -> Self {
        let mut total_changes = 0;
        if let Ok(re) = Regex::new(r"\d+") {
            total_changes = re
                .find_iter(summary)
                .filter_map(|m| m.as_str().parse::<u64>().ok())
                .sum();
        }

        let mut deletions = 0;
        if let Ok(re) = Regex::new(r"(\d+)\s+deletions") {
            if let Some(caps) = re.captures(summary) {
                deletions = caps[1].parse::<u64>().unwrap_or(0);
            }
        }

        let mut files_added = 0;
        let mut files_deleted = 0;
        for line in name_status.lines() {
            if line.starts_with("A\t") {
                files_added += 1;
            } else if line.starts_with("D\t") {
                files_deleted += 1;
            }
        }

        Self {
            total_changes,
            deletions,
            files_added,
            files_deleted,
        }
    }
}

//! Profile persistence: one JSON document per user under `~/.gitxp`.
//!
//! Writes are atomic (temp file + rename). There is no cross-process
//! locking: two concurrent invocations for the same user are a last-writer-
//! wins race, an accepted limitation of the wrapper.

use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use sha2::{Digest, Sha256};
use tracing::{debug, warn};

use super::UserProfile;
use crate::error::{GitxpError, Result};

/// Temporary file suffix for atomic writes.
const TMP_SUFFIX: &str = ".tmp";

/// File-based profile storage keyed by a hash of the identity email.
#[derive(Debug, Clone)]
pub struct ProfileStore {
    dir: PathBuf,
}

impl ProfileStore {
    /// Create a store rooted at the given directory.
    #[must_use]
    pub fn new(dir: impl AsRef<Path>) -> Self {
        Self {
            dir: dir.as_ref().to_path_buf(),
        }
    }

    /// The default store location, `~/.gitxp`.
    pub fn default_location() -> Result<Self> {
        let home = dirs::home_dir()
            .ok_or_else(|| GitxpError::profile("Cannot determine home directory"))?;
        Ok(Self::new(home.join(".gitxp")))
    }

    /// Path of the profile file for an email identity.
    ///
    /// The file name is the hex SHA-256 of the email, so the identity never
    /// appears in the filesystem.
    #[must_use]
    pub fn profile_path(&self, email: &str) -> PathBuf {
        let digest = Sha256::digest(email.as_bytes());
        let mut name = String::with_capacity(digest.len() * 2 + 5);
        for byte in digest {
            name.push_str(&format!("{byte:02x}"));
        }
        name.push_str(".json");
        self.dir.join(name)
    }

    /// Load the profile for an identity.
    ///
    /// A missing file materializes a fresh default profile, which is saved
    /// immediately. A malformed file is discarded with a warning and
    /// replaced the same way. This never fails with a parse error.
    pub fn load(&self, email: &str) -> Result<UserProfile> {
        let path = self.profile_path(email);

        if !path.exists() {
            let profile = UserProfile::new(Some(email.to_string()));
            self.save(&profile)?;
            return Ok(profile);
        }

        let contents = fs::read_to_string(&path)?;
        match serde_json::from_str::<UserProfile>(&contents) {
            Ok(mut profile) => {
                if profile.config.user_email.is_none() {
                    profile.config.user_email = Some(email.to_string());
                }
                Ok(profile)
            }
            Err(e) => {
                warn!(
                    "Corrupted profile at {}: {}. Regenerating a fresh profile.",
                    path.display(),
                    e
                );
                let profile = UserProfile::new(Some(email.to_string()));
                self.save(&profile)?;
                Ok(profile)
            }
        }
    }

    /// Save a profile atomically.
    ///
    /// A profile without an identity is not persisted; there is no file to
    /// key it by.
    pub fn save(&self, profile: &UserProfile) -> Result<()> {
        let Some(email) = profile.config.user_email.as_deref() else {
            debug!("No identity on profile; skipping save");
            return Ok(());
        };

        fs::create_dir_all(&self.dir)?;

        let path = self.profile_path(email);
        let tmp_path = path.with_extension(format!("json{TMP_SUFFIX}"));
        let json = serde_json::to_string_pretty(profile)?;

        let mut tmp_file = File::create(&tmp_path)?;
        tmp_file.write_all(json.as_bytes())?;
        tmp_file.sync_all()?;

        fs::rename(&tmp_path, &path)?;

        Ok(())
    }

    /// Delete the profile for an identity. Succeeds if it never existed.
    pub fn clear(&self, email: &str) -> Result<()> {
        let path = self.profile_path(email);
        if path.exists() {
            fs::remove_file(&path)?;
        }
        Ok(())
    }

    /// Whether a profile file exists for the identity.
    #[must_use]
    pub fn exists(&self, email: &str) -> bool {
        self.profile_path(email).exists()
    }
}

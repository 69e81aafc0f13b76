use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::errors::{Result, VaultError};
use crate::vault::CorruptPolicy;

/// Server-level configuration, loaded from `playervaults.toml`.
///
/// Every field has a sensible default so PlayerVaults works out-of-the-box
/// without any config file at all.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Namespace prefixed to every key written into a player's record.
    #[serde(default = "default_namespace")]
    pub namespace: String,

    /// Grants of the form `<grant_prefix>.amount.<N>` raise the page limit.
    #[serde(default = "default_grant_prefix")]
    pub grant_prefix: String,

    /// Grant required to open another player's vault.
    #[serde(default = "default_admin_grant")]
    pub admin_grant: String,

    /// Slots per page (a multiple of 9, at most 54).
    #[serde(default = "default_capacity")]
    pub capacity: usize,

    /// Title shown on an open page, followed by the page number.
    #[serde(default = "default_title_prefix")]
    pub title_prefix: String,

    /// What to do with stored pages that can't be decoded cleanly.
    #[serde(default)]
    pub on_corrupt: CorruptPolicy,

    /// Directory (relative to the server root) holding player records.
    #[serde(default = "default_data_dir")]
    pub data_dir: String,

    /// Roster file (relative to the server root).
    #[serde(default = "default_roster_file")]
    pub roster_file: String,

    /// Log filter used when `PLAYERVAULTS_LOG` is not set.
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

// ── Serde default helpers ────────────────────────────────────────────

fn default_namespace() -> String {
    "playervaults".to_string()
}

fn default_grant_prefix() -> String {
    "vault".to_string()
}

fn default_admin_grant() -> String {
    "vault.admin".to_string()
}

fn default_capacity() -> usize {
    54 // six rows of nine
}

fn default_title_prefix() -> String {
    "Vault - Page ".to_string()
}

fn default_data_dir() -> String {
    "playerdata".to_string()
}

fn default_roster_file() -> String {
    "players.toml".to_string()
}

fn default_log_level() -> String {
    "warn".to_string()
}

// ── Implementation ───────────────────────────────────────────────────

impl Default for Settings {
    fn default() -> Self {
        Self {
            namespace: default_namespace(),
            grant_prefix: default_grant_prefix(),
            admin_grant: default_admin_grant(),
            capacity: default_capacity(),
            title_prefix: default_title_prefix(),
            on_corrupt: CorruptPolicy::default(),
            data_dir: default_data_dir(),
            roster_file: default_roster_file(),
            log_level: default_log_level(),
        }
    }
}

impl Settings {
    /// Name of the config file we look for in the server root.
    const FILE_NAME: &'static str = "playervaults.toml";

    /// Load settings from `<root>/playervaults.toml`.
    ///
    /// If the file does not exist, sensible defaults are returned.
    /// If the file exists but cannot be parsed or is invalid, an error is returned.
    pub fn load(root: &Path) -> Result<Self> {
        let config_path = root.join(Self::FILE_NAME);

        if !config_path.exists() {
            return Ok(Self::default());
        }

        let contents = std::fs::read_to_string(&config_path)?;

        let settings: Settings = toml::from_str(&contents).map_err(|e| {
            VaultError::Config(format!("Failed to parse {}: {e}", config_path.display()))
        })?;

        settings.validate()?;
        Ok(settings)
    }

    /// Check values serde can't check on its own.
    pub fn validate(&self) -> Result<()> {
        if self.capacity == 0 || self.capacity > 54 || self.capacity % 9 != 0 {
            return Err(VaultError::Config(format!(
                "capacity must be a multiple of 9 between 9 and 54, got {}",
                self.capacity
            )));
        }
        if self.namespace.is_empty()
            || !self
                .namespace
                .bytes()
                .all(|b| b.is_ascii_lowercase() || b.is_ascii_digit() || b == b'_' || b == b'-')
        {
            return Err(VaultError::Config(format!(
                "namespace '{}' is invalid; only lowercase letters, digits, underscores, and hyphens are allowed",
                self.namespace
            )));
        }
        if self.grant_prefix.is_empty() {
            return Err(VaultError::Config("grant_prefix cannot be empty".into()));
        }
        Ok(())
    }

    /// Directory holding per-player record files.
    ///
    /// Example: `root/playerdata`
    pub fn data_path(&self, root: &Path) -> PathBuf {
        root.join(&self.data_dir)
    }

    /// Full path of the roster file.
    pub fn roster_path(&self, root: &Path) -> PathBuf {
        root.join(&self.roster_file)
    }
}

// ── Tests ────────────────────────────────────────────────────────────

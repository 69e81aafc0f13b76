//! Player identity and the host-side lookups the vault core consumes.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::errors::{Result, VaultError};

/// Stable, opaque identifier of a player (typically a UUID string).
///
/// Roots the player's durable record; never reused across players.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlayerId(String);

impl PlayerId {
    /// Wrap an identifier after checking it is safe to use as a record name.
    pub fn new(id: impl Into<String>) -> Result<Self> {
        let id = id.into();
        validate_player_id(&id)?;
        Ok(Self(id))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A player as the host directory knows them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlayerProfile {
    pub id: PlayerId,
    pub name: String,
}

/// Source of a player's effective capability grants.
///
/// Queried once per limit resolution; implementations must not cache,
/// since grants change at runtime through external administration.
pub trait GrantSource: Send + Sync {
    /// All grant strings currently effective for `player`, in no particular order.
    fn effective_grants(&self, player: &PlayerId) -> Vec<String>;
}

/// Lookup of players by display name, used by the admin command.
pub trait PlayerDirectory: Send + Sync {
    /// Find a player whose name matches `name` exactly, ignoring ASCII case.
    fn find_exact(&self, name: &str) -> Option<PlayerProfile>;

    /// Display name for `id`, if the directory knows it.
    fn name_of(&self, id: &PlayerId) -> Option<String>;
}

/// Validate that a player id is safe to use as a file name.
///
/// Allowed: ASCII letters, digits, hyphens, underscores.
/// Must be non-empty and at most 64 characters.
pub fn validate_player_id(id: &str) -> Result<()> {
    if id.is_empty() {
        return Err(VaultError::InvalidInput("player id cannot be empty".into()));
    }
    if id.len() > 64 {
        return Err(VaultError::InvalidInput(
            "player id cannot exceed 64 characters".into(),
        ));
    }
    if !id
        .bytes()
        .all(|b| b.is_ascii_alphanumeric() || b == b'-' || b == b'_')
    {
        return Err(VaultError::InvalidInput(format!(
            "player id '{id}' contains invalid characters; only ASCII letters, digits, hyphens, and underscores are allowed"
        )));
    }
    Ok(())
}

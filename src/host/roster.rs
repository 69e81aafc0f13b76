//! Player roster loaded from `players.toml`.
//!
//! Stands in for the host platform's player list and permission system:
//! each entry gives a player's name, stable id and granted capabilities.
//!
//! ```toml
//! [[player]]
//! name = "Steve"
//! id = "8667ba71-b85a-4004-af54-457a9734eed7"
//! grants = ["vault.amount.3"]
//! ```

use std::collections::HashSet;
use std::path::Path;

use serde::Deserialize;

use crate::errors::{Result, VaultError};
use crate::player::{GrantSource, PlayerDirectory, PlayerId, PlayerProfile};

/// One roster entry.
#[derive(Debug, Clone, Deserialize)]
pub struct RosterEntry {
    pub name: String,
    pub id: PlayerId,
    #[serde(default)]
    pub grants: Vec<String>,
}

#[derive(Debug, Default, Deserialize)]
struct RosterFile {
    #[serde(default, rename = "player")]
    players: Vec<RosterEntry>,
}

/// Known players and their grants.
#[derive(Debug, Clone, Default)]
pub struct Roster {
    players: Vec<RosterEntry>,
}

impl Roster {
    /// Load the roster from `path`.  A missing file is an empty roster.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let contents = std::fs::read_to_string(path)?;
        Self::parse(&contents)
            .map_err(|e| VaultError::Config(format!("Failed to parse {}: {e}", path.display())))
    }

    /// Parse roster TOML, rejecting duplicate ids and names.
    pub fn parse(contents: &str) -> std::result::Result<Self, String> {
        let file: RosterFile = toml::from_str(contents).map_err(|e| e.to_string())?;

        let mut ids = HashSet::new();
        let mut names = HashSet::new();
        for p in &file.players {
            PlayerId::new(p.id.as_str()).map_err(|e| e.to_string())?;
            if !ids.insert(p.id.clone()) {
                return Err(format!("duplicate player id '{}'", p.id));
            }
            if !names.insert(p.name.to_ascii_lowercase()) {
                return Err(format!("duplicate player name '{}'", p.name));
            }
        }

        Ok(Self {
            players: file.players,
        })
    }

    pub fn from_entries(players: Vec<RosterEntry>) -> Self {
        Self { players }
    }

    pub fn entries(&self) -> &[RosterEntry] {
        &self.players
    }

    /// Resolve a name or id to a profile.
    pub fn lookup(&self, name_or_id: &str) -> Option<PlayerProfile> {
        self.find_exact(name_or_id).or_else(|| {
            self.players
                .iter()
                .find(|p| p.id.as_str() == name_or_id)
                .map(profile)
        })
    }
}

fn profile(entry: &RosterEntry) -> PlayerProfile {
    PlayerProfile {
        id: entry.id.clone(),
        name: entry.name.clone(),
    }
}

impl GrantSource for Roster {
    fn effective_grants(&self, player: &PlayerId) -> Vec<String> {
        self.players
            .iter()
            .find(|p| &p.id == player)
            .map(|p| p.grants.clone())
            .unwrap_or_default()
    }
}

impl PlayerDirectory for Roster {
    fn find_exact(&self, name: &str) -> Option<PlayerProfile> {
        self.players
            .iter()
            .find(|p| p.name.eq_ignore_ascii_case(name))
            .map(profile)
    }

    fn name_of(&self, id: &PlayerId) -> Option<String> {
        self.players.iter().find(|p| &p.id == id).map(|p| p.name.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    const SAMPLE: &str = r#"
[[player]]
name = "Steve"
id = "steve-1"
grants = ["vault.amount.3", "essentials.home"]

[[player]]
name = "Alex"
id = "alex-2"
"#;

    #[test]
    fn parses_players_and_grants() {
        let roster = Roster::parse(SAMPLE).unwrap();
        assert_eq!(roster.entries().len(), 2);
        let steve = PlayerId::new("steve-1").unwrap();
        assert_eq!(roster.effective_grants(&steve).len(), 2);
        let alex = PlayerId::new("alex-2").unwrap();
        assert!(roster.effective_grants(&alex).is_empty());
    }

    #[test]
    fn find_exact_ignores_case_but_not_prefixes() {
        let roster = Roster::parse(SAMPLE).unwrap();
        assert_eq!(roster.find_exact("steve").unwrap().name, "Steve");
        assert!(roster.find_exact("Ste").is_none());
    }

    #[test]
    fn lookup_falls_back_to_id() {
        let roster = Roster::parse(SAMPLE).unwrap();
        assert_eq!(roster.lookup("alex-2").unwrap().name, "Alex");
        assert!(roster.lookup("nobody").is_none());
    }

    #[test]
    fn name_of_resolves_known_ids() {
        let roster = Roster::parse(SAMPLE).unwrap();
        assert_eq!(roster.name_of(&PlayerId::new("alex-2").unwrap()).as_deref(), Some("Alex"));
        assert!(roster.name_of(&PlayerId::new("ghost").unwrap()).is_none());
    }

    #[test]
    fn unknown_player_has_no_grants() {
        let roster = Roster::parse(SAMPLE).unwrap();
        let ghost = PlayerId::new("ghost").unwrap();
        assert!(roster.effective_grants(&ghost).is_empty());
    }

    #[test]
    fn rejects_duplicate_names() {
        let dup = "[[player]]\nname = \"A\"\nid = \"a1\"\n[[player]]\nname = \"a\"\nid = \"a2\"\n";
        assert!(Roster::parse(dup).unwrap_err().contains("duplicate player name"));
    }

    #[test]
    fn rejects_unsafe_ids() {
        let bad = "[[player]]\nname = \"A\"\nid = \"../x\"\n";
        assert!(Roster::parse(bad).is_err());
    }

    #[test]
    fn missing_file_is_empty_roster() {
        let tmp = TempDir::new().unwrap();
        let roster = Roster::load(&tmp.path().join("players.toml")).unwrap();
        assert!(roster.entries().is_empty());
    }

    #[test]
    fn load_reports_parse_errors() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("players.toml");
        fs::write(&path, "[[player]\nbroken").unwrap();
        assert!(matches!(Roster::load(&path), Err(VaultError::Config(_))));
    }
}

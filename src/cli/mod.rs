//! CLI module: Clap argument parser, output helpers, and command implementations.

pub mod commands;
pub mod item_parser;
pub mod output;

use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;

use crate::config::Settings;
use crate::dispatch::CommandSurface;
use crate::errors::{Result, VaultError};
use crate::host::{FileRecordStore, Roster};
use crate::player::{PlayerDirectory, PlayerId, PlayerProfile};
use crate::session::VaultSessions;

/// PlayerVaults CLI: paginated, permission-gated player vaults.
#[derive(Parser)]
#[command(
    name = "playervaults",
    about = "Paginated, permission-gated player vaults",
    version
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Server root holding playervaults.toml, players.toml and player data
    #[arg(long, default_value = ".", global = true, env = "PLAYERVAULTS_ROOT")]
    pub root: PathBuf,

    /// Log filter when PLAYERVAULTS_LOG is unset (default: from playervaults.toml)
    #[arg(long, global = true)]
    pub log_level: Option<String>,
}

/// All available subcommands.
#[derive(clap::Subcommand)]
pub enum Commands {
    /// Open one of your own vault pages (like /vault [page])
    Vault {
        /// Player opening their vault (name or id)
        player: String,
        /// Page number (default: 1)
        #[arg(allow_negative_numbers = true)]
        page: Option<String>,
        #[command(flatten)]
        edits: EditArgs,
    },

    /// Open another player's vault page (like /pvault <player> [page])
    Pvault {
        /// Admin performing the open (name or id)
        admin: String,
        /// Player whose vault to open (exact name)
        target: String,
        /// Page number (default: 1)
        #[arg(allow_negative_numbers = true)]
        page: Option<String>,
        #[command(flatten)]
        edits: EditArgs,
    },

    /// Show how many vault pages a player may open
    Limit {
        /// Player name or id
        player: String,
    },

    /// List the vault pages a player has saved
    Pages {
        /// Player name or id
        player: String,
    },

    /// View the access audit log
    #[cfg(feature = "audit-log")]
    Audit {
        /// Number of entries to show (default: 50)
        #[arg(long, default_value = "50")]
        last: usize,
        /// Show entries since a duration ago (e.g. 7d, 24h, 30m)
        #[arg(long)]
        since: Option<String>,
    },
}

/// Changes made to a page while it is open; applied before it closes.
#[derive(clap::Args, Debug, Default, Clone)]
pub struct EditArgs {
    /// Put an item into a slot: SLOT=MATERIAL[*AMOUNT][;key=value...]
    #[arg(long = "put", value_name = "SLOT=ITEM")]
    pub put: Vec<String>,

    /// Empty a slot
    #[arg(long = "clear", value_name = "SLOT")]
    pub clear: Vec<String>,
}

// ---------------------------------------------------------------------------
// Shared helpers used by multiple commands
// ---------------------------------------------------------------------------

/// Everything a command needs, wired from the server root.
pub struct Host {
    pub root: PathBuf,
    pub settings: Settings,
    pub roster: Arc<Roster>,
    pub surface: CommandSurface,
}

impl Host {
    /// Load the roster and player data for already-loaded `settings` and
    /// build the command surface.
    pub fn with_settings(cli: &Cli, settings: Settings) -> Result<Self> {
        let roster = Arc::new(Roster::load(&settings.roster_path(&cli.root))?);
        let records = Arc::new(FileRecordStore::open(&settings.data_path(&cli.root))?);

        let sessions = VaultSessions::from_settings(&settings, records, roster.clone())?;
        let surface = CommandSurface::new(Arc::new(sessions), roster.clone());

        Ok(Self {
            root: cli.root.clone(),
            settings,
            roster,
            surface,
        })
    }

    /// Resolve a command-line player argument.
    ///
    /// Tries the roster by name, then by id; an unknown but well-formed id
    /// is accepted as a player with no grants.
    pub fn player(&self, arg: &str) -> Result<PlayerProfile> {
        if let Some(profile) = self.roster.lookup(arg) {
            return Ok(profile);
        }
        let id = PlayerId::new(arg).map_err(|_| VaultError::PlayerNotFound(arg.to_string()))?;
        Ok(PlayerProfile {
            id,
            name: arg.to_string(),
        })
    }

    /// Display name for a player id, falling back to the id itself.
    pub fn display_name(&self, id: &PlayerId) -> String {
        self.roster.name_of(id).unwrap_or_else(|| id.to_string())
    }

    /// Directory holding player records and the audit database.
    pub fn data_dir(&self) -> PathBuf {
        self.settings.data_path(&self.root)
    }

    /// Record an access event; never fails the calling command.
    pub fn audit(&self, op: &str, actor: &str, target: &str, page: Option<u32>, details: Option<&str>) {
        #[cfg(feature = "audit-log")]
        {
            if let Some(audit) = crate::audit::AuditLog::open(&self.data_dir()) {
                audit.log(op, actor, target, page, details);
            }
        }

        #[cfg(not(feature = "audit-log"))]
        let _ = (op, actor, target, page, details);
    }
}

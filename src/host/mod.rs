//! Reference host collaborators.
//!
//! A real server supplies its own record storage, player list and
//! permissions.  These implementations let the crate run standalone:
//! - `FileRecordStore`: per-player JSON record files (`file`)
//! - `MemoryRecordStore`: in-process records for tests (`memory`)
//! - `Roster`: players and grants from `players.toml` (`roster`)

pub mod file;
pub mod memory;
pub mod roster;

pub use file::FileRecordStore;
pub use memory::MemoryRecordStore;
pub use roster::{Roster, RosterEntry};

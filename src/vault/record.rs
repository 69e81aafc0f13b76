//! Durable per-player key-value record, provided by the host.

use crate::errors::Result;
use crate::player::PlayerId;

/// Key-value storage scoped to one player's persistent record.
///
/// Each `get`/`set` on a single key must be atomic.  Values are opaque
/// strings; keys arrive already namespaced by the caller, so data other
/// plugins keep in the same record is never touched.
pub trait RecordStore: Send + Sync {
    /// Read the value stored under `key`, or `None` if the key is absent.
    ///
    /// # Errors
    ///
    /// `VaultError::ReadFailed` if the underlying record cannot be read.
    fn get(&self, player: &PlayerId, key: &str) -> Result<Option<String>>;

    /// Store `value` under `key`, replacing any previous value.
    ///
    /// # Errors
    ///
    /// `VaultError::WriteFailed` if the value could not be made durable.
    fn set(&self, player: &PlayerId, key: &str, value: &str) -> Result<()>;

    /// Every key currently present in the player's record.
    fn keys(&self, player: &PlayerId) -> Result<Vec<String>>;
}

//! File-backed record store: one JSON object per player.
//!
//! Each player's record lives at `<dir>/<player_id>.json` and maps keys to
//! string values.  Writes go to a uniquely named temp file in the same
//! directory and are renamed over the target, so readers never see a
//! half-written record.  Read-modify-write of a record holds an exclusive
//! OS lock on `<dir>/.<player_id>.lock`, which serialises writers across
//! store instances and processes sharing the directory.

use std::collections::BTreeMap;
use std::fs::{self, File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use fs4::fs_std::FileExt;
use tempfile::Builder;

use crate::errors::{Result, VaultError};
use crate::player::PlayerId;
use crate::vault::RecordStore;

type Record = BTreeMap<String, String>;

/// `RecordStore` persisting each player's record as a JSON file.
pub struct FileRecordStore {
    dir: PathBuf,
}

/// Exclusive lock on one player's record; released when dropped.
struct RecordLock {
    _file: File,
}

impl FileRecordStore {
    /// Use `dir` for record files, creating it if needed.
    pub fn open(dir: &Path) -> Result<Self> {
        fs::create_dir_all(dir)?;
        Ok(Self {
            dir: dir.to_path_buf(),
        })
    }

    /// Path of the record file for `player`.
    pub fn record_path(&self, player: &PlayerId) -> PathBuf {
        self.dir.join(format!("{player}.json"))
    }

    /// Path of the lock file guarding `player`'s record.
    pub fn lock_path(&self, player: &PlayerId) -> PathBuf {
        self.dir.join(format!(".{player}.lock"))
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Block until this process holds the player's record lock.
    fn lock_record(&self, player: &PlayerId) -> Result<RecordLock> {
        let path = self.lock_path(player);
        let fail = |e: std::io::Error| VaultError::WriteFailed(format!("{}: {e}", path.display()));

        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(false)
            .open(&path)
            .map_err(fail)?;
        FileExt::lock_exclusive(&file).map_err(fail)?;

        Ok(RecordLock { _file: file })
    }

    fn read_record(&self, player: &PlayerId) -> Result<Record> {
        let path = self.record_path(player);
        if !path.exists() {
            return Ok(Record::new());
        }

        let data = fs::read(&path)
            .map_err(|e| VaultError::ReadFailed(format!("{}: {e}", path.display())))?;
        serde_json::from_slice(&data)
            .map_err(|e| VaultError::ReadFailed(format!("{}: {e}", path.display())))
    }

    fn write_record(&self, player: &PlayerId, record: &Record) -> Result<()> {
        let path = self.record_path(player);
        let buf = serde_json::to_vec_pretty(record)
            .map_err(|e| VaultError::Serialization(format!("record: {e}")))?;

        let fail = |e: std::io::Error| VaultError::WriteFailed(format!("{}: {e}", path.display()));

        // Created owner-only (0600 on unix).
        let mut tmp = Builder::new()
            .prefix(&format!(".{player}."))
            .suffix(".tmp")
            .tempfile_in(&self.dir)
            .map_err(fail)?;
        tmp.write_all(&buf).map_err(fail)?;
        tmp.as_file().sync_all().map_err(fail)?;

        tmp.persist(&path).map_err(|e| fail(e.error))?;
        Ok(())
    }
}

impl RecordStore for FileRecordStore {
    fn get(&self, player: &PlayerId, key: &str) -> Result<Option<String>> {
        Ok(self.read_record(player)?.remove(key))
    }

    fn set(&self, player: &PlayerId, key: &str, value: &str) -> Result<()> {
        let _lock = self.lock_record(player)?;
        let mut record = self.read_record(player)?;
        record.insert(key.to_string(), value.to_string());
        self.write_record(player, &record)
    }

    fn keys(&self, player: &PlayerId) -> Result<Vec<String>> {
        Ok(self.read_record(player)?.into_keys().collect())
    }
}

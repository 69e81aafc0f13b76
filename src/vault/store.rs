//! High-level vault page operations used by sessions and commands.
//!
//! `VaultStore` ties the key deriver, the slot codec and the host's
//! durable record together so the rest of the crate can work with
//! `store.save(&player, page, &slots)` and `store.load(&player, page)`.

use std::sync::Arc;

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::errors::{Result, VaultError};
use crate::player::PlayerId;

use super::codec::SlotCodec;
use super::key::{PageNumber, StorageKey};
use super::record::RecordStore;
use super::slot::{Slot, SlotArray};

/// What `load` does with a stored page it cannot read back cleanly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CorruptPolicy {
    /// Present an empty page (undecodable blob) or fit the slots to capacity
    /// (wrong slot count), logging a warning.  The stored value is left as is.
    #[default]
    Degrade,

    /// Fail the load with `VaultError::Corrupt`.
    Strict,
}

/// The vault page store.
pub struct VaultStore {
    /// Host-provided per-player durable record.
    records: Arc<dyn RecordStore>,

    /// Opaque slot encoding.
    codec: Arc<dyn SlotCodec>,

    /// Prefix isolating vault keys from other data in the record.
    namespace: String,

    /// Slots per page.
    capacity: usize,

    on_corrupt: CorruptPolicy,
}

impl VaultStore {
    pub fn new(
        records: Arc<dyn RecordStore>,
        codec: Arc<dyn SlotCodec>,
        namespace: impl Into<String>,
        capacity: usize,
    ) -> Self {
        Self {
            records,
            codec,
            namespace: namespace.into(),
            capacity,
            on_corrupt: CorruptPolicy::default(),
        }
    }

    /// Replace the corruption policy (default: [`CorruptPolicy::Degrade`]).
    pub fn with_corrupt_policy(mut self, policy: CorruptPolicy) -> Self {
        self.on_corrupt = policy;
        self
    }

    // ------------------------------------------------------------------
    // Page operations
    // ------------------------------------------------------------------

    /// Encode `slots` and write them as the player's copy of `page`.
    ///
    /// Overwrites whatever was stored for that page before.  Saving the
    /// same slots twice stores the same value.
    pub fn save(&self, player: &PlayerId, page: PageNumber, slots: &SlotArray) -> Result<()> {
        if slots.len() != self.capacity {
            return Err(VaultError::InvalidInput(format!(
                "page has {} slots, vault capacity is {}",
                slots.len(),
                self.capacity
            )));
        }

        let bytes = self.codec.encode(slots.as_slice())?;
        let encoded = BASE64.encode(bytes);

        self.records
            .set(player, &self.record_key(page), &encoded)?;

        info!(player = %player, page = %page, "saved vault page");
        Ok(())
    }

    /// Read the player's copy of `page`.
    ///
    /// A page that was never saved loads as `capacity` empty slots.  The
    /// result always holds exactly `capacity` slots.
    pub fn load(&self, player: &PlayerId, page: PageNumber) -> Result<SlotArray> {
        self.load_with(player, page, self.on_corrupt)
    }

    /// Like [`VaultStore::load`] but any damage is `VaultError::Corrupt`,
    /// whatever the configured policy.  Used to report unreadable pages.
    pub fn load_checked(&self, player: &PlayerId, page: PageNumber) -> Result<SlotArray> {
        self.load_with(player, page, CorruptPolicy::Strict)
    }

    fn load_with(
        &self,
        player: &PlayerId,
        page: PageNumber,
        policy: CorruptPolicy,
    ) -> Result<SlotArray> {
        let encoded = match self.records.get(player, &self.record_key(page))? {
            Some(v) if !v.is_empty() => v,
            _ => {
                debug!(player = %player, page = %page, "vault page never saved");
                return Ok(SlotArray::empty(self.capacity));
            }
        };

        let slots = match self.decode(&encoded) {
            Ok(slots) => slots,
            Err(e) => {
                return match policy {
                    CorruptPolicy::Strict => Err(e),
                    CorruptPolicy::Degrade => {
                        warn!(player = %player, page = %page, error = %e,
                            "stored vault page is unreadable, presenting it empty");
                        Ok(SlotArray::empty(self.capacity))
                    }
                };
            }
        };

        self.fit(player, page, slots, policy)
    }

    /// Pages the player has a stored value for, ascending.
    pub fn saved_pages(&self, player: &PlayerId) -> Result<Vec<PageNumber>> {
        let prefix = format!("{}:", self.namespace);
        let mut pages: Vec<PageNumber> = self
            .records
            .keys(player)?
            .iter()
            .filter_map(|k| k.strip_prefix(&prefix))
            .filter_map(StorageKey::page_of)
            .collect();

        pages.sort();
        pages.dedup();
        Ok(pages)
    }

    // ------------------------------------------------------------------
    // Accessors
    // ------------------------------------------------------------------

    /// Returns the number of slots per page.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Returns the namespace vault keys are stored under.
    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    // ------------------------------------------------------------------
    // Internals
    // ------------------------------------------------------------------

    /// Full record key for `page`, e.g. `playervaults:vault_page_3`.
    fn record_key(&self, page: PageNumber) -> String {
        format!("{}:{}", self.namespace, StorageKey::for_page(page))
    }

    fn decode(&self, encoded: &str) -> Result<Vec<Slot>> {
        let bytes = BASE64
            .decode(encoded.trim())
            .map_err(|e| VaultError::Corrupt(format!("invalid base64: {e}")))?;
        self.codec.decode(&bytes)
    }

    fn fit(
        &self,
        player: &PlayerId,
        page: PageNumber,
        slots: Vec<Slot>,
        policy: CorruptPolicy,
    ) -> Result<SlotArray> {
        let found = slots.len();
        if found == self.capacity {
            return Ok(SlotArray::fitted(slots, self.capacity));
        }

        match policy {
            CorruptPolicy::Strict => Err(VaultError::Corrupt(format!(
                "stored page holds {found} slots, expected {}",
                self.capacity
            ))),
            CorruptPolicy::Degrade => {
                warn!(player = %player, page = %page, found, expected = self.capacity,
                    "stored vault page has the wrong slot count, fitting it");
                Ok(SlotArray::fitted(slots, self.capacity))
            }
        }
    }
}

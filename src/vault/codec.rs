//! Slot codec: the byte encoding of one vault page.
//!
//! The vault store treats the codec as opaque.  `FramedJsonCodec` is the
//! reference implementation; its blob has this layout:
//!
//! ```text
//! [PVLT: 4 bytes][version: 1 byte][slot_count: 4 bytes LE][slots JSON][SHA-256: 32 bytes]
//! ```
//!
//! - **Magic** (`PVLT`): identifies the blob as a PlayerVaults page.
//! - **Version**: format version (currently `1`).
//! - **Slot count**: number of slots the JSON array holds.
//! - **Slots JSON**: serialized `Vec<Option<ItemStack>>`, `null` for empty.
//! - **SHA-256**: digest of the JSON bytes, catches truncated or damaged blobs.

use sha2::{Digest, Sha256};

use super::slot::Slot;
use crate::errors::{Result, VaultError};

/// Converts an ordered slot sequence to bytes and back, losslessly.
pub trait SlotCodec: Send + Sync {
    /// Encode `slots`, preserving order and empty positions.
    fn encode(&self, slots: &[Slot]) -> Result<Vec<u8>>;

    /// Decode bytes produced by [`SlotCodec::encode`].
    ///
    /// May return any number of slots; the caller fits the result to
    /// the page capacity.
    fn decode(&self, bytes: &[u8]) -> Result<Vec<Slot>>;
}

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Magic bytes at the start of every encoded page.
const MAGIC: &[u8; 4] = b"PVLT";

/// Current binary format version.
pub const CURRENT_VERSION: u8 = 1;

/// Size of the digest appended to the blob (SHA-256 = 32 bytes).
const DIGEST_LEN: usize = 32;

/// Fixed-size prefix: 4 (magic) + 1 (version) + 4 (slot_count).
const PREFIX_LEN: usize = 9;

// ---------------------------------------------------------------------------
// FramedJsonCodec
// ---------------------------------------------------------------------------

/// JSON slot list wrapped in a magic/version/count frame with a checksum.
#[derive(Debug, Clone, Copy, Default)]
pub struct FramedJsonCodec;

impl SlotCodec for FramedJsonCodec {
    fn encode(&self, slots: &[Slot]) -> Result<Vec<u8>> {
        let json = serde_json::to_vec(slots)
            .map_err(|e| VaultError::Serialization(format!("slots: {e}")))?;

        let count = u32::try_from(slots.len()).map_err(|_| {
            VaultError::Serialization(format!("slot count {} exceeds u32::MAX", slots.len()))
        })?;

        let mut buf = Vec::with_capacity(PREFIX_LEN + json.len() + DIGEST_LEN);
        buf.extend_from_slice(MAGIC); // 4 bytes
        buf.push(CURRENT_VERSION); // 1 byte
        buf.extend_from_slice(&count.to_le_bytes()); // 4 bytes LE
        buf.extend_from_slice(&json); // slots JSON
        buf.extend_from_slice(&digest(&json)); // 32 bytes

        Ok(buf)
    }

    fn decode(&self, data: &[u8]) -> Result<Vec<Slot>> {
        if data.len() < PREFIX_LEN + DIGEST_LEN {
            return Err(VaultError::Corrupt("blob too small to be a vault page".into()));
        }

        // --- Parse the fixed-size prefix ---

        if &data[0..4] != MAGIC {
            return Err(VaultError::Corrupt("missing PVLT magic bytes".into()));
        }

        let version = data[4];
        if version != CURRENT_VERSION {
            return Err(VaultError::Corrupt(format!(
                "unsupported version {version}, expected {CURRENT_VERSION}"
            )));
        }

        let count = u32::from_le_bytes(
            data[5..9]
                .try_into()
                .map_err(|_| VaultError::Corrupt("bad slot count".into()))?,
        );

        // --- Verify the checksum before trusting the JSON ---

        let json_end = data.len() - DIGEST_LEN;
        let json = &data[PREFIX_LEN..json_end];
        if digest(json).as_slice() != &data[json_end..] {
            return Err(VaultError::Corrupt("checksum mismatch".into()));
        }

        let slots: Vec<Slot> = serde_json::from_slice(json)
            .map_err(|e| VaultError::Corrupt(format!("slots JSON: {e}")))?;

        if usize::try_from(count).ok() != Some(slots.len()) {
            return Err(VaultError::Corrupt(format!(
                "frame declares {count} slots but holds {}",
                slots.len()
            )));
        }

        Ok(slots)
    }
}

fn digest(bytes: &[u8]) -> [u8; DIGEST_LEN] {
    Sha256::digest(bytes).into()
}

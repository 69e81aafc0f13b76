//! Vault module: paginated per-player page storage.
//!
//! This module provides:
//! - Page numbers and derived storage keys (`key`)
//! - `ItemStack` and the fixed-capacity `SlotArray` (`slot`)
//! - The `SlotCodec` trait and the framed JSON reference codec (`codec`)
//! - The host's durable per-player `RecordStore` trait (`record`)
//! - High-level `VaultStore` for saving and loading pages (`store`)

pub mod codec;
pub mod key;
pub mod record;
pub mod slot;
pub mod store;

// Re-export the most commonly used items.
pub use codec::{FramedJsonCodec, SlotCodec};
pub use key::{PageNumber, StorageKey};
pub use record::RecordStore;
pub use slot::{ItemStack, Slot, SlotArray};
pub use store::{CorruptPolicy, VaultStore};

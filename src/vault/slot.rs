//! Item records and the fixed-capacity slot array that holds them.
//!
//! The vault core never looks inside an `ItemStack`; only the codec and
//! the CLI front end do.  A page is always exactly `capacity` slots, with
//! empty positions kept in place so slot order round-trips.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// One item record occupying a slot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemStack {
    /// Item type identifier (e.g. "diamond_sword").
    pub material: String,

    /// Stack size.
    pub amount: u32,

    /// Free-form host metadata (display name, enchantments, ...).
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub meta: BTreeMap<String, String>,
}

impl ItemStack {
    pub fn new(material: impl Into<String>, amount: u32) -> Self {
        Self {
            material: material.into(),
            amount,
            meta: BTreeMap::new(),
        }
    }
}

impl fmt::Display for ItemStack {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.amount == 1 {
            write!(f, "{}", self.material)
        } else {
            write!(f, "{} x{}", self.material, self.amount)
        }
    }
}

/// A single storage position: empty or holding one item record.
pub type Slot = Option<ItemStack>;

/// Ordered sequence of exactly `capacity` slots.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlotArray {
    slots: Vec<Slot>,
}

impl SlotArray {
    /// An all-empty page of `capacity` slots.
    pub fn empty(capacity: usize) -> Self {
        Self {
            slots: vec![None; capacity],
        }
    }

    /// Fit decoded slots into `capacity`: copy at most `capacity`, pad the rest.
    pub fn fitted(mut slots: Vec<Slot>, capacity: usize) -> Self {
        slots.truncate(capacity);
        slots.resize(capacity, None);
        Self { slots }
    }

    /// Wrap slots that must already be exactly `capacity` long.
    pub fn exact(slots: Vec<Slot>, capacity: usize) -> Option<Self> {
        (slots.len() == capacity).then_some(Self { slots })
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.iter().all(Option::is_none)
    }

    pub fn get(&self, index: usize) -> Option<&ItemStack> {
        self.slots.get(index).and_then(Option::as_ref)
    }

    /// Replace the contents of slot `index`, returning what was there.
    ///
    /// Returns `None` without changing anything if `index` is out of range.
    pub fn set(&mut self, index: usize, item: Slot) -> Option<Slot> {
        let slot = self.slots.get_mut(index)?;
        Some(std::mem::replace(slot, item))
    }

    pub fn as_slice(&self) -> &[Slot] {
        &self.slots
    }

    /// Indices and records of every filled slot, in slot order.
    pub fn filled(&self) -> impl Iterator<Item = (usize, &ItemStack)> {
        self.slots
            .iter()
            .enumerate()
            .filter_map(|(i, s)| s.as_ref().map(|item| (i, item)))
    }

    pub fn into_vec(self) -> Vec<Slot> {
        self.slots
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fitted_pads_short_input() {
        let page = SlotArray::fitted(vec![Some(ItemStack::new("dirt", 3))], 9);
        assert_eq!(page.len(), 9);
        assert_eq!(page.get(0).unwrap().material, "dirt");
        assert!(page.as_slice()[1..].iter().all(Option::is_none));
    }

    #[test]
    fn fitted_truncates_long_input() {
        let slots = vec![Some(ItemStack::new("stone", 1)); 60];
        let page = SlotArray::fitted(slots, 54);
        assert_eq!(page.len(), 54);
    }

    #[test]
    fn exact_rejects_wrong_length() {
        assert!(SlotArray::exact(vec![None; 53], 54).is_none());
        assert!(SlotArray::exact(vec![None; 54], 54).is_some());
    }

    #[test]
    fn set_out_of_range_is_a_no_op() {
        let mut page = SlotArray::empty(9);
        assert!(page.set(9, Some(ItemStack::new("dirt", 1))).is_none());
        assert!(page.is_empty());
    }

    #[test]
    fn filled_lists_positions_in_order() {
        let mut page = SlotArray::empty(54);
        page.set(53, Some(ItemStack::new("b", 1)));
        page.set(0, Some(ItemStack::new("a", 2)));
        let filled: Vec<_> = page.filled().map(|(i, it)| (i, it.material.as_str())).collect();
        assert_eq!(filled, vec![(0, "a"), (53, "b")]);
    }

    #[test]
    fn display_shows_amount_when_stacked() {
        assert_eq!(ItemStack::new("torch", 1).to_string(), "torch");
        assert_eq!(ItemStack::new("torch", 16).to_string(), "torch x16");
    }
}

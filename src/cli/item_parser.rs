//! Parsing of `--put SLOT=ITEM` and `--clear SLOT` edit arguments.
//!
//! `ITEM` is `material`, `material*amount`, or either followed by
//! `;key=value` metadata pairs, e.g. `53=diamond_sword;display_name=Excalibur`.

use crate::errors::{Result, VaultError};
use crate::vault::{ItemStack, SlotArray};

/// One edit applied to an open page before it is closed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SlotEdit {
    Put(usize, ItemStack),
    Clear(usize),
}

/// Parse a single `SLOT=ITEM` argument.
pub fn parse_put(arg: &str) -> Result<SlotEdit> {
    let (slot, item) = arg
        .split_once('=')
        .ok_or_else(|| invalid(arg, "expected SLOT=ITEM"))?;
    let slot = parse_slot(slot)?;

    let mut parts = item.split(';');
    let head = parts.next().unwrap_or_default().trim();

    let (material, amount) = match head.split_once('*') {
        Some((m, n)) => {
            let n: u32 = n.trim().parse().map_err(|_| invalid(arg, "amount is not a number"))?;
            (m.trim(), n)
        }
        None => (head, 1),
    };

    if material.is_empty() {
        return Err(invalid(arg, "material cannot be empty"));
    }
    if amount == 0 {
        return Err(invalid(arg, "amount must be at least 1"));
    }

    let mut stack = ItemStack::new(material, amount);
    for pair in parts {
        let (k, v) = pair
            .split_once('=')
            .ok_or_else(|| invalid(arg, "metadata must be key=value"))?;
        let k = k.trim();
        if k.is_empty() {
            return Err(invalid(arg, "metadata key cannot be empty"));
        }
        stack.meta.insert(k.to_string(), v.trim().to_string());
    }

    Ok(SlotEdit::Put(slot, stack))
}

/// Parse a `--clear SLOT` argument.
pub fn parse_clear(arg: &str) -> Result<SlotEdit> {
    Ok(SlotEdit::Clear(parse_slot(arg)?))
}

/// Apply `edits` in order, rejecting slots outside the page.
pub fn apply_edits(slots: &mut SlotArray, edits: &[SlotEdit]) -> Result<()> {
    for edit in edits {
        let (index, item) = match edit {
            SlotEdit::Put(i, stack) => (*i, Some(stack.clone())),
            SlotEdit::Clear(i) => (*i, None),
        };
        if slots.set(index, item).is_none() {
            return Err(VaultError::InvalidInput(format!(
                "slot {index} is outside the page (0-{})",
                slots.len().saturating_sub(1)
            )));
        }
    }
    Ok(())
}

fn parse_slot(raw: &str) -> Result<usize> {
    raw.trim()
        .parse()
        .map_err(|_| VaultError::InvalidInput(format!("'{}' is not a slot number", raw.trim())))
}

fn invalid(arg: &str, why: &str) -> VaultError {
    VaultError::InvalidInput(format!("invalid item '{arg}': {why}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_plain_material() {
        assert_eq!(
            parse_put("0=diamond_sword").unwrap(),
            SlotEdit::Put(0, ItemStack::new("diamond_sword", 1))
        );
    }

    #[test]
    fn parse_amount() {
        assert_eq!(
            parse_put("53 = dirt*64").unwrap(),
            SlotEdit::Put(53, ItemStack::new("dirt", 64))
        );
    }

    #[test]
    fn parse_metadata() {
        let SlotEdit::Put(_, stack) = parse_put("4=bow;display_name=Longshot;power=5").unwrap() else {
            panic!("expected a put");
        };
        assert_eq!(stack.meta.get("display_name").map(String::as_str), Some("Longshot"));
        assert_eq!(stack.meta.len(), 2);
    }

    #[test]
    fn rejects_malformed_puts() {
        for bad in ["dirt", "x=dirt", "0=", "0=*3", "0=dirt*0", "0=dirt*many", "0=bow;nokey"] {
            assert!(parse_put(bad).is_err(), "{bad:?} should be rejected");
        }
    }

    #[test]
    fn parse_clear_slot() {
        assert_eq!(parse_clear("12").unwrap(), SlotEdit::Clear(12));
        assert!(parse_clear("twelve").is_err());
    }

    #[test]
    fn apply_edits_in_order() {
        let mut page = SlotArray::empty(9);
        let edits = vec![
            parse_put("0=stone*2").unwrap(),
            parse_put("8=torch").unwrap(),
            parse_clear("0").unwrap(),
        ];
        apply_edits(&mut page, &edits).unwrap();
        assert!(page.get(0).is_none());
        assert_eq!(page.get(8).unwrap().material, "torch");
    }

    #[test]
    fn apply_edits_rejects_out_of_range() {
        let mut page = SlotArray::empty(9);
        let err = apply_edits(&mut page, &[parse_clear("9").unwrap()]).unwrap_err();
        assert!(err.to_string().contains("outside the page"));
    }
}

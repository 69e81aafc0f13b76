//! Shared open → show → edit → close flow for `vault` and `pvault`.
//!
//! The CLI plays the presentation layer: it shows the opened page, applies
//! the requested edits as if the player had moved items around, and then
//! delivers the close notification that saves the page.

use crate::cli::item_parser::{apply_edits, parse_clear, parse_put, SlotEdit};
use crate::cli::{output, EditArgs, Host};
use crate::dispatch::Reply;
use crate::errors::{Result, VaultError};
use crate::player::PlayerProfile;
use crate::session::{CloseNotice, CloseOutcome};

/// Parse `--put` / `--clear` arguments and check them against the page size.
///
/// Done before opening so a bad argument never leaves a session behind.
pub fn parse_edits(edits: &EditArgs, capacity: usize) -> Result<Vec<SlotEdit>> {
    let mut parsed = Vec::with_capacity(edits.put.len() + edits.clear.len());
    for arg in &edits.put {
        parsed.push(parse_put(arg)?);
    }
    for arg in &edits.clear {
        parsed.push(parse_clear(arg)?);
    }

    for edit in &parsed {
        let (SlotEdit::Put(i, _) | SlotEdit::Clear(i)) = edit;
        if *i >= capacity {
            return Err(VaultError::InvalidInput(format!(
                "slot {i} is outside the page (0-{})",
                capacity.saturating_sub(1)
            )));
        }
    }

    Ok(parsed)
}

/// Show an opened page, apply `edits`, and close it again.
pub fn present_and_close(
    host: &Host,
    actor: &PlayerProfile,
    reply: Reply,
    edits: &[SlotEdit],
) -> Result<()> {
    let opened = match reply {
        Reply::Opened(v) => v,
        Reply::Refused { message, .. } => return Err(VaultError::Refused(message)),
    };

    output::print_page(&opened.title, &opened.slots);

    let mut slots = opened.slots.clone();
    let applied = apply_edits(&mut slots, edits);
    if applied.is_err() {
        // Close with what the player was shown.
        slots = opened.slots.clone();
    }

    let outcome = host.surface.on_close(CloseNotice {
        container: opened.container,
        player: actor.id.clone(),
        slots: slots.clone(),
    });
    applied?;

    match outcome {
        CloseOutcome::Saved { target, page } => {
            let owner = host.display_name(&target);
            host.audit("save", &actor.name, &owner, Some(page.get()), None);

            if !edits.is_empty() {
                output::print_page(&format!("{} (after edits)", opened.title), &slots);
            }
            output::success(&format!(
                "Saved page {page} of {owner}'s vault ({}/{} slots used)",
                slots.filled().count(),
                slots.len()
            ));
            Ok(())
        }
        CloseOutcome::Failed { error, .. } => Err(VaultError::WriteFailed(error)),
        CloseOutcome::Ignored => Err(VaultError::CommandFailed(
            "vault session was lost before it could be saved".into(),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_edits_checks_capacity() {
        let edits = EditArgs {
            put: vec!["8=dirt".into()],
            clear: vec![],
        };
        assert!(parse_edits(&edits, 9).is_ok());
        assert!(parse_edits(&edits, 8).is_err());
    }

    #[test]
    fn parse_edits_keeps_puts_before_clears() {
        let edits = EditArgs {
            put: vec!["0=dirt".into()],
            clear: vec!["0".into()],
        };
        let parsed = parse_edits(&edits, 54).unwrap();
        assert!(matches!(parsed[0], SlotEdit::Put(0, _)));
        assert_eq!(parsed[1], SlotEdit::Clear(0));
    }
}

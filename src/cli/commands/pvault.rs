//! `playervaults pvault`: an admin opens another player's page.

use crate::cli::commands::open::{parse_edits, present_and_close};
use crate::cli::{EditArgs, Host};
use crate::dispatch::{parse_page, Reply};
use crate::errors::Result;

/// Execute the `pvault` command.
pub fn execute(
    host: &Host,
    admin: &str,
    target: &str,
    page: Option<&str>,
    edits: &EditArgs,
) -> Result<()> {
    let actor = host.player(admin)?;
    let edits = parse_edits(edits, host.settings.capacity)?;

    let reply = host.surface.admin_open(&actor.id, target, page);

    match &reply {
        Reply::Opened(opened) => {
            let owner = host.display_name(&opened.target);
            host.audit("admin-open", &actor.name, &owner, Some(opened.page.get()), None);
        }
        Reply::Refused { kind, message } => {
            let page_no = parse_page(page).ok().map(|p| p.get());
            let op = format!("admin-{}", kind.as_str());
            host.audit(&op, &actor.name, target, page_no, Some(message));
        }
    }

    present_and_close(host, &actor, reply, &edits)
}

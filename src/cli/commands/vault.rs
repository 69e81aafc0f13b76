//! `playervaults vault`: a player opens one of their own pages.

use crate::cli::commands::open::{parse_edits, present_and_close};
use crate::cli::{EditArgs, Host};
use crate::dispatch::parse_page;
use crate::errors::Result;

/// Execute the `vault` command.
pub fn execute(host: &Host, player: &str, page: Option<&str>, edits: &EditArgs) -> Result<()> {
    let actor = host.player(player)?;
    let edits = parse_edits(edits, host.settings.capacity)?;

    let reply = host.surface.user_open(&actor.id, page);

    let page_no = parse_page(page).ok().map(|p| p.get());
    match reply.refusal() {
        Some(kind) => {
            host.audit(kind.as_str(), &actor.name, &actor.name, page_no, reply.message());
        }
        None => host.audit("open", &actor.name, &actor.name, page_no, None),
    }

    present_and_close(host, &actor, reply, &edits)
}

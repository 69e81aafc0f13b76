//! `playervaults pages`: list the pages a player has saved.

use comfy_table::{ContentArrangement, Table};

use crate::cli::{output, Host};
use crate::errors::Result;

/// Execute the `pages` command.
pub fn execute(host: &Host, player: &str) -> Result<()> {
    let profile = host.player(player)?;
    let sessions = host.surface.sessions();
    let store = sessions.store();

    let limit = sessions.limits().resolve_player(sessions.grants(), &profile.id);
    let pages = store.saved_pages(&profile.id)?;

    if pages.is_empty() {
        output::info(&format!("{} has no saved vault pages.", profile.name));
        output::tip(&format!("Run `playervaults vault {} 1` to open the first page.", profile.name));
        return Ok(());
    }

    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["Page", "Slots used", "Accessible"]);

    for page in pages {
        let used = match store.load_checked(&profile.id, page) {
            Ok(slots) => format!("{}/{}", slots.filled().count(), slots.len()),
            Err(e) => format!("unreadable ({e})"),
        };
        let accessible = if page.get() <= limit { "yes" } else { "no (above limit)" };
        table.add_row(vec![page.to_string(), used, accessible.to_string()]);
    }

    output::info(&format!("{}'s vault pages (limit {limit}):", profile.name));
    println!("{table}");

    Ok(())
}

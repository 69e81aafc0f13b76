//! `playervaults limit`: show a player's page limit.

use crate::cli::{output, Host};
use crate::errors::Result;

/// Execute the `limit` command.
pub fn execute(host: &Host, player: &str) -> Result<()> {
    let profile = host.player(player)?;
    let sessions = host.surface.sessions();

    let limit = sessions.limits().resolve_player(sessions.grants(), &profile.id);
    let noun = if limit == 1 { "page" } else { "pages" };
    output::info(&format!("{} can open {limit} vault {noun}.", profile.name));

    if sessions.limits().is_admin(sessions.grants(), &profile.id) {
        output::tip(&format!(
            "{} holds {} and can open other players' vaults.",
            profile.name,
            sessions.limits().admin_grant()
        ));
    }

    Ok(())
}

//! Page limits derived from capability grants.
//!
//! A player may open pages `1..=limit`, where `limit` is the largest `N`
//! among their `<prefix>.amount.<N>` grants, or 1 if they hold none.

use regex::Regex;

use crate::errors::{Result, VaultError};
use crate::player::{GrantSource, PlayerId};

/// Limit every player has without a matching grant.
pub const DEFAULT_LIMIT: u32 = 1;

/// Resolves a player's page limit and admin status from their grants.
#[derive(Debug, Clone)]
pub struct LimitResolver {
    /// `^<prefix>\.amount\.(\d+)$`
    pattern: Regex,

    /// Grant that allows opening other players' vaults.
    admin_grant: String,
}

impl LimitResolver {
    /// Build a resolver for grants of the form `<grant_prefix>.amount.<N>`.
    pub fn new(grant_prefix: &str, admin_grant: impl Into<String>) -> Result<Self> {
        if grant_prefix.is_empty() {
            return Err(VaultError::Config("grant prefix cannot be empty".into()));
        }
        let pattern = Regex::new(&format!(r"^{}\.amount\.(\d+)$", regex::escape(grant_prefix)))
            .map_err(|e| VaultError::Config(format!("grant pattern: {e}")))?;

        Ok(Self {
            pattern,
            admin_grant: admin_grant.into(),
        })
    }

    /// Highest page limit encoded in `grants`, or [`DEFAULT_LIMIT`].
    ///
    /// Grants that don't match, or whose number doesn't fit a `u32`,
    /// are skipped.
    pub fn resolve<I, S>(&self, grants: I) -> u32
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        grants
            .into_iter()
            .filter_map(|g| self.limit_of(g.as_ref()))
            .fold(DEFAULT_LIMIT, u32::max)
    }

    /// Query `source` once and resolve the player's current limit.
    pub fn resolve_player(&self, source: &dyn GrantSource, player: &PlayerId) -> u32 {
        self.resolve(source.effective_grants(player))
    }

    /// Whether the player currently holds the admin grant.
    pub fn is_admin(&self, source: &dyn GrantSource, player: &PlayerId) -> bool {
        source
            .effective_grants(player)
            .iter()
            .any(|g| *g == self.admin_grant)
    }

    pub fn admin_grant(&self) -> &str {
        &self.admin_grant
    }

    fn limit_of(&self, grant: &str) -> Option<u32> {
        let caps = self.pattern.captures(grant)?;
        caps.get(1)?.as_str().parse().ok()
    }
}

//! Command and close-event entry points.
//!
//! `/vault [page]` and `/pvault <player> [page]` arrive here with raw
//! string arguments, and so do close notifications.  Every entry point
//! runs its body under a guard: errors and panics end up in the log and
//! as a reply, never propagate to the host.

use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::Arc;

use tracing::error;

use crate::errors::{Result, VaultError};
use crate::player::{PlayerDirectory, PlayerId};
use crate::session::{CloseNotice, CloseOutcome, OpenRequest, OpenedVault, VaultSessions};
use crate::vault::PageNumber;

const USER_USAGE: &str = "Invalid vault page number. Usage: /vault [page]";
const ADMIN_USAGE: &str = "Usage: /pvault <player> [page]";
const ADMIN_PAGE_USAGE: &str = "Invalid vault page number. Usage: /pvault <player> [page]";
const ADMIN_DENIED: &str = "You do not have permission to use /pvault.";
const INTERNAL_ERROR: &str = "Something went wrong opening the vault. Please tell an administrator.";

/// Why a command was refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Refusal {
    /// Page above the target's limit.
    AccessDenied,
    /// Page argument is not an integer.
    InvalidPage,
    /// Required argument missing.
    Usage,
    /// Sender lacks the admin grant.
    NotPermitted,
    /// No player by that name.
    NotFound,
    /// The command failed or panicked.
    Internal,
}

impl Refusal {
    /// Short tag used in the access log.
    pub fn as_str(self) -> &'static str {
        match self {
            Refusal::AccessDenied => "denied",
            Refusal::InvalidPage => "invalid-page",
            Refusal::Usage => "usage",
            Refusal::NotPermitted => "not-permitted",
            Refusal::NotFound => "not-found",
            Refusal::Internal => "error",
        }
    }
}

/// What the command sender gets back.
#[derive(Debug, Clone)]
pub enum Reply {
    /// Present this page to the sender.
    Opened(OpenedVault),

    /// The request was refused or failed; show `message`.
    Refused { kind: Refusal, message: String },
}

impl Reply {
    fn refused(kind: Refusal, message: impl Into<String>) -> Self {
        Reply::Refused {
            kind,
            message: message.into(),
        }
    }

    pub fn opened(&self) -> Option<&OpenedVault> {
        match self {
            Reply::Opened(v) => Some(v),
            Reply::Refused { .. } => None,
        }
    }

    pub fn message(&self) -> Option<&str> {
        match self {
            Reply::Opened(_) => None,
            Reply::Refused { message, .. } => Some(message.as_str()),
        }
    }

    pub fn refusal(&self) -> Option<Refusal> {
        match self {
            Reply::Opened(_) => None,
            Reply::Refused { kind, .. } => Some(*kind),
        }
    }
}

/// The vault's command surface.
pub struct CommandSurface {
    sessions: Arc<VaultSessions>,
    directory: Arc<dyn PlayerDirectory>,
}

impl CommandSurface {
    pub fn new(sessions: Arc<VaultSessions>, directory: Arc<dyn PlayerDirectory>) -> Self {
        Self {
            sessions,
            directory,
        }
    }

    pub fn sessions(&self) -> &VaultSessions {
        &self.sessions
    }

    /// `/vault [page]`: a player opens one of their own pages.
    pub fn user_open(&self, actor: &PlayerId, page_arg: Option<&str>) -> Reply {
        guarded("vault", || {
            let Ok(page) = parse_page(page_arg) else {
                return Reply::refused(Refusal::InvalidPage, USER_USAGE);
            };

            match self.sessions.open(OpenRequest::own(actor.clone(), page)) {
                Ok(opened) => Reply::Opened(opened),
                Err(VaultError::AccessDenied { limit }) => {
                    Reply::refused(
                    Refusal::AccessDenied,
                    format!("You only have access to {limit} vaults."),
                )
                }
                Err(e) => internal("vault", &e),
            }
        })
    }

    /// `/pvault <player> [page]`: an admin opens someone else's page.
    pub fn admin_open(&self, actor: &PlayerId, target_name: &str, page_arg: Option<&str>) -> Reply {
        guarded("pvault", || {
            let sessions = &self.sessions;
            if !sessions.limits().is_admin(sessions.grants(), actor) {
                return Reply::refused(Refusal::NotPermitted, ADMIN_DENIED);
            }

            let target_name = target_name.trim();
            if target_name.is_empty() {
                return Reply::refused(Refusal::Usage, ADMIN_USAGE);
            }

            let Some(target) = self.directory.find_exact(target_name) else {
                return Reply::refused(
                    Refusal::NotFound,
                    VaultError::PlayerNotFound(target_name.to_string()).to_string() + ".",
                );
            };

            let Ok(page) = parse_page(page_arg) else {
                return Reply::refused(Refusal::InvalidPage, ADMIN_PAGE_USAGE);
            };

            let req = OpenRequest {
                actor: actor.clone(),
                target: target.id,
                page,
                admin_authorized: true,
            };

            match sessions.open(req) {
                Ok(opened) => Reply::Opened(opened),
                Err(VaultError::AccessDenied { limit }) => Reply::refused(
                    Refusal::AccessDenied,
                    format!("{} only has access to {limit} vaults.", target.name),
                ),
                Err(e) => internal("pvault", &e),
            }
        })
    }

    /// A presented container was closed.
    pub fn on_close(&self, notice: CloseNotice) -> CloseOutcome {
        let container = notice.container;
        catch_unwind(AssertUnwindSafe(|| self.sessions.close(notice))).unwrap_or_else(|_| {
            error!(%container, "close handler panicked, vault page not saved");
            CloseOutcome::Ignored
        })
    }
}

/// Parse an optional page argument: absent means page 1, values below 1
/// clamp to 1, anything that isn't an integer is `InvalidInput`.
pub fn parse_page(arg: Option<&str>) -> Result<PageNumber> {
    let Some(raw) = arg else {
        return Ok(PageNumber::FIRST);
    };
    let n: i64 = raw
        .trim()
        .parse()
        .map_err(|_| VaultError::InvalidInput(format!("'{raw}' is not a page number")))?;
    Ok(PageNumber::clamped(n))
}

fn guarded(command: &str, body: impl FnOnce() -> Reply) -> Reply {
    catch_unwind(AssertUnwindSafe(body)).unwrap_or_else(|_| {
        error!(command, "command handler panicked");
        Reply::refused(Refusal::Internal, INTERNAL_ERROR)
    })
}

fn internal(command: &str, e: &VaultError) -> Reply {
    error!(command, error = %e, "vault command failed");
    Reply::refused(Refusal::Internal, INTERNAL_ERROR)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_page_defaults_to_first() {
        assert_eq!(parse_page(None).unwrap(), PageNumber::FIRST);
    }

    #[test]
    fn sub_one_pages_clamp() {
        assert_eq!(parse_page(Some("0")).unwrap(), PageNumber::FIRST);
        assert_eq!(parse_page(Some("-4")).unwrap(), PageNumber::FIRST);
        assert_eq!(parse_page(Some(" 3 ")).unwrap().get(), 3);
    }

    #[test]
    fn non_numeric_pages_are_invalid() {
        for bad in ["abc", "3abc", "", "1.5"] {
            assert!(
                matches!(parse_page(Some(bad)), Err(VaultError::InvalidInput(_))),
                "{bad:?} should be rejected"
            );
        }
    }

    #[test]
    fn guard_turns_panics_into_replies() {
        let reply = guarded("test", || panic!("boom"));
        assert_eq!(reply.message(), Some(INTERNAL_ERROR));
        assert_eq!(reply.refusal(), Some(Refusal::Internal));
    }

    #[test]
    fn refusal_tags_are_distinct() {
        let all = [
            Refusal::AccessDenied,
            Refusal::InvalidPage,
            Refusal::Usage,
            Refusal::NotPermitted,
            Refusal::NotFound,
            Refusal::Internal,
        ];
        let tags: std::collections::HashSet<_> = all.iter().map(|r| r.as_str()).collect();
        assert_eq!(tags.len(), all.len());
    }
}

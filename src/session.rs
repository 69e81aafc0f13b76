//! Open/close lifecycle of vault pages.
//!
//! Opening a page resolves the target's limit, loads the page and records
//! a session under a fresh container id.  The host hands that id back when
//! the container is closed, and the session table, not the container's
//! title, tells us which player and page to save.

use std::collections::HashMap;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use chrono::{DateTime, Utc};
use tracing::{debug, error, info, warn};

use crate::config::Settings;
use crate::errors::{Result, VaultError};
use crate::permissions::LimitResolver;
use crate::player::{GrantSource, PlayerId};
use crate::vault::{FramedJsonCodec, PageNumber, RecordStore, SlotArray, VaultStore};

/// Identifies one presented container instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ContainerId(u64);

impl fmt::Display for ContainerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A request to present `target`'s `page` to `actor`.
#[derive(Debug, Clone)]
pub struct OpenRequest {
    pub actor: PlayerId,
    pub target: PlayerId,
    pub page: PageNumber,
    /// Result of the caller's admin check; required when `actor != target`.
    pub admin_authorized: bool,
}

impl OpenRequest {
    /// A player opening their own vault.
    pub fn own(player: PlayerId, page: PageNumber) -> Self {
        Self {
            actor: player.clone(),
            target: player,
            page,
            admin_authorized: false,
        }
    }
}

/// A page currently presented to someone.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OpenSession {
    pub container: ContainerId,
    pub actor: PlayerId,
    pub target: PlayerId,
    pub page: PageNumber,
    pub limit: u32,
    pub opened_at: DateTime<Utc>,
}

/// What the presentation layer shows after a successful open.
#[derive(Debug, Clone)]
pub struct OpenedVault {
    pub container: ContainerId,
    pub target: PlayerId,
    pub page: PageNumber,
    pub limit: u32,
    /// Display title, e.g. "Vault - Page 2".  Never parsed back.
    pub title: String,
    pub slots: SlotArray,
}

/// The host's notification that a container stopped being viewed.
#[derive(Debug, Clone)]
pub struct CloseNotice {
    pub container: ContainerId,
    pub player: PlayerId,
    pub slots: SlotArray,
}

/// Result of handling a close notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CloseOutcome {
    /// The page was written back to the target's record.
    Saved { target: PlayerId, page: PageNumber },

    /// Not a vault container (or already closed); nothing written.
    Ignored,

    /// The write failed; the closed contents are lost.
    Failed {
        target: PlayerId,
        page: PageNumber,
        error: String,
    },
}

/// Session table plus the collaborators an open/close needs.
pub struct VaultSessions {
    store: VaultStore,
    limits: LimitResolver,
    grants: Arc<dyn GrantSource>,
    title_prefix: String,
    next_id: AtomicU64,
    open: Mutex<HashMap<ContainerId, OpenSession>>,
}

impl VaultSessions {
    pub fn new(
        store: VaultStore,
        limits: LimitResolver,
        grants: Arc<dyn GrantSource>,
        title_prefix: impl Into<String>,
    ) -> Self {
        Self {
            store,
            limits,
            grants,
            title_prefix: title_prefix.into(),
            next_id: AtomicU64::new(1),
            open: Mutex::new(HashMap::new()),
        }
    }

    /// Wire up sessions from settings and the host's collaborators.
    pub fn from_settings(
        settings: &Settings,
        records: Arc<dyn RecordStore>,
        grants: Arc<dyn GrantSource>,
    ) -> Result<Self> {
        settings.validate()?;
        let store = VaultStore::new(
            records,
            Arc::new(FramedJsonCodec),
            settings.namespace.clone(),
            settings.capacity,
        )
        .with_corrupt_policy(settings.on_corrupt);
        let limits = LimitResolver::new(&settings.grant_prefix, settings.admin_grant.clone())?;

        Ok(Self::new(store, limits, grants, settings.title_prefix.clone()))
    }

    // ------------------------------------------------------------------
    // Lifecycle
    // ------------------------------------------------------------------

    /// Check access, load the page and register a session for it.
    ///
    /// Fails with `Unauthorized` for an unauthorized cross-player open and
    /// `AccessDenied` when the page is above the target's limit; neither
    /// touches the store.  Reopening a page the same actor already has
    /// open replaces the earlier session.
    pub fn open(&self, req: OpenRequest) -> Result<OpenedVault> {
        if req.actor != req.target && !req.admin_authorized {
            warn!(actor = %req.actor, owner = %req.target, "unauthorized vault open refused");
            return Err(VaultError::Unauthorized);
        }

        let limit = self.limits.resolve_player(self.grants.as_ref(), &req.target);
        if req.page.get() > limit {
            debug!(owner = %req.target, page = %req.page, limit, "page above vault limit");
            return Err(VaultError::AccessDenied { limit });
        }

        let slots = self.store.load(&req.target, req.page)?;
        let container = ContainerId(self.next_id.fetch_add(1, Ordering::Relaxed));

        let session = OpenSession {
            container,
            actor: req.actor.clone(),
            target: req.target.clone(),
            page: req.page,
            limit,
            opened_at: Utc::now(),
        };

        {
            let mut open = self.lock();
            open.retain(|_, s| {
                !(s.actor == session.actor && s.target == session.target && s.page == session.page)
            });
            open.insert(container, session);
        }

        info!(actor = %req.actor, owner = %req.target, page = %req.page, %container,
            "vault page opened");

        Ok(OpenedVault {
            container,
            target: req.target,
            page: req.page,
            limit,
            title: self.title_for(req.page),
            slots,
        })
    }

    /// Save the contents of a closed vault container.
    ///
    /// Containers without a session are ignored.  A failed save is logged
    /// and reported in the outcome; it never panics.
    pub fn close(&self, notice: CloseNotice) -> CloseOutcome {
        let Some(session) = self.lock().remove(&notice.container) else {
            debug!(container = %notice.container, "close of a non-vault container ignored");
            return CloseOutcome::Ignored;
        };

        if notice.player != session.actor {
            debug!(container = %notice.container, closer = %notice.player, actor = %session.actor,
                "vault container closed by a different player than opened it");
        }

        self.persist(session, &notice.slots)
    }

    /// Force-close every open session, e.g. from the host's shutdown hook.
    ///
    /// `contents` supplies the last known slots of each container; sessions
    /// it returns `None` for are dropped unsaved with a warning.
    pub fn shutdown<F>(&self, mut contents: F) -> Vec<CloseOutcome>
    where
        F: FnMut(&OpenSession) -> Option<SlotArray>,
    {
        let drained: Vec<OpenSession> = {
            let mut open = self.lock();
            let mut all: Vec<OpenSession> = open.drain().map(|(_, s)| s).collect();
            all.sort_by_key(|s| s.container);
            all
        };

        if !drained.is_empty() {
            info!(count = drained.len(), "flushing open vault sessions");
        }

        drained
            .into_iter()
            .map(|session| match contents(&session) {
                Some(slots) => self.persist(session, &slots),
                None => {
                    warn!(container = %session.container, owner = %session.target,
                        page = %session.page, "no contents for open vault at shutdown, not saved");
                    CloseOutcome::Ignored
                }
            })
            .collect()
    }

    // ------------------------------------------------------------------
    // Accessors
    // ------------------------------------------------------------------

    /// Snapshot of all open sessions, ordered by container id.
    pub fn open_sessions(&self) -> Vec<OpenSession> {
        let mut all: Vec<OpenSession> = self.lock().values().cloned().collect();
        all.sort_by_key(|s| s.container);
        all
    }

    pub fn is_open(&self, container: ContainerId) -> bool {
        self.lock().contains_key(&container)
    }

    /// Display title for a page.
    pub fn title_for(&self, page: PageNumber) -> String {
        format!("{}{page}", self.title_prefix)
    }

    pub fn store(&self) -> &VaultStore {
        &self.store
    }

    pub fn limits(&self) -> &LimitResolver {
        &self.limits
    }

    pub fn grants(&self) -> &dyn GrantSource {
        self.grants.as_ref()
    }

    // ------------------------------------------------------------------
    // Internals
    // ------------------------------------------------------------------

    fn persist(&self, session: OpenSession, slots: &SlotArray) -> CloseOutcome {
        match self.store.save(&session.target, session.page, slots) {
            Ok(()) => CloseOutcome::Saved {
                target: session.target,
                page: session.page,
            },
            Err(e) => {
                error!(owner = %session.target, page = %session.page, error = %e,
                    "failed to save closed vault page");
                CloseOutcome::Failed {
                    target: session.target,
                    page: session.page,
                    error: e.to_string(),
                }
            }
        }
    }

    /// The table holds plain data, so a poisoned lock is still usable.
    fn lock(&self) -> MutexGuard<'_, HashMap<ContainerId, OpenSession>> {
        self.open.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

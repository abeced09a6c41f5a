//! Top-level synchronization run
//!
//! Sequences the pipeline: connect, bind, paged search, reconcile. One
//! connection, one bind, one search sequence per run; the session is closed
//! on every exit path after a successful connect. Infrastructure failures
//! abort the run with a tagged reason; per-entry failures only move
//! counters.

use std::sync::Arc;

use tracing::{info, instrument, warn};

use dirsync_core::directory::{Directory, DirectorySession};
use dirsync_core::store::UserStore;

use crate::reconcile::{Reconciler, SyncCounts};

/// Why a run aborted before producing counts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AbortReason {
    /// The directory server could not be reached.
    ConnectionFailed,

    /// The service-account bind was rejected.
    BindFailed,

    /// The search (or one of its pages) failed; gathered entries were
    /// discarded rather than surfaced as a partial user set.
    SearchFailed,

    /// The search legitimately matched nothing.
    NoUsersFound,
}

impl AbortReason {
    /// Stable reason code for reporting.
    pub fn code(&self) -> &'static str {
        match self {
            AbortReason::ConnectionFailed => "CONNECTION_FAILED",
            AbortReason::BindFailed => "BIND_FAILED",
            AbortReason::SearchFailed => "SEARCH_FAILED",
            AbortReason::NoUsersFound => "NO_USERS_FOUND",
        }
    }
}

impl std::fmt::Display for AbortReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.code())
    }
}

/// The single structured outcome of a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunOutcome {
    /// The pipeline ran to completion. Per-entry failures are inside the
    /// counts; they do not fail the run.
    Completed(SyncCounts),

    /// The pipeline stopped before reconciliation produced counts.
    Aborted(AbortReason),
}

impl RunOutcome {
    /// Whether the run completed.
    pub fn succeeded(&self) -> bool {
        matches!(self, RunOutcome::Completed(_))
    }

    /// The counts, if the run completed.
    pub fn counts(&self) -> Option<SyncCounts> {
        match self {
            RunOutcome::Completed(counts) => Some(*counts),
            RunOutcome::Aborted(_) => None,
        }
    }
}

/// Drives one full synchronization run.
pub struct SyncRunner<D, S> {
    directory: D,
    reconciler: Reconciler<S>,
}

impl<D, S> SyncRunner<D, S>
where
    D: Directory,
    S: UserStore,
{
    /// Create a runner over a directory and a local user store.
    pub fn new(directory: D, store: Arc<S>) -> Self {
        Self {
            directory,
            reconciler: Reconciler::new(store),
        }
    }

    /// Execute the pipeline and return its structured outcome.
    #[instrument(skip(self))]
    pub async fn run(&self) -> RunOutcome {
        let mut session = match self.directory.connect().await {
            Ok(session) => session,
            Err(error) => {
                warn!(%error, "directory connection failed, aborting run");
                return RunOutcome::Aborted(AbortReason::ConnectionFailed);
            }
        };

        if let Err(error) = session.bind().await {
            warn!(%error, "directory bind failed, aborting run");
            session.close().await;
            return RunOutcome::Aborted(AbortReason::BindFailed);
        }

        let entries = match session.search_users().await {
            Ok(entries) => {
                // The connection is not needed past this point; release it
                // before the store work starts.
                session.close().await;
                entries
            }
            Err(error) => {
                warn!(%error, "directory search failed, aborting run");
                session.close().await;
                return RunOutcome::Aborted(AbortReason::SearchFailed);
            }
        };

        if entries.is_empty() {
            info!("directory search matched no entries");
            return RunOutcome::Aborted(AbortReason::NoUsersFound);
        }

        let counts = self.reconciler.reconcile(&entries).await;

        info!(
            created = counts.created,
            updated = counts.updated,
            failed = counts.failed,
            "synchronization run complete"
        );

        RunOutcome::Completed(counts)
    }
}

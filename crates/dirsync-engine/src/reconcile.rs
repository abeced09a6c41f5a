//! Create-or-update reconciliation
//!
//! Applies each classified candidate against the local user store.
//! Per-entry failures (invalid data, save errors) are counted and skipped;
//! they never abort the pass. Entries are processed in search order, one at
//! a time, so two entries mapping to the same username resolve
//! deterministically to last-write-wins.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, warn};

use dirsync_core::entry::DirectoryEntry;
use dirsync_core::password::{generate_random_password, DEFAULT_PASSWORD_LENGTH};
use dirsync_core::store::UserStore;

use crate::candidate::{classify, SyncCandidate};

/// Aggregate outcome counts for one reconciliation pass.
///
/// Every entry lands in exactly one bucket:
/// created + updated + failed == entries processed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncCounts {
    /// New local accounts created.
    pub created: u64,

    /// Existing local accounts updated.
    pub updated: u64,

    /// Entries that were invalid or failed to persist.
    pub failed: u64,
}

impl SyncCounts {
    /// Total entries accounted for.
    pub fn total(&self) -> u64 {
        self.created + self.updated + self.failed
    }
}

/// Applies directory entries to a local user store.
pub struct Reconciler<S> {
    store: Arc<S>,
}

impl<S: UserStore> Reconciler<S> {
    /// Create a reconciler over the given store.
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    /// Reconcile all entries, in order, returning the aggregate counts.
    #[instrument(skip(self, entries), fields(entry_count = entries.len()))]
    pub async fn reconcile(&self, entries: &[DirectoryEntry]) -> SyncCounts {
        let mut counts = SyncCounts::default();

        for entry in entries {
            let candidate = match classify(entry) {
                Ok(candidate) => candidate,
                Err(reason) => {
                    warn!(dn = %entry.dn(), %reason, "skipping invalid directory entry");
                    counts.failed += 1;
                    continue;
                }
            };

            match self.apply(&candidate).await {
                Ok(Applied::Created) => counts.created += 1,
                Ok(Applied::Updated) => counts.updated += 1,
                Err(error) => {
                    warn!(
                        username = %candidate.username,
                        %error,
                        "failed to persist local user"
                    );
                    counts.failed += 1;
                }
            }
        }

        info!(
            created = counts.created,
            updated = counts.updated,
            failed = counts.failed,
            "reconciliation pass complete"
        );

        counts
    }

    /// Create or update the local account for one candidate.
    async fn apply(&self, candidate: &SyncCandidate) -> Result<Applied, dirsync_core::StoreError> {
        match self.store.find_by_username(&candidate.username).await? {
            Some(mut user) => {
                user.display_name = candidate.full_name.clone();
                user.email = candidate.email.clone();
                self.store.save(&user).await?;

                debug!(username = %candidate.username, "updated local user");
                Ok(Applied::Updated)
            }
            None => {
                let mut user = self.store.new_user();
                user.username = candidate.username.clone();
                user.display_name = candidate.full_name.clone();
                user.email = candidate.email.clone();
                // The directory is the identity source, not a credential
                // source; the initial password is always freshly generated.
                user.password = Some(generate_random_password(DEFAULT_PASSWORD_LENGTH));
                self.store.save(&user).await?;

                debug!(username = %candidate.username, "created local user");
                Ok(Applied::Created)
            }
        }
    }
}

enum Applied {
    Created,
    Updated,
}

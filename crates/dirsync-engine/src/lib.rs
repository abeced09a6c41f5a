//! # Directory Sync Engine
//!
//! Reconciles directory person entries against a local user store and
//! drives the full synchronization pipeline: connect, bind, paged search,
//! reconcile, aggregate outcome.
//!
//! ## Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use dirsync_engine::SyncRunner;
//! use dirsync_ldap::LdapDirectory;
//!
//! let directory = LdapDirectory::new(config)?;
//! let runner = SyncRunner::new(directory, Arc::new(store));
//! match runner.run().await {
//!     RunOutcome::Completed(counts) => println!("{counts:?}"),
//!     RunOutcome::Aborted(reason) => eprintln!("sync aborted: {}", reason.code()),
//! }
//! ```

pub mod candidate;
pub mod reconcile;
pub mod runner;

#[cfg(test)]
mod testutil;

// Re-exports
pub use candidate::{classify, InvalidReason, SyncCandidate};
pub use reconcile::{Reconciler, SyncCounts};
pub use runner::{AbortReason, RunOutcome, SyncRunner};

//! Directory connector traits
//!
//! The seam between the sync engine and a protocol implementation. A
//! [`Directory`] opens authenticated-capable sessions; a
//! [`DirectorySession`] binds, searches, and must be closed on every exit
//! path so no server-side session leaks.

use async_trait::async_trait;

use crate::entry::DirectoryEntry;
use crate::error::SyncResult;

/// A directory service that sessions can be opened against.
#[async_trait]
pub trait Directory: Send + Sync {
    /// The session type produced by [`connect`](Self::connect).
    type Session: DirectorySession;

    /// Open a connection to the directory server.
    ///
    /// The returned session is connected but not yet authenticated; callers
    /// must [`bind`](DirectorySession::bind) before searching and must not
    /// proceed past a connect failure.
    async fn connect(&self) -> SyncResult<Self::Session>;
}

/// One open connection to a directory server.
///
/// Sessions are single-use: one bind, one search sequence, one close.
#[async_trait]
pub trait DirectorySession: Send {
    /// Authenticate with the configured service account.
    ///
    /// Any rejection (bad credentials, server refusal, transport failure)
    /// fails the whole run; there is no retry and no anonymous fallback.
    async fn bind(&mut self) -> SyncResult<()>;

    /// Retrieve all person entries matching the configured filter, across
    /// however many pages the server serves them in.
    ///
    /// Returns an empty list when the filter matches nothing; a failed page
    /// discards everything gathered so far and fails the call.
    async fn search_users(&mut self) -> SyncResult<Vec<DirectoryEntry>>;

    /// Release the connection (unbind). Errors are logged, not surfaced;
    /// there is nothing a caller could do with them.
    async fn close(&mut self);
}

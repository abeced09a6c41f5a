//! Local user store contract
//!
//! The narrow interface the reconciliation engine needs from whatever
//! persists local accounts. The engine has no knowledge of the store's
//! persistence mechanism; it only looks up by username, constructs
//! store-default records, and saves.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error from a local user store operation.
#[derive(Debug, Error)]
pub enum StoreError {
    /// A lookup could not be performed.
    #[error("lookup failed: {message}")]
    Lookup { message: String },

    /// A record could not be saved.
    #[error("save failed: {message}")]
    Save { message: String },
}

impl StoreError {
    /// Create a lookup error.
    pub fn lookup(message: impl Into<String>) -> Self {
        StoreError::Lookup {
            message: message.into(),
        }
    }

    /// Create a save error.
    pub fn save(message: impl Into<String>) -> Self {
        StoreError::Save {
            message: message.into(),
        }
    }
}

/// A local user account record.
///
/// Statically shaped; the store decides identifiers and persistence. The
/// password is only populated when the engine creates a new account and is
/// never read back.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UserRecord {
    /// Login name, matched exactly against the directory username.
    pub username: String,

    /// Human-readable display name.
    pub display_name: String,

    /// Email address.
    pub email: String,

    /// Initial password, set at creation time only.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,

    /// Group memberships; the store supplies its defaults for new users.
    pub groups: Vec<String>,

    /// Whether the account may log in.
    pub active: bool,
}

/// Contract the reconciliation engine requires from a local user store.
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Look up a user by exact username. Case sensitivity is the store's
    /// business.
    async fn find_by_username(&self, username: &str) -> Result<Option<UserRecord>, StoreError>;

    /// Persist a record, creating or replacing as the store sees fit.
    async fn save(&self, user: &UserRecord) -> Result<(), StoreError>;

    /// A blank record carrying the store's defaults for new accounts
    /// (group membership, active status).
    fn new_user(&self) -> UserRecord;
}

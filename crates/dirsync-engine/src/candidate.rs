//! Entry classification
//!
//! Maps a raw directory entry to a validated local-user candidate, or
//! rejects it. A rejected entry never reaches the store; it is counted as
//! failed and skipped without partial updates.

use dirsync_core::entry::DirectoryEntry;
use dirsync_core::validation::is_valid_email;

/// A validated projection of a directory entry, ready for reconciliation.
#[derive(Debug, Clone, PartialEq)]
pub struct SyncCandidate {
    /// Login name from `samaccountname`; non-empty after trimming.
    pub username: String,

    /// Email from `mail`; passed the syntax check.
    pub email: String,

    /// Display name from `cn`; may be empty.
    pub full_name: String,
}

/// Why an entry did not become a candidate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InvalidReason {
    /// `samaccountname` was absent or empty after trimming.
    MissingUsername,

    /// `mail` was absent or not a syntactically valid address.
    InvalidEmail,
}

impl std::fmt::Display for InvalidReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            InvalidReason::MissingUsername => write!(f, "missing username"),
            InvalidReason::InvalidEmail => write!(f, "invalid email"),
        }
    }
}

/// Classify a directory entry.
///
/// Username is checked first: an entry without one is invalid no matter
/// what its email looks like.
pub fn classify(entry: &DirectoryEntry) -> Result<SyncCandidate, InvalidReason> {
    let username = entry.first("samaccountname").unwrap_or("").trim();
    if username.is_empty() {
        return Err(InvalidReason::MissingUsername);
    }

    let email = entry.first("mail").unwrap_or("").trim();
    if !is_valid_email(email) {
        return Err(InvalidReason::InvalidEmail);
    }

    let full_name = entry.first("cn").unwrap_or("").trim();

    Ok(SyncCandidate {
        username: username.to_string(),
        email: email.to_string(),
        full_name: full_name.to_string(),
    })
}

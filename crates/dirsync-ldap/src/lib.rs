//! # LDAP Directory Connector
//!
//! LDAP/Active Directory implementation of the `dirsync-core` directory
//! traits.
//!
//! ## Features
//!
//! - LDAP v3 over plain or TLS (`ldap://` / `ldaps://`) connections
//! - Bounded connect timeout
//! - Simple bind with a service account
//! - Paged search (RFC 2696) with server cookie feedback
//!
//! ## Example
//!
//! ```ignore
//! use dirsync_core::config::DirectoryConfig;
//! use dirsync_core::directory::{Directory, DirectorySession};
//! use dirsync_ldap::LdapDirectory;
//!
//! let config = DirectoryConfig::new(
//!     "ldaps://dc01.example.com:636",
//!     "dc=example,dc=com",
//!     "cn=svc-sync,dc=example,dc=com",
//! )
//! .with_password("secret");
//!
//! let directory = LdapDirectory::new(config)?;
//! let mut session = directory.connect().await?;
//! session.bind().await?;
//! let entries = session.search_users().await?;
//! session.close().await;
//! ```

pub mod directory;
mod search;

// Re-exports
pub use directory::{LdapDirectory, LdapSession};
pub use search::user_sync_attributes;

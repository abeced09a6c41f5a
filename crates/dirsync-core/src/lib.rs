//! # Directory Sync Core
//!
//! Core abstractions for synchronizing directory-service users into a local
//! user store.
//!
//! This crate provides the foundation shared by the protocol connectors and
//! the reconciliation engine:
//!
//! - [`error`] - Error types with transient/permanent classification
//! - [`config`] - Directory connection configuration (plain and sealed)
//! - [`secrets`] - Encryption vault for sealed configuration values
//! - [`entry`] - Read-only directory entry snapshots
//! - [`directory`] - Connector traits implemented by protocol crates
//! - [`store`] - Local user store contract
//! - [`validation`] - Email syntax checking
//! - [`password`] - Random password generation for newly created users
//!
//! ## Example
//!
//! ```ignore
//! use dirsync_core::config::DirectoryConfig;
//! use dirsync_core::secrets::SecretVault;
//!
//! let vault = SecretVault::from_hex(&master_key_hex)?;
//! let config = sealed_config.unseal(&vault)?;
//! config.validate()?;
//! ```

pub mod config;
pub mod directory;
pub mod entry;
pub mod error;
pub mod password;
pub mod secrets;
pub mod store;
pub mod validation;

// Re-exports
pub use config::{ConnectionSettings, DirectoryConfig, SealedDirectoryConfig};
pub use directory::{Directory, DirectorySession};
pub use entry::DirectoryEntry;
pub use error::{SyncError, SyncResult};
pub use secrets::SecretVault;
pub use store::{StoreError, UserRecord, UserStore};

// Re-export async_trait for trait implementors
pub use async_trait::async_trait;

//! LDAP directory implementation
//!
//! Connection establishment and simple bind for one synchronization run.
//! One session means one connection, one bind, one search sequence; the
//! session must be closed on every exit path so the server-side session is
//! released even when the run aborts.

use async_trait::async_trait;
use ldap3::{Ldap, LdapConnAsync, LdapConnSettings};
use tracing::{debug, info, instrument, warn};

use dirsync_core::config::DirectoryConfig;
use dirsync_core::directory::{Directory, DirectorySession};
use dirsync_core::entry::DirectoryEntry;
use dirsync_core::error::{SyncError, SyncResult};

use crate::search::{collect_paged, LdapPageSource};

/// LDAP result code for invalidCredentials.
const RC_INVALID_CREDENTIALS: u32 = 49;

/// A directory reachable over LDAP.
pub struct LdapDirectory {
    config: DirectoryConfig,
}

impl LdapDirectory {
    /// Create a directory handle from a validated configuration.
    pub fn new(config: DirectoryConfig) -> SyncResult<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    /// Get the directory configuration.
    pub fn config(&self) -> &DirectoryConfig {
        &self.config
    }

    /// Connect, bind, and release — verifies the server is reachable and
    /// the service account credentials are accepted.
    #[instrument(skip(self), fields(url = %self.config.server_url))]
    pub async fn test_connection(&self) -> SyncResult<()> {
        let mut session = self.connect().await?;
        let outcome = session.bind().await;
        session.close().await;
        outcome?;

        info!("directory connection test successful");
        Ok(())
    }
}

impl std::fmt::Debug for LdapDirectory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LdapDirectory")
            .field("config", &self.config.redacted())
            .finish()
    }
}

#[async_trait]
impl Directory for LdapDirectory {
    type Session = LdapSession;

    #[instrument(skip(self), fields(url = %self.config.server_url))]
    async fn connect(&self) -> SyncResult<LdapSession> {
        let url = &self.config.server_url;
        let timeout = self.config.connection.connect_timeout();

        debug!("connecting to directory server");

        let settings = LdapConnSettings::new().set_conn_timeout(timeout);

        // The settings bound the TCP connect; the outer timeout bounds the
        // whole establishment including TLS setup.
        let connected = tokio::time::timeout(timeout, LdapConnAsync::with_settings(settings, url))
            .await
            .map_err(|_| SyncError::ConnectionTimeout {
                timeout_secs: self.config.connection.connect_timeout_secs,
            })?;

        let (conn, ldap) = connected.map_err(|e| {
            SyncError::connection_failed_with_source(
                format!("failed to connect to directory server at {url}"),
                e,
            )
        })?;

        tokio::spawn(async move {
            if let Err(e) = conn.drive().await {
                warn!(error = %e, "LDAP connection driver error");
            }
        });

        info!("directory connection established");

        Ok(LdapSession {
            ldap,
            config: self.config.clone(),
        })
    }
}

/// One open, single-use LDAP session.
pub struct LdapSession {
    ldap: Ldap,
    config: DirectoryConfig,
}

impl std::fmt::Debug for LdapSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LdapSession").finish_non_exhaustive()
    }
}

#[async_trait]
impl DirectorySession for LdapSession {
    #[instrument(skip(self), fields(bind_dn = %self.config.bind_dn))]
    async fn bind(&mut self) -> SyncResult<()> {
        let bind_dn = &self.config.bind_dn;
        let bind_password = self.config.bind_password.as_deref().unwrap_or("");

        debug!("performing simple bind");

        let result = self
            .ldap
            .with_timeout(self.config.connection.read_timeout())
            .simple_bind(bind_dn, bind_password)
            .await
            .map_err(|e| {
                SyncError::bind_failed_with_source(format!("bind failed for {bind_dn}"), e)
            })?;

        if result.rc == RC_INVALID_CREDENTIALS {
            return Err(SyncError::bind_failed(format!(
                "invalid credentials for {bind_dn}"
            )));
        }

        if result.rc != 0 {
            return Err(SyncError::bind_failed(format!(
                "bind rejected with code {}: {}",
                result.rc, result.text
            )));
        }

        info!("bind successful");
        Ok(())
    }

    #[instrument(skip(self), fields(base = %self.config.search_base, filter = %self.config.search_filter))]
    async fn search_users(&mut self) -> SyncResult<Vec<DirectoryEntry>> {
        let mut source = LdapPageSource::new(
            &mut self.ldap,
            &self.config.search_base,
            &self.config.search_filter,
            self.config.page_size,
            self.config.connection.read_timeout(),
        );

        let entries = collect_paged(&mut source).await?;

        info!(entry_count = entries.len(), "directory search complete");
        Ok(entries)
    }

    async fn close(&mut self) {
        if let Err(e) = self.ldap.unbind().await {
            warn!(error = %e, "error during LDAP unbind");
        } else {
            debug!("directory connection released");
        }
    }
}

//! Directory connection configuration
//!
//! Plain and sealed configuration types for one synchronization run.
//! All timeouts are carried per-configuration; nothing here touches
//! process-global state, so concurrent runs against different directories
//! cannot clobber each other's settings.

use serde::{Deserialize, Serialize};

use crate::error::{SyncError, SyncResult};
use crate::secrets::SecretVault;

/// Common connection settings for the directory transport.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConnectionSettings {
    /// Connection timeout in seconds. A hung server cannot stall the run
    /// past this bound.
    #[serde(default = "default_connect_timeout")]
    pub connect_timeout_secs: u64,

    /// Read timeout for individual protocol operations, in seconds.
    #[serde(default = "default_read_timeout")]
    pub read_timeout_secs: u64,
}

fn default_connect_timeout() -> u64 {
    5
}

fn default_read_timeout() -> u64 {
    60
}

impl Default for ConnectionSettings {
    fn default() -> Self {
        Self {
            connect_timeout_secs: default_connect_timeout(),
            read_timeout_secs: default_read_timeout(),
        }
    }
}

impl ConnectionSettings {
    /// Set the connection timeout.
    #[must_use]
    pub fn with_connect_timeout(mut self, secs: u64) -> Self {
        self.connect_timeout_secs = secs;
        self
    }

    /// Get the connection timeout as a Duration.
    pub fn connect_timeout(&self) -> std::time::Duration {
        std::time::Duration::from_secs(self.connect_timeout_secs)
    }

    /// Get the read timeout as a Duration.
    pub fn read_timeout(&self) -> std::time::Duration {
        std::time::Duration::from_secs(self.read_timeout_secs)
    }
}

/// Configuration for one directory synchronization run.
///
/// All values are plaintext after unsealing and are owned by the run
/// invocation; the sync core never persists them.
#[derive(Clone, Serialize, Deserialize)]
pub struct DirectoryConfig {
    /// Directory server URL (e.g., "ldap://dc01.example.com:389" or
    /// "ldaps://dc01.example.com:636").
    pub server_url: String,

    /// Service-account DN for the authenticated bind.
    pub bind_dn: String,

    /// Service-account password.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bind_password: Option<String>,

    /// Base DN under which person entries are searched.
    pub search_base: String,

    /// LDAP filter selecting person entries.
    #[serde(default = "default_search_filter")]
    pub search_filter: String,

    /// Upper bound on entries requested per search page. The server may
    /// return fewer.
    #[serde(default = "default_page_size")]
    pub page_size: u32,

    /// Transport settings (timeouts).
    #[serde(default)]
    pub connection: ConnectionSettings,
}

fn default_search_filter() -> String {
    "(objectClass=person)".to_string()
}

fn default_page_size() -> u32 {
    500
}

impl std::fmt::Debug for DirectoryConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DirectoryConfig")
            .field("server_url", &self.server_url)
            .field("bind_dn", &self.bind_dn)
            .field(
                "bind_password",
                &self.bind_password.as_ref().map(|_| "***REDACTED***"),
            )
            .field("search_base", &self.search_base)
            .field("search_filter", &self.search_filter)
            .field("page_size", &self.page_size)
            .field("connection", &self.connection)
            .finish()
    }
}

impl DirectoryConfig {
    /// Create a new config with required fields and defaults for the rest.
    pub fn new(
        server_url: impl Into<String>,
        search_base: impl Into<String>,
        bind_dn: impl Into<String>,
    ) -> Self {
        Self {
            server_url: server_url.into(),
            bind_dn: bind_dn.into(),
            bind_password: None,
            search_base: search_base.into(),
            search_filter: default_search_filter(),
            page_size: default_page_size(),
            connection: ConnectionSettings::default(),
        }
    }

    /// Set the bind password.
    pub fn with_password(mut self, password: impl Into<String>) -> Self {
        self.bind_password = Some(password.into());
        self
    }

    /// Set the search filter.
    pub fn with_filter(mut self, filter: impl Into<String>) -> Self {
        self.search_filter = filter.into();
        self
    }

    /// Set the per-page entry bound.
    #[must_use]
    pub fn with_page_size(mut self, page_size: u32) -> Self {
        self.page_size = page_size;
        self
    }

    /// Set the connection settings.
    #[must_use]
    pub fn with_connection(mut self, connection: ConnectionSettings) -> Self {
        self.connection = connection;
        self
    }

    /// Validate the configuration.
    pub fn validate(&self) -> SyncResult<()> {
        if self.server_url.is_empty() {
            return Err(SyncError::invalid_configuration("server_url is required"));
        }

        if !self.server_url.starts_with("ldap://") && !self.server_url.starts_with("ldaps://") {
            return Err(SyncError::invalid_configuration(format!(
                "server_url must use the ldap:// or ldaps:// scheme, got '{}'",
                self.server_url
            )));
        }

        if self.bind_dn.is_empty() {
            return Err(SyncError::invalid_configuration("bind_dn is required"));
        }

        if self.search_base.is_empty() {
            return Err(SyncError::invalid_configuration("search_base is required"));
        }

        if self.search_filter.is_empty() {
            return Err(SyncError::invalid_configuration(
                "search_filter is required",
            ));
        }

        if self.page_size == 0 {
            return Err(SyncError::invalid_configuration(
                "page_size must be greater than zero",
            ));
        }

        Ok(())
    }

    /// Create a redacted copy of this config (for logging/display).
    #[must_use]
    pub fn redacted(&self) -> Self {
        let mut config = self.clone();
        if config.bind_password.is_some() {
            config.bind_password = Some("***REDACTED***".to_string());
        }
        config
    }
}

/// The encrypted-at-rest shape of [`DirectoryConfig`].
///
/// Connection parameters are stored as base64 ciphertext produced by a
/// [`SecretVault`]; the search filter is not a secret and stays plaintext.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SealedDirectoryConfig {
    /// Sealed directory server URL.
    pub server_url: String,

    /// Sealed service-account DN.
    pub bind_dn: String,

    /// Sealed service-account password.
    pub bind_password: String,

    /// Sealed search base DN.
    pub search_base: String,

    /// Plaintext search filter.
    #[serde(default = "default_search_filter")]
    pub search_filter: String,

    /// Per-page entry bound.
    #[serde(default = "default_page_size")]
    pub page_size: u32,

    /// Transport settings (timeouts).
    #[serde(default)]
    pub connection: ConnectionSettings,
}

impl SealedDirectoryConfig {
    /// Seal a plaintext config with the given vault.
    pub fn seal(config: &DirectoryConfig, vault: &SecretVault) -> SyncResult<Self> {
        Ok(Self {
            server_url: vault.seal_string(&config.server_url)?,
            bind_dn: vault.seal_string(&config.bind_dn)?,
            bind_password: vault.seal_string(config.bind_password.as_deref().unwrap_or(""))?,
            search_base: vault.seal_string(&config.search_base)?,
            search_filter: config.search_filter.clone(),
            page_size: config.page_size,
            connection: config.connection.clone(),
        })
    }

    /// Decrypt every sealed field, yielding a plaintext config for one run.
    ///
    /// Fails on the first undecryptable field; a partially decrypted config
    /// is never returned.
    pub fn unseal(&self, vault: &SecretVault) -> SyncResult<DirectoryConfig> {
        let password = vault.unseal_string(&self.bind_password)?;

        Ok(DirectoryConfig {
            server_url: vault.unseal_string(&self.server_url)?,
            bind_dn: vault.unseal_string(&self.bind_dn)?,
            bind_password: if password.is_empty() {
                None
            } else {
                Some(password)
            },
            search_base: vault.unseal_string(&self.search_base)?,
            search_filter: self.search_filter.clone(),
            page_size: self.page_size,
            connection: self.connection.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config() -> DirectoryConfig {
        DirectoryConfig::new(
            "ldap://dc01.example.com:389",
            "dc=example,dc=com",
            "cn=svc-sync,dc=example,dc=com",
        )
        .with_password("secret")
    }

    #[test]
    fn test_config_new_defaults() {
        let config = test_config();

        assert_eq!(config.server_url, "ldap://dc01.example.com:389");
        assert_eq!(config.search_base, "dc=example,dc=com");
        assert_eq!(config.search_filter, "(objectClass=person)");
        assert_eq!(config.page_size, 500);
        assert_eq!(config.connection.connect_timeout_secs, 5);
        assert_eq!(config.bind_password, Some("secret".to_string()));
    }

    #[test]
    fn test_config_validation() {
        assert!(test_config().validate().is_ok());

        let empty_url = DirectoryConfig::new("", "dc=example,dc=com", "cn=admin");
        assert!(empty_url.validate().is_err());

        let bad_scheme =
            DirectoryConfig::new("http://dc01.example.com", "dc=example,dc=com", "cn=admin");
        assert!(bad_scheme.validate().is_err());

        let empty_base = DirectoryConfig::new("ldap://dc01.example.com", "", "cn=admin");
        assert!(empty_base.validate().is_err());

        let empty_bind = DirectoryConfig::new("ldap://dc01.example.com", "dc=example,dc=com", "");
        assert!(empty_bind.validate().is_err());

        let mut zero_page = test_config();
        zero_page.page_size = 0;
        assert!(zero_page.validate().is_err());
    }

    #[test]
    fn test_ldaps_scheme_accepted() {
        let config = DirectoryConfig::new(
            "ldaps://dc01.example.com:636",
            "dc=example,dc=com",
            "cn=svc-sync,dc=example,dc=com",
        );
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_redacted() {
        let redacted = test_config().redacted();
        assert_eq!(redacted.bind_password, Some("***REDACTED***".to_string()));
    }

    #[test]
    fn test_debug_redacts_password() {
        let rendered = format!("{:?}", test_config());
        assert!(!rendered.contains("secret"));
        assert!(rendered.contains("***REDACTED***"));
    }

    #[test]
    fn test_config_serialization() {
        let json = serde_json::to_string(&test_config()).unwrap();
        let parsed: DirectoryConfig = serde_json::from_str(&json).unwrap();

        assert_eq!(parsed.server_url, "ldap://dc01.example.com:389");
        assert_eq!(parsed.page_size, 500);
    }

    #[test]
    fn test_seal_unseal_round_trip() {
        let vault = SecretVault::new([7u8; 32]);
        let config = test_config();

        let sealed = SealedDirectoryConfig::seal(&config, &vault).unwrap();
        assert_ne!(sealed.server_url, config.server_url);
        assert_eq!(sealed.search_filter, config.search_filter);

        let unsealed = sealed.unseal(&vault).unwrap();
        assert_eq!(unsealed.server_url, config.server_url);
        assert_eq!(unsealed.bind_dn, config.bind_dn);
        assert_eq!(unsealed.bind_password, config.bind_password);
        assert_eq!(unsealed.search_base, config.search_base);
    }

    #[test]
    fn test_unseal_with_wrong_key_fails() {
        let vault = SecretVault::new([7u8; 32]);
        let other = SecretVault::new([8u8; 32]);

        let sealed = SealedDirectoryConfig::seal(&test_config(), &vault).unwrap();
        assert!(sealed.unseal(&other).is_err());
    }

    #[test]
    fn test_unseal_empty_password_becomes_none() {
        let vault = SecretVault::new([7u8; 32]);
        let mut config = test_config();
        config.bind_password = None;

        let sealed = SealedDirectoryConfig::seal(&config, &vault).unwrap();
        let unsealed = sealed.unseal(&vault).unwrap();
        assert!(unsealed.bind_password.is_none());
    }
}

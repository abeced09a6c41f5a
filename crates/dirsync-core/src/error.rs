//! Error types for directory synchronization
//!
//! Error definitions with transient/permanent classification for callers
//! that schedule re-invocation. The sync core itself never retries.

use thiserror::Error;

/// Error that can occur during a synchronization run.
#[derive(Debug, Error)]
pub enum SyncError {
    // Connection errors (usually transient)
    /// Failed to establish a connection to the directory server.
    #[error("connection failed: {message}")]
    ConnectionFailed {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Connection attempt exceeded the configured timeout.
    #[error("connection timeout after {timeout_secs} seconds")]
    ConnectionTimeout { timeout_secs: u64 },

    // Authentication errors (permanent)
    /// The service-account bind was rejected or failed in transit.
    #[error("bind failed: {message}")]
    BindFailed {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    // Search errors
    /// A search request (or one of its pages) failed. Accumulated pages
    /// are discarded; the run never surfaces a partial entry set.
    #[error("search failed: {message}")]
    SearchFailed {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    // Configuration errors (permanent)
    /// The directory configuration is invalid.
    #[error("invalid configuration: {message}")]
    InvalidConfiguration { message: String },

    // Secret handling errors (permanent)
    /// A sealed configuration value could not be encrypted.
    #[error("encryption failed: {message}")]
    EncryptionFailed { message: String },

    /// A sealed configuration value could not be decrypted.
    #[error("decryption failed: {message}")]
    DecryptionFailed { message: String },
}

impl SyncError {
    /// Check if this error is transient and a later run may succeed.
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            SyncError::ConnectionFailed { .. } | SyncError::ConnectionTimeout { .. }
        )
    }

    /// Check if this error is permanent and re-running won't help without
    /// operator intervention.
    pub fn is_permanent(&self) -> bool {
        !self.is_transient()
    }

    /// Get a stable code for classification and reporting.
    pub fn error_code(&self) -> &'static str {
        match self {
            SyncError::ConnectionFailed { .. } => "CONNECTION_FAILED",
            SyncError::ConnectionTimeout { .. } => "CONNECTION_TIMEOUT",
            SyncError::BindFailed { .. } => "BIND_FAILED",
            SyncError::SearchFailed { .. } => "SEARCH_FAILED",
            SyncError::InvalidConfiguration { .. } => "INVALID_CONFIG",
            SyncError::EncryptionFailed { .. } => "ENCRYPTION_FAILED",
            SyncError::DecryptionFailed { .. } => "DECRYPTION_FAILED",
        }
    }

    // Convenience constructors

    /// Create a connection failed error.
    pub fn connection_failed(message: impl Into<String>) -> Self {
        SyncError::ConnectionFailed {
            message: message.into(),
            source: None,
        }
    }

    /// Create a connection failed error with source.
    pub fn connection_failed_with_source(
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        SyncError::ConnectionFailed {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Create a bind failed error.
    pub fn bind_failed(message: impl Into<String>) -> Self {
        SyncError::BindFailed {
            message: message.into(),
            source: None,
        }
    }

    /// Create a bind failed error with source.
    pub fn bind_failed_with_source(
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        SyncError::BindFailed {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Create a search failed error.
    pub fn search_failed(message: impl Into<String>) -> Self {
        SyncError::SearchFailed {
            message: message.into(),
            source: None,
        }
    }

    /// Create a search failed error with source.
    pub fn search_failed_with_source(
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        SyncError::SearchFailed {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Create an invalid configuration error.
    pub fn invalid_configuration(message: impl Into<String>) -> Self {
        SyncError::InvalidConfiguration {
            message: message.into(),
        }
    }
}

/// Result type for synchronization operations.
pub type SyncResult<T> = Result<T, SyncError>;

//! Error handling for Avatar Studio
//!
//! No error here is fatal: every variant leaves the editor usable and the
//! avatar record unchanged.

use std::path::PathBuf;

use thiserror::Error;

/// Result type alias for Avatar Studio operations
pub type Result<T> = std::result::Result<T, AvatarError>;

/// Main error type for Avatar Studio operations
#[derive(Error, Debug)]
pub enum AvatarError {
    // Feature Errors
    #[error("Value out of domain for '{key}': {reason}")]
    Domain { key: String, reason: String },

    #[error("Unknown feature: {key}")]
    UnknownFeature { key: String },

    // Save/Load Errors
    #[error("Avatar name must not be empty")]
    EmptyName,

    #[error("Saved avatar not found: {id}")]
    NotFound { id: String },

    #[error("Persistence failed: {reason}")]
    Persistence { reason: String },

    #[error("Checksum mismatch for saved avatar {id}")]
    ChecksumMismatch { id: String },

    #[error("Unsupported saved avatar schema version: {version}")]
    InvalidSchemaVersion { version: String },

    #[error("Failed to access {path}: {source}")]
    FileAccess {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // Configuration Errors
    #[error("Failed to parse config: {0}")]
    ConfigParse(String),

    #[error("Invalid configuration value: {field} - {message}")]
    Config { field: String, message: String },

    // I/O Errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    // Serialization Errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl AvatarError {
    /// Shorthand for building a domain error
    pub fn domain(key: impl Into<String>, reason: impl Into<String>) -> Self {
        AvatarError::Domain {
            key: key.into(),
            reason: reason.into(),
        }
    }

    /// Get the error code for this error type
    pub fn error_code(&self) -> &'static str {
        match self {
            AvatarError::Domain { .. } => "DOMAIN_ERROR",
            AvatarError::UnknownFeature { .. } => "UNKNOWN_FEATURE",
            AvatarError::EmptyName => "EMPTY_NAME",
            AvatarError::NotFound { .. } => "NOT_FOUND",
            AvatarError::Persistence { .. } => "PERSISTENCE_ERROR",
            AvatarError::ChecksumMismatch { .. } => "CHECKSUM_MISMATCH",
            AvatarError::InvalidSchemaVersion { .. } => "INVALID_SCHEMA_VERSION",
            AvatarError::FileAccess { .. } => "FILE_ACCESS_ERROR",
            AvatarError::ConfigParse(_) => "CONFIG_PARSE_ERROR",
            AvatarError::Config { .. } => "CONFIG_ERROR",
            AvatarError::Io(_) => "IO_ERROR",
            AvatarError::Serialization(_) => "SERIALIZATION_ERROR",
        }
    }

    /// Check if this error is recovered locally without surfacing to the user
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            AvatarError::Domain { .. } | AvatarError::UnknownFeature { .. } | AvatarError::EmptyName
        )
    }

    /// Whether the error came from the persistence boundary
    pub fn is_persistence(&self) -> bool {
        matches!(
            self,
            AvatarError::NotFound { .. }
                | AvatarError::Persistence { .. }
                | AvatarError::ChecksumMismatch { .. }
                | AvatarError::InvalidSchemaVersion { .. }
                | AvatarError::FileAccess { .. }
                | AvatarError::Io(_)
                | AvatarError::Serialization(_)
        )
    }

    /// Get recovery suggestions for this error
    pub fn recovery_suggestions(&self) -> Vec<&'static str> {
        match self {
            AvatarError::Domain { .. } => vec![
                "The value was rejected and the avatar is unchanged",
                "Use 'avatar-studio defaults' to see every feature and its default",
            ],
            AvatarError::UnknownFeature { .. } => {
                vec!["Check the feature name; names are camelCase (e.g. eyeSize)"]
            }
            AvatarError::EmptyName => vec!["Give the avatar a name before saving"],
            AvatarError::NotFound { .. } => vec![
                "Run 'avatar-studio list' to see saved avatars",
                "The avatar may have been removed from the storage directory",
            ],
            AvatarError::ChecksumMismatch { .. } => vec![
                "The saved file was modified outside Avatar Studio",
                "Save the avatar again to create a fresh copy",
            ],
            AvatarError::Persistence { .. }
            | AvatarError::FileAccess { .. }
            | AvatarError::Io(_) => vec![
                "Your unsaved changes are still in the editor",
                "Check that the storage directory exists and is writable",
            ],
            _ => vec![],
        }
    }
}

//! Error types for Lyricgenre

/// Result type alias using Lyricgenre's Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for Lyricgenre operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The model artifact could not be fetched from its source
    #[error("model artifact unreachable at {source_location}: {reason}")]
    ArtifactUnreachable {
        source_location: String,
        reason: String,
    },

    /// The fetched bytes do not form a usable model artifact
    #[error("model artifact invalid: {0}")]
    ArtifactInvalid(String),

    /// The display image for a predicted label does not exist
    #[error("image asset missing for genre '{label}' at {path}")]
    AssetMissing { label: String, path: String },

    /// Classifier execution errors
    #[error("classifier error: {0}")]
    Classifier(String),

    /// Configuration errors
    #[error("configuration error: {0}")]
    Config(String),

    /// Network/IO errors
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization errors
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Generic internal errors
    #[error("internal error: {0}")]
    Internal(String),
}

impl Error {
    /// Create a new artifact-unreachable error
    pub fn unreachable(source_location: impl Into<String>, reason: impl std::fmt::Display) -> Self {
        Self::ArtifactUnreachable {
            source_location: source_location.into(),
            reason: reason.to_string(),
        }
    }

    /// Create a new artifact-invalid error
    pub fn invalid(msg: impl Into<String>) -> Self {
        Self::ArtifactInvalid(msg.into())
    }

    /// Create a new asset-missing error
    pub fn asset_missing(label: impl Into<String>, path: impl Into<String>) -> Self {
        Self::AssetMissing {
            label: label.into(),
            path: path.into(),
        }
    }

    /// Create a new classifier error
    pub fn classifier(msg: impl Into<String>) -> Self {
        Self::Classifier(msg.into())
    }

    /// Create a new configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create a new internal error
    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    /// Whether this error is fatal to service startup
    pub fn is_startup_fatal(&self) -> bool {
        matches!(
            self,
            Self::ArtifactUnreachable { .. } | Self::ArtifactInvalid(_) | Self::Config(_)
        )
    }
}

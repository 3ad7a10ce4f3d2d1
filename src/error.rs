use thiserror::Error;

/// Unified error type for push-build-info operations
#[derive(Error, Debug)]
pub enum BuildInfoError {
    #[error("Tag {version} not found in the repository. Found tags: {}.", .available.join(", "))]
    TagNotFound {
        version: String,
        tag: String,
        available: Vec<String>,
    },

    #[error("Tag {tag} has no previous release tag to compare against")]
    NoPreviousTag { tag: String },

    #[error("History query failed: {0}")]
    HistoryQuery(String),

    #[error("Remote submission failed: {0}")]
    RemoteSubmission(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("CI context error: {0}")]
    Context(String),

    #[error("Git operation failed: {0}")]
    Git(#[from] git2::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Convenience type alias for Results in push-build-info
pub type Result<T> = std::result::Result<T, BuildInfoError>;

impl BuildInfoError {
    /// Create a history query error with context
    pub fn history(msg: impl Into<String>) -> Self {
        BuildInfoError::HistoryQuery(msg.into())
    }

    /// Create a remote submission error with context
    pub fn remote(msg: impl Into<String>) -> Self {
        BuildInfoError::RemoteSubmission(msg.into())
    }

    /// Create a configuration error with context
    pub fn config(msg: impl Into<String>) -> Self {
        BuildInfoError::Config(msg.into())
    }

    /// Create a CI context error with context
    pub fn context(msg: impl Into<String>) -> Self {
        BuildInfoError::Context(msg.into())
    }
}

impl From<toml::de::Error> for BuildInfoError {
    fn from(err: toml::de::Error) -> Self {
        BuildInfoError::Config(err.to_string())
    }
}

use thiserror::Error;

/// Unified error type for release operations
#[derive(Error, Debug)]
pub enum ReleaseError {
    #[error("Invalid version: {0}")]
    InvalidVersionFormat(String),

    #[error("Expect positive version number, found: {0}")]
    InvalidVersionNumber(i64),

    #[error("No last minor version for major version: {0}")]
    NoPriorMinorVersion(String),

    #[error("Uncommitted local changes are not allowed.")]
    UncommittedChanges,

    #[error("Specified release version ({expected}) mismatches pom version ({actual})")]
    VersionMismatch { expected: String, actual: String },

    #[error("Release version is [{version}], but tag [{tag}] is not found.")]
    TagNotFound { version: String, tag: String },

    #[error("Release version is [{version}], but tag [{tag}] already exists.")]
    TagAlreadyExists { version: String, tag: String },

    #[error("Release {0} is already cut")]
    ReleaseAlreadyCut(String),

    #[error("Release {0} is not cut")]
    ReleaseNotCut(String),

    #[error("Command failed ({status}): {command}\n{stderr}")]
    CommandFailed {
        command: String,
        status: i32,
        stderr: String,
    },

    #[error("No commits found in {0}")]
    NoCommits(String),

    #[error("Manifest error: {0}")]
    Manifest(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("{0}")]
    Github(String),

    #[error("Errors encountered while parsing release notes ({} found)", .0.len())]
    InvalidReleaseNotes(Vec<String>),

    #[error("Git operation failed: {0}")]
    Git(#[from] git2::Error),

    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Configuration parse error: {0}")]
    ConfigParse(#[from] toml::de::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience type alias for Results in release-tools
pub type Result<T> = std::result::Result<T, ReleaseError>;

impl ReleaseError {
    /// Create a manifest error with context
    pub fn manifest(msg: impl Into<String>) -> Self {
        ReleaseError::Manifest(msg.into())
    }

    /// Create a configuration error with context
    pub fn config(msg: impl Into<String>) -> Self {
        ReleaseError::Config(msg.into())
    }

    /// Create a GitHub API error with context
    pub fn github(msg: impl Into<String>) -> Self {
        ReleaseError::Github(msg.into())
    }

    pub fn version_mismatch(expected: impl ToString, actual: impl ToString) -> Self {
        ReleaseError::VersionMismatch {
            expected: expected.to_string(),
            actual: actual.to_string(),
        }
    }

    /// Whether this error was raised by a failing external command.
    pub fn is_command_failure(&self) -> bool {
        matches!(self, ReleaseError::CommandFailed { .. })
    }
}

use std::path::PathBuf;

use thiserror::Error;

/// Result type for the upload pipeline.
pub type Result<T> = std::result::Result<T, Error>;

/// Top-level pipeline error. Callers only need to distinguish the two
/// failure categories; anything else is unexpected and lands in `Other`.
#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Configuration(#[from] ConfigurationError),

    #[error(transparent)]
    Upload(#[from] DocumentUploadError),

    /// Unexpected error with full context chain
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Invalid or missing local input: bad file, bad credentials, bad
/// parameters. Raised before any network activity and never retried.
#[derive(Debug, Error)]
pub enum ConfigurationError {
    #[error("timeout must be at least 1 second")]
    TimeoutTooSmall,

    #[error(
        "credentials file not found: {} (create it with your API key on the first line)",
        path.display()
    )]
    CredentialsNotFound { path: PathBuf },

    #[error("failed to read credentials file {}: {source}", path.display())]
    CredentialsUnreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("API key is empty in credentials file")]
    ApiKeyMissing,

    #[error("API key appears to be invalid (too short)")]
    ApiKeyTooShort,

    #[error("invalid config file {}: {source}", path.display())]
    ConfigFileInvalid {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("file not found: {}", path.display())]
    FileNotFound { path: PathBuf },

    #[error("path is not a regular file: {}", path.display())]
    NotAFile { path: PathBuf },

    #[error("file is not readable: {}: {source}", path.display())]
    FileUnreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("file is empty: {}", path.display())]
    FileEmpty { path: PathBuf },

    #[error("file too large: {size_bytes} bytes (max 104857600 bytes)")]
    FileTooLarge { size_bytes: u64 },

    #[error("{field} must be a non-empty string")]
    EmptyField { field: &'static str },
}

/// Failure during or after the network exchange. Produced only by the
/// uploader; everything upstream fails as [`ConfigurationError`].
#[derive(Debug, Error)]
pub enum DocumentUploadError {
    #[error(
        "upload failed with status {status}: {}",
        detail.as_deref().or(body.as_deref()).unwrap_or("<no response body>")
    )]
    Rejected {
        status: u16,
        /// Detail extracted from a structured (JSON) error body.
        detail: Option<String>,
        /// Raw text body, kept when no structured detail was available.
        body: Option<String>,
    },

    #[error(
        "upload timed out after {timeout_secs} seconds \
         (the file may be too large or the server slow to respond)"
    )]
    Timeout { timeout_secs: u64 },

    #[error("connection error: {0}")]
    Connection(#[source] reqwest::Error),

    #[error("request failed: {0}")]
    Request(#[source] reqwest::Error),

    #[error("malformed success response (status {status}): {source}")]
    MalformedSuccess {
        status: u16,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid upload URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("failed to read document for upload: {0}")]
    Io(#[from] std::io::Error),
}

impl DocumentUploadError {
    /// HTTP status code, when the server produced a response at all.
    pub fn status(&self) -> Option<u16> {
        match self {
            DocumentUploadError::Rejected { status, .. }
            | DocumentUploadError::MalformedSuccess { status, .. } => Some(*status),
            _ => None,
        }
    }
}

//! Error types for sync jobs and their collaborators.

use serde::Serialize;
use std::fmt;
use std::path::PathBuf;

/// Failure reading rows from a record source.
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    #[error("invalid sheet name {0:?}")]
    InvalidName(String),

    #[error("sheet not found: {name} (looked in {dir})")]
    NotFound { name: String, dir: PathBuf },

    #[error("sheet {name} has a duplicate header: {header}")]
    DuplicateHeader { name: String, header: String },

    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {path}: {message}")]
    Malformed { path: PathBuf, message: String },
}

/// Failure loading the credential blob.
#[derive(Debug, thiserror::Error)]
pub enum CredentialsError {
    #[error("credentials file not found: {0}")]
    NotFound(PathBuf),

    #[error("failed to read credentials {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid credentials {path}: {source}")]
    Invalid {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Error codes for programmatic error handling.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    // Credential errors
    CredentialsMissing,
    CredentialsInvalid,

    // Source errors
    SourceInvalidName,
    SourceNotFound,
    SourceUnreadable,

    // Internal errors
    DatabaseError,
    InternalError,
}

/// Which job an error aborted. Selects the user-facing wording.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum JobKind {
    Import,
    Update,
}

impl fmt::Display for JobKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            JobKind::Import => write!(f, "import"),
            JobKind::Update => write!(f, "update"),
        }
    }
}

/// A job-level error: the job aborted before writing anything.
#[derive(Debug, Serialize)]
pub struct SyncError {
    pub code: ErrorCode,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl SyncError {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            details: None,
        }
    }

    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    pub fn credentials(err: &CredentialsError) -> Self {
        let code = match err {
            CredentialsError::NotFound(_) => ErrorCode::CredentialsMissing,
            CredentialsError::Io { .. } | CredentialsError::Invalid { .. } => {
                ErrorCode::CredentialsInvalid
            }
        };
        Self::new(code, err.to_string()).with_details(format!("{:?}", err))
    }

    pub fn source(err: &SourceError) -> Self {
        let code = match err {
            SourceError::InvalidName(_) => ErrorCode::SourceInvalidName,
            SourceError::NotFound { .. } => ErrorCode::SourceNotFound,
            SourceError::DuplicateHeader { .. }
            | SourceError::Io { .. }
            | SourceError::Malformed { .. } => ErrorCode::SourceUnreadable,
        };
        Self::new(code, err.to_string()).with_details(format!("{:?}", err))
    }

    pub fn database(err: impl fmt::Display) -> Self {
        Self::new(ErrorCode::DatabaseError, err.to_string())
    }

    pub fn internal(err: impl fmt::Display) -> Self {
        Self::new(ErrorCode::InternalError, err.to_string())
    }

    /// Message shown to the user. Source failures get a generic line; the
    /// full text goes to the log.
    pub fn user_message(&self, job: JobKind) -> String {
        match self.code {
            ErrorCode::CredentialsMissing | ErrorCode::CredentialsInvalid => {
                "Credentials file not found or invalid. Please refer to the documentation."
                    .to_string()
            }
            _ => match job {
                JobKind::Import => "Pilot sheet import error - see log".to_string(),
                JobKind::Update => "Pilot sheet update error - see log".to_string(),
            },
        }
    }
}

impl fmt::Display for SyncError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for SyncError {}

impl From<anyhow::Error> for SyncError {
    fn from(err: anyhow::Error) -> Self {
        match err.downcast::<SyncError>() {
            Ok(sync_err) => sync_err,
            Err(err) => SyncError::internal(err),
        }
    }
}

/// Result type for sync jobs.
pub type SyncResult<T> = std::result::Result<T, SyncError>;

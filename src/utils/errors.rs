use crate::api::ApiError;
use crate::utils::oauth::AuthError;
use thiserror::Error;

/// Errors surfaced at operation boundaries (login, fetch, analyze, publish).
///
/// Each one is caught where it happened and turned into a single
/// human-readable [`Notice`]; none of them is fatal to the process.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Authorization failed: {0}")]
    Authorization(String),

    #[error("Could not load your saved tracks: {0}")]
    Fetch(String),

    #[error("Could not look up audio features: {0}")]
    FeatureLookup(String),

    #[error("Could not create playlist: {0}")]
    Publish(String),

    #[error("Token storage error: {0}")]
    Storage(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("An analysis is already running")]
    Busy,

    #[error("Analysis cancelled")]
    Cancelled,
}

impl AppError {
    /// Map an API failure into the taxonomy: authorization failures win over
    /// the operation-specific variant.
    pub fn from_api(err: ApiError, wrap: fn(String) -> AppError) -> AppError {
        match err {
            ApiError::Unauthorized { .. } => AppError::Authorization(err.to_string()),
            other => wrap(other.to_string()),
        }
    }

    pub fn is_authorization(&self) -> bool {
        matches!(self, AppError::Authorization(_))
    }

    pub fn severity(&self) -> Severity {
        match self {
            AppError::Cancelled => Severity::Info,
            _ => Severity::Error,
        }
    }
}

impl From<AuthError> for AppError {
    fn from(err: AuthError) -> Self {
        AppError::Authorization(err.to_string())
    }
}

impl From<rusqlite::Error> for AppError {
    fn from(err: rusqlite::Error) -> Self {
        AppError::Storage(err.to_string())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Error,
    Info,
}

/// One line of feedback for the user plus its severity
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub severity: Severity,
    pub message: String,
}

impl Notice {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Info,
            message: message.into(),
        }
    }

    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}

impl From<&AppError> for Notice {
    fn from(err: &AppError) -> Self {
        Self {
            severity: err.severity(),
            message: err.to_string(),
        }
    }
}

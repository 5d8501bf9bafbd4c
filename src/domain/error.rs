// src/domain/error.rs
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DomainError {
    #[error("Please enter some text to analyze")]
    EmptyInput,
    #[error("Tag must not be blank")]
    EmptyTag,
    #[error("Tag not found: {0}")]
    TagNotFound(String),
    #[error("Tag already exists: {0}")]
    DuplicateTag(String),
    #[error("Nothing to export")]
    NothingToExport,
    #[error("Passwords do not match")]
    PasswordMismatch,
    #[error("Missing required field: {0}")]
    MissingField(&'static str),
    #[error("Login required. Run `tagsmith auth login` first")]
    LoginRequired,
    #[error("Monthly limit reached ({used}/{limit}). Upgrade your plan to generate more tags")]
    QuotaExceeded { used: i64, limit: i64 },
    #[error("Session expired, please log in again")]
    SessionExpired,
    #[error("Admin access required")]
    AdminOnly,
    #[error("Clipboard error: {0}")]
    Clipboard(String),
    #[error(transparent)]
    Api(#[from] ApiError),
}

/// Failures reported by the remote services or the transport to them.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ApiError {
    #[error("Unable to reach {service}: {reason}")]
    Unreachable { service: String, reason: String },
    #[error("Unauthorized: {0}")]
    Unauthorized(String),
    #[error("Request rejected ({status}): {message}")]
    Rejected { status: u16, message: String },
    #[error("Tag generation failed: {0}")]
    Generation(String),
    #[error("Unexpected response: {0}")]
    InvalidResponse(String),
}

impl ApiError {
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, ApiError::Unauthorized(_))
    }
}

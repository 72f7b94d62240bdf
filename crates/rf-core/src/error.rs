//! # AppError
//!
//! Centralized error handling for the Rusty-Forum ecosystem.
//! Every use case fails with the first violated condition; nothing here is retried.

use thiserror::Error;

/// Why a raw payload was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationErrorKind {
    /// A required key is absent (or an empty/null text value).
    MissingProperty,
    /// A key is present but holds the wrong kind of value.
    InvalidType,
}

impl ValidationErrorKind {
    fn code(self) -> &'static str {
        match self {
            Self::MissingProperty => "NOT_CONTAIN_NEEDED_PROPERTY",
            Self::InvalidType => "NOT_MEET_DATA_TYPE_SPECIFICATION",
        }
    }
}

/// Payload rejection, rendered as `ENTITY.CODE` (e.g. `DETAIL_COMMENT.NOT_CONTAIN_NEEDED_PROPERTY`).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{entity}.{}", .kind.code())]
pub struct ValidationError {
    pub entity: &'static str,
    pub kind: ValidationErrorKind,
}

impl ValidationError {
    pub fn missing(entity: &'static str) -> Self {
        Self { entity, kind: ValidationErrorKind::MissingProperty }
    }

    pub fn invalid_type(entity: &'static str) -> Self {
        Self { entity, kind: ValidationErrorKind::InvalidType }
    }
}

/// The primary error type for all rf-core operations.
#[derive(Error, Debug)]
pub enum AppError {
    /// Malformed, missing or mistyped payload
    #[error("validation error: {0}")]
    Validation(#[from] ValidationError),

    /// Referenced thread/comment/reply does not exist or is outside the declared scope
    #[error("{0}")]
    NotFound(String),

    /// The actor does not own the record being mutated
    #[error("forbidden: {0}")]
    Forbidden(String),

    /// The owner named by a command is not a registered user
    #[error("{0}")]
    UnknownUser(String),

    /// A unique value (e.g., a username) is already taken
    #[error("conflict: {0}")]
    Conflict(String),

    /// Infrastructure failure (e.g., DB down), propagated unmodified
    #[error(transparent)]
    Storage(#[from] anyhow::Error),
}

impl AppError {
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound(message.into())
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::Forbidden(message.into())
    }

    pub fn unknown_user(message: impl Into<String>) -> Self {
        Self::UnknownUser(message.into())
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        Self::Conflict(message.into())
    }
}

/// A specialized Result type for Rusty-Forum logic.
pub type Result<T> = std::result::Result<T, AppError>;

//! # ApiError
//!
//! Translates use-case failures into the JSON envelope clients see:
//! `{"status": "fail", "message": …}` for caller errors and
//! `{"status": "error", …}` for anything on our side.

use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use rf_core::error::{AppError, ValidationError, ValidationErrorKind};
use serde_json::json;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error(transparent)]
    App(#[from] AppError),

    /// No Bearer access token was sent
    #[error("Missing authentication")]
    Unauthenticated,

    /// The access token failed verification
    #[error("invalid access token")]
    InvalidToken,

    /// Body could not be read as JSON
    #[error("{0}")]
    BadRequest(String),
}

impl From<ValidationError> for ApiError {
    fn from(err: ValidationError) -> Self {
        Self::App(err.into())
    }
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::App(AppError::Validation(_)) | Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::App(AppError::NotFound(_)) => StatusCode::NOT_FOUND,
            Self::App(AppError::Forbidden(_)) => StatusCode::FORBIDDEN,
            Self::App(AppError::Conflict(_)) => StatusCode::CONFLICT,
            Self::App(AppError::Storage(_)) => StatusCode::INTERNAL_SERVER_ERROR,
            // a verified token naming no registered user is as good as no token
            Self::App(AppError::UnknownUser(_)) | Self::Unauthenticated | Self::InvalidToken => {
                StatusCode::UNAUTHORIZED
            }
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();
        let body = match self {
            Self::App(AppError::Storage(err)) => {
                tracing::error!(error = ?err, "storage failure");
                json!({ "status": "error", "message": "internal server error" })
            }
            Self::App(AppError::Validation(err)) => {
                json!({ "status": "fail", "message": describe(err) })
            }
            Self::App(AppError::NotFound(message))
            | Self::App(AppError::Forbidden(message))
            | Self::App(AppError::UnknownUser(message)) => {
                json!({ "status": "fail", "message": message })
            }
            other => json!({ "status": "fail", "message": other.to_string() }),
        };
        HttpResponse::build(status).json(body)
    }
}

/// Human-readable message for a payload rejection.
fn describe(err: &ValidationError) -> String {
    let action = match err.entity {
        "NEW_THREAD" => "cannot create a new thread",
        "NEW_COMMENT" => "cannot create a new comment",
        "NEW_REPLY" => "cannot create a new reply",
        _ => return err.to_string(),
    };
    let reason = match err.kind {
        ValidationErrorKind::MissingProperty => "a required property is missing",
        ValidationErrorKind::InvalidType => "a property has the wrong data type",
    };
    format!("{action} because {reason}")
}

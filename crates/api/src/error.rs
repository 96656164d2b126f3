use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use domain::services::GadgetError;
use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Confirmation mismatch: {0}")]
    ConfirmationMismatch(String),

    /// Failure with a fixed client-facing message; `cause` is only logged.
    #[error("{message}: {cause}")]
    OperationFailed {
        message: &'static str,
        cause: String,
    },

    #[error("Internal error: {0}")]
    Internal(String),
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    error: String,
    message: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_code, message) = match &self {
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, "not_found", msg.clone()),
            ApiError::Validation(msg) => (StatusCode::BAD_REQUEST, "validation_error", msg.clone()),
            ApiError::ConfirmationMismatch(msg) => (
                StatusCode::BAD_REQUEST,
                "confirmation_mismatch",
                msg.clone(),
            ),
            ApiError::OperationFailed { message, cause } => {
                tracing::error!(cause = %cause, "{}", message);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal_error",
                    (*message).to_string(),
                )
            }
            ApiError::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal_error",
                    "An internal error occurred".into(),
                )
            }
        };

        let body = ErrorBody {
            error: error_code.into(),
            message,
        };

        (status, Json(body)).into_response()
    }
}

impl ApiError {
    /// Maps a gadget error, using `failure_message` for persistence failures.
    pub fn from_gadget(err: GadgetError, failure_message: &'static str) -> Self {
        match err {
            GadgetError::Validation(msg) => ApiError::Validation(msg),
            GadgetError::NotFound => ApiError::NotFound("Gadget not found".into()),
            GadgetError::ConfirmationMismatch => {
                ApiError::ConfirmationMismatch("Invalid confirmation code".into())
            }
            GadgetError::Persistence(cause) => ApiError::OperationFailed {
                message: failure_message,
                cause: cause.to_string(),
            },
        }
    }
}

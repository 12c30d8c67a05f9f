use axum::{
    Json,
    extract::rejection::{JsonRejection, PathRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;
use tracing::{debug, error};

use adboard_types::api::{ErrorReason, ErrorResponse, Status};
use adboard_types::validation::FieldError;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("validation failed for {} field(s)", .0.len())]
    Validation(Vec<FieldError>),

    #[error("{0}")]
    BadRequest(String),

    #[error("object not found")]
    NotFound,

    #[error("{0}")]
    Conflict(String),

    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl ApiError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) | ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound => StatusCode::NOT_FOUND,
            ApiError::Conflict(_) => StatusCode::CONFLICT,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Map a store error, turning a UNIQUE violation into a conflict.
    pub fn from_store(err: anyhow::Error, conflict: &str) -> Self {
        if adboard_db::is_unique_violation(&err) {
            ApiError::Conflict(conflict.to_string())
        } else {
            ApiError::Internal(err)
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

// Ids are integers; anything else names no object.
impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        debug!("Rejected path: {}", rejection.body_text());
        ApiError::NotFound
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let reason = match self {
            ApiError::Validation(errors) => ErrorReason::Fields(errors),
            ApiError::Internal(err) => {
                error!("Internal error: {:#}", err);
                ErrorReason::Message("internal server error".to_string())
            }
            other => ErrorReason::Message(other.to_string()),
        };

        let body = ErrorResponse {
            status: Status::Error,
            reason,
        };
        (status, Json(body)).into_response()
    }
}

use axum::{Json, http::StatusCode, response::IntoResponse};
use serde::Serialize;
use sqlx::Error as SqlxError;
use thiserror::Error as ThisError;

/// Application error taxonomy.
///
/// Domain variants (`InvalidInput`, `DuplicateUsername`, `InvalidCredentials`,
/// `NotFound`, `Forbidden`, `StoreIntegrity`) are matched at the handler
/// boundary and converted into a flash message plus redirect. Infrastructure
/// variants escape through `IntoResponse` as a generic failure.
#[derive(Debug, ThisError)]
pub enum DeskError {
    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("username is already taken")]
    DuplicateUsername,

    #[error("invalid username or password")]
    InvalidCredentials,

    #[error("not found")]
    NotFound,

    #[error("{0}")]
    Forbidden(&'static str),

    #[error("store integrity violation: {0}")]
    StoreIntegrity(String),

    #[error("password hash error: {0}")]
    PasswordHash(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("database error: {0}")]
    Database(#[from] SqlxError),
}

impl IntoResponse for DeskError {
    fn into_response(self) -> axum::response::Response {
        let (status, body) = match self {
            DeskError::InvalidInput(msg) => (
                StatusCode::BAD_REQUEST,
                ApiErrorBody {
                    code: "INVALID_INPUT",
                    message: msg,
                },
            ),
            DeskError::DuplicateUsername => (
                StatusCode::CONFLICT,
                ApiErrorBody {
                    code: "DUPLICATE_USERNAME",
                    message: "Username is already taken.".to_string(),
                },
            ),
            DeskError::InvalidCredentials => (
                StatusCode::UNAUTHORIZED,
                ApiErrorBody {
                    code: "INVALID_CREDENTIALS",
                    message: "Invalid username or password.".to_string(),
                },
            ),
            DeskError::NotFound => (
                StatusCode::NOT_FOUND,
                ApiErrorBody {
                    code: "NOT_FOUND",
                    message: "The requested resource does not exist.".to_string(),
                },
            ),
            DeskError::Forbidden(msg) => (
                StatusCode::FORBIDDEN,
                ApiErrorBody {
                    code: "FORBIDDEN",
                    message: msg.to_string(),
                },
            ),
            DeskError::StoreIntegrity(msg) => (
                StatusCode::CONFLICT,
                ApiErrorBody {
                    code: "INTEGRITY_VIOLATION",
                    message: msg,
                },
            ),
            DeskError::PasswordHash(_) | DeskError::Json(_) | DeskError::Database(_) => {
                tracing::error!(error = %self, "request failed with internal error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ApiErrorBody {
                        code: "INTERNAL_ERROR",
                        message: "An internal server error occurred.".to_string(),
                    },
                )
            }
        };
        (status, Json(ApiErrorResponse { error: body })).into_response()
    }
}

/// Standardized API error response body
#[derive(Serialize)]
pub struct ApiErrorBody {
    pub code: &'static str,
    pub message: String,
}

#[derive(Serialize)]
pub struct ApiErrorResponse {
    pub error: ApiErrorBody,
}

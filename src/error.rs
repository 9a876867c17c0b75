use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{error, warn};

use crate::db::DbError;

/// JSON body of every error response.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}

/// Why a credential check failed. Unknown accounts and wrong passwords are
/// reported with different status codes on the login route.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthFailure {
    UnknownAccount,
    BadPassword,
    MissingToken,
    InvalidToken,
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error("{0}")]
    Validation(String),
    #[error("{0}")]
    Conflict(String),
    #[error("{0}")]
    NotFound(String),
    #[error("unauthorized: {0:?}")]
    Unauthorized(AuthFailure),
    #[error("upstream failure: {0}")]
    Upstream(String),
    #[error(transparent)]
    Unexpected(#[from] anyhow::Error),
}

pub type AppResult<T> = Result<T, AppError>;

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Validation(_) | AppError::Conflict(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Unauthorized(AuthFailure::UnknownAccount) => StatusCode::NOT_FOUND,
            AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::Upstream(_) => StatusCode::BAD_GATEWAY,
            AppError::Unexpected(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Message shown to the caller. Upstream and unexpected failures never
    /// leak their cause.
    pub fn public_message(&self) -> String {
        match self {
            AppError::Validation(msg) | AppError::Conflict(msg) | AppError::NotFound(msg) => {
                msg.clone()
            }
            AppError::Unauthorized(AuthFailure::UnknownAccount | AuthFailure::BadPassword) => {
                "Invalid credentials".into()
            }
            AppError::Unauthorized(AuthFailure::MissingToken) => {
                "Missing Authorization header".into()
            }
            AppError::Unauthorized(AuthFailure::InvalidToken) => {
                "Invalid or expired token".into()
            }
            AppError::Upstream(_) => "Weather data unavailable".into(),
            AppError::Unexpected(_) => "Internal server error".into(),
        }
    }

    /// Maps a persistence failure, using `not_found` as the message for a
    /// missing row.
    pub fn from_db(err: DbError, not_found: &str) -> Self {
        match err {
            DbError::NotFound => AppError::NotFound(not_found.to_string()),
            DbError::Conflict(msg) => AppError::Conflict(msg),
            DbError::Constraint(msg) => AppError::Validation(msg),
            DbError::Other(e) => AppError::Unexpected(e),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            error!(error = %self, %status, "request failed");
        } else {
            warn!(error = %self, %status, "request rejected");
        }
        (
            status,
            Json(ErrorBody {
                error: self.public_message(),
            }),
        )
            .into_response()
    }
}

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error(transparent)]
    Domain(#[from] lectern_shared::Error),

    /// No usable session, or rejected credentials.
    #[error("{0}")]
    Unauthorized(String),

    #[error("Admin privileges required")]
    Forbidden,

    #[error("Internal server error")]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    pub fn unauthorized() -> Self {
        AppError::Unauthorized("Authentication required".to_owned())
    }

    pub fn status(&self) -> StatusCode {
        use lectern_shared::Error;

        match self {
            AppError::Domain(Error::Validate(_)) | AppError::Domain(Error::User(_)) => {
                StatusCode::UNPROCESSABLE_ENTITY
            }
            AppError::Domain(Error::NotFound(_)) => StatusCode::NOT_FOUND,
            AppError::Domain(Error::Forbidden) | AppError::Forbidden => StatusCode::FORBIDDEN,
            AppError::Domain(Error::Unavailable(_)) => StatusCode::SERVICE_UNAVAILABLE,
            AppError::Domain(Error::Server(_)) | AppError::Domain(Error::Unknown(_)) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
            AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let retryable = status == StatusCode::SERVICE_UNAVAILABLE;

        let message = if status == StatusCode::INTERNAL_SERVER_ERROR {
            tracing::error!(error = ?self, "request failed");
            "Internal server error".to_owned()
        } else {
            if retryable {
                tracing::warn!(error = %self, "dependency unavailable");
            }
            self.to_string()
        };

        (
            status,
            Json(json!({ "error": message, "retryable": retryable })),
        )
            .into_response()
    }
}

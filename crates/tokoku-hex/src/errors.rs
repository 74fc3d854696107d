use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use thiserror::Error;
use tokoku_types::ports::region_directory::RegionError;
use tokoku_types::ports::transaction_repository::CheckoutError;
use tokoku_types::ports::RepoError;

use crate::inbound::http::response::Envelope;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    /// The region API could not be reached or answered garbage.
    #[error("Bad gateway: {0}")]
    BadGateway(String),

    #[error("Internal error")]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::Forbidden(_) => StatusCode::FORBIDDEN,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::BadGateway(_) => StatusCode::BAD_GATEWAY,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Detail shown to the client; internal causes stay in the logs.
    fn detail(&self) -> String {
        match self {
            AppError::BadRequest(m)
            | AppError::Unauthorized(m)
            | AppError::Forbidden(m)
            | AppError::NotFound(m)
            | AppError::Conflict(m)
            | AppError::BadGateway(m) => m.clone(),
            AppError::Internal(_) => "internal error".into(),
        }
    }

    pub fn bad_request(e: impl std::fmt::Display) -> Self {
        AppError::BadRequest(e.to_string())
    }
}

impl From<RepoError> for AppError {
    fn from(e: RepoError) -> Self {
        match e {
            RepoError::Conflict(m) => AppError::Conflict(m),
            RepoError::DbError(m) => AppError::Internal(anyhow::anyhow!(m)),
        }
    }
}

impl From<CheckoutError> for AppError {
    fn from(e: CheckoutError) -> Self {
        match e {
            CheckoutError::ProductNotFound(_) => AppError::NotFound(e.to_string()),
            CheckoutError::OwnProduct(_) => {
                AppError::BadRequest("cannot buy a product from your own toko".into())
            }
            CheckoutError::InsufficientStock { .. } => AppError::Conflict(e.to_string()),
            CheckoutError::Repo(inner) => inner.into(),
        }
    }
}

impl From<RegionError> for AppError {
    fn from(e: RegionError) -> Self {
        AppError::BadGateway(e.to_string())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let code = self.status();
        if code.is_server_error() {
            tracing::error!(status = %code, error = ?self, "request failed");
        } else {
            tracing::warn!(status = %code, error = %self, "request rejected");
        }

        let message = code
            .canonical_reason()
            .unwrap_or("Request failed")
            .to_string();
        let body = Envelope::<()>::failure(message, vec![self.detail()]);
        (code, Json(body)).into_response()
    }
}

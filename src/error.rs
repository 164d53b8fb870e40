use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Validation error: {0}")]
    Validation(String),
    #[error("Trading is not unlocked for this account")]
    NotUnlocked,
    #[error("Invalid unlock code")]
    InvalidCode,
    #[error("This code has already been used")]
    CodeAlreadyUsed,
    #[error("Not found: {0}")]
    NotFound(String),
    #[error("Store unavailable: {0}")]
    StoreUnavailable(String),
    #[error("Trade execution failed: {0}")]
    TradeExecutionFailed(String),
}

impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        // Every store failure is surfaced as retryable; the caller retries
        // the whole operation rather than resuming mid-way.
        AppError::StoreUnavailable(err.to_string())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, retryable) = match &self {
            AppError::Validation(_) => (StatusCode::BAD_REQUEST, false),
            AppError::NotUnlocked => (StatusCode::FORBIDDEN, false),
            AppError::InvalidCode => (StatusCode::BAD_REQUEST, false),
            AppError::CodeAlreadyUsed => (StatusCode::CONFLICT, false),
            AppError::NotFound(_) => (StatusCode::NOT_FOUND, false),
            AppError::StoreUnavailable(_) => (StatusCode::SERVICE_UNAVAILABLE, true),
            AppError::TradeExecutionFailed(_) => (StatusCode::INTERNAL_SERVER_ERROR, false),
        };

        let body = Json(json!({
            "error": self.to_string(),
            "retryable": retryable,
        }));

        (status, body).into_response()
    }
}

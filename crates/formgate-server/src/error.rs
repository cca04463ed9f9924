//! HTTP error mapping

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use formgate::SubmitError;
use serde_json::json;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Submit(#[from] SubmitError),
}

impl ApiError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Submit(SubmitError::Rejected(_)) => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::Submit(SubmitError::Unavailable(_)) => StatusCode::SERVICE_UNAVAILABLE,
            ApiError::Submit(SubmitError::Internal(_)) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn kind(&self) -> &'static str {
        match self {
            ApiError::Submit(SubmitError::Rejected(_)) => "rejected",
            ApiError::Submit(SubmitError::Unavailable(_)) => "unavailable",
            ApiError::Submit(SubmitError::Internal(_)) => "internal",
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(error = %self, "submit handler failed");
        } else {
            tracing::warn!(error = %self, "submission rejected");
        }

        let body = json!({
            "error": self.to_string(),
            "kind": self.kind(),
        });
        (status, Json(body)).into_response()
    }
}

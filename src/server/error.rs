//! HTTP error mapping

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;

use crate::submission::LocalizedFieldError;

/// API error response body
#[derive(Serialize)]
pub struct ApiError {
    pub error: String,
    pub code: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub fields: Vec<LocalizedFieldError>,
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error("{0}")]
    BadRequest(String),
    #[error("submission rejected")]
    Validation(Vec<LocalizedFieldError>),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let message = self.to_string();
        let (status, code, fields) = match self {
            AppError::BadRequest(_) => (StatusCode::BAD_REQUEST, "BAD_REQUEST", Vec::new()),
            AppError::Validation(fields) => {
                (StatusCode::UNPROCESSABLE_ENTITY, "VALIDATION_FAILED", fields)
            }
        };

        (
            status,
            Json(ApiError {
                error: message,
                code: code.to_string(),
                fields,
            }),
        )
            .into_response()
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::BadRequest(format!("JSON error: {err}"))
    }
}

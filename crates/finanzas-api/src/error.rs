//! Error types for finanzas-api

use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use finanzas_core::{CoreError, ErrorCode};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Not found: {resource}")]
    NotFound { resource: String },

    #[error("Bad request: {message}")]
    BadRequest { message: String },

    #[error(transparent)]
    Core(#[from] CoreError),
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::BadRequest {
            message: rejection.body_text(),
        }
    }
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::NotFound { .. } => StatusCode::NOT_FOUND,
            ApiError::BadRequest { .. } => StatusCode::BAD_REQUEST,
            ApiError::Core(e) => match e.code() {
                ErrorCode::InvalidMonth | ErrorCode::ValidationError => StatusCode::BAD_REQUEST,
                ErrorCode::NotLoaded => StatusCode::SERVICE_UNAVAILABLE,
                _ => StatusCode::INTERNAL_SERVER_ERROR,
            },
        }
    }

    /// JSON error body
    pub fn to_body(&self) -> serde_json::Value {
        match self {
            ApiError::NotFound { .. } => serde_json::json!({
                "code": "NOT_FOUND",
                "message": self.to_string(),
            }),
            ApiError::BadRequest { .. } => serde_json::json!({
                "code": "BAD_REQUEST",
                "message": self.to_string(),
            }),
            ApiError::Core(e) => serde_json::to_value(e.to_details()).unwrap_or_default(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            log::error!("{}", self);
        } else {
            log::debug!("Rejected request: {}", self);
        }
        (status, Json(self.to_body())).into_response()
    }
}

pub type ApiResult<T> = Result<T, ApiError>;

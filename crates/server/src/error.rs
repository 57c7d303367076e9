//! HTTP error responses

use crate::types::ErrorResponse;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;

/// Message returned when either name field is missing
pub const MISSING_NAME_MESSAGE: &str = "Please provide a first name and a last name.";

/// Errors a handler can return
#[derive(Debug)]
pub enum AppError {
    /// 400 with a message for the client
    BadRequest(String),
}

impl AppError {
    /// The error for a form without both names
    pub fn missing_name() -> Self {
        Self::BadRequest(MISSING_NAME_MESSAGE.to_string())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            Self::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
        };

        (status, Json(ErrorResponse { error: message })).into_response()
    }
}

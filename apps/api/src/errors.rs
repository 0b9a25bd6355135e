use std::any::Any;

use axum::{
    body::Body,
    extract::rejection::JsonRejection,
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::applications::repository::RepositoryError;
use crate::applications::validation::FieldError;

pub const INTERNAL_ERROR_MESSAGE: &str = "An internal server error occurred";

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
///
/// Only three outcomes reach the client: 400 with field errors, 404 with a
/// plain message, or an opaque 500. Anything else is logged and folded into
/// the 500.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation failed: {} field error(s)", .0.len())]
    Validation(Vec<FieldError>),

    #[error("Repository error: {0}")]
    Repository(#[from] RepositoryError),
}

impl AppError {
    pub fn application_not_found(id: i64) -> Self {
        AppError::NotFound(format!("Job application with ID {id} not found"))
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::Validation(vec![FieldError::new("body", rejection.body_text())])
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match self {
            AppError::NotFound(msg) => plain_text(StatusCode::NOT_FOUND, msg),
            AppError::Validation(fields) => {
                let body = Json(json!({
                    "error": {
                        "code": "VALIDATION_ERROR",
                        "message": "One or more validation errors occurred",
                        "fields": fields
                    }
                }));
                (StatusCode::BAD_REQUEST, body).into_response()
            }
            AppError::Repository(e) => {
                tracing::error!("Repository error: {e}");
                internal_error()
            }
        }
    }
}

fn plain_text(status: StatusCode, message: String) -> Response {
    (
        status,
        [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
        message,
    )
        .into_response()
}

fn internal_error() -> Response {
    plain_text(
        StatusCode::INTERNAL_SERVER_ERROR,
        INTERNAL_ERROR_MESSAGE.to_string(),
    )
}

/// Panic handler for `CatchPanicLayer`: log the payload, answer with the same
/// opaque 500 as any other internal failure.
pub fn handle_panic(payload: Box<dyn Any + Send + 'static>) -> Response<Body> {
    let detail = if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else {
        "unknown panic payload".to_string()
    };
    tracing::error!("Handler panicked: {detail}");
    internal_error()
}

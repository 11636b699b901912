use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use crate::flash;

/// Infrastructure failures. Form validation is not an error: handlers answer
/// those inline with a flash message and a redirect back to the form.
#[derive(Debug)]
pub enum AppError {
    Unauthorized,
    Internal(String),
    Database(sqlx::Error),
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AppError::Unauthorized => write!(f, "Unauthorized"),
            AppError::Internal(msg) => write!(f, "Internal Error: {msg}"),
            AppError::Database(err) => write!(f, "Database Error: {err}"),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match self {
            AppError::Unauthorized => StatusCode::UNAUTHORIZED.into_response(),
            AppError::Internal(msg) => {
                tracing::error!("Internal error: {msg}");
                flash::error_redirect("Something went wrong", "/")
            }
            AppError::Database(err) => {
                tracing::error!("Database error: {err}");
                flash::error_redirect("Something went wrong", "/")
            }
        }
    }
}

impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        AppError::Database(err)
    }
}

use std::fmt::{Debug, Display};

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use chrono::Utc;
use color_eyre::Report;
use forms::ValidationErrors;
use serde::Serialize;

/// A handler failure: the underlying report plus the status to answer with.
pub struct ServerError(pub(crate) Report, pub(crate) StatusCode);

impl ServerError {
    pub fn new(status: StatusCode, message: impl Display + Send + Sync + 'static) -> Self {
        Self(color_eyre::eyre::eyre!("{message}"), status)
    }

    pub fn not_found(message: &'static str) -> Self {
        Self::new(StatusCode::NOT_FOUND, message)
    }

    pub fn bad_request(message: impl Display + Send + Sync + 'static) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    pub fn status(&self) -> StatusCode {
        self.1
    }
}

impl Display for ServerError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.1, self.0)
    }
}

impl Debug for ServerError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_fmt(format_args!("Status Code: {}\n", self.1))?;

        Debug::fmt(&self.0, f)
    }
}

/// JSON error body shared by every API route.
#[derive(Debug, Serialize)]
pub(crate) struct ErrorBody {
    pub status: u16,
    pub error: &'static str,
    pub message: String,
    pub timestamp: chrono::DateTime<Utc>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<String>,
}

impl ServerError {
    pub(crate) fn body(&self) -> ErrorBody {
        let errors = self
            .0
            .downcast_ref::<ValidationErrors>()
            .map(|v| v.iter().map(|e| e.message.clone()).collect())
            .unwrap_or_default();

        let message = if self.1.is_server_error() {
            "Something went wrong on our end".to_string()
        } else {
            self.0.to_string()
        };

        ErrorBody {
            status: self.1.as_u16(),
            error: self.1.canonical_reason().unwrap_or("Unknown"),
            message,
            timestamp: Utc::now(),
            errors,
        }
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        if self.1.is_server_error() {
            sentry::capture_error(&*self.0);
            tracing::error!(error = ?self, "Request failed");
        } else {
            tracing::info!(status = %self.1, message = %self.0, "Request rejected");
        }

        (self.1, Json(self.body())).into_response()
    }
}

impl<E> From<E> for ServerError
where
    E: Into<Report>,
{
    fn from(err: E) -> Self {
        ServerError(err.into(), StatusCode::INTERNAL_SERVER_ERROR)
    }
}

/// Attaches a status code to any error on its way out of a handler.
pub trait WithStatus<T> {
    fn with_status(self, status: StatusCode) -> Result<T, ServerError>;
}

impl<T, E> WithStatus<T> for Result<T, E>
where
    E: Into<Report>,
{
    fn with_status(self, status: StatusCode) -> Result<T, ServerError> {
        self.map_err(|e| ServerError(e.into(), status))
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn client_errors_keep_their_message() {
        let body = ServerError::not_found("Recipe not found").body();

        assert_eq!(body.status, 404);
        assert_eq!(body.error, "Not Found");
        assert_eq!(body.message, "Recipe not found");
        assert!(body.errors.is_empty());
    }

    #[test]
    fn server_errors_hide_details() {
        let err: ServerError = color_eyre::eyre::eyre!("connection refused").into();
        let body = err.body();

        assert_eq!(body.status, 500);
        assert!(!body.message.contains("connection refused"));
    }

    #[test]
    fn validation_errors_list_every_message() {
        let mut errors = ValidationErrors::new();
        errors.add("title", "Title is required");
        errors.add("content", "Content is required");

        let err = Err::<(), _>(errors)
            .with_status(StatusCode::BAD_REQUEST)
            .unwrap_err();
        let body = err.body();

        assert_eq!(body.status, 400);
        assert_eq!(body.errors, vec!["Title is required", "Content is required"]);
    }
}

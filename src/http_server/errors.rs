//! # HTTP Errors
//!
//! Maps record and view failures onto status codes and a small HTML error
//! page. Store failures are logged in full and reach the client only as a
//! generic message.

use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};
use thiserror::Error;
use tracing::{error, warn};

use crate::records::RecordError;
use crate::views::ViewError;

/// Result type for handlers
pub type HttpResult<T> = Result<T, HttpError>;

/// Handler errors
#[derive(Debug, Error)]
pub enum HttpError {
    // ==================
    // Client Errors (4xx)
    // ==================
    /// Path id that can never match a row
    #[error("{entity} {id} not found")]
    InvalidId { entity: &'static str, id: String },

    /// Malformed query string
    #[error("Bad request: {0}")]
    BadRequest(String),

    // ==================
    // Record layer
    // ==================
    #[error(transparent)]
    Record(#[from] RecordError),

    // ==================
    // Server Errors (5xx)
    // ==================
    #[error(transparent)]
    View(#[from] ViewError),
}

impl HttpError {
    /// Get HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            HttpError::InvalidId { .. } => StatusCode::NOT_FOUND,
            HttpError::BadRequest(_) => StatusCode::BAD_REQUEST,
            HttpError::Record(RecordError::NotFound { .. }) => StatusCode::NOT_FOUND,
            HttpError::Record(RecordError::Validation(_)) => StatusCode::BAD_REQUEST,
            HttpError::Record(RecordError::Store(_)) => StatusCode::INTERNAL_SERVER_ERROR,
            HttpError::Record(RecordError::Association { .. }) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
            HttpError::View(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Message safe to show to the client
    pub fn public_message(&self) -> String {
        match self {
            HttpError::Record(RecordError::Association { .. }) => {
                "The customer could not be linked to the selected employees. Nothing was saved."
                    .to_string()
            }
            err if err.status_code().is_server_error() => {
                "Something went wrong. Please try again later.".to_string()
            }
            err => err.to_string(),
        }
    }
}

impl IntoResponse for HttpError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        if status.is_server_error() {
            error!(error = %self, status = status.as_u16(), "request failed");
        } else {
            warn!(error = %self, status = status.as_u16(), "request rejected");
        }

        let body = error_page(status, &self.public_message());
        (status, Html(body)).into_response()
    }
}

fn error_page(status: StatusCode, message: &str) -> String {
    let title = status.canonical_reason().unwrap_or("Error");
    format!(
        "<!DOCTYPE html>\n<html lang=\"en\">\n<head><meta charset=\"utf-8\"><title>{title}</title></head>\n\
         <body>\n<h1>{code} {title}</h1>\n<p>{message}</p>\n<p><a href=\"/\">Home</a></p>\n</body>\n</html>\n",
        title = title,
        code = status.as_u16(),
        message = handlebars::html_escape(message),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::records::ValidationErrors;

    #[test]
    fn test_status_codes() {
        assert_eq!(
            HttpError::from(RecordError::not_found("customer", 1)).status_code(),
            StatusCode::NOT_FOUND
        );
        let mut errors = ValidationErrors::new();
        errors.push("rating", "is required");
        assert_eq!(
            HttpError::from(RecordError::from(errors)).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            HttpError::from(RecordError::Store(sqlx::Error::PoolTimedOut)).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            HttpError::InvalidId {
                entity: "employee",
                id: "abc".to_string()
            }
            .status_code(),
            StatusCode::NOT_FOUND
        );
    }

    #[test]
    fn test_store_details_stay_private() {
        let err = HttpError::from(RecordError::Store(sqlx::Error::Protocol(
            "secret table layout".to_string(),
        )));
        assert!(!err.public_message().contains("secret"));
    }

    #[test]
    fn test_association_failure_is_distinct() {
        let err = HttpError::from(RecordError::Association {
            source: sqlx::Error::PoolClosed,
        });
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert!(err.public_message().contains("Nothing was saved"));
    }

    #[test]
    fn test_error_page_escapes() {
        let page = error_page(StatusCode::BAD_REQUEST, "<b>bad</b>");
        assert!(page.contains("400 Bad Request"));
        assert!(page.contains("&lt;b&gt;bad&lt;/b&gt;"));
    }
}

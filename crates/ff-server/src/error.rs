//! Error-to-HTTP response conversion.
//!
//! [`AppError`] wraps [`ff_core::Error`] so JSON route handlers can return
//! `Result<T, AppError>` and use `?` on catalog operations.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;

use crate::middleware::request_id;

/// Wrapper so we can implement `IntoResponse` for an external type.
pub struct AppError {
    inner: ff_core::Error,
}

impl AppError {
    pub fn new(inner: ff_core::Error) -> Self {
        Self { inner }
    }

    pub fn status(&self) -> StatusCode {
        StatusCode::from_u16(self.inner.http_status()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
    }
}

impl From<ff_core::Error> for AppError {
    fn from(e: ff_core::Error) -> Self {
        Self::new(e)
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();

        if status.is_server_error() {
            tracing::error!(
                status = %status,
                error = %self.inner,
                "Server error in API handler"
            );
        }

        let body = json!({
            "error": self.inner.to_string(),
            "code": self.inner.code(),
            "request_id": request_id::current(),
        });

        (status, axum::Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_produces_404() {
        let err = AppError::new(ff_core::Error::not_found("book", 9));
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn validation_produces_400() {
        let err = AppError::new(ff_core::Error::Validation("bad id".into()));
        assert_eq!(err.into_response().status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn database_produces_500() {
        let err = AppError::new(ff_core::Error::database("locked"));
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}

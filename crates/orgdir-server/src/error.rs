//! Mapping of directory failures onto HTTP responses.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use orgdir_core::{DirectoryError, ErrorKind};
use serde_json::json;
use std::time::Duration;

#[derive(Debug)]
pub enum AppError {
    Directory(DirectoryError),
    Timeout(Duration),
}

impl From<DirectoryError> for AppError {
    fn from(err: DirectoryError) -> Self {
        AppError::Directory(err)
    }
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Directory(err) => match err.kind() {
                ErrorKind::Conflict | ErrorKind::Validation => StatusCode::BAD_REQUEST,
                ErrorKind::NotFound => StatusCode::NOT_FOUND,
                ErrorKind::StorageConstraint | ErrorKind::Unexpected => {
                    StatusCode::INTERNAL_SERVER_ERROR
                }
            },
            AppError::Timeout(_) => StatusCode::SERVICE_UNAVAILABLE,
        }
    }

    /// Client-facing message. Storage and unexpected failures never leak
    /// their internal text.
    pub fn detail(&self) -> String {
        match self {
            AppError::Directory(err) if err.kind().is_internal() => {
                "internal server error".to_string()
            }
            AppError::Directory(err) => err.to_string(),
            AppError::Timeout(_) => "request deadline exceeded".to_string(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        match &self {
            AppError::Directory(err) if err.kind().is_internal() => {
                tracing::error!(error = %err, kind = ?err.kind(), "request failed");
            }
            AppError::Timeout(limit) => {
                tracing::warn!(timeout_ms = limit.as_millis() as u64, "request deadline exceeded");
            }
            AppError::Directory(_) => {}
        }
        (status, Json(json!({ "detail": self.detail() }))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kinds_map_to_status_codes() {
        let cases = [
            (DirectoryError::Conflict("Acme".into()), StatusCode::BAD_REQUEST),
            (DirectoryError::NestingTooDeep { max: 3 }, StatusCode::BAD_REQUEST),
            (DirectoryError::NotFound("x".into()), StatusCode::NOT_FOUND),
            (
                DirectoryError::StorageConstraint("fk".into()),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
            (
                DirectoryError::Unexpected("boom".into()),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];
        for (err, status) in cases {
            assert_eq!(AppError::from(err).status(), status);
        }
        assert_eq!(
            AppError::Timeout(Duration::from_millis(5)).status(),
            StatusCode::SERVICE_UNAVAILABLE
        );
    }

    #[test]
    fn internal_errors_are_masked() {
        let err = AppError::from(DirectoryError::StorageConstraint(
            "violates foreign key constraint \"organizations_building_id_fkey\"".into(),
        ));
        assert_eq!(err.detail(), "internal server error");

        let err = AppError::from(DirectoryError::Conflict("Acme".into()));
        assert_eq!(err.detail(), "Organization Acme already exists");
    }
}

//! Error types for the content layer
//!
//! Provides unified error handling using thiserror.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

// == Content Error Enum ==
/// Failures surfaced by content reads, ledger writes and sync.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ContentError {
    /// The backend call itself failed
    #[error("Backend unavailable: {0}")]
    RemoteUnavailable(String),

    /// A single-row lookup returned nothing
    #[error("Not found: {0}")]
    NotFound(String),

    /// Caller-supplied filters, cursors or versions were rejected
    #[error("Malformed parameters: {0}")]
    MalformedParameters(String),
}

impl ContentError {
    /// HTTP status matching the error kind.
    pub fn status_code(&self) -> StatusCode {
        match self {
            ContentError::RemoteUnavailable(_) => StatusCode::BAD_GATEWAY,
            ContentError::NotFound(_) => StatusCode::NOT_FOUND,
            ContentError::MalformedParameters(_) => StatusCode::BAD_REQUEST,
        }
    }
}

// == Result Type Alias ==
/// Convenience Result type for the content layer.
pub type Result<T> = std::result::Result<T, ContentError>;

// == Content Result ==
/// Outcome shape handed to callers of the content service.
///
/// Exactly one of `data` and `error` is set, and `success` tells which.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ContentResult<T> {
    pub data: Option<T>,
    pub error: Option<String>,
    pub success: bool,
    /// Error kind, kept off the wire
    #[serde(skip)]
    pub kind: Option<ContentError>,
}

impl<T> ContentResult<T> {
    pub fn ok(data: T) -> Self {
        Self {
            data: Some(data),
            error: None,
            success: true,
            kind: None,
        }
    }

    pub fn failure(err: ContentError) -> Self {
        Self {
            data: None,
            error: Some(err.to_string()),
            success: false,
            kind: Some(err),
        }
    }

    /// Converts back into a plain `Result`.
    pub fn into_result(self) -> Result<T> {
        match (self.data, self.kind) {
            (Some(data), None) => Ok(data),
            (_, Some(err)) => Err(err),
            (None, None) => Err(ContentError::NotFound("empty result".to_string())),
        }
    }
}

impl<T> From<Result<T>> for ContentResult<T> {
    fn from(result: Result<T>) -> Self {
        match result {
            Ok(data) => Self::ok(data),
            Err(err) => Self::failure(err),
        }
    }
}

// == IntoResponse Implementation ==
impl IntoResponse for ContentError {
    fn into_response(self) -> Response {
        ContentResult::<()>::failure(self).into_response()
    }
}

impl<T: Serialize> IntoResponse for ContentResult<T> {
    fn into_response(self) -> Response {
        let status = self
            .kind
            .as_ref()
            .map(ContentError::status_code)
            .unwrap_or(StatusCode::OK);

        (status, Json(self)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_success_shape() {
        let result = ContentResult::from(Ok::<_, ContentError>(vec![1, 2]));
        let json = serde_json::to_value(&result).unwrap();

        assert_eq!(json["success"], true);
        assert_eq!(json["data"], serde_json::json!([1, 2]));
        assert!(json["error"].is_null());
        assert!(json.get("kind").is_none());
    }

    #[test]
    fn test_failure_shape() {
        let result: ContentResult<u32> =
            Err(ContentError::RemoteUnavailable("timeout".to_string())).into();
        let json = serde_json::to_value(&result).unwrap();

        assert_eq!(json["success"], false);
        assert!(json["data"].is_null());
        assert_eq!(json["error"], "Backend unavailable: timeout");
    }

    #[test]
    fn test_into_result_roundtrip_keeps_kind() {
        let result: ContentResult<u32> = ContentResult::failure(ContentError::NotFound("lesson 9".into()));
        assert_eq!(
            result.into_result(),
            Err(ContentError::NotFound("lesson 9".into()))
        );
    }

    #[test]
    fn test_status_codes() {
        assert_eq!(
            ContentError::NotFound(String::new()).status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            ContentError::MalformedParameters(String::new()).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ContentError::RemoteUnavailable(String::new()).status_code(),
            StatusCode::BAD_GATEWAY
        );
    }
}

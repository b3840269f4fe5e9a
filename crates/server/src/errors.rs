use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::http::{header, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use service::ServiceError;
use thiserror::Error;
use tracing::error;

/// Error body returned by every customer endpoint: `{"error": title, "message": detail}`.
#[derive(Debug)]
pub struct JsonApiError {
    pub status: StatusCode,
    pub title: &'static str,
    pub message: Option<String>,
    /// Seconds sent as `Retry-After`; set only for outcomes the client may retry.
    pub retry_after: Option<u64>,
}

/// Delay suggested to clients after a concurrent-modification conflict.
pub const CONFLICT_RETRY_AFTER_SECS: u64 = 1;

impl JsonApiError {
    pub fn new(status: StatusCode, title: &'static str, message: Option<String>) -> Self {
        Self { status, title, message, retry_after: None }
    }

    pub fn with_retry_after(mut self, secs: u64) -> Self {
        self.retry_after = Some(secs);
        self
    }

    pub fn validation(msg: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, "Validation Error", Some(msg.into()))
    }
}

impl From<ServiceError> for JsonApiError {
    fn from(e: ServiceError) -> Self {
        let msg = Some(e.to_string());
        let retryable = e.is_retryable();
        let err = match e {
            ServiceError::Validation(_) => Self::new(StatusCode::BAD_REQUEST, "Validation Error", msg),
            ServiceError::NotFound(_) => Self::new(StatusCode::NOT_FOUND, "Not Found", msg),
            ServiceError::Concurrency(_) => Self::new(StatusCode::CONFLICT, "Concurrency Conflict", msg),
            ServiceError::Conflict(_) => Self::new(StatusCode::CONFLICT, "Conflict", msg),
            ServiceError::Internal(_) => Self::new(StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error", msg),
        };
        if retryable { err.with_retry_after(CONFLICT_RETRY_AFTER_SECS) } else { err }
    }
}

// Extractor rejections are client mistakes; report them all as 400 with the same body shape.
impl From<JsonRejection> for JsonApiError {
    fn from(e: JsonRejection) -> Self { Self::validation(e.body_text()) }
}

impl From<PathRejection> for JsonApiError {
    fn from(e: PathRejection) -> Self { Self::validation(e.body_text()) }
}

impl From<QueryRejection> for JsonApiError {
    fn from(e: QueryRejection) -> Self { Self::validation(e.body_text()) }
}

impl IntoResponse for JsonApiError {
    fn into_response(self) -> Response {
        if self.status.is_server_error() {
            error!(status = %self.status, error = ?self.message, "request failed");
        }
        let body = serde_json::json!({"error": self.title, "message": self.message});
        let mut resp = (self.status, Json(body)).into_response();
        if let Some(secs) = self.retry_after {
            resp.headers_mut().insert(header::RETRY_AFTER, HeaderValue::from(secs));
        }
        resp
    }
}

#[derive(Debug, Error)]
pub enum StartupError {
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("seeding customers failed: {0}")]
    Seed(#[from] ServiceError),
}

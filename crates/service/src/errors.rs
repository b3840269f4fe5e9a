use models::errors::ModelError;
use models::CustomerId;
use thiserror::Error;

use crate::storage::StoreError;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ServiceError {
    #[error("validation error: {0}")]
    Validation(String),
    #[error("not found: {0}")]
    NotFound(String),
    #[error("concurrent modification: {0}")]
    Concurrency(String),
    #[error("conflict: {0}")]
    Conflict(String),
    #[error("internal error: {0}")]
    Internal(String),
}

impl ServiceError {
    pub fn not_found(entity: &str, id: CustomerId) -> Self { Self::NotFound(format!("{entity} {id}")) }

    /// Only concurrency failures are worth retrying by the caller.
    pub fn is_retryable(&self) -> bool { matches!(self, Self::Concurrency(_)) }
}

impl From<ModelError> for ServiceError {
    fn from(e: ModelError) -> Self {
        match e {
            ModelError::Validation(msg) => Self::Validation(msg),
        }
    }
}

impl From<StoreError> for ServiceError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::Missing(id) => Self::not_found("customer", id),
            StoreError::VersionMismatch { .. } => Self::Concurrency(e.to_string()),
            StoreError::Duplicate(_) => Self::Conflict(e.to_string()),
            StoreError::Exhausted | StoreError::Backend(_) => Self::Internal(e.to_string()),
        }
    }
}

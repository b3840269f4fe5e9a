//! Storage abstractions for the service layer
//!
//! `CustomerStore` is the seam between `CustomerService` and whatever keeps
//! the records. Implementations must perform each mutation, including its
//! existence/version check, as one atomic step.

use async_trait::async_trait;
use models::{Customer, CustomerId, CustomerName};
use thiserror::Error;

pub mod memory_store;

/// A stored value together with its revision counter.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Versioned<T> {
    pub value: T,
    pub version: u64,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum StoreError {
    #[error("customer {0} does not exist")]
    Missing(CustomerId),
    #[error("customer {id} was modified (expected version {expected}, found {actual})")]
    VersionMismatch { id: CustomerId, expected: u64, actual: u64 },
    #[error("customer {0} already exists")]
    Duplicate(CustomerId),
    #[error("customer id space exhausted")]
    Exhausted,
    #[error("storage backend failure: {0}")]
    Backend(String),
}

#[async_trait]
pub trait CustomerStore: Send + Sync {
    /// All records in store iteration order.
    async fn list(&self) -> Result<Vec<Customer>, StoreError>;

    async fn get(&self, id: CustomerId) -> Result<Option<Versioned<Customer>>, StoreError>;

    /// Insert a new record under `requested_id`, or under the next sequence
    /// value when `None`.
    async fn insert(&self, requested_id: Option<CustomerId>, name: CustomerName) -> Result<Customer, StoreError>;

    /// Replace the name fields of `id` if its version still equals `expected_version`.
    async fn replace(&self, id: CustomerId, expected_version: u64, name: CustomerName) -> Result<Customer, StoreError>;

    async fn remove(&self, id: CustomerId) -> Result<Option<Customer>, StoreError>;
}

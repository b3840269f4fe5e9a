//! Service layer providing the customer CRUD operations on top of models.
//! - Separates business rules from the backing store.
//! - Reuses validation and entity definitions in `models` crate.
//! - Classifies every store failure into `ServiceError` before it leaves the crate.

pub mod errors;
pub mod storage;
pub mod customers;

pub use customers::service::CustomerService;
pub use errors::ServiceError;
pub use storage::{memory_store::InMemoryCustomerStore, CustomerStore};

//! Domain entities shared by the service and server crates.

pub mod customer;
pub mod errors;

pub use customer::{Customer, CustomerId, CustomerInput, CustomerName};

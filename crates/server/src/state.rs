use std::sync::Arc;

use service::{CustomerService, CustomerStore};

/// Shared handler state. Cloned per request; the service behind it is shared.
#[derive(Clone)]
pub struct ServerState {
    pub customers: Arc<CustomerService<dyn CustomerStore>>,
}

impl ServerState {
    pub fn new(customers: CustomerService<dyn CustomerStore>) -> Self {
        Self { customers: Arc::new(customers) }
    }
}

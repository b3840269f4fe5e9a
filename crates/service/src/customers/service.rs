use std::sync::Arc;

use configs::{IdAssignment, SeedCustomer};
use models::{Customer, CustomerId, CustomerInput, CustomerName};
use tracing::{error, info, instrument, warn};

use crate::errors::ServiceError;
use crate::storage::CustomerStore;

/// Application service encapsulating the customer resource rules.
/// Validation happens here; the store only sees well-formed names and ids.
pub struct CustomerService<S: CustomerStore + ?Sized> {
    store: Arc<S>,
    id_assignment: IdAssignment,
}

impl<S: CustomerStore + ?Sized> CustomerService<S> {
    pub fn new(store: Arc<S>) -> Self { Self { store, id_assignment: IdAssignment::default() } }

    pub fn with_id_assignment(mut self, id_assignment: IdAssignment) -> Self {
        self.id_assignment = id_assignment;
        self
    }

    /// All customers, optionally restricted by a case-insensitive name filter.
    #[instrument(skip(self))]
    pub async fn list(&self, filter: Option<&str>) -> Result<Vec<Customer>, ServiceError> {
        let all = self.store.list().await.map_err(|e| self.classify("list", e))?;
        Ok(match filter {
            Some(f) => all.into_iter().filter(|c| c.matches(f)).collect(),
            None => all,
        })
    }

    #[instrument(skip(self))]
    pub async fn get(&self, id: CustomerId) -> Result<Customer, ServiceError> {
        match self.store.get(id).await.map_err(|e| self.classify("get", e))? {
            Some(rec) => Ok(rec.value),
            None => Err(ServiceError::not_found("customer", id)),
        }
    }

    #[instrument(skip(self, input), fields(requested_id = ?input.requested_id()))]
    pub async fn create(&self, input: CustomerInput) -> Result<Customer, ServiceError> {
        let name = input.validate()?;
        let requested_id = match (self.id_assignment, input.requested_id()) {
            (_, None) => None,
            (IdAssignment::Sequential, Some(_)) => {
                return Err(ServiceError::Validation("id is assigned by the server".into()));
            }
            (IdAssignment::ClientAllowed, Some(id)) if id < 0 => {
                return Err(ServiceError::Validation("id must be positive".into()));
            }
            (IdAssignment::ClientAllowed, Some(id)) => Some(id),
        };
        let created = self
            .store
            .insert(requested_id, name)
            .await
            .map_err(|e| self.classify("create", e))?;
        info!(id = created.id, "customer_created");
        Ok(created)
    }

    /// Full replacement of the name fields. The payload id must equal `id`.
    #[instrument(skip(self, input))]
    pub async fn update(&self, id: CustomerId, input: CustomerInput) -> Result<Customer, ServiceError> {
        if input.id != Some(id) {
            return Err(ServiceError::Validation(format!(
                "payload id {:?} does not match path id {id}",
                input.id
            )));
        }
        let name = input.validate()?;
        let current = self
            .store
            .get(id)
            .await
            .map_err(|e| self.classify("update", e))?
            .ok_or_else(|| ServiceError::not_found("customer", id))?;
        let updated = self
            .store
            .replace(id, current.version, name)
            .await
            .map_err(|e| self.classify("update", e))?;
        info!(id, from_version = current.version, "customer_updated");
        Ok(updated)
    }

    #[instrument(skip(self))]
    pub async fn delete(&self, id: CustomerId) -> Result<Customer, ServiceError> {
        let removed = self
            .store
            .remove(id)
            .await
            .map_err(|e| self.classify("delete", e))?
            .ok_or_else(|| ServiceError::not_found("customer", id))?;
        info!(id, "customer_deleted");
        Ok(removed)
    }

    /// Insert startup records through the regular create path.
    pub async fn seed(&self, seed: &[SeedCustomer]) -> Result<usize, ServiceError> {
        for s in seed {
            let name = CustomerName::new(s.first_name.as_str(), s.last_name.as_str())?;
            self.store.insert(None, name).await.map_err(|e| self.classify("seed", e))?;
        }
        if !seed.is_empty() {
            info!(count = seed.len(), "customers_seeded");
        }
        Ok(seed.len())
    }

    fn classify(&self, op: &'static str, e: crate::storage::StoreError) -> ServiceError {
        let err = ServiceError::from(e);
        match &err {
            ServiceError::Internal(msg) => error!(op, error = %msg, "customer store failure"),
            ServiceError::Concurrency(msg) => warn!(op, error = %msg, "customer modified concurrently"),
            _ => {}
        }
        err
    }
}

impl<S: CustomerStore + ?Sized> Clone for CustomerService<S> {
    fn clone(&self) -> Self {
        Self { store: Arc::clone(&self.store), id_assignment: self.id_assignment }
    }
}

use std::collections::BTreeMap;

use async_trait::async_trait;
use models::{Customer, CustomerId, CustomerName};
use tokio::sync::RwLock;

use super::{CustomerStore, StoreError, Versioned};

#[derive(Default)]
struct Records {
    by_id: BTreeMap<CustomerId, Versioned<Customer>>,
    // Highest id ever issued or accepted; never decreases, so removed ids are not reused.
    last_id: CustomerId,
    // Store-wide revision counter. A re-created id never sees a version an earlier record had.
    last_version: u64,
}

impl Records {
    fn next_version(&mut self) -> u64 {
        self.last_version += 1;
        self.last_version
    }
}

/// Process-scoped in-memory customer store.
///
/// A single `RwLock` covers both the records and the id sequence; every
/// mutation holds the write lock across its check and its write.
#[derive(Default)]
pub struct InMemoryCustomerStore {
    inner: RwLock<Records>,
}

impl InMemoryCustomerStore {
    pub fn new() -> Self { Self::default() }
}

#[async_trait]
impl CustomerStore for InMemoryCustomerStore {
    async fn list(&self) -> Result<Vec<Customer>, StoreError> {
        let map = self.inner.read().await;
        Ok(map.by_id.values().map(|r| r.value.clone()).collect())
    }

    async fn get(&self, id: CustomerId) -> Result<Option<Versioned<Customer>>, StoreError> {
        let map = self.inner.read().await;
        Ok(map.by_id.get(&id).cloned())
    }

    async fn insert(&self, requested_id: Option<CustomerId>, name: CustomerName) -> Result<Customer, StoreError> {
        let mut map = self.inner.write().await;
        let id = match requested_id {
            Some(id) if map.by_id.contains_key(&id) => return Err(StoreError::Duplicate(id)),
            Some(id) => id,
            None => map.last_id.checked_add(1).ok_or(StoreError::Exhausted)?,
        };
        map.last_id = map.last_id.max(id);
        let customer = Customer::new(id, name);
        let version = map.next_version();
        map.by_id.insert(id, Versioned { value: customer.clone(), version });
        Ok(customer)
    }

    async fn replace(&self, id: CustomerId, expected_version: u64, name: CustomerName) -> Result<Customer, StoreError> {
        let mut map = self.inner.write().await;
        let actual = map.by_id.get(&id).ok_or(StoreError::Missing(id))?.version;
        if actual != expected_version {
            return Err(StoreError::VersionMismatch { id, expected: expected_version, actual });
        }
        let version = map.next_version();
        let existed = map.by_id.get_mut(&id).ok_or(StoreError::Missing(id))?;
        existed.value.first_name = name.first_name;
        existed.value.last_name = name.last_name;
        existed.version = version;
        Ok(existed.value.clone())
    }

    async fn remove(&self, id: CustomerId) -> Result<Option<Customer>, StoreError> {
        let mut map = self.inner.write().await;
        Ok(map.by_id.remove(&id).map(|r| r.value))
    }
}

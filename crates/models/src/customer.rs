use serde::{Deserialize, Serialize};

use crate::errors::ModelError;

/// Integer identity of a customer record, assigned by the store.
pub type CustomerId = i32;

/// Stored customer record as it appears on the wire.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Customer {
    pub id: CustomerId,
    pub first_name: String,
    pub last_name: String,
}

impl Customer {
    pub fn new(id: CustomerId, name: CustomerName) -> Self {
        Self { id, first_name: name.first_name, last_name: name.last_name }
    }

    /// Case-insensitive substring match on either name field.
    pub fn matches(&self, filter: &str) -> bool {
        let needle = filter.trim().to_lowercase();
        if needle.is_empty() {
            return true;
        }
        self.first_name.to_lowercase().contains(&needle)
            || self.last_name.to_lowercase().contains(&needle)
    }
}

/// Create/update payload.
///
/// Every field is optional at the wire level so that a missing name surfaces
/// as a validation error instead of a deserialisation rejection. The PascalCase
/// aliases accept bodies produced by the scaffolded `api/Customer` client.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct CustomerInput {
    #[serde(default, alias = "ID", alias = "Id")]
    pub id: Option<CustomerId>,
    #[serde(default, alias = "FirstName")]
    pub first_name: Option<String>,
    #[serde(default, alias = "LastName")]
    pub last_name: Option<String>,
}

/// Validated pair of name fields.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CustomerName {
    pub first_name: String,
    pub last_name: String,
}

impl CustomerName {
    pub fn new(first_name: impl Into<String>, last_name: impl Into<String>) -> Result<Self, ModelError> {
        let first_name = required("firstName", Some(first_name.into()))?;
        let last_name = required("lastName", Some(last_name.into()))?;
        Ok(Self { first_name, last_name })
    }
}

impl CustomerInput {
    pub fn named(first_name: &str, last_name: &str) -> Self {
        Self { id: None, first_name: Some(first_name.into()), last_name: Some(last_name.into()) }
    }

    pub fn with_id(mut self, id: CustomerId) -> Self {
        self.id = Some(id);
        self
    }

    /// Id carried by the payload; `0` is the unset default of the original client.
    pub fn requested_id(&self) -> Option<CustomerId> {
        self.id.filter(|id| *id != 0)
    }

    /// Checks that both name fields are present and not blank.
    pub fn validate(&self) -> Result<CustomerName, ModelError> {
        Ok(CustomerName {
            first_name: required("firstName", self.first_name.clone())?,
            last_name: required("lastName", self.last_name.clone())?,
        })
    }
}

fn required(field: &str, value: Option<String>) -> Result<String, ModelError> {
    match value {
        Some(v) if !v.trim().is_empty() => Ok(v),
        _ => Err(ModelError::missing(field)),
    }
}

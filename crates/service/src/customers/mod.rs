//! Customer resource: list/get/create/update/delete over a `CustomerStore`.

pub mod service;

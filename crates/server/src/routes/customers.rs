use axum::{
    extract::{rejection::{JsonRejection, PathRejection, QueryRejection}, Path, Query, State},
    http::{header, StatusCode},
    response::IntoResponse,
    Json,
};
use models::{Customer, CustomerId, CustomerInput};
use serde::Deserialize;
use tracing::info;

use crate::errors::JsonApiError;
use crate::observability;
use crate::state::ServerState;

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub filter: Option<String>,
}

/// Canonical location of a customer, used for the `Location` header on create.
pub fn location(id: CustomerId) -> String {
    format!("/customers/{id}")
}

/// List customers, optionally filtered by name
#[utoipa::path(get, path = "/customers", tag = "customers",
    params(("filter" = Option<String>, Query, description = "Case-insensitive name substring")),
    responses((status = 200, description = "OK", body = [crate::openapi::CustomerDoc])))]
pub async fn list(
    State(state): State<ServerState>,
    query: Result<Query<ListQuery>, QueryRejection>,
) -> Result<Json<Vec<Customer>>, JsonApiError> {
    let Query(q) = query?;
    let res = state.customers.list(q.filter.as_deref()).await;
    observability::record("list", &res);
    let list = res?;
    info!(count = list.len(), "list customers");
    Ok(Json(list))
}

/// Fetch one customer
#[utoipa::path(get, path = "/customers/{id}", tag = "customers",
    params(("id" = i32, Path, description = "Customer id")),
    responses(
        (status = 200, description = "OK", body = crate::openapi::CustomerDoc),
        (status = 400, description = "Bad Request", body = crate::openapi::ErrorDoc),
        (status = 404, description = "Not Found", body = crate::openapi::ErrorDoc)))]
pub async fn get(
    State(state): State<ServerState>,
    id: Result<Path<CustomerId>, PathRejection>,
) -> Result<Json<Customer>, JsonApiError> {
    let Path(id) = id?;
    let res = state.customers.get(id).await;
    observability::record("get", &res);
    Ok(Json(res?))
}

/// Create a customer; responds 201 with a `Location` header
#[utoipa::path(post, path = "/customers", tag = "customers",
    request_body = crate::openapi::CustomerInputDoc,
    responses(
        (status = 201, description = "Created", body = crate::openapi::CustomerDoc),
        (status = 400, description = "Bad Request", body = crate::openapi::ErrorDoc),
        (status = 409, description = "Id already in use", body = crate::openapi::ErrorDoc)))]
pub async fn create(
    State(state): State<ServerState>,
    input: Result<Json<CustomerInput>, JsonRejection>,
) -> Result<impl IntoResponse, JsonApiError> {
    let Json(input) = input?;
    let res = state.customers.create(input).await;
    observability::record("create", &res);
    let created = res?;
    Ok((
        StatusCode::CREATED,
        [(header::LOCATION, location(created.id))],
        Json(created),
    ))
}

/// Replace a customer's names; the body id must equal the path id
#[utoipa::path(put, path = "/customers/{id}", tag = "customers",
    params(("id" = i32, Path, description = "Customer id")),
    request_body = crate::openapi::CustomerInputDoc,
    responses(
        (status = 204, description = "Updated"),
        (status = 400, description = "Bad Request", body = crate::openapi::ErrorDoc),
        (status = 404, description = "Not Found", body = crate::openapi::ErrorDoc),
        (status = 409, description = "Modified concurrently", body = crate::openapi::ErrorDoc)))]
pub async fn update(
    State(state): State<ServerState>,
    id: Result<Path<CustomerId>, PathRejection>,
    input: Result<Json<CustomerInput>, JsonRejection>,
) -> Result<StatusCode, JsonApiError> {
    let Path(id) = id?;
    let Json(input) = input?;
    let res = state.customers.update(id, input).await;
    observability::record("update", &res);
    res?;
    Ok(StatusCode::NO_CONTENT)
}

/// Remove a customer and return it
#[utoipa::path(delete, path = "/customers/{id}", tag = "customers",
    params(("id" = i32, Path, description = "Customer id")),
    responses(
        (status = 200, description = "Deleted", body = crate::openapi::CustomerDoc),
        (status = 404, description = "Not Found", body = crate::openapi::ErrorDoc)))]
pub async fn delete(
    State(state): State<ServerState>,
    id: Result<Path<CustomerId>, PathRejection>,
) -> Result<Json<Customer>, JsonApiError> {
    let Path(id) = id?;
    let res = state.customers.delete(id).await;
    observability::record("delete", &res);
    Ok(Json(res?))
}

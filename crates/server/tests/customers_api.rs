use std::sync::Arc;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use configs::{AppConfig, IdAssignment, SeedCustomer};
use models::{Customer, CustomerId, CustomerName};
use serde_json::{json, Value};
use service::storage::{StoreError, Versioned};
use service::{CustomerService, CustomerStore, InMemoryCustomerStore};
use tower::ServiceExt;

use server::routes;
use server::startup::{build_app, build_cors};
use server::ServerState;

async fn app() -> anyhow::Result<Router> {
    Ok(build_app(&AppConfig::default()).await?)
}

async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> anyhow::Result<(StatusCode, axum::http::HeaderMap, Value)> {
    let builder = Request::builder().method(method).uri(uri);
    let req = match body {
        Some(b) => builder
            .header("content-type", "application/json")
            .body(Body::from(serde_json::to_vec(&b)?))?,
        None => builder.body(Body::empty())?,
    };
    let resp = app.clone().oneshot(req).await?;
    let status = resp.status();
    let headers = resp.headers().clone();
    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await?;
    let value = if bytes.is_empty() { Value::Null } else { serde_json::from_slice(&bytes)? };
    Ok((status, headers, value))
}

#[tokio::test]
async fn create_get_update_delete_scenario() -> anyhow::Result<()> {
    let app = app().await?;

    let (status, headers, body) =
        send(&app, "POST", "/customers", Some(json!({"firstName": "Ada", "lastName": "Lovelace"}))).await?;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body, json!({"id": 1, "firstName": "Ada", "lastName": "Lovelace"}));
    assert_eq!(headers.get(header::LOCATION).and_then(|v| v.to_str().ok()), Some("/customers/1"));

    let (status, _, body) = send(&app, "GET", "/customers/1", None).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"id": 1, "firstName": "Ada", "lastName": "Lovelace"}));

    let (status, _, body) =
        send(&app, "PUT", "/customers/1", Some(json!({"id": 1, "firstName": "Ada", "lastName": "King"}))).await?;
    assert_eq!(status, StatusCode::NO_CONTENT);
    assert_eq!(body, Value::Null);

    let (status, _, body) = send(&app, "GET", "/customers/1", None).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["lastName"], "King");

    let (status, _, body) = send(&app, "DELETE", "/customers/1", None).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"id": 1, "firstName": "Ada", "lastName": "King"}));

    let (status, _, body) = send(&app, "GET", "/customers/1", None).await?;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Not Found");
    Ok(())
}

#[tokio::test]
async fn malformed_payloads_are_bad_requests() -> anyhow::Result<()> {
    let app = app().await?;

    let (status, _, body) = send(&app, "POST", "/customers", Some(json!({"firstName": "Ada"}))).await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Validation Error");

    let (status, _, _) = send(&app, "POST", "/customers", Some(json!({"firstName": 1, "lastName": "x"}))).await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let req = Request::builder()
        .method("POST")
        .uri("/customers")
        .header("content-type", "application/json")
        .body(Body::from("{not json"))?;
    assert_eq!(app.clone().oneshot(req).await?.status(), StatusCode::BAD_REQUEST);

    let (status, _, _) = send(&app, "GET", "/customers/abc", None).await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (_, _, list) = send(&app, "GET", "/customers", None).await?;
    assert_eq!(list, json!([]));
    Ok(())
}

#[tokio::test]
async fn update_rejects_id_mismatch_and_keeps_record() -> anyhow::Result<()> {
    let app = app().await?;
    send(&app, "POST", "/customers", Some(json!({"firstName": "Ada", "lastName": "Lovelace"}))).await?;

    let (status, _, _) =
        send(&app, "PUT", "/customers/1", Some(json!({"id": 2, "firstName": "Ada", "lastName": "King"}))).await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _, _) =
        send(&app, "PUT", "/customers/9", Some(json!({"id": 9, "firstName": "Ada", "lastName": "King"}))).await?;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (_, _, body) = send(&app, "GET", "/customers/1", None).await?;
    assert_eq!(body["lastName"], "Lovelace");

    let (status, _, _) = send(&app, "DELETE", "/customers/9", None).await?;
    assert_eq!(status, StatusCode::NOT_FOUND);
    Ok(())
}

#[tokio::test]
async fn list_supports_filter_and_seed_data() -> anyhow::Result<()> {
    let mut cfg = AppConfig::default();
    cfg.store.seed = vec![
        SeedCustomer { first_name: "Bruce".into(), last_name: "Wayne".into() },
        SeedCustomer { first_name: "Clark".into(), last_name: "Kent".into() },
    ];
    let app = build_app(&cfg).await?;

    let (status, _, body) = send(&app, "GET", "/customers", None).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().map(Vec::len), Some(2));

    let (_, _, body) = send(&app, "GET", "/customers?filter=wAyN", None).await?;
    assert_eq!(body, json!([{"id": 1, "firstName": "Bruce", "lastName": "Wayne"}]));

    let (status, _, body) = send(&app, "GET", "/customers?filter=a&filter=b", None).await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Validation Error");
    Ok(())
}

#[tokio::test]
async fn legacy_prefix_serves_same_resource() -> anyhow::Result<()> {
    let app = app().await?;
    let (status, _, created) =
        send(&app, "POST", "/api/Customer", Some(json!({"ID": 0, "FirstName": "John", "LastName": "Doe"}))).await?;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["firstName"], "John");

    let (status, _, body) = send(&app, "GET", "/customers/1", None).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, created);

    let (status, _, _) = send(&app, "DELETE", "/api/Customer/1", None).await?;
    assert_eq!(status, StatusCode::OK);
    Ok(())
}

#[tokio::test]
async fn client_supplied_ids_conflict_on_duplicate() -> anyhow::Result<()> {
    let mut cfg = AppConfig::default();
    cfg.store.id_assignment = IdAssignment::ClientAllowed;
    let app = build_app(&cfg).await?;

    let (status, headers, _) =
        send(&app, "POST", "/customers", Some(json!({"id": 5, "firstName": "Ada", "lastName": "Lovelace"}))).await?;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(headers.get(header::LOCATION).and_then(|v| v.to_str().ok()), Some("/customers/5"));

    let (status, _, body) =
        send(&app, "POST", "/customers", Some(json!({"id": 5, "firstName": "Alan", "lastName": "Turing"}))).await?;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"], "Conflict");
    Ok(())
}

#[tokio::test]
async fn sequential_ids_reject_payload_id_on_create() -> anyhow::Result<()> {
    let app = app().await?;
    let (status, _, _) =
        send(&app, "POST", "/customers", Some(json!({"id": 5, "firstName": "Ada", "lastName": "Lovelace"}))).await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    Ok(())
}

/// Reports every record one version behind, so each update loses the race.
struct AlwaysStale(InMemoryCustomerStore);

#[async_trait]
impl CustomerStore for AlwaysStale {
    async fn list(&self) -> Result<Vec<Customer>, StoreError> { self.0.list().await }
    async fn get(&self, id: CustomerId) -> Result<Option<Versioned<Customer>>, StoreError> {
        Ok(self.0.get(id).await?.map(|r| Versioned { version: r.version + 1, ..r }))
    }
    async fn insert(&self, id: Option<CustomerId>, name: CustomerName) -> Result<Customer, StoreError> {
        self.0.insert(id, name).await
    }
    async fn replace(&self, id: CustomerId, v: u64, name: CustomerName) -> Result<Customer, StoreError> {
        self.0.replace(id, v, name).await
    }
    async fn remove(&self, id: CustomerId) -> Result<Option<Customer>, StoreError> { self.0.remove(id).await }
}

#[tokio::test]
async fn concurrent_modification_is_conflict() -> anyhow::Result<()> {
    let store: Arc<dyn CustomerStore> = Arc::new(AlwaysStale(InMemoryCustomerStore::new()));
    let app = routes::build_router(ServerState::new(CustomerService::new(store)), build_cors());
    send(&app, "POST", "/customers", Some(json!({"firstName": "Ada", "lastName": "Lovelace"}))).await?;

    let (status, headers, body) =
        send(&app, "PUT", "/customers/1", Some(json!({"id": 1, "firstName": "Ada", "lastName": "King"}))).await?;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"], "Concurrency Conflict");
    assert_eq!(headers.get(header::RETRY_AFTER).and_then(|v| v.to_str().ok()), Some("1"));
    Ok(())
}

#[tokio::test]
async fn ambient_endpoints_respond() -> anyhow::Result<()> {
    let app = app().await?;

    let (status, _, body) = send(&app, "GET", "/health", None).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");

    let (status, _, doc) = send(&app, "GET", "/api-docs/openapi.json", None).await?;
    assert_eq!(status, StatusCode::OK);
    assert!(doc["paths"]["/customers/{id}"].is_object());

    send(&app, "GET", "/customers/404", None).await?;
    let req = Request::builder().uri("/metrics").body(Body::empty())?;
    let resp = app.clone().oneshot(req).await?;
    assert_eq!(resp.status(), StatusCode::OK);
    let text = axum::body::to_bytes(resp.into_body(), usize::MAX).await?;
    assert!(String::from_utf8_lossy(&text).contains("customer_api_requests_total"));
    Ok(())
}

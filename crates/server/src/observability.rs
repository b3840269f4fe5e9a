use once_cell::sync::Lazy;
use prometheus::{register_int_counter_vec, Encoder, IntCounterVec, TextEncoder};

use service::ServiceError;

// Prometheus metrics (default registry)
pub static CUSTOMER_REQUESTS_TOTAL: Lazy<IntCounterVec> = Lazy::new(|| {
    register_int_counter_vec!(
        "customer_api_requests_total",
        "Customer resource operations by outcome",
        &["operation", "outcome"]
    )
    .expect("register customer_api_requests_total")
});

/// Label for a service result, one per error kind.
pub fn outcome<T>(res: &Result<T, ServiceError>) -> &'static str {
    match res {
        Ok(_) => "ok",
        Err(ServiceError::Validation(_)) => "validation",
        Err(ServiceError::NotFound(_)) => "not_found",
        Err(ServiceError::Concurrency(_)) => "concurrency",
        Err(ServiceError::Conflict(_)) => "conflict",
        Err(ServiceError::Internal(_)) => "internal",
    }
}

pub fn record<T>(operation: &str, res: &Result<T, ServiceError>) {
    CUSTOMER_REQUESTS_TOTAL
        .with_label_values(&[operation, outcome(res)])
        .inc();
}

pub fn encode_metrics() -> (axum::http::StatusCode, String) {
    let encoder = TextEncoder::new();
    let metric_families = prometheus::gather();
    let mut buffer = Vec::new();
    if let Err(e) = encoder.encode(&metric_families, &mut buffer) {
        return (
            axum::http::StatusCode::INTERNAL_SERVER_ERROR,
            format!("metrics encode error: {e}"),
        );
    }
    (
        axum::http::StatusCode::OK,
        String::from_utf8(buffer).unwrap_or_default(),
    )
}

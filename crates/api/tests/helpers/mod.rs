#![allow(dead_code)]

use axum::Router;
use serde_json::Value;
use std::sync::Arc;
use unbound_exporter_api::{create_api_routes, AppState};
use unbound_exporter_application::ports::{ApplyOutcome, MetricStorePort};
use unbound_exporter_application::use_cases::RenderMetricsUseCase;
use unbound_exporter_domain::{DomainError, FetchError, StatsSnapshot};
use unbound_exporter_infrastructure::PrometheusMetricStore;

pub fn create_test_app(store: Arc<dyn MetricStorePort>) -> Router {
    create_api_routes(AppState {
        render_metrics: Arc::new(RenderMetricsUseCase::new(store)),
    })
}

pub fn store_with(document: Value) -> Arc<PrometheusMetricStore> {
    let store = Arc::new(PrometheusMetricStore::new().unwrap());
    store
        .apply(&StatsSnapshot::from_value(document).unwrap())
        .unwrap();
    store
}

/// Store whose render always fails.
pub struct BrokenStore;

impl MetricStorePort for BrokenStore {
    fn apply(&self, _snapshot: &StatsSnapshot) -> Result<ApplyOutcome, DomainError> {
        Ok(ApplyOutcome::default())
    }

    fn record_fetch_failure(&self, _error: &FetchError) {}

    fn render(&self) -> Result<String, DomainError> {
        Err(DomainError::Encode("broken pipe".to_string()))
    }

    fn content_type(&self) -> &'static str {
        "text/plain"
    }
}

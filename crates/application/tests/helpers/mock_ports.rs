#![allow(dead_code)]

use async_trait::async_trait;
use serde_json::Value;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;
use unbound_exporter_application::ports::{ApplyOutcome, MetricStorePort, StatsFetcher};
use unbound_exporter_domain::{DomainError, FetchError, StatsSnapshot};

pub struct MockStatsFetcher {
    responses: Mutex<VecDeque<Result<Value, FetchError>>>,
    call_count: AtomicU64,
}

impl MockStatsFetcher {
    pub fn new() -> Self {
        Self {
            responses: Mutex::new(VecDeque::new()),
            call_count: AtomicU64::new(0),
        }
    }

    pub fn with_responses(responses: Vec<Result<Value, FetchError>>) -> Self {
        Self {
            responses: Mutex::new(responses.into()),
            call_count: AtomicU64::new(0),
        }
    }

    pub fn call_count(&self) -> u64 {
        self.call_count.load(Ordering::Relaxed)
    }
}

#[async_trait]
impl StatsFetcher for MockStatsFetcher {
    async fn fetch(&self) -> Result<StatsSnapshot, FetchError> {
        self.call_count.fetch_add(1, Ordering::Relaxed);
        let next = self.responses.lock().unwrap().pop_front();
        match next {
            Some(Ok(value)) => StatsSnapshot::from_value(value),
            Some(Err(e)) => Err(e),
            None => Err(FetchError::Network("no scripted response".to_string())),
        }
    }
}

pub struct MockMetricStore {
    applied: Mutex<Vec<StatsSnapshot>>,
    failures: Mutex<Vec<FetchError>>,
    partial_fields: Mutex<Option<Vec<String>>>,
}

impl MockMetricStore {
    pub fn new() -> Self {
        Self {
            applied: Mutex::new(Vec::new()),
            failures: Mutex::new(Vec::new()),
            partial_fields: Mutex::new(None),
        }
    }

    pub fn failing_fields(fields: Vec<&str>) -> Self {
        let store = Self::new();
        *store.partial_fields.lock().unwrap() =
            Some(fields.into_iter().map(String::from).collect());
        store
    }

    pub fn apply_count(&self) -> usize {
        self.applied.lock().unwrap().len()
    }

    pub fn last_applied(&self) -> Option<StatsSnapshot> {
        self.applied.lock().unwrap().last().cloned()
    }

    pub fn failures(&self) -> Vec<FetchError> {
        self.failures.lock().unwrap().clone()
    }
}

impl MetricStorePort for MockMetricStore {
    fn apply(&self, snapshot: &StatsSnapshot) -> Result<ApplyOutcome, DomainError> {
        self.applied.lock().unwrap().push(snapshot.clone());
        if let Some(fields) = self.partial_fields.lock().unwrap().clone() {
            return Err(DomainError::PartialApply { fields });
        }
        Ok(ApplyOutcome {
            top_queried: snapshot.top_queried().map(|t| t.len()).unwrap_or(0),
            top_blocked: snapshot.top_blocked().map(|t| t.len()).unwrap_or(0),
        })
    }

    fn record_fetch_failure(&self, error: &FetchError) {
        self.failures.lock().unwrap().push(error.clone());
    }

    fn render(&self) -> Result<String, DomainError> {
        Ok(format!("mock_applies_total {}\n", self.apply_count()))
    }

    fn content_type(&self) -> &'static str {
        "text/plain"
    }
}

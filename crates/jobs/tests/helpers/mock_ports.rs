#![allow(dead_code)]

use async_trait::async_trait;
use serde_json::{json, Value};
use std::collections::VecDeque;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use unbound_exporter_application::ports::{ApplyOutcome, MetricStorePort, StatsFetcher};
use unbound_exporter_application::use_cases::PollStatsUseCase;
use unbound_exporter_domain::{DomainError, FetchError, StatsSnapshot};

/// Replays scripted responses, then keeps answering with a minimal document.
pub struct ScriptedFetcher {
    responses: Mutex<VecDeque<Result<Value, FetchError>>>,
    delay: Duration,
    call_count: AtomicU64,
}

impl ScriptedFetcher {
    pub fn new() -> Self {
        Self::with_responses(Vec::new())
    }

    pub fn with_responses(responses: Vec<Result<Value, FetchError>>) -> Self {
        Self {
            responses: Mutex::new(responses.into()),
            delay: Duration::ZERO,
            call_count: AtomicU64::new(0),
        }
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn call_count(&self) -> u64 {
        self.call_count.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl StatsFetcher for ScriptedFetcher {
    async fn fetch(&self) -> Result<StatsSnapshot, FetchError> {
        self.call_count.fetch_add(1, Ordering::SeqCst);
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        let next = self.responses.lock().unwrap().pop_front();
        match next {
            Some(Ok(value)) => StatsSnapshot::from_value(value),
            Some(Err(e)) => Err(e),
            None => StatsSnapshot::from_value(json!({"total": 1})),
        }
    }
}

pub struct RecordingStore {
    applies: AtomicU64,
    failures: Mutex<Vec<FetchError>>,
}

impl RecordingStore {
    pub fn new() -> Self {
        Self {
            applies: AtomicU64::new(0),
            failures: Mutex::new(Vec::new()),
        }
    }

    pub fn apply_count(&self) -> u64 {
        self.applies.load(Ordering::SeqCst)
    }

    pub fn failures(&self) -> Vec<FetchError> {
        self.failures.lock().unwrap().clone()
    }
}

impl MetricStorePort for RecordingStore {
    fn apply(&self, _snapshot: &StatsSnapshot) -> Result<ApplyOutcome, DomainError> {
        self.applies.fetch_add(1, Ordering::SeqCst);
        Ok(ApplyOutcome::default())
    }

    fn record_fetch_failure(&self, error: &FetchError) {
        self.failures.lock().unwrap().push(error.clone());
    }

    fn render(&self) -> Result<String, DomainError> {
        Ok(String::new())
    }

    fn content_type(&self) -> &'static str {
        "text/plain"
    }
}

pub fn poll_use_case(
    fetcher: Arc<ScriptedFetcher>,
    store: Arc<RecordingStore>,
) -> Arc<PollStatsUseCase> {
    Arc::new(PollStatsUseCase::new(fetcher, store))
}

use crate::ports::{ApplyOutcome, MetricStorePort, StatsFetcher};
use std::sync::Arc;
use tracing::{debug, warn};
use unbound_exporter_domain::DomainError;

/// One fetch → apply cycle.
///
/// A failed fetch skips `apply` entirely so the registry keeps the values of
/// the last successful cycle.
pub struct PollStatsUseCase {
    fetcher: Arc<dyn StatsFetcher>,
    store: Arc<dyn MetricStorePort>,
}

impl PollStatsUseCase {
    pub fn new(fetcher: Arc<dyn StatsFetcher>, store: Arc<dyn MetricStorePort>) -> Self {
        Self { fetcher, store }
    }

    pub async fn execute(&self) -> Result<ApplyOutcome, DomainError> {
        let snapshot = match self.fetcher.fetch().await {
            Ok(snapshot) => snapshot,
            Err(e) => {
                warn!(kind = e.kind(), error = %e, "Fetch failed, keeping previous metrics");
                self.store.record_fetch_failure(&e);
                return Err(e.into());
            }
        };

        let outcome = self.store.apply(&snapshot)?;
        debug!(
            top_queried = outcome.top_queried,
            top_blocked = outcome.top_blocked,
            "Snapshot applied"
        );
        Ok(outcome)
    }
}

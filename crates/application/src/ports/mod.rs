mod metric_store;
mod stats_fetcher;

pub use metric_store::{ApplyOutcome, MetricStorePort};
pub use stats_fetcher::StatsFetcher;

// Re-export for convenience
pub use unbound_exporter_domain::{FetchError, StatsSnapshot};

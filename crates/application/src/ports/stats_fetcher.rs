use async_trait::async_trait;
use unbound_exporter_domain::{FetchError, StatsSnapshot};

/// Port for retrieving one statistics snapshot from the upstream resolver.
#[async_trait]
pub trait StatsFetcher: Send + Sync {
    /// Issue a single request. Every failure comes back as a [`FetchError`].
    async fn fetch(&self) -> Result<StatsSnapshot, FetchError>;
}

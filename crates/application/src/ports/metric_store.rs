use unbound_exporter_domain::{DomainError, FetchError, StatsSnapshot};

/// Sizes of the label families after an apply.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ApplyOutcome {
    pub top_queried: usize,
    pub top_blocked: usize,
}

/// Port for the shared metric registry.
///
/// `apply` is the only mutator of upstream-derived series and must be atomic
/// with respect to `render`.
pub trait MetricStorePort: Send + Sync {
    /// Fold a snapshot into the registry.
    ///
    /// Fields that fail extraction are skipped and reported through
    /// `DomainError::PartialApply`; everything else is still applied.
    fn apply(&self, snapshot: &StatsSnapshot) -> Result<ApplyOutcome, DomainError>;

    /// Count a failed fetch without touching any published value.
    fn record_fetch_failure(&self, error: &FetchError);

    /// Render the registry in the Prometheus text format.
    fn render(&self) -> Result<String, DomainError>;

    /// Content type of what `render` produces.
    fn content_type(&self) -> &'static str;
}

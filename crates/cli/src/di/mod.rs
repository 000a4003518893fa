use anyhow::Context;
use std::sync::Arc;
use unbound_exporter_application::ports::MetricStorePort;
use unbound_exporter_application::use_cases::{PollStatsUseCase, RenderMetricsUseCase};
use unbound_exporter_domain::Config;
use unbound_exporter_infrastructure::{OpnsenseStatsFetcher, PrometheusMetricStore};

pub struct Services {
    pub poll_stats: Arc<PollStatsUseCase>,
    pub render_metrics: Arc<RenderMetricsUseCase>,
}

impl Services {
    pub fn new(config: &Config) -> anyhow::Result<Self> {
        let store: Arc<dyn MetricStorePort> =
            Arc::new(PrometheusMetricStore::new().context("failed to create metric registry")?);
        let fetcher = Arc::new(
            OpnsenseStatsFetcher::new(&config.upstream)
                .context("failed to create upstream client")?,
        );

        Ok(Self {
            poll_stats: Arc::new(PollStatsUseCase::new(fetcher, store.clone())),
            render_metrics: Arc::new(RenderMetricsUseCase::new(store)),
        })
    }
}

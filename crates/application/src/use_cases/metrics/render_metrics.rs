use crate::ports::MetricStorePort;
use std::sync::Arc;
use unbound_exporter_domain::DomainError;

pub struct RenderMetricsUseCase {
    store: Arc<dyn MetricStorePort>,
}

impl RenderMetricsUseCase {
    pub fn new(store: Arc<dyn MetricStorePort>) -> Self {
        Self { store }
    }

    pub fn execute(&self) -> Result<String, DomainError> {
        self.store.render()
    }

    pub fn content_type(&self) -> &'static str {
        self.store.content_type()
    }
}

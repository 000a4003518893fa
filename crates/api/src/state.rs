use std::sync::Arc;
use unbound_exporter_application::use_cases::RenderMetricsUseCase;

#[derive(Clone)]
pub struct AppState {
    pub render_metrics: Arc<RenderMetricsUseCase>,
}

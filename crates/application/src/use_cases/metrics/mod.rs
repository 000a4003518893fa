mod poll_stats;
mod render_metrics;

pub use poll_stats::PollStatsUseCase;
pub use render_metrics::RenderMetricsUseCase;

pub mod metrics;
pub mod upstream;

pub use metrics::PrometheusMetricStore;
pub use upstream::OpnsenseStatsFetcher;

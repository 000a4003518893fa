pub mod store;

pub use store::PrometheusMetricStore;

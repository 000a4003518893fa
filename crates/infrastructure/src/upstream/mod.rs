pub mod stats_fetcher;

pub use stats_fetcher::OpnsenseStatsFetcher;

#![allow(dead_code)]

mod exposition;
mod upstream_server;

pub use exposition::{sample, series_count};
pub use upstream_server::{spawn_upstream, unused_port, UpstreamBehavior, STATS_PATH};

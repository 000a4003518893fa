//! Unbound Exporter Domain Layer
pub mod config;
pub mod errors;
pub mod snapshot;

pub use config::{CliOverrides, Config};
pub use errors::{DomainError, FetchError};
pub use snapshot::{
    Breakdown, BreakdownFields, FieldError, StatsSnapshot, TopBlockedEntry, TopEntry,
};

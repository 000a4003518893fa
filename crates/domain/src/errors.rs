use thiserror::Error;

/// Failure of a single upstream fetch.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FetchError {
    #[error("Upstream rejected the API credentials (HTTP 401)")]
    Auth,

    #[error("Upstream returned HTTP {status}")]
    Http { status: u16 },

    #[error("Network error: {0}")]
    Network(String),

    #[error("Malformed response body: {0}")]
    Decode(String),
}

impl FetchError {
    /// Short label used for the `kind` label of the fetch error counter.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Auth => "auth",
            Self::Http { .. } => "http",
            Self::Network(_) => "network",
            Self::Decode(_) => "decode",
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error("Snapshot partially applied, failed fields: {}", .fields.join(", "))]
    PartialApply { fields: Vec<String> },

    #[error("Failed to encode metrics: {0}")]
    Encode(String),

    #[error("Metric registration failed: {0}")]
    Registry(String),
}

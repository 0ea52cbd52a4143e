use thiserror::Error;

/// Why a fetch from the upstream score provider failed.
#[derive(Debug, Error)]
pub enum FetchError {
    /// Network unreachable, connection reset, or request timeout
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("upstream returned HTTP {0}")]
    BadStatus(u16),

    /// Body was not JSON, or a required field was missing
    #[error("malformed upstream response: {0}")]
    Parse(#[from] serde_json::Error),
}

pub type FetchResult<T> = std::result::Result<T, FetchError>;

use thiserror::Error;

/// Why a fetch did not produce a JSON payload.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum FetchError {
    /// Rejected before any network call.
    #[error("{0}")]
    Input(String),
    /// Non-2xx response; `message` is the body's `error` field when present.
    #[error("HTTP {status}: {message}")]
    Http { status: u16, message: String },
    /// DNS, connect, TLS or timeout failure.
    #[error("{message}")]
    Transport { message: String },
    /// 2xx response whose body is not JSON.
    #[error("{message}")]
    Parse { message: String },
}

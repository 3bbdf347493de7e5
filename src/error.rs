use thiserror::Error as ThisError;

#[derive(ThisError, Debug)]
pub enum AppError {
    /// Network-level failure talking to the bot API (connect, send, timeout,
    /// non-success status).
    #[error("Upstream unavailable: {0}")]
    UpstreamUnavailable(String),

    /// The bot API answered, but the body was not JSON of the expected shape
    /// or a record was missing required fields after all fallbacks.
    #[error("Upstream malformed: {0}")]
    UpstreamMalformed(String),

    /// A supplied setting could not be used (bad offset string, bad base
    /// URL). Raised once at construction, never per call.
    #[error("Configuration invalid: {0}")]
    ConfigInvalid(String),
}

pub type Result<T> = std::result::Result<T, AppError>;

// Alias for convenience
pub type Error = AppError;

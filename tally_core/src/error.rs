use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TallyError {
    #[error("cannot capture a partial while the live count is 0")]
    EmptyCount,
    #[error("at least one partial is required to finalize")]
    EmptyPartials,
    #[error("invalid state: {0}")]
    InvalidState(&'static str),
    #[error("scale error: {0}")]
    Scale(String),
    #[error("timeout waiting for scale")]
    Timeout,
}

#[derive(Debug, Error, Clone)]
pub enum BuildError {
    #[error("missing weight source")]
    MissingWeightSource,
    #[error("invalid config: {0}")]
    InvalidConfig(&'static str),
}

pub type Result<T> = eyre::Result<T>;
pub use eyre::Report;

/// Map a boxed weight-source error to a typed `TallyError`.
///
/// Timeouts are recognized by message so simulated and real sources don't
/// need a shared error type across the trait boundary.
pub fn map_scale_error(e: &(dyn std::error::Error + Send + Sync)) -> TallyError {
    let msg = e.to_string();
    if msg.to_ascii_lowercase().contains("timeout") {
        TallyError::Timeout
    } else {
        TallyError::Scale(msg)
    }
}

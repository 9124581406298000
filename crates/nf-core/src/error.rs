//! Error type for `nf-core` construction-time checks.

use thiserror::Error;

/// Raised by [`ClockConfig::validate`][crate::ClockConfig::validate].
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("configuration error: {0}")]
    Config(String),
}

/// Shorthand result type.
pub type CoreResult<T> = Result<T, CoreError>;

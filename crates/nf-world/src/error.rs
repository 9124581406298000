use thiserror::Error;

/// Returned by a [`WorldSink`][crate::WorldSink] that cannot realize an effect.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum SinkError {
    #[error("unknown world effect {0:?}")]
    UnknownEffect(String),
}

/// Outcome of running one event effect.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum EffectError {
    #[error(transparent)]
    Sink(#[from] SinkError),

    #[error("effect failed: {0}")]
    Failed(String),

    #[error("effect panicked: {0}")]
    Panicked(String),
}

pub type EffectResult<T = ()> = Result<T, EffectError>;

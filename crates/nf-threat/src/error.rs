use thiserror::Error;

#[derive(Debug, Error)]
pub enum ThreatError {
    #[error("threshold parse error: {0}")]
    Parse(String),

    #[error("invalid threshold {name:?}: {reason}")]
    InvalidThreshold { name: String, reason: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type ThreatResult<T> = Result<T, ThreatError>;

use nf_schedule::ScheduleError;
use nf_threat::ThreatError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SimError {
    #[error("simulation configuration error: {0}")]
    Config(String),

    #[error("event catalog error: {0}")]
    Catalog(#[from] ScheduleError),

    #[error("threat configuration error: {0}")]
    Threat(#[from] ThreatError),

    #[error("config parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type SimResult<T> = Result<T, SimError>;

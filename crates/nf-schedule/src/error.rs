use thiserror::Error;

use nf_core::EventId;

#[derive(Debug, Error)]
pub enum ScheduleError {
    #[error("duplicate event id {0}")]
    DuplicateEventId(EventId),

    #[error("event id must not be empty")]
    EmptyEventId,

    #[error("conditional event {0} has a delayed phase but neither a cooldown nor one_shot")]
    UnboundedDelayedPhase(EventId),
}

pub type ScheduleResult<T> = Result<T, ScheduleError>;

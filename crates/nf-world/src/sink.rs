//! The `WorldSink` trait and the stock sinks.

use std::collections::BTreeSet;

use crate::{SinkError, WorldEffect};

/// The surrounding game's side of the contract: realizes world effects.
///
/// The scheduler is the only caller.  A sink that does not recognize an
/// effect id should return [`SinkError::UnknownEffect`]; the scheduler logs
/// it and carries on with the tick.
pub trait WorldSink {
    fn apply(&mut self, effect: &WorldEffect) -> Result<(), SinkError>;
}

impl<S: WorldSink + ?Sized> WorldSink for Box<S> {
    fn apply(&mut self, effect: &WorldEffect) -> Result<(), SinkError> {
        (**self).apply(effect)
    }
}

/// Accepts and drops every effect.
#[derive(Copy, Clone, Debug, Default)]
pub struct NoopSink;

impl WorldSink for NoopSink {
    fn apply(&mut self, _effect: &WorldEffect) -> Result<(), SinkError> {
        Ok(())
    }
}

/// Logs every effect at `info` and keeps a count.
#[derive(Clone, Debug, Default)]
pub struct TracingSink {
    pub applied: u64,
}

impl WorldSink for TracingSink {
    fn apply(&mut self, effect: &WorldEffect) -> Result<(), SinkError> {
        self.applied += 1;
        tracing::info!(
            effect = %effect.id,
            severity = effect.params.severity,
            count = effect.params.count,
            message = effect.params.message_key.as_deref().unwrap_or(""),
            "world effect"
        );
        Ok(())
    }
}

/// Records applied effects in order; optionally rejects a set of ids as
/// unknown.  Meant for tests and tooling.
#[derive(Clone, Debug, Default)]
pub struct RecordingSink {
    pub applied: Vec<WorldEffect>,
    unknown:     BTreeSet<String>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// A sink that answers `UnknownEffect` for every id in `ids`.
    pub fn rejecting<I, S>(ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self { applied: Vec::new(), unknown: ids.into_iter().map(Into::into).collect() }
    }

    pub fn ids(&self) -> Vec<&str> {
        self.applied.iter().map(|e| e.id.as_str()).collect()
    }

    pub fn count_of(&self, id: &str) -> usize {
        self.applied.iter().filter(|e| e.id == id).count()
    }
}

impl WorldSink for RecordingSink {
    fn apply(&mut self, effect: &WorldEffect) -> Result<(), SinkError> {
        if self.unknown.contains(&effect.id) {
            return Err(SinkError::UnknownEffect(effect.id.clone()));
        }
        self.applied.push(effect.clone());
        Ok(())
    }
}

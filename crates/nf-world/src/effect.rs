//! World-effect requests: *which* effect, with *what* parameters.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Parameters attached to a [`WorldEffect`].  How they are rendered is up to
/// the sink.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EffectParams {
    /// 0 = flavour only; higher is worse.
    pub severity:    u8,
    /// Head-count for spawn-like effects.
    pub count:       u32,
    /// Message-table key; the sink owns the actual text.
    pub message_key: Option<String>,
}

/// A request for the surrounding game to do something.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorldEffect {
    pub id:     String,
    #[serde(default)]
    pub params: EffectParams,
}

impl WorldEffect {
    pub fn new(id: impl Into<String>) -> Self {
        Self { id: id.into(), params: EffectParams::default() }
    }

    pub fn severity(mut self, severity: u8) -> Self {
        self.params.severity = severity;
        self
    }

    pub fn count(mut self, count: u32) -> Self {
        self.params.count = count;
        self
    }

    pub fn message(mut self, key: impl Into<String>) -> Self {
        self.params.message_key = Some(key.into());
        self
    }
}

impl fmt::Display for WorldEffect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.id)?;
        if self.params.count > 0 {
            write!(f, " ×{}", self.params.count)?;
        }
        if self.params.severity > 0 {
            write!(f, " (severity {})", self.params.severity)?;
        }
        Ok(())
    }
}

//! Identifier types.
//!
//! `EntryId` is a zero-cost integer handle minted by the delayed-entry queue.
//! `EventId` names catalog entries; it is a string because catalog ids are
//! authored by content designers and must survive save/load unchanged.

use std::borrow::Borrow;
use std::fmt;

use serde::{Deserialize, Serialize};

// ── EntryId ───────────────────────────────────────────────────────────────────

/// Handle of one entry in the delayed-entry queue.
///
/// Ids are minted in increasing order, so ordering by `EntryId` is ordering by
/// insertion.
#[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug, Default, Serialize, Deserialize)]
pub struct EntryId(pub u64);

impl EntryId {
    #[inline]
    pub fn next(self) -> EntryId {
        EntryId(self.0 + 1)
    }
}

impl fmt::Display for EntryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "EntryId({})", self.0)
    }
}

// ── EventId ───────────────────────────────────────────────────────────────────

/// Unique id of a catalog event definition (e.g. `"radio_broadcast_day3"`).
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EventId(String);

impl EventId {
    pub fn new(id: impl Into<String>) -> Self {
        EventId(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for EventId {
    fn from(s: &str) -> Self {
        EventId(s.to_owned())
    }
}

impl From<String> for EventId {
    fn from(s: String) -> Self {
        EventId(s)
    }
}

impl Borrow<str> for EventId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EventId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

//! `DelayQueue` — the one place that owns "what happens later".
//!
//! Every delayed mutation in the core goes through this queue: delayed threat
//! responses, the second phase of conditional events, effect follow-ups, and
//! the automatic reset of pulsed action flags.  Entries are keyed by
//! [`EntryId`], which is minted in increasing order, so iterating the map is
//! iterating in insertion order.
//!
//! ```text
//! schedule(payload, delay, now)   → due = now + delay
//! drain_due(now)                  → every entry with due ≤ now, FIFO by insertion
//! ```
//!
//! Due entries drain in insertion order, not due order: an entry scheduled
//! later with a shorter delay still runs after an earlier entry that became
//! due in the same drain.

use std::collections::BTreeMap;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use nf_action::PulseFlag;
use nf_core::{EntryId, EventId, WallTime};
use nf_world::WorldEffect;

/// What a queued entry does when it comes due.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Deferred {
    /// Apply a world effect through the sink.
    Effect { effect: WorldEffect },
    /// Run the delayed phase of catalog event `id`.
    DelayedEvent { id: EventId },
    /// Lower a pulsed action flag raised with `generation`.
    ResetPulse { flag: PulseFlag, generation: u32 },
}

/// A `(due, payload)` pair waiting in the queue.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ScheduledEntry {
    pub id:      EntryId,
    pub due:     WallTime,
    pub payload: Deferred,
}

/// Serializable queue state.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct QueueSnapshot {
    pub next_id: EntryId,
    pub entries: Vec<ScheduledEntry>,
}

#[derive(Clone, Debug, Default)]
pub struct DelayQueue {
    entries: BTreeMap<EntryId, ScheduledEntry>,
    next_id: EntryId,
}

impl DelayQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Enqueue `payload` to run once `delay` of wall time has passed after `now`.
    pub fn schedule(&mut self, payload: Deferred, delay: Duration, now: WallTime) -> EntryId {
        let id = self.next_id;
        self.next_id = id.next();
        let due = now + delay;
        tracing::debug!(entry = %id, due = %due, payload = ?payload, "entry scheduled");
        self.entries.insert(id, ScheduledEntry { id, due, payload });
        id
    }

    /// Remove a pending entry.  Returns its payload, or `None` if it already
    /// ran or never existed.
    pub fn cancel(&mut self, id: EntryId) -> Option<Deferred> {
        let entry = self.entries.remove(&id)?;
        tracing::debug!(entry = %id, "entry cancelled");
        Some(entry.payload)
    }

    /// Remove and return every entry due at `now`, in insertion order.
    pub fn drain_due(&mut self, now: WallTime) -> Vec<ScheduledEntry> {
        let due: Vec<EntryId> = self
            .entries
            .values()
            .filter(|e| e.due <= now)
            .map(|e| e.id)
            .collect();
        due.into_iter()
            .filter_map(|id| self.entries.remove(&id))
            .collect()
    }

    /// The earliest due time among pending entries.
    pub fn next_due(&self) -> Option<WallTime> {
        self.entries.values().map(|e| e.due).min()
    }

    /// Pending entries in insertion order.
    pub fn pending(&self) -> impl Iterator<Item = &ScheduledEntry> {
        self.entries.values()
    }

    pub fn get(&self, id: EntryId) -> Option<&ScheduledEntry> {
        self.entries.get(&id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn snapshot(&self) -> QueueSnapshot {
        QueueSnapshot {
            next_id: self.next_id,
            entries: self.entries.values().cloned().collect(),
        }
    }

    pub fn restore(&mut self, snap: QueueSnapshot) {
        self.entries = snap.entries.into_iter().map(|e| (e.id, e)).collect();
        // Never re-mint an id that is still pending.
        let floor = self.entries.keys().next_back().map_or(EntryId(0), |id| id.next());
        self.next_id = snap.next_id.max(floor);
    }
}

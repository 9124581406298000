//! Catalog event definitions.
//!
//! | Kind          | Fires when                                         | Re-fires?              |
//! |---------------|----------------------------------------------------|------------------------|
//! | `Scripted`    | day and time-of-day slot match, predicate holds    | never                  |
//! | `Random`      | per-tick roll succeeds, first eligible in catalog  | never                  |
//! | `Conditional` | predicate holds and cooldown has expired           | yes, unless `one_shot` |

use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use nf_core::{EventId, TimeOfDay};
use nf_world::{EventContext, EventEffect};

/// "Is this event allowed to fire right now?"
pub type Predicate = Box<dyn Fn(&EventContext<'_>) -> bool + Send + Sync>;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum EventKind {
    Scripted { day: u32, slot: TimeOfDay },
    Random,
    Conditional {
        /// Game time before the event may fire again.  `None` re-fires on
        /// every tick the predicate holds.
        cooldown: Option<Duration>,
        /// Join the once-fired set on first firing.
        one_shot: bool,
    },
}

impl EventKind {
    pub fn class(&self) -> EventClass {
        match self {
            EventKind::Scripted { .. } => EventClass::Scripted,
            EventKind::Random => EventClass::Random,
            EventKind::Conditional { .. } => EventClass::Conditional,
        }
    }
}

/// Data-only tag of an [`EventKind`], used in logs and snapshots.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventClass {
    Scripted,
    Random,
    Conditional,
    /// Fired by a threat threshold rather than a catalog entry.
    Threat,
}

impl fmt::Display for EventClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            EventClass::Scripted => "scripted",
            EventClass::Random => "random",
            EventClass::Conditional => "conditional",
            EventClass::Threat => "threat",
        })
    }
}

/// The second, delayed phase of an event.
pub struct DelayedPhase {
    /// Game time between the immediate and the delayed effect.
    pub delay:  Duration,
    pub effect: Box<dyn EventEffect>,
}

/// An immutable catalog entry.
///
/// ```rust,ignore
/// EventDefinition::conditional("scratching_at_door", WorldEffect::new("msg_scratching"))
///     .when(|ctx| ctx.is_night() && ctx.actions.signals().heat_source_active)
///     .cooldown(Duration::from_secs(4 * 3_600))
///     .then_after(Duration::from_secs(30 * 60), WorldEffect::new("spawn_mongrels").count(2));
/// ```
pub struct EventDefinition {
    pub id:        EventId,
    pub kind:      EventKind,
    pub predicate: Option<Predicate>,
    pub effect:    Box<dyn EventEffect>,
    pub delayed:   Option<DelayedPhase>,
}

impl EventDefinition {
    fn new(id: impl Into<EventId>, kind: EventKind, effect: impl EventEffect) -> Self {
        Self {
            id: id.into(),
            kind,
            predicate: None,
            effect: Box::new(effect),
            delayed: None,
        }
    }

    pub fn scripted(id: impl Into<EventId>, day: u32, slot: TimeOfDay, effect: impl EventEffect) -> Self {
        Self::new(id, EventKind::Scripted { day, slot }, effect)
    }

    pub fn random(id: impl Into<EventId>, effect: impl EventEffect) -> Self {
        Self::new(id, EventKind::Random, effect)
    }

    pub fn conditional(id: impl Into<EventId>, effect: impl EventEffect) -> Self {
        Self::new(id, EventKind::Conditional { cooldown: None, one_shot: false }, effect)
    }

    // ── Builder methods ───────────────────────────────────────────────────

    pub fn when<F>(mut self, predicate: F) -> Self
    where
        F: Fn(&EventContext<'_>) -> bool + Send + Sync + 'static,
    {
        self.predicate = Some(Box::new(predicate));
        self
    }

    /// Conditional events only; ignored for other kinds.
    pub fn cooldown(mut self, cooldown: Duration) -> Self {
        if let EventKind::Conditional { cooldown: c, .. } = &mut self.kind {
            *c = Some(cooldown);
        }
        self
    }

    /// Conditional events only; ignored for other kinds.
    pub fn one_shot(mut self) -> Self {
        if let EventKind::Conditional { one_shot, .. } = &mut self.kind {
            *one_shot = true;
        }
        self
    }

    /// Add a second effect that runs `delay` of game time after the first.
    ///
    /// A conditional event with a delayed phase needs a non-zero cooldown or
    /// `one_shot`; [`Catalog::add`][crate::Catalog::add] rejects it otherwise.
    pub fn then_after(mut self, delay: Duration, effect: impl EventEffect) -> Self {
        self.delayed = Some(DelayedPhase { delay, effect: Box::new(effect) });
        self
    }

    // ── Queries ───────────────────────────────────────────────────────────

    pub fn class(&self) -> EventClass {
        self.kind.class()
    }

    /// `true` if there is no predicate or it holds.
    pub fn allowed(&self, ctx: &EventContext<'_>) -> bool {
        self.predicate.as_ref().is_none_or(|p| p(ctx))
    }
}

impl fmt::Debug for EventDefinition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventDefinition")
            .field("id", &self.id)
            .field("kind", &self.kind)
            .field("has_predicate", &self.predicate.is_some())
            .field("delay", &self.delayed.as_ref().map(|d| d.delay))
            .finish()
    }
}

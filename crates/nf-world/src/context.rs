//! Read-only state passed to every event predicate and effect.

use nf_action::ActionState;
use nf_core::{Clock, GameTime, TimeOfDay};
use nf_threat::{ThreatLevel, ThreatView};

use crate::Inventory;

/// A read-only snapshot of the simulation handed to event predicates and
/// effects.
///
/// Built by the scheduler once per evaluation pass.  All borrows live for
/// that pass only; nothing in the simulation is mutated while an
/// `EventContext` is alive.
#[derive(Copy, Clone)]
pub struct EventContext<'a> {
    pub clock:     &'a Clock,
    pub actions:   &'a ActionState,
    pub threat:    ThreatView,
    pub inventory: &'a dyn Inventory,
}

impl<'a> EventContext<'a> {
    #[inline]
    pub fn new(
        clock:     &'a Clock,
        actions:   &'a ActionState,
        threat:    ThreatView,
        inventory: &'a dyn Inventory,
    ) -> Self {
        Self { clock, actions, threat, inventory }
    }

    #[inline]
    pub fn now(&self) -> GameTime {
        self.clock.now()
    }

    #[inline]
    pub fn day(&self) -> u32 {
        self.clock.day()
    }

    #[inline]
    pub fn is_night(&self) -> bool {
        self.clock.is_night()
    }

    #[inline]
    pub fn time_of_day(&self) -> TimeOfDay {
        self.clock.time_of_day()
    }

    #[inline]
    pub fn threat_level(&self) -> ThreatLevel {
        self.threat.level
    }

    #[inline]
    pub fn has_item(&self, item: &str) -> bool {
        self.inventory.has(item)
    }
}

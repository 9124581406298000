//! `WorldHandle` — the capability an event effect acts through.

use std::time::Duration;

use nf_core::GameTime;

use crate::{EffectResult, WorldEffect, WorldSink};

/// A follow-up effect requested by a running effect, to be queued by the
/// scheduler.
#[derive(Clone, Debug, PartialEq)]
pub struct FollowUp {
    /// Game time to wait before applying.
    pub after:  Duration,
    pub effect: WorldEffect,
}

/// Passed to [`EventEffect::run`][crate::EventEffect::run] at invocation time.
///
/// Effects never reach the game through ambient state: everything they do
/// goes through this handle, either straight to the sink (`emit`) or into the
/// scheduler's delayed-entry queue (`emit_after`).
pub struct WorldHandle<'a> {
    sink:       &'a mut dyn WorldSink,
    now:        GameTime,
    follow_ups: Vec<FollowUp>,
    emitted:    u32,
}

impl<'a> WorldHandle<'a> {
    pub fn new(sink: &'a mut dyn WorldSink, now: GameTime) -> Self {
        Self { sink, now, follow_ups: Vec::new(), emitted: 0 }
    }

    /// Apply `effect` right away.
    pub fn emit(&mut self, effect: &WorldEffect) -> EffectResult {
        self.sink.apply(effect)?;
        self.emitted += 1;
        Ok(())
    }

    /// Queue `effect` to be applied after `after` of game time.
    pub fn emit_after(&mut self, after: Duration, effect: WorldEffect) {
        self.follow_ups.push(FollowUp { after, effect });
    }

    /// Game time of the invocation.
    pub fn now(&self) -> GameTime {
        self.now
    }

    /// Effects applied through this handle so far.
    pub fn emitted(&self) -> u32 {
        self.emitted
    }

    /// Consume the handle, returning queued follow-ups in request order.
    pub fn into_follow_ups(self) -> Vec<FollowUp> {
        self.follow_ups
    }
}

//! `Scheduler` — the only component that invokes effects.
//!
//! # Per-tick calls (in pipeline order)
//!
//! ```text
//! handle_trigger(req)   threat response: now, or warning now + effect queued
//! run_due(...)          drain the delayed-entry queue, FIFO
//! evaluate(ctx)         scripted → random (≤ 1) → conditional
//! ```
//!
//! Every call returns the [`Outcome`]s it produced so the simulation can
//! forward them to its observer.
//!
//! # Failure isolation
//!
//! Effects run inside `catch_unwind`.  A panicking or failing effect is
//! logged and reported as [`Outcome::EffectFailed`]; the remaining events of
//! the tick are still evaluated.  An event is marked fired *before* its
//! effect runs, so a failing effect is never retried.

use std::any::Any;
use std::collections::{BTreeMap, BTreeSet, VecDeque};
use std::panic::{self, AssertUnwindSafe};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use nf_action::{ActionState, PulseFlag, PulseRequest};
use nf_core::{Clock, EntryId, EventId, GameTime, SimRng, WallTime};
use nf_threat::{ThreatView, TriggerRequest};
use nf_world::{
    EffectError, EffectResult, EventContext, EventEffect, FollowUp, Inventory, WorldEffect,
    WorldHandle, WorldSink,
};

use crate::{
    Catalog, Deferred, DelayQueue, EventClass, EventDefinition, EventKind, QueueSnapshot,
    ResponseTable, ScheduledEntry,
};

/// Entries kept in the fired-event log.
pub const FIRED_LOG_CAP: usize = 64;

/// Default chance that a random event fires during one game hour.
pub const DEFAULT_RANDOM_CHANCE_PER_HOUR: f64 = 0.05;

// ── Outcomes / log ────────────────────────────────────────────────────────────

/// Something the scheduler did during one call.
#[derive(Clone, Debug, PartialEq)]
pub enum Outcome {
    EventFired { id: EventId, class: EventClass },
    /// `source` is an event id or a world-effect id.
    EffectFailed { source: String, error: EffectError },
    TriggerHandled { threshold: String, delayed: Option<EntryId> },
    DeferredApplied { entry: EntryId, effect_id: String },
    PulseCleared { flag: PulseFlag },
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FiredEvent {
    pub id:    EventId,
    pub class: EventClass,
    pub at:    GameTime,
}

/// Serializable scheduler state.  Event definitions are code and are not
/// part of it.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct SchedulerSnapshot {
    pub once_fired:        BTreeSet<EventId>,
    pub conditional_fired: BTreeMap<EventId, GameTime>,
    pub queue:             QueueSnapshot,
    pub log:               Vec<FiredEvent>,
}

// ── Scheduler ─────────────────────────────────────────────────────────────────

#[derive(Debug)]
pub struct Scheduler {
    catalog:                Catalog,
    responses:              ResponseTable,
    random_chance_per_hour: f64,
    once_fired:             BTreeSet<EventId>,
    /// Last firing time of each conditional event.
    conditional_fired:      BTreeMap<EventId, GameTime>,
    queue:                  DelayQueue,
    log:                    VecDeque<FiredEvent>,
}

impl Scheduler {
    pub fn new(catalog: Catalog, responses: ResponseTable) -> Self {
        Self {
            catalog,
            responses,
            random_chance_per_hour: DEFAULT_RANDOM_CHANCE_PER_HOUR,
            once_fired: BTreeSet::new(),
            conditional_fired: BTreeMap::new(),
            queue: DelayQueue::new(),
            log: VecDeque::with_capacity(FIRED_LOG_CAP),
        }
    }

    /// Chance in `[0, 1]` that one random event fires per game hour.
    pub fn with_random_chance(mut self, per_hour: f64) -> Self {
        self.random_chance_per_hour = if per_hour.is_finite() { per_hour.clamp(0.0, 1.0) } else { 0.0 };
        self
    }

    // ── Delayed-entry queue ───────────────────────────────────────────────

    /// Queue a world effect to apply after `game_delay` of game time.
    pub fn schedule_effect(&mut self, effect: WorldEffect, game_delay: Duration, clock: &Clock) -> EntryId {
        self.queue
            .schedule(Deferred::Effect { effect }, clock.game_to_wall(game_delay), clock.wall())
    }

    /// Queue the reset of a pulsed flag.  Pulse durations are wall time.
    pub fn schedule_pulse_reset(&mut self, req: PulseRequest, now: WallTime) -> EntryId {
        let payload = Deferred::ResetPulse { flag: req.flag, generation: req.generation };
        self.queue.schedule(payload, req.after, now)
    }

    pub fn cancel(&mut self, id: EntryId) -> Option<Deferred> {
        self.queue.cancel(id)
    }

    /// Pending entries in insertion order.
    pub fn pending(&self) -> impl Iterator<Item = &ScheduledEntry> {
        self.queue.pending()
    }

    pub fn queue(&self) -> &DelayQueue {
        &self.queue
    }

    /// Apply every queued entry due at the clock's wall time, in insertion
    /// order.
    pub fn run_due(
        &mut self,
        clock:     &Clock,
        actions:   &mut ActionState,
        threat:    ThreatView,
        inventory: &dyn Inventory,
        sink:      &mut dyn WorldSink,
    ) -> Vec<Outcome> {
        let mut out = Vec::new();
        for entry in self.queue.drain_due(clock.wall()) {
            match entry.payload {
                Deferred::ResetPulse { flag, generation } => {
                    if actions.clear_pulse(flag, generation) {
                        out.push(Outcome::PulseCleared { flag });
                    } else {
                        tracing::debug!(?flag, generation, "stale pulse reset ignored");
                    }
                }
                Deferred::Effect { effect } => match apply_guarded(&effect, sink) {
                    Ok(()) => {
                        tracing::debug!(entry = %entry.id, effect = %effect.id, "delayed effect applied");
                        out.push(Outcome::DeferredApplied { entry: entry.id, effect_id: effect.id });
                    }
                    Err(error) => {
                        report_failure(&effect.id, &error);
                        out.push(Outcome::EffectFailed { source: effect.id, error });
                    }
                },
                Deferred::DelayedEvent { id } => {
                    let Some(phase) = self.catalog.get(id.as_str()).and_then(|d| d.delayed.as_ref()) else {
                        tracing::warn!(event = %id, "delayed phase of unknown event dropped");
                        continue;
                    };
                    let ctx = EventContext::new(clock, &*actions, threat, inventory);
                    let (result, follow_ups) = invoke(phase.effect.as_ref(), &ctx, sink);
                    enqueue_follow_ups(&mut self.queue, clock, follow_ups);
                    match result {
                        Ok(()) => {
                            tracing::debug!(entry = %entry.id, event = %id, "delayed phase ran");
                            out.push(Outcome::DeferredApplied { entry: entry.id, effect_id: id.to_string() });
                        }
                        Err(error) => {
                            report_failure(id.as_str(), &error);
                            out.push(Outcome::EffectFailed { source: id.to_string(), error });
                        }
                    }
                }
            }
        }
        out
    }

    // ── Threat responses ──────────────────────────────────────────────────

    /// Realize a threshold trigger: immediately if its delay is zero,
    /// otherwise apply the warning now and queue the main effect.
    pub fn handle_trigger(
        &mut self,
        req:   TriggerRequest,
        clock: &Clock,
        rng:   &mut SimRng,
        sink:  &mut dyn WorldSink,
    ) -> Vec<Outcome> {
        let mut out = Vec::new();
        let response = self.responses.respond(&req, rng);

        let delayed = if req.suggested_delay.is_zero() {
            apply_now(&response.effect, sink, &mut out);
            None
        } else {
            if let Some(warning) = &response.warning {
                apply_now(warning, sink, &mut out);
            }
            Some(self.schedule_effect(response.effect, req.suggested_delay, clock))
        };

        tracing::info!(
            threshold = %req.name,
            priority = req.priority,
            delay_mins = req.suggested_delay.as_secs() / 60,
            "threat response"
        );
        self.push_log(FiredEvent { id: EventId::new(req.name.clone()), class: EventClass::Threat, at: clock.now() });
        out.push(Outcome::TriggerHandled { threshold: req.name, delayed });
        out
    }

    // ── Catalog evaluation ────────────────────────────────────────────────

    /// Evaluate the catalog against `ctx`: scripted events, then at most one
    /// random event, then conditional events.
    pub fn evaluate(
        &mut self,
        ctx:  &EventContext<'_>,
        sink: &mut dyn WorldSink,
        rng:  &mut SimRng,
    ) -> Vec<Outcome> {
        let now = ctx.now();
        let mut out = Vec::new();
        let Self { catalog, once_fired, conditional_fired, queue, random_chance_per_hour, .. } = self;

        // Scripted: exactly once, at their (day, slot).
        for def in catalog.scripted() {
            let EventKind::Scripted { day, slot } = def.kind else { continue };
            if day != ctx.day() || slot != ctx.time_of_day() || once_fired.contains(&def.id) {
                continue;
            }
            if !allowed(def, ctx) {
                continue;
            }
            once_fired.insert(def.id.clone());
            fire(def, ctx, sink, queue, &mut out);
        }

        // Random: one roll per tick, first eligible definition wins.
        let hours = ctx.clock.last_step_hours();
        if hours > 0.0 && *random_chance_per_hour > 0.0 {
            let p = 1.0 - (1.0 - *random_chance_per_hour).powf(hours);
            if rng.gen_bool(p) {
                let winner = catalog
                    .random()
                    .find(|d| !once_fired.contains(&d.id) && allowed(d, ctx));
                if let Some(def) = winner {
                    once_fired.insert(def.id.clone());
                    fire(def, ctx, sink, queue, &mut out);
                }
            }
        }

        // Conditional: re-armable after their cooldown unless one-shot.
        for def in catalog.conditional() {
            let EventKind::Conditional { cooldown, one_shot } = def.kind else { continue };
            if once_fired.contains(&def.id) {
                continue;
            }
            if let (Some(cooldown), Some(last)) = (cooldown, conditional_fired.get(&def.id)) {
                if now.since(*last) < cooldown {
                    continue;
                }
            }
            if !allowed(def, ctx) {
                continue;
            }
            conditional_fired.insert(def.id.clone(), now);
            if one_shot {
                once_fired.insert(def.id.clone());
            }
            fire(def, ctx, sink, queue, &mut out);
        }

        for o in &out {
            if let Outcome::EventFired { id, class } = o {
                self.push_log(FiredEvent { id: id.clone(), class: *class, at: now });
            }
        }
        out
    }

    // ── Queries ───────────────────────────────────────────────────────────

    /// `true` if `id` is in the once-fired set.
    pub fn has_fired(&self, id: &str) -> bool {
        self.once_fired.contains(id)
    }

    /// When conditional event `id` last fired.
    pub fn last_fired(&self, id: &str) -> Option<GameTime> {
        self.conditional_fired.get(id).copied()
    }

    /// Most recent firings, oldest first.
    pub fn fired_log(&self) -> impl Iterator<Item = &FiredEvent> {
        self.log.iter()
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn responses(&self) -> &ResponseTable {
        &self.responses
    }

    fn push_log(&mut self, fired: FiredEvent) {
        if self.log.len() >= FIRED_LOG_CAP {
            self.log.pop_front();
        }
        self.log.push_back(fired);
    }

    // ── Snapshot ──────────────────────────────────────────────────────────

    pub fn snapshot(&self) -> SchedulerSnapshot {
        SchedulerSnapshot {
            once_fired:        self.once_fired.clone(),
            conditional_fired: self.conditional_fired.clone(),
            queue:             self.queue.snapshot(),
            log:               self.log.iter().cloned().collect(),
        }
    }

    pub fn restore(&mut self, snap: SchedulerSnapshot) {
        self.once_fired = snap.once_fired;
        self.conditional_fired = snap.conditional_fired;
        self.queue.restore(snap.queue);
        let skip = snap.log.len().saturating_sub(FIRED_LOG_CAP);
        self.log = snap.log.into_iter().skip(skip).collect();
    }
}

// ── Helpers ───────────────────────────────────────────────────────────────────

/// Run the immediate effect of `def` and queue its follow-ups and delayed
/// phase.  The delayed phase is queued even if the immediate effect failed.
fn fire(
    def:   &EventDefinition,
    ctx:   &EventContext<'_>,
    sink:  &mut dyn WorldSink,
    queue: &mut DelayQueue,
    out:   &mut Vec<Outcome>,
) {
    let class = def.class();
    tracing::info!(event = %def.id, %class, day = ctx.day(), at = %ctx.now(), "event fired");
    out.push(Outcome::EventFired { id: def.id.clone(), class });

    let (result, follow_ups) = invoke(def.effect.as_ref(), ctx, sink);
    if let Err(error) = result {
        report_failure(def.id.as_str(), &error);
        out.push(Outcome::EffectFailed { source: def.id.to_string(), error });
    }
    enqueue_follow_ups(queue, ctx.clock, follow_ups);

    if let Some(phase) = &def.delayed {
        let payload = Deferred::DelayedEvent { id: def.id.clone() };
        queue.schedule(payload, ctx.clock.game_to_wall(phase.delay), ctx.clock.wall());
    }
}

/// Run one effect behind `catch_unwind`.
fn invoke(
    effect: &dyn EventEffect,
    ctx:    &EventContext<'_>,
    sink:   &mut dyn WorldSink,
) -> (EffectResult, Vec<FollowUp>) {
    let mut world = WorldHandle::new(sink, ctx.now());
    let result = panic::catch_unwind(AssertUnwindSafe(|| effect.run(ctx, &mut world)))
        .unwrap_or_else(|payload| Err(EffectError::Panicked(panic_message(payload.as_ref()))));
    (result, world.into_follow_ups())
}

/// Evaluate a predicate; a panicking predicate counts as `false`.
fn allowed(def: &EventDefinition, ctx: &EventContext<'_>) -> bool {
    panic::catch_unwind(AssertUnwindSafe(|| def.allowed(ctx))).unwrap_or_else(|payload| {
        tracing::error!(event = %def.id, panic = %panic_message(payload.as_ref()), "event predicate panicked");
        false
    })
}

/// Hand one effect to the sink; a panicking sink becomes `Panicked`.
fn apply_guarded(effect: &WorldEffect, sink: &mut dyn WorldSink) -> EffectResult {
    match panic::catch_unwind(AssertUnwindSafe(|| sink.apply(effect))) {
        Ok(result) => result.map_err(EffectError::from),
        Err(payload) => Err(EffectError::Panicked(panic_message(payload.as_ref()))),
    }
}

fn apply_now(effect: &WorldEffect, sink: &mut dyn WorldSink, out: &mut Vec<Outcome>) {
    if let Err(error) = apply_guarded(effect, sink) {
        report_failure(&effect.id, &error);
        out.push(Outcome::EffectFailed { source: effect.id.clone(), error });
    }
}

fn enqueue_follow_ups(queue: &mut DelayQueue, clock: &Clock, follow_ups: Vec<FollowUp>) {
    for f in follow_ups {
        queue.schedule(Deferred::Effect { effect: f.effect }, clock.game_to_wall(f.after), clock.wall());
    }
}

fn report_failure(source: &str, error: &EffectError) {
    match error {
        EffectError::Panicked(msg) => tracing::error!(source, panic = %msg, "effect panicked"),
        other => tracing::warn!(source, error = %other, "effect failed"),
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_owned()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "non-string panic payload".to_owned()
    }
}

//! The `Sim` struct and its tick pipeline.

use serde::{Deserialize, Serialize};

use nf_action::{Action, ActionSnapshot, ActionState};
use nf_core::{
    Clock, ClockSnapshot, ClockTransition, EntryId, GameTime, SimRng, SpeedPreset, TimeOfDay,
};
use nf_schedule::{Deferred, Outcome, Scheduler, SchedulerSnapshot};
use nf_threat::{ScoreBreakdown, ThreatLevel, ThreatScore, ThreatSnapshot};
use nf_world::{EventContext, Inventory, WorldSink};

use crate::{SimConfig, SimObserver};

// ── Status / report ───────────────────────────────────────────────────────────

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum SimStatus {
    Running,
    /// `days` full days have elapsed; further steps are no-ops.
    Survived { days: u32 },
}

/// Everything one [`Sim::step`] did.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TickReport {
    pub transition: ClockTransition,
    /// Threat points after this step's recompute.
    pub points:     f32,
    /// Threshold fired this step, if any.
    pub trigger:    Option<String>,
    pub outcomes:   Vec<Outcome>,
}

/// Serializable state of a whole simulation instance.
///
/// `restore(snapshot())` leaves future behavior unchanged.  The event
/// catalog, sink, inventory and RNG state are not part of it.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SimSnapshot {
    pub clock:     ClockSnapshot,
    pub actions:   ActionSnapshot,
    pub threat:    ThreatSnapshot,
    pub scheduler: SchedulerSnapshot,
}

// ── Sim ───────────────────────────────────────────────────────────────────────

/// One isolated simulation instance.
///
/// `Sim<S, I>` owns all mutable state (clock, action record, threat score,
/// scheduler, RNG) and drives the per-step pipeline:
///
/// 1. **Clock** advances by the host's real delta.
/// 2. **Actions** recompute derived signals and decay noise.
/// 3. **Threat** re-scores, decays, and fires at most one threshold; the
///    scheduler realizes its response.
/// 4. **Due entries** in the delayed-entry queue are applied, FIFO.
/// 5. **Catalog** events are evaluated against the updated state.
///
/// The order is load-bearing: threat scoring sees this step's actions and the
/// catalog sees this step's threat.  A paused clock skips the whole pipeline.
///
/// Create via [`SimBuilder`][crate::SimBuilder].
pub struct Sim<S: WorldSink, I: Inventory> {
    pub(crate) config:    SimConfig,
    pub(crate) clock:     Clock,
    pub(crate) actions:   ActionState,
    pub(crate) threat:    ThreatScore,
    pub(crate) scheduler: Scheduler,
    pub(crate) rng:       SimRng,
    pub(crate) sink:      S,
    pub(crate) inventory: I,
    pub(crate) status:    SimStatus,
}

impl<S: WorldSink, I: Inventory> Sim<S, I> {
    // ── Stepping ──────────────────────────────────────────────────────────

    /// Run one step covering `real_dt_secs` of host time.
    pub fn step<O: SimObserver>(&mut self, real_dt_secs: f64, observer: &mut O) -> TickReport {
        if self.status != SimStatus::Running || self.clock.is_paused() {
            return TickReport { points: self.threat.points(), ..TickReport::default() };
        }
        observer.on_tick_start(self.clock.now());

        // ① Clock
        let transition = self.clock.advance(real_dt_secs);
        self.announce(transition, observer);
        let now = self.clock.now();

        // ② Actions
        self.actions.tick(&self.clock);

        // ③ Threat
        let points = self.threat.recompute(&self.actions, &self.clock);
        let mut outcomes = Vec::new();
        let mut trigger = None;
        if let Some(req) = self.threat.check_thresholds(now, &mut self.rng) {
            observer.on_trigger(&req);
            trigger = Some(req.name.clone());
            outcomes.extend(self.scheduler.handle_trigger(req, &self.clock, &mut self.rng, &mut self.sink));
        }

        // ④ Due entries
        outcomes.extend(self.scheduler.run_due(
            &self.clock,
            &mut self.actions,
            self.threat.view(),
            &self.inventory,
            &mut self.sink,
        ));

        // ⑤ Catalog
        let ctx = EventContext::new(&self.clock, &self.actions, self.threat.view(), &self.inventory);
        outcomes.extend(self.scheduler.evaluate(&ctx, &mut self.sink, &mut self.rng));

        for outcome in &outcomes {
            match outcome {
                Outcome::EventFired { id, class } => observer.on_event_fired(id, *class),
                Outcome::EffectFailed { source, error } => observer.on_effect_failed(source, error),
                _ => {}
            }
        }

        if let Some(max) = self.clock.config().max_days {
            if self.clock.run_complete() {
                self.status = SimStatus::Survived { days: max };
                tracing::info!(days = max, "run complete");
                observer.on_run_complete(max);
            }
        }

        let report = TickReport { transition, points, trigger, outcomes };
        observer.on_tick_end(now, &report);
        report
    }

    /// Run up to `n` steps of `real_dt_secs` each, stopping early once the run
    /// is complete.  Returns the number of steps taken.
    pub fn run_steps<O: SimObserver>(&mut self, n: u64, real_dt_secs: f64, observer: &mut O) -> u64 {
        let mut taken = 0;
        while taken < n && self.status == SimStatus::Running {
            self.step(real_dt_secs, observer);
            taken += 1;
        }
        taken
    }

    fn announce<O: SimObserver>(&self, t: ClockTransition, observer: &mut O) {
        let day = self.clock.day();
        if t.day_started {
            tracing::info!(day, "new day");
            observer.on_day_started(day);
        }
        if t.dawn {
            tracing::debug!(day, "dawn");
            observer.on_dawn(day);
        }
        if t.nightfall {
            tracing::info!(day, "nightfall");
            observer.on_nightfall(day);
        }
    }

    // ── Input ─────────────────────────────────────────────────────────────

    /// Record a player action.  Pulsed actions queue their own reset; its
    /// entry id is returned.
    pub fn record(&mut self, action: Action) -> Option<EntryId> {
        let req = self.actions.record(action, self.clock.now())?;
        Some(self.scheduler.schedule_pulse_reset(req, self.clock.wall()))
    }

    /// Record an action by name.  Unknown names are ignored.
    pub fn record_named(&mut self, name: &str, intensity: Option<f32>) -> Option<EntryId> {
        let req = self.actions.record_named(name, intensity, self.clock.now())?;
        Some(self.scheduler.schedule_pulse_reset(req, self.clock.wall()))
    }

    /// Cancel a pending delayed entry.
    pub fn cancel(&mut self, entry: EntryId) -> Option<Deferred> {
        self.scheduler.cancel(entry)
    }

    pub fn pause(&mut self) {
        self.clock.pause();
    }

    pub fn resume(&mut self) {
        self.clock.resume();
    }

    pub fn set_speed(&mut self, speed: SpeedPreset) {
        self.clock.set_speed(speed);
    }

    // ── Queries ───────────────────────────────────────────────────────────

    pub fn current_threat_level(&self) -> ThreatLevel {
        self.threat.level()
    }

    pub fn current_points(&self) -> f32 {
        self.threat.points()
    }

    pub fn score_breakdown(&self) -> &ScoreBreakdown {
        self.threat.breakdown()
    }

    pub fn current_day(&self) -> u32 {
        self.clock.day()
    }

    pub fn is_night(&self) -> bool {
        self.clock.is_night()
    }

    pub fn time_of_day_slot(&self) -> TimeOfDay {
        self.clock.time_of_day()
    }

    pub fn now(&self) -> GameTime {
        self.clock.now()
    }

    pub fn status(&self) -> SimStatus {
        self.status
    }

    pub fn clock(&self) -> &Clock {
        &self.clock
    }

    pub fn actions(&self) -> &ActionState {
        &self.actions
    }

    pub fn threat(&self) -> &ThreatScore {
        &self.threat
    }

    pub fn scheduler(&self) -> &Scheduler {
        &self.scheduler
    }

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn sink_mut(&mut self) -> &mut S {
        &mut self.sink
    }

    pub fn inventory_mut(&mut self) -> &mut I {
        &mut self.inventory
    }

    // ── Snapshot ──────────────────────────────────────────────────────────

    pub fn snapshot(&self) -> SimSnapshot {
        SimSnapshot {
            clock:     self.clock.snapshot(),
            actions:   self.actions.snapshot(),
            threat:    self.threat.snapshot(),
            scheduler: self.scheduler.snapshot(),
        }
    }

    pub fn restore(&mut self, snap: SimSnapshot) {
        self.clock.restore(snap.clock);
        self.actions.restore(snap.actions);
        self.threat.restore(snap.threat);
        self.scheduler.restore(snap.scheduler);
        self.status = match self.clock.config().max_days {
            Some(days) if self.clock.run_complete() => SimStatus::Survived { days },
            _ => SimStatus::Running,
        };
    }
}

// ── Batch stepping ────────────────────────────────────────────────────────────

/// Step many independent instances by the same real delta on Rayon's thread
/// pool.  Each instance is stepped with a [`NoopObserver`][crate::NoopObserver];
/// reports come back in input order.
#[cfg(feature = "parallel")]
pub fn step_all<S, I>(sims: &mut [Sim<S, I>], real_dt_secs: f64) -> Vec<TickReport>
where
    S: WorldSink + Send,
    I: Inventory + Send,
{
    use rayon::prelude::*;

    sims.par_iter_mut()
        .map(|sim| sim.step(real_dt_secs, &mut crate::NoopObserver))
        .collect()
}

/// Sequential fallback with the same contract as the parallel version.
#[cfg(not(feature = "parallel"))]
pub fn step_all<S, I>(sims: &mut [Sim<S, I>], real_dt_secs: f64) -> Vec<TickReport>
where
    S: WorldSink,
    I: Inventory,
{
    sims.iter_mut()
        .map(|sim| sim.step(real_dt_secs, &mut crate::NoopObserver))
        .collect()
}

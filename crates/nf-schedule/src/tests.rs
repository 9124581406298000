//! Unit tests for nf-schedule.

use std::time::Duration;

use nf_action::{Action, ActionState, PulseFlag};
use nf_core::{Clock, ClockConfig, ClockSnapshot, EntryId, GameTime, SimRng, SpeedPreset, TimeOfDay, WallTime};
use nf_threat::{ThreatScore, TriggerRequest};
use nf_world::{
    EffectError, EmptyInventory, EventContext, RecordingSink, SinkError, WorldEffect, WorldSink, effect_fn,
};

use crate::{
    Catalog, Deferred, DelayQueue, EventClass, EventDefinition, FIRED_LOG_CAP, Outcome,
    ResponseTable, ScheduleError, Scheduler, SchedulerSnapshot,
};

// ── Helpers ───────────────────────────────────────────────────────────────────

/// Wall milliseconds per game hour at normal (48×) speed.
const WALL_MS_PER_HOUR: u64 = 75_000;

fn clock_at(day: u32, hour: u32) -> Clock {
    let mut clock = Clock::new(ClockConfig::default());
    clock.restore(ClockSnapshot {
        game_ms:  GameTime::at(day, hour, 0).0,
        wall_ms:  0,
        speed:    SpeedPreset::Normal,
        paused:   false,
        carry_ms: 0.0,
    });
    clock
}

/// Everything the scheduler reads or writes, owned in one place.
struct Fixture {
    clock:   Clock,
    actions: ActionState,
    threat:  ThreatScore,
    sink:    RecordingSink,
    rng:     SimRng,
}

impl Fixture {
    fn at(day: u32, hour: u32) -> Self {
        Self {
            clock:   clock_at(day, hour),
            actions: ActionState::default(),
            threat:  ThreatScore::default(),
            sink:    RecordingSink::new(),
            rng:     SimRng::new(42),
        }
    }

    /// Advance, drain due entries, then evaluate the catalog.
    fn tick(&mut self, sched: &mut Scheduler, real_ms: u64) -> Vec<Outcome> {
        self.clock.advance_ms(real_ms);
        let mut out = sched.run_due(
            &self.clock,
            &mut self.actions,
            self.threat.view(),
            &EmptyInventory,
            &mut self.sink,
        );
        let ctx = EventContext::new(&self.clock, &self.actions, self.threat.view(), &EmptyInventory);
        out.extend(sched.evaluate(&ctx, &mut self.sink, &mut self.rng));
        out
    }
}

fn scheduler(defs: Vec<EventDefinition>) -> Scheduler {
    let catalog = Catalog::from_definitions(defs).expect("valid catalog");
    Scheduler::new(catalog, ResponseTable::default())
}

/// Panics on one effect id and records everything else.
struct FragileSink {
    fragile: &'static str,
    inner:   RecordingSink,
}

impl FragileSink {
    fn new(fragile: &'static str) -> Self {
        Self { fragile, inner: RecordingSink::new() }
    }
}

impl WorldSink for FragileSink {
    fn apply(&mut self, effect: &WorldEffect) -> Result<(), SinkError> {
        if effect.id == self.fragile {
            panic!("sink cannot render {}", effect.id);
        }
        self.inner.apply(effect)
    }
}

fn panicked(out: &[Outcome], id: &str) -> bool {
    out.iter().any(|o| matches!(
        o,
        Outcome::EffectFailed { source, error: EffectError::Panicked(_) } if source == id
    ))
}

fn fired_ids(out: &[Outcome]) -> Vec<String> {
    out.iter()
        .filter_map(|o| match o {
            Outcome::EventFired { id, .. } => Some(id.to_string()),
            _ => None,
        })
        .collect()
}

// ── DelayQueue ────────────────────────────────────────────────────────────────

#[cfg(test)]
mod queue {
    use super::*;

    fn effect(id: &str) -> Deferred {
        Deferred::Effect { effect: WorldEffect::new(id) }
    }

    #[test]
    fn entry_is_not_due_one_ms_early() {
        let mut q = DelayQueue::new();
        let t0 = WallTime(10_000);
        q.schedule(effect("a"), Duration::from_millis(5_000), t0);

        assert!(q.drain_due(WallTime(14_999)).is_empty());
        let due = q.drain_due(WallTime(15_000));
        assert_eq!(due.len(), 1);
        assert_eq!(due[0].payload, effect("a"));
        assert!(q.drain_due(WallTime(99_999)).is_empty());
        assert!(q.is_empty());
    }

    #[test]
    fn due_entries_drain_in_insertion_order() {
        let mut q = DelayQueue::new();
        q.schedule(effect("slow"), Duration::from_millis(100), WallTime::ZERO);
        q.schedule(effect("quick"), Duration::from_millis(10), WallTime::ZERO);
        q.schedule(effect("later"), Duration::from_millis(500), WallTime::ZERO);

        let due: Vec<Deferred> = q.drain_due(WallTime(200)).into_iter().map(|e| e.payload).collect();
        assert_eq!(due, vec![effect("slow"), effect("quick")]);
        assert_eq!(q.len(), 1);
        assert_eq!(q.next_due(), Some(WallTime(500)));
    }

    #[test]
    fn cancelled_entry_never_runs() {
        let mut q = DelayQueue::new();
        let id = q.schedule(effect("a"), Duration::from_millis(10), WallTime::ZERO);
        assert_eq!(q.cancel(id), Some(effect("a")));
        assert_eq!(q.cancel(id), None);
        assert!(q.drain_due(WallTime(1_000)).is_empty());
    }

    #[test]
    fn restore_never_reuses_pending_ids() {
        let mut q = DelayQueue::new();
        for _ in 0..3 {
            q.schedule(effect("a"), Duration::from_millis(10), WallTime::ZERO);
        }
        let mut snap = q.snapshot();
        snap.next_id = EntryId(0);

        let mut restored = DelayQueue::new();
        restored.restore(snap);
        let id = restored.schedule(effect("b"), Duration::ZERO, WallTime::ZERO);
        assert_eq!(id, EntryId(3));
        assert_eq!(restored.len(), 4);
    }
}

// ── Catalog ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod catalog {
    use super::*;

    #[test]
    fn duplicate_ids_are_rejected() {
        let result = Catalog::new()
            .with(EventDefinition::random("radio", WorldEffect::new("a")))
            .and_then(|c| c.with(EventDefinition::random("radio", WorldEffect::new("b"))));
        assert!(matches!(result, Err(ScheduleError::DuplicateEventId(id)) if id.as_str() == "radio"));
    }

    #[test]
    fn empty_ids_are_rejected() {
        let mut c = Catalog::new();
        assert!(matches!(
            c.add(EventDefinition::random("  ", WorldEffect::new("a"))),
            Err(ScheduleError::EmptyEventId)
        ));
    }

    #[test]
    fn kind_filters_keep_order() {
        let c = Catalog::from_definitions(vec![
            EventDefinition::random("r1", WorldEffect::new("a")),
            EventDefinition::scripted("s1", 1, TimeOfDay::Morning, WorldEffect::new("a")),
            EventDefinition::random("r2", WorldEffect::new("a")),
            EventDefinition::conditional("c1", WorldEffect::new("a")),
        ])
        .unwrap();
        let random: Vec<&str> = c.random().map(|d| d.id.as_str()).collect();
        assert_eq!(random, vec!["r1", "r2"]);
        assert_eq!(c.scripted().count(), 1);
        assert_eq!(c.conditional().count(), 1);
        assert_eq!(c.len(), 4);
    }

    #[test]
    fn delayed_phase_needs_cooldown_or_one_shot() {
        let phased = |id: &str| {
            EventDefinition::conditional(id, WorldEffect::new("msg_scratch"))
                .then_after(Duration::from_secs(600), WorldEffect::new("msg_door"))
        };
        let mut c = Catalog::new();
        assert!(matches!(
            c.add(phased("scratch")),
            Err(ScheduleError::UnboundedDelayedPhase(id)) if id.as_str() == "scratch"
        ));
        assert!(matches!(
            c.add(phased("scratch_zero").cooldown(Duration::ZERO)),
            Err(ScheduleError::UnboundedDelayedPhase(_))
        ));
        assert!(c.add(phased("scratch_once").one_shot()).is_ok());
        assert!(c.add(phased("scratch_hourly").cooldown(Duration::from_secs(3_600))).is_ok());
        assert_eq!(c.len(), 2);
    }
}

// ── Scripted events ───────────────────────────────────────────────────────────

#[cfg(test)]
mod scripted {
    use super::*;

    fn radio() -> EventDefinition {
        EventDefinition::scripted("radio_day3", 3, TimeOfDay::Afternoon, WorldEffect::new("radio_broadcast"))
    }

    #[test]
    fn fires_once_at_its_slot() {
        let mut sched = scheduler(vec![radio()]);
        let mut fx = Fixture::at(3, 11);

        assert!(fired_ids(&fx.tick(&mut sched, 0)).is_empty());
        // 11:00 → 12:00 enters the afternoon slot.
        assert_eq!(fired_ids(&fx.tick(&mut sched, WALL_MS_PER_HOUR)), vec!["radio_day3"]);
        for _ in 0..5 {
            assert!(fired_ids(&fx.tick(&mut sched, WALL_MS_PER_HOUR / 4)).is_empty());
        }
        assert_eq!(fx.sink.count_of("radio_broadcast"), 1);
        assert!(sched.has_fired("radio_day3"));
    }

    #[test]
    fn revisiting_the_slot_after_reload_does_not_refire() {
        let mut sched = scheduler(vec![radio()]);
        let mut fx = Fixture::at(3, 13);
        fx.tick(&mut sched, 0);
        let saved = sched.snapshot();

        for _ in 0..3 {
            let mut reloaded = scheduler(vec![radio()]);
            reloaded.restore(saved.clone());
            let mut fx = Fixture::at(3, 14);
            assert!(fired_ids(&fx.tick(&mut reloaded, 0)).is_empty());
        }
        assert_eq!(fx.sink.count_of("radio_broadcast"), 1);
    }

    #[test]
    fn predicate_gates_scripted_event() {
        let def = radio().when(|ctx| ctx.has_item("radio"));
        let mut sched = scheduler(vec![def]);
        let mut fx = Fixture::at(3, 12);
        assert!(fired_ids(&fx.tick(&mut sched, 0)).is_empty());
        assert!(!sched.has_fired("radio_day3"));
    }

    #[test]
    fn failing_effect_is_still_marked_fired() {
        let mut sched = scheduler(vec![radio()]);
        let mut fx = Fixture::at(3, 12);
        fx.sink = RecordingSink::rejecting(["radio_broadcast"]);

        let out = fx.tick(&mut sched, 0);
        assert!(out.iter().any(|o| matches!(o, Outcome::EffectFailed { .. })));
        assert!(sched.has_fired("radio_day3"));
        assert!(fired_ids(&fx.tick(&mut sched, 1_000)).is_empty());
    }
}

// ── Random events ─────────────────────────────────────────────────────────────

#[cfg(test)]
mod random {
    use super::*;

    fn pool() -> Vec<EventDefinition> {
        vec![
            EventDefinition::random("stray_dog", WorldEffect::new("msg_stray_dog")),
            EventDefinition::random("airdrop", WorldEffect::new("spawn_airdrop")),
        ]
    }

    #[test]
    fn at_most_one_random_event_per_tick() {
        let mut sched = scheduler(pool()).with_random_chance(1.0);
        let mut fx = Fixture::at(1, 9);

        assert_eq!(fired_ids(&fx.tick(&mut sched, 1_000)), vec!["stray_dog"]);
        assert_eq!(fired_ids(&fx.tick(&mut sched, 1_000)), vec!["airdrop"]);
        assert!(fired_ids(&fx.tick(&mut sched, 1_000)).is_empty());
    }

    #[test]
    fn ineligible_event_is_skipped_not_consumed() {
        let mut defs = pool();
        defs[0] = EventDefinition::random("stray_dog", WorldEffect::new("msg_stray_dog")).when(|ctx| ctx.is_night());
        let mut sched = scheduler(defs).with_random_chance(1.0);
        let mut fx = Fixture::at(1, 9);

        assert_eq!(fired_ids(&fx.tick(&mut sched, 1_000)), vec!["airdrop"]);
        assert!(!sched.has_fired("stray_dog"));
    }

    #[test]
    fn no_roll_without_elapsed_time() {
        let mut sched = scheduler(pool()).with_random_chance(1.0);
        let mut fx = Fixture::at(1, 9);
        assert!(fired_ids(&fx.tick(&mut sched, 0)).is_empty());
        fx.clock.pause();
        assert!(fired_ids(&fx.tick(&mut sched, 1_000)).is_empty());
    }

    #[test]
    fn zero_chance_never_fires() {
        let mut sched = scheduler(pool()).with_random_chance(0.0);
        let mut fx = Fixture::at(1, 9);
        for _ in 0..100 {
            assert!(fired_ids(&fx.tick(&mut sched, WALL_MS_PER_HOUR)).is_empty());
        }
    }
}

// ── Conditional events ────────────────────────────────────────────────────────

#[cfg(test)]
mod conditional {
    use super::*;

    #[test]
    fn immediate_then_delayed_effect_runs_once() {
        let def = EventDefinition::conditional("scratching", WorldEffect::new("msg_scratching"))
            .cooldown(Duration::from_secs(4 * 3_600))
            .then_after(Duration::from_secs(30 * 60), WorldEffect::new("pack_arrives").count(3));
        let mut sched = scheduler(vec![def]);
        let mut fx = Fixture::at(1, 20);

        fx.tick(&mut sched, 0);
        assert_eq!(fx.sink.ids(), vec!["msg_scratching"]);

        // 30 game minutes = 37 500 wall ms; tick every 500 ms.
        for _ in 0..74 {
            fx.tick(&mut sched, 500);
        }
        assert_eq!(fx.sink.count_of("pack_arrives"), 0);
        fx.tick(&mut sched, 500);
        assert_eq!(fx.sink.count_of("pack_arrives"), 1);

        for _ in 0..200 {
            fx.tick(&mut sched, 500);
        }
        assert_eq!(fx.sink.count_of("pack_arrives"), 1);
        assert_eq!(fx.sink.count_of("msg_scratching"), 1);
    }

    #[test]
    fn rearms_after_cooldown() {
        let def = EventDefinition::conditional("howl", WorldEffect::new("msg_howl"))
            .cooldown(Duration::from_secs(3_600));
        let mut sched = scheduler(vec![def]);
        let mut fx = Fixture::at(1, 20);

        assert_eq!(fired_ids(&fx.tick(&mut sched, 0)), vec!["howl"]);
        // 59 game minutes.
        assert!(fired_ids(&fx.tick(&mut sched, WALL_MS_PER_HOUR * 59 / 60)).is_empty());
        assert_eq!(fired_ids(&fx.tick(&mut sched, WALL_MS_PER_HOUR / 60)), vec!["howl"]);
        assert_eq!(sched.last_fired("howl"), Some(GameTime::at(1, 21, 0)));
        assert!(!sched.has_fired("howl"));
    }

    #[test]
    fn one_shot_never_rearms() {
        let def = EventDefinition::conditional("first_snow", WorldEffect::new("msg_snow"))
            .cooldown(Duration::from_secs(60))
            .one_shot();
        let mut sched = scheduler(vec![def]);
        let mut fx = Fixture::at(1, 8);

        assert_eq!(fired_ids(&fx.tick(&mut sched, 0)), vec!["first_snow"]);
        for _ in 0..10 {
            assert!(fired_ids(&fx.tick(&mut sched, WALL_MS_PER_HOUR)).is_empty());
        }
        assert!(sched.has_fired("first_snow"));
    }

    #[test]
    fn no_cooldown_fires_while_predicate_holds() {
        let def = EventDefinition::conditional("smoke_warning", WorldEffect::new("msg_smoke"))
            .when(|ctx| ctx.actions.signals().smoke_visible);
        let mut sched = scheduler(vec![def]);
        let mut fx = Fixture::at(1, 8);

        assert!(fired_ids(&fx.tick(&mut sched, 100)).is_empty());
        fx.actions.record(Action::HeatSourceOn, fx.clock.now());
        assert_eq!(fired_ids(&fx.tick(&mut sched, 100)).len(), 1);
        assert_eq!(fired_ids(&fx.tick(&mut sched, 100)).len(), 1);
        fx.actions.record(Action::VentilationOpened, fx.clock.now());
        assert!(fired_ids(&fx.tick(&mut sched, 100)).is_empty());
    }

    #[test]
    fn panicking_effect_does_not_stop_other_events() {
        let boom = EventDefinition::conditional(
            "boom",
            effect_fn(|_, _| -> nf_world::EffectResult { panic!("effect exploded") }),
        )
        .one_shot();
        let calm = EventDefinition::conditional("calm", WorldEffect::new("msg_calm")).one_shot();
        let mut sched = scheduler(vec![boom, calm]);
        let mut fx = Fixture::at(1, 8);

        let out = fx.tick(&mut sched, 0);
        assert_eq!(fired_ids(&out), vec!["boom", "calm"]);
        assert!(out.iter().any(|o| matches!(
            o,
            Outcome::EffectFailed { source, error: EffectError::Panicked(msg) }
                if source == "boom" && msg.contains("exploded")
        )));
        assert_eq!(fx.sink.ids(), vec!["msg_calm"]);
        assert!(sched.has_fired("boom"));
    }

    #[test]
    fn effect_follow_ups_are_queued() {
        let def = EventDefinition::conditional(
            "knock",
            effect_fn(|_, world| {
                world.emit(&WorldEffect::new("msg_knock"))?;
                world.emit_after(Duration::from_secs(60 * 60), WorldEffect::new("msg_second_knock"));
                Ok(())
            }),
        )
        .one_shot();
        let mut sched = scheduler(vec![def]);
        let mut fx = Fixture::at(1, 8);

        fx.tick(&mut sched, 0);
        assert_eq!(sched.pending().count(), 1);
        fx.tick(&mut sched, WALL_MS_PER_HOUR);
        assert_eq!(fx.sink.ids(), vec!["msg_knock", "msg_second_knock"]);
    }

    #[test]
    fn fired_lookups_by_id() {
        let once = EventDefinition::conditional("first_frost", WorldEffect::new("msg_frost")).one_shot();
        let hourly = EventDefinition::conditional("creak", WorldEffect::new("msg_creak"))
            .cooldown(Duration::from_secs(3_600));
        let mut sched = scheduler(vec![once, hourly]);
        let mut fx = Fixture::at(2, 6);

        assert!(!sched.has_fired("first_frost"));
        assert_eq!(sched.last_fired("creak"), None);
        fx.tick(&mut sched, 0);
        assert!(sched.has_fired("first_frost"));
        assert!(!sched.has_fired("creak"));
        assert_eq!(sched.last_fired("creak"), Some(GameTime::at(2, 6, 0)));
        assert_eq!(sched.last_fired("first_frost"), None);
        assert!(!sched.has_fired("no_such_event"));
        assert_eq!(sched.last_fired("no_such_event"), None);
    }
}

// ── Sink failures ─────────────────────────────────────────────────────────────

#[cfg(test)]
mod sink_failures {
    use super::*;

    #[test]
    fn panicking_sink_spares_later_due_entries() {
        let mut sched = scheduler(vec![]);
        let mut fx = Fixture::at(1, 8);
        let mut sink = FragileSink::new("msg_cursed");
        sched.schedule_effect(WorldEffect::new("msg_cursed"), Duration::from_secs(600), &fx.clock);
        sched.schedule_effect(WorldEffect::new("msg_after"), Duration::from_secs(600), &fx.clock);

        fx.clock.advance_ms(WALL_MS_PER_HOUR);
        let out = sched.run_due(&fx.clock, &mut fx.actions, fx.threat.view(), &EmptyInventory, &mut sink);

        assert!(panicked(&out, "msg_cursed"));
        assert!(out.iter().any(|o| matches!(
            o,
            Outcome::DeferredApplied { effect_id, .. } if effect_id == "msg_after"
        )));
        assert_eq!(sink.inner.ids(), vec!["msg_after"]);
        assert_eq!(sched.pending().count(), 0);
    }

    #[test]
    fn panicking_sink_during_immediate_response_is_reported() {
        let mut sched = scheduler(vec![]);
        let mut fx = Fixture::at(3, 23);
        let mut sink = FragileSink::new("marauder_raid");
        let req = TriggerRequest {
            name:            "marauder_raid".to_owned(),
            priority:        2,
            suggested_delay: Duration::ZERO,
            points:          120.0,
        };
        let out = sched.handle_trigger(req, &fx.clock, &mut fx.rng, &mut sink);

        assert!(panicked(&out, "marauder_raid"));
        assert!(out.iter().any(|o| matches!(o, Outcome::TriggerHandled { delayed: None, .. })));
        assert!(sink.inner.ids().is_empty());
    }
}

// ── Threat responses ──────────────────────────────────────────────────────────

#[cfg(test)]
mod threat_responses {
    use super::*;

    fn request(name: &str, delay_mins: u64) -> TriggerRequest {
        TriggerRequest {
            name:            name.to_owned(),
            priority:        2,
            suggested_delay: Duration::from_secs(delay_mins * 60),
            points:          120.0,
        }
    }

    #[test]
    fn zero_delay_applies_immediately() {
        let mut sched = scheduler(vec![]);
        let mut fx = Fixture::at(3, 23);
        let out = sched.handle_trigger(request("marauder_raid", 0), &fx.clock, &mut fx.rng, &mut fx.sink);

        assert!(matches!(&out[..], [Outcome::TriggerHandled { delayed: None, .. }]));
        assert_eq!(fx.sink.ids(), vec!["marauder_raid"]);
        let count = fx.sink.applied[0].params.count;
        assert!((3..=6).contains(&count));
        assert_eq!(sched.pending().count(), 0);
    }

    #[test]
    fn delayed_response_warns_first() {
        let mut sched = scheduler(vec![]);
        let mut fx = Fixture::at(2, 21);
        let out = sched.handle_trigger(request("mongrel_attack", 30), &fx.clock, &mut fx.rng, &mut fx.sink);

        assert!(matches!(&out[..], [Outcome::TriggerHandled { delayed: Some(_), .. }]));
        assert_eq!(fx.sink.ids(), vec!["close_howling"]);

        fx.tick(&mut sched, 37_499);
        assert_eq!(fx.sink.count_of("spawn_mongrels"), 0);
        fx.tick(&mut sched, 1);
        assert_eq!(fx.sink.count_of("spawn_mongrels"), 1);
        let spawn = &fx.sink.applied[1];
        assert!((2..=4).contains(&spawn.params.count));
        assert_eq!(spawn.params.message_key.as_deref(), Some("threat.mongrels_attack"));
    }

    #[test]
    fn delayed_response_can_be_cancelled() {
        let mut sched = scheduler(vec![]);
        let mut fx = Fixture::at(2, 21);
        let out = sched.handle_trigger(request("mongrel_investigation", 45), &fx.clock, &mut fx.rng, &mut fx.sink);
        let Some(Outcome::TriggerHandled { delayed: Some(entry), .. }) = out.last() else {
            panic!("expected a queued response");
        };
        assert!(sched.cancel(*entry).is_some());
        fx.tick(&mut sched, 10 * WALL_MS_PER_HOUR);
        assert_eq!(fx.sink.count_of("spawn_mongrels"), 0);
    }

    #[test]
    fn unknown_threshold_gets_generic_effect() {
        let mut sched = scheduler(vec![]);
        let mut fx = Fixture::at(1, 12);
        sched.handle_trigger(request("wolves", 0), &fx.clock, &mut fx.rng, &mut fx.sink);
        assert_eq!(fx.sink.ids(), vec!["wolves"]);
        assert_eq!(fx.sink.applied[0].params.severity, 2);
        let logged: Vec<EventClass> = sched.fired_log().map(|f| f.class).collect();
        assert_eq!(logged, vec![EventClass::Threat]);
    }
}

// ── Pulse resets ──────────────────────────────────────────────────────────────

#[cfg(test)]
mod pulses {
    use super::*;

    #[test]
    fn pulse_is_lowered_after_its_duration() {
        let mut sched = scheduler(vec![]);
        let mut fx = Fixture::at(1, 8);
        let req = fx.actions.record(Action::DoorOpened, fx.clock.now()).expect("pulsed");
        sched.schedule_pulse_reset(req, fx.clock.wall());

        fx.tick(&mut sched, 4_999);
        assert!(fx.actions.signals().pulse(PulseFlag::DoorOpen));
        let out = fx.tick(&mut sched, 1);
        assert!(out.contains(&Outcome::PulseCleared { flag: PulseFlag::DoorOpen }));
        assert!(!fx.actions.signals().pulse(PulseFlag::DoorOpen));
    }

    #[test]
    fn repulse_outlives_the_earlier_reset() {
        let mut sched = scheduler(vec![]);
        let mut fx = Fixture::at(1, 8);
        let first = fx.actions.record(Action::Cooking, fx.clock.now()).expect("pulsed");
        sched.schedule_pulse_reset(first, fx.clock.wall());

        fx.tick(&mut sched, 20_000);
        let second = fx.actions.record(Action::Cooking, fx.clock.now()).expect("pulsed");
        sched.schedule_pulse_reset(second, fx.clock.wall());

        // First reset (due at 30 s) is stale.
        fx.tick(&mut sched, 10_000);
        assert!(fx.actions.signals().pulse(PulseFlag::CookingSmell));
        // Second reset is due at 50 s.
        fx.tick(&mut sched, 20_000);
        assert!(!fx.actions.signals().pulse(PulseFlag::CookingSmell));
    }
}

// ── Snapshot / log ────────────────────────────────────────────────────────────

#[cfg(test)]
mod snapshot {
    use super::*;

    fn catalog() -> Vec<EventDefinition> {
        vec![
            EventDefinition::conditional("scratching", WorldEffect::new("msg_scratching"))
                .cooldown(Duration::from_secs(4 * 3_600))
                .then_after(Duration::from_secs(30 * 60), WorldEffect::new("pack_arrives")),
        ]
    }

    #[test]
    fn round_trip_resumes_pending_phase() {
        let mut sched = scheduler(catalog());
        let mut fx = Fixture::at(1, 20);
        fx.tick(&mut sched, 0);

        let snap = sched.snapshot();
        let json = serde_json::to_string(&snap).unwrap();
        let back: SchedulerSnapshot = serde_json::from_str(&json).unwrap();
        assert_eq!(back, snap);

        let mut restored = scheduler(catalog());
        restored.restore(back);
        assert_eq!(restored.snapshot(), snap);

        // Both instances behave the same from here on.
        let mut fx2 = Fixture::at(1, 20);
        for _ in 0..100 {
            fx.tick(&mut sched, 500);
            fx2.tick(&mut restored, 500);
        }
        assert_eq!(fx.sink.count_of("pack_arrives"), 1);
        assert_eq!(fx2.sink.count_of("pack_arrives"), 1);
        assert_eq!(fx2.sink.count_of("msg_scratching"), 0);
    }

    #[test]
    fn fired_log_is_bounded() {
        let def = EventDefinition::conditional("tick", WorldEffect::new("msg"));
        let mut sched = scheduler(vec![def]);
        let mut fx = Fixture::at(1, 8);
        for _ in 0..(FIRED_LOG_CAP + 10) {
            fx.tick(&mut sched, 100);
        }
        assert_eq!(sched.fired_log().count(), FIRED_LOG_CAP);
        assert!(sched.fired_log().all(|f| f.class == EventClass::Conditional));
    }
}

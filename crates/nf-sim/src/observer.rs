//! Simulation observer trait for UI hooks and data collection.

use nf_core::{EventId, GameTime};
use nf_schedule::EventClass;
use nf_threat::TriggerRequest;
use nf_world::EffectError;

use crate::TickReport;

/// Callbacks invoked by [`Sim::step`][crate::Sim::step] at key points of the
/// tick pipeline.
///
/// All methods have default no-op implementations so implementors only need
/// to override what they care about.
///
/// # Example — nightfall banner
///
/// ```rust,ignore
/// struct Banner;
///
/// impl SimObserver for Banner {
///     fn on_nightfall(&mut self, day: u32) {
///         println!("night {day} falls");
///     }
/// }
/// ```
pub trait SimObserver {
    /// Called at the very start of each step, before the clock advances.
    fn on_tick_start(&mut self, _now: GameTime) {}

    /// Called at the end of each step with everything it did.
    fn on_tick_end(&mut self, _now: GameTime, _report: &TickReport) {}

    fn on_day_started(&mut self, _day: u32) {}

    fn on_nightfall(&mut self, _day: u32) {}

    fn on_dawn(&mut self, _day: u32) {}

    /// A threat threshold fired this step.
    fn on_trigger(&mut self, _request: &TriggerRequest) {}

    fn on_event_fired(&mut self, _id: &EventId, _class: EventClass) {}

    /// An effect failed or panicked; `source` is an event or effect id.
    fn on_effect_failed(&mut self, _source: &str, _error: &EffectError) {}

    /// Called once, on the step that completes the final day.
    fn on_run_complete(&mut self, _days: u32) {}
}

/// A [`SimObserver`] that does nothing.
pub struct NoopObserver;

impl SimObserver for NoopObserver {}

//! Fluent builder for constructing a [`Sim`].

use std::path::Path;

use nf_action::ActionState;
use nf_core::{Clock, SimRng};
use nf_schedule::{Catalog, EventDefinition, Scheduler};
use nf_threat::{ThreatScore, load_thresholds_csv};
use nf_world::{EmptyInventory, Inventory, WorldSink};

use crate::{Sim, SimConfig, SimResult, SimStatus};

/// Fluent builder for [`Sim<S, I>`].
///
/// # Required inputs
///
/// - [`SimConfig`] — clock, thresholds, responses, seed, …
/// - `S: WorldSink` — where world effects are delivered
///
/// # Optional inputs (have defaults)
///
/// | Method                  | Default                          |
/// |-------------------------|----------------------------------|
/// | `.event(def)`           | Empty catalog                    |
/// | `.inventory(inv)`       | `EmptyInventory`                 |
/// | `.thresholds_csv(path)` | `config.threat.thresholds`       |
/// | `.seed(s)`              | `config.seed` (entropy if unset) |
///
/// # Example
///
/// ```rust,ignore
/// let mut sim = SimBuilder::new(SimConfig::default(), TracingSink::default())
///     .event(EventDefinition::scripted("first_light", 1, TimeOfDay::Morning, intro))
///     .seed(7)
///     .build()?;
/// sim.step(0.016, &mut NoopObserver);
/// ```
pub struct SimBuilder<S: WorldSink, I: Inventory = EmptyInventory> {
    config:    SimConfig,
    sink:      S,
    inventory: I,
    events:    Vec<EventDefinition>,
}

impl<S: WorldSink> SimBuilder<S> {
    pub fn new(config: SimConfig, sink: S) -> Self {
        Self { config, sink, inventory: EmptyInventory, events: Vec::new() }
    }
}

impl<S: WorldSink, I: Inventory> SimBuilder<S, I> {
    /// Add one event definition.  Duplicate ids are reported by `build`.
    pub fn event(mut self, def: EventDefinition) -> Self {
        self.events.push(def);
        self
    }

    /// Add many event definitions, in order.
    pub fn events(mut self, defs: impl IntoIterator<Item = EventDefinition>) -> Self {
        self.events.extend(defs);
        self
    }

    /// Supply the player inventory read by event predicates.
    pub fn inventory<J: Inventory>(self, inventory: J) -> SimBuilder<S, J> {
        SimBuilder { config: self.config, sink: self.sink, inventory, events: self.events }
    }

    /// Replace the configured thresholds with those in a CSV file.
    pub fn thresholds_csv(mut self, path: &Path) -> SimResult<Self> {
        self.config.threat.thresholds = load_thresholds_csv(path)?;
        Ok(self)
    }

    pub fn seed(mut self, seed: u64) -> Self {
        self.config.seed = Some(seed);
        self
    }

    /// Validate the configuration, build the catalog, and return a
    /// ready-to-step [`Sim`].
    pub fn build(self) -> SimResult<Sim<S, I>> {
        self.config.validate()?;
        let catalog = Catalog::from_definitions(self.events)?;

        let scheduler = Scheduler::new(catalog, self.config.responses.clone())
            .with_random_chance(self.config.random_chance_per_hour);
        let clock = Clock::new(self.config.clock.clone());
        let actions = ActionState::new(self.config.actions.clone());
        let threat = ThreatScore::new(self.config.threat.clone());
        let rng = SimRng::from_seed_opt(self.config.seed);

        tracing::debug!(
            events = scheduler.catalog().len(),
            thresholds = self.config.threat.thresholds.len(),
            seed = ?self.config.seed,
            "simulation built"
        );

        Ok(Sim {
            config: self.config,
            clock,
            actions,
            threat,
            scheduler,
            rng,
            sink: self.sink,
            inventory: self.inventory,
            status: SimStatus::Running,
        })
    }
}

//! `Catalog` — the ordered list of event definitions.

use nf_core::EventId;

use crate::{EventDefinition, EventKind, ScheduleError, ScheduleResult};

/// Event definitions in registration order.  Ids are unique.
///
/// Order matters: random events are scanned in catalog order and only the
/// first eligible one fires on a given tick.
#[derive(Debug, Default)]
pub struct Catalog {
    events: Vec<EventDefinition>,
}

impl Catalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from an iterator, rejecting duplicate or empty ids and
    /// conditional events whose delayed phase could repeat every tick.
    pub fn from_definitions<I>(defs: I) -> ScheduleResult<Self>
    where
        I: IntoIterator<Item = EventDefinition>,
    {
        let mut catalog = Catalog::new();
        for def in defs {
            catalog.add(def)?;
        }
        Ok(catalog)
    }

    pub fn add(&mut self, def: EventDefinition) -> ScheduleResult<()> {
        if def.id.as_str().trim().is_empty() {
            return Err(ScheduleError::EmptyEventId);
        }
        if self.get(def.id.as_str()).is_some() {
            return Err(ScheduleError::DuplicateEventId(def.id));
        }
        // Would queue one delayed phase per tick while the predicate holds.
        if let EventKind::Conditional { cooldown, one_shot: false } = def.kind {
            if def.delayed.is_some() && cooldown.is_none_or(|c| c.is_zero()) {
                return Err(ScheduleError::UnboundedDelayedPhase(def.id));
            }
        }
        self.events.push(def);
        Ok(())
    }

    /// Builder-style [`add`][Self::add].
    pub fn with(mut self, def: EventDefinition) -> ScheduleResult<Self> {
        self.add(def)?;
        Ok(self)
    }

    pub fn get(&self, id: &str) -> Option<&EventDefinition> {
        self.events.iter().find(|d| d.id.as_str() == id)
    }

    pub fn contains(&self, id: &EventId) -> bool {
        self.get(id.as_str()).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = &EventDefinition> {
        self.events.iter()
    }

    pub fn scripted(&self) -> impl Iterator<Item = &EventDefinition> {
        self.events.iter().filter(|d| matches!(d.kind, EventKind::Scripted { .. }))
    }

    pub fn random(&self) -> impl Iterator<Item = &EventDefinition> {
        self.events.iter().filter(|d| matches!(d.kind, EventKind::Random))
    }

    pub fn conditional(&self) -> impl Iterator<Item = &EventDefinition> {
        self.events.iter().filter(|d| matches!(d.kind, EventKind::Conditional { .. }))
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}

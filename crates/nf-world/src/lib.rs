//! `nf-world` — the boundary between the simulation core and the game.
//!
//! # Crate layout
//!
//! | Module           | Contents                                                  |
//! |------------------|-----------------------------------------------------------|
//! | [`effect`]       | `WorldEffect`, `EffectParams`                             |
//! | [`sink`]         | `WorldSink` trait, `NoopSink`, `TracingSink`, `RecordingSink` |
//! | [`inventory`]    | `Inventory` trait, `EmptyInventory`                       |
//! | [`context`]      | `EventContext<'a>` — read-only state for predicates/effects |
//! | [`handle`]       | `WorldHandle<'a>`, `FollowUp`                             |
//! | [`event_effect`] | `EventEffect` trait, `effect_fn`, `FnEffect`              |
//! | [`error`]        | `SinkError`, `EffectError`, `EffectResult<T>`             |
//!
//! # Design notes
//!
//! The core only ever describes *which* effect with *what* parameters.  The
//! game implements [`WorldSink`] to realize them.  Event effects receive a
//! [`WorldHandle`] at invocation time and act only through it, so no effect
//! can reach the game (or the rest of the simulation) through global state.

pub mod context;
pub mod effect;
pub mod error;
pub mod event_effect;
pub mod handle;
pub mod inventory;
pub mod sink;


pub use context::EventContext;
pub use effect::{EffectParams, WorldEffect};
pub use error::{EffectError, EffectResult, SinkError};
pub use event_effect::{EventEffect, FnEffect, effect_fn};
pub use handle::{FollowUp, WorldHandle};
pub use inventory::{EmptyInventory, Inventory};
pub use sink::{NoopSink, RecordingSink, TracingSink, WorldSink};

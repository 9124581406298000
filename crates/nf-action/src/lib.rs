//! `nf-action` — the live record of player activity.
//!
//! # Crate layout
//!
//! | Module     | Contents                                                   |
//! |------------|------------------------------------------------------------|
//! | [`action`] | `Action` enum, `PulseFlag`, `PulseRequest`                 |
//! | [`state`]  | `ActionState`, `Signals`, `ActionConfig`, `ActionSnapshot` |
//!
//! # Pulsed flags
//!
//! Some actions raise a flag that should drop again on its own a few seconds
//! later.  `ActionState` never owns a timer: `record` returns a
//! [`PulseRequest`] and the simulation hands it to the scheduler's
//! delayed-entry queue, which calls [`ActionState::clear_pulse`] when due.
//! All "later" mutation therefore lives in one queue that can be inspected
//! and snapshotted.

pub mod action;
pub mod state;


pub use action::{Action, PulseFlag, PulseRequest};
pub use state::{ActionConfig, ActionRecord, ActionSnapshot, ActionState, Pulse, Signals};

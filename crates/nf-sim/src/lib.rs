//! `nf-sim` — one simulation instance and its per-step pipeline.
//!
//! # Step pipeline
//!
//! ```text
//! sim.step(real_dt_secs, &mut observer):
//!   ① Clock     — advance wall + game time; report dawn / nightfall / new day.
//!   ② Actions   — recompute derived signals, decay noise.
//!   ③ Threat    — re-score, decay, fire ≤ 1 threshold → scheduler response.
//!   ④ Due       — apply delayed-entry queue entries whose wall time arrived.
//!   ⑤ Catalog   — scripted, then ≤ 1 random, then conditional events.
//! ```
//!
//! # Crate layout
//!
//! | Module       | Contents                                                  |
//! |--------------|-----------------------------------------------------------|
//! | [`sim`]      | `Sim`, `TickReport`, `SimStatus`, `SimSnapshot`, `step_all` |
//! | [`builder`]  | `SimBuilder`                                              |
//! | [`config`]   | `SimConfig` (TOML)                                        |
//! | [`observer`] | `SimObserver`, `NoopObserver`                             |
//! | [`error`]    | `SimError`, `SimResult<T>`                                |
//!
//! # Cargo features
//!
//! | Feature    | Effect                                                   |
//! |------------|----------------------------------------------------------|
//! | `parallel` | `step_all` steps independent instances on Rayon.         |
//!
//! # Quick-start
//!
//! ```rust,ignore
//! use nf_sim::{NoopObserver, SimBuilder, SimConfig};
//! use nf_world::TracingSink;
//!
//! let mut sim = SimBuilder::new(SimConfig::from_file(path)?, TracingSink::default())
//!     .events(my_catalog())
//!     .build()?;
//! loop {
//!     sim.step(frame_dt, &mut NoopObserver);
//! }
//! ```

pub mod builder;
pub mod config;
pub mod error;
pub mod observer;
pub mod sim;


pub use builder::SimBuilder;
pub use config::SimConfig;
pub use error::{SimError, SimResult};
pub use observer::{NoopObserver, SimObserver};
pub use sim::{Sim, SimSnapshot, SimStatus, TickReport, step_all};

//! first-night — a scripted three-day run of the rust_nightfall core.
//!
//! A simulated player keeps a daily routine (fire in the evening, cooking,
//! a lamp at night) while the simulation escalates threat, fires catalog
//! events, and logs every world effect through `tracing`.
//!
//! Run with `RUST_LOG=debug` to see the scheduler's internals.

use std::collections::BTreeMap;
use std::time::Duration;

use anyhow::Result;
use tracing_subscriber::EnvFilter;

use nf_core::{EventId, TimeOfDay};
use nf_schedule::{EventClass, EventDefinition};
use nf_sim::{SimBuilder, SimConfig, SimObserver, SimStatus, TickReport};
use nf_threat::{ThreatLevel, TriggerRequest};
use nf_world::{EffectError, TracingSink, WorldEffect, effect_fn};

// ── Constants ─────────────────────────────────────────────────────────────────

/// Real seconds fed to each step (36 game seconds at `fast`).
const REAL_DT_SECS: f64 = 0.5;

const CONFIG_TOML: &str = r#"
seed = 7
random_chance_per_hour = 0.08

[clock]
speed = "fast"
max_days = 3
"#;

// ── Event catalog ─────────────────────────────────────────────────────────────

fn catalog() -> Vec<EventDefinition> {
    vec![
        EventDefinition::scripted(
            "first_morning",
            1,
            TimeOfDay::Morning,
            WorldEffect::new("narration").message("intro.first_morning"),
        ),
        EventDefinition::scripted(
            "supply_drop",
            2,
            TimeOfDay::Afternoon,
            effect_fn(|_ctx, world| {
                world.emit(&WorldEffect::new("aircraft_overhead").message("event.supply_plane"))?;
                world.emit_after(
                    Duration::from_secs(30 * 60),
                    WorldEffect::new("supply_crate").count(1),
                );
                Ok(())
            }),
        ),
        EventDefinition::random(
            "distant_gunfire",
            WorldEffect::new("ambient_sound").message("ambient.gunfire"),
        ),
        EventDefinition::random("wind_gust", WorldEffect::new("ambient_sound").message("ambient.wind")),
        EventDefinition::conditional("cold_snap", WorldEffect::new("temperature_drop").severity(1))
            .when(|ctx| ctx.is_night() && !ctx.actions.signals().heat_source_active)
            .cooldown(Duration::from_secs(6 * 3600)),
        EventDefinition::conditional(
            "torch_sputters",
            WorldEffect::new("item_worn").message("item.torch_sputters"),
        )
        .when(|ctx| ctx.has_item("torch") && ctx.day() >= 2)
        .one_shot(),
        EventDefinition::conditional(
            "mongrels_sniffing",
            WorldEffect::new("ambient_sound").message("threat.sniffing"),
        )
        .when(|ctx| ctx.threat_level() >= ThreatLevel::Medium)
        .cooldown(Duration::from_secs(2 * 3600))
        .then_after(Duration::from_secs(20 * 60), WorldEffect::new("paw_prints")),
    ]
}

// ── Simulated player ──────────────────────────────────────────────────────────

/// Actions the player takes when the clock reaches `hour`.
fn routine(hour: u32) -> &'static [(&'static str, Option<f32>)] {
    match hour {
        8 => &[("ventilation_opened", None)],
        12 => &[("noise", Some(30.0))],
        17 => &[("heat_source_on", None), ("ventilation_closed", None)],
        18 => &[("cooking", None)],
        19 => &[("light_on", None)],
        20 => &[("door_opened", None), ("waste_disposed", None)],
        22 => &[("opening_secured", None), ("light_off", None)],
        23 => &[("heat_source_off", None)],
        _ => &[],
    }
}

// ── Observer ──────────────────────────────────────────────────────────────────

#[derive(Default)]
struct NightLog {
    steps:     u64,
    peak:      f32,
    triggers:  Vec<String>,
    by_class:  BTreeMap<String, u32>,
    failures:  u32,
}

impl SimObserver for NightLog {
    fn on_tick_end(&mut self, _now: nf_core::GameTime, report: &TickReport) {
        self.steps += 1;
        self.peak = self.peak.max(report.points);
    }

    fn on_day_started(&mut self, day: u32) {
        println!("── day {day} ──");
    }

    fn on_nightfall(&mut self, day: u32) {
        println!("   night {day} falls");
    }

    fn on_trigger(&mut self, request: &TriggerRequest) {
        println!("   threat threshold {:?} reached at {:.0} points", request.name, request.points);
        self.triggers.push(request.name.clone());
    }

    fn on_event_fired(&mut self, id: &EventId, class: EventClass) {
        println!("   event {id} ({class})");
        *self.by_class.entry(class.to_string()).or_default() += 1;
    }

    fn on_effect_failed(&mut self, source: &str, error: &EffectError) {
        eprintln!("   effect {source} failed: {error}");
        self.failures += 1;
    }

    fn on_run_complete(&mut self, days: u32) {
        println!("── survived {days} days ──");
    }
}

// ── main ──────────────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .init();

    println!("=== first-night — rust_nightfall ===");

    let config = SimConfig::from_toml(CONFIG_TOML)?;
    let inventory: BTreeMap<String, u32> = BTreeMap::from([("torch".to_owned(), 1)]);
    let mut sim = SimBuilder::new(config, TracingSink::default())
        .events(catalog())
        .inventory(inventory)
        .build()?;
    println!(
        "Catalog: {} events  |  Thresholds: {}  |  Start: {}",
        sim.scheduler().catalog().len(),
        sim.config().threat.thresholds.len(),
        sim.clock(),
    );

    let mut log = NightLog::default();
    let mut last = (sim.current_day(), sim.clock().hour());
    while sim.status() == SimStatus::Running {
        sim.step(REAL_DT_SECS, &mut log);

        let now = (sim.current_day(), sim.clock().hour());
        if now != last {
            for &(action, intensity) in routine(now.1) {
                sim.record_named(action, intensity);
            }
            last = now;
        }
    }

    let snapshot = serde_json::to_string(&sim.snapshot())?;
    println!();
    println!("Steps:            {}", log.steps);
    println!("Peak threat:      {:.1}", log.peak);
    println!("Final threat:     {:.1} ({})", sim.current_points(), sim.current_threat_level());
    println!("Thresholds fired: {}", log.triggers.join(", "));
    for (class, n) in &log.by_class {
        println!("Events {class:<11} {n}");
    }
    println!("World effects:    {}", sim.sink().applied);
    println!("Effect failures:  {}", log.failures);
    println!("Snapshot size:    {} bytes", snapshot.len());
    Ok(())
}

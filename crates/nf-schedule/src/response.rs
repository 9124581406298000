//! Threat responses: threshold name → concrete world effect.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use nf_core::SimRng;
use nf_threat::TriggerRequest;
use nf_world::WorldEffect;

/// How the scheduler realizes one threshold.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ResponseSpec {
    pub effect_id:   String,
    /// Head-count range, drawn per trigger.
    #[serde(default)]
    pub count_min:   u32,
    #[serde(default)]
    pub count_max:   u32,
    #[serde(default)]
    pub severity:    u8,
    #[serde(default)]
    pub message_key: Option<String>,
    /// Applied immediately when the main effect is delayed.
    #[serde(default)]
    pub warning:     Option<WorldEffect>,
}

impl ResponseSpec {
    pub fn new(effect_id: &str, count: (u32, u32), severity: u8) -> Self {
        Self {
            effect_id:   effect_id.to_owned(),
            count_min:   count.0,
            count_max:   count.1,
            severity,
            message_key: None,
            warning:     None,
        }
    }

    pub fn message(mut self, key: &str) -> Self {
        self.message_key = Some(key.to_owned());
        self
    }

    pub fn warning(mut self, effect: WorldEffect) -> Self {
        self.warning = Some(effect);
        self
    }
}

/// The realized response to one trigger.
#[derive(Clone, Debug, PartialEq)]
pub struct Response {
    pub effect:  WorldEffect,
    pub warning: Option<WorldEffect>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ResponseTable(BTreeMap<String, ResponseSpec>);

impl Default for ResponseTable {
    fn default() -> Self {
        let mut table = ResponseTable::empty();
        table.insert(
            "mongrel_investigation",
            ResponseSpec::new("spawn_mongrels", (1, 2), 1)
                .message("threat.mongrels_sniffing")
                .warning(WorldEffect::new("distant_howling").message("threat.howling_far")),
        );
        table.insert(
            "mongrel_attack",
            ResponseSpec::new("spawn_mongrels", (2, 4), 2)
                .message("threat.mongrels_attack")
                .warning(WorldEffect::new("close_howling").severity(1).message("threat.howling_near")),
        );
        table.insert(
            "marauder_raid",
            ResponseSpec::new("marauder_raid", (3, 6), 3).message("threat.marauders_arrive"),
        );
        table
    }
}

impl ResponseTable {
    pub fn empty() -> Self {
        ResponseTable(BTreeMap::new())
    }

    pub fn insert(&mut self, threshold: &str, spec: ResponseSpec) {
        self.0.insert(threshold.to_owned(), spec);
    }

    pub fn get(&self, threshold: &str) -> Option<&ResponseSpec> {
        self.0.get(threshold)
    }

    /// Build the effect for `req`.
    ///
    /// Thresholds with no table entry still produce an effect named after the
    /// threshold, with the trigger's priority as severity, so the sink can
    /// decide whether it knows it.
    pub fn respond(&self, req: &TriggerRequest, rng: &mut SimRng) -> Response {
        let Some(spec) = self.0.get(&req.name) else {
            tracing::debug!(threshold = %req.name, "no response configured, using generic effect");
            return Response {
                effect:  WorldEffect::new(req.name.clone()).severity(req.priority),
                warning: None,
            };
        };
        let count = rng.between(u64::from(spec.count_min)..=u64::from(spec.count_max)) as u32;
        let mut effect = WorldEffect::new(spec.effect_id.clone()).severity(spec.severity).count(count);
        effect.params.message_key = spec.message_key.clone();
        Response { effect, warning: spec.warning.clone() }
    }
}

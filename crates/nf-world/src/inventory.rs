//! Read-only inventory queries for event predicates.

use std::collections::{BTreeMap, HashMap};

/// "Does the player have item X?"  The core defines no item semantics; it only
/// asks.
pub trait Inventory {
    fn count(&self, item: &str) -> u32;

    fn has(&self, item: &str) -> bool {
        self.count(item) > 0
    }
}

/// An inventory that owns nothing.
#[derive(Copy, Clone, Debug, Default)]
pub struct EmptyInventory;

impl Inventory for EmptyInventory {
    fn count(&self, _item: &str) -> u32 {
        0
    }
}

impl Inventory for BTreeMap<String, u32> {
    fn count(&self, item: &str) -> u32 {
        self.get(item).copied().unwrap_or(0)
    }
}

impl Inventory for HashMap<String, u32> {
    fn count(&self, item: &str) -> u32 {
        self.get(item).copied().unwrap_or(0)
    }
}

//! Slot (bag) - one ammunition compartment within a kit
//!
//! Capacity is raw and weight-independent; how many rounds actually fit is
//! `capacity / weight(chosen_ammo)`. The target fill is clamped to that
//! effective capacity, while the count only has a floor of zero: a slot can
//! briefly hold more than its target after loading.

use serde::{Deserialize, Serialize};

use crate::ammo::registry::{AmmoRegistry, AmmoType};
use crate::core::types::AmmoTypeId;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Slot {
    chosen_ammo: Option<AmmoTypeId>,
    count: u32,
    capacity: u32,
    target_fill: u32,
    enabled: bool,
    /// Weight of the chosen ammo, re-resolved from the registry after restore
    #[serde(skip, default = "default_weight")]
    weight: u32,
}

fn default_weight() -> u32 {
    1
}

impl Slot {
    /// Empty, enabled slot with no ammo chosen
    pub fn new(capacity: u32) -> Self {
        Self {
            chosen_ammo: None,
            count: 0,
            capacity,
            target_fill: capacity,
            enabled: true,
            weight: 1,
        }
    }

    pub fn chosen_ammo(&self) -> Option<&AmmoTypeId> {
        self.chosen_ammo.as_ref()
    }

    pub fn count(&self) -> u32 {
        self.count
    }

    pub fn capacity(&self) -> u32 {
        self.capacity
    }

    pub fn target_fill(&self) -> u32 {
        self.target_fill
    }

    pub fn enabled(&self) -> bool {
        self.enabled
    }

    pub fn weight(&self) -> u32 {
        self.weight
    }

    /// Rounds that fit given the chosen ammo's weight (truncating)
    pub fn effective_capacity(&self) -> u32 {
        self.capacity / self.weight.max(1)
    }

    /// Rounds still wanted to reach the target fill
    pub fn demand(&self) -> u32 {
        self.target_fill.saturating_sub(self.count)
    }

    /// Whether this slot can feed a shot right now
    pub fn is_loaded(&self) -> bool {
        self.enabled && self.chosen_ammo.is_some() && self.count > 0
    }

    /// Choose the ammo type held by this slot
    ///
    /// Resets the target fill to the new effective capacity.
    pub fn set_chosen_ammo(&mut self, ammo: Option<&AmmoType>) {
        match ammo {
            Some(ammo) => {
                self.chosen_ammo = Some(ammo.id.clone());
                self.weight = ammo.weight.max(1);
            }
            None => {
                self.chosen_ammo = None;
                self.weight = 1;
            }
        }
        self.target_fill = self.effective_capacity();
    }

    /// Set the target fill, clamped to the effective capacity
    pub fn set_target_fill(&mut self, target: u32) {
        self.target_fill = target.min(self.effective_capacity());
    }

    pub fn set_count(&mut self, count: u32) {
        self.count = count;
    }

    /// Apply a signed change to the count, flooring at zero
    pub fn adjust_count(&mut self, delta: i64) {
        let next = (self.count as i64 + delta).clamp(0, u32::MAX as i64);
        self.count = next as u32;
    }

    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    /// Empty the slot, returning what it held
    pub fn drain(&mut self) -> Option<(AmmoTypeId, u32)> {
        let count = std::mem::take(&mut self.count);
        match &self.chosen_ammo {
            Some(ammo) if count > 0 => Some((ammo.clone(), count)),
            _ => None,
        }
    }

    /// Re-resolve the chosen ammo against the registry after a restore
    ///
    /// Returns false (and clears the slot) if the ammo type is gone.
    pub fn resolve_weight(&mut self, registry: &AmmoRegistry) -> bool {
        let Some(id) = &self.chosen_ammo else {
            self.weight = 1;
            return true;
        };
        match registry.get(id) {
            Some(ammo) => {
                self.weight = ammo.weight.max(1);
                self.target_fill = self.target_fill.min(self.effective_capacity());
                true
            }
            None => {
                tracing::warn!(ammo = %id, "slot references unknown ammo type, clearing");
                self.chosen_ammo = None;
                self.count = 0;
                self.weight = 1;
                self.target_fill = self.effective_capacity();
                false
            }
        }
    }
}

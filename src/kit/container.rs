//! Kit - a worn container owning an ordered list of slots

use serde::{Deserialize, Serialize};

use crate::ammo::registry::AmmoRegistry;
use crate::core::types::{AmmoTypeId, EntityId, KitDefId};
use crate::kit::catalog::{BodySlot, KitDef};
use crate::kit::slot::Slot;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Kit {
    pub id: EntityId,
    pub def: KitDefId,
    pub body_slot: BodySlot,
    pub style: Option<String>,
    slots: Vec<Slot>,
    /// Ammo of the slot that fed the most recent successful check
    last_used_ammo: Option<AmmoTypeId>,
}

impl Kit {
    /// Build a kit for `def` with one slot per entry of `capacities`
    ///
    /// `capacities` is either the definition's own list or a user override.
    pub fn new(def: &KitDef, capacities: &[u32]) -> Self {
        Self {
            id: EntityId::new(),
            def: def.id.clone(),
            body_slot: def.body_slot,
            style: None,
            slots: capacities.iter().map(|&c| Slot::new(c)).collect(),
            last_used_ammo: None,
        }
    }

    pub fn with_style(mut self, style: Option<String>) -> Self {
        self.style = style;
        self
    }

    pub fn slots(&self) -> &[Slot] {
        &self.slots
    }

    pub fn slots_mut(&mut self) -> &mut [Slot] {
        &mut self.slots
    }

    pub fn slot(&self, index: usize) -> Option<&Slot> {
        self.slots.get(index)
    }

    pub fn slot_mut(&mut self, index: usize) -> Option<&mut Slot> {
        self.slots.get_mut(index)
    }

    pub fn total_capacity(&self) -> u32 {
        self.slots.iter().map(|s| s.capacity()).sum()
    }

    pub fn total_count(&self) -> u32 {
        self.slots.iter().map(|s| s.count()).sum()
    }

    /// Any slot holding rounds, enabled or not
    pub fn has_ammo(&self) -> bool {
        self.slots.iter().any(|s| s.count() > 0)
    }

    pub fn last_used_ammo(&self) -> Option<&AmmoTypeId> {
        self.last_used_ammo.as_ref()
    }

    pub fn set_last_used_ammo(&mut self, ammo: Option<AmmoTypeId>) {
        self.last_used_ammo = ammo;
    }

    /// Rounds of `ammo` still wanted across all slots choosing it
    pub fn demand_for(&self, ammo: &AmmoTypeId) -> u32 {
        self.slots
            .iter()
            .filter(|s| s.chosen_ammo() == Some(ammo))
            .map(|s| s.demand())
            .sum()
    }

    /// First enabled slot whose count fell below `threshold` of its target
    pub fn needs_refill(&self, threshold: f32) -> Option<(usize, &AmmoTypeId)> {
        self.slots.iter().enumerate().find_map(|(i, slot)| {
            let ammo = slot.chosen_ammo()?;
            let floor = (slot.target_fill() as f32 * threshold).ceil() as u32;
            (slot.enabled() && slot.target_fill() > 0 && slot.count() < floor).then_some((i, ammo))
        })
    }

    /// Empty every slot, returning the rounds removed per slot
    ///
    /// With `clear_targets` the target fill is zeroed too, so automatic
    /// refills leave the kit alone.
    pub fn empty_all(&mut self, clear_targets: bool) -> Vec<(AmmoTypeId, u32)> {
        let mut dumped = Vec::new();
        for slot in &mut self.slots {
            if let Some(contents) = slot.drain() {
                dumped.push(contents);
            }
            if clear_targets {
                slot.set_target_fill(0);
            }
        }
        dumped
    }

    /// Re-resolve slot weights after restoring from save data
    ///
    /// Returns the number of slots whose ammo type could not be resolved.
    pub fn resolve_weights(&mut self, registry: &AmmoRegistry) -> usize {
        let dropped = self
            .slots
            .iter_mut()
            .map(|slot| slot.resolve_weight(registry))
            .filter(|ok| !ok)
            .count();
        if let Some(ammo) = &self.last_used_ammo {
            if !registry.contains(ammo) {
                self.last_used_ammo = None;
            }
        }
        dropped
    }
}

//! Ammo stacks lying in the world

use ahash::AHashMap;
use serde::{Deserialize, Serialize};

use crate::core::types::{AmmoTypeId, EntityId, Vec2};

/// A pile of one ammo type on the ground
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AmmoStack {
    pub id: EntityId,
    pub ammo: AmmoTypeId,
    pub count: u32,
    pub position: Vec2,
    /// Forbidden stacks are ignored by autonomous hauling
    pub forbidden: bool,
}

impl AmmoStack {
    pub fn new(ammo: AmmoTypeId, count: u32, position: Vec2) -> Self {
        Self {
            id: EntityId::new(),
            ammo,
            count,
            position,
            forbidden: false,
        }
    }

    /// Remove up to `amount`, returning how many were taken
    pub fn take(&mut self, amount: u32) -> u32 {
        let taken = amount.min(self.count);
        self.count -= taken;
        taken
    }

    pub fn is_empty(&self) -> bool {
        self.count == 0
    }
}

/// Storage for all ammo stacks in the world
#[derive(Debug, Clone, Default)]
pub struct StackStore {
    stacks: AHashMap<EntityId, AmmoStack>,
}

impl StackStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, stack: AmmoStack) -> EntityId {
        let id = stack.id;
        self.stacks.insert(id, stack);
        id
    }

    pub fn get(&self, id: EntityId) -> Option<&AmmoStack> {
        self.stacks.get(&id)
    }

    pub fn get_mut(&mut self, id: EntityId) -> Option<&mut AmmoStack> {
        self.stacks.get_mut(&id)
    }

    pub fn remove(&mut self, id: EntityId) -> Option<AmmoStack> {
        self.stacks.remove(&id)
    }

    /// Closest stack of `ammo` within `radius` of `center` that passes `accept`
    pub fn closest_matching(
        &self,
        ammo: &AmmoTypeId,
        center: Vec2,
        radius: f32,
        mut accept: impl FnMut(&AmmoStack) -> bool,
    ) -> Option<&AmmoStack> {
        self.stacks
            .values()
            .filter(|s| &s.ammo == ammo && !s.is_empty())
            .map(|s| (s, s.position.distance(&center)))
            .filter(|(_, d)| *d <= radius)
            .filter(|(s, _)| accept(*s))
            .min_by(|(_, a), (_, b)| a.total_cmp(b))
            .map(|(s, _)| s)
    }

    /// Total rounds of `ammo` on the ground
    pub fn total_of(&self, ammo: &AmmoTypeId) -> u32 {
        self.stacks
            .values()
            .filter(|s| &s.ammo == ammo)
            .map(|s| s.count)
            .sum()
    }

    pub fn iter(&self) -> impl Iterator<Item = &AmmoStack> {
        self.stacks.values()
    }

    pub fn len(&self) -> usize {
        self.stacks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stacks.is_empty()
    }
}

//! Reservations - one claimant per target so two agents never haul the same stack

use ahash::AHashMap;

use crate::core::types::EntityId;

#[derive(Debug, Clone, Default)]
pub struct Reservations {
    /// target -> claimant
    claims: AHashMap<EntityId, EntityId>,
}

impl Reservations {
    pub fn new() -> Self {
        Self::default()
    }

    /// Claim `target` for `claimant`. Re-reserving your own claim succeeds.
    pub fn reserve(&mut self, target: EntityId, claimant: EntityId) -> bool {
        match self.claims.get(&target) {
            Some(holder) if *holder != claimant => false,
            _ => {
                self.claims.insert(target, claimant);
                true
            }
        }
    }

    pub fn can_reserve(&self, target: EntityId, claimant: EntityId) -> bool {
        self.claims.get(&target).map_or(true, |holder| *holder == claimant)
    }

    pub fn holder(&self, target: EntityId) -> Option<EntityId> {
        self.claims.get(&target).copied()
    }

    /// Release a claim if `claimant` holds it
    pub fn release(&mut self, target: EntityId, claimant: EntityId) {
        if self.claims.get(&target) == Some(&claimant) {
            self.claims.remove(&target);
        }
    }

    pub fn release_all(&mut self, claimant: EntityId) {
        self.claims.retain(|_, holder| *holder != claimant);
    }

    /// Drop any claim on a target that no longer exists
    pub fn forget_target(&mut self, target: EntityId) {
        self.claims.remove(&target);
    }

    pub fn len(&self) -> usize {
        self.claims.len()
    }

    pub fn is_empty(&self) -> bool {
        self.claims.is_empty()
    }
}

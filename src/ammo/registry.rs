//! AmmoType registry - the ammunition item types known to a session

use ahash::AHashMap;
use serde::{Deserialize, Serialize};

use crate::core::types::{AmmoTypeId, ProjectileId};

/// An ammunition item type
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AmmoType {
    pub id: AmmoTypeId,
    /// Projectile fired when this ammo is the kit's last used type
    pub projectile: ProjectileId,
    /// Units of raw slot capacity one round occupies
    #[serde(default = "default_weight")]
    pub weight: u32,
}

fn default_weight() -> u32 {
    1
}

impl AmmoType {
    pub fn new(id: impl Into<AmmoTypeId>, projectile: impl Into<ProjectileId>, weight: u32) -> Self {
        Self {
            id: id.into(),
            projectile: projectile.into(),
            weight: weight.max(1),
        }
    }
}

/// Registry of ammo types, keyed by id
#[derive(Debug, Clone, Default)]
pub struct AmmoRegistry {
    types: AHashMap<AmmoTypeId, AmmoType>,
}

impl AmmoRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an ammo type. Weight is normalised to at least 1.
    pub fn register(&mut self, mut ammo: AmmoType) {
        ammo.weight = ammo.weight.max(1);
        self.types.insert(ammo.id.clone(), ammo);
    }

    pub fn get(&self, id: &AmmoTypeId) -> Option<&AmmoType> {
        self.types.get(id)
    }

    pub fn contains(&self, id: &AmmoTypeId) -> bool {
        self.types.contains_key(id)
    }

    /// Weight of an ammo type, 1 for unknown ids
    pub fn weight_of(&self, id: &AmmoTypeId) -> u32 {
        self.types.get(id).map(|a| a.weight).unwrap_or(1)
    }

    pub fn projectile_for(&self, id: &AmmoTypeId) -> Option<&ProjectileId> {
        self.types.get(id).map(|a| &a.projectile)
    }

    pub fn iter(&self) -> impl Iterator<Item = &AmmoType> {
        self.types.values()
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }
}

impl FromIterator<AmmoType> for AmmoRegistry {
    fn from_iter<I: IntoIterator<Item = AmmoType>>(iter: I) -> Self {
        let mut registry = Self::new();
        for ammo in iter {
            registry.register(ammo);
        }
        registry
    }
}

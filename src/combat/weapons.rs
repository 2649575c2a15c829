//! Weapon definitions as seen by the ammo engine
//!
//! The engine only cares about a handful of weapon facts: its tier (for
//! category auto-assignment), how it attacks, its burst size, and whether it
//! has been marked as never needing ammo.

use ahash::AHashMap;
use serde::{Deserialize, Serialize};

use crate::core::types::{TechTier, WeaponId};

/// How a weapon delivers its attack
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WeaponKind {
    /// Swords, clubs, fists - never consume ammo
    Melee,
    /// Launches a projectile per shot (guns, bows, launchers)
    Projectile,
    /// Ranged without a projectile (beams, psychic verbs)
    Beam,
}

/// A weapon item type
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeaponDef {
    pub id: WeaponId,
    pub tier: TechTier,
    pub kind: WeaponKind,
    /// Shots per trigger pull
    #[serde(default = "default_burst_size")]
    pub burst_size: u32,
    /// Explicit "never needs ammo" marker
    #[serde(default)]
    pub exempt: bool,
}

fn default_burst_size() -> u32 {
    1
}

impl WeaponDef {
    pub fn new(id: impl Into<WeaponId>, tier: TechTier, kind: WeaponKind) -> Self {
        Self {
            id: id.into(),
            tier,
            kind,
            burst_size: 1,
            exempt: false,
        }
    }

    pub fn with_burst(mut self, burst_size: u32) -> Self {
        self.burst_size = burst_size.max(1);
        self
    }

    pub fn exempt(mut self) -> Self {
        self.exempt = true;
        self
    }

    pub fn is_melee(&self) -> bool {
        self.kind == WeaponKind::Melee
    }

    /// Projectile weapon firing more than one shot per burst
    pub fn is_burst_projectile(&self) -> bool {
        self.kind == WeaponKind::Projectile && self.burst_size > 1
    }
}

/// All weapon types known to the session
#[derive(Debug, Clone, Default)]
pub struct WeaponCatalog {
    weapons: AHashMap<WeaponId, WeaponDef>,
}

impl WeaponCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, weapon: WeaponDef) {
        self.weapons.insert(weapon.id.clone(), weapon);
    }

    pub fn get(&self, id: &WeaponId) -> Option<&WeaponDef> {
        self.weapons.get(id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &WeaponDef> {
        self.weapons.values()
    }

    pub fn len(&self) -> usize {
        self.weapons.len()
    }

    pub fn is_empty(&self) -> bool {
        self.weapons.is_empty()
    }
}

impl FromIterator<WeaponDef> for WeaponCatalog {
    fn from_iter<I: IntoIterator<Item = WeaponDef>>(iter: I) -> Self {
        let mut catalog = Self::new();
        for weapon in iter {
            catalog.add(weapon);
        }
        catalog
    }
}

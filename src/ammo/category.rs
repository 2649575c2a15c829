//! Ammo categories - declarative rules tying ammo types to weapons

use serde::{Deserialize, Serialize};

use crate::combat::weapons::WeaponDef;
use crate::core::types::{AmmoTypeId, CategoryId, TechTier, WeaponId};

/// A named grouping of ammo types and the weapons that fire them
///
/// The declared rules are immutable after load; the weapon membership they
/// produce lives in the compatibility matrix and can be overridden there.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AmmoCategory {
    pub id: CategoryId,
    /// Ammo types admitted, in declaration order
    #[serde(default)]
    pub ammo: Vec<AmmoTypeId>,
    #[serde(default)]
    pub include_weapons: Vec<WeaponId>,
    #[serde(default)]
    pub exclude_weapons: Vec<WeaponId>,
    pub tier: TechTier,
    /// Whether weapons of the same tier join automatically
    #[serde(default)]
    pub auto_assignable: bool,
}

impl AmmoCategory {
    pub fn new(id: impl Into<CategoryId>, tier: TechTier) -> Self {
        Self {
            id: id.into(),
            ammo: Vec::new(),
            include_weapons: Vec::new(),
            exclude_weapons: Vec::new(),
            tier,
            auto_assignable: false,
        }
    }

    pub fn with_ammo(mut self, ammo: impl Into<AmmoTypeId>) -> Self {
        self.ammo.push(ammo.into());
        self
    }

    pub fn including(mut self, weapon: impl Into<WeaponId>) -> Self {
        self.include_weapons.push(weapon.into());
        self
    }

    pub fn excluding(mut self, weapon: impl Into<WeaponId>) -> Self {
        self.exclude_weapons.push(weapon.into());
        self
    }

    pub fn auto_assign(mut self) -> Self {
        self.auto_assignable = true;
        self
    }

    /// Default membership of `weapon` under this category's rules
    ///
    /// Exclusion always wins over inclusion and tier matching.
    pub fn default_membership(&self, weapon: &WeaponDef) -> bool {
        if self.exclude_weapons.contains(&weapon.id) {
            return false;
        }
        self.include_weapons.contains(&weapon.id)
            || (self.auto_assignable && weapon.tier == self.tier)
    }
}

//! Declarative definitions - ammo, categories, weapons and kits from TOML
//!
//! ```toml
//! [[ammo]]
//! id = "ammo_rifle"
//! projectile = "bullet_rifle"
//! weight = 1
//!
//! [[category]]
//! id = "rifle_rounds"
//! tier = "industrial"
//! ammo = ["ammo_rifle"]
//! include_weapons = ["gun_bolt_action"]
//! auto_assignable = true
//!
//! [[weapon]]
//! id = "gun_bolt_action"
//! tier = "industrial"
//! kind = "projectile"
//!
//! [[kit]]
//! id = "kit_bandolier"
//! capacities = [60, 60]
//! body_slot = "shoulder"
//! ```

use ahash::AHashSet;
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::ammo::{AmmoCategory, AmmoType};
use crate::combat::weapons::WeaponDef;
use crate::core::error::{AmmoError, Result};
use crate::kit::catalog::KitDef;

/// Everything a session is built from
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Definitions {
    #[serde(default, rename = "ammo")]
    pub ammo: Vec<AmmoType>,
    #[serde(default, rename = "category")]
    pub categories: Vec<AmmoCategory>,
    #[serde(default, rename = "weapon")]
    pub weapons: Vec<WeaponDef>,
    #[serde(default, rename = "kit")]
    pub kits: Vec<KitDef>,
}

impl Definitions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load definitions from a TOML file
    pub fn load_from_toml(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::parse_toml(&content)
    }

    /// Parse and validate definitions from a TOML string
    pub fn parse_toml(content: &str) -> Result<Self> {
        let defs: Definitions = toml::from_str(content)?;
        defs.validate()?;
        Ok(defs)
    }

    /// Reject duplicate ids; dangling references are tolerated
    pub fn validate(&self) -> Result<()> {
        check_unique("ammo", self.ammo.iter().map(|a| a.id.as_str()))?;
        check_unique("category", self.categories.iter().map(|c| c.id.as_str()))?;
        check_unique("weapon", self.weapons.iter().map(|w| w.id.as_str()))?;
        check_unique("kit", self.kits.iter().map(|k| k.id.as_str()))?;
        Ok(())
    }

    pub fn with_ammo(mut self, ammo: AmmoType) -> Self {
        self.ammo.push(ammo);
        self
    }

    pub fn with_category(mut self, category: AmmoCategory) -> Self {
        self.categories.push(category);
        self
    }

    pub fn with_weapon(mut self, weapon: WeaponDef) -> Self {
        self.weapons.push(weapon);
        self
    }

    pub fn with_kit(mut self, kit: KitDef) -> Self {
        self.kits.push(kit);
        self
    }
}

fn check_unique<'a>(kind: &str, ids: impl Iterator<Item = &'a str>) -> Result<()> {
    let mut seen = AHashSet::new();
    for id in ids {
        if !seen.insert(id) {
            return Err(AmmoError::InvalidDefinitions(format!("duplicate {} id '{}'", kind, id)));
        }
    }
    Ok(())
}

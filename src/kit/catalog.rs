//! Kit definitions - the wearable ammo containers a session can generate

use serde::{Deserialize, Serialize};

use crate::core::types::KitDefId;
use crate::entity::agent::LifeStage;

/// Body location a worn item occupies; two items on one location conflict
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BodySlot {
    Belt,
    Shoulder,
    Back,
    Torso,
    Legs,
    Head,
}

/// A kit item type
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KitDef {
    pub id: KitDefId,
    /// Raw capacity of each slot, in slot order
    pub capacities: Vec<u32>,
    pub body_slot: BodySlot,
    /// Whether agents may be generated wearing this kit
    #[serde(default = "default_true")]
    pub generatable: bool,
    /// Life stages able to wear this kit
    #[serde(default = "default_stages")]
    pub life_stages: Vec<LifeStage>,
    /// Cosmetic variants (materials, colours); one is picked at random
    #[serde(default)]
    pub styles: Vec<String>,
}

fn default_true() -> bool {
    true
}

fn default_stages() -> Vec<LifeStage> {
    vec![LifeStage::Adult]
}

impl KitDef {
    pub fn new(id: impl Into<KitDefId>, capacities: Vec<u32>, body_slot: BodySlot) -> Self {
        Self {
            id: id.into(),
            capacities,
            body_slot,
            generatable: true,
            life_stages: default_stages(),
            styles: Vec::new(),
        }
    }

    pub fn with_stages(mut self, stages: Vec<LifeStage>) -> Self {
        self.life_stages = stages;
        self
    }

    pub fn with_style(mut self, style: impl Into<String>) -> Self {
        self.styles.push(style.into());
        self
    }

    pub fn total_capacity(&self) -> u32 {
        self.capacities.iter().sum()
    }

    pub fn wearable_at(&self, stage: LifeStage) -> bool {
        self.life_stages.contains(&stage)
    }
}

/// Kit definitions in declaration order
#[derive(Debug, Clone, Default)]
pub struct KitCatalog {
    defs: Vec<KitDef>,
}

impl KitCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a definition, replacing any existing one with the same id
    pub fn add(&mut self, def: KitDef) {
        match self.defs.iter_mut().find(|d| d.id == def.id) {
            Some(existing) => *existing = def,
            None => self.defs.push(def),
        }
    }

    pub fn get(&self, id: &KitDefId) -> Option<&KitDef> {
        self.defs.iter().find(|d| &d.id == id)
    }

    pub fn all(&self) -> &[KitDef] {
        &self.defs
    }

    pub fn len(&self) -> usize {
        self.defs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.defs.is_empty()
    }
}

impl FromIterator<KitDef> for KitCatalog {
    fn from_iter<I: IntoIterator<Item = KitDef>>(iter: I) -> Self {
        let mut catalog = Self::new();
        for def in iter {
            catalog.add(def);
        }
        catalog
    }
}

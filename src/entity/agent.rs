//! Agents - autonomous actors that wield weapons and wear kits

use serde::{Deserialize, Serialize};

use crate::ammo::registry::AmmoRegistry;
use crate::core::types::{EntityId, Vec2, WeaponId};
use crate::kit::catalog::{BodySlot, KitDef};
use crate::kit::container::Kit;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AgentKind {
    Humanlike,
    Animal,
    Mechanoid,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LifeStage {
    Baby,
    Child,
    Adult,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Condition {
    #[default]
    Standing,
    Downed,
    Dead,
}

/// The weapon instance an agent holds
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WieldedWeapon {
    pub def: WeaponId,
    pub destroyed: bool,
}

impl WieldedWeapon {
    pub fn new(def: impl Into<WeaponId>) -> Self {
        Self {
            def: def.into(),
            destroyed: false,
        }
    }
}

/// Per-agent tallies recorded by completed tasks
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgentRecords {
    pub targets_looted: u32,
    pub kits_unloaded: u32,
    pub stacks_fetched: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Agent {
    pub id: EntityId,
    pub name: String,
    pub kind: AgentKind,
    pub life_stage: LifeStage,
    pub condition: Condition,
    pub position: Vec2,
    pub weapon: Option<WieldedWeapon>,
    pub secured_prisoner: bool,
    /// Quest-bound agents may not be looted
    pub quest_protected: bool,
    /// Removed from the world (despawned, destroyed)
    pub destroyed: bool,
    /// Body locations taken by gear other than kits
    pub other_gear: Vec<BodySlot>,
    pub records: AgentRecords,
    /// Worn kits, in wear order
    worn: Vec<Kit>,
}

impl Agent {
    pub fn new(name: impl Into<String>, kind: AgentKind, life_stage: LifeStage) -> Self {
        Self {
            id: EntityId::new(),
            name: name.into(),
            kind,
            life_stage,
            condition: Condition::Standing,
            position: Vec2::default(),
            weapon: None,
            secured_prisoner: false,
            quest_protected: false,
            destroyed: false,
            other_gear: Vec::new(),
            records: AgentRecords::default(),
            worn: Vec::new(),
        }
    }

    /// Convenience: adult humanlike
    pub fn humanlike(name: impl Into<String>) -> Self {
        Self::new(name, AgentKind::Humanlike, LifeStage::Adult)
    }

    pub fn with_weapon(mut self, weapon: impl Into<WeaponId>) -> Self {
        self.weapon = Some(WieldedWeapon::new(weapon));
        self
    }

    pub fn at(mut self, position: Vec2) -> Self {
        self.position = position;
        self
    }

    pub fn is_adult(&self) -> bool {
        self.life_stage == LifeStage::Adult
    }

    pub fn is_destroyed(&self) -> bool {
        self.destroyed
    }

    pub fn is_dead(&self) -> bool {
        self.condition == Condition::Dead
    }

    /// Id of the wielded weapon, if any and not destroyed
    pub fn wielded(&self) -> Option<&WeaponId> {
        self.weapon.as_ref().filter(|w| !w.destroyed).map(|w| &w.def)
    }

    pub fn worn_kits(&self) -> &[Kit] {
        &self.worn
    }

    pub fn worn_kits_mut(&mut self) -> &mut [Kit] {
        &mut self.worn
    }

    pub fn wears_kit(&self) -> bool {
        !self.worn.is_empty()
    }

    pub fn kit(&self, id: EntityId) -> Option<&Kit> {
        self.worn.iter().find(|k| k.id == id)
    }

    pub fn kit_mut(&mut self, id: EntityId) -> Option<&mut Kit> {
        self.worn.iter_mut().find(|k| k.id == id)
    }

    /// Whether `def` can be put on without taking anything off first
    pub fn can_wear(&self, def: &KitDef) -> bool {
        def.wearable_at(self.life_stage)
            && !self.other_gear.contains(&def.body_slot)
            && !self.worn.iter().any(|k| k.body_slot == def.body_slot)
    }

    pub fn wear(&mut self, kit: Kit) {
        self.worn.push(kit);
    }

    pub fn take_off(&mut self, id: EntityId) -> Option<Kit> {
        let index = self.worn.iter().position(|k| k.id == id)?;
        Some(self.worn.remove(index))
    }

    /// Re-resolve slot weights of every worn kit after deserializing the agent
    ///
    /// Returns the number of slots whose ammo type is no longer registered.
    pub fn resolve_kit_weights(&mut self, registry: &AmmoRegistry) -> usize {
        self.worn.iter_mut().map(|kit| kit.resolve_weights(registry)).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ammo::registry::AmmoType;

    #[test]
    fn test_can_wear_respects_body_slot() {
        let belt = KitDef::new("kit_belt", vec![20], BodySlot::Belt);
        let mut agent = Agent::humanlike("Ada");
        assert!(agent.can_wear(&belt));

        agent.other_gear.push(BodySlot::Belt);
        assert!(!agent.can_wear(&belt));
    }

    #[test]
    fn test_can_wear_blocks_second_kit_on_same_slot() {
        let belt = KitDef::new("kit_belt", vec![20], BodySlot::Belt);
        let mut agent = Agent::humanlike("Ada");
        agent.wear(Kit::new(&belt, &belt.capacities));
        assert!(!agent.can_wear(&belt));
    }

    #[test]
    fn test_child_cannot_wear_adult_kit() {
        let belt = KitDef::new("kit_belt", vec![20], BodySlot::Belt);
        let child = Agent::new("Pip", AgentKind::Humanlike, LifeStage::Child);
        assert!(!child.can_wear(&belt));

        let small = belt.clone().with_stages(vec![LifeStage::Child, LifeStage::Adult]);
        assert!(child.can_wear(&small));
    }

    #[test]
    fn test_destroyed_weapon_is_not_wielded() {
        let mut agent = Agent::humanlike("Ada").with_weapon("gun_revolver");
        assert!(agent.wielded().is_some());
        if let Some(w) = agent.weapon.as_mut() {
            w.destroyed = true;
        }
        assert!(agent.wielded().is_none());
    }

    #[test]
    fn test_restored_agent_needs_weights_resolved() {
        let shell = AmmoType::new("ammo_shell", "bullet_shell", 2);
        let belt = KitDef::new("kit_belt", vec![40], BodySlot::Belt);
        let mut kit = Kit::new(&belt, &belt.capacities);
        kit.slot_mut(0).unwrap().set_chosen_ammo(Some(&shell));
        let mut agent = Agent::humanlike("Ada");
        agent.wear(kit);

        let json = serde_json::to_string(&agent).unwrap();
        let mut restored: Agent = serde_json::from_str(&json).unwrap();
        assert_eq!(restored.worn_kits()[0].slots()[0].effective_capacity(), 40);

        let registry: AmmoRegistry = vec![shell].into_iter().collect();
        assert_eq!(restored.resolve_kit_weights(&registry), 0);
        assert_eq!(restored.worn_kits()[0].slots()[0].effective_capacity(), 20);
        assert_eq!(restored.resolve_kit_weights(&AmmoRegistry::new()), 1);
    }

    #[test]
    fn test_take_off_returns_kit() {
        let belt = KitDef::new("kit_belt", vec![20], BodySlot::Belt);
        let mut agent = Agent::humanlike("Ada");
        let kit = Kit::new(&belt, &belt.capacities);
        let id = kit.id;
        agent.wear(kit);

        assert!(agent.take_off(id).is_some());
        assert!(!agent.wears_kit());
    }
}

//! World - agents, ground items and reservations the engine acts on
//!
//! A thin stand-in for the host world: positions are plain points and
//! spawning a stack simply records that it exists.

pub mod reservation;
pub mod stacks;

use ahash::{AHashMap, AHashSet};

use crate::core::types::{AmmoTypeId, EntityId, Tick, Vec2};
use crate::entity::agent::Agent;
use crate::kit::container::Kit;

pub use reservation::Reservations;
pub use stacks::{AmmoStack, StackStore};

/// A kit lying on the ground rather than worn
#[derive(Debug, Clone)]
pub struct GroundKit {
    pub kit: Kit,
    pub position: Vec2,
    pub forbidden: bool,
}

/// Where a kit currently is
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum KitLocation {
    Worn { bearer: EntityId, position: Vec2 },
    Ground { position: Vec2 },
}

impl KitLocation {
    pub fn position(&self) -> Vec2 {
        match self {
            KitLocation::Worn { position, .. } | KitLocation::Ground { position } => *position,
        }
    }
}

#[derive(Debug, Default)]
pub struct World {
    pub current_tick: Tick,
    agents: AHashMap<EntityId, Agent>,
    /// Spawn order, so iteration is stable across runs
    agent_order: Vec<EntityId>,
    pub stacks: StackStore,
    ground_kits: AHashMap<EntityId, GroundKit>,
    pub reservations: Reservations,
    loot_designations: AHashSet<EntityId>,
}

impl World {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn tick(&mut self) {
        self.current_tick += 1;
    }

    // === AGENTS ===

    pub fn spawn_agent(&mut self, agent: Agent) -> EntityId {
        let id = agent.id;
        if self.agents.insert(id, agent).is_none() {
            self.agent_order.push(id);
        }
        id
    }

    pub fn agent(&self, id: EntityId) -> Option<&Agent> {
        self.agents.get(&id)
    }

    pub fn agent_mut(&mut self, id: EntityId) -> Option<&mut Agent> {
        self.agents.get_mut(&id)
    }

    /// Agent ids in spawn order
    pub fn agent_ids(&self) -> &[EntityId] {
        &self.agent_order
    }

    pub fn agents(&self) -> impl Iterator<Item = &Agent> {
        self.agent_order.iter().filter_map(|id| self.agents.get(id))
    }

    // === STACKS ===

    /// Put `count` rounds of `ammo` on the ground; nothing is spawned for zero
    pub fn spawn_stack(&mut self, ammo: AmmoTypeId, count: u32, position: Vec2) -> Option<EntityId> {
        if count == 0 {
            return None;
        }
        Some(self.stacks.add(AmmoStack::new(ammo, count, position)))
    }

    /// Spawn each `(ammo, count)` pair as its own stack
    pub fn spawn_contents(&mut self, contents: Vec<(AmmoTypeId, u32)>, position: Vec2) -> u32 {
        let mut spawned = 0;
        for (ammo, count) in contents {
            if self.spawn_stack(ammo, count, position).is_some() {
                spawned += count;
            }
        }
        spawned
    }

    /// Remove a stack and any claim on it
    pub fn despawn_stack(&mut self, id: EntityId) -> Option<AmmoStack> {
        self.reservations.forget_target(id);
        self.stacks.remove(id)
    }

    // === KITS ===

    pub fn drop_kit(&mut self, kit: Kit, position: Vec2) -> EntityId {
        let id = kit.id;
        self.ground_kits.insert(
            id,
            GroundKit {
                kit,
                position,
                forbidden: false,
            },
        );
        id
    }

    pub fn ground_kit(&self, id: EntityId) -> Option<&GroundKit> {
        self.ground_kits.get(&id)
    }

    pub fn ground_kit_mut(&mut self, id: EntityId) -> Option<&mut GroundKit> {
        self.ground_kits.get_mut(&id)
    }

    /// Find a kit whether worn or on the ground
    pub fn locate_kit(&self, kit: EntityId) -> Option<KitLocation> {
        if let Some(ground) = self.ground_kits.get(&kit) {
            return Some(KitLocation::Ground {
                position: ground.position,
            });
        }
        self.agents().find(|a| a.kit(kit).is_some()).map(|a| KitLocation::Worn {
            bearer: a.id,
            position: a.position,
        })
    }

    pub fn kit_mut(&mut self, kit: EntityId) -> Option<&mut Kit> {
        if self.ground_kits.contains_key(&kit) {
            return self.ground_kits.get_mut(&kit).map(|g| &mut g.kit);
        }
        self.agents.values_mut().find_map(|a| a.kit_mut(kit))
    }

    /// Destroy a kit, first dropping whatever it still holds where it was
    ///
    /// Returns the rounds dispensed, or None if the kit does not exist.
    pub fn destroy_kit(&mut self, kit: EntityId) -> Option<u32> {
        let (mut removed, position) = match self.locate_kit(kit)? {
            KitLocation::Ground { position } => (self.ground_kits.remove(&kit)?.kit, position),
            KitLocation::Worn { bearer, position } => (self.agent_mut(bearer)?.take_off(kit)?, position),
        };
        self.reservations.forget_target(kit);
        let dispensed = self.spawn_contents(removed.empty_all(false), position);
        tracing::debug!(kit = %kit, dispensed, "kit destroyed");
        Some(dispensed)
    }

    // === LOOT DESIGNATIONS ===

    pub(crate) fn add_loot_designation(&mut self, target: EntityId) {
        self.loot_designations.insert(target);
    }

    pub fn is_designated_for_loot(&self, target: EntityId) -> bool {
        self.loot_designations.contains(&target)
    }

    pub fn clear_loot_designation(&mut self, target: EntityId) {
        self.loot_designations.remove(&target);
    }

    /// Position of any entity the engine tracks
    pub fn position_of(&self, id: EntityId) -> Option<Vec2> {
        if let Some(agent) = self.agents.get(&id) {
            return Some(agent.position);
        }
        if let Some(stack) = self.stacks.get(id) {
            return Some(stack.position);
        }
        self.ground_kits.get(&id).map(|g| g.position)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ammo::AmmoType;
    use crate::kit::catalog::{BodySlot, KitDef};

    fn filled_kit(count: u32) -> Kit {
        let def = KitDef::new("kit_belt", vec![50], BodySlot::Belt);
        let mut kit = Kit::new(&def, &def.capacities);
        let slot = kit.slot_mut(0).unwrap();
        slot.set_chosen_ammo(Some(&AmmoType::new("ammo_rifle", "bullet_rifle", 1)));
        slot.set_count(count);
        kit
    }

    #[test]
    fn test_spawn_zero_is_noop() {
        let mut world = World::new();
        assert!(world.spawn_stack("ammo_rifle".into(), 0, Vec2::default()).is_none());
        assert!(world.stacks.is_empty());
    }

    #[test]
    fn test_locate_worn_kit() {
        let mut world = World::new();
        let kit = filled_kit(5);
        let kit_id = kit.id;
        let mut agent = Agent::humanlike("Ada").at(Vec2::new(4.0, 2.0));
        agent.wear(kit);
        let agent_id = world.spawn_agent(agent);

        assert_eq!(
            world.locate_kit(kit_id),
            Some(KitLocation::Worn {
                bearer: agent_id,
                position: Vec2::new(4.0, 2.0)
            })
        );
    }

    #[test]
    fn test_destroy_worn_kit_dispenses_ammo() {
        let mut world = World::new();
        let kit = filled_kit(12);
        let kit_id = kit.id;
        let mut agent = Agent::humanlike("Ada").at(Vec2::new(1.0, 1.0));
        agent.wear(kit);
        let agent_id = world.spawn_agent(agent);

        assert_eq!(world.destroy_kit(kit_id), Some(12));
        assert!(!world.agent(agent_id).unwrap().wears_kit());
        assert_eq!(world.stacks.total_of(&"ammo_rifle".into()), 12);
        assert!(world.destroy_kit(kit_id).is_none());
    }

    #[test]
    fn test_destroy_ground_kit() {
        let mut world = World::new();
        let kit_id = world.drop_kit(filled_kit(3), Vec2::new(9.0, 9.0));

        assert_eq!(world.destroy_kit(kit_id), Some(3));
        assert!(world.ground_kit(kit_id).is_none());
        let stack = world.stacks.iter().next().unwrap();
        assert_eq!(stack.position, Vec2::new(9.0, 9.0));
    }

    #[test]
    fn test_agent_order_is_spawn_order() {
        let mut world = World::new();
        let a = world.spawn_agent(Agent::humanlike("A"));
        let b = world.spawn_agent(Agent::humanlike("B"));
        let c = world.spawn_agent(Agent::humanlike("C"));
        assert_eq!(world.agent_ids(), &[a, b, c]);
    }
}

//! Fetch Ammo - walk to a stack and load it into a kit
//!
//! Reserve -> Travel -> Load -> Retarget, looping back to Reserve while the
//! kit still wants the same ammo and another stack is close by.

use crate::core::types::{AmmoTypeId, EntityId};
use crate::kit::container::Kit;
use crate::session::AmmoSession;
use crate::tasks::{actor_mut, travel_towards, TaskFailure, TaskStatus};
use crate::world::World;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchState {
    Reserve,
    Travel,
    Load,
    Retarget,
}

#[derive(Debug, Clone)]
pub struct FetchAmmoTask {
    pub actor: EntityId,
    pub kit: EntityId,
    pub ammo: AmmoTypeId,
    stack: EntityId,
    state: FetchState,
    /// Rounds moved into the kit so far, across every stack visited
    pub loaded: u32,
}

impl FetchAmmoTask {
    pub fn new(actor: EntityId, kit: EntityId, stack: EntityId, ammo: AmmoTypeId) -> Self {
        Self {
            actor,
            kit,
            ammo,
            stack,
            state: FetchState::Reserve,
            loaded: 0,
        }
    }

    pub fn state(&self) -> FetchState {
        self.state
    }

    /// Stack currently targeted
    pub fn stack(&self) -> EntityId {
        self.stack
    }

    pub fn step(&mut self, world: &mut World, session: &AmmoSession) -> TaskStatus {
        let status = match self.state {
            FetchState::Reserve => self.reserve(world),
            FetchState::Travel => self.travel(world, session),
            FetchState::Load => self.load(world),
            FetchState::Retarget => self.retarget(world, session),
        };
        status.into()
    }

    fn reserve(&mut self, world: &mut World) -> Result<TaskStatus, TaskFailure> {
        let stack = world.stacks.get(self.stack).ok_or(TaskFailure::TargetGone)?;
        if stack.forbidden {
            return Err(TaskFailure::TargetForbidden);
        }
        if stack.ammo != self.ammo {
            return Err(TaskFailure::AmmoMismatch);
        }
        if !world.reservations.reserve(self.stack, self.actor) {
            return Err(TaskFailure::TargetReserved);
        }
        self.state = FetchState::Travel;
        Ok(TaskStatus::Running)
    }

    fn travel(&mut self, world: &mut World, session: &AmmoSession) -> Result<TaskStatus, TaskFailure> {
        let stack = world.stacks.get(self.stack).ok_or(TaskFailure::TargetGone)?;
        if stack.forbidden {
            return Err(TaskFailure::TargetForbidden);
        }
        let destination = stack.position;
        if travel_towards(world, self.actor, destination, &session.config)? {
            self.state = FetchState::Load;
        }
        Ok(TaskStatus::Running)
    }

    fn load(&mut self, world: &mut World) -> Result<TaskStatus, TaskFailure> {
        let available = world.stacks.get(self.stack).ok_or(TaskFailure::TargetGone)?.count;
        let kit = world.kit_mut(self.kit).ok_or(TaskFailure::KitGone)?;
        if kit.slots().is_empty() {
            tracing::warn!(kit = %self.kit, "fetch ammo: nothing to load into");
            return Err(TaskFailure::NothingToLoadInto);
        }

        let moved = load_into(kit, &self.ammo, available);
        let exhausted = world.stacks.get_mut(self.stack).is_some_and(|stack| {
            stack.take(moved);
            stack.is_empty()
        });
        if exhausted {
            world.despawn_stack(self.stack);
        }
        world.reservations.release(self.stack, self.actor);
        self.loaded += moved;

        actor_mut(world, self.actor)?.records.stacks_fetched += 1;
        tracing::debug!(actor = %self.actor, kit = %self.kit, ammo = %self.ammo, moved, "ammo loaded");

        self.state = FetchState::Retarget;
        Ok(TaskStatus::Running)
    }

    fn retarget(&mut self, world: &mut World, session: &AmmoSession) -> Result<TaskStatus, TaskFailure> {
        let demand = world.kit_mut(self.kit).ok_or(TaskFailure::KitGone)?.demand_for(&self.ammo);
        if demand == 0 {
            return Ok(TaskStatus::Succeeded);
        }

        let Some(center) = world.position_of(self.actor) else {
            return Err(TaskFailure::ActorMissing);
        };
        let actor = self.actor;
        let reservations = &world.reservations;
        let next = world
            .stacks
            .closest_matching(&self.ammo, center, session.config.retarget_radius, |s| {
                !s.forbidden && reservations.can_reserve(s.id, actor)
            })
            .map(|s| s.id);

        match next {
            Some(stack) => {
                self.stack = stack;
                self.state = FetchState::Reserve;
                Ok(TaskStatus::Running)
            }
            None => Ok(TaskStatus::Succeeded),
        }
    }
}

/// Move up to `available` rounds of `ammo` into the matching slots of `kit`
///
/// Each matching slot takes what it lacks to reach its target fill. Returns
/// the number of rounds moved.
fn load_into(kit: &mut Kit, ammo: &AmmoTypeId, available: u32) -> u32 {
    let mut remaining = available;
    for slot in kit.slots_mut() {
        if remaining == 0 {
            break;
        }
        if slot.chosen_ammo() != Some(ammo) {
            continue;
        }
        let moved = remaining.min(slot.demand());
        slot.adjust_count(moved as i64);
        remaining -= moved;
    }
    available - remaining
}

/// Look for a refill job for an idle agent
///
/// Picks the first worn kit slot below the refill threshold and the closest
/// usable stack of its ammo within the refill radius.
pub fn find_refill_job(world: &World, session: &AmmoSession, actor: EntityId) -> Option<FetchAmmoTask> {
    let agent = world.agent(actor).filter(|a| !a.is_destroyed() && !a.is_dead())?;
    let config = &session.config;

    agent.worn_kits().iter().find_map(|kit| {
        let (_, ammo) = kit.needs_refill(config.refill_threshold)?;
        let stack = world.stacks.closest_matching(ammo, agent.position, config.refill_search_radius, |s| {
            !s.forbidden && world.reservations.can_reserve(s.id, actor)
        })?;
        Some(FetchAmmoTask::new(actor, kit.id, stack.id, ammo.clone()))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ammo::{AmmoCategory, AmmoType};
    use crate::core::config::EngineConfig;
    use crate::core::types::{TechTier, Vec2};
    use crate::entity::agent::Agent;
    use crate::kit::catalog::{BodySlot, KitDef};
    use crate::session::Definitions;

    fn session() -> AmmoSession {
        let defs = Definitions::new()
            .with_ammo(AmmoType::new("ammo_rifle", "bullet_rifle", 1))
            .with_category(AmmoCategory::new("rifle", TechTier::Industrial).with_ammo("ammo_rifle"));
        AmmoSession::new(defs, EngineConfig::default())
    }

    /// Kit with one slot per (target, count) pair, all choosing rifle ammo
    fn kit(session: &AmmoSession, slots: &[(u32, u32)]) -> Kit {
        let def = KitDef::new("kit_belt", vec![100; slots.len()], BodySlot::Belt);
        let mut kit = Kit::new(&def, &def.capacities);
        let ammo = session.registry.get(&"ammo_rifle".into());
        for (i, (target, count)) in slots.iter().enumerate() {
            let slot = kit.slot_mut(i).unwrap();
            slot.set_chosen_ammo(ammo);
            slot.set_target_fill(*target);
            slot.set_count(*count);
        }
        kit
    }

    fn run(task: &mut FetchAmmoTask, world: &mut World, session: &AmmoSession) -> TaskStatus {
        for _ in 0..200 {
            let status = task.step(world, session);
            if status.is_finished() {
                return status;
            }
        }
        panic!("task did not finish");
    }

    #[test]
    fn test_load_fills_to_target() {
        let session = session();
        let mut world = World::new();
        let kit = kit(&session, &[(20, 5)]);
        let kit_id = kit.id;
        let mut agent = Agent::humanlike("Ada");
        agent.wear(kit);
        let actor = world.spawn_agent(agent);
        let stack = world.spawn_stack("ammo_rifle".into(), 30, Vec2::new(3.0, 0.0)).unwrap();

        let mut task = FetchAmmoTask::new(actor, kit_id, stack, "ammo_rifle".into());
        assert_eq!(run(&mut task, &mut world, &session), TaskStatus::Succeeded);

        let agent = world.agent(actor).unwrap();
        assert_eq!(agent.kit(kit_id).unwrap().slots()[0].count(), 20);
        assert_eq!(world.stacks.get(stack).unwrap().count, 15);
        assert_eq!(task.loaded, 15);
        assert!(world.reservations.is_empty());
    }

    #[test]
    fn test_small_stack_spreads_across_slots_in_order() {
        let session = session();
        let mut kit = kit(&session, &[(10, 0), (10, 0), (10, 0)]);

        assert_eq!(load_into(&mut kit, &"ammo_rifle".into(), 15), 15);
        let counts: Vec<u32> = kit.slots().iter().map(|s| s.count()).collect();
        assert_eq!(counts, vec![10, 5, 0]);
    }

    #[test]
    fn test_zero_slot_kit_fails() {
        let session = session();
        let mut world = World::new();
        let def = KitDef::new("kit_empty", vec![], BodySlot::Belt);
        let kit = Kit::new(&def, &def.capacities);
        let kit_id = kit.id;
        let mut agent = Agent::humanlike("Ada");
        agent.wear(kit);
        let actor = world.spawn_agent(agent);
        let stack = world.spawn_stack("ammo_rifle".into(), 30, Vec2::default()).unwrap();

        let mut task = FetchAmmoTask::new(actor, kit_id, stack, "ammo_rifle".into());
        assert_eq!(
            run(&mut task, &mut world, &session),
            TaskStatus::Failed(TaskFailure::NothingToLoadInto)
        );
        assert_eq!(world.stacks.get(stack).unwrap().count, 30);
    }

    #[test]
    fn test_retargets_to_next_stack() {
        let session = session();
        let mut world = World::new();
        let kit = kit(&session, &[(50, 0)]);
        let kit_id = kit.id;
        let mut agent = Agent::humanlike("Ada");
        agent.wear(kit);
        let actor = world.spawn_agent(agent);
        let first = world.spawn_stack("ammo_rifle".into(), 20, Vec2::new(2.0, 0.0)).unwrap();
        let second = world.spawn_stack("ammo_rifle".into(), 20, Vec2::new(6.0, 0.0)).unwrap();

        let mut task = FetchAmmoTask::new(actor, kit_id, first, "ammo_rifle".into());
        assert_eq!(run(&mut task, &mut world, &session), TaskStatus::Succeeded);

        assert_eq!(task.loaded, 40);
        assert!(world.stacks.get(first).is_none());
        assert!(world.stacks.get(second).is_none());
        assert_eq!(world.agent(actor).unwrap().records.stacks_fetched, 2);
    }

    #[test]
    fn test_reserved_or_forbidden_stack_fails() {
        let session = session();
        let mut world = World::new();
        let kit = kit(&session, &[(50, 0)]);
        let kit_id = kit.id;
        let mut agent = Agent::humanlike("Ada");
        agent.wear(kit);
        let actor = world.spawn_agent(agent);
        let stack = world.spawn_stack("ammo_rifle".into(), 20, Vec2::default()).unwrap();

        world.reservations.reserve(stack, EntityId::new());
        let mut task = FetchAmmoTask::new(actor, kit_id, stack, "ammo_rifle".into());
        assert_eq!(task.step(&mut world, &session), TaskStatus::Failed(TaskFailure::TargetReserved));

        world.reservations.forget_target(stack);
        world.stacks.get_mut(stack).unwrap().forbidden = true;
        let mut task = FetchAmmoTask::new(actor, kit_id, stack, "ammo_rifle".into());
        assert_eq!(task.step(&mut world, &session), TaskStatus::Failed(TaskFailure::TargetForbidden));
    }

    #[test]
    fn test_stack_of_other_ammo_is_refused() {
        let session = session();
        let mut world = World::new();
        let kit = kit(&session, &[(50, 0)]);
        let kit_id = kit.id;
        let mut agent = Agent::humanlike("Ada");
        agent.wear(kit);
        let actor = world.spawn_agent(agent);
        let shells = world.spawn_stack("ammo_shell".into(), 30, Vec2::default()).unwrap();

        let mut task = FetchAmmoTask::new(actor, kit_id, shells, "ammo_rifle".into());
        assert_eq!(
            run(&mut task, &mut world, &session),
            TaskStatus::Failed(TaskFailure::AmmoMismatch)
        );
        assert_eq!(world.agent(actor).unwrap().kit(kit_id).unwrap().total_count(), 0);
        assert_eq!(world.stacks.get(shells).unwrap().count, 30);
        assert!(world.reservations.is_empty());
    }

    #[test]
    fn test_find_refill_job() {
        let session = session();
        let mut world = World::new();
        let low = kit(&session, &[(40, 10)]);
        let low_id = low.id;
        let mut agent = Agent::humanlike("Ada");
        agent.wear(low);
        let actor = world.spawn_agent(agent);

        assert!(find_refill_job(&world, &session, actor).is_none());

        world.spawn_stack("ammo_rifle".into(), 50, Vec2::new(500.0, 0.0));
        let near = world.spawn_stack("ammo_rifle".into(), 50, Vec2::new(10.0, 0.0)).unwrap();
        let job = find_refill_job(&world, &session, actor).unwrap();
        assert_eq!(job.kit, low_id);
        assert_eq!(job.stack(), near);
    }

    #[test]
    fn test_no_refill_above_threshold() {
        let session = session();
        let mut world = World::new();
        let mut agent = Agent::humanlike("Ada");
        agent.wear(kit(&session, &[(40, 30)]));
        let actor = world.spawn_agent(agent);
        world.spawn_stack("ammo_rifle".into(), 50, Vec2::new(1.0, 0.0));

        assert!(find_refill_job(&world, &session, actor).is_none());
    }
}

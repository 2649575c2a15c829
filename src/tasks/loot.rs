//! Loot Ammo - strip the ammo out of another agent's kits or a kit on the ground
//!
//! Reserve -> Travel -> Wait -> Strip. Eligibility is re-checked before every
//! state so a target that gets up, is claimed by a quest or is emptied by
//! someone else aborts the task.

use crate::core::types::{AmmoTypeId, EntityId};
use crate::entity::agent::Condition;
use crate::session::AmmoSession;
use crate::tasks::{actor_mut, travel_towards, TaskFailure, TaskStatus};
use crate::world::World;

/// What is being looted
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LootTarget {
    Agent(EntityId),
    GroundKit(EntityId),
}

impl LootTarget {
    pub fn id(&self) -> EntityId {
        match self {
            LootTarget::Agent(id) | LootTarget::GroundKit(id) => *id,
        }
    }
}

/// Whether `target` may be looted right now
///
/// Agents must be downed, dead or a secured prisoner, not quest protected,
/// and wear a kit holding rounds. Ground kits must be unforbidden and hold
/// rounds.
pub fn can_be_looted(world: &World, target: LootTarget) -> bool {
    match target {
        LootTarget::Agent(id) => world.agent(id).is_some_and(|agent| {
            let strippable = agent.condition != Condition::Standing || agent.secured_prisoner;
            strippable
                && !agent.is_destroyed()
                && !agent.quest_protected
                && agent.worn_kits().iter().any(|k| k.has_ammo())
        }),
        LootTarget::GroundKit(id) => world
            .ground_kit(id)
            .is_some_and(|ground| !ground.forbidden && ground.kit.has_ammo()),
    }
}

/// Mark `target` for looting; refused when it is not eligible
pub fn designate_for_loot(world: &mut World, target: LootTarget) -> bool {
    if !can_be_looted(world, target) {
        return false;
    }
    world.add_loot_designation(target.id());
    true
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LootState {
    Reserve,
    Travel,
    Wait { elapsed: u32 },
    Strip,
}

#[derive(Debug, Clone)]
pub struct LootAmmoTask {
    pub actor: EntityId,
    pub target: LootTarget,
    state: LootState,
}

impl LootAmmoTask {
    pub fn new(actor: EntityId, target: LootTarget) -> Self {
        Self {
            actor,
            target,
            state: LootState::Reserve,
        }
    }

    pub fn state(&self) -> LootState {
        self.state
    }

    /// Fraction of the wait completed, while waiting
    pub fn progress(&self, session: &AmmoSession) -> Option<f32> {
        match self.state {
            LootState::Wait { elapsed } => {
                let total = session.config.loot_wait_steps.max(1);
                Some((elapsed as f32 / total as f32).min(1.0))
            }
            _ => None,
        }
    }

    pub fn step(&mut self, world: &mut World, session: &AmmoSession) -> TaskStatus {
        if !can_be_looted(world, self.target) {
            return TaskStatus::Failed(TaskFailure::NotEligible);
        }
        let status = match self.state {
            LootState::Reserve => self.reserve(world),
            LootState::Travel => self.travel(world, session),
            LootState::Wait { elapsed } => self.wait(elapsed, session),
            LootState::Strip => self.strip(world),
        };
        status.into()
    }

    fn reserve(&mut self, world: &mut World) -> Result<TaskStatus, TaskFailure> {
        if !world.reservations.reserve(self.target.id(), self.actor) {
            return Err(TaskFailure::TargetReserved);
        }
        self.state = LootState::Travel;
        Ok(TaskStatus::Running)
    }

    fn travel(&mut self, world: &mut World, session: &AmmoSession) -> Result<TaskStatus, TaskFailure> {
        let destination = world.position_of(self.target.id()).ok_or(TaskFailure::TargetGone)?;
        if travel_towards(world, self.actor, destination, &session.config)? {
            self.state = LootState::Wait { elapsed: 0 };
        }
        Ok(TaskStatus::Running)
    }

    fn wait(&mut self, elapsed: u32, session: &AmmoSession) -> Result<TaskStatus, TaskFailure> {
        let elapsed = elapsed + 1;
        self.state = if elapsed >= session.config.loot_wait_steps {
            LootState::Strip
        } else {
            LootState::Wait { elapsed }
        };
        Ok(TaskStatus::Running)
    }

    fn strip(&mut self, world: &mut World) -> Result<TaskStatus, TaskFailure> {
        let id = self.target.id();
        let position = world.position_of(id).ok_or(TaskFailure::TargetGone)?;

        let contents: Vec<(AmmoTypeId, u32)> = match self.target {
            LootTarget::Agent(_) => world
                .agent_mut(id)
                .ok_or(TaskFailure::TargetGone)?
                .worn_kits_mut()
                .iter_mut()
                .flat_map(|kit| kit.empty_all(false))
                .collect(),
            LootTarget::GroundKit(_) => world
                .ground_kit_mut(id)
                .ok_or(TaskFailure::TargetGone)?
                .kit
                .empty_all(false),
        };
        world.clear_loot_designation(id);
        let stripped = world.spawn_contents(contents, position);

        actor_mut(world, self.actor)?.records.targets_looted += 1;
        tracing::debug!(actor = %self.actor, target = %id, stripped, "target looted");
        Ok(TaskStatus::Succeeded)
    }
}

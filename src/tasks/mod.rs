//! Task state machines - multi-step jobs that move ammo around the world
//!
//! Each task is an explicit state enum with one handler per state. A single
//! `step` runs exactly one handler, so the scheduler can cancel a task
//! between any two states. Whatever a completed step committed stays
//! committed; cancelling only releases reservations.

pub mod fetch;
pub mod loot;
pub mod scheduler;
pub mod unload;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::core::config::EngineConfig;
use crate::core::types::{EntityId, Vec2};
use crate::entity::agent::Agent;
use crate::session::AmmoSession;
use crate::world::World;

pub use fetch::{find_refill_job, FetchAmmoTask, FetchState};
pub use loot::{can_be_looted, designate_for_loot, LootAmmoTask, LootState, LootTarget};
pub use scheduler::{TaskOutcome, TaskScheduler};
pub use unload::{UnloadKitTask, UnloadState};

/// Who asked for a task
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TaskSource {
    PlayerCommand,
    Autonomous,
}

/// Why a task stopped early
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum TaskFailure {
    #[error("actor is gone")]
    ActorMissing,
    #[error("target no longer exists")]
    TargetGone,
    #[error("target is forbidden")]
    TargetForbidden,
    #[error("target is reserved by someone else")]
    TargetReserved,
    #[error("target can no longer be looted")]
    NotEligible,
    #[error("stack holds a different ammo type")]
    AmmoMismatch,
    #[error("nothing to load into")]
    NothingToLoadInto,
    #[error("kit is gone")]
    KitGone,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskStatus {
    Running,
    Succeeded,
    Failed(TaskFailure),
}

impl TaskStatus {
    pub fn is_finished(&self) -> bool {
        !matches!(self, TaskStatus::Running)
    }
}

impl From<Result<TaskStatus, TaskFailure>> for TaskStatus {
    fn from(result: Result<TaskStatus, TaskFailure>) -> Self {
        result.unwrap_or_else(TaskStatus::Failed)
    }
}

/// Any task the scheduler can run
#[derive(Debug, Clone)]
pub enum Task {
    Fetch(FetchAmmoTask),
    Unload(UnloadKitTask),
    Loot(LootAmmoTask),
}

impl Task {
    pub fn actor(&self) -> EntityId {
        match self {
            Task::Fetch(t) => t.actor,
            Task::Unload(t) => t.actor,
            Task::Loot(t) => t.actor,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Task::Fetch(_) => "fetch_ammo",
            Task::Unload(_) => "unload_kit",
            Task::Loot(_) => "loot_ammo",
        }
    }

    /// Run one state handler
    pub fn step(&mut self, world: &mut World, session: &AmmoSession) -> TaskStatus {
        match self {
            Task::Fetch(t) => t.step(world, session),
            Task::Unload(t) => t.step(world, session),
            Task::Loot(t) => t.step(world, session),
        }
    }

    /// Drop every claim the actor holds; partial transfers are kept
    pub fn release(&self, world: &mut World) {
        world.reservations.release_all(self.actor());
    }
}

impl From<FetchAmmoTask> for Task {
    fn from(task: FetchAmmoTask) -> Self {
        Task::Fetch(task)
    }
}

impl From<UnloadKitTask> for Task {
    fn from(task: UnloadKitTask) -> Self {
        Task::Unload(task)
    }
}

impl From<LootAmmoTask> for Task {
    fn from(task: LootAmmoTask) -> Self {
        Task::Loot(task)
    }
}

/// The acting agent, if it can still act
pub(crate) fn actor_mut(world: &mut World, actor: EntityId) -> Result<&mut Agent, TaskFailure> {
    world
        .agent_mut(actor)
        .filter(|a| !a.is_destroyed() && !a.is_dead())
        .ok_or(TaskFailure::ActorMissing)
}

/// Move the actor one step towards `destination`; true once touching it
pub(crate) fn travel_towards(
    world: &mut World,
    actor: EntityId,
    destination: Vec2,
    config: &EngineConfig,
) -> Result<bool, TaskFailure> {
    let agent = actor_mut(world, actor)?;
    if agent.position.distance(&destination) > config.touch_distance {
        agent.position = agent.position.move_towards(destination, config.travel_speed);
    }
    Ok(agent.position.distance(&destination) <= config.touch_distance)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_travel_reaches_destination() {
        let mut world = World::new();
        let actor = world.spawn_agent(Agent::humanlike("Ada"));
        let config = EngineConfig::default();
        let destination = Vec2::new(5.0, 0.0);

        let mut steps = 0;
        while !travel_towards(&mut world, actor, destination, &config).unwrap() {
            steps += 1;
            assert!(steps < 10);
        }
        assert_eq!(steps, 3);
    }

    #[test]
    fn test_dead_actor_cannot_travel() {
        let mut world = World::new();
        let mut agent = Agent::humanlike("Ada");
        agent.condition = crate::entity::agent::Condition::Dead;
        let actor = world.spawn_agent(agent);

        let result = travel_towards(&mut world, actor, Vec2::new(5.0, 0.0), &EngineConfig::default());
        assert_eq!(result, Err(TaskFailure::ActorMissing));
    }
}

//! Unload Kit - empty a kit's slots onto the ground where it is

use crate::core::types::EntityId;
use crate::session::AmmoSession;
use crate::tasks::{actor_mut, travel_towards, TaskFailure, TaskSource, TaskStatus};
use crate::world::World;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnloadState {
    Reserve,
    Travel,
    Dump,
}

#[derive(Debug, Clone)]
pub struct UnloadKitTask {
    pub actor: EntityId,
    pub kit: EntityId,
    pub source: TaskSource,
    state: UnloadState,
}

impl UnloadKitTask {
    pub fn new(actor: EntityId, kit: EntityId) -> Self {
        Self {
            actor,
            kit,
            source: TaskSource::Autonomous,
            state: UnloadState::Reserve,
        }
    }

    /// Player-ordered unload; also zeroes target fills so refills leave the kit alone
    pub fn from_player(mut self) -> Self {
        self.source = TaskSource::PlayerCommand;
        self
    }

    pub fn state(&self) -> UnloadState {
        self.state
    }

    pub fn step(&mut self, world: &mut World, session: &AmmoSession) -> TaskStatus {
        let status = match self.state {
            UnloadState::Reserve => self.reserve(world),
            UnloadState::Travel => self.travel(world, session),
            UnloadState::Dump => self.dump(world),
        };
        status.into()
    }

    fn reserve(&mut self, world: &mut World) -> Result<TaskStatus, TaskFailure> {
        world.locate_kit(self.kit).ok_or(TaskFailure::KitGone)?;
        if !world.reservations.reserve(self.kit, self.actor) {
            return Err(TaskFailure::TargetReserved);
        }
        self.state = UnloadState::Travel;
        Ok(TaskStatus::Running)
    }

    fn travel(&mut self, world: &mut World, session: &AmmoSession) -> Result<TaskStatus, TaskFailure> {
        let destination = world.locate_kit(self.kit).ok_or(TaskFailure::KitGone)?.position();
        if travel_towards(world, self.actor, destination, &session.config)? {
            self.state = UnloadState::Dump;
        }
        Ok(TaskStatus::Running)
    }

    fn dump(&mut self, world: &mut World) -> Result<TaskStatus, TaskFailure> {
        let position = world.locate_kit(self.kit).ok_or(TaskFailure::KitGone)?.position();
        let clear_targets = self.source == TaskSource::PlayerCommand;
        let contents = world
            .kit_mut(self.kit)
            .ok_or(TaskFailure::KitGone)?
            .empty_all(clear_targets);
        let dumped = world.spawn_contents(contents, position);

        actor_mut(world, self.actor)?.records.kits_unloaded += 1;
        tracing::debug!(actor = %self.actor, kit = %self.kit, dumped, "kit unloaded");
        Ok(TaskStatus::Succeeded)
    }
}

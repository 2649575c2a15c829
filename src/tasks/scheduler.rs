//! Task scheduler - one active task per actor, stepped in assignment order

use crate::core::types::EntityId;
use crate::session::AmmoSession;
use crate::tasks::{Task, TaskStatus};
use crate::world::World;

/// A task that finished during a tick
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskOutcome {
    pub actor: EntityId,
    pub label: &'static str,
    pub status: TaskStatus,
}

#[derive(Debug, Clone, Default)]
pub struct TaskScheduler {
    tasks: Vec<Task>,
}

impl TaskScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Give `task` to its actor, cancelling whatever the actor was doing
    pub fn assign(&mut self, world: &mut World, task: impl Into<Task>) {
        let task = task.into();
        self.cancel(world, task.actor());
        tracing::debug!(actor = %task.actor(), task = task.label(), "task assigned");
        self.tasks.push(task);
    }

    /// Stop the actor's task, releasing its reservations
    ///
    /// Returns false if the actor had no task.
    pub fn cancel(&mut self, world: &mut World, actor: EntityId) -> bool {
        let Some(index) = self.tasks.iter().position(|t| t.actor() == actor) else {
            return false;
        };
        let task = self.tasks.remove(index);
        task.release(world);
        tracing::debug!(actor = %actor, task = task.label(), "task cancelled");
        true
    }

    pub fn current(&self, actor: EntityId) -> Option<&Task> {
        self.tasks.iter().find(|t| t.actor() == actor)
    }

    pub fn is_busy(&self, actor: EntityId) -> bool {
        self.current(actor).is_some()
    }

    /// Advance every task by one state, then the world clock
    pub fn tick(&mut self, world: &mut World, session: &AmmoSession) -> Vec<TaskOutcome> {
        let mut finished = Vec::new();
        let mut still_running = Vec::with_capacity(self.tasks.len());

        for mut task in self.tasks.drain(..) {
            let status = task.step(world, session);
            if status.is_finished() {
                task.release(world);
                if let TaskStatus::Failed(reason) = status {
                    tracing::debug!(actor = %task.actor(), task = task.label(), %reason, "task failed");
                }
                finished.push(TaskOutcome {
                    actor: task.actor(),
                    label: task.label(),
                    status,
                });
            } else {
                still_running.push(task);
            }
        }

        self.tasks = still_running;
        world.tick();
        finished
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }
}

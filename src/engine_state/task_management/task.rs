//! # Task System Core Traits
//!
//! ## Core Components
//! - `Task`: a unit of work executed on a worker thread
//! - `TaskResult`: the output of a task, applied on the simulation thread
//! - `TaskContext`: the engine state a result may touch when it is applied
//!
//! ## Task Lifecycle
//! 1. A `Task` is published via `TaskManager::publish_task()`
//! 2. Its `process()` method runs on a worker thread, with no access to the
//!    live world
//! 3. The returned `TaskResult` travels back over a channel
//! 4. `handle_result()` runs on the simulation thread and may publish data or
//!    spawn follow-up tasks

use crate::{
    core::MtResource,
    engine_state::{rendering::MeshManager, voxels::world::World},
};

/// Engine state available to task results on the simulation thread.
pub struct TaskContext<'a> {
    /// Shared handle to the live world. Results publish replacements through it.
    pub world: &'a MtResource<World>,
    pub mesh_manager: &'a mut MeshManager,
}

/// A unit of work that can be executed on a worker thread.
///
/// Tasks own everything they need. They must never hold a reference to the
/// live world, since a partially built result must stay invisible until its
/// result is handled.
pub trait Task: Send {
    /// Short label used in log messages.
    fn name(&self) -> &'static str;

    /// Performs the work and returns a result to apply on the simulation thread.
    fn process(&self) -> Box<dyn TaskResult + Send>;
}

/// The output of a [`Task`].
pub trait TaskResult: Send {
    /// Applies the result to the engine.
    ///
    /// Returns follow-up tasks to schedule, possibly none.
    fn handle_result(self: Box<Self>, context: &mut TaskContext<'_>) -> Vec<Box<dyn Task + Send>>;
}

//! # World Generation Task
//!
//! Builds a complete world on a worker thread and swaps it in once it is done.
//! The new world is private to the task until `handle_result` publishes it, so
//! readers of the live world never see a half-generated grid.

use log::info;

use crate::{
    config::WorldConfig,
    engine_state::{
        task_management::task::{Task, TaskContext, TaskResult},
        voxels::{
            generation::{generate_world, GenerationReport},
            world::World,
        },
    },
};

/// Generates a new world from `config`.
pub struct WorldGenerationTask {
    config: WorldConfig,
}

impl WorldGenerationTask {
    pub fn new(config: WorldConfig) -> Self {
        WorldGenerationTask { config }
    }
}

impl Task for WorldGenerationTask {
    fn name(&self) -> &'static str {
        "world generation"
    }

    fn process(&self) -> Box<dyn TaskResult + Send> {
        let (world, report) = generate_world(&self.config);
        Box::new(WorldGenerationResult { world, report })
    }
}

/// A fully generated world waiting to be published.
pub struct WorldGenerationResult {
    world: World,
    report: GenerationReport,
}

impl WorldGenerationResult {
    pub fn report(&self) -> &GenerationReport {
        &self.report
    }
}

impl TaskResult for WorldGenerationResult {
    /// Replaces the live world and remeshes every chunk of the new one.
    fn handle_result(self: Box<Self>, context: &mut TaskContext<'_>) -> Vec<Box<dyn Task + Send>> {
        let WorldGenerationResult { world, report } = *self;
        context.world.publish(world);

        let mut world = context.world.get_mut();
        let chunks = context.mesh_manager.rebuild_all(&mut world);
        info!(
            "Published world with seed {} ({} chunks meshed, generated in {:?})",
            report.seed, chunks, report.elapsed
        );
        Vec::new()
    }
}

//! # Engine State Module
//!
//! The explicit context object every engine operation runs through.
//!
//! ## Key Components
//!
//! * `EngineState` - owns the world, its meshes, the entities and the workers
//! * `physics` - bounding boxes, collision resolution and the tick integrator
//! * `rendering` - greedy meshing and per-chunk mesh storage
//! * `task_management` - background worker threads
//! * `voxels` - blocks, chunks, the world grid and terrain generation
//!
//! ## Architecture
//!
//! `EngineState` is the central coordinator. Generation, meshing and physics
//! all reach the world through it, so there is no global state anywhere in the
//! crate. The world lives behind an [`MtResource`] so a replacement generated on
//! a worker thread can be published in one swap.

use cgmath::{Point3, Vector3};
use log::{debug, error, info};
use web_time::Duration;

use physics::{Activity, Entity, EntityKind, PhysicsBody, PhysicsIntegrator};
use rendering::{
    meshing::{Mesh, MeshPass},
    MeshManager, MeshSettings,
};
use task_management::{task::TaskContext, TaskManager};
use voxels::{
    block::{BlockRegistry, BlockTypeSize},
    generation::{generate_world, GenerationReport},
    tasks::WorldGenerationTask,
    world::{RaycastHit, World},
};

use crate::{
    config::{ConfigError, WorldConfig},
    core::MtResource,
};

pub mod physics;
pub mod rendering;
pub mod task_management;
pub mod voxels;

fn validated_or_default(config: WorldConfig) -> WorldConfig {
    match config.validate() {
        Ok(()) => config,
        Err(err) => {
            error!("{err}; using default config");
            WorldConfig::default()
        }
    }
}

/// The main state container for the voxel engine.
///
/// # Examples
///
/// ```no_run
/// use voxel_world::{config::WorldConfig, engine_state::EngineState};
/// use web_time::Duration;
///
/// let mut engine = EngineState::new(WorldConfig::default());
/// loop {
///     engine.process_tasks();
///     engine.tick(Duration::from_millis(16));
/// }
/// ```
pub struct EngineState {
    world: MtResource<World>,
    mesh_manager: MeshManager,
    task_manager: TaskManager,
    integrator: PhysicsIntegrator,
    entities: Vec<Entity>,
    config: WorldConfig,
    report: GenerationReport,
}

impl EngineState {
    /// Generates the configured world on the calling thread and meshes it.
    ///
    /// A config that fails [`WorldConfig::validate`] is logged and replaced by
    /// the default one.
    pub fn new(config: WorldConfig) -> Self {
        let config = validated_or_default(config);
        let [wx, wy, wz] = config.world_chunks;
        info!(
            "Creating {}x{}x{} chunk world with {}-block chunks",
            wx, wy, wz, config.chunk_size
        );

        let (mut world, report) = generate_world(&config);
        let mut mesh_manager = MeshManager::new(
            config.chunk_size,
            MeshSettings {
                lighting: true,
                wireframe: false,
            },
        );
        mesh_manager.rebuild_all(&mut world);

        EngineState {
            world: MtResource::new(world),
            mesh_manager,
            task_manager: TaskManager::new(config.generation_workers),
            integrator: PhysicsIntegrator::new(config.physics.clone()),
            entities: Vec::new(),
            config,
            report,
        }
    }

    /// Shared handle to the live world.
    pub fn world(&self) -> &MtResource<World> {
        &self.world
    }

    pub fn config(&self) -> &WorldConfig {
        &self.config
    }

    pub fn mesh_manager(&self) -> &MeshManager {
        &self.mesh_manager
    }

    /// Report from the initial generation run.
    pub fn generation_report(&self) -> &GenerationReport {
        &self.report
    }

    /// Block id at a global position; air outside the world.
    pub fn get_block_at(&self, position: Point3<i32>) -> BlockTypeSize {
        self.world.get().get_block_at(position)
    }

    /// Writes a block and remeshes the affected chunks.
    ///
    /// Returns `false`, changing nothing, when `position` is outside the world.
    pub fn set_block_at(&mut self, position: Point3<i32>, block: BlockTypeSize) -> bool {
        let mut world = self.world.get_mut();
        if !world.set_block_at(position, block) {
            return false;
        }
        self.mesh_manager.rebuild_dirty(&mut world);
        true
    }

    /// Builds one pass of a chunk's geometry without storing it.
    ///
    /// The transparent pass returns `None` when the chunk has no transparent faces.
    pub fn generate_mesh(
        &mut self,
        chunk: Point3<i32>,
        pass: MeshPass,
        lighting: bool,
    ) -> Option<Mesh> {
        let world = self.world.get();
        self.mesh_manager.generate_mesh(&world, chunk, pass, lighting)
    }

    /// Rebuilds meshes of chunks edited directly through [`EngineState::world`].
    pub fn rebuild_dirty(&mut self) -> Vec<Point3<i32>> {
        let mut world = self.world.get_mut();
        self.mesh_manager.rebuild_dirty(&mut world)
    }

    pub fn set_lighting(&mut self, lighting: bool) -> bool {
        let mut world = self.world.get_mut();
        self.mesh_manager.set_lighting(&mut world, lighting)
    }

    pub fn set_wireframe(&mut self, wireframe: bool) -> bool {
        let mut world = self.world.get_mut();
        self.mesh_manager.set_wireframe(&mut world, wireframe)
    }

    pub fn raycast(
        &self,
        origin: Point3<f32>,
        direction: Vector3<f32>,
        max_distance: f32,
    ) -> Option<RaycastHit> {
        self.world.get().raycast(origin, direction, max_distance)
    }

    /// Height of the first solid block from the top of a column, if any.
    pub fn surface_height(&self, x: i32, z: i32) -> Option<i32> {
        let world = self.world.get();
        (0..world.height())
            .rev()
            .find(|&y| BlockRegistry::is_solid(world.get_block_at(Point3::new(x, y, z))))
    }

    /// Adds an entity and returns its index.
    pub fn spawn_entity(&mut self, kind: EntityKind, position: Point3<f32>) -> usize {
        self.entities.push(Entity::new(kind, position));
        debug!("Spawned {:?} at {:?}", kind, position);
        self.entities.len() - 1
    }

    pub fn entities(&self) -> &[Entity] {
        &self.entities
    }

    pub fn entity(&self, index: usize) -> Option<&Entity> {
        self.entities.get(index)
    }

    pub fn entity_mut(&mut self, index: usize) -> Option<&mut Entity> {
        self.entities.get_mut(index)
    }

    /// Resolves `body` against the world at `proposed`. See
    /// [`physics::resolve_world_collision`].
    pub fn resolve_world_collision<B: PhysicsBody + ?Sized>(
        &self,
        body: &mut B,
        proposed: Point3<f32>,
    ) -> Point3<f32> {
        physics::resolve_world_collision(body, &self.world.get(), proposed)
    }

    /// Separates two spawned entities. Returns whether they were in contact.
    pub fn resolve_entity_collision(&mut self, a: usize, b: usize) -> bool {
        if a == b || a.max(b) >= self.entities.len() {
            return false;
        }
        let (low, high) = (a.min(b), a.max(b));
        let (head, tail) = self.entities.split_at_mut(high);
        physics::resolve_entity_collision(&mut head[low], &mut tail[0])
    }

    /// Advances every entity by `dt`.
    ///
    /// Integrates each entity against the world, then separates overlapping
    /// pairs, then counts down activity timers. Returns the activities that
    /// finished during this tick, by entity index.
    pub fn tick(&mut self, dt: Duration) -> Vec<(usize, Activity)> {
        {
            let world = self.world.get();
            for entity in &mut self.entities {
                self.integrator.tick(entity, &world, dt);
            }
        }

        for high in 1..self.entities.len() {
            let (head, tail) = self.entities.split_at_mut(high);
            for other in head.iter_mut() {
                physics::resolve_entity_collision(other, &mut tail[0]);
            }
        }

        self.entities
            .iter_mut()
            .enumerate()
            .filter_map(|(index, entity)| entity.activity.advance(dt).map(|done| (index, done)))
            .collect()
    }

    /// Starts generating a new world from `config` on a worker thread.
    ///
    /// The current world stays live until [`EngineState::process_tasks`] or
    /// [`EngineState::wait_for_tasks`] publishes the replacement. Physics
    /// settings take effect immediately.
    ///
    /// An invalid config is rejected and nothing is scheduled.
    pub fn regenerate_world(&mut self, config: WorldConfig) -> Result<(), ConfigError> {
        if let Err(err) = config.validate() {
            error!("Rejecting world regeneration: {err}");
            return Err(err);
        }
        info!("Scheduling world regeneration");
        self.integrator = PhysicsIntegrator::new(config.physics.clone());
        self.task_manager
            .publish_task(Box::new(WorldGenerationTask::new(config.clone())));
        self.config = config;
        Ok(())
    }

    /// Applies finished background work and schedules queued tasks. Never blocks.
    pub fn process_tasks(&mut self) -> usize {
        let mut context = TaskContext {
            world: &self.world,
            mesh_manager: &mut self.mesh_manager,
        };
        let handled = self.task_manager.process_completed_tasks(&mut context);
        self.task_manager.process_queued_tasks();
        handled
    }

    /// Blocks until all background work has been applied.
    pub fn wait_for_tasks(&mut self) -> usize {
        let mut context = TaskContext {
            world: &self.world,
            mesh_manager: &mut self.mesh_manager,
        };
        self.task_manager.wait_for_completion(&mut context)
    }

    pub fn pending_tasks(&self) -> usize {
        self.task_manager.pending_tasks()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine_state::voxels::block::{block_type::BlockType, AIR};

    fn small_config() -> WorldConfig {
        WorldConfig {
            seed: Some(77),
            world_chunks: [2, 2, 2],
            chunk_size: 8,
            water_level: 6,
            base_offset: 4,
            structures: false,
            vegetation: false,
            ..WorldConfig::default()
        }
    }

    #[test]
    fn new_engine_meshes_every_chunk() {
        let engine = EngineState::new(small_config());
        assert_eq!(engine.mesh_manager().len(), 8);
        assert_eq!(engine.generation_report().seed, 77);
        assert!(engine.world().get_mut().take_dirty_chunks().is_empty());
    }

    #[test]
    fn out_of_bounds_edit_is_rejected() {
        let mut engine = EngineState::new(small_config());
        let outside = Point3::new(0, 100, 0);
        assert!(!engine.set_block_at(outside, BlockType::Stone.id()));
        assert_eq!(engine.get_block_at(outside), AIR);
    }

    #[test]
    fn entity_pairs_resolve_by_index() {
        let mut engine = EngineState::new(small_config());
        let a = engine.spawn_entity(EntityKind::Wolf, Point3::new(0.0, 20.0, 0.0));
        let b = engine.spawn_entity(EntityKind::Wolf, Point3::new(0.3, 20.0, 0.0));
        assert!(!engine.resolve_entity_collision(a, a));
        assert!(!engine.resolve_entity_collision(a, 9));
        assert!(engine.resolve_entity_collision(b, a));
        let gap = engine.entities()[b].bounding_box().min.x - engine.entities()[a].bounding_box().max.x;
        assert!(gap.abs() < 1e-4);
    }

    #[test]
    fn invalid_configs_are_replaced_or_rejected() {
        let empty_chunks = WorldConfig {
            chunk_size: 0,
            ..small_config()
        };
        assert_eq!(validated_or_default(empty_chunks), WorldConfig::default());
        assert_eq!(validated_or_default(small_config()), small_config());

        let mut engine = EngineState::new(small_config());
        let flat = WorldConfig {
            world_chunks: [2, 0, 2],
            ..small_config()
        };
        assert!(matches!(
            engine.regenerate_world(flat),
            Err(ConfigError::Invalid(_))
        ));
        assert_eq!(engine.pending_tasks(), 0);
        assert_eq!(engine.config().world_chunks, [2, 2, 2]);
    }

    #[test]
    fn tick_reports_finished_activities() {
        let mut engine = EngineState::new(small_config());
        let index = engine.spawn_entity(EntityKind::Lizard, Point3::new(0.5, 15.0, 0.5));
        if let Some(lizard) = engine.entity_mut(index) {
            lizard.activity.start(Activity::Basking, Duration::from_millis(20));
        }
        assert!(engine.tick(Duration::from_millis(10)).is_empty());
        assert_eq!(
            engine.tick(Duration::from_millis(10)),
            vec![(index, Activity::Basking)]
        );
    }
}

#![warn(rustdoc::missing_crate_level_docs)]
#![warn(rustdoc::invalid_rust_codeblocks)]

//! # Voxel World
//!
//! A chunked voxel world engine: seeded terrain generation, greedy meshing
//! with per-corner ambient occlusion, and axis-aligned physics with auto-step.
//!
//! ## Key Modules
//!
//! * `config` - JSON world and physics configuration
//! * `core` - shared resource handles used across threads
//! * `engine_state` - the world, meshing, physics and task management
//!
//! ## Architecture
//!
//! The engine keeps a clear separation between:
//! * Voxel data (blocks, chunks and the world grid)
//! * Generation (noise, biomes, structures), run once per world
//! * Meshing, run on load, on edits and on lighting or wireframe toggles
//! * Physics, run every simulation tick
//!
//! All of it is reached through [`engine_state::EngineState`], which owns the
//! world and threads it through every operation.
//!
//! ## Usage
//!
//! ```no_run
//! fn main() {
//!     voxel_world::run();
//! }
//! ```

use cgmath::{Point3, Vector3};
use log::{error, info, warn};
use web_time::{Duration, Instant};

use config::{WorldConfig, CONFIG_PATH_ENV};
use engine_state::{physics::EntityKind, voxels::block::block_type::BlockType, EngineState};

pub mod config;
pub mod core;
pub mod engine_state;

/// Length of one simulation tick in the demo loop.
const DEMO_TICK: Duration = Duration::from_micros(16_667);
/// Number of ticks the demo loop runs.
const DEMO_TICKS: usize = 180;

/// Resolves the configuration from the first CLI argument or
/// [`CONFIG_PATH_ENV`], falling back to defaults when neither loads.
fn load_config() -> WorldConfig {
    let path = std::env::args()
        .nth(1)
        .or_else(|| std::env::var(CONFIG_PATH_ENV).ok());

    match path {
        Some(path) => match WorldConfig::load(&path) {
            Ok(config) => {
                info!("Loaded config from {path}");
                config
            }
            Err(err) => {
                error!("{err}; using default config");
                WorldConfig::default()
            }
        },
        None => {
            info!("No config given, using defaults");
            WorldConfig::default()
        }
    }
}

/// Generates and meshes a world, then drops a player onto it and walks it
/// forward for a few seconds of simulated time.
pub fn run() {
    let mut log_builder = env_logger::Builder::new();
    log_builder
        .target(env_logger::Target::Stdout)
        .parse_env("RUST_LOG")
        .init();

    info!("Logger initialized");
    let config = load_config();

    let started = Instant::now();
    let mut engine = EngineState::new(config);
    let report = engine.generation_report();
    info!(
        "World ready in {:?}: seed {}, {} blocks, {} trees, {} plants, {} islands, {} clouds, {} faces",
        started.elapsed(),
        report.seed,
        report.blocks,
        report.trees,
        report.vegetation,
        report.islands,
        report.clouds,
        engine.mesh_manager().face_count()
    );

    let Some(ground) = engine.surface_height(0, 0) else {
        warn!("No ground under the origin, skipping physics demo");
        return;
    };
    let footprint = EntityKind::Player.footprint();
    let spawn = Point3::new(0.5, ground as f32 + 1.0 + footprint.y / 2.0 + 2.0, 0.5);
    let player = engine.spawn_entity(EntityKind::Player, spawn);

    for tick in 0..DEMO_TICKS {
        if let Some(entity) = engine.entity_mut(player) {
            if entity.on_ground {
                entity.velocity.x = 4.0;
            }
        }
        engine.tick(DEMO_TICK);
        if tick % 60 == 0 {
            if let Some(entity) = engine.entity(player) {
                info!(
                    "Tick {tick}: player at {:?}, on ground: {}",
                    entity.position, entity.on_ground
                );
            }
        }
    }

    if let Some(entity) = engine.entity(player) {
        let eye = entity.position + Vector3::new(0.0, footprint.y * 0.4, 0.0);
        if let Some(hit) = engine.raycast(eye, Vector3::new(0.0, -1.0, 0.0), 16.0) {
            info!("Digging block {:?} below the player", hit.block);
            engine.set_block_at(hit.block, BlockType::Air.id());
            info!(
                "Mesh now has {} faces",
                engine.mesh_manager().face_count()
            );
        }
    }
}

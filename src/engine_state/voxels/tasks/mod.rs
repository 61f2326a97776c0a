//! # Voxel Tasks
//!
//! Background work on voxel data. World generation is the only job heavy
//! enough to leave the simulation thread.

pub mod world_generation_task;

pub use world_generation_task::{WorldGenerationResult, WorldGenerationTask};

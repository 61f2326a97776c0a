//! Mesh generation for voxel chunks.
//!
//! # Architecture
//! - [`greedy_mesh`]: merges visible block faces of a chunk into quads
//! - [`Face`]: one merged quad with its block, side and occlusion key
//! - [`Mesh`] / [`ChunkMesh`]: vertex and index buffers built from faces
//! - `ambient_occlusion`: per-corner light levels and diagonal selection
//!
//! # Usage
//! ```no_run
//! use cgmath::Point3;
//! use voxel_world::engine_state::{
//!     rendering::meshing::mesh::{greedy_mesh, MeshPass, MeshScratch},
//!     voxels::world::World,
//! };
//!
//! let world = World::new([2, 2, 2], 16);
//! let mut scratch = MeshScratch::new(16);
//! let faces = greedy_mesh(&world, Point3::new(0, 0, 0), MeshPass::Opaque, true, &mut scratch);
//! ```

pub mod ambient_occlusion;
mod face;
mod greedy;
mod mesh;

pub use face::Face;
pub use greedy::{face_visible, greedy_mesh, MaskCell, MeshPass, MeshScratch};
pub use mesh::*;

//! Geometry side of the engine.
//!
//! Converts world block data into renderer-ready meshes. Drawing itself is left
//! to the embedding application, which consumes [`ChunkMesh`] values from the
//! [`MeshManager`].

pub mod meshing;
mod vertex;

pub use meshing::{ChunkMesh, MeshManager, MeshSettings};
pub use vertex::Vertex;

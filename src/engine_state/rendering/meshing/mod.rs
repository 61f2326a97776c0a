//! Mesh generation and management for voxel chunks.
//!
//! This module turns world block data into per-chunk geometry and keeps that
//! geometry current as the world changes.
//!
//! # Architecture
//! - `MeshManager`: owns the latest [`ChunkMesh`] of every chunk, the active
//!   [`MeshSettings`] and the scratch mask the mesher reuses
//! - `mesh/`: the greedy mesher, faces, occlusion keys and mesh buffers
//!
//! # Rebuild triggers
//! Meshes are rebuilt synchronously, and only when:
//! - the world is first loaded or replaced (`rebuild_all`)
//! - blocks are edited (`rebuild_dirty` drains the world's dirty chunks: the
//!   edited chunk plus neighbours sharing the edited face plane)
//! - lighting or wireframe mode is toggled (every chunk)

use std::collections::HashMap;

use cgmath::Point3;
use log::{debug, info};
use web_time::Instant;

use crate::engine_state::voxels::world::World;

pub mod mesh;

pub use mesh::{ChunkMesh, Mesh, MeshPass, MeshScratch, Topology};

/// Global meshing options.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct MeshSettings {
    /// Apply directional shading and per-corner ambient occlusion.
    pub lighting: bool,
    /// Emit line lists tracing each quad instead of triangles.
    pub wireframe: bool,
}

impl MeshSettings {
    pub fn topology(&self) -> Topology {
        if self.wireframe {
            Topology::Lines
        } else {
            Topology::Triangles
        }
    }
}

/// Central store of chunk meshes.
///
/// The manager is single-threaded: it holds one scratch buffer and rebuilds
/// chunks one after another.
#[derive(Debug)]
pub struct MeshManager {
    meshes: HashMap<Point3<i32>, ChunkMesh>,
    settings: MeshSettings,
    scratch: MeshScratch,
}

impl MeshManager {
    /// Creates an empty manager for worlds with `chunk_dimension` sized chunks.
    pub fn new(chunk_dimension: usize, settings: MeshSettings) -> Self {
        MeshManager {
            meshes: HashMap::new(),
            settings,
            scratch: MeshScratch::new(chunk_dimension),
        }
    }

    pub fn settings(&self) -> MeshSettings {
        self.settings
    }

    /// The current mesh of a chunk, if it has been built.
    pub fn get(&self, chunk: Point3<i32>) -> Option<&ChunkMesh> {
        self.meshes.get(&chunk)
    }

    pub fn len(&self) -> usize {
        self.meshes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.meshes.is_empty()
    }

    pub fn meshes(&self) -> impl Iterator<Item = &ChunkMesh> {
        self.meshes.values()
    }

    /// Total faces across every stored mesh.
    pub fn face_count(&self) -> usize {
        self.meshes.values().map(ChunkMesh::face_count).sum()
    }

    fn ensure_scratch(&mut self, world: &World) {
        if self.scratch.dimension() != world.chunk_dimension() {
            self.scratch = MeshScratch::new(world.chunk_dimension());
        }
    }

    /// Builds one pass of a chunk's geometry with explicit options.
    ///
    /// The opaque pass always returns a mesh, possibly empty. The transparent
    /// pass returns `None` when it has no faces.
    pub fn generate_mesh(
        &mut self,
        world: &World,
        chunk: Point3<i32>,
        pass: MeshPass,
        lighting: bool,
    ) -> Option<Mesh> {
        self.ensure_scratch(world);
        let faces = mesh::greedy_mesh(world, chunk, pass, lighting, &mut self.scratch);
        if pass == MeshPass::Transparent && faces.is_empty() {
            return None;
        }
        Some(Mesh::from_faces(faces, lighting, self.settings.topology()))
    }

    /// Builds both passes of a chunk with the current settings.
    pub fn build_chunk(&mut self, world: &World, chunk: Point3<i32>) -> ChunkMesh {
        let lighting = self.settings.lighting;
        let opaque = self
            .generate_mesh(world, chunk, MeshPass::Opaque, lighting)
            .unwrap_or_else(|| Mesh::new(self.settings.topology()));
        let transparent = self.generate_mesh(world, chunk, MeshPass::Transparent, lighting);
        ChunkMesh {
            position: chunk,
            opaque,
            transparent,
        }
    }

    /// Rebuilds and stores the mesh of one chunk.
    pub fn rebuild_chunk(&mut self, world: &World, chunk: Point3<i32>) -> &ChunkMesh {
        let mesh = self.build_chunk(world, chunk);
        self.meshes.insert(chunk, mesh);
        &self.meshes[&chunk]
    }

    /// Rebuilds every chunk of `world`, replacing all stored meshes.
    ///
    /// Clears the world's dirty set, since every chunk is now current.
    pub fn rebuild_all(&mut self, world: &mut World) -> usize {
        let started = Instant::now();
        world.take_dirty_chunks();
        self.meshes.clear();

        let chunks: Vec<Point3<i32>> = world.chunk_coords().collect();
        for &chunk in &chunks {
            self.rebuild_chunk(world, chunk);
        }
        info!(
            "Meshed {} chunks ({} faces) in {:?}",
            chunks.len(),
            self.face_count(),
            started.elapsed()
        );
        chunks.len()
    }

    /// Rebuilds only the chunks marked dirty since the last rebuild.
    pub fn rebuild_dirty(&mut self, world: &mut World) -> Vec<Point3<i32>> {
        let dirty = world.take_dirty_chunks();
        for &chunk in &dirty {
            self.rebuild_chunk(world, chunk);
        }
        if !dirty.is_empty() {
            debug!("Rebuilt {} dirty chunk meshes", dirty.len());
        }
        dirty
    }

    /// Switches lighting, rebuilding every chunk when the value changes.
    pub fn set_lighting(&mut self, world: &mut World, lighting: bool) -> bool {
        if self.settings.lighting == lighting {
            return false;
        }
        self.settings.lighting = lighting;
        self.rebuild_all(world);
        true
    }

    /// Switches wireframe output, rebuilding every chunk when the value changes.
    pub fn set_wireframe(&mut self, world: &mut World, wireframe: bool) -> bool {
        if self.settings.wireframe == wireframe {
            return false;
        }
        self.settings.wireframe = wireframe;
        self.rebuild_all(world);
        true
    }

    pub fn clear(&mut self) {
        self.meshes.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine_state::voxels::block::block_type::BlockType;

    fn stone_floor() -> World {
        let mut world = World::new([2, 1, 2], 8);
        let (min, max) = world.block_bounds();
        for z in min.z..max.z {
            for x in min.x..max.x {
                world.set_block_at(Point3::new(x, 0, z), BlockType::Stone.id());
            }
        }
        world
    }

    #[test]
    fn rebuild_all_meshes_every_chunk_and_clears_dirty() {
        let mut world = stone_floor();
        let mut manager = MeshManager::new(8, MeshSettings::default());
        assert_eq!(manager.rebuild_all(&mut world), 4);
        assert_eq!(manager.len(), 4);
        assert!(world.take_dirty_chunks().is_empty());
        for mesh in manager.meshes() {
            assert!(!mesh.opaque.is_empty());
            assert!(mesh.transparent.is_none());
        }
    }

    #[test]
    fn edits_rebuild_only_affected_chunks() {
        let mut world = stone_floor();
        let mut manager = MeshManager::new(8, MeshSettings::default());
        manager.rebuild_all(&mut world);

        // Interior edit: only the owning chunk.
        world.set_block_at(Point3::new(3, 1, 3), BlockType::Water.id());
        assert_eq!(manager.rebuild_dirty(&mut world), vec![Point3::new(0, 0, 0)]);
        assert!(manager.get(Point3::new(0, 0, 0)).unwrap().transparent.is_some());

        // Removing the water drops the transparent mesh again.
        world.set_block_at(Point3::new(3, 1, 3), 0);
        manager.rebuild_dirty(&mut world);
        assert!(manager.get(Point3::new(0, 0, 0)).unwrap().transparent.is_none());

        // Border edit on x = 0 also touches the chunk at x = -1.
        world.set_block_at(Point3::new(0, 1, 3), BlockType::Stone.id());
        let mut rebuilt = manager.rebuild_dirty(&mut world);
        rebuilt.sort_by_key(|p| (p.x, p.y, p.z));
        assert_eq!(rebuilt, vec![Point3::new(-1, 0, 0), Point3::new(0, 0, 0)]);
    }

    #[test]
    fn toggles_rebuild_with_new_settings() {
        let mut world = stone_floor();
        let mut manager = MeshManager::new(8, MeshSettings::default());
        manager.rebuild_all(&mut world);

        assert!(manager.set_wireframe(&mut world, true));
        assert!(!manager.set_wireframe(&mut world, true));
        let mesh = manager.get(Point3::new(0, 0, 0)).unwrap();
        assert_eq!(mesh.opaque.topology, Topology::Lines);
        assert_eq!(mesh.opaque.indices.len(), mesh.opaque.faces.len() * 8);

        assert!(manager.set_lighting(&mut world, true));
        assert!(manager.settings().lighting);
    }

    #[test]
    fn scratch_follows_world_chunk_size() {
        let mut world = World::new([1, 1, 1], 4);
        world.set_block_at(Point3::new(1, 1, 1), BlockType::Glass.id());
        let mut manager = MeshManager::new(16, MeshSettings::default());
        let transparent = manager
            .generate_mesh(&world, Point3::new(0, 0, 0), MeshPass::Transparent, false)
            .unwrap();
        assert_eq!(transparent.faces.len(), 6);
        assert!(manager
            .generate_mesh(&world, Point3::new(0, 0, 0), MeshPass::Opaque, false)
            .unwrap()
            .is_empty());
    }
}

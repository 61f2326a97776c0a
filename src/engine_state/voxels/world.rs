//! # World Module
//!
//! This module provides the `World` struct, the 3D grid of chunks that holds
//! every block of the voxel world and owns global ↔ local coordinate mapping.
//!
//! ## Layout
//!
//! The grid is `(Wx, Wy, Wz)` chunks. Horizontally it is centred on the origin:
//! chunk indices on X and Z are shifted by `Wx / 2` and `Wz / 2` before array
//! indexing. Vertically it starts at chunk 0, so block `y` ranges over
//! `[0, Wy * S)`.
//!
//! ## Bounds policy
//!
//! * Reads outside the grid return air.
//! * Writes outside the grid return `false` and mutate nothing.
//!
//! ## Dirty tracking
//!
//! Every successful edit marks the edited chunk, plus any neighbouring chunk
//! sharing the edited face plane, in a bit vector. The mesh manager drains
//! this set to rebuild only what changed.

use bitvec::prelude::BitVec;
use cgmath::{Point3, Vector3};

use super::block::{block_side::BlockSide, BlockRegistry, BlockTypeSize, AIR};
use super::chunk::Chunk;

/// The voxel world: a fixed grid of equally sized chunks.
#[derive(Clone, Debug)]
pub struct World {
    chunks: Vec<Chunk>,
    /// Size of the grid in chunks along X, Y and Z.
    size_in_chunks: [usize; 3],
    chunk_dimension: usize,
    /// One bit per chunk slot, set when the chunk needs its mesh rebuilt.
    dirty: BitVec,
}

/// The first solid block hit by [`World::raycast`].
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct RaycastHit {
    /// Global coordinates of the block.
    pub block: Point3<i32>,
    /// The face of the block the ray entered through.
    pub side: BlockSide,
    /// Distance along the ray to the entry point.
    pub distance: f32,
}

/// Converts a global block coordinate to the coordinate of its chunk.
///
/// Uses floor division so negative coordinates map to the chunk below.
#[inline]
pub fn global_to_chunk(coord: i32, chunk_dimension: usize) -> i32 {
    coord.div_euclid(chunk_dimension as i32)
}

/// Converts a global block coordinate to its coordinate inside its chunk.
#[inline]
pub fn global_to_local(coord: i32, chunk_dimension: usize) -> i32 {
    coord - global_to_chunk(coord, chunk_dimension) * chunk_dimension as i32
}

impl World {
    /// Creates a world filled with air.
    ///
    /// # Arguments
    /// * `size_in_chunks` - Grid size `(Wx, Wy, Wz)` in chunks, each non-zero
    /// * `chunk_dimension` - Edge length `S` of every chunk in blocks
    pub fn new(size_in_chunks: [usize; 3], chunk_dimension: usize) -> Self {
        assert!(
            size_in_chunks.iter().all(|&n| n > 0),
            "world must be at least one chunk on every axis"
        );
        let [wx, wy, wz] = size_in_chunks;
        let mut chunks = Vec::with_capacity(wx * wy * wz);
        for iz in 0..wz {
            for iy in 0..wy {
                for ix in 0..wx {
                    let position = Point3::new(
                        ix as i32 - (wx / 2) as i32,
                        iy as i32,
                        iz as i32 - (wz / 2) as i32,
                    );
                    chunks.push(Chunk::empty(position, chunk_dimension));
                }
            }
        }
        let mut dirty = BitVec::with_capacity(chunks.len());
        dirty.resize(chunks.len(), false);

        World {
            chunks,
            size_in_chunks,
            chunk_dimension,
            dirty,
        }
    }

    /// Edge length of every chunk in blocks.
    #[inline]
    pub fn chunk_dimension(&self) -> usize {
        self.chunk_dimension
    }

    /// Size of the grid in chunks.
    #[inline]
    pub fn size_in_chunks(&self) -> [usize; 3] {
        self.size_in_chunks
    }

    /// Height of the world in blocks.
    #[inline]
    pub fn height(&self) -> i32 {
        (self.size_in_chunks[1] * self.chunk_dimension) as i32
    }

    /// Inclusive minimum and exclusive maximum block coordinates of the world.
    pub fn block_bounds(&self) -> (Point3<i32>, Point3<i32>) {
        let s = self.chunk_dimension as i32;
        let [wx, wy, wz] = self.size_in_chunks;
        let min = Point3::new(-((wx / 2) as i32) * s, 0, -((wz / 2) as i32) * s);
        let max = Point3::new(
            min.x + wx as i32 * s,
            wy as i32 * s,
            min.z + wz as i32 * s,
        );
        (min, max)
    }

    /// Maps chunk coordinates to a slot in the chunk array.
    fn chunk_slot(&self, chunk: Point3<i32>) -> Option<usize> {
        let [wx, wy, wz] = self.size_in_chunks;
        let ix = chunk.x as i64 + (wx / 2) as i64;
        let iy = chunk.y as i64;
        let iz = chunk.z as i64 + (wz / 2) as i64;
        if ix < 0 || iy < 0 || iz < 0 || ix >= wx as i64 || iy >= wy as i64 || iz >= wz as i64 {
            return None;
        }
        Some(ix as usize + wx * (iy as usize + wy * iz as usize))
    }

    /// Splits a global position into chunk coordinates and local coordinates.
    #[inline]
    pub fn split_global(&self, pos: Point3<i32>) -> (Point3<i32>, Point3<i32>) {
        let s = self.chunk_dimension;
        let chunk = Point3::new(
            global_to_chunk(pos.x, s),
            global_to_chunk(pos.y, s),
            global_to_chunk(pos.z, s),
        );
        let local = Point3::new(
            global_to_local(pos.x, s),
            global_to_local(pos.y, s),
            global_to_local(pos.z, s),
        );
        (chunk, local)
    }

    /// Global block coordinates of a chunk's (0, 0, 0) cell.
    #[inline]
    pub fn chunk_origin(&self, chunk: Point3<i32>) -> Point3<i32> {
        let s = self.chunk_dimension as i32;
        Point3::new(chunk.x * s, chunk.y * s, chunk.z * s)
    }

    /// Returns the chunk at the given chunk coordinates, if inside the grid.
    pub fn get_chunk_at(&self, chunk: Point3<i32>) -> Option<&Chunk> {
        self.chunk_slot(chunk).map(|slot| &self.chunks[slot])
    }

    /// Iterates the coordinates of every chunk in the grid.
    pub fn chunk_coords(&self) -> impl Iterator<Item = Point3<i32>> + '_ {
        self.chunks.iter().map(|chunk| chunk.position)
    }

    /// Gets the block at global coordinates. Returns air outside the world.
    #[inline]
    pub fn get_block_at(&self, pos: Point3<i32>) -> BlockTypeSize {
        let (chunk, local) = self.split_global(pos);
        match self.chunk_slot(chunk) {
            Some(slot) => self.chunks[slot].get_block_at(local.x, local.y, local.z),
            None => AIR,
        }
    }

    /// Whether the block at global coordinates is solid.
    #[inline]
    pub fn is_solid_at(&self, pos: Point3<i32>) -> bool {
        BlockRegistry::is_solid(self.get_block_at(pos))
    }

    /// Sets the block at global coordinates.
    ///
    /// Returns `false`, without touching any chunk, when the position is
    /// outside the world. On success the owning chunk and any neighbour
    /// sharing the edited face plane are marked dirty.
    pub fn set_block_at(&mut self, pos: Point3<i32>, block: BlockTypeSize) -> bool {
        let (chunk, local) = self.split_global(pos);
        let Some(slot) = self.chunk_slot(chunk) else {
            return false;
        };
        if !self.chunks[slot].set_block_at(local.x, local.y, local.z, block) {
            return false;
        }

        self.dirty.set(slot, true);
        let last = self.chunk_dimension as i32 - 1;
        for axis in 0..3 {
            let mut offset = Vector3::new(0, 0, 0);
            if local[axis] == 0 {
                offset[axis] = -1;
            } else if local[axis] == last {
                offset[axis] = 1;
            } else {
                continue;
            }
            self.mark_dirty(chunk + offset);
        }
        true
    }

    /// Number of non-air blocks in the whole world.
    pub fn block_count(&self) -> usize {
        self.chunks.iter().map(Chunk::count_non_air).sum()
    }

    /// Marks a chunk for mesh rebuild. Chunks outside the grid are ignored.
    pub fn mark_dirty(&mut self, chunk: Point3<i32>) {
        if let Some(slot) = self.chunk_slot(chunk) {
            self.dirty.set(slot, true);
        }
    }

    /// Marks every chunk for mesh rebuild.
    pub fn mark_all_dirty(&mut self) {
        self.dirty.fill(true);
    }

    /// Returns the coordinates of every dirty chunk and clears the dirty set.
    pub fn take_dirty_chunks(&mut self) -> Vec<Point3<i32>> {
        let dirty: Vec<Point3<i32>> = self
            .dirty
            .iter_ones()
            .map(|slot| self.chunks[slot].position)
            .collect();
        self.dirty.fill(false);
        dirty
    }

    /// Casts a ray through the grid and returns the first solid block hit.
    ///
    /// Walks cells with a 3D DDA, so every cell the ray touches is visited in
    /// order. Cells outside the world read as air, which means a ray that never
    /// hits anything simply runs until `max_distance`.
    pub fn raycast(
        &self,
        origin: Point3<f32>,
        direction: Vector3<f32>,
        max_distance: f32,
    ) -> Option<RaycastHit> {
        let length = (direction.x * direction.x
            + direction.y * direction.y
            + direction.z * direction.z)
            .sqrt();
        if length <= f32::EPSILON {
            return None;
        }
        let dir = direction / length;

        let mut cell = Point3::new(
            origin.x.floor() as i32,
            origin.y.floor() as i32,
            origin.z.floor() as i32,
        );
        let mut step = [0i32; 3];
        let mut t_max = [f32::INFINITY; 3];
        let mut t_delta = [f32::INFINITY; 3];
        for axis in 0..3 {
            if dir[axis] > 0.0 {
                step[axis] = 1;
                t_delta[axis] = 1.0 / dir[axis];
                t_max[axis] = (cell[axis] as f32 + 1.0 - origin[axis]) / dir[axis];
            } else if dir[axis] < 0.0 {
                step[axis] = -1;
                t_delta[axis] = -1.0 / dir[axis];
                t_max[axis] = (cell[axis] as f32 - origin[axis]) / dir[axis];
            }
        }

        let mut distance = 0.0;
        let mut entered: Option<BlockSide> = None;
        while distance <= max_distance {
            if self.is_solid_at(cell) {
                // A ray starting inside a solid block has no entry face.
                let side = entered.unwrap_or(BlockSide::Top);
                return Some(RaycastHit {
                    block: cell,
                    side,
                    distance,
                });
            }

            let axis = if t_max[0] < t_max[1] {
                if t_max[0] < t_max[2] {
                    0
                } else {
                    2
                }
            } else if t_max[1] < t_max[2] {
                1
            } else {
                2
            };
            if !t_max[axis].is_finite() {
                return None;
            }
            distance = t_max[axis];
            t_max[axis] += t_delta[axis];
            cell[axis] += step[axis];
            entered = Some(entry_side(axis, step[axis]));
        }
        None
    }
}

/// The face a ray crosses when stepping along `axis` in direction `step`.
fn entry_side(axis: usize, step: i32) -> BlockSide {
    match (axis, step > 0) {
        (0, true) => BlockSide::Left,
        (0, false) => BlockSide::Right,
        (1, true) => BlockSide::Bottom,
        (1, false) => BlockSide::Top,
        (_, true) => BlockSide::Back,
        (_, false) => BlockSide::Front,
    }
}

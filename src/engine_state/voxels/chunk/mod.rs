//! # Chunk Module
//!
//! This module provides the `Chunk` struct: a fixed-size cube of block
//! identifiers with local addressing.
//!
//! ## Storage
//!
//! Blocks are stored densely, one `BlockTypeSize` per cell, addressed by
//! `x + S * (y + S * z)` where `S` is the chunk edge length. A chunk is created
//! once per chunk slot at world generation and mutated in place afterwards; it
//! is never resized.
//!
//! ## Bounds
//!
//! Reads outside `[0, S)` on any axis return air and writes outside that range
//! are ignored.

use cgmath::Point3;

use super::block::{BlockTypeSize, AIR};

/// Default edge length of a chunk in blocks.
pub const DEFAULT_CHUNK_DIMENSION: usize = 32;

/// A cube of `dimension³` block identifiers.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Chunk {
    /// The position of this chunk in chunk coordinates (not block coordinates).
    pub position: Point3<i32>,
    dimension: usize,
    blocks: Vec<BlockTypeSize>,
}

impl Chunk {
    /// Creates a chunk completely filled with air.
    ///
    /// # Arguments
    /// * `position` - The chunk coordinates of the new chunk
    /// * `dimension` - Edge length in blocks, must be non-zero
    pub fn empty(position: Point3<i32>, dimension: usize) -> Self {
        Self::filled(position, dimension, AIR)
    }

    /// Creates a chunk where every cell holds `block`.
    pub fn filled(position: Point3<i32>, dimension: usize, block: BlockTypeSize) -> Self {
        assert!(dimension > 0, "chunk dimension must be non-zero");
        Chunk {
            position,
            dimension,
            blocks: vec![block; dimension * dimension * dimension],
        }
    }

    /// Edge length of the chunk in blocks.
    #[inline]
    pub fn dimension(&self) -> usize {
        self.dimension
    }

    #[inline]
    fn index(&self, x: i32, y: i32, z: i32) -> Option<usize> {
        let s = self.dimension as i32;
        if x < 0 || y < 0 || z < 0 || x >= s || y >= s || z >= s {
            return None;
        }
        let (x, y, z, s) = (x as usize, y as usize, z as usize, self.dimension);
        Some(x + s * (y + s * z))
    }

    /// Gets the block at the specified chunk-relative coordinates.
    ///
    /// Returns air for coordinates outside the chunk.
    #[inline]
    pub fn get_block_at(&self, x: i32, y: i32, z: i32) -> BlockTypeSize {
        self.index(x, y, z).map_or(AIR, |i| self.blocks[i])
    }

    /// Sets the block at the specified chunk-relative coordinates.
    ///
    /// Coordinates outside the chunk are silently ignored. Returns whether the
    /// cell was written.
    #[inline]
    pub fn set_block_at(&mut self, x: i32, y: i32, z: i32, block: BlockTypeSize) -> bool {
        match self.index(x, y, z) {
            Some(i) => {
                self.blocks[i] = block;
                true
            }
            None => false,
        }
    }

    /// Whether every cell of the chunk is air.
    pub fn is_empty(&self) -> bool {
        self.blocks.iter().all(|&block| block == AIR)
    }

    /// Number of non-air cells.
    pub fn count_non_air(&self) -> usize {
        self.blocks.iter().filter(|&&block| block != AIR).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine_state::voxels::block::block_type::BlockType;

    #[test]
    fn set_then_get_inside_bounds() {
        let mut chunk = Chunk::empty(Point3::new(0, 0, 0), 8);
        assert!(chunk.set_block_at(7, 0, 3, BlockType::Stone.id()));
        assert_eq!(chunk.get_block_at(7, 0, 3), BlockType::Stone.id());
        assert_eq!(chunk.count_non_air(), 1);
    }

    #[test]
    fn out_of_range_reads_are_air_and_writes_are_ignored() {
        let mut chunk = Chunk::filled(Point3::new(1, 0, -1), 4, BlockType::Dirt.id());
        let before = chunk.clone();

        assert_eq!(chunk.get_block_at(-1, 0, 0), AIR);
        assert_eq!(chunk.get_block_at(0, 4, 0), AIR);
        assert!(!chunk.set_block_at(4, 0, 0, BlockType::Stone.id()));
        assert!(!chunk.set_block_at(0, 0, -1, BlockType::Stone.id()));
        assert_eq!(chunk, before);
    }

    #[test]
    fn layout_is_x_fastest() {
        let mut chunk = Chunk::empty(Point3::new(0, 0, 0), 4);
        chunk.set_block_at(1, 2, 3, BlockType::Sand.id());
        assert_eq!(chunk.blocks[1 + 4 * (2 + 4 * 3)], BlockType::Sand.id());
    }
}

//! # Block Type Module
//!
//! This module defines the different types of blocks in the voxel world.
//! It provides conversion from the compact stored identifier back to the rich
//! enum, with unknown identifiers resolving to [`BlockType::Air`].

use num_derive::FromPrimitive;
use num_traits::FromPrimitive;

use super::BlockTypeSize;

/// Enumerates all block types in the voxel world.
///
/// The discriminant of each variant is the identifier stored in chunks. The
/// `FromPrimitive` derive allows conversion back from that identifier.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, FromPrimitive)]
#[repr(u8)]
pub enum BlockType {
    /// Empty space. Always identifier 0.
    Air = 0,
    Stone,
    Dirt,
    Grass,
    Sand,
    Water,
    Snow,
    Ice,
    PackedIce,
    RedSand,
    Ash,
    Mud,
    Clay,
    Gravel,
    Podzol,
    Moss,
    Terracotta,
    Basalt,
    Obsidian,
    Lava,
    Sandstone,
    Permafrost,
    CoarseDirt,
    DryGrass,
    JungleGrass,
    SwampWater,
    Wood,
    Leaves,
    Cloud,
    Glass,
    TallGrass,
    Flower,
    Mycelium,
}

/// Number of block types in the catalog.
pub const BLOCK_TYPE_COUNT: usize = BlockType::Mycelium as usize + 1;

impl BlockType {
    /// Converts a stored identifier to a `BlockType`.
    ///
    /// Identifiers that do not name a block type resolve to `BlockType::Air`
    /// rather than failing.
    pub fn from_id(id: BlockTypeSize) -> Self {
        BlockType::from_u8(id).unwrap_or(BlockType::Air)
    }

    /// The compact identifier stored in chunk data.
    #[inline]
    pub fn id(self) -> BlockTypeSize {
        self as BlockTypeSize
    }

    /// Whether this block is one of the grass-class surface materials that
    /// vegetation and trees can grow on.
    pub fn is_fertile(self) -> bool {
        matches!(
            self,
            BlockType::Grass
                | BlockType::DryGrass
                | BlockType::JungleGrass
                | BlockType::Podzol
                | BlockType::Moss
                | BlockType::Mycelium
        )
    }
}

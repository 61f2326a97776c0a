//! # Block Module
//!
//! This module provides the block catalog for the voxel engine: block type
//! definitions, block face handling, and the static registry mapping a block
//! identifier to its rendering and physical properties.

use block_type::{BlockType, BLOCK_TYPE_COUNT};

pub mod block_side;
pub mod block_type;

/// The underlying integer type used to represent block types in memory.
pub type BlockTypeSize = u8;

/// Identifier of the air block. Every unknown identifier resolves to it.
pub const AIR: BlockTypeSize = BlockType::Air as BlockTypeSize;

/// An RGBA colour with straight (non-premultiplied) alpha.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Color {
    /// Creates a colour from its four channels.
    pub const fn rgba(r: f32, g: f32, b: f32, a: f32) -> Self {
        Color { r, g, b, a }
    }

    /// Creates an opaque colour.
    pub const fn rgb(r: f32, g: f32, b: f32) -> Self {
        Color { r, g, b, a: 1.0 }
    }

    /// Scales the colour channels, leaving alpha untouched.
    pub fn shaded(self, factor: f32) -> Self {
        Color {
            r: self.r * factor,
            g: self.g * factor,
            b: self.b * factor,
            a: self.a,
        }
    }

    pub fn to_array(self) -> [f32; 4] {
        [self.r, self.g, self.b, self.a]
    }
}

/// The properties of one block type.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct BlockProperties {
    pub block_type: BlockType,
    pub name: &'static str,
    pub color: Color,
    /// Whether entities collide with this block.
    pub solid: bool,
    pub water: bool,
    pub vegetation: bool,
}

impl BlockProperties {
    const fn new(
        block_type: BlockType,
        name: &'static str,
        color: Color,
        solid: bool,
        water: bool,
        vegetation: bool,
    ) -> Self {
        BlockProperties {
            block_type,
            name,
            color,
            solid,
            water,
            vegetation,
        }
    }

    /// Blocks with alpha below one are rendered in the transparent pass.
    #[inline]
    pub fn transparent(&self) -> bool {
        self.color.a < 1.0
    }

    /// Blocks that never produce geometry and never hide a neighbour's face.
    #[inline]
    pub fn invisible(&self) -> bool {
        self.block_type == BlockType::Air || self.color.a <= 0.0
    }

    /// Whether this block darkens the corners of adjacent faces.
    #[inline]
    pub fn occludes(&self) -> bool {
        self.solid && !self.transparent()
    }
}

/// Property table indexed by block identifier.
///
/// The order must match the discriminants of [`BlockType`].
#[rustfmt::skip]
pub static BLOCK_PROPERTIES: [BlockProperties; BLOCK_TYPE_COUNT] = [
    //                   type                     name           color                                  solid  water  vegetation
    BlockProperties::new(BlockType::Air,         "air",         Color::rgba(0.0, 0.0, 0.0, 0.0),       false, false, false),
    BlockProperties::new(BlockType::Stone,       "stone",       Color::rgb(0.50, 0.50, 0.52),          true,  false, false),
    BlockProperties::new(BlockType::Dirt,        "dirt",        Color::rgb(0.45, 0.31, 0.18),          true,  false, false),
    BlockProperties::new(BlockType::Grass,       "grass",       Color::rgb(0.33, 0.62, 0.22),          true,  false, false),
    BlockProperties::new(BlockType::Sand,        "sand",        Color::rgb(0.86, 0.80, 0.55),          true,  false, false),
    BlockProperties::new(BlockType::Water,       "water",       Color::rgba(0.18, 0.38, 0.82, 0.6),    false, true,  false),
    BlockProperties::new(BlockType::Snow,        "snow",        Color::rgb(0.95, 0.96, 0.98),          true,  false, false),
    BlockProperties::new(BlockType::Ice,         "ice",         Color::rgba(0.62, 0.78, 0.95, 0.8),    true,  false, false),
    BlockProperties::new(BlockType::PackedIce,   "packed_ice",  Color::rgb(0.55, 0.70, 0.92),          true,  false, false),
    BlockProperties::new(BlockType::RedSand,     "red_sand",    Color::rgb(0.75, 0.40, 0.18),          true,  false, false),
    BlockProperties::new(BlockType::Ash,         "ash",         Color::rgb(0.38, 0.36, 0.35),          true,  false, false),
    BlockProperties::new(BlockType::Mud,         "mud",         Color::rgb(0.24, 0.20, 0.16),          true,  false, false),
    BlockProperties::new(BlockType::Clay,        "clay",        Color::rgb(0.62, 0.64, 0.70),          true,  false, false),
    BlockProperties::new(BlockType::Gravel,      "gravel",      Color::rgb(0.53, 0.50, 0.48),          true,  false, false),
    BlockProperties::new(BlockType::Podzol,      "podzol",      Color::rgb(0.40, 0.28, 0.12),          true,  false, false),
    BlockProperties::new(BlockType::Moss,        "moss",        Color::rgb(0.35, 0.48, 0.20),          true,  false, false),
    BlockProperties::new(BlockType::Terracotta,  "terracotta",  Color::rgb(0.62, 0.38, 0.28),          true,  false, false),
    BlockProperties::new(BlockType::Basalt,      "basalt",      Color::rgb(0.25, 0.25, 0.27),          true,  false, false),
    BlockProperties::new(BlockType::Obsidian,    "obsidian",    Color::rgb(0.08, 0.06, 0.12),          true,  false, false),
    BlockProperties::new(BlockType::Lava,        "lava",        Color::rgb(0.95, 0.40, 0.05),          false, false, false),
    BlockProperties::new(BlockType::Sandstone,   "sandstone",   Color::rgb(0.82, 0.75, 0.52),          true,  false, false),
    BlockProperties::new(BlockType::Permafrost,  "permafrost",  Color::rgb(0.48, 0.45, 0.50),          true,  false, false),
    BlockProperties::new(BlockType::CoarseDirt,  "coarse_dirt", Color::rgb(0.42, 0.30, 0.20),          true,  false, false),
    BlockProperties::new(BlockType::DryGrass,    "dry_grass",   Color::rgb(0.62, 0.62, 0.30),          true,  false, false),
    BlockProperties::new(BlockType::JungleGrass, "jungle_grass",Color::rgb(0.20, 0.58, 0.12),          true,  false, false),
    BlockProperties::new(BlockType::SwampWater,  "swamp_water", Color::rgba(0.25, 0.35, 0.22, 0.7),    false, true,  false),
    BlockProperties::new(BlockType::Wood,        "wood",        Color::rgb(0.40, 0.27, 0.13),          true,  false, false),
    BlockProperties::new(BlockType::Leaves,      "leaves",      Color::rgba(0.18, 0.50, 0.16, 0.9),    true,  false, true),
    BlockProperties::new(BlockType::Cloud,       "cloud",       Color::rgba(0.97, 0.97, 1.0, 0.8),     false, false, false),
    BlockProperties::new(BlockType::Glass,       "glass",       Color::rgba(0.80, 0.90, 0.95, 0.3),    true,  false, false),
    BlockProperties::new(BlockType::TallGrass,   "tall_grass",  Color::rgba(0.30, 0.65, 0.20, 0.9),    false, false, true),
    BlockProperties::new(BlockType::Flower,      "flower",      Color::rgba(0.90, 0.30, 0.45, 0.95),   false, false, true),
    BlockProperties::new(BlockType::Mycelium,    "mycelium",    Color::rgb(0.45, 0.38, 0.45),          true,  false, false),
];

/// Static catalog mapping block identifiers to their properties.
///
/// Lookups never fail: any identifier outside the catalog resolves to the air
/// entry.
pub struct BlockRegistry;

impl BlockRegistry {
    /// Resolves an identifier to its properties, falling back to air.
    #[inline]
    pub fn resolve(id: BlockTypeSize) -> &'static BlockProperties {
        BLOCK_PROPERTIES
            .get(id as usize)
            .unwrap_or(&BLOCK_PROPERTIES[AIR as usize])
    }

    /// Properties of a block type.
    #[inline]
    pub fn properties(block_type: BlockType) -> &'static BlockProperties {
        &BLOCK_PROPERTIES[block_type as usize]
    }

    #[inline]
    pub fn is_solid(id: BlockTypeSize) -> bool {
        Self::resolve(id).solid
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_order_matches_discriminants() {
        for (index, properties) in BLOCK_PROPERTIES.iter().enumerate() {
            assert_eq!(properties.block_type as usize, index, "{}", properties.name);
        }
    }

    #[test]
    fn unknown_ids_resolve_to_air() {
        let air = BlockRegistry::resolve(AIR);
        assert_eq!(air.block_type, BlockType::Air);
        assert_eq!(BlockRegistry::resolve(200), air);
        assert!(!air.solid);
        assert!(air.invisible());
    }

    #[test]
    fn derived_flags() {
        let water = BlockRegistry::properties(BlockType::Water);
        assert!(water.water && water.transparent() && !water.solid);

        let stone = BlockRegistry::properties(BlockType::Stone);
        assert!(stone.solid && !stone.transparent() && stone.occludes());

        let leaves = BlockRegistry::properties(BlockType::Leaves);
        assert!(leaves.vegetation && leaves.solid && !leaves.occludes());

        let tall_grass = BlockRegistry::properties(BlockType::TallGrass);
        assert!(tall_grass.vegetation && !tall_grass.solid);
    }
}

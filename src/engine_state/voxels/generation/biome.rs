//! # Biomes
//!
//! Maps a biome parameter tuple `(temperature, humidity, relief)` to a named
//! biome and the block palette used to fill terrain columns.
//!
//! Special biomes are matched first by a priority table; everything else falls
//! through to a 5×5 lookup indexed by temperature and humidity.

use serde::{Deserialize, Serialize};

use crate::engine_state::voxels::block::block_type::BlockType;

/// Highest value any biome parameter can take.
pub const BIOME_PARAMETER_MAX: u8 = 4;

/// The biome parameter tuple, each component clamped to `[0, 4]`.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "RawBiomeParameters")]
pub struct BiomeParameters {
    pub temperature: u8,
    pub humidity: u8,
    pub relief: u8,
}

/// Unclamped parameters as they appear in configuration files.
#[derive(Deserialize)]
struct RawBiomeParameters {
    temperature: i64,
    humidity: i64,
    relief: i64,
}

impl From<RawBiomeParameters> for BiomeParameters {
    fn from(raw: RawBiomeParameters) -> Self {
        BiomeParameters::new(raw.temperature, raw.humidity, raw.relief)
    }
}

impl BiomeParameters {
    /// Creates a parameter tuple, clamping every component to `[0, 4]`.
    pub fn new(temperature: i64, humidity: i64, relief: i64) -> Self {
        let clamp = |value: i64| value.clamp(0, BIOME_PARAMETER_MAX as i64) as u8;
        BiomeParameters {
            temperature: clamp(temperature),
            humidity: clamp(humidity),
            relief: clamp(relief),
        }
    }

    /// Resolves the biome these parameters select.
    pub fn biome(&self) -> Biome {
        Biome::select(*self)
    }
}

/// The blocks used to fill one terrain column.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct BlockPalette {
    /// Top block of a column that sits above the water.
    pub surface: BlockType,
    /// The two blocks below the surface.
    pub subsurface: BlockType,
    /// Everything further down.
    pub deep: BlockType,
    /// Fill between the terrain and the water level.
    pub water: BlockType,
}

impl BlockPalette {
    const fn new(surface: BlockType, subsurface: BlockType, deep: BlockType, water: BlockType) -> Self {
        BlockPalette {
            surface,
            subsurface,
            deep,
            water,
        }
    }

    /// Palette used when no biome parameters are configured.
    pub const CLASSIC: BlockPalette =
        BlockPalette::new(BlockType::Grass, BlockType::Dirt, BlockType::Stone, BlockType::Water);
}

/// A named biome together with its palette.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Biome {
    pub name: &'static str,
    pub palette: BlockPalette,
}

/// The standard surface table, indexed `[temperature][humidity]`.
///
/// Rows run cold to hot, columns dry to wet.
#[rustfmt::skip]
const STANDARD_SURFACES: [[(&str, BlockType); 5]; 5] = [
    [("ice_plains", BlockType::PackedIce), ("snowy_plains", BlockType::Snow),     ("snowy_taiga", BlockType::Podzol),   ("frozen_bog", BlockType::Moss),     ("glacier", BlockType::Ice)],
    [("cold_steppe", BlockType::Gravel),   ("taiga", BlockType::Podzol),          ("boreal_forest", BlockType::Grass),  ("old_growth_taiga", BlockType::Moss), ("cold_marsh", BlockType::Mud)],
    [("prairie", BlockType::DryGrass),     ("plains", BlockType::Grass),          ("forest", BlockType::Grass),         ("mushroom_fields", BlockType::Mycelium), ("wetland", BlockType::Clay)],
    [("scrubland", BlockType::CoarseDirt), ("savanna", BlockType::DryGrass),      ("woodland", BlockType::Grass),       ("rainforest_edge", BlockType::JungleGrass), ("bayou", BlockType::Mud)],
    [("desert", BlockType::Sand),          ("badlands", BlockType::Terracotta),   ("dry_savanna", BlockType::DryGrass), ("tropical_forest", BlockType::JungleGrass), ("tropical_beach", BlockType::Sand)],
];

impl Biome {
    const fn new(name: &'static str, palette: BlockPalette) -> Self {
        Biome { name, palette }
    }

    /// The biome used when no parameters are configured.
    pub const CLASSIC: Biome = Biome::new("classic", BlockPalette::CLASSIC);

    /// Selects the biome for a parameter tuple.
    ///
    /// Rules are tried in priority order and the first match wins. Mangrove is
    /// checked ahead of jungle and swamp, whose conditions it refines.
    pub fn select(parameters: BiomeParameters) -> Biome {
        use BlockType::*;

        let BiomeParameters {
            temperature: t,
            humidity: h,
            relief: r,
        } = parameters;

        if t == 0 && h == 1 && r == 0 {
            return Biome::new("arctic", BlockPalette::new(Snow, Permafrost, Stone, Ice));
        }
        if t >= 3 && h >= 4 && r == 0 {
            return Biome::new("mangrove", BlockPalette::new(Mud, Mud, Clay, SwampWater));
        }
        if t >= 3 && h >= 4 {
            return Biome::new("jungle", BlockPalette::new(JungleGrass, Dirt, Stone, Water));
        }
        if (2..=3).contains(&t) && h >= 4 && r <= 1 {
            return Biome::new("swamp", BlockPalette::new(Mud, Clay, Stone, SwampWater));
        }
        if t >= 4 && h <= 1 {
            return if r <= 1 {
                Biome::new("hot_desert", BlockPalette::new(RedSand, Sandstone, Stone, Water))
            } else {
                Biome::new("ash_desert", BlockPalette::new(Ash, Basalt, Stone, Water))
            };
        }
        if t <= 1 && (1..=2).contains(&h) && r <= 1 {
            return Biome::new("tundra", BlockPalette::new(CoarseDirt, Permafrost, Stone, Ice));
        }
        if t >= 4 && r >= 3 {
            return Biome::new("volcanic", BlockPalette::new(Basalt, Obsidian, Basalt, Lava));
        }
        if t >= 3 && h >= 3 && r == 0 {
            return Biome::new("oasis", BlockPalette::new(Sand, Sandstone, Stone, Water));
        }

        let (name, surface) = STANDARD_SURFACES[t as usize][h as usize];
        let subsurface = match surface {
            Sand | RedSand | Terracotta => Sandstone,
            Snow | Ice | PackedIce => Permafrost,
            Mud => Clay,
            _ => Dirt,
        };
        let water = if t == 0 { Ice } else { Water };
        Biome::new(name, BlockPalette::new(surface, subsurface, Stone, water))
    }
}

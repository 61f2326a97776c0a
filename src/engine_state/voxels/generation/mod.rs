//! # World Generation
//!
//! Fills a [`World`] with terrain sampled from a [`NoiseField`], then stamps
//! procedural structures and vegetation on top.
//!
//! ## Pipeline
//!
//! 1. **Terrain**: every column gets a surface height from two blended noise
//!    octaves and is filled with the active biome's palette up to that height,
//!    with water up to the configured water level.
//! 2. **Trees**: one candidate per cell of a fixed anchor grid, kept or skipped
//!    by a hash of the cell.
//! 3. **Vegetation**: tall grass and flowers on dry fertile surfaces.
//! 4. **Sky structures**: floating islands and cloud blobs anchored relative
//!    to the world bounds.
//!
//! Everything is a pure function of the seed and the configuration, so the
//! same inputs always rebuild the same world.

use cgmath::{Point3, Vector3};
use log::{debug, info};
use web_time::{Duration, Instant};

use crate::config::WorldConfig;

use self::{
    biome::Biome,
    noise_field::NoiseField,
    structures::{hash_coords, CloudBlob, FloatingIsland, Structure, Tree, TreeSize},
};

use super::{
    block::{block_type::BlockType, AIR},
    world::World,
};

pub mod biome;
pub mod noise_field;
pub mod structures;

const FREQUENCY_SALT: u64 = 0x6672_6571;
const TREE_GRID_SALT: u64 = 0x6772_6964;
const VEGETATION_SALT: u64 = 0x7665_6765;
const SKY_SALT: u64 = 0x736b_79;

/// Edge length of a tree anchor cell in blocks.
const TREE_CELL: i32 = 10;
/// Percentage of fertile surface columns that sprout grass or flowers.
const VEGETATION_PERCENT: u64 = 8;
/// Offset between the macro and detail noise samples.
const DETAIL_OFFSET: f64 = 1013.0;
/// Terrain never sinks further than this below the water level.
const MAX_WATER_DEPTH: i32 = 5;

/// Counts and timing from one generation run.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct GenerationReport {
    pub seed: u64,
    pub columns: usize,
    pub trees: usize,
    pub vegetation: usize,
    pub islands: usize,
    pub clouds: usize,
    /// Non-air blocks in the finished world.
    pub blocks: usize,
    pub elapsed: Duration,
}

/// Seeded terrain generator for a single world.
#[derive(Clone, Debug)]
pub struct TerrainGenerator {
    seed: u64,
    noise: NoiseField,
    biome: Biome,
    macro_frequency: f64,
    detail_frequency: f64,
    water_level: i32,
    base_offset: i32,
    max_height: i32,
    world_height: i32,
    structures: bool,
    vegetation: bool,
}

impl TerrainGenerator {
    /// Creates a generator for a world `world_height` blocks tall.
    ///
    /// The two noise frequencies are drawn from the seed once and stay fixed for
    /// the lifetime of the world.
    pub fn new(config: &WorldConfig, seed: u64, world_height: i32) -> Self {
        let mut rng = fastrand::Rng::with_seed(seed ^ FREQUENCY_SALT);
        let macro_frequency = 0.004 + rng.f64() * 0.006;
        let detail_frequency = 0.03 + rng.f64() * 0.03;

        let max_height =
            ((world_height as f64 * config.max_height_fraction) as i32).max(config.base_offset);

        TerrainGenerator {
            seed,
            noise: NoiseField::new(seed),
            biome: config.biome.map(|b| b.biome()).unwrap_or(Biome::CLASSIC),
            macro_frequency,
            detail_frequency,
            water_level: config.water_level,
            base_offset: config.base_offset,
            max_height,
            world_height,
            structures: config.structures,
            vegetation: config.vegetation,
        }
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn biome(&self) -> Biome {
        self.biome
    }

    pub fn water_level(&self) -> i32 {
        self.water_level
    }

    /// Height of the top terrain block of column `(x, z)`.
    pub fn surface_height(&self, x: i32, z: i32) -> i32 {
        let mountains = self.noise.noise2d(
            x as f64 * self.macro_frequency,
            z as f64 * self.macro_frequency,
        );
        let detail = self.noise.noise2d(
            x as f64 * self.detail_frequency + DETAIL_OFFSET,
            z as f64 * self.detail_frequency + DETAIL_OFFSET,
        );
        let blend = 0.7 * mountains + 0.3 * detail;
        let curved = blend.powf(1.2);

        let span = (self.max_height - self.base_offset) as f64;
        let height = self.base_offset + (curved * span).round() as i32;
        height
            .max(self.water_level - MAX_WATER_DEPTH)
            .clamp(0, (self.world_height - 1).max(0))
    }

    /// Block at height `y` of a column whose top terrain block is at `surface`.
    pub fn column_block(&self, surface: i32, y: i32) -> BlockType {
        let palette = self.biome.palette;
        if y < surface - 2 {
            palette.deep
        } else if y < surface {
            palette.subsurface
        } else if y == surface {
            if surface >= self.water_level {
                palette.surface
            } else {
                BlockType::Sand
            }
        } else if y < self.water_level {
            palette.water
        } else {
            BlockType::Air
        }
    }

    /// Fills `world` with terrain and structures.
    pub fn generate(&self, world: &mut World) -> GenerationReport {
        let started = Instant::now();
        let mut report = GenerationReport {
            seed: self.seed,
            ..Default::default()
        };

        let (min, max) = world.block_bounds();
        let top = max.y.min(self.world_height);
        for z in min.z..max.z {
            for x in min.x..max.x {
                let surface = self.surface_height(x, z);
                for y in min.y..top {
                    let block = self.column_block(surface, y);
                    if block != BlockType::Air {
                        world.set_block_at(Point3::new(x, y, z), block.id());
                    }
                }
                report.columns += 1;
            }
        }

        if self.structures {
            report.trees = self.plant_trees(world);
        }
        if self.vegetation {
            report.vegetation = self.scatter_vegetation(world);
        }
        if self.structures {
            let (islands, clouds) = self.place_sky_structures(world);
            report.islands = islands;
            report.clouds = clouds;
        }

        world.mark_all_dirty();
        report.blocks = world.block_count();
        report.elapsed = started.elapsed();
        info!(
            "Generated {} columns ({} blocks) for seed {} in {:?} ({} trees, {} plants, {} islands, {} clouds)",
            report.columns,
            report.blocks,
            self.seed,
            report.elapsed,
            report.trees,
            report.vegetation,
            report.islands,
            report.clouds
        );
        report
    }

    fn is_dry_fertile(&self, world: &World, x: i32, z: i32) -> Option<i32> {
        let surface = self.surface_height(x, z);
        if surface < self.water_level {
            return None;
        }
        let ground = BlockType::from_id(world.get_block_at(Point3::new(x, surface, z)));
        ground.is_fertile().then_some(surface)
    }

    fn plant_trees(&self, world: &mut World) -> usize {
        let (min, max) = world.block_bounds();
        let mut planted = 0;

        let first = min.x.div_euclid(TREE_CELL);
        let last = (max.x - 1).div_euclid(TREE_CELL);
        let first_z = min.z.div_euclid(TREE_CELL);
        let last_z = (max.z - 1).div_euclid(TREE_CELL);

        for cz in first_z..=last_z {
            for cx in first..=last {
                let hash = hash_coords(self.seed ^ TREE_GRID_SALT, cx, 0, cz);
                if hash % 3 != 0 {
                    continue;
                }
                let x = cx * TREE_CELL + 2 + ((hash >> 8) % (TREE_CELL as u64 - 4)) as i32;
                let z = cz * TREE_CELL + 2 + ((hash >> 16) % (TREE_CELL as u64 - 4)) as i32;
                if x < min.x || x >= max.x || z < min.z || z >= max.z {
                    continue;
                }
                let Some(surface) = self.is_dry_fertile(world, x, z) else {
                    continue;
                };
                let size = TreeSize::from_hash(hash >> 24);
                if surface + size.trunk_height() + 4 >= max.y {
                    continue;
                }
                let tree = Tree {
                    base: Point3::new(x, surface + 1, z),
                    size,
                };
                if tree.place(world, self.seed) > 0 {
                    planted += 1;
                }
            }
        }
        debug!("Planted {planted} trees");
        planted
    }

    fn scatter_vegetation(&self, world: &mut World) -> usize {
        let (min, max) = world.block_bounds();
        let mut placed = 0;
        for z in min.z..max.z {
            for x in min.x..max.x {
                let hash = hash_coords(self.seed ^ VEGETATION_SALT, x, 0, z);
                if hash % 100 >= VEGETATION_PERCENT {
                    continue;
                }
                let Some(surface) = self.is_dry_fertile(world, x, z) else {
                    continue;
                };
                let above = Point3::new(x, surface + 1, z);
                if world.get_block_at(above) != AIR {
                    continue;
                }
                let plant = if (hash >> 32) % 5 == 0 {
                    BlockType::Flower
                } else {
                    BlockType::TallGrass
                };
                placed += world.set_block_at(above, plant.id()) as usize;
            }
        }
        placed
    }

    /// Places floating islands above the terrain and clouds above those.
    ///
    /// Skipped entirely when the world is too short to keep them clear of the
    /// highest terrain.
    fn place_sky_structures(&self, world: &mut World) -> (usize, usize) {
        let (min, max) = world.block_bounds();
        let mut islands = 0;
        let mut clouds = 0;

        let island_y = (self.max_height + max.y) / 2;
        let span_x = max.x - min.x;
        let span_z = max.z - min.z;

        if island_y - 6 > self.max_height + 2 && island_y + 8 < max.y {
            for (k, (fx, fz)) in [(-1, -1), (1, 1), (1, -1)].into_iter().enumerate() {
                let hash = hash_coords(self.seed ^ SKY_SALT, k as i32, island_y, 0);
                if k > 0 && hash % 2 == 0 {
                    continue;
                }
                let center = Point3::new(
                    fx * span_x / 4 + (hash % 5) as i32 - 2,
                    island_y,
                    fz * span_z / 4 + ((hash >> 8) % 5) as i32 - 2,
                );
                let island = FloatingIsland {
                    center,
                    radius: 4 + ((hash >> 16) % 4) as i32,
                    depth: 4 + ((hash >> 24) % 3) as i32,
                };
                if island.place(world, self.seed) > 0 {
                    islands += 1;
                    Tree {
                        base: center + Vector3::new(0, 1, 0),
                        size: TreeSize::Tiny,
                    }
                    .place(world, self.seed);
                }
            }
        }

        let cloud_y = max.y - 4;
        if cloud_y - 2 > island_y + 8 {
            let step = 32;
            let mut x = min.x + step / 2;
            while x < max.x {
                let mut z = min.z + step / 2;
                while z < max.z {
                    let hash = hash_coords(self.seed ^ SKY_SALT, x, cloud_y, z);
                    if hash % 2 == 0 {
                        let cloud = CloudBlob {
                            center: Point3::new(x, cloud_y, z),
                            radii: Vector3::new(
                                4 + ((hash >> 8) % 4) as i32,
                                1 + ((hash >> 16) % 2) as i32,
                                3 + ((hash >> 24) % 3) as i32,
                            ),
                        };
                        if cloud.place(world, self.seed) > 0 {
                            clouds += 1;
                        }
                    }
                    z += step;
                }
                x += step;
            }
        }

        (islands, clouds)
    }
}

/// Resolves the seed for `config`, creates an empty world and generates it.
///
/// An unseeded configuration draws a random seed, which is logged so the world
/// can be reproduced.
pub fn generate_world(config: &WorldConfig) -> (World, GenerationReport) {
    let seed = config.seed.unwrap_or_else(|| {
        let seed = fastrand::u64(..);
        info!("No seed configured, using random seed {seed}");
        seed
    });

    let mut world = World::new(config.world_chunks, config.chunk_size);
    let generator = TerrainGenerator::new(config, seed, world.height());
    let report = generator.generate(&mut world);
    (world, report)
}

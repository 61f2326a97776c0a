//! # Procedural Structures
//!
//! Deterministic shape generators anchored at fixed world coordinates:
//! floating islands, trees and cloud blobs.
//!
//! Every generator derives its randomness from the world seed and its anchor,
//! never from shared state, so placing the same structure twice leaves the
//! world exactly as placing it once.

use std::f64::consts::TAU;

use cgmath::{Point3, Vector3};

use crate::engine_state::voxels::{
    block::{block_type::BlockType, AIR},
    world::World,
};

const ISLAND_SALT: u64 = 0x6973_6c61_6e64;
const TREE_SALT: u64 = 0x7472_6565;
const CLOUD_SALT: u64 = 0x636c_6f75_64;

/// Percentage of cloud cells left empty to break up the ellipsoid.
const CLOUD_HOLE_PERCENT: u64 = 15;

/// Mixes a seed and a block position into a well-distributed 64 bit value.
pub fn hash_coords(seed: u64, x: i32, y: i32, z: i32) -> u64 {
    let mut h = seed ^ 0x9e37_79b9_7f4a_7c15;
    for value in [x, y, z] {
        h ^= (value as u32 as u64).wrapping_mul(0xbf58_476d_1ce4_e5b9);
        h = h.rotate_left(27).wrapping_mul(0x94d0_49bb_1331_11eb);
    }
    h ^= h >> 31;
    h = h.wrapping_mul(0xbf58_476d_1ce4_e5b9);
    h ^ (h >> 29)
}

/// A shape that can be stamped into the world.
pub trait Structure {
    /// Writes the structure into `world` and returns the number of blocks placed.
    ///
    /// Writes outside the world are dropped by the world itself.
    fn place(&self, world: &mut World, seed: u64) -> usize;
}

fn put(world: &mut World, pos: Point3<i32>, block: BlockType) -> usize {
    world.set_block_at(pos, block.id()) as usize
}

fn put_if_air(world: &mut World, pos: Point3<i32>, block: BlockType) -> usize {
    if world.get_block_at(pos) == AIR {
        put(world, pos, block)
    } else {
        0
    }
}

/// A floating island whose top surface sits at `center.y`.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct FloatingIsland {
    pub center: Point3<i32>,
    /// Nominal radius of the top surface in blocks.
    pub radius: i32,
    /// Thickness of the island at its centre.
    pub depth: i32,
}

impl FloatingIsland {
    /// Column thickness at horizontal offset `(dx, dz)`, or `None` outside the island.
    ///
    /// Thickness follows the radial falloff `1 - sqrt(d²)` of the normalised
    /// distance `d`; the edge radius is jittered per column by up to one block.
    pub fn column_depth(&self, seed: u64, dx: i32, dz: i32) -> Option<i32> {
        let x = self.center.x + dx;
        let z = self.center.z + dz;
        let jitter = (hash_coords(seed ^ ISLAND_SALT, x, self.center.y, z) % 3) as f64 - 1.0;
        let edge = (self.radius as f64 + jitter).max(1.0);
        let normalized = ((dx * dx + dz * dz) as f64).sqrt() / edge;
        let falloff = 1.0 - (normalized * normalized).sqrt();
        if falloff <= 0.0 {
            return None;
        }
        Some(((falloff * self.depth as f64).ceil() as i32).max(1))
    }
}

impl Structure for FloatingIsland {
    fn place(&self, world: &mut World, seed: u64) -> usize {
        let reach = self.radius + 1;
        let mut placed = 0;
        for dz in -reach..=reach {
            for dx in -reach..=reach {
                let Some(depth) = self.column_depth(seed, dx, dz) else {
                    continue;
                };
                let x = self.center.x + dx;
                let z = self.center.z + dz;
                for d in 0..depth {
                    let block = match d {
                        0 => BlockType::Grass,
                        1 | 2 => BlockType::Dirt,
                        _ => BlockType::Stone,
                    };
                    placed += put(world, Point3::new(x, self.center.y - d, z), block);
                }
            }
        }
        placed
    }
}

/// Tree variants, from a bush-like sapling to a branched canopy.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum TreeSize {
    /// Short trunk with a diamond-shaped crown.
    Tiny,
    /// Medium trunk with an ellipsoidal canopy.
    Small,
    /// Tall trunk, large canopy and angled branches.
    Large,
}

impl TreeSize {
    pub fn trunk_height(self) -> i32 {
        match self {
            TreeSize::Tiny => 3,
            TreeSize::Small => 5,
            TreeSize::Large => 8,
        }
    }

    /// Picks a size from a hash value: mostly small trees.
    pub fn from_hash(hash: u64) -> Self {
        match hash % 10 {
            0..=2 => TreeSize::Tiny,
            3..=7 => TreeSize::Small,
            _ => TreeSize::Large,
        }
    }
}

/// A tree rooted at `base`, the first trunk block.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Tree {
    pub base: Point3<i32>,
    pub size: TreeSize,
}

fn leaf_ellipsoid(world: &mut World, center: Point3<i32>, radii: Vector3<f64>) -> usize {
    let mut placed = 0;
    let reach = Vector3::new(
        radii.x.ceil() as i32,
        radii.y.ceil() as i32,
        radii.z.ceil() as i32,
    );
    for dy in -reach.y..=reach.y {
        for dz in -reach.z..=reach.z {
            for dx in -reach.x..=reach.x {
                let e = (dx as f64 / radii.x).powi(2)
                    + (dy as f64 / radii.y).powi(2)
                    + (dz as f64 / radii.z).powi(2);
                if e <= 1.0 {
                    placed += put_if_air(
                        world,
                        center + Vector3::new(dx, dy, dz),
                        BlockType::Leaves,
                    );
                }
            }
        }
    }
    placed
}

impl Structure for Tree {
    fn place(&self, world: &mut World, seed: u64) -> usize {
        let mut rng = fastrand::Rng::with_seed(hash_coords(
            seed ^ TREE_SALT,
            self.base.x,
            self.base.y,
            self.base.z,
        ));
        let height = self.size.trunk_height();
        let top = self.base + Vector3::new(0, height, 0);
        let mut placed = 0;

        for dy in 0..height {
            placed += put(world, self.base + Vector3::new(0, dy, 0), BlockType::Wood);
        }

        match self.size {
            TreeSize::Tiny => {
                for dy in -2..=2i32 {
                    for dz in -2..=2i32 {
                        for dx in -2..=2i32 {
                            if dx.abs() + dy.abs() + dz.abs() <= 2 {
                                placed += put_if_air(
                                    world,
                                    top + Vector3::new(dx, dy, dz),
                                    BlockType::Leaves,
                                );
                            }
                        }
                    }
                }
            }
            TreeSize::Small => {
                placed += leaf_ellipsoid(world, top, Vector3::new(2.5, 2.0, 2.5));
            }
            TreeSize::Large => {
                let branch_start = self.base.y + height * 2 / 3;
                let branches = 3 + rng.usize(..3);
                for k in 0..branches {
                    let angle = TAU * k as f64 / branches as f64 + rng.f64() * 0.6;
                    let length = rng.i32(3..=4);
                    let mut tip = Point3::new(self.base.x, branch_start, self.base.z);
                    for i in 1..=length {
                        tip = Point3::new(
                            self.base.x + (angle.cos() * i as f64).round() as i32,
                            branch_start + i / 2,
                            self.base.z + (angle.sin() * i as f64).round() as i32,
                        );
                        placed += put(world, tip, BlockType::Wood);
                    }
                    placed += leaf_ellipsoid(
                        world,
                        tip + Vector3::new(0, 1, 0),
                        Vector3::new(1.5, 1.2, 1.5),
                    );
                }
                placed += leaf_ellipsoid(
                    world,
                    top + Vector3::new(0, 1, 0),
                    Vector3::new(3.5, 2.5, 3.5),
                );
            }
        }
        placed
    }
}

/// An irregular ellipsoid of cloud blocks.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct CloudBlob {
    pub center: Point3<i32>,
    pub radii: Vector3<i32>,
}

impl CloudBlob {
    /// Whether the cell at offset `(dx, dy, dz)` from the centre is cloud.
    pub fn contains(&self, seed: u64, dx: i32, dy: i32, dz: i32) -> bool {
        let e = (dx as f64 / self.radii.x.max(1) as f64).powi(2)
            + (dy as f64 / self.radii.y.max(1) as f64).powi(2)
            + (dz as f64 / self.radii.z.max(1) as f64).powi(2);
        if e > 1.0 {
            return false;
        }
        let p = self.center + Vector3::new(dx, dy, dz);
        hash_coords(seed ^ CLOUD_SALT, p.x, p.y, p.z) % 100 >= CLOUD_HOLE_PERCENT
    }
}

impl Structure for CloudBlob {
    fn place(&self, world: &mut World, seed: u64) -> usize {
        let mut placed = 0;
        for dy in -self.radii.y..=self.radii.y {
            for dz in -self.radii.z..=self.radii.z {
                for dx in -self.radii.x..=self.radii.x {
                    if self.contains(seed, dx, dy, dz) {
                        placed += put_if_air(
                            world,
                            self.center + Vector3::new(dx, dy, dz),
                            BlockType::Cloud,
                        );
                    }
                }
            }
        }
        placed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn world() -> World {
        World::new([2, 2, 2], 16)
    }

    #[test]
    fn hash_is_stable_and_position_sensitive() {
        assert_eq!(hash_coords(5, 1, 2, 3), hash_coords(5, 1, 2, 3));
        assert_ne!(hash_coords(5, 1, 2, 3), hash_coords(5, 3, 2, 1));
        assert_ne!(hash_coords(5, 1, 2, 3), hash_coords(6, 1, 2, 3));
    }

    #[test]
    fn structures_are_idempotent() {
        let seed = 77;
        let structures: Vec<Box<dyn Structure>> = vec![
            Box::new(FloatingIsland {
                center: Point3::new(0, 20, 0),
                radius: 6,
                depth: 5,
            }),
            Box::new(Tree {
                base: Point3::new(-6, 2, 4),
                size: TreeSize::Large,
            }),
            Box::new(Tree {
                base: Point3::new(6, 2, -6),
                size: TreeSize::Tiny,
            }),
            Box::new(CloudBlob {
                center: Point3::new(2, 27, 2),
                radii: Vector3::new(5, 2, 3),
            }),
        ];

        let mut once = world();
        for structure in &structures {
            assert!(structure.place(&mut once, seed) > 0);
        }
        let mut twice = once.clone();
        for structure in &structures {
            structure.place(&mut twice, seed);
        }

        let (min, max) = once.block_bounds();
        for y in min.y..max.y {
            for z in min.z..max.z {
                for x in min.x..max.x {
                    let p = Point3::new(x, y, z);
                    assert_eq!(once.get_block_at(p), twice.get_block_at(p), "{:?}", p);
                }
            }
        }
    }

    #[test]
    fn island_is_thickest_in_the_middle() {
        let island = FloatingIsland {
            center: Point3::new(0, 20, 0),
            radius: 6,
            depth: 5,
        };
        assert_eq!(island.column_depth(1, 0, 0), Some(5));
        assert!(island.column_depth(1, 8, 0).is_none());
        let edge = island.column_depth(1, 4, 0).unwrap_or(0);
        assert!(edge < 5);
    }

    #[test]
    fn tree_has_trunk_and_crown() {
        let mut world = world();
        let base = Point3::new(0, 2, 0);
        Tree {
            base,
            size: TreeSize::Small,
        }
        .place(&mut world, 3);

        for dy in 0..TreeSize::Small.trunk_height() {
            assert_eq!(
                world.get_block_at(base + Vector3::new(0, dy, 0)),
                BlockType::Wood.id()
            );
        }
        let crown = base + Vector3::new(0, TreeSize::Small.trunk_height(), 0);
        assert_eq!(world.get_block_at(crown), BlockType::Leaves.id());
        assert_eq!(
            world.get_block_at(crown + Vector3::new(2, 0, 0)),
            BlockType::Leaves.id()
        );
    }

    #[test]
    fn large_trees_grow_branches_away_from_the_trunk() {
        for seed in 0..20 {
            let mut world = world();
            let base = Point3::new(0, 2, 0);
            Tree {
                base,
                size: TreeSize::Large,
            }
            .place(&mut world, seed);

            let (min, max) = world.block_bounds();
            let mut branch_wood = 0;
            for y in min.y..max.y {
                for z in min.z..max.z {
                    for x in min.x..max.x {
                        let (dx, dz) = (x - base.x, z - base.z);
                        if dx * dx + dz * dz >= 4
                            && world.get_block_at(Point3::new(x, y, z)) == BlockType::Wood.id()
                        {
                            branch_wood += 1;
                        }
                    }
                }
            }
            assert!(branch_wood > 0, "seed {seed}");
        }
    }

    #[test]
    fn tiny_tree_crown_is_a_diamond() {
        let mut world = world();
        let base = Point3::new(3, 2, -3);
        let height = TreeSize::Tiny.trunk_height();
        Tree {
            base,
            size: TreeSize::Tiny,
        }
        .place(&mut world, 9);

        let top = base + Vector3::new(0, height, 0);
        for dy in -3..=3i32 {
            for dz in -3..=3i32 {
                for dx in -3..=3i32 {
                    let p = top + Vector3::new(dx, dy, dz);
                    let trunk = dx == 0 && dz == 0 && p.y >= base.y && p.y < top.y;
                    let expected = if trunk {
                        BlockType::Wood
                    } else if dx.abs() + dy.abs() + dz.abs() <= 2 {
                        BlockType::Leaves
                    } else {
                        BlockType::Air
                    };
                    assert_eq!(world.get_block_at(p), expected.id(), "{:?}", p);
                }
            }
        }
    }

    #[test]
    fn clouds_have_holes_but_stay_inside_the_ellipsoid() {
        let cloud = CloudBlob {
            center: Point3::new(0, 0, 0),
            radii: Vector3::new(6, 3, 6),
        };
        let mut inside = 0;
        let mut holes = 0;
        for dy in -4..=4 {
            for dz in -7..=7 {
                for dx in -7..=7 {
                    let in_shape = (dx as f64 / 6.0).powi(2)
                        + (dy as f64 / 3.0).powi(2)
                        + (dz as f64 / 6.0).powi(2)
                        <= 1.0;
                    let member = cloud.contains(11, dx, dy, dz);
                    assert!(!member || in_shape);
                    if in_shape {
                        inside += 1;
                        holes += (!member) as i32;
                    }
                }
            }
        }
        assert!(holes > 0 && holes < inside / 2);
    }
}

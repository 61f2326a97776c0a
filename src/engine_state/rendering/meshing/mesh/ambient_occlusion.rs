//! Per-corner ambient occlusion for block faces.
//!
//! Each face corner gets a light level in `0..=3` from the three blocks that
//! touch that corner in the layer in front of the face: the two edge
//! neighbours and the diagonal one. The four levels are packed two bits each
//! into an [`AoKey`], which the greedy mesher also uses as a merge constraint:
//! two cells only merge when their keys are equal.

use cgmath::{Point3, Vector3};

use crate::engine_state::voxels::{
    block::{block_side::BlockSide, BlockRegistry},
    world::World,
};

/// Four 2-bit corner light levels, corner 0 in the lowest bits.
pub type AoKey = u8;

/// Key of a face with no occluders around it.
pub const FULL_LIGHT: AoKey = 0xFF;

/// Brightness multiplier for each light level.
pub const AO_FACTORS: [f32; 4] = [0.4, 0.6, 0.8, 1.0];

/// Corner offsets along the face's `(u, v)` sweep axes, in emission order.
pub const CORNER_SIGNS: [(i32, i32); 4] = [(-1, -1), (1, -1), (1, 1), (-1, 1)];

/// Light level of a corner from the occupancy of its neighbours.
///
/// Two occluding edge neighbours fully darken the corner whatever the diagonal
/// holds.
#[inline]
pub fn corner_level(side1: bool, side2: bool, diagonal: bool) -> u8 {
    if side1 && side2 {
        0
    } else {
        3 - (side1 as u8 + side2 as u8 + diagonal as u8)
    }
}

/// Extracts the light level of `corner` from a key.
#[inline]
pub fn level(key: AoKey, corner: usize) -> u8 {
    (key >> (corner * 2)) & 0b11
}

pub fn pack(levels: [u8; 4]) -> AoKey {
    levels
        .iter()
        .enumerate()
        .fold(0, |key, (corner, &l)| key | ((l & 0b11) << (corner * 2)))
}

/// Computes the key for the `side` face of the block at `block`.
pub fn face_key(world: &World, block: Point3<i32>, side: BlockSide) -> AoKey {
    let (u_axis, v_axis) = side.sweep_axes();
    let front = block + side.normal();
    let occludes = |p: Point3<i32>| BlockRegistry::resolve(world.get_block_at(p)).occludes();

    let mut levels = [0u8; 4];
    for (corner, &(su, sv)) in CORNER_SIGNS.iter().enumerate() {
        let mut du = Vector3::new(0, 0, 0);
        du[u_axis] = su;
        let mut dv = Vector3::new(0, 0, 0);
        dv[v_axis] = sv;
        levels[corner] = corner_level(
            occludes(front + du),
            occludes(front + dv),
            occludes(front + du + dv),
        );
    }
    pack(levels)
}

/// Whether a quad with this key should be split along the 1-3 diagonal.
///
/// Splitting along the brighter diagonal keeps the interpolated shading
/// symmetric across the two triangles.
#[inline]
pub fn flip_diagonal(key: AoKey) -> bool {
    level(key, 0) + level(key, 2) < level(key, 1) + level(key, 3)
}

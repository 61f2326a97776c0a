//! Greedy meshing implementation for voxel rendering.
//!
//! For each of the six face directions the chunk is swept slice by slice along
//! the direction's axis. Every slice fills a 2D mask with the visible faces of
//! that layer, then merges equal mask cells into maximal rectangles, row-major:
//! first growing along `u`, then along `v` while the whole row still matches.
//!
//! Neighbours are read through the [`World`], so faces on chunk borders are
//! culled against the adjacent chunk's blocks.

use cgmath::Point3;

use crate::engine_state::voxels::{
    block::{block_side::BlockSide, BlockProperties, BlockRegistry, BlockTypeSize, AIR},
    world::World,
};

use super::{
    ambient_occlusion::{self, AoKey},
    face::Face,
};

/// Which class of blocks a meshing pass emits faces for.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum MeshPass {
    Opaque,
    Transparent,
}

impl MeshPass {
    fn accepts(self, properties: &BlockProperties) -> bool {
        if properties.invisible() {
            return false;
        }
        match self {
            MeshPass::Opaque => !properties.transparent(),
            MeshPass::Transparent => properties.transparent(),
        }
    }
}

/// One cell of the slice mask. A `block` of air means no face.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct MaskCell {
    pub block: BlockTypeSize,
    pub ao: AoKey,
}

/// Reusable mask storage for one meshing call at a time.
///
/// The buffer is overwritten for every slice, so two chunk builds running at
/// the same time each need their own scratch.
#[derive(Clone, Debug)]
pub struct MeshScratch {
    dimension: usize,
    mask: Vec<MaskCell>,
}

impl MeshScratch {
    pub fn new(dimension: usize) -> Self {
        MeshScratch {
            dimension,
            mask: vec![MaskCell::default(); dimension * dimension],
        }
    }

    pub fn dimension(&self) -> usize {
        self.dimension
    }
}

/// Whether the face between `current` and the `neighbour` in front of it shows.
pub fn face_visible(current: &BlockProperties, neighbour: &BlockProperties) -> bool {
    neighbour.invisible()
        || (neighbour.water && !current.water)
        || (neighbour.transparent() && !current.transparent())
        || (current.transparent() && neighbour.block_type != current.block_type)
}

/// Generates the merged faces of one pass over the chunk at `chunk`.
///
/// Returns no faces for a chunk outside the world. The output only depends on
/// the world's blocks, so unchanged input always yields the same faces.
///
/// # Panics
/// Panics if `scratch` was sized for a different chunk dimension.
pub fn greedy_mesh(
    world: &World,
    chunk: Point3<i32>,
    pass: MeshPass,
    lighting: bool,
    scratch: &mut MeshScratch,
) -> Vec<Face> {
    let size = world.chunk_dimension();
    assert_eq!(
        scratch.dimension, size,
        "mesh scratch sized for a different chunk dimension"
    );

    let mut faces = Vec::new();
    if world.get_chunk_at(chunk).is_none() {
        return faces;
    }
    let origin = world.chunk_origin(chunk);

    for side in BlockSide::all() {
        let axis = side.axis();
        let (u_axis, v_axis) = side.sweep_axes();
        let normal = side.normal();

        for slice in 0..size {
            let mut any = false;
            for v in 0..size {
                for u in 0..size {
                    let mut position = origin;
                    position[axis] += slice as i32;
                    position[u_axis] += u as i32;
                    position[v_axis] += v as i32;

                    let block = world.get_block_at(position);
                    let current = BlockRegistry::resolve(block);
                    let cell = if pass.accepts(current)
                        && face_visible(
                            current,
                            BlockRegistry::resolve(world.get_block_at(position + normal)),
                        ) {
                        any = true;
                        MaskCell {
                            block,
                            ao: if lighting {
                                ambient_occlusion::face_key(world, position, side)
                            } else {
                                0
                            },
                        }
                    } else {
                        MaskCell::default()
                    };
                    scratch.mask[u + size * v] = cell;
                }
            }

            if any {
                merge_slice(&mut scratch.mask, size, |u, v, width, height, cell| {
                    let mut position = origin;
                    position[axis] += slice as i32;
                    position[u_axis] += u as i32;
                    position[v_axis] += v as i32;
                    faces.push(Face {
                        origin: position,
                        side,
                        width: width as u32,
                        height: height as u32,
                        block: cell.block,
                        ao: cell.ao,
                    });
                });
            }
        }
    }

    faces
}

/// Greedily merges equal non-empty cells of a `size × size` mask.
///
/// Calls `emit(u, v, width, height, cell)` once per rectangle and leaves the
/// mask cleared.
fn merge_slice(
    mask: &mut [MaskCell],
    size: usize,
    mut emit: impl FnMut(usize, usize, usize, usize, MaskCell),
) {
    for v in 0..size {
        let mut u = 0;
        while u < size {
            let cell = mask[u + size * v];
            if cell.block == AIR {
                u += 1;
                continue;
            }

            let mut width = 1;
            while u + width < size && mask[u + width + size * v] == cell {
                width += 1;
            }

            let mut height = 1;
            'grow: while v + height < size {
                for k in 0..width {
                    if mask[u + k + size * (v + height)] != cell {
                        break 'grow;
                    }
                }
                height += 1;
            }

            for dv in 0..height {
                for du in 0..width {
                    mask[u + du + size * (v + dv)] = MaskCell::default();
                }
            }

            emit(u, v, width, height, cell);
            u += width;
        }
    }
}

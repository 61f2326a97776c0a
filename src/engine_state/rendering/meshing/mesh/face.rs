use cgmath::{Point3, Vector3};

use crate::engine_state::voxels::block::{block_side::BlockSide, BlockTypeSize};

use super::ambient_occlusion::AoKey;

/// A merged, axis-aligned quad on one side of a run of blocks.
///
/// `origin` is the world position of the block in the quad's minimum `(u, v)`
/// cell; the quad spans `width` blocks along the side's `u` sweep axis and
/// `height` blocks along `v`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Face {
    pub origin: Point3<i32>,
    pub side: BlockSide,
    pub width: u32,
    pub height: u32,
    pub block: BlockTypeSize,
    /// Corner light levels shared by every cell of the quad.
    pub ao: AoKey,
}

fn unit(axis: usize, length: i32) -> Vector3<i32> {
    let mut v = Vector3::new(0, 0, 0);
    v[axis] = length;
    v
}

impl Face {
    /// The four world-space corners in `(u, v)` order `(0,0) (1,0) (1,1) (0,1)`.
    ///
    /// Faces on the positive side of an axis sit on the far plane of the block.
    pub fn corners(&self) -> [Point3<i32>; 4] {
        let (u_axis, v_axis) = self.side.sweep_axes();
        let mut base = self.origin;
        if self.side.is_positive() {
            base[self.side.axis()] += 1;
        }
        let du = unit(u_axis, self.width as i32);
        let dv = unit(v_axis, self.height as i32);
        [base, base + du, base + du + dv, base + dv]
    }

    /// Positions of every block whose face this quad covers.
    pub fn cells(&self) -> impl Iterator<Item = Point3<i32>> + '_ {
        let (u_axis, v_axis) = self.side.sweep_axes();
        (0..self.height as i32).flat_map(move |j| {
            (0..self.width as i32).map(move |i| self.origin + unit(u_axis, i) + unit(v_axis, j))
        })
    }

    /// Number of unit block faces the quad covers.
    pub fn area(&self) -> u32 {
        self.width * self.height
    }
}

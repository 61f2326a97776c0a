//! # Block Side Module
//!
//! This module defines the six faces of a voxel block and the per-face data the
//! mesher and collision code need: outward normals, the fixed axis, and the two
//! sweep axes whose cross product points along the normal.

use cgmath::Vector3;

/// Represents the six possible faces of a voxel block.
///
/// The order is: [Front, Back, Bottom, Top, Left, Right]
#[derive(PartialEq, Eq, Hash, Copy, Clone, Debug)]
pub enum BlockSide {
    /// The front face (facing positive Z)
    Front = 0,

    /// The back face (facing negative Z)
    Back = 1,

    /// The bottom face (facing negative Y)
    Bottom = 2,

    /// The top face (facing positive Y)
    Top = 3,

    /// The left face (facing negative X)
    Left = 4,

    /// The right face (facing positive X)
    Right = 5,
}

/// Axis index for X.
pub const AXIS_X: usize = 0;
/// Axis index for Y.
pub const AXIS_Y: usize = 1;
/// Axis index for Z.
pub const AXIS_Z: usize = 2;

impl BlockSide {
    /// Returns an array containing all six block faces in a consistent order.
    pub fn all() -> [BlockSide; 6] {
        [
            BlockSide::Front,
            BlockSide::Back,
            BlockSide::Bottom,
            BlockSide::Top,
            BlockSide::Left,
            BlockSide::Right,
        ]
    }

    /// The axis perpendicular to this face.
    pub fn axis(self) -> usize {
        match self {
            BlockSide::Left | BlockSide::Right => AXIS_X,
            BlockSide::Bottom | BlockSide::Top => AXIS_Y,
            BlockSide::Back | BlockSide::Front => AXIS_Z,
        }
    }

    /// Whether the outward normal points along the positive axis.
    pub fn is_positive(self) -> bool {
        matches!(self, BlockSide::Front | BlockSide::Top | BlockSide::Right)
    }

    /// Unit outward normal as integer offsets.
    pub fn normal(self) -> Vector3<i32> {
        let sign = if self.is_positive() { 1 } else { -1 };
        let mut normal = Vector3::new(0, 0, 0);
        normal[self.axis()] = sign;
        normal
    }

    /// The `(u, v)` sweep axes for this face.
    ///
    /// `u × v` equals the outward normal, so corners emitted in the order
    /// `(0,0) (1,0) (1,1) (0,1)` in `(u, v)` wind counter-clockwise when seen
    /// from outside the block.
    pub fn sweep_axes(self) -> (usize, usize) {
        match self {
            BlockSide::Right => (AXIS_Y, AXIS_Z),
            BlockSide::Left => (AXIS_Z, AXIS_Y),
            BlockSide::Top => (AXIS_Z, AXIS_X),
            BlockSide::Bottom => (AXIS_X, AXIS_Z),
            BlockSide::Front => (AXIS_X, AXIS_Y),
            BlockSide::Back => (AXIS_Y, AXIS_X),
        }
    }

    /// Fixed directional shading applied when lighting is enabled.
    pub fn light_factor(self) -> f32 {
        match self {
            BlockSide::Top => 1.0,
            BlockSide::Bottom => 0.5,
            BlockSide::Left | BlockSide::Right => 0.8,
            BlockSide::Front | BlockSide::Back => 0.65,
        }
    }

    /// The face on the opposite side of a block.
    pub fn opposite(self) -> BlockSide {
        match self {
            BlockSide::Front => BlockSide::Back,
            BlockSide::Back => BlockSide::Front,
            BlockSide::Bottom => BlockSide::Top,
            BlockSide::Top => BlockSide::Bottom,
            BlockSide::Left => BlockSide::Right,
            BlockSide::Right => BlockSide::Left,
        }
    }
}

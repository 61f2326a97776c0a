//! Vertex data emitted by the mesher.
//!
//! The layout is plain old data so a renderer can upload vertex slices with
//! `bytemuck::cast_slice` and no conversion step.

use cgmath::{Point3, Vector3};

use crate::engine_state::voxels::block::Color;

/// A single mesh vertex in world space.
///
/// # Memory Layout
/// - Position: 3x f32 (12 bytes)
/// - Normal: 3x f32 (12 bytes)
/// - Color: 4x f32 RGBA (16 bytes)
///
/// Total size: 40 bytes
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct Vertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
    pub color: [f32; 4],
}

impl Vertex {
    /// Size of one vertex in bytes.
    pub const STRIDE: usize = std::mem::size_of::<Vertex>();

    /// Creates a vertex at an integer lattice corner.
    pub fn new(position: Point3<i32>, normal: Vector3<i32>, color: Color) -> Self {
        Vertex {
            position: [position.x as f32, position.y as f32, position.z as f32],
            normal: [normal.x as f32, normal.y as f32, normal.z as f32],
            color: color.to_array(),
        }
    }
}

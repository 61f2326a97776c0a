//! Mesh data structures built from greedy faces.
//!
//! A [`Mesh`] keeps the faces it was built from alongside the vertex and index
//! buffers a renderer would upload. Indices are either a triangle list or, in
//! wireframe mode, a line list tracing each quad's outline.

use cgmath::Point3;

use crate::engine_state::{
    rendering::Vertex,
    voxels::block::{BlockRegistry, Color},
};

use super::{
    ambient_occlusion::{self, AO_FACTORS},
    face::Face,
};

/// How the index buffer of a mesh is to be interpreted.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum Topology {
    /// Two triangles per quad.
    #[default]
    Triangles,
    /// Four edges per quad.
    Lines,
}

/// Geometry for one pass of one chunk.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Mesh {
    pub faces: Vec<Face>,
    pub vertices: Vec<Vertex>,
    pub indices: Vec<u32>,
    pub topology: Topology,
}

/// Both passes of a chunk's geometry.
///
/// The transparent mesh is `None` when the chunk has no transparent faces, so
/// the caller can drop whatever transparent geometry it attached before.
#[derive(Clone, Debug, PartialEq)]
pub struct ChunkMesh {
    pub position: Point3<i32>,
    pub opaque: Mesh,
    pub transparent: Option<Mesh>,
}

impl ChunkMesh {
    pub fn face_count(&self) -> usize {
        self.opaque.faces.len() + self.transparent.as_ref().map_or(0, |m| m.faces.len())
    }
}

impl Mesh {
    pub fn new(topology: Topology) -> Self {
        Mesh {
            topology,
            ..Default::default()
        }
    }

    /// Builds vertex and index buffers for `faces`.
    ///
    /// With `lighting` on, colours are darkened by the side's fixed light factor
    /// and each corner's occlusion level.
    pub fn from_faces(faces: Vec<Face>, lighting: bool, topology: Topology) -> Self {
        let mut mesh = Mesh::new(topology);
        mesh.vertices.reserve(faces.len() * 4);
        for face in &faces {
            mesh.add_face(face, lighting);
        }
        mesh.faces = faces;
        mesh
    }

    pub fn is_empty(&self) -> bool {
        self.faces.is_empty()
    }

    fn add_face(&mut self, face: &Face, lighting: bool) {
        let base = self.vertices.len() as u32;
        let color = BlockRegistry::resolve(face.block).color;
        let normal = face.side.normal();

        for (corner, position) in face.corners().into_iter().enumerate() {
            let shade = if lighting {
                face.side.light_factor()
                    * AO_FACTORS[ambient_occlusion::level(face.ao, corner) as usize]
            } else {
                1.0
            };
            self.vertices
                .push(Vertex::new(position, normal, corner_color(color, shade)));
        }

        let flip = lighting && ambient_occlusion::flip_diagonal(face.ao);
        self.indices
            .extend(Mesh::generate_face_indices(base, flip, self.topology));
    }

    /// Indices for the quad whose first vertex is `base`.
    ///
    /// Triangles split along the 0-2 diagonal unless `flip` asks for 1-3.
    pub fn generate_face_indices(base: u32, flip: bool, topology: Topology) -> Vec<u32> {
        let order: &[u32] = match (topology, flip) {
            (Topology::Lines, _) => &[0, 1, 1, 2, 2, 3, 3, 0],
            (Topology::Triangles, false) => &[0, 1, 2, 0, 2, 3],
            (Topology::Triangles, true) => &[1, 2, 3, 1, 3, 0],
        };
        order.iter().map(|i| base + i).collect()
    }
}

fn corner_color(color: Color, shade: f32) -> Color {
    if shade == 1.0 {
        color
    } else {
        color.shaded(shade)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine_state::{
        rendering::meshing::mesh::ambient_occlusion::{pack, FULL_LIGHT},
        voxels::block::{block_side::BlockSide, block_type::BlockType},
    };

    fn face(ao: u8) -> Face {
        Face {
            origin: Point3::new(0, 0, 0),
            side: BlockSide::Top,
            width: 2,
            height: 1,
            block: BlockType::Stone.id(),
            ao,
        }
    }

    #[test]
    fn triangle_indices_offset_by_base() {
        let mesh = Mesh::from_faces(vec![face(FULL_LIGHT), face(FULL_LIGHT)], false, Topology::Triangles);
        assert_eq!(mesh.vertices.len(), 8);
        assert_eq!(mesh.indices, vec![0, 1, 2, 0, 2, 3, 4, 5, 6, 4, 6, 7]);
    }

    #[test]
    fn wireframe_traces_quad_edges() {
        let mesh = Mesh::from_faces(vec![face(FULL_LIGHT)], false, Topology::Lines);
        assert_eq!(mesh.indices, vec![0, 1, 1, 2, 2, 3, 3, 0]);
    }

    #[test]
    fn lighting_shades_corners_and_flips_dark_diagonals() {
        let stone = BlockRegistry::properties(BlockType::Stone).color;
        let unlit = Mesh::from_faces(vec![face(pack([0, 3, 0, 3]))], false, Topology::Triangles);
        assert!(unlit.vertices.iter().all(|v| v.color == stone.to_array()));
        assert_eq!(unlit.indices, vec![0, 1, 2, 0, 2, 3]);

        let lit = Mesh::from_faces(vec![face(pack([0, 3, 0, 3]))], true, Topology::Triangles);
        assert_eq!(lit.vertices[0].color, stone.shaded(AO_FACTORS[0]).to_array());
        assert_eq!(lit.vertices[1].color, stone.to_array());
        assert_eq!(lit.indices, vec![1, 2, 3, 1, 3, 0]);
    }
}

//! Vertex model and mesh geometry
//!
//! A KEM vertex is the tuple (position, normal, UV). Vertices are compared
//! bit-exactly: two vertices are the same vertex only if all eight `f32`
//! components have identical bit patterns.

use crate::dedup::deduplicate_triangles;
use crate::error::Result;

/// A single mesh vertex
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Vertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
    pub uv: [f32; 2],
}

impl Vertex {
    pub const fn new(position: [f32; 3], normal: [f32; 3], uv: [f32; 2]) -> Self {
        Self {
            position,
            normal,
            uv,
        }
    }

    /// Raw bit patterns of all eight components, in (position, normal, uv) order
    pub fn to_bits(&self) -> [u32; 8] {
        let [px, py, pz] = self.position;
        let [nx, ny, nz] = self.normal;
        let [u, v] = self.uv;
        [
            px.to_bits(),
            py.to_bits(),
            pz.to_bits(),
            nx.to_bits(),
            ny.to_bits(),
            nz.to_bits(),
            u.to_bits(),
            v.to_bits(),
        ]
    }

    /// Bit-exact equality (`-0.0 != 0.0`, identical NaNs are equal)
    pub fn bit_eq(&self, other: &Self) -> bool {
        self.to_bits() == other.to_bits()
    }
}

/// Three vertices in winding order
pub type Triangle = [Vertex; 3];

/// Deduplicated mesh: unique vertices plus mesh-local triangle indices
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MeshGeometry {
    pub vertices: Vec<Vertex>,
    /// Indices into `vertices`, three per triangle
    pub indices: Vec<u32>,
}

impl MeshGeometry {
    pub fn new(vertices: Vec<Vertex>, indices: Vec<u32>) -> Self {
        Self { vertices, indices }
    }

    /// Flatten and deduplicate a triangle list
    pub fn from_triangles(triangles: &[Triangle]) -> Result<Self> {
        deduplicate_triangles(triangles)
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty() && self.indices.is_empty()
    }

    /// Resolve indices back into vertex triples.
    ///
    /// Yields `None` for a triangle that references a vertex outside the list.
    pub fn triangles(&self) -> impl Iterator<Item = Option<Triangle>> + '_ {
        self.indices.chunks_exact(3).map(|tri| {
            let a = *self.vertices.get(tri[0] as usize)?;
            let b = *self.vertices.get(tri[1] as usize)?;
            let c = *self.vertices.get(tri[2] as usize)?;
            Some([a, b, c])
        })
    }
}

/// Something that can hand over a mesh as plain triangles.
///
/// Implemented by importers (OBJ, glTF, editor bridges). The codec only
/// consumes the extracted triangles and never reaches back into the source.
pub trait MeshSource {
    /// Display name used in logs
    fn name(&self) -> &str;

    /// Triangles in export order
    fn triangles(&self) -> &[Triangle];
}

//! Types and constants for mesh conversion

use kem_common::{MeshSource, Triangle};

/// Normal used when the source has none
pub(crate) const DEFAULT_NORMAL: [f32; 3] = [0.0, 1.0, 0.0];

/// UV used when the source has none
pub(crate) const DEFAULT_UV: [f32; 2] = [0.0, 0.0];

/// One mesh extracted from an interchange file, flattened to triangles
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SourceMesh {
    /// Object/node name, for logs
    pub name: String,
    /// Triangles with world-space positions and normals
    pub triangles: Vec<Triangle>,
}

impl SourceMesh {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            triangles: Vec::new(),
        }
    }
}

impl MeshSource for SourceMesh {
    fn name(&self) -> &str {
        &self.name
    }

    fn triangles(&self) -> &[Triangle] {
        &self.triangles
    }
}

/// Result of in-memory model conversion
pub struct ConvertedModel {
    /// Number of meshes in the container
    pub mesh_count: usize,
    /// Unique vertices across all meshes
    pub vertex_count: u32,
    /// Triangles across all meshes
    pub triangle_count: usize,
    /// Complete `.kem` file contents
    pub data: Vec<u8>,
}

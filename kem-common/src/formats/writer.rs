//! Container writer (encode)
//!
//! [`KemWriter`] is the encoder context: it owns the output sink and the
//! running global vertex offset, which must be threaded through every mesh
//! of one container in order. The header is written on construction, so a
//! streaming sink never sees a block before the header.

use std::io::Write;

use super::block::{BlockType, write_block};
use super::header::KemHeader;
use crate::error::{FormatError, KemError, Result};
use crate::vertex::{MeshGeometry, MeshSource, Triangle};

/// Streaming KEM encoder
pub struct KemWriter<W: Write> {
    sink: W,
    vertex_offset: u32,
    mesh_count: usize,
    block_count: usize,
}

impl<W: Write> KemWriter<W> {
    /// Write the file header and return a writer ready for meshes
    pub fn new(mut sink: W) -> Result<Self> {
        sink.write_all(&KemHeader::new().to_bytes())
            .map_err(KemError::Sink)?;
        Ok(Self {
            sink,
            vertex_offset: 0,
            mesh_count: 0,
            block_count: 0,
        })
    }

    /// Unique vertices written so far (the offset applied to the next mesh)
    pub fn vertex_offset(&self) -> u32 {
        self.vertex_offset
    }

    pub fn mesh_count(&self) -> usize {
        self.mesh_count
    }

    pub fn block_count(&self) -> usize {
        self.block_count
    }

    /// Write one deduplicated mesh as VERTEX, NORMALS, UV and FACES groups.
    ///
    /// `mesh.indices` are mesh-local; the current global vertex offset is
    /// added before they are framed. Nothing is written if the mesh is
    /// rejected.
    pub fn write_mesh(&mut self, mesh: &MeshGeometry) -> Result<()> {
        let mesh_index = self.mesh_count;
        let vertex_count = mesh.vertices.len() as u64;

        let end = u64::from(self.vertex_offset) + vertex_count;
        if end > u64::from(u32::MAX) {
            return Err(KemError::Oversize { vertices: end });
        }

        if let Some(&index) = mesh.indices.iter().find(|&&i| u64::from(i) >= vertex_count) {
            return Err(FormatError::IndexOutOfRange {
                mesh: mesh_index,
                index: u64::from(index),
                start: 0,
                end: vertex_count,
            }
            .into());
        }

        let mut positions = Vec::with_capacity(mesh.vertices.len() * 12);
        let mut normals = Vec::with_capacity(mesh.vertices.len() * 12);
        let mut uvs = Vec::with_capacity(mesh.vertices.len() * 8);
        for vertex in &mesh.vertices {
            extend_f32_le(&mut positions, &vertex.position);
            extend_f32_le(&mut normals, &vertex.normal);
            extend_f32_le(&mut uvs, &vertex.uv);
        }

        let mut faces = Vec::with_capacity(mesh.indices.len() * 4);
        for &index in &mesh.indices {
            faces.extend_from_slice(&(index + self.vertex_offset).to_be_bytes());
        }

        for (block_type, payload) in [
            (BlockType::Vertex, &positions),
            (BlockType::Normals, &normals),
            (BlockType::Uv, &uvs),
            (BlockType::Faces, &faces),
        ] {
            self.block_count += write_block(
                &mut self.sink,
                block_type,
                0,
                payload,
                block_type.max_block_size(),
            )?;
        }

        tracing::debug!(
            "Mesh {}: {} vertices, {} triangles, index offset {}",
            mesh_index,
            vertex_count,
            mesh.triangle_count(),
            self.vertex_offset
        );

        self.vertex_offset = end as u32;
        self.mesh_count += 1;
        Ok(())
    }

    /// Deduplicate a triangle list and write it as one mesh
    pub fn write_triangles(&mut self, triangles: &[Triangle]) -> Result<MeshGeometry> {
        let mesh = MeshGeometry::from_triangles(triangles)?;
        self.write_mesh(&mesh)?;
        Ok(mesh)
    }

    /// Write the triangles already extracted by a mesh source
    pub fn write_source<S: MeshSource + ?Sized>(&mut self, source: &S) -> Result<MeshGeometry> {
        let mesh = self.write_triangles(source.triangles())?;
        tracing::debug!(
            "Wrote '{}' ({} -> {} vertices)",
            source.name(),
            source.triangles().len() * 3,
            mesh.vertex_count()
        );
        Ok(mesh)
    }

    /// Flush and hand back the sink
    pub fn finish(mut self) -> Result<W> {
        self.sink.flush().map_err(KemError::Sink)?;
        Ok(self.sink)
    }
}

fn extend_f32_le(out: &mut Vec<u8>, values: &[f32]) {
    for value in values {
        out.extend_from_slice(&value.to_le_bytes());
    }
}

/// Encode deduplicated meshes into a complete in-memory container
pub fn encode(meshes: &[MeshGeometry]) -> Result<Vec<u8>> {
    let mut writer = KemWriter::new(Vec::new())?;
    for mesh in meshes {
        writer.write_mesh(mesh)?;
    }
    writer.finish()
}

/// Deduplicate and encode raw triangle meshes into a complete in-memory container
pub fn encode_triangles(meshes: &[Vec<Triangle>]) -> Result<Vec<u8>> {
    let mut writer = KemWriter::new(Vec::new())?;
    for triangles in meshes {
        writer.write_triangles(triangles)?;
    }
    writer.finish()
}

//! Container reader (decode)
//!
//! Decoding is strict: any structural problem fails the whole file. There is
//! no partial recovery.
//!
//! 1. [`read_blocks`] validates the header and scans blocks until end of input.
//! 2. [`read_groups`] joins consecutive same-type blocks into one payload.
//! 3. [`decode`] assigns groups to meshes (each VERTEX group opens a mesh)
//!    and converts global face indices back to mesh-local ones.
//!
//! [`decode`] requires every mesh to index only its own vertices, since a
//! mesh-local index cannot name another mesh's vertex. [`decode_merged`]
//! loads the whole file as one model instead: vertices of all meshes are
//! concatenated and face indices stay global, checked only against the
//! file-wide vertex count. Files whose meshes share vertices load only
//! through [`decode_merged`].

use std::io::Read;
use std::ops::Range;

use super::block::{BlockHeader, BlockType};
use super::header::KemHeader;
use super::serialization::read_header;
use crate::error::{FormatError, KemError, Result};
use crate::vertex::{MeshGeometry, Vertex};

/// A block as found in a byte buffer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RawBlock<'a> {
    /// Offset of the block header from the start of the file
    pub offset: usize,
    pub header: BlockHeader,
    pub block_type: BlockType,
    pub payload: &'a [u8],
}

/// Consecutive blocks of one type, payloads concatenated in file order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlockGroup {
    pub block_type: BlockType,
    /// Offset of the group's first block header
    pub offset: usize,
    pub block_count: usize,
    pub payload: Vec<u8>,
}

/// Per-group statistics, without payload copies
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GroupSummary {
    pub block_type: BlockType,
    pub offset: usize,
    pub block_count: usize,
    pub payload_len: u64,
}

/// Structural overview of a container
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContainerSummary {
    pub header: KemHeader,
    pub total_bytes: usize,
    pub block_count: usize,
    /// Number of VERTEX groups
    pub mesh_count: usize,
    pub groups: Vec<GroupSummary>,
}

/// Validate the header and scan all blocks
pub fn read_blocks(bytes: &[u8]) -> Result<(KemHeader, Vec<RawBlock<'_>>)> {
    let header: KemHeader = read_header(bytes, 0)?;
    header.validate()?;

    let mut blocks = Vec::new();
    let mut offset = KemHeader::SIZE;

    while offset < bytes.len() {
        let block_header: BlockHeader = read_header(bytes, offset)?;
        let block_type = block_header
            .kind()
            .ok_or(FormatError::UnknownBlockType {
                block_type: block_header.block_type,
                offset,
            })?;

        let start = offset + BlockHeader::SIZE;
        let len = block_header.payload_length as usize;
        let available = bytes.len() - start;
        if len > available {
            return Err(KemError::Truncated {
                offset: start,
                needed: len,
                available,
            });
        }

        blocks.push(RawBlock {
            offset,
            header: block_header,
            block_type,
            payload: &bytes[start..start + len],
        });
        offset = start + len;
    }

    Ok((header, blocks))
}

/// Index ranges of runs of same-type blocks
fn group_ranges(blocks: &[RawBlock]) -> Vec<Range<usize>> {
    let mut ranges: Vec<Range<usize>> = Vec::new();
    for (i, block) in blocks.iter().enumerate() {
        match ranges.last_mut() {
            Some(run) if blocks[run.start].block_type == block.block_type => run.end = i + 1,
            _ => ranges.push(i..i + 1),
        }
    }
    ranges
}

/// Validate, scan and reassemble split block groups
pub fn read_groups(bytes: &[u8]) -> Result<Vec<BlockGroup>> {
    let (_, blocks) = read_blocks(bytes)?;

    let groups = group_ranges(&blocks)
        .into_iter()
        .map(|range| {
            let run = &blocks[range];
            BlockGroup {
                block_type: run[0].block_type,
                offset: run[0].offset,
                block_count: run.len(),
                payload: run.iter().flat_map(|b| b.payload.iter().copied()).collect(),
            }
        })
        .collect();

    Ok(groups)
}

/// Structural overview for tooling
pub fn summarize(bytes: &[u8]) -> Result<ContainerSummary> {
    let (header, blocks) = read_blocks(bytes)?;

    let groups: Vec<GroupSummary> = group_ranges(&blocks)
        .into_iter()
        .map(|range| {
            let run = &blocks[range];
            GroupSummary {
                block_type: run[0].block_type,
                offset: run[0].offset,
                block_count: run.len(),
                payload_len: run.iter().map(|b| b.payload.len() as u64).sum(),
            }
        })
        .collect();

    Ok(ContainerSummary {
        header,
        total_bytes: bytes.len(),
        block_count: blocks.len(),
        mesh_count: groups
            .iter()
            .filter(|g| g.block_type == BlockType::Vertex)
            .count(),
        groups,
    })
}

/// Split the container into meshes; face indices are left global and unchecked
fn read_meshes(bytes: &[u8]) -> Result<Vec<MeshGeometry>> {
    let mut meshes = Vec::new();
    let mut pending: Option<PendingMesh> = None;

    for group in read_groups(bytes)? {
        if group.block_type == BlockType::Vertex {
            if let Some(mesh) = pending.take() {
                let index = meshes.len();
                meshes.push(mesh.finish(index)?);
            }
            pending = Some(PendingMesh::new(group.payload));
            continue;
        }

        let mesh = pending.as_mut().ok_or(FormatError::OrphanGroup {
            block_type: group.block_type,
            offset: group.offset,
        })?;
        mesh.set(meshes.len(), group.block_type, group.payload)?;
    }

    if let Some(mesh) = pending {
        let index = meshes.len();
        meshes.push(mesh.finish(index)?);
    }

    Ok(meshes)
}

/// Decode a complete container into meshes with mesh-local indices
pub fn decode(bytes: &[u8]) -> Result<Vec<MeshGeometry>> {
    let mut meshes = read_meshes(bytes)?;
    let mut start = 0u64;

    for (mesh, geometry) in meshes.iter_mut().enumerate() {
        let end = start + geometry.vertices.len() as u64;
        for index in &mut geometry.indices {
            let global = u64::from(*index);
            if !(start..end).contains(&global) {
                return Err(FormatError::IndexOutOfRange {
                    mesh,
                    index: global,
                    start,
                    end,
                }
                .into());
            }
            *index = (global - start) as u32;
        }
        start = end;
    }

    tracing::debug!("Decoded {} meshes, {} vertices total", meshes.len(), start);

    Ok(meshes)
}

/// Decode a complete container as one model in the file's global vertex space.
///
/// Structural checks match [`decode`]. Any face index below the total vertex
/// count is accepted, including indices into earlier or later meshes.
pub fn decode_merged(bytes: &[u8]) -> Result<MeshGeometry> {
    let meshes = read_meshes(bytes)?;
    let total: u64 = meshes.iter().map(|m| m.vertices.len() as u64).sum();

    let mut merged = MeshGeometry::default();
    for (mesh, geometry) in meshes.into_iter().enumerate() {
        if let Some(&index) = geometry.indices.iter().find(|&&i| u64::from(i) >= total) {
            return Err(FormatError::IndexOutOfRange {
                mesh,
                index: u64::from(index),
                start: 0,
                end: total,
            }
            .into());
        }
        merged.vertices.extend(geometry.vertices);
        merged.indices.extend(geometry.indices);
    }

    tracing::debug!(
        "Decoded merged model: {} vertices, {} triangles",
        merged.vertex_count(),
        merged.triangle_count()
    );

    Ok(merged)
}

/// Read a whole stream and decode it
pub fn read_from<R: Read>(mut reader: R) -> Result<Vec<MeshGeometry>> {
    let mut bytes = Vec::new();
    reader.read_to_end(&mut bytes).map_err(KemError::Source)?;
    decode(&bytes)
}

/// Group payloads of the mesh currently being assembled, indexed by block type
struct PendingMesh {
    groups: [Option<Vec<u8>>; 4],
}

impl PendingMesh {
    fn new(positions: Vec<u8>) -> Self {
        Self {
            groups: [Some(positions), None, None, None],
        }
    }

    fn slot(block_type: BlockType) -> usize {
        block_type.as_u8() as usize - 1
    }

    fn set(&mut self, mesh: usize, block_type: BlockType, payload: Vec<u8>) -> Result<()> {
        let slot = &mut self.groups[Self::slot(block_type)];
        if slot.is_some() {
            return Err(FormatError::DuplicateGroup { mesh, block_type }.into());
        }
        *slot = Some(payload);
        Ok(())
    }

    fn take(&mut self, mesh: usize, block_type: BlockType) -> Result<Vec<u8>> {
        let payload = self.groups[Self::slot(block_type)]
            .take()
            .ok_or(FormatError::MissingGroup { mesh, block_type })?;

        let element_size = block_type.element_size();
        if payload.len() % element_size != 0 {
            return Err(FormatError::MisalignedPayload {
                mesh,
                block_type,
                len: payload.len(),
                element_size,
            }
            .into());
        }
        Ok(payload)
    }

    /// Validate the groups and build the mesh; indices stay global
    fn finish(mut self, mesh: usize) -> Result<MeshGeometry> {
        let positions = self.take(mesh, BlockType::Vertex)?;
        let normals = self.take(mesh, BlockType::Normals)?;
        let uvs = self.take(mesh, BlockType::Uv)?;
        let faces = self.take(mesh, BlockType::Faces)?;

        let vertex_count = positions.len() / 12;
        if normals.len() / 12 != vertex_count || uvs.len() / 8 != vertex_count {
            return Err(FormatError::AttributeCountMismatch {
                mesh,
                positions: vertex_count,
                normals: normals.len() / 12,
                uvs: uvs.len() / 8,
            }
            .into());
        }

        let index_count = faces.len() / 4;
        if index_count % 3 != 0 {
            return Err(FormatError::PartialTriangle {
                mesh,
                count: index_count,
            }
            .into());
        }

        let vertices = positions
            .chunks_exact(12)
            .zip(normals.chunks_exact(12))
            .zip(uvs.chunks_exact(8))
            .map(|((p, n), t)| {
                Vertex::new(
                    [f32_le(&p[0..4]), f32_le(&p[4..8]), f32_le(&p[8..12])],
                    [f32_le(&n[0..4]), f32_le(&n[4..8]), f32_le(&n[8..12])],
                    [f32_le(&t[0..4]), f32_le(&t[4..8])],
                )
            })
            .collect();

        let indices = faces
            .chunks_exact(4)
            .map(|chunk| u32::from_be_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]))
            .collect();

        Ok(MeshGeometry::new(vertices, indices))
    }
}

fn f32_le(bytes: &[u8]) -> f32 {
    f32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]])
}

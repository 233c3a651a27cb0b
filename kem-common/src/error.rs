//! Error types for KEM encoding and decoding

use crate::formats::BlockType;

/// Structural problems found in a KEM container (or in geometry handed to the writer)
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FormatError {
    #[error("Bad magic bytes {0:02X?}, expected \"KEM\"")]
    BadMagic([u8; 3]),

    #[error("Bad signature bytes {0:02X?}")]
    BadSignature([u8; 7]),

    #[error("Unsupported KEM version: {0}")]
    UnsupportedVersion(u8),

    #[error("Unknown block type 0x{block_type:02X} at offset {offset}")]
    UnknownBlockType { block_type: u8, offset: usize },

    #[error("{block_type:?} group at offset {offset} appears before any VERTEX group")]
    OrphanGroup { block_type: BlockType, offset: usize },

    #[error("Mesh {mesh} has more than one {block_type:?} group")]
    DuplicateGroup { mesh: usize, block_type: BlockType },

    #[error("Mesh {mesh} is missing its {block_type:?} group")]
    MissingGroup { mesh: usize, block_type: BlockType },

    #[error("Mesh {mesh}: {block_type:?} payload of {len} bytes is not a multiple of {element_size}")]
    MisalignedPayload {
        mesh: usize,
        block_type: BlockType,
        len: usize,
        element_size: usize,
    },

    #[error("Mesh {mesh}: {positions} positions, {normals} normals, {uvs} UVs")]
    AttributeCountMismatch {
        mesh: usize,
        positions: usize,
        normals: usize,
        uvs: usize,
    },

    #[error("Mesh {mesh}: {count} indices do not form whole triangles")]
    PartialTriangle { mesh: usize, count: usize },

    #[error("Mesh {mesh}: index {index} outside vertex range {start}..{end}")]
    IndexOutOfRange {
        mesh: usize,
        index: u64,
        start: u64,
        end: u64,
    },
}

/// Errors returned by the KEM codec
#[derive(Debug, thiserror::Error)]
pub enum KemError {
    #[error(transparent)]
    Format(#[from] FormatError),

    #[error("Truncated data: needed {needed} bytes at offset {offset}, {available} available")]
    Truncated {
        offset: usize,
        needed: usize,
        available: usize,
    },

    #[error("Container would address {vertices} vertices, exceeding the u32 index range")]
    Oversize { vertices: u64 },

    #[error("Invalid maximum block size: {0}")]
    InvalidBlockSize(u32),

    #[error("Failed to write KEM data: {0}")]
    Sink(#[source] std::io::Error),

    #[error("Failed to read KEM data: {0}")]
    Source(#[source] std::io::Error),
}

pub type Result<T> = std::result::Result<T, KemError>;

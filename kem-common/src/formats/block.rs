//! Typed, length-prefixed blocks
//!
//! # Block layout
//! ```text
//! 0x00: block_type u8
//! 0x01: flags u8 (reserved, 0)
//! 0x02: reserved u16 (0)
//! 0x04: payload_length u32 BE
//! 0x08: payload (payload_length bytes)
//! ```
//!
//! A payload larger than the type's maximum block size is split across
//! several consecutive blocks of the same type. The writer always emits
//! `len / max + 1` blocks: when `len` is an exact multiple of `max` the last
//! block is empty.

use std::io::Write;

use crate::error::{KemError, Result};

/// Largest multiple of 12 (one vec3 of `f32`) that fits a `u32` length
pub const KEM_BLOCK_MAX_VEC3_SIZE: u32 = u32::MAX - u32::MAX % 12;

/// Largest multiple of 8 (one vec2 of `f32`, two `u32` indices) that fits a `u32` length
pub const KEM_BLOCK_MAX_VEC2_SIZE: u32 = u32::MAX - u32::MAX % 8;

/// Block payload kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum BlockType {
    /// Vertex positions, 3 x f32 per vertex
    Vertex = 1,
    /// Vertex normals, 3 x f32 per vertex
    Normals = 2,
    /// Texture coordinates, 2 x f32 per vertex
    Uv = 3,
    /// Triangle indices, u32 each
    Faces = 4,
}

impl BlockType {
    /// All block types in per-mesh write order
    pub const ALL: [BlockType; 4] = [
        BlockType::Vertex,
        BlockType::Normals,
        BlockType::Uv,
        BlockType::Faces,
    ];

    pub const fn from_u8(value: u8) -> Option<Self> {
        match value {
            1 => Some(BlockType::Vertex),
            2 => Some(BlockType::Normals),
            3 => Some(BlockType::Uv),
            4 => Some(BlockType::Faces),
            _ => None,
        }
    }

    pub const fn as_u8(self) -> u8 {
        self as u8
    }

    /// Size in bytes of one payload element
    pub const fn element_size(self) -> usize {
        match self {
            BlockType::Vertex | BlockType::Normals => 12,
            BlockType::Uv => 8,
            BlockType::Faces => 4,
        }
    }

    /// Maximum payload bytes per block.
    ///
    /// Face indices share the vec2 bound with UVs.
    pub const fn max_block_size(self) -> u32 {
        match self {
            BlockType::Vertex | BlockType::Normals => KEM_BLOCK_MAX_VEC3_SIZE,
            BlockType::Uv | BlockType::Faces => KEM_BLOCK_MAX_VEC2_SIZE,
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            BlockType::Vertex => "VERTEX",
            BlockType::Normals => "NORMALS",
            BlockType::Uv => "UV",
            BlockType::Faces => "FACES",
        }
    }
}

/// Block header (8 bytes)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlockHeader {
    /// Raw type byte; see [`BlockHeader::kind`]
    pub block_type: u8,
    pub flags: u8,
    pub _reserved: u16,
    pub payload_length: u32,
}

impl BlockHeader {
    pub const SIZE: usize = 8;

    pub fn new(block_type: BlockType, flags: u8, payload_length: u32) -> Self {
        Self {
            block_type: block_type.as_u8(),
            flags,
            _reserved: 0,
            payload_length,
        }
    }

    /// Decoded block type, `None` if the type byte is unknown
    pub fn kind(&self) -> Option<BlockType> {
        BlockType::from_u8(self.block_type)
    }

    /// Write header to bytes
    pub fn to_bytes(&self) -> [u8; Self::SIZE] {
        let mut bytes = [0u8; Self::SIZE];
        bytes[0] = self.block_type;
        bytes[1] = self.flags;
        // reserved bytes stay 0
        bytes[4..8].copy_from_slice(&self.payload_length.to_be_bytes());
        bytes
    }

    /// Read header from bytes
    pub fn from_bytes(bytes: &[u8]) -> Option<Self> {
        if bytes.len() < Self::SIZE {
            return None;
        }
        Some(Self {
            block_type: bytes[0],
            flags: bytes[1],
            _reserved: u16::from_be_bytes([bytes[2], bytes[3]]),
            payload_length: u32::from_be_bytes([bytes[4], bytes[5], bytes[6], bytes[7]]),
        })
    }
}

/// One framed block borrowing its payload
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Block<'a> {
    pub header: BlockHeader,
    pub payload: &'a [u8],
}

impl Block<'_> {
    /// Header plus payload size
    pub fn encoded_len(&self) -> usize {
        BlockHeader::SIZE + self.payload.len()
    }
}

/// Split a payload into blocks of at most `max_block_size` bytes.
///
/// Always returns `payload.len() / max_block_size + 1` blocks. Every block
/// but the last carries exactly `max_block_size` bytes; the last carries the
/// remainder, which is empty for exact multiples (including empty input).
pub fn split_block(
    block_type: BlockType,
    flags: u8,
    payload: &[u8],
    max_block_size: u32,
) -> Result<Vec<Block<'_>>> {
    if max_block_size == 0 {
        return Err(KemError::InvalidBlockSize(max_block_size));
    }

    let max = max_block_size as usize;
    let count = payload.len() / max + 1;

    let blocks = (0..count)
        .map(|i| {
            let start = max * i;
            let chunk = if i == count - 1 {
                &payload[start..]
            } else {
                &payload[start..start + max]
            };
            Block {
                header: BlockHeader::new(block_type, flags, chunk.len() as u32),
                payload: chunk,
            }
        })
        .collect();

    Ok(blocks)
}

/// Split a payload and write every block to `sink`.
///
/// Returns the number of blocks written.
pub fn write_block<W: Write>(
    sink: &mut W,
    block_type: BlockType,
    flags: u8,
    payload: &[u8],
    max_block_size: u32,
) -> Result<usize> {
    let blocks = split_block(block_type, flags, payload, max_block_size)?;

    for block in &blocks {
        sink.write_all(&block.header.to_bytes())
            .map_err(KemError::Sink)?;
        sink.write_all(block.payload).map_err(KemError::Sink)?;
    }

    tracing::debug!(
        "Wrote {} group: {} bytes in {} block(s)",
        block_type.name(),
        payload.len(),
        blocks.len()
    );

    Ok(blocks.len())
}

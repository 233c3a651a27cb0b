//! Binary serialization trait for fixed-size headers.
//!
//! [`KemHeader`](super::KemHeader) and [`BlockHeader`](super::BlockHeader)
//! implement `BinarySerializable` so generic code (readers, tooling) can
//! treat them uniformly. Each header keeps its own `to_bytes()` returning a
//! fixed-size array for the hot path.

/// Trait for binary-serializable format headers.
///
/// # Example
///
/// ```
/// use kem_common::formats::{BinarySerializable, BlockHeader, BlockType};
///
/// let header = BlockHeader::new(BlockType::Faces, 0, 12);
/// let bytes = header.serialize();
/// let parsed = BlockHeader::deserialize(&bytes).unwrap();
/// assert_eq!(parsed.payload_length, 12);
/// ```
pub trait BinarySerializable: Sized {
    /// Size of the serialized header in bytes.
    const SIZE: usize;

    /// Serialize to bytes.
    fn serialize(&self) -> Vec<u8>;

    /// Deserialize from bytes.
    ///
    /// Returns `None` if the byte slice is too short.
    fn deserialize(bytes: &[u8]) -> Option<Self>;
}

impl BinarySerializable for super::KemHeader {
    const SIZE: usize = Self::SIZE;

    fn serialize(&self) -> Vec<u8> {
        self.to_bytes().to_vec()
    }

    fn deserialize(bytes: &[u8]) -> Option<Self> {
        Self::from_bytes(bytes)
    }
}

impl BinarySerializable for super::BlockHeader {
    const SIZE: usize = Self::SIZE;

    fn serialize(&self) -> Vec<u8> {
        self.to_bytes().to_vec()
    }

    fn deserialize(bytes: &[u8]) -> Option<Self> {
        Self::from_bytes(bytes)
    }
}

/// Read a fixed-size header at `offset`, reporting truncation
pub(crate) fn read_header<T: BinarySerializable>(
    bytes: &[u8],
    offset: usize,
) -> crate::Result<T> {
    let available = bytes.len().saturating_sub(offset);
    bytes
        .get(offset..)
        .and_then(T::deserialize)
        .ok_or(crate::KemError::Truncated {
            offset,
            needed: T::SIZE,
            available,
        })
}

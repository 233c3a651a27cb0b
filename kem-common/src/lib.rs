//! Shared types and codec for the KEM model container
//!
//! KEM is a flat, fully-buffered binary container for triangle mesh geometry.
//! This crate is used by:
//! - `kem-export` (asset pipeline and inspection tool)
//! - engine-side loaders that read `.kem` files
//!
//! # Modules
//!
//! - [`vertex`] - Vertex model, mesh geometry and the [`MeshSource`] seam
//! - [`dedup`] - Bit-exact vertex deduplication with first-occurrence ordering
//! - [`formats`] - Header, block framing, container writer and reader
//! - [`error`] - Error types shared by the codec
//!
//! # Example
//!
//! ```
//! use kem_common::{decode, encode_triangles, Vertex};
//!
//! let v = |x: f32| Vertex::new([x, 0.0, 0.0], [0.0, 0.0, 1.0], [x, 0.0]);
//! let triangle = [v(0.0), v(1.0), v(2.0)];
//!
//! let bytes = encode_triangles(&[vec![triangle]]).unwrap();
//! let meshes = decode(&bytes).unwrap();
//! assert_eq!(meshes[0].indices, vec![0, 1, 2]);
//! ```

pub mod dedup;
pub mod error;
pub mod formats;
pub mod vertex;

pub use dedup::{Deduplicated, deduplicate, deduplicate_triangles};
pub use error::{FormatError, KemError, Result};
pub use formats::{
    BinarySerializable, Block, BlockGroup, BlockHeader, BlockType, ContainerSummary,
    KEM_BLOCK_MAX_VEC2_SIZE, KEM_BLOCK_MAX_VEC3_SIZE, KEM_EXTENSION, KEM_MAGIC, KEM_SIGNATURE,
    KEM_VERSION, KemHeader, KemWriter, RawBlock, decode, decode_merged, encode, encode_triangles,
    read_blocks, read_from, read_groups, split_block, summarize, write_block,
};
pub use vertex::{MeshGeometry, MeshSource, Triangle, Vertex};

//! kem-export library
//!
//! Provides model conversion and inspection functions for use by other tools.

pub mod inspect;
pub mod manifest;
pub mod mesh;

// Re-export the container codec
pub use kem_common::{
    KEM_EXTENSION, KemError, MeshGeometry, MeshSource, Triangle, Vertex, decode, decode_merged,
    encode,
};

// Re-export key types for mesh conversion
pub use mesh::{ConvertedModel, SourceMesh, convert, convert_to_memory, load_meshes};

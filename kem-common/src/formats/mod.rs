//! KEM binary container format (`.kem`)
//!
//! # Layout
//! ```text
//! 0x00: magic "KEM" (3 bytes)
//! 0x03: signature 49 4C 55 18 11 20 15 (7 bytes)
//! 0x0A: version u8 (1)
//! 0x0B: reserved (5 bytes, zero)
//! 0x10: blocks, repeated until end of file:
//!       +0 block_type u8 (1=VERTEX, 2=NORMALS, 3=UV, 4=FACES)
//!       +1 flags u8 (0)
//!       +2 reserved u16 (0)
//!       +4 payload_length u32 BE
//!       +8 payload
//! ```
//!
//! Every mesh contributes four block groups in order: VERTEX, NORMALS, UV,
//! FACES. A group is one or more consecutive blocks of the same type; large
//! payloads are split at a type-dependent maximum block size. There is no
//! mesh count; a VERTEX group starts a new mesh.
//!
//! Float payloads (positions, normals, UVs) are little-endian `f32`. Face
//! indices are big-endian `u32` in one global vertex space spanning the
//! whole file.
//!
//! All fixed-size headers implement [`BinarySerializable`].

pub mod block;
pub mod header;
pub mod reader;
mod serialization;
pub mod writer;


pub use block::*;
pub use header::*;
pub use reader::*;
pub use serialization::BinarySerializable;
pub use writer::*;

//! KEM file header (16 bytes)

use crate::error::FormatError;

/// Magic bytes at the start of every KEM file
pub const KEM_MAGIC: [u8; 3] = *b"KEM";

/// Constant signature following the magic
pub const KEM_SIGNATURE: [u8; 7] = [0x49, 0x4C, 0x55, 0x18, 0x11, 0x20, 0x15];

/// Current format version
pub const KEM_VERSION: u8 = 1;

/// File extension without dot
pub const KEM_EXTENSION: &str = "kem";

/// KEM file header
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KemHeader {
    pub magic: [u8; 3],
    pub signature: [u8; 7],
    pub version: u8,
    pub _reserved: [u8; 5],
}

impl Default for KemHeader {
    fn default() -> Self {
        Self::new()
    }
}

impl KemHeader {
    pub const SIZE: usize = 16;

    pub const fn new() -> Self {
        Self {
            magic: KEM_MAGIC,
            signature: KEM_SIGNATURE,
            version: KEM_VERSION,
            _reserved: [0; 5],
        }
    }

    /// Write header to bytes
    pub fn to_bytes(&self) -> [u8; Self::SIZE] {
        let mut bytes = [0u8; Self::SIZE];
        bytes[0..3].copy_from_slice(&self.magic);
        bytes[3..10].copy_from_slice(&self.signature);
        bytes[10] = self.version;
        // reserved bytes stay 0
        bytes
    }

    /// Read header from bytes (no validation beyond length)
    pub fn from_bytes(bytes: &[u8]) -> Option<Self> {
        if bytes.len() < Self::SIZE {
            return None;
        }
        let mut header = Self::new();
        header.magic.copy_from_slice(&bytes[0..3]);
        header.signature.copy_from_slice(&bytes[3..10]);
        header.version = bytes[10];
        header._reserved.copy_from_slice(&bytes[11..16]);
        Some(header)
    }

    /// Check magic, signature and version. Reserved bytes are not checked.
    pub fn validate(&self) -> Result<(), FormatError> {
        if self.magic != KEM_MAGIC {
            return Err(FormatError::BadMagic(self.magic));
        }
        if self.signature != KEM_SIGNATURE {
            return Err(FormatError::BadSignature(self.signature));
        }
        if self.version != KEM_VERSION {
            return Err(FormatError::UnsupportedVersion(self.version));
        }
        Ok(())
    }
}

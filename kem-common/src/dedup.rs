//! Vertex deduplication
//!
//! Exporters flatten every triangle into three standalone vertices, so a
//! vertex shared by N triangles shows up N times. Deduplication collapses
//! bit-exact copies into a single stored vertex and rewrites the index list.
//!
//! Ordering is first-occurrence: the unique list keeps vertices in the order
//! they first appear, and every duplicate maps to the index of its first
//! occurrence. Output is identical to the quadratic pairwise scan
//! (`vertices[i] == vertices[j]` for all `j > i`) but runs in expected O(n).
//!
//! Indices are `u32`, so at most `u32::MAX + 1` unique vertices fit; past
//! that deduplication fails with [`KemError::Oversize`].

use hashbrown::HashMap;
use hashbrown::hash_map::Entry;

use crate::error::{KemError, Result};
use crate::vertex::{MeshGeometry, Triangle, Vertex};

/// Result of deduplicating a flat vertex sequence
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Deduplicated {
    /// Unique vertices in first-occurrence order
    pub vertices: Vec<Vertex>,
    /// For every input vertex, its index into `vertices`
    pub remap: Vec<u32>,
}

/// Deduplicate a flat vertex sequence by exact bit equality
pub fn deduplicate(vertices: &[Vertex]) -> Result<Deduplicated> {
    let mut first_seen: HashMap<[u32; 8], u32> = HashMap::with_capacity(vertices.len());
    let mut unique = Vec::new();
    let mut remap = Vec::with_capacity(vertices.len());

    for vertex in vertices {
        let index = match first_seen.entry(vertex.to_bits()) {
            Entry::Occupied(slot) => *slot.get(),
            Entry::Vacant(slot) => {
                let index = next_index(unique.len())?;
                unique.push(*vertex);
                *slot.insert(index)
            }
        };
        remap.push(index);
    }

    tracing::trace!(
        "Deduplicated {} vertices into {} unique",
        vertices.len(),
        unique.len()
    );

    Ok(Deduplicated {
        vertices: unique,
        remap,
    })
}

/// Index of the next unique vertex, given how many are already stored
fn next_index(unique: usize) -> Result<u32> {
    u32::try_from(unique).map_err(|_| KemError::Oversize {
        vertices: unique as u64 + 1,
    })
}

/// Flatten triangles (3 vertices each, no sharing) and deduplicate.
///
/// Returned indices are mesh-local; the container writer adds the global
/// vertex offset when the mesh is framed.
pub fn deduplicate_triangles(triangles: &[Triangle]) -> Result<MeshGeometry> {
    let flat: Vec<Vertex> = triangles.iter().flatten().copied().collect();
    let Deduplicated { vertices, remap } = deduplicate(&flat)?;
    Ok(MeshGeometry::new(vertices, remap))
}

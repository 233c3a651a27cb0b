//! Container inspection
//!
//! Logs the layout of an existing `.kem` file: header, block groups with their
//! byte offsets, and optionally the decoded size of each mesh.

use anyhow::{Context, Result};
use kem_common::{ContainerSummary, FormatError, KemError, decode, decode_merged, summarize};
use std::path::Path;

/// Log a `.kem` file's structure; `show_meshes` also decodes every mesh
pub fn inspect(input: &Path, show_meshes: bool) -> Result<ContainerSummary> {
    let bytes =
        std::fs::read(input).with_context(|| format!("Failed to read input: {:?}", input))?;
    let summary =
        summarize(&bytes).with_context(|| format!("Invalid KEM container: {:?}", input))?;

    tracing::info!(
        "{:?}: KEM v{}, {} bytes, {} blocks, {} meshes",
        input,
        summary.header.version,
        summary.total_bytes,
        summary.block_count,
        summary.mesh_count
    );

    for group in &summary.groups {
        tracing::info!(
            "  0x{:08X} {:<7} {} block(s), {} bytes",
            group.offset,
            group.block_type.name(),
            group.block_count,
            group.payload_len
        );
    }

    if show_meshes {
        let model =
            decode_merged(&bytes).with_context(|| format!("Failed to decode: {:?}", input))?;
        tracing::info!(
            "  model: {} vertices, {} triangles",
            model.vertex_count(),
            model.triangle_count()
        );

        match decode(&bytes) {
            Ok(meshes) => {
                for (index, mesh) in meshes.iter().enumerate() {
                    tracing::info!(
                        "  mesh [{}]: {} vertices, {} triangles",
                        index,
                        mesh.vertex_count(),
                        mesh.triangle_count()
                    );
                }
            }
            Err(KemError::Format(FormatError::IndexOutOfRange { mesh, .. })) => {
                tracing::warn!(
                    "  mesh [{}] indexes vertices of another mesh; no per-mesh listing",
                    mesh
                );
            }
            Err(err) => {
                return Err(err).with_context(|| format!("Failed to decode: {:?}", input));
            }
        }
    }

    Ok(summary)
}

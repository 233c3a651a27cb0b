//! Mesh converter (OBJ/glTF -> .kem)
//!
//! Every input file may hold several meshes. All meshes of all inputs go into
//! one container, in argument order and then file order, sharing one global
//! vertex index space.

mod gltf;
mod obj;
mod types;

use anyhow::{Context, Result, bail};
use kem_common::KemWriter;
use std::path::Path;

// Re-export public API
pub use self::gltf::load_gltf;
pub use self::obj::load_obj;
pub use self::types::{ConvertedModel, SourceMesh};

/// Input extensions `load_meshes` understands (lowercase)
pub const SUPPORTED_EXTENSIONS: &[&str] = &["obj", "gltf", "glb"];

fn extension(path: &Path) -> String {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|s| s.to_lowercase())
        .unwrap_or_default()
}

/// Whether `path` has an extension `load_meshes` can read
pub fn is_supported(path: &Path) -> bool {
    SUPPORTED_EXTENSIONS.contains(&extension(path).as_str())
}

/// Load all meshes from an OBJ, glTF or GLB file (detected by extension)
pub fn load_meshes(input: &Path) -> Result<Vec<SourceMesh>> {
    match extension(input).as_str() {
        "obj" => load_obj(input),
        "gltf" | "glb" => load_gltf(input),
        _ => bail!(
            "Unsupported mesh format: {:?} (use .obj, .gltf, or .glb)",
            input
        ),
    }
}

/// Convert one or more mesh files into an in-memory KEM container
pub fn convert_to_memory<P: AsRef<Path>>(inputs: &[P]) -> Result<ConvertedModel> {
    if inputs.is_empty() {
        bail!("No input files given");
    }

    let mut writer = KemWriter::new(Vec::new())?;
    let mut triangle_count = 0;

    for input in inputs {
        let input = input.as_ref();
        let meshes = load_meshes(input)?;

        for mesh in &meshes {
            let geometry = writer
                .write_source(mesh)
                .with_context(|| format!("Failed to encode mesh '{}' from {:?}", mesh.name, input))?;
            triangle_count += geometry.triangle_count();
        }
        tracing::debug!("Loaded {} mesh(es) from {:?}", meshes.len(), input);
    }

    let mesh_count = writer.mesh_count();
    let vertex_count = writer.vertex_offset();
    let data = writer.finish()?;

    Ok(ConvertedModel {
        mesh_count,
        vertex_count,
        triangle_count,
        data,
    })
}

/// Convert one or more mesh files and write the container to `output`
pub fn convert<P: AsRef<Path>>(inputs: &[P], output: &Path) -> Result<()> {
    let model = convert_to_memory(inputs)?;

    // Whole container is buffered; one write
    std::fs::write(output, &model.data)
        .with_context(|| format!("Failed to write output: {:?}", output))?;

    tracing::info!(
        "Converted model: {} meshes, {} vertices, {} triangles, {} bytes",
        model.mesh_count,
        model.vertex_count,
        model.triangle_count,
        model.data.len()
    );

    Ok(())
}

//! glTF/GLB mesh loading
//!
//! Walks the default scene (or the first scene) and emits one mesh per node
//! that references a glTF mesh. Positions are baked into world space with the
//! accumulated node transform; normals use its inverse transpose. Files
//! without scenes fall back to every mesh untransformed.

use super::types::{DEFAULT_NORMAL, DEFAULT_UV, SourceMesh};
use anyhow::{Context, Result, bail};
use glam::{Mat3, Mat4, Vec3};
use kem_common::{Triangle, Vertex};
use std::path::Path;

/// Load all meshes from a glTF or GLB file
pub fn load_gltf(input: &Path) -> Result<Vec<SourceMesh>> {
    let (document, buffers, _images) =
        gltf::import(input).with_context(|| format!("Failed to load glTF: {:?}", input))?;

    let mut meshes = Vec::new();

    match document.default_scene().or_else(|| document.scenes().next()) {
        Some(scene) => {
            for node in scene.nodes() {
                collect_node(&node, Mat4::IDENTITY, &buffers, &mut meshes)?;
            }
        }
        None => {
            for mesh in document.meshes() {
                let name = mesh
                    .name()
                    .map(str::to_string)
                    .unwrap_or_else(|| format!("mesh{}", mesh.index()));
                let triangles = read_triangles(&mesh, Mat4::IDENTITY, &buffers)?;
                push_mesh(&mut meshes, SourceMesh { name, triangles });
            }
        }
    }

    if meshes.is_empty() {
        bail!("No meshes found in glTF");
    }

    Ok(meshes)
}

fn collect_node(
    node: &gltf::Node,
    parent: Mat4,
    buffers: &[gltf::buffer::Data],
    out: &mut Vec<SourceMesh>,
) -> Result<()> {
    let world = parent * Mat4::from_cols_array_2d(&node.transform().matrix());

    if let Some(mesh) = node.mesh() {
        let name = node
            .name()
            .or(mesh.name())
            .map(str::to_string)
            .unwrap_or_else(|| format!("node{}", node.index()));
        let triangles = read_triangles(&mesh, world, buffers)
            .with_context(|| format!("Failed to read mesh of node '{}'", name))?;
        push_mesh(out, SourceMesh { name, triangles });
    }

    for child in node.children() {
        collect_node(&child, world, buffers, out)?;
    }

    Ok(())
}

fn push_mesh(meshes: &mut Vec<SourceMesh>, mesh: SourceMesh) {
    if mesh.triangles.is_empty() {
        tracing::debug!("Skipping glTF mesh '{}' without triangles", mesh.name);
    } else {
        meshes.push(mesh);
    }
}

fn read_triangles(
    mesh: &gltf::Mesh,
    transform: Mat4,
    buffers: &[gltf::buffer::Data],
) -> Result<Vec<Triangle>> {
    // Identity leaves attributes bit-exact
    let identity = transform == Mat4::IDENTITY;
    let normal_matrix = Mat3::from_mat4(transform).inverse().transpose();

    let mut triangles = Vec::new();

    for primitive in mesh.primitives() {
        if primitive.mode() != gltf::mesh::Mode::Triangles {
            tracing::warn!(
                "Skipping primitive {} of mesh {:?}: mode {:?} is not triangles",
                primitive.index(),
                mesh.name().unwrap_or("<unnamed>"),
                primitive.mode()
            );
            continue;
        }

        let reader = primitive.reader(|buffer| Some(&buffers[buffer.index()]));

        // Positions (required)
        let positions: Vec<[f32; 3]> = reader
            .read_positions()
            .context("No positions in mesh primitive")?
            .collect();

        // Normals (optional)
        let normals: Option<Vec<[f32; 3]>> = reader.read_normals().map(|iter| iter.collect());

        // UVs (optional)
        let uvs: Option<Vec<[f32; 2]>> = reader
            .read_tex_coords(0)
            .map(|iter| iter.into_f32().collect());

        // Non-indexed primitives draw vertices in order
        let indices: Vec<u32> = reader
            .read_indices()
            .map(|iter| iter.into_u32().collect())
            .unwrap_or_else(|| (0..positions.len() as u32).collect());

        let vertex = |index: u32| -> Result<Vertex> {
            let i = index as usize;
            let position = positions.get(i).copied().with_context(|| {
                format!("Index {} out of range ({} positions)", i, positions.len())
            })?;
            let normal = normals
                .as_ref()
                .and_then(|n| n.get(i).copied())
                .unwrap_or(DEFAULT_NORMAL);
            let uv = uvs
                .as_ref()
                .and_then(|u| u.get(i).copied())
                .unwrap_or(DEFAULT_UV);

            if identity {
                return Ok(Vertex::new(position, normal, uv));
            }

            let position = transform.transform_point3(Vec3::from_array(position));
            let normal = (normal_matrix * Vec3::from_array(normal)).normalize_or_zero();
            Ok(Vertex::new(position.to_array(), normal.to_array(), uv))
        };

        for tri in indices.chunks_exact(3) {
            triangles.push([vertex(tri[0])?, vertex(tri[1])?, vertex(tri[2])?]);
        }
    }

    Ok(triangles)
}

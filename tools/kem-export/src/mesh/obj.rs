//! OBJ mesh loading
//!
//! Every `o` or `g` statement starts a new mesh, so a scene exported with one
//! object per mesh keeps its mesh boundaries. Vertex pools (`v`, `vt`, `vn`)
//! are shared across the whole file as OBJ requires.

use super::types::{DEFAULT_NORMAL, DEFAULT_UV, SourceMesh};
use anyhow::{Context, Result, bail};
use kem_common::Vertex;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

/// Load all non-empty meshes from an OBJ file
pub fn load_obj(input: &Path) -> Result<Vec<SourceMesh>> {
    let file = File::open(input).with_context(|| format!("Failed to open OBJ: {:?}", input))?;
    let default_name = input
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("mesh");

    parse_obj(BufReader::new(file), default_name)
        .with_context(|| format!("Failed to parse OBJ: {:?}", input))
}

/// Parse OBJ text; faces before any `o`/`g` go to a mesh named `default_name`
pub(crate) fn parse_obj<R: BufRead>(reader: R, default_name: &str) -> Result<Vec<SourceMesh>> {
    let mut positions: Vec<[f32; 3]> = Vec::new();
    let mut tex_coords: Vec<[f32; 2]> = Vec::new();
    let mut normals_raw: Vec<[f32; 3]> = Vec::new();

    let mut meshes = Vec::new();
    let mut current = SourceMesh::new(default_name);

    for line in reader.lines() {
        let line = line?;
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let parts: Vec<&str> = line.split_whitespace().collect();
        if parts.is_empty() {
            continue;
        }

        match parts[0] {
            "v" if parts.len() >= 4 => {
                let x: f32 = parts[1].parse().unwrap_or(0.0);
                let y: f32 = parts[2].parse().unwrap_or(0.0);
                let z: f32 = parts[3].parse().unwrap_or(0.0);
                positions.push([x, y, z]);
            }
            "vt" if parts.len() >= 3 => {
                let u: f32 = parts[1].parse().unwrap_or(0.0);
                let v: f32 = parts[2].parse().unwrap_or(0.0);
                tex_coords.push([u, v]);
            }
            "vn" if parts.len() >= 4 => {
                let x: f32 = parts[1].parse().unwrap_or(0.0);
                let y: f32 = parts[2].parse().unwrap_or(0.0);
                let z: f32 = parts[3].parse().unwrap_or(0.0);
                normals_raw.push([x, y, z]);
            }
            "o" | "g" => {
                let name = if parts.len() > 1 {
                    parts[1..].join(" ")
                } else {
                    default_name.to_string()
                };
                let finished = std::mem::replace(&mut current, SourceMesh::new(name));
                push_mesh(&mut meshes, finished);
            }
            "f" => {
                let pools = [positions.len(), tex_coords.len(), normals_raw.len()];
                let face_verts: Option<Vec<ObjVertex>> = parts[1..]
                    .iter()
                    .map(|v| parse_obj_vertex(v, pools))
                    .collect();

                let face_verts = match face_verts {
                    Some(verts) if verts.len() >= 3 => verts,
                    Some(verts) => {
                        tracing::warn!(
                            "Skipping face with {} vertices in '{}': {}",
                            verts.len(),
                            current.name,
                            line
                        );
                        continue;
                    }
                    None => {
                        tracing::warn!(
                            "Skipping face with unresolvable vertex reference in '{}': {}",
                            current.name,
                            line
                        );
                        continue;
                    }
                };

                let vertex = |(vi, vti, vni): ObjVertex| {
                    Vertex::new(
                        positions.get(vi).copied().unwrap_or([0.0; 3]),
                        vni.and_then(|ni| normals_raw.get(ni).copied())
                            .unwrap_or(DEFAULT_NORMAL),
                        vti.and_then(|ti| tex_coords.get(ti).copied())
                            .unwrap_or(DEFAULT_UV),
                    )
                };

                // Triangulate (fan triangulation for convex polygons)
                for i in 1..face_verts.len() - 1 {
                    current.triangles.push([
                        vertex(face_verts[0]),
                        vertex(face_verts[i]),
                        vertex(face_verts[i + 1]),
                    ]);
                }
            }
            _ => {}
        }
    }
    push_mesh(&mut meshes, current);

    if meshes.is_empty() {
        bail!("No faces found in OBJ file");
    }

    Ok(meshes)
}

fn push_mesh(meshes: &mut Vec<SourceMesh>, mesh: SourceMesh) {
    if mesh.triangles.is_empty() {
        tracing::debug!("Skipping empty OBJ group '{}'", mesh.name);
    } else {
        meshes.push(mesh);
    }
}

/// Zero-based (position, texcoord, normal) indices of one face corner
type ObjVertex = (usize, Option<usize>, Option<usize>);

/// Parse OBJ vertex reference: "v", "v/vt", "v/vt/vn", or "v//vn".
///
/// `pools` holds the current `v`, `vt` and `vn` counts; negative indices
/// count back from the end of those pools.
fn parse_obj_vertex(s: &str, pools: [usize; 3]) -> Option<ObjVertex> {
    let [position_count, tex_coord_count, normal_count] = pools;
    let parts: Vec<&str> = s.split('/').collect();

    let vi = resolve_obj_index(parts.first()?, position_count)?;

    // An attribute reference that is present must resolve
    let attribute = |slot: usize, count: usize| match parts.get(slot) {
        Some(s) if !s.is_empty() => resolve_obj_index(s, count).map(Some),
        _ => Some(None),
    };
    let vti = attribute(1, tex_coord_count)?;
    let vni = attribute(2, normal_count)?;

    Some((vi, vti, vni))
}

/// Convert a 1-based (or negative, relative) OBJ index into a 0-based one
fn resolve_obj_index(s: &str, count: usize) -> Option<usize> {
    let index: isize = s.parse().ok()?;
    match index {
        0 => None,
        1.. => Some(index as usize - 1),
        _ => count.checked_sub(index.unsigned_abs()),
    }
}

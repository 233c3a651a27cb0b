//! Programmatic GLB generation for integration tests.
//!
//! Generates a GLB with one triangle mesh used by three nodes:
//! - "Plain": no transform
//! - "Moved" (no mesh) translated by +10 on X, with child "Scaled" scaled by 2
//! - "Dots": a points-only mesh that the exporter must skip

use gltf_json as json;
use json::validation::Checked::Valid;

/// Triangle positions in object space
pub const POSITIONS: [[f32; 3]; 3] = [[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]];
/// Shared normal for all three corners
pub const NORMAL: [f32; 3] = [0.0, 0.0, 1.0];
/// Triangle UVs
pub const UVS: [[f32; 2]; 3] = [[0.0, 0.0], [1.0, 0.0], [0.0, 1.0]];
/// Translation of the "Moved" node
pub const TRANSLATION: [f32; 3] = [10.0, 0.0, 0.0];
/// Uniform scale of the "Scaled" node
pub const SCALE: f32 = 2.0;

const POS_ACCESSOR: u32 = 0;
const NORM_ACCESSOR: u32 = 1;
const UV_ACCESSOR: u32 = 2;
const INDICES_ACCESSOR: u32 = 3;

/// Generate the test GLB
pub fn generate_scene_glb() -> Vec<u8> {
    let (buffer_data, views, accessors) = pack_binary_data();
    let root = build_gltf_json(views, accessors);
    assemble_glb(&root, &buffer_data)
}

fn f32_accessor(view: u32, count: usize, type_: json::accessor::Type) -> json::Accessor {
    json::Accessor {
        buffer_view: Some(json::Index::new(view)),
        byte_offset: Some(0u64.into()),
        count: count.into(),
        component_type: Valid(json::accessor::GenericComponentType(
            json::accessor::ComponentType::F32,
        )),
        extensions: Default::default(),
        extras: Default::default(),
        type_: Valid(type_),
        min: None,
        max: None,
        name: None,
        normalized: false,
        sparse: None,
    }
}

fn push_view(
    buffer: &mut Vec<u8>,
    views: &mut Vec<json::buffer::View>,
    data: &[u8],
    target: json::buffer::Target,
) -> u32 {
    let offset = buffer.len();
    buffer.extend_from_slice(data);
    while !buffer.len().is_multiple_of(4) {
        buffer.push(0);
    }
    views.push(json::buffer::View {
        buffer: json::Index::new(0),
        byte_length: data.len().into(),
        byte_offset: Some(offset.into()),
        byte_stride: None,
        extensions: Default::default(),
        extras: Default::default(),
        name: None,
        target: Some(Valid(target)),
    });
    views.len() as u32 - 1
}

fn pack_binary_data() -> (Vec<u8>, Vec<json::buffer::View>, Vec<json::Accessor>) {
    let mut buffer = Vec::new();
    let mut views = Vec::new();
    let mut accessors = Vec::new();

    let positions: Vec<u8> = POSITIONS
        .iter()
        .flatten()
        .flat_map(|c| c.to_le_bytes())
        .collect();
    let view = push_view(
        &mut buffer,
        &mut views,
        &positions,
        json::buffer::Target::ArrayBuffer,
    );
    let mut accessor = f32_accessor(view, POSITIONS.len(), json::accessor::Type::Vec3);
    accessor.min = Some(json::Value::Array(
        [0.0f32, 0.0, 0.0].into_iter().map(json::Value::from).collect(),
    ));
    accessor.max = Some(json::Value::Array(
        [1.0f32, 1.0, 0.0].into_iter().map(json::Value::from).collect(),
    ));
    accessors.push(accessor);

    let normals: Vec<u8> = [NORMAL; 3]
        .iter()
        .flatten()
        .flat_map(|c| c.to_le_bytes())
        .collect();
    let view = push_view(
        &mut buffer,
        &mut views,
        &normals,
        json::buffer::Target::ArrayBuffer,
    );
    accessors.push(f32_accessor(view, 3, json::accessor::Type::Vec3));

    let uvs: Vec<u8> = UVS.iter().flatten().flat_map(|c| c.to_le_bytes()).collect();
    let view = push_view(
        &mut buffer,
        &mut views,
        &uvs,
        json::buffer::Target::ArrayBuffer,
    );
    accessors.push(f32_accessor(view, UVS.len(), json::accessor::Type::Vec2));

    let indices: Vec<u8> = [0u16, 1, 2].iter().flat_map(|i| i.to_le_bytes()).collect();
    let view = push_view(
        &mut buffer,
        &mut views,
        &indices,
        json::buffer::Target::ElementArrayBuffer,
    );
    accessors.push(json::Accessor {
        buffer_view: Some(json::Index::new(view)),
        byte_offset: Some(0u64.into()),
        count: 3usize.into(),
        component_type: Valid(json::accessor::GenericComponentType(
            json::accessor::ComponentType::U16,
        )),
        extensions: Default::default(),
        extras: Default::default(),
        type_: Valid(json::accessor::Type::Scalar),
        min: None,
        max: None,
        name: None,
        normalized: false,
        sparse: None,
    });

    (buffer, views, accessors)
}

fn node(name: &str, mesh: Option<u32>) -> json::Node {
    json::Node {
        camera: None,
        children: None,
        extensions: Default::default(),
        extras: Default::default(),
        matrix: None,
        mesh: mesh.map(json::Index::new),
        name: Some(name.to_string()),
        rotation: None,
        scale: None,
        translation: None,
        skin: None,
        weights: None,
    }
}

fn build_gltf_json(
    buffer_views: Vec<json::buffer::View>,
    accessors: Vec<json::Accessor>,
) -> json::Root {
    let mut moved = node("Moved", None);
    moved.translation = Some(TRANSLATION);
    moved.children = Some(vec![json::Index::new(2)]);

    let mut scaled = node("Scaled", Some(0));
    scaled.scale = Some([SCALE; 3]);

    let nodes = vec![node("Plain", Some(0)), moved, scaled, node("Dots", Some(1))];

    let mut attributes = std::collections::BTreeMap::new();
    attributes.insert(
        Valid(json::mesh::Semantic::Positions),
        json::Index::new(POS_ACCESSOR),
    );
    attributes.insert(
        Valid(json::mesh::Semantic::Normals),
        json::Index::new(NORM_ACCESSOR),
    );
    attributes.insert(
        Valid(json::mesh::Semantic::TexCoords(0)),
        json::Index::new(UV_ACCESSOR),
    );

    let mut point_attributes = std::collections::BTreeMap::new();
    point_attributes.insert(
        Valid(json::mesh::Semantic::Positions),
        json::Index::new(POS_ACCESSOR),
    );

    let meshes = vec![
        json::Mesh {
            extensions: Default::default(),
            extras: Default::default(),
            name: Some("Triangle".to_string()),
            primitives: vec![json::mesh::Primitive {
                attributes,
                extensions: Default::default(),
                extras: Default::default(),
                indices: Some(json::Index::new(INDICES_ACCESSOR)),
                material: None,
                mode: Valid(json::mesh::Mode::Triangles),
                targets: None,
            }],
            weights: None,
        },
        json::Mesh {
            extensions: Default::default(),
            extras: Default::default(),
            name: Some("Points".to_string()),
            primitives: vec![json::mesh::Primitive {
                attributes: point_attributes,
                extensions: Default::default(),
                extras: Default::default(),
                indices: None,
                material: None,
                mode: Valid(json::mesh::Mode::Points),
                targets: None,
            }],
            weights: None,
        },
    ];

    let scenes = vec![json::Scene {
        extensions: Default::default(),
        extras: Default::default(),
        name: Some("TestScene".to_string()),
        nodes: vec![
            json::Index::new(0),
            json::Index::new(1),
            json::Index::new(3),
        ],
    }];

    // Byte length is set by assemble_glb
    let buffers = vec![json::Buffer {
        byte_length: 0u64.into(),
        extensions: Default::default(),
        extras: Default::default(),
        name: None,
        uri: None,
    }];

    json::Root {
        accessors,
        animations: Vec::new(),
        asset: json::Asset {
            copyright: None,
            extensions: Default::default(),
            extras: Default::default(),
            generator: Some("kem-export-test".to_string()),
            min_version: None,
            version: "2.0".to_string(),
        },
        buffers,
        buffer_views,
        cameras: Vec::new(),
        extensions: Default::default(),
        extras: Default::default(),
        extensions_required: Vec::new(),
        extensions_used: Vec::new(),
        images: Vec::new(),
        materials: Vec::new(),
        meshes,
        nodes,
        samplers: Vec::new(),
        scene: Some(json::Index::new(0)),
        scenes,
        skins: Vec::new(),
        textures: Vec::new(),
    }
}

/// Assemble the final GLB binary
fn assemble_glb(root: &json::Root, buffer_data: &[u8]) -> Vec<u8> {
    let mut root = root.clone();
    root.buffers[0].byte_length = buffer_data.len().into();

    let json_string = json::serialize::to_string(&root).expect("Failed to serialize JSON");
    let json_bytes = json_string.as_bytes();

    // Chunks are 4-byte aligned
    let json_padding = (4 - (json_bytes.len() % 4)) % 4;
    let json_chunk_length = json_bytes.len() + json_padding;
    let buffer_padding = (4 - (buffer_data.len() % 4)) % 4;
    let buffer_chunk_length = buffer_data.len() + buffer_padding;

    let total_length = 12 + 8 + json_chunk_length + 8 + buffer_chunk_length;
    let mut glb = Vec::with_capacity(total_length);

    // Header
    glb.extend_from_slice(b"glTF");
    glb.extend_from_slice(&2u32.to_le_bytes());
    glb.extend_from_slice(&(total_length as u32).to_le_bytes());

    // JSON chunk
    glb.extend_from_slice(&(json_chunk_length as u32).to_le_bytes());
    glb.extend_from_slice(&0x4E4F534Au32.to_le_bytes());
    glb.extend_from_slice(json_bytes);
    glb.extend(std::iter::repeat_n(0x20u8, json_padding));

    // BIN chunk
    glb.extend_from_slice(&(buffer_chunk_length as u32).to_le_bytes());
    glb.extend_from_slice(&0x004E4942u32.to_le_bytes());
    glb.extend_from_slice(buffer_data);
    glb.extend(std::iter::repeat_n(0u8, buffer_padding));

    glb
}

//! glTF 2.0 decoding
//!
//! Hat models ship either as binary glTF (`.glb`) or as glTF JSON. Only the
//! document structure is read: meshes, materials and scenes become entries of
//! the asset set, and each scene becomes a prefab.
//!
//! GLB layout (all integers little endian):
//! - header: magic `glTF`, version (2), total length
//! - chunks: length, type, payload; the first chunk must be `JSON`

use super::{Asset, AssetError, AssetResult, MaterialAsset, MeshAsset, Prefab};
use byteorder::{LittleEndian, ReadBytesExt};
use serde::Deserialize;
use std::io::Cursor;
use uuid::Uuid;

pub const GLB_MAGIC: u32 = 0x4654_6C67;
pub const GLB_VERSION: u32 = 2;
pub const CHUNK_JSON: u32 = 0x4E4F_534A;

const GLB_HEADER_LEN: usize = 12;
const CHUNK_HEADER_LEN: usize = 8;

#[derive(Debug, Deserialize)]
struct GltfDocument {
    asset: GltfAssetInfo,
    #[serde(default)]
    scene: Option<usize>,
    #[serde(default)]
    scenes: Vec<GltfScene>,
    #[serde(default)]
    nodes: Vec<GltfNamed>,
    #[serde(default)]
    meshes: Vec<GltfMesh>,
    #[serde(default)]
    materials: Vec<GltfNamed>,
}

#[derive(Debug, Deserialize)]
struct GltfAssetInfo {
    version: String,
}

#[derive(Debug, Deserialize)]
struct GltfScene {
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    nodes: Vec<usize>,
}

#[derive(Debug, Deserialize)]
struct GltfNamed {
    #[serde(default)]
    name: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GltfMesh {
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    primitives: Vec<serde_json::Value>,
}

/// Whether `bytes` starts with the GLB magic
pub fn is_glb(bytes: &[u8]) -> bool {
    bytes.len() >= 4 && Cursor::new(bytes).read_u32::<LittleEndian>().ok() == Some(GLB_MAGIC)
}

/// Decode a glTF resource into its asset set.
///
/// Meshes come first, then materials, then one prefab per scene. The default
/// scene (if the document names one) is listed first among the prefabs.
pub fn decode(resource: &str, bytes: &[u8]) -> AssetResult<Vec<Asset>> {
    let json = if is_glb(bytes) {
        glb_json_chunk(resource, bytes)?
    } else {
        bytes
    };

    let document: GltfDocument = serde_json::from_slice(json).map_err(|e| decode_error(resource, e))?;
    if !document.asset.version.starts_with('2') {
        return Err(decode_error(
            resource,
            format!("unsupported glTF version {}", document.asset.version),
        ));
    }

    Ok(document_assets(resource, document))
}

fn glb_json_chunk<'a>(resource: &str, bytes: &'a [u8]) -> AssetResult<&'a [u8]> {
    let mut cursor = Cursor::new(bytes);
    let truncated = |_| decode_error(resource, "truncated GLB header");

    let _magic = cursor.read_u32::<LittleEndian>().map_err(truncated)?;
    let version = cursor.read_u32::<LittleEndian>().map_err(truncated)?;
    let total_len = cursor.read_u32::<LittleEndian>().map_err(truncated)? as usize;

    if version != GLB_VERSION {
        return Err(decode_error(resource, format!("unsupported GLB version {}", version)));
    }
    if total_len < GLB_HEADER_LEN + CHUNK_HEADER_LEN || total_len > bytes.len() {
        return Err(decode_error(
            resource,
            format!("GLB length {} does not match payload of {} bytes", total_len, bytes.len()),
        ));
    }

    let chunk_len = cursor.read_u32::<LittleEndian>().map_err(truncated)? as usize;
    let chunk_type = cursor.read_u32::<LittleEndian>().map_err(truncated)?;
    if chunk_type != CHUNK_JSON {
        return Err(decode_error(resource, format!("first chunk is {:#010x}, expected JSON", chunk_type)));
    }

    let start = GLB_HEADER_LEN + CHUNK_HEADER_LEN;
    let end = start
        .checked_add(chunk_len)
        .filter(|&end| end <= total_len)
        .ok_or_else(|| decode_error(resource, "JSON chunk runs past the end of the file"))?;

    Ok(&bytes[start..end])
}

fn document_assets(resource: &str, document: GltfDocument) -> Vec<Asset> {
    let mut assets = Vec::with_capacity(document.meshes.len() + document.materials.len() + document.scenes.len().max(1));

    for mesh in document.meshes {
        assets.push(Asset::Mesh(MeshAsset {
            id: Uuid::new_v4(),
            name: mesh.name,
            primitive_count: mesh.primitives.len(),
        }));
    }

    for material in document.materials {
        assets.push(Asset::Material(MaterialAsset {
            id: Uuid::new_v4(),
            name: material.name,
        }));
    }

    if document.scenes.is_empty() {
        // Scene-less documents still describe one model when they have nodes
        if !document.nodes.is_empty() {
            assets.push(Asset::Prefab(Prefab {
                id: Uuid::new_v4(),
                resource: resource.to_string(),
                name: None,
                root_nodes: document.nodes.len(),
            }));
        }
        return assets;
    }

    let default_scene = document.scene.filter(|&index| index < document.scenes.len());
    let mut scenes: Vec<(usize, GltfScene)> = document.scenes.into_iter().enumerate().collect();
    if let Some(index) = default_scene {
        let scene = scenes.remove(index);
        scenes.insert(0, scene);
    }

    for (_, scene) in scenes {
        assets.push(Asset::Prefab(Prefab {
            id: Uuid::new_v4(),
            resource: resource.to_string(),
            name: scene.name,
            root_nodes: scene.nodes.len(),
        }));
    }

    assets
}

fn decode_error(resource: &str, reason: impl ToString) -> AssetError {
    AssetError::Decode {
        resource: resource.to_string(),
        reason: reason.to_string(),
    }
}

/// Wrap a glTF JSON document in a GLB container (JSON chunk only)
pub fn encode_glb(json: &[u8]) -> Vec<u8> {
    let padding = (4 - json.len() % 4) % 4;
    let chunk_len = json.len() + padding;
    let total_len = GLB_HEADER_LEN + CHUNK_HEADER_LEN + chunk_len;

    let mut out = Vec::with_capacity(total_len);
    out.extend_from_slice(&GLB_MAGIC.to_le_bytes());
    out.extend_from_slice(&GLB_VERSION.to_le_bytes());
    out.extend_from_slice(&(total_len as u32).to_le_bytes());
    out.extend_from_slice(&(chunk_len as u32).to_le_bytes());
    out.extend_from_slice(&CHUNK_JSON.to_le_bytes());
    out.extend_from_slice(json);
    // JSON chunks are padded with spaces
    out.extend(std::iter::repeat(b' ').take(padding));
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    const CAP: &str = r#"{
        "asset": { "version": "2.0" },
        "scene": 1,
        "scenes": [ { "name": "preview", "nodes": [0] }, { "name": "cap", "nodes": [0, 1] } ],
        "nodes": [ { "name": "brim", "mesh": 0 }, { "name": "crown", "mesh": 1 } ],
        "meshes": [ { "name": "brim", "primitives": [ {} ] }, { "primitives": [ {}, {} ] } ],
        "materials": [ { "name": "felt" } ]
    }"#;

    #[test]
    fn test_gltf_json_asset_set() {
        let assets = decode("cap.gltf", CAP.as_bytes()).unwrap();
        assert_eq!(assets.len(), 5);
        assert!(matches!(&assets[0], Asset::Mesh(m) if m.primitive_count == 1));
        assert!(matches!(&assets[1], Asset::Mesh(m) if m.primitive_count == 2));
        assert!(matches!(&assets[2], Asset::Material(m) if m.name.as_deref() == Some("felt")));

        // default scene is listed first
        let prefab = assets[3].as_prefab().unwrap();
        assert_eq!(prefab.name.as_deref(), Some("cap"));
        assert_eq!(prefab.root_nodes, 2);
        assert_eq!(prefab.resource, "cap.gltf");
    }

    #[test]
    fn test_glb_container() {
        let glb = encode_glb(CAP.as_bytes());
        assert!(is_glb(&glb));
        assert_eq!(glb.len() % 4, 0);
        let assets = decode("cap.glb", &glb).unwrap();
        assert_eq!(assets.iter().filter(|a| a.as_prefab().is_some()).count(), 2);
    }

    #[test]
    fn test_sceneless_document() {
        let json = r#"{ "asset": { "version": "2.0" }, "nodes": [ {}, {} ] }"#;
        let assets = decode("loose.gltf", json.as_bytes()).unwrap();
        assert_eq!(assets.len(), 1);
        assert_eq!(assets[0].as_prefab().unwrap().root_nodes, 2);

        let empty = r#"{ "asset": { "version": "2.0" } }"#;
        assert!(decode("empty.gltf", empty.as_bytes()).unwrap().is_empty());
    }

    #[test]
    fn test_rejects_bad_payloads() {
        assert!(matches!(decode("x.glb", b"not a model"), Err(AssetError::Decode { .. })));

        let old = r#"{ "asset": { "version": "1.0" }, "nodes": [ {} ] }"#;
        assert!(decode("old.gltf", old.as_bytes()).is_err());

        let mut glb = encode_glb(CAP.as_bytes());
        glb.truncate(30);
        assert!(matches!(decode("cut.glb", &glb), Err(AssetError::Decode { .. })));

        let mut wrong_version = encode_glb(CAP.as_bytes());
        wrong_version[4] = 1;
        assert!(decode("v1.glb", &wrong_version).is_err());
    }
}

//! Hat model loading
//!
//! An [`AssetSource`] turns a resource name into the set of assets contained in
//! that resource. The preloader keeps the first prefab of each set, keyed by
//! hat id, in a [`PrefabTable`].

use std::path::PathBuf;
use thiserror::Error;
use uuid::Uuid;

pub mod cache;
pub mod gltf;
pub mod manager;
pub mod preload;
pub mod source;

pub use cache::PrefabTable;
pub use manager::AssetSource;
pub use preload::{preload, PreloadFailure, PreloadReport};
pub use source::{asset_source_for, FileAssetSource, HttpAssetSource};

#[derive(Debug, Error)]
pub enum AssetError {
    #[error("Failed to read asset {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Request for {url} failed: {reason}")]
    Http { url: String, reason: String },

    #[error("Cannot build a URL for {resource}: {reason}")]
    InvalidUrl { resource: String, reason: String },

    #[error("Failed to decode {resource}: {reason}")]
    Decode { resource: String, reason: String },

    #[error("No prefab found in {resource}")]
    NoPrefab { resource: String },

    #[error("Load task for {resource} did not finish: {reason}")]
    Task { resource: String, reason: String },
}

pub type AssetResult<T> = Result<T, AssetError>;

/// Loaded model that can be instantiated as an actor
#[derive(Debug, Clone, PartialEq)]
pub struct Prefab {
    pub id: Uuid,
    /// Resource the prefab was loaded from
    pub resource: String,
    pub name: Option<String>,
    /// Number of root nodes in the prefab's scene
    pub root_nodes: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MeshAsset {
    pub id: Uuid,
    pub name: Option<String>,
    pub primitive_count: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MaterialAsset {
    pub id: Uuid,
    pub name: Option<String>,
}

/// One item of a loaded resource
#[derive(Debug, Clone, PartialEq)]
pub enum Asset {
    Mesh(MeshAsset),
    Material(MaterialAsset),
    Prefab(Prefab),
}

impl Asset {
    pub fn as_prefab(&self) -> Option<&Prefab> {
        match self {
            Asset::Prefab(prefab) => Some(prefab),
            _ => None,
        }
    }
}

/// First prefab in a loaded asset set
pub fn first_prefab(assets: Vec<Asset>) -> Option<Prefab> {
    assets.into_iter().find_map(|asset| match asset {
        Asset::Prefab(prefab) => Some(prefab),
        _ => None,
    })
}

//! Hat catalog
//!
//! The hat database is a JSON object mapping hat ids to descriptors. Key order
//! in the file is the order hats appear in the menu, so the catalog keeps the
//! entries as an ordered list with a side index for lookups.

use serde::de::{Deserializer, MapAccess, Visitor};
use serde::Deserialize;
use std::collections::HashMap;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info};

pub mod descriptor;

pub use descriptor::{HatDescriptor, HatId, HatTransform};
use descriptor::RawHatEntry;

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("Failed to read hat catalog {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Hat catalog is malformed: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Hat '{hat_id}' is declared more than once")]
    DuplicateHat { hat_id: HatId },

    #[error("Hat '{hat_id}' has a resource but no {field}")]
    MissingTransform { hat_id: HatId, field: &'static str },
}

pub type CatalogResult<T> = Result<T, CatalogError>;

/// Read-only, ordered mapping from hat id to descriptor
#[derive(Debug, Clone, Default)]
pub struct HatCatalog {
    entries: Vec<(HatId, HatDescriptor)>,
    index: HashMap<HatId, usize>,
}

impl HatCatalog {
    /// Build a catalog from entries in display order
    pub fn new(entries: Vec<(HatId, HatDescriptor)>) -> CatalogResult<Self> {
        let mut index = HashMap::with_capacity(entries.len());
        for (position, (hat_id, _)) in entries.iter().enumerate() {
            if index.insert(hat_id.clone(), position).is_some() {
                return Err(CatalogError::DuplicateHat { hat_id: hat_id.clone() });
            }
        }
        Ok(Self { entries, index })
    }

    /// Parse a catalog from the JSON hat database
    pub fn from_json(json: &str) -> CatalogResult<Self> {
        let raw: RawCatalog = serde_json::from_str(json)?;
        let entries = raw
            .0
            .into_iter()
            .map(|(hat_id, entry)| {
                let descriptor = entry.into_descriptor(&hat_id)?;
                Ok((hat_id, descriptor))
            })
            .collect::<CatalogResult<Vec<_>>>()?;
        Self::new(entries)
    }

    /// Load the hat database from disk
    pub fn load(path: impl AsRef<Path>) -> CatalogResult<Self> {
        let path = path.as_ref();
        let json = fs::read_to_string(path).map_err(|source| CatalogError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let catalog = Self::from_json(&json)?;
        info!("🎩 Loaded {} hats from {}", catalog.len(), path.display());
        for (hat_id, descriptor) in catalog.iter() {
            debug!(
                "   {} -> '{}' ({})",
                hat_id,
                descriptor.display_name,
                descriptor.resource().unwrap_or("no model")
            );
        }
        Ok(catalog)
    }

    pub fn get(&self, hat_id: &HatId) -> Option<&HatDescriptor> {
        self.index.get(hat_id).map(|&position| &self.entries[position].1)
    }

    pub fn contains(&self, hat_id: &HatId) -> bool {
        self.index.contains_key(hat_id)
    }

    /// Entries in display order
    pub fn iter(&self) -> impl Iterator<Item = (&HatId, &HatDescriptor)> {
        self.entries.iter().map(|(hat_id, descriptor)| (hat_id, descriptor))
    }

    /// Entries that have a model to load
    pub fn with_resources(&self) -> impl Iterator<Item = (&HatId, &str)> {
        self.iter()
            .filter_map(|(hat_id, descriptor)| descriptor.resource().map(|resource| (hat_id, resource)))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// JSON object read as a list so that key order survives
struct RawCatalog(Vec<(HatId, RawHatEntry)>);

impl<'de> Deserialize<'de> for RawCatalog {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct CatalogVisitor;

        impl<'de> Visitor<'de> for CatalogVisitor {
            type Value = RawCatalog;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("an object mapping hat ids to hat descriptors")
            }

            fn visit_map<A>(self, mut map: A) -> Result<Self::Value, A::Error>
            where
                A: MapAccess<'de>,
            {
                let mut entries = Vec::with_capacity(map.size_hint().unwrap_or(0));
                while let Some((hat_id, entry)) = map.next_entry::<HatId, RawHatEntry>()? {
                    entries.push((hat_id, entry));
                }
                Ok(RawCatalog(entries))
            }
        }

        deserializer.deserialize_map(CatalogVisitor)
    }
}

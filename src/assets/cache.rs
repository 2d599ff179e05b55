use super::Prefab;
use crate::catalog::HatId;
use std::collections::HashMap;

/// Loaded prefabs keyed by hat id.
///
/// Filled during preload and read-only afterwards. Hats without a model, and
/// hats whose load failed, never have an entry.
#[derive(Debug, Clone, Default)]
pub struct PrefabTable {
    prefabs: HashMap<HatId, Prefab>,
}

impl PrefabTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, hat_id: &HatId) -> Option<&Prefab> {
        self.prefabs.get(hat_id)
    }

    pub fn insert(&mut self, hat_id: HatId, prefab: Prefab) -> Option<Prefab> {
        self.prefabs.insert(hat_id, prefab)
    }

    pub fn contains(&self, hat_id: &HatId) -> bool {
        self.prefabs.contains_key(hat_id)
    }

    pub fn len(&self) -> usize {
        self.prefabs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.prefabs.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&HatId, &Prefab)> {
        self.prefabs.iter()
    }
}

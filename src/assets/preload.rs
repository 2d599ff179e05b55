//! Preloading of hat models
//!
//! Every hat with a model gets its own load task; the preload only returns
//! once all of them have settled. A failed load is recorded and logged but
//! never aborts the other loads.

use super::{first_prefab, AssetError, AssetResult, AssetSource, PrefabTable, Prefab};
use crate::catalog::{HatCatalog, HatId};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::task::{self, JoinSet};
use tracing::{debug, error, info};

/// A hat whose model could not be loaded
#[derive(Debug)]
pub struct PreloadFailure {
    pub hat_id: HatId,
    pub resource: String,
    pub error: AssetError,
}

/// Outcome of a preload
#[derive(Debug, Default)]
pub struct PreloadReport {
    pub prefabs: PrefabTable,
    pub failures: Vec<PreloadFailure>,
    /// Hats without a model
    pub skipped: Vec<HatId>,
}

impl PreloadReport {
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }

    pub fn failed(&self, hat_id: &HatId) -> bool {
        self.failures.iter().any(|failure| &failure.hat_id == hat_id)
    }
}

/// Load the first prefab of every hat model in `catalog`
pub async fn preload(catalog: &HatCatalog, source: Arc<dyn AssetSource>) -> PreloadReport {
    let mut report = PreloadReport::default();
    let mut tasks = JoinSet::new();
    let mut pending: HashMap<task::Id, (HatId, String)> = HashMap::new();

    for (hat_id, descriptor) in catalog.iter() {
        if descriptor.resource().is_none() {
            debug!("⏭️ {} has no model", hat_id);
            report.skipped.push(hat_id.clone());
        }
    }

    for (hat_id, resource) in catalog.with_resources() {
        let source = Arc::clone(&source);
        let task_resource = resource.to_string();
        let handle = tasks.spawn(async move { load_prefab(source.as_ref(), &task_resource).await });
        pending.insert(handle.id(), (hat_id.clone(), resource.to_string()));
    }

    info!("📦 Preloading {} hat models from {}", tasks.len(), source.describe());

    while let Some(joined) = tasks.join_next_with_id().await {
        let (task_id, result) = match joined {
            Ok((task_id, result)) => (task_id, result),
            Err(join_error) => {
                let task_id = join_error.id();
                let reason = join_error.to_string();
                let resource = pending.get(&task_id).map(|(_, r)| r.clone()).unwrap_or_default();
                (task_id, Err(AssetError::Task { resource, reason }))
            }
        };
        let Some((hat_id, resource)) = pending.remove(&task_id) else {
            continue;
        };
        match result {
            Ok(prefab) => {
                debug!("✅ Loaded {} from {}", hat_id, resource);
                report.prefabs.insert(hat_id, prefab);
            }
            Err(error) => {
                error!("❌ Failed to load {} ({}): {}", hat_id, resource, error);
                report.failures.push(PreloadFailure { hat_id, resource, error });
            }
        }
    }

    info!(
        "📦 Preload finished: {} loaded, {} failed, {} without model",
        report.prefabs.len(),
        report.failures.len(),
        report.skipped.len()
    );
    report
}

async fn load_prefab(source: &dyn AssetSource, resource: &str) -> AssetResult<Prefab> {
    let assets = source.load(resource).await?;
    first_prefab(assets).ok_or_else(|| AssetError::NoPrefab {
        resource: resource.to_string(),
    })
}

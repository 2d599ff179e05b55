use super::{Asset, AssetResult};
use async_trait::async_trait;

/// Where hat models come from
#[async_trait]
pub trait AssetSource: Send + Sync {
    /// Load every asset contained in `resource`
    async fn load(&self, resource: &str) -> AssetResult<Vec<Asset>>;

    /// Human readable location, for logs
    fn describe(&self) -> String;
}

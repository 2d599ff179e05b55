//! Asset sources backed by a directory or an HTTP server

use super::{gltf, Asset, AssetError, AssetResult, AssetSource};
use async_trait::async_trait;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::debug;
use url::Url;

/// Reads models from a directory on disk
#[derive(Debug, Clone)]
pub struct FileAssetSource {
    root: PathBuf,
}

impl FileAssetSource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

#[async_trait]
impl AssetSource for FileAssetSource {
    async fn load(&self, resource: &str) -> AssetResult<Vec<Asset>> {
        let path = self.root.join(resource);
        debug!("📂 Reading {}", path.display());
        let bytes = tokio::fs::read(&path)
            .await
            .map_err(|source| AssetError::Io { path: path.clone(), source })?;
        gltf::decode(resource, &bytes)
    }

    fn describe(&self) -> String {
        self.root.display().to_string()
    }
}

/// Fetches models relative to a base URL
#[derive(Debug, Clone)]
pub struct HttpAssetSource {
    base_url: Url,
    client: reqwest::Client,
}

impl HttpAssetSource {
    pub fn new(mut base_url: Url) -> Self {
        // Url::join replaces the last segment unless the path ends with '/'
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }
        Self {
            base_url,
            client: reqwest::Client::new(),
        }
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// URL of `resource` under the base URL
    pub fn resolve(&self, resource: &str) -> AssetResult<Url> {
        self.base_url
            .join(resource)
            .map_err(|e| AssetError::InvalidUrl {
                resource: resource.to_string(),
                reason: e.to_string(),
            })
    }
}

#[async_trait]
impl AssetSource for HttpAssetSource {
    async fn load(&self, resource: &str) -> AssetResult<Vec<Asset>> {
        let url = self.resolve(resource)?;
        debug!("🌐 Fetching {}", url);

        let http_error = |e: reqwest::Error| AssetError::Http {
            url: url.to_string(),
            reason: e.to_string(),
        };
        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(http_error)?
            .error_for_status()
            .map_err(http_error)?;
        let bytes = response.bytes().await.map_err(http_error)?;

        gltf::decode(resource, &bytes)
    }

    fn describe(&self) -> String {
        self.base_url.to_string()
    }
}

/// Pick a source for `base`: `http(s)://` URLs are fetched, anything else is a directory.
pub fn asset_source_for(base: &str) -> AssetResult<Arc<dyn AssetSource>> {
    if base.starts_with("http://") || base.starts_with("https://") {
        let url = Url::parse(base).map_err(|e| AssetError::InvalidUrl {
            resource: base.to_string(),
            reason: e.to_string(),
        })?;
        Ok(Arc::new(HttpAssetSource::new(url)))
    } else {
        Ok(Arc::new(FileAssetSource::new(base)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_keeps_base_path() {
        let source = HttpAssetSource::new(Url::parse("https://hats.example.com/public").unwrap());
        assert_eq!(source.base_url().as_str(), "https://hats.example.com/public/");
        assert_eq!(
            source.resolve("tophat.glb").unwrap().as_str(),
            "https://hats.example.com/public/tophat.glb"
        );
        assert_eq!(
            source.resolve("models/cap.glb").unwrap().as_str(),
            "https://hats.example.com/public/models/cap.glb"
        );
    }

    #[test]
    fn test_source_selection() {
        assert!(asset_source_for("http://localhost:3901/").unwrap().describe().starts_with("http://"));
        assert_eq!(asset_source_for("public").unwrap().describe(), "public");
        assert!(matches!(asset_source_for("http://[::1"), Err(AssetError::InvalidUrl { .. })));
    }

    #[tokio::test]
    async fn test_file_source_reads_gltf() {
        let dir = tempfile::tempdir().unwrap();
        let json = r#"{ "asset": { "version": "2.0" }, "scenes": [ { "nodes": [0] } ], "nodes": [ {} ] }"#;
        std::fs::write(dir.path().join("cap.glb"), gltf::encode_glb(json.as_bytes())).unwrap();

        let source = FileAssetSource::new(dir.path());
        let assets = source.load("cap.glb").await.unwrap();
        assert_eq!(assets.len(), 1);
        assert_eq!(assets[0].as_prefab().unwrap().resource, "cap.glb");

        let missing = source.load("nope.glb").await.unwrap_err();
        assert!(matches!(missing, AssetError::Io { .. }));
    }
}

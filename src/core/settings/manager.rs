//! Settings manager for the remembered compression URL
//!
//! This module provides the SettingsManager for loading and saving the
//! compression endpoint through an injected [`SettingsStore`].

use crate::adapters::traits::SettingsStore;
use crate::domain::Result;
use std::sync::Arc;

/// Storage key of the remembered compression service URL
pub const COMPRESS_SERVICE_URL_KEY: &str = "compressServiceUrl";

/// Endpoint offered when nothing was ever remembered
pub const DEFAULT_COMPRESS_SERVICE_URL: &str = "http://localhost:8765/compress";

/// Settings manager
pub struct SettingsManager {
    storage: Arc<dyn SettingsStore>,
    default_compress_url: String,
}

impl SettingsManager {
    /// Create a new SettingsManager over a storage backend
    ///
    /// # Arguments
    ///
    /// * `storage` - Settings storage implementation
    /// * `default_compress_url` - Value returned by [`get_config`](Self::get_config)
    ///   when nothing was persisted
    pub fn new(storage: Arc<dyn SettingsStore>, default_compress_url: impl Into<String>) -> Self {
        Self {
            storage,
            default_compress_url: default_compress_url.into(),
        }
    }

    /// Answer a `getConfig` request
    ///
    /// Returns the last persisted compression URL, or the default when none
    /// (or an empty one) was persisted. A storage read failure is logged and
    /// also yields the default.
    pub async fn get_config(&self) -> String {
        match self.storage.get(COMPRESS_SERVICE_URL_KEY).await {
            Ok(Some(url)) if !url.trim().is_empty() => url,
            Ok(_) => self.default_compress_url.clone(),
            Err(e) => {
                tracing::warn!(
                    error = %e,
                    "Failed to read remembered compression URL, using default"
                );
                self.default_compress_url.clone()
            }
        }
    }

    /// Remember a compression URL for later batches
    ///
    /// Blank values are ignored.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage write fails.
    pub async fn remember_compress_url(&self, url: &str) -> Result<()> {
        let url = url.trim();
        if url.is_empty() {
            return Ok(());
        }

        tracing::debug!(url = %url, "Remembering compression service URL");
        self.storage.set(COMPRESS_SERVICE_URL_KEY, url).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::settings::MemorySettingsStore;
    use crate::domain::LayerExportError;
    use async_trait::async_trait;

    struct BrokenStore;

    #[async_trait]
    impl SettingsStore for BrokenStore {
        async fn get(&self, _key: &str) -> Result<Option<String>> {
            Err(LayerExportError::Settings("unreadable".to_string()))
        }

        async fn set(&self, _key: &str, _value: &str) -> Result<()> {
            Err(LayerExportError::Settings("read-only".to_string()))
        }
    }

    fn manager() -> SettingsManager {
        SettingsManager::new(
            Arc::new(MemorySettingsStore::new()),
            DEFAULT_COMPRESS_SERVICE_URL,
        )
    }

    #[tokio::test]
    async fn test_get_config_defaults_when_unset() {
        assert_eq!(manager().get_config().await, DEFAULT_COMPRESS_SERVICE_URL);
    }

    #[tokio::test]
    async fn test_remember_then_get_config() {
        let manager = manager();
        manager
            .remember_compress_url(" http://svc:9000/compress ")
            .await
            .unwrap();
        assert_eq!(manager.get_config().await, "http://svc:9000/compress");
    }

    #[tokio::test]
    async fn test_blank_url_not_remembered() {
        let manager = manager();
        manager.remember_compress_url("http://a").await.unwrap();
        manager.remember_compress_url("   ").await.unwrap();
        assert_eq!(manager.get_config().await, "http://a");
    }

    #[tokio::test]
    async fn test_empty_persisted_value_yields_default() {
        let store = Arc::new(MemorySettingsStore::new());
        store.set(COMPRESS_SERVICE_URL_KEY, "").await.unwrap();
        let manager = SettingsManager::new(store, "http://fallback");
        assert_eq!(manager.get_config().await, "http://fallback");
    }

    #[tokio::test]
    async fn test_read_failure_yields_default() {
        let manager = SettingsManager::new(Arc::new(BrokenStore), "http://fallback");
        assert_eq!(manager.get_config().await, "http://fallback");
        assert!(manager.remember_compress_url("http://x").await.is_err());
    }
}

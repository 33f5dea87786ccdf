//! Content synchronization: local cache, remote provider and the store that
//! reconciles them.

pub mod cache;
pub mod provider;
pub mod store;

use std::sync::Arc;

pub use cache::{CacheSlot, LocalCache};
pub use provider::{ContentProvider, HttpProvider, OfflineProvider};
pub use store::{ContentStore, LoadReport, LoadSource, PersistOutcome};

use crate::config::ClientConfig;
use crate::error::ProviderError;

/// Build a store for the given configuration. Call [`ContentStore::load`]
/// before handing it to the renderer or an admin session.
pub fn open_store(config: &ClientConfig) -> Result<Arc<ContentStore>, ProviderError> {
    let provider = provider::from_config(config)?;
    let cache = LocalCache::new(config.cache_dir.clone());
    Ok(Arc::new(ContentStore::new(provider, cache)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_open_store_without_api_runs_from_cache() {
        let dir = tempfile::tempdir().unwrap();
        let config = ClientConfig {
            api_url: None,
            cache_dir: dir.path().to_path_buf(),
            ..ClientConfig::default()
        };
        let store = open_store(&config).unwrap();

        let report = store.load().await;
        assert_eq!(report.content, LoadSource::Defaults);

        let outcome = store
            .persist(store.content(), store.projects(), "admin123")
            .await;
        assert_eq!(outcome, PersistOutcome::LocalOnly(ProviderError::Unconfigured));
        assert!(dir.path().join("content.json").exists());
    }
}

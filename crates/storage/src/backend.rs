use std::path::{Path, PathBuf};
use std::sync::Arc;

use object_store::azure::MicrosoftAzureBuilder;
use object_store::local::LocalFileSystem;
use object_store::ObjectStore;
use tracing::info;

use docqa_core::config::BlobConfig;

use crate::error::StorageError;

/// Unified blob backend wrapping object_store.
pub enum StorageBackend {
    Local(LocalBackend),
    Azure(AzureBackend),
}

impl StorageBackend {
    /// Azure when a storage account is configured, the local directory otherwise.
    pub fn from_config(config: &BlobConfig) -> Result<Self, StorageError> {
        if config.is_configured() {
            Ok(StorageBackend::Azure(AzureBackend::new(config)?))
        } else {
            std::fs::create_dir_all(&config.local_dir)?;
            Ok(StorageBackend::Local(LocalBackend::new(&config.local_dir)?))
        }
    }

    /// Get an Arc-wrapped ObjectStore.
    pub fn store_arc(&self) -> Arc<dyn ObjectStore> {
        match self {
            StorageBackend::Local(b) => b.store.clone(),
            StorageBackend::Azure(b) => b.store.clone(),
        }
    }

    pub fn is_remote(&self) -> bool {
        matches!(self, StorageBackend::Azure(_))
    }

    /// Human-readable location for logs.
    pub fn describe(&self) -> String {
        match self {
            StorageBackend::Local(b) => b.data_dir.display().to_string(),
            StorageBackend::Azure(b) => format!("azure://{}/{}", b.account, b.container),
        }
    }
}

/// Local directory acting as the blob container.
pub struct LocalBackend {
    pub store: Arc<dyn ObjectStore>,
    pub data_dir: PathBuf,
}

impl LocalBackend {
    pub fn new(data_dir: &Path) -> Result<Self, StorageError> {
        let canonical = std::fs::canonicalize(data_dir).unwrap_or_else(|_| data_dir.to_path_buf());
        let store = LocalFileSystem::new_with_prefix(&canonical)
            .map_err(|e| StorageError::Other(format!("local filesystem error: {e}")))?;
        info!("Blob storage: local backend at {}", canonical.display());
        Ok(Self {
            store: Arc::new(store),
            data_dir: canonical,
        })
    }
}

/// Azure Blob Storage container, authenticated with the account key.
pub struct AzureBackend {
    pub store: Arc<dyn ObjectStore>,
    pub account: String,
    pub container: String,
}

impl AzureBackend {
    pub fn new(config: &BlobConfig) -> Result<Self, StorageError> {
        let account = config
            .account
            .as_deref()
            .ok_or_else(|| StorageError::NotConfigured("STORAGE_ACCOUNT not set".into()))?;
        let key = config
            .access_key
            .as_deref()
            .ok_or_else(|| StorageError::NotConfigured("STORAGE_KEY not set".into()))?;

        let store = MicrosoftAzureBuilder::new()
            .with_account(account)
            .with_access_key(key)
            .with_container_name(&config.container)
            .build()?;

        info!(
            "Blob storage: azure backend https://{}.blob.core.windows.net/{}",
            account, config.container
        );

        Ok(Self {
            store: Arc::new(store),
            account: account.to_string(),
            container: config.container.clone(),
        })
    }
}

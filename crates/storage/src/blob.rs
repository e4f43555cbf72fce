use std::sync::Arc;

use async_trait::async_trait;
use bytes::Bytes;
use futures::TryStreamExt;
use object_store::path::Path as ObjectPath;
use object_store::{ObjectStore, PutPayload};
use tracing::{debug, info};

use crate::backend::StorageBackend;
use crate::error::StorageError;

/// Where original documents are kept, keyed by blob name.
#[async_trait]
pub trait BlobStore: Send + Sync {
    /// Upload `data` under `name`, replacing any existing blob.
    async fn upload(&self, name: &str, data: Bytes) -> Result<(), StorageError>;

    /// Delete the blob. Returns `false` when it did not exist.
    async fn delete(&self, name: &str) -> Result<bool, StorageError>;

    /// Delete every blob in the store. Returns how many were removed.
    async fn delete_all(&self) -> Result<usize, StorageError>;
}

/// `BlobStore` over any object_store backend.
pub struct ObjectBlobStore {
    store: Arc<dyn ObjectStore>,
    location: String,
}

impl ObjectBlobStore {
    pub fn new(backend: &StorageBackend) -> Self {
        Self {
            store: backend.store_arc(),
            location: backend.describe(),
        }
    }

    pub fn location(&self) -> &str {
        &self.location
    }
}

#[async_trait]
impl BlobStore for ObjectBlobStore {
    async fn upload(&self, name: &str, data: Bytes) -> Result<(), StorageError> {
        let path = ObjectPath::from(name);
        let size = data.len();
        self.store.put(&path, PutPayload::from(data)).await?;
        info!("Uploaded blob {} ({} bytes) to {}", name, size, self.location);
        Ok(())
    }

    async fn delete(&self, name: &str) -> Result<bool, StorageError> {
        let path = ObjectPath::from(name);
        match self.store.delete(&path).await {
            Ok(()) => {
                info!("Removed blob {} from {}", name, self.location);
                Ok(true)
            }
            Err(object_store::Error::NotFound { .. }) => {
                debug!("Blob {} not present in {}", name, self.location);
                Ok(false)
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn delete_all(&self) -> Result<usize, StorageError> {
        let objects: Vec<_> = self.store.list(None).try_collect().await?;
        let mut removed = 0;
        for meta in objects {
            match self.store.delete(&meta.location).await {
                Ok(()) => removed += 1,
                Err(object_store::Error::NotFound { .. }) => {}
                Err(e) => return Err(e.into()),
            }
        }
        info!("Removed {} blobs from {}", removed, self.location);
        Ok(removed)
    }
}

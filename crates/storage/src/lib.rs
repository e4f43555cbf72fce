//! Blob storage for original documents.

pub mod backend;
pub mod blob;
pub mod error;

pub use backend::{AzureBackend, LocalBackend, StorageBackend};
pub use blob::{BlobStore, ObjectBlobStore};
pub use error::StorageError;

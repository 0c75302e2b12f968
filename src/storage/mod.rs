//! Object storage access and local scratch handling.
//!
//! `ObjectStore` abstracts the bucket service so the pipeline and the batch
//! OCR path can run against Google Cloud Storage in production and an
//! in-memory store in tests.

mod fetch;
mod gcs;
mod memory;
mod scratch;

pub use fetch::{ContentAccess, ContentSource, RemoteFetcher};
pub use gcs::GcsStore;
pub use memory::MemoryStore;
pub use scratch::ScratchFile;

use async_trait::async_trait;
use thiserror::Error;

use crate::models::ObjectUri;

/// Errors from the object storage service.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Object not found: {0}")]
    NotFound(String),

    #[error("Storage request failed: {0}")]
    Request(String),

    #[error("Unexpected storage response: {0}")]
    InvalidResponse(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Bucket service used for fetching inputs and staging batch jobs.
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Size of an object in bytes.
    async fn size(&self, uri: &ObjectUri) -> Result<u64, StorageError>;

    /// Full contents of an object.
    async fn download(&self, uri: &ObjectUri) -> Result<Vec<u8>, StorageError>;

    /// Create or replace an object.
    async fn upload(
        &self,
        uri: &ObjectUri,
        content: Vec<u8>,
        content_type: &str,
    ) -> Result<(), StorageError>;

    /// Create the bucket if it does not exist yet.
    async fn ensure_bucket(&self, bucket: &str) -> Result<(), StorageError>;

    /// Names of objects in `bucket` starting with `prefix`.
    async fn list(&self, bucket: &str, prefix: &str) -> Result<Vec<String>, StorageError>;
}

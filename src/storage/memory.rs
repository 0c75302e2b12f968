//! In-process object store.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::Mutex;

use async_trait::async_trait;

use super::{ObjectStore, StorageError};
use crate::models::ObjectUri;

/// Object store backed by a map, for tests and offline runs.
#[derive(Debug, Default)]
pub struct MemoryStore {
    objects: Mutex<BTreeMap<(String, String), Vec<u8>>>,
    buckets: Mutex<BTreeSet<String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed an object (creating its bucket).
    pub fn insert(&self, uri: &ObjectUri, content: impl Into<Vec<u8>>) {
        self.lock_buckets().insert(uri.bucket.clone());
        self.lock_objects()
            .insert((uri.bucket.clone(), uri.name.clone()), content.into());
    }

    pub fn contains(&self, uri: &ObjectUri) -> bool {
        self.lock_objects()
            .contains_key(&(uri.bucket.clone(), uri.name.clone()))
    }

    pub fn has_bucket(&self, bucket: &str) -> bool {
        self.lock_buckets().contains(bucket)
    }

    fn lock_objects(&self) -> std::sync::MutexGuard<'_, BTreeMap<(String, String), Vec<u8>>> {
        self.objects.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn lock_buckets(&self) -> std::sync::MutexGuard<'_, BTreeSet<String>> {
        self.buckets.lock().unwrap_or_else(|e| e.into_inner())
    }
}

#[async_trait]
impl ObjectStore for MemoryStore {
    async fn size(&self, uri: &ObjectUri) -> Result<u64, StorageError> {
        self.lock_objects()
            .get(&(uri.bucket.clone(), uri.name.clone()))
            .map(|c| c.len() as u64)
            .ok_or_else(|| StorageError::NotFound(uri.to_string()))
    }

    async fn download(&self, uri: &ObjectUri) -> Result<Vec<u8>, StorageError> {
        self.lock_objects()
            .get(&(uri.bucket.clone(), uri.name.clone()))
            .cloned()
            .ok_or_else(|| StorageError::NotFound(uri.to_string()))
    }

    async fn upload(
        &self,
        uri: &ObjectUri,
        content: Vec<u8>,
        _content_type: &str,
    ) -> Result<(), StorageError> {
        if !self.has_bucket(&uri.bucket) {
            return Err(StorageError::NotFound(format!("bucket {}", uri.bucket)));
        }
        self.lock_objects()
            .insert((uri.bucket.clone(), uri.name.clone()), content);
        Ok(())
    }

    async fn ensure_bucket(&self, bucket: &str) -> Result<(), StorageError> {
        self.lock_buckets().insert(bucket.to_string());
        Ok(())
    }

    async fn list(&self, bucket: &str, prefix: &str) -> Result<Vec<String>, StorageError> {
        Ok(self
            .lock_objects()
            .keys()
            .filter(|(b, name)| b == bucket && name.starts_with(prefix))
            .map(|(_, name)| name.clone())
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_roundtrip_and_listing() {
        let store = MemoryStore::new();
        let uri = ObjectUri::new("bkt", "output/deck/0.json");
        store.insert(&uri, b"{}".to_vec());
        store.insert(&ObjectUri::new("bkt", "input/deck.pdf"), b"%PDF".to_vec());

        assert_eq!(store.size(&uri).await.unwrap(), 2);
        assert_eq!(store.download(&uri).await.unwrap(), b"{}");
        assert_eq!(
            store.list("bkt", "output/").await.unwrap(),
            vec!["output/deck/0.json".to_string()]
        );
    }

    #[tokio::test]
    async fn test_upload_requires_bucket() {
        let store = MemoryStore::new();
        let uri = ObjectUri::new("scratch", "a.txt");
        assert!(store.upload(&uri, vec![1], "text/plain").await.is_err());

        store.ensure_bucket("scratch").await.unwrap();
        store.upload(&uri, vec![1], "text/plain").await.unwrap();
        assert!(store.contains(&uri));
    }

    #[tokio::test]
    async fn test_missing_object() {
        let store = MemoryStore::new();
        let err = store
            .size(&ObjectUri::new("bkt", "nope.pdf"))
            .await
            .unwrap_err();
        assert!(matches!(err, StorageError::NotFound(_)));
    }
}

use registrar_core::prelude::*;

use bytes::Bytes;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

#[derive(Clone, Default)]
pub struct MemoryContentStore {
    blobs: Arc<RwLock<HashMap<ContentAddress, Bytes>>>,
}

impl MemoryContentStore {
    pub async fn len(&self) -> usize {
        self.blobs.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.blobs.read().await.is_empty()
    }
}

impl ContentStore for MemoryContentStore {
    async fn upload(&self, data: Bytes) -> Result<ContentAddress, ContentError> {
        let address = ContentDigest::of(&data).to_address();
        self.blobs
            .write()
            .await
            .entry(address.clone())
            .or_insert(data);
        Ok(address)
    }

    async fn download(&self, address: &ContentAddress) -> Result<Bytes, ContentError> {
        self.blobs
            .read()
            .await
            .get(address)
            .cloned()
            .ok_or_else(|| ContentError::NotFound(address.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_upload_is_content_addressed() {
        let store = MemoryContentStore::default();

        let first = store.upload(Bytes::from_static(b"abc")).await.unwrap();
        let second = store.upload(Bytes::from_static(b"abc")).await.unwrap();
        assert_eq!(first, second);
        assert_eq!(store.len().await, 1);

        let data = store.download(&first).await.unwrap();
        assert_eq!(&data[..], b"abc");
    }

    #[tokio::test]
    async fn test_download_missing() {
        let store = MemoryContentStore::default();
        let address = ContentDigest::of(b"nothing").to_address();
        assert!(matches!(
            store.download(&address).await,
            Err(ContentError::NotFound(_))
        ));
    }
}

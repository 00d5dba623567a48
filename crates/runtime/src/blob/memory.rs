use async_trait::async_trait;
use dashmap::DashMap;

use super::{BlobStore, BlobUri};
use crate::error::{Error, Result};

/// In-process blob store keyed by the full URI.
#[derive(Debug, Default)]
pub struct MemoryBlobStore {
	objects: DashMap<String, String>,
}

impl MemoryBlobStore {
	pub fn new() -> Self {
		Self::default()
	}

	/// Seeds an object, bypassing the async trait.
	pub fn insert(&self, uri: &BlobUri, body: impl Into<String>) {
		self.objects.insert(uri.to_string(), body.into());
	}

	/// Synchronous lookup.
	pub fn try_get(&self, uri: &BlobUri) -> Option<String> {
		self.objects.get(&uri.to_string()).map(|r| r.value().clone())
	}

	pub fn len(&self) -> usize {
		self.objects.len()
	}

	pub fn is_empty(&self) -> bool {
		self.objects.is_empty()
	}
}

#[async_trait]
impl BlobStore for MemoryBlobStore {
	async fn get(&self, uri: &BlobUri) -> Result<String> {
		self.try_get(uri).ok_or_else(|| Error::BlobNotFound(uri.to_string()))
	}

	async fn put(&self, uri: &BlobUri, body: &str) -> Result<()> {
		self.insert(uri, body);
		Ok(())
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[tokio::test]
	async fn put_replaces_existing_object() {
		let store = MemoryBlobStore::new();
		let uri = BlobUri::parse("s3://bucket/key.json").unwrap();

		store.put(&uri, "first").await.unwrap();
		store.put(&uri, "second").await.unwrap();

		assert_eq!(store.get(&uri).await.unwrap(), "second");
		assert_eq!(store.len(), 1);
	}

	#[tokio::test]
	async fn get_of_unknown_key_fails() {
		let store = MemoryBlobStore::new();
		let uri = BlobUri::parse("s3://bucket/none.json").unwrap();
		assert!(matches!(store.get(&uri).await, Err(Error::BlobNotFound(_))));
	}
}

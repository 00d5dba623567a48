use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tracing::debug;

use super::{BlobStore, BlobUri};
use crate::error::{Error, Result};

/// Blob store backed by a local directory.
///
/// `scheme://bucket/key` maps to `<root>/bucket/key`; the scheme is ignored
/// so `s3://` locations can be served from disk on a single host.
#[derive(Debug, Clone)]
pub struct FileBlobStore {
	root: PathBuf,
}

impl FileBlobStore {
	pub fn new(root: impl Into<PathBuf>) -> Self {
		Self { root: root.into() }
	}

	pub fn root(&self) -> &Path {
		&self.root
	}

	/// Resolves `uri` to a path under the root, rejecting `..` key segments.
	///
	/// Bucket names are already plain directory names (see [`BlobUri::parse`]).
	pub fn path_for(&self, uri: &BlobUri) -> Result<PathBuf> {
		let mut path = self.root.join(uri.bucket());
		for segment in uri.key().split('/') {
			match segment {
				"" | "." => continue,
				".." => return Err(Error::InvalidBlobUri(uri.to_string())),
				s => path.push(s),
			}
		}
		Ok(path)
	}
}

#[async_trait]
impl BlobStore for FileBlobStore {
	async fn get(&self, uri: &BlobUri) -> Result<String> {
		let path = self.path_for(uri)?;
		debug!(%uri, path = %path.display(), "reading blob");
		match tokio::fs::read_to_string(&path).await {
			Ok(body) => Ok(body),
			Err(e) if e.kind() == std::io::ErrorKind::NotFound => Err(Error::BlobNotFound(uri.to_string())),
			Err(e) => Err(e.into()),
		}
	}

	async fn put(&self, uri: &BlobUri, body: &str) -> Result<()> {
		let path = self.path_for(uri)?;
		if let Some(parent) = path.parent() {
			tokio::fs::create_dir_all(parent).await?;
		}
		debug!(%uri, path = %path.display(), bytes = body.len(), "writing blob");
		tokio::fs::write(&path, body).await?;
		Ok(())
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[tokio::test]
	async fn put_then_get_round_trips_through_disk() {
		let dir = tempfile::tempdir().unwrap();
		let store = FileBlobStore::new(dir.path());
		let uri = BlobUri::parse("s3://bucket/nested/out.json").unwrap();

		store.put(&uri, "[1,2,3]").await.unwrap();

		assert!(dir.path().join("bucket/nested/out.json").exists());
		assert_eq!(store.get(&uri).await.unwrap(), "[1,2,3]");
	}

	#[tokio::test]
	async fn missing_object_is_not_found() {
		let dir = tempfile::tempdir().unwrap();
		let store = FileBlobStore::new(dir.path());
		let uri = BlobUri::parse("s3://bucket/missing.json").unwrap();

		assert!(matches!(store.get(&uri).await, Err(Error::BlobNotFound(_))));
	}

	#[test]
	fn parent_segments_are_rejected() {
		let store = FileBlobStore::new("/srv/blobs");
		let uri = BlobUri::parse("s3://bucket/../etc/passwd").unwrap();
		assert!(store.path_for(&uri).is_err());
	}

	#[test]
	fn parent_bucket_cannot_escape_the_root() {
		for escape in ["s3://../etc/passwd", "s3://./../etc/passwd", "s3://..\\etc/passwd"] {
			assert!(BlobUri::parse(escape).is_err(), "{escape} should be rejected");
		}

		let store = FileBlobStore::new("/srv/blobs");
		let uri = BlobUri::parse("s3://bucket/./nested/out.json").unwrap();
		assert_eq!(store.path_for(&uri).unwrap(), PathBuf::from("/srv/blobs/bucket/nested/out.json"));
	}
}

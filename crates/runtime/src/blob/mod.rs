//! Blob store side channel for oversized batch inputs and outputs.
//!
//! Objects are UTF-8 text (JSON in practice) addressed by
//! `scheme://bucket/key`. The core only ever reads a whole object or
//! replaces a whole object.

mod file;
mod memory;

use std::fmt;
use std::str::FromStr;

use async_trait::async_trait;

pub use file::FileBlobStore;
pub use memory::MemoryBlobStore;

use crate::error::{Error, Result};

/// Reserved prefix marking caller input as a blob reference.
pub const BLOB_URI_PREFIX: &str = "s3://";

/// Parsed `scheme://bucket/key` location.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct BlobUri {
	scheme: String,
	bucket: String,
	key: String,
}

impl BlobUri {
	/// Parses `uri`, requiring a scheme, a bucket and a non-empty key.
	///
	/// The bucket must be a single plain name: `.`, `..` and names containing
	/// a backslash are rejected.
	pub fn parse(uri: &str) -> Result<Self> {
		let invalid = || Error::InvalidBlobUri(uri.to_string());
		let (scheme, rest) = uri.split_once("://").ok_or_else(invalid)?;
		let (bucket, key) = rest.split_once('/').ok_or_else(invalid)?;
		if scheme.is_empty() || key.is_empty() || !is_plain_bucket(bucket) {
			return Err(invalid());
		}
		Ok(Self {
			scheme: scheme.to_string(),
			bucket: bucket.to_string(),
			key: key.to_string(),
		})
	}

	/// Returns true if `text` uses the reserved blob prefix.
	pub fn is_reference(text: &str) -> bool {
		text.starts_with(BLOB_URI_PREFIX)
	}

	pub fn scheme(&self) -> &str {
		&self.scheme
	}

	pub fn bucket(&self) -> &str {
		&self.bucket
	}

	pub fn key(&self) -> &str {
		&self.key
	}
}

fn is_plain_bucket(bucket: &str) -> bool {
	!matches!(bucket, "" | "." | "..") && !bucket.contains('\\')
}

impl fmt::Display for BlobUri {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}://{}/{}", self.scheme, self.bucket, self.key)
	}
}

impl FromStr for BlobUri {
	type Err = Error;

	fn from_str(s: &str) -> Result<Self> {
		Self::parse(s)
	}
}

/// Whole-object text storage.
#[async_trait]
pub trait BlobStore: Send + Sync {
	/// Reads the object at `uri`.
	async fn get(&self, uri: &BlobUri) -> Result<String>;

	/// Creates or replaces the object at `uri`.
	async fn put(&self, uri: &BlobUri, body: &str) -> Result<()>;
}

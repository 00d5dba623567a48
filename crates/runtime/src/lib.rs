//! Transport and control-plane collaborators for acsoap.
//!
//! The core library talks to the outside world through four seams:
//!
//! - [`SoapClient`] - HTTP POST of one envelope to a world server
//! - [`BlobStore`] - text objects addressed by `scheme://bucket/key`
//! - [`JobRunner`] - submit command lines to a host, poll until done
//! - [`HostResolver`] - logical server id to a running endpoint
//!
//! Each trait ships with a local implementation so the whole pipeline runs
//! without a cloud account: [`FileBlobStore`], [`MemoryBlobStore`],
//! [`ShellJobRunner`] and [`StaticHostResolver`].

pub mod blob;
mod error;
pub mod host;
pub mod job;
pub mod soap;

pub use blob::{BLOB_URI_PREFIX, BlobStore, BlobUri, FileBlobStore, MemoryBlobStore};
pub use error::{Error, Result};
pub use host::{HostResolver, HostStatus, StaticHostResolver};
pub use job::{JobHandle, JobRunner, JobSnapshot, JobStatus, ShellJobRunner};
pub use soap::SoapClient;

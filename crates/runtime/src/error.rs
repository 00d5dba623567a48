//! Error types for the acsoap runtime.

use thiserror::Error;

/// Result type alias for runtime operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised by the transport and control-plane collaborators.
#[derive(Debug, Error)]
pub enum Error {
	/// HTTP request to the SOAP port failed before a body was received.
	#[error("SOAP request to {target} failed: {source}")]
	Transport {
		/// `host:port` of the world server (credentials are never included).
		target: String,
		#[source]
		source: reqwest::Error,
	},

	/// The HTTP client could not be constructed.
	#[error("Failed to create HTTP client: {0}")]
	HttpClient(#[source] reqwest::Error),

	/// The response could not be read as a protocol outcome.
	#[error(transparent)]
	Protocol(#[from] acsoap_protocol::Error),

	/// A blob location was not of the form `scheme://bucket/key`.
	#[error("Invalid blob URI '{0}': expected scheme://bucket/key")]
	InvalidBlobUri(String),

	/// No object exists at the blob location.
	#[error("Blob not found: {0}")]
	BlobNotFound(String),

	/// The job runner has no record of the job.
	#[error("Unknown job: {0}")]
	UnknownJob(String),

	/// The job runner could not start a job.
	#[error("Failed to submit job to {endpoint}: {message}")]
	SubmitFailed { endpoint: String, message: String },

	/// The host table has no entry for the server id.
	#[error("Unknown server id: {0}")]
	UnknownServer(String),

	/// I/O error.
	#[error("I/O error: {0}")]
	Io(#[from] std::io::Error),
}

impl Error {
	/// Returns true if this error happened on the wire to the SOAP port.
	pub fn is_transport(&self) -> bool {
		matches!(self, Error::Transport { .. })
	}
}

//! Error types for GM command execution and remote dispatch.

use std::time::Duration;

use acsoap_protocol::{ProtocolOutcome, ProtocolRequest};
use thiserror::Error;

/// Result type alias for core operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors surfaced to callers of the executor, dispatcher and canned commands.
#[derive(Debug, Error)]
pub enum Error {
	/// A response or captured output could not be interpreted.
	#[error("Unrecognized response: {0}")]
	Format(String),

	/// A command ran but the server answered with a fault.
	#[error("GM command {:?} failed: {}", request.command, outcome.message)]
	CommandFailed {
		request: Box<ProtocolRequest>,
		outcome: Box<ProtocolOutcome>,
	},

	/// The SOAP port could not be reached.
	#[error(transparent)]
	Transport(acsoap_runtime::Error),

	/// The target host exists but is not running.
	#[error("Server {server_id:?} is not running")]
	HostNotRunning { server_id: String },

	/// The options cannot describe a valid dispatch.
	#[error("Configuration error: {0}")]
	Configuration(String),

	/// The remote job exited non-zero.
	#[error("Remote command exited with code {exit_code}; stdout: {stdout:?}, stderr: {stderr:?}")]
	RemoteExecution {
		exit_code: i32,
		stdout: String,
		stderr: String,
	},

	/// The remote job did not reach a terminal state in time.
	#[error("Job {job_id} did not finish within {waited:?}")]
	Timeout { job_id: String, waited: Duration },

	/// Caller input has an unsupported shape or is empty.
	#[error("Invalid input: {0}")]
	InvalidInput(String),

	/// Reading or writing the blob side channel failed.
	#[error("Blob store error: {0}")]
	Blob(#[source] acsoap_runtime::Error),

	/// Submitting or polling a remote job failed.
	#[error("Remote job error: {0}")]
	Job(#[source] acsoap_runtime::Error),

	/// Any other collaborator failure (host lookup, HTTP client setup).
	#[error(transparent)]
	Runtime(acsoap_runtime::Error),

	/// JSON encoding or decoding failed.
	#[error("JSON error: {0}")]
	Json(#[from] serde_json::Error),
}

impl Error {
	pub(crate) fn command_failed(request: &ProtocolRequest, outcome: &ProtocolOutcome) -> Self {
		Error::CommandFailed {
			request: Box::new(request.clone()),
			outcome: Box::new(outcome.clone()),
		}
	}

	pub(crate) fn blob(err: acsoap_runtime::Error) -> Self {
		match err {
			acsoap_runtime::Error::InvalidBlobUri(uri) => Error::InvalidInput(format!("invalid blob location {uri:?}")),
			other => Error::Blob(other),
		}
	}

	pub(crate) fn job(err: acsoap_runtime::Error) -> Self {
		Error::Job(err)
	}

	/// Returns true for [`Error::HostNotRunning`].
	pub fn is_host_not_running(&self) -> bool {
		matches!(self, Error::HostNotRunning { .. })
	}

	/// Returns true for [`Error::CommandFailed`].
	pub fn is_command_failed(&self) -> bool {
		matches!(self, Error::CommandFailed { .. })
	}
}

impl From<acsoap_protocol::Error> for Error {
	fn from(err: acsoap_protocol::Error) -> Self {
		match err {
			acsoap_protocol::Error::UnrecognizedResponse { body } => Error::Format(body),
			acsoap_protocol::Error::EmptyCommand => Error::InvalidInput("command must not be empty".into()),
			acsoap_protocol::Error::Json(e) => Error::Json(e),
		}
	}
}

impl From<acsoap_runtime::Error> for Error {
	fn from(err: acsoap_runtime::Error) -> Self {
		match err {
			acsoap_runtime::Error::Protocol(e) => e.into(),
			e @ acsoap_runtime::Error::Transport { .. } => Error::Transport(e),
			e @ (acsoap_runtime::Error::InvalidBlobUri(_) | acsoap_runtime::Error::BlobNotFound(_)) => Error::blob(e),
			e @ (acsoap_runtime::Error::UnknownJob(_) | acsoap_runtime::Error::SubmitFailed { .. }) => Error::Job(e),
			e => Error::Runtime(e),
		}
	}
}

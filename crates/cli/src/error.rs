use serde_json::json;
use thiserror::Error;

use crate::output::{CommandError, ErrorCode};

pub type Result<T> = std::result::Result<T, CliError>;

#[derive(Debug, Error)]
pub enum CliError {
	#[error(transparent)]
	Core(#[from] acsoap::Error),

	#[error("configuration error: {0:#}")]
	Config(#[from] anyhow::Error),

	#[error("invalid argument: {0}")]
	InvalidArgument(String),

	#[error(transparent)]
	Io(#[from] std::io::Error),

	#[error(transparent)]
	Json(#[from] serde_json::Error),
}

impl From<acsoap_runtime::Error> for CliError {
	fn from(err: acsoap_runtime::Error) -> Self {
		CliError::Core(err.into())
	}
}

impl CliError {
	/// Convert this error to a CommandError for structured output
	pub fn to_command_error(&self) -> CommandError {
		let (code, details) = match self {
			CliError::Core(err) => classify(err),
			CliError::Config(_) => (ErrorCode::ConfigurationError, None),
			CliError::InvalidArgument(_) => (ErrorCode::InvalidInput, None),
			CliError::Io(_) => (ErrorCode::IoError, None),
			CliError::Json(_) => (ErrorCode::FormatError, None),
		};
		CommandError {
			code,
			message: self.to_string(),
			details,
		}
	}
}

fn classify(err: &acsoap::Error) -> (ErrorCode, Option<serde_json::Value>) {
	use acsoap::Error;

	match err {
		Error::Format(_) | Error::Json(_) => (ErrorCode::FormatError, None),
		Error::CommandFailed { request, outcome } => (
			ErrorCode::CommandFailed,
			Some(json!({ "command": request.command, "message": outcome.message })),
		),
		Error::Transport(_) => (ErrorCode::TransportError, None),
		Error::HostNotRunning { server_id } => (ErrorCode::HostNotRunning, Some(json!({ "serverId": server_id }))),
		Error::Configuration(_) => (ErrorCode::ConfigurationError, None),
		Error::RemoteExecution {
			exit_code,
			stdout,
			stderr,
		} => (
			ErrorCode::RemoteExecutionFailed,
			Some(json!({ "exitCode": exit_code, "stdout": stdout, "stderr": stderr })),
		),
		Error::Timeout { job_id, waited } => (
			ErrorCode::Timeout,
			Some(json!({ "jobId": job_id, "waitedMs": waited.as_millis() as u64 })),
		),
		Error::InvalidInput(_) => (ErrorCode::InvalidInput, None),
		Error::Blob(_) => (ErrorCode::IoError, None),
		Error::Job(_) => (ErrorCode::RemoteExecutionFailed, None),
		Error::Runtime(acsoap_runtime::Error::UnknownServer(_)) => (ErrorCode::ConfigurationError, None),
		Error::Runtime(_) => (ErrorCode::InternalError, None),
	}
}

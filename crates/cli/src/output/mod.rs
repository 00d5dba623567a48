//! Result envelopes and stdout/stderr rendering.
//!
//! `remote` and `canned` wrap their data in an envelope:
//!
//! ```json
//! {
//!   "schemaVersion": 1,
//!   "ok": true,
//!   "command": "remote",
//!   "data": { ... },
//!   "timings": { "durationMs": 1234 }
//! }
//! ```
//!
//! `gm` and `batch-gm` instead print bare outcome records, one compact JSON
//! object per line; that stream is what a remote dispatch decodes.
//! Errors always go to stderr as `Error [CODE]: message`.


use std::io::{self, Write};
use std::time::{Duration, Instant};

use acsoap::{JobHandle, ProtocolOutcome};
use colored::Colorize;
use serde::{Deserialize, Serialize};

/// Current schema version for command output.
pub const SCHEMA_VERSION: u32 = 1;

/// Output format for enveloped results.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
	/// Pretty-printed JSON envelope
	#[default]
	Json,
	/// One compact JSON envelope per line
	Ndjson,
	/// Human-readable text
	Text,
}

/// Envelope returned by enveloped commands.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommandResult<T: Serialize> {
	#[serde(skip_serializing_if = "Option::is_none")]
	pub schema_version: Option<u32>,

	pub ok: bool,

	/// Command name (e.g., "remote", "canned")
	pub command: String,

	#[serde(skip_serializing_if = "Option::is_none")]
	pub data: Option<T>,

	#[serde(skip_serializing_if = "Option::is_none")]
	pub timings: Option<Timings>,
}

/// Error information printed to stderr for failed commands
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommandError {
	pub code: ErrorCode,

	pub message: String,

	/// Structured context, e.g. the remote job's exit code and output
	#[serde(skip_serializing_if = "Option::is_none")]
	pub details: Option<serde_json::Value>,
}

/// Stable error codes for scripts driving the CLI
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
	/// Response body was neither a result nor a fault
	FormatError,
	/// GM command answered with a fault
	CommandFailed,
	/// SOAP port unreachable
	TransportError,
	/// Target host is stopped
	HostNotRunning,
	/// Invalid flags or configuration
	ConfigurationError,
	/// Remote job exited non-zero
	RemoteExecutionFailed,
	/// Remote job did not finish in time
	Timeout,
	InvalidInput,
	IoError,
	InternalError,
}

impl std::fmt::Display for ErrorCode {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match self {
			ErrorCode::FormatError => write!(f, "FORMAT_ERROR"),
			ErrorCode::CommandFailed => write!(f, "COMMAND_FAILED"),
			ErrorCode::TransportError => write!(f, "TRANSPORT_ERROR"),
			ErrorCode::HostNotRunning => write!(f, "HOST_NOT_RUNNING"),
			ErrorCode::ConfigurationError => write!(f, "CONFIGURATION_ERROR"),
			ErrorCode::RemoteExecutionFailed => write!(f, "REMOTE_EXECUTION_FAILED"),
			ErrorCode::Timeout => write!(f, "TIMEOUT"),
			ErrorCode::InvalidInput => write!(f, "INVALID_INPUT"),
			ErrorCode::IoError => write!(f, "IO_ERROR"),
			ErrorCode::InternalError => write!(f, "INTERNAL_ERROR"),
		}
	}
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Timings {
	pub duration_ms: u64,
}

impl From<Duration> for Timings {
	fn from(duration: Duration) -> Self {
		Timings {
			duration_ms: duration.as_millis() as u64,
		}
	}
}

/// Builder for constructing command results
pub struct ResultBuilder<T: Serialize> {
	command: String,
	data: Option<T>,
	start_time: Instant,
}

impl<T: Serialize> ResultBuilder<T> {
	pub fn new(command: impl Into<String>) -> Self {
		Self {
			command: command.into(),
			data: None,
			start_time: Instant::now(),
		}
	}

	pub fn data(mut self, data: T) -> Self {
		self.data = Some(data);
		self
	}

	pub fn build(self) -> CommandResult<T> {
		CommandResult {
			schema_version: Some(SCHEMA_VERSION),
			ok: self.data.is_some(),
			command: self.command,
			data: self.data,
			timings: Some(Timings::from(self.start_time.elapsed())),
		}
	}
}

/// Result data for `remote`.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoteData {
	pub server_id: String,
	/// Set in async mode
	#[serde(skip_serializing_if = "Option::is_none")]
	pub job: Option<JobHandle>,
	/// Set in sync mode, in request order
	#[serde(skip_serializing_if = "Option::is_none")]
	pub outcomes: Option<Vec<ProtocolOutcome>>,
}

/// Print a command result to stdout in the specified format
pub fn print_result<T: Serialize>(result: &CommandResult<T>, format: OutputFormat) {
	match format {
		OutputFormat::Json => {
			if let Ok(json) = serde_json::to_string_pretty(result) {
				println!("{json}");
			}
		}
		OutputFormat::Ndjson => {
			if let Ok(json) = serde_json::to_string(result) {
				println!("{json}");
			}
		}
		OutputFormat::Text => print_result_text(result),
	}
}

fn print_result_text<T: Serialize>(result: &CommandResult<T>) {
	if let Some(ref data) = result.data {
		if let Ok(json) = serde_json::to_string_pretty(data) {
			let _ = writeln!(io::stdout().lock(), "{json}");
		}
	}
}

/// Print outcomes one compact JSON record per line.
pub fn print_outcome_lines(outcomes: &[ProtocolOutcome]) -> io::Result<()> {
	let mut stdout = io::stdout().lock();
	write_outcome_lines(&mut stdout, outcomes)?;
	stdout.flush()
}

pub(crate) fn write_outcome_lines(out: &mut impl Write, outcomes: &[ProtocolOutcome]) -> io::Result<()> {
	for outcome in outcomes {
		serde_json::to_writer(&mut *out, outcome)?;
		out.write_all(b"\n")?;
	}
	Ok(())
}

/// Print an error to stderr in human-readable format
pub fn print_error_stderr(error: &CommandError) {
	eprintln!("{} [{}]: {}", "Error".red().bold(), error.code, error.message);
	if let Some(ref details) = error.details {
		if let Ok(json) = serde_json::to_string_pretty(details) {
			eprintln!("Details: {json}");
		}
	}
}

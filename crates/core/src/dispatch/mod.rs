//! Fan a batch of GM commands out to a named game-server host.
//!
//! A dispatch turns caller input into `acsoap gm` / `acsoap batch-gm` command
//! lines, submits them as one remote job and, in synchronous mode, waits for
//! the job and decodes the outcomes it printed or stored.
//!
//! Small batches travel inline, one command line per request. Larger ones
//! must go through the blob store: the batch is written to the input
//! location and a single `batch-gm` line reads it back on the host.

mod command_line;
mod poll;

use std::sync::Arc;

use acsoap_protocol::{ProtocolOutcome, from_json_array, to_json_array};
use acsoap_runtime::{BlobStore, BlobUri, HostResolver, JobHandle, JobRunner, JobSnapshot, JobStatus};
use tracing::{debug, info, warn};

pub use command_line::{CommandLineBuilder, shell_quote};
pub use poll::{PollOptions, wait_for_job};

use crate::error::{Error, Result};
use crate::request_like::{RequestLike, normalize};

/// Batches of this many requests or more must travel through the blob store.
pub const BLOB_INPUT_THRESHOLD: usize = 20;

/// Location of the `acsoap` binary on game-server hosts.
pub const DEFAULT_EXECUTOR_PATH: &str = "/home/ubuntu/git_repos/acore_soap_app-project/.venv/bin/acsoap";

/// Whether [`RemoteDispatcher::dispatch`] waits for the job.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchMode {
	/// Submit and return the job handle.
	Async,
	/// Submit, poll until done and decode the outcomes.
	Sync(PollOptions),
}

impl Default for DispatchMode {
	fn default() -> Self {
		DispatchMode::Sync(PollOptions::default())
	}
}

/// Per-dispatch settings.
#[derive(Debug, Clone)]
pub struct DispatchOptions {
	/// Default GM account applied to requests that name none.
	pub username: Option<String>,
	pub password: Option<String>,
	/// Stop at the first failed command on the host.
	pub fail_fast: bool,
	/// Blob location the batch is written to before submission.
	pub input_location: Option<BlobUri>,
	/// Blob location the host writes outcomes to instead of stdout.
	pub output_location: Option<BlobUri>,
	/// Path of the `acsoap` binary on the host.
	pub executor_path: String,
	pub mode: DispatchMode,
}

impl Default for DispatchOptions {
	fn default() -> Self {
		Self {
			username: None,
			password: None,
			fail_fast: true,
			input_location: None,
			output_location: None,
			executor_path: DEFAULT_EXECUTOR_PATH.to_string(),
			mode: DispatchMode::default(),
		}
	}
}

impl DispatchOptions {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn credentials(mut self, username: impl Into<String>, password: impl Into<String>) -> Self {
		self.username = Some(username.into());
		self.password = Some(password.into());
		self
	}

	pub fn fail_fast(mut self, fail_fast: bool) -> Self {
		self.fail_fast = fail_fast;
		self
	}

	pub fn input_location(mut self, location: BlobUri) -> Self {
		self.input_location = Some(location);
		self
	}

	pub fn output_location(mut self, location: BlobUri) -> Self {
		self.output_location = Some(location);
		self
	}

	pub fn executor_path(mut self, path: impl Into<String>) -> Self {
		self.executor_path = path.into();
		self
	}

	pub fn mode(mut self, mode: DispatchMode) -> Self {
		self.mode = mode;
		self
	}
}

/// What a dispatch returned.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DispatchResult {
	/// Async mode: the submitted job, left running.
	Job(JobHandle),
	/// Sync mode: one outcome per request, in request order.
	Outcomes(Vec<ProtocolOutcome>),
}

impl DispatchResult {
	pub fn into_outcomes(self) -> Option<Vec<ProtocolOutcome>> {
		match self {
			DispatchResult::Outcomes(outcomes) => Some(outcomes),
			DispatchResult::Job(_) => None,
		}
	}

	pub fn job(&self) -> Option<&JobHandle> {
		match self {
			DispatchResult::Job(handle) => Some(handle),
			DispatchResult::Outcomes(_) => None,
		}
	}
}

enum Transport<'a> {
	Inline,
	Blob(&'a BlobUri),
}

/// Runs GM commands on remote hosts through the job collaborator.
///
/// Holds no per-dispatch state; concurrent dispatches to the same server are
/// not coordinated.
#[derive(Clone)]
pub struct RemoteDispatcher {
	hosts: Arc<dyn HostResolver>,
	jobs: Arc<dyn JobRunner>,
	blobs: Arc<dyn BlobStore>,
}

impl RemoteDispatcher {
	pub fn new(hosts: Arc<dyn HostResolver>, jobs: Arc<dyn JobRunner>, blobs: Arc<dyn BlobStore>) -> Self {
		Self { hosts, jobs, blobs }
	}

	/// Runs `input` on the host behind `server_id`.
	///
	/// # Errors
	///
	/// - [`Error::InvalidInput`] for empty or malformed input
	/// - [`Error::Configuration`] for a batch of [`BLOB_INPUT_THRESHOLD`] or
	///   more without an input location, or an output location shared by
	///   several inline command lines; raised before any job is submitted
	/// - [`Error::HostNotRunning`] if the host is stopped
	/// - [`Error::RemoteExecution`] if the job exits non-zero
	/// - [`Error::Timeout`] if the job does not finish in time
	/// - [`Error::Format`] if the job output cannot be decoded
	pub async fn dispatch(
		&self,
		server_id: &str,
		input: impl Into<RequestLike>,
		options: &DispatchOptions,
	) -> Result<DispatchResult> {
		let requests = normalize(
			input.into(),
			options.username.as_deref(),
			options.password.as_deref(),
			Some(self.blobs.as_ref()),
		)
		.await?;
		let transport = plan_transport(requests.len(), options)?;

		let host = self.hosts.resolve(server_id).await?;
		if !host.is_running {
			return Err(Error::HostNotRunning {
				server_id: server_id.to_string(),
			});
		}

		let builder =
			CommandLineBuilder::new(&options.executor_path, options.fail_fast).output_location(options.output_location.as_ref());
		let command_lines = match transport {
			Transport::Inline => requests.iter().map(|r| builder.gm(r)).collect::<Vec<_>>(),
			Transport::Blob(input_location) => {
				let body = to_json_array(&requests)?;
				self.blobs.put(input_location, &body).await.map_err(Error::blob)?;
				debug!(uri = %input_location, count = requests.len(), "batch written to blob");
				vec![builder.batch_gm(
					input_location,
					options.username.as_deref(),
					options.password.as_deref(),
				)]
			}
		};

		let handle = self
			.jobs
			.submit(&host.endpoint_id, &command_lines)
			.await
			.map_err(Error::job)?;
		info!(
			server_id,
			endpoint_id = %handle.endpoint_id,
			job_id = %handle.job_id,
			requests = requests.len(),
			lines = command_lines.len(),
			"dispatched GM commands"
		);

		let poll = match options.mode {
			DispatchMode::Async => return Ok(DispatchResult::Job(handle)),
			DispatchMode::Sync(poll) => poll,
		};

		let snapshot = wait_for_job(self.jobs.as_ref(), &handle, &poll).await?;
		let outcomes = self.decode(snapshot, options.output_location.as_ref()).await?;
		if outcomes.len() != requests.len() {
			warn!(
				expected = requests.len(),
				decoded = outcomes.len(),
				"remote job returned an unexpected number of outcomes"
			);
		}
		Ok(DispatchResult::Outcomes(outcomes))
	}

	async fn decode(&self, snapshot: JobSnapshot, output_location: Option<&BlobUri>) -> Result<Vec<ProtocolOutcome>> {
		let exit_code = snapshot.exit_code.unwrap_or(match snapshot.status {
			JobStatus::Succeeded => 0,
			_ => -1,
		});
		if exit_code != 0 {
			return Err(Error::RemoteExecution {
				exit_code,
				stdout: snapshot.stdout,
				stderr: snapshot.stderr,
			});
		}

		match output_location {
			Some(uri) => {
				let body = self.blobs.get(uri).await.map_err(Error::blob)?;
				from_json_array(&body).map_err(|e| Error::Format(format!("output blob {uri}: {e}")))
			}
			None => decode_stdout(&snapshot.stdout),
		}
	}
}

fn plan_transport(count: usize, options: &DispatchOptions) -> Result<Transport<'_>> {
	match &options.input_location {
		Some(location) => Ok(Transport::Blob(location)),
		None if count >= BLOB_INPUT_THRESHOLD => Err(Error::Configuration(format!(
			"{count} requests need an input location (inline transport takes fewer than {BLOB_INPUT_THRESHOLD})"
		))),
		None if count > 1 && options.output_location.is_some() => Err(Error::Configuration(
			"an output location needs an input location when dispatching more than one request".into(),
		)),
		None => Ok(Transport::Inline),
	}
}

/// Decodes one JSON outcome per non-blank stdout line.
pub fn decode_stdout(stdout: &str) -> Result<Vec<ProtocolOutcome>> {
	stdout
		.lines()
		.map(str::trim)
		.filter(|line| !line.is_empty())
		.map(|line| {
			ProtocolOutcome::from_json(line).map_err(|e| Error::Format(format!("job output line {line:?}: {e}")))
		})
		.collect()
}

//! Test doubles for the executor and the remote job collaborator.
//!
//! - [`MockExecutor`]: answers every command with a canned outcome and
//!   records what it was asked to run
//! - [`MockJobRunner`]: records submitted command lines and replays a
//!   scripted sequence of job snapshots
//!
//! # Example
//!
//! ```ignore
//! use acsoap::testing::{MockExecutor, outcome};
//!
//! let executor = MockExecutor::new()
//!     .respond(".server info", outcome::success("Connected players: 3. Characters in world: 3."));
//! ```

use std::collections::{HashMap, HashSet, VecDeque};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use acsoap_protocol::{ProtocolOutcome, ProtocolRequest};
use acsoap_runtime::{JobHandle, JobRunner, JobSnapshot, JobStatus};
use async_trait::async_trait;

use crate::error::Result;
use crate::executor::Execute;

/// Builders for outcomes as a world server would produce them.
pub mod outcome {
	use acsoap_protocol::ProtocolOutcome;

	pub fn success(message: &str) -> ProtocolOutcome {
		ProtocolOutcome {
			body: format!("<result>{message}</result>"),
			message: message.to_string(),
			succeeded: true,
		}
	}

	pub fn fault(message: &str) -> ProtocolOutcome {
		ProtocolOutcome {
			body: format!("<faultstring>{message}</faultstring>"),
			message: message.to_string(),
			succeeded: false,
		}
	}

	/// Renders outcomes the way the host-side `gm` command prints them.
	pub fn to_stdout(outcomes: &[ProtocolOutcome]) -> String {
		outcomes
			.iter()
			.filter_map(|o| o.to_json().ok())
			.map(|line| line + "\n")
			.collect()
	}
}

/// Executor that never touches the network.
///
/// Commands without a scripted reply succeed with the command text as
/// the message; commands registered with [`MockExecutor::fail_on`] fault.
#[derive(Debug, Clone, Default)]
pub struct MockExecutor {
	replies: HashMap<String, ProtocolOutcome>,
	failing: HashSet<String>,
	seen: Arc<Mutex<Vec<ProtocolRequest>>>,
}

impl MockExecutor {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn respond(mut self, command: &str, outcome: ProtocolOutcome) -> Self {
		self.replies.insert(command.to_string(), outcome);
		self
	}

	pub fn fail_on(mut self, command: &str) -> Self {
		self.failing.insert(command.to_string());
		self
	}

	/// Requests executed so far, in order.
	pub fn requests(&self) -> Vec<ProtocolRequest> {
		self.seen.lock().map(|seen| seen.clone()).unwrap_or_default()
	}

	pub fn commands(&self) -> Vec<String> {
		self.requests().into_iter().map(|r| r.command).collect()
	}
}

#[async_trait]
impl Execute for MockExecutor {
	async fn execute(&self, request: &ProtocolRequest) -> Result<ProtocolOutcome> {
		if let Ok(mut seen) = self.seen.lock() {
			seen.push(request.clone());
		}
		if let Some(reply) = self.replies.get(&request.command) {
			return Ok(reply.clone());
		}
		if self.failing.contains(&request.command) {
			return Ok(outcome::fault(&format!("Command failed: {}", request.command)));
		}
		Ok(outcome::success(&request.command))
	}
}

/// One recorded call to [`JobRunner::submit`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Submission {
	pub endpoint_id: String,
	pub command_lines: Vec<String>,
}

/// Job runner replaying scripted snapshots.
///
/// Each poll pops the next snapshot; the last one repeats forever. With
/// nothing scripted the job stays running.
#[derive(Debug, Clone, Default)]
pub struct MockJobRunner {
	script: Arc<Mutex<VecDeque<JobSnapshot>>>,
	submissions: Arc<Mutex<Vec<Submission>>>,
	polls: Arc<AtomicUsize>,
}

impl MockJobRunner {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn then(self, snapshot: JobSnapshot) -> Self {
		if let Ok(mut script) = self.script.lock() {
			script.push_back(snapshot);
		}
		self
	}

	/// Job that exits 0 after printing `stdout`.
	pub fn succeeding_with(stdout: impl Into<String>) -> Self {
		Self::new().then(finished(0, stdout.into(), String::new()))
	}

	/// Job that exits `exit_code` with the given output.
	pub fn failing_with(exit_code: i32, stdout: impl Into<String>, stderr: impl Into<String>) -> Self {
		Self::new().then(finished(exit_code, stdout.into(), stderr.into()))
	}

	/// Job that never leaves the running state.
	pub fn never_finishing() -> Self {
		Self::new().then(JobSnapshot {
			status: JobStatus::Running,
			..JobSnapshot::pending()
		})
	}

	pub fn submissions(&self) -> Vec<Submission> {
		self.submissions.lock().map(|s| s.clone()).unwrap_or_default()
	}

	pub fn poll_count(&self) -> usize {
		self.polls.load(Ordering::SeqCst)
	}
}

fn finished(exit_code: i32, stdout: String, stderr: String) -> JobSnapshot {
	JobSnapshot {
		status: if exit_code == 0 {
			JobStatus::Succeeded
		} else {
			JobStatus::Failed
		},
		exit_code: Some(exit_code),
		stdout,
		stderr,
	}
}

#[async_trait]
impl JobRunner for MockJobRunner {
	async fn submit(&self, endpoint_id: &str, command_lines: &[String]) -> acsoap_runtime::Result<JobHandle> {
		let mut submissions = self.submissions.lock().map_err(|_| acsoap_runtime::Error::SubmitFailed {
			endpoint: endpoint_id.to_string(),
			message: "mock state poisoned".into(),
		})?;
		submissions.push(Submission {
			endpoint_id: endpoint_id.to_string(),
			command_lines: command_lines.to_vec(),
		});
		Ok(JobHandle {
			job_id: format!("mock-job-{}", submissions.len()),
			endpoint_id: endpoint_id.to_string(),
		})
	}

	async fn poll(&self, handle: &JobHandle) -> acsoap_runtime::Result<JobSnapshot> {
		self.polls.fetch_add(1, Ordering::SeqCst);
		let mut script = self
			.script
			.lock()
			.map_err(|_| acsoap_runtime::Error::UnknownJob(handle.job_id.clone()))?;
		let snapshot = if script.len() > 1 {
			script.pop_front()
		} else {
			script.front().cloned()
		};
		Ok(snapshot.unwrap_or_else(|| JobSnapshot {
			status: JobStatus::Running,
			..JobSnapshot::pending()
		}))
	}
}

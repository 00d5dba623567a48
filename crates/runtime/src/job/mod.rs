//! Remote job contract: submit command lines to a host, poll until done.

mod shell;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

pub use shell::ShellJobRunner;

use crate::error::Result;

/// Lifecycle of a submitted job.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JobStatus {
	Pending,
	Running,
	Succeeded,
	Failed,
}

impl JobStatus {
	/// Returns true once the job will not change status again.
	pub fn is_terminal(self) -> bool {
		matches!(self, JobStatus::Succeeded | JobStatus::Failed)
	}
}

/// Identifies a submitted job on the endpoint it runs on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobHandle {
	pub job_id: String,
	pub endpoint_id: String,
}

/// Point-in-time view of a job, as returned by [`JobRunner::poll`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobSnapshot {
	pub status: JobStatus,
	/// Set once the job is terminal.
	pub exit_code: Option<i32>,
	pub stdout: String,
	pub stderr: String,
}

impl JobSnapshot {
	pub fn pending() -> Self {
		Self {
			status: JobStatus::Pending,
			exit_code: None,
			stdout: String::new(),
			stderr: String::new(),
		}
	}
}

/// Executes command lines on a remote endpoint as one asynchronous job.
///
/// Lines run in order. The core reads snapshots only; it never mutates a job.
#[async_trait]
pub trait JobRunner: Send + Sync {
	async fn submit(&self, endpoint_id: &str, command_lines: &[String]) -> Result<JobHandle>;

	async fn poll(&self, handle: &JobHandle) -> Result<JobSnapshot>;
}

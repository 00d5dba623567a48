use std::process::Stdio;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

use async_trait::async_trait;
use dashmap::DashMap;
use tokio::process::Command;
use tracing::{debug, warn};

use super::{JobHandle, JobRunner, JobSnapshot, JobStatus};
use crate::error::{Error, Result};

/// Exit code recorded when a line could not be started at all.
const SPAWN_FAILED_EXIT: i32 = 127;

/// Runs jobs on this machine with `sh -c`, one line after another.
///
/// Each job runs on its own tokio task; the first line that exits non-zero
/// stops the job and marks it failed. The endpoint id is only recorded.
///
/// The first poll that sees a job finished returns its final snapshot and
/// drops it from the table, so later polls of that handle fail with
/// [`Error::UnknownJob`].
#[derive(Debug)]
pub struct ShellJobRunner {
	shell: String,
	jobs: Arc<DashMap<String, JobSnapshot>>,
	next_id: AtomicU64,
}

impl Default for ShellJobRunner {
	fn default() -> Self {
		Self::new()
	}
}

impl ShellJobRunner {
	pub fn new() -> Self {
		Self::with_shell("sh")
	}

	pub fn with_shell(shell: impl Into<String>) -> Self {
		Self {
			shell: shell.into(),
			jobs: Arc::new(DashMap::new()),
			next_id: AtomicU64::new(1),
		}
	}

	fn allocate_id(&self) -> String {
		let seq = self.next_id.fetch_add(1, Ordering::Relaxed);
		let millis = SystemTime::now()
			.duration_since(UNIX_EPOCH)
			.unwrap_or_default()
			.as_millis();
		format!("job-{millis:x}-{seq}")
	}
}

#[async_trait]
impl JobRunner for ShellJobRunner {
	async fn submit(&self, endpoint_id: &str, command_lines: &[String]) -> Result<JobHandle> {
		if command_lines.is_empty() {
			return Err(Error::SubmitFailed {
				endpoint: endpoint_id.to_string(),
				message: "no command lines".to_string(),
			});
		}

		let job_id = self.allocate_id();
		self.jobs.insert(job_id.clone(), JobSnapshot::pending());
		debug!(%job_id, endpoint_id, lines = command_lines.len(), "job submitted");

		tokio::spawn(run_job(
			Arc::clone(&self.jobs),
			job_id.clone(),
			self.shell.clone(),
			command_lines.to_vec(),
		));

		Ok(JobHandle {
			job_id,
			endpoint_id: endpoint_id.to_string(),
		})
	}

	async fn poll(&self, handle: &JobHandle) -> Result<JobSnapshot> {
		if let Some((_, finished)) = self.jobs.remove_if(&handle.job_id, |_, job| job.status.is_terminal()) {
			debug!(job_id = %handle.job_id, "job released");
			return Ok(finished);
		}
		self.jobs
			.get(&handle.job_id)
			.map(|r| r.value().clone())
			.ok_or_else(|| Error::UnknownJob(handle.job_id.clone()))
	}
}

async fn run_job(jobs: Arc<DashMap<String, JobSnapshot>>, job_id: String, shell: String, lines: Vec<String>) {
	update(&jobs, &job_id, |job| job.status = JobStatus::Running);

	let mut exit_code = 0;
	for line in &lines {
		let output = Command::new(&shell)
			.arg("-c")
			.arg(line)
			.stdin(Stdio::null())
			.output()
			.await;

		match output {
			Ok(output) => {
				let stdout = String::from_utf8_lossy(&output.stdout).into_owned();
				let stderr = String::from_utf8_lossy(&output.stderr).into_owned();
				update(&jobs, &job_id, |job| {
					job.stdout.push_str(&stdout);
					job.stderr.push_str(&stderr);
				});
				if !output.status.success() {
					exit_code = output.status.code().unwrap_or(-1);
					break;
				}
			}
			Err(e) => {
				warn!(%job_id, error = %e, "failed to start job line");
				update(&jobs, &job_id, |job| {
					job.stderr.push_str(&format!("failed to start {shell}: {e}\n"));
				});
				exit_code = SPAWN_FAILED_EXIT;
				break;
			}
		}
	}

	debug!(%job_id, exit_code, "job finished");
	update(&jobs, &job_id, |job| {
		job.exit_code = Some(exit_code);
		job.status = if exit_code == 0 {
			JobStatus::Succeeded
		} else {
			JobStatus::Failed
		};
	});
}

fn update(jobs: &DashMap<String, JobSnapshot>, job_id: &str, f: impl FnOnce(&mut JobSnapshot)) {
	if let Some(mut job) = jobs.get_mut(job_id) {
		f(job.value_mut());
	}
}

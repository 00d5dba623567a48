use std::time::Duration;

use acsoap_runtime::{JobHandle, JobRunner, JobSnapshot};
use tokio::time::{Instant, sleep};
use tracing::{debug, info};

use crate::error::{Error, Result};

/// How a synchronous dispatch waits for its job.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollOptions {
	/// Pause after submitting, before the first poll.
	pub initial_delay: Duration,
	/// Pause between polls.
	pub delay: Duration,
	/// Longest time to keep polling after the initial delay.
	pub timeout: Duration,
	/// Log every poll at info level instead of debug.
	pub verbose: bool,
}

impl Default for PollOptions {
	fn default() -> Self {
		Self {
			initial_delay: Duration::from_secs(1),
			delay: Duration::from_secs(1),
			timeout: Duration::from_secs(10),
			verbose: false,
		}
	}
}

/// Polls `handle` until the job is terminal.
///
/// # Errors
///
/// - [`Error::Timeout`] once `options.timeout` has elapsed
/// - [`Error::Job`] if polling itself fails
pub async fn wait_for_job(jobs: &dyn JobRunner, handle: &JobHandle, options: &PollOptions) -> Result<JobSnapshot> {
	sleep(options.initial_delay).await;
	let started = Instant::now();
	let mut attempt = 0u32;

	loop {
		attempt += 1;
		let snapshot = jobs.poll(handle).await.map_err(Error::job)?;
		if options.verbose {
			info!(job_id = %handle.job_id, attempt, status = ?snapshot.status, "polled job");
		} else {
			debug!(job_id = %handle.job_id, attempt, status = ?snapshot.status, "polled job");
		}
		if snapshot.status.is_terminal() {
			return Ok(snapshot);
		}

		let waited = started.elapsed();
		if waited >= options.timeout {
			return Err(Error::Timeout {
				job_id: handle.job_id.clone(),
				waited,
			});
		}
		sleep(options.delay.min(options.timeout - waited)).await;
	}
}

#[cfg(test)]
mod tests {
	use acsoap_runtime::JobStatus;

	use super::*;
	use crate::testing::MockJobRunner;

	fn fast() -> PollOptions {
		PollOptions {
			initial_delay: Duration::ZERO,
			delay: Duration::from_millis(5),
			timeout: Duration::from_millis(60),
			verbose: false,
		}
	}

	fn handle() -> JobHandle {
		JobHandle {
			job_id: "mock-job-1".into(),
			endpoint_id: "i-1".into(),
		}
	}

	#[tokio::test]
	async fn returns_once_terminal() {
		let running = JobSnapshot {
			status: JobStatus::Running,
			..JobSnapshot::pending()
		};
		let jobs = MockJobRunner::new()
			.then(JobSnapshot::pending())
			.then(running)
			.then(JobSnapshot {
				status: JobStatus::Succeeded,
				exit_code: Some(0),
				stdout: "done\n".into(),
				stderr: String::new(),
			});

		let snapshot = wait_for_job(&jobs, &handle(), &fast()).await.unwrap();
		assert_eq!(snapshot.status, JobStatus::Succeeded);
		assert_eq!(snapshot.stdout, "done\n");
		assert_eq!(jobs.poll_count(), 3);
	}

	#[tokio::test]
	async fn gives_up_after_timeout() {
		let jobs = MockJobRunner::never_finishing();

		let err = wait_for_job(&jobs, &handle(), &fast()).await.unwrap_err();
		match err {
			Error::Timeout { job_id, waited } => {
				assert_eq!(job_id, "mock-job-1");
				assert!(waited >= Duration::from_millis(60));
			}
			other => panic!("unexpected error: {other}"),
		}
		assert!(jobs.poll_count() > 1);
	}
}

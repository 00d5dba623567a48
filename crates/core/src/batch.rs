//! Sequential execution of a batch with a failure policy.

use acsoap_protocol::{ProtocolOutcome, ProtocolRequest, to_json_array};
use acsoap_runtime::{BlobStore, BlobUri};
use tracing::{debug, info};

use crate::error::{Error, Result};
use crate::executor::Execute;

/// Where the outcomes of a batch go.
#[derive(Clone, Copy)]
pub enum OutputSink<'a> {
	/// Hand the outcomes back to the caller.
	Return,
	/// Write the outcomes to a blob as one JSON array.
	Blob { store: &'a dyn BlobStore, uri: &'a BlobUri },
}

/// What a batch produced, depending on its [`OutputSink`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BatchOutput {
	Outcomes(Vec<ProtocolOutcome>),
	Stored { uri: BlobUri, count: usize },
}

/// Runs `requests` in order, one at a time.
///
/// With `fail_fast`, the first failed outcome stops the batch with
/// [`Error::CommandFailed`] and the outcomes gathered so far are dropped.
/// Without it every request runs and failed outcomes are returned in place.
pub async fn run_batch<E>(executor: &E, requests: &[ProtocolRequest], fail_fast: bool) -> Result<Vec<ProtocolOutcome>>
where
	E: Execute + ?Sized,
{
	let mut outcomes = Vec::with_capacity(requests.len());
	for (index, request) in requests.iter().enumerate() {
		let outcome = executor.execute(request).await?;
		debug!(index, command = %request.command, succeeded = outcome.succeeded, "batch step");
		if fail_fast && !outcome.succeeded {
			return Err(Error::command_failed(request, &outcome));
		}
		outcomes.push(outcome);
	}
	Ok(outcomes)
}

/// Runs a batch and delivers its outcomes to `sink`.
pub async fn run_batch_into<E>(
	executor: &E,
	requests: &[ProtocolRequest],
	fail_fast: bool,
	sink: OutputSink<'_>,
) -> Result<BatchOutput>
where
	E: Execute + ?Sized,
{
	let outcomes = run_batch(executor, requests, fail_fast).await?;
	match sink {
		OutputSink::Return => Ok(BatchOutput::Outcomes(outcomes)),
		OutputSink::Blob { store, uri } => {
			let body = to_json_array(&outcomes)?;
			store.put(uri, &body).await.map_err(Error::blob)?;
			info!(%uri, count = outcomes.len(), "batch outcomes written");
			Ok(BatchOutput::Stored {
				uri: uri.clone(),
				count: outcomes.len(),
			})
		}
	}
}

#[cfg(test)]
mod tests {
	use acsoap_protocol::from_json_array;
	use acsoap_runtime::MemoryBlobStore;

	use super::*;
	use crate::testing::MockExecutor;

	fn three_with_second_failing() -> (MockExecutor, Vec<ProtocolRequest>) {
		let executor = MockExecutor::new().fail_on("bad");
		let requests = vec![
			ProtocolRequest::new("one"),
			ProtocolRequest::new("bad"),
			ProtocolRequest::new("three"),
		];
		(executor, requests)
	}

	#[tokio::test]
	async fn fail_fast_stops_at_first_failure() {
		let (executor, requests) = three_with_second_failing();

		let err = run_batch(&executor, &requests, true).await.unwrap_err();
		match err {
			Error::CommandFailed { request, outcome } => {
				assert_eq!(request.command, "bad");
				assert!(!outcome.succeeded);
			}
			other => panic!("unexpected error: {other}"),
		}
		assert_eq!(executor.commands(), ["one", "bad"]);
	}

	#[tokio::test]
	async fn best_effort_runs_everything_in_order() {
		let (executor, requests) = three_with_second_failing();

		let outcomes = run_batch(&executor, &requests, false).await.unwrap();
		let flags: Vec<_> = outcomes.iter().map(|o| o.succeeded).collect();
		assert_eq!(flags, [true, false, true]);
		assert_eq!(executor.commands(), ["one", "bad", "three"]);
	}

	#[tokio::test]
	async fn blob_sink_stores_a_json_array() {
		let executor = MockExecutor::new();
		let store = MemoryBlobStore::new();
		let uri = BlobUri::parse("s3://bucket/out.json").unwrap();
		let requests = vec![ProtocolRequest::new("a"), ProtocolRequest::new("a")];

		let output = run_batch_into(&executor, &requests, true, OutputSink::Blob { store: &store, uri: &uri })
			.await
			.unwrap();
		assert_eq!(output, BatchOutput::Stored { uri: uri.clone(), count: 2 });

		let stored: Vec<ProtocolOutcome> = from_json_array(&store.try_get(&uri).unwrap()).unwrap();
		assert_eq!(stored.len(), 2);
		assert!(stored.iter().all(|o| o.succeeded));
	}
}

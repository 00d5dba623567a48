//! HTTP transport to a world server's SOAP port.

use std::time::Duration;

use acsoap_protocol::envelope::build_envelope;
use acsoap_protocol::{CONTENT_TYPE, ConnectionDefaults, ProtocolOutcome, ProtocolRequest};
use tracing::debug;

use crate::error::{Error, Result};

/// Sends GM command envelopes and parses the replies.
///
/// One POST per request, no retries: GM commands are not idempotent, so
/// retrying is left to the caller.
#[derive(Debug, Clone)]
pub struct SoapClient {
	http: reqwest::Client,
	defaults: ConnectionDefaults,
}

impl SoapClient {
	pub fn new(defaults: ConnectionDefaults) -> Result<Self> {
		Self::build(defaults, None)
	}

	/// Creates a client whose requests give up after `timeout`.
	pub fn with_timeout(defaults: ConnectionDefaults, timeout: Duration) -> Result<Self> {
		Self::build(defaults, Some(timeout))
	}

	fn build(defaults: ConnectionDefaults, timeout: Option<Duration>) -> Result<Self> {
		let mut builder = reqwest::Client::builder();
		if let Some(timeout) = timeout {
			builder = builder.timeout(timeout);
		}
		let http = builder.build().map_err(Error::HttpClient)?;
		Ok(Self { http, defaults })
	}

	pub fn defaults(&self) -> &ConnectionDefaults {
		&self.defaults
	}

	/// POSTs the envelope for `request` and parses the response body.
	///
	/// Fault replies arrive with a 5xx status and are still parsed, so the
	/// HTTP status is not treated as an error.
	///
	/// # Errors
	///
	/// - [`Error::Transport`] if the request or body read fails
	/// - [`Error::Protocol`] if the body is not a recognizable SOAP reply
	pub async fn send(&self, request: &ProtocolRequest) -> Result<ProtocolOutcome> {
		let endpoint = request.endpoint_with(&self.defaults);
		let target = format!(
			"{}:{}",
			request.effective_host(&self.defaults),
			request.port.filter(|p| *p != 0).unwrap_or(self.defaults.port)
		);
		debug!(target_addr = %target, command = %request.command, "sending GM command");

		let transport_err = |source| Error::Transport {
			target: target.clone(),
			source,
		};
		let response = self
			.http
			.post(&endpoint)
			.header(reqwest::header::CONTENT_TYPE, CONTENT_TYPE)
			.body(build_envelope(request))
			.send()
			.await
			.map_err(transport_err)?;

		let status = response.status();
		let body = response.text().await.map_err(transport_err)?;
		debug!(target_addr = %target, %status, bytes = body.len(), "SOAP response received");

		Ok(ProtocolOutcome::parse(&body)?)
	}
}

//! Direct execution against the world server running on this host.

use std::net::IpAddr;
use std::time::Duration;

use acsoap_protocol::{ConnectionDefaults, ProtocolOutcome, ProtocolRequest};
use acsoap_runtime::SoapClient;
use async_trait::async_trait;
use tracing::{debug, warn};

use crate::error::Result;

/// Runs one request and returns its parsed outcome.
///
/// A fault reply is a successful call returning `succeeded == false`;
/// only transport and parse problems are errors.
#[async_trait]
pub trait Execute: Send + Sync {
	async fn execute(&self, request: &ProtocolRequest) -> Result<ProtocolOutcome>;
}

/// Sends envelopes straight to the SOAP port.
///
/// Meant to run on the game-server host itself. Targets that are not a
/// loopback address are logged but still contacted.
#[derive(Debug, Clone)]
pub struct LocalExecutor {
	client: SoapClient,
}

impl LocalExecutor {
	pub fn new(defaults: ConnectionDefaults) -> Result<Self> {
		Ok(Self {
			client: SoapClient::new(defaults)?,
		})
	}

	pub fn with_timeout(defaults: ConnectionDefaults, timeout: Duration) -> Result<Self> {
		Ok(Self {
			client: SoapClient::with_timeout(defaults, timeout)?,
		})
	}

	pub fn from_client(client: SoapClient) -> Self {
		Self { client }
	}

	pub fn defaults(&self) -> &ConnectionDefaults {
		self.client.defaults()
	}

	/// Sends `request` and parses the reply.
	///
	/// # Errors
	///
	/// - [`Error::Transport`](crate::Error::Transport) if the port is unreachable
	/// - [`Error::Format`](crate::Error::Format) if the reply is not a SOAP result or fault
	pub async fn run_local(&self, request: &ProtocolRequest) -> Result<ProtocolOutcome> {
		let host = request.effective_host(self.client.defaults());
		if !is_loopback(host) {
			warn!(host, "SOAP target is not a loopback address; the port should not be exposed");
		}
		let outcome = self.client.send(request).await?;
		debug!(command = %request.command, succeeded = outcome.succeeded, "GM command finished");
		Ok(outcome)
	}
}

#[async_trait]
impl Execute for LocalExecutor {
	async fn execute(&self, request: &ProtocolRequest) -> Result<ProtocolOutcome> {
		self.run_local(request).await
	}
}

fn is_loopback(host: &str) -> bool {
	if host.eq_ignore_ascii_case("localhost") {
		return true;
	}
	host.trim_start_matches('[')
		.trim_end_matches(']')
		.parse::<IpAddr>()
		.is_ok_and(|ip| ip.is_loopback())
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn loopback_detection() {
		for host in ["localhost", "LOCALHOST", "127.0.0.1", "127.1.2.3", "::1", "[::1]"] {
			assert!(is_loopback(host), "{host}");
		}
		for host in ["10.0.0.5", "example.org", "", "0.0.0.0"] {
			assert!(!is_loopback(host), "{host}");
		}
	}

	#[tokio::test]
	async fn unreachable_port_is_a_transport_error() {
		let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
		let port = listener.local_addr().unwrap().port();
		drop(listener);

		let executor = LocalExecutor::with_timeout(ConnectionDefaults::default(), Duration::from_secs(5)).unwrap();
		let request = ProtocolRequest::new(".server info").with_target("127.0.0.1", port);
		let err = executor.run_local(&request).await.unwrap_err();
		assert!(matches!(err, crate::Error::Transport(_)));
	}
}

//! Host discovery: logical server id to a running endpoint.

use std::collections::HashMap;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Where a server runs and whether it is up.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HostStatus {
	/// Identifier the [`JobRunner`](crate::JobRunner) submits to.
	pub endpoint_id: String,
	pub is_running: bool,
}

/// Resolves server ids such as `sbx-blue` (`${env}-${server}`).
#[async_trait]
pub trait HostResolver: Send + Sync {
	async fn resolve(&self, server_id: &str) -> Result<HostStatus>;
}

/// Fixed host table, typically loaded from configuration.
#[derive(Debug, Clone, Default)]
pub struct StaticHostResolver {
	hosts: HashMap<String, HostStatus>,
}

impl StaticHostResolver {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn with_host(mut self, server_id: impl Into<String>, endpoint_id: impl Into<String>, is_running: bool) -> Self {
		self.insert(server_id, endpoint_id, is_running);
		self
	}

	pub fn insert(&mut self, server_id: impl Into<String>, endpoint_id: impl Into<String>, is_running: bool) {
		self.hosts.insert(
			server_id.into(),
			HostStatus {
				endpoint_id: endpoint_id.into(),
				is_running,
			},
		);
	}
}

impl FromIterator<(String, HostStatus)> for StaticHostResolver {
	fn from_iter<I: IntoIterator<Item = (String, HostStatus)>>(iter: I) -> Self {
		Self {
			hosts: iter.into_iter().collect(),
		}
	}
}

#[async_trait]
impl HostResolver for StaticHostResolver {
	async fn resolve(&self, server_id: &str) -> Result<HostStatus> {
		self.hosts
			.get(server_id)
			.cloned()
			.ok_or_else(|| Error::UnknownServer(server_id.to_string()))
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[tokio::test]
	async fn resolves_known_servers() {
		let resolver = StaticHostResolver::new()
			.with_host("sbx-blue", "i-0123456789abcdef0", true)
			.with_host("sbx-green", "i-0fedcba9876543210", false);

		let blue = resolver.resolve("sbx-blue").await.unwrap();
		assert_eq!(blue.endpoint_id, "i-0123456789abcdef0");
		assert!(blue.is_running);
		assert!(!resolver.resolve("sbx-green").await.unwrap().is_running);
	}

	#[tokio::test]
	async fn unknown_server_is_an_error() {
		let resolver = StaticHostResolver::new();
		assert!(matches!(resolver.resolve("prd-red").await, Err(Error::UnknownServer(_))));
	}
}

//! CLI configuration file.
//!
//! Looked up at `--config`, then `$ACSOAP_CONFIG`, then
//! `~/.config/acsoap/config.json`. A missing file means all defaults.
//!
//! ```json
//! {
//!   "schema": 1,
//!   "soap": { "username": "admin", "password": "admin", "host": "localhost", "port": 7878 },
//!   "executorPath": "/usr/local/bin/acsoap",
//!   "blobRoot": "/var/lib/acsoap/blobs",
//!   "poll": { "initialDelayMs": 1000, "delayMs": 1000, "timeoutMs": 10000 },
//!   "servers": { "sbx-blue": { "endpointId": "i-0123456789abcdef0", "isRunning": true } }
//! }
//! ```

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use acsoap::dispatch::DEFAULT_EXECUTOR_PATH;
use acsoap::{ConnectionDefaults, PollOptions};
use acsoap_runtime::StaticHostResolver;
use anyhow::Context;
use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Schema version written by this release.
pub const SCHEMA_VERSION: u32 = 1;

/// Environment variable naming the config file.
pub const CONFIG_ENV: &str = "ACSOAP_CONFIG";

/// SOAP connection overrides; unset fields keep the built-in defaults.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SoapSettings {
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub username: Option<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub password: Option<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub host: Option<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub port: Option<u16>,
}

/// Polling defaults for synchronous `remote` dispatches, in milliseconds.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PollSettings {
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub initial_delay_ms: Option<u64>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub delay_ms: Option<u64>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub timeout_ms: Option<u64>,
}

/// One entry of the host table.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ServerEntry {
	pub endpoint_id: String,
	#[serde(default = "default_true")]
	pub is_running: bool,
}

fn default_true() -> bool {
	true
}

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Config {
	#[serde(default)]
	pub schema: u32,
	#[serde(default)]
	pub soap: SoapSettings,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub executor_path: Option<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub blob_root: Option<PathBuf>,
	#[serde(default)]
	pub poll: PollSettings,
	#[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
	pub servers: BTreeMap<String, ServerEntry>,
}

impl Config {
	pub fn new() -> Self {
		Self {
			schema: SCHEMA_VERSION,
			..Default::default()
		}
	}

	/// Loads the config from `explicit`, the environment or the default path.
	pub fn load(explicit: Option<&Path>) -> Result<Self> {
		match resolve_path(explicit) {
			Some(path) => Self::load_from(&path),
			None => Ok(Self::new()),
		}
	}

	/// Reads `path`; a missing file yields the defaults.
	pub fn load_from(path: &Path) -> Result<Self> {
		if !path.exists() {
			return Ok(Self::new());
		}
		let content = fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
		let config = serde_json::from_str(&content).with_context(|| format!("parsing {}", path.display()))?;
		Ok(config)
	}

	/// Built-in connection defaults overlaid with the `soap` section.
	pub fn connection_defaults(&self) -> ConnectionDefaults {
		let mut defaults = ConnectionDefaults::default();
		if let Some(ref username) = self.soap.username {
			defaults.username = username.clone();
		}
		if let Some(ref password) = self.soap.password {
			defaults.password = password.clone();
		}
		if let Some(ref host) = self.soap.host {
			defaults.host = host.clone();
		}
		if let Some(port) = self.soap.port {
			defaults.port = port;
		}
		defaults
	}

	pub fn executor_path(&self) -> &str {
		self.executor_path.as_deref().unwrap_or(DEFAULT_EXECUTOR_PATH)
	}

	/// Directory backing `s3://bucket/key` locations on this machine.
	pub fn blob_root(&self) -> PathBuf {
		self.blob_root.clone().unwrap_or_else(|| {
			dirs::data_local_dir()
				.unwrap_or_else(|| PathBuf::from("."))
				.join("acsoap/blobs")
		})
	}

	pub fn poll_options(&self) -> PollOptions {
		let defaults = PollOptions::default();
		let ms = |value: Option<u64>, fallback: Duration| value.map(Duration::from_millis).unwrap_or(fallback);
		PollOptions {
			initial_delay: ms(self.poll.initial_delay_ms, defaults.initial_delay),
			delay: ms(self.poll.delay_ms, defaults.delay),
			timeout: ms(self.poll.timeout_ms, defaults.timeout),
			verbose: defaults.verbose,
		}
	}

	pub fn host_resolver(&self) -> StaticHostResolver {
		self.servers
			.iter()
			.map(|(server_id, entry)| {
				(
					server_id.clone(),
					acsoap_runtime::HostStatus {
						endpoint_id: entry.endpoint_id.clone(),
						is_running: entry.is_running,
					},
				)
			})
			.collect()
	}
}

/// Picks the config file: `explicit`, then `$ACSOAP_CONFIG`, then the XDG path.
pub fn resolve_path(explicit: Option<&Path>) -> Option<PathBuf> {
	if let Some(path) = explicit {
		return Some(path.to_path_buf());
	}
	if let Some(path) = std::env::var_os(CONFIG_ENV).filter(|v| !v.is_empty()) {
		return Some(PathBuf::from(path));
	}
	default_path()
}

pub fn default_path() -> Option<PathBuf> {
	dirs::config_dir().map(|dir| dir.join("acsoap").join("config.json"))
}

#[cfg(test)]
mod tests {
	use acsoap_runtime::HostResolver;
	use tempfile::TempDir;

	use super::*;

	#[test]
	fn missing_file_yields_defaults() {
		let tmp = TempDir::new().unwrap();
		let config = Config::load_from(&tmp.path().join("none.json")).unwrap();
		assert_eq!(config, Config::new());
		assert_eq!(config.connection_defaults(), ConnectionDefaults::default());
		assert_eq!(config.executor_path(), DEFAULT_EXECUTOR_PATH);
		assert_eq!(config.poll_options(), PollOptions::default());
	}

	#[test]
	fn explicit_path_wins() {
		let path = PathBuf::from("/etc/acsoap.json");
		assert_eq!(resolve_path(Some(&path)), Some(path));
	}

	#[test]
	fn partial_file_keeps_other_defaults() {
		let tmp = TempDir::new().unwrap();
		let path = tmp.path().join("config.json");
		fs::write(
			&path,
			r#"{"soap":{"port":7879},"poll":{"timeoutMs":30000},"servers":{"sbx-blue":{"endpointId":"i-1"}}}"#,
		)
		.unwrap();

		let config = Config::load_from(&path).unwrap();
		let defaults = config.connection_defaults();
		assert_eq!(defaults.port, 7879);
		assert_eq!(defaults.host, "localhost");
		assert_eq!(config.poll_options().timeout, Duration::from_secs(30));
		assert_eq!(config.poll_options().delay, Duration::from_secs(1));
		assert!(config.servers["sbx-blue"].is_running);
	}

	#[test]
	fn invalid_json_is_an_error() {
		let tmp = TempDir::new().unwrap();
		let path = tmp.path().join("config.json");
		fs::write(&path, "{not json").unwrap();
		assert!(Config::load_from(&path).is_err());
	}

	#[test]
	fn written_config_loads_back() {
		let tmp = TempDir::new().unwrap();
		let path = tmp.path().join("config.json");
		let mut config = Config::new();
		config.blob_root = Some(tmp.path().join("blobs"));
		config.servers.insert(
			"sbx-green".into(),
			ServerEntry {
				endpoint_id: "i-2".into(),
				is_running: false,
			},
		);

		fs::write(&path, serde_json::to_string_pretty(&config).unwrap()).unwrap();
		assert_eq!(Config::load_from(&path).unwrap(), config);
	}

	#[tokio::test]
	async fn host_table_becomes_a_resolver() {
		let mut config = Config::new();
		config.servers.insert(
			"sbx-blue".into(),
			ServerEntry {
				endpoint_id: "i-1".into(),
				is_running: true,
			},
		);

		let status = config.host_resolver().resolve("sbx-blue").await.unwrap();
		assert_eq!(status.endpoint_id, "i-1");
		assert!(config.host_resolver().resolve("sbx-red").await.is_err());
	}
}

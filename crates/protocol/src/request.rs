use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::{DEFAULT_HOST, DEFAULT_PASSWORD, DEFAULT_PORT, DEFAULT_USERNAME};

/// Fallback credentials and address applied when a request leaves them unset.
///
/// Threaded explicitly through callers instead of living in process-wide
/// state. [`Default`] yields `admin`/`admin`@`localhost:7878`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConnectionDefaults {
	pub username: String,
	pub password: String,
	pub host: String,
	pub port: u16,
}

impl Default for ConnectionDefaults {
	fn default() -> Self {
		Self {
			username: DEFAULT_USERNAME.to_string(),
			password: DEFAULT_PASSWORD.to_string(),
			host: DEFAULT_HOST.to_string(),
			port: DEFAULT_PORT,
		}
	}
}

/// One GM command addressed to a world server's SOAP port.
///
/// Serializes to a flat JSON object; unset optional fields are omitted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProtocolRequest {
	/// GM command text, e.g. `.server info`.
	pub command: String,
	/// In-game GM account name.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub username: Option<String>,
	/// In-game GM account password.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub password: Option<String>,
	/// World server host.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub host: Option<String>,
	/// World server SOAP port.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub port: Option<u16>,
}

impl ProtocolRequest {
	pub fn new(command: impl Into<String>) -> Self {
		Self {
			command: command.into(),
			username: None,
			password: None,
			host: None,
			port: None,
		}
	}

	pub fn with_credentials(mut self, username: impl Into<String>, password: impl Into<String>) -> Self {
		self.username = Some(username.into());
		self.password = Some(password.into());
		self
	}

	pub fn with_target(mut self, host: impl Into<String>, port: u16) -> Self {
		self.host = Some(host.into());
		self.port = Some(port);
		self
	}

	/// Rejects requests whose command is empty or whitespace.
	pub fn validate(&self) -> Result<()> {
		if self.command.trim().is_empty() {
			return Err(Error::EmptyCommand);
		}
		Ok(())
	}

	/// Fills `username`/`password` only where they are still unset.
	///
	/// Values already present on the request win, so applying a second set
	/// of defaults is a no-op.
	pub fn set_default(&mut self, username: Option<&str>, password: Option<&str>) {
		if self.username.is_none() {
			self.username = username.map(str::to_string);
		}
		if self.password.is_none() {
			self.password = password.map(str::to_string);
		}
	}

	/// Effective host after applying `defaults`.
	pub fn effective_host<'a>(&'a self, defaults: &'a ConnectionDefaults) -> &'a str {
		non_empty(self.host.as_deref()).unwrap_or(&defaults.host)
	}

	/// SOAP endpoint URL, `http://{user}:{pass}@{host}:{port}/`.
	///
	/// Unset or empty fields fall back to `defaults`.
	pub fn endpoint_with(&self, defaults: &ConnectionDefaults) -> String {
		let username = non_empty(self.username.as_deref()).unwrap_or(&defaults.username);
		let password = non_empty(self.password.as_deref()).unwrap_or(&defaults.password);
		let host = self.effective_host(defaults);
		let port = self.port.filter(|p| *p != 0).unwrap_or(defaults.port);
		format!("http://{username}:{password}@{host}:{port}/")
	}

	/// SOAP endpoint URL using the built-in [`ConnectionDefaults`].
	pub fn endpoint(&self) -> String {
		self.endpoint_with(&ConnectionDefaults::default())
	}

	pub fn to_json(&self) -> Result<String> {
		Ok(serde_json::to_string(self)?)
	}

	pub fn from_json(json: &str) -> Result<Self> {
		Ok(serde_json::from_str(json)?)
	}
}

impl From<&str> for ProtocolRequest {
	fn from(command: &str) -> Self {
		Self::new(command)
	}
}

impl From<String> for ProtocolRequest {
	fn from(command: String) -> Self {
		Self::new(command)
	}
}

fn non_empty(value: Option<&str>) -> Option<&str> {
	value.filter(|v| !v.is_empty())
}

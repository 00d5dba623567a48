//! Named GM operations with response extraction.
//!
//! [`CannedCommands`] runs each command on a remote host through the
//! [`RemoteDispatcher`]; [`count_online_players`] is the host-side variant
//! that talks to the local SOAP port.

use std::sync::LazyLock;

use acsoap_protocol::{ProtocolOutcome, ProtocolRequest};
use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::dispatch::{DispatchMode, DispatchOptions, DispatchResult, RemoteDispatcher};
use crate::error::{Error, Result};
use crate::executor::Execute;

static CONNECTED_PLAYERS_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"Connected players: (\d+)").unwrap());

static CHARACTERS_IN_WORLD_RE: LazyLock<Regex> =
	LazyLock::new(|| Regex::new(r"Characters in world: (\d+)").unwrap());

/// Player counts reported by `.server info`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OnlinePlayers {
	pub connected_players: u32,
	pub characters_in_world: u32,
}

/// Host-side server status; counts are `None` when the server did not answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerStatus {
	pub connected_players: Option<u32>,
	pub characters_in_world: Option<u32>,
	pub server_is_online: bool,
}

/// One row of `.gm list`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GmAccount {
	pub name: String,
	pub level: i32,
}

/// Reads the player counts out of a `.server info` message.
///
/// Each counter must appear exactly once.
pub fn extract_online_players(message: &str) -> Result<OnlinePlayers> {
	Ok(OnlinePlayers {
		connected_players: single_count(&CONNECTED_PLAYERS_RE, message)?,
		characters_in_world: single_count(&CHARACTERS_IN_WORLD_RE, message)?,
	})
}

fn single_count(re: &Regex, message: &str) -> Result<u32> {
	let mut matches = re.captures_iter(message);
	match (matches.next(), matches.next()) {
		(Some(caps), None) => caps[1]
			.parse()
			.map_err(|_| Error::Format(format!("count out of range in {message:?}"))),
		_ => Err(Error::Format(message.to_string())),
	}
}

/// Parses the pipe table printed by `.gm list`.
///
/// Rows start with `|`; the first two non-empty cells are the account name
/// and its level. The `Account | GM` header row is skipped. The server ends
/// lines with a bare `\r`, so both `\r` and `\n` separate rows.
pub fn parse_gm_list(message: &str) -> Result<Vec<GmAccount>> {
	let mut accounts = Vec::new();
	let rows = message.split(['\r', '\n']).map(str::trim).filter(|l| l.starts_with('|'));
	for line in rows {
		let cells: Vec<&str> = line.split('|').map(str::trim).filter(|c| !c.is_empty()).collect();
		let [name, level, ..] = cells.as_slice() else {
			return Err(Error::Format(format!("malformed GM list row {line:?}")));
		};
		if name.eq_ignore_ascii_case("account") && level.eq_ignore_ascii_case("gm") {
			continue;
		}
		let level = level
			.parse()
			.map_err(|_| Error::Format(format!("GM level {level:?} is not an integer")))?;
		accounts.push(GmAccount {
			name: name.to_string(),
			level,
		});
	}
	Ok(accounts)
}

/// GM operations against one remote server.
///
/// Every operation dispatches a single command synchronously with
/// `fail_fast` set to its `raises` argument. With `raises`, a failed command
/// makes the host exit non-zero and surfaces as
/// [`Error::RemoteExecution`]; without it the outcome flag is returned.
#[derive(Clone)]
pub struct CannedCommands<'a> {
	dispatcher: &'a RemoteDispatcher,
	server_id: String,
	options: DispatchOptions,
}

impl<'a> CannedCommands<'a> {
	pub fn new(dispatcher: &'a RemoteDispatcher, server_id: impl Into<String>) -> Self {
		Self {
			dispatcher,
			server_id: server_id.into(),
			options: DispatchOptions::default(),
		}
	}

	/// Base options for every command. Async mode is replaced by the default
	/// polling, and locations are ignored.
	pub fn with_options(mut self, options: DispatchOptions) -> Self {
		self.options = options;
		self
	}

	async fn run(&self, command: String, raises: bool) -> Result<ProtocolOutcome> {
		let mut options = self.options.clone();
		options.fail_fast = raises;
		options.input_location = None;
		options.output_location = None;
		if options.mode == DispatchMode::Async {
			options.mode = DispatchMode::default();
		}

		let request = ProtocolRequest::new(command);
		let result = self.dispatcher.dispatch(&self.server_id, request, &options).await?;
		let outcome = match result {
			DispatchResult::Outcomes(outcomes) => outcomes.into_iter().next(),
			DispatchResult::Job(_) => None,
		}
		.ok_or_else(|| Error::Format("remote job returned no outcome".into()))?;
		info!(server_id = %self.server_id, succeeded = outcome.succeeded, message = %outcome.message, "canned command");
		Ok(outcome)
	}

	/// `.server info` player counts.
	pub async fn get_online_players(&self, raises: bool) -> Result<OnlinePlayers> {
		let outcome = self.run(".server info".into(), raises).await?;
		extract_online_players(&outcome.message)
	}

	/// True if the server answers `.server info` with player counts; false
	/// if its host is stopped.
	pub async fn is_server_online(&self, raises: bool) -> Result<bool> {
		match self.get_online_players(raises).await {
			Ok(_) => Ok(true),
			Err(Error::HostNotRunning { server_id }) => {
				debug!(%server_id, "host not running");
				Ok(false)
			}
			Err(e) => Err(e),
		}
	}

	pub async fn create_account(&self, username: &str, password: &str, raises: bool) -> Result<bool> {
		let outcome = self.run(format!(".account create {username} {password}"), raises).await?;
		Ok(outcome.succeeded)
	}

	pub async fn set_gm_level(&self, username: &str, level: i32, realm_id: i32, raises: bool) -> Result<bool> {
		let outcome = self
			.run(format!(".account set gmlevel {username} {level} {realm_id}"), raises)
			.await?;
		Ok(outcome.succeeded)
	}

	pub async fn set_password(&self, username: &str, password: &str, raises: bool) -> Result<bool> {
		let outcome = self
			.run(format!(".account set password {username} {password} {password}"), raises)
			.await?;
		Ok(outcome.succeeded)
	}

	pub async fn delete_account(&self, username: &str, raises: bool) -> Result<bool> {
		let outcome = self.run(format!(".account delete {username}"), raises).await?;
		Ok(outcome.succeeded)
	}

	/// Accounts with GM permissions. A failed outcome is always an error.
	pub async fn gm_list(&self, raises: bool) -> Result<Vec<GmAccount>> {
		let request = ProtocolRequest::new(".gm list");
		let outcome = self.run(request.command.clone(), raises).await?;
		if !outcome.succeeded {
			return Err(Error::command_failed(&request, &outcome));
		}
		parse_gm_list(&outcome.message)
	}
}

/// Asks the local world server for its player counts; never fails.
pub async fn count_online_players<E>(executor: &E, request: ProtocolRequest) -> ServerStatus
where
	E: Execute + ?Sized,
{
	let counts = match executor.execute(&request).await {
		Ok(outcome) => extract_online_players(&outcome.message),
		Err(e) => Err(e),
	};
	match counts {
		Ok(counts) => ServerStatus {
			connected_players: Some(counts.connected_players),
			characters_in_world: Some(counts.characters_in_world),
			server_is_online: true,
		},
		Err(e) => {
			debug!(error = %e, "server info unavailable");
			ServerStatus {
				connected_players: None,
				characters_in_world: None,
				server_is_online: false,
			}
		}
	}
}

#[cfg(test)]
mod tests;

use std::path::PathBuf;

use clap::{ArgAction, Args, Parser, Subcommand};

use crate::output::OutputFormat;
use crate::styles::cli_styles;

/// Root CLI for acsoap.
#[derive(Parser, Debug)]
#[command(name = "acsoap")]
#[command(about = "Run AzerothCore GM commands over SOAP, locally or on remote hosts")]
#[command(version)]
#[command(styles = cli_styles())]
pub struct Cli {
	/// Increase verbosity (-v info, -vv debug)
	#[arg(short, long, global = true, action = ArgAction::Count)]
	pub verbose: u8,

	/// Output format for `remote` and `canned`: json (default), ndjson, or text
	#[arg(short = 'f', long, global = true, value_enum, default_value = "json")]
	pub format: OutputFormat,

	/// Config file (default: $ACSOAP_CONFIG or ~/.config/acsoap/config.json)
	#[arg(long, global = true, value_name = "FILE")]
	pub config: Option<PathBuf>,

	/// SOAP host, overriding the config file
	#[arg(long, global = true, value_name = "HOST")]
	pub host: Option<String>,

	/// SOAP port, overriding the config file
	#[arg(long, global = true, value_name = "PORT")]
	pub port: Option<u16>,

	#[command(subcommand)]
	pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
	/// Run GM commands against the local world server.
	///
	/// Prints one JSON outcome per line. A single `s3://` argument is read
	/// as a batch from the blob store.
	Gm(GmArgs),
	/// Run a batch of requests stored in the blob store.
	BatchGm(BatchGmArgs),
	/// Run GM commands on a configured remote server.
	Remote(RemoteArgs),
	/// Canned GM operations.
	Canned(CannedArgs),
}

/// GM account overriding the configured SOAP credentials.
#[derive(Args, Debug, Clone, Default, PartialEq, Eq)]
pub struct CredentialFlags {
	/// GM account name
	#[arg(long = "user", value_name = "NAME")]
	pub username: Option<String>,

	/// GM account password
	#[arg(long = "pass", alias = "pwd", value_name = "PASSWORD")]
	pub password: Option<String>,
}

/// Flags shared by the host-side commands.
#[derive(Args, Debug, Clone)]
pub struct ExecFlags {
	#[command(flatten)]
	pub credentials: CredentialFlags,

	/// Stop at the first failed command and exit non-zero
	#[arg(long, value_name = "BOOL", default_value_t = true, action = ArgAction::Set)]
	pub raises: bool,

	/// Write outcomes to this blob as a JSON array instead of stdout
	#[arg(long, value_name = "URI")]
	pub output_location: Option<String>,
}

#[derive(Args, Debug, Clone)]
pub struct GmArgs {
	/// GM command(s), e.g. ".server info"
	#[arg(value_name = "COMMAND", required = true)]
	pub commands: Vec<String>,

	#[command(flatten)]
	pub flags: ExecFlags,
}

#[derive(Args, Debug, Clone)]
pub struct BatchGmArgs {
	/// Blob holding a JSON request object or array, e.g. s3://bucket/in.json
	#[arg(value_name = "URI")]
	pub input_location: String,

	#[command(flatten)]
	pub flags: ExecFlags,
}

#[derive(Args, Debug, Clone)]
pub struct RemoteArgs {
	/// Server id from the config host table, e.g. sbx-blue
	#[arg(value_name = "SERVER_ID")]
	pub server_id: String,

	/// GM command(s); a single `s3://` argument is a stored batch
	#[arg(value_name = "COMMAND", required = true)]
	pub commands: Vec<String>,

	#[command(flatten)]
	pub flags: ExecFlags,

	/// Write the batch to this blob and run it with `batch-gm`
	#[arg(long, value_name = "URI")]
	pub input_location: Option<String>,

	/// Return the job handle without waiting
	#[arg(long = "async")]
	pub no_wait: bool,

	/// Seconds between polls
	#[arg(long, value_name = "SECONDS")]
	pub delay: Option<f64>,

	/// Seconds to wait for the job before giving up
	#[arg(long, value_name = "SECONDS")]
	pub timeout: Option<f64>,
}

#[derive(Args, Debug, Clone)]
pub struct CannedArgs {
	#[command(subcommand)]
	pub action: CannedAction,
}

#[derive(Subcommand, Debug, Clone)]
pub enum CannedAction {
	/// Player counts of the local world server; reports offline instead of failing.
	CountOnlinePlayers(CredentialFlags),
}

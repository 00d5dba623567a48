//! Subcommand handlers.

mod canned;
mod gm;
mod remote;

use acsoap::ConnectionDefaults;
use acsoap_runtime::{BlobUri, FileBlobStore};
use tracing::debug;

use crate::cli::{Cli, Commands};
use crate::config::Config;
use crate::error::{CliError, Result};
use crate::output::OutputFormat;

/// Settings shared by every handler, after flags are applied over the config.
#[derive(Debug, Clone)]
pub struct CommandContext {
	pub config: Config,
	pub defaults: ConnectionDefaults,
	pub format: OutputFormat,
}

impl CommandContext {
	pub fn new(config: Config, host: Option<String>, port: Option<u16>, format: OutputFormat) -> Self {
		let mut defaults = config.connection_defaults();
		if let Some(host) = host {
			defaults.host = host;
		}
		if let Some(port) = port {
			defaults.port = port;
		}
		Self {
			config,
			defaults,
			format,
		}
	}

	pub fn blob_store(&self) -> FileBlobStore {
		FileBlobStore::new(self.config.blob_root())
	}
}

pub async fn dispatch(cli: Cli) -> Result<()> {
	let config = Config::load(cli.config.as_deref())?;
	let ctx = CommandContext::new(config, cli.host, cli.port, cli.format);
	debug!(host = %ctx.defaults.host, port = ctx.defaults.port, "resolved SOAP defaults");

	match cli.command {
		Commands::Gm(args) => gm::run_gm(&ctx, args).await,
		Commands::BatchGm(args) => gm::run_batch_gm(&ctx, args).await,
		Commands::Remote(args) => remote::run(&ctx, args).await,
		Commands::Canned(args) => canned::run(&ctx, args).await,
	}
}

fn parse_location(uri: &str) -> Result<BlobUri> {
	BlobUri::parse(uri).map_err(|_| CliError::InvalidArgument(format!("{uri:?} is not a scheme://bucket/key location")))
}

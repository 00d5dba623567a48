//! `remote`: dispatch GM commands to a configured server.

use std::sync::Arc;
use std::time::Duration;

use acsoap::{DispatchMode, DispatchOptions, DispatchResult, RemoteDispatcher, RequestLike};
use acsoap_runtime::ShellJobRunner;
use tracing::warn;

use super::{CommandContext, parse_location};
use crate::cli::RemoteArgs;
use crate::error::{CliError, Result};
use crate::output::{RemoteData, ResultBuilder, print_result};

pub async fn run(ctx: &CommandContext, args: RemoteArgs) -> Result<()> {
	let builder = ResultBuilder::<RemoteData>::new("remote");
	let options = dispatch_options(ctx, &args)?;
	if options.mode == DispatchMode::Async {
		warn!("jobs of the local shell runner stop when this process exits");
	}

	let dispatcher = RemoteDispatcher::new(
		Arc::new(ctx.config.host_resolver()),
		Arc::new(ShellJobRunner::new()),
		Arc::new(ctx.blob_store()),
	);
	let input = match <[String; 1]>::try_from(args.commands) {
		Ok([command]) => RequestLike::Text(command),
		Err(commands) => RequestLike::Texts(commands),
	};

	let data = match dispatcher.dispatch(&args.server_id, input, &options).await? {
		DispatchResult::Job(handle) => RemoteData {
			server_id: args.server_id,
			job: Some(handle),
			outcomes: None,
		},
		DispatchResult::Outcomes(outcomes) => RemoteData {
			server_id: args.server_id,
			job: None,
			outcomes: Some(outcomes),
		},
	};
	print_result(&builder.data(data).build(), ctx.format);
	Ok(())
}

fn dispatch_options(ctx: &CommandContext, args: &RemoteArgs) -> Result<DispatchOptions> {
	let mut options = DispatchOptions::new()
		.fail_fast(args.flags.raises)
		.executor_path(ctx.config.executor_path());
	options.username = args.flags.credentials.username.clone();
	options.password = args.flags.credentials.password.clone();
	options.input_location = args.input_location.as_deref().map(parse_location).transpose()?;
	options.output_location = args.flags.output_location.as_deref().map(parse_location).transpose()?;

	options.mode = if args.no_wait {
		DispatchMode::Async
	} else {
		let mut poll = ctx.config.poll_options();
		if let Some(delay) = args.delay {
			poll.delay = seconds("--delay", delay)?;
		}
		if let Some(timeout) = args.timeout {
			poll.timeout = seconds("--timeout", timeout)?;
		}
		poll.verbose = true;
		DispatchMode::Sync(poll)
	};
	Ok(options)
}

fn seconds(flag: &str, value: f64) -> Result<Duration> {
	Duration::try_from_secs_f64(value)
		.map_err(|_| CliError::InvalidArgument(format!("{flag} must be a non-negative number of seconds, got {value}")))
}

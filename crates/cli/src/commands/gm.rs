//! Host-side `gm` and `batch-gm`.

use acsoap::{BatchOutput, LocalExecutor, OutputSink, RequestLike, normalize, run_batch_into};
use tracing::info;

use super::{CommandContext, parse_location};
use crate::cli::{BatchGmArgs, ExecFlags, GmArgs};
use crate::error::Result;
use crate::output::print_outcome_lines;

pub async fn run_gm(ctx: &CommandContext, args: GmArgs) -> Result<()> {
	let input = match <[String; 1]>::try_from(args.commands) {
		Ok([command]) => RequestLike::Text(command),
		Err(commands) => RequestLike::Texts(commands),
	};
	run_local(ctx, input, &args.flags).await
}

pub async fn run_batch_gm(ctx: &CommandContext, args: BatchGmArgs) -> Result<()> {
	let input = RequestLike::Blob(parse_location(&args.input_location)?);
	run_local(ctx, input, &args.flags).await
}

async fn run_local(ctx: &CommandContext, input: RequestLike, flags: &ExecFlags) -> Result<()> {
	let blobs = ctx.blob_store();
	let output_location = flags.output_location.as_deref().map(parse_location).transpose()?;

	let requests = normalize(
		input,
		flags.credentials.username.as_deref(),
		flags.credentials.password.as_deref(),
		Some(&blobs),
	)
	.await?;
	let executor = LocalExecutor::new(ctx.defaults.clone())?;

	let sink = match output_location {
		Some(ref uri) => OutputSink::Blob { store: &blobs, uri },
		None => OutputSink::Return,
	};
	match run_batch_into(&executor, &requests, flags.raises, sink).await? {
		BatchOutput::Outcomes(outcomes) => print_outcome_lines(&outcomes)?,
		BatchOutput::Stored { uri, count } => info!(%uri, count, "outcomes stored"),
	}
	Ok(())
}

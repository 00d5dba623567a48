use acsoap_cli::{cli::Cli, commands, error::CliError, logging, output};
use clap::Parser;

#[tokio::main]
async fn main() {
	let cli = Cli::parse();
	logging::init_logging(cli.verbose);

	if let Err(err) = commands::dispatch(cli).await {
		handle_error(err);
		std::process::exit(1);
	}
}

fn handle_error(err: CliError) {
	// stdout may already hold outcome lines, so errors only go to stderr
	output::print_error_stderr(&err.to_command_error());
}

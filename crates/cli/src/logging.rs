use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt::writer::MakeWriterExt;

/// Installs the stderr subscriber. `RUST_LOG` wins over `verbosity`.
///
/// stdout carries outcome records, so logs never go there.
pub fn init_logging(verbosity: u8) {
	// 0 = warnings (non-loopback SOAP target, count mismatches)
	// 1 (-v) = info: dispatches, poll ticks in verbose mode
	// 2+ (-vv) = debug for everything, including reqwest/hyper
	let filter = match verbosity {
		0 => "warn",
		1 => "info,hyper=warn,reqwest=warn",
		_ => "debug",
	};

	let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));

	let stderr = std::io::stderr.with_max_level(tracing::Level::TRACE);

	tracing_subscriber::fmt()
		.with_env_filter(env_filter)
		.with_writer(stderr)
		.with_target(true)
		.with_level(true)
		.compact()
		.init();
}

use std::path::PathBuf;

use clap::Parser;

use super::*;

#[test]
fn parse_gm_with_defaults() {
	let cli = Cli::try_parse_from(["acsoap", "gm", ".server info"]).unwrap();

	assert_eq!(cli.verbose, 0);
	assert_eq!(cli.format, OutputFormat::Json);
	match cli.command {
		Commands::Gm(args) => {
			assert_eq!(args.commands, [".server info"]);
			assert!(args.flags.raises);
			assert_eq!(args.flags.credentials.username, None);
			assert_eq!(args.flags.output_location, None);
		}
		_ => panic!("Expected Gm command"),
	}
}

#[test]
fn parse_gm_as_built_by_the_dispatcher() {
	let cli = Cli::try_parse_from([
		"acsoap",
		"gm",
		"--user=gm",
		"--pass=pw",
		"--raises=false",
		"--output-location=s3://bucket/out.json",
		"--",
		".account create test1 1234",
	])
	.unwrap();

	match cli.command {
		Commands::Gm(args) => {
			assert_eq!(args.commands, [".account create test1 1234"]);
			assert_eq!(args.flags.credentials.username.as_deref(), Some("gm"));
			assert_eq!(args.flags.credentials.password.as_deref(), Some("pw"));
			assert!(!args.flags.raises);
			assert_eq!(args.flags.output_location.as_deref(), Some("s3://bucket/out.json"));
		}
		_ => panic!("Expected Gm command"),
	}
}

#[test]
fn parse_gm_requires_a_command() {
	assert!(Cli::try_parse_from(["acsoap", "gm"]).is_err());
}

#[test]
fn parse_batch_gm() {
	let cli = Cli::try_parse_from(["acsoap", "batch-gm", "--raises=true", "s3://bucket/in.json"]).unwrap();

	match cli.command {
		Commands::BatchGm(args) => {
			assert_eq!(args.input_location, "s3://bucket/in.json");
			assert!(args.flags.raises);
		}
		_ => panic!("Expected BatchGm command"),
	}
}

#[test]
fn parse_remote_async() {
	let cli = Cli::try_parse_from([
		"acsoap",
		"remote",
		"sbx-blue",
		".server info",
		".gm list",
		"--async",
		"--input-location",
		"s3://bucket/in.json",
	])
	.unwrap();

	match cli.command {
		Commands::Remote(args) => {
			assert_eq!(args.server_id, "sbx-blue");
			assert_eq!(args.commands, [".server info", ".gm list"]);
			assert!(args.no_wait);
			assert_eq!(args.input_location.as_deref(), Some("s3://bucket/in.json"));
			assert_eq!(args.delay, None);
		}
		_ => panic!("Expected Remote command"),
	}
}

#[test]
fn parse_remote_poll_settings() {
	let cli = Cli::try_parse_from([
		"acsoap",
		"remote",
		"sbx-blue",
		".server info",
		"--delay",
		"0.5",
		"--timeout",
		"30",
	])
	.unwrap();

	match cli.command {
		Commands::Remote(args) => {
			assert_eq!(args.delay, Some(0.5));
			assert_eq!(args.timeout, Some(30.0));
			assert!(!args.no_wait);
		}
		_ => panic!("Expected Remote command"),
	}
}

#[test]
fn parse_canned_with_global_flags() {
	let cli = Cli::try_parse_from([
		"acsoap",
		"canned",
		"count-online-players",
		"-vv",
		"-f",
		"text",
		"--config",
		"/tmp/acsoap.json",
		"--host",
		"127.0.0.1",
		"--port",
		"7879",
	])
	.unwrap();

	assert_eq!(cli.verbose, 2);
	assert_eq!(cli.format, OutputFormat::Text);
	assert_eq!(cli.config, Some(PathBuf::from("/tmp/acsoap.json")));
	assert_eq!(cli.host.as_deref(), Some("127.0.0.1"));
	assert_eq!(cli.port, Some(7879));
	assert!(matches!(
		cli.command,
		Commands::Canned(CannedArgs {
			action: CannedAction::CountOnlinePlayers(CredentialFlags {
				username: None,
				password: None
			})
		})
	));
}

#[test]
fn parse_canned_credentials() {
	let cli = Cli::try_parse_from(["acsoap", "canned", "count-online-players", "--user", "gm", "--pwd", "pw"]).unwrap();

	match cli.command {
		Commands::Canned(CannedArgs {
			action: CannedAction::CountOnlinePlayers(credentials),
		}) => {
			assert_eq!(credentials.username.as_deref(), Some("gm"));
			assert_eq!(credentials.password.as_deref(), Some("pw"));
		}
		_ => panic!("Expected Canned command"),
	}
}

#[test]
fn parse_rejects_unknown_format() {
	assert!(Cli::try_parse_from(["acsoap", "-f", "toon", "gm", "x"]).is_err());
}

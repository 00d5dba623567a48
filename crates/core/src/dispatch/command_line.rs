//! Shell command lines that invoke the host-side `acsoap` binary.

use acsoap_protocol::ProtocolRequest;
use acsoap_runtime::BlobUri;

/// Builds `gm` / `batch-gm` invocations for one dispatch.
///
/// ```text
/// {executor} gm --user=admin --pass=admin --raises=true -- '.server info'
/// {executor} batch-gm --raises=false --output-location=s3://b/out.json s3://b/in.json
/// ```
#[derive(Debug, Clone)]
pub struct CommandLineBuilder<'a> {
	executor_path: &'a str,
	fail_fast: bool,
	output_location: Option<&'a BlobUri>,
}

impl<'a> CommandLineBuilder<'a> {
	pub fn new(executor_path: &'a str, fail_fast: bool) -> Self {
		Self {
			executor_path,
			fail_fast,
			output_location: None,
		}
	}

	pub fn output_location(mut self, location: Option<&'a BlobUri>) -> Self {
		self.output_location = location;
		self
	}

	/// One `gm` line carrying the request's command and credentials.
	pub fn gm(&self, request: &ProtocolRequest) -> String {
		let mut line = self.head("gm");
		push_credentials(&mut line, request.username.as_deref(), request.password.as_deref());
		self.push_policy(&mut line);
		line.push_str(" -- ");
		line.push_str(&shell_quote(&request.command));
		line
	}

	/// One `batch-gm` line reading its requests from `input`.
	///
	/// Credentials already live in the blob records, so the flags are only
	/// passed when given.
	pub fn batch_gm(&self, input: &BlobUri, username: Option<&str>, password: Option<&str>) -> String {
		let mut line = self.head("batch-gm");
		push_credentials(&mut line, username, password);
		self.push_policy(&mut line);
		line.push(' ');
		line.push_str(&shell_quote(&input.to_string()));
		line
	}

	fn head(&self, subcommand: &str) -> String {
		format!("{} {subcommand}", shell_quote(self.executor_path))
	}

	fn push_policy(&self, line: &mut String) {
		line.push_str(if self.fail_fast {
			" --raises=true"
		} else {
			" --raises=false"
		});
		if let Some(location) = self.output_location {
			line.push_str(" --output-location=");
			line.push_str(&shell_quote(&location.to_string()));
		}
	}
}

fn push_credentials(line: &mut String, username: Option<&str>, password: Option<&str>) {
	if let Some(username) = username {
		line.push_str(" --user=");
		line.push_str(&shell_quote(username));
	}
	if let Some(password) = password {
		line.push_str(" --pass=");
		line.push_str(&shell_quote(password));
	}
}

/// Quotes `value` for a POSIX shell.
///
/// Words made only of safe characters are left bare; anything else is
/// wrapped in single quotes with embedded `'` written as `'\''`.
pub fn shell_quote(value: &str) -> String {
	let safe = !value.is_empty()
		&& value
			.bytes()
			.all(|b| b.is_ascii_alphanumeric() || b"@%+=:,./-_".contains(&b));
	if safe {
		return value.to_string();
	}
	format!("'{}'", value.replace('\'', r"'\''"))
}

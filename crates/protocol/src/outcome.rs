use serde::{Deserialize, Serialize};

use crate::envelope;
use crate::error::Result;

/// Parsed result of one GM command.
///
/// `succeeded` is true iff the response carried a `<result>` element.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProtocolOutcome {
	/// Raw SOAP response body, trimmed.
	pub body: String,
	/// `<result>` text on success, `<faultstring>` text on failure.
	pub message: String,
	pub succeeded: bool,
}

impl ProtocolOutcome {
	/// Parses a raw SOAP response body.
	///
	/// # Errors
	///
	/// Returns [`Error::UnrecognizedResponse`](crate::Error::UnrecognizedResponse)
	/// when the body holds neither element.
	pub fn parse(body: &str) -> Result<Self> {
		let reply = envelope::scan(body)?;
		Ok(Self {
			body: body.trim().to_string(),
			message: reply.message,
			succeeded: reply.succeeded,
		})
	}

	pub fn to_json(&self) -> Result<String> {
		Ok(serde_json::to_string(self)?)
	}

	pub fn from_json(json: &str) -> Result<Self> {
		Ok(serde_json::from_str(json)?)
	}
}

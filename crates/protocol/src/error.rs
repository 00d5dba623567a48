use thiserror::Error;

/// Result type alias for protocol operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised while building or reading protocol records.
#[derive(Debug, Error)]
pub enum Error {
	/// The response body carried neither a `<result>` nor a `<faultstring>`.
	///
	/// The remote side did not speak the expected protocol. Never retried.
	#[error("Cannot parse the SOAP response: {body:?}")]
	UnrecognizedResponse { body: String },

	/// A request was built with empty command text.
	#[error("GM command must not be empty")]
	EmptyCommand,

	/// JSON record (de)serialization failed.
	#[error("JSON error: {0}")]
	Json(#[from] serde_json::Error),
}

//! Wire types for the AzerothCore SOAP GM command protocol.
//!
//! The world server exposes a console over SOAP: a single `executeCommand`
//! call carrying one line of GM command text. This crate owns everything that
//! crosses that wire:
//!
//! - [`ProtocolRequest`] - one GM command plus optional credentials/target
//! - [`ConnectionDefaults`] - the fallback credentials and address
//! - [`ProtocolOutcome`] - the parsed success or fault of one command
//! - [`envelope`] - the request template and the response scanner
//!
//! Nothing here performs I/O. Sending lives in `acsoap-runtime`.

pub mod envelope;
mod error;
mod outcome;
mod request;

pub use error::{Error, Result};
pub use outcome::ProtocolOutcome;
pub use request::{ConnectionDefaults, ProtocolRequest};

/// Default GM account used when neither the request nor the caller names one.
pub const DEFAULT_USERNAME: &str = "admin";

/// Default GM account password.
pub const DEFAULT_PASSWORD: &str = "admin";

/// Default SOAP host. The SOAP port must never be exposed publicly.
pub const DEFAULT_HOST: &str = "localhost";

/// Default AzerothCore SOAP port.
pub const DEFAULT_PORT: u16 = 7878;

/// Content type sent with every envelope.
pub const CONTENT_TYPE: &str = "application/xml";

/// Serializes a batch of records as one JSON array.
pub fn to_json_array<T: serde::Serialize>(items: &[T]) -> Result<String> {
	Ok(serde_json::to_string(items)?)
}

/// Parses a JSON array of records.
pub fn from_json_array<T: serde::de::DeserializeOwned>(json: &str) -> Result<Vec<T>> {
	Ok(serde_json::from_str(json)?)
}

//! Normalization of caller input into an ordered batch of requests.

use acsoap_protocol::ProtocolRequest;
use acsoap_runtime::{BlobStore, BlobUri};
use serde_json::Value;
use tracing::debug;

use crate::error::{Error, Result};

/// Every input shape a caller may hand to the executor or the dispatcher.
///
/// Text beginning with `s3://` is a blob reference; it is only resolved by
/// [`normalize`], which needs a [`BlobStore`] to do so.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RequestLike {
	Text(String),
	Texts(Vec<String>),
	Request(ProtocolRequest),
	Requests(Vec<ProtocolRequest>),
	Blob(BlobUri),
}

impl From<&str> for RequestLike {
	fn from(text: &str) -> Self {
		RequestLike::Text(text.to_string())
	}
}

impl From<String> for RequestLike {
	fn from(text: String) -> Self {
		RequestLike::Text(text)
	}
}

impl From<Vec<String>> for RequestLike {
	fn from(texts: Vec<String>) -> Self {
		RequestLike::Texts(texts)
	}
}

impl From<Vec<&str>> for RequestLike {
	fn from(texts: Vec<&str>) -> Self {
		RequestLike::Texts(texts.into_iter().map(str::to_string).collect())
	}
}

impl From<ProtocolRequest> for RequestLike {
	fn from(request: ProtocolRequest) -> Self {
		RequestLike::Request(request)
	}
}

impl From<Vec<ProtocolRequest>> for RequestLike {
	fn from(requests: Vec<ProtocolRequest>) -> Self {
		RequestLike::Requests(requests)
	}
}

impl From<BlobUri> for RequestLike {
	fn from(uri: BlobUri) -> Self {
		RequestLike::Blob(uri)
	}
}

/// Turns `input` into a non-empty ordered list of requests with default
/// credentials applied.
///
/// Blob references are loaded from `blobs` and must hold a JSON object (one
/// request) or an array of objects.
///
/// # Errors
///
/// - [`Error::InvalidInput`] for empty input, blank commands or blob JSON of
///   another shape
/// - [`Error::Configuration`] for a blob reference without a blob store
/// - [`Error::Blob`] if the blob cannot be read
pub async fn normalize(
	input: RequestLike,
	username: Option<&str>,
	password: Option<&str>,
	blobs: Option<&dyn BlobStore>,
) -> Result<Vec<ProtocolRequest>> {
	let mut requests = match input {
		RequestLike::Text(text) if BlobUri::is_reference(&text) => {
			let uri = BlobUri::parse(&text).map_err(Error::blob)?;
			load_blob(&uri, blobs).await?
		}
		RequestLike::Text(text) => vec![ProtocolRequest::new(text)],
		RequestLike::Texts(texts) => texts.into_iter().map(ProtocolRequest::new).collect(),
		RequestLike::Request(request) => vec![request],
		RequestLike::Requests(requests) => requests,
		RequestLike::Blob(uri) => load_blob(&uri, blobs).await?,
	};

	if requests.is_empty() {
		return Err(Error::InvalidInput("a batch needs at least one request".into()));
	}
	for request in &mut requests {
		request.validate()?;
		request.set_default(username, password);
	}
	Ok(requests)
}

async fn load_blob(uri: &BlobUri, blobs: Option<&dyn BlobStore>) -> Result<Vec<ProtocolRequest>> {
	let blobs = blobs.ok_or_else(|| Error::Configuration(format!("no blob store configured to read {uri}")))?;
	let body = blobs.get(uri).await.map_err(Error::blob)?;
	debug!(%uri, bytes = body.len(), "loaded request blob");

	match serde_json::from_str::<Value>(&body)? {
		value @ Value::Object(_) => Ok(vec![serde_json::from_value(value)?]),
		Value::Array(items) => items
			.into_iter()
			.enumerate()
			.map(|(i, item)| match item {
				Value::Object(_) => Ok(serde_json::from_value(item)?),
				other => Err(Error::InvalidInput(format!(
					"element {i} of {uri} must be an object, not {}",
					json_kind(&other)
				))),
			})
			.collect(),
		other => Err(Error::InvalidInput(format!(
			"data in {uri} must be an object or an array of objects, not {}",
			json_kind(&other)
		))),
	}
}

fn json_kind(value: &Value) -> &'static str {
	match value {
		Value::Null => "null",
		Value::Bool(_) => "a boolean",
		Value::Number(_) => "a number",
		Value::String(_) => "a string",
		Value::Array(_) => "an array",
		Value::Object(_) => "an object",
	}
}

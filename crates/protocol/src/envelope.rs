//! SOAP envelope template and response scanner.
//!
//! The request side is a fixed `executeCommand` document with a single
//! substitution point. The command text is inserted verbatim: the legacy
//! server expects it unescaped, so callers own its content.
//!
//! The response side is scanned, not parsed: only the first `<result>` or
//! `<faultstring>` element matters and the surrounding namespaces are opaque.

use std::sync::LazyLock;

use regex::Regex;

use crate::error::{Error, Result};
use crate::request::ProtocolRequest;

/// AzerothCore `executeCommand` request document, `{command}` is the slot.
pub const ENVELOPE_TEMPLATE: &str = include_str!("execute-command.xml");

const COMMAND_SLOT: &str = "{command}";

static RESULT_RE: LazyLock<Regex> =
	LazyLock::new(|| Regex::new(r"(?s)<result(?:\s[^>]*?)?(?:/>|>(.*?)</result>)").unwrap());
static FAULTSTRING_RE: LazyLock<Regex> =
	LazyLock::new(|| Regex::new(r"(?s)<faultstring(?:\s[^>]*?)?(?:/>|>(.*?)</faultstring>)").unwrap());
static ENTITY_RE: LazyLock<Regex> =
	LazyLock::new(|| Regex::new(r"&(#[xX][0-9a-fA-F]+|#[0-9]+|amp|lt|gt|quot|apos);").unwrap());

/// Payload found in a response body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reply {
	pub message: String,
	pub succeeded: bool,
}

/// Builds the outbound envelope for `request`.
pub fn build_envelope(request: &ProtocolRequest) -> String {
	ENVELOPE_TEMPLATE.trim_end().replacen(COMMAND_SLOT, &request.command, 1)
}

/// Finds the first `<result>`, else the first `<faultstring>`, in `body`.
///
/// # Errors
///
/// Returns [`Error::UnrecognizedResponse`] when neither element is present.
pub fn scan(body: &str) -> Result<Reply> {
	if let Some(text) = first_element_text(&RESULT_RE, body) {
		return Ok(Reply {
			message: text,
			succeeded: true,
		});
	}
	if let Some(text) = first_element_text(&FAULTSTRING_RE, body) {
		return Ok(Reply {
			message: text,
			succeeded: false,
		});
	}
	Err(Error::UnrecognizedResponse {
		body: body.to_string(),
	})
}

fn first_element_text(re: &Regex, body: &str) -> Option<String> {
	let caps = re.captures(body)?;
	let inner = caps.get(1).map(|m| m.as_str()).unwrap_or_default();
	Some(decode_entities(inner).trim().to_string())
}

/// Decodes the predefined XML entities and numeric character references.
///
/// Unknown or out-of-range references are left untouched.
pub fn decode_entities(text: &str) -> String {
	if !text.contains('&') {
		return text.to_string();
	}
	ENTITY_RE
		.replace_all(text, |caps: &regex::Captures<'_>| {
			let entity = &caps[1];
			let decoded = match entity {
				"amp" => Some('&'),
				"lt" => Some('<'),
				"gt" => Some('>'),
				"quot" => Some('"'),
				"apos" => Some('\''),
				_ => parse_char_ref(entity),
			};
			decoded.map(String::from).unwrap_or_else(|| caps[0].to_string())
		})
		.into_owned()
}

fn parse_char_ref(entity: &str) -> Option<char> {
	let digits = entity.strip_prefix('#')?;
	let code = match digits.strip_prefix(['x', 'X']) {
		Some(hex) => u32::from_str_radix(hex, 16).ok()?,
		None => digits.parse::<u32>().ok()?,
	};
	char::from_u32(code)
}

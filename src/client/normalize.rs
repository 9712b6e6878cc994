//! Converts raw HTTP responses into [`FeedlyResult`] values.

// crates.io
use oauth2::HttpResponse;
// self
use crate::{_prelude::*, http::ResponseSnapshot};

/// Uniform success shape returned from every API call.
#[derive(Clone, Debug)]
pub struct FeedlyResult {
	/// Status line and headers of the response.
	pub response: ResponseSnapshot,
	/// Parsed JSON body; `Value::Null` for empty bodies.
	pub body: Value,
}
impl FeedlyResult {
	/// Decodes the body into a typed value.
	pub fn json<T>(&self) -> Result<T>
	where
		T: for<'de> Deserialize<'de>,
	{
		serde_path_to_error::deserialize(&self.body)
			.map_err(|err| Error::decode(err, self.response.status.as_u16()))
	}
}

/// Parses the body of `response` as JSON.
///
/// The status is not inspected; non-2xx responses with a JSON body still normalize so callers can
/// read the API's error payload.
pub fn normalize(response: HttpResponse) -> Result<FeedlyResult> {
	let snapshot = ResponseSnapshot::of(&response);
	let body = parse_body(response.body(), snapshot.status.as_u16())?;

	Ok(FeedlyResult { response: snapshot, body })
}

fn parse_body(bytes: &[u8], status: u16) -> Result<Value> {
	if bytes.iter().all(u8::is_ascii_whitespace) {
		return Ok(Value::Null);
	}

	let mut de = serde_json::Deserializer::from_slice(bytes);
	let value: Value =
		serde_path_to_error::deserialize(&mut de).map_err(|err| Error::decode(err, status))?;

	de.end().map_err(|source| Error::Decode { path: ".".into(), source, status })?;

	Ok(value)
}

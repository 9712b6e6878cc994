//! Client-level error types shared across configuration, dispatch, and refresh.

// self
use crate::_prelude::*;

/// Crate-wide result type alias returning [`Error`] by default.
pub type Result<T, E = Error> = std::result::Result<T, E>;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Canonical client error exposed by public APIs.
#[derive(Debug, ThisError)]
pub enum Error {
	/// Local configuration problem.
	#[error(transparent)]
	Config(#[from] ConfigError),
	/// Client state does not allow the requested read.
	#[error(transparent)]
	State(#[from] StateError),
	/// Transport failure (DNS, TCP, TLS).
	#[error(transparent)]
	Transport(#[from] TransportError),
	/// Outbound request could not be assembled.
	#[error("Request could not be built.")]
	Request(#[from] oauth2::http::Error),

	/// Response body is not the JSON shape the caller expected.
	#[error("Response body is not valid JSON at `{path}`.")]
	Decode {
		/// JSON path where decoding stopped.
		path: String,
		/// Underlying parser failure.
		#[source]
		source: serde_json::Error,
		/// HTTP status code of the response.
		status: u16,
	},
	/// Token endpoint rejected the refresh exchange.
	#[error("Token endpoint returned status {status}: {message}.")]
	TokenEndpoint {
		/// HTTP status code returned by the token endpoint.
		status: u16,
		/// Short preview of the response body.
		message: String,
	},
	/// Token endpoint answered successfully but carried no usable `access_token`.
	#[error("Token endpoint response is missing access_token.")]
	MissingAccessToken,
	/// A refresh this call waited on failed; the call shares that failure instead of retrying.
	#[error("Concurrent token refresh failed: {message}")]
	SharedRefresh {
		/// Rendered failure of the attempt that was joined.
		message: String,
	},
}
impl Error {
	pub(crate) fn decode(err: serde_path_to_error::Error<serde_json::Error>, status: u16) -> Self {
		let path = err.path().to_string();

		Self::Decode { path, source: err.into_inner(), status }
	}
}

/// Configuration and validation failures raised while constructing a client.
#[derive(Debug, ThisError)]
pub enum ConfigError {
	/// No refresh token was supplied.
	#[error("A refresh token is required to construct a client.")]
	MissingRefreshToken,
	/// Base URL is not an absolute URL.
	#[error("Base URL `{url}` is invalid.")]
	InvalidBaseUrl {
		/// Raw base URL that failed validation.
		url: String,
		/// Underlying parsing failure.
		#[source]
		source: url::ParseError,
	},
}

/// Reads that require state the client has not observed yet.
#[derive(Debug, PartialEq, Eq, ThisError)]
pub enum StateError {
	/// No response has been recorded, so there is nothing to derive rate limits from.
	#[error("No response has been recorded yet.")]
	NoResponse,
}

/// Transport-level failures (network, IO).
#[derive(Debug, ThisError)]
pub enum TransportError {
	/// Underlying HTTP client reported a network failure.
	#[error("Network error occurred while calling the API.")]
	Network {
		/// Transport-specific network error.
		#[source]
		source: BoxError,
	},
	/// Underlying IO failure surfaced during transport.
	#[error("I/O error occurred while calling the API.")]
	Io(#[from] std::io::Error),
	/// Transport failed with a message only.
	#[error("HTTP client error: {0}.")]
	Other(String),
}
impl TransportError {
	/// Wraps a transport-specific network error.
	pub fn network(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::Network { source: Box::new(src) }
	}
}

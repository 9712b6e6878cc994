//! Client configuration: API base URL, seed tokens, and token-exchange credentials.

mod builder;

pub use builder::*;

// self
use crate::{_prelude::*, auth::TokenSecret, error::ConfigError};

/// Validated configuration consumed by [`Client`](crate::client::Client).
///
/// Values are produced by [`ClientConfigBuilder::build`] (or by deserializing the builder's
/// fields), so every instance carries a non-empty refresh token and a base URL with its trailing
/// slash removed.
#[derive(Clone, Deserialize)]
#[serde(try_from = "ClientConfigBuilder")]
pub struct ClientConfig {
	/// API origin without a trailing slash.
	pub base_url: String,
	/// Access token to use before the first refresh, if already known.
	pub access_token: Option<TokenSecret>,
	/// Long-lived credential exchanged for access tokens.
	pub refresh_token: TokenSecret,
	/// Starts a refresh as soon as the client is constructed.
	pub refresh_token_instant: bool,
	/// Client identifier sent to the token endpoint.
	pub client_id: String,
	/// Client secret sent to the token endpoint.
	pub client_secret: TokenSecret,
}
impl ClientConfig {
	/// Production API origin.
	pub const DEFAULT_BASE_URL: &'static str = "https://cloud.feedly.com";
	/// Client identifier used by the enterprise refresh flow.
	pub const DEFAULT_CLIENT_ID: &'static str = "feedlydev";
	/// Client secret used by the enterprise refresh flow.
	pub const DEFAULT_CLIENT_SECRET: &'static str = "feedlydev";

	/// Creates a builder seeded with the provided refresh token.
	pub fn builder(refresh_token: impl Into<String>) -> ClientConfigBuilder {
		ClientConfigBuilder::new().refresh_token(refresh_token)
	}
}
impl Debug for ClientConfig {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("ClientConfig")
			.field("base_url", &self.base_url)
			.field("access_token_set", &self.access_token.is_some())
			.field("refresh_token_instant", &self.refresh_token_instant)
			.field("client_id", &self.client_id)
			.finish()
	}
}
impl TryFrom<ClientConfigBuilder> for ClientConfig {
	type Error = ConfigError;

	fn try_from(builder: ClientConfigBuilder) -> Result<Self, Self::Error> {
		builder.build()
	}
}

/// Removes a single trailing slash from `raw`.
pub(crate) fn normalize_base_url(raw: &str) -> &str {
	raw.strip_suffix('/').unwrap_or(raw)
}

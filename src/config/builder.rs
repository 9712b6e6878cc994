// self
use crate::{
	_prelude::*,
	auth::TokenSecret,
	config::{ClientConfig, normalize_base_url},
	error::ConfigError,
};

/// Builder for [`ClientConfig`] values.
///
/// Also the serde shape of a configuration file; deserializing a [`ClientConfig`] goes through
/// [`ClientConfigBuilder::build`].
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
pub struct ClientConfigBuilder {
	/// API origin; defaults to [`ClientConfig::DEFAULT_BASE_URL`].
	pub base_url: Option<String>,
	/// Optional seed access token.
	pub access_token: Option<String>,
	/// Required refresh token.
	pub refresh_token: Option<String>,
	/// Starts a refresh immediately after construction.
	pub refresh_token_instant: bool,
	/// Overrides the token-exchange client identifier.
	pub client_id: Option<String>,
	/// Overrides the token-exchange client secret.
	pub client_secret: Option<String>,
}
impl ClientConfigBuilder {
	/// Creates an empty builder.
	pub fn new() -> Self {
		Self::default()
	}

	/// Sets the API origin.
	pub fn base_url(mut self, url: impl Into<String>) -> Self {
		self.base_url = Some(url.into());

		self
	}

	/// Seeds the session with a known access token.
	pub fn access_token(mut self, token: impl Into<String>) -> Self {
		self.access_token = Some(token.into());

		self
	}

	/// Sets the refresh token.
	pub fn refresh_token(mut self, token: impl Into<String>) -> Self {
		self.refresh_token = Some(token.into());

		self
	}

	/// Toggles the refresh started at construction time.
	pub fn refresh_token_instant(mut self, instant: bool) -> Self {
		self.refresh_token_instant = instant;

		self
	}

	/// Overrides the client identifier sent to the token endpoint.
	pub fn client_id(mut self, client_id: impl Into<String>) -> Self {
		self.client_id = Some(client_id.into());

		self
	}

	/// Overrides the client secret sent to the token endpoint.
	pub fn client_secret(mut self, secret: impl Into<String>) -> Self {
		self.client_secret = Some(secret.into());

		self
	}

	/// Validates the accumulated values and produces a [`ClientConfig`].
	pub fn build(self) -> Result<ClientConfig, ConfigError> {
		let refresh_token = self
			.refresh_token
			.filter(|token| !token.is_empty())
			.map(TokenSecret::new)
			.ok_or(ConfigError::MissingRefreshToken)?;
		let raw_base = self.base_url.as_deref().unwrap_or(ClientConfig::DEFAULT_BASE_URL);
		let base_url = normalize_base_url(raw_base).to_owned();

		Url::parse(&base_url)
			.map_err(|source| ConfigError::InvalidBaseUrl { url: raw_base.to_owned(), source })?;

		Ok(ClientConfig {
			base_url,
			access_token: self.access_token.filter(|token| !token.is_empty()).map(TokenSecret::new),
			refresh_token,
			refresh_token_instant: self.refresh_token_instant,
			client_id: self.client_id.unwrap_or_else(|| ClientConfig::DEFAULT_CLIENT_ID.into()),
			client_secret: TokenSecret::new(
				self.client_secret.unwrap_or_else(|| ClientConfig::DEFAULT_CLIENT_SECRET.into()),
			),
		})
	}
}

//! Feedly API client: the session owner every endpoint call flows through.

pub mod dispatch;
pub mod normalize;
pub mod refresh;

pub use dispatch::*;
pub use normalize::*;
pub use refresh::*;

// self
use crate::{
	_prelude::*,
	auth::{Session, TokenSecret},
	client::refresh::RefreshFlight,
	config::ClientConfig,
	error::StateError,
	http::{ApiHttpClient, LastResponseSlot, ResponseSnapshot},
	log::{ClientLogger, TracingLogger},
	ratelimit::RateLimit,
};
#[cfg(feature = "reqwest")] use crate::http::ReqwestHttpClient;

#[cfg(feature = "reqwest")]
/// Client specialized for the crate's default reqwest transport.
pub type ReqwestFeedlyClient = Client<ReqwestHttpClient>;

/// Authenticated handle to the Feedly API.
///
/// The client owns the session (current access token), the last observed response head, and the
/// single-flight guard that serializes token refreshes. Cloning is cheap and every clone shares
/// the same state, so endpoint wrappers can hold their own copy.
pub struct Client<C>
where
	C: ?Sized + ApiHttpClient,
{
	http_client: Arc<C>,
	logger: Arc<dyn ClientLogger>,
	config: Arc<ClientConfig>,
	session: Arc<Session>,
	last_response: LastResponseSlot,
	refresh_flight: Arc<RefreshFlight>,
	refresh_metrics: Arc<RefreshMetrics>,
}
impl<C> Client<C>
where
	C: ?Sized + ApiHttpClient,
{
	/// Creates a client over the caller-provided transport, logging through `tracing`.
	pub fn with_http_client(config: ClientConfig, http_client: impl Into<Arc<C>>) -> Self {
		Self::with_logger(config, http_client, Arc::new(TracingLogger))
	}

	/// Creates a client over the caller-provided transport and logger.
	///
	/// When [`ClientConfig::refresh_token_instant`] is set, a refresh is spawned on the current
	/// tokio runtime and not awaited. Without a runtime the instant refresh is skipped with a
	/// warning and the first request refreshes instead.
	pub fn with_logger(
		config: ClientConfig,
		http_client: impl Into<Arc<C>>,
		logger: Arc<dyn ClientLogger>,
	) -> Self {
		let session = Arc::new(Session::new(config.access_token.clone()));
		let client = Self {
			http_client: http_client.into(),
			logger,
			config: Arc::new(config),
			session,
			last_response: LastResponseSlot::default(),
			refresh_flight: Default::default(),
			refresh_metrics: Default::default(),
		};

		if client.config.refresh_token_instant {
			client.spawn_instant_refresh();
		}

		client
	}

	/// API origin without a trailing slash.
	pub fn base_url(&self) -> &str {
		&self.config.base_url
	}

	/// Access token currently attached to calls, if any.
	pub fn access_token(&self) -> Option<TokenSecret> {
		self.session.access_token()
	}

	/// Refresh token exchanged for new access tokens.
	pub fn refresh_token(&self) -> &TokenSecret {
		&self.config.refresh_token
	}

	/// Head of the most recent response, including non-2xx and undecodable ones.
	pub fn last_response(&self) -> Option<ResponseSnapshot> {
		self.last_response.latest()
	}

	/// Rate-limit counters from the most recent response.
	pub fn ratelimit(&self) -> Result<RateLimit, StateError> {
		self.last_response
			.latest()
			.map(|snapshot| RateLimit::from_snapshot(&snapshot))
			.ok_or(StateError::NoResponse)
	}

	/// Counters for refresh attempts issued by this client and its clones.
	pub fn refresh_metrics(&self) -> &RefreshMetrics {
		&self.refresh_metrics
	}

	fn spawn_instant_refresh(&self) {
		match tokio::runtime::Handle::try_current() {
			Ok(runtime) => {
				let client = self.clone();

				// Failures are already logged by the refresh itself.
				runtime.spawn(async move {
					let _ = client.refresh_auth_token().await;
				});
			},
			Err(_) => self.logger.warn(
				"No async runtime is available; skipping the instant refresh until the first request.",
			),
		}
	}
}
#[cfg(feature = "reqwest")]
impl Client<ReqwestHttpClient> {
	/// Creates a client that provisions its own reqwest transport.
	pub fn new(config: ClientConfig) -> Self {
		Self::with_http_client(config, ReqwestHttpClient::default())
	}
}
impl<C> Clone for Client<C>
where
	C: ?Sized + ApiHttpClient,
{
	fn clone(&self) -> Self {
		Self {
			http_client: self.http_client.clone(),
			logger: self.logger.clone(),
			config: self.config.clone(),
			session: self.session.clone(),
			last_response: self.last_response.clone(),
			refresh_flight: self.refresh_flight.clone(),
			refresh_metrics: self.refresh_metrics.clone(),
		}
	}
}
impl<C> Debug for Client<C>
where
	C: ?Sized + ApiHttpClient,
{
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("Client")
			.field("base_url", &self.config.base_url)
			.field("session", &self.session)
			.field("last_response_set", &self.last_response.latest().is_some())
			.finish()
	}
}

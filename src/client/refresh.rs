//! Refresh-token exchange with a single-flight guard, redacted logging, and metrics.
//!
//! [`Client::refresh_auth_token`] always performs an exchange, while the dispatcher goes through
//! [`Client::ensure_access_token`], which re-checks the session after acquiring the guard. A burst
//! of first calls made without an access token therefore produces exactly one token request.
//! Callers that queued behind an attempt share its outcome: the stored token on success, or
//! [`Error::SharedRefresh`] when that attempt failed.

mod metrics;

pub use self::metrics::{RefreshCounts, RefreshMetrics};

// std
use std::sync::atomic::{AtomicU64, Ordering};
// self
use crate::{
	_prelude::*,
	auth::{TokenSecret, redacted_placeholder},
	client::{Client, FeedlyResult, RequestOptions},
	http::ApiHttpClient,
	obs::{self, FlowKind, FlowSpan},
};

/// Token-exchange endpoint path.
pub const TOKEN_PATH: &str = "/v3/auth/token";

const REFRESH_FAILURE_CONTEXT: &str = "Failed to refresh access token";
const SECRET_FIELDS: [&str; 2] = ["access_token", "refresh_token"];
const ERROR_PREVIEW_CHARS: usize = 256;

/// Single-flight state shared by every clone of a client.
///
/// `generation` advances once per finished exchange. A caller that observes a different generation
/// after acquiring `last_failure` queued behind an attempt and takes its outcome.
#[derive(Debug, Default)]
pub(crate) struct RefreshFlight {
	generation: AtomicU64,
	last_failure: AsyncMutex<Option<String>>,
}

#[derive(Deserialize)]
struct TokenGrant {
	access_token: Option<String>,
}

impl<C> Client<C>
where
	C: ?Sized + ApiHttpClient,
{
	/// Exchanges the refresh token for a new access token and stores it in the session.
	///
	/// Failures are logged and returned; the session keeps its previous access token, so the
	/// next call that finds no token tries again.
	pub async fn refresh_auth_token(&self) -> Result<()> {
		let mut last_failure = self.refresh_flight.last_failure.lock().await;

		self.run_exchange(&mut last_failure).await
	}

	/// Refreshes only when no access token is held, joining any refresh already in flight.
	///
	/// A caller that waited on an attempt which failed receives [`Error::SharedRefresh`] instead of
	/// starting another exchange; the next call made after that attempt tries again.
	pub async fn ensure_access_token(&self) -> Result<()> {
		if self.session.has_access_token() {
			return Ok(());
		}

		let observed = self.refresh_flight.generation.load(Ordering::Acquire);
		let mut last_failure = self.refresh_flight.last_failure.lock().await;

		if self.session.has_access_token() {
			obs::record_refresh_joined(true);

			return Ok(());
		}

		let joined = self.refresh_flight.generation.load(Ordering::Acquire) != observed;

		if let Some(message) = last_failure.as_deref().filter(|_| joined) {
			obs::record_refresh_joined(false);

			return Err(Error::SharedRefresh { message: message.to_owned() });
		}

		self.run_exchange(&mut last_failure).await
	}

	async fn run_exchange(&self, last_failure: &mut Option<String>) -> Result<()> {
		let result = self.exchange_refresh_token().await;

		*last_failure = result.as_ref().err().map(ToString::to_string);

		self.refresh_flight.generation.fetch_add(1, Ordering::Release);

		result
	}

	async fn exchange_refresh_token(&self) -> Result<()> {
		let span = FlowSpan::start(FlowKind::Refresh, "refresh_auth_token").with_path(TOKEN_PATH);

		self.refresh_metrics.record_attempt();

		let result = span
			.instrument(async {
				let options = RequestOptions::post()
					.without_bearer()
					.json(serde_json::json!({
						"refresh_token": self.config.refresh_token.expose(),
						"client_id": self.config.client_id,
						"client_secret": self.config.client_secret.expose(),
						"grant_type": "refresh_token",
					}));
				let result = self.send(TOKEN_PATH, options).await?;
				let token = extract_access_token(&result)?;

				self.session.store(token);
				self.logger.info(&format!("Refreshed access token: {}", redact_grant(&result.body)));

				Ok::<_, Error>(())
			})
			.await;

		span.finish(&result);

		match &result {
			Ok(()) => self.refresh_metrics.record_success(),
			Err(err) => {
				self.refresh_metrics.record_failure();
				self.logger.error(REFRESH_FAILURE_CONTEXT, err);
			},
		}

		result
	}
}

fn extract_access_token(result: &FeedlyResult) -> Result<TokenSecret> {
	let status = result.response.status.as_u16();

	if !result.response.is_success() {
		return Err(Error::TokenEndpoint { status, message: preview(&result.body) });
	}

	let grant: TokenGrant =
		serde_path_to_error::deserialize(&result.body).map_err(|err| Error::decode(err, status))?;

	grant
		.access_token
		.filter(|token| !token.is_empty())
		.map(TokenSecret::new)
		.ok_or(Error::MissingAccessToken)
}

/// Copies a token response with every secret field replaced by its length placeholder.
fn redact_grant(body: &Value) -> Value {
	let mut redacted = body.clone();

	if let Some(fields) = redacted.as_object_mut() {
		for key in SECRET_FIELDS {
			if let Some(Value::String(raw)) = fields.get(key) {
				let placeholder = redacted_placeholder(raw);

				fields.insert(key.to_owned(), Value::String(placeholder));
			}
		}
	}

	redacted
}

fn preview(body: &Value) -> String {
	let rendered = redact_grant(body).to_string();

	match rendered.char_indices().nth(ERROR_PREVIEW_CHARS) {
		Some((idx, _)) => format!("{}...", &rendered[..idx]),
		None => rendered,
	}
}

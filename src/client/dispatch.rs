//! Request dispatcher: the single path every API call takes.

// crates.io
use oauth2::{AsyncHttpClient, HttpRequest, http::header};
// self
use crate::{
	_prelude::*,
	client::{Client, FeedlyResult, TOKEN_PATH, normalize},
	http::{ApiHttpClient, map_transport_error},
	obs::{FlowKind, FlowSpan},
};

/// Per-call options merged with the client's defaults.
#[derive(Clone, Debug)]
pub struct RequestOptions {
	/// HTTP method; defaults to `GET`.
	pub method: Method,
	/// Extra headers; entries override the client's defaults, including `Authorization`.
	pub headers: HeaderMap,
	/// JSON body, sent with `Content-Type: application/json` unless overridden.
	pub body: Option<Value>,
	/// Attaches `Authorization: OAuth <token>` when a token is held.
	pub bearer: bool,
	/// Prefix for the failure log line; defaults to `Failed to make call to <path>`.
	pub context: Option<String>,
}
impl RequestOptions {
	/// Creates `GET` options.
	pub fn get() -> Self {
		Self::default()
	}

	/// Creates `POST` options.
	pub fn post() -> Self {
		Self::default().method(Method::POST)
	}

	/// Overrides the HTTP method.
	pub fn method(mut self, method: Method) -> Self {
		self.method = method;

		self
	}

	/// Sets a header, replacing any previous value for the same name.
	pub fn header(mut self, name: HeaderName, value: HeaderValue) -> Self {
		self.headers.insert(name, value);

		self
	}

	/// Attaches a JSON body.
	pub fn json(mut self, body: Value) -> Self {
		self.body = Some(body);

		self
	}

	/// Suppresses the bearer header.
	pub fn without_bearer(mut self) -> Self {
		self.bearer = false;

		self
	}

	/// Overrides the failure log prefix.
	pub fn context(mut self, context: impl Into<String>) -> Self {
		self.context = Some(context.into());

		self
	}
}
impl Default for RequestOptions {
	fn default() -> Self {
		Self { method: Method::GET, headers: HeaderMap::new(), body: None, bearer: true, context: None }
	}
}

impl<C> Client<C>
where
	C: ?Sized + ApiHttpClient,
{
	/// Performs an API call against `base_url + path`.
	///
	/// When no access token is held (and `path` is not the token endpoint), the call first joins
	/// or starts a refresh. Every failure is logged with the options' context prefix and
	/// returned.
	pub async fn request(&self, path: &str, options: RequestOptions) -> Result<FeedlyResult> {
		let span = FlowSpan::start(FlowKind::Request, "request").with_path(path);
		let context =
			options.context.clone().unwrap_or_else(|| format!("Failed to make call to {path}"));
		let result = span
			.instrument(async {
				if path != TOKEN_PATH {
					self.ensure_access_token().await?;
				}

				self.send(path, options).await
			})
			.await;

		span.finish(&result);

		if let Err(err) = &result {
			self.logger.error(&context, err);
		}

		result
	}

	/// Dispatches without refreshing or logging; the transport records the response head.
	pub(crate) async fn send(&self, path: &str, options: RequestOptions) -> Result<FeedlyResult> {
		let request = self.build_request(path, options)?;
		let handle = self.http_client.with_last_response(self.last_response.clone());
		let response = handle.call(request).await.map_err(map_transport_error)?;

		normalize(response)
	}

	fn build_request(&self, path: &str, options: RequestOptions) -> Result<HttpRequest> {
		let RequestOptions { method, headers: overrides, body, bearer, .. } = options;
		let mut headers = HeaderMap::new();

		if let Some(token) = self.session.access_token().filter(|_| bearer) {
			let mut value = HeaderValue::from_str(&format!("OAuth {}", token.expose()))
				.map_err(oauth2::http::Error::from)?;

			value.set_sensitive(true);
			headers.insert(header::AUTHORIZATION, value);
		}

		let payload = match body {
			Some(json) => {
				headers.insert(header::CONTENT_TYPE, HeaderValue::from_static("application/json"));

				json.to_string().into_bytes()
			},
			None => Vec::new(),
		};

		headers.extend(overrides);

		let mut request = oauth2::http::Request::builder()
			.method(method)
			.uri(format!("{}{path}", self.config.base_url))
			.body(payload)?;

		*request.headers_mut() = headers;

		Ok(request)
	}
}

//! Transport primitives for Feedly API calls.
//!
//! The module exposes [`ApiHttpClient`] alongside [`ResponseSnapshot`] and
//! [`LastResponseSlot`] so downstream crates can integrate custom HTTP clients while the
//! client keeps observing the most recent response head. Implementations call
//! [`LastResponseSlot::store`] as soon as a status line and headers are known and before the
//! body is read, which keeps rate-limit headers observable even when body parsing fails later.

pub use oauth2;

// crates.io
#[cfg(feature = "reqwest")] use oauth2::HttpRequest;
use oauth2::{AsyncHttpClient, HttpClientError, HttpResponse};
// self
use crate::{_prelude::*, error::TransportError};

/// Abstraction over HTTP transports capable of executing API calls while publishing the response
/// head to the client's [`LastResponseSlot`].
///
/// The client requests short-lived [`AsyncHttpClient`] handles that each carry a clone of the
/// slot. Implementations must be `Send + Sync + 'static` so a client can be shared across tasks,
/// and the request futures their handles return must be `Send` so the instant refresh can run on
/// a spawned task.
pub trait ApiHttpClient
where
	Self: 'static + Send + Sync,
{
	/// Concrete error emitted by the underlying transport.
	type TransportError: 'static + Send + Sync + StdError;

	/// [`AsyncHttpClient`] handle tied to a [`LastResponseSlot`].
	type Handle: for<'c> AsyncHttpClient<
			'c,
			Error = HttpClientError<Self::TransportError>,
			Future: 'c + Send,
		>
		+ 'static
		+ Send
		+ Sync;

	/// Builds an [`AsyncHttpClient`] handle that records response heads in `slot`.
	///
	/// # Slot Contract
	///
	/// - Store a [`ResponseSnapshot`] once the status line and headers arrive, for every status.
	/// - Do not touch the slot when the request fails before any response exists; the previous
	///   snapshot must survive.
	fn with_last_response(&self, slot: LastResponseSlot) -> Self::Handle;
}

/// Status line and headers of a response, detached from its body.
#[derive(Clone, Debug)]
pub struct ResponseSnapshot {
	/// HTTP status code.
	pub status: StatusCode,
	/// Response headers.
	pub headers: HeaderMap,
}
impl ResponseSnapshot {
	/// Captures the head of a buffered [`HttpResponse`].
	pub fn of(response: &HttpResponse) -> Self {
		Self { status: response.status(), headers: response.headers().clone() }
	}

	/// Returns `true` for 2xx statuses.
	pub fn is_success(&self) -> bool {
		self.status.is_success()
	}

	/// Returns a header value as UTF-8 text, if present and printable.
	pub fn header_str(&self, name: &str) -> Option<&str> {
		self.headers.get(name).and_then(|value| value.to_str().ok())
	}

	/// Reattaches a buffered body to this head.
	pub fn with_body(self, body: Vec<u8>) -> HttpResponse {
		let mut response = HttpResponse::new(body);

		*response.status_mut() = self.status;
		*response.headers_mut() = self.headers;

		response
	}
}

/// Thread-safe slot holding the most recent [`ResponseSnapshot`] seen by a client.
///
/// Each store overwrites the previous snapshot; nothing accumulates.
#[derive(Clone, Debug, Default)]
pub struct LastResponseSlot(Arc<Mutex<Option<ResponseSnapshot>>>);
impl LastResponseSlot {
	/// Replaces the recorded snapshot.
	pub fn store(&self, snapshot: ResponseSnapshot) {
		*self.0.lock() = Some(snapshot);
	}

	/// Returns a clone of the recorded snapshot, if any.
	pub fn latest(&self) -> Option<ResponseSnapshot> {
		self.0.lock().clone()
	}
}

/// Converts a transport failure into a client [`Error`].
pub(crate) fn map_transport_error<E>(err: HttpClientError<E>) -> Error
where
	E: 'static + Send + Sync + StdError,
{
	match err {
		HttpClientError::Reqwest(inner) => TransportError::network(*inner).into(),
		HttpClientError::Http(inner) => Error::Request(inner),
		HttpClientError::Io(inner) => TransportError::Io(inner).into(),
		HttpClientError::Other(message) => TransportError::Other(message).into(),
		other => TransportError::Other(format!("unhandled HTTP client error: {other:?}")).into(),
	}
}

/// Thin wrapper around [`ReqwestClient`] so shared HTTP behavior lives in one place.
#[cfg(feature = "reqwest")]
#[derive(Clone, Default)]
pub struct ReqwestHttpClient(pub ReqwestClient);
#[cfg(feature = "reqwest")]
impl ReqwestHttpClient {
	/// Wraps an existing reqwest [`ReqwestClient`].
	pub fn with_client(client: ReqwestClient) -> Self {
		Self(client)
	}
}
#[cfg(feature = "reqwest")]
impl ApiHttpClient for ReqwestHttpClient {
	type Handle = RecordingHandle;
	type TransportError = ReqwestError;

	fn with_last_response(&self, slot: LastResponseSlot) -> Self::Handle {
		RecordingHandle(Arc::new(RecordingHttpClient { client: self.0.clone(), slot }))
	}
}

#[cfg(feature = "reqwest")]
struct RecordingHttpClient {
	client: ReqwestClient,
	slot: LastResponseSlot,
}

/// Handle returned by [`ReqwestHttpClient`] that records each response head.
#[cfg(feature = "reqwest")]
#[derive(Clone)]
pub struct RecordingHandle(Arc<RecordingHttpClient>);
#[cfg(feature = "reqwest")]
impl<'c> AsyncHttpClient<'c> for RecordingHandle {
	type Error = HttpClientError<ReqwestError>;
	type Future =
		Pin<Box<dyn Future<Output = Result<HttpResponse, Self::Error>> + 'c + Send + Sync>>;

	fn call(&'c self, request: HttpRequest) -> Self::Future {
		let inner = Arc::clone(&self.0);

		Box::pin(async move {
			let request: reqwest::Request = request.try_into().map_err(Box::new)?;
			let response = inner.client.execute(request).await.map_err(Box::new)?;
			let head =
				ResponseSnapshot { status: response.status(), headers: response.headers().clone() };

			inner.slot.store(head.clone());

			let body = response.bytes().await.map_err(Box::new)?;

			Ok(head.with_body(body.to_vec()))
		})
	}
}

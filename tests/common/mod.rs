// std
use std::sync::Arc;
// self
use feedly_session::{
	client::Client,
	config::ClientConfig,
	http::ReqwestHttpClient,
	log::MemoryLogger,
	reqwest::Client as ReqwestClient,
};

/// Client type used by reqwest-backed integration tests.
pub type ReqwestTestClient = Client<ReqwestHttpClient>;

/// Builds a reqwest HTTP client that accepts the self-signed certificates produced by `httpmock`.
pub fn test_reqwest_http_client() -> ReqwestHttpClient {
	let client = ReqwestClient::builder()
		.danger_accept_invalid_certs(true)
		.danger_accept_invalid_hostnames(true)
		.build()
		.expect("Failed to build insecure Reqwest client for tests.");

	ReqwestHttpClient::with_client(client)
}

/// Constructs a [`Client`] backed by the test reqwest transport and an in-memory logger.
pub fn build_reqwest_test_client(config: ClientConfig) -> (ReqwestTestClient, Arc<MemoryLogger>) {
	let logger = Arc::new(MemoryLogger::default());
	let client = Client::with_logger(config, test_reqwest_http_client(), logger.clone());

	(client, logger)
}

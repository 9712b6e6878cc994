#![cfg(feature = "reqwest")]

mod common;

// crates.io
use httpmock::prelude::*;
use serde_json::json;
// self
use common::build_reqwest_test_client;
use feedly_session::{
	client::{RefreshCounts, RequestOptions, TOKEN_PATH},
	config::ClientConfig,
	error::Error,
	log::LogLevel,
};

const REFRESH_TOKEN: &str = "refresh-secret";

fn config(server: &MockServer) -> ClientConfig {
	ClientConfig::builder(REFRESH_TOKEN)
		.base_url(format!("{}/", server.base_url()))
		.build()
		.expect("Client config should build for the mock server.")
}

fn token_body() -> serde_json::Value {
	json!({
		"refresh_token": REFRESH_TOKEN,
		"client_id": "feedlydev",
		"client_secret": "feedlydev",
		"grant_type": "refresh_token",
	})
}

#[tokio::test]
async fn first_call_refreshes_once_and_carries_new_token() {
	let server = MockServer::start_async().await;
	let (client, logger) = build_reqwest_test_client(config(&server));
	let token_mock = server
		.mock_async(|when, then| {
			when.method(POST)
				.path(TOKEN_PATH)
				.header("content-type", "application/json")
				.header_missing("authorization")
				.json_body(token_body());
			then.status(200).header("content-type", "application/json").json_body(json!({
				"access_token": "abc123",
				"expires_in": 604800,
				"id": "user-1",
				"token_type": "Bearer",
			}));
		})
		.await;
	let profile_mock = server
		.mock_async(|when, then| {
			when.method(GET).path("/v3/profile").header("authorization", "OAuth abc123");
			then.status(200).json_body(json!({"id": "user-1"}));
		})
		.await;
	let result = client
		.request("/v3/profile", RequestOptions::get())
		.await
		.expect("Profile call should succeed after the refresh.");

	token_mock.assert_calls_async(1).await;
	profile_mock.assert_calls_async(1).await;

	assert_eq!(result.body["id"], "user-1");
	assert_eq!(client.access_token().map(|token| token.expose().to_owned()), Some("abc123".into()));
	assert_eq!(client.refresh_metrics().attempts(), 1);
	assert_eq!(client.refresh_metrics().successes(), 1);
	assert!(logger.contains(LogLevel::Info, "<redacted:6 chars>"));
	assert!(logger.entries().iter().all(|entry| !entry.message.contains("abc123")));
}

#[tokio::test]
async fn held_token_skips_refresh() {
	let server = MockServer::start_async().await;
	let config = ClientConfig::builder(REFRESH_TOKEN)
		.base_url(server.base_url())
		.access_token("already-valid")
		.build()
		.expect("Client config with a seed token should build.");
	let (client, _logger) = build_reqwest_test_client(config);
	let token_mock = server
		.mock_async(|when, then| {
			when.method(POST).path(TOKEN_PATH);
			then.status(200).json_body(json!({"access_token": "unexpected"}));
		})
		.await;
	let collections_mock = server
		.mock_async(|when, then| {
			when.method(GET).path("/v3/collections").header("authorization", "OAuth already-valid");
			then.status(200).json_body(json!([]));
		})
		.await;

	client
		.request("/v3/collections", RequestOptions::get())
		.await
		.expect("Collections call should succeed with the seed token.");

	token_mock.assert_calls_async(0).await;
	collections_mock.assert_calls_async(1).await;

	assert_eq!(client.refresh_metrics().attempts(), 0);
}

#[tokio::test]
async fn concurrent_first_calls_share_one_refresh() {
	let server = MockServer::start_async().await;
	let (client, _logger) = build_reqwest_test_client(config(&server));
	let token_mock = server
		.mock_async(|when, then| {
			when.method(POST).path(TOKEN_PATH);
			then.status(200)
				.delay(std::time::Duration::from_millis(50))
				.json_body(json!({"access_token": "shared-token"}));
		})
		.await;
	let subscriptions_mock = server
		.mock_async(|when, then| {
			when.method(GET).path("/v3/subscriptions").header("authorization", "OAuth shared-token");
			then.status(200).json_body(json!([]));
		})
		.await;
	let other = client.clone();
	let (first, second) = tokio::join!(
		client.request("/v3/subscriptions", RequestOptions::get()),
		other.request("/v3/subscriptions", RequestOptions::get()),
	);

	first.expect("First concurrent call should succeed.");
	second.expect("Second concurrent call should succeed.");

	token_mock.assert_calls_async(1).await;
	subscriptions_mock.assert_calls_async(2).await;

	assert_eq!(client.refresh_metrics().attempts(), 1);
}

#[tokio::test]
async fn concurrent_first_calls_share_one_failed_refresh() {
	let server = MockServer::start_async().await;
	let (client, logger) = build_reqwest_test_client(config(&server));
	let token_mock = server
		.mock_async(|when, then| {
			when.method(POST).path(TOKEN_PATH);
			then.status(500)
				.delay(std::time::Duration::from_millis(50))
				.json_body(json!({"errorCode": 500, "errorMessage": "unavailable"}));
		})
		.await;
	let profile_mock = server
		.mock_async(|when, then| {
			when.method(GET).path("/v3/profile");
			then.status(200).json_body(json!({"id": "user-1"}));
		})
		.await;
	let calls = (0..5)
		.map(|_| {
			let client = client.clone();

			tokio::spawn(async move { client.request("/v3/profile", RequestOptions::get()).await })
		})
		.collect::<Vec<_>>();
	let mut errors = Vec::new();

	for call in calls {
		errors.push(
			call.await
				.expect("Request task should not panic.")
				.expect_err("Every call should observe the failed refresh."),
		);
	}

	token_mock.assert_calls_async(1).await;
	profile_mock.assert_calls_async(0).await;

	assert_eq!(errors.len(), 5);
	assert_eq!(
		errors.iter().filter(|err| matches!(err, Error::TokenEndpoint { status: 500, .. })).count(),
		1
	);
	assert_eq!(
		errors
			.iter()
			.filter(
				|err| matches!(err, Error::SharedRefresh { message } if message.contains("500"))
			)
			.count(),
		4
	);
	assert_eq!(
		client.refresh_metrics().snapshot(),
		RefreshCounts { attempts: 1, successes: 0, failures: 1 }
	);
	assert!(logger.contains(LogLevel::Error, "Concurrent token refresh failed"));

	client
		.request("/v3/profile", RequestOptions::get())
		.await
		.expect_err("A later call should retry against the still-failing endpoint.");

	token_mock.assert_calls_async(2).await;
}

#[tokio::test]
async fn rejected_refresh_is_logged_and_retried_on_next_call() {
	let server = MockServer::start_async().await;
	let (client, logger) = build_reqwest_test_client(config(&server));
	let mut token_mock = server
		.mock_async(|when, then| {
			when.method(POST).path(TOKEN_PATH);
			then.status(401).json_body(json!({"errorCode": 401, "errorMessage": "token expired"}));
		})
		.await;
	let profile_mock = server
		.mock_async(|when, then| {
			when.method(GET).path("/v3/profile");
			then.status(200).json_body(json!({"id": "user-1"}));
		})
		.await;
	let err = client
		.request("/v3/profile", RequestOptions::get())
		.await
		.expect_err("A rejected refresh should fail the call.");

	assert!(matches!(err, Error::TokenEndpoint { status: 401, .. }));
	assert!(client.access_token().is_none());
	assert!(logger.contains(LogLevel::Error, "Failed to refresh access token"));
	assert!(logger.contains(LogLevel::Error, "Failed to make call to /v3/profile"));

	profile_mock.assert_calls_async(0).await;
	token_mock.delete_async().await;

	let token_mock = server
		.mock_async(|when, then| {
			when.method(POST).path(TOKEN_PATH);
			then.status(200).json_body(json!({"access_token": "second-try"}));
		})
		.await;

	client
		.request("/v3/profile", RequestOptions::get())
		.await
		.expect("The next call should refresh again and succeed.");

	token_mock.assert_calls_async(1).await;
	profile_mock.assert_calls_async(1).await;

	assert_eq!(
		client.refresh_metrics().snapshot(),
		RefreshCounts { attempts: 2, successes: 1, failures: 1 }
	);
}

#[tokio::test]
async fn grant_without_access_token_leaves_session_empty() {
	let server = MockServer::start_async().await;
	let (client, logger) = build_reqwest_test_client(config(&server));
	let token_mock = server
		.mock_async(|when, then| {
			when.method(POST).path(TOKEN_PATH);
			then.status(200).json_body(json!({"id": "user-1"}));
		})
		.await;
	let err = client
		.refresh_auth_token()
		.await
		.expect_err("A grant without access_token should fail.");

	token_mock.assert_calls_async(1).await;

	assert!(matches!(err, Error::MissingAccessToken));
	assert!(client.access_token().is_none());
	assert!(logger.contains(LogLevel::Error, "Failed to refresh access token"));
}

#[tokio::test]
async fn explicit_refresh_replaces_held_token() {
	let server = MockServer::start_async().await;
	let config = ClientConfig::builder(REFRESH_TOKEN)
		.base_url(server.base_url())
		.access_token("stale")
		.build()
		.expect("Client config with a seed token should build.");
	let (client, _logger) = build_reqwest_test_client(config);
	let token_mock = server
		.mock_async(|when, then| {
			when.method(POST).path(TOKEN_PATH).header_missing("authorization");
			then.status(200).json_body(json!({"access_token": "fresh"}));
		})
		.await;

	client.refresh_auth_token().await.expect("Explicit refresh should succeed.");

	token_mock.assert_calls_async(1).await;

	assert_eq!(client.access_token().map(|token| token.expose().to_owned()), Some("fresh".into()));
	assert_eq!(client.last_response().map(|head| head.status.as_u16()), Some(200));
}

#[tokio::test]
async fn instant_refresh_runs_in_background() {
	let server = MockServer::start_async().await;
	let config = ClientConfig::builder(REFRESH_TOKEN)
		.base_url(server.base_url())
		.refresh_token_instant(true)
		.build()
		.expect("Client config with instant refresh should build.");
	let token_mock = server
		.mock_async(|when, then| {
			when.method(POST).path(TOKEN_PATH);
			then.status(200).json_body(json!({"access_token": "instant"}));
		})
		.await;
	let (client, _logger) = build_reqwest_test_client(config);

	for _ in 0..100 {
		if client.access_token().is_some() {
			break;
		}

		tokio::time::sleep(std::time::Duration::from_millis(20)).await;
	}

	token_mock.assert_calls_async(1).await;

	assert_eq!(client.access_token().map(|token| token.expose().to_owned()), Some("instant".into()));
}

#[test]
fn instant_refresh_without_runtime_is_skipped() {
	let config = ClientConfig::builder(REFRESH_TOKEN)
		.base_url("https://sandbox.feedly.com")
		.refresh_token_instant(true)
		.build()
		.expect("Client config with instant refresh should build.");
	let (client, logger) = build_reqwest_test_client(config);

	assert!(client.access_token().is_none());
	assert!(logger.contains(LogLevel::Warn, "skipping the instant refresh"));
	assert_eq!(client.refresh_metrics().attempts(), 0);
}

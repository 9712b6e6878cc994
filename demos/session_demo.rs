//! Fetches the authenticated profile and prints the rate-limit snapshot.
//!
//! ```sh
//! FEEDLY_REFRESH_TOKEN=... cargo run --example session_demo
//! ```
//!
//! Set `FEEDLY_BASE_URL` to target the sandbox instead of production.

// crates.io
use color_eyre::{Result, eyre::eyre};
// self
use feedly_session::{
	client::{Client, RequestOptions},
	config::ClientConfig,
};

#[tokio::main]
async fn main() -> Result<()> {
	color_eyre::install()?;

	let refresh_token = std::env::var("FEEDLY_REFRESH_TOKEN")
		.map_err(|_| eyre!("FEEDLY_REFRESH_TOKEN must be set"))?;
	let mut builder = ClientConfig::builder(refresh_token).refresh_token_instant(true);

	if let Ok(base_url) = std::env::var("FEEDLY_BASE_URL") {
		builder = builder.base_url(base_url);
	}

	let client = Client::new(builder.build()?);
	let profile = client.request("/v3/profile", RequestOptions::get()).await?;

	println!("Profile ({}): {}", profile.response.status, profile.body);

	let limit = client.ratelimit()?;

	println!(
		"Rate limit: count={:?} reset_at={:?}",
		limit.count,
		limit.reset_at().map(|instant| instant.to_string())
	);

	Ok(())
}

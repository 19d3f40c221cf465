//! Walks the RFC 9728 → RFC 8414 discovery chain against a mock MCP endpoint and prints
//! every progress line along with the endpoints it finds.

// crates.io
use color_eyre::Result;
use httpmock::prelude::*;
use httpmock::Method::HEAD;
// self
use mcp_oauth_discovery::{
	discovery::DiscoveryClient, obs::DiscoveryLog, safety::HintPolicy,
};

#[tokio::main]
async fn main() -> Result<()> {
	color_eyre::install()?;

	let server = MockServer::start_async().await;
	let challenge = format!(
		r#"Bearer error="invalid_token", resource_metadata="{}""#,
		server.url("/.well-known/oauth-protected-resource"),
	);

	server
		.mock_async(|when, then| {
			when.method(HEAD).path("/mcp");
			then.status(401).header("www-authenticate", &challenge);
		})
		.await;
	server
		.mock_async(|when, then| {
			when.method(GET).path("/.well-known/oauth-protected-resource");
			then.status(200).header("content-type", "application/json").body(format!(
				r#"{{"resource":"{}","authorization_servers":["{}"]}}"#,
				server.url("/mcp"),
				server.url("/tenant"),
			));
		})
		.await;
	server
		.mock_async(|when, then| {
			when.method(GET).path("/tenant/.well-known/oauth-authorization-server");
			then.status(200).header("content-type", "application/json").body(
				"{\"authorization_endpoint\":\"https://auth.example.com/authorize\",\"token_endpoint\":\"https://auth.example.com/token\"}",
			);
		})
		.await;

	let sink = |line: &str| println!("[discovery] {line}");
	// The mock server is bound to loopback, which the production gate refuses; the
	// loopback-admitting policy exists exactly for demos and tests like this one.
	let client = DiscoveryClient::new()?.with_hint_policy(HintPolicy::insecure_loopback());

	match client.discover(&server.url("/mcp"), DiscoveryLog::new(&sink)).await {
		Some(metadata) => {
			println!("Authorization endpoint: {}.", metadata.authorization_endpoint);
			println!("Token endpoint: {}.", metadata.token_endpoint);
		},
		None => println!("No authorization server metadata could be discovered."),
	}

	Ok(())
}

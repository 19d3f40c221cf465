#![cfg(feature = "reqwest")]

// std
use std::sync::Mutex;
// crates.io
use httpmock::prelude::*;
use httpmock::Method::HEAD;
// self
use mcp_oauth_discovery::{
	discovery::DiscoveryClient,
	metadata::AuthorizationServerMetadata,
	obs::DiscoveryLog,
	safety::HintPolicy,
};

const AUTH_METADATA_BODY: &str = r#"{"authorization_endpoint":"https://auth.example.com/authorize","token_endpoint":"https://auth.example.com/token"}"#;
const DECOY_METADATA_BODY: &str = r#"{"authorization_endpoint":"https://decoy.example.com/authorize","token_endpoint":"https://decoy.example.com/token"}"#;

fn expected_metadata() -> AuthorizationServerMetadata {
	AuthorizationServerMetadata {
		authorization_endpoint: "https://auth.example.com/authorize".into(),
		token_endpoint: "https://auth.example.com/token".into(),
		registration_endpoint: None,
	}
}

fn test_client() -> DiscoveryClient {
	// The loopback-admitting gate lets the mock server stand in for remote hosts; every
	// other gate rejection still applies.
	DiscoveryClient::new()
		.expect("Probe client should build successfully.")
		.with_hint_policy(HintPolicy::insecure_loopback())
}

#[tokio::test]
async fn discovers_metadata_through_the_protected_resource_chain() {
	let server = MockServer::start_async().await;
	let challenge = format!(
		r#"Bearer error="invalid_token", resource_metadata="{}""#,
		server.url("/.well-known/oauth-protected-resource/my"),
	);
	let probe_mock = server
		.mock_async(|when, then| {
			when.method(HEAD).path("/my/mcp");
			then.status(401).header("www-authenticate", &challenge);
		})
		.await;
	let resource_mock = server
		.mock_async(|when, then| {
			when.method(GET).path("/.well-known/oauth-protected-resource/my");
			then.status(200).header("content-type", "application/json").body(format!(
				r#"{{"resource":"{}","authorization_servers":["{}"]}}"#,
				server.url("/my"),
				server.url("/my/auth"),
			));
		})
		.await;
	let auth_server_mock = server
		.mock_async(|when, then| {
			when.method(GET).path("/my/auth/.well-known/oauth-authorization-server");
			then.status(200).header("content-type", "application/json").body(AUTH_METADATA_BODY);
		})
		.await;
	// If the RFC 9728 result did not short-circuit the chain, this decoy would win.
	let origin_mock = server
		.mock_async(|when, then| {
			when.method(GET).path("/.well-known/oauth-authorization-server");
			then.status(200).header("content-type", "application/json").body(DECOY_METADATA_BODY);
		})
		.await;
	let metadata = test_client()
		.discover(&server.url("/my/mcp"), DiscoveryLog::disabled())
		.await
		.expect("Discovery should succeed through the protected-resource chain.");

	assert_eq!(metadata, expected_metadata());

	probe_mock.assert_async().await;
	resource_mock.assert_async().await;
	auth_server_mock.assert_async().await;
	origin_mock.assert_hits_async(0).await;
}

#[tokio::test]
async fn retries_the_probe_with_get_when_head_is_not_allowed() {
	let server = MockServer::start_async().await;
	let challenge = format!(
		r#"Bearer resource_metadata="{}""#,
		server.url("/.well-known/oauth-protected-resource"),
	);
	let head_mock = server
		.mock_async(|when, then| {
			when.method(HEAD).path("/mcp");
			then.status(405);
		})
		.await;
	let get_mock = server
		.mock_async(|when, then| {
			when.method(GET).path("/mcp");
			then.status(401).header("www-authenticate", &challenge);
		})
		.await;
	let resource_mock = server
		.mock_async(|when, then| {
			when.method(GET).path("/.well-known/oauth-protected-resource");
			then.status(200).header("content-type", "application/json").body(format!(
				r#"{{"resource":"{}","authorization_servers":["{}"]}}"#,
				server.url("/mcp"),
				server.url("/auth"),
			));
		})
		.await;
	let auth_server_mock = server
		.mock_async(|when, then| {
			when.method(GET).path("/auth/.well-known/oauth-authorization-server");
			then.status(200).header("content-type", "application/json").body(AUTH_METADATA_BODY);
		})
		.await;
	let metadata = test_client()
		.discover(&server.url("/mcp"), DiscoveryLog::disabled())
		.await
		.expect("Discovery should succeed after retrying the probe with GET.");

	assert_eq!(metadata, expected_metadata());

	head_mock.assert_async().await;
	get_mock.assert_async().await;
	resource_mock.assert_async().await;
	auth_server_mock.assert_async().await;
}

#[tokio::test]
async fn skips_unsafe_candidates_and_uses_the_first_safe_authorization_server() {
	let server = MockServer::start_async().await;
	let challenge = format!(
		r#"Bearer resource_metadata="{}""#,
		server.url("/.well-known/oauth-protected-resource"),
	);
	let _probe_mock = server
		.mock_async(|when, then| {
			when.method(HEAD).path("/mcp");
			then.status(401).header("www-authenticate", &challenge);
		})
		.await;
	let _resource_mock = server
		.mock_async(|when, then| {
			when.method(GET).path("/.well-known/oauth-protected-resource");
			then.status(200).header("content-type", "application/json").body(format!(
				r#"{{"resource":"{}","authorization_servers":["https://169.254.169.254/as","{}"]}}"#,
				server.url("/mcp"),
				server.url("/auth"),
			));
		})
		.await;
	let auth_server_mock = server
		.mock_async(|when, then| {
			when.method(GET).path("/auth/.well-known/oauth-authorization-server");
			then.status(200).header("content-type", "application/json").body(AUTH_METADATA_BODY);
		})
		.await;
	let lines = Mutex::new(Vec::new());
	let sink = |line: &str| {
		lines.lock().expect("Log buffer lock should never be poisoned.").push(line.to_owned());
	};
	let metadata = test_client()
		.discover(&server.url("/mcp"), DiscoveryLog::new(&sink))
		.await
		.expect("Discovery should succeed via the first safe candidate.");

	assert_eq!(metadata, expected_metadata());

	auth_server_mock.assert_async().await;

	let lines = lines.into_inner().expect("Log buffer lock should never be poisoned.");

	assert!(
		lines.iter().any(|line| line.contains("ignoring unsafe authorization server")),
		"The unsafe candidate should be skipped with a logged reason.",
	);
}

#[tokio::test]
async fn falls_back_to_the_origin_when_the_resource_document_is_malformed() {
	let server = MockServer::start_async().await;
	let challenge = format!(
		r#"Bearer resource_metadata="{}""#,
		server.url("/.well-known/oauth-protected-resource"),
	);
	let _probe_mock = server
		.mock_async(|when, then| {
			when.method(HEAD).path("/mcp");
			then.status(401).header("www-authenticate", &challenge);
		})
		.await;
	let resource_mock = server
		.mock_async(|when, then| {
			when.method(GET).path("/.well-known/oauth-protected-resource");
			then.status(200)
				.header("content-type", "application/json")
				.body(r#"{"resource":"https://example.com/api","authorization_servers":"not an array"}"#);
		})
		.await;
	let origin_mock = server
		.mock_async(|when, then| {
			when.method(GET).path("/.well-known/oauth-authorization-server");
			then.status(200).header("content-type", "application/json").body(AUTH_METADATA_BODY);
		})
		.await;
	let lines = Mutex::new(Vec::new());
	let sink = |line: &str| {
		lines.lock().expect("Log buffer lock should never be poisoned.").push(line.to_owned());
	};
	let metadata = test_client()
		.discover(&server.url("/mcp"), DiscoveryLog::new(&sink))
		.await
		.expect("Discovery should fall back to RFC 8414 at the origin.");

	assert_eq!(metadata, expected_metadata());

	resource_mock.assert_async().await;
	origin_mock.assert_async().await;

	let lines = lines.into_inner().expect("Log buffer lock should never be poisoned.");

	assert!(
		lines.iter().any(|line| line.contains("failed validation")),
		"The malformed document should be logged as a validation failure.",
	);
}

#[tokio::test]
async fn ignores_a_malicious_resource_metadata_hint_entirely() {
	let server = MockServer::start_async().await;
	let _probe_mock = server
		.mock_async(|when, then| {
			when.method(HEAD).path("/mcp");
			then.status(401).header(
				"www-authenticate",
				r#"Bearer resource_metadata="http://169.254.169.254/latest/meta-data/""#,
			);
		})
		.await;
	let origin_mock = server
		.mock_async(|when, then| {
			when.method(GET).path("/.well-known/oauth-authorization-server");
			then.status(200).header("content-type", "application/json").body(AUTH_METADATA_BODY);
		})
		.await;
	let lines = Mutex::new(Vec::new());
	let sink = |line: &str| {
		lines.lock().expect("Log buffer lock should never be poisoned.").push(line.to_owned());
	};
	// The strict production gate stays on; the MCP endpoint itself is caller-supplied
	// and trusted, so only the hint is refused.
	let client = DiscoveryClient::new().expect("Probe client should build successfully.");
	let metadata = client
		.discover(&server.url("/mcp"), DiscoveryLog::new(&sink))
		.await
		.expect("Discovery should ignore the hint and fall back to the origin.");

	assert_eq!(metadata, expected_metadata());

	origin_mock.assert_async().await;

	let lines = lines.into_inner().expect("Log buffer lock should never be poisoned.");

	assert!(
		lines.iter().any(|line| line.contains("Refusing to fetch unsafe URL")),
		"The malicious hint should be logged as a safety rejection.",
	);
}

#[tokio::test]
async fn falls_back_silently_when_the_resource_names_no_authorization_server() {
	let server = MockServer::start_async().await;
	let challenge = format!(
		r#"Bearer resource_metadata="{}""#,
		server.url("/.well-known/oauth-protected-resource"),
	);
	let _probe_mock = server
		.mock_async(|when, then| {
			when.method(HEAD).path("/mcp");
			then.status(401).header("www-authenticate", &challenge);
		})
		.await;
	let _resource_mock = server
		.mock_async(|when, then| {
			when.method(GET).path("/.well-known/oauth-protected-resource");
			then.status(200)
				.header("content-type", "application/json")
				.body(r#"{"resource":"https://example.com/api"}"#);
		})
		.await;
	let origin_mock = server
		.mock_async(|when, then| {
			when.method(GET).path("/.well-known/oauth-authorization-server");
			then.status(200).header("content-type", "application/json").body(AUTH_METADATA_BODY);
		})
		.await;
	let metadata = test_client()
		.discover(&server.url("/mcp"), DiscoveryLog::disabled())
		.await
		.expect("A candidate-less resource document should fall back to the origin.");

	assert_eq!(metadata, expected_metadata());

	origin_mock.assert_async().await;
}

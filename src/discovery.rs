//! Top-level orchestration of the discovery fallback chain.
//!
//! Discovery runs as an ordered chain of independent stages: RFC 9728 against the MCP
//! endpoint itself, then RFC 8414 at the endpoint's origin, then RFC 8414 at the
//! path-scoped well-known variant. Each stage either produces validated metadata and
//! short-circuits the chain, or demotes to the next stage with a logged reason. A single
//! call is one sequential pass with no shared state, so callers may run discoveries for
//! any number of MCP sources concurrently.

#[cfg(feature = "reqwest")] mod authserver;
#[cfg(feature = "reqwest")] mod resource;

// self
use crate::_prelude::*;
#[cfg(feature = "reqwest")]
use crate::{
	http::DiscoveryHttpClient,
	metadata::AuthorizationServerMetadata,
	obs::{DiscoveryLog, LogSink, ProbeOutcome, ProbeStage, StageSpan, record_probe_outcome},
	safety::HintPolicy,
};

/// Well-known path for RFC 8414 authorization-server metadata.
pub const WELL_KNOWN_AUTHORIZATION_SERVER: &str = "/.well-known/oauth-authorization-server";

/// Normalizes an MCP endpoint URL to its origin, `scheme://host[:port]`.
///
/// Default ports are elided and path, query, and fragment are discarded. Strings that do
/// not parse as a URL, or parse without a host, are returned unchanged so callers can
/// feed arbitrary input through without a fallible signature.
pub fn mcp_base_url(url: &str) -> String {
	let Ok(parsed) = Url::parse(url) else {
		return url.to_owned();
	};
	let Some(host) = parsed.host_str() else {
		return url.to_owned();
	};

	match parsed.port() {
		Some(port) => format!("{}://{host}:{port}", parsed.scheme()),
		None => format!("{}://{host}", parsed.scheme()),
	}
}

/// Joins `base` and the RFC 8414 well-known path with exactly one slash at the seam,
/// regardless of trailing slashes on `base`.
pub fn well_known_url(base: &str) -> String {
	format!("{}{WELL_KNOWN_AUTHORIZATION_SERVER}", base.trim_end_matches('/'))
}

/// Builds the path-scoped RFC 8414 variant,
/// `{origin}/.well-known/oauth-authorization-server{mcp_path}`, for servers that host one
/// discovery document per endpoint path.
pub fn path_scoped_well_known_url(origin: &str, mcp_path: &str) -> String {
	format!("{}{WELL_KNOWN_AUTHORIZATION_SERVER}{mcp_path}", origin.trim_end_matches('/'))
}

/// Runs the discovery fallback chain against remote MCP endpoints.
///
/// The client owns the probe transport and the hint gate configuration; it holds no
/// per-call state, so one instance can serve concurrent discoveries.
#[cfg(feature = "reqwest")]
#[derive(Clone, Debug)]
pub struct DiscoveryClient {
	http: DiscoveryHttpClient,
	hint_policy: HintPolicy,
}
#[cfg(feature = "reqwest")]
impl DiscoveryClient {
	/// Creates a client with the default probe transport and the strict hint gate.
	pub fn new() -> Result<Self> {
		Ok(Self::with_http_client(DiscoveryHttpClient::new()?))
	}

	/// Creates a client around a caller-provided probe transport.
	pub fn with_http_client(http: DiscoveryHttpClient) -> Self {
		Self { http, hint_policy: HintPolicy::default() }
	}

	/// Overrides the gate configuration applied to hint-derived URLs.
	pub fn with_hint_policy(mut self, policy: HintPolicy) -> Self {
		self.hint_policy = policy;

		self
	}

	pub(crate) fn http(&self) -> &DiscoveryHttpClient {
		&self.http
	}

	pub(crate) fn hint_policy(&self) -> HintPolicy {
		self.hint_policy
	}

	/// Discovers OAuth authorization-server metadata for `mcp_url`.
	///
	/// Resolves to the first metadata document any stage validates, or `None` once every
	/// fallback exhausts. Expected failure modes (unparseable input, network faults,
	/// timeouts, malformed or unsafe responses) never escape as errors; they are logged
	/// through `log` and demote to the next stage.
	pub async fn discover(
		&self,
		mcp_url: &str,
		log: DiscoveryLog<'_>,
	) -> Option<AuthorizationServerMetadata> {
		let Ok(endpoint) = Url::parse(mcp_url) else {
			log.say(format!("aborting discovery: {mcp_url} is not a valid URL"));

			return None;
		};

		log.say(format!("starting OAuth discovery for {mcp_url}"));
		log.say("trying RFC 9728 protected-resource discovery");

		if let Some(metadata) =
			run_stage(ProbeStage::ProtectedResource, log, resource::resolve(self, &endpoint, log))
				.await
		{
			return Some(metadata);
		}

		let origin = mcp_base_url(mcp_url);
		let origin_url = well_known_url(&origin);

		log.say(format!("trying RFC 8414 metadata at {origin_url}"));

		if let Some(metadata) =
			run_stage(ProbeStage::OriginMetadata, log, authserver::fetch(&self.http, origin_url))
				.await
		{
			return Some(metadata);
		}

		let path = endpoint.path();

		// A path of `/` would retry the exact URL the origin stage just failed on.
		if !path.is_empty() && path != "/" {
			let scoped_url = path_scoped_well_known_url(&origin, path);

			log.say(format!("trying path-scoped RFC 8414 metadata at {scoped_url}"));

			if let Some(metadata) =
				run_stage(ProbeStage::PathMetadata, log, authserver::fetch(&self.http, scoped_url))
					.await
			{
				return Some(metadata);
			}
		}

		log.say("no OAuth authorization server metadata found");

		None
	}
}

/// Discovers OAuth authorization-server metadata for `mcp_url` with a default client.
///
/// Convenience mirror of [`DiscoveryClient::discover`] that builds a fresh client per
/// call; callers issuing many discoveries should construct one [`DiscoveryClient`] and
/// reuse it. Client construction failure is logged and degrades to `None` like every
/// other failure mode.
#[cfg(feature = "reqwest")]
pub async fn discover_oauth_metadata(
	mcp_url: &str,
	on_log: Option<LogSink<'_>>,
) -> Option<AuthorizationServerMetadata> {
	let log = on_log.map(DiscoveryLog::new).unwrap_or_default();
	let client = match DiscoveryClient::new() {
		Ok(client) => client,
		Err(error) => {
			log.say(format!("aborting discovery: {error}"));

			return None;
		},
	};

	client.discover(mcp_url, log).await
}

#[cfg(feature = "reqwest")]
async fn run_stage<F>(
	stage: ProbeStage,
	log: DiscoveryLog<'_>,
	probe: F,
) -> Option<AuthorizationServerMetadata>
where
	F: Future<Output = Result<AuthorizationServerMetadata, ProbeError>>,
{
	record_probe_outcome(stage, ProbeOutcome::Attempt);

	let span = StageSpan::new(stage);

	match span.instrument(probe).await {
		Ok(metadata) => {
			record_probe_outcome(stage, ProbeOutcome::Success);
			log.say(format!("discovered authorization server metadata via {stage}"));

			Some(metadata)
		},
		Err(error) => {
			record_probe_outcome(stage, ProbeOutcome::Fallback);

			if error.is_timeout() {
				log.say(format!("{stage} probe timed out, moving to the next fallback: {error}"));
			} else {
				log.say(format!("{stage} probe fell back: {error}"));
			}

			None
		},
	}
}

//! RFC 9728 protected-resource discovery stage.

// self
use crate::{
	_prelude::*,
	challenge,
	discovery::{DiscoveryClient, authserver, well_known_url},
	metadata::{AuthorizationServerMetadata, ProtectedResourceMetadata},
	obs::DiscoveryLog,
};

/// Runs the RFC 9728 stage end to end.
///
/// Probes the MCP endpoint for a 401 challenge, follows the gated `resource_metadata`
/// hint to the protected-resource document, and hands the first safe authorization-server
/// candidate to the RFC 8414 fetcher. Every early return is a fallback signal for the
/// orchestrator; nothing here is fatal.
pub(crate) async fn resolve(
	client: &DiscoveryClient,
	endpoint: &Url,
	log: DiscoveryLog<'_>,
) -> Result<AuthorizationServerMetadata, ProbeError> {
	let probe = client.http().probe_challenge(endpoint.as_str()).await?;

	if probe.status != 401 {
		return Err(ProbeError::NotChallenged { status: probe.status });
	}

	let hint = challenge::resource_metadata_hint(probe.www_authenticate.as_deref())
		.ok_or(ProbeError::MissingHint)?;

	if !client.hint_policy().permits(&hint) {
		return Err(ProbeError::UnsafeUrl { url: hint });
	}

	log.say(format!("fetching protected-resource metadata from {hint}"));

	let document = client.http().fetch_json(&hint).await?;
	let metadata = ProtectedResourceMetadata::from_document(&document)?;

	for candidate in metadata.authorization_servers.iter().flatten() {
		let base = candidate.trim_end_matches('/');

		if !client.hint_policy().permits(base) {
			log.say(format!("ignoring unsafe authorization server {candidate}"));

			continue;
		}

		log.say(format!("trying authorization server {base} named by the protected resource"));

		// Only the first safe candidate is consulted; a failure here falls back to the
		// RFC 8414 stages rather than to the next entry.
		return authserver::fetch(client.http(), well_known_url(base)).await;
	}

	Err(ProbeError::NoAuthorizationServer)
}

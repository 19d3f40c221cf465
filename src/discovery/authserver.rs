//! RFC 8414 authorization-server metadata stage.

// self
use crate::{_prelude::*, http::DiscoveryHttpClient, metadata::AuthorizationServerMetadata};

/// Fetches `url` and validates the body as an RFC 8414 metadata document.
///
/// The caller decides which fallback, if any, follows a failure.
pub(crate) async fn fetch(
	http: &DiscoveryHttpClient,
	url: String,
) -> Result<AuthorizationServerMetadata, ProbeError> {
	let document = http.fetch_json(&url).await?;

	AuthorizationServerMetadata::from_document(&document)
}

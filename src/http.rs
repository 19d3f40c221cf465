//! Probe transport shared by every discovery stage.
//!
//! All outbound traffic funnels through [`DiscoveryHttpClient`] so the probe behavior
//! lives in one place: redirect following is disabled (a redirect could re-introduce a
//! fetch the safety gate refused) and every request carries the bounded timeout. Timeouts
//! map to [`ProbeError::Timeout`] so the orchestrator can log them distinctly from other
//! transport faults, while falling back identically.

// crates.io
use reqwest::{
	Method, StatusCode, redirect,
	header::{ACCEPT, WWW_AUTHENTICATE},
};
// self
use crate::{_prelude::*, error::ConfigError};

/// Default bound applied to every probe and metadata request.
pub const DEFAULT_PROBE_TIMEOUT: Duration = Duration::from_secs(5);

/// Thin wrapper around [`ReqwestClient`] so shared probe behavior lives in one place.
///
/// Callers supplying a custom [`ReqwestClient`] via [`with_client`](Self::with_client)
/// should configure it to disable redirect following, matching the client this wrapper
/// builds itself.
#[derive(Clone, Debug)]
pub struct DiscoveryHttpClient {
	client: ReqwestClient,
	timeout: Duration,
}
impl DiscoveryHttpClient {
	/// Builds the default probe client: no redirects, default bounded timeout.
	pub fn new() -> Result<Self, ConfigError> {
		let client = ReqwestClient::builder().redirect(redirect::Policy::none()).build()?;

		Ok(Self::with_client(client))
	}

	/// Wraps an existing reqwest [`ReqwestClient`].
	pub fn with_client(client: ReqwestClient) -> Self {
		Self { client, timeout: DEFAULT_PROBE_TIMEOUT }
	}

	/// Overrides the per-request timeout bound.
	pub fn with_timeout(mut self, timeout: Duration) -> Self {
		self.timeout = timeout;

		self
	}

	/// Probes `url` for an authentication challenge.
	///
	/// Issues a `HEAD` request and retries once with `GET` when the endpoint answers 405,
	/// since some servers refuse `HEAD` outright.
	pub(crate) async fn probe_challenge(&self, url: &str) -> Result<EndpointProbe, ProbeError> {
		let mut response = self
			.request(Method::HEAD, url)
			.send()
			.await
			.map_err(|error| self.map_fetch_error(url, error))?;

		if response.status() == StatusCode::METHOD_NOT_ALLOWED {
			response = self
				.request(Method::GET, url)
				.send()
				.await
				.map_err(|error| self.map_fetch_error(url, error))?;
		}

		let www_authenticate = response
			.headers()
			.get(WWW_AUTHENTICATE)
			.and_then(|value| value.to_str().ok())
			.map(ToOwned::to_owned);

		Ok(EndpointProbe { status: response.status().as_u16(), www_authenticate })
	}

	/// Fetches `url` and decodes the body as a JSON document.
	///
	/// Any non-200 status, transport fault, or malformed body becomes a [`ProbeError`]
	/// fallback signal.
	pub(crate) async fn fetch_json(&self, url: &str) -> Result<Value, ProbeError> {
		let response = self
			.request(Method::GET, url)
			.header(ACCEPT, "application/json")
			.send()
			.await
			.map_err(|error| self.map_fetch_error(url, error))?;
		let status = response.status();

		if status != StatusCode::OK {
			return Err(ProbeError::MetadataStatus { url: url.to_owned(), status: status.as_u16() });
		}

		let body = response.bytes().await.map_err(|error| self.map_fetch_error(url, error))?;
		let mut deserializer = serde_json::Deserializer::from_slice(&body);

		serde_path_to_error::deserialize(&mut deserializer)
			.map_err(|source| ProbeError::MalformedDocument { url: url.to_owned(), source })
	}

	fn request(&self, method: Method, url: &str) -> reqwest::RequestBuilder {
		self.client.request(method, url).timeout(self.timeout)
	}

	fn map_fetch_error(&self, url: &str, error: ReqwestError) -> ProbeError {
		if error.is_timeout() {
			ProbeError::Timeout { url: url.to_owned() }
		} else {
			ProbeError::Transport { url: url.to_owned(), source: Box::new(error) }
		}
	}
}

/// Outcome of the challenge probe against the MCP endpoint.
pub(crate) struct EndpointProbe {
	/// HTTP status the endpoint answered with.
	pub(crate) status: u16,
	/// Raw `WWW-Authenticate` header value, when one was present.
	pub(crate) www_authenticate: Option<String>,
}

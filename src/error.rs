//! Discovery-level error types shared across probes and transports.

// self
use crate::_prelude::*;

/// Crate-wide result type alias returning [`Error`] by default.
pub type Result<T, E = Error> = std::result::Result<T, E>;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Canonical error exposed by public APIs.
#[derive(Debug, ThisError)]
pub enum Error {
	/// Local configuration problem.
	#[error(transparent)]
	Config(#[from] ConfigError),
	/// Stage-local probe failure.
	#[error(transparent)]
	Probe(#[from] ProbeError),
}

/// Configuration and construction failures raised before any probe runs.
#[derive(Debug, ThisError)]
pub enum ConfigError {
	/// HTTP client could not be constructed.
	#[error("HTTP client could not be constructed.")]
	HttpClientBuild {
		/// Underlying transport builder failure.
		#[source]
		source: BoxError,
	},
}
impl ConfigError {
	/// Wraps a transport's builder failure inside [`ConfigError`].
	pub fn http_client_build(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::HttpClientBuild { source: Box::new(src) }
	}
}
#[cfg(feature = "reqwest")]
impl From<ReqwestError> for ConfigError {
	fn from(e: ReqwestError) -> Self {
		Self::http_client_build(e)
	}
}

/// Stage-local failures that demote a discovery probe to the next fallback.
///
/// None of these are fatal; the orchestrator logs the variant and moves on, so the worst
/// outcome a caller ever sees is `None`.
#[derive(Debug, ThisError)]
pub enum ProbeError {
	/// Transport failure (DNS, TCP, TLS) while calling an endpoint.
	#[error("Network error occurred while calling {url}.")]
	Transport {
		/// Endpoint that failed.
		url: String,
		/// Transport-specific network error.
		#[source]
		source: BoxError,
	},
	/// The bounded probe timeout elapsed before the endpoint answered.
	#[error("Request to {url} timed out.")]
	Timeout {
		/// Endpoint that failed to answer in time.
		url: String,
	},
	/// The MCP endpoint answered the probe with something other than a 401 challenge.
	#[error("Endpoint answered HTTP {status} instead of a 401 challenge.")]
	NotChallenged {
		/// Status code the endpoint returned.
		status: u16,
	},
	/// A 401 response carried no usable `resource_metadata` hint.
	#[error("Challenge carried no resource_metadata hint.")]
	MissingHint,
	/// A hint-derived URL failed the safety gate.
	#[error("Refusing to fetch unsafe URL {url}.")]
	UnsafeUrl {
		/// URL the gate rejected.
		url: String,
	},
	/// A metadata endpoint returned a non-200 status.
	#[error("Metadata endpoint {url} answered HTTP {status}.")]
	MetadataStatus {
		/// Endpoint that was queried.
		url: String,
		/// Status code the endpoint returned.
		status: u16,
	},
	/// A metadata endpoint responded with a body that is not valid JSON.
	#[error("Metadata document from {url} is malformed JSON.")]
	MalformedDocument {
		/// Endpoint that was queried.
		url: String,
		/// Structured parsing failure.
		#[source]
		source: serde_path_to_error::Error<serde_json::Error>,
	},
	/// A document parsed as JSON but failed required-field validation.
	#[error("Metadata document failed validation: {reason}.")]
	InvalidShape {
		/// Which invariant the document violated.
		reason: &'static str,
	},
	/// Protected-resource metadata named no authorization server that passes the gate.
	#[error("Protected-resource metadata names no safe authorization server.")]
	NoAuthorizationServer,
}
impl ProbeError {
	/// True when the failure was the bounded timeout rather than another transport fault.
	pub fn is_timeout(&self) -> bool {
		matches!(self, Self::Timeout { .. })
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn timeout_is_distinguishable_from_transport_failures() {
		let timeout = ProbeError::Timeout { url: "https://example.com/mcp".into() };
		let transport = ProbeError::Transport {
			url: "https://example.com/mcp".into(),
			source: "connection refused".into(),
		};

		assert!(timeout.is_timeout());
		assert!(!transport.is_timeout());
	}

	#[test]
	fn probe_errors_render_their_endpoint() {
		let err = ProbeError::MetadataStatus {
			url: "https://example.com/.well-known/oauth-authorization-server".into(),
			status: 404,
		};

		assert_eq!(
			err.to_string(),
			"Metadata endpoint https://example.com/.well-known/oauth-authorization-server answered HTTP 404.",
		);
	}
}

//! Optional observability helpers for discovery probes.
//!
//! # Feature Flags
//!
//! - Enable `tracing` to emit structured spans named `mcp_discovery.probe` with the
//!   `stage` field, plus debug-level copies of every [`DiscoveryLog`] line.
//! - Enable `metrics` to increment the `mcp_discovery_probe_total` counter for every
//!   attempt/success/fallback, labeled by `stage` + `outcome`.

mod metrics;
mod tracing;

pub use metrics::*;
pub use tracing::*;

// self
use crate::_prelude::*;

/// Discovery stages observed by the orchestrator.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ProbeStage {
	/// RFC 9728 protected-resource discovery.
	ProtectedResource,
	/// RFC 8414 metadata at the MCP origin.
	OriginMetadata,
	/// RFC 8414 metadata at the path-scoped well-known variant.
	PathMetadata,
}
impl ProbeStage {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			ProbeStage::ProtectedResource => "protected_resource",
			ProbeStage::OriginMetadata => "authorization_server_origin",
			ProbeStage::PathMetadata => "authorization_server_path",
		}
	}
}
impl Display for ProbeStage {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Outcome labels recorded for each probe attempt.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ProbeOutcome {
	/// Entry to a discovery stage.
	Attempt,
	/// The stage produced validated metadata.
	Success,
	/// The stage demoted discovery to the next fallback.
	Fallback,
}
impl ProbeOutcome {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			ProbeOutcome::Attempt => "attempt",
			ProbeOutcome::Success => "success",
			ProbeOutcome::Fallback => "fallback",
		}
	}
}
impl Display for ProbeOutcome {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Borrowed free-text sink receiving progress lines during a discovery call.
pub type LogSink<'a> = &'a (dyn Fn(&str) + Send + Sync);

/// Progress reporter handed to every discovery stage.
///
/// Lines are human-readable free text for debugging surfaces, never structured data;
/// structured telemetry goes through the `tracing`/`metrics` features instead. With the
/// `tracing` feature enabled every line is mirrored as a debug event.
#[derive(Clone, Copy, Default)]
pub struct DiscoveryLog<'a> {
	sink: Option<LogSink<'a>>,
}
impl<'a> DiscoveryLog<'a> {
	/// Creates a log that forwards every line to `sink`.
	pub fn new(sink: LogSink<'a>) -> Self {
		Self { sink: Some(sink) }
	}

	/// Creates a log that drops every line.
	pub const fn disabled() -> Self {
		Self { sink: None }
	}

	/// Emits one progress line.
	pub(crate) fn say(self, line: impl AsRef<str>) {
		let line = line.as_ref();

		#[cfg(feature = "tracing")]
		::tracing::debug!(target: "mcp_discovery", "{line}");

		if let Some(sink) = self.sink {
			sink(line);
		}
	}
}
impl Debug for DiscoveryLog<'_> {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str("DiscoveryLog(..)")
	}
}

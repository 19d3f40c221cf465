// self
use crate::obs::{ProbeOutcome, ProbeStage};

/// Records a probe outcome via the global metrics recorder (when enabled).
pub fn record_probe_outcome(stage: ProbeStage, outcome: ProbeOutcome) {
	#[cfg(feature = "metrics")]
	{
		metrics::counter!(
			"mcp_discovery_probe_total",
			"stage" => stage.as_str(),
			"outcome" => outcome.as_str()
		)
		.increment(1);
	}

	#[cfg(not(feature = "metrics"))]
	{
		let _ = (stage, outcome);
	}
}

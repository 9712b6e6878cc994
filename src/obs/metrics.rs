// self
use crate::obs::{FlowKind, FlowOutcome};

/// Counter incremented once per flow outcome, labeled by `flow` and `outcome`.
pub const FLOW_COUNTER: &str = "feedly_session_flow_total";
/// Counter incremented when a call reuses the outcome of a refresh it waited on.
pub const REFRESH_JOINED_COUNTER: &str = "feedly_session_refresh_joined_total";

/// Records a flow outcome on [`FLOW_COUNTER`].
pub fn record_flow_outcome(kind: FlowKind, outcome: FlowOutcome) {
	#[cfg(feature = "metrics")]
	metrics::counter!(FLOW_COUNTER, "flow" => kind.as_str(), "outcome" => outcome.as_str())
		.increment(1);
	#[cfg(not(feature = "metrics"))]
	let _ = (kind, outcome);
}

/// Records a call that joined a finished refresh instead of exchanging again.
pub fn record_refresh_joined(succeeded: bool) {
	#[cfg(feature = "metrics")]
	metrics::counter!(REFRESH_JOINED_COUNTER, "succeeded" => if succeeded { "true" } else { "false" })
		.increment(1);
	#[cfg(not(feature = "metrics"))]
	let _ = succeeded;
}

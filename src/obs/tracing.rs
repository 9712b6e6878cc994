// self
use crate::{
	_prelude::*,
	obs::{self, FlowKind, FlowOutcome},
};

/// Future type returned by [`FlowSpan::instrument`]; passthrough when tracing is disabled.
#[cfg(feature = "tracing")]
pub type InstrumentedFlow<F> = tracing::instrument::Instrumented<F>;
/// Future type returned by [`FlowSpan::instrument`]; passthrough when tracing is disabled.
#[cfg(not(feature = "tracing"))]
pub type InstrumentedFlow<F> = F;

/// Span wrapping one client flow.
///
/// Carries `flow`, `stage`, `path` (set by [`with_path`](Self::with_path)), and `outcome`
/// (set by [`finish`](Self::finish)) fields.
#[derive(Clone, Debug)]
pub struct FlowSpan {
	kind: FlowKind,
	#[cfg(feature = "tracing")]
	span: tracing::Span,
}
impl FlowSpan {
	/// Opens a span for `kind` at `stage` and counts the attempt.
	pub fn start(kind: FlowKind, stage: &'static str) -> Self {
		obs::record_flow_outcome(kind, FlowOutcome::Attempt);

		#[cfg(feature = "tracing")]
		{
			let span = tracing::info_span!(
				"feedly_session.flow",
				flow = kind.as_str(),
				stage,
				path = tracing::field::Empty,
				outcome = tracing::field::Empty,
			);

			Self { kind, span }
		}
		#[cfg(not(feature = "tracing"))]
		{
			let _ = stage;

			Self { kind }
		}
	}

	/// Records the API path the flow targets.
	pub fn with_path(self, path: &str) -> Self {
		#[cfg(feature = "tracing")]
		self.span.record("path", path);
		#[cfg(not(feature = "tracing"))]
		let _ = path;

		self
	}

	/// Runs `fut` inside the span without holding a guard across `.await` points.
	pub fn instrument<Fut>(&self, fut: Fut) -> InstrumentedFlow<Fut>
	where
		Fut: Future,
	{
		#[cfg(feature = "tracing")]
		{
			use tracing::Instrument;

			fut.instrument(self.span.clone())
		}
		#[cfg(not(feature = "tracing"))]
		{
			fut
		}
	}

	/// Records the outcome of `result` on the span and the flow counter.
	pub fn finish<T>(&self, result: &Result<T>) {
		let outcome = if result.is_ok() { FlowOutcome::Success } else { FlowOutcome::Failure };

		#[cfg(feature = "tracing")]
		self.span.record("outcome", outcome.as_str());

		obs::record_flow_outcome(self.kind, outcome);
	}
}

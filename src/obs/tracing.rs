// self
use crate::{_prelude::*, obs::GrantKind};

/// Type alias that resolves to an instrumented future when tracing is enabled.
#[cfg(feature = "tracing")]
pub type InstrumentedGrant<F> = tracing::instrument::Instrumented<F>;
/// Passthrough future type when tracing is disabled.
#[cfg(not(feature = "tracing"))]
pub type InstrumentedGrant<F> = F;

/// A span builder used by grant procedures.
#[derive(Clone, Debug)]
pub struct GrantSpan {
	#[cfg(feature = "tracing")]
	span: tracing::Span,
}
impl GrantSpan {
	/// Creates a new span tagged with the provided grant kind + stage.
	pub fn new(kind: GrantKind, stage: &'static str) -> Self {
		#[cfg(feature = "tracing")]
		{
			let span = tracing::info_span!("middlecat.grant", grant = kind.as_str(), stage);

			Self { span }
		}
		#[cfg(not(feature = "tracing"))]
		{
			let _ = (kind, stage);

			Self {}
		}
	}

	/// Enters the span for synchronous sections.
	pub fn entered(self) -> GrantSpanGuard {
		#[cfg(feature = "tracing")]
		{
			GrantSpanGuard { guard: self.span.entered() }
		}
		#[cfg(not(feature = "tracing"))]
		{
			let _ = self;

			GrantSpanGuard {}
		}
	}

	/// Instruments an async block without holding a guard across `.await` points.
	pub fn instrument<Fut>(&self, fut: Fut) -> InstrumentedGrant<Fut>
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
}

/// RAII guard returned by [`GrantSpan::entered`].
pub struct GrantSpanGuard {
	#[cfg(feature = "tracing")]
	#[allow(dead_code)]
	guard: tracing::span::EnteredSpan,
}
impl Debug for GrantSpanGuard {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str("GrantSpanGuard(..)")
	}
}

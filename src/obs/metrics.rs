// self
use crate::obs::{GrantKind, GrantOutcome};

/// Records a grant outcome via the global metrics recorder (when enabled).
pub fn record_grant_outcome(kind: GrantKind, outcome: GrantOutcome) {
	#[cfg(feature = "metrics")]
	{
		metrics::counter!(
			"middlecat_grant_total",
			"grant" => kind.as_str(),
			"outcome" => outcome.as_str()
		)
		.increment(1);
	}

	#[cfg(not(feature = "metrics"))]
	{
		let _ = (kind, outcome);
	}
}

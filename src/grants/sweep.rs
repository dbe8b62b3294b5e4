//! Probabilistic background cleanup of expired sessions.

// crates.io
use rand::Rng;
// self
use crate::{
	_prelude::*,
	grants::Broker,
	obs::{self, GrantKind, GrantOutcome, GrantSpan},
};

impl Broker {
	/// Runs the expired-session sweep with the configured probability (default 1 in 1000).
	///
	/// Best-effort: failures are swallowed. Every grant procedure re-checks expiration on use, so
	/// a late sweep never lets an expired session be honored.
	pub async fn maybe_sweep(&self) {
		if rand::rng().random::<f64>() >= self.config.sweep_probability {
			return;
		}

		let _ = self.sweep_expired().await;
	}

	/// Bulk-deletes every session whose expiration has passed, returning the count removed.
	pub async fn sweep_expired(&self) -> Result<u64> {
		const KIND: GrantKind = GrantKind::Sweep;

		let span = GrantSpan::new(KIND, "sweep_expired");

		obs::record_grant_outcome(KIND, GrantOutcome::Attempt);

		let result = span
			.instrument(async { Ok(self.store.purge_expired(OffsetDateTime::now_utc()).await?) })
			.await;

		match &result {
			Ok(_) => obs::record_grant_outcome(KIND, GrantOutcome::Success),
			Err(_) => obs::record_grant_outcome(KIND, GrantOutcome::Failure),
		}

		result
	}
}

//! Kill-session grant: unconditional termination by refresh token or bare session id.

// self
use crate::{
	_prelude::*,
	auth::SessionHandle,
	grants::Broker,
	obs::{self, GrantKind, GrantOutcome, GrantSpan},
};

impl Broker {
	/// Deletes a session identified by a refresh token or a bare session id.
	///
	/// No secret or ownership check happens at this layer; callers are expected to have already
	/// proven authority, either by possessing the refresh token or through an authenticated
	/// listing endpoint.
	pub async fn kill_session(&self, target: &str) -> Result<()> {
		const KIND: GrantKind = GrantKind::KillSession;

		let span = GrantSpan::new(KIND, "kill_session");

		obs::record_grant_outcome(KIND, GrantOutcome::Attempt);

		let result = span.instrument(self.kill_inner(target)).await;

		match &result {
			Ok(_) => obs::record_grant_outcome(KIND, GrantOutcome::Success),
			Err(_) => obs::record_grant_outcome(KIND, GrantOutcome::Failure),
		}

		result
	}

	async fn kill_inner(&self, target: &str) -> Result<()> {
		let id = SessionHandle::id_portion(target).map_err(|_| Error::NotFound)?;

		if self.store.delete(&id).await? { Ok(()) } else { Err(Error::NotFound) }
	}
}

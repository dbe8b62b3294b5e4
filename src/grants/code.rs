//! Authorization-code grant: one-time code redemption bound to a PKCE verifier.

// self
use crate::{
	_prelude::*,
	auth::{SessionHandle, pkce},
	grants::Broker,
	jwt::TokenResponse,
	obs::{self, GrantKind, GrantOutcome, GrantSpan},
};

impl Broker {
	/// Exchanges a one-time authorization code and its PKCE verifier for tokens.
	pub async fn exchange_authorization_code(
		&self,
		code: &str,
		code_verifier: &str,
	) -> Result<TokenResponse> {
		const KIND: GrantKind = GrantKind::AuthorizationCode;

		let span = GrantSpan::new(KIND, "exchange_authorization_code");

		obs::record_grant_outcome(KIND, GrantOutcome::Attempt);

		let result = span.instrument(self.exchange_inner(code, code_verifier)).await;

		match &result {
			Ok(_) => obs::record_grant_outcome(KIND, GrantOutcome::Success),
			Err(_) => obs::record_grant_outcome(KIND, GrantOutcome::Failure),
		}

		result
	}

	async fn exchange_inner(&self, code: &str, code_verifier: &str) -> Result<TokenResponse> {
		let handle: SessionHandle = code.parse().map_err(|_| Error::InvalidGrant)?;
		let Some(record) = self.store.fetch(&handle.id).await? else {
			return Err(Error::InvalidGrant);
		};
		// A record without a secret never used OAuth and cannot be redeemed this way.
		let Some(secret) = &record.secret else {
			return Err(Error::InvalidGrant);
		};

		if secret.expose() != handle.secret.expose() {
			return Err(Error::InvalidGrant);
		}

		let challenge = pkce::code_challenge(code_verifier);
		let now = OffsetDateTime::now_utc();
		// Delete-and-fail conditions: a challenge mismatch means the code may be compromised, a
		// missing secret_expires means someone already redeemed it (possibly a bad actor, first),
		// and an expired secret means the session can never start anyway.
		let compromised = record.code_challenge.as_deref() != Some(challenge.as_str())
			|| !record.code_redeemable_at(now);

		if compromised {
			self.store.delete(&record.id).await?;

			return Err(Error::InvalidGrant);
		}

		// Clearing secret_expires marks the code permanently spent; the persisted write must land
		// before tokens go out.
		let mut redeemed = record;

		redeemed.secret_expires = None;
		self.store.save(redeemed.clone()).await?;

		self.issue_tokens(&redeemed)
	}
}

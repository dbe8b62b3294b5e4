//! Refresh-token grant: dual-acceptance rotation, theft detection, and sliding expiration.
//!
//! The presented token is accepted if it matches either the current or the immediately-prior
//! refresh secret. That window tolerates exactly one overlapping request pair during a rotation;
//! anything staler is treated as theft and revokes the whole session, so a thief and the
//! legitimate user cannot take turns refreshing.

// self
use crate::{
	_prelude::*,
	auth::{SecretString, SessionHandle},
	grants::Broker,
	jwt::TokenResponse,
	obs::{self, GrantKind, GrantOutcome, GrantSpan},
	session::{REFRESH_SECRET_BYTES, SessionRecord, SessionType},
	store::RotationOutcome,
};

impl Broker {
	/// Exchanges a composite refresh token for a fresh token response.
	pub async fn refresh(&self, refresh_token: &str) -> Result<TokenResponse> {
		const KIND: GrantKind = GrantKind::RefreshToken;

		let span = GrantSpan::new(KIND, "refresh");

		obs::record_grant_outcome(KIND, GrantOutcome::Attempt);

		let result = span.instrument(self.refresh_inner(refresh_token)).await;

		match &result {
			Ok(_) => obs::record_grant_outcome(KIND, GrantOutcome::Success),
			Err(_) => obs::record_grant_outcome(KIND, GrantOutcome::Failure),
		}

		result
	}

	async fn refresh_inner(&self, refresh_token: &str) -> Result<TokenResponse> {
		let handle: SessionHandle = refresh_token.parse().map_err(|_| Error::InvalidGrant)?;
		let Some(record) = self.store.fetch(&handle.id).await? else {
			return Err(Error::NotFound);
		};
		let now = OffsetDateTime::now_utc();

		// Refresh is never allowed past the outer session lifetime, regardless of token
		// validity.
		if record.is_expired_at(now) {
			self.store.delete(&record.id).await?;

			return Err(Error::InvalidGrant);
		}

		let presented = handle.secret.expose();
		let is_current = record.refresh_token.expose() == presented;
		let is_previous =
			matches!(&record.refresh_previous, Some(previous) if previous.expose() == presented);

		if !is_current && !is_previous {
			// Token reuse: revoke the entire session so a stolen token breaks for the thief and
			// the legitimate user alike.
			self.store.delete(&record.id).await?;

			return Err(Error::InvalidGrant);
		}

		let mut updated = record.clone();
		let mut rotated = false;

		if record.refresh_rotate {
			// The new previous token must be the one actually used; keeping the stale sibling
			// would let two holders alternate forever.
			let used = if is_previous {
				record.refresh_previous.clone().unwrap_or_else(|| record.refresh_token.clone())
			} else {
				record.refresh_token.clone()
			};

			updated.refresh_token = SecretString::generate(REFRESH_SECRET_BYTES);
			updated.refresh_previous = Some(used);
			rotated = true;
		}

		let slid = self.apply_sliding_expiration(&mut updated, now);
		let final_record = if rotated {
			self.rotate_with_cas(&record, updated).await?
		} else {
			if slid {
				self.store.save(updated.clone()).await?;
			}

			updated
		};

		self.issue_tokens(&final_record)
	}

	/// Extends a browser session's expiry when it has fallen below the sliding-window floor.
	///
	/// Expiry only ever holds or extends: sessions inside the `[now + update_age, now + max_age]`
	/// window are left untouched so a write is not needed on every request, and nothing here ever
	/// reduces the current value.
	fn apply_sliding_expiration(&self, record: &mut SessionRecord, now: OffsetDateTime) -> bool {
		if record.session_type != SessionType::Browser {
			return false;
		}

		let policy = self.config.policy.for_type(record.session_type);
		let Some(update_age) = policy.update_age() else {
			return false;
		};

		if record.expires < now + update_age {
			record.expires = now + policy.max_age();

			return true;
		}

		false
	}

	/// Persists a rotation through the store's compare-and-swap primitive.
	///
	/// `RefreshMismatch` means a concurrent refresh rotated first; the stored record already
	/// carries the newest secret and the presented token just became the accepted previous one,
	/// so the race resolves by answering from the store.
	async fn rotate_with_cas(
		&self,
		fetched: &SessionRecord,
		updated: SessionRecord,
	) -> Result<SessionRecord> {
		let outcome = self
			.store
			.compare_and_swap_refresh(&fetched.id, fetched.refresh_token.expose(), updated.clone())
			.await?;

		match outcome {
			RotationOutcome::Updated => Ok(updated),
			RotationOutcome::RefreshMismatch =>
				self.store.fetch(&fetched.id).await?.ok_or(Error::InvalidGrant),
			RotationOutcome::Missing => Err(Error::InvalidGrant),
		}
	}
}

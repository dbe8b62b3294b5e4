//! Grant-handling state machine: session creation, code exchange, refresh, kill, and sweep.
//!
//! Conceptually each procedure transitions a session between pending-code, active, rotated, and
//! killed states; there is no explicit status column, so state is inferred from the presence of
//! `secret`/`secret_expires`/`refresh_token` on the record. Every procedure re-checks expiration
//! itself, which is what lets the background sweep stay best-effort.

pub mod code;
pub mod create;
pub mod kill;
pub mod list;
pub mod refresh;
pub mod request;
pub mod sweep;

pub use create::*;
pub use list::*;
pub use request::*;

// self
use crate::{
	_prelude::*,
	config::BrokerConfig,
	jwt::{AccessClaims, TokenMinter, TokenResponse},
	session::SessionRecord,
	store::SessionStore,
};

/// Coordinates every grant procedure over one shared session store.
///
/// The broker is a stateless request-handling layer: no in-process locking, no cross-request
/// state. Rotation and theft detection rely entirely on the store's per-row atomicity, and the
/// dual-acceptance window on refresh tokens absorbs the one legitimate race a rotation can
/// produce.
#[derive(Clone)]
pub struct Broker {
	/// Session store implementation that persists every record.
	pub store: Arc<dyn SessionStore>,
	/// RS256 signer used for access-token minting.
	pub minter: TokenMinter,
	/// Immutable policy and issuer configuration.
	pub config: BrokerConfig,
}
impl Broker {
	/// Creates a broker over the provided store, signer, and configuration.
	pub fn new(store: Arc<dyn SessionStore>, minter: TokenMinter, config: BrokerConfig) -> Self {
		Self { store, minter, config }
	}

	/// Mints a token response for a resolved session record.
	///
	/// Issuance is a re-derivable read: nothing here mutates the session, so a crashed request
	/// after a grant's write can simply re-issue on retry.
	pub(crate) fn issue_tokens(&self, record: &SessionRecord) -> Result<TokenResponse> {
		let policy = self.config.policy.for_type(record.session_type);
		let now = OffsetDateTime::now_utc();
		let exp = (now + policy.access_ttl()).unix_timestamp();
		let claims = AccessClaims {
			client_id: record.client_id.clone(),
			resource: record.resource.clone(),
			email: record.email.clone(),
			name: record.name.clone().unwrap_or_default(),
			image: record.image.clone().unwrap_or_default(),
			scope: record.scope.clone(),
			exp,
			middlecat: self.config.issuer_str().to_owned(),
		};
		let access_token = self.minter.sign(&claims)?;
		// expires_in is relative to sidestep client clock drift; the margin covers the delay
		// between signing and the client receiving the response.
		let expires_in = policy.access_ttl().whole_seconds()
			- i64::from(self.config.expires_in_margin_seconds);

		Ok(TokenResponse {
			token_type: "bearer".into(),
			access_token,
			refresh_token: format!("{}.{}", record.id, record.refresh_token.expose()),
			refresh_rotate: record.refresh_rotate,
			expires_in,
		})
	}
}
impl Debug for Broker {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("Broker")
			.field("minter", &self.minter)
			.field("config", &self.config)
			.finish_non_exhaustive()
	}
}

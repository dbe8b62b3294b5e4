//! Session creation: the OAuth handshake start and direct API-key issuance.

// self
use crate::{
	_prelude::*,
	error::ValidationError,
	grants::Broker,
	jwt::TokenResponse,
	obs::{self, GrantKind, GrantOutcome, GrantSpan},
	resource::ResourceDescriptor,
	session::{SessionRecord, SessionType, VerifiedIdentity},
};

/// Parameters for creating a new session on behalf of an authenticated user.
#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewSessionRequest {
	/// Client application requesting the session.
	pub client_id: String,
	/// Opaque state echoed back to OAuth clients; required when `oauth` is set.
	#[serde(default)]
	pub state: Option<String>,
	/// PKCE challenge derived from the client's verifier; required when `oauth` is set.
	#[serde(default)]
	pub code_challenge: Option<String>,
	/// Human-readable session label.
	pub label: String,
	/// Session classification.
	#[serde(rename = "type")]
	pub session_type: SessionType,
	/// Opaque scope string (defaults to `default`).
	#[serde(default = "default_scope")]
	pub scope: String,
	/// Whether refresh tokens rotate on use (defaults to `true`).
	#[serde(default = "default_true")]
	pub refresh_rotate: bool,
	/// Custom session lifetime in seconds; forbidden for browser sessions.
	#[serde(default)]
	pub expires_in: Option<i64>,
	/// Protected resource the session authorizes.
	pub resource: String,
	/// Resource descriptor the UI fetched, cross-checked against this broker's issuer.
	#[serde(default)]
	pub resource_config: Option<ResourceDescriptor>,
	/// OAuth-style creation (authorization code) versus direct token issuance (defaults to
	/// `true`).
	#[serde(default = "default_true")]
	pub oauth: bool,
}

/// Outcome of session creation.
#[derive(Clone, Debug, Serialize)]
#[serde(untagged)]
pub enum SessionCreated {
	/// OAuth handshake started; the client redeems the code at the token endpoint.
	AuthorizationCode {
		/// One-time composite authorization code (`<session id>.<secret>`).
		#[serde(rename = "authCode")]
		auth_code: String,
		/// Client-supplied state, echoed back verbatim.
		state: String,
	},
	/// Non-interactive creation; tokens are issued immediately.
	Tokens(TokenResponse),
}

impl Broker {
	/// Creates a session for an authenticated identity.
	///
	/// `created_on` is a device/browser provenance string the host derives from the request (user
	/// agent); it is stored verbatim for diagnostics.
	pub async fn create_session(
		&self,
		identity: VerifiedIdentity,
		created_on: &str,
		request: NewSessionRequest,
	) -> Result<SessionCreated> {
		const KIND: GrantKind = GrantKind::CreateSession;

		let span = GrantSpan::new(KIND, "create_session");

		obs::record_grant_outcome(KIND, GrantOutcome::Attempt);

		let result =
			span.instrument(self.create_session_inner(identity, created_on, request)).await;

		match &result {
			Ok(_) => obs::record_grant_outcome(KIND, GrantOutcome::Success),
			Err(_) => obs::record_grant_outcome(KIND, GrantOutcome::Failure),
		}

		result
	}

	async fn create_session_inner(
		&self,
		identity: VerifiedIdentity,
		created_on: &str,
		request: NewSessionRequest,
	) -> Result<SessionCreated> {
		validate_lengths(&request)?;

		// Browser sessions have fixed policy: rotation is mandatory and the lifetime is not
		// negotiable.
		if request.session_type == SessionType::Browser {
			if !request.refresh_rotate {
				return Err(ValidationError::BrowserRotationRequired.into());
			}
			if request.expires_in.is_some() {
				return Err(ValidationError::BrowserCustomLifetime.into());
			}
		}
		// Non-specific rejections: do not tell an unauthenticated caller which parameter was
		// wrong.
		if request.oauth && (request.state.is_none() || request.code_challenge.is_none()) {
			return Err(Error::NotFound);
		}
		if let Some(descriptor) = &request.resource_config
			&& !descriptor.matches_issuer(&self.config.issuer)
		{
			return Err(Error::NotFound);
		}

		let policy = self.config.policy.for_type(request.session_type);
		let now = OffsetDateTime::now_utc();
		let lifetime = match request.expires_in {
			Some(seconds) if seconds <= 0 =>
				return Err(ValidationError::NonPositiveExpiresIn.into()),
			Some(seconds) => Duration::seconds(seconds),
			None => policy.max_age(),
		};
		let mut builder = SessionRecord::builder(request.session_type, identity.email.clone())
			.identity(&identity)
			.label(request.label)
			.client_id(request.client_id)
			.resource(request.resource)
			.scope(request.scope)
			.refresh_rotate(request.refresh_rotate)
			.expires(now + lifetime)
			.created_on(created_on)
			.created_at(now);

		if request.oauth {
			// Presence was checked above.
			let challenge = request.code_challenge.ok_or(Error::NotFound)?;

			builder = builder.oauth(challenge, now + self.config.code_ttl());
		}

		let record = builder.build().map_err(ValidationError::from)?;

		// The id generator is effectively collision-free; a duplicate insert is treated as an
		// idempotent no-op rather than an error.
		self.store.insert_if_absent(record.clone()).await?;

		if request.oauth {
			let state = request.state.ok_or(Error::NotFound)?;
			let secret = record.secret.as_ref().ok_or(Error::InvalidGrant)?;

			Ok(SessionCreated::AuthorizationCode {
				auth_code: format!("{}.{}", record.id, secret.expose()),
				state,
			})
		} else {
			Ok(SessionCreated::Tokens(self.issue_tokens(&record)?))
		}
	}
}

fn validate_lengths(request: &NewSessionRequest) -> Result<()> {
	check_len("clientId", &request.client_id, 200)?;
	check_len("label", &request.label, 100)?;
	check_len("scope", &request.scope, 100)?;
	check_len("resource", &request.resource, 200)?;

	if let Some(challenge) = &request.code_challenge {
		check_len("codeChallenge", challenge, 128)?;
	}

	Ok(())
}

fn check_len(field: &'static str, value: &str, max: usize) -> Result<()> {
	if value.chars().count() > max {
		return Err(ValidationError::FieldTooLong { field, max }.into());
	}

	Ok(())
}

fn default_scope() -> String {
	"default".into()
}
const fn default_true() -> bool {
	true
}

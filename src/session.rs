//! The persistent session record: the sole entity of the token-authority core.

// self
use crate::{
	_prelude::*,
	auth::{SecretString, SessionId},
};

pub(crate) const REFRESH_SECRET_BYTES: usize = 32;

/// Session classification determining every policy lookup.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SessionType {
	/// Interactive browser session with mandatory rotation and sliding expiration.
	Browser,
	/// Long-lived API key; rotation optional, no sliding expiration.
	ApiKey,
}
impl SessionType {
	/// Returns the canonical wire tag for the type.
	pub const fn as_str(self) -> &'static str {
		match self {
			SessionType::Browser => "browser",
			SessionType::ApiKey => "apiKey",
		}
	}
}
impl Display for SessionType {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Verified identity snapshot produced by the upstream login flow.
///
/// How the identity was obtained (OAuth provider, magic link) is out of scope; the core only
/// requires that the email has been verified by the host.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerifiedIdentity {
	/// Verified email address.
	pub email: String,
	/// Display name, when the provider supplied one.
	pub name: Option<String>,
	/// Avatar URL, when the provider supplied one.
	pub image: Option<String>,
}
impl VerifiedIdentity {
	/// Creates an identity snapshot from a verified email.
	pub fn new(email: impl Into<String>) -> Self {
		Self { email: email.into(), name: None, image: None }
	}

	/// Attaches a display name.
	pub fn with_name(mut self, name: impl Into<String>) -> Self {
		self.name = Some(name.into());

		self
	}

	/// Attaches an avatar URL.
	pub fn with_image(mut self, image: impl Into<String>) -> Self {
		self.image = Some(image.into());

		self
	}
}

/// Persistent authorization/session record.
///
/// There is no explicit status column; state is inferred from `secret`/`secret_expires`/
/// `refresh_token` presence. Once `secret_expires` is cleared the authorization code is
/// permanently dead, even though the inert `secret` value may remain.
#[derive(Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionRecord {
	/// Unique, never-reused session identifier; primary key.
	pub id: SessionId,
	/// Session classification.
	#[serde(rename = "type")]
	pub session_type: SessionType,
	/// Human-readable description, immutable after creation.
	pub label: String,
	/// Verified email snapshot taken at creation time.
	pub email: String,
	/// Display-name snapshot taken at creation time.
	pub name: Option<String>,
	/// Avatar-URL snapshot taken at creation time.
	pub image: Option<String>,
	/// Client application the session authorizes.
	pub client_id: String,
	/// Protected resource the session authorizes access to.
	pub resource: String,
	/// Opaque scope string passed through to access tokens.
	pub scope: String,
	/// Absolute session expiration; the outer lifetime bound.
	pub expires: OffsetDateTime,
	/// PKCE challenge, set only for OAuth-style creation.
	pub code_challenge: Option<String>,
	/// One-time authorization-code secret; inert once `secret_expires` is cleared.
	pub secret: Option<SecretString>,
	/// Validity window of the one-time secret; its absence is the authoritative
	/// "already redeemed" signal.
	pub secret_expires: Option<OffsetDateTime>,
	/// Current valid refresh-token secret.
	pub refresh_token: SecretString,
	/// Immediately-prior refresh-token secret, retained to tolerate one in-flight rotation race.
	pub refresh_previous: Option<SecretString>,
	/// Whether refresh-token rotation is enforced for this session.
	pub refresh_rotate: bool,
	/// Device/browser provenance string.
	pub created_on: String,
	/// Creation instant.
	pub created_at: OffsetDateTime,
}
impl SessionRecord {
	/// Returns a builder for assembling a new record.
	pub fn builder(session_type: SessionType, email: impl Into<String>) -> SessionRecordBuilder {
		SessionRecordBuilder::new(session_type, email)
	}

	/// Whether the outer session lifetime has passed at the provided instant.
	pub fn is_expired_at(&self, instant: OffsetDateTime) -> bool {
		self.expires < instant
	}

	/// Whether the one-time authorization code is still redeemable at the provided instant.
	pub fn code_redeemable_at(&self, instant: OffsetDateTime) -> bool {
		matches!(self.secret_expires, Some(expires) if instant <= expires)
	}
}
impl Debug for SessionRecord {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("SessionRecord")
			.field("id", &self.id)
			.field("session_type", &self.session_type)
			.field("label", &self.label)
			.field("email", &self.email)
			.field("client_id", &self.client_id)
			.field("resource", &self.resource)
			.field("scope", &self.scope)
			.field("expires", &self.expires)
			.field("secret", &self.secret.as_ref().map(|_| "<redacted>"))
			.field("secret_expires", &self.secret_expires)
			.field("refresh_token", &"<redacted>")
			.field("refresh_previous", &self.refresh_previous.as_ref().map(|_| "<redacted>"))
			.field("refresh_rotate", &self.refresh_rotate)
			.field("created_on", &self.created_on)
			.field("created_at", &self.created_at)
			.finish()
	}
}

/// Errors produced by [`SessionRecordBuilder`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ThisError)]
pub enum SessionBuilderError {
	/// Issued when no label was provided.
	#[error("A session label is required.")]
	MissingLabel,
	/// Issued when no client identifier was provided.
	#[error("A client identifier is required.")]
	MissingClientId,
	/// Issued when no resource was provided.
	#[error("A resource is required.")]
	MissingResource,
	/// Issued when no expiration instant was configured.
	#[error("An expiration instant is required.")]
	MissingExpires,
}

/// Builder for [`SessionRecord`].
///
/// Generates `id`, `refresh_token`, and `created_at` defaults so callers only supply what the
/// request determined.
#[derive(Clone, Debug)]
pub struct SessionRecordBuilder {
	session_type: SessionType,
	email: String,
	name: Option<String>,
	image: Option<String>,
	label: Option<String>,
	client_id: Option<String>,
	resource: Option<String>,
	scope: String,
	expires: Option<OffsetDateTime>,
	code_challenge: Option<String>,
	secret: Option<SecretString>,
	secret_expires: Option<OffsetDateTime>,
	refresh_rotate: bool,
	created_on: String,
	created_at: Option<OffsetDateTime>,
}
impl SessionRecordBuilder {
	fn new(session_type: SessionType, email: impl Into<String>) -> Self {
		Self {
			session_type,
			email: email.into(),
			name: None,
			image: None,
			label: None,
			client_id: None,
			resource: None,
			scope: "default".into(),
			expires: None,
			code_challenge: None,
			secret: None,
			secret_expires: None,
			refresh_rotate: true,
			created_on: String::new(),
			created_at: None,
		}
	}

	/// Copies the name/image snapshot from a verified identity.
	pub fn identity(mut self, identity: &VerifiedIdentity) -> Self {
		self.name = identity.name.clone();
		self.image = identity.image.clone();

		self
	}

	/// Sets the human-readable label.
	pub fn label(mut self, label: impl Into<String>) -> Self {
		self.label = Some(label.into());

		self
	}

	/// Sets the client application identifier.
	pub fn client_id(mut self, client_id: impl Into<String>) -> Self {
		self.client_id = Some(client_id.into());

		self
	}

	/// Sets the protected resource.
	pub fn resource(mut self, resource: impl Into<String>) -> Self {
		self.resource = Some(resource.into());

		self
	}

	/// Sets the opaque scope string (defaults to `default`).
	pub fn scope(mut self, scope: impl Into<String>) -> Self {
		self.scope = scope.into();

		self
	}

	/// Sets the absolute expiration instant.
	pub fn expires(mut self, instant: OffsetDateTime) -> Self {
		self.expires = Some(instant);

		self
	}

	/// Arms the OAuth handshake: stores the PKCE challenge and a one-time secret valid until the
	/// provided instant.
	pub fn oauth(mut self, code_challenge: impl Into<String>, secret_expires: OffsetDateTime) -> Self {
		self.code_challenge = Some(code_challenge.into());
		self.secret = Some(SecretString::generate(REFRESH_SECRET_BYTES));
		self.secret_expires = Some(secret_expires);

		self
	}

	/// Overrides the rotation flag (defaults to `true`).
	pub fn refresh_rotate(mut self, rotate: bool) -> Self {
		self.refresh_rotate = rotate;

		self
	}

	/// Sets the device/browser provenance string.
	pub fn created_on(mut self, created_on: impl Into<String>) -> Self {
		self.created_on = created_on.into();

		self
	}

	/// Overrides the creation instant (defaults to the current clock).
	pub fn created_at(mut self, instant: OffsetDateTime) -> Self {
		self.created_at = Some(instant);

		self
	}

	/// Consumes the builder and produces a [`SessionRecord`] with a fresh id and refresh token.
	pub fn build(self) -> Result<SessionRecord, SessionBuilderError> {
		let label = self.label.ok_or(SessionBuilderError::MissingLabel)?;
		let client_id = self.client_id.ok_or(SessionBuilderError::MissingClientId)?;
		let resource = self.resource.ok_or(SessionBuilderError::MissingResource)?;
		let expires = self.expires.ok_or(SessionBuilderError::MissingExpires)?;

		Ok(SessionRecord {
			id: SessionId::generate(),
			session_type: self.session_type,
			label,
			email: self.email,
			name: self.name,
			image: self.image,
			client_id,
			resource,
			scope: self.scope,
			expires,
			code_challenge: self.code_challenge,
			secret: self.secret,
			secret_expires: self.secret_expires,
			refresh_token: SecretString::generate(REFRESH_SECRET_BYTES),
			refresh_previous: None,
			refresh_rotate: self.refresh_rotate,
			created_on: self.created_on,
			created_at: self.created_at.unwrap_or_else(OffsetDateTime::now_utc),
		})
	}
}

//! Composite `id.secret` credential handles exchanged with clients.

// self
use crate::{
	_prelude::*,
	auth::{
		id::{IdentifierError, SessionId},
		secret::SecretString,
	},
};

/// Error returned when a composite credential fails its two-part parse.
#[derive(Clone, Debug, PartialEq, Eq, ThisError)]
pub enum HandleParseError {
	/// The value did not consist of exactly two non-empty dot-separated parts.
	#[error("Credential must have the shape `<session id>.<secret>`.")]
	Malformed,
	/// The id portion failed session-identifier validation.
	#[error("Credential carries an invalid session identifier.")]
	InvalidId(#[from] IdentifierError),
}

/// Composite client-facing credential: `<session id>.<secret>`.
///
/// Authorization codes and refresh tokens both use this shape; the embedded id substitutes for a
/// foreign-key lookup at the client boundary. Parsing is strict: exactly two non-empty parts,
/// neither containing a further `.`.
#[derive(Clone, PartialEq, Eq)]
pub struct SessionHandle {
	/// Session the credential belongs to.
	pub id: SessionId,
	/// Secret portion (authorization-code secret or refresh-token secret).
	pub secret: SecretString,
}
impl SessionHandle {
	/// Builds a handle from its parts.
	pub fn new(id: SessionId, secret: SecretString) -> Self {
		Self { id, secret }
	}

	/// Renders the wire form `id.secret`. Callers must avoid logging the result.
	pub fn expose(&self) -> String {
		format!("{}.{}", self.id, self.secret.expose())
	}

	/// Extracts the session id portion from a composite credential or a bare session id.
	///
	/// Kill requests accept either shape, so this takes everything before the first `.` (or the
	/// whole string) and validates it as an identifier.
	pub fn id_portion(value: &str) -> Result<SessionId, IdentifierError> {
		let id = value.split('.').next().unwrap_or(value);

		SessionId::new(id)
	}
}
impl FromStr for SessionHandle {
	type Err = HandleParseError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		let (id, secret) = s.split_once('.').ok_or(HandleParseError::Malformed)?;

		if secret.is_empty() || secret.contains('.') {
			return Err(HandleParseError::Malformed);
		}

		Ok(Self { id: SessionId::new(id)?, secret: SecretString::new(secret) })
	}
}
impl Debug for SessionHandle {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("SessionHandle")
			.field("id", &self.id)
			.field("secret", &"<redacted>")
			.finish()
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn parse_accepts_exactly_two_parts() {
		let handle: SessionHandle =
			"abc123.s3cret".parse().expect("Two-part credential should parse.");

		assert_eq!(handle.id.as_ref(), "abc123");
		assert_eq!(handle.secret.expose(), "s3cret");
		assert_eq!(handle.expose(), "abc123.s3cret");
	}

	#[test]
	fn parse_rejects_other_shapes() {
		assert!("bare-id".parse::<SessionHandle>().is_err());
		assert!(".secret".parse::<SessionHandle>().is_err());
		assert!("id.".parse::<SessionHandle>().is_err());
		assert!("id.secret.extra".parse::<SessionHandle>().is_err());
		assert!("id with space.secret".parse::<SessionHandle>().is_err());
	}

	#[test]
	fn id_portion_accepts_handles_and_bare_ids() {
		assert_eq!(
			SessionHandle::id_portion("abc123.s3cret").expect("Handle form should work.").as_ref(),
			"abc123"
		);
		assert_eq!(
			SessionHandle::id_portion("abc123").expect("Bare id form should work.").as_ref(),
			"abc123"
		);
		assert!(SessionHandle::id_portion(".secret").is_err());
	}

	#[test]
	fn debug_redacts_the_secret() {
		let handle: SessionHandle = "abc123.s3cret".parse().expect("Fixture should parse.");

		assert!(!format!("{handle:?}").contains("s3cret"));
	}
}

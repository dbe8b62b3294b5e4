//! Strongly typed session identifiers enforced across the broker domain.

// std
use std::{borrow::Borrow, ops::Deref};
// self
use crate::{_prelude::*, auth::secret};

const IDENTIFIER_MAX_LEN: usize = 128;
const GENERATED_ID_BYTES: usize = 16;

/// Error returned when identifier validation fails.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, ThisError)]
pub enum IdentifierError {
	/// The identifier was empty.
	#[error("Session identifier cannot be empty.")]
	Empty,
	/// The identifier contains whitespace characters.
	#[error("Session identifier contains whitespace.")]
	ContainsWhitespace,
	/// The identifier contains the composite separator.
	#[error("Session identifier contains the `.` separator.")]
	ContainsSeparator,
	/// The identifier exceeded the allowed character count.
	#[error("Session identifier exceeds {max} characters.")]
	TooLong {
		/// Maximum permitted character count.
		max: usize,
	},
}

/// Unique, opaque, server-generated session identifier.
///
/// Identifiers travel inside composite credentials (`id.secret`), so the `.` separator is
/// excluded alongside whitespace.
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct SessionId(String);
impl SessionId {
	/// Creates a new identifier after validation.
	pub fn new(value: impl AsRef<str>) -> Result<Self, IdentifierError> {
		let view = value.as_ref();

		validate_view(view)?;

		Ok(Self(view.to_owned()))
	}

	/// Generates a fresh random identifier (32 hex characters).
	///
	/// The generator is effectively collision-free; stores still treat duplicate inserts as
	/// idempotent no-ops.
	pub fn generate() -> Self {
		Self(secret::hex_secret(GENERATED_ID_BYTES))
	}
}
impl Deref for SessionId {
	type Target = str;

	fn deref(&self) -> &Self::Target {
		&self.0
	}
}
impl AsRef<str> for SessionId {
	fn as_ref(&self) -> &str {
		&self.0
	}
}
impl From<SessionId> for String {
	fn from(value: SessionId) -> Self {
		value.0
	}
}
impl TryFrom<String> for SessionId {
	type Error = IdentifierError;

	fn try_from(value: String) -> Result<Self, Self::Error> {
		validate_view(&value)?;

		Ok(Self(value))
	}
}
impl Borrow<str> for SessionId {
	fn borrow(&self) -> &str {
		&self.0
	}
}
impl Debug for SessionId {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		write!(f, "SessionId({})", self.0)
	}
}
impl Display for SessionId {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(&self.0)
	}
}
impl FromStr for SessionId {
	type Err = IdentifierError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		Self::new(s)
	}
}

fn validate_view(view: &str) -> Result<(), IdentifierError> {
	if view.is_empty() {
		return Err(IdentifierError::Empty);
	}
	if view.chars().any(char::is_whitespace) {
		return Err(IdentifierError::ContainsWhitespace);
	}
	if view.contains('.') {
		return Err(IdentifierError::ContainsSeparator);
	}
	if view.len() > IDENTIFIER_MAX_LEN {
		return Err(IdentifierError::TooLong { max: IDENTIFIER_MAX_LEN });
	}

	Ok(())
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn identifiers_validate_shape() {
		assert!(SessionId::new("abc-123").is_ok());
		assert!(SessionId::new("").is_err());
		assert!(SessionId::new("with space").is_err());
		assert!(SessionId::new("with.dot").is_err());
		assert!(SessionId::new("a".repeat(IDENTIFIER_MAX_LEN + 1)).is_err());
		SessionId::new("a".repeat(IDENTIFIER_MAX_LEN)).expect("Exact length should succeed.");
	}

	#[test]
	fn generated_ids_are_hex_and_unique() {
		let a = SessionId::generate();
		let b = SessionId::generate();

		assert_eq!(a.len(), 2 * GENERATED_ID_BYTES);
		assert!(a.chars().all(|c| c.is_ascii_hexdigit()));
		assert_ne!(a, b);
	}

	#[test]
	fn serde_round_trip_enforces_validation() {
		let id: SessionId =
			serde_json::from_str("\"session-42\"").expect("Identifier should deserialize.");

		assert_eq!(id.as_ref(), "session-42");
		assert!(serde_json::from_str::<SessionId>("\"with space\"").is_err());
		assert!(serde_json::from_str::<SessionId>("\"with.dot\"").is_err());
	}

	#[test]
	fn borrow_supports_fast_lookup() {
		let map: HashMap<SessionId, u8> = HashMap::from_iter([(
			SessionId::new("session-123").expect("Identifier used for lookup should be valid."),
			7_u8,
		)]);

		assert_eq!(map.get("session-123"), Some(&7));
	}
}

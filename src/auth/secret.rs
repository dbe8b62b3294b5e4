//! Random secret generation and a redacting wrapper for stored secret material.

// std
use std::fmt::Write;
// crates.io
use rand::Rng;
// self
use crate::_prelude::*;

/// Returns a cryptographically random lowercase hex string of `2 * n` characters.
///
/// Entropy unavailability is unrecoverable, so there is no error path; the thread CSPRNG panics
/// if the operating system cannot supply randomness.
pub fn hex_secret(n: usize) -> String {
	let mut bytes = vec![0_u8; n];

	rand::rng().fill(&mut bytes[..]);

	bytes.iter().fold(String::with_capacity(2 * n), |mut buf, byte| {
		write!(buf, "{byte:02x}").expect("Writing to a String cannot fail.");

		buf
	})
}

/// Redacted secret wrapper keeping authorization-code and refresh-token material out of logs.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SecretString(String);
impl SecretString {
	/// Wraps a new secret string.
	pub fn new(value: impl Into<String>) -> Self {
		Self(value.into())
	}

	/// Generates a fresh random secret of `2 * n` hex characters.
	pub fn generate(n: usize) -> Self {
		Self(hex_secret(n))
	}

	/// Returns the inner secret value. Callers must avoid logging this string.
	pub fn expose(&self) -> &str {
		&self.0
	}
}
impl AsRef<str> for SecretString {
	fn as_ref(&self) -> &str {
		self.expose()
	}
}
impl Debug for SecretString {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_tuple("SecretString").field(&"<redacted>").finish()
	}
}
impl Display for SecretString {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str("<redacted>")
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn hex_secret_has_constant_width() {
		let secret = hex_secret(32);

		assert_eq!(secret.len(), 64);
		assert!(secret.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
	}

	#[test]
	fn hex_secret_is_random() {
		assert_ne!(hex_secret(16), hex_secret(16));
	}

	#[test]
	fn secret_formatters_redact() {
		let secret = SecretString::new("super-secret");

		assert_eq!(format!("{secret:?}"), "SecretString(\"<redacted>\")");
		assert_eq!(format!("{secret}"), "<redacted>");
		assert_eq!(secret.expose(), "super-secret");
	}
}

//! RS256 access-token minting for broker sessions.

// crates.io
use jsonwebtoken::{Algorithm, EncodingKey, Header};
// self
use crate::_prelude::*;

/// Compact claims structure signed into every access token.
///
/// The claim set mirrors what resource servers verify: the client/resource pair the session
/// authorizes, the identity snapshot, the opaque scope, the expiry, and the `middlecat` issuer
/// URL so a resource can confirm which broker minted the token.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessClaims {
	/// Client application the token was minted for.
	#[serde(rename = "clientId")]
	pub client_id: String,
	/// Protected resource the token grants access to.
	pub resource: String,
	/// Verified email snapshot.
	pub email: String,
	/// Display-name snapshot (empty when the provider supplied none).
	pub name: String,
	/// Avatar-URL snapshot (empty when the provider supplied none).
	pub image: String,
	/// Opaque scope string.
	pub scope: String,
	/// Expiry in seconds since the Unix epoch.
	pub exp: i64,
	/// Issuer URL of the broker instance that minted the token.
	pub middlecat: String,
}

/// Wire-format token response returned by every token-issuing grant.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenResponse {
	/// Always `bearer`.
	pub token_type: String,
	/// Signed RS256 access token.
	pub access_token: String,
	/// Composite refresh credential (`<session id>.<refresh secret>`).
	pub refresh_token: String,
	/// Whether the client must expect rotation on each refresh.
	pub refresh_rotate: bool,
	/// Access-token lifetime in seconds, minus a small clock/network skew margin.
	pub expires_in: i64,
}

/// Signs access-token claims with an asymmetric private key.
#[derive(Clone)]
pub struct TokenMinter {
	header: Header,
	key: EncodingKey,
}
impl TokenMinter {
	/// Loads an RS256 signing key from PKCS#8 PEM bytes.
	pub fn from_rsa_pem(pem: &[u8]) -> Result<Self> {
		let key = EncodingKey::from_rsa_pem(pem).map_err(Error::signing)?;

		Ok(Self { header: Header::new(Algorithm::RS256), key })
	}

	/// Signs the claims into a compact JWT.
	pub fn sign(&self, claims: &AccessClaims) -> Result<String> {
		jsonwebtoken::encode(&self.header, claims, &self.key).map_err(Error::signing)
	}
}
impl Debug for TokenMinter {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("TokenMinter").field("algorithm", &self.header.alg).finish_non_exhaustive()
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn minter_rejects_garbage_keys() {
		let err = TokenMinter::from_rsa_pem(b"not a pem").expect_err("Garbage PEM should fail.");

		assert!(matches!(err, Error::Signing { .. }));
		assert_eq!(err.status_code(), 500);
	}

	#[test]
	fn claims_serialize_with_wire_names() {
		let claims = AccessClaims {
			client_id: "demo-client".into(),
			resource: "https://amcat.example.org".into(),
			email: "cat@example.org".into(),
			name: String::new(),
			image: String::new(),
			scope: "default".into(),
			exp: 1_700_000_000,
			middlecat: "https://middlecat.example.org".into(),
		};
		let json = serde_json::to_value(&claims).expect("Claims should serialize.");

		assert_eq!(json["clientId"], "demo-client");
		assert_eq!(json["middlecat"], "https://middlecat.example.org");
		assert!(json.get("client_id").is_none());
	}
}

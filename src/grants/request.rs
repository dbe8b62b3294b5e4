//! Discriminated token-endpoint requests and their dispatch.

// self
use crate::{
	_prelude::*,
	error::ValidationError,
	grants::Broker,
	jwt::TokenResponse,
};

/// Discriminated request body accepted by the token endpoint.
///
/// Hosts exposing this over HTTP should accept `POST` only and may enable permissive CORS, since
/// clients call the endpoint cross-origin from arbitrary resource servers.
#[derive(Clone, Debug, Deserialize)]
#[serde(tag = "grant_type", rename_all = "snake_case")]
pub enum TokenRequest {
	/// Redeems a one-time authorization code against its PKCE verifier.
	AuthorizationCode {
		/// Composite authorization code (`<session id>.<secret>`).
		code: String,
		/// PKCE code verifier held by the client.
		code_verifier: String,
	},
	/// Exchanges a refresh token for a fresh access token.
	RefreshToken {
		/// Composite refresh credential (`<session id>.<refresh secret>`).
		refresh_token: String,
	},
	/// Terminates a session outright.
	KillSession {
		/// Composite refresh credential identifying the session.
		#[serde(default)]
		refresh_token: Option<String>,
		/// Bare session id, accepted as an alternative to the refresh token.
		#[serde(default)]
		session_id: Option<String>,
	},
}
impl TokenRequest {
	/// Parses a raw JSON request body, reporting the offending field path on failure.
	pub fn from_json_slice(bytes: &[u8]) -> Result<Self> {
		let deserializer = &mut serde_json::Deserializer::from_slice(bytes);

		serde_path_to_error::deserialize(deserializer)
			.map_err(|source| ValidationError::MalformedBody { source }.into())
	}
}

/// Successful token-endpoint response body.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum GrantResponse {
	/// Token response for the token-issuing grants.
	Tokens(TokenResponse),
	/// Acknowledgement body for `kill_session`.
	Killed {
		/// Human-readable confirmation.
		message: String,
	},
}
impl GrantResponse {
	pub(crate) fn killed() -> Self {
		Self::Killed { message: "Session killed (yay)".into() }
	}
}

impl Broker {
	/// Routes a token-endpoint request to its grant procedure.
	pub async fn handle(&self, request: TokenRequest) -> Result<GrantResponse> {
		match request {
			TokenRequest::AuthorizationCode { code, code_verifier } => self
				.exchange_authorization_code(&code, &code_verifier)
				.await
				.map(GrantResponse::Tokens),
			TokenRequest::RefreshToken { refresh_token } =>
				self.refresh(&refresh_token).await.map(GrantResponse::Tokens),
			TokenRequest::KillSession { refresh_token, session_id } => {
				let target = refresh_token
					.or(session_id)
					.ok_or(ValidationError::MissingKillTarget)?;

				self.kill_session(&target).await?;

				Ok(GrantResponse::killed())
			},
		}
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn requests_discriminate_on_grant_type() {
		let code = TokenRequest::from_json_slice(
			br#"{"grant_type": "authorization_code", "code": "id.secret", "code_verifier": "v"}"#,
		)
		.expect("Authorization-code request should parse.");

		assert!(matches!(code, TokenRequest::AuthorizationCode { .. }));

		let refresh = TokenRequest::from_json_slice(
			br#"{"grant_type": "refresh_token", "refresh_token": "id.token"}"#,
		)
		.expect("Refresh request should parse.");

		assert!(matches!(refresh, TokenRequest::RefreshToken { .. }));

		let kill = TokenRequest::from_json_slice(br#"{"grant_type": "kill_session"}"#)
			.expect("Kill request tolerates missing optionals at parse time.");

		assert!(matches!(
			kill,
			TokenRequest::KillSession { refresh_token: None, session_id: None }
		));
	}

	#[test]
	fn malformed_bodies_surface_validation_errors() {
		let err = TokenRequest::from_json_slice(br#"{"grant_type": "password"}"#)
			.expect_err("Unknown grant types should fail.");

		assert_eq!(err.status_code(), 400);

		let err = TokenRequest::from_json_slice(br#"{"grant_type": "refresh_token"}"#)
			.expect_err("Missing refresh_token field should fail.");

		assert!(matches!(
			err,
			Error::Validation(ValidationError::MalformedBody { .. })
		));
	}

	#[test]
	fn kill_acknowledgement_serializes_a_message_body() {
		let body = serde_json::to_value(GrantResponse::killed())
			.expect("Kill acknowledgement should serialize.");

		assert_eq!(body["message"], "Session killed (yay)");
	}
}

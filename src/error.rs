//! Broker-level error types shared across grants, minting, and stores.

// self
use crate::_prelude::*;

/// Broker-wide result type alias returning [`Error`] by default.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Canonical broker error exposed by public APIs.
#[derive(Debug, ThisError)]
pub enum Error {
	/// Storage-layer failure.
	#[error("{0}")]
	Storage(
		#[from]
		#[source]
		crate::store::StoreError,
	),
	/// Request validation problem; surfaced before any state mutation.
	#[error(transparent)]
	Validation(#[from] ValidationError),
	/// Access-token signing failure.
	#[error("Failed to sign the access token.")]
	Signing {
		/// Underlying JWT library failure.
		#[source]
		source: jsonwebtoken::errors::Error,
	},

	/// Integrity violation during a grant (challenge mismatch, replayed or expired code, token
	/// reuse). Deliberately carries no detail so callers cannot distinguish the cause.
	#[error("Invalid token request.")]
	InvalidGrant,
	/// No session existed for the presented identifier, or a deliberately non-specific creation
	/// rejection (incomplete OAuth parameters, foreign resource descriptor).
	#[error("Not found.")]
	NotFound,
}
impl Error {
	/// HTTP-equivalent status code hosts can map this error to.
	pub const fn status_code(&self) -> u16 {
		match self {
			Error::Validation(_) => 400,
			Error::InvalidGrant => 401,
			Error::NotFound => 404,
			Error::Storage(_) | Error::Signing { .. } => 500,
		}
	}

	pub(crate) fn signing(source: jsonwebtoken::errors::Error) -> Self {
		Self::Signing { source }
	}
}

/// Validation failures raised before a grant mutates any state.
#[derive(Debug, ThisError)]
pub enum ValidationError {
	/// Request body could not be parsed into a known grant shape.
	#[error("Token request body is malformed.")]
	MalformedBody {
		/// Structured parsing failure including the offending field path.
		#[source]
		source: serde_path_to_error::Error<serde_json::Error>,
	},
	/// Browser sessions always rotate their refresh tokens.
	#[error("Browser sessions cannot disable refresh token rotation.")]
	BrowserRotationRequired,
	/// Browser sessions always use the policy lifetime.
	#[error("Browser sessions cannot set a custom lifetime.")]
	BrowserCustomLifetime,
	/// A relative expiry must be in the future.
	#[error("The expiresIn value must be positive.")]
	NonPositiveExpiresIn,
	/// A request field exceeded its permitted length.
	#[error("`{field}` exceeds {max} characters.")]
	FieldTooLong {
		/// Offending field name.
		field: &'static str,
		/// Maximum permitted character count.
		max: usize,
	},
	/// Kill requests must identify the session to terminate.
	#[error("Kill requests must carry a refresh token or session id.")]
	MissingKillTarget,
	/// A required session field was missing at record-assembly time.
	#[error(transparent)]
	Session(#[from] crate::session::SessionBuilderError),
}

#[cfg(test)]
mod tests {
	// std
	use std::error::Error as StdError;
	// self
	use super::*;
	use crate::store::StoreError;

	#[test]
	fn status_codes_follow_the_taxonomy() {
		assert_eq!(Error::from(ValidationError::BrowserRotationRequired).status_code(), 400);
		assert_eq!(Error::InvalidGrant.status_code(), 401);
		assert_eq!(Error::NotFound.status_code(), 404);
		assert_eq!(
			Error::from(StoreError::Backend { message: "down".into() }).status_code(),
			500
		);
	}

	#[test]
	fn store_error_converts_with_source() {
		let store_error = StoreError::Backend { message: "database unreachable".into() };
		let error: Error = store_error.into();

		assert!(matches!(error, Error::Storage(_)));
		assert!(error.to_string().contains("database unreachable"));
		assert!(StdError::source(&error).is_some());
	}

	#[test]
	fn invalid_grant_carries_no_detail() {
		assert_eq!(Error::InvalidGrant.to_string(), "Invalid token request.");
	}
}

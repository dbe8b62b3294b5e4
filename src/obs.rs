//! Optional observability helpers for grant handling.
//!
//! # Feature Flags
//!
//! - Enable `tracing` to emit structured spans named `middlecat.grant` with the `grant` and
//!   `stage` (call site) fields.
//! - Enable `metrics` to increment the `middlecat_grant_total` counter for every
//!   attempt/success/failure, labeled by `grant` + `outcome`.

mod metrics;
mod tracing;

pub use metrics::*;
pub use tracing::*;

// self
use crate::_prelude::*;

/// Grant procedures observed by the broker.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum GrantKind {
	/// Session creation (OAuth handshake start or direct API-key issuance).
	CreateSession,
	/// Authorization-code exchange.
	AuthorizationCode,
	/// Refresh-token grant.
	RefreshToken,
	/// Explicit session termination.
	KillSession,
	/// Expired-session sweep.
	Sweep,
}
impl GrantKind {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			GrantKind::CreateSession => "create_session",
			GrantKind::AuthorizationCode => "authorization_code",
			GrantKind::RefreshToken => "refresh_token",
			GrantKind::KillSession => "kill_session",
			GrantKind::Sweep => "sweep",
		}
	}
}
impl Display for GrantKind {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Outcome labels recorded for each attempt.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum GrantOutcome {
	/// Entry to a grant procedure.
	Attempt,
	/// Successful completion.
	Success,
	/// Failure propagated back to the caller.
	Failure,
}
impl GrantOutcome {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			GrantOutcome::Attempt => "attempt",
			GrantOutcome::Success => "success",
			GrantOutcome::Failure => "failure",
		}
	}
}
impl Display for GrantOutcome {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

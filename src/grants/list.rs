//! Authenticated session overviews for account management UIs.

// self
use crate::{
	_prelude::*,
	auth::SessionId,
	grants::Broker,
	session::{SessionRecord, SessionType},
};

/// Redacted per-session summary safe to show to the session's owner.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionOverview {
	/// Session identifier, usable as a kill target.
	pub id: SessionId,
	/// Human-readable label.
	pub label: String,
	/// Protected resource the session authorizes.
	pub resource: String,
	/// Device/browser provenance string.
	pub created_on: String,
	/// Creation instant.
	pub created_at: OffsetDateTime,
	/// Absolute expiry; surfaced for API keys only, since browser lifetimes slide.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub expires: Option<OffsetDateTime>,
}

/// Session overviews grouped per type, ordered by expiration.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionListing {
	/// Interactive browser sessions.
	pub browser: Vec<SessionOverview>,
	/// Long-lived API keys.
	#[serde(rename = "apiKey")]
	pub api_key: Vec<SessionOverview>,
}

impl Broker {
	/// Lists every session belonging to an authenticated email, grouped per type.
	///
	/// Piggybacks the probabilistic expired-session sweep, since account pages are a natural
	/// low-frequency trigger.
	pub async fn list_sessions(&self, email: &str) -> Result<SessionListing> {
		self.maybe_sweep().await;

		let mut listing = SessionListing::default();

		for record in self.store.list_by_email(email).await? {
			match record.session_type {
				SessionType::Browser => listing.browser.push(overview(record, false)),
				SessionType::ApiKey => listing.api_key.push(overview(record, true)),
			}
		}

		Ok(listing)
	}
}

fn overview(record: SessionRecord, with_expires: bool) -> SessionOverview {
	SessionOverview {
		id: record.id,
		label: record.label,
		resource: record.resource,
		created_on: record.created_on,
		created_at: record.created_at,
		expires: with_expires.then_some(record.expires),
	}
}

#[cfg(test)]
mod tests {
	// crates.io
	use time::macros;
	// self
	use super::*;
	use crate::session::SessionRecord;

	#[test]
	fn overviews_redact_secret_material() {
		let record = SessionRecord::builder(SessionType::ApiKey, "cat@example.org")
			.label("ci-key")
			.client_id("demo-client")
			.resource("https://amcat.example.org")
			.expires(macros::datetime!(2027-08-30 12:00 UTC))
			.build()
			.expect("Record fixture should build.");
		let summary = overview(record.clone(), true);
		let json = serde_json::to_string(&summary).expect("Overview should serialize.");

		assert!(!json.contains(record.refresh_token.expose()));
		assert_eq!(summary.expires, Some(record.expires));
		assert_eq!(overview(record, false).expires, None);
	}
}

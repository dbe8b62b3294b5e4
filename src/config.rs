//! Process-wide immutable broker configuration and the per-type session policy table.

// self
use crate::{_prelude::*, session::SessionType};

/// Expiration and rotation policy for one session type.
///
/// `session_update_age_hours` is the sliding-window floor: a browser session refreshed while its
/// expiry has fallen below `now + update_age` is extended back to the full `max_age`. Types
/// without a floor (API keys) never slide.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionPolicy {
	/// Outer session lifetime in hours.
	pub session_max_age_hours: u32,
	/// Sliding-window floor in hours, when sliding expiration applies.
	pub session_update_age_hours: Option<u32>,
	/// Access-token lifetime in minutes.
	pub access_expire_minutes: u32,
	/// Whether refresh-token rotation is mandatory for this type.
	pub rotation_required: bool,
}
impl SessionPolicy {
	/// Default policy for interactive browser sessions (14 days, 7 day floor, 10 min tokens).
	pub const fn browser() -> Self {
		Self {
			session_max_age_hours: 24 * 14,
			session_update_age_hours: Some(24 * 7),
			access_expire_minutes: 10,
			rotation_required: true,
		}
	}

	/// Default policy for long-lived API keys (1 year, no sliding, 60 min tokens).
	pub const fn api_key() -> Self {
		Self {
			session_max_age_hours: 24 * 365,
			session_update_age_hours: None,
			access_expire_minutes: 60,
			rotation_required: false,
		}
	}

	/// Outer session lifetime.
	pub fn max_age(&self) -> Duration {
		Duration::hours(i64::from(self.session_max_age_hours))
	}

	/// Sliding-window floor, when configured.
	pub fn update_age(&self) -> Option<Duration> {
		self.session_update_age_hours.map(|hours| Duration::hours(i64::from(hours)))
	}

	/// Access-token lifetime.
	pub fn access_ttl(&self) -> Duration {
		Duration::minutes(i64::from(self.access_expire_minutes))
	}
}

/// Static policy table keyed by session type.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PolicyTable {
	/// Policy applied to browser sessions.
	#[serde(default = "SessionPolicy::browser")]
	pub browser: SessionPolicy,
	/// Policy applied to API-key sessions.
	#[serde(default = "SessionPolicy::api_key", rename = "apiKey")]
	pub api_key: SessionPolicy,
}
impl PolicyTable {
	/// Looks up the policy for a session type.
	pub fn for_type(&self, session_type: SessionType) -> &SessionPolicy {
		match session_type {
			SessionType::Browser => &self.browser,
			SessionType::ApiKey => &self.api_key,
		}
	}
}
impl Default for PolicyTable {
	fn default() -> Self {
		Self { browser: SessionPolicy::browser(), api_key: SessionPolicy::api_key() }
	}
}

/// Immutable broker configuration, loaded once at startup.
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct BrokerConfig {
	/// Public URL identifying this broker instance; stamped into every access token and matched
	/// against resource descriptors.
	pub issuer: Url,
	/// Per-type expiration and rotation policies.
	#[serde(default)]
	pub policy: PolicyTable,
	/// Validity window of one-time authorization-code secrets, in minutes.
	#[serde(default = "default_code_ttl_minutes")]
	pub code_ttl_minutes: u32,
	/// Safety margin subtracted from the advertised `expires_in`, in seconds, to cover
	/// clock/network skew between issuance and client receipt.
	#[serde(default = "default_expires_in_margin_seconds")]
	pub expires_in_margin_seconds: u32,
	/// Probability that a single invocation runs the expired-session sweep.
	#[serde(default = "default_sweep_probability")]
	pub sweep_probability: f64,
}
impl BrokerConfig {
	/// Creates a configuration with default policies for the provided issuer URL.
	pub fn new(issuer: Url) -> Self {
		Self {
			issuer,
			policy: PolicyTable::default(),
			code_ttl_minutes: default_code_ttl_minutes(),
			expires_in_margin_seconds: default_expires_in_margin_seconds(),
			sweep_probability: default_sweep_probability(),
		}
	}

	/// Replaces the policy table.
	pub fn with_policy(mut self, policy: PolicyTable) -> Self {
		self.policy = policy;

		self
	}

	/// Overrides the sweep probability (clamped to `[0, 1]`).
	pub fn with_sweep_probability(mut self, probability: f64) -> Self {
		self.sweep_probability = probability.clamp(0., 1.);

		self
	}

	/// Authorization-code validity window.
	pub fn code_ttl(&self) -> Duration {
		Duration::minutes(i64::from(self.code_ttl_minutes))
	}

	/// Issuer URL in its wire form, without a trailing slash.
	pub fn issuer_str(&self) -> &str {
		self.issuer.as_str().trim_end_matches('/')
	}
}

const fn default_code_ttl_minutes() -> u32 {
	10
}
const fn default_expires_in_margin_seconds() -> u32 {
	5
}
const fn default_sweep_probability() -> f64 {
	0.001
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	fn issuer() -> Url {
		Url::parse("https://middlecat.example.org").expect("Issuer fixture should parse.")
	}

	#[test]
	fn policy_table_defaults_match_settings() {
		let table = PolicyTable::default();

		assert_eq!(table.for_type(SessionType::Browser).session_max_age_hours, 336);
		assert_eq!(table.for_type(SessionType::Browser).session_update_age_hours, Some(168));
		assert_eq!(table.for_type(SessionType::Browser).access_expire_minutes, 10);
		assert!(table.for_type(SessionType::Browser).rotation_required);
		assert_eq!(table.for_type(SessionType::ApiKey).session_max_age_hours, 8760);
		assert_eq!(table.for_type(SessionType::ApiKey).session_update_age_hours, None);
		assert_eq!(table.for_type(SessionType::ApiKey).access_expire_minutes, 60);
		assert!(!table.for_type(SessionType::ApiKey).rotation_required);
	}

	#[test]
	fn duration_accessors_convert_units() {
		let policy = SessionPolicy::browser();

		assert_eq!(policy.max_age(), Duration::days(14));
		assert_eq!(policy.update_age(), Some(Duration::days(7)));
		assert_eq!(policy.access_ttl(), Duration::minutes(10));
	}

	#[test]
	fn config_defaults_and_builders() {
		let config = BrokerConfig::new(issuer()).with_sweep_probability(2.);

		assert_eq!(config.code_ttl(), Duration::minutes(10));
		assert_eq!(config.expires_in_margin_seconds, 5);
		assert_eq!(config.sweep_probability, 1.);
		assert_eq!(config.issuer_str(), "https://middlecat.example.org");
	}

	#[test]
	fn config_deserializes_with_defaults() {
		let config: BrokerConfig =
			serde_json::from_str(r#"{"issuer": "https://middlecat.example.org"}"#)
				.expect("Minimal config should deserialize.");

		assert_eq!(config.policy, PolicyTable::default());
		assert_eq!(config.sweep_probability, 0.001);

		let custom: BrokerConfig = serde_json::from_str(
			r#"{
				"issuer": "https://middlecat.example.org",
				"policy": {
					"browser": {
						"session_max_age_hours": 48,
						"session_update_age_hours": 24,
						"access_expire_minutes": 5,
						"rotation_required": true
					}
				},
				"code_ttl_minutes": 5
			}"#,
		)
		.expect("Partial policy override should deserialize.");

		assert_eq!(custom.policy.browser.session_max_age_hours, 48);
		assert_eq!(custom.policy.api_key, SessionPolicy::api_key());
		assert_eq!(custom.code_ttl_minutes, 5);
	}
}

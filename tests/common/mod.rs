//! Shared fixtures for integration tests.

#![allow(dead_code)]

// std
use std::sync::Arc;
// self
use middlecat::{
	config::BrokerConfig,
	grants::{Broker, NewSessionRequest},
	jsonwebtoken::{Algorithm, DecodingKey, Validation, decode},
	jwt::{AccessClaims, TokenMinter},
	session::{SessionType, VerifiedIdentity},
	store::MemoryStore,
	url::Url,
};

pub const PRIVATE_KEY_PEM: &[u8] = include_bytes!("../fixtures/jwt_test_key.pem");
pub const PUBLIC_KEY_PEM: &[u8] = include_bytes!("../fixtures/jwt_test_key.pub.pem");
pub const ISSUER: &str = "https://middlecat.example.org";
pub const RESOURCE: &str = "https://amcat.example.org";
pub const EMAIL: &str = "cat@example.org";

/// Constructs a [`Broker`] backed by an in-memory store, the test RS256 key pair, and default
/// policies. The sweep probability is zeroed so cleanup never fires behind a test's back.
pub fn build_test_broker() -> (Broker, Arc<MemoryStore>) {
	let store = Arc::new(MemoryStore::default());
	let minter = TokenMinter::from_rsa_pem(PRIVATE_KEY_PEM)
		.expect("Test signing key should load successfully.");
	let config =
		BrokerConfig::new(Url::parse(ISSUER).expect("Issuer fixture URL should parse."))
			.with_sweep_probability(0.);

	(Broker::new(store.clone(), minter, config), store)
}

pub fn identity() -> VerifiedIdentity {
	VerifiedIdentity::new(EMAIL).with_name("Middle Cat")
}

pub fn creation_request(
	session_type: SessionType,
	oauth: bool,
	code_challenge: Option<String>,
) -> NewSessionRequest {
	NewSessionRequest {
		client_id: "demo-client".into(),
		state: oauth.then(|| "xyz-state".into()),
		code_challenge,
		label: "laptop".into(),
		session_type,
		scope: "default".into(),
		refresh_rotate: true,
		expires_in: None,
		resource: RESOURCE.into(),
		resource_config: None,
		oauth,
	}
}

/// Verifies a minted access token against the test public key and returns its claims.
pub fn decode_claims(token: &str) -> AccessClaims {
	let key = DecodingKey::from_rsa_pem(PUBLIC_KEY_PEM)
		.expect("Test verification key should load successfully.");
	let validation = Validation::new(Algorithm::RS256);

	decode::<AccessClaims>(token, &key, &validation)
		.expect("Minted access token should verify against the test public key.")
		.claims
}

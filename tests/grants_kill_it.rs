// crates.io
use time::{Duration, OffsetDateTime};
// self
use middlecat::{
	error::Error,
	grants::{GrantResponse, TokenRequest},
	session::{SessionRecord, SessionType},
	store::{MemoryStore, SessionStore},
};

mod common;
use common::*;

async fn seed_session(store: &MemoryStore, label: &str) -> SessionRecord {
	let record = SessionRecord::builder(SessionType::Browser, EMAIL)
		.label(label)
		.client_id("demo-client")
		.resource(RESOURCE)
		.expires(OffsetDateTime::now_utc() + Duration::days(14))
		.build()
		.expect("Session record fixture should build successfully.");

	store.save(record.clone()).await.expect("Seeding the session should succeed.");

	record
}

#[tokio::test]
async fn kill_accepts_refresh_tokens_and_bare_ids() {
	let (broker, store) = build_test_broker();
	let by_token = seed_session(&store, "laptop").await;
	let by_id = seed_session(&store, "phone").await;

	broker
		.kill_session(&format!("{}.{}", by_token.id, by_token.refresh_token.expose()))
		.await
		.expect("Killing by refresh token should succeed.");
	broker.kill_session(by_id.id.as_ref()).await.expect("Killing by bare id should succeed.");

	assert!(
		store.fetch(&by_token.id).await.expect("Fetch should succeed.").is_none(),
		"A killed session should be gone."
	);
	assert!(store.fetch(&by_id.id).await.expect("Fetch should succeed.").is_none());
}

#[tokio::test]
async fn killing_unknown_sessions_is_not_found() {
	let (broker, _) = build_test_broker();
	let err = broker
		.kill_session("ffff0000ffff0000.whatever")
		.await
		.expect_err("Killing an unknown session should fail.");

	assert!(matches!(err, Error::NotFound));
	assert_eq!(err.status_code(), 404);

	let err = broker
		.kill_session(".secret")
		.await
		.expect_err("A target with an empty id portion should fail.");

	assert!(matches!(err, Error::NotFound));
}

#[tokio::test]
async fn handle_dispatches_kill_requests() {
	let (broker, store) = build_test_broker();
	let record = seed_session(&store, "laptop").await;
	let token = format!("{}.{}", record.id, record.refresh_token.expose());
	let response = broker
		.handle(TokenRequest::KillSession {
			refresh_token: Some(token.clone()),
			session_id: None,
		})
		.await
		.expect("Dispatching a kill request should succeed.");
	let GrantResponse::Killed { message } = response else {
		panic!("Kill requests should return an acknowledgement body.");
	};

	assert_eq!(message, "Session killed (yay)");

	let err = broker
		.handle(TokenRequest::RefreshToken { refresh_token: token })
		.await
		.expect_err("The refresh token should die with the session.");

	assert!(matches!(err, Error::NotFound));

	let err = broker
		.handle(TokenRequest::KillSession { refresh_token: None, session_id: None })
		.await
		.expect_err("A kill request without a target should fail validation.");

	assert_eq!(err.status_code(), 400);
}

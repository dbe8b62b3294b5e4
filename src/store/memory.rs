//! Thread-safe in-memory [`SessionStore`] implementation for local development and tests.

// self
use crate::{
	_prelude::*,
	auth::SessionId,
	session::SessionRecord,
	store::{RotationOutcome, SessionStore, StoreFuture},
};

type StoreMap = Arc<RwLock<HashMap<SessionId, SessionRecord>>>;

/// Thread-safe storage backend that keeps session records in-process.
#[derive(Clone, Debug, Default)]
pub struct MemoryStore(StoreMap);
impl MemoryStore {
	fn insert_now(map: StoreMap, record: SessionRecord) -> bool {
		let mut guard = map.write();

		if guard.contains_key(&record.id) {
			return false;
		}

		guard.insert(record.id.clone(), record);

		true
	}

	fn fetch_now(map: StoreMap, id: SessionId) -> Option<SessionRecord> {
		map.read().get(&id).cloned()
	}

	fn save_now(map: StoreMap, record: SessionRecord) {
		map.write().insert(record.id.clone(), record);
	}

	fn cas_now(
		map: StoreMap,
		id: SessionId,
		expected_refresh: &str,
		replacement: SessionRecord,
	) -> RotationOutcome {
		let mut guard = map.write();
		let outcome = match guard.get(&id) {
			Some(existing) if existing.refresh_token.expose() == expected_refresh =>
				RotationOutcome::Updated,
			Some(_) => RotationOutcome::RefreshMismatch,
			None => RotationOutcome::Missing,
		};

		if matches!(outcome, RotationOutcome::Updated) {
			guard.insert(id, replacement);
		}

		outcome
	}

	fn delete_now(map: StoreMap, id: SessionId) -> bool {
		map.write().remove(&id).is_some()
	}

	fn list_now(map: StoreMap, email: &str) -> Vec<SessionRecord> {
		let mut records: Vec<_> =
			map.read().values().filter(|record| record.email == email).cloned().collect();

		records.sort_by_key(|record| record.expires);

		records
	}

	fn purge_now(map: StoreMap, now: OffsetDateTime) -> u64 {
		let mut guard = map.write();
		let before = guard.len();

		guard.retain(|_, record| !record.is_expired_at(now));

		(before - guard.len()) as u64
	}
}
impl SessionStore for MemoryStore {
	fn insert_if_absent(&self, record: SessionRecord) -> StoreFuture<'_, bool> {
		let map = self.0.clone();

		Box::pin(async move { Ok(Self::insert_now(map, record)) })
	}

	fn fetch<'a>(&'a self, id: &'a SessionId) -> StoreFuture<'a, Option<SessionRecord>> {
		let map = self.0.clone();
		let id = id.to_owned();

		Box::pin(async move { Ok(Self::fetch_now(map, id)) })
	}

	fn save(&self, record: SessionRecord) -> StoreFuture<'_, ()> {
		let map = self.0.clone();

		Box::pin(async move {
			Self::save_now(map, record);

			Ok(())
		})
	}

	fn compare_and_swap_refresh<'a>(
		&'a self,
		id: &'a SessionId,
		expected_refresh: &'a str,
		replacement: SessionRecord,
	) -> StoreFuture<'a, RotationOutcome> {
		let map = self.0.clone();
		let id = id.to_owned();

		Box::pin(async move { Ok(Self::cas_now(map, id, expected_refresh, replacement)) })
	}

	fn delete<'a>(&'a self, id: &'a SessionId) -> StoreFuture<'a, bool> {
		let map = self.0.clone();
		let id = id.to_owned();

		Box::pin(async move { Ok(Self::delete_now(map, id)) })
	}

	fn list_by_email<'a>(&'a self, email: &'a str) -> StoreFuture<'a, Vec<SessionRecord>> {
		let map = self.0.clone();

		Box::pin(async move { Ok(Self::list_now(map, email)) })
	}

	fn purge_expired(&self, now: OffsetDateTime) -> StoreFuture<'_, u64> {
		let map = self.0.clone();

		Box::pin(async move { Ok(Self::purge_now(map, now)) })
	}
}

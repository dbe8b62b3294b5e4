//! Storage contracts and built-in store implementations for session records.

pub mod file;
pub mod memory;

pub use file::FileStore;
pub use memory::MemoryStore;

// self
use crate::{_prelude::*, auth::SessionId, session::SessionRecord};

/// Boxed future returned by [`SessionStore`] operations.
pub type StoreFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T, StoreError>> + 'a + Send>>;

/// Persistence contract for session records.
///
/// The store is a dumb, indexed key-value table: all mutation is row-scoped by session id and no
/// cross-row transactions are required. Rotation correctness relies on the per-row atomicity of
/// [`SessionStore::compare_and_swap_refresh`].
pub trait SessionStore
where
	Self: Send + Sync,
{
	/// Inserts a record, treating a duplicate id as an idempotent no-op.
	///
	/// Returns `false` when a record with the same id already existed.
	fn insert_if_absent(&self, record: SessionRecord) -> StoreFuture<'_, bool>;

	/// Fetches the record with the provided id, if present.
	fn fetch<'a>(&'a self, id: &'a SessionId) -> StoreFuture<'a, Option<SessionRecord>>;

	/// Persists or replaces the record with the same id (row-scoped write).
	fn save(&self, record: SessionRecord) -> StoreFuture<'_, ()>;

	/// Atomically replaces a record if its current refresh-token secret matches `expected`.
	fn compare_and_swap_refresh<'a>(
		&'a self,
		id: &'a SessionId,
		expected_refresh: &'a str,
		replacement: SessionRecord,
	) -> StoreFuture<'a, RotationOutcome>;

	/// Deletes the record with the provided id, returning whether it existed.
	fn delete<'a>(&'a self, id: &'a SessionId) -> StoreFuture<'a, bool>;

	/// Lists all records for an email, ordered by expiration ascending.
	fn list_by_email<'a>(&'a self, email: &'a str) -> StoreFuture<'a, Vec<SessionRecord>>;

	/// Bulk-deletes every record whose expiration has passed, returning the count removed.
	fn purge_expired(&self, now: OffsetDateTime) -> StoreFuture<'_, u64>;
}

/// Result of a refresh-token compare-and-swap attempt.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum RotationOutcome {
	/// The refresh secret matched the expected value and the record was replaced.
	Updated,
	/// The record exists but its current refresh secret did not match (a concurrent rotation
	/// won the race).
	RefreshMismatch,
	/// No record carries the provided id.
	Missing,
}

/// Error type produced by [`SessionStore`] implementations.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ThisError)]
pub enum StoreError {
	/// Serialization failures surfaced by the backend.
	#[error("Serialization error: {message}.")]
	Serialization {
		/// Human-readable error payload.
		message: String,
	},
	/// Backend-level failure for the storage engine.
	#[error("Backend failure: {message}.")]
	Backend {
		/// Human-readable error payload.
		message: String,
	},
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn rotation_outcome_can_be_serialized() {
		let payload = serde_json::to_string(&RotationOutcome::Updated)
			.expect("RotationOutcome should serialize to JSON.");

		assert_eq!(payload, "\"Updated\"");

		let round_trip: RotationOutcome = serde_json::from_str(&payload)
			.expect("Serialized outcome should deserialize from JSON.");

		assert_eq!(round_trip, RotationOutcome::Updated);
	}
}

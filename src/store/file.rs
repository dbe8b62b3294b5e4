//! Simple file-backed [`SessionStore`] for single-node deployments and demos.

// std
use std::{
	fs::{self, File},
	io::Write,
	path::{Path, PathBuf},
};
// self
use crate::{
	_prelude::*,
	auth::SessionId,
	session::SessionRecord,
	store::{RotationOutcome, SessionStore, StoreError, StoreFuture},
};

/// Persists session records to a JSON file after each mutation.
#[derive(Clone, Debug)]
pub struct FileStore {
	path: PathBuf,
	inner: Arc<RwLock<HashMap<SessionId, SessionRecord>>>,
}
impl FileStore {
	/// Opens (or creates) a store at the provided path, eagerly loading existing data.
	pub fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
		let path = path.into();

		Self::ensure_parent_exists(&path)?;

		let snapshot = if path.exists() { Self::load_snapshot(&path)? } else { HashMap::new() };

		Ok(Self { path, inner: Arc::new(RwLock::new(snapshot)) })
	}

	fn load_snapshot(path: &Path) -> Result<HashMap<SessionId, SessionRecord>, StoreError> {
		let metadata = path.metadata().map_err(|e| StoreError::Backend {
			message: format!("Failed to inspect {}: {e}", path.display()),
		})?;

		if metadata.len() == 0 {
			return Ok(HashMap::new());
		}

		let bytes = fs::read(path).map_err(|e| StoreError::Backend {
			message: format!("Failed to read {}: {e}", path.display()),
		})?;
		let records: Vec<SessionRecord> =
			serde_json::from_slice(&bytes).map_err(|e| StoreError::Serialization {
				message: format!("Failed to parse {}: {e}", path.display()),
			})?;

		Ok(records.into_iter().map(|record| (record.id.clone(), record)).collect())
	}

	fn ensure_parent_exists(path: &Path) -> Result<(), StoreError> {
		if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
			fs::create_dir_all(parent).map_err(|e| StoreError::Backend {
				message: format!("Failed to create store directory {}: {e}", parent.display()),
			})?;
		}
		Ok(())
	}

	fn persist_locked(
		&self,
		contents: &HashMap<SessionId, SessionRecord>,
	) -> Result<(), StoreError> {
		Self::ensure_parent_exists(&self.path)?;

		let snapshot: Vec<_> = contents.values().collect();
		let serialized =
			serde_json::to_vec_pretty(&snapshot).map_err(|e| StoreError::Serialization {
				message: format!("Failed to serialize store snapshot: {e}"),
			})?;
		let mut tmp_path = self.path.clone();

		tmp_path.set_extension("tmp");

		{
			let mut file = File::create(&tmp_path).map_err(|e| StoreError::Backend {
				message: format!("Failed to create {}: {e}", tmp_path.display()),
			})?;

			file.write_all(&serialized).map_err(|e| StoreError::Backend {
				message: format!("Failed to write {}: {e}", tmp_path.display()),
			})?;
			file.sync_all().map_err(|e| StoreError::Backend {
				message: format!("Failed to sync {}: {e}", tmp_path.display()),
			})?;
		}

		fs::rename(&tmp_path, &self.path).map_err(|e| StoreError::Backend {
			message: format!("Failed to replace {}: {e}", self.path.display()),
		})
	}
}
impl SessionStore for FileStore {
	fn insert_if_absent(&self, record: SessionRecord) -> StoreFuture<'_, bool> {
		Box::pin(async move {
			let mut guard = self.inner.write();

			if guard.contains_key(&record.id) {
				return Ok(false);
			}

			guard.insert(record.id.clone(), record);
			self.persist_locked(&guard)?;

			Ok(true)
		})
	}

	fn fetch<'a>(&'a self, id: &'a SessionId) -> StoreFuture<'a, Option<SessionRecord>> {
		Box::pin(async move { Ok(self.inner.read().get(id).cloned()) })
	}

	fn save(&self, record: SessionRecord) -> StoreFuture<'_, ()> {
		Box::pin(async move {
			let mut guard = self.inner.write();

			guard.insert(record.id.clone(), record);
			self.persist_locked(&guard)?;

			Ok(())
		})
	}

	fn compare_and_swap_refresh<'a>(
		&'a self,
		id: &'a SessionId,
		expected_refresh: &'a str,
		replacement: SessionRecord,
	) -> StoreFuture<'a, RotationOutcome> {
		Box::pin(async move {
			let mut guard = self.inner.write();
			let outcome = match guard.get(id) {
				Some(existing) if existing.refresh_token.expose() == expected_refresh =>
					RotationOutcome::Updated,
				Some(_) => RotationOutcome::RefreshMismatch,
				None => RotationOutcome::Missing,
			};

			if matches!(outcome, RotationOutcome::Updated) {
				guard.insert(id.clone(), replacement);
				self.persist_locked(&guard)?;
			}

			Ok(outcome)
		})
	}

	fn delete<'a>(&'a self, id: &'a SessionId) -> StoreFuture<'a, bool> {
		Box::pin(async move {
			let mut guard = self.inner.write();
			let existed = guard.remove(id).is_some();

			if existed {
				self.persist_locked(&guard)?;
			}

			Ok(existed)
		})
	}

	fn list_by_email<'a>(&'a self, email: &'a str) -> StoreFuture<'a, Vec<SessionRecord>> {
		Box::pin(async move {
			let mut records: Vec<_> = self
				.inner
				.read()
				.values()
				.filter(|record| record.email == email)
				.cloned()
				.collect();

			records.sort_by_key(|record| record.expires);

			Ok(records)
		})
	}

	fn purge_expired(&self, now: OffsetDateTime) -> StoreFuture<'_, u64> {
		Box::pin(async move {
			let mut guard = self.inner.write();
			let before = guard.len();

			guard.retain(|_, record| !record.is_expired_at(now));

			let removed = (before - guard.len()) as u64;

			if removed > 0 {
				self.persist_locked(&guard)?;
			}

			Ok(removed)
		})
	}
}

//! In-memory SnapshotRepository implementation for tests and ephemeral runs.

use std::sync::RwLock;

use tile_core::SessionSnapshot;

use super::{RepositoryError, Result, SnapshotRepository};

#[derive(Default)]
struct Slots {
    session: Option<String>,
    best_score: Option<String>,
}

/// In-memory implementation of SnapshotRepository.
///
/// Entries are kept as JSON strings so that decoding behaves exactly like the
/// file-backed store, including recovery from unreadable data.
#[derive(Default)]
pub struct InMemorySnapshotRepository {
    slots: RwLock<Slots>,
}

impl InMemorySnapshotRepository {
    /// Create a new empty in-memory repository.
    pub fn new() -> Self {
        Self::default()
    }

    /// Overwrites the raw session entry. Used to simulate corrupted storage.
    pub fn put_raw_session(&self, raw: impl Into<String>) -> Result<()> {
        let mut slots = self
            .slots
            .write()
            .map_err(|_| RepositoryError::LockPoisoned)?;
        slots.session = Some(raw.into());
        Ok(())
    }

    /// Raw session entry, if present.
    pub fn raw_session(&self) -> Result<Option<String>> {
        let slots = self
            .slots
            .read()
            .map_err(|_| RepositoryError::LockPoisoned)?;
        Ok(slots.session.clone())
    }
}

impl SnapshotRepository for InMemorySnapshotRepository {
    fn save(&self, snapshot: &SessionSnapshot) -> Result<()> {
        let session = serde_json::to_string(snapshot)?;
        let mut slots = self
            .slots
            .write()
            .map_err(|_| RepositoryError::LockPoisoned)?;
        slots.session = Some(session);
        slots.best_score = Some(snapshot.state.best_score.to_string());
        Ok(())
    }

    fn load(&self) -> Result<Option<SessionSnapshot>> {
        let mut slots = self
            .slots
            .write()
            .map_err(|_| RepositoryError::LockPoisoned)?;

        let Some(raw) = slots.session.as_deref() else {
            return Ok(None);
        };

        match serde_json::from_str(raw) {
            Ok(snapshot) => Ok(Some(snapshot)),
            Err(error) => {
                tracing::warn!(%error, "Failed to parse session snapshot, clearing");
                slots.session = None;
                Ok(None)
            }
        }
    }

    fn clear(&self) -> Result<()> {
        let mut slots = self
            .slots
            .write()
            .map_err(|_| RepositoryError::LockPoisoned)?;
        slots.session = None;
        Ok(())
    }

    fn load_best_score(&self) -> Result<u64> {
        let slots = self
            .slots
            .read()
            .map_err(|_| RepositoryError::LockPoisoned)?;
        Ok(slots
            .best_score
            .as_deref()
            .and_then(|raw| raw.parse().ok())
            .unwrap_or(0))
    }
}

//! File-based SnapshotRepository implementation.

use std::fs;
use std::path::{Path, PathBuf};

use tile_core::SessionSnapshot;

use super::{Result, SnapshotRepository};

/// File-based implementation of SnapshotRepository.
///
/// # File Format
///
/// Two JSON files under `base_dir`:
/// - `session.json` holds the camelCase [`SessionSnapshot`]
/// - `best-score.json` holds a bare number
///
/// Both are written to a temporary file first and renamed into place.
pub struct FileSnapshotRepository {
    base_dir: PathBuf,
}

impl FileSnapshotRepository {
    const SESSION_FILE: &'static str = "session.json";
    const BEST_SCORE_FILE: &'static str = "best-score.json";

    /// Create a new file-based snapshot repository.
    pub fn new(base_dir: impl AsRef<Path>) -> Result<Self> {
        let base_dir = base_dir.as_ref().to_path_buf();
        fs::create_dir_all(&base_dir)?;
        Ok(Self { base_dir })
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    fn session_path(&self) -> PathBuf {
        self.base_dir.join(Self::SESSION_FILE)
    }

    fn best_score_path(&self) -> PathBuf {
        self.base_dir.join(Self::BEST_SCORE_FILE)
    }

    fn write_atomic(path: &Path, bytes: &[u8]) -> Result<()> {
        let temp_path = path.with_extension("json.tmp");
        fs::write(&temp_path, bytes)?;
        fs::rename(&temp_path, path)?;
        Ok(())
    }
}

impl SnapshotRepository for FileSnapshotRepository {
    fn save(&self, snapshot: &SessionSnapshot) -> Result<()> {
        let path = self.session_path();
        Self::write_atomic(&path, &serde_json::to_vec(snapshot)?)?;
        Self::write_atomic(
            &self.best_score_path(),
            snapshot.state.best_score.to_string().as_bytes(),
        )?;

        tracing::debug!(
            move_count = snapshot.state.move_count,
            seed_cursor = snapshot.rng_cursor,
            "Saved session snapshot to {}",
            path.display()
        );

        Ok(())
    }

    fn load(&self) -> Result<Option<SessionSnapshot>> {
        let path = self.session_path();

        if !path.exists() {
            return Ok(None);
        }

        let bytes = fs::read(&path)?;
        match serde_json::from_slice::<SessionSnapshot>(&bytes) {
            Ok(snapshot) => {
                tracing::debug!("Loaded session snapshot from {}", path.display());
                Ok(Some(snapshot))
            }
            Err(error) => {
                tracing::warn!(%error, "Failed to parse session snapshot, clearing");
                fs::remove_file(&path)?;
                Ok(None)
            }
        }
    }

    fn clear(&self) -> Result<()> {
        let path = self.session_path();

        if path.exists() {
            fs::remove_file(&path)?;
            tracing::debug!("Cleared session snapshot");
        }

        Ok(())
    }

    fn load_best_score(&self) -> Result<u64> {
        let path = self.best_score_path();

        if !path.exists() {
            return Ok(0);
        }

        let raw = fs::read_to_string(&path)?;
        Ok(serde_json::from_str(raw.trim()).unwrap_or(0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tile_core::{GameConfig, GameState};

    fn snapshot(best: u64) -> SessionSnapshot {
        let state = GameState::opening("file-seed", &GameConfig::default()).with_best_score(best);
        SessionSnapshot::new(state, 1_000)
    }

    #[test]
    fn save_then_load_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let repo = FileSnapshotRepository::new(dir.path()).unwrap();

        assert!(repo.load().unwrap().is_none());
        assert_eq!(repo.load_best_score().unwrap(), 0);

        let stored = snapshot(64);
        repo.save(&stored).unwrap();

        assert_eq!(repo.load().unwrap(), Some(stored));
        assert_eq!(repo.load_best_score().unwrap(), 64);
        assert!(!dir.path().join("session.json.tmp").exists());
    }

    #[test]
    fn corrupted_snapshot_is_discarded() {
        let dir = tempfile::tempdir().unwrap();
        let repo = FileSnapshotRepository::new(dir.path()).unwrap();
        fs::write(dir.path().join("session.json"), b"{ not json").unwrap();

        assert!(repo.load().unwrap().is_none());
        assert!(!dir.path().join("session.json").exists());
    }

    #[test]
    fn unreadable_best_score_reads_as_zero() {
        let dir = tempfile::tempdir().unwrap();
        let repo = FileSnapshotRepository::new(dir.path()).unwrap();
        fs::write(dir.path().join("best-score.json"), b"NaN").unwrap();

        assert_eq!(repo.load_best_score().unwrap(), 0);
    }

    #[test]
    fn clear_keeps_best_score() {
        let dir = tempfile::tempdir().unwrap();
        let repo = FileSnapshotRepository::new(dir.path()).unwrap();
        repo.save(&snapshot(128)).unwrap();

        repo.clear().unwrap();
        repo.clear().unwrap();

        assert!(repo.load().unwrap().is_none());
        assert_eq!(repo.load_best_score().unwrap(), 128);
    }
}

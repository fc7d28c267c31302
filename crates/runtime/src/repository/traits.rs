//! Repository contract for the resumable session slot.

use tile_core::SessionSnapshot;

use super::Result;

/// Single-slot store for the session snapshot and the best score.
///
/// Unreadable stored data is not an error: implementations log it, discard
/// it, and report nothing stored.
pub trait SnapshotRepository: Send + Sync {
    /// Replaces the stored snapshot and records its best score.
    fn save(&self, snapshot: &SessionSnapshot) -> Result<()>;

    /// Loads the stored snapshot, if a readable one exists.
    fn load(&self) -> Result<Option<SessionSnapshot>>;

    /// Removes the stored snapshot. The best score is kept.
    fn clear(&self) -> Result<()>;

    /// Best score recorded by the last save, or 0.
    fn load_best_score(&self) -> Result<u64>;
}

//! Repository layer for resumable session data.
//!
//! A single snapshot slot holds the session to resume; the best score is
//! stored next to it so that it survives restarts that clear the slot.

mod error;
mod file;
mod memory;
mod traits;

pub use error::{RepositoryError, Result};
pub use file::FileSnapshotRepository;
pub use memory::InMemorySnapshotRepository;
pub use traits::SnapshotRepository;

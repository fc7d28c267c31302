//! Delivery targets for telemetry batches.

use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use tokio::io::AsyncWriteExt;

use super::{TelemetryBatch, TelemetryError};

/// Destination for telemetry batches.
///
/// A failed delivery leaves the batch with the queue, which retries it ahead
/// of newer records on the next flush.
#[async_trait]
pub trait TelemetrySink: Send + Sync {
    async fn deliver(&self, batch: &TelemetryBatch) -> Result<(), TelemetryError>;
}

/// Appends each batch as one JSON line to a file.
pub struct JsonLinesSink {
    path: PathBuf,
}

impl JsonLinesSink {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl TelemetrySink for JsonLinesSink {
    async fn deliver(&self, batch: &TelemetryBatch) -> Result<(), TelemetryError> {
        let mut line = serde_json::to_vec(batch)?;
        line.push(b'\n');

        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            tokio::fs::create_dir_all(parent).await?;
        }

        let mut file = tokio::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .await?;
        file.write_all(&line).await?;
        file.flush().await?;

        tracing::debug!(
            records = batch.len(),
            "Appended telemetry batch to {}",
            self.path.display()
        );
        Ok(())
    }
}

/// Collects delivered batches in memory. Can be told to fail.
#[derive(Default)]
pub struct MemorySink {
    batches: Mutex<Vec<TelemetryBatch>>,
    failures_remaining: AtomicUsize,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes the next `count` deliveries fail.
    pub fn fail_next(&self, count: usize) {
        self.failures_remaining.store(count, Ordering::SeqCst);
    }

    /// Batches delivered so far, oldest first.
    pub fn batches(&self) -> Vec<TelemetryBatch> {
        self.batches
            .lock()
            .map(|batches| batches.clone())
            .unwrap_or_default()
    }
}

#[async_trait]
impl TelemetrySink for MemorySink {
    async fn deliver(&self, batch: &TelemetryBatch) -> Result<(), TelemetryError> {
        let failing = self
            .failures_remaining
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |left| left.checked_sub(1))
            .is_ok();
        if failing {
            return Err(TelemetryError::Rejected {
                size: batch.len(),
                reason: "injected failure".to_string(),
            });
        }

        if let Ok(mut batches) = self.batches.lock() {
            batches.push(batch.clone());
        }
        Ok(())
    }
}

//! Batching queue in front of a telemetry sink.

use std::collections::VecDeque;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{Mutex, oneshot};
use tokio::task::JoinHandle;

use super::{TelemetryBatch, TelemetryError, TelemetryRecord, TelemetrySink};
use crate::config::TelemetryConfig;

struct FlushTask {
    shutdown: oneshot::Sender<()>,
    handle: JoinHandle<()>,
}

struct Inner {
    queue: Mutex<VecDeque<TelemetryRecord>>,
    sink: Arc<dyn TelemetrySink>,
    max_batch_size: usize,
    flush_interval: Duration,
    task: std::sync::Mutex<Option<FlushTask>>,
}

/// Cloneable handle to a shared telemetry queue.
///
/// Records are delivered when the queue reaches `max_batch_size`, when the
/// periodic task started by [`start`](Self::start) fires, on explicit
/// [`flush`](Self::flush), and once more on [`stop`](Self::stop).
#[derive(Clone)]
pub struct TelemetryQueue {
    inner: Arc<Inner>,
}

impl TelemetryQueue {
    pub fn new(sink: Arc<dyn TelemetrySink>, config: &TelemetryConfig) -> Self {
        Self {
            inner: Arc::new(Inner {
                queue: Mutex::new(VecDeque::new()),
                sink,
                max_batch_size: config.max_batch_size.max(1),
                flush_interval: config.flush_interval,
                task: std::sync::Mutex::new(None),
            }),
        }
    }

    /// Queues a record, flushing immediately once a full batch is waiting.
    ///
    /// Delivery failures are logged; the records stay queued.
    pub async fn enqueue(&self, record: impl Into<TelemetryRecord>) {
        let len = {
            let mut queue = self.inner.queue.lock().await;
            queue.push_back(record.into());
            queue.len()
        };

        if len >= self.inner.max_batch_size
            && let Err(error) = self.flush().await
        {
            tracing::warn!(%error, "Failed to deliver telemetry batch");
        }
    }

    /// Delivers every queued record as one batch.
    ///
    /// Returns the number of records delivered. On failure the batch is put
    /// back at the front of the queue, ahead of anything queued meanwhile.
    pub async fn flush(&self) -> Result<usize, TelemetryError> {
        let batch = {
            let mut queue = self.inner.queue.lock().await;
            if queue.is_empty() {
                return Ok(0);
            }
            TelemetryBatch {
                events: queue.drain(..).collect(),
            }
        };

        match self.inner.sink.deliver(&batch).await {
            Ok(()) => Ok(batch.len()),
            Err(error) => {
                let mut queue = self.inner.queue.lock().await;
                for record in batch.events.into_iter().rev() {
                    queue.push_front(record);
                }
                Err(error)
            }
        }
    }

    /// Number of records waiting for delivery.
    pub async fn size(&self) -> usize {
        self.inner.queue.lock().await.len()
    }

    /// Starts the periodic flush task. No-op when already running or when the
    /// flush interval is zero.
    pub fn start(&self) {
        let interval = self.inner.flush_interval;
        if interval.is_zero() {
            return;
        }

        let Ok(mut task) = self.inner.task.lock() else {
            return;
        };
        if task.is_some() {
            return;
        }

        let queue = self.clone();
        let (shutdown, mut shutdown_rx) = oneshot::channel();
        let handle = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            // The first tick completes immediately.
            ticker.tick().await;
            loop {
                tokio::select! {
                    _ = ticker.tick() => {
                        if let Err(error) = queue.flush().await {
                            tracing::warn!(%error, "Periodic telemetry flush failed");
                        }
                    }
                    _ = &mut shutdown_rx => break,
                }
            }
        });
        *task = Some(FlushTask { shutdown, handle });
        tracing::debug!(interval_ms = interval.as_millis() as u64, "Telemetry flush task started");
    }

    /// Stops the periodic task and performs a final flush.
    ///
    /// A periodic flush already in flight is allowed to finish first.
    pub async fn stop(&self) -> Result<usize, TelemetryError> {
        let task = self
            .inner
            .task
            .lock()
            .ok()
            .and_then(|mut task| task.take());
        if let Some(FlushTask { shutdown, handle }) = task {
            let _ = shutdown.send(());
            if let Err(error) = handle.await {
                tracing::warn!(%error, "Telemetry flush task ended abnormally");
            }
        }
        self.flush().await
    }
}

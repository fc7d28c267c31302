//! Telemetry delivery through the batching queue.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use tile_core::{Direction, InputSource};
use tile_runtime::config::TelemetryConfig;
use tile_runtime::{
    JsonLinesSink, MemorySink, RuntimeConfig, Session, TelemetryBatch, TelemetryError,
    TelemetryQueue, TelemetrySink,
};

/// Sink that takes a while to accept each batch.
#[derive(Default)]
struct SlowSink {
    delivered: Mutex<Vec<usize>>,
}

#[async_trait]
impl TelemetrySink for SlowSink {
    async fn deliver(&self, batch: &TelemetryBatch) -> Result<(), TelemetryError> {
        tokio::time::sleep(Duration::from_millis(100)).await;
        self.delivered.lock().unwrap().push(batch.len());
        Ok(())
    }
}

fn played_session(moves: &[Direction]) -> Session {
    let config = RuntimeConfig {
        session_id: Some("session-queue".to_string()),
        ..RuntimeConfig::default()
    };
    let mut session = Session::bootstrap(&config, None, 0).unwrap();
    for (step, direction) in moves.iter().enumerate() {
        let now = 100 * (step as i64 + 1);
        session
            .enqueue_move(*direction, InputSource::Keyboard, None, now)
            .unwrap();
        session.complete_animation(now + 50).unwrap();
    }
    session
}

#[tokio::test]
async fn json_lines_sink_appends_one_line_per_batch() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("telemetry").join("events.jsonl");
    let queue = TelemetryQueue::new(
        Arc::new(JsonLinesSink::new(&path)),
        &TelemetryConfig {
            max_batch_size: 2,
            flush_interval: Duration::ZERO,
            log_path: Some(path.clone()),
        },
    );

    let mut session = played_session(&[Direction::Right, Direction::Left, Direction::Down]);
    for record in session.consume_telemetry() {
        queue.enqueue(record).await;
    }
    assert_eq!(queue.size().await, 1);
    assert_eq!(queue.stop().await.unwrap(), 1);

    let contents = std::fs::read_to_string(&path).unwrap();
    let batches: Vec<TelemetryBatch> = contents
        .lines()
        .map(|line| serde_json::from_str(line).unwrap())
        .collect();
    assert_eq!(batches.len(), 2);
    assert_eq!(batches[0].len(), 2);
    assert_eq!(batches[1].len(), 1);
    assert_eq!(batches[0].events[0].event_name(), "move.completed");
    assert_eq!(batches[0].events[0].session_id(), "session-queue");
}

#[tokio::test]
async fn periodic_task_flushes_partial_batches() {
    let sink = Arc::new(MemorySink::new());
    let queue = TelemetryQueue::new(
        sink.clone(),
        &TelemetryConfig {
            max_batch_size: 50,
            flush_interval: Duration::from_millis(20),
            log_path: None,
        },
    );
    queue.start();

    let mut session = played_session(&[Direction::Right]);
    for record in session.consume_telemetry() {
        queue.enqueue(record).await;
    }

    tokio::time::sleep(Duration::from_millis(120)).await;
    assert_eq!(queue.size().await, 0);
    assert_eq!(sink.batches().len(), 1);

    assert_eq!(queue.stop().await.unwrap(), 0);
}

#[tokio::test]
async fn stop_retains_records_when_final_delivery_fails() {
    let sink = Arc::new(MemorySink::new());
    let queue = TelemetryQueue::new(sink.clone(), &TelemetryConfig::default());

    let mut session = played_session(&[Direction::Right, Direction::Left]);
    for record in session.consume_telemetry() {
        queue.enqueue(record).await;
    }

    sink.fail_next(1);
    assert!(queue.stop().await.is_err());
    assert_eq!(queue.size().await, 2);

    assert_eq!(queue.flush().await.unwrap(), 2);
    assert_eq!(sink.batches()[0].len(), 2);
}

#[tokio::test]
async fn stop_waits_for_an_in_flight_periodic_flush() {
    let sink = Arc::new(SlowSink::default());
    let queue = TelemetryQueue::new(
        sink.clone(),
        &TelemetryConfig {
            max_batch_size: 50,
            flush_interval: Duration::from_millis(20),
            log_path: None,
        },
    );
    queue.start();

    let mut session = played_session(&[Direction::Right, Direction::Left]);
    for record in session.consume_telemetry() {
        queue.enqueue(record).await;
    }

    // Let the periodic flush take the batch and start delivering it.
    tokio::time::sleep(Duration::from_millis(40)).await;
    queue.stop().await.unwrap();

    let delivered: usize = sink.delivered.lock().unwrap().iter().sum();
    assert_eq!(delivered, 2);
    assert_eq!(queue.size().await, 0);
}

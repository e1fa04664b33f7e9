// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! One collector per room: hands telemetry to that room's policy engine
//! and accumulates it into a cloud-sync batch. Control messages are
//! observed but never enter the batch.

use hvac_domain::{ControlMessage, TelemetryMessage};
use hvac_policy::PolicyEngine;
use parking_lot::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

pub struct RoomCollector {
    room_id: String,
    policy_engine: Arc<PolicyEngine>,
    batch: Mutex<Vec<TelemetryMessage>>,
    control_events_seen: AtomicU64,
}

impl RoomCollector {
    pub fn new(room_id: impl Into<String>, policy_engine: Arc<PolicyEngine>) -> Self {
        Self {
            room_id: room_id.into(),
            policy_engine,
            batch: Mutex::new(Vec::new()),
            control_events_seen: AtomicU64::new(0),
        }
    }

    pub fn room_id(&self) -> &str {
        &self.room_id
    }

    pub fn on_telemetry(&self, message: TelemetryMessage) {
        self.policy_engine.evaluate(&message);
        self.batch.lock().push(message);
    }

    pub fn on_control(&self, _message: ControlMessage) {
        self.control_events_seen.fetch_add(1, Ordering::Relaxed);
    }

    pub fn batch_len(&self) -> usize {
        self.batch.lock().len()
    }

    /// A copy of the current batch; does not clear it. Superseded by
    /// [`RoomCollector::drain_batch`] for the sync worker's own use —
    /// kept for tests and introspection.
    pub fn snapshot_batch(&self) -> Vec<TelemetryMessage> {
        self.batch.lock().clone()
    }

    pub fn clear_batch(&self) {
        self.batch.lock().clear();
    }

    /// Atomically take everything currently batched, leaving the batch
    /// empty for whatever arrives next. Drain+clear is one lock
    /// acquisition, so nothing accumulated concurrently is lost.
    pub fn drain_batch(&self) -> Vec<TelemetryMessage> {
        std::mem::take(&mut *self.batch.lock())
    }

    /// Put previously-drained messages back, ahead of anything that
    /// accumulated since the drain. Used when an upload fails so the
    /// batch is retried whole on the next tick (S4).
    pub fn requeue(&self, mut messages: Vec<TelemetryMessage>) {
        if messages.is_empty() {
            return;
        }
        let mut batch = self.batch.lock();
        messages.append(&mut batch);
        *batch = messages;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hvac_domain::message::Metadata;
    use hvac_policy::ForwardClient;
    use std::path::PathBuf;

    struct NoopClient;
    #[async_trait::async_trait]
    impl ForwardClient for NoopClient {
        async fn forward(&self, _request: hvac_policy::ForwardRequest) -> Result<(), String> {
            Ok(())
        }
    }

    fn telemetry(room_id: &str) -> TelemetryMessage {
        TelemetryMessage {
            type_tag: "iot:sensor:temperature".into(),
            data_value: 21.0,
            timestamp_ms: 0,
            metadata: Metadata {
                room_id: room_id.into(),
                rack_id: None,
                object_id: "monitor".into(),
                resource_id: "temp".into(),
            },
        }
    }

    // S4: cloud sync drains on success, retains on failure.
    #[test]
    fn batch_accumulates_and_clears_only_on_explicit_clear() {
        let engine = Arc::new(
            PolicyEngine::load("room_A1", PathBuf::from("/nonexistent/policy.json"), Arc::new(NoopClient))
                .unwrap(),
        );
        let collector = RoomCollector::new("room_A1", engine);
        collector.on_telemetry(telemetry("room_A1"));
        collector.on_telemetry(telemetry("room_A1"));
        collector.on_telemetry(telemetry("room_A1"));
        assert_eq!(collector.batch_len(), 3);

        let snapshot = collector.snapshot_batch();
        assert_eq!(snapshot.len(), 3);
        assert_eq!(collector.batch_len(), 3, "snapshot must not drain");

        collector.on_telemetry(telemetry("room_A1"));
        assert_eq!(collector.batch_len(), 4);

        collector.clear_batch();
        assert_eq!(collector.batch_len(), 0);
    }

    #[test]
    fn requeue_merges_ahead_of_newly_arrived_telemetry() {
        let engine = Arc::new(
            PolicyEngine::load("room_A1", PathBuf::from("/nonexistent/policy.json"), Arc::new(NoopClient)).unwrap(),
        );
        let collector = RoomCollector::new("room_A1", engine);
        collector.on_telemetry(telemetry("room_A1"));
        let drained = collector.drain_batch();
        assert_eq!(collector.batch_len(), 0);

        collector.on_telemetry(telemetry("room_A1"));
        collector.requeue(drained);
        assert_eq!(collector.batch_len(), 2);
    }
}

// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Subscribes once, for every room, to the bus's telemetry and control
//! patterns, and routes each inbound message to the right room's
//! collector by `metadata.room_id`. A message for a room with no
//! registered collector is logged and dropped.

use crate::room::RoomCollector;
use dashmap::DashMap;
use hvac_domain::{ControlMessage, Envelope, TelemetryMessage};
use hvac_pubsub::{InboundMessage, PubSubAdapter, PubSubError};
use std::sync::Arc;
use tracing::warn;

const TELEMETRY_PATTERNS: &[&str] = &[
    "hvac/room/+/device/+/telemetry/+",
    "hvac/room/+/rack/+/device/+/telemetry/+",
];

const CONTROL_PATTERNS: &[&str] = &[
    "hvac/room/+/device/+/control/+",
    "hvac/room/+/rack/+/device/+/control/+",
];

pub struct Dispatcher {
    collectors: DashMap<String, Arc<RoomCollector>>,
    adapter: Arc<dyn PubSubAdapter>,
}

impl Dispatcher {
    pub fn new(adapter: Arc<dyn PubSubAdapter>) -> Arc<Self> {
        Arc::new(Self {
            collectors: DashMap::new(),
            adapter,
        })
    }

    pub fn register_room(&self, collector: Arc<RoomCollector>) {
        self.collectors.insert(collector.room_id().to_string(), collector);
    }

    pub fn collectors(&self) -> Vec<Arc<RoomCollector>> {
        self.collectors.iter().map(|e| e.value().clone()).collect()
    }

    pub async fn start(self: &Arc<Self>) -> Result<(), PubSubError> {
        self.adapter.start().await?;

        for pattern in TELEMETRY_PATTERNS {
            let this = self.clone();
            self.adapter
                .subscribe(pattern, 0, Arc::new(move |msg: InboundMessage| this.handle_telemetry(msg)))
                .await?;
        }
        for pattern in CONTROL_PATTERNS {
            let this = self.clone();
            self.adapter
                .subscribe(pattern, 0, Arc::new(move |msg: InboundMessage| this.handle_control(msg)))
                .await?;
        }
        Ok(())
    }

    fn handle_telemetry(&self, message: InboundMessage) {
        let Ok(payload) = std::str::from_utf8(&message.payload) else {
            warn!(topic = %message.topic, "telemetry payload is not valid UTF-8, dropping");
            return;
        };
        let telemetry = match TelemetryMessage::from_json(payload) {
            Ok(t) => t,
            Err(e) => {
                warn!(topic = %message.topic, error = %e, "malformed telemetry message, dropping");
                return;
            }
        };
        match self.collectors.get(&telemetry.metadata.room_id) {
            Some(collector) => collector.on_telemetry(telemetry),
            None => warn!(room_id = %telemetry.metadata.room_id, "telemetry for unknown room dropped"),
        }
    }

    fn handle_control(&self, message: InboundMessage) {
        let Ok(payload) = std::str::from_utf8(&message.payload) else {
            warn!(topic = %message.topic, "control payload is not valid UTF-8, dropping");
            return;
        };
        let control = match ControlMessage::from_json(payload) {
            Ok(c) => c,
            Err(e) => {
                warn!(topic = %message.topic, error = %e, "malformed control message, dropping");
                return;
            }
        };
        match self.collectors.get(&control.metadata.room_id) {
            Some(collector) => collector.on_control(control),
            None => warn!(room_id = %control.metadata.room_id, "control event for unknown room dropped"),
        }
    }
}

// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! The shared listener factory: translates a [`ResourceEvent`] into a
//! [`TelemetryMessage`] or [`ControlMessage`] and publishes it on the
//! resource's topic. Captured once per resource at startup, per the
//! "shared listener factory" contract.

use crate::clock::now_ms;
use hvac_domain::message::{ControlMessage, Envelope, Metadata, TelemetryMessage};
use hvac_domain::{ResourceEvent, ResourceListener};
use hvac_pubsub::PubSubAdapter;
use std::sync::Arc;
use tracing::warn;

pub struct PublishingListener {
    telemetry_topic: String,
    control_topic: String,
    metadata: Metadata,
    adapter: Arc<dyn PubSubAdapter>,
}

impl PublishingListener {
    pub fn new(
        telemetry_topic: String,
        control_topic: String,
        metadata: Metadata,
        adapter: Arc<dyn PubSubAdapter>,
    ) -> Self {
        Self {
            telemetry_topic,
            control_topic,
            metadata,
            adapter,
        }
    }

    fn spawn_publish<E: Envelope + Send + 'static>(&self, topic: String, message: E) {
        let adapter = self.adapter.clone();
        let encoded = match message.to_json() {
            Ok(s) => s,
            Err(e) => {
                warn!(topic, error = %e, "failed to encode message, dropping publish");
                return;
            }
        };
        tokio::spawn(async move {
            if let Err(e) = adapter.publish(&topic, encoded.into_bytes(), 0, false).await {
                warn!(topic, error = %e, "publish failed");
            }
        });
    }
}

impl ResourceListener for PublishingListener {
    fn on_data_changed(&self, _resource_id: &str, type_tag: &str, event: &ResourceEvent) {
        match event {
            ResourceEvent::Telemetry { value } => {
                let msg = TelemetryMessage {
                    type_tag: type_tag.to_string(),
                    data_value: *value,
                    timestamp_ms: now_ms(),
                    metadata: self.metadata.clone(),
                };
                self.spawn_publish(self.telemetry_topic.clone(), msg);
            }
            ResourceEvent::Control { event_type, event_data } => {
                let msg = ControlMessage {
                    type_tag: type_tag.to_string(),
                    event_type: event_type.clone(),
                    event_data: event_data.clone(),
                    timestamp_ms: now_ms(),
                    metadata: self.metadata.clone(),
                };
                self.spawn_publish(self.control_topic.clone(), msg);
            }
        }
    }
}

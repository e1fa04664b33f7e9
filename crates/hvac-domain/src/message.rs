// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Telemetry and control message envelopes published to the pub/sub bus.
//!
//! Generalises the original's `GenericMessage` base class: both message
//! kinds implement [`Envelope`] for JSON (de)serialization, wire format
//! is JSON/UTF-8 with no stable field order required.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Metadata {
    pub room_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rack_id: Option<String>,
    pub object_id: String,
    pub resource_id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TelemetryMessage {
    #[serde(rename = "type")]
    pub type_tag: String,
    pub data_value: f64,
    pub timestamp_ms: i64,
    pub metadata: Metadata,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ControlMessage {
    #[serde(rename = "type")]
    pub type_tag: String,
    pub event_type: String,
    pub event_data: serde_json::Value,
    pub timestamp_ms: i64,
    pub metadata: Metadata,
}

/// Common behavior of the two message kinds published on the bus.
pub trait Envelope: Serialize + for<'de> Deserialize<'de> {
    fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }

    fn from_json(s: &str) -> serde_json::Result<Self>
    where
        Self: Sized,
    {
        serde_json::from_str(s)
    }
}

impl Envelope for TelemetryMessage {}
impl Envelope for ControlMessage {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn telemetry_round_trips_through_json() {
        let msg = TelemetryMessage {
            type_tag: "iot:sensor:temperature".into(),
            data_value: 39.5,
            timestamp_ms: 1_000,
            metadata: Metadata {
                room_id: "room_A1".into(),
                rack_id: Some("rack_A1".into()),
                object_id: "rack_cooling_unit".into(),
                resource_id: "rack_cooling_unit_temp".into(),
            },
        };
        let json = msg.to_json().unwrap();
        let back = TelemetryMessage::from_json(&json).unwrap();
        assert_eq!(msg, back);
    }

    #[test]
    fn metadata_omits_rack_id_when_room_scoped() {
        let meta = Metadata {
            room_id: "room_A1".into(),
            rack_id: None,
            object_id: "monitor".into(),
            resource_id: "humidity".into(),
        };
        let json = serde_json::to_string(&meta).unwrap();
        assert!(!json.contains("rack_id"));
    }
}

// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! End-to-end wiring tests: rooms config in, telemetry through the bus,
//! out through the policy engine and the gateway's forward resource.

use hvac_collector::{Dispatcher, RoomCollector};
use hvac_domain::message::Metadata;
use hvac_domain::TelemetryMessage;
use hvac_gateway::{DeviceRegistry, GatewayForwardClient, RegistryAttributes, RegistryEntry};
use hvac_policy::PolicyEngine;
use hvac_pubsub::{InMemoryBroker, PubSubAdapter};
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;

const ROOMS_CONFIG: &str = r#"{
    "rooms": [
        {
            "room_id": "room_A1",
            "location": "Building 1 / Floor 2",
            "devices": [],
            "racks": [
                {"rack_id": "rack_A1", "type": "air_cooled", "devices": []}
            ]
        }
    ]
}"#;

struct RecordingUpstream {
    calls: Arc<std::sync::Mutex<Vec<(String, serde_json::Value)>>>,
}

#[async_trait::async_trait]
impl hvac_gateway::UpstreamClient for RecordingUpstream {
    async fn post(&self, uri: &str, command: &serde_json::Value) -> Result<hvac_gateway::ForwardResponse, hvac_gateway::ForwardError> {
        self.calls.lock().unwrap().push((uri.to_string(), command.clone()));
        Ok(hvac_gateway::ForwardResponse { status: 200, body: command.clone() })
    }
}

// S1, end-to-end: a rooms-config-loaded rack cooling unit's high-temperature
// telemetry, routed through the dispatcher, trips a policy that reaches the
// forward resource with the rack cooling unit's physical URI.
#[tokio::test]
async fn rooms_config_topology_drives_a_policy_match_to_the_forward_resource() {
    let dir = tempfile::tempdir().unwrap();
    let rooms_config_path = dir.path().join("rooms_config.json");
    std::fs::write(&rooms_config_path, ROOMS_CONFIG).unwrap();
    let topology = hvac_agent::topology::load(&rooms_config_path).unwrap();
    assert_eq!(topology.rooms.len(), 1);
    assert_eq!(topology.objects.len(), 2, "air_cooled default loadout is airflow_manager + rack_cooling_unit");

    let registry = Arc::new(DeviceRegistry::new());
    registry.record(
        "10.0.0.5",
        RegistryEntry {
            port: 5683,
            path: "hvac/room/room_A1/rack/rack_A1/device/rack_cooling_unit/rack_cooling_unit_temp/control".into(),
            attributes: RegistryAttributes {
                rt: "hvac.control".into(),
                interface: "core.a".into(),
                ct: "application/json".into(),
                title: "rack_cooling_unit".into(),
                object_id: Some("rack_cooling_unit".into()),
                room_id: Some("room_A1".into()),
                rack_id: Some("rack_A1".into()),
            },
        },
    );
    let calls = Arc::new(std::sync::Mutex::new(Vec::new()));
    let upstream: Arc<dyn hvac_gateway::UpstreamClient> = Arc::new(RecordingUpstream { calls: calls.clone() });
    let forward_client: Arc<dyn hvac_policy::ForwardClient> =
        Arc::new(GatewayForwardClient::new(registry.clone(), upstream));

    let policy_path = dir.path().join("policy.json");
    let engine = Arc::new(PolicyEngine::load("room_A1", policy_path, forward_client).unwrap());
    engine
        .add_policy(json!({
            "type": "smart_object",
            "room_id": "room_A1",
            "rack_id": "rack_A1",
            "object_id": "rack_cooling_unit",
            "resource_id": "rack_cooling_unit_temp",
            "sensor_type": "iot:sensor:temperature",
            "condition": {"operator": ">", "value": 35.0},
            "action": {"command": {"status": "ON", "speed": 80}}
        }))
        .unwrap();

    let adapter: Arc<dyn PubSubAdapter> = Arc::new(InMemoryBroker::new());
    let dispatcher = Dispatcher::new(adapter.clone());
    dispatcher.register_room(Arc::new(RoomCollector::new("room_A1", engine)));
    dispatcher.start().await.unwrap();

    let telemetry = TelemetryMessage {
        type_tag: "iot:sensor:temperature".into(),
        data_value: 39.5,
        timestamp_ms: 0,
        metadata: Metadata {
            room_id: "room_A1".into(),
            rack_id: Some("rack_A1".into()),
            object_id: "rack_cooling_unit".into(),
            resource_id: "rack_cooling_unit_temp".into(),
        },
    };
    adapter
        .publish(
            "hvac/room/room_A1/rack/rack_A1/device/rack_cooling_unit/telemetry/rack_cooling_unit_temp",
            hvac_domain::Envelope::to_json(&telemetry).unwrap().into_bytes(),
            0,
            false,
        )
        .await
        .unwrap();

    tokio::time::sleep(Duration::from_millis(50)).await;

    let recorded = calls.lock().unwrap();
    assert_eq!(recorded.len(), 1);
    assert!(recorded[0].0.contains("10.0.0.5:5683"));
    assert_eq!(recorded[0].1["speed"], 80);
}

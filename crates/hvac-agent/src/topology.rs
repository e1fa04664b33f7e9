// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Builds the room/rack/smart-object tree from `rooms_config.json`.
//!
//! The document names each device by a `type` tag resolved through
//! `hvac_domain::catalogue`. A rack's own `type` (`air_cooled` /
//! `water_cooled`) only matters when its `devices` list is empty: it then
//! selects that rack's default companion devices, since the source
//! config format allows an empty `devices` list to mean "use the rack's
//! stock loadout" (`rooms_config.json`'s schema, §6).

use anyhow::{Context, Result};
use hvac_domain::{Rack, RackStatus, Room, SmartObject};
use parking_lot::Mutex;
use serde::Deserialize;
use std::path::Path;
use std::sync::Arc;
use tracing::warn;

#[derive(Debug, Deserialize)]
pub struct RoomsDocument {
    pub rooms: Vec<RoomConfig>,
}

#[derive(Debug, Deserialize)]
pub struct RoomConfig {
    pub room_id: String,
    pub location: String,
    #[serde(default)]
    pub devices: Vec<DeviceConfig>,
    #[serde(default)]
    pub racks: Vec<RackConfig>,
}

#[derive(Debug, Deserialize)]
pub struct RackConfig {
    pub rack_id: String,
    #[serde(rename = "type")]
    pub rack_type: RackType,
    #[serde(default)]
    pub devices: Vec<DeviceConfig>,
}

#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RackType {
    AirCooled,
    WaterCooled,
}

#[derive(Debug, Deserialize)]
pub struct DeviceConfig {
    #[serde(rename = "type")]
    pub device_type: String,
}

/// A smart object ready for the device runtime, paired with the status
/// handle of the rack it belongs to (`None` for a room-scoped object),
/// shared with the very same [`Rack`] held in `BuiltTopology::rooms` so
/// that turning that rack on or off is observed by the runtime.
pub struct RuntimeObject {
    pub object: Arc<SmartObject>,
    pub rack_status: Option<Arc<Mutex<RackStatus>>>,
}

/// Every smart object built from a config, flattened for the runtime, each
/// paired with the `(room_id, rack_id?)` it belongs to for logging.
pub struct BuiltTopology {
    pub rooms: Vec<Room>,
    pub objects: Vec<RuntimeObject>,
}

pub fn load(path: impl AsRef<Path>) -> Result<BuiltTopology> {
    let path = path.as_ref();
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read rooms config {}", path.display()))?;
    let document: RoomsDocument = serde_json::from_str(&contents)
        .with_context(|| format!("failed to parse rooms config {}", path.display()))?;
    Ok(build(document))
}

fn build(document: RoomsDocument) -> BuiltTopology {
    let mut rooms = Vec::new();
    let mut objects = Vec::new();

    for room_config in document.rooms {
        let mut room = Room::new(room_config.room_id.clone(), room_config.location);

        for device in &room_config.devices {
            // Built twice, deliberately: the display tree (`room`) and the
            // runtime's own `Arc<SmartObject>` are independent instances
            // with matching topology rather than a shared one, since
            // `Resource` holds no `Clone` impl over its listener list.
            if let Some(object) = build_device(&device.device_type, &room_config.room_id, None) {
                room.add_smart_object(object);
            }
            if let Some(object) = build_device(&device.device_type, &room_config.room_id, None) {
                objects.push(RuntimeObject { object: Arc::new(object), rack_status: None });
            }
        }

        for rack_config in room_config.racks {
            let mut rack = Rack::new(rack_config.rack_id.clone());
            let rack_status = rack.status_handle();
            let device_types = effective_rack_devices(&rack_config);
            for device_type in &device_types {
                if let Some(object) = build_device(device_type, &room_config.room_id, Some(&rack_config.rack_id)) {
                    rack.add_smart_object(object);
                }
                if let Some(object) = build_device(device_type, &room_config.room_id, Some(&rack_config.rack_id)) {
                    objects.push(RuntimeObject { object: Arc::new(object), rack_status: Some(rack_status.clone()) });
                }
            }
            room.add_rack(rack);
        }

        rooms.push(room);
    }

    BuiltTopology { rooms, objects }
}

/// A rack's explicit `devices` list wins; an empty list falls back to the
/// rack type's default companion devices.
fn effective_rack_devices(rack: &RackConfig) -> Vec<String> {
    if !rack.devices.is_empty() {
        return rack.devices.iter().map(|d| d.device_type.clone()).collect();
    }
    match rack.rack_type {
        RackType::AirCooled => vec!["AirflowManager".into(), "RackCoolingUnit".into()],
        RackType::WaterCooled => vec!["WaterLoopController".into(), "CoolingSystemHub".into()],
    }
}

fn build_device(device_type: &str, room_id: &str, rack_id: Option<&str>) -> Option<SmartObject> {
    use hvac_domain::catalogue;

    match (device_type, rack_id) {
        ("RackCoolingUnit", Some(rack_id)) => Some(catalogue::rack_cooling_unit("rack_cooling_unit", room_id, rack_id)),
        ("WaterLoopController", Some(rack_id)) => Some(catalogue::water_loop_controller(room_id, rack_id)),
        ("AirflowManager", Some(rack_id)) => Some(catalogue::airflow_manager(room_id, rack_id)),
        ("CoolingSystemHub", Some(rack_id)) => Some(catalogue::cooling_system_hub(room_id, rack_id)),
        ("EnergyMeteringUnit", None) => Some(catalogue::energy_metering_unit(room_id)),
        ("EnvironmentMonitor", None) => Some(catalogue::environment_monitor(room_id)),
        (known, None) if matches!(known, "RackCoolingUnit" | "WaterLoopController" | "AirflowManager" | "CoolingSystemHub") => {
            warn!(device_type, room_id, "rack-scoped device type configured without a rack, skipping");
            None
        }
        (known, Some(_)) if matches!(known, "EnergyMeteringUnit" | "EnvironmentMonitor") => {
            warn!(device_type, room_id, "room-scoped device type configured under a rack, skipping");
            None
        }
        _ => {
            warn!(device_type, room_id, "unknown device type in rooms config, skipping");
            None
        }
    }
}

// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! A named device grouping a small set of [`Resource`]s and binding them
//! to pub/sub topics and the gateway's control protocol.

use crate::resource::Resource;
use std::collections::BTreeMap;

pub struct SmartObject {
    pub object_id: String,
    pub room_id: String,
    pub rack_id: Option<String>,
    /// Whether this object exposes a coap-controllable resource tree
    /// (gateway `.well-known/core` discovery). `None` for sensor-only
    /// objects such as `EnvironmentMonitor`/`EnergyMeteringUnit`.
    pub controllable_path: Option<String>,
    resources: BTreeMap<String, Resource>,
}

impl SmartObject {
    pub fn new(object_id: impl Into<String>, room_id: impl Into<String>, rack_id: Option<String>) -> Self {
        Self {
            object_id: object_id.into(),
            room_id: room_id.into(),
            rack_id,
            controllable_path: None,
            resources: BTreeMap::new(),
        }
    }

    pub fn with_controllable_path(mut self, path: impl Into<String>) -> Self {
        self.controllable_path = Some(path.into());
        self
    }

    pub fn add_resource(&mut self, resource: Resource) {
        self.resources.insert(resource.resource_id.clone(), resource);
    }

    pub fn get_resource(&self, resource_id: &str) -> Option<&Resource> {
        self.resources.get(resource_id)
    }

    pub fn resources(&self) -> impl Iterator<Item = &Resource> {
        self.resources.values()
    }

    pub fn telemetry_topic(&self, resource_id: &str) -> String {
        telemetry_topic(&self.room_id, self.rack_id.as_deref(), &self.object_id, resource_id)
    }

    pub fn control_topic(&self, resource_id: &str) -> String {
        control_topic(&self.room_id, self.rack_id.as_deref(), &self.object_id, resource_id)
    }

    /// `hvac/room/{room}/[rack/{rack}/]device/{object}/{resource}/control`
    /// — the gateway resource path a controllable smart object exposes.
    pub fn gateway_control_path(&self, resource_id: &str) -> String {
        match &self.rack_id {
            Some(rack) => format!(
                "hvac/room/{}/rack/{}/device/{}/{}/control",
                self.room_id, rack, self.object_id, resource_id
            ),
            None => format!(
                "hvac/room/{}/device/{}/{}/control",
                self.room_id, self.object_id, resource_id
            ),
        }
    }
}

pub fn telemetry_topic(room_id: &str, rack_id: Option<&str>, object_id: &str, resource_id: &str) -> String {
    build_topic(room_id, rack_id, object_id, "telemetry", resource_id)
}

pub fn control_topic(room_id: &str, rack_id: Option<&str>, object_id: &str, resource_id: &str) -> String {
    build_topic(room_id, rack_id, object_id, "control", resource_id)
}

fn build_topic(room_id: &str, rack_id: Option<&str>, object_id: &str, kind: &str, resource_id: &str) -> String {
    match rack_id {
        Some(rack) => format!(
            "hvac/room/{room_id}/rack/{rack}/device/{object_id}/{kind}/{resource_id}"
        ),
        None => format!("hvac/room/{room_id}/device/{object_id}/{kind}/{resource_id}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn telemetry_topic_rack_scoped() {
        assert_eq!(
            telemetry_topic("room_A1", Some("rack_A1"), "rack_cooling_unit", "rack_cooling_unit_temp"),
            "hvac/room/room_A1/rack/rack_A1/device/rack_cooling_unit/telemetry/rack_cooling_unit_temp"
        );
    }

    #[test]
    fn control_topic_room_scoped() {
        assert_eq!(
            control_topic("room_A1", None, "monitor", "humidity"),
            "hvac/room/room_A1/device/monitor/control/humidity"
        );
    }
}

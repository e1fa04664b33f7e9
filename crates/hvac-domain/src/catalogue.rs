// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Constructors for the device `type` values named in `rooms_config.json`.
//!
//! Resource composition per type is not specified by the distilled spec;
//! it is carried over unchanged from the original system's
//! `smart_objects/devices/*.py` classes.

use crate::resource::{ActuatorKind, Resource, SensorState};
use crate::smart_object::SmartObject;

const TEMP_MIN: f64 = 25.0;
const TEMP_MAX: f64 = 45.0;
const PRESSURE_MIN: f64 = 1.0;
const PRESSURE_MAX: f64 = 10.0;
const AIR_SPEED_MIN: f64 = 0.0;
const AIR_SPEED_MAX: f64 = 20.0;
const ENERGY_MIN: f64 = 0.0;
const ENERGY_MAX: f64 = 5000.0;
const HUMIDITY_MIN: f64 = 20.0;
const HUMIDITY_MAX: f64 = 80.0;
const DEFAULT_PERIOD_S: u64 = 60;
const DEFAULT_PRECISION: u32 = 2;

fn sensor(id: &str, type_tag: &str, unit: &str, min: f64, max: f64) -> Resource {
    Resource::sensor(id, type_tag, SensorState::new(unit, min, max, DEFAULT_PERIOD_S, DEFAULT_PRECISION))
}

/// `RackCoolingUnit`: a rack-scoped temperature sensor driving a fan.
pub fn rack_cooling_unit(object_id: &str, room_id: &str, rack_id: &str) -> SmartObject {
    let mut obj = SmartObject::new(object_id, room_id, Some(rack_id.to_string()))
        .with_controllable_path(format!("{object_id}/fan"));
    obj.add_resource(sensor(
        &format!("{object_id}_temp"),
        "iot:sensor:temperature",
        "Celsius",
        TEMP_MIN,
        TEMP_MAX,
    ));
    obj.add_resource(Resource::actuator(format!("{object_id}_fan"), ActuatorKind::Fan));
    obj
}

/// `WaterLoopController`: rack-scoped pressure sensor driving a pump.
pub fn water_loop_controller(room_id: &str, rack_id: &str) -> SmartObject {
    const OBJECT_ID: &str = "water_loop_controller";
    let mut obj = SmartObject::new(OBJECT_ID, room_id, Some(rack_id.to_string()))
        .with_controllable_path(format!("{OBJECT_ID}/pump"));
    obj.add_resource(sensor(
        &format!("{OBJECT_ID}_pressure"),
        "iot:sensor:pressure",
        "bar",
        PRESSURE_MIN,
        PRESSURE_MAX,
    ));
    obj.add_resource(Resource::actuator(format!("{OBJECT_ID}_pump"), ActuatorKind::Pump));
    obj
}

/// `AirflowManager`: rack-scoped air-speed sensor driving a cooling-level actuator.
pub fn airflow_manager(room_id: &str, rack_id: &str) -> SmartObject {
    const OBJECT_ID: &str = "airflow_manager";
    let mut obj = SmartObject::new(OBJECT_ID, room_id, Some(rack_id.to_string()))
        .with_controllable_path(format!("{OBJECT_ID}/cooling_levels"));
    obj.add_resource(sensor(
        &format!("{OBJECT_ID}_air_speed"),
        "iot:sensor:air_speed",
        "m/s",
        AIR_SPEED_MIN,
        AIR_SPEED_MAX,
    ));
    obj.add_resource(Resource::actuator(
        format!("{OBJECT_ID}_cooling_levels"),
        ActuatorKind::CoolingLevel,
    ));
    obj
}

/// `CoolingSystemHub`: rack-scoped cooling-level actuator, no sensor of its own.
pub fn cooling_system_hub(room_id: &str, rack_id: &str) -> SmartObject {
    const OBJECT_ID: &str = "cooling_system_hub";
    let mut obj = SmartObject::new(OBJECT_ID, room_id, Some(rack_id.to_string()))
        .with_controllable_path(format!("{OBJECT_ID}/cooling_levels"));
    obj.add_resource(Resource::actuator(
        format!("{OBJECT_ID}_cooling_levels"),
        ActuatorKind::CoolingLevel,
    ));
    obj
}

/// `EnergyMeteringUnit`: room-scoped, sensor-only, no actuator.
pub fn energy_metering_unit(room_id: &str) -> SmartObject {
    const OBJECT_ID: &str = "energy_metering_unit";
    let mut obj = SmartObject::new(OBJECT_ID, room_id, None);
    obj.add_resource(sensor(
        &format!("{OBJECT_ID}_energy"),
        "iot:sensor:energy",
        "kWh",
        ENERGY_MIN,
        ENERGY_MAX,
    ));
    obj
}

/// `EnvironmentMonitor`: room-scoped, sensor-only (temperature + humidity).
pub fn environment_monitor(room_id: &str) -> SmartObject {
    const OBJECT_ID: &str = "environment_monitor";
    let mut obj = SmartObject::new(OBJECT_ID, room_id, None);
    obj.add_resource(sensor(
        &format!("{OBJECT_ID}_temp"),
        "iot:sensor:temperature",
        "Celsius",
        TEMP_MIN,
        TEMP_MAX,
    ));
    obj.add_resource(sensor(
        &format!("{OBJECT_ID}_humidity"),
        "iot:sensor:humidity",
        "%",
        HUMIDITY_MIN,
        HUMIDITY_MAX,
    ));
    obj
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rack_cooling_unit_has_temp_and_fan() {
        let obj = rack_cooling_unit("rack_cooling_unit", "room_A1", "rack_A1");
        assert!(obj.get_resource("rack_cooling_unit_temp").unwrap().is_sensor());
        assert!(obj.get_resource("rack_cooling_unit_fan").unwrap().is_actuator());
    }

    #[test]
    fn environment_monitor_is_sensor_only() {
        let obj = environment_monitor("room_A1");
        assert!(obj.controllable_path.is_none());
        assert_eq!(obj.resources().count(), 2);
    }
}

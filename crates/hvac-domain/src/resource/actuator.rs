// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Actuator state and the `apply_command` state machine.
//!
//! Grounded in the original system's `FanActuator`/`PumpActuator`/
//! `CoolingLevelActuator`/`SwitchActuator` classes, unified here into one
//! kind-tagged state machine instead of a class per actuator.

use crate::error::ActuatorError;
use serde_json::{Map, Value};

pub type Command = Map<String, Value>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    On,
    Off,
}

impl Status {
    fn parse(s: &str) -> Option<Self> {
        match s.to_uppercase().as_str() {
            "ON" => Some(Status::On),
            "OFF" => Some(Status::Off),
            _ => None,
        }
    }
}

/// Which kind of actuator this is; gates the command vocabulary and the
/// valid magnitude range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActuatorKind {
    Fan,
    Pump,
    CoolingLevel,
    Switch,
}

impl ActuatorKind {
    pub fn type_tag(self) -> &'static str {
        match self {
            ActuatorKind::Fan => "iot:actuator:fan",
            ActuatorKind::Pump => "iot:actuator:pump",
            ActuatorKind::CoolingLevel => "iot:actuator:cooling_level",
            ActuatorKind::Switch => "iot:actuator:switch",
        }
    }

    fn magnitude_field(self) -> Option<&'static str> {
        match self {
            ActuatorKind::Fan | ActuatorKind::Pump => Some("speed"),
            ActuatorKind::CoolingLevel => Some("level"),
            ActuatorKind::Switch => None,
        }
    }

    fn magnitude_range(self) -> (i64, i64) {
        match self {
            ActuatorKind::Fan | ActuatorKind::Pump => (0, 100),
            ActuatorKind::CoolingLevel => (0, 5),
            ActuatorKind::Switch => (0, 0),
        }
    }

    fn has_target(self) -> bool {
        matches!(self, ActuatorKind::Fan | ActuatorKind::Pump)
    }

    fn allowed_keys(self) -> &'static [&'static str] {
        match self {
            ActuatorKind::Fan | ActuatorKind::Pump => &["status", "speed", "target_speed"],
            ActuatorKind::CoolingLevel => &["status", "level"],
            ActuatorKind::Switch => &["status"],
        }
    }
}

#[derive(Debug, Clone)]
pub struct ActuatorState {
    pub kind: ActuatorKind,
    pub is_operational: bool,
    pub status: Status,
    pub magnitude: i64,
    pub target_magnitude: i64,
    pub last_updated_ms: i64,
}

impl ActuatorState {
    pub fn new(kind: ActuatorKind) -> Self {
        Self {
            kind,
            is_operational: false,
            status: Status::Off,
            magnitude: 0,
            target_magnitude: 0,
            last_updated_ms: 0,
        }
    }

    /// Apply a validated command, mutating state in place.
    ///
    /// Ordering, exactly as in the original actuators: (1) operational
    /// check, (2) vocabulary check, (3) status transition (zeroing
    /// magnitude fields on a transition to OFF), (4) magnitude change —
    /// rejected outright if the post-transition status is OFF and the
    /// caller did not also set `status` in this same call.
    pub fn apply_command(
        &mut self,
        command: &Command,
        now_ms: i64,
    ) -> Result<bool, ActuatorError> {
        if !self.is_operational {
            return Err(ActuatorError::NotOperational(
                self.kind.type_tag().to_string(),
            ));
        }

        for key in command.keys() {
            if !self.kind.allowed_keys().contains(&key.as_str()) {
                return Err(ActuatorError::InvalidCommand(key.clone()));
            }
        }

        let old_status = self.status;
        let mut status_changed = false;
        if let Some(raw) = command.get("status") {
            let s = raw
                .as_str()
                .ok_or_else(|| ActuatorError::InvalidStatus(raw.to_string()))?;
            let parsed = Status::parse(s).ok_or_else(|| ActuatorError::InvalidStatus(s.to_string()))?;
            self.status = parsed;
            status_changed = parsed != old_status;
        }

        if status_changed && self.status == Status::Off {
            self.on_turned_off();
        }

        if let Some(field) = self.kind.magnitude_field() {
            if let Some(raw) = command.get(field) {
                let (lo, hi) = self.kind.magnitude_range();
                let value = raw
                    .as_i64()
                    .ok_or(ActuatorError::InvalidRange { field, value: i64::MIN, lo, hi })?;
                if value < lo || value > hi {
                    return Err(ActuatorError::InvalidRange { field, value, lo, hi });
                }

                if self.status == Status::Off {
                    if !command.contains_key("status") {
                        return Err(ActuatorError::MagnitudeWhileOff(field));
                    }
                    // status:OFF wins the tie-break; magnitude stays zeroed.
                } else {
                    self.magnitude = value;
                    if self.kind.has_target() {
                        self.target_magnitude = value;
                    }
                }
            }
        }

        self.last_updated_ms = now_ms;
        Ok(status_changed)
    }

    fn on_turned_off(&mut self) {
        self.magnitude = 0;
        self.target_magnitude = 0;
    }

    /// Force `(OFF, zeroed)`. Idempotent: a second call is a no-op that
    /// reports no transition.
    pub fn reset(&mut self, now_ms: i64) -> bool {
        let old_status = self.status;
        self.status = Status::Off;
        self.on_turned_off();
        self.last_updated_ms = now_ms;
        old_status != Status::Off
    }

    pub fn set_operational(&mut self, operational: bool) {
        self.is_operational = operational;
    }

    /// Full public view used by the admin surface and telemetry listeners.
    pub fn snapshot(&self) -> Value {
        let mut obj = Map::new();
        obj.insert(
            "status".into(),
            Value::String(if self.status == Status::On { "ON" } else { "OFF" }.into()),
        );
        obj.insert("is_operational".into(), Value::Bool(self.is_operational));
        obj.insert("last_updated_ms".into(), Value::from(self.last_updated_ms));
        if let Some(field) = self.kind.magnitude_field() {
            obj.insert(field.into(), Value::from(self.magnitude));
            if self.kind.has_target() {
                obj.insert("target_speed".into(), Value::from(self.target_magnitude));
            }
        }
        Value::Object(obj)
    }
}

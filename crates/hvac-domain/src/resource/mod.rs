// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! A `Resource` is a sensor or an actuator owned by a [`SmartObject`].
//!
//! Redesigned from the original's `Sensor`/`Actuator` class hierarchy
//! into a single sum type (`ResourceBody`) per the kind-tag approach
//! this workspace uses elsewhere for protocol/QoS variants.

pub mod actuator;
pub mod sensor;

pub use actuator::{ActuatorKind, ActuatorState, Command, Status};
pub use sensor::SensorState;

use crate::listener::{ResourceEvent, SharedListener};
use parking_lot::Mutex;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataType {
    Scalar,
    Structured,
}

pub enum ResourceBody {
    Sensor(Mutex<SensorState>),
    Actuator(Mutex<ActuatorState>),
}

pub struct Resource {
    pub resource_id: String,
    pub type_tag: String,
    pub data_type: DataType,
    pub body: ResourceBody,
    listeners: Mutex<Vec<SharedListener>>,
}

impl Resource {
    pub fn sensor(resource_id: impl Into<String>, type_tag: impl Into<String>, state: SensorState) -> Self {
        Self {
            resource_id: resource_id.into(),
            type_tag: type_tag.into(),
            data_type: DataType::Scalar,
            body: ResourceBody::Sensor(Mutex::new(state)),
            listeners: Mutex::new(Vec::new()),
        }
    }

    pub fn actuator(resource_id: impl Into<String>, kind: ActuatorKind) -> Self {
        Self {
            resource_id: resource_id.into(),
            type_tag: kind.type_tag().into(),
            data_type: DataType::Structured,
            body: ResourceBody::Actuator(Mutex::new(ActuatorState::new(kind))),
            listeners: Mutex::new(Vec::new()),
        }
    }

    pub fn is_actuator(&self) -> bool {
        matches!(self.body, ResourceBody::Actuator(_))
    }

    pub fn is_sensor(&self) -> bool {
        matches!(self.body, ResourceBody::Sensor(_))
    }

    /// Register a listener. Listeners are never individually removed —
    /// they live for the resource's lifetime, matching the original's
    /// "ordered set of subscriber callbacks."
    pub fn add_listener(&self, listener: SharedListener) {
        self.listeners.lock().push(listener);
    }

    /// Notify every listener, in registration order, with the given
    /// event. Called by `hvac-runtime` after a sensor tick or an
    /// actuator command.
    pub fn notify(&self, event: ResourceEvent) {
        for listener in self.listeners.lock().iter() {
            listener.on_data_changed(&self.resource_id, &self.type_tag, &event);
        }
    }

    pub fn as_sensor(&self) -> Option<&Mutex<SensorState>> {
        match &self.body {
            ResourceBody::Sensor(m) => Some(m),
            ResourceBody::Actuator(_) => None,
        }
    }

    pub fn as_actuator(&self) -> Option<&Mutex<ActuatorState>> {
        match &self.body {
            ResourceBody::Actuator(m) => Some(m),
            ResourceBody::Sensor(_) => None,
        }
    }
}

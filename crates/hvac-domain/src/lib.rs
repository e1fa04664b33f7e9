// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Data model for the HVAC edge agent: resources (sensors/actuators),
//! smart objects, topology (rooms/racks), policies and the message
//! envelopes published to the pub/sub bus.

pub mod catalogue;
pub mod error;
pub mod listener;
pub mod message;
pub mod policy;
pub mod resource;
pub mod smart_object;
pub mod topology;

pub use error::ActuatorError;
pub use listener::{ResourceEvent, ResourceListener, SharedListener};
pub use message::{ControlMessage, Envelope, Metadata, TelemetryMessage};
pub use policy::{Condition, Operator, Policy, PolicyDocument, RoomAction, SmartObjectAction};
pub use resource::{ActuatorKind, ActuatorState, Command, Resource, SensorState, Status};
pub use smart_object::SmartObject;
pub use topology::{Rack, RackStatus, Room};

// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Shape of an `add_policy`/`update_policy` request body. Distinct from
//! [`hvac_domain::Policy`] because `id` is optional here — the engine
//! auto-assigns it when the caller omits it.

use hvac_domain::{Condition, Policy, RoomAction, SmartObjectAction};
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PolicyInput {
    Room {
        id: Option<String>,
        room_id: String,
        object_id: String,
        resource_id: String,
        sensor_type: String,
        condition: Condition,
        action: RoomAction,
    },
    SmartObject {
        id: Option<String>,
        room_id: String,
        rack_id: String,
        object_id: String,
        resource_id: String,
        sensor_type: String,
        condition: Condition,
        action: SmartObjectAction,
    },
}

impl PolicyInput {
    pub fn room_id(&self) -> &str {
        match self {
            PolicyInput::Room { room_id, .. } => room_id,
            PolicyInput::SmartObject { room_id, .. } => room_id,
        }
    }

    pub fn id(&self) -> Option<&str> {
        match self {
            PolicyInput::Room { id, .. } => id.as_deref(),
            PolicyInput::SmartObject { id, .. } => id.as_deref(),
        }
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            PolicyInput::Room { .. } => "room",
            PolicyInput::SmartObject { .. } => "smart_object",
        }
    }

    pub fn into_policy(self, id: String) -> Policy {
        match self {
            PolicyInput::Room {
                room_id,
                object_id,
                resource_id,
                sensor_type,
                condition,
                action,
                ..
            } => Policy::Room {
                id,
                room_id,
                object_id,
                resource_id,
                sensor_type,
                condition,
                action,
            },
            PolicyInput::SmartObject {
                room_id,
                rack_id,
                object_id,
                resource_id,
                sensor_type,
                condition,
                action,
                ..
            } => Policy::SmartObject {
                id,
                room_id,
                rack_id,
                object_id,
                resource_id,
                sensor_type,
                condition,
                action,
            },
        }
    }
}

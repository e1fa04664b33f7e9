// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Policy data model. Evaluation and mutation live in `hvac-policy`; this
//! crate only defines the shape, shared with the admin HTTP surface.

use crate::resource::Command;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Operator {
    #[serde(rename = ">")]
    Gt,
    #[serde(rename = "<")]
    Lt,
    #[serde(rename = "==")]
    Eq,
    #[serde(rename = ">=")]
    Ge,
    #[serde(rename = "<=")]
    Le,
    #[serde(rename = "!=")]
    Ne,
}

impl Operator {
    pub fn apply(self, lhs: f64, rhs: f64) -> bool {
        match self {
            Operator::Gt => lhs > rhs,
            Operator::Lt => lhs < rhs,
            Operator::Eq => lhs == rhs,
            Operator::Ge => lhs >= rhs,
            Operator::Le => lhs <= rhs,
            Operator::Ne => lhs != rhs,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Condition {
    pub operator: Operator,
    pub value: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RoomAction {
    pub object_id: String,
    pub command: Command,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SmartObjectAction {
    pub command: Command,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Policy {
    Room {
        id: String,
        room_id: String,
        object_id: String,
        resource_id: String,
        sensor_type: String,
        condition: Condition,
        action: RoomAction,
    },
    SmartObject {
        id: String,
        room_id: String,
        rack_id: String,
        object_id: String,
        resource_id: String,
        sensor_type: String,
        condition: Condition,
        action: SmartObjectAction,
    },
}

impl Policy {
    pub fn id(&self) -> &str {
        match self {
            Policy::Room { id, .. } => id,
            Policy::SmartObject { id, .. } => id,
        }
    }

    pub fn room_id(&self) -> &str {
        match self {
            Policy::Room { room_id, .. } => room_id,
            Policy::SmartObject { room_id, .. } => room_id,
        }
    }

    pub fn condition(&self) -> &Condition {
        match self {
            Policy::Room { condition, .. } => condition,
            Policy::SmartObject { condition, .. } => condition,
        }
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            Policy::Room { .. } => "room",
            Policy::SmartObject { .. } => "smart_object",
        }
    }
}

/// The per-room document persisted at `policy.json`: `{rooms: {room_id: [Policy]}}`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PolicyDocument {
    pub rooms: std::collections::BTreeMap<String, Vec<Policy>>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn room_policy_round_trips() {
        let p = Policy::Room {
            id: "room_room_A1_0".into(),
            room_id: "room_A1".into(),
            object_id: "rack_cooling_unit".into(),
            resource_id: "rack_cooling_unit_temp".into(),
            sensor_type: "iot:sensor:temperature".into(),
            condition: Condition { operator: Operator::Gt, value: 35.0 },
            action: RoomAction {
                object_id: "rack_cooling_unit".into(),
                command: serde_json::from_value(json!({"status": "ON", "speed": 80})).unwrap(),
            },
        };
        let s = serde_json::to_string(&p).unwrap();
        assert!(s.contains(r#""type":"room""#));
        let back: Policy = serde_json::from_str(&s).unwrap();
        assert_eq!(p, back);
    }

    #[test]
    fn operator_set_accepts_only_documented_symbols() {
        assert!(serde_json::from_str::<Operator>(r#"">""#).is_ok());
        assert!(serde_json::from_str::<Operator>(r#""!=""#).is_ok());
        assert!(serde_json::from_str::<Operator>(r#""~=""#).is_err());
    }

    #[test]
    fn document_preserves_other_rooms_shape() {
        let mut doc = PolicyDocument::default();
        doc.rooms.insert("room_B".into(), vec![]);
        let json = serde_json::to_string(&doc).unwrap();
        let back: PolicyDocument = serde_json::from_str(&json).unwrap();
        assert!(back.rooms.contains_key("room_B"));
    }
}

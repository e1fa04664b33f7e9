// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Read/modify/write access to the `policy.json` document, the same
//! pattern the administrative config loader uses for its own JSON files:
//! read the whole document, touch only the caller's key, write it back.

use crate::error::PolicyError;
use hvac_domain::PolicyDocument;
use std::path::Path;

pub fn load_document(path: &Path) -> Result<PolicyDocument, PolicyError> {
    if !path.exists() {
        return Ok(PolicyDocument::default());
    }
    let content = std::fs::read_to_string(path).map_err(|source| PolicyError::Load {
        path: path.display().to_string(),
        source,
    })?;
    Ok(serde_json::from_str(&content)?)
}

pub fn save_document(path: &Path, document: &PolicyDocument) -> Result<(), PolicyError> {
    let content = serde_json::to_string_pretty(document)?;
    std::fs::write(path, content).map_err(|source| PolicyError::Save {
        path: path.display().to_string(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use hvac_domain::{Condition, Operator, Policy, RoomAction};
    use serde_json::json;

    #[test]
    fn missing_file_yields_empty_document() {
        let doc = load_document(Path::new("/nonexistent/policy.json")).unwrap();
        assert!(doc.rooms.is_empty());
    }

    #[test]
    fn round_trips_through_a_scratch_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("policy.json");

        let mut doc = PolicyDocument::default();
        doc.rooms.insert(
            "room_A1".into(),
            vec![Policy::Room {
                id: "room_room_A1_0".into(),
                room_id: "room_A1".into(),
                object_id: "rack_cooling_unit".into(),
                resource_id: "rack_cooling_unit_temp".into(),
                sensor_type: "iot:sensor:temperature".into(),
                condition: Condition { operator: Operator::Gt, value: 35.0 },
                action: RoomAction {
                    object_id: "rack_cooling_unit".into(),
                    command: serde_json::from_value(json!({"status": "ON"})).unwrap(),
                },
            }],
        );

        save_document(&path, &doc).unwrap();
        let back = load_document(&path).unwrap();
        assert_eq!(back.rooms.get("room_A1").unwrap().len(), 1);
    }
}

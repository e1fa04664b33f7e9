// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! The policy engine for a single room: loads its rules from the shared
//! `policy.json` document, evaluates inbound telemetry against them, and
//! dispatches matched actions through the gateway without blocking the
//! evaluating thread.

use crate::document::{load_document, save_document};
use crate::error::PolicyError;
use crate::forward::{ForwardClient, ForwardRequest};
use crate::input::PolicyInput;
use hvac_domain::{Policy, TelemetryMessage};
use parking_lot::RwLock;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::warn;

pub struct PolicyEngine {
    room_id: String,
    doc_path: PathBuf,
    policies: RwLock<Vec<Policy>>,
    forward_client: Arc<dyn ForwardClient>,
}

impl PolicyEngine {
    pub fn load(
        room_id: impl Into<String>,
        doc_path: PathBuf,
        forward_client: Arc<dyn ForwardClient>,
    ) -> Result<Self, PolicyError> {
        let room_id = room_id.into();
        let document = load_document(&doc_path)?;
        let policies = document.rooms.get(&room_id).cloned().unwrap_or_default();
        Ok(Self {
            room_id,
            doc_path,
            policies: RwLock::new(policies),
            forward_client,
        })
    }

    pub fn room_id(&self) -> &str {
        &self.room_id
    }

    pub fn policies(&self) -> Vec<Policy> {
        self.policies.read().clone()
    }

    /// Evaluate one telemetry sample against every loaded policy. Each
    /// policy is isolated: a match error or dispatch failure is logged
    /// and does not prevent its neighbours from evaluating.
    pub fn evaluate(&self, telemetry: &TelemetryMessage) {
        let snapshot = self.policies.read().clone();
        for policy in snapshot.iter() {
            if !selector_matches(policy, telemetry) {
                continue;
            }
            let condition = policy.condition();
            if condition.operator.apply(telemetry.data_value, condition.value) {
                self.dispatch(policy.clone());
            }
        }
    }

    fn dispatch(&self, policy: Policy) {
        let request = match &policy {
            Policy::Room { action, .. } => ForwardRequest {
                object_id: action.object_id.clone(),
                room_id: self.room_id.clone(),
                rack_id: None,
                command: serde_json::Value::Object(action.command.clone()),
            },
            Policy::SmartObject { rack_id, object_id, action, .. } => ForwardRequest {
                object_id: object_id.clone(),
                room_id: self.room_id.clone(),
                rack_id: Some(rack_id.clone()),
                command: serde_json::Value::Object(action.command.clone()),
            },
        };
        let client = self.forward_client.clone();
        let policy_id = policy.id().to_string();
        tokio::spawn(async move {
            if let Err(e) = client.forward(request).await {
                warn!(policy_id, error = %e, "policy dispatch failed");
            }
        });
    }

    pub fn add_policy(&self, raw: serde_json::Value) -> Result<Policy, PolicyError> {
        let input: PolicyInput = serde_json::from_value(raw)?;
        if input.room_id() != self.room_id {
            return Err(PolicyError::Validation(format!(
                "policy room_id must be '{}', got '{}'",
                self.room_id,
                input.room_id()
            )));
        }

        let mut policies = self.policies.write();
        let id = input
            .id()
            .map(str::to_string)
            .unwrap_or_else(|| format!("{}_{}_{}", input.type_name(), self.room_id, policies.len()));
        let policy = input.into_policy(id);
        policies.push(policy.clone());
        self.persist(&policies)?;
        Ok(policy)
    }

    pub fn update_policy(&self, id: &str, raw: serde_json::Value) -> Result<Policy, PolicyError> {
        let input: PolicyInput = serde_json::from_value(raw)?;
        if input.room_id() != self.room_id {
            return Err(PolicyError::Validation(format!(
                "policy room_id must be '{}', got '{}'",
                self.room_id,
                input.room_id()
            )));
        }

        let mut policies = self.policies.write();
        let index = policies
            .iter()
            .position(|p| p.id() == id)
            .ok_or_else(|| PolicyError::NotFound(id.to_string()))?;
        let policy = input.into_policy(id.to_string());
        policies[index] = policy.clone();
        self.persist(&policies)?;
        Ok(policy)
    }

    pub fn delete_policy(&self, id: &str) -> Result<(), PolicyError> {
        let mut policies = self.policies.write();
        let before = policies.len();
        policies.retain(|p| p.id() != id);
        if policies.len() == before {
            return Err(PolicyError::NotFound(id.to_string()));
        }
        self.persist(&policies)
    }

    /// Merge this room's current policies into the full document without
    /// disturbing any other room's entry (S6: preserves sibling rooms).
    fn persist(&self, policies: &[Policy]) -> Result<(), PolicyError> {
        let mut document = load_document(&self.doc_path)?;
        document.rooms.insert(self.room_id.clone(), policies.to_vec());
        save_document(&self.doc_path, &document)
    }
}

fn selector_matches(policy: &Policy, telemetry: &TelemetryMessage) -> bool {
    if telemetry.metadata.room_id != policy.room_id() {
        return false;
    }
    match policy {
        Policy::Room { object_id, resource_id, sensor_type, .. } => {
            telemetry.metadata.rack_id.is_none()
                && &telemetry.metadata.object_id == object_id
                && &telemetry.metadata.resource_id == resource_id
                && &telemetry.type_tag == sensor_type
        }
        Policy::SmartObject { rack_id, object_id, resource_id, sensor_type, .. } => {
            telemetry.metadata.rack_id.as_deref() == Some(rack_id.as_str())
                && &telemetry.metadata.object_id == object_id
                && &telemetry.metadata.resource_id == resource_id
                && &telemetry.type_tag == sensor_type
        }
    }
}

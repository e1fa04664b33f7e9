// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! The forward resource: translates `(object_id, room_id, rack_id?,
//! command)` into a destination URI via the [`DeviceRegistry`] and
//! issues the upstream request, propagating its response verbatim.

use crate::registry::DeviceRegistry;
use async_trait::async_trait;
use hvac_policy::{ForwardClient, ForwardRequest};
use serde_json::Value;
use std::sync::Arc;
use thiserror::Error;
use tracing::warn;

#[derive(Debug, Error)]
pub enum ForwardError {
    #[error("bad request: {0}")]
    BadRequest(String),
    #[error("no registered device matches the request")]
    ResourceNotFound,
    #[error("upstream returned {status}: {body}")]
    UpstreamFailure { status: u16, body: Value },
    #[error("forward failed: {0}")]
    Internal(String),
}

impl ForwardError {
    /// The CoAP/HTTP response class this error maps onto, per the
    /// taxonomy in the error handling design (4.00/4.04/5.00-class).
    pub fn status_code(&self) -> u16 {
        match self {
            ForwardError::BadRequest(_) => 400,
            ForwardError::ResourceNotFound => 404,
            ForwardError::UpstreamFailure { status, .. } => *status,
            ForwardError::Internal(_) => 500,
        }
    }

    pub fn payload(&self) -> Value {
        match self {
            ForwardError::UpstreamFailure { body, .. } => body.clone(),
            other => serde_json::json!({ "error": other.to_string() }),
        }
    }
}

/// The result of a successful forward: the upstream's own status and
/// body, propagated verbatim.
pub struct ForwardResponse {
    pub status: u16,
    pub body: Value,
}

/// The client used to actually issue the upstream request once a URI
/// has been resolved. Abstracted so the forward core is testable
/// without a live device.
#[async_trait]
pub trait UpstreamClient: Send + Sync {
    async fn post(&self, uri: &str, command: &Value) -> Result<ForwardResponse, ForwardError>;
}

pub struct ReqwestUpstreamClient {
    client: reqwest::Client,
}

impl ReqwestUpstreamClient {
    pub fn new() -> Self {
        Self { client: reqwest::Client::new() }
    }
}

impl Default for ReqwestUpstreamClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl UpstreamClient for ReqwestUpstreamClient {
    async fn post(&self, uri: &str, command: &Value) -> Result<ForwardResponse, ForwardError> {
        let response = self
            .client
            .post(uri)
            .json(command)
            .send()
            .await
            .map_err(|e| ForwardError::Internal(e.to_string()))?;
        let status = response.status().as_u16();
        let body: Value = response.json().await.unwrap_or(Value::Null);
        Ok(ForwardResponse { status, body })
    }
}

/// Validate, resolve, and forward one request. Missing `object_id`,
/// `room_id`, or `command` is caller error (4.00-class); a registry
/// miss is 4.04-class; everything downstream is the upstream's own
/// response propagated verbatim.
pub async fn forward(
    registry: &DeviceRegistry,
    upstream: &dyn UpstreamClient,
    request: &ForwardRequest,
) -> Result<ForwardResponse, ForwardError> {
    if request.object_id.is_empty() {
        return Err(ForwardError::BadRequest("object_id is required".into()));
    }
    if request.room_id.is_empty() {
        return Err(ForwardError::BadRequest("room_id is required".into()));
    }
    if request.command.is_null() {
        return Err(ForwardError::BadRequest("command is required".into()));
    }

    let uri = registry
        .find_uri(&request.object_id, &request.room_id, request.rack_id.as_deref())
        .ok_or(ForwardError::ResourceNotFound)?;

    upstream.post(&uri, &request.command).await
}

/// Wires the forward core into [`hvac_policy::ForwardClient`] so a
/// matched policy's dispatch lands here without `hvac-policy` knowing
/// anything about registries or upstream transports.
pub struct GatewayForwardClient {
    registry: Arc<DeviceRegistry>,
    upstream: Arc<dyn UpstreamClient>,
}

impl GatewayForwardClient {
    pub fn new(registry: Arc<DeviceRegistry>, upstream: Arc<dyn UpstreamClient>) -> Self {
        Self { registry, upstream }
    }
}

#[async_trait]
impl ForwardClient for GatewayForwardClient {
    async fn forward(&self, request: ForwardRequest) -> Result<(), String> {
        match forward(&self.registry, self.upstream.as_ref(), &request).await {
            Ok(response) if response.status < 300 => Ok(()),
            Ok(response) => {
                let msg = format!("upstream rejected command with status {}", response.status);
                warn!(object_id = %request.object_id, status = response.status, "forward rejected");
                Err(msg)
            }
            Err(e) => {
                warn!(object_id = %request.object_id, error = %e, "forward failed");
                Err(e.to_string())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::{RegistryAttributes, RegistryEntry};

    struct RecordingUpstream {
        response: std::sync::Mutex<Option<(u16, Value)>>,
    }

    #[async_trait]
    impl UpstreamClient for RecordingUpstream {
        async fn post(&self, _uri: &str, _command: &Value) -> Result<ForwardResponse, ForwardError> {
            let (status, body) = self.response.lock().unwrap().clone().unwrap();
            Ok(ForwardResponse { status, body })
        }
    }

    fn registry_with_entry() -> DeviceRegistry {
        let registry = DeviceRegistry::new();
        registry.record(
            "10.0.0.5",
            RegistryEntry {
                port: 5683,
                path: "hvac/room/room_A1/rack/rack_A1/device/rack_cooling_unit/temp/control".into(),
                attributes: RegistryAttributes {
                    rt: "hvac.control".into(),
                    interface: "core.a".into(),
                    ct: "application/json".into(),
                    title: "rack_cooling_unit".into(),
                    object_id: Some("rack_cooling_unit".into()),
                    room_id: Some("room_A1".into()),
                    rack_id: Some("rack_A1".into()),
                },
            },
        );
        registry
    }

    #[tokio::test]
    async fn missing_object_id_is_bad_request() {
        let registry = registry_with_entry();
        let upstream = RecordingUpstream { response: std::sync::Mutex::new(Some((200, Value::Null))) };
        let request = ForwardRequest {
            object_id: "".into(),
            room_id: "room_A1".into(),
            rack_id: None,
            command: serde_json::json!({"status": "ON"}),
        };
        let err = forward(&registry, &upstream, &request).await.unwrap_err();
        assert_eq!(err.status_code(), 400);
    }

    // S5: registry miss yields a 4.04-class error without an upstream call.
    #[tokio::test]
    async fn registry_miss_is_resource_not_found() {
        let registry = registry_with_entry();
        let upstream = RecordingUpstream { response: std::sync::Mutex::new(None) };
        let request = ForwardRequest {
            object_id: "ghost".into(),
            room_id: "room_A1".into(),
            rack_id: None,
            command: serde_json::json!({"status": "ON"}),
        };
        let err = forward(&registry, &upstream, &request).await.unwrap_err();
        assert_eq!(err.status_code(), 404);
    }

    #[tokio::test]
    async fn successful_lookup_propagates_upstream_response_verbatim() {
        let registry = registry_with_entry();
        let upstream = RecordingUpstream {
            response: std::sync::Mutex::new(Some((200, serde_json::json!({"status": "ON", "speed": 80})))),
        };
        let request = ForwardRequest {
            object_id: "rack_cooling_unit".into(),
            room_id: "room_A1".into(),
            rack_id: Some("rack_A1".into()),
            command: serde_json::json!({"status": "ON", "speed": 80}),
        };
        let response = forward(&registry, &upstream, &request).await.unwrap();
        assert_eq!(response.status, 200);
        assert_eq!(response.body["speed"], 80);
    }
}

// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Resource discovery against a device's well-known-core endpoint. The
//! actual wire protocol is abstracted behind [`DiscoveryTransport`] so
//! the discoverer itself stays testable without a live CoAP stack; a
//! real deployment supplies its own transport over the constrained
//! device protocol.

use crate::registry::{DeviceRegistry, RegistryAttributes, RegistryEntry};
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DiscoveryError {
    #[error("connection to {host}:{port} failed: {reason}")]
    ConnectionFailed { host: String, port: u16, reason: String },
    #[error("malformed link-format payload: {0}")]
    Malformed(String),
}

/// One link parsed from a `.well-known/core` response.
#[derive(Debug, Clone)]
pub struct LinkRecord {
    pub path: String,
    pub attributes: RegistryAttributes,
}

/// The transport a [`Discoverer`] queries. A real implementation issues
/// a CoAP GET to `coap://{host}:{port}/.well-known/core` and parses the
/// CoRE Link Format response; [`InMemoryTransport`] stands in for tests
/// and for hosts without a live endpoint.
#[async_trait]
pub trait DiscoveryTransport: Send + Sync {
    async fn well_known_core(&self, host: &str, port: u16) -> Result<Vec<LinkRecord>, DiscoveryError>;
}

/// A transport backed by a fixed, test-supplied link set per host.
/// Matches the well-known-core response a real device would return
/// without requiring a live network endpoint.
#[derive(Default)]
pub struct InMemoryTransport {
    hosts: dashmap::DashMap<(String, u16), Vec<LinkRecord>>,
}

impl InMemoryTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&self, host: impl Into<String>, port: u16, links: Vec<LinkRecord>) {
        self.hosts.insert((host.into(), port), links);
    }
}

#[async_trait]
impl DiscoveryTransport for InMemoryTransport {
    async fn well_known_core(&self, host: &str, port: u16) -> Result<Vec<LinkRecord>, DiscoveryError> {
        self.hosts
            .get(&(host.to_string(), port))
            .map(|entry| entry.value().clone())
            .ok_or_else(|| DiscoveryError::ConnectionFailed {
                host: host.to_string(),
                port,
                reason: "no well-known-core entry registered for host".into(),
            })
    }
}

pub struct Discoverer {
    registry: Arc<DeviceRegistry>,
    transport: Arc<dyn DiscoveryTransport>,
}

impl Discoverer {
    pub fn new(registry: Arc<DeviceRegistry>, transport: Arc<dyn DiscoveryTransport>) -> Self {
        Self { registry, transport }
    }

    /// Issues a well-known-core GET to `(host, port)` and records every
    /// returned link into the registry. Idempotent: repeated calls
    /// append repeated entries, which is tolerated by `find_uri`
    /// (first match wins, readers consume the latest snapshot).
    pub async fn discover(&self, host: &str, port: u16) -> Result<usize, DiscoveryError> {
        let links = self.transport.well_known_core(host, port).await?;
        let count = links.len();
        for link in links {
            self.registry.record(
                host,
                RegistryEntry { port, path: link.path, attributes: link.attributes },
            );
        }
        Ok(count)
    }

    pub async fn check_connectivity(&self, host: &str, port: u16) -> bool {
        self.transport.well_known_core(host, port).await.is_ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn link(path: &str, object_id: &str, room_id: &str, rack_id: Option<&str>) -> LinkRecord {
        LinkRecord {
            path: path.into(),
            attributes: RegistryAttributes {
                rt: "hvac.control".into(),
                interface: "core.a".into(),
                ct: "application/json".into(),
                title: object_id.into(),
                object_id: Some(object_id.into()),
                room_id: Some(room_id.into()),
                rack_id: rack_id.map(String::from),
            },
        }
    }

    #[tokio::test]
    async fn discover_populates_registry_and_find_uri_resolves() {
        let registry = Arc::new(DeviceRegistry::new());
        let transport = Arc::new(InMemoryTransport::new());
        transport.register(
            "10.0.0.5",
            5683,
            vec![link("hvac/room/room_A1/device/monitor/humidity/control", "monitor", "room_A1", None)],
        );
        let discoverer = Discoverer::new(registry.clone(), transport);

        let count = discoverer.discover("10.0.0.5", 5683).await.unwrap();
        assert_eq!(count, 1);
        assert!(registry.find_uri("monitor", "room_A1", None).is_some());
    }

    #[tokio::test]
    async fn check_connectivity_reflects_transport_reachability() {
        let registry = Arc::new(DeviceRegistry::new());
        let transport = Arc::new(InMemoryTransport::new());
        let discoverer = Discoverer::new(registry, transport.clone());

        assert!(!discoverer.check_connectivity("10.0.0.9", 5683).await);
        transport.register("10.0.0.9", 5683, vec![]);
        assert!(discoverer.check_connectivity("10.0.0.9", 5683).await);
    }
}

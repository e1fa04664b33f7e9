// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! The protocol gateway: a device registry populated by discovery, a
//! forward resource that routes logical commands to physical endpoints,
//! and the administrative HTTP surface that exposes the device tree and
//! policy rules.

pub mod discovery;
pub mod forward;
pub mod handlers;
pub mod registry;
pub mod routes;

pub use discovery::{DiscoveryError, DiscoveryTransport, Discoverer, InMemoryTransport, LinkRecord};
pub use forward::{ForwardError, ForwardResponse, GatewayForwardClient, ReqwestUpstreamClient, UpstreamClient};
pub use registry::{DeviceRegistry, RegistryAttributes, RegistryEntry, RegistryError};

use hvac_domain::Room;
use hvac_policy::PolicyEngine;
use parking_lot::RwLock;
use std::sync::Arc;

/// Shared state behind every administrative HTTP route.
pub struct AppState {
    pub rooms: RwLock<Vec<Room>>,
    pub registry: Arc<DeviceRegistry>,
    pub policy_engines: dashmap::DashMap<String, Arc<PolicyEngine>>,
    pub upstream: Arc<dyn UpstreamClient>,
}

impl AppState {
    pub fn new(rooms: Vec<Room>, registry: Arc<DeviceRegistry>, upstream: Arc<dyn UpstreamClient>) -> Arc<Self> {
        Arc::new(Self {
            rooms: RwLock::new(rooms),
            registry,
            policy_engines: dashmap::DashMap::new(),
            upstream,
        })
    }

    pub fn register_room_policies(&self, room_id: impl Into<String>, engine: Arc<PolicyEngine>) {
        self.policy_engines.insert(room_id.into(), engine);
    }
}

// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Device registry: maps a logical device identity (`object_id`,
//! `room_id`, `rack_id?`) discovered on a constrained-device endpoint to
//! a physical `(host, port, path)`, indexed by host the way
//! `hdds-discovery-server`'s `ParticipantRegistry` indexes by GUID
//! prefix.

use dashmap::DashMap;
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("failed to read registry file {path}: {source}")]
    Load { path: String, source: std::io::Error },
    #[error("failed to write registry file {path}: {source}")]
    Save { path: String, source: std::io::Error },
    #[error("malformed registry document: {0}")]
    Malformed(#[from] serde_json::Error),
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RegistryAttributes {
    pub rt: String,
    #[serde(rename = "if")]
    pub interface: String,
    pub ct: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub object_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub room_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rack_id: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RegistryEntry {
    pub port: u16,
    pub path: String,
    pub attributes: RegistryAttributes,
}

/// Persisted shape of `registry.json`: a mirror of the in-memory map.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct RegistryDocument {
    hosts: std::collections::BTreeMap<String, Vec<RegistryEntry>>,
}

/// In-memory map from host to discovered entries. Discovery is
/// idempotent by design (repeated entries are tolerated, not
/// deduplicated) — readers consume the most recent snapshot, matching
/// the original's append-only behaviour.
pub struct DeviceRegistry {
    hosts: DashMap<String, Vec<RegistryEntry>>,
}

impl DeviceRegistry {
    pub fn new() -> Self {
        Self { hosts: DashMap::new() }
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, RegistryError> {
        let path = path.as_ref();
        let contents = match std::fs::read_to_string(path) {
            Ok(c) => c,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Ok(Self::new());
            }
            Err(e) => {
                return Err(RegistryError::Load { path: path.display().to_string(), source: e });
            }
        };
        let document: RegistryDocument = serde_json::from_str(&contents)?;
        let hosts = DashMap::new();
        for (host, entries) in document.hosts {
            hosts.insert(host, entries);
        }
        Ok(Self { hosts })
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), RegistryError> {
        let path = path.as_ref();
        let hosts = self.hosts.iter().map(|e| (e.key().clone(), e.value().clone())).collect();
        let document = RegistryDocument { hosts };
        let json = serde_json::to_string_pretty(&document)?;
        std::fs::write(path, json).map_err(|e| RegistryError::Save { path: path.display().to_string(), source: e })
    }

    /// Append a discovered entry under `host`. Never deduplicated, per
    /// the idempotent-discovery contract.
    pub fn record(&self, host: impl Into<String>, entry: RegistryEntry) {
        self.hosts.entry(host.into()).or_default().push(entry);
    }

    /// `find_uri(object_id, room_id, rack_id)`: the first matching
    /// entry's `coap://{host}:{port}/{path}`, or `None`. `rack_id`
    /// absence on both sides matches.
    pub fn find_uri(&self, object_id: &str, room_id: &str, rack_id: Option<&str>) -> Option<String> {
        for host_entry in self.hosts.iter() {
            let host = host_entry.key();
            for entry in host_entry.value() {
                let attrs = &entry.attributes;
                if attrs.object_id.as_deref() == Some(object_id)
                    && attrs.room_id.as_deref() == Some(room_id)
                    && attrs.rack_id.as_deref() == rack_id
                {
                    return Some(format!("coap://{}:{}/{}", host, entry.port, entry.path));
                }
            }
        }
        None
    }

    pub fn host_count(&self) -> usize {
        self.hosts.len()
    }
}

impl Default for DeviceRegistry {
    fn default() -> Self {
        Self::new()
    }
}

// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! The configured device hosts the orchestrator discovers at startup.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;

#[derive(Debug, Clone, Deserialize)]
pub struct DeviceHost {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Deserialize)]
struct DeviceHostsDocument {
    hosts: Vec<DeviceHost>,
}

/// Loads the configured device hosts, returning an empty list rather than
/// an error when the file is absent: discovery is best-effort and a fresh
/// deployment may rely solely on a pre-populated registry snapshot.
pub fn load(path: impl AsRef<Path>) -> Result<Vec<DeviceHost>> {
    let path = path.as_ref();
    let contents = match std::fs::read_to_string(path) {
        Ok(c) => c,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
        Err(e) => return Err(e).with_context(|| format!("failed to read device hosts {}", path.display())),
    };
    let document: DeviceHostsDocument =
        serde_json::from_str(&contents).with_context(|| format!("failed to parse device hosts {}", path.display()))?;
    Ok(document.hosts)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_yields_empty_list() {
        let hosts = load("/nonexistent/device_hosts.json").unwrap();
        assert!(hosts.is_empty());
    }

    #[test]
    fn parses_configured_hosts() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("device_hosts.json");
        std::fs::write(&path, r#"{"hosts": [{"host": "10.0.0.5", "port": 5683}]}"#).unwrap();
        let hosts = load(&path).unwrap();
        assert_eq!(hosts.len(), 1);
        assert_eq!(hosts[0].host, "10.0.0.5");
        assert_eq!(hosts[0].port, 5683);
    }
}

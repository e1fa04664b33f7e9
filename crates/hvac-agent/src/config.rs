// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! CLI surface and the resolved configuration it produces. Precedence is
//! CLI flag, then environment variable, then the flag's own default —
//! mirroring `hdds-discovery-server`'s args-then-file-then-default layering.

use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "hvac-agent", about = "Edge agent for HVAC smart-building telemetry, control, and cloud sync")]
pub struct Args {
    #[arg(long, env = "HVAC_ROOMS_CONFIG", default_value = "rooms_config.json")]
    pub rooms_config: PathBuf,

    #[arg(long, env = "HVAC_POLICY_FILE", default_value = "policy.json")]
    pub policy_file: PathBuf,

    #[arg(long, env = "HVAC_REGISTRY_FILE", default_value = "registry.json")]
    pub registry_file: PathBuf,

    #[arg(long, env = "HVAC_DEVICE_HOSTS_FILE", default_value = "device_hosts.json")]
    pub device_hosts_file: PathBuf,

    #[arg(long, env = "HVAC_CLOUD_URL", default_value = "http://localhost:9000")]
    pub cloud_url: String,

    #[arg(long, env = "HVAC_BUS_ADDR", default_value = "inmemory://local")]
    pub bus_addr: String,

    #[arg(long, env = "HVAC_GATEWAY_BIND", default_value = "0.0.0.0")]
    pub gateway_bind: String,

    #[arg(long, env = "HVAC_GATEWAY_PORT", default_value_t = 8080)]
    pub gateway_port: u16,

    #[arg(long, env = "HVAC_LOG_LEVEL", default_value = "info")]
    pub log_level: String,
}

/// The resolved configuration the orchestrator runs with, after CLI/env
/// precedence has been applied by `clap`'s own `env` fallback.
pub struct AgentConfig {
    pub rooms_config: PathBuf,
    pub policy_file: PathBuf,
    pub registry_file: PathBuf,
    pub device_hosts_file: PathBuf,
    pub cloud_url: String,
    pub bus_addr: String,
    pub gateway_bind: String,
    pub gateway_port: u16,
    pub log_level: String,
}

impl AgentConfig {
    pub fn load() -> Result<Self> {
        let args = Args::parse();
        Self::from_args(args)
    }

    fn from_args(args: Args) -> Result<Self> {
        Ok(Self {
            rooms_config: args.rooms_config,
            policy_file: args.policy_file,
            registry_file: args.registry_file,
            device_hosts_file: args.device_hosts_file,
            cloud_url: args.cloud_url,
            bus_addr: args.bus_addr,
            gateway_bind: args.gateway_bind,
            gateway_port: args.gateway_port,
            log_level: args.log_level,
        })
    }

    pub fn gateway_addr(&self) -> Result<std::net::SocketAddr> {
        format!("{}:{}", self.gateway_bind, self.gateway_port)
            .parse()
            .with_context(|| format!("invalid gateway bind address {}:{}", self.gateway_bind, self.gateway_port))
    }

    pub fn tracing_level(&self) -> tracing::Level {
        match self.log_level.to_ascii_lowercase().as_str() {
            "trace" => tracing::Level::TRACE,
            "debug" => tracing::Level::DEBUG,
            "warn" => tracing::Level::WARN,
            "error" => tracing::Level::ERROR,
            _ => tracing::Level::INFO,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unrecognised_log_level_falls_back_to_info() {
        let config = AgentConfig::from_args(Args::parse_from([
            "hvac-agent",
            "--log-level",
            "verbose",
        ]))
        .unwrap();
        assert_eq!(config.tracing_level(), tracing::Level::INFO);
    }

    #[test]
    fn gateway_addr_combines_bind_and_port() {
        let config = AgentConfig::from_args(Args::parse_from([
            "hvac-agent",
            "--gateway-bind",
            "127.0.0.1",
            "--gateway-port",
            "9191",
        ]))
        .unwrap();
        assert_eq!(config.gateway_addr().unwrap().to_string(), "127.0.0.1:9191");
    }
}

// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Orchestrator: wires the bus, the per-room collectors and policy
//! engines, the device runtimes, and the protocol gateway into one
//! running process, then tears them down cleanly on ctrl-c.

use anyhow::{Context, Result};
use hvac_agent::config::AgentConfig;
use hvac_agent::topology;
use hvac_collector::{Dispatcher, RoomCollector, SyncWorker};
use hvac_gateway::{AppState, DeviceRegistry, Discoverer, GatewayForwardClient, InMemoryTransport, ReqwestUpstreamClient};
use hvac_policy::PolicyEngine;
use hvac_pubsub::{InMemoryBroker, PubSubAdapter};
use hvac_runtime::SmartObjectRuntime;
use std::sync::Arc;
use tracing::{info, warn};

#[tokio::main]
async fn main() -> Result<()> {
    let config = AgentConfig::load()?;
    init_tracing(config.tracing_level());

    info!(
        rooms_config = %config.rooms_config.display(),
        bus_addr = %config.bus_addr,
        cloud_url = %config.cloud_url,
        gateway_bind = %config.gateway_bind,
        gateway_port = config.gateway_port,
        "starting hvac-agent"
    );

    let topology = topology::load(&config.rooms_config)
        .with_context(|| format!("failed to load rooms config {}", config.rooms_config.display()))?;
    info!(rooms = topology.rooms.len(), objects = topology.objects.len(), "rooms config loaded");

    // The bus address names an external MQTT broker per the system's
    // external interfaces, but no `MqttAdapter` ships in this workspace —
    // the in-process broker is the only backend a real deployment gets
    // today. A real broker is a `PubSubAdapter` implementor away.
    let adapter: Arc<dyn PubSubAdapter> = Arc::new(InMemoryBroker::new());

    let registry = Arc::new(
        DeviceRegistry::load(&config.registry_file)
            .with_context(|| format!("failed to load device registry {}", config.registry_file.display()))?,
    );

    // Discovery supplements whatever the registry snapshot already has,
    // rather than replacing it: a device host that's unreachable this run
    // just leaves its previous entries in place.
    let device_hosts = hvac_agent::device_hosts::load(&config.device_hosts_file)
        .with_context(|| format!("failed to load device hosts {}", config.device_hosts_file.display()))?;
    let discovery_transport: Arc<dyn hvac_gateway::DiscoveryTransport> = Arc::new(InMemoryTransport::new());
    let discoverer = Discoverer::new(registry.clone(), discovery_transport);
    for host in &device_hosts {
        match discoverer.discover(&host.host, host.port).await {
            Ok(count) => info!(host = %host.host, port = host.port, links = count, "discovered device host"),
            Err(e) => warn!(host = %host.host, port = host.port, error = %e, "device host discovery failed"),
        }
    }

    let upstream: Arc<dyn hvac_gateway::UpstreamClient> = Arc::new(ReqwestUpstreamClient::new());
    let forward_client: Arc<dyn hvac_policy::ForwardClient> =
        Arc::new(GatewayForwardClient::new(registry.clone(), upstream.clone()));

    let topology::BuiltTopology { rooms, objects } = topology;
    for room in &rooms {
        for rack in room.racks() {
            rack.set_status(hvac_domain::RackStatus::On);
        }
    }
    let app_state = AppState::new(rooms, registry.clone(), upstream.clone());

    let dispatcher = Dispatcher::new(adapter.clone());
    for room in app_state.rooms.read().iter() {
        let engine = Arc::new(
            PolicyEngine::load(room.room_id.clone(), config.policy_file.clone(), forward_client.clone())
                .with_context(|| format!("failed to load policies for room {}", room.room_id))?,
        );
        app_state.register_room_policies(room.room_id.clone(), engine.clone());
        dispatcher.register_room(Arc::new(RoomCollector::new(room.room_id.clone(), engine)));
    }
    dispatcher.start().await.context("failed to start telemetry dispatcher")?;

    let mut runtimes = Vec::with_capacity(objects.len());
    for topology::RuntimeObject { object, rack_status } in objects {
        let runtime = Arc::new(SmartObjectRuntime::new(object, rack_status));
        runtime.start(adapter.clone());
        runtimes.push(runtime);
    }
    info!(count = runtimes.len(), "smart object runtimes started");

    let sync_worker = Arc::new(SyncWorker::new(dispatcher.clone(), config.cloud_url.clone()));
    let sync_handle = sync_worker.spawn();

    let router = hvac_gateway::routes::build_router(app_state.clone());
    let gateway_addr = config.gateway_addr()?;
    let listener = tokio::net::TcpListener::bind(gateway_addr)
        .await
        .with_context(|| format!("failed to bind gateway on {gateway_addr}"))?;
    info!(addr = %gateway_addr, "gateway listening");
    let serve_handle = tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, router).await {
            tracing::error!(error = %e, "gateway server exited");
        }
    });

    tokio::signal::ctrl_c().await.context("failed to listen for ctrl-c")?;
    info!("shutdown signal received, stopping");

    sync_handle.abort();
    serve_handle.abort();
    for runtime in &runtimes {
        runtime.stop().await;
    }
    adapter.stop().await.ok();
    if let Err(e) = registry.save(&config.registry_file) {
        tracing::warn!(error = %e, "failed to persist device registry on shutdown");
    }

    info!("shutdown complete");
    Ok(())
}

fn init_tracing(level: tracing::Level) {
    tracing_subscriber::fmt().with_max_level(level).with_target(false).init();
}

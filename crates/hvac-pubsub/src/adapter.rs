// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! The pub/sub adapter contract: the sole place in the system that knows
//! the wire-format of a telemetry/control message (JSON, UTF-8; stable
//! field order not required).

use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PubSubError {
    #[error("adapter is not started")]
    NotStarted,
    #[error("publish failed: {0}")]
    PublishFailed(String),
}

#[derive(Debug, Clone)]
pub struct InboundMessage {
    pub topic: String,
    pub payload: Vec<u8>,
}

/// A subscription handler. Must not block — the adapter's delivery loop
/// invokes handlers inline; a handler that needs to do real work enqueues
/// it (e.g. onto a bounded `tokio::mpsc::Sender`) and returns immediately.
pub type Handler = Arc<dyn Fn(InboundMessage) + Send + Sync>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(pub u64);

#[async_trait]
pub trait PubSubAdapter: Send + Sync {
    async fn start(&self) -> Result<(), PubSubError>;
    async fn stop(&self) -> Result<(), PubSubError>;

    /// Publish is fire-and-forget at the protocol level: failures are
    /// logged by the implementation and returned here only so the caller
    /// can additionally observe them; the system never treats a publish
    /// failure as fatal.
    async fn publish(&self, topic: &str, payload: Vec<u8>, qos: u8, retain: bool) -> Result<(), PubSubError>;

    async fn subscribe(&self, pattern: &str, qos: u8, handler: Handler) -> Result<SubscriptionId, PubSubError>;

    async fn unsubscribe(&self, id: SubscriptionId) -> Result<(), PubSubError>;
}

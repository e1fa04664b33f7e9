// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! The seam between the policy engine and the protocol gateway. The
//! gateway crate implements [`ForwardClient`]; the policy engine only
//! depends on the trait, so it can be unit-tested with a recording fake
//! and never needs a live gateway to run.

use async_trait::async_trait;
use serde_json::Value;

#[derive(Debug, Clone, PartialEq)]
pub struct ForwardRequest {
    pub object_id: String,
    pub room_id: String,
    pub rack_id: Option<String>,
    pub command: Value,
}

#[async_trait]
pub trait ForwardClient: Send + Sync {
    async fn forward(&self, request: ForwardRequest) -> Result<(), String>;
}

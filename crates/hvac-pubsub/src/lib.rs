// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Publish/subscribe fabric used to move telemetry and control messages
//! between the device runtime, the policy engine, and the protocol
//! gateway. The rest of the workspace depends only on [`PubSubAdapter`];
//! [`InMemoryBroker`] is the default, in-process implementation.

pub mod adapter;
pub mod inmemory;
pub mod topic;

pub use adapter::{Handler, InboundMessage, PubSubAdapter, PubSubError, SubscriptionId};
pub use inmemory::InMemoryBroker;

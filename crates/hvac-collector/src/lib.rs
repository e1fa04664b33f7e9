// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Per-room telemetry collection.
//!
//! A [`dispatch::Dispatcher`] subscribes once across every configured
//! room and routes each inbound telemetry/control message, by
//! `metadata.room_id`, to that room's [`room::RoomCollector`]. The
//! collector hands telemetry to the room's policy engine and batches it;
//! a [`sync::SyncWorker`] periodically drains every room's batch to the
//! cloud endpoint.

pub mod dispatch;
pub mod room;
pub mod sync;

pub use dispatch::Dispatcher;
pub use room::RoomCollector;
pub use sync::{SyncWorker, DEFAULT_SYNC_INTERVAL_S};

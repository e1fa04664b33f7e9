// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Periodic batch upload of accumulated telemetry to the cloud endpoint.
//! A room's batch is cleared only once its upload is acknowledged with a
//! 2xx response; any other outcome, including a transport error, leaves
//! the batch untouched so the next tick retries with everything still
//! pending (S4).

use crate::dispatch::Dispatcher;
use hvac_domain::TelemetryMessage;
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

pub const DEFAULT_SYNC_INTERVAL_S: u64 = 30;

fn now_ms() -> i64 {
    use std::time::{SystemTime, UNIX_EPOCH};
    SystemTime::now().duration_since(UNIX_EPOCH).map(|d| d.as_millis() as i64).unwrap_or(0)
}

#[derive(Serialize)]
struct SyncPayload<'a> {
    room_id: &'a str,
    #[serde(rename = "timestamp")]
    timestamp_ms: i64,
    telemetries: &'a [TelemetryMessage],
}

pub struct SyncWorker {
    dispatcher: Arc<Dispatcher>,
    client: reqwest::Client,
    cloud_url: String,
    interval: Duration,
}

impl SyncWorker {
    pub fn new(dispatcher: Arc<Dispatcher>, cloud_url: impl Into<String>) -> Self {
        Self::with_interval(dispatcher, cloud_url, Duration::from_secs(DEFAULT_SYNC_INTERVAL_S))
    }

    pub fn with_interval(dispatcher: Arc<Dispatcher>, cloud_url: impl Into<String>, interval: Duration) -> Self {
        Self {
            dispatcher,
            client: reqwest::Client::new(),
            cloud_url: cloud_url.into(),
            interval,
        }
    }

    pub fn spawn(self: Arc<Self>) -> tokio::task::JoinHandle<()> {
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(self.interval);
            loop {
                ticker.tick().await;
                self.sync_once().await;
            }
        })
    }

    pub async fn sync_once(&self) {
        for collector in self.dispatcher.collectors() {
            let batch = collector.drain_batch();
            if batch.is_empty() {
                continue;
            }
            let payload = SyncPayload {
                room_id: collector.room_id(),
                timestamp_ms: now_ms(),
                telemetries: &batch,
            };
            let url = format!("{}/sync", self.cloud_url.trim_end_matches('/'));
            match self.client.post(&url).json(&payload).send().await {
                Ok(response) if response.status().is_success() => {
                    info!(room_id = collector.room_id(), count = batch.len(), "synced telemetry batch");
                }
                Ok(response) => {
                    warn!(
                        room_id = collector.room_id(),
                        status = %response.status(),
                        "cloud sync rejected batch, retaining for retry"
                    );
                    collector.requeue(batch);
                }
                Err(e) => {
                    warn!(room_id = collector.room_id(), error = %e, "cloud sync request failed, retaining for retry");
                    collector.requeue(batch);
                }
            }
        }
    }
}

// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Periodic sensor sampling. One task per sensor resource; first tick
//! delayed by `task_delay_s`, subsequent ticks every `period_s` as
//! carried on the resource's own `SensorState`.

use crate::clock::now_ms;
use hvac_domain::{ResourceEvent, SmartObject};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

pub const DEFAULT_TASK_DELAY_S: u64 = 5;

/// Handle to a running sensor task. Dropping it does not stop the task —
/// call [`SensorHandle::stop`] explicitly, matching the "stop flag/token,
/// drains within one tick" cancellation contract.
pub struct SensorHandle {
    stop: Arc<AtomicBool>,
    join: JoinHandle<()>,
}

impl SensorHandle {
    pub async fn stop(self) {
        self.stop.store(true, Ordering::SeqCst);
        let _ = self.join.await;
    }
}

/// Spawn the periodic task for `resource_id` on `object`. `object` must
/// own a sensor resource with that id; the task exits quietly if the
/// resource disappears (it never does in practice, the object tree is
/// built once at startup).
pub fn start_periodic(object: Arc<SmartObject>, resource_id: String) -> SensorHandle {
    let stop = Arc::new(AtomicBool::new(false));
    let stop_flag = stop.clone();

    let join = tokio::spawn(async move {
        tokio::time::sleep(Duration::from_secs(DEFAULT_TASK_DELAY_S)).await;

        loop {
            if stop_flag.load(Ordering::SeqCst) {
                break;
            }

            let Some(resource) = object.get_resource(&resource_id) else {
                warn!(resource_id, "sensor resource vanished, stopping task");
                break;
            };
            let Some(sensor) = resource.as_sensor() else {
                warn!(resource_id, "resource is not a sensor, stopping task");
                break;
            };

            let (value, period_s) = {
                let mut state = sensor.lock();
                let value = state.measure(fastrand::f64(), now_ms());
                (value, state.period_s)
            };
            debug!(resource_id, value, "sensor tick");
            resource.notify(ResourceEvent::Telemetry { value });

            tokio::time::sleep(Duration::from_secs(period_s.max(1))).await;
        }
    });

    SensorHandle { stop, join }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hvac_domain::catalogue::environment_monitor;
    use std::sync::atomic::AtomicUsize;

    #[tokio::test(start_paused = true)]
    async fn periodic_task_ticks_after_delay_and_stops_cleanly() {
        let object = Arc::new(environment_monitor("room_A1"));
        let resource_id = "environment_monitor_temp".to_string();
        let hits = Arc::new(AtomicUsize::new(0));
        let hits2 = hits.clone();
        object
            .get_resource(&resource_id)
            .unwrap()
            .add_listener(Arc::new(CountingListener(hits2)));

        let handle = start_periodic(object.clone(), resource_id);
        tokio::time::advance(Duration::from_secs(DEFAULT_TASK_DELAY_S + 1)).await;
        tokio::task::yield_now().await;
        assert_eq!(hits.load(Ordering::SeqCst), 1);

        handle.stop().await;
    }

    struct CountingListener(Arc<AtomicUsize>);
    impl hvac_domain::ResourceListener for CountingListener {
        fn on_data_changed(&self, _resource_id: &str, _type_tag: &str, _event: &ResourceEvent) {
            self.0.fetch_add(1, Ordering::SeqCst);
        }
    }
}

// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Device runtime: starts and stops a smart object's sensor tasks,
//! toggles actuator operationality, and wires each resource's change
//! notifications to the pub/sub bus.

pub mod clock;
pub mod listener;
pub mod scheduler;

use hvac_domain::message::Metadata;
use hvac_domain::{RackStatus, SmartObject};
use hvac_pubsub::PubSubAdapter;
use listener::PublishingListener;
use parking_lot::Mutex;
use scheduler::SensorHandle;
use std::sync::Arc;
use tracing::info;

/// Runtime state for one started [`SmartObject`]: its live sensor tasks.
/// Constructed once per object at orchestrator startup. `rack_status` is
/// `Some` for a rack-scoped object and gates whether `start()` marks its
/// actuators operational; room-scoped objects (no owning rack) are always
/// eligible.
pub struct SmartObjectRuntime {
    object: Arc<SmartObject>,
    rack_status: Option<Arc<Mutex<RackStatus>>>,
    sensor_tasks: Mutex<Vec<SensorHandle>>,
}

impl SmartObjectRuntime {
    pub fn new(object: Arc<SmartObject>, rack_status: Option<Arc<Mutex<RackStatus>>>) -> Self {
        Self {
            object,
            rack_status,
            sensor_tasks: Mutex::new(Vec::new()),
        }
    }

    pub fn object(&self) -> &Arc<SmartObject> {
        &self.object
    }

    fn rack_accepts_commands(&self) -> bool {
        match &self.rack_status {
            Some(status) => *status.lock() == RackStatus::On,
            None => true,
        }
    }

    /// Register publishing listeners on every resource, mark actuators
    /// operational (rack-scoped actuators only once their rack is ON),
    /// and start each sensor's periodic task.
    pub fn start(&self, adapter: Arc<dyn PubSubAdapter>) {
        info!(object_id = %self.object.object_id, "starting smart object");

        let operational = self.rack_accepts_commands();
        let mut sensor_ids = Vec::new();
        for resource in self.object.resources() {
            let telemetry_topic = self.object.telemetry_topic(&resource.resource_id);
            let control_topic = self.object.control_topic(&resource.resource_id);
            let metadata = Metadata {
                room_id: self.object.room_id.clone(),
                rack_id: self.object.rack_id.clone(),
                object_id: self.object.object_id.clone(),
                resource_id: resource.resource_id.clone(),
            };
            resource.add_listener(Arc::new(PublishingListener::new(
                telemetry_topic,
                control_topic,
                metadata,
                adapter.clone(),
            )));

            if let Some(actuator) = resource.as_actuator() {
                if operational {
                    actuator.lock().set_operational(true);
                }
            } else {
                sensor_ids.push(resource.resource_id.clone());
            }
        }

        let mut tasks = self.sensor_tasks.lock();
        for resource_id in sensor_ids {
            tasks.push(scheduler::start_periodic(self.object.clone(), resource_id));
        }
    }

    /// Mark actuators non-operational and stop every sensor task,
    /// draining each within its current tick.
    pub async fn stop(&self) {
        info!(object_id = %self.object.object_id, "stopping smart object");
        for resource in self.object.resources() {
            if let Some(actuator) = resource.as_actuator() {
                actuator.lock().set_operational(false);
            }
        }
        let handles = std::mem::take(&mut *self.sensor_tasks.lock());
        for handle in handles {
            handle.stop().await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hvac_domain::catalogue::rack_cooling_unit;
    use hvac_pubsub::InMemoryBroker;

    #[tokio::test]
    async fn start_marks_actuator_operational_and_stop_reverses() {
        let object = Arc::new(rack_cooling_unit("rack_cooling_unit", "room_A1", "rack_A1"));
        let rack_status = Arc::new(Mutex::new(RackStatus::On));
        let runtime = SmartObjectRuntime::new(object.clone(), Some(rack_status));
        let adapter: Arc<dyn PubSubAdapter> = Arc::new(InMemoryBroker::new());
        adapter.start().await.unwrap();

        runtime.start(adapter.clone());
        let fan = object.get_resource("rack_cooling_unit_fan").unwrap();
        assert!(fan.as_actuator().unwrap().lock().is_operational);

        runtime.stop().await;
        assert!(!fan.as_actuator().unwrap().lock().is_operational);
    }

    #[tokio::test]
    async fn start_leaves_actuator_non_operational_while_rack_is_off() {
        let object = Arc::new(rack_cooling_unit("rack_cooling_unit", "room_A1", "rack_A1"));
        let rack_status = Arc::new(Mutex::new(RackStatus::Off));
        let runtime = SmartObjectRuntime::new(object.clone(), Some(rack_status));
        let adapter: Arc<dyn PubSubAdapter> = Arc::new(InMemoryBroker::new());
        adapter.start().await.unwrap();

        runtime.start(adapter.clone());
        let fan = object.get_resource("rack_cooling_unit_fan").unwrap();
        assert!(!fan.as_actuator().unwrap().lock().is_operational);
    }

    #[tokio::test]
    async fn room_scoped_object_has_no_rack_to_gate_on() {
        let object = Arc::new(hvac_domain::catalogue::environment_monitor("room_A1"));
        let runtime = SmartObjectRuntime::new(object.clone(), None);
        let adapter: Arc<dyn PubSubAdapter> = Arc::new(InMemoryBroker::new());
        adapter.start().await.unwrap();

        runtime.start(adapter.clone());
        assert!(runtime.rack_accepts_commands());
    }
}

// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Hierarchical containers addressing smart objects: a [`Room`] owns
//! [`Rack`]s and room-scoped smart objects; a [`Rack`] owns its own
//! smart objects and carries a coarse on/off status that gates whether
//! commands propagate to them.

use crate::smart_object::SmartObject;
use parking_lot::Mutex;
use std::collections::BTreeMap;
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RackStatus {
    On,
    Off,
}

pub struct Rack {
    pub rack_id: String,
    status: Arc<Mutex<RackStatus>>,
    smart_objects: BTreeMap<String, SmartObject>,
}

impl Rack {
    pub fn new(rack_id: impl Into<String>) -> Self {
        Self {
            rack_id: rack_id.into(),
            status: Arc::new(Mutex::new(RackStatus::Off)),
            smart_objects: BTreeMap::new(),
        }
    }

    pub fn add_smart_object(&mut self, object: SmartObject) {
        self.smart_objects.insert(object.object_id.clone(), object);
    }

    pub fn get_smart_object(&self, object_id: &str) -> Option<&SmartObject> {
        self.smart_objects.get(object_id)
    }

    pub fn smart_objects(&self) -> impl Iterator<Item = &SmartObject> {
        self.smart_objects.values()
    }

    pub fn status(&self) -> RackStatus {
        *self.status.lock()
    }

    pub fn set_status(&self, status: RackStatus) {
        *self.status.lock() = status;
    }

    /// A shared cell over this rack's status, given to the device
    /// runtime of every smart object it owns so actuator operationality
    /// can be gated on rack power without a back-reference to the rack
    /// itself.
    pub fn status_handle(&self) -> Arc<Mutex<RackStatus>> {
        self.status.clone()
    }

    /// Whether a smart object in this rack may receive commands: the
    /// rack must be powered on.
    pub fn accepts_commands(&self) -> bool {
        self.status() == RackStatus::On
    }
}

pub struct Room {
    pub room_id: String,
    pub location: String,
    smart_objects: BTreeMap<String, SmartObject>,
    racks: BTreeMap<String, Rack>,
}

impl Room {
    pub fn new(room_id: impl Into<String>, location: impl Into<String>) -> Self {
        Self {
            room_id: room_id.into(),
            location: location.into(),
            smart_objects: BTreeMap::new(),
            racks: BTreeMap::new(),
        }
    }

    pub fn add_smart_object(&mut self, object: SmartObject) {
        self.smart_objects.insert(object.object_id.clone(), object);
    }

    pub fn add_rack(&mut self, rack: Rack) {
        self.racks.insert(rack.rack_id.clone(), rack);
    }

    pub fn get_smart_object(&self, object_id: &str) -> Option<&SmartObject> {
        self.smart_objects.get(object_id)
    }

    pub fn get_rack(&self, rack_id: &str) -> Option<&Rack> {
        self.racks.get(rack_id)
    }

    pub fn smart_objects(&self) -> impl Iterator<Item = &SmartObject> {
        self.smart_objects.values()
    }

    pub fn racks(&self) -> impl Iterator<Item = &Rack> {
        self.racks.values()
    }
}

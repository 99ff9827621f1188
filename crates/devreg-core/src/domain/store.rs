//! In-memory device store with a monotonic ID allocator.
//!
//! The store is a plain single-threaded struct: it holds the device map and
//! the ID counter, nothing else.  Mutation serialization (the "single logical
//! writer" requirement) is imposed by the caller — the server wraps the store
//! in one async mutex and holds it across each mutate-then-broadcast pair.

use std::collections::HashMap;

use thiserror::Error;
use tracing::debug;

use crate::domain::device::{Device, DeviceId};

/// Errors returned by store mutations.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum StoreError {
    /// The referenced device is not in the store.
    ///
    /// Not an exceptional condition: the protocol renders it as a failure
    /// envelope, and the connection stays open.
    #[error("no device with ID {0}")]
    NotFound(DeviceId),
}

/// Mapping from device ID to device record, plus the ID allocator.
///
/// IDs are assigned strictly increasing from 0 across all `create` calls for
/// the lifetime of the store, with no reuse even after removals.  The counter
/// resets only on a full process restart.
#[derive(Debug, Default)]
pub struct DeviceStore {
    devices: HashMap<DeviceId, Device>,
    next_id: DeviceId,
}

impl DeviceStore {
    /// Creates an empty store with the ID counter at 0.
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocates the next ID, inserts a new device, and returns the record.
    ///
    /// Creation cannot fail.
    pub fn create(&mut self, name: String, description: String, status: bool) -> Device {
        let id = self.next_id;
        self.next_id += 1;

        let device = Device {
            id,
            name,
            description,
            status,
        };
        self.devices.insert(id, device.clone());
        debug!(device_id = id, "device created");
        device
    }

    /// Overwrites the mutable fields of an existing device in place.
    ///
    /// The ID is unchanged.  Returns the updated record.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NotFound`] if `id` is not in the store; the
    /// store is left untouched.
    pub fn update(
        &mut self,
        id: DeviceId,
        name: String,
        description: String,
        status: bool,
    ) -> Result<Device, StoreError> {
        let device = self.devices.get_mut(&id).ok_or(StoreError::NotFound(id))?;
        device.name = name;
        device.description = description;
        device.status = status;
        debug!(device_id = id, "device updated");
        Ok(device.clone())
    }

    /// Deletes a device and returns the removed record.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NotFound`] if `id` is not in the store; the
    /// store is left untouched.
    pub fn remove(&mut self, id: DeviceId) -> Result<Device, StoreError> {
        let device = self.devices.remove(&id).ok_or(StoreError::NotFound(id))?;
        debug!(device_id = id, "device removed");
        Ok(device)
    }

    /// Returns all current devices.
    ///
    /// The order is unspecified; consumers must not depend on it.
    pub fn snapshot(&self) -> Vec<Device> {
        self.devices.values().cloned().collect()
    }

    /// Number of devices currently in the store.
    pub fn len(&self) -> usize {
        self.devices.len()
    }

    /// Returns `true` if the store holds no devices.
    pub fn is_empty(&self) -> bool {
        self.devices.is_empty()
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

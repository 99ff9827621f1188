//! Domain module containing the device entity and the in-memory store.

pub mod device;
pub mod store;

pub use device::{Device, DeviceId};
pub use store::{DeviceStore, StoreError};

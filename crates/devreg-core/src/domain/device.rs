//! Device domain entity.
//!
//! A device record is the unit of state the registry synchronizes across
//! clients.  Records live only in memory; they do not survive a process
//! restart.

/// Identifier assigned to a device by the store.
///
/// IDs come from a single monotonically increasing counter starting at 0.
/// An ID is never reused, even after its device is removed.
pub type DeviceId = u64;

/// A single device record.
///
/// `id` is immutable once assigned.  The remaining fields are overwritten in
/// place by a successful `update` action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Device {
    /// Store-assigned identifier.  Unique for the lifetime of the store.
    pub id: DeviceId,
    /// Human-readable device name.
    pub name: String,
    /// Free-form description.
    pub description: String,
    /// Operational status flag (`true` = on).
    pub status: bool,
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_device_fields_are_accessible() {
        let device = Device {
            id: 7,
            name: "Sensor".to_string(),
            description: "hallway".to_string(),
            status: true,
        };
        assert_eq!(device.id, 7);
        assert_eq!(device.name, "Sensor");
        assert_eq!(device.description, "hallway");
        assert!(device.status);
    }

    #[test]
    fn test_device_can_be_cloned_and_compared() {
        let device = Device {
            id: 0,
            name: "Lamp".to_string(),
            description: "desk".to_string(),
            status: false,
        };
        let cloned = device.clone();
        assert_eq!(device, cloned);
    }
}

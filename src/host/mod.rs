//! Host abstraction over polling-based input APIs.
//!
//! The tracking core never talks to hardware directly; it consumes owned
//! per-tick [`DeviceSnapshot`]s from a [`DeviceHost`] and routes haptic
//! pulses back through it. The production backend is [`GilrsHost`]; tests
//! drive the core with hand-built snapshots.

pub mod gilrs_host;

pub use gilrs_host::{GilrsHost, HostError};

use serde::{Deserialize, Serialize};

use crate::events::Hand;

/// Tracking capability of a device, fixed at adapter construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Dof {
    /// No pose reporting (plain gamepads)
    Zero,
    /// Orientation only; position is synthesized by the arm model
    Three,
    /// Native orientation and position tracking
    Six,
}

impl Dof {
    pub fn from_caps(caps: PoseCaps) -> Self {
        match (caps.has_orientation, caps.has_position) {
            (true, true) => Dof::Six,
            (true, false) => Dof::Three,
            _ => Dof::Zero,
        }
    }
}

/// Pose capability flags advertised by the host for a device.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PoseCaps {
    pub has_orientation: bool,
    pub has_position: bool,
}

/// Raw per-tick state of one button.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct RawButton {
    pub value: f32,
    pub touched: bool,
    pub pressed: bool,
}

/// Raw pose sample; orientation and position are independently nullable.
///
/// Quaternions are (x, y, z, w), positions are meters.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct RawPose {
    pub orientation: Option<[f32; 4]>,
    pub position: Option<[f32; 3]>,
}

impl RawPose {
    /// A pose carrying neither orientation nor position counts as absent.
    pub fn is_empty(&self) -> bool {
        self.orientation.is_none() && self.position.is_none()
    }
}

/// Owned per-tick view of one device slot.
#[derive(Debug, Clone, Default)]
pub struct DeviceSnapshot {
    /// Raw identifier string, possibly with vendor-appended suffixes
    pub id: String,
    pub hand: Hand,
    pub axes: Vec<f32>,
    pub buttons: Vec<RawButton>,
    /// Capability flags captured for DOF classification
    pub caps: PoseCaps,
    /// Pose sample for this tick; `None` when the device reports no pose
    /// object at all
    pub pose: Option<RawPose>,
    /// Number of haptic actuators the device exposes
    pub actuators: usize,
}

/// One scheduled hardware vibration command.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HapticPulse {
    pub intensity: f32,
    pub duration_ms: u64,
}

/// Polling-based input backend.
///
/// Slot indexes are stable for the lifetime of a device connection; an empty
/// slot (`device` returning `None`) is an explicit disconnect signal. A
/// powered-off device may instead keep its slot non-empty with stale data —
/// that case is detected inside the adapter, not here.
pub trait DeviceHost {
    /// Whether the host can poll devices at all. A host without polling
    /// capability turns every session tick into a silent no-op.
    fn is_available(&self) -> bool {
        true
    }

    /// Called once per tick before slots are enumerated.
    fn refresh(&mut self) {}

    fn slot_count(&self) -> usize;

    fn device(&self, slot: usize) -> Option<DeviceSnapshot>;

    /// Issues a vibration command. Hosts without haptic support ignore it.
    fn pulse(&mut self, slot: usize, pulse: HapticPulse) {
        let _ = (slot, pulse);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dof_follows_capability_flags() {
        assert_eq!(
            Dof::from_caps(PoseCaps {
                has_orientation: true,
                has_position: true
            }),
            Dof::Six
        );
        assert_eq!(
            Dof::from_caps(PoseCaps {
                has_orientation: true,
                has_position: false
            }),
            Dof::Three
        );
        assert_eq!(Dof::from_caps(PoseCaps::default()), Dof::Zero);
        // Position without orientation is not a tracked configuration.
        assert_eq!(
            Dof::from_caps(PoseCaps {
                has_orientation: false,
                has_position: true
            }),
            Dof::Zero
        );
    }

    #[test]
    fn pose_emptiness_requires_both_fields_absent() {
        assert!(RawPose::default().is_empty());
        assert!(!RawPose {
            orientation: Some([0.0, 0.0, 0.0, 1.0]),
            position: None
        }
        .is_empty());
        assert!(!RawPose {
            orientation: None,
            position: Some([0.0, 1.6, 0.0])
        }
        .is_empty());
    }
}

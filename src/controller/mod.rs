//! Controller subsystem for tracked input devices
//!
//! Implements the per-device half of the tracking pipeline:
//!
//! 1. [`axes`] - Named axis pairs, dead-zone filtering, directional presses
//! 2. [`buttons`] - Named button records and primary resolution
//! 3. [`haptics`] - Vibration channel scheduling
//! 4. [`tracked`] - The adapter tying them to pose tracking
//!
//! # Architecture
//!
//! ```text
//! DeviceSnapshot ──► poll_for_changes ──► haptics ──► pose ──► world transform
//!                    (ControllerEvent)    (pulses)   (arm model for 3-DOF)
//! ```
//!
//! Everything runs synchronously inside one `update` call per external tick.

pub mod axes;
pub mod buttons;
pub mod haptics;
pub mod tracked;

pub use axes::{deadzone_pair, TrackedAxisPair};
pub use buttons::TrackedButton;
pub use haptics::{VibeChannels, VibeScheduler};
pub use tracked::{HeadPose, TrackedController, UpdateOutcome};

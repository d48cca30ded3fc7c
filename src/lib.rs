//! openwand - tracked input device core
//!
//! Discovers, normalizes, and tracks human-interface input devices (gamepads
//! and VR motion controllers) exposed by a polling-based host API. Raw
//! per-frame device state becomes a stable, named, event-driven abstraction;
//! orientation-only controllers get a synthesized position through a
//! biomechanical arm model.
//!
//! # Architecture
//!
//! ```text
//! DeviceHost ──► InputSession ──► TrackedController ──► ControllerEvent
//!  (slots)        (poll loop)      (axes/buttons/pose)   (subscribers)
//! ```
//!
//! The crate is single-threaded and cooperative: the rendering collaborator
//! calls [`session::InputSession::tick`] once per animation frame, drains
//! the typed event channels, and injects a standing transform plus (for
//! 3-DOF devices) a head pose onto connected adapters. There are no internal
//! timers and no background polling; every anomaly degrades to a
//! reduced-capability mode or a notification rather than a failure.

pub mod arm;
pub mod catalog;
pub mod config;
pub mod controller;
pub mod events;
pub mod host;
pub mod session;

pub use arm::ArmModel;
pub use catalog::{CapabilityCatalog, ControllerSchema, ControllerStyle};
pub use config::{ConfigError, TrackingSettings};
pub use controller::{HeadPose, TrackedController, UpdateOutcome};
pub use events::{ButtonRef, ControllerEvent, ControllerProfile, Hand, PadDirection, SessionEvent};
pub use host::{
    DeviceHost, DeviceSnapshot, Dof, GilrsHost, HapticPulse, HostError, PoseCaps, RawButton,
    RawPose,
};
pub use session::{ControllerRegistry, InputSession};

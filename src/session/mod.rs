//! Session layer: device discovery, registry, and the poll loop.
//!
//! A session owns the controller registry and drives it from an external
//! tick — typically once per rendered frame. Nothing here spawns tasks or
//! timers; the collaborator's frame loop is the only clock.

pub mod poller;
pub mod registry;

pub use poller::{Initializing, InputSession, Polling, SessionState};
pub use registry::ControllerRegistry;

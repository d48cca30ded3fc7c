//! Session poll loop.
//!
//! Drives discovery and per-adapter updates once per external tick. The
//! session is a small state machine: it is created `Initializing`, then
//! transitions to `Polling` where every tick enumerates host slots,
//! constructs adapters for new devices, updates existing ones, and handles
//! both disconnect paths.

use chrono::Local;
use statum::{machine, state};
use std::time::Instant;
use tokio::sync::mpsc;
use tracing::{debug, info};

use crate::catalog::CapabilityCatalog;
use crate::config::TrackingSettings;
use crate::controller::{TrackedController, UpdateOutcome};
use crate::events::SessionEvent;
use crate::host::DeviceHost;

use super::registry::ControllerRegistry;

// Define session states using statum's state macro
#[state]
#[derive(Debug, Clone)]
pub enum SessionState {
    Initializing,
    Polling,
}

#[machine]
#[derive(Debug)]
pub struct InputSession<S: SessionState> {
    // Static schema lookup table
    catalog: CapabilityCatalog,

    // Slot-indexed adapter registry, owned exclusively by this session
    registry: ControllerRegistry,

    // Tracking thresholds shared with every adapter
    settings: TrackingSettings,

    // Session-level lifecycle subscribers
    subscribers: Vec<mpsc::UnboundedSender<SessionEvent>>,
}

// Implementation of methods available in all states
impl<S: SessionState> InputSession<S> {
    pub fn settings(&self) -> &TrackingSettings {
        &self.settings
    }

    /// Registers a subscriber for connection/disconnection notifications.
    /// Dropping the receiver unsubscribes.
    pub fn subscribe(&mut self) -> mpsc::UnboundedReceiver<SessionEvent> {
        let (tx, rx) = mpsc::unbounded_channel();
        self.subscribers.push(tx);
        rx
    }

    fn broadcast(&mut self, event: SessionEvent) {
        self.subscribers.retain(|tx| tx.send(event.clone()).is_ok());
    }
}

// Implementation for Initializing state
impl InputSession<Initializing> {
    pub fn create(settings: Option<TrackingSettings>) -> Self {
        let settings = settings.unwrap_or_default();
        debug!("Creating input session with settings: {:?}", settings);
        Self::new(
            CapabilityCatalog::builtin(),
            ControllerRegistry::new(),
            settings,
            Vec::new(),
        )
    }

    pub fn initialize(self) -> InputSession<Polling> {
        info!("Input session initialized, transitioning to Polling state");
        self.transition()
    }
}

// Implementation for Polling state
impl InputSession<Polling> {
    pub fn registry(&self) -> &ControllerRegistry {
        &self.registry
    }

    pub fn registry_mut(&mut self) -> &mut ControllerRegistry {
        &mut self.registry
    }

    /// One poll tick. Within a tick, adapter processing follows slot
    /// enumeration order.
    pub fn tick<H: DeviceHost>(&mut self, host: &mut H, now: Instant) {
        if !host.is_available() {
            // Hosts without polling capability make every tick a silent
            // no-op.
            debug!("Host has no polling capability, skipping tick");
            return;
        }

        host.refresh();

        for slot in 0..host.slot_count() {
            match host.device(slot) {
                Some(snapshot) => {
                    if !self.registry.is_registered(slot) {
                        let schema = self.catalog.lookup(&snapshot.id);
                        let controller = TrackedController::from_snapshot(
                            slot,
                            &snapshot,
                            schema,
                            self.settings,
                        );
                        let profile = controller.profile();
                        self.registry.insert(slot, controller);
                        // Connection is announced before the first update.
                        self.broadcast(SessionEvent::ControllerConnected {
                            slot,
                            profile,
                            timestamp: Local::now(),
                        });
                    }

                    let mut disconnected = false;
                    if let Some(controller) = self.registry.get_mut(slot) {
                        match controller.update(&snapshot, now) {
                            UpdateOutcome::Tracked => {
                                if let Some(pulse) = controller.take_pending_pulse() {
                                    host.pulse(slot, pulse);
                                }
                            }
                            // The adapter already announced the disconnect
                            // on its own channel.
                            UpdateOutcome::Disconnected => disconnected = true,
                        }
                    }
                    if disconnected {
                        self.clear_slot(slot);
                    }
                }
                None => {
                    // Explicitly empty slot. A powered-off device may
                    // instead keep reporting stale data here; that case is
                    // caught by the adapter's own null-pose check above.
                    if self.registry.is_registered(slot) {
                        if let Some(controller) = self.registry.get_mut(slot) {
                            controller.emit_disconnected();
                        }
                        self.clear_slot(slot);
                    }
                }
            }
        }
    }

    fn clear_slot(&mut self, slot: usize) {
        if let Some(controller) = self.registry.clear(slot) {
            info!(
                "Cleared slot {} (\"{}\"), {} controller(s) remain",
                slot,
                controller.name(),
                self.registry.connected_count()
            );
            self.broadcast(SessionEvent::ControllerDisconnected {
                slot,
                name: controller.name().to_string(),
                timestamp: Local::now(),
            });
        }
    }
}
